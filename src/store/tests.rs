use super::{Entry, EntryStore};
use std::fs;
use tempfile::TempDir;

fn temp_store() -> (TempDir, EntryStore) {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = EntryStore::load(dir.path().join("config.json")).expect("load store");
    (dir, store)
}

fn names(store: &EntryStore) -> Vec<&str> {
    store.entries().iter().map(|stored| stored.name()).collect()
}

#[test]
fn load_creates_missing_file_empty() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("config.json");
    let store = EntryStore::load(&path).expect("load store");
    assert!(store.is_empty());
    assert!(path.exists());
    let raw = fs::read_to_string(&path).expect("read store");
    assert_eq!(raw.trim(), "[]");
}

#[test]
fn added_entry_survives_reload() {
    let (dir, mut store) = temp_store();
    store
        .add(Entry::new("Terminal", "konsole"))
        .expect("add entry");

    let reloaded = EntryStore::load(dir.path().join("config.json")).expect("reload");
    assert_eq!(reloaded.len(), 1);
    assert_eq!(
        reloaded.entries()[0].entry(),
        &Entry::new("Terminal", "konsole")
    );
}

#[test]
fn reload_preserves_order() {
    let (dir, mut store) = temp_store();
    for (name, command) in [("b", "2"), ("a", "1"), ("c", "3")] {
        store.add(Entry::new(name, command)).expect("add entry");
    }
    let reloaded = EntryStore::load(dir.path().join("config.json")).expect("reload");
    assert_eq!(names(&reloaded), vec!["b", "a", "c"]);
}

#[test]
fn blank_or_null_file_loads_empty() {
    let dir = tempfile::tempdir().expect("temp dir");
    for body in ["", "  \n", "null\n"] {
        let path = dir.path().join("config.json");
        fs::write(&path, body).expect("seed store");
        let store = EntryStore::load(&path).expect("load store");
        assert!(store.is_empty(), "body {body:?} should load empty");
    }
}

#[test]
fn malformed_file_is_an_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("config.json");
    fs::write(&path, "[{\"name\": \"broken\"").expect("seed store");
    let err = EntryStore::load(&path).expect_err("malformed store");
    assert!(format!("{err:#}").contains("malformed entry store"));
}

#[test]
fn capitalized_keys_are_accepted_and_rewritten() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("config.json");
    fs::write(&path, r#"[{"Name":"Terminal","Command":"konsole"}]"#).expect("seed store");
    let store = EntryStore::load(&path).expect("load store");
    assert_eq!(store.entries()[0].command(), "konsole");

    let raw = fs::read_to_string(&path).expect("read store");
    assert!(raw.contains("\"name\""));
    assert!(!raw.contains("\"Name\""));
}

#[test]
fn remove_by_id_leaves_duplicates_alone() {
    let (_dir, mut store) = temp_store();
    let first = store.add(Entry::new("dup", "echo")).expect("add");
    store.add(Entry::new("dup", "echo")).expect("add");
    store.add(Entry::new("other", "ls")).expect("add");

    let removed = store.remove(first).expect("remove");
    assert_eq!(removed, Some(Entry::new("dup", "echo")));
    assert_eq!(names(&store), vec!["dup", "other"]);
    assert!(store.get(first).is_none());
}

#[test]
fn remove_matching_drops_every_equal_entry() {
    let (dir, mut store) = temp_store();
    store.add(Entry::new("dup", "echo")).expect("add");
    store.add(Entry::new("keep", "ls")).expect("add");
    store.add(Entry::new("dup", "echo")).expect("add");
    store.add(Entry::new("dup", "echo two")).expect("add");

    let removed = store
        .remove_matching(&Entry::new("dup", "echo"))
        .expect("remove matching");
    assert_eq!(removed, 2);

    let reloaded = EntryStore::load(dir.path().join("config.json")).expect("reload");
    let commands: Vec<&str> = reloaded.entries().iter().map(|s| s.command()).collect();
    assert_eq!(commands, vec!["ls", "echo two"]);
}

#[test]
fn update_rewrites_in_place() {
    let (dir, mut store) = temp_store();
    store.add(Entry::new("first", "1")).expect("add");
    let target = store.add(Entry::new("A", "b")).expect("add");
    store.add(Entry::new("last", "3")).expect("add");

    assert!(store.update(target, Entry::new("A2", "b2")).expect("update"));

    let reloaded = EntryStore::load(dir.path().join("config.json")).expect("reload");
    assert_eq!(names(&reloaded), vec!["first", "A2", "last"]);
    assert_eq!(reloaded.entries()[1].command(), "b2");
}

#[test]
fn unknown_ids_are_reported_not_written() {
    let (_dir, mut store) = temp_store();
    let id = store.add(Entry::new("gone", "x")).expect("add");
    store.remove(id).expect("remove");
    assert_eq!(store.remove(id).expect("remove again"), None);
    assert!(!store.update(id, Entry::new("y", "z")).expect("update"));
}

#[test]
fn failed_save_rolls_back_mutations() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("state").join("config.json");
    fs::create_dir_all(path.parent().expect("parent")).expect("create state dir");
    let mut store = EntryStore::load(&path).expect("load store");
    let kept = store.add(Entry::new("kept", "true")).expect("add");

    fs::remove_dir_all(path.parent().expect("parent")).expect("remove state dir");

    assert!(store.add(Entry::new("lost", "false")).is_err());
    assert_eq!(names(&store), vec!["kept"]);

    assert!(store.update(kept, Entry::new("renamed", "true")).is_err());
    assert_eq!(names(&store), vec!["kept"]);

    assert!(store.remove(kept).is_err());
    assert_eq!(names(&store), vec!["kept"]);

    assert!(store.remove_matching(&Entry::new("kept", "true")).is_err());
    assert_eq!(names(&store), vec!["kept"]);
}
