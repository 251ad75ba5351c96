//! Ordered launcher entries persisted as a single JSON document.
//!
//! Every mutation saves the whole collection. When a save fails the in-memory
//! change is rolled back before the error is returned, so the collection never
//! drifts away from what is on disk without the caller hearing about it.

#[cfg(test)]
mod tests;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

/// A named shell command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(alias = "Command")]
    pub command: String,
}

impl Entry {
    pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
        }
    }
}

/// Session-local handle for one stored entry. Never written to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEntry {
    id: EntryId,
    entry: Entry,
}

impl StoredEntry {
    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn entry(&self) -> &Entry {
        &self.entry
    }

    pub fn name(&self) -> &str {
        &self.entry.name
    }

    pub fn command(&self) -> &str {
        &self.entry.command
    }
}

/// File-backed entry collection. Insertion order is preserved across saves.
#[derive(Debug)]
pub struct EntryStore {
    path: PathBuf,
    entries: Vec<StoredEntry>,
    next_id: u64,
}

impl EntryStore {
    /// Read the store at `path`, creating it empty when it does not exist yet.
    ///
    /// The collection is written straight back so the file exists (and uses the
    /// current field names) before any UI is shown.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let loaded = match fs::read_to_string(&path) {
            Ok(raw) => parse_entries(&raw)
                .with_context(|| format!("malformed entry store {}", path.display()))?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "entry store missing; creating it");
                Vec::new()
            }
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("failed to read entry store {}", path.display()))
            }
        };

        let mut store = Self {
            path,
            entries: Vec::with_capacity(loaded.len()),
            next_id: 0,
        };
        for entry in loaded {
            store.push(entry);
        }
        store.save()?;
        tracing::info!(
            path = %store.path.display(),
            count = store.entries.len(),
            "entry store loaded"
        );
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[StoredEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: EntryId) -> Option<&StoredEntry> {
        self.entries.iter().find(|stored| stored.id == id)
    }

    /// Serialize the full collection, replacing the backing file via a sibling
    /// temp file and a rename.
    pub fn save(&self) -> Result<()> {
        let tmp = temp_path_for(&self.path);
        let entries: Vec<&Entry> = self.entries.iter().map(StoredEntry::entry).collect();
        let mut body =
            serde_json::to_string_pretty(&entries).context("failed to serialize entries")?;
        body.push('\n');

        let written = write_file(&tmp, body.as_bytes()).and_then(|()| {
            fs::rename(&tmp, &self.path).with_context(|| {
                format!(
                    "failed to replace {} with {}",
                    self.path.display(),
                    tmp.display()
                )
            })
        });
        if let Err(err) = written {
            let _ = fs::remove_file(&tmp);
            tracing::warn!(path = %self.path.display(), "entry store save failed");
            return Err(err);
        }
        Ok(())
    }

    /// Append an entry and persist.
    pub fn add(&mut self, entry: Entry) -> Result<EntryId> {
        let id = self.push(entry);
        if let Err(err) = self.save() {
            self.entries.pop();
            return Err(err);
        }
        Ok(id)
    }

    /// Remove exactly the entry behind `id` and persist.
    ///
    /// Returns `Ok(None)` when the id is unknown; nothing is written in that case.
    pub fn remove(&mut self, id: EntryId) -> Result<Option<Entry>> {
        let Some(pos) = self.position(id) else {
            return Ok(None);
        };
        let removed = self.entries.remove(pos);
        if let Err(err) = self.save() {
            self.entries.insert(pos, removed);
            return Err(err);
        }
        Ok(Some(removed.entry))
    }

    /// Remove every entry equal by value to `entry` and persist.
    ///
    /// Duplicates share a fate here: pointing at one of several identical
    /// entries deletes all of them. Returns how many were removed.
    pub fn remove_matching(&mut self, entry: &Entry) -> Result<usize> {
        let before = self.entries.len();
        let snapshot = self.entries.clone();
        self.entries.retain(|stored| &stored.entry != entry);
        let removed = before - self.entries.len();
        if removed == 0 {
            return Ok(0);
        }
        if let Err(err) = self.save() {
            self.entries = snapshot;
            return Err(err);
        }
        Ok(removed)
    }

    /// Overwrite the entry behind `id` in place and persist.
    ///
    /// Returns `Ok(false)` when the id is unknown.
    pub fn update(&mut self, id: EntryId, entry: Entry) -> Result<bool> {
        let Some(pos) = self.position(id) else {
            return Ok(false);
        };
        let previous = std::mem::replace(&mut self.entries[pos].entry, entry);
        if let Err(err) = self.save() {
            self.entries[pos].entry = previous;
            return Err(err);
        }
        Ok(true)
    }

    fn push(&mut self, entry: Entry) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        self.entries.push(StoredEntry { id, entry });
        id
    }

    fn position(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|stored| stored.id == id)
    }
}

/// Parse a persisted document. Blank files and a literal `null` count as empty.
fn parse_entries(raw: &str) -> Result<Vec<Entry>> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    let parsed: Option<Vec<Entry>> = serde_json::from_str(raw)?;
    Ok(parsed.unwrap_or_default())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| "entries".into());
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    file.write_all(bytes)
        .with_context(|| format!("failed to write {}", path.display()))?;
    file.sync_all()
        .with_context(|| format!("failed to sync {}", path.display()))?;
    Ok(())
}
