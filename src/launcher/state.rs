use std::ops::Range;

use super::{log_debug, log_debug_content};
use crate::filter::FuzzyFilter;
use crate::input::Action;
use crate::store::{Entry, EntryId, EntryStore, StoredEntry};
use crate::utf8_safe::display_width;
use anyhow::Result;

/// Which dialog field receives typed characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Field {
    #[default]
    Name,
    Command,
}

/// Text buffers of the Add/Edit dialog.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldBuffers {
    pub name: String,
    pub command: String,
    pub focus: Field,
}

impl FieldBuffers {
    fn from_entry(entry: &Entry) -> Self {
        Self {
            name: entry.name.clone(),
            command: entry.command.clone(),
            focus: Field::Name,
        }
    }

    /// Text of the focused field.
    pub fn focused(&self) -> &str {
        match self.focus {
            Field::Name => &self.name,
            Field::Command => &self.command,
        }
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            Field::Name => &mut self.name,
            Field::Command => &mut self.command,
        }
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Field::Name => Field::Command,
            Field::Command => Field::Name,
        };
    }

    fn to_entry(&self) -> Entry {
        Entry::new(self.name.clone(), self.command.clone())
    }
}

/// Input mode. Overlay payloads travel with their variant and vanish with it.
///
/// Edit and Delete pin their target when the overlay opens; later filter
/// changes never re-point them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    Add(FieldBuffers),
    Edit {
        target: EntryId,
        fields: FieldBuffers,
    },
    Delete {
        target: EntryId,
        name: String,
    },
}

impl Mode {
    pub fn is_overlay(&self) -> bool {
        !matches!(self, Mode::Normal)
    }

    /// Dialog buffers, for Add and Edit.
    pub fn fields(&self) -> Option<&FieldBuffers> {
        match self {
            Mode::Add(fields) | Mode::Edit { fields, .. } => Some(fields),
            Mode::Normal | Mode::Delete { .. } => None,
        }
    }

    fn fields_mut(&mut self) -> Option<&mut FieldBuffers> {
        match self {
            Mode::Add(fields) | Mode::Edit { fields, .. } => Some(fields),
            Mode::Normal | Mode::Delete { .. } => None,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Mode::Normal => "normal",
            Mode::Add(_) => "add",
            Mode::Edit { .. } => "edit",
            Mode::Delete { .. } => "delete",
        }
    }
}

/// What the event loop should do after an action was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Quit,
    /// Hand the terminal to this command line.
    Execute(String),
}

/// How a confirmed delete picks its victims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeletePolicy {
    /// Only the highlighted entry.
    #[default]
    Identity,
    /// Every entry equal by value to the highlighted one.
    Matching,
}

/// Session state of the launcher: search text, filtered view, selection, and mode.
///
/// The entry collection itself lives in [`EntryStore`] and is passed to
/// [`AppState::handle`] so every mutation goes through the store's persistence.
pub struct AppState {
    search_text: String,
    cursor_position: usize,
    filtered: Vec<EntryId>,
    list_index: usize,
    mode: Mode,
    status: Option<String>,
    delete_policy: DeletePolicy,
    filter: FuzzyFilter,
}

impl AppState {
    pub fn new(store: &EntryStore) -> Self {
        let mut state = Self {
            search_text: String::new(),
            cursor_position: 0,
            filtered: Vec::new(),
            list_index: 0,
            mode: Mode::Normal,
            status: None,
            delete_policy: DeletePolicy::default(),
            filter: FuzzyFilter::new(),
        };
        state.refilter(store);
        state
    }

    pub fn with_delete_policy(mut self, policy: DeletePolicy) -> Self {
        self.delete_policy = policy;
        self
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// Caret offset inside the search text, in display columns.
    pub fn cursor_position(&self) -> usize {
        self.cursor_position
    }

    /// Ids of the entries passing the current filter, in collection order.
    pub fn filtered(&self) -> &[EntryId] {
        &self.filtered
    }

    pub fn list_index(&self) -> usize {
        self.list_index
    }

    /// Highlighted entry, if the filtered list is not empty.
    pub fn selected(&self) -> Option<EntryId> {
        self.filtered.get(self.list_index).copied()
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    /// Transient banner text (failed save, unparsable command).
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    /// Range of `filtered` to show in `rows` lines, keeping the selection visible.
    pub fn viewport(&self, rows: usize) -> Range<usize> {
        visible_window(self.list_index, self.filtered.len(), rows)
    }

    /// Apply one action. Persistence happens synchronously before this returns.
    pub fn handle(&mut self, action: Action, store: &mut EntryStore) -> Outcome {
        self.status = None;
        if self.mode.is_overlay() {
            self.handle_overlay(action, store)
        } else {
            self.handle_normal(action, store)
        }
    }

    fn handle_normal(&mut self, action: Action, store: &mut EntryStore) -> Outcome {
        match action {
            Action::Quit => return Outcome::Quit,
            Action::Insert(c) => {
                self.search_text.push(c);
                self.list_index = 0;
                self.search_changed(store);
            }
            Action::Backspace => {
                if self.search_text.pop().is_some() {
                    self.search_changed(store);
                }
            }
            Action::ClearSearch => {
                self.search_text.clear();
                self.search_changed(store);
            }
            Action::Down => {
                if self.list_index + 1 < self.filtered.len() {
                    self.list_index += 1;
                }
            }
            Action::Up => self.list_index = self.list_index.saturating_sub(1),
            Action::New => self.enter_mode(Mode::Add(FieldBuffers::default())),
            Action::Delete => {
                if let Some(stored) = self.selected_entry(store) {
                    let mode = Mode::Delete {
                        target: stored.id(),
                        name: stored.name().to_string(),
                    };
                    self.enter_mode(mode);
                }
            }
            Action::Edit => {
                if let Some(stored) = self.selected_entry(store) {
                    let mode = Mode::Edit {
                        target: stored.id(),
                        fields: FieldBuffers::from_entry(stored.entry()),
                    };
                    self.enter_mode(mode);
                }
            }
            Action::Enter => {
                if let Some(stored) = self.selected_entry(store) {
                    log_debug_content(&format!("execute requested: {}", stored.command()));
                    return Outcome::Execute(stored.command().to_string());
                }
            }
            Action::Escape | Action::Tab => {}
        }
        Outcome::Continue
    }

    fn handle_overlay(&mut self, action: Action, store: &mut EntryStore) -> Outcome {
        match action {
            Action::Quit => return Outcome::Quit,
            Action::Escape => self.enter_mode(Mode::Normal),
            Action::Enter => self.commit(store),
            Action::Insert(c) => {
                if let Some(fields) = self.mode.fields_mut() {
                    fields.focused_mut().push(c);
                }
            }
            Action::Backspace | Action::ClearSearch => {
                if let Some(fields) = self.mode.fields_mut() {
                    fields.focused_mut().pop();
                }
            }
            Action::Tab => {
                if let Some(fields) = self.mode.fields_mut() {
                    fields.toggle_focus();
                }
            }
            Action::Up | Action::Down | Action::New | Action::Delete | Action::Edit => {}
        }
        Outcome::Continue
    }

    /// Confirm the open overlay. On failure the overlay stays open, buffers intact.
    fn commit(&mut self, store: &mut EntryStore) {
        let mode = std::mem::take(&mut self.mode);
        let result = match &mode {
            Mode::Normal => Ok(()),
            Mode::Add(fields) => store.add(fields.to_entry()).map(|_| ()),
            Mode::Edit { target, fields } => {
                self.commit_edit(*target, fields.to_entry(), store)
            }
            Mode::Delete { target, .. } => self.commit_delete(*target, store),
        };

        match result {
            Ok(()) => {
                log_debug(&format!("{} committed", mode.label()));
                self.refilter(store);
            }
            Err(err) => {
                log_debug(&format!("{} commit failed: {err:#}", mode.label()));
                self.status = Some(format!("save failed: {err:#}"));
                self.mode = mode;
            }
        }
    }

    fn commit_edit(&mut self, target: EntryId, entry: Entry, store: &mut EntryStore) -> Result<()> {
        if !store.update(target, entry)? {
            self.status = Some("entry no longer exists".to_string());
        }
        Ok(())
    }

    fn commit_delete(&mut self, target: EntryId, store: &mut EntryStore) -> Result<()> {
        let was_last_row = self.list_index + 1 >= self.filtered.len();
        match self.delete_policy {
            DeletePolicy::Identity => {
                store.remove(target)?;
            }
            DeletePolicy::Matching => {
                if let Some(entry) = store.get(target).map(|stored| stored.entry().clone()) {
                    let removed = store.remove_matching(&entry)?;
                    log_debug(&format!("removed {removed} matching entries"));
                }
            }
        }
        if was_last_row {
            self.list_index = self.list_index.saturating_sub(1);
        }
        Ok(())
    }

    fn enter_mode(&mut self, mode: Mode) {
        log_debug(&format!("mode {} -> {}", self.mode.label(), mode.label()));
        self.mode = mode;
    }

    fn selected_entry<'a>(&self, store: &'a EntryStore) -> Option<&'a StoredEntry> {
        self.selected().and_then(|id| store.get(id))
    }

    fn search_changed(&mut self, store: &EntryStore) {
        self.cursor_position = display_width(&self.search_text);
        self.refilter(store);
    }

    fn refilter(&mut self, store: &EntryStore) {
        self.filtered = self
            .filter
            .filter(&self.search_text, store.entries())
            .into_iter()
            .map(StoredEntry::id)
            .collect();
        self.list_index = self.list_index.min(self.filtered.len().saturating_sub(1));
    }
}

/// Contiguous window of `len` rows that fits in `rows` lines and contains `selected`.
pub fn visible_window(selected: usize, len: usize, rows: usize) -> Range<usize> {
    if rows == 0 || len == 0 {
        return 0..0;
    }
    let start = selected.saturating_sub(rows - 1).min(len.saturating_sub(rows));
    start..(start + rows).min(len)
}
