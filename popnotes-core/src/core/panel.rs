//! View state of a window's note list.
//!
//! The panel never learns about changes made in the other window; it only
//! refreshes by re-querying its own store handle, once on mount and after each
//! of its own successful mutations. Results that come back after the panel was
//! torn down, or that were overtaken by a newer load, are dropped.

use crate::{validate_title, Note, Result, Storage};
use serde::Serialize;

/// Identifies one load so a stale completion can be recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Snapshot of a panel handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelView {
    pub notes: Vec<Note>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Reply to an add: whether the note was stored, plus the refreshed panel.
///
/// `added` is the signal to clear the form. The view can carry an error even
/// when `added` is true, if only the re-query after the insert failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddNoteView {
    pub added: bool,
    #[serde(flatten)]
    pub view: PanelView,
}

#[derive(Debug, Default)]
pub struct NotePanel {
    notes: Vec<Note>,
    loading: bool,
    error: Option<String>,
    mounted: bool,
    generation: u64,
}

impl NotePanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Inline message for the last failed action, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn view(&self) -> PanelView {
        PanelView {
            notes: self.notes.clone(),
            loading: self.loading,
            error: self.error.clone(),
        }
    }

    /// Mounts the panel and performs its initial load.
    pub fn mount(&mut self, storage: &Storage) {
        self.mounted = true;
        self.refresh(storage);
    }

    /// Tears the panel down. Any load still in flight will be discarded.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.loading = false;
        self.generation += 1;
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.loading = true;
        LoadTicket(self.generation)
    }

    /// Applies a finished load. Returns `false` if the result was discarded.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: Result<Vec<Note>>) -> bool {
        if !self.mounted || ticket.0 != self.generation {
            log::debug!("discarding stale note list");
            return false;
        }
        self.loading = false;
        match result {
            Ok(notes) => {
                self.error = None;
                self.notes = notes;
            }
            Err(e) => {
                log::warn!("failed to fetch notes: {e}");
                self.error = Some(e.user_message());
            }
        }
        true
    }

    /// Re-queries the store.
    pub fn refresh(&mut self, storage: &Storage) {
        let ticket = self.begin_load();
        let result = storage.list_notes();
        self.finish_load(ticket, result);
    }

    /// Validates and inserts a note, then re-queries.
    ///
    /// Returns `true` on success so the caller can clear its form inputs; on
    /// failure the inputs are kept and the message is shown inline.
    pub fn add_note(&mut self, storage: &Storage, title: &str, body: &str) -> bool {
        let inserted = validate_title(title).and_then(|()| storage.insert_note(title, body));
        self.after_mutation(storage, inserted.map(|_| ()))
    }

    /// Deletes a note by id, then re-queries.
    pub fn delete_note(&mut self, storage: &Storage, id: i64) -> bool {
        let deleted = storage.delete_note(id);
        self.after_mutation(storage, deleted)
    }

    fn after_mutation(&mut self, storage: &Storage, result: Result<()>) -> bool {
        match result {
            Ok(()) => {
                self.error = None;
                if self.mounted {
                    self.refresh(storage);
                }
                true
            }
            Err(e) => {
                log::warn!("note change failed: {e}");
                self.error = Some(e.user_message());
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PopnotesError, StoreDescriptor};
    use tempfile::TempDir;

    fn store(temp: &TempDir) -> Storage {
        Storage::init(&StoreDescriptor::default(), temp.path()).unwrap()
    }

    fn titles(panel: &NotePanel) -> Vec<&str> {
        panel.notes().iter().map(|n| n.title.as_str()).collect()
    }

    #[test]
    fn test_mount_loads_existing_notes() {
        let temp = TempDir::new().unwrap();
        let main = store(&temp);
        main.insert_note("Note1", "").unwrap();

        let popup = Storage::open(&StoreDescriptor::default(), temp.path()).unwrap();
        let mut panel = NotePanel::new();
        panel.mount(&popup);

        assert!(!panel.is_loading());
        assert_eq!(titles(&panel), vec!["Note1"]);

        let json = serde_json::to_value(panel.view()).unwrap();
        assert_eq!(json["notes"][0]["title"], "Note1");
        assert_eq!(json["loading"], false);
        assert!(json["error"].is_null());
    }

    #[test]
    fn test_add_note_refreshes_own_view_only() {
        let temp = TempDir::new().unwrap();
        let main_store = store(&temp);
        let popup_store = Storage::open(&StoreDescriptor::default(), temp.path()).unwrap();

        let mut main = NotePanel::new();
        main.mount(&main_store);
        let mut popup = NotePanel::new();
        popup.mount(&popup_store);

        assert!(popup.add_note(&popup_store, "From popup", "body"));
        assert_eq!(titles(&popup), vec!["From popup"]);
        // No push: the main window still shows what it last queried.
        assert!(main.notes().is_empty());

        main.refresh(&main_store);
        assert_eq!(titles(&main), vec!["From popup"]);
    }

    #[test]
    fn test_empty_title_is_rejected_inline() {
        let temp = TempDir::new().unwrap();
        let storage = store(&temp);
        let mut panel = NotePanel::new();
        panel.mount(&storage);

        assert!(!panel.add_note(&storage, "   ", "body"));
        assert_eq!(panel.error(), Some("Title cannot be empty."));
        assert!(storage.list_notes().unwrap().is_empty());

        panel.dismiss_error();
        assert_eq!(panel.error(), None);
    }

    #[test]
    fn test_delete_refreshes_and_tolerates_missing_ids() {
        let temp = TempDir::new().unwrap();
        let storage = store(&temp);
        let a = storage.insert_note("A", "").unwrap();
        storage.insert_note("B", "").unwrap();

        let mut panel = NotePanel::new();
        panel.mount(&storage);
        assert!(panel.delete_note(&storage, a));
        assert_eq!(titles(&panel), vec!["B"]);

        // Already deleted from the other window.
        assert!(panel.delete_note(&storage, a));
        assert_eq!(panel.error(), None);
    }

    #[test]
    fn test_result_after_unmount_is_discarded() {
        let temp = TempDir::new().unwrap();
        let storage = store(&temp);
        storage.insert_note("A", "").unwrap();

        let mut panel = NotePanel::new();
        panel.mount(&storage);
        let ticket = panel.begin_load();
        panel.unmount();

        assert!(!panel.finish_load(ticket, storage.list_notes()));
        assert_eq!(titles(&panel), vec!["A"]);
        assert!(!panel.is_loading());
    }

    #[test]
    fn test_overtaken_load_is_discarded() {
        let mut panel = NotePanel::new();
        panel.mounted = true;
        let old = panel.begin_load();
        let new = panel.begin_load();

        assert!(panel.finish_load(new, Ok(Vec::new())));
        assert!(!panel.finish_load(
            old,
            Err(PopnotesError::QueryFailed(rusqlite::Error::InvalidQuery))
        ));
        assert_eq!(panel.error(), None);
    }

    #[test]
    fn test_query_failure_is_shown_inline() {
        let mut panel = NotePanel::new();
        panel.mounted = true;
        let ticket = panel.begin_load();
        assert!(panel.finish_load(
            ticket,
            Err(PopnotesError::QueryFailed(rusqlite::Error::InvalidQuery))
        ));
        assert_eq!(panel.error(), Some("Failed to fetch notes"));
        assert!(!panel.is_loading());
    }

    #[test]
    fn test_add_reports_success_when_only_the_requery_fails() {
        let temp = TempDir::new().unwrap();
        let storage = store(&temp);
        // Leaves each new row unreadable as a Note, so the re-query fails.
        storage
            .connection()
            .execute_batch(
                "CREATE TRIGGER spoil AFTER INSERT ON notes BEGIN
                     UPDATE notes SET created_at = 'never' WHERE id = NEW.id;
                 END;",
            )
            .unwrap();

        let mut panel = NotePanel::new();
        panel.mount(&storage);
        let added = panel.add_note(&storage, "Once", "");

        assert!(added, "the insert itself succeeded");
        assert_eq!(panel.error(), Some("Failed to fetch notes"));
        let count: i64 = storage
            .connection()
            .query_row("SELECT COUNT(*) FROM notes", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);

        let json = serde_json::to_value(AddNoteView {
            added,
            view: panel.view(),
        })
        .unwrap();
        assert_eq!(json["added"], true);
        assert_eq!(json["error"], "Failed to fetch notes");
        assert!(json["notes"].is_array());
    }
}
