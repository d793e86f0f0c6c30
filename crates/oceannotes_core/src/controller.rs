//! Client-side notes state manager.
//!
//! # Responsibility
//! - Own the in-memory collection, selection, search query and status flags.
//! - Call the gateway and patch local state from its return values.
//!
//! # Invariants
//! - `notes` is the single source of truth; filtered and selected views are
//!   derived on demand and never stored.
//! - A failed operation leaves `notes` exactly as it was and records one
//!   human-readable `error`, replacing any previous one.
//! - Mutations never re-fetch the full list.

use crate::editor::EditorSession;
use crate::gateway::{BackendKind, GatewayError, NoteGateway};
use crate::model::note::{NewNote, Note, NoteId, NoteUpdate};
use log::{debug, warn};
use std::sync::Arc;

/// Notes state driven by host events.
///
/// Every transition takes `&mut self`, so at most one gateway call per
/// controller is in flight.
pub struct NotesController {
    gateway: Arc<dyn NoteGateway>,
    notes: Vec<Note>,
    selected_id: Option<NoteId>,
    query: String,
    loading: bool,
    error: Option<String>,
}

impl NotesController {
    /// Creates a controller in the pre-load state (`loading = true`).
    pub fn new(gateway: Arc<dyn NoteGateway>) -> Self {
        Self {
            gateway,
            notes: Vec::new(),
            selected_id: None,
            query: String::new(),
            loading: true,
            error: None,
        }
    }

    /// Creates a controller and performs the initial load.
    pub async fn start(gateway: Arc<dyn NoteGateway>) -> Self {
        let mut controller = Self::new(gateway);
        controller.load().await;
        controller
    }

    /// Fetches the full list and selects the first note if nothing is selected.
    pub async fn load(&mut self) {
        self.loading = true;
        self.error = None;
        match self.gateway.list().await {
            Ok(notes) => {
                if self.selected_id.is_none() {
                    self.selected_id = notes.first().map(|note| note.id.clone());
                }
                self.notes = notes;
            }
            Err(err) => self.record_failure("load", &err, "Failed to load notes."),
        }
        self.loading = false;
    }

    /// Selects `id` without checking that it exists.
    pub fn select(&mut self, id: impl Into<NoteId>) {
        self.selected_id = Some(id.into());
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Creates a blank note, prepends it and selects it.
    pub async fn add_new(&mut self) {
        self.error = None;
        match self.gateway.create(NewNote::untitled()).await {
            Ok(created) => {
                self.selected_id = Some(created.id.clone());
                self.notes.insert(0, created);
            }
            Err(err) => self.record_failure("add_new", &err, "Failed to create note."),
        }
    }

    /// Updates one note and replaces it in place.
    pub async fn save(&mut self, id: &str, updates: NoteUpdate) {
        self.error = None;
        match self.gateway.update(id, updates).await {
            Ok(updated) => {
                if let Some(slot) = self.notes.iter_mut().find(|note| note.id == id) {
                    *slot = updated;
                } else {
                    debug!("event=controller_save module=controller status=skip reason=not_in_collection");
                }
            }
            Err(err) => self.record_failure("save", &err, "Failed to save note."),
        }
    }

    /// Saves an editor draft, ignoring the call while another save from the
    /// same session is in flight.
    ///
    /// Returns `false` when the save was skipped.
    pub async fn save_draft(&mut self, session: &mut EditorSession) -> bool {
        let Some((id, updates)) = session.begin_save() else {
            return false;
        };
        self.save(&id, updates).await;
        session.finish_save();
        true
    }

    /// Deletes one note and clears the selection if it pointed at it.
    pub async fn remove(&mut self, id: &str) {
        self.error = None;
        match self.gateway.delete(id).await {
            Ok(()) => {
                self.notes.retain(|note| note.id != id);
                if self.selected_id.as_deref() == Some(id) {
                    self.selected_id = None;
                }
            }
            Err(err) => self.record_failure("remove", &err, "Failed to delete note."),
        }
    }

    /// Notes whose title or content contains the query, ignoring case.
    ///
    /// An empty query returns every note in collection order.
    pub fn filtered_notes(&self) -> Vec<&Note> {
        if self.query.is_empty() {
            return self.notes.iter().collect();
        }
        let needle = self.query.to_lowercase();
        self.notes
            .iter()
            .filter(|note| note.matches_lowercase(&needle))
            .collect()
    }

    /// The note matching `selected_id`, if it is still in the collection.
    pub fn selected_note(&self) -> Option<&Note> {
        let selected_id = self.selected_id.as_deref()?;
        self.notes.iter().find(|note| note.id == selected_id)
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.gateway.backend_kind()
    }

    fn record_failure(&mut self, op: &'static str, err: &GatewayError, fallback: &str) {
        warn!("event=controller_{op} module=controller status=error");
        let message = err.to_string();
        self.error = Some(if message.trim().is_empty() {
            fallback.to_string()
        } else {
            message
        });
    }
}

#[cfg(test)]
mod tests {
    use super::NotesController;
    use crate::gateway::{BackendKind, GatewayResult, NoteGateway};
    use crate::model::note::{NewNote, Note, NoteUpdate};
    use async_trait::async_trait;
    use std::sync::Arc;

    struct FixedGateway(Vec<Note>);

    #[async_trait]
    impl NoteGateway for FixedGateway {
        fn backend_kind(&self) -> BackendKind {
            BackendKind::Local
        }
        async fn list(&self) -> GatewayResult<Vec<Note>> {
            Ok(self.0.clone())
        }
        async fn get(&self, id: &str) -> GatewayResult<Option<Note>> {
            Ok(self.0.iter().find(|note| note.id == id).cloned())
        }
        async fn create(&self, _input: NewNote) -> GatewayResult<Note> {
            unimplemented!("not used by derived-view tests")
        }
        async fn update(&self, _id: &str, _updates: NoteUpdate) -> GatewayResult<Note> {
            unimplemented!("not used by derived-view tests")
        }
        async fn delete(&self, _id: &str) -> GatewayResult<()> {
            Ok(())
        }
    }

    fn note(id: &str, title: &str, content: &str) -> Note {
        Note {
            id: id.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            created_at: 1,
            updated_at: 1,
        }
    }

    async fn loaded() -> NotesController {
        let gateway = FixedGateway(vec![
            note("a", "Groceries", "Milk, eggs"),
            note("b", "Todo", "finish report"),
            note("c", "MILKSHAKE recipe", "blend"),
        ]);
        NotesController::start(Arc::new(gateway)).await
    }

    #[tokio::test]
    async fn empty_query_is_identity_filter() {
        let controller = loaded().await;
        let ids: Vec<&str> = controller
            .filtered_notes()
            .iter()
            .map(|note| note.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn query_matches_title_or_content_ignoring_case() {
        let mut controller = loaded().await;
        controller.set_query("mIlK");
        let ids: Vec<&str> = controller
            .filtered_notes()
            .iter()
            .map(|note| note.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn selected_note_resolves_against_collection() {
        let mut controller = loaded().await;
        assert_eq!(controller.selected_id(), Some("a"));

        controller.select("missing");
        assert_eq!(controller.selected_id(), Some("missing"));
        assert!(controller.selected_note().is_none());

        controller.select("b");
        assert_eq!(controller.selected_note().map(|n| n.title.as_str()), Some("Todo"));
    }

    #[tokio::test]
    async fn fresh_controller_is_loading_until_first_load() {
        let controller = NotesController::new(Arc::new(FixedGateway(Vec::new())));
        assert!(controller.is_loading());

        let controller = NotesController::start(Arc::new(FixedGateway(Vec::new()))).await;
        assert!(!controller.is_loading());
        assert_eq!(controller.selected_id(), None);
    }
}
