//! Draft state for editing one note.
//!
//! # Responsibility
//! - Hold unsaved title/content drafts for the selected note.
//! - Guard against re-entrant saves from the same session.
//!
//! # Invariants
//! - Drafts are reset only when the edited note id changes, not when the
//!   same note is refreshed.
//! - A saved title is never blank; it falls back to `Untitled`.

use crate::model::note::{Note, NoteId, NoteUpdate, DEFAULT_NOTE_TITLE};

/// Editor drafts bound to a single note.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorSession {
    note_id: Option<NoteId>,
    title: String,
    content: String,
    saving: bool,
}

impl EditorSession {
    /// Starts a session on `note`.
    pub fn open(note: &Note) -> Self {
        let mut session = Self::default();
        session.load_from(note);
        session
    }

    /// Follows the host's current selection.
    ///
    /// Drafts are replaced when the selected id differs from the edited one
    /// and cleared when nothing is selected.
    pub fn sync(&mut self, note: Option<&Note>) {
        match note {
            Some(note) if self.note_id.as_deref() == Some(note.id.as_str()) => {}
            Some(note) => self.load_from(note),
            None => {
                self.note_id = None;
                self.title.clear();
                self.content.clear();
            }
        }
    }

    /// Discards drafts and reloads them from `note`.
    pub fn reset(&mut self, note: &Note) {
        self.load_from(note);
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    pub fn note_id(&self) -> Option<&str> {
        self.note_id.as_deref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Whether drafts differ from `note`'s stored title or content.
    pub fn is_dirty(&self, note: &Note) -> bool {
        self.title != note.title || self.content != note.content
    }

    /// Marks a save as in flight and returns the update to send.
    ///
    /// Returns `None` when no note is open or a save is already running.
    pub fn begin_save(&mut self) -> Option<(NoteId, NoteUpdate)> {
        if self.saving {
            return None;
        }
        let id = self.note_id.clone()?;

        let trimmed = self.title.trim();
        let title = if trimmed.is_empty() {
            DEFAULT_NOTE_TITLE.to_string()
        } else {
            trimmed.to_string()
        };
        self.saving = true;
        Some((
            id,
            NoteUpdate {
                title: Some(title),
                content: Some(self.content.clone()),
            },
        ))
    }

    /// Clears the in-flight save guard, whatever the outcome.
    pub fn finish_save(&mut self) {
        self.saving = false;
    }

    fn load_from(&mut self, note: &Note) {
        self.note_id = Some(note.id.clone());
        self.title = note.title.clone();
        self.content = note.content.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::EditorSession;
    use crate::model::note::Note;

    fn note(id: &str, title: &str) -> Note {
        Note {
            id: id.to_string(),
            title: title.to_string(),
            content: "body".to_string(),
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn sync_keeps_drafts_for_same_note() {
        let first = note("a", "First");
        let mut session = EditorSession::open(&first);
        session.set_title("Edited");

        session.sync(Some(&first));
        assert_eq!(session.title(), "Edited");

        session.sync(Some(&note("b", "Second")));
        assert_eq!(session.title(), "Second");
        assert_eq!(session.note_id(), Some("b"));

        session.sync(None);
        assert_eq!(session.note_id(), None);
        assert_eq!(session.title(), "");
    }

    #[test]
    fn begin_save_trims_title_and_blocks_reentry() {
        let mut session = EditorSession::open(&note("a", "First"));
        session.set_title("   ");

        let (id, update) = session.begin_save().expect("first save should start");
        assert_eq!(id, "a");
        assert_eq!(update.title.as_deref(), Some("Untitled"));
        assert_eq!(update.content.as_deref(), Some("body"));
        assert!(session.begin_save().is_none());

        session.finish_save();
        assert!(!session.is_saving());
        assert!(session.begin_save().is_some());
    }

    #[test]
    fn begin_save_without_note_is_skipped() {
        let mut session = EditorSession::default();
        assert!(session.begin_save().is_none());
        assert!(!session.is_saving());
    }

    #[test]
    fn reset_discards_drafts() {
        let stored = note("a", "First");
        let mut session = EditorSession::open(&stored);
        session.set_content("changed");
        assert!(session.is_dirty(&stored));

        session.reset(&stored);
        assert!(!session.is_dirty(&stored));
    }
}
