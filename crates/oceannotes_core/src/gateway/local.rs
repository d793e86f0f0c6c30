//! Local note backend over a single named blob.
//!
//! # Responsibility
//! - Keep the full note collection as one JSON array under `NOTES_BLOB_KEY`.
//! - Assign ids and timestamps for locally created notes.
//!
//! # Invariants
//! - Every write rewrites the whole blob (read-modify-write, last writer wins).
//! - A missing or empty blob is an empty collection.
//! - `update` on a missing id fails with `NotFound`; `delete` on a missing id
//!   succeeds.

use super::{log_call, BackendKind, GatewayError, GatewayResult, NoteGateway};
use crate::model::note::{NewNote, Note, NoteUpdate};
use crate::store::BlobStore;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Blob key holding the serialized note array.
pub const NOTES_BLOB_KEY: &str = "notes-app-items-v1";

/// Source of "now" for note timestamps, in Unix epoch milliseconds.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| {
                i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
            })
    }
}

/// Gateway persisting notes in a local blob store.
pub struct LocalGateway<S: BlobStore> {
    store: S,
    clock: Arc<dyn Clock>,
}

impl<S: BlobStore> LocalGateway<S> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: S, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Borrows the underlying store, mainly for inspecting persisted state.
    pub fn store(&self) -> &S {
        &self.store
    }

    fn load_notes(&self) -> GatewayResult<Vec<Note>> {
        match self.store.read_blob(NOTES_BLOB_KEY)? {
            Some(raw) if !raw.trim().is_empty() => Ok(serde_json::from_str(&raw)?),
            _ => Ok(Vec::new()),
        }
    }

    fn persist_notes(&self, notes: &[Note]) -> GatewayResult<()> {
        let raw = serde_json::to_string(notes)?;
        self.store.write_blob(NOTES_BLOB_KEY, &raw)?;
        Ok(())
    }

    fn list_sync(&self) -> GatewayResult<Vec<Note>> {
        let mut notes = self.load_notes()?;
        // Stable: notes with equal timestamps keep their stored order.
        notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(notes)
    }

    fn get_sync(&self, id: &str) -> GatewayResult<Option<Note>> {
        Ok(self.load_notes()?.into_iter().find(|note| note.id == id))
    }

    fn create_sync(&self, input: &NewNote) -> GatewayResult<Note> {
        let now = self.clock.now_ms();
        let note = Note {
            id: Uuid::new_v4().to_string(),
            title: input.resolved_title(),
            content: input.resolved_content(),
            created_at: now,
            updated_at: now,
        };

        let mut notes = self.load_notes()?;
        notes.push(note.clone());
        self.persist_notes(&notes)?;
        Ok(note)
    }

    fn update_sync(&self, id: &str, updates: &NoteUpdate) -> GatewayResult<Note> {
        let mut notes = self.load_notes()?;
        let note = notes
            .iter_mut()
            .find(|note| note.id == id)
            .ok_or_else(|| GatewayError::NotFound(id.to_string()))?;
        updates.apply_to(note, self.clock.now_ms());
        let updated = note.clone();

        self.persist_notes(&notes)?;
        Ok(updated)
    }

    fn delete_sync(&self, id: &str) -> GatewayResult<()> {
        let mut notes = self.load_notes()?;
        notes.retain(|note| note.id != id);
        self.persist_notes(&notes)
    }
}

#[async_trait]
impl<S: BlobStore> NoteGateway for LocalGateway<S> {
    fn backend_kind(&self) -> BackendKind {
        BackendKind::Local
    }

    async fn list(&self) -> GatewayResult<Vec<Note>> {
        let started_at = Instant::now();
        let result = self.list_sync();
        log_call("notes_list", BackendKind::Local, started_at, &result);
        result
    }

    async fn get(&self, id: &str) -> GatewayResult<Option<Note>> {
        let started_at = Instant::now();
        let result = self.get_sync(id);
        log_call("note_get", BackendKind::Local, started_at, &result);
        result
    }

    async fn create(&self, input: NewNote) -> GatewayResult<Note> {
        let started_at = Instant::now();
        let result = self.create_sync(&input);
        log_call("note_create", BackendKind::Local, started_at, &result);
        result
    }

    async fn update(&self, id: &str, updates: NoteUpdate) -> GatewayResult<Note> {
        let started_at = Instant::now();
        let result = self.update_sync(id, &updates);
        log_call("note_update", BackendKind::Local, started_at, &result);
        result
    }

    async fn delete(&self, id: &str) -> GatewayResult<()> {
        let started_at = Instant::now();
        let result = self.delete_sync(id);
        log_call("note_delete", BackendKind::Local, started_at, &result);
        result
    }
}
