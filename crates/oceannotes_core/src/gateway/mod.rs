//! Persistence gateway over notes.
//!
//! # Responsibility
//! - Define the `list/get/create/update/delete` contract shared by backends.
//! - Select the remote or local backend once, from explicit configuration.
//!
//! # Invariants
//! - Backend selection never changes for the lifetime of a gateway.
//! - No call falls back to, or retries against, the other backend.
//! - `updated_at` is always stamped by the backend, never by callers.

use crate::config::{GatewayConfig, LocalStore};
use crate::db::DbError;
use crate::model::note::{NewNote, Note, NoteId, NoteUpdate};
use crate::store::SqliteBlobStore;
use async_trait::async_trait;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Instant;

pub mod local;
pub mod remote;

pub use local::{Clock, LocalGateway, SystemClock, NOTES_BLOB_KEY};
pub use remote::RemoteGateway;

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Which persistence backend a gateway talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// HTTP/JSON API under a configured base URL.
    Remote,
    /// Named blob in the local SQLite store.
    Local,
}

impl BackendKind {
    /// Short badge text for host status displays.
    pub fn label(self) -> &'static str {
        match self {
            Self::Remote => "API",
            Self::Local => "Local",
        }
    }

    fn as_log_value(self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Local => "local",
        }
    }
}

impl Display for BackendKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_log_value())
    }
}

/// Failure surfaced by a gateway call.
#[derive(Debug)]
pub enum GatewayError {
    /// Remote call returned a non-success HTTP status.
    Request { status: u16, body: String },
    /// Local update target does not exist.
    NotFound(NoteId),
    /// Stored blob or response body is not valid note JSON.
    Parse(serde_json::Error),
    /// Connection, timeout or body-read failure.
    Transport(reqwest::Error),
    /// Local store failure.
    Storage(DbError),
    /// Gateway could not be constructed from configuration.
    Config(String),
}

impl Display for GatewayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Request { status, body } => {
                let detail = if body.trim().is_empty() {
                    reqwest::StatusCode::from_u16(*status)
                        .ok()
                        .and_then(|code| code.canonical_reason())
                        .unwrap_or("")
                } else {
                    body.as_str()
                };
                write!(f, "request failed ({status}): {detail}")
            }
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::Parse(err) => write!(f, "invalid note data: {err}"),
            Self::Transport(err) => write!(f, "request could not be completed: {err}"),
            Self::Storage(err) => write!(f, "local store error: {err}"),
            Self::Config(message) => write!(f, "invalid gateway configuration: {message}"),
        }
    }
}

impl Error for GatewayError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Transport(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::Request { .. } | Self::NotFound(_) | Self::Config(_) => None,
        }
    }
}

impl From<DbError> for GatewayError {
    fn from(value: DbError) -> Self {
        Self::Storage(value)
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value)
    }
}

/// Note persistence contract implemented by every backend.
///
/// Local implementations complete without suspending but stay `async` so
/// callers see one interface.
#[async_trait]
pub trait NoteGateway: Send + Sync {
    /// Which backend this gateway talks to.
    fn backend_kind(&self) -> BackendKind;
    /// Returns every note. Local results are sorted by `updated_at DESC`.
    async fn list(&self) -> GatewayResult<Vec<Note>>;
    /// Returns one note, or `None` when the local store has no such id.
    async fn get(&self, id: &str) -> GatewayResult<Option<Note>>;
    /// Creates a note and returns it with id and timestamps assigned.
    async fn create(&self, input: NewNote) -> GatewayResult<Note>;
    /// Merges `updates` onto an existing note and returns the result.
    async fn update(&self, id: &str, updates: NoteUpdate) -> GatewayResult<Note>;
    /// Removes a note. Missing ids are not an error.
    async fn delete(&self, id: &str) -> GatewayResult<()>;
}

/// Builds the gateway selected by `config`.
///
/// A non-empty API base URL selects the remote backend; otherwise the local
/// store described by `config.local_store` is opened.
pub fn open_gateway(config: &GatewayConfig) -> GatewayResult<Arc<dyn NoteGateway>> {
    let gateway: Arc<dyn NoteGateway> = match config.api_base_url.as_deref() {
        Some(base_url) => Arc::new(RemoteGateway::new(base_url, config.request_timeout)?),
        None => {
            let store = match &config.local_store {
                LocalStore::File(path) => SqliteBlobStore::open(path)?,
                LocalStore::InMemory => SqliteBlobStore::open_in_memory()?,
            };
            Arc::new(LocalGateway::new(store))
        }
    };

    info!(
        "event=gateway_open module=gateway status=ok backend={}",
        gateway.backend_kind()
    );
    Ok(gateway)
}

/// Emits one metadata-only completion event for a gateway call.
pub(crate) fn log_call<T>(
    op: &'static str,
    backend: BackendKind,
    started_at: Instant,
    result: &GatewayResult<T>,
) {
    let duration_ms = started_at.elapsed().as_millis();
    match result {
        Ok(_) => info!(
            "event={op} module=gateway backend={backend} status=ok duration_ms={duration_ms}"
        ),
        Err(err) => warn!(
            "event={op} module=gateway backend={backend} status=error duration_ms={duration_ms} error_code={}",
            error_code(err)
        ),
    }
}

fn error_code(err: &GatewayError) -> &'static str {
    match err {
        GatewayError::Request { .. } => "request_failed",
        GatewayError::NotFound(_) => "not_found",
        GatewayError::Parse(_) => "parse_failed",
        GatewayError::Transport(_) => "transport_failed",
        GatewayError::Storage(err) => err.code(),
        GatewayError::Config(_) => "config_invalid",
    }
}
