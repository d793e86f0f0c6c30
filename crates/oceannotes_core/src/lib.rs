//! Core of the Ocean Notes client.
//!
//! Holds the note model, the persistence gateway (remote HTTP API or local
//! SQLite blob, chosen once from configuration) and the controller that keeps
//! host-facing note state in sync with it.

pub mod config;
pub mod controller;
pub mod db;
pub mod editor;
pub mod gateway;
pub mod logging;
pub mod model;
pub mod store;

pub use config::{GatewayConfig, LocalStore};
pub use controller::NotesController;
pub use editor::EditorSession;
pub use gateway::{
    open_gateway, BackendKind, Clock, GatewayError, GatewayResult, LocalGateway, NoteGateway,
    RemoteGateway, SystemClock,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::note::{NewNote, Note, NoteId, NoteUpdate};
pub use store::{BlobStore, SqliteBlobStore};

/// Minimal health-check API for linkage probes.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
