//! SQLite bootstrap for the local note store.
//!
//! The local backend keeps its whole note collection as one JSON value in the
//! `kv_store` table (`key TEXT PRIMARY KEY, value TEXT, updated_at INTEGER`).
//! This module only prepares that table; reading and writing blobs belongs to
//! `store::SqliteBlobStore`.
//!
//! # Responsibility
//! - Open file or in-memory connections for `SqliteBlobStore`.
//! - Apply schema migrations in deterministic order.
//! - Classify storage failures with stable codes for gateway log events.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - The blob store must not read or write before migrations succeed.
//! - A file written by a newer build is refused rather than downgraded.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// A previous holder of the connection lock panicked.
    ConnectionPoisoned,
}

impl DbError {
    /// Stable, metadata-only code used in `error_code=` log fields.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Sqlite(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::DatabaseBusy =>
            {
                "storage_busy"
            }
            Self::Sqlite(_) => "storage_failed",
            Self::UnsupportedSchemaVersion { .. } => "storage_schema_newer",
            Self::ConnectionPoisoned => "storage_poisoned",
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::ConnectionPoisoned => write!(f, "local store connection is poisoned"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } | Self::ConnectionPoisoned => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

#[cfg(test)]
mod tests {
    use super::DbError;

    #[test]
    fn codes_distinguish_storage_failures() {
        let newer = DbError::UnsupportedSchemaVersion {
            db_version: 9,
            latest_supported: 1,
        };
        assert_eq!(newer.code(), "storage_schema_newer");
        assert_eq!(DbError::ConnectionPoisoned.code(), "storage_poisoned");
        assert_eq!(
            DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows).code(),
            "storage_failed"
        );
    }

    #[test]
    fn newer_schema_message_names_both_versions() {
        let err = DbError::UnsupportedSchemaVersion {
            db_version: 9,
            latest_supported: 1,
        };
        assert_eq!(
            err.to_string(),
            "database schema version 9 is newer than supported 1"
        );
    }
}
