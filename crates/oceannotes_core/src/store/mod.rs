//! Named-blob persistence for the local backend.
//!
//! # Responsibility
//! - Provide synchronous whole-value reads/writes keyed by name.
//! - Keep SQL details out of the gateway.
//!
//! # Invariants
//! - A missing key reads as `None`, never as an error.
//! - Writes replace the full value; there are no partial updates.

pub mod blob_store;

pub use blob_store::{BlobStore, SqliteBlobStore};
