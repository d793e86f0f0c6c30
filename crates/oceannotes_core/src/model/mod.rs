//! Note domain model shared by both persistence backends.
//!
//! # Invariants
//! - Every note is identified by an opaque, immutable `NoteId`.
//! - Deletion is a hard removal; there are no tombstones.

pub mod note;
