//! Domain model for the comic catalog.
//!
//! # Responsibility
//! - Define the canonical data structures used by catalog business logic.
//! - Keep the ordinal-addressing contract visible in the types themselves.
//!
//! # Invariants
//! - Every comic is identified internally by a stable `ComicKey`.
//! - Public addressing uses the 1-based ordinal sequence, never the key.

pub mod comic;
