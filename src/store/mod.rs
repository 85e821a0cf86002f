//! Store layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the ordinal-addressed data access contract for comics.
//! - Isolate SQLite query details from catalog orchestration.
//!
//! # Invariants
//! - Store writes must enforce `Comic::validate()` before persistence.
//! - Ordinal assignment on create is atomic with respect to concurrent
//!   creates.

pub mod comic_store;
