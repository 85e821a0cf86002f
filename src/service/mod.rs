//! Catalog use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into the ordinal-addressed catalog API.
//! - Keep transport layers decoupled from storage details.

pub mod catalog_service;
