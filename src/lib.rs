//! Catalog core for a serialized comic.
//!
//! Comics are addressed publicly by a dense, 1-based ordinal sequence; the
//! store-assigned key never crosses this crate's public operations. This
//! crate is the single source of truth for that contract.

pub mod db;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::comic::{Comic, ComicDraft, ComicImage, ComicKey, ComicValidationError};
pub use service::catalog_service::{CatalogError, CatalogResult, ComicCatalogService};
pub use store::comic_store::{ComicStore, SqliteComicStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
