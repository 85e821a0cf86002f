//! Comic catalog use-case service.
//!
//! # Responsibility
//! - Provide the public read/write API for browsing and publishing comics.
//! - Enforce ordinal-only addressing and the absence-to-NotFound translation.
//! - Orchestrate the create/edit workflow, including optional image
//!   attachment.
//!
//! # Invariants
//! - Every lookup goes through the store's ordinal or latest query; there is
//!   no key-based path.
//! - Absence is always a `CatalogError` variant, never a default comic.
//! - `edit` resolves the target by ordinal before applying any mutation.

use crate::model::comic::{Comic, ComicDraft, ComicImage};
use crate::store::comic_store::{ComicStore, StoreError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Service error for catalog use-cases.
#[derive(Debug)]
pub enum CatalogError {
    /// No comic exists at the requested ordinal, or it has no image when an
    /// image was requested.
    ComicNotFound(u32),
    /// The latest-comic query found an empty catalog.
    NoComicsPublished,
    /// Persistence-layer failure. Propagated unretried.
    Store(StoreError),
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ComicNotFound(ordinal) => write!(f, "comic not found: ordinal {ordinal}"),
            Self::NoComicsPublished => write!(f, "no comics have been published yet"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for CatalogError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(ordinal) => Self::ComicNotFound(ordinal),
            other => Self::Store(other),
        }
    }
}

/// Ordinal-addressed catalog service over a comic store.
///
/// Generic over the store so transports bind the SQLite implementation and
/// tests substitute an in-memory one.
pub struct ComicCatalogService<S: ComicStore> {
    store: S,
}

impl<S: ComicStore> ComicCatalogService<S> {
    /// Creates a service using the provided store implementation.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Gets one comic by its public ordinal.
    ///
    /// # Contract
    /// - Performs exactly one ordinal lookup on the store.
    /// - Fails with `ComicNotFound` when no record exists; no other
    ///   validation.
    pub fn view_by_ordinal(&self, ordinal: u32) -> CatalogResult<Comic> {
        self.store
            .get_by_ordinal(ordinal)?
            .ok_or(CatalogError::ComicNotFound(ordinal))
    }

    /// Gets the attached image of one comic by its public ordinal.
    ///
    /// Fails with `ComicNotFound` when the comic or its image is absent.
    pub fn image_by_ordinal(&self, ordinal: u32) -> CatalogResult<ComicImage> {
        let comic = self.view_by_ordinal(ordinal)?;
        comic.image.ok_or(CatalogError::ComicNotFound(ordinal))
    }

    /// Gets the most recently published comic.
    ///
    /// # Contract
    /// - Performs exactly one latest-comic query on the store and returns
    ///   its result unmodified.
    /// - Fails with `NoComicsPublished` when the catalog is empty.
    pub fn latest(&self) -> CatalogResult<Comic> {
        self.store
            .get_latest()?
            .ok_or(CatalogError::NoComicsPublished)
    }

    /// Gets one comic by ordinal to populate an edit form.
    ///
    /// Same lookup contract as [`Self::view_by_ordinal`].
    pub fn prepare_edit(&self, ordinal: u32) -> CatalogResult<Comic> {
        self.view_by_ordinal(ordinal)
    }

    /// Publishes a new comic at the next free ordinal.
    ///
    /// # Contract
    /// - The store assigns the key and the ordinal (prior maximum + 1, or 1
    ///   on an empty catalog).
    /// - The returned comic carries the assigned ordinal; callers redirect
    ///   to its ordinal-addressed view on success.
    pub fn create(
        &mut self,
        draft: &ComicDraft,
        image: Option<ComicImage>,
    ) -> CatalogResult<Comic> {
        let started_at = Instant::now();
        let comic = self.store.create(draft, image.as_ref())?;
        info!(
            "event=comic_create module=catalog status=ok ordinal={} has_image={} duration_ms={}",
            comic.ordinal,
            comic.image.is_some(),
            started_at.elapsed().as_millis()
        );
        Ok(comic)
    }

    /// Applies edits to the comic at the given ordinal.
    ///
    /// # Contract
    /// - Resolves the existing record by ordinal first and fails with
    ///   `ComicNotFound` when absent, before any mutation is applied.
    /// - Replaces the title from the draft; replaces the image only when a
    ///   new one is supplied.
    /// - The ordinal is preserved; the returned comic carries it for the
    ///   caller's redirect.
    pub fn edit(
        &mut self,
        ordinal: u32,
        draft: &ComicDraft,
        image: Option<ComicImage>,
    ) -> CatalogResult<Comic> {
        let started_at = Instant::now();
        let mut comic = self
            .store
            .get_by_ordinal(ordinal)?
            .ok_or(CatalogError::ComicNotFound(ordinal))?;

        comic.apply_draft(draft, image);
        let updated = self.store.update(&comic)?;
        info!(
            "event=comic_edit module=catalog status=ok ordinal={} has_image={} duration_ms={}",
            updated.ordinal,
            updated.image.is_some(),
            started_at.elapsed().as_millis()
        );
        Ok(updated)
    }
}
