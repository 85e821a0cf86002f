//! Comic domain model.
//!
//! # Responsibility
//! - Define the canonical record for one published comic installment.
//! - Keep the public-addressing rule visible in the type shape: callers hold
//!   ordinals, never store keys.
//!
//! # Invariants
//! - `key` is stable, store-assigned, and never serialized outward.
//! - `ordinal` is positive, unique, and dense across all stored comics.
//! - An attached image always carries a non-empty content type.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Store-assigned internal identifier.
///
/// Kept as a type alias to make semantic intent explicit in signatures. The
/// key never appears in public lookup operations and is skipped on serialize.
pub type ComicKey = Uuid;

/// Image payload attached to a comic.
///
/// Modeled as an explicit optional payload on [`Comic`] so "no image
/// supplied" and "image present but empty" stay distinct at the type level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComicImage {
    /// Opaque image bytes. May be empty; transcoding is out of scope.
    pub bytes: Vec<u8>,
    /// MIME content type tag, e.g. `image/png`. Must be non-empty.
    pub content_type: String,
}

/// Caller-supplied fields for the create/edit workflow.
///
/// The draft intentionally excludes `key`, `ordinal`, and `published_at`;
/// those are owned by the store and never accepted from callers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComicDraft {
    /// Display title for the installment.
    pub title: Option<String>,
}

/// Canonical record for one published comic installment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comic {
    /// Internal store identity. Never used for public lookups, never
    /// serialized outward.
    #[serde(skip_serializing, default = "Uuid::new_v4")]
    pub key: ComicKey,
    /// 1-based, gap-free publication position; the only public address.
    pub ordinal: u32,
    /// Display title for the installment.
    pub title: Option<String>,
    /// Attached image, if one has been uploaded.
    pub image: Option<ComicImage>,
    /// Publication timestamp in epoch milliseconds, set at create time.
    pub published_at: i64,
}

/// Validation error for comic records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComicValidationError {
    /// Ordinals start at 1; zero is never a valid position.
    OrdinalOutOfRange,
    /// An attached image must carry a content type tag.
    EmptyImageContentType,
}

impl Display for ComicValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OrdinalOutOfRange => write!(f, "comic ordinal must be >= 1"),
            Self::EmptyImageContentType => {
                write!(f, "attached image must have a non-empty content type")
            }
        }
    }
}

impl Error for ComicValidationError {}

impl Comic {
    /// Checks record invariants before persistence or after read-back.
    pub fn validate(&self) -> Result<(), ComicValidationError> {
        if self.ordinal == 0 {
            return Err(ComicValidationError::OrdinalOutOfRange);
        }
        if let Some(image) = &self.image {
            if image.content_type.is_empty() {
                return Err(ComicValidationError::EmptyImageContentType);
            }
        }
        Ok(())
    }

    /// Applies the editable fields from a draft, leaving identity untouched.
    ///
    /// The title is replaced verbatim (clearing it is a valid edit). The
    /// image is replaced only when a new one is supplied.
    pub fn apply_draft(&mut self, draft: &ComicDraft, image: Option<ComicImage>) {
        self.title = draft.title.clone();
        if let Some(image) = image {
            self.image = Some(image);
        }
    }
}
