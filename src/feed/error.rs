use thiserror::Error;

use crate::catalog::CatalogError;

/// Errors that can occur while building a feed.
///
/// Generation is all-or-nothing: any error aborts the whole document.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The catalog collaborator failed. Passed through untouched.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// A variant without images reached item rendering.
    #[error("Variant {variant_id} has no images and cannot be listed")]
    MissingImage { variant_id: i64 },

    /// The XML writer rejected an event.
    #[error("Failed to write feed XML: {0}")]
    Write(String),

    #[error("Generated feed contains invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl FeedError {
    pub(crate) fn write(err: impl std::fmt::Display) -> Self {
        FeedError::Write(err.to_string())
    }
}
