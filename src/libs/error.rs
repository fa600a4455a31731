//! Error taxonomy for the catalog data layer and backup pipeline.
//!
//! Data-access and backup functions return [`CatalogResult`]. The command
//! layer converts these into `anyhow::Error` through `?`, while the reactive
//! stores keep the `Display` text as their user-facing error message.

use thiserror::Error;

/// Failures surfaced by the catalog library.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// An exercise mutator targeted an id that does not exist.
    #[error("Exercise not found: {0}")]
    ExerciseNotFound(String),

    /// A course mutator targeted an id that does not exist.
    #[error("Course not found: {0}")]
    CourseNotFound(String),

    /// The backup document is malformed or has an unsupported version.
    #[error("Invalid backup format: {0}")]
    InvalidFormat(String),

    /// The user declined the destructive restore.
    #[error("Import cancelled by the user")]
    UserCancelled,

    /// The validate-only check rejected the backup document.
    #[error("Backup validation failed: {0}")]
    ValidationFailure(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CatalogError {
    /// True for the two "not found" variants.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::ExerciseNotFound(_) | CatalogError::CourseNotFound(_))
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;
