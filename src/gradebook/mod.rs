#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Persisted per-cell grades and comments.

/// Gradebook entities and the aggregate notebook model.
pub mod models;
/// The file-backed store.
pub mod store;

use std::path::PathBuf;

use thiserror::Error;

pub use models::{Comment, Grade, GradeBookModel, GradeCell, NotebookModel, SolutionCell, TaskCell};
pub use store::Gradebook;

/// Errors raised while reading or writing a gradebook file.
#[derive(Error, Debug)]
pub enum GradebookError {
    /// The file exists but could not be read or written.
    #[error("Could not access gradebook {}: {source}", .path.display())]
    Io {
        /// Path of the gradebook file.
        path:   PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file does not hold a valid gradebook document.
    #[error("Gradebook {} is corrupt: {source}", .path.display())]
    Corrupt {
        /// Path of the gradebook file.
        path:   PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// The in-memory document could not be serialized.
    #[error("Could not serialize gradebook: {0}")]
    Serialize(#[source] serde_json::Error),
}
