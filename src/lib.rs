//! # nbgrade
//!
//! Autograding core for Jupyter notebook assignments: classifies cells by
//! their grading metadata, runs submissions through an ordered pipeline of
//! preprocessing stages, records scores and comments in a file-backed
//! gradebook, and applies late-submission policies to stored scores.
//!
//! ```no_run
//! use nbgrade::{Notebook, Pipeline, PipelineConfig, Resources};
//!
//! # fn main() -> anyhow::Result<()> {
//! nbgrade::logging::init();
//! let config = PipelineConfig::from_env();
//! let resources = Resources::builder()
//!     .unique_key("ps1")
//!     .output_json_path("gradebook.json")
//!     .build();
//! let nb = Notebook::read("ps1.ipynb")?;
//! let (graded, _) = Pipeline::autograde(&config).run(nb, resources)?;
//! graded.write("ps1.graded.ipynb")?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Assignment settings, late-submission scaling and full-auto checks.
pub mod assignment;
/// Pipeline configuration read from the environment.
pub mod config;
/// A module defining a bunch of constant values to be used throughout
pub mod constants;
/// Persisted grades and comments.
pub mod gradebook;
/// Subscriber setup for `tracing`.
pub mod logging;
/// Notebook documents and cell classification.
pub mod notebook;
/// The grading pipeline and its stages.
pub mod preprocessors;

pub use assignment::{AssignmentSettings, LateSubmissionPeriod, Scope, SettingsError};
pub use config::PipelineConfig;
pub use gradebook::{GradeBookModel, Gradebook, GradebookError};
pub use notebook::{Cell, CellType, GradingMetadata, Notebook, Output};
pub use preprocessors::{Pipeline, Preprocessor, PreprocessorError, Resources};
