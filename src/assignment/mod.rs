#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Assignment-level rules: settings validation, late-submission scaling and
//! the full-auto grading check.

/// ISO-8601 duration parsing.
pub mod duration;
/// Conflicts between fully automatic grading and manual cells.
pub mod full_auto;
/// Late-submission step function and score recalculation.
pub mod late;
/// Assignment settings and their validation.
pub mod settings;

pub use duration::{DurationError, parse_iso8601_duration};
pub use full_auto::{AutogradeConflict, check_full_auto_grading, check_notebook};
pub use late::{Submission, compute_scaling, recalculate_scores, validate_late_submission};
pub use settings::{
    AssignmentSettings, AutogradeType, LateSubmissionPeriod, Scope, SettingsError,
    require_settings, validate_assignment_settings,
};
