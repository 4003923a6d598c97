#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{duration::DurationError, late};

/// Role of the person acting on an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Submits work; subject to late penalties.
    Student,
    /// Grades work.
    Tutor,
    /// Owns the course.
    Instructor,
}

impl Scope {
    /// Staff submissions are never penalised.
    pub fn is_staff(self) -> bool {
        matches!(self, Scope::Tutor | Scope::Instructor)
    }
}

/// How much of the grading happens without a human.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutogradeType {
    /// Instructors start every grading run by hand.
    Unassisted,
    /// Submissions are autograded; manual grading follows where needed.
    #[default]
    Auto,
    /// Submissions are autograded and released without human review.
    FullAuto,
}

/// One step of a late-submission policy: submissions later than `period`
/// past the deadline keep `scaling` of their score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LateSubmissionPeriod {
    /// ISO-8601 duration past the deadline.
    pub period:  String,
    /// Fraction of the score kept, in `(0, 1)`.
    pub scaling: f64,
}

impl LateSubmissionPeriod {
    /// A policy step.
    pub fn new(period: impl Into<String>, scaling: f64) -> Self {
        Self {
            period: period.into(),
            scaling,
        }
    }
}

/// Settings of an assignment relevant to grading.
#[derive(Debug, Clone, Default, PartialEq, Builder, Serialize, Deserialize)]
pub struct AssignmentSettings {
    /// Submission deadline.
    pub deadline:        Option<DateTime<Utc>>,
    /// Maximum number of submissions per student.
    pub max_submissions: Option<i64>,
    /// Ordered late-submission policy.
    pub late_submission: Option<Vec<LateSubmissionPeriod>>,
    /// Degree of automation.
    #[builder(default)]
    #[serde(default)]
    pub autograde_type:  AutogradeType,
}

impl AssignmentSettings {
    /// The configured policy, empty if there is none.
    pub fn late_policy(&self) -> &[LateSubmissionPeriod] {
        self.late_submission.as_deref().unwrap_or_default()
    }

    /// Fraction of the score a submission made at `submitted_at` by `role`
    /// keeps. Without a deadline nothing is late.
    pub fn late_submission_scaling(
        &self,
        submitted_at: DateTime<Utc>,
        role: Scope,
    ) -> Result<f64, SettingsError> {
        match self.deadline {
            Some(due_at) => late::compute_scaling(self.late_policy(), due_at, submitted_at, role),
            None => Ok(1.0),
        }
    }
}

/// Rejected assignment configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SettingsError {
    /// A period is not a non-negative ISO-8601 duration.
    #[error("Invalid late submission period `{period}`")]
    InvalidPeriod {
        /// The rejected period.
        period: String,
        /// Why it was rejected.
        #[source]
        source: DurationError,
    },

    /// Periods must grow strictly from one step to the next.
    #[error("Period lengths are not increasing: `{period}` does not follow `{previous}`")]
    PeriodsNotIncreasing {
        /// The offending period.
        period:   String,
        /// The period before it (`P0D` for the first one).
        previous: String,
    },

    /// Scalings must lie strictly between zero and one.
    #[error("Score scaling has to be between 0.0 and 1.0 exclusive, got {scaling}")]
    ScalingOutOfRange {
        /// The offending scaling.
        scaling: f64,
    },

    /// Scalings must shrink strictly from one step to the next.
    #[error("Score scaling is not decreasing: {scaling} does not follow {previous}")]
    ScalingNotDecreasing {
        /// The offending scaling.
        scaling:  f64,
        /// The scaling before it (1.0 for the first one).
        previous: f64,
    },

    /// At least one submission must be allowed.
    #[error("Max submissions must be at least 1, got {value}")]
    MaxSubmissions {
        /// The configured value.
        value: i64,
    },

    /// The assignment carries no settings at all.
    #[error("Assignment settings are missing")]
    MissingSettings,
}

/// Checks settings before they are stored. Absent settings are accepted.
pub fn validate_assignment_settings(
    settings: Option<&AssignmentSettings>,
) -> Result<(), SettingsError> {
    let Some(settings) = settings else {
        return Ok(());
    };

    if let Some(value) = settings.max_submissions
        && value < 1
    {
        return Err(SettingsError::MaxSubmissions { value });
    }

    late::validate_late_submission(settings.late_policy())
}

/// The settings, or [`SettingsError::MissingSettings`] if there are none.
pub fn require_settings(
    settings: Option<&AssignmentSettings>,
) -> Result<&AssignmentSettings, SettingsError> {
    settings.ok_or(SettingsError::MissingSettings)
}
