//! The late-submission step function and re-scaling of stored scores.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{
    duration::parse_non_negative,
    settings::{AssignmentSettings, LateSubmissionPeriod, Scope, SettingsError},
};

/// Parses one policy step's period.
fn period_of(step: &LateSubmissionPeriod) -> Result<Duration, SettingsError> {
    parse_non_negative(&step.period).map_err(|source| SettingsError::InvalidPeriod {
        period: step.period.clone(),
        source,
    })
}

/// Rejects a policy whose periods do not strictly grow or whose scalings
/// do not strictly shrink within `(0, 1)`. Steps are checked in order.
pub fn validate_late_submission(policy: &[LateSubmissionPeriod]) -> Result<(), SettingsError> {
    let mut previous_period = Duration::zero();
    let mut previous_label = "P0D".to_owned();
    let mut previous_scaling = 1.0;

    for step in policy {
        let period = period_of(step)?;
        if period <= previous_period {
            return Err(SettingsError::PeriodsNotIncreasing {
                period:   step.period.clone(),
                previous: previous_label,
            });
        }
        if !(step.scaling > 0.0 && step.scaling < 1.0) {
            return Err(SettingsError::ScalingOutOfRange {
                scaling: step.scaling,
            });
        }
        if step.scaling >= previous_scaling {
            return Err(SettingsError::ScalingNotDecreasing {
                scaling:  step.scaling,
                previous: previous_scaling,
            });
        }

        previous_period = period;
        previous_label = step.period.clone();
        previous_scaling = step.scaling;
    }

    Ok(())
}

/// Fraction of the score kept by a submission made at `submitted_at`.
///
/// Staff and on-time submissions keep everything. Otherwise the scaling of
/// the last step whose period has fully elapsed applies; past every step
/// the last (harshest) scaling applies.
pub fn compute_scaling(
    policy: &[LateSubmissionPeriod],
    due_at: DateTime<Utc>,
    submitted_at: DateTime<Utc>,
    role: Scope,
) -> Result<f64, SettingsError> {
    if role.is_staff() || policy.is_empty() {
        return Ok(1.0);
    }

    let elapsed = submitted_at - due_at;
    if elapsed <= Duration::zero() {
        return Ok(1.0);
    }

    let mut scaling = 1.0;
    for step in policy {
        if period_of(step)? <= elapsed {
            scaling = step.scaling;
        } else {
            break;
        }
    }

    tracing::debug!("Submission {elapsed} late keeps {scaling} of its score");
    Ok(scaling)
}

/// A stored submission whose score depends on the late policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    /// When it was submitted.
    pub date:          DateTime<Utc>,
    /// Score before late scaling.
    pub grading_score: f64,
    /// Scaling applied to `grading_score`.
    pub score_scaling: f64,
    /// Final score.
    pub score:         f64,
}

impl Submission {
    /// An unscaled submission.
    pub fn new(date: DateTime<Utc>, grading_score: f64) -> Self {
        Self {
            date,
            grading_score,
            score_scaling: 1.0,
            score: grading_score,
        }
    }

    /// Recomputes the scaling under `settings`; returns whether the score
    /// changed.
    pub fn rescale(
        &mut self,
        settings: &AssignmentSettings,
        role: Scope,
    ) -> Result<bool, SettingsError> {
        let scaling = settings.late_submission_scaling(self.date, role)?;
        if scaling == self.score_scaling {
            return Ok(false);
        }

        self.score_scaling = scaling;
        self.score = scaling * self.grading_score;
        Ok(true)
    }
}

/// Re-scales every submission after a policy change, returning how many
/// changed. Nothing is modified if any period fails to parse.
pub fn recalculate_scores(
    submissions: &mut [Submission],
    settings: &AssignmentSettings,
    role: Scope,
) -> Result<usize, SettingsError> {
    validate_late_submission(settings.late_policy())?;

    let mut changed = 0;
    for submission in submissions.iter_mut() {
        if submission.rescale(settings, role)? {
            changed += 1;
        }
    }

    tracing::info!("Recalculated scores: {changed} of {} submissions changed", submissions.len());
    Ok(changed)
}
