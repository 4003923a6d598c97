#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::path::PathBuf;

use bon::Builder;
use dotenvy::dotenv;

use crate::{
    constants::{
        DEFAULT_MAX_OUTPUT_LINES, DEFAULT_MAX_TRACEBACK_LINES, ENV_FOOTER, ENV_HEADER,
        ENV_LIMIT_OUTPUT, ENV_LOCK_ALL_CELLS, ENV_LOCK_GRADE_CELLS, ENV_LOCK_READONLY_CELLS,
        ENV_LOCK_SOLUTION_CELLS, ENV_MAX_OUTPUT_LINES, ENV_MAX_TRACEBACK_LINES,
    },
    preprocessors::{LimitOutputConfig, LockConfig},
};

/// Immutable configuration of the autograding pipeline, shared by every
/// stage of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Builder)]
pub struct PipelineConfig {
    /// Notebook whose cells are prepended to every submission.
    #[builder(into)]
    pub header:       Option<PathBuf>,
    /// Notebook whose cells are appended to every submission.
    #[builder(into)]
    pub footer:       Option<PathBuf>,
    /// Which cells get locked.
    #[builder(default)]
    pub lock:         LockConfig,
    /// Output limits; `None` leaves outputs untouched.
    pub limit_output: Option<LimitOutputConfig>,
}

impl PipelineConfig {
    /// Reads the configuration from the process environment, loading a
    /// `.env` file first if there is one.
    pub fn from_env() -> Self {
        dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`. Unset or unparsable values
    /// fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = LockConfig::default();
        let lock = LockConfig {
            lock_solution_cells: read_bool(
                &lookup,
                ENV_LOCK_SOLUTION_CELLS,
                defaults.lock_solution_cells,
            ),
            lock_grade_cells:    read_bool(
                &lookup,
                ENV_LOCK_GRADE_CELLS,
                defaults.lock_grade_cells,
            ),
            lock_readonly_cells: read_bool(
                &lookup,
                ENV_LOCK_READONLY_CELLS,
                defaults.lock_readonly_cells,
            ),
            lock_all_cells:      read_bool(&lookup, ENV_LOCK_ALL_CELLS, defaults.lock_all_cells),
        };

        let limit_output = read_bool(&lookup, ENV_LIMIT_OUTPUT, false).then(|| {
            LimitOutputConfig {
                max_lines:     read_limit(&lookup, ENV_MAX_OUTPUT_LINES, DEFAULT_MAX_OUTPUT_LINES),
                max_traceback: read_limit(
                    &lookup,
                    ENV_MAX_TRACEBACK_LINES,
                    DEFAULT_MAX_TRACEBACK_LINES,
                ),
            }
        });

        let config = Self {
            header: read_path(&lookup, ENV_HEADER),
            footer: read_path(&lookup, ENV_FOOTER),
            lock,
            limit_output,
        };
        tracing::debug!("Pipeline configuration: {config:?}");
        config
    }
}

/// Reads a non-empty path.
fn read_path(lookup: &impl Fn(&str) -> Option<String>, env: &str) -> Option<PathBuf> {
    lookup(env)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Reads a boolean switch, accepting the usual spellings.
fn read_bool(lookup: &impl Fn(&str) -> Option<String>, env: &str, default: bool) -> bool {
    match lookup(env).map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        Some("1" | "true" | "yes" | "on") => true,
        Some("0" | "false" | "no" | "off") => false,
        Some(other) => {
            tracing::warn!("Ignoring {env}={other:?}; expected a boolean");
            default
        }
        None => default,
    }
}

/// Reads a line limit; `-1` disables the limit.
fn read_limit(
    lookup: &impl Fn(&str) -> Option<String>,
    env: &str,
    default: usize,
) -> Option<usize> {
    match lookup(env).as_deref().map(str::trim) {
        Some("-1") => None,
        Some(value) => Some(value.parse::<usize>().unwrap_or(default)),
        None => Some(default),
    }
}
