#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use super::{Preprocessor, PreprocessorError, Resources};
use crate::{
    constants::{
        DEFAULT_MAX_OUTPUT_LINES, DEFAULT_MAX_TRACEBACK_LINES, OUTPUT_TRUNCATED,
        TRACEBACK_TRUNCATED,
    },
    notebook::{Cell, CellType, Notebook, OutputType},
};

/// Limits applied by [`LimitOutput`]; `None` means unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitOutputConfig {
    /// Total stream lines kept per code cell.
    pub max_lines:     Option<usize>,
    /// Traceback lines kept per error output.
    pub max_traceback: Option<usize>,
}

impl Default for LimitOutputConfig {
    fn default() -> Self {
        Self {
            max_lines:     Some(DEFAULT_MAX_OUTPUT_LINES),
            max_traceback: Some(DEFAULT_MAX_TRACEBACK_LINES),
        }
    }
}

/// Keeps runaway output from bloating graded notebooks.
#[derive(Debug, Clone, Copy, Default)]
pub struct LimitOutput {
    /// Line limits.
    config: LimitOutputConfig,
}

impl LimitOutput {
    /// A stage with the given limits.
    pub fn new(config: LimitOutputConfig) -> Self {
        Self { config }
    }

    /// Truncates stream outputs once `max_lines` lines have been emitted,
    /// dropping stream outputs that come after the limit.
    fn limit_streams(cell: &mut Cell, max_lines: usize) {
        let Some(outputs) = cell.outputs.take() else {
            return;
        };

        let mut length = 0usize;
        let mut kept = Vec::with_capacity(outputs.len());
        for mut output in outputs {
            if output.output_type == OutputType::Stream {
                if length >= max_lines {
                    continue;
                }
                let text = output.text.take().unwrap_or_default();
                let mut lines: Vec<&str> = text.split('\n').collect();
                if lines.len() + length > max_lines {
                    lines.truncate((max_lines - length).saturating_sub(1));
                    lines.push(OUTPUT_TRUNCATED);
                }
                length += lines.len();
                output.text = Some(lines.join("\n"));
            }
            kept.push(output);
        }

        cell.outputs = Some(kept);
    }

    /// Shortens long tracebacks to their head and tail around a marker.
    fn limit_tracebacks(cell: &mut Cell, max_traceback: usize) {
        for output in cell.outputs.iter_mut().flatten() {
            if output.output_type != OutputType::Error {
                continue;
            }
            let Some(traceback) = output.traceback.as_mut() else {
                continue;
            };
            if traceback.len() <= max_traceback {
                continue;
            }

            let head = max_traceback / 2;
            let tail = max_traceback.saturating_sub(head + 1);
            let mut shortened = traceback[..head].to_vec();
            shortened.push(TRACEBACK_TRUNCATED.to_owned());
            shortened.extend_from_slice(&traceback[traceback.len() - tail..]);
            *traceback = shortened;
        }
    }
}

impl Preprocessor for LimitOutput {
    fn name(&self) -> &'static str {
        "LimitOutput"
    }

    fn preprocess(
        &self,
        mut nb: Notebook,
        resources: Resources,
    ) -> Result<(Notebook, Resources), PreprocessorError> {
        for cell in nb.cells.iter_mut().filter(|c| c.cell_type == CellType::Code) {
            if let Some(max_lines) = self.config.max_lines {
                Self::limit_streams(cell, max_lines);
            }
            if let Some(max_traceback) = self.config.max_traceback {
                Self::limit_tracebacks(cell, max_traceback);
            }
        }
        Ok((nb, resources))
    }
}
