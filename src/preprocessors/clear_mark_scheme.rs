#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use super::{Preprocessor, PreprocessorError, Resources};
use crate::{
    constants::{BEGIN_MARK_SCHEME, CELL_TOOLBAR_KEY, END_MARK_SCHEME},
    notebook::{Cell, Notebook, classify::is_task},
};

/// Strips marking scheme regions before a notebook goes out to students.
///
/// A region starts at the first line containing `begin` and ends at the
/// next line containing `end`; both delimiter lines are removed with it.
#[derive(Debug, Clone)]
pub struct ClearMarkScheme {
    /// Substring opening a region.
    pub begin:            String,
    /// Substring closing a region.
    pub end:              String,
    /// Reject regions found outside task cells.
    pub enforce_metadata: bool,
}

impl Default for ClearMarkScheme {
    fn default() -> Self {
        Self {
            begin:            BEGIN_MARK_SCHEME.to_owned(),
            end:              END_MARK_SCHEME.to_owned(),
            enforce_metadata: true,
        }
    }
}

impl ClearMarkScheme {
    /// Removes every region from the cell's source, returning whether
    /// anything was removed.
    fn remove_regions(
        &self,
        cell: &mut Cell,
        cell_index: usize,
    ) -> Result<bool, PreprocessorError> {
        let mut kept = Vec::new();
        let mut in_region = false;
        let mut removed = false;

        for line in cell.source.split('\n') {
            if line.contains(&self.begin) {
                if in_region {
                    return Err(PreprocessorError::MarkScheme {
                        cell_index,
                        message: "nested begin mark scheme statements".into(),
                    });
                }
                in_region = true;
                removed = true;
            } else if line.contains(&self.end) {
                in_region = false;
            } else if !in_region {
                kept.push(line);
            }
        }

        if in_region {
            return Err(PreprocessorError::MarkScheme {
                cell_index,
                message: "no end mark scheme statement found".into(),
            });
        }

        cell.source = kept.join("\n");
        Ok(removed)
    }
}

impl Preprocessor for ClearMarkScheme {
    fn name(&self) -> &'static str {
        "ClearMarkScheme"
    }

    fn preprocess(
        &self,
        mut nb: Notebook,
        resources: Resources,
    ) -> Result<(Notebook, Resources), PreprocessorError> {
        for (index, cell) in nb.cells.iter_mut().enumerate() {
            let removed = self.remove_regions(cell, index)?;
            if removed && !is_task(cell) && self.enforce_metadata {
                return Err(PreprocessorError::MarkScheme {
                    cell_index: index,
                    message:    "mark scheme region found outside a manually graded task cell"
                        .into(),
                });
            }
        }

        nb.metadata.remove(CELL_TOOLBAR_KEY);
        Ok((nb, resources))
    }
}
