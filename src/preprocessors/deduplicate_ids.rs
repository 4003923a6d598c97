use std::collections::HashSet;

use super::{Preprocessor, PreprocessorError, Resources};
use crate::notebook::{
    Notebook,
    classify::{grade_id, is_graded_unit},
};

/// Keeps the first grade, solution or locked cell for every grade id and
/// turns later cells reusing that id into plain cells.
///
/// Running the stage twice gives the same notebook as running it once.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeduplicateIds;

impl Preprocessor for DeduplicateIds {
    fn name(&self) -> &'static str {
        "DeduplicateIds"
    }

    fn preprocess(
        &self,
        mut nb: Notebook,
        resources: Resources,
    ) -> Result<(Notebook, Resources), PreprocessorError> {
        let mut seen = HashSet::new();

        for (index, cell) in nb.cells.iter_mut().enumerate() {
            if !is_graded_unit(cell) {
                continue;
            }
            let Some(id) = grade_id(cell).map(str::to_owned) else {
                continue;
            };

            if !seen.insert(id.clone()) {
                tracing::warn!(
                    "Cell with id '{id}' exists multiple times (cell {index}); clearing it"
                );
                cell.metadata.nbgrader = None;
            }
        }

        Ok((nb, resources))
    }
}
