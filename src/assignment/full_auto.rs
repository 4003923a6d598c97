#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use itertools::Itertools;
use thiserror::Error;

use super::settings::{AssignmentSettings, AutogradeType};
use crate::gradebook::{GradeBookModel, NotebookModel};

/// A notebook that cannot be graded without a human.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AutogradeConflict {
    /// Task cells are always graded by hand.
    #[error("Fully autograded notebook {notebook} cannot contain task cells")]
    TaskCells {
        /// The offending notebook.
        notebook: String,
    },

    /// Cells that are both graded and written by the student may need a
    /// human.
    #[error(
        "Fully autograded notebook {notebook} cannot contain manually graded cells ({})",
        .cells.iter().join(", ")
    )]
    ManualGradeCells {
        /// The offending notebook.
        notebook: String,
        /// Grade ids of the cells that are both grade and solution cells.
        cells:    Vec<String>,
    },
}

/// Checks that one notebook can be graded fully automatically.
pub fn check_notebook(notebook: &NotebookModel) -> Result<(), AutogradeConflict> {
    if !notebook.task_cells.is_empty() {
        return Err(AutogradeConflict::TaskCells {
            notebook: notebook.notebook_id.clone(),
        });
    }

    let cells = notebook
        .grade_cells
        .keys()
        .filter(|id| notebook.solution_cells.contains_key(*id))
        .cloned()
        .collect_vec();
    if !cells.is_empty() {
        return Err(AutogradeConflict::ManualGradeCells {
            notebook: notebook.notebook_id.clone(),
            cells,
        });
    }

    Ok(())
}

/// Checks every notebook of an assignment's properties.
pub fn check_full_auto_grading(model: &GradeBookModel) -> Result<(), AutogradeConflict> {
    model.notebooks.values().try_for_each(check_notebook)
}

impl AssignmentSettings {
    /// Checks `properties` against these settings; only fully automatic
    /// assignments restrict which cells may appear.
    pub fn check_properties(&self, properties: &GradeBookModel) -> Result<(), AutogradeConflict> {
        if self.autograde_type != AutogradeType::FullAuto {
            return Ok(());
        }
        check_full_auto_grading(properties).inspect_err(|e| tracing::warn!("{e}"))
    }
}
