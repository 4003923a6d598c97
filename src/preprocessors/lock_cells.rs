#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use bon::Builder;

use super::{Preprocessor, PreprocessorError, Resources};
use crate::notebook::{
    CellMetadata, Notebook,
    classify::{is_grade, is_locked, is_solution},
};

/// Which kinds of cells [`LockCells`] protects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder)]
pub struct LockConfig {
    /// Solution cells become non-deletable.
    #[builder(default = true)]
    pub lock_solution_cells: bool,
    /// Grade cells become non-deletable and non-editable.
    #[builder(default = true)]
    pub lock_grade_cells:    bool,
    /// Read-only cells become non-deletable and non-editable.
    #[builder(default = true)]
    pub lock_readonly_cells: bool,
    /// Every other cell becomes non-deletable and non-editable.
    #[builder(default = false)]
    pub lock_all_cells:      bool,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Outcome of the lock rules for one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lock {
    /// Leave the cell as it is.
    None,
    /// Forbid deleting; editing untouched.
    Delete,
    /// Forbid deleting and editing.
    DeleteAndEdit,
}

/// Makes gradable cells non-deletable and, where appropriate, non-editable.
///
/// Exactly one rule applies per cell, first match wins:
/// 1. solution and grade (with either switch on): non-deletable;
/// 2. solution: non-deletable;
/// 3. grade: non-deletable, non-editable;
/// 4. read-only: non-deletable, non-editable;
/// 5. lock-all: non-deletable, non-editable.
#[derive(Debug, Clone, Copy, Default)]
pub struct LockCells {
    /// Switches for each rule.
    config: LockConfig,
}

impl LockCells {
    /// A stage with the given switches.
    pub fn new(config: LockConfig) -> Self {
        Self { config }
    }

    /// Picks the rule that applies to a cell.
    #[allow(clippy::if_same_then_else)]
    fn rule(&self, solution: bool, grade: bool, locked: bool) -> Lock {
        let c = &self.config;
        if (c.lock_solution_cells || c.lock_grade_cells) && solution && grade {
            Lock::Delete
        } else if c.lock_solution_cells && solution {
            Lock::Delete
        } else if c.lock_grade_cells && grade {
            Lock::DeleteAndEdit
        } else if c.lock_readonly_cells && locked {
            Lock::DeleteAndEdit
        } else if c.lock_all_cells {
            Lock::DeleteAndEdit
        } else {
            Lock::None
        }
    }
}

impl Lock {
    /// Writes the front-end flags for this outcome.
    fn apply(self, metadata: &mut CellMetadata) {
        match self {
            Lock::None => {}
            Lock::Delete => metadata.deletable = Some(false),
            Lock::DeleteAndEdit => {
                metadata.deletable = Some(false);
                metadata.editable = Some(false);
            }
        }
    }
}

impl Preprocessor for LockCells {
    fn name(&self) -> &'static str {
        "LockCells"
    }

    fn preprocess(
        &self,
        mut nb: Notebook,
        resources: Resources,
    ) -> Result<(Notebook, Resources), PreprocessorError> {
        for cell in &mut nb.cells {
            let lock = self.rule(is_solution(cell), is_grade(cell), is_locked(cell));
            lock.apply(&mut cell.metadata);
        }
        Ok((nb, resources))
    }
}
