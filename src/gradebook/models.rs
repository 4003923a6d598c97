#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::notebook::CellType;

/// Score of one gradable unit of one notebook.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Grade {
    /// Grade id of the cell this score belongs to.
    pub grade_id:           String,
    /// Score computed by the autograder.
    #[serde(default)]
    pub auto_score:         Option<f64>,
    /// Score entered by a human grader; never changed by the autograder.
    #[serde(default)]
    pub manual_score:       Option<f64>,
    /// Whether a human still has to look at this unit.
    #[serde(default)]
    pub needs_manual_grade: bool,
}

impl Grade {
    /// An empty grade entry for `grade_id`.
    pub fn new(grade_id: impl Into<String>) -> Self {
        Self {
            grade_id: grade_id.into(),
            ..Self::default()
        }
    }

    /// The effective score: the manual score wins over the automatic one.
    pub fn score(&self) -> f64 {
        self.manual_score.or(self.auto_score).unwrap_or(0.0)
    }
}

/// Feedback attached to one gradable unit of one notebook.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Comment {
    /// Grade id of the cell this comment belongs to.
    pub grade_id:       String,
    /// Comment produced by the autograder.
    #[serde(default)]
    pub auto_comment:   Option<String>,
    /// Comment written by a human grader; never changed by the autograder.
    #[serde(default)]
    pub manual_comment: Option<String>,
}

impl Comment {
    /// An empty comment entry for `grade_id`.
    pub fn new(grade_id: impl Into<String>) -> Self {
        Self {
            grade_id: grade_id.into(),
            ..Self::default()
        }
    }
}

/// A cell whose output is scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeCell {
    /// Grade id.
    pub name:      String,
    /// Points the cell is worth.
    pub max_score: f64,
    /// Cell type at grading time.
    pub cell_type: CellType,
}

/// A cell the student writes into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionCell {
    /// Grade id.
    pub name:      String,
    /// Cell type at grading time.
    pub cell_type: CellType,
}

/// A free-form task that is always graded by hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskCell {
    /// Grade id.
    pub name:      String,
    /// Points the task is worth.
    pub max_score: f64,
    /// Cell type at grading time.
    pub cell_type: CellType,
}

/// Everything the gradebook knows about one notebook: which cells are
/// gradable, what they are worth, and the recorded grades and comments.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NotebookModel {
    /// Identifier of the notebook (its unique key).
    pub notebook_id:    String,
    /// Sum of grade and task cell points.
    #[serde(default)]
    pub max_score:      f64,
    /// Grade cells by grade id.
    #[serde(default)]
    pub grade_cells:    BTreeMap<String, GradeCell>,
    /// Solution cells by grade id.
    #[serde(default)]
    pub solution_cells: BTreeMap<String, SolutionCell>,
    /// Task cells by grade id.
    #[serde(default)]
    pub task_cells:     BTreeMap<String, TaskCell>,
    /// Recorded grades, in first-seen order.
    #[serde(default)]
    pub grades:         Vec<Grade>,
    /// Recorded comments, in first-seen order.
    #[serde(default)]
    pub comments:       Vec<Comment>,
}

impl NotebookModel {
    /// An empty model for `notebook_id`.
    pub fn new(notebook_id: impl Into<String>) -> Self {
        Self {
            notebook_id: notebook_id.into(),
            ..Self::default()
        }
    }

    /// Recomputes [`NotebookModel::max_score`] from the registered cells.
    pub fn refresh_max_score(&mut self) {
        self.max_score = self.grade_cells.values().map(|c| c.max_score).sum::<f64>()
            + self.task_cells.values().map(|c| c.max_score).sum::<f64>();
    }

    /// The recorded grade for `grade_id`.
    pub fn grade(&self, grade_id: &str) -> Option<&Grade> {
        self.grades.iter().find(|g| g.grade_id == grade_id)
    }

    /// The recorded comment for `grade_id`.
    pub fn comment(&self, grade_id: &str) -> Option<&Comment> {
        self.comments.iter().find(|c| c.grade_id == grade_id)
    }

    /// Sum of effective scores over all recorded grades.
    pub fn score(&self) -> f64 {
        self.grades.iter().map(Grade::score).sum()
    }

    /// Whether any recorded grade still waits for a human.
    pub fn needs_manual_grade(&self) -> bool {
        self.grades.iter().any(|g| g.needs_manual_grade)
    }
}

/// The persisted gradebook document, also used as an assignment's
/// properties: one [`NotebookModel`] per notebook id.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GradeBookModel {
    /// Notebook models by notebook id.
    #[serde(default)]
    pub notebooks: BTreeMap<String, NotebookModel>,
}

impl GradeBookModel {
    /// Parses a gradebook document.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Total points over all notebooks.
    pub fn max_score(&self) -> f64 {
        self.notebooks.values().map(|nb| nb.max_score).sum()
    }

    /// Sum of effective scores of one notebook, if it is known.
    pub fn total_score(&self, notebook_id: &str) -> Option<f64> {
        self.notebooks.get(notebook_id).map(NotebookModel::score)
    }

    /// Sum of effective scores over all notebooks.
    pub fn score(&self) -> f64 {
        self.notebooks.values().map(NotebookModel::score).sum()
    }
}
