#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! File-backed gradebook with scoped, all-or-nothing writes.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use super::{
    GradebookError,
    models::{Comment, Grade, GradeBookModel, GradeCell, NotebookModel, SolutionCell, TaskCell},
};
use crate::notebook::CellType;

/// An open gradebook file.
///
/// Changes live in memory until [`Gradebook::commit`]. Dropping a modified
/// gradebook without committing discards the changes, so an aborted
/// grading run never leaves a half-written file behind.
#[derive(Debug)]
pub struct Gradebook {
    /// Location of the backing JSON document.
    path:  PathBuf,
    /// In-memory copy of the document.
    model: GradeBookModel,
    /// Whether the in-memory copy differs from the file.
    dirty: bool,
}

impl Gradebook {
    /// Opens the gradebook at `path`; a missing file yields an empty one.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, GradebookError> {
        let path = path.into();
        let model = match std::fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => GradeBookModel::default(),
            Ok(text) => GradeBookModel::from_json(&text).map_err(|source| {
                GradebookError::Corrupt {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No gradebook at {}, starting empty", path.display());
                GradeBookModel::default()
            }
            Err(source) => {
                return Err(GradebookError::Io {
                    path,
                    source,
                });
            }
        };

        Ok(Self {
            path,
            model,
            dirty: false,
        })
    }

    /// Opens the gradebook, runs `f` against it and commits if `f`
    /// succeeds. On error nothing is written and the error is returned.
    pub fn scoped<T, E>(
        path: impl Into<PathBuf>,
        f: impl FnOnce(&mut Gradebook) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<GradebookError>,
    {
        let mut gradebook = Self::open(path)?;
        match f(&mut gradebook) {
            Ok(value) => {
                gradebook.commit()?;
                Ok(value)
            }
            Err(e) => {
                gradebook.discard();
                Err(e)
            }
        }
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The in-memory document.
    pub fn model(&self) -> &GradeBookModel {
        &self.model
    }

    /// The model of `notebook_id`, if it has been graded before.
    pub fn notebook(&self, notebook_id: &str) -> Option<&NotebookModel> {
        self.model.notebooks.get(notebook_id)
    }

    /// The model of `notebook_id`, created on first use.
    fn notebook_mut(&mut self, notebook_id: &str) -> &mut NotebookModel {
        self.dirty = true;
        self.model
            .notebooks
            .entry(notebook_id.to_owned())
            .or_insert_with(|| NotebookModel::new(notebook_id))
    }

    /// The stored grade for the pair, or a fresh one if there is none yet.
    pub fn find_grade(&self, grade_id: &str, notebook_id: &str) -> Grade {
        self.notebook(notebook_id)
            .and_then(|nb| nb.grade(grade_id))
            .cloned()
            .unwrap_or_else(|| Grade::new(grade_id))
    }

    /// The stored comment for the pair, or a fresh one if there is none yet.
    pub fn find_comment(&self, grade_id: &str, notebook_id: &str) -> Comment {
        self.notebook(notebook_id)
            .and_then(|nb| nb.comment(grade_id))
            .cloned()
            .unwrap_or_else(|| Comment::new(grade_id))
    }

    /// Inserts or updates an automatically computed grade.
    ///
    /// A manual score already stored for the pair is kept as is.
    pub fn add_grade(&mut self, notebook_id: &str, mut grade: Grade) {
        let nb = self.notebook_mut(notebook_id);
        match nb.grades.iter_mut().find(|g| g.grade_id == grade.grade_id) {
            Some(existing) => {
                if existing.manual_score.is_some() {
                    grade.manual_score = existing.manual_score;
                }
                *existing = grade;
            }
            None => nb.grades.push(grade),
        }
    }

    /// Inserts or updates an automatically computed comment.
    ///
    /// A manual comment already stored for the pair is kept as is.
    pub fn add_comment(&mut self, notebook_id: &str, mut comment: Comment) {
        let nb = self.notebook_mut(notebook_id);
        match nb.comments.iter_mut().find(|c| c.grade_id == comment.grade_id) {
            Some(existing) => {
                if existing.manual_comment.is_some() {
                    comment.manual_comment = existing.manual_comment.clone();
                }
                *existing = comment;
            }
            None => nb.comments.push(comment),
        }
    }

    /// Records a score entered by a human grader.
    ///
    /// The review flag is left alone; the next grading run recomputes it.
    pub fn set_manual_score(&mut self, grade_id: &str, notebook_id: &str, score: f64) {
        let mut grade = self.find_grade(grade_id, notebook_id);
        grade.manual_score = Some(score);
        let nb = self.notebook_mut(notebook_id);
        match nb.grades.iter_mut().find(|g| g.grade_id == grade_id) {
            Some(existing) => *existing = grade,
            None => nb.grades.push(grade),
        }
    }

    /// Records a comment written by a human grader.
    pub fn set_manual_comment(&mut self, grade_id: &str, notebook_id: &str, text: String) {
        let mut comment = self.find_comment(grade_id, notebook_id);
        comment.manual_comment = Some(text);
        let nb = self.notebook_mut(notebook_id);
        match nb.comments.iter_mut().find(|c| c.grade_id == grade_id) {
            Some(existing) => *existing = comment,
            None => nb.comments.push(comment),
        }
    }

    /// Registers (or updates) a grade cell and refreshes the max score.
    pub fn register_grade_cell(
        &mut self,
        notebook_id: &str,
        grade_id: &str,
        max_score: f64,
        cell_type: CellType,
    ) {
        let nb = self.notebook_mut(notebook_id);
        nb.grade_cells.insert(
            grade_id.to_owned(),
            GradeCell {
                name: grade_id.to_owned(),
                max_score,
                cell_type,
            },
        );
        nb.refresh_max_score();
    }

    /// Registers (or updates) a solution cell.
    pub fn register_solution_cell(
        &mut self,
        notebook_id: &str,
        grade_id: &str,
        cell_type: CellType,
    ) {
        self.notebook_mut(notebook_id).solution_cells.insert(
            grade_id.to_owned(),
            SolutionCell {
                name: grade_id.to_owned(),
                cell_type,
            },
        );
    }

    /// Registers (or updates) a task cell and refreshes the max score.
    pub fn register_task_cell(
        &mut self,
        notebook_id: &str,
        grade_id: &str,
        max_score: f64,
        cell_type: CellType,
    ) {
        let nb = self.notebook_mut(notebook_id);
        nb.task_cells.insert(
            grade_id.to_owned(),
            TaskCell {
                name: grade_id.to_owned(),
                max_score,
                cell_type,
            },
        );
        nb.refresh_max_score();
    }

    /// Writes the document and closes the gradebook.
    ///
    /// The JSON is written to a sibling temporary file which is then renamed
    /// over the target, so readers only ever see a complete document.
    pub fn commit(mut self) -> Result<(), GradebookError> {
        if !self.dirty && self.path.exists() {
            return Ok(());
        }

        let text = serde_json::to_string_pretty(&self.model).map_err(GradebookError::Serialize)?;
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source| GradebookError::Io {
                path,
                source,
            }
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(io_err(parent))?;
        }

        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "gradebook.json".to_owned());
        let tmp = self
            .path
            .with_file_name(format!(".{file_name}.{}.tmp", Uuid::new_v4()));

        std::fs::write(&tmp, text).map_err(io_err(&tmp))?;
        if let Err(e) = std::fs::rename(&tmp, &self.path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(io_err(&self.path)(e));
        }

        tracing::debug!("Gradebook written to {}", self.path.display());
        self.dirty = false;
        Ok(())
    }

    /// Closes the gradebook without writing.
    pub fn discard(mut self) {
        if self.dirty {
            tracing::warn!("Discarding uncommitted gradebook changes for {}", self.path.display());
        }
        self.dirty = false;
    }
}

impl Drop for Gradebook {
    fn drop(&mut self) {
        if self.dirty {
            tracing::warn!(
                "Gradebook {} dropped with uncommitted changes; nothing was written",
                self.path.display()
            );
        }
    }
}
