#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use super::{Preprocessor, PreprocessorError, Resources};
use crate::{
    constants::NO_RESPONSE,
    gradebook::Gradebook,
    notebook::{
        Cell, Notebook,
        classify::{grade_id, is_grade, is_solution, is_task, is_unchanged, points},
        scoring::{OutputScoreExtractor, ScoreExtractor},
    },
};

/// Records automatic scores and comments of a graded notebook.
///
/// The gradebook at `output_json_path` is opened for the duration of the
/// stage and written only if every cell was processed. Manual scores and
/// comments already present are never touched.
pub struct SaveAutoGrades {
    /// Computes the automatic score of a grade cell.
    extractor: Box<dyn ScoreExtractor>,
}

impl Default for SaveAutoGrades {
    fn default() -> Self {
        Self::new(OutputScoreExtractor)
    }
}

impl SaveAutoGrades {
    /// A stage scoring grade cells with `extractor`.
    pub fn new(extractor: impl ScoreExtractor + 'static) -> Self {
        Self {
            extractor: Box::new(extractor),
        }
    }

    /// Records the automatic score of a grade cell.
    fn add_score(
        &self,
        gradebook: &mut Gradebook,
        notebook_id: &str,
        id: &str,
        cell: &Cell,
    ) -> Result<(), PreprocessorError> {
        gradebook.register_grade_cell(notebook_id, id, points(cell), cell.cell_type);

        let mut grade = gradebook.find_grade(id, notebook_id);
        let (auto_score, _) = self.extractor.determine_grade(cell)?;
        grade.auto_score = auto_score;
        grade.needs_manual_grade = grade.manual_score.is_some() || grade.auto_score.is_none();

        gradebook.add_grade(notebook_id, grade);
        Ok(())
    }

    /// Records the automatic comment of a solution or task cell.
    fn add_comment(gradebook: &mut Gradebook, notebook_id: &str, id: &str, cell: &Cell) {
        if is_task(cell) {
            gradebook.register_task_cell(notebook_id, id, points(cell), cell.cell_type);
        }
        if is_solution(cell) {
            gradebook.register_solution_cell(notebook_id, id, cell.cell_type);
        }

        let mut comment = gradebook.find_comment(id, notebook_id);
        comment.auto_comment =
            (is_unchanged(cell) && !is_task(cell)).then(|| NO_RESPONSE.to_owned());

        gradebook.add_comment(notebook_id, comment);
    }
}

impl Preprocessor for SaveAutoGrades {
    fn name(&self) -> &'static str {
        "SaveAutoGrades"
    }

    fn preprocess(
        &self,
        nb: Notebook,
        resources: Resources,
    ) -> Result<(Notebook, Resources), PreprocessorError> {
        let notebook_id = resources
            .unique_key
            .clone()
            .ok_or(PreprocessorError::MissingResource {
                stage: self.name(),
                key:   "unique_key",
            })?;
        let path = resources
            .output_json_path
            .clone()
            .ok_or(PreprocessorError::MissingResource {
                stage: self.name(),
                key:   "output_json_path",
            })?;

        Gradebook::scoped(path, |gradebook| {
            for (index, cell) in nb.cells.iter().enumerate() {
                let needs_score = is_grade(cell);
                let needs_comment = is_solution(cell) || is_task(cell);
                if !needs_score && !needs_comment {
                    continue;
                }

                let Some(id) = grade_id(cell) else {
                    tracing::warn!("Cell {index} is gradable but has no grade id; skipping it");
                    continue;
                };

                if needs_score {
                    self.add_score(gradebook, &notebook_id, id, cell)?;
                }
                if needs_comment {
                    Self::add_comment(gradebook, &notebook_id, id, cell);
                }
            }

            Ok::<_, PreprocessorError>(())
        })?;

        tracing::info!("Saved autograded scores for {notebook_id}");
        Ok((nb, resources))
    }
}
