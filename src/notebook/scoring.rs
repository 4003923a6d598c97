#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Automatic scoring of executed grade cells.

use thiserror::Error;

use super::{
    Cell, CellType, OutputType,
    classify::{grade_id, is_grade, is_solution, is_unchanged, points},
};

/// Errors raised while extracting a score from a cell.
#[derive(Error, Debug)]
pub enum ScoringError {
    /// Only grade cells carry a score.
    #[error("Cell {grade_id:?} is not a grade cell")]
    NotGradeCell {
        /// Grade id of the offending cell, if it has one.
        grade_id: Option<String>,
    },
}

/// Turns an executed grade cell into `(auto_score, max_score)`.
///
/// `auto_score` is `None` when the cell cannot be scored without a human.
pub trait ScoreExtractor {
    /// Determines the automatic score of `cell`.
    fn determine_grade(&self, cell: &Cell) -> Result<(Option<f64>, f64), ScoringError>;
}

/// Scores a cell from its recorded outputs.
///
/// * solution grade cells score zero when left untouched, otherwise they
///   need a human;
/// * code cells score zero on an error or any stderr output, partial
///   credit when the first result is a number, full points otherwise;
/// * anything else needs a human.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputScoreExtractor;

impl ScoreExtractor for OutputScoreExtractor {
    fn determine_grade(&self, cell: &Cell) -> Result<(Option<f64>, f64), ScoringError> {
        if !is_grade(cell) {
            return Err(ScoringError::NotGradeCell {
                grade_id: grade_id(cell).map(str::to_owned),
            });
        }

        let max_points = points(cell);

        if is_solution(cell) {
            let score = is_unchanged(cell).then_some(0.0);
            return Ok((score, max_points));
        }

        if cell.cell_type != CellType::Code {
            return Ok((None, max_points));
        }

        for output in cell.outputs() {
            match output.output_type {
                OutputType::Error => return Ok((Some(0.0), max_points)),
                OutputType::Stream if output.name.as_deref() == Some("stderr") => {
                    return Ok((Some(0.0), max_points));
                }
                OutputType::ExecuteResult => {
                    let score = partial_grade(cell, output.text_plain(), max_points);
                    return Ok((Some(score), max_points));
                }
                _ => {}
            }
        }

        Ok((Some(max_points), max_points))
    }
}

/// Reads partial credit from an execute result, clamped to `[0, max]`.
/// Results that are not numbers award full points.
fn partial_grade(cell: &Cell, text: Option<String>, max_points: f64) -> f64 {
    let Some(value) = text.and_then(|t| t.trim().parse::<f64>().ok()) else {
        return max_points;
    };

    if !value.is_finite() {
        tracing::warn!("Cell {:?} returned a non-finite score, awarding 0", grade_id(cell));
        0.0
    } else if value > max_points {
        tracing::warn!(
            "Cell {:?} returned {value}, more than its {max_points} points; clamping",
            grade_id(cell)
        );
        max_points
    } else if value < 0.0 {
        tracing::warn!("Cell {:?} returned negative score {value}; clamping", grade_id(cell));
        0.0
    } else {
        value
    }
}
