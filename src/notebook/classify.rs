//! Stateless classification of cells by their grading metadata.
//!
//! Missing or malformed metadata never raises: every predicate answers
//! `false` and every accessor answers `None` (or zero points).

use md5::{Digest, Md5};

use super::{Cell, GradingMetadata};

/// The cell's grading metadata, if any.
pub fn grading(cell: &Cell) -> Option<&GradingMetadata> {
    cell.metadata.nbgrader.as_ref()
}

/// Reads a boolean flag out of the grading metadata, defaulting to false.
fn flag(cell: &Cell, pick: impl Fn(&GradingMetadata) -> Option<bool>) -> bool {
    grading(cell).and_then(pick).unwrap_or(false)
}

/// Whether the cell's output is scored.
pub fn is_grade(cell: &Cell) -> bool {
    flag(cell, |m| m.grade)
}

/// Whether the cell's content is authored by the student.
pub fn is_solution(cell: &Cell) -> bool {
    flag(cell, |m| m.solution)
}

/// Whether the author marked the cell read-only.
pub fn is_locked(cell: &Cell) -> bool {
    flag(cell, |m| m.locked)
}

/// Whether the cell is a manually graded free-form task.
pub fn is_task(cell: &Cell) -> bool {
    flag(cell, |m| m.task)
}

/// Grade, solution or locked: the cells whose grade id must be unique.
pub fn is_graded_unit(cell: &Cell) -> bool {
    is_grade(cell) || is_solution(cell) || is_locked(cell)
}

/// The cell's grade id, if one is set.
pub fn grade_id(cell: &Cell) -> Option<&str> {
    grading(cell)?.grade_id.as_deref()
}

/// Points the cell is worth; negative or missing values count as zero.
pub fn points(cell: &Cell) -> f64 {
    grading(cell)
        .and_then(|m| m.points)
        .filter(|p| p.is_finite())
        .map_or(0.0, |p| p.max(0.0))
}

/// The checksum recorded when the cell was authored.
pub fn stored_checksum(cell: &Cell) -> Option<&str> {
    grading(cell)?.checksum.as_deref()
}

/// Hex-encoded MD5 over everything that defines a cell's graded content,
/// in the layout the nbgrader authoring tools write into `checksum`:
/// source, cell type, the grade, solution and locked flags as `True` or
/// `False`, the grade id and, for grade cells, the points as a Python float.
///
/// Front-end flags such as `deletable`, the task flag and the stored
/// checksum itself do not take part.
pub fn compute_checksum(cell: &Cell) -> String {
    let mut hasher = Md5::new();
    hasher.update(cell.source.as_bytes());
    hasher.update(cell.cell_type.as_str().as_bytes());
    for set in [is_grade(cell), is_solution(cell), is_locked(cell)] {
        hasher.update(if set { "True" } else { "False" });
    }
    hasher.update(grade_id(cell).unwrap_or_default().as_bytes());
    if is_grade(cell) {
        let raw = grading(cell).and_then(|m| m.points).unwrap_or(0.0);
        hasher.update(python_float(raw).as_bytes());
    }

    hex::encode(hasher.finalize())
}

/// Records the current checksum in the cell's grading metadata, as the
/// authoring step does before a notebook is released. Cells without
/// grading metadata are left alone.
pub fn stamp_checksum(cell: &mut Cell) {
    let checksum = compute_checksum(cell);
    if let Some(meta) = cell.metadata.nbgrader.as_mut() {
        meta.checksum = Some(checksum);
    }
}

/// Formats a float the way Python's `str(float)` does (`2.0`, `0.5`,
/// `1e+16`, `1e-05`).
fn python_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".into();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.into();
    }

    let magnitude = value.abs();
    if magnitude == 0.0 || (1e-4..1e16).contains(&magnitude) {
        return format!("{value:?}");
    }

    let scientific = format!("{value:e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    format!("{mantissa}e{sign}{digits:0>2}")
}

/// Whether the cell still matches the checksum recorded at authoring time.
pub fn is_unchanged(cell: &Cell) -> bool {
    stored_checksum(cell).is_some_and(|stored| stored == compute_checksum(cell))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floats_print_like_python() {
        assert_eq!(python_float(2.0), "2.0");
        assert_eq!(python_float(0.5), "0.5");
        assert_eq!(python_float(0.0), "0.0");
        assert_eq!(python_float(1e15), "1000000000000000.0");
        assert_eq!(python_float(1e16), "1e+16");
        assert_eq!(python_float(1.5e-5), "1.5e-05");
        assert_eq!(python_float(f64::INFINITY), "inf");
    }
}
