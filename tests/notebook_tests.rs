use nbgrade::notebook::{
    Cell, CellType, GradingMetadata, Notebook, Output,
    classify::{
        compute_checksum, grade_id, is_grade, is_graded_unit, is_locked, is_solution, is_task,
        is_unchanged, points, stamp_checksum,
    },
    scoring::{OutputScoreExtractor, ScoreExtractor, ScoringError},
};

const NOTEBOOK: &str = r#"{
  "cells": [
    {
      "cell_type": "code",
      "id": "a1",
      "execution_count": 3,
      "source": ["def add(a, b):\n", "    return a + b\n"],
      "metadata": {
        "nbgrader": {"grade_id": "add", "solution": true, "grade": false, "locked": false, "schema_version": 3},
        "tags": ["answer"]
      },
      "outputs": [{"output_type": "stream", "name": "stdout", "text": ["hi\n", "there\n"]}]
    },
    {
      "cell_type": "markdown",
      "source": "Explain.",
      "metadata": {"nbgrader": {"grade": "yes", "task": true, "points": "2.5", "grade_id": 5}}
    },
    {
      "cell_type": "raw",
      "source": "",
      "metadata": {"nbgrader": "not an object", "editable": "nope"}
    }
  ],
  "metadata": {"kernelspec": {"name": "python3"}},
  "nbformat": 4,
  "nbformat_minor": 5
}"#;

#[test]
fn reads_multiline_sources_and_keeps_unknown_keys() {
    let nb = Notebook::from_json(NOTEBOOK).expect("parse notebook");

    assert_eq!(nb.cells.len(), 3);
    assert_eq!(nb.cells[0].source, "def add(a, b):\n    return a + b\n");
    assert_eq!(nb.cells[0].outputs()[0].text.as_deref(), Some("hi\nthere\n"));
    assert_eq!(nb.cells[0].extra["execution_count"], 3);
    assert_eq!(nb.cells[0].metadata.extra["tags"][0], "answer");
    assert!(nb.metadata.contains_key("kernelspec"));

    let again = Notebook::from_json(&nb.to_json().expect("serialize")).expect("reparse");
    assert_eq!(again, nb);
}

#[test]
fn malformed_metadata_reads_as_absent() {
    let nb = Notebook::from_json(NOTEBOOK).expect("parse notebook");
    let task = &nb.cells[1];
    let raw = &nb.cells[2];

    assert!(!is_grade(task));
    assert!(is_task(task));
    assert_eq!(points(task), 2.5);
    assert_eq!(grade_id(task), None);

    assert!(raw.metadata.nbgrader.is_none());
    assert!(raw.metadata.editable.is_none());
    assert!(!is_graded_unit(raw));
    assert!(!is_locked(raw));
    assert_eq!(points(raw), 0.0);
}

#[test]
fn classifies_solution_cell() {
    let nb = Notebook::from_json(NOTEBOOK).expect("parse notebook");
    let cell = &nb.cells[0];

    assert!(is_solution(cell));
    assert!(!is_grade(cell));
    assert!(is_graded_unit(cell));
    assert_eq!(grade_id(cell), Some("add"));
}

#[test]
fn negative_points_count_as_zero() {
    let cell = Cell::code("x")
        .with_grading(GradingMetadata::builder().grade(true).points(-3.0).build());
    assert_eq!(points(&cell), 0.0);
}

#[test]
fn checksum_ignores_front_end_flags() {
    let base = Cell::code("x = 1\ny = 2\n").with_grading(
        GradingMetadata::builder()
            .grade_id("q1")
            .grade(true)
            .points(2.0)
            .build(),
    );
    let reference = compute_checksum(&base);
    assert_eq!(reference.len(), 32);

    let mut locked = base.clone();
    locked.metadata.deletable = Some(false);
    locked.metadata.editable = Some(false);
    assert_eq!(compute_checksum(&locked), reference);

    let mut as_task = base.clone();
    if let Some(meta) = as_task.metadata.nbgrader.as_mut() {
        meta.task = Some(true);
    }
    assert_eq!(compute_checksum(&as_task), reference);

    let mut edited = base.clone();
    edited.source.push_str("z = 3\n");
    assert_ne!(compute_checksum(&edited), reference);

    let mut repointed = base.clone();
    if let Some(meta) = repointed.metadata.nbgrader.as_mut() {
        meta.points = Some(3.0);
    }
    assert_ne!(compute_checksum(&repointed), reference);

    let as_markdown = Cell {
        cell_type: CellType::Markdown,
        ..base.clone()
    };
    assert_ne!(compute_checksum(&as_markdown), reference);
}

#[test]
fn unchanged_compares_stored_checksum() {
    let mut cell = Cell::code("# YOUR CODE HERE")
        .with_grading(GradingMetadata::builder().grade_id("q2").solution(true).build());
    assert!(!is_unchanged(&cell));

    stamp_checksum(&mut cell);
    assert!(is_unchanged(&cell));

    cell.source = "answer = 42".into();
    assert!(!is_unchanged(&cell));
}

#[test]
fn checksum_matches_authoring_tool_output() {
    // Checksums as written by nbgrader-format authoring tools.
    let solution = Cell::code("# YOUR CODE HERE")
        .with_grading(GradingMetadata::builder().grade_id("s1").solution(true).build());
    assert_eq!(compute_checksum(&solution), "78fd73b42ab7fb952e4bf14da541d91f");

    let tests = Cell::code("assert add(1, 2) == 3").with_grading(graded(2.0));
    assert_eq!(compute_checksum(&tests), "98c67abaf309999f2d7e19c3e3511397");

    let essay = Cell::markdown("YOUR ANSWER HERE").with_grading(
        GradingMetadata::builder()
            .grade_id("essay")
            .grade(true)
            .solution(true)
            .points(5.0)
            .build(),
    );
    assert_eq!(compute_checksum(&essay), "c968018a9a2c1392059412233d80eb28");
}

#[test]
fn stamped_notebook_from_json_reads_as_unchanged() {
    let json = r##"{
      "cells": [{
        "cell_type": "code",
        "source": ["# YOUR CODE HERE"],
        "metadata": {"nbgrader": {
          "grade_id": "s1", "solution": true, "grade": false, "locked": false,
          "checksum": "78fd73b42ab7fb952e4bf14da541d91f"
        }},
        "outputs": []
      }],
      "metadata": {}, "nbformat": 4, "nbformat_minor": 5
    }"##;
    let nb = Notebook::from_json(json).expect("parse notebook");
    assert!(is_unchanged(&nb.cells[0]));
}

fn graded(points: f64) -> GradingMetadata {
    GradingMetadata::builder()
        .grade_id("tests")
        .grade(true)
        .points(points)
        .build()
}

#[test]
fn scores_from_outputs() {
    let extractor = OutputScoreExtractor;

    let passing = Cell::code("assert add(1, 2) == 3").with_grading(graded(4.0));
    assert_eq!(extractor.determine_grade(&passing).expect("score"), (Some(4.0), 4.0));

    let failing = passing
        .clone()
        .with_outputs(vec![Output::error("AssertionError", "", vec!["Traceback".into()])]);
    assert_eq!(extractor.determine_grade(&failing).expect("score"), (Some(0.0), 4.0));

    let noisy = passing
        .clone()
        .with_outputs(vec![Output::stream("stderr", "warning\n")]);
    assert_eq!(extractor.determine_grade(&noisy).expect("score"), (Some(0.0), 4.0));

    let partial = passing.clone().with_outputs(vec![Output::execute_result("1.5")]);
    assert_eq!(extractor.determine_grade(&partial).expect("score"), (Some(1.5), 4.0));

    let too_much = passing.clone().with_outputs(vec![Output::execute_result("10")]);
    assert_eq!(extractor.determine_grade(&too_much).expect("score"), (Some(4.0), 4.0));

    let text = passing.with_outputs(vec![Output::execute_result("'done'")]);
    assert_eq!(extractor.determine_grade(&text).expect("score"), (Some(4.0), 4.0));
}

#[test]
fn manual_cells_need_a_human() {
    let extractor = OutputScoreExtractor;

    let mut answer = Cell::markdown("YOUR ANSWER HERE").with_grading(
        GradingMetadata::builder()
            .grade_id("essay")
            .grade(true)
            .solution(true)
            .points(5.0)
            .build(),
    );
    stamp_checksum(&mut answer);
    assert_eq!(extractor.determine_grade(&answer).expect("score"), (Some(0.0), 5.0));

    answer.source = "A thoughtful answer.".into();
    assert_eq!(extractor.determine_grade(&answer).expect("score"), (None, 5.0));

    let plain = Cell::code("print(1)");
    assert!(matches!(
        extractor.determine_grade(&plain),
        Err(ScoringError::NotGradeCell { grade_id: None })
    ));
}
