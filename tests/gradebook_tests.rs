use std::{
    fs,
    path::{Path, PathBuf},
};

use nbgrade::{
    assignment::{AssignmentSettings, AutogradeConflict, AutogradeType},
    gradebook::{Grade, Gradebook, GradebookError},
    notebook::{
        Cell, CellType, GradingMetadata, Notebook, Output,
        scoring::{ScoreExtractor, ScoringError},
    },
    preprocessors::{Preprocessor, PreprocessorError, Resources, SaveAutoGrades},
};
use uuid::Uuid;

fn temp_root() -> PathBuf {
    let root = std::env::temp_dir().join(format!("nbgrade-gradebook-{}", Uuid::new_v4()));
    fs::create_dir_all(&root).expect("create temp root");
    root
}

fn resources(path: &Path) -> Resources {
    Resources::builder()
        .unique_key("ps1")
        .output_json_path(path)
        .build()
}

fn grade_cell(id: &str, points: f64) -> Cell {
    Cell::code("assert True").with_grading(
        GradingMetadata::builder()
            .grade_id(id)
            .grade(true)
            .points(points)
            .build(),
    )
}

#[test]
fn missing_file_opens_empty() {
    let root = temp_root();
    let book = Gradebook::open(root.join("nested").join("gradebook.json")).expect("open");
    assert!(book.model().notebooks.is_empty());
    assert_eq!(book.find_grade("q1", "ps1"), Grade::new("q1"));
    book.commit().expect("commit creates the file");
    assert!(root.join("nested").join("gradebook.json").exists());
    let _ = fs::remove_dir_all(root);
}

#[test]
fn corrupt_file_is_an_error() {
    let root = temp_root();
    let path = root.join("gradebook.json");
    fs::write(&path, "{ not json").expect("write");

    let err = Gradebook::open(&path).expect_err("corrupt gradebook");
    assert!(matches!(err, GradebookError::Corrupt { .. }));
    let _ = fs::remove_dir_all(root);
}

#[test]
fn automated_updates_keep_manual_entries() {
    let root = temp_root();
    let path = root.join("gradebook.json");

    Gradebook::scoped(&path, |book| {
        book.register_grade_cell("ps1", "q1", 10.0, CellType::Code);
        book.set_manual_score("q1", "ps1", 7.0);
        book.set_manual_comment("q1", "ps1", "Nice".into());
        Ok::<_, GradebookError>(())
    })
    .expect("seed gradebook");

    Gradebook::scoped(&path, |book| {
        let mut grade = book.find_grade("q1", "ps1");
        grade.auto_score = Some(9.0);
        grade.manual_score = None;
        book.add_grade("ps1", grade);

        let mut comment = book.find_comment("q1", "ps1");
        comment.auto_comment = Some("auto".into());
        comment.manual_comment = None;
        book.add_comment("ps1", comment);
        Ok::<_, GradebookError>(())
    })
    .expect("update gradebook");

    let book = Gradebook::open(&path).expect("reopen");
    let nb = book.notebook("ps1").expect("notebook");
    let grade = nb.grade("q1").expect("grade");
    assert_eq!(grade.manual_score, Some(7.0));
    assert_eq!(grade.auto_score, Some(9.0));
    assert_eq!(grade.score(), 7.0);
    assert_eq!(nb.comment("q1").and_then(|c| c.manual_comment.clone()), Some("Nice".into()));
    assert_eq!(nb.max_score, 10.0);

    let _ = fs::remove_dir_all(root);
}

#[test]
fn failed_scope_writes_nothing() {
    let root = temp_root();
    let path = root.join("gradebook.json");

    let result = Gradebook::scoped(&path, |book| {
        book.register_grade_cell("ps1", "q1", 1.0, CellType::Code);
        Err::<(), _>(PreprocessorError::Unknown(anyhow::anyhow!("boom")))
    });
    assert!(result.is_err());
    assert!(!path.exists());
    assert_eq!(fs::read_dir(&root).expect("list").count(), 0);

    let _ = fs::remove_dir_all(root);
}

#[test]
fn save_autogrades_flags_manual_review() {
    let root = temp_root();
    let path = root.join("gradebook.json");

    Gradebook::scoped(&path, |book| {
        book.set_manual_score("q1", "ps1", 7.0);
        Ok::<_, GradebookError>(())
    })
    .expect("seed manual score");

    let scored = grade_cell("q1", 10.0).with_outputs(vec![Output::execute_result("9")]);
    let nb = Notebook::new(vec![scored]);
    SaveAutoGrades::default()
        .preprocess(nb, resources(&path))
        .expect("save grades");

    let book = Gradebook::open(&path).expect("reopen");
    let grade = book.notebook("ps1").and_then(|nb| nb.grade("q1")).expect("grade");
    assert_eq!(grade.auto_score, Some(9.0));
    assert_eq!(grade.manual_score, Some(7.0));
    assert!(grade.needs_manual_grade);

    let _ = fs::remove_dir_all(root);
}

#[test]
fn save_autogrades_records_untouched_solutions() {
    let root = temp_root();
    let path = root.join("gradebook.json");

    let untouched = Cell::code("# YOUR CODE HERE").with_grading(
        GradingMetadata::builder()
            .grade_id("s1")
            .solution(true)
            .checksum("78fd73b42ab7fb952e4bf14da541d91f")
            .build(),
    );
    let answered = Cell::code("x = 1")
        .with_grading(
            GradingMetadata::builder()
                .grade_id("s2")
                .solution(true)
                .checksum("stale")
                .build(),
        );
    let task = Cell::markdown("Describe.")
        .with_grading(GradingMetadata::builder().grade_id("t1").task(true).points(4.0).build());

    let nb = Notebook::new(vec![untouched, answered, task, grade_cell("q1", 2.0)]);
    SaveAutoGrades::default()
        .preprocess(nb, resources(&path))
        .expect("save grades");

    let book = Gradebook::open(&path).expect("reopen");
    let model = book.notebook("ps1").expect("notebook");
    let auto = |id: &str| model.comment(id).and_then(|c| c.auto_comment.clone());
    assert_eq!(auto("s1").as_deref(), Some("No response."));
    assert_eq!(auto("s2"), None);
    assert_eq!(auto("t1"), None);
    assert_eq!(model.max_score, 6.0);
    assert!(model.task_cells.contains_key("t1"));
    assert!(!model.needs_manual_grade());

    let _ = fs::remove_dir_all(root);
}

#[test]
fn saved_properties_flag_manual_cells_for_full_auto() {
    let root = temp_root();
    let path = root.join("gradebook.json");

    let answer = Cell::code("def add(a, b):\n    return a + b\n").with_grading(
        GradingMetadata::builder()
            .grade_id("answer")
            .grade(true)
            .solution(true)
            .points(3.0)
            .build(),
    );
    let nb = Notebook::new(vec![answer, grade_cell("q1", 2.0)]);
    SaveAutoGrades::default()
        .preprocess(nb, resources(&path))
        .expect("save grades");

    let book = Gradebook::open(&path).expect("reopen");
    let auto = AssignmentSettings::builder().autograde_type(AutogradeType::Auto).build();
    assert_eq!(auto.check_properties(book.model()), Ok(()));

    let full = AssignmentSettings::builder().autograde_type(AutogradeType::FullAuto).build();
    assert_eq!(
        full.check_properties(book.model()),
        Err(AutogradeConflict::ManualGradeCells {
            notebook: "ps1".into(),
            cells:    vec!["answer".into()],
        })
    );

    let _ = fs::remove_dir_all(root);
}

struct Broken;

impl ScoreExtractor for Broken {
    fn determine_grade(&self, cell: &Cell) -> Result<(Option<f64>, f64), ScoringError> {
        Err(ScoringError::NotGradeCell {
            grade_id: nbgrade::notebook::classify::grade_id(cell).map(str::to_owned),
        })
    }
}

#[test]
fn save_autogrades_is_all_or_nothing() {
    let root = temp_root();
    let path = root.join("gradebook.json");

    let nb = Notebook::new(vec![grade_cell("q1", 1.0), grade_cell("q2", 1.0)]);
    let err = SaveAutoGrades::new(Broken)
        .preprocess(nb, resources(&path))
        .expect_err("scoring fails");
    assert!(matches!(err, PreprocessorError::Scoring(_)));
    assert!(!path.exists());

    let _ = fs::remove_dir_all(root);
}

#[test]
fn save_autogrades_requires_resources() {
    let err = SaveAutoGrades::default()
        .preprocess(Notebook::default(), Resources::builder().unique_key("ps1").build())
        .expect_err("no gradebook path");
    assert!(matches!(
        err,
        PreprocessorError::MissingResource {
            key: "output_json_path",
            ..
        }
    ));
}
