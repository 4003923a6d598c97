use std::{collections::HashMap, path::PathBuf};

use nbgrade::{
    PipelineConfig,
    preprocessors::{LimitOutputConfig, LockConfig},
};

fn config_from(vars: &[(&str, &str)]) -> PipelineConfig {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    PipelineConfig::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn empty_environment_gives_defaults() {
    let config = config_from(&[]);
    assert_eq!(config, PipelineConfig::default());
    assert_eq!(config.lock, LockConfig::default());
    assert!(config.lock.lock_solution_cells);
    assert!(config.lock.lock_grade_cells);
    assert!(config.lock.lock_readonly_cells);
    assert!(!config.lock.lock_all_cells);
    assert!(config.limit_output.is_none());
}

#[test]
fn reads_paths_and_switches() {
    let config = config_from(&[
        ("NBGRADE_HEADER", " header.ipynb "),
        ("NBGRADE_FOOTER", ""),
        ("NBGRADE_LOCK_ALL_CELLS", "yes"),
        ("NBGRADE_LOCK_GRADE_CELLS", "0"),
    ]);

    assert_eq!(config.header, Some(PathBuf::from("header.ipynb")));
    assert_eq!(config.footer, None);
    assert!(config.lock.lock_all_cells);
    assert!(!config.lock.lock_grade_cells);
}

#[test]
fn unparsable_values_fall_back() {
    let config = config_from(&[
        ("NBGRADE_LOCK_SOLUTION_CELLS", "maybe"),
        ("NBGRADE_LIMIT_OUTPUT", "true"),
        ("NBGRADE_MAX_OUTPUT_LINES", "lots"),
        ("NBGRADE_MAX_TRACEBACK_LINES", "-1"),
    ]);

    assert!(config.lock.lock_solution_cells);
    assert_eq!(
        config.limit_output,
        Some(LimitOutputConfig {
            max_lines:     Some(1000),
            max_traceback: None,
        })
    );
}

#[test]
fn builder_matches_documented_defaults() {
    let built = PipelineConfig::builder().header("h.ipynb").build();
    assert_eq!(built.header, Some(PathBuf::from("h.ipynb")));
    assert_eq!(built.lock, LockConfig::default());
    assert_eq!(LimitOutputConfig::default().max_lines, Some(1000));
    assert_eq!(LimitOutputConfig::default().max_traceback, Some(100));
}
