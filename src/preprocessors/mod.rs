#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Notebook-to-notebook transformations run in a fixed order over one
//! submission.

/// Strips instructor-only mark scheme regions.
pub mod clear_mark_scheme;
/// Clears grading metadata from cells reusing a grade id.
pub mod deduplicate_ids;
/// Prepends and appends cells from header and footer notebooks.
pub mod header_footer;
/// Truncates oversized stream output and tracebacks.
pub mod limit_output;
/// Marks cells non-deletable and non-editable.
pub mod lock_cells;
/// Writes automatic scores and comments into the gradebook.
pub mod save_autogrades;

use std::path::PathBuf;

use bon::Builder;
use thiserror::Error;

pub use clear_mark_scheme::ClearMarkScheme;
pub use deduplicate_ids::DeduplicateIds;
pub use header_footer::IncludeHeaderFooter;
pub use limit_output::{LimitOutput, LimitOutputConfig};
pub use lock_cells::{LockCells, LockConfig};
pub use save_autogrades::SaveAutoGrades;

use crate::{
    config::PipelineConfig,
    gradebook::GradebookError,
    notebook::{Notebook, scoring::ScoringError},
};

/// Per-run context handed from stage to stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Builder)]
pub struct Resources {
    /// Identifier of the notebook being graded.
    #[builder(into)]
    pub unique_key:       Option<String>,
    /// Location of the gradebook file for this run.
    #[builder(into)]
    pub output_json_path: Option<PathBuf>,
}

/// Errors raised by preprocessing stages.
#[derive(Error, Debug)]
pub enum PreprocessorError {
    /// A stage needs a resource the caller did not provide.
    #[error("{stage} requires the `{key}` resource")]
    MissingResource {
        /// Name of the stage.
        stage: &'static str,
        /// Name of the missing resource.
        key:   &'static str,
    },

    /// A header or footer notebook could not be loaded.
    #[error("Could not include {kind} notebook {}", .path.display())]
    Include {
        /// `header` or `footer`.
        kind:   &'static str,
        /// Configured path.
        path:   PathBuf,
        /// What went wrong while reading or parsing it.
        #[source]
        source: anyhow::Error,
    },

    /// A mark scheme region is malformed or misplaced.
    #[error("Mark scheme error in cell {cell_index}: {message}")]
    MarkScheme {
        /// Position of the cell in the notebook.
        cell_index: usize,
        /// What is wrong with the region.
        message:    String,
    },

    /// A grade cell could not be scored.
    #[error(transparent)]
    Scoring(#[from] ScoringError),

    /// The gradebook could not be read or written.
    #[error(transparent)]
    Gradebook(#[from] GradebookError),

    /// A stage of a pipeline failed.
    #[error("Stage {stage} failed")]
    Stage {
        /// Name of the failing stage.
        stage:  &'static str,
        /// The stage's error.
        #[source]
        source: Box<PreprocessorError>,
    },

    /// Anything else.
    #[error("Unknown error: {0}")]
    Unknown(#[from] anyhow::Error),
}

/// A single transformation step.
pub trait Preprocessor {
    /// Short name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Transforms the notebook, possibly updating the resources.
    fn preprocess(
        &self,
        nb: Notebook,
        resources: Resources,
    ) -> Result<(Notebook, Resources), PreprocessorError>;
}

/// An ordered list of stages.
#[derive(Default)]
pub struct Pipeline {
    /// Stages in execution order.
    stages: Vec<Box<dyn Preprocessor>>,
}

impl Pipeline {
    /// An empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// The autograding pipeline: deduplicate ids, include header and
    /// footer, lock cells, optionally limit output, then save scores.
    pub fn autograde(config: &PipelineConfig) -> Self {
        let mut pipeline = Self::new()
            .with_stage(DeduplicateIds)
            .with_stage(IncludeHeaderFooter::new(config.header.clone(), config.footer.clone()))
            .with_stage(LockCells::new(config.lock));

        if let Some(limits) = config.limit_output {
            pipeline = pipeline.with_stage(LimitOutput::new(limits));
        }

        pipeline.with_stage(SaveAutoGrades::default())
    }

    /// Appends a stage.
    pub fn with_stage(mut self, stage: impl Preprocessor + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Names of the stages, in order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Runs every stage in order, stopping at the first failure.
    pub fn run(
        &self,
        nb: Notebook,
        resources: Resources,
    ) -> Result<(Notebook, Resources), PreprocessorError> {
        let span = tracing::info_span!("pipeline", notebook = ?resources.unique_key);
        let _enter = span.enter();

        self.stages
            .iter()
            .try_fold((nb, resources), |(nb, resources), stage| {
                tracing::debug!("Running {}", stage.name());
                stage
                    .preprocess(nb, resources)
                    .map_err(|e| PreprocessorError::Stage {
                        stage:  stage.name(),
                        source: Box::new(e),
                    })
            })
    }
}
