use std::path::{Path, PathBuf};

use super::{Preprocessor, PreprocessorError, Resources};
use crate::notebook::{Cell, Notebook};

/// Concatenates the cells of a header notebook, the submission and a footer
/// notebook.
#[derive(Debug, Clone, Default)]
pub struct IncludeHeaderFooter {
    /// Notebook whose cells go first.
    header: Option<PathBuf>,
    /// Notebook whose cells go last.
    footer: Option<PathBuf>,
}

impl IncludeHeaderFooter {
    /// A stage including the given notebooks; `None` skips that side.
    pub fn new(header: Option<PathBuf>, footer: Option<PathBuf>) -> Self {
        Self { header, footer }
    }

    /// Reads the cells of an included notebook.
    fn load(kind: &'static str, path: &Path) -> Result<Vec<Cell>, PreprocessorError> {
        Notebook::read(path)
            .map(|nb| nb.cells)
            .map_err(|source| PreprocessorError::Include {
                kind,
                path: path.to_path_buf(),
                source,
            })
    }
}

impl Preprocessor for IncludeHeaderFooter {
    fn name(&self) -> &'static str {
        "IncludeHeaderFooter"
    }

    fn preprocess(
        &self,
        mut nb: Notebook,
        resources: Resources,
    ) -> Result<(Notebook, Resources), PreprocessorError> {
        if self.header.is_none() && self.footer.is_none() {
            return Ok((nb, resources));
        }

        let mut cells = match &self.header {
            Some(path) => Self::load("header", path)?,
            None => Vec::new(),
        };
        cells.append(&mut nb.cells);
        if let Some(path) = &self.footer {
            cells.extend(Self::load("footer", path)?);
        }

        nb.cells = cells;
        Ok((nb, resources))
    }
}
