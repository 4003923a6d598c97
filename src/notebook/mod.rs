#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! In-memory representation of nbformat v4 notebooks.
//!
//! Only the parts of the format the grading pipeline inspects are typed;
//! every other key is carried through untouched in an `extra` map so a
//! notebook survives a read/transform/write cycle without losing data.

/// Predicates over grading metadata and content checksums.
pub mod classify;
/// Extraction of automatic scores from executed cells.
pub mod scoring;

use std::{fmt::Display, path::Path};

use anyhow::{Context, Result};
use bon::Builder;
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

/// Major nbformat version written by this crate.
const NBFORMAT: u32 = 4;
/// Minor nbformat version written by this crate.
const NBFORMAT_MINOR: u32 = 5;

/// An ordered sequence of cells plus notebook-level metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notebook {
    /// Cells in document order.
    #[serde(default)]
    pub cells:          Vec<Cell>,
    /// Notebook-level metadata (kernelspec, language info, ...).
    #[serde(default)]
    pub metadata:       Map<String, Value>,
    /// Major format version.
    #[serde(default = "default_nbformat")]
    pub nbformat:       u32,
    /// Minor format version.
    #[serde(default = "default_nbformat_minor")]
    pub nbformat_minor: u32,
}

impl Default for Notebook {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Notebook {
    /// Creates a notebook holding `cells` and empty metadata.
    pub fn new(cells: Vec<Cell>) -> Self {
        Self {
            cells,
            metadata: Map::new(),
            nbformat: NBFORMAT,
            nbformat_minor: NBFORMAT_MINOR,
        }
    }

    /// Parses a notebook from its JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Could not parse notebook JSON")
    }

    /// Serializes the notebook to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Could not serialize notebook")
    }

    /// Reads and parses the notebook stored at `path`.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read notebook {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Invalid notebook {}", path.display()))
    }

    /// Writes the notebook to `path`, replacing any existing file.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)
            .with_context(|| format!("Could not write notebook {}", path.display()))
    }
}

/// Kind of a notebook cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    /// Executable code.
    #[default]
    Code,
    /// Rendered markdown.
    Markdown,
    /// Raw, unrendered text.
    Raw,
}

impl CellType {
    /// The name used for this cell type in the notebook format.
    pub fn as_str(&self) -> &'static str {
        match self {
            CellType::Code => "code",
            CellType::Markdown => "markdown",
            CellType::Raw => "raw",
        }
    }
}

impl Display for CellType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single notebook cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Kind of the cell.
    pub cell_type: CellType,
    /// Cell identifier (nbformat 4.5+).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id:        Option<String>,
    /// Source text, joined if stored as a list of lines.
    #[serde(default, deserialize_with = "multiline")]
    pub source:    String,
    /// Cell metadata, including the grading namespace.
    #[serde(default)]
    pub metadata:  CellMetadata,
    /// Recorded outputs; only present on code cells.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs:   Option<Vec<Output>>,
    /// Keys not modelled above (`execution_count`, `attachments`, ...).
    #[serde(flatten)]
    pub extra:     Map<String, Value>,
}

impl Cell {
    /// Creates a code cell with no outputs and a null execution count.
    pub fn code(source: impl Into<String>) -> Self {
        let mut extra = Map::new();
        extra.insert("execution_count".into(), Value::Null);
        Self {
            cell_type: CellType::Code,
            id: None,
            source: source.into(),
            metadata: CellMetadata::default(),
            outputs: Some(Vec::new()),
            extra,
        }
    }

    /// Creates a markdown cell.
    pub fn markdown(source: impl Into<String>) -> Self {
        Self::of_type(CellType::Markdown, source)
    }

    /// Creates a cell of the given type; code cells get an empty output list.
    pub fn of_type(cell_type: CellType, source: impl Into<String>) -> Self {
        match cell_type {
            CellType::Code => Self::code(source),
            _ => Self {
                cell_type,
                id: None,
                source: source.into(),
                metadata: CellMetadata::default(),
                outputs: None,
                extra: Map::new(),
            },
        }
    }

    /// Attaches grading metadata to the cell.
    pub fn with_grading(mut self, grading: GradingMetadata) -> Self {
        self.metadata.nbgrader = Some(grading);
        self
    }

    /// Replaces the cell's outputs.
    pub fn with_outputs(mut self, outputs: Vec<Output>) -> Self {
        self.outputs = Some(outputs);
        self
    }

    /// Recorded outputs, empty for non-code cells.
    pub fn outputs(&self) -> &[Output] {
        self.outputs.as_deref().unwrap_or_default()
    }
}

/// Cell metadata with the keys the pipeline reads or writes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CellMetadata {
    /// Grading namespace; absent on ordinary cells.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub nbgrader:  Option<GradingMetadata>,
    /// Whether the front end allows deleting the cell.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub deletable: Option<bool>,
    /// Whether the front end allows editing the cell.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub editable:  Option<bool>,
    /// Every other metadata key.
    #[serde(flatten)]
    pub extra:     Map<String, Value>,
}

impl CellMetadata {
    /// True if the metadata holds no keys at all.
    pub fn is_empty(&self) -> bool {
        self.nbgrader.is_none()
            && self.deletable.is_none()
            && self.editable.is_none()
            && self.extra.is_empty()
    }
}

/// The grading namespace of a cell's metadata.
///
/// Every field is optional. Values of the wrong JSON type are read as
/// absent rather than rejected, which keeps classification total over
/// hand-edited notebooks.
#[derive(Debug, Clone, PartialEq, Default, Builder, Serialize, Deserialize)]
pub struct GradingMetadata {
    /// Stable identifier of the gradable unit.
    #[builder(into)]
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub grade_id:       Option<String>,
    /// Cell output is scored.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub grade:          Option<bool>,
    /// Cell content is written by the student.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub solution:       Option<bool>,
    /// Cell is read-only regardless of grading role.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub locked:         Option<bool>,
    /// Cell is a free-form task graded by hand.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub task:           Option<bool>,
    /// Content checksum recorded at authoring time.
    #[builder(into)]
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub checksum:       Option<String>,
    /// Points the cell is worth; numeric strings are accepted.
    #[serde(default, deserialize_with = "lenient_points", skip_serializing_if = "Option::is_none")]
    pub points:         Option<f64>,
    /// Metadata schema version.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<u32>,
    /// Cell type recorded at authoring time.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub cell_type:      Option<CellType>,
}

/// Kind of a recorded cell output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputType {
    /// Text written to stdout or stderr.
    Stream,
    /// Rich display output.
    DisplayData,
    /// Value of the last expression of a cell.
    ExecuteResult,
    /// Uncaught exception.
    Error,
}

/// A recorded output of a code cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Output {
    /// Kind of output.
    pub output_type: OutputType,
    /// Stream name (`stdout` / `stderr`) for stream outputs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name:        Option<String>,
    /// Stream text.
    #[serde(default, deserialize_with = "multiline_opt", skip_serializing_if = "Option::is_none")]
    pub text:        Option<String>,
    /// Mime bundle for display and execute-result outputs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data:        Option<Map<String, Value>>,
    /// Traceback lines for error outputs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traceback:   Option<Vec<String>>,
    /// Keys not modelled above (`ename`, `evalue`, `execution_count`, ...).
    #[serde(flatten)]
    pub extra:       Map<String, Value>,
}

impl Output {
    /// A stream output on `name` (`stdout` or `stderr`).
    pub fn stream(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            output_type: OutputType::Stream,
            name:        Some(name.into()),
            text:        Some(text.into()),
            data:        None,
            traceback:   None,
            extra:       Map::new(),
        }
    }

    /// An execute-result output whose plain-text representation is `text`.
    pub fn execute_result(text: impl Into<String>) -> Self {
        let mut data = Map::new();
        data.insert("text/plain".into(), Value::String(text.into()));
        let mut extra = Map::new();
        extra.insert("metadata".into(), Value::Object(Map::new()));
        extra.insert("execution_count".into(), Value::Null);
        Self {
            output_type: OutputType::ExecuteResult,
            name: None,
            text: None,
            data: Some(data),
            traceback: None,
            extra,
        }
    }

    /// An error output with the given exception name, value and traceback.
    pub fn error(
        ename: impl Into<String>,
        evalue: impl Into<String>,
        traceback: Vec<String>,
    ) -> Self {
        let mut extra = Map::new();
        extra.insert("ename".into(), Value::String(ename.into()));
        extra.insert("evalue".into(), Value::String(evalue.into()));
        Self {
            output_type: OutputType::Error,
            name: None,
            text: None,
            data: None,
            traceback: Some(traceback),
            extra,
        }
    }

    /// The `text/plain` representation, if the output carries one.
    pub fn text_plain(&self) -> Option<String> {
        match self.data.as_ref()?.get("text/plain")? {
            Value::String(s) => Some(s.clone()),
            Value::Array(lines) => Some(lines.iter().filter_map(Value::as_str).collect()),
            _ => None,
        }
    }
}

/// Default for [`Notebook::nbformat`].
fn default_nbformat() -> u32 {
    NBFORMAT
}

/// Default for [`Notebook::nbformat_minor`].
fn default_nbformat_minor() -> u32 {
    NBFORMAT_MINOR
}

/// nbformat stores multiline strings either whole or as a list of lines.
#[derive(Deserialize)]
#[serde(untagged)]
enum Multiline {
    /// Stored as one string.
    One(String),
    /// Stored as a list of lines, each keeping its newline.
    Many(Vec<String>),
}

impl From<Multiline> for String {
    fn from(value: Multiline) -> Self {
        match value {
            Multiline::One(s) => s,
            Multiline::Many(lines) => lines.concat(),
        }
    }
}

/// Deserializes a multiline string field.
fn multiline<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Multiline::deserialize(deserializer).map(String::from)
}

/// Deserializes an optional multiline string field.
fn multiline_opt<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Multiline>::deserialize(deserializer).map(|v| v.map(String::from))
}

/// Reads any JSON value and keeps it only if it has the expected type.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Reads a point value given either as a number or a numeric string.
fn lenient_points<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}
