#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Automatic comment recorded for solution cells left untouched by the
/// student.
pub const NO_RESPONSE: &str = "No response.";

/// Default number of stream output lines kept per code cell.
pub const DEFAULT_MAX_OUTPUT_LINES: usize = 1000;

/// Default number of traceback lines kept per error output.
pub const DEFAULT_MAX_TRACEBACK_LINES: usize = 100;

/// Marker appended when stream output is cut short.
pub const OUTPUT_TRUNCATED: &str = "... Output truncated ...";

/// Marker inserted in the middle of a shortened traceback.
pub const TRACEBACK_TRUNCATED: &str = "... Traceback truncated ...";

/// Delimiter opening a region that is stripped from released notebooks.
pub const BEGIN_MARK_SCHEME: &str = "BEGIN MARK SCHEME";

/// Delimiter closing a region that is stripped from released notebooks.
pub const END_MARK_SCHEME: &str = "END MARK SCHEME";

/// Notebook-level metadata key removed together with mark scheme regions.
pub const CELL_TOOLBAR_KEY: &str = "celltoolbar";

/// Environment variable naming the header notebook.
pub const ENV_HEADER: &str = "NBGRADE_HEADER";

/// Environment variable naming the footer notebook.
pub const ENV_FOOTER: &str = "NBGRADE_FOOTER";

/// Environment variable toggling solution cell locking.
pub const ENV_LOCK_SOLUTION_CELLS: &str = "NBGRADE_LOCK_SOLUTION_CELLS";

/// Environment variable toggling grade cell locking.
pub const ENV_LOCK_GRADE_CELLS: &str = "NBGRADE_LOCK_GRADE_CELLS";

/// Environment variable toggling read-only cell locking.
pub const ENV_LOCK_READONLY_CELLS: &str = "NBGRADE_LOCK_READONLY_CELLS";

/// Environment variable toggling locking of every cell.
pub const ENV_LOCK_ALL_CELLS: &str = "NBGRADE_LOCK_ALL_CELLS";

/// Environment variable enabling the output limiting stage.
pub const ENV_LIMIT_OUTPUT: &str = "NBGRADE_LIMIT_OUTPUT";

/// Environment variable overriding the stream line limit (`-1` disables it).
pub const ENV_MAX_OUTPUT_LINES: &str = "NBGRADE_MAX_OUTPUT_LINES";

/// Environment variable overriding the traceback line limit (`-1` disables
/// it).
pub const ENV_MAX_TRACEBACK_LINES: &str = "NBGRADE_MAX_TRACEBACK_LINES";
