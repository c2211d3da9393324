//! Line-indexed patch engine for foreman.
//!
//! Agents edit files through a custom diff notation instead of a standard
//! patch format. A request body pairs removed lines (`-<n>|<old>`) with
//! inserted lines (`+<n>|<new>`), both addressed against the ORIGINAL
//! file's 1-based line numbers:
//!
//! ```text
//! -12|def hello():
//! +12|def hello(name):
//! -37|    updater.start_polling()    updater.idle()
//! +37|    updater.start_polling()
//! +38|    updater.idle()
//! ```
//!
//! Application is deterministic and conflict-detecting: every `-` element
//! must exactly reproduce the current content at its stated line number, or
//! the whole patch is refused naming the first mismatched line. There is no
//! fuzzy matching, and application is all-or-nothing.

mod apply;
mod parser;


pub use apply::apply;
pub use parser::parse_hunks;

use thiserror::Error;

/// Whether a hunk element removes an original line or inserts a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HunkKind {
    /// `-<n>|` — assert-and-remove original line n.
    Remove,
    /// `+<n>|` — emit this line at position n of the original numbering.
    Insert,
}

/// One element of a patch request, keyed by original line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HunkLine {
    /// 1-based line number in the original file.
    pub line: usize,
    pub kind: HunkKind,
    /// Line content, verbatim (everything after the `|`).
    pub content: String,
}

/// A patch request that could not be parsed or applied.
///
/// These surface to agents as in-band result text; the file is never
/// partially written.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatchError {
    /// A body line did not match `-<n>|<old>` or `+<n>|<new>`.
    #[error("invalid patch line '{text}': expected '-<line>|<old text>' or '+<line>|<new text>'")]
    BadHunkLine { text: String },

    /// Hunk line numbers must be non-decreasing in request order.
    #[error("patch hunks out of order at line {line}: line numbers must be non-decreasing")]
    OutOfOrder { line: usize },

    /// A `-` element referenced a line past the end of the file.
    #[error("patch references line {line} but the file has only {file_lines} lines")]
    MissingLine { line: usize, file_lines: usize },

    /// The file content at a removed line no longer matches the patch.
    #[error(
        "patch conflict at line {line}: expected '{expected}' but the file contains '{found}'"
    )]
    Conflict {
        line: usize,
        expected: String,
        found: String,
    },

    /// The request body contained no hunk lines at all.
    #[error("patch request contains no hunk lines")]
    Empty,
}
