//! Parsing of the `-<n>|` / `+<n>|` hunk notation.

use super::{HunkKind, HunkLine, PatchError};

/// Parse a patch request body (everything after the `[path]` line) into an
/// ordered list of hunk elements.
///
/// Rules:
/// - every non-blank line must be `-<n>|<old>` or `+<n>|<new>`;
/// - line numbers are 1-based and must be non-decreasing in request order;
/// - a line number may not be removed twice;
/// - content after the `|` is taken verbatim (whitespace-significant).
pub fn parse_hunks(body: &str) -> Result<Vec<HunkLine>, PatchError> {
    let mut hunks = Vec::new();
    let mut last_line: usize = 0;
    let mut last_removed: usize = 0;

    for raw_line in body.lines() {
        if raw_line.trim().is_empty() {
            continue;
        }

        let (kind, rest) = match raw_line.as_bytes().first() {
            Some(b'-') => (HunkKind::Remove, &raw_line[1..]),
            Some(b'+') => (HunkKind::Insert, &raw_line[1..]),
            _ => {
                return Err(PatchError::BadHunkLine {
                    text: raw_line.to_string(),
                });
            }
        };

        let Some((number, content)) = rest.split_once('|') else {
            return Err(PatchError::BadHunkLine {
                text: raw_line.to_string(),
            });
        };

        let line: usize = number.trim().parse().map_err(|_| PatchError::BadHunkLine {
            text: raw_line.to_string(),
        })?;
        if line == 0 {
            return Err(PatchError::BadHunkLine {
                text: raw_line.to_string(),
            });
        }

        if line < last_line {
            return Err(PatchError::OutOfOrder { line });
        }
        if kind == HunkKind::Remove {
            if line == last_removed {
                return Err(PatchError::OutOfOrder { line });
            }
            last_removed = line;
        }
        last_line = line;

        hunks.push(HunkLine {
            line,
            kind,
            content: content.to_string(),
        });
    }

    if hunks.is_empty() {
        return Err(PatchError::Empty);
    }

    Ok(hunks)
}
