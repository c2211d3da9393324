//! Patch application against an original line buffer.

use std::collections::BTreeMap;

use super::{HunkKind, HunkLine, PatchError};

/// Apply hunks to the original lines, producing the new lines.
///
/// The output is built by walking original lines in order: a removed line
/// is checked against its `-` content and skipped; `+` elements are emitted
/// at the position dictated by their own line numbers (before the original
/// line carrying that number, or at end of file for numbers past EOF);
/// unmentioned lines pass through unchanged.
///
/// Application is all-or-nothing: any conflict returns an error and the
/// original buffer is untouched. A patch whose `-` side no longer matches
/// the file (the file drifted since the patch was authored) is refused
/// naming the first mismatched line, rather than silently corrupting
/// content.
pub fn apply(original: &[String], hunks: &[HunkLine]) -> Result<Vec<String>, PatchError> {
    let mut removes: BTreeMap<usize, &str> = BTreeMap::new();
    let mut inserts: BTreeMap<usize, Vec<&str>> = BTreeMap::new();

    for hunk in hunks {
        match hunk.kind {
            HunkKind::Remove => {
                removes.insert(hunk.line, &hunk.content);
            }
            HunkKind::Insert => {
                inserts.entry(hunk.line).or_default().push(&hunk.content);
            }
        }
    }

    // Validate every removal target exists before emitting anything.
    if let Some((&line, _)) = removes.last_key_value()
        && line > original.len()
    {
        let &first_missing = removes
            .keys()
            .find(|&&l| l > original.len())
            .unwrap_or(&line);
        return Err(PatchError::MissingLine {
            line: first_missing,
            file_lines: original.len(),
        });
    }

    let mut output = Vec::with_capacity(original.len());

    for (index, current) in original.iter().enumerate() {
        let line = index + 1;

        if let Some(added) = inserts.get(&line) {
            output.extend(added.iter().map(|s| s.to_string()));
        }

        match removes.get(&line) {
            Some(&expected) => {
                if current != expected {
                    return Err(PatchError::Conflict {
                        line,
                        expected: expected.to_string(),
                        found: current.clone(),
                    });
                }
                // Removed: aligned `+` elements (if any) were emitted above.
            }
            None => output.push(current.clone()),
        }
    }

    // Insertions addressed past the end of the original file append in order.
    for (_, added) in inserts.range(original.len() + 1..) {
        output.extend(added.iter().map(|s| s.to_string()));
    }

    Ok(output)
}
