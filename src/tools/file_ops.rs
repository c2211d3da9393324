//! File-editing tools: WriteFile, ReadFile, PatchFile.
//!
//! All three operate relative to a project workdir and return their errors
//! in-band. WriteFile and PatchFile share the bracketed-path request format:
//! the first line is `[<path>]`, the remaining lines are the payload.

use crate::patch::{apply, parse_hunks};
use crate::tools::Tool;
use regex::Regex;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

static BRACKETED_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\[(.+)\]\s*$").expect("valid path regex"));

static LINE_RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?)\[(\d+):(\d+)\]$").expect("valid range regex"));

/// Split a `[path]` first line from the rest of the request.
///
/// Returns the path and the payload (everything after the first newline,
/// verbatim). `None` when the first line is not a bracketed path.
fn split_bracketed_request(input: &str) -> Option<(&str, &str)> {
    let (first_line, rest) = match input.split_once('\n') {
        Some((first, rest)) => (first, rest),
        None => (input, ""),
    };
    let captures = BRACKETED_PATH.captures(first_line)?;
    let path = captures.get(1)?.as_str();
    Some((path, rest))
}

const PATH_ERROR: &str =
    "PathError: provide the target file path in brackets on the first line, like [dir/file.ext].";

/// Resolve a request path against the workdir, refusing escapes.
fn resolve_in_workdir(workdir: &Path, request_path: &str) -> Result<PathBuf, String> {
    let relative = Path::new(request_path.trim());
    if relative.is_absolute()
        || relative
            .components()
            .any(|c| matches!(c, Component::ParentDir))
    {
        return Err(format!(
            "PathError: '{}' must be a relative path inside the project",
            request_path
        ));
    }
    Ok(workdir.join(relative))
}

/// Overwrites a file with new content, creating directories as needed.
///
/// The entire prior content is lost; agents are prompted to use this only
/// for new or trivial files and to patch everything else.
pub struct WriteFile {
    workdir: PathBuf,
}

impl WriteFile {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }
}

impl Tool for WriteFile {
    fn name(&self) -> &str {
        "WriteFile"
    }

    fn description(&self) -> &str {
        "Write a file. The input starts with the target path in brackets, like [dir/file.ext], \
         and everything from the next line on is the desired content. The entire file is \
         overwritten. Use this only for new or very small files; patch existing files instead."
    }

    fn invoke(&self, input: &str) -> String {
        let Some((request_path, content)) = split_bracketed_request(input) else {
            return PATH_ERROR.to_string();
        };

        let path = match resolve_in_workdir(&self.workdir, request_path) {
            Ok(path) => path,
            Err(message) => return message,
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = fs::create_dir_all(parent)
        {
            return format!("IOError: failed to create directory for '{}': {}", request_path, e);
        }

        match fs::write(&path, content) {
            Ok(()) => format!("Successfully written to {}.", request_path.trim()),
            Err(e) => format!("IOError: failed to write '{}': {}", request_path, e),
        }
    }
}

/// Returns file content, optionally restricted to a 1-based line range.
///
/// The input is a bare path, optionally suffixed with `[start:end]`
/// (inclusive), e.g. `src/main.rs[10:25]`.
pub struct ReadFile {
    workdir: PathBuf,
}

impl ReadFile {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }
}

impl Tool for ReadFile {
    fn name(&self) -> &str {
        "ReadFile"
    }

    fn description(&self) -> &str {
        "Read a file. The input is the file path, optionally with a 1-based inclusive line \
         range like src/main.rs[10:25]. Prefer ranges over reading big files whole."
    }

    fn invoke(&self, input: &str) -> String {
        let request = input.trim();
        let (request_path, range) = match LINE_RANGE.captures(request) {
            Some(captures) => {
                let start: usize = captures[2].parse().unwrap_or(0);
                let end: usize = captures[3].parse().unwrap_or(0);
                (captures.get(1).map_or("", |m| m.as_str()).to_string(), Some((start, end)))
            }
            None => (request.to_string(), None),
        };

        let path = match resolve_in_workdir(&self.workdir, &request_path) {
            Ok(path) => path,
            Err(message) => return message,
        };

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => return format!("IOError: failed to read '{}': {}", request_path.trim(), e),
        };

        match range {
            None => content,
            Some((start, end)) if start == 0 || end < start => format!(
                "PathError: invalid line range [{}:{}], expected 1-based [start:end]",
                start, end
            ),
            Some((start, end)) => content
                .lines()
                .skip(start - 1)
                .take(end - start + 1)
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// Applies a line-indexed patch to an existing file.
///
/// The input starts with `[<path>]`; the remaining lines are `-<n>|` /
/// `+<n>|` hunks against the file's current line numbers. Application is
/// all-or-nothing: on any conflict the file is left untouched.
pub struct PatchFile {
    workdir: PathBuf,
}

impl PatchFile {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }
}

impl Tool for PatchFile {
    fn name(&self) -> &str {
        "PatchFile"
    }

    fn description(&self) -> &str {
        "Patch a file. The input starts with the target path in brackets, like [dir/file.ext], \
         followed by hunk lines pairing removals '-<line>|<old text>' with insertions \
         '+<line>|<new text>', addressed against the file's current line numbers. Read the \
         region first so the '-' lines match exactly."
    }

    fn invoke(&self, input: &str) -> String {
        let Some((request_path, body)) = split_bracketed_request(input) else {
            return PATH_ERROR.to_string();
        };

        let path = match resolve_in_workdir(&self.workdir, request_path) {
            Ok(path) => path,
            Err(message) => return message,
        };

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => return format!("IOError: failed to read '{}': {}", request_path.trim(), e),
        };

        let hunks = match parse_hunks(body) {
            Ok(hunks) => hunks,
            Err(e) => return format!("Error parsing patch: {}", e),
        };

        // Preserve the presence or absence of a trailing newline.
        let had_trailing_newline = content.ends_with('\n');
        let original: Vec<String> = {
            let mut lines: Vec<String> = content.split('\n').map(str::to_string).collect();
            if had_trailing_newline {
                lines.pop();
            }
            lines
        };

        let patched = match apply(&original, &hunks) {
            Ok(patched) => patched,
            Err(e) => return format!("Error applying patch: {}", e),
        };

        let mut new_content = patched.join("\n");
        if had_trailing_newline {
            new_content.push('\n');
        }

        match fs::write(&path, new_content) {
            Ok(()) => format!("Successfully applied patch to {}.", request_path.trim()),
            Err(e) => format!("IOError: failed to write '{}': {}", request_path, e),
        }
    }
}

/// The standard file tool set rooted at a workdir.
pub fn file_tools(workdir: &Path) -> Vec<Box<dyn Tool>> {
    vec![
        Box::new(WriteFile::new(workdir)),
        Box::new(ReadFile::new(workdir)),
        Box::new(PatchFile::new(workdir)),
    ]
}
