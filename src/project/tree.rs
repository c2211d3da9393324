//! Project file-tree summary.
//!
//! Produces the indentation-based folder listing interpolated into every
//! role prompt. Recomputed from disk on demand; exclude globs keep VCS
//! metadata, build output, and the foreman run log out of the summary.

use crate::error::{ForemanError, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::fs;
use std::path::Path;

/// Directories that are never interesting to agents, excluded on top of
/// whatever the config supplies.
const BUILTIN_EXCLUDES: &[&str] = &[".foreman", ".git"];

/// Walk `workdir` and render an indented listing: directories first (with a
/// trailing `/`), two spaces per depth level, entries sorted by name.
pub fn summarize(workdir: &Path, exclude_globs: &[String]) -> Result<String> {
    let excludes = build_globset(exclude_globs)?;
    let mut out = String::new();
    walk(workdir, workdir, &excludes, 0, &mut out)?;
    if out.is_empty() {
        out.push_str("(the project folder is empty)\n");
    }
    Ok(out)
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in BUILTIN_EXCLUDES
        .iter()
        .map(|s| s.to_string())
        .chain(patterns.iter().cloned())
    {
        let glob = Glob::new(&pattern).map_err(|e| {
            ForemanError::UserError(format!("invalid tree exclude glob '{}': {}", pattern, e))
        })?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| ForemanError::UserError(format!("failed to build exclude globs: {}", e)))
}

fn walk(
    root: &Path,
    dir: &Path,
    excludes: &GlobSet,
    depth: usize,
    out: &mut String,
) -> Result<()> {
    let entries = fs::read_dir(dir).map_err(|e| {
        ForemanError::UserError(format!("failed to read directory '{}': {}", dir.display(), e))
    })?;

    let mut names: Vec<(bool, String)> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| {
            ForemanError::UserError(format!("failed to read directory entry: {}", e))
        })?;
        let is_dir = entry.path().is_dir();
        names.push((is_dir, entry.file_name().to_string_lossy().to_string()));
    }
    // Directories first, then files, each sorted by name.
    names.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));

    for (is_dir, name) in names {
        let path = dir.join(&name);
        let relative = path
            .strip_prefix(root)
            .unwrap_or(&path)
            .to_string_lossy()
            .replace('\\', "/");
        if excludes.is_match(&relative) || excludes.is_match(&name) {
            continue;
        }

        let indent = "  ".repeat(depth);
        if is_dir {
            out.push_str(&format!("{}{}/\n", indent, name));
            walk(root, &path, excludes, depth + 1, out)?;
        } else {
            out.push_str(&format!("{}{}\n", indent, name));
        }
    }

    Ok(())
}
