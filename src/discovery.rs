//! Resolving CLI arguments to candidate skill directories.
//!
//! The validator owns all reading of a skill's files; discovery only
//! decides *which* directories to hand it. A path that turns out not to
//! contain a SKILL.md still becomes a candidate, so the validator can
//! report `skill-file-missing` instead of the CLI crashing.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::skill::SKILL_FILE_NAME;

/// Resolve CLI path arguments to skill directories, sorted and deduplicated.
///
/// - no paths: discover every skill under the current directory;
/// - a directory with its own SKILL.md: that directory;
/// - a directory without one: searched recursively (a marketplace scan);
///   if the search finds nothing the directory itself is the candidate;
/// - a SKILL.md file: its parent directory;
/// - anything else (including nonexistent paths): the path as given, left
///   for the validator to report on.
pub fn collect_skill_dirs(paths: &[PathBuf]) -> Vec<PathBuf> {
    if paths.is_empty() {
        let root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        return discover_skill_dirs(&root);
    }

    let mut dirs = BTreeSet::new();

    for path in paths {
        if path.is_dir() {
            if path.join(SKILL_FILE_NAME).is_file() {
                dirs.insert(path.clone());
            } else {
                let found = discover_skill_dirs(path);
                if found.is_empty() {
                    dirs.insert(path.clone());
                } else {
                    dirs.extend(found);
                }
            }
            continue;
        }

        if path.is_file()
            && path
                .file_name()
                .is_some_and(|name| name.eq_ignore_ascii_case(SKILL_FILE_NAME))
        {
            if let Some(parent) = path.parent() {
                dirs.insert(parent.to_path_buf());
                continue;
            }
        }

        dirs.insert(path.clone());
    }

    dirs.into_iter().collect()
}

/// Every directory under `root` holding a SKILL.md, in sorted walk order.
pub fn discover_skill_dirs(root: &Path) -> Vec<PathBuf> {
    let mut dirs = BTreeSet::new();

    let walker = WalkDir::new(root).follow_links(false).sort_by_file_name();
    for entry in walker.into_iter().filter_map(Result::ok) {
        if entry.file_type().is_file() && entry.file_name() == SKILL_FILE_NAME {
            if let Some(parent) = entry.path().parent() {
                dirs.insert(parent.to_path_buf());
            }
        }
    }

    dirs.into_iter().collect()
}

/// Format a path for output, relative to the current directory when possible.
pub fn display_path(path: &Path) -> String {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(Path::to_path_buf))
        .map_or_else(|| path.display().to_string(), |rel| rel.display().to_string())
}
