//! Structural checks over the skill directory tree.
//!
//! These run after the frontmatter stages and never touch the file
//! contents beyond sniffing: nothing here executes a script, evaluates
//! metadata, or follows a link outside the skill directory. Walks are
//! sorted by file name so repeated runs produce identical reports.
//!
//! Everything in this module is advisory except the symlink guard: a
//! symlink whose resolved path escapes the skill directory is an error
//! because packaging such a skill would leak files from outside it.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::ValidateError;
use crate::report::{Code, Finding, Location};
use crate::skill::{MAX_SKILL_FILE_BYTES, SKILL_FILE_NAME};

/// How many leading bytes to sniff when deciding whether a file is binary.
const SNIFF_BYTES: usize = 8192;

/// Interpreters we recognize in shebang lines, with the file extensions
/// conventionally used for each.
const INTERPRETER_EXTENSIONS: [(&str, &[&str]); 7] = [
    ("python", &["py"]),
    ("python3", &["py"]),
    ("sh", &["sh"]),
    ("bash", &["sh", "bash"]),
    ("node", &["js", "mjs", "cjs"]),
    ("ruby", &["rb"]),
    ("perl", &["pl"]),
];

/// Run every directory-tree check for the skill rooted at `skill_dir`.
///
/// Findings come back in a fixed order: `scripts/`, `references/`, the
/// symlink guard, then the SKILL.md size limit.
///
/// # Errors
///
/// Returns [`ValidateError`] when the walk itself fails or a file that
/// exists cannot be read (permission denied, disappeared mid-scan).
pub fn check_structure(skill_dir: &Path) -> Result<Vec<Finding>, ValidateError> {
    let mut findings = Vec::new();

    check_scripts(skill_dir, &mut findings)?;
    check_references(skill_dir, &mut findings)?;
    check_symlinks(skill_dir, &mut findings)?;
    check_skill_file_size(skill_dir, &mut findings)?;

    Ok(findings)
}

fn check_scripts(skill_dir: &Path, findings: &mut Vec<Finding>) -> Result<(), ValidateError> {
    let scripts_dir = skill_dir.join("scripts");
    if !scripts_dir.is_dir() {
        return Ok(());
    }

    let files = walk_files(&scripts_dir)?;
    if files.is_empty() {
        findings.push(Finding::warning(
            Code::ScriptsEmpty,
            Location::file("scripts"),
            "scripts/ directory exists but contains no files",
        ));
        return Ok(());
    }

    for file in files {
        let location = relative_location(skill_dir, &file);
        let head = read_head(&file)?;

        let Some(interpreter) = shebang_interpreter(&head) else {
            continue;
        };

        if let Some(expected) = expected_extensions(&interpreter) {
            let extension = file
                .extension()
                .map(|ext| ext.to_string_lossy().to_lowercase());
            let matches = extension
                .as_deref()
                .is_some_and(|ext| expected.contains(&ext));
            if !matches {
                findings.push(Finding::warning(
                    Code::ScriptExtension,
                    location.clone(),
                    format!(
                        "Script declares interpreter '{interpreter}' but lacks a .{} extension",
                        expected[0]
                    ),
                ));
            }
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let metadata = fs::metadata(&file).map_err(|err| ValidateError::io(&file, err))?;
            if metadata.permissions().mode() & 0o111 == 0 {
                findings.push(Finding::warning(
                    Code::ScriptNotExecutable,
                    location,
                    format!(
                        "Script is not executable. Consider: chmod +x {}",
                        file.display()
                    ),
                ));
            }
        }
    }

    Ok(())
}

fn check_references(skill_dir: &Path, findings: &mut Vec<Finding>) -> Result<(), ValidateError> {
    let references_dir = skill_dir.join("references");
    if !references_dir.is_dir() {
        return Ok(());
    }

    let files = walk_files(&references_dir)?;
    let mut has_docs = false;

    for file in &files {
        if file.extension().is_some_and(|ext| ext == "md") {
            has_docs = true;
        }
        let head = read_head(file)?;
        if head.contains(&0) {
            findings.push(Finding::warning(
                Code::ReferenceBinary,
                relative_location(skill_dir, file),
                "Reference file appears to be binary; references should be text or markdown",
            ));
        }
    }

    if !has_docs {
        findings.push(Finding::warning(
            Code::ReferencesNoDocs,
            Location::file("references"),
            "references/ directory exists but contains no .md files",
        ));
    }

    Ok(())
}

/// Path-traversal guard: every symlink under the skill directory must
/// resolve to a real path inside the (canonicalized) skill directory.
fn check_symlinks(skill_dir: &Path, findings: &mut Vec<Finding>) -> Result<(), ValidateError> {
    let root = fs::canonicalize(skill_dir).map_err(|err| ValidateError::io(skill_dir, err))?;

    let walker = WalkDir::new(skill_dir)
        .follow_links(false)
        .sort_by_file_name();
    for entry in walker {
        let entry = entry.map_err(|err| ValidateError::walk(skill_dir, err))?;
        if !entry.path_is_symlink() {
            continue;
        }

        let location = relative_location(skill_dir, entry.path());
        match fs::canonicalize(entry.path()) {
            Ok(real) => {
                if !real.starts_with(&root) {
                    findings.push(Finding::error(
                        Code::SymlinkEscape,
                        location,
                        format!(
                            "Symlink resolves to {} outside the skill directory",
                            real.display()
                        ),
                    ));
                }
            }
            Err(_) => findings.push(Finding::warning(
                Code::SymlinkBroken,
                location,
                "Symlink cannot be resolved",
            )),
        }
    }

    Ok(())
}

fn check_skill_file_size(
    skill_dir: &Path,
    findings: &mut Vec<Finding>,
) -> Result<(), ValidateError> {
    let skill_file = skill_dir.join(SKILL_FILE_NAME);
    let metadata = fs::metadata(&skill_file).map_err(|err| ValidateError::io(&skill_file, err))?;
    let size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
    if size > MAX_SKILL_FILE_BYTES {
        findings.push(Finding::warning(
            Code::SkillFileTooLarge,
            Location::skill_file(),
            format!(
                "SKILL.md is {size} bytes (soft limit {MAX_SKILL_FILE_BYTES}); consider moving detail into references/"
            ),
        ));
    }
    Ok(())
}

/// Regular files under `dir`, sorted for deterministic reports. Symlinks
/// are skipped here; the symlink guard owns them.
fn walk_files(dir: &Path) -> Result<Vec<PathBuf>, ValidateError> {
    let mut files = Vec::new();
    let walker = WalkDir::new(dir).follow_links(false).sort_by_file_name();
    for entry in walker {
        let entry = entry.map_err(|err| ValidateError::walk(dir, err))?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn read_head(path: &Path) -> Result<Vec<u8>, ValidateError> {
    use std::io::Read;
    let file = fs::File::open(path).map_err(|err| ValidateError::io(path, err))?;
    let mut head = Vec::with_capacity(SNIFF_BYTES);
    file.take(SNIFF_BYTES as u64)
        .read_to_end(&mut head)
        .map_err(|err| ValidateError::io(path, err))?;
    Ok(head)
}

/// The interpreter named by a `#!` first line, if any. `#!/usr/bin/env x`
/// resolves to `x`.
fn shebang_interpreter(head: &[u8]) -> Option<String> {
    let head = std::str::from_utf8(head).ok()?;
    let first_line = head.lines().next()?;
    let rest = first_line.strip_prefix("#!")?;

    let mut tokens = rest.split_whitespace();
    let program = tokens.next()?;
    let name = program.rsplit('/').next()?;
    if name == "env" {
        tokens.next().map(str::to_string)
    } else {
        Some(name.to_string())
    }
}

fn expected_extensions(interpreter: &str) -> Option<&'static [&'static str]> {
    INTERPRETER_EXTENSIONS
        .iter()
        .find(|(name, _)| *name == interpreter)
        .map(|(_, extensions)| *extensions)
}

fn relative_location(skill_dir: &Path, path: &Path) -> Location {
    let relative = path.strip_prefix(skill_dir).unwrap_or(path);
    Location::file(relative.to_string_lossy())
}
