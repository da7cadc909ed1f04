//! Error types for skillcheck.
//!
//! Two kinds of failure exist and they never mix: a malformed *input skill*
//! always becomes a finding in the report ([`ParseError`] feeds the fatal
//! stages of the pipeline), while [`ValidateError`] covers operational
//! failures — files that exist but cannot be read, walks that die mid-scan —
//! which propagate to the caller instead of polluting the validation
//! taxonomy.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when parsing SKILL.md frontmatter.
///
/// Each variant corresponds to one fatal validation stage; the validator
/// converts it into a single report entry and stops.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The file does not start with the YAML frontmatter delimiter.
    #[error("SKILL.md must start with YAML frontmatter (---)")]
    MissingOpenDelimiter,

    /// The frontmatter is not closed by a second delimiter line.
    #[error("SKILL.md frontmatter not properly closed with ---")]
    MissingCloseDelimiter,

    /// Nothing but whitespace follows the closing delimiter.
    #[error("SKILL.md has no content after the closing frontmatter delimiter")]
    EmptyBody,

    /// The YAML inside the frontmatter block is invalid.
    #[error("Invalid YAML in frontmatter: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    /// The frontmatter parsed, but not into a mapping.
    #[error("SKILL.md frontmatter must be a YAML mapping")]
    NotAMapping,

    /// A top-level frontmatter key is not a string.
    #[error("Frontmatter keys must be strings")]
    NonStringKey,
}

/// Operational failures during a validation run.
///
/// These are the "truly exceptional" conditions: the skill's files exist
/// but reading them failed partway. They are distinct from validation
/// findings and make the CLI exit with status 2.
#[derive(Debug, Error)]
pub enum ValidateError {
    /// A file inside the skill directory could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Walking the skill directory tree failed.
    #[error("Failed to scan {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

impl ValidateError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn walk(path: impl Into<PathBuf>, source: walkdir::Error) -> Self {
        Self::Walk {
            path: path.into(),
            source,
        }
    }
}
