//! Validation findings and the per-run report.
//!
//! A validation run produces an ordered sequence of [`Finding`]s, each
//! carrying a severity, a stable kebab-case [`Code`], a human-readable
//! message, and a [`Location`] relative to the skill directory. The
//! sequence is frozen into a [`Report`] when the run finishes; the report
//! only exposes read-only accessors, so re-running the validator on
//! unchanged files yields an identical value.
//!
//! Codes are part of the tool's contract: downstream tooling filters and
//! allowlists rules by code, so renaming one is a breaking change.

use std::fmt;

use serde::{Serialize, Serializer};

/// How bad a finding is.
///
/// Errors block packaging/publishing; warnings are advisory and never fail
/// a run on their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => f.write_str("error"),
            Self::Warning => f.write_str("warning"),
        }
    }
}

/// Stable identifier for each validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Code {
    // Fatal stages (the report holds exactly one of these and nothing else).
    SkillFileMissing,
    InvalidUtf8,
    FrontmatterMissing,
    FrontmatterUnclosed,
    FrontmatterInvalidYaml,
    FrontmatterNotMapping,
    FrontmatterKeyNotString,
    BodyEmpty,
    // Frontmatter field rules.
    NameMissing,
    NameType,
    NamePattern,
    NameLength,
    NameBannedSubstring,
    NameDirMismatch,
    DescriptionMissing,
    DescriptionType,
    DescriptionEmpty,
    DescriptionLength,
    DescriptionMarkup,
    LicenseType,
    LicenseEmpty,
    AllowedToolsType,
    ToolEntryType,
    ToolUnknown,
    MetadataType,
    MetadataKeyType,
    MetadataValueType,
    UnknownField,
    // Directory structure.
    ScriptsEmpty,
    ScriptExtension,
    ScriptNotExecutable,
    ReferenceBinary,
    ReferencesNoDocs,
    SymlinkEscape,
    SymlinkBroken,
    SkillFileTooLarge,
    // Body heuristics.
    BodyNoHeading,
    BodyTooShort,
    BodyMissingSection,
}

impl Code {
    /// Every code, for exhaustiveness checks in tests.
    pub const ALL: [Self; 39] = [
        Self::SkillFileMissing,
        Self::InvalidUtf8,
        Self::FrontmatterMissing,
        Self::FrontmatterUnclosed,
        Self::FrontmatterInvalidYaml,
        Self::FrontmatterNotMapping,
        Self::FrontmatterKeyNotString,
        Self::BodyEmpty,
        Self::NameMissing,
        Self::NameType,
        Self::NamePattern,
        Self::NameLength,
        Self::NameBannedSubstring,
        Self::NameDirMismatch,
        Self::DescriptionMissing,
        Self::DescriptionType,
        Self::DescriptionEmpty,
        Self::DescriptionLength,
        Self::DescriptionMarkup,
        Self::LicenseType,
        Self::LicenseEmpty,
        Self::AllowedToolsType,
        Self::ToolEntryType,
        Self::ToolUnknown,
        Self::MetadataType,
        Self::MetadataKeyType,
        Self::MetadataValueType,
        Self::UnknownField,
        Self::ScriptsEmpty,
        Self::ScriptExtension,
        Self::ScriptNotExecutable,
        Self::ReferenceBinary,
        Self::ReferencesNoDocs,
        Self::SymlinkEscape,
        Self::SymlinkBroken,
        Self::SkillFileTooLarge,
        Self::BodyNoHeading,
        Self::BodyTooShort,
        Self::BodyMissingSection,
    ];

    /// The stable kebab-case identifier used in output and JSON.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SkillFileMissing => "skill-file-missing",
            Self::InvalidUtf8 => "invalid-utf8",
            Self::FrontmatterMissing => "frontmatter-missing",
            Self::FrontmatterUnclosed => "frontmatter-unclosed",
            Self::FrontmatterInvalidYaml => "frontmatter-invalid-yaml",
            Self::FrontmatterNotMapping => "frontmatter-not-mapping",
            Self::FrontmatterKeyNotString => "frontmatter-key-not-string",
            Self::BodyEmpty => "body-empty",
            Self::NameMissing => "name-missing",
            Self::NameType => "name-type",
            Self::NamePattern => "name-pattern",
            Self::NameLength => "name-length",
            Self::NameBannedSubstring => "name-banned-substring",
            Self::NameDirMismatch => "name-dir-mismatch",
            Self::DescriptionMissing => "description-missing",
            Self::DescriptionType => "description-type",
            Self::DescriptionEmpty => "description-empty",
            Self::DescriptionLength => "description-length",
            Self::DescriptionMarkup => "description-markup",
            Self::LicenseType => "license-type",
            Self::LicenseEmpty => "license-empty",
            Self::AllowedToolsType => "allowed-tools-type",
            Self::ToolEntryType => "tool-entry-type",
            Self::ToolUnknown => "tool-unknown",
            Self::MetadataType => "metadata-type",
            Self::MetadataKeyType => "metadata-key-type",
            Self::MetadataValueType => "metadata-value-type",
            Self::UnknownField => "unknown-field",
            Self::ScriptsEmpty => "scripts-empty",
            Self::ScriptExtension => "script-extension",
            Self::ScriptNotExecutable => "script-not-executable",
            Self::ReferenceBinary => "reference-binary",
            Self::ReferencesNoDocs => "references-no-docs",
            Self::SymlinkEscape => "symlink-escape",
            Self::SymlinkBroken => "symlink-broken",
            Self::SkillFileTooLarge => "skill-file-too-large",
            Self::BodyNoHeading => "body-no-heading",
            Self::BodyTooShort => "body-too-short",
            Self::BodyMissingSection => "body-missing-section",
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Code {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Where a finding points, relative to the skill directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    /// Relative path, e.g. `SKILL.md` or `scripts/run.py`.
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
}

impl Location {
    /// A whole file (or directory) with no position information.
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            line: None,
            column: None,
        }
    }

    /// The skill metadata file itself.
    pub fn skill_file() -> Self {
        Self::file(crate::skill::SKILL_FILE_NAME)
    }

    /// A position inside a file (1-based, as reported by the YAML parser).
    pub fn position(path: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            path: path.into(),
            line: Some(line),
            column: Some(column),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        if let Some(line) = self.line {
            write!(f, ":{line}")?;
            if let Some(column) = self.column {
                write!(f, ":{column}")?;
            }
        }
        Ok(())
    }
}

/// One entry in a validation report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub severity: Severity,
    pub code: Code,
    pub message: String,
    pub location: Location,
}

impl Finding {
    pub fn error(code: Code, location: Location, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            location,
        }
    }

    pub fn warning(code: Code, location: Location, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
            location,
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}] {}: {}",
            self.severity, self.code, self.location, self.message
        )
    }
}

/// The frozen result of one validation run.
///
/// Findings keep the order in which the checks ran; grouping by severity is
/// an output concern. The overall verdict is [`Report::is_valid`]: true iff
/// no error-severity finding exists. Warnings never fail a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Report {
    findings: Vec<Finding>,
}

impl Report {
    pub(crate) fn new(findings: Vec<Finding>) -> Self {
        Self { findings }
    }

    /// All findings, in check order.
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// Error-severity findings, in check order.
    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|finding| finding.severity == Severity::Error)
    }

    /// Warning-severity findings, in check order.
    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|finding| finding.severity == Severity::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    /// True iff the run produced no error-severity finding.
    pub fn is_valid(&self) -> bool {
        self.errors().next().is_none()
    }

    pub fn has_warnings(&self) -> bool {
        self.warnings().next().is_some()
    }
}
