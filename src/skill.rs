//! Core skill types and constants.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Required metadata file at the root of every skill directory.
pub const SKILL_FILE_NAME: &str = "SKILL.md";

/// Maximum length for skill names (in characters).
pub const MAX_NAME_LENGTH: usize = 64;

/// Maximum length for descriptions (in characters).
pub const MAX_DESCRIPTION_LENGTH: usize = 1024;

/// Soft size limit for SKILL.md itself (in bytes). Exceeding it is a warning.
pub const MAX_SKILL_FILE_BYTES: usize = 50 * 1024;

/// Minimum number of non-whitespace characters expected in the body.
pub const MIN_BODY_CHARS: usize = 100;

/// Substrings that may never appear in a skill name, matched case-insensitively.
pub const BANNED_NAME_SUBSTRINGS: [&str; 2] = ["anthropic", "claude"];

/// Frontmatter fields the validator knows about. Anything else draws an
/// `unknown-field` warning. `allowedTools` is accepted as an alias spelling
/// of `allowed-tools`.
pub const KNOWN_FIELDS: [&str; 6] = [
    "name",
    "description",
    "license",
    "allowed-tools",
    "allowedTools",
    "metadata",
];

/// The two spellings under which the tool list may appear.
pub const ALLOWED_TOOLS_KEYS: [&str; 2] = ["allowed-tools", "allowedTools"];

/// The fixed capability vocabulary a skill may request via `allowed-tools`.
///
/// The vocabulary is closed: entries that do not parse into a variant are
/// reported, never silently accepted, so extending the vocabulary requires
/// touching this enum (and the validator surfaces drift immediately).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tool {
    Read,
    Write,
    Edit,
    ExecuteShell,
    FindFiles,
    SearchContents,
    FetchUrl,
    WebSearch,
    SubagentLaunch,
}

impl Tool {
    /// Every member of the vocabulary, in canonical order.
    pub const ALL: [Self; 9] = [
        Self::Read,
        Self::Write,
        Self::Edit,
        Self::ExecuteShell,
        Self::FindFiles,
        Self::SearchContents,
        Self::FetchUrl,
        Self::WebSearch,
        Self::SubagentLaunch,
    ];

    /// Canonical lowercase-hyphenated spelling.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Edit => "edit",
            Self::ExecuteShell => "execute-shell",
            Self::FindFiles => "find-files",
            Self::SearchContents => "search-contents",
            Self::FetchUrl => "fetch-url",
            Self::WebSearch => "web-search",
            Self::SubagentLaunch => "subagent-launch",
        }
    }

    /// Render the whole vocabulary for error messages.
    pub fn vocabulary() -> String {
        Self::ALL
            .iter()
            .map(|tool| tool.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not part of the tool vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTool(pub String);

impl fmt::Display for UnknownTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown tool '{}'", self.0)
    }
}

impl std::error::Error for UnknownTool {}

impl FromStr for Tool {
    type Err = UnknownTool;

    /// Parse a tool name, matching the vocabulary case-insensitively
    /// (`Read` and `read` both name the same capability).
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|tool| value.eq_ignore_ascii_case(tool.as_str()))
            .ok_or_else(|| UnknownTool(value.to_string()))
    }
}
