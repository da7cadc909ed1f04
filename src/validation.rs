//! Metadata and body validation for SKILL.md content.
//!
//! This module holds every rule that can be checked against the parsed
//! frontmatter and the markdown body, without touching the filesystem.
//! Each violated rule yields exactly one [`Finding`] with a stable code;
//! the checks are independent, so a single bad field can produce several
//! findings at once (a name with an underscore that also differs from the
//! directory name reports both `name-pattern` and `name-dir-mismatch`).
//!
//! # Field rules
//!
//! - `name`: required string; `^[a-z0-9]+(-[a-z0-9]+)*$`; 1-64 chars; no
//!   "anthropic"/"claude" substrings (any case); equals the directory
//!   basename byte-for-byte
//! - `description`: required string; non-empty after trimming; 1-1024
//!   chars; no angle-bracket tags
//! - `license`: optional string
//! - `allowed-tools` / `allowedTools`: optional list of names from the
//!   fixed [`Tool`](crate::skill::Tool) vocabulary, matched
//!   case-insensitively
//! - `metadata`: optional mapping of string keys to scalar values
//!
//! Anything else at the top level is advisory (`unknown-field` warning).

use std::collections::BTreeMap;

use serde_yaml::Value;

use crate::report::{Code, Finding, Location};
use crate::skill::{
    Tool, ALLOWED_TOOLS_KEYS, BANNED_NAME_SUBSTRINGS, KNOWN_FIELDS, MAX_DESCRIPTION_LENGTH,
    MAX_NAME_LENGTH, MIN_BODY_CHARS,
};

/// Body content every skill is encouraged to carry: a keyword to scan for
/// and the section it stands for, from the skill authoring guidance.
const RECOMMENDED_SECTIONS: [(&str, &str); 3] = [
    ("when to use", "when to use this skill"),
    ("instruction", "step-by-step instructions"),
    ("example", "concrete examples"),
];

/// Validate the metadata extracted from a SKILL.md file.
///
/// `dir_name` is the basename of the skill directory, when known, for the
/// byte-for-byte name/directory equality rule.
///
/// Returns findings in check order; an empty list means every field rule
/// passed.
pub fn validate_metadata(
    metadata: &BTreeMap<String, Value>,
    dir_name: Option<&str>,
) -> Vec<Finding> {
    let mut findings = Vec::new();

    match metadata.get("name") {
        Some(Value::String(name)) => findings.extend(validate_name(name, dir_name)),
        Some(other) => findings.push(Finding::error(
            Code::NameType,
            Location::skill_file(),
            format!(
                "Field 'name' must be a string, found {}",
                yaml_type_name(other)
            ),
        )),
        None => findings.push(Finding::error(
            Code::NameMissing,
            Location::skill_file(),
            "Required field 'name' missing from frontmatter",
        )),
    }

    match metadata.get("description") {
        Some(Value::String(description)) => findings.extend(validate_description(description)),
        Some(other) => findings.push(Finding::error(
            Code::DescriptionType,
            Location::skill_file(),
            format!(
                "Field 'description' must be a string, found {}",
                yaml_type_name(other)
            ),
        )),
        None => findings.push(Finding::error(
            Code::DescriptionMissing,
            Location::skill_file(),
            "Required field 'description' missing from frontmatter",
        )),
    }

    if let Some(value) = metadata.get("license") {
        findings.extend(validate_license(value));
    }

    for key in ALLOWED_TOOLS_KEYS {
        if let Some(value) = metadata.get(key) {
            findings.extend(validate_allowed_tools(key, value));
        }
    }

    if let Some(value) = metadata.get("metadata") {
        findings.extend(validate_metadata_field(value));
    }

    let unknown_fields: Vec<String> = metadata
        .keys()
        .filter(|key| !KNOWN_FIELDS.contains(&key.as_str()))
        .cloned()
        .collect();
    if !unknown_fields.is_empty() {
        findings.push(Finding::warning(
            Code::UnknownField,
            Location::skill_file(),
            format!(
                "Unexpected frontmatter fields: {}",
                unknown_fields.join(", ")
            ),
        ));
    }

    findings
}

fn validate_name(name: &str, dir_name: Option<&str>) -> Vec<Finding> {
    let mut findings = Vec::new();

    if let Some(problem) = name_pattern_problem(name) {
        let message = if name.is_empty() {
            "Skill name must not be empty".to_string()
        } else {
            format!("Skill name '{name}' must be lowercase words separated by single hyphens ({problem})")
        };
        findings.push(Finding::error(
            Code::NamePattern,
            Location::skill_file(),
            message,
        ));
    }

    let char_count = name.chars().count();
    if char_count > MAX_NAME_LENGTH {
        findings.push(Finding::error(
            Code::NameLength,
            Location::skill_file(),
            format!("Skill name exceeds {MAX_NAME_LENGTH} character limit ({char_count} chars)"),
        ));
    }

    let lowered = name.to_lowercase();
    if BANNED_NAME_SUBSTRINGS
        .iter()
        .any(|banned| lowered.contains(banned))
    {
        findings.push(Finding::error(
            Code::NameBannedSubstring,
            Location::skill_file(),
            format!("Skill name '{name}' cannot contain \"anthropic\" or \"claude\""),
        ));
    }

    if let Some(dir) = dir_name {
        if dir != name {
            findings.push(Finding::error(
                Code::NameDirMismatch,
                Location::skill_file(),
                format!("Directory name '{dir}' must match skill name '{name}' exactly"),
            ));
        }
    }

    findings
}

/// Diagnose why a name fails `^[a-z0-9]+(-[a-z0-9]+)*$`, or `None` if it
/// matches. The checks are ordered from most to least specific so the
/// message names the first real problem.
fn name_pattern_problem(name: &str) -> Option<&'static str> {
    if name.is_empty() {
        return Some("it is empty");
    }
    if name.chars().any(|c| c.is_ascii_uppercase()) {
        return Some("uppercase is not allowed");
    }
    if name
        .chars()
        .any(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'))
    {
        return Some("only a-z, 0-9, and '-' are allowed");
    }
    if name.starts_with('-') || name.ends_with('-') {
        return Some("it cannot start or end with a hyphen");
    }
    if name.contains("--") {
        return Some("it cannot contain consecutive hyphens");
    }
    None
}

fn validate_description(description: &str) -> Vec<Finding> {
    let mut findings = Vec::new();

    if description.trim().is_empty() {
        findings.push(Finding::error(
            Code::DescriptionEmpty,
            Location::skill_file(),
            "Field 'description' must not be empty or whitespace-only",
        ));
        return findings;
    }

    let char_count = description.chars().count();
    if char_count > MAX_DESCRIPTION_LENGTH {
        findings.push(Finding::error(
            Code::DescriptionLength,
            Location::skill_file(),
            format!("Description exceeds {MAX_DESCRIPTION_LENGTH} character limit ({char_count} chars)"),
        ));
    }

    if contains_markup_tag(description) {
        findings.push(Finding::error(
            Code::DescriptionMarkup,
            Location::skill_file(),
            "Description cannot contain angle-bracket tags",
        ));
    }

    findings
}

fn validate_license(value: &Value) -> Vec<Finding> {
    let mut findings = Vec::new();

    match value {
        Value::String(license) => {
            if license.trim().is_empty() {
                findings.push(Finding::warning(
                    Code::LicenseEmpty,
                    Location::skill_file(),
                    "Field 'license' is empty; omit the field or name a license",
                ));
            }
        }
        other => findings.push(Finding::error(
            Code::LicenseType,
            Location::skill_file(),
            format!(
                "Field 'license' must be a string, found {}",
                yaml_type_name(other)
            ),
        )),
    }

    findings
}

fn validate_allowed_tools(key: &str, value: &Value) -> Vec<Finding> {
    let mut findings = Vec::new();

    match value {
        Value::Sequence(entries) => {
            for (index, entry) in entries.iter().enumerate() {
                match entry {
                    Value::String(name) => {
                        if name.parse::<Tool>().is_err() {
                            findings.push(Finding::error(
                                Code::ToolUnknown,
                                Location::skill_file(),
                                format!(
                                    "Unknown tool '{name}' in '{key}' (valid tools: {})",
                                    Tool::vocabulary()
                                ),
                            ));
                        }
                    }
                    other => findings.push(Finding::error(
                        Code::ToolEntryType,
                        Location::skill_file(),
                        format!(
                            "Entry {index} of '{key}' must be a tool name string, found {}",
                            yaml_type_name(other)
                        ),
                    )),
                }
            }
        }
        Value::String(_) => findings.push(Finding::error(
            Code::AllowedToolsType,
            Location::skill_file(),
            format!("Field '{key}' must be a YAML list of tool names, not a string (e.g. [read, execute-shell])"),
        )),
        other => findings.push(Finding::error(
            Code::AllowedToolsType,
            Location::skill_file(),
            format!(
                "Field '{key}' must be a list of tool names, found {}",
                yaml_type_name(other)
            ),
        )),
    }

    findings
}

fn validate_metadata_field(value: &Value) -> Vec<Finding> {
    let mut findings = Vec::new();

    let Value::Mapping(map) = value else {
        findings.push(Finding::error(
            Code::MetadataType,
            Location::skill_file(),
            format!(
                "Field 'metadata' must be a mapping of string keys to scalar values, found {}",
                yaml_type_name(value)
            ),
        ));
        return findings;
    };

    for (key, val) in map {
        let key_str = if let Value::String(text) = key {
            text
        } else {
            findings.push(Finding::warning(
                Code::MetadataKeyType,
                Location::skill_file(),
                format!(
                    "Metadata keys must be strings, found {}",
                    yaml_type_name(key)
                ),
            ));
            continue;
        };
        if matches!(val, Value::Sequence(_) | Value::Mapping(_) | Value::Tagged(_)) {
            findings.push(Finding::warning(
                Code::MetadataValueType,
                Location::skill_file(),
                format!("Metadata value for '{key_str}' is not a scalar"),
            ));
        }
    }

    findings
}

/// Validate the markdown body. Everything here is advisory.
pub fn validate_body(body: &str) -> Vec<Finding> {
    let mut findings = Vec::new();

    let has_heading = body.lines().any(|line| line.trim_start().starts_with('#'));
    if !has_heading {
        findings.push(Finding::warning(
            Code::BodyNoHeading,
            Location::skill_file(),
            "Body contains no markdown headings",
        ));
    }

    let char_count = body.chars().filter(|c| !c.is_whitespace()).count();
    if char_count < MIN_BODY_CHARS {
        findings.push(Finding::warning(
            Code::BodyTooShort,
            Location::skill_file(),
            format!(
                "Body has only {char_count} non-whitespace characters (minimum {MIN_BODY_CHARS}); consider adding more detailed instructions"
            ),
        ));
    }

    let body_lower = body.to_lowercase();
    for (keyword, section) in RECOMMENDED_SECTIONS {
        if !body_lower.contains(keyword) {
            findings.push(Finding::warning(
                Code::BodyMissingSection,
                Location::skill_file(),
                format!("Missing recommended section: {section}"),
            ));
        }
    }

    findings
}

/// Does the text contain an angle-bracket tag sequence (`<...>` with at
/// least one character between the brackets)?
fn contains_markup_tag(text: &str) -> bool {
    let mut rest = text;
    while let Some(open) = rest.find('<') {
        let after = &rest[open + 1..];
        match after.find('>') {
            Some(0) => rest = &after[1..],
            Some(_) => return true,
            None => return false,
        }
    }
    false
}

fn yaml_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
