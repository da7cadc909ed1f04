//! SKILL.md frontmatter parsing.
//!
//! A skill file is a YAML mapping between two `---` delimiter lines,
//! followed by a free-form markdown body. Parsing is strict about the
//! shape (delimiters must be whole lines, the body must be non-empty)
//! because every later validation stage assumes a parsed header exists.
//! A leading UTF-8 BOM is tolerated and stripped.

use std::collections::BTreeMap;

use serde_yaml::{Mapping, Value};

use crate::error::ParseError;

/// Parse YAML frontmatter from file content.
///
/// Returns the parsed metadata mapping along with the trimmed body content
/// after the closing `---`.
///
/// # Errors
///
/// Returns an error if the content doesn't start with a `---` line, the
/// frontmatter isn't closed, the body is empty, the YAML is invalid, the
/// frontmatter isn't a mapping, or a top-level key isn't a string.
pub fn parse_frontmatter(content: &str) -> Result<(BTreeMap<String, Value>, String), ParseError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let (header, body) = split_frontmatter(content)?;
    let body = body.trim();
    if body.is_empty() {
        return Err(ParseError::EmptyBody);
    }

    let parsed: Value = serde_yaml::from_str(header)?;

    match parsed {
        Value::Mapping(map) => Ok((mapping_to_btreemap(map)?, body.to_string())),
        _ => Err(ParseError::NotAMapping),
    }
}

/// Split content into the raw header block and the body.
///
/// The opening delimiter must be the entire first line and the closing
/// delimiter an entire later line; `---` sequences inside the body are
/// ignored. Handles both `\n` and `\r\n` line endings.
fn split_frontmatter(content: &str) -> Result<(&str, &str), ParseError> {
    if !content.starts_with("---") {
        return Err(ParseError::MissingOpenDelimiter);
    }

    let mut lines = content.split_inclusive('\n');
    let Some(first_line) = lines.next() else {
        return Err(ParseError::MissingOpenDelimiter);
    };

    if trim_line_ending(first_line) != "---" {
        return Err(ParseError::MissingOpenDelimiter);
    }

    let mut offset = first_line.len();
    for line in lines {
        if trim_line_ending(line) == "---" {
            let header = &content[first_line.len()..offset];
            let body = &content[offset + line.len()..];
            return Ok((header, body));
        }
        offset += line.len();
    }

    Err(ParseError::MissingCloseDelimiter)
}

fn trim_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// Convert a `serde_yaml` Mapping into a `BTreeMap` with string keys.
fn mapping_to_btreemap(map: Mapping) -> Result<BTreeMap<String, Value>, ParseError> {
    let mut result = BTreeMap::new();
    for (key, value) in map {
        let key_str = match key {
            Value::String(text) => text,
            _ => return Err(ParseError::NonStringKey),
        };
        result.insert(key_str, value);
    }
    Ok(result)
}
