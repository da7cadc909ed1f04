//! The staged validation pipeline.
//!
//! [`validate`] wires the fatal stages (existence, encoding, header
//! extraction, YAML parsing) in front of the accumulating stages (field
//! rules, directory structure, body heuristics). A fatal stage failing
//! produces a report holding exactly that one finding; later stages never
//! run against an unparsed document, so one syntax error cannot cascade
//! into a page of nonsense.
//!
//! The pipeline reads the filesystem and nothing else: no mutation, no
//! script execution, no link following. Given unchanged files, two runs
//! return equal reports.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ParseError, ValidateError};
use crate::frontmatter::parse_frontmatter;
use crate::report::{Code, Finding, Location, Report};
use crate::skill::SKILL_FILE_NAME;
use crate::structure::check_structure;
use crate::validation::{validate_body, validate_metadata};

/// Validate the skill at `path`.
///
/// `path` may be the skill directory or its `SKILL.md` file. A malformed
/// skill never produces an `Err`; every input problem becomes a finding
/// in the returned report.
///
/// # Errors
///
/// Returns [`ValidateError`] only for operational failures: files that
/// exist but cannot be read, or a directory walk dying mid-scan.
pub fn validate(path: &Path) -> Result<Report, ValidateError> {
    let skill_dir = resolve_skill_dir(path);
    let skill_file = skill_dir.join(SKILL_FILE_NAME);

    // Stage 1: the metadata file must exist under its exact name.
    if !skill_file.is_file() {
        return Ok(Report::new(vec![missing_file_finding(&skill_dir)]));
    }

    // Stage 2: bytes must decode as UTF-8.
    let bytes = match fs::read(&skill_file) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(Report::new(vec![missing_file_finding(&skill_dir)]));
        }
        Err(err) => return Err(ValidateError::io(&skill_file, err)),
    };
    let content = match String::from_utf8(bytes) {
        Ok(content) => content,
        Err(err) => {
            let offset = err.utf8_error().valid_up_to();
            return Ok(Report::new(vec![Finding::error(
                Code::InvalidUtf8,
                Location::skill_file(),
                format!("SKILL.md is not valid UTF-8 (first invalid byte at offset {offset})"),
            )]));
        }
    };

    // Stages 3-4: header extraction and YAML parsing.
    let (metadata, body) = match parse_frontmatter(&content) {
        Ok(parsed) => parsed,
        Err(err) => return Ok(Report::new(vec![parse_finding(&err)])),
    };

    // Stages 5-8 accumulate; none short-circuits another.
    let dir_name = skill_dir.file_name().map(|name| name.to_string_lossy());
    let mut findings = validate_metadata(&metadata, dir_name.as_deref());
    findings.extend(check_structure(&skill_dir)?);
    findings.extend(validate_body(&body));

    Ok(Report::new(findings))
}

/// Accept either the skill directory or the SKILL.md file inside it.
fn resolve_skill_dir(path: &Path) -> PathBuf {
    if path.is_file()
        && path
            .file_name()
            .is_some_and(|name| name.eq_ignore_ascii_case(SKILL_FILE_NAME))
    {
        if let Some(parent) = path.parent() {
            return parent.to_path_buf();
        }
    }
    path.to_path_buf()
}

fn missing_file_finding(skill_dir: &Path) -> Finding {
    let mut message = format!("SKILL.md not found in {}", skill_dir.display());
    if let Some(variant) = case_variant(skill_dir) {
        message.push_str(&format!(
            " (found '{variant}'; the file must be named exactly SKILL.md)"
        ));
    }
    Finding::error(Code::SkillFileMissing, Location::skill_file(), message)
}

/// A differently-cased `skill.md` sitting where SKILL.md should be.
fn case_variant(skill_dir: &Path) -> Option<String> {
    let entries = fs::read_dir(skill_dir).ok()?;
    for entry in entries.flatten() {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.eq_ignore_ascii_case(SKILL_FILE_NAME) && name != SKILL_FILE_NAME {
            return Some(name.into_owned());
        }
    }
    None
}

/// Convert a fatal parse failure into its single report entry.
fn parse_finding(err: &ParseError) -> Finding {
    let code = match err {
        ParseError::MissingOpenDelimiter => Code::FrontmatterMissing,
        ParseError::MissingCloseDelimiter => Code::FrontmatterUnclosed,
        ParseError::EmptyBody => Code::BodyEmpty,
        ParseError::InvalidYaml(_) => Code::FrontmatterInvalidYaml,
        ParseError::NotAMapping => Code::FrontmatterNotMapping,
        ParseError::NonStringKey => Code::FrontmatterKeyNotString,
    };

    let location = match err {
        ParseError::InvalidYaml(yaml_err) => yaml_err.location().map_or_else(
            Location::skill_file,
            // The header block starts on line 2, after the opening `---`.
            |pos| Location::position(SKILL_FILE_NAME, pos.line() + 1, pos.column()),
        ),
        _ => Location::skill_file(),
    };

    Finding::error(code, location, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Severity;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const VALID_SKILL: &str = "\
---
name: demo
description: Does X. Use when Y.
---
# Demo

Use this skill when you need a demonstration.

## Instructions

1. Run the validator.
2. Read the example output carefully before publishing.
";

    fn make_skill(name: &str, content: &str) -> (TempDir, PathBuf) {
        let dir = TempDir::new().expect("temp dir");
        let skill = dir.path().join(name);
        fs::create_dir_all(&skill).expect("mkdir");
        fs::write(skill.join("SKILL.md"), content).expect("write SKILL.md");
        (dir, skill)
    }

    fn codes(report: &Report) -> Vec<Code> {
        report.findings().iter().map(|f| f.code).collect()
    }

    #[test]
    fn minimal_valid_skill_passes() {
        let (_guard, skill) = make_skill("demo", VALID_SKILL);
        let report = validate(&skill).expect("validate");
        assert!(report.is_valid(), "unexpected errors: {:?}", report.findings());
        assert_eq!(report.findings(), &[]);
    }

    #[test]
    fn skill_md_path_argument_validates_the_parent_directory() {
        let (_guard, skill) = make_skill("demo", VALID_SKILL);
        let report = validate(&skill.join("SKILL.md")).expect("validate");
        assert!(report.is_valid());
    }

    #[test]
    fn missing_file_is_exactly_one_fatal_finding() {
        let dir = TempDir::new().expect("temp dir");
        let skill = dir.path().join("no-such-skill");
        fs::create_dir_all(&skill).expect("mkdir");
        // Even with a scripts/ dir present, the fatal stage stops the run.
        fs::create_dir(skill.join("scripts")).expect("mkdir");

        let report = validate(&skill).expect("validate");
        assert_eq!(codes(&report), vec![Code::SkillFileMissing]);
        assert_eq!(report.findings()[0].severity, Severity::Error);
    }

    #[test]
    fn nonexistent_path_reports_missing_not_err() {
        let dir = TempDir::new().expect("temp dir");
        let report = validate(&dir.path().join("ghost")).expect("validate");
        assert_eq!(codes(&report), vec![Code::SkillFileMissing]);
    }

    #[test]
    fn lowercase_variant_is_named_in_the_message() {
        let dir = TempDir::new().expect("temp dir");
        let skill = dir.path().join("demo");
        fs::create_dir_all(&skill).expect("mkdir");
        fs::write(skill.join("skill.md"), VALID_SKILL).expect("write");

        let report = validate(&skill).expect("validate");
        assert_eq!(codes(&report), vec![Code::SkillFileMissing]);
        assert!(report.findings()[0].message.contains("skill.md"));
        assert!(report.findings()[0].message.contains("exactly SKILL.md"));
    }

    #[test]
    fn invalid_utf8_is_fatal() {
        let dir = TempDir::new().expect("temp dir");
        let skill = dir.path().join("demo");
        fs::create_dir_all(&skill).expect("mkdir");
        fs::write(skill.join("SKILL.md"), b"---\nname: demo\n\xff\xfe\n---\nBody\n")
            .expect("write");

        let report = validate(&skill).expect("validate");
        assert_eq!(codes(&report), vec![Code::InvalidUtf8]);
        assert!(report.findings()[0].message.contains("offset"));
    }

    #[test]
    fn header_failures_are_single_findings() {
        let (_guard, skill) = make_skill("demo", "# No frontmatter\n\nJust a body.\n");
        let report = validate(&skill).expect("validate");
        assert_eq!(codes(&report), vec![Code::FrontmatterMissing]);

        let (_guard, skill) = make_skill("demo", "---\nname: demo\ndescription: d\n");
        let report = validate(&skill).expect("validate");
        assert_eq!(codes(&report), vec![Code::FrontmatterUnclosed]);

        let (_guard, skill) = make_skill("demo", "---\nname: demo\ndescription: d\n---\n \n");
        let report = validate(&skill).expect("validate");
        assert_eq!(codes(&report), vec![Code::BodyEmpty]);
    }

    #[test]
    fn yaml_error_carries_a_position_in_the_file() {
        let (_guard, skill) = make_skill(
            "demo",
            "---\nname: demo\ndescription: [unclosed\n---\nBody\n",
        );
        let report = validate(&skill).expect("validate");
        assert_eq!(codes(&report), vec![Code::FrontmatterInvalidYaml]);
        assert!(report.findings()[0].message.contains("Invalid YAML"));
        // When the parser reports a position, it is offset past the
        // opening delimiter line.
        if let Some(line) = report.findings()[0].location.line {
            assert!(line >= 2, "line {line} points into the delimiter");
        }
    }

    #[test]
    fn fatal_parse_failure_suppresses_structure_checks() {
        let (_guard, skill) = make_skill("demo", "no frontmatter");
        fs::create_dir(skill.join("scripts")).expect("mkdir");

        let report = validate(&skill).expect("validate");
        assert_eq!(codes(&report), vec![Code::FrontmatterMissing]);
    }

    #[test]
    fn field_and_structure_findings_accumulate() {
        let (_guard, skill) = make_skill(
            "foo-bar",
            "---\nname: foo_bar\ndescription: Does X. Use when Y.\n---\n# Demo\n\nWhen to use: instruction example filler filler filler filler filler.\n",
        );
        fs::create_dir(skill.join("scripts")).expect("mkdir");

        let report = validate(&skill).expect("validate");
        let codes = codes(&report);
        assert!(codes.contains(&Code::NamePattern));
        assert!(codes.contains(&Code::NameDirMismatch));
        assert!(codes.contains(&Code::ScriptsEmpty));
    }

    #[test]
    fn validate_is_idempotent() {
        let (_guard, skill) = make_skill(
            "foo-bar",
            "---\nname: foo_bar\ndescription: short\nowner: me\n---\nthin body\n",
        );
        fs::create_dir(skill.join("references")).expect("mkdir");
        fs::write(skill.join("references").join("data.bin"), [0u8, 1, 2]).expect("write");

        let first = validate(&skill).expect("validate");
        let second = validate(&skill).expect("validate");
        assert_eq!(first, second);

        let first_json = serde_json::to_string(&first).expect("serialize");
        let second_json = serde_json::to_string(&second).expect("serialize");
        assert_eq!(first_json, second_json);
    }

    #[test]
    fn warnings_alone_keep_the_report_valid() {
        let (_guard, skill) = make_skill(
            "demo",
            "---\nname: demo\ndescription: Does X. Use when Y.\n---\nthin body\n",
        );
        let report = validate(&skill).expect("validate");
        assert!(report.is_valid());
        assert!(report.has_warnings());
    }
}
