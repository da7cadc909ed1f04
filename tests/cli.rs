use assert_cmd::prelude::*;
use predicates::str::{contains, is_empty};
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const VALID_SKILL: &str = "\
---
name: good-skill
description: Does X. Use when Y.
---
# Good skill

Use this when you need a worked example.

## Instructions

1. Run the validator against the directory.
2. Fix every error before publishing; read warnings carefully.
";

fn write_skill(dir: &Path, filename: &str, content: &str) {
    fs::write(dir.join(filename), content).expect("write skill file");
}

fn make_skill(root: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let skill_dir = root.join(name);
    fs::create_dir_all(&skill_dir).expect("mkdir");
    write_skill(&skill_dir, "SKILL.md", content);
    skill_dir
}

fn bin() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("skillcheck"))
}

#[test]
fn valid_skill_passes() {
    let dir = TempDir::new().expect("temp dir");
    let skill_dir = make_skill(dir.path(), "good-skill", VALID_SKILL);

    bin()
        .arg(skill_dir.to_str().unwrap())
        .assert()
        .success()
        .stdout(is_empty())
        .stderr(is_empty());
}

#[test]
fn missing_frontmatter_fails() {
    let dir = TempDir::new().expect("temp dir");
    let skill_dir = make_skill(dir.path(), "bad-skill", "# Missing frontmatter\n");

    bin()
        .arg(skill_dir.to_str().unwrap())
        .assert()
        .code(1)
        .stderr(contains("must start with YAML frontmatter"))
        .stderr(contains("frontmatter-missing"));
}

#[test]
fn skill_md_file_argument_is_accepted() {
    let dir = TempDir::new().expect("temp dir");
    let skill_dir = make_skill(dir.path(), "good-skill", VALID_SKILL);

    bin()
        .arg(skill_dir.join("SKILL.md").to_str().unwrap())
        .assert()
        .success();
}

#[test]
fn nonexistent_path_is_a_validation_failure_not_a_crash() {
    let dir = TempDir::new().expect("temp dir");
    let missing = dir.path().join("missing");

    bin()
        .arg(missing.to_str().unwrap())
        .assert()
        .code(1)
        .stderr(contains("skill-file-missing"))
        .stderr(contains("SKILL.md not found"));
}

#[test]
fn empty_search_root_reports_no_skills_found() {
    let dir = TempDir::new().expect("temp dir");

    bin()
        .current_dir(dir.path())
        .assert()
        .code(1)
        .stderr(contains("No SKILL.md files found"));
}

#[test]
fn directory_argument_is_searched_recursively() {
    let dir = TempDir::new().expect("temp dir");
    make_skill(&dir.path().join("nested"), "good-skill", VALID_SKILL);
    make_skill(
        &dir.path().join("nested"),
        "bad-skill",
        "# Missing frontmatter\n",
    );

    bin()
        .arg(dir.path().to_str().unwrap())
        .assert()
        .code(1)
        .stderr(contains("bad-skill"));
}

#[test]
fn warnings_alone_exit_zero() {
    let dir = TempDir::new().expect("temp dir");
    let skill_dir = make_skill(
        dir.path(),
        "thin-skill",
        "---\nname: thin-skill\ndescription: Does X. Use when Y.\n---\nthin body\n",
    );

    bin()
        .arg(skill_dir.to_str().unwrap())
        .assert()
        .success()
        .stdout(contains("Warnings for"))
        .stdout(contains("body-too-short"));
}

#[test]
fn strict_turns_warnings_into_failure() {
    let dir = TempDir::new().expect("temp dir");
    let skill_dir = make_skill(
        dir.path(),
        "thin-skill",
        "---\nname: thin-skill\ndescription: Does X. Use when Y.\n---\nthin body\n",
    );

    bin()
        .args(["--strict", skill_dir.to_str().unwrap()])
        .assert()
        .code(1);
}

#[test]
fn quiet_suppresses_warnings_but_not_errors() {
    let dir = TempDir::new().expect("temp dir");
    let skill_dir = make_skill(dir.path(), "bad-skill", "# Missing frontmatter\n");

    bin()
        .args(["--quiet", skill_dir.to_str().unwrap()])
        .assert()
        .code(1)
        .stdout(is_empty())
        .stderr(contains("frontmatter-missing"));
}

#[test]
fn json_report_carries_version_status_and_codes() {
    let dir = TempDir::new().expect("temp dir");
    let skill_dir = make_skill(dir.path(), "bad-skill", "# Missing frontmatter\n");

    bin()
        .args(["--json", skill_dir.to_str().unwrap()])
        .assert()
        .code(1)
        .stdout(contains(format!(r#""version":"{VERSION}""#)))
        .stdout(contains(r#""status":"invalid""#))
        .stdout(contains(r#""code":"frontmatter-missing""#))
        .stdout(contains(r#""severity":"error""#));
}

#[test]
fn json_report_for_a_valid_skill() {
    let dir = TempDir::new().expect("temp dir");
    let skill_dir = make_skill(dir.path(), "good-skill", VALID_SKILL);

    bin()
        .args(["--json", skill_dir.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains(r#""status":"valid""#))
        .stdout(contains(r#""errors":0"#));
}

#[test]
fn json_strict_marks_warning_only_skills_invalid() {
    let dir = TempDir::new().expect("temp dir");
    let skill_dir = make_skill(
        dir.path(),
        "thin-skill",
        "---\nname: thin-skill\ndescription: Does X. Use when Y.\n---\nthin body\n",
    );

    bin()
        .args(["--json", "--strict", skill_dir.to_str().unwrap()])
        .assert()
        .code(1)
        .stdout(contains(r#""status":"invalid""#))
        .stdout(contains(r#""errors":0"#));
}

#[test]
fn repeated_runs_emit_byte_identical_json() {
    let dir = TempDir::new().expect("temp dir");
    let skill_dir = make_skill(
        dir.path(),
        "foo-bar",
        "---\nname: foo_bar\ndescription: short\nowner: me\n---\nthin body\n",
    );
    fs::create_dir(skill_dir.join("scripts")).expect("mkdir");

    let first = bin()
        .args(["--json", skill_dir.to_str().unwrap()])
        .output()
        .expect("run");
    let second = bin()
        .args(["--json", skill_dir.to_str().unwrap()])
        .output()
        .expect("run");
    assert_eq!(first.stdout, second.stdout);
    assert!(!first.stdout.is_empty());
}

#[test]
fn directory_name_mismatch_reports_both_pattern_and_mismatch() {
    let dir = TempDir::new().expect("temp dir");
    let skill_dir = make_skill(
        dir.path(),
        "foo-bar",
        "---\nname: foo_bar\ndescription: Does X. Use when Y.\n---\n# Title\n\nBody text here.\n",
    );

    bin()
        .arg(skill_dir.to_str().unwrap())
        .assert()
        .code(1)
        .stderr(contains("name-pattern"))
        .stderr(contains("name-dir-mismatch"));
}

#[test]
fn lowercase_skill_file_is_named_in_the_error() {
    let dir = TempDir::new().expect("temp dir");
    let skill_dir = dir.path().join("good-skill");
    fs::create_dir_all(&skill_dir).expect("mkdir");
    write_skill(&skill_dir, "skill.md", VALID_SKILL);

    bin()
        .arg(skill_dir.to_str().unwrap())
        .assert()
        .code(1)
        .stderr(contains("exactly SKILL.md"));
}
