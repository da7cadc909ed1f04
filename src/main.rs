use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;

use skillcheck::{
    discovery::{collect_skill_dirs, display_path},
    validate, Report,
};

#[derive(Parser)]
#[command(
    name = "skillcheck",
    version,
    about = "Validate agent skill directories against the skill specification"
)]
struct Cli {
    /// Skill directories or SKILL.md files; searches the current directory
    /// when omitted
    paths: Vec<PathBuf>,

    /// Treat warnings as failures
    #[arg(long)]
    strict: bool,

    /// Only show errors, not warnings
    #[arg(short, long)]
    quiet: bool,

    /// Emit a machine-readable JSON report to stdout
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    version: &'static str,
    status: &'a str,
    skills: Vec<JsonSkill<'a>>,
}

#[derive(Serialize)]
struct JsonSkill<'a> {
    path: String,
    status: &'a str,
    errors: usize,
    warnings: usize,
    findings: &'a Report,
}

fn main() {
    let cli = Cli::parse();
    std::process::exit(run(&cli));
}

fn run(cli: &Cli) -> i32 {
    let skill_dirs = collect_skill_dirs(&cli.paths);
    if skill_dirs.is_empty() {
        eprintln!("No SKILL.md files found.");
        return 1;
    }

    let mut results = Vec::with_capacity(skill_dirs.len());
    for dir in skill_dirs {
        match validate(&dir) {
            Ok(report) => results.push((display_path(&dir), report)),
            Err(err) => {
                eprintln!("Error: {err}");
                return 2;
            }
        }
    }

    let failed = results
        .iter()
        .any(|(_, report)| skill_failed(report, cli.strict));

    if cli.json {
        print_json(&results, cli.strict, failed);
    } else {
        print_human(&results, cli.quiet);
    }

    i32::from(failed)
}

fn skill_failed(report: &Report, strict: bool) -> bool {
    !report.is_valid() || (strict && report.has_warnings())
}

fn print_human(results: &[(String, Report)], quiet: bool) {
    for (path, report) in results {
        if !report.is_valid() {
            eprintln!("Validation failed for {path}:");
            for finding in report.errors() {
                eprintln!("  {finding}");
            }
        }

        if !quiet && report.has_warnings() {
            println!("Warnings for {path}:");
            for finding in report.warnings() {
                println!("  {finding}");
            }
        }
    }
}

fn print_json(results: &[(String, Report)], strict: bool, failed: bool) {
    let skills: Vec<JsonSkill<'_>> = results
        .iter()
        .map(|(path, report)| JsonSkill {
            path: path.clone(),
            status: if skill_failed(report, strict) {
                "invalid"
            } else {
                "valid"
            },
            errors: report.error_count(),
            warnings: report.warning_count(),
            findings: report,
        })
        .collect();

    let output = JsonOutput {
        version: env!("CARGO_PKG_VERSION"),
        status: if failed { "invalid" } else { "valid" },
        skills,
    };

    match serde_json::to_string(&output) {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("Error: failed to serialize report: {err}"),
    }
}
