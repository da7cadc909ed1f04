//! Static validator for agent skill directories.
//!
//! A skill is a directory named after the skill, holding a `SKILL.md`
//! metadata file (YAML frontmatter plus a markdown body) and optional
//! `scripts/`, `references/`, and license/readme files. [`validate`]
//! checks a candidate directory against the skill specification and
//! returns a [`Report`] of error and warning [`Finding`]s; it never
//! mutates the filesystem, executes scripts, or follows links out of the
//! directory.
//!
//! ```no_run
//! use std::path::Path;
//!
//! let report = skillcheck::validate(Path::new("skills/demo"))?;
//! for finding in report.findings() {
//!     println!("{finding}");
//! }
//! if report.is_valid() {
//!     println!("demo is ready to package");
//! }
//! # Ok::<(), skillcheck::ValidateError>(())
//! ```
//!
//! Malformed skills are expected input: they become report entries, never
//! `Err`. Only operational failures (permission denied, a directory
//! disappearing mid-scan) surface as [`ValidateError`].

pub mod discovery;
pub mod error;
pub mod frontmatter;
pub mod report;
pub mod skill;
pub mod structure;
pub mod validation;
pub mod validator;

pub use error::{ParseError, ValidateError};
pub use frontmatter::parse_frontmatter;
pub use report::{Code, Finding, Location, Report, Severity};
pub use skill::Tool;
pub use validation::{validate_body, validate_metadata};
pub use validator::validate;
