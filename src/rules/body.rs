use crate::domain::config::BodyConfig;
use crate::domain::errors::{ErrorCode, ValidationError};
use crate::domain::models::CommitInfo;
use crate::rules::Rule;
use regex::Regex;
use std::sync::OnceLock;

pub const BODY: &str = "commit-body";
pub const BODY_HELP: &str = "Commit must carry a body of at least body.min_length characters and body.min_lines lines.";
pub const SIGNOFF: &str = "signoff";
pub const SIGNOFF_HELP: &str = "Commit must end with a `Signed-off-by: Name <email>` trailer.";

const TRAILER: &str = "signed-off-by:";

fn is_signoff_line(line: &str) -> bool {
    line.trim_start()
        .get(..TRAILER.len())
        .is_some_and(|p| p.eq_ignore_ascii_case(TRAILER))
}

fn signoff_grammar() -> Option<&'static Regex> {
    static GRAMMAR: OnceLock<Option<Regex>> = OnceLock::new();
    GRAMMAR
        .get_or_init(|| Regex::new(r"^Signed-off-by: [^<>]*\S <[^<>@\s]+@[^<>@\s]+>$").ok())
        .as_ref()
}

pub struct CommitBody {
    cfg: BodyConfig,
}

impl CommitBody {
    pub fn new(cfg: &BodyConfig) -> Self {
        Self { cfg: cfg.clone() }
    }
}

impl Rule for CommitBody {
    fn name(&self) -> &'static str {
        BODY
    }

    fn help(&self) -> &'static str {
        BODY_HELP
    }

    fn validate(&self, commit: &CommitInfo) -> Vec<ValidationError> {
        let lines: Vec<&str> = commit
            .body
            .lines()
            .filter(|l| self.cfg.allow_signoff_only || !is_signoff_line(l))
            .collect();
        let text = lines.join("\n");
        let text = text.trim();
        if text.is_empty() {
            return vec![ValidationError::new(BODY, ErrorCode::MissingBody, "commit has no body")];
        }

        let mut errors = Vec::new();
        let length = text.chars().count();
        if length < self.cfg.min_length {
            errors.push(
                ValidationError::new(
                    BODY,
                    ErrorCode::BodyTooShort,
                    format!("body is {length} characters, minimum is {}", self.cfg.min_length),
                )
                .with_context("actual_length", length)
                .with_context("min_length", self.cfg.min_length),
            );
        }
        let count = lines.iter().filter(|l| !l.trim().is_empty()).count();
        if count < self.cfg.min_lines {
            errors.push(
                ValidationError::new(
                    BODY,
                    ErrorCode::BodyTooFewLines,
                    format!("body has {count} lines, minimum is {}", self.cfg.min_lines),
                )
                .with_context("actual_lines", count)
                .with_context("min_lines", self.cfg.min_lines),
            );
        }
        errors
    }
}

#[derive(Default)]
pub struct Signoff;

impl Signoff {
    pub fn new() -> Self {
        Self
    }
}

impl Rule for Signoff {
    fn name(&self) -> &'static str {
        SIGNOFF
    }

    fn help(&self) -> &'static str {
        SIGNOFF_HELP
    }

    fn validate(&self, commit: &CommitInfo) -> Vec<ValidationError> {
        let trailers: Vec<&str> = commit
            .body
            .lines()
            .map(str::trim)
            .filter(|l| is_signoff_line(l))
            .collect();
        if trailers.is_empty() {
            return vec![ValidationError::new(
                SIGNOFF,
                ErrorCode::MissingSignoff,
                "no Signed-off-by trailer found",
            )];
        }
        trailers
            .into_iter()
            .filter(|l| !signoff_grammar().is_some_and(|g| g.is_match(l)))
            .map(|l| {
                ValidationError::new(
                    SIGNOFF,
                    ErrorCode::InvalidSignoffFormat,
                    format!("malformed trailer {l:?}"),
                )
                .with_context("line", l)
            })
            .collect()
    }
}
