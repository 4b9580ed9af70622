use crate::domain::config::SubjectConfig;
use crate::domain::errors::{ErrorCode, ValidationError};
use crate::domain::models::CommitInfo;
use crate::rules::Rule;
use crate::services::conventional;

pub const LENGTH: &str = "subject-length";
pub const LENGTH_HELP: &str = "Subject line must not exceed subject.max_length characters.";
pub const CASE: &str = "subject-case";
pub const CASE_HELP: &str =
    "First letter of the subject (or conventional description) must match subject.case.";
pub const SUFFIX: &str = "subject-suffix";
pub const SUFFIX_HELP: &str = "Subject must not end with any of subject.invalid_suffixes.";

pub struct SubjectLength {
    max_length: usize,
}

impl SubjectLength {
    pub fn new(cfg: &SubjectConfig) -> Self {
        Self {
            max_length: cfg.max_length,
        }
    }
}

impl Rule for SubjectLength {
    fn name(&self) -> &'static str {
        LENGTH
    }

    fn help(&self) -> &'static str {
        LENGTH_HELP
    }

    fn validate(&self, commit: &CommitInfo) -> Vec<ValidationError> {
        let actual = commit.subject.chars().count();
        if actual <= self.max_length {
            return vec![];
        }
        vec![ValidationError::new(
            LENGTH,
            ErrorCode::SubjectTooLong,
            format!(
                "subject is {actual} characters, limit is {}",
                self.max_length
            ),
        )
        .with_context("actual_length", actual)
        .with_context("max_length", self.max_length)]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseChoice {
    Upper,
    Lower,
    Ignore,
}

impl CaseChoice {
    /// Unrecognised values fall back to `lower`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "upper" => Self::Upper,
            "ignore" => Self::Ignore,
            _ => Self::Lower,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Upper => "upper",
            Self::Lower => "lower",
            Self::Ignore => "ignore",
        }
    }
}

pub struct SubjectCase {
    choice: CaseChoice,
    allow_non_alpha: bool,
    conventional: bool,
}

impl SubjectCase {
    pub fn new(cfg: &SubjectConfig, conventional: bool) -> Self {
        Self {
            choice: CaseChoice::parse(&cfg.case),
            allow_non_alpha: cfg.allow_non_alpha,
            conventional,
        }
    }

    fn invalid_case(&self, actual: &str) -> ValidationError {
        ValidationError::new(
            CASE,
            ErrorCode::InvalidCase,
            format!(
                "first letter should be {}case, found {actual}",
                self.choice.as_str()
            ),
        )
        .with_context("expected_case", self.choice.as_str())
        .with_context("actual_case", actual)
    }
}

impl Rule for SubjectCase {
    fn name(&self) -> &'static str {
        CASE
    }

    fn help(&self) -> &'static str {
        CASE_HELP
    }

    fn validate(&self, commit: &CommitInfo) -> Vec<ValidationError> {
        if commit.subject.trim().is_empty() {
            return vec![ValidationError::new(
                CASE,
                ErrorCode::EmptyDescription,
                "subject is empty",
            )];
        }

        let text = if self.conventional {
            match conventional::parse(&commit.subject) {
                Ok(parts) => parts.description,
                Err(e) => {
                    return vec![ValidationError::new(CASE, ErrorCode::InvalidFormat, e.to_string())
                        .with_context("subject", &commit.subject)]
                }
            }
        } else {
            commit.subject.clone()
        };

        if self.choice == CaseChoice::Ignore {
            return vec![];
        }
        let Some(first) = text.trim_start().chars().next() else {
            // Conventional description left empty; conventional-commit reports it.
            return vec![];
        };

        if !first.is_alphabetic() {
            if self.allow_non_alpha {
                return vec![];
            }
            return vec![self.invalid_case("non-alphabetic")];
        }
        let ok = match self.choice {
            CaseChoice::Upper => first.is_uppercase(),
            CaseChoice::Lower => first.is_lowercase(),
            CaseChoice::Ignore => true,
        };
        if ok {
            return vec![];
        }
        let actual = if first.is_uppercase() { "upper" } else { "lower" };
        vec![self.invalid_case(actual)]
    }
}

pub struct SubjectSuffix {
    invalid_suffixes: String,
}

impl SubjectSuffix {
    pub fn new(cfg: &SubjectConfig) -> Self {
        Self {
            invalid_suffixes: cfg.invalid_suffixes.clone(),
        }
    }
}

impl Rule for SubjectSuffix {
    fn name(&self) -> &'static str {
        SUFFIX
    }

    fn help(&self) -> &'static str {
        SUFFIX_HELP
    }

    fn validate(&self, commit: &CommitInfo) -> Vec<ValidationError> {
        match commit.subject.trim_end().chars().last() {
            Some(last) if self.invalid_suffixes.contains(last) => vec![ValidationError::new(
                SUFFIX,
                ErrorCode::InvalidSuffix,
                format!("subject ends with {last:?}"),
            )
            .with_context("suffix", last)
            .with_context("invalid_suffixes", &self.invalid_suffixes)],
            _ => vec![],
        }
    }
}
