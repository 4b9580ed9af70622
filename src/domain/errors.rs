use serde::Serialize;
use std::collections::BTreeMap;

/// Bumped whenever a code is added, removed or renamed.
pub const ERROR_CODE_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    EmptyDescription,
    InvalidFormat,
    InvalidCase,
    SubjectTooLong,
    InvalidSuffix,
    InvalidConventionalFormat,
    InvalidConventionalType,
    MissingConventionalScope,
    InvalidConventionalScope,
    BreakingChangeNotAllowed,
    ConventionalDescTooLong,
    MissingBody,
    BodyTooShort,
    BodyTooFewLines,
    MissingSignoff,
    InvalidSignoffFormat,
    MissingSignature,
    DisallowedSignatureType,
    InvalidSignatureFormat,
    InvalidSignature,
    InvalidKeyDirectory,
    NoTrustedKeys,
    VerificationFailed,
    UnauthorizedSigner,
    MisspelledWord,
    MissingJiraReference,
    InvalidJiraProject,
    TooManyCommitsAhead,
    RepositoryError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmptyDescription => "empty_description",
            Self::InvalidFormat => "invalid_format",
            Self::InvalidCase => "invalid_case",
            Self::SubjectTooLong => "subject_too_long",
            Self::InvalidSuffix => "invalid_suffix",
            Self::InvalidConventionalFormat => "invalid_conventional_format",
            Self::InvalidConventionalType => "invalid_conventional_type",
            Self::MissingConventionalScope => "missing_conventional_scope",
            Self::InvalidConventionalScope => "invalid_conventional_scope",
            Self::BreakingChangeNotAllowed => "breaking_change_not_allowed",
            Self::ConventionalDescTooLong => "conventional_desc_too_long",
            Self::MissingBody => "missing_body",
            Self::BodyTooShort => "body_too_short",
            Self::BodyTooFewLines => "body_too_few_lines",
            Self::MissingSignoff => "missing_signoff",
            Self::InvalidSignoffFormat => "invalid_signoff_format",
            Self::MissingSignature => "missing_signature",
            Self::DisallowedSignatureType => "disallowed_signature_type",
            Self::InvalidSignatureFormat => "invalid_signature_format",
            Self::InvalidSignature => "invalid_signature",
            Self::InvalidKeyDirectory => "invalid_key_directory",
            Self::NoTrustedKeys => "no_trusted_keys",
            Self::VerificationFailed => "verification_failed",
            Self::UnauthorizedSigner => "unauthorized_signer",
            Self::MisspelledWord => "misspelled_word",
            Self::MissingJiraReference => "missing_jira_reference",
            Self::InvalidJiraProject => "invalid_jira_project",
            Self::TooManyCommitsAhead => "too_many_commits_ahead",
            Self::RepositoryError => "repository_error",
        }
    }

    /// Fallback help text; rules override it when they know more.
    pub fn default_help(&self) -> &'static str {
        match self {
            Self::EmptyDescription => "Write a short description of the change.",
            Self::InvalidFormat | Self::InvalidConventionalFormat => {
                "Use the form `type(scope)!: description`, e.g. `feat(parser): add array support`."
            }
            Self::InvalidCase => "Adjust the case of the first letter of the subject.",
            Self::SubjectTooLong => "Shorten the subject line; move details into the body.",
            Self::InvalidSuffix => "Remove the trailing punctuation from the subject.",
            Self::InvalidConventionalType => "Use one of the configured commit types.",
            Self::MissingConventionalScope => "Add a scope in parentheses after the type.",
            Self::InvalidConventionalScope => "Use one of the configured scopes.",
            Self::BreakingChangeNotAllowed => "Breaking changes (`!`) are not allowed here.",
            Self::ConventionalDescTooLong => "Shorten the description after the colon.",
            Self::MissingBody => "Add a body explaining what changed and why.",
            Self::BodyTooShort | Self::BodyTooFewLines => "Expand the commit body.",
            Self::MissingSignoff | Self::InvalidSignoffFormat => {
                "Add `Signed-off-by: Name <email>` (git commit -s)."
            }
            Self::MissingSignature => "Sign the commit (git commit -S).",
            Self::DisallowedSignatureType => "Sign with one of the allowed signature types.",
            Self::InvalidSignatureFormat | Self::InvalidSignature => {
                "The signature could not be decoded; re-sign the commit."
            }
            Self::InvalidKeyDirectory => "Point `signature.key_directory` at an existing directory.",
            Self::NoTrustedKeys => "Place trusted public keys (*.pub) in the key directory.",
            Self::VerificationFailed => "Sign with a key present in the trusted key directory.",
            Self::UnauthorizedSigner => "Sign with a key belonging to an allowed signer.",
            Self::MisspelledWord => "Fix the spelling or add the word to `spell.ignore_words`.",
            Self::MissingJiraReference => "Reference the Jira issue, e.g. `PROJ-123`.",
            Self::InvalidJiraProject => "Reference an issue from one of the allowed projects.",
            Self::TooManyCommitsAhead => "Squash or split the branch before merging.",
            Self::RepositoryError => "Check that the reference exists in the repository.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub rule: String,
    pub code: ErrorCode,
    pub message: String,
    pub help: String,
    pub context: BTreeMap<String, String>,
}

impl ValidationError {
    pub fn new(rule: &str, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            rule: rule.to_string(),
            code,
            message: message.into(),
            help: code.default_help().to_string(),
            context: BTreeMap::new(),
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    pub fn with_context(mut self, key: &str, value: impl ToString) -> Self {
        self.context.insert(key.to_string(), value.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_serializes_as_snake_case() {
        let v = serde_json::to_value(ErrorCode::ConventionalDescTooLong).unwrap();
        assert_eq!(v, "conventional_desc_too_long");
        assert_eq!(
            ErrorCode::ConventionalDescTooLong.as_str(),
            "conventional_desc_too_long"
        );
    }

    #[test]
    fn new_error_carries_default_help() {
        let e = ValidationError::new("signoff", ErrorCode::MissingSignoff, "missing")
            .with_context("line", 3);
        assert!(e.help.contains("Signed-off-by"));
        assert_eq!(e.context.get("line").map(String::as_str), Some("3"));
    }
}
