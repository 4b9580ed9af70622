use crate::domain::config::ConventionalConfig;
use crate::domain::errors::{ErrorCode, ValidationError};
use crate::domain::models::CommitInfo;
use crate::rules::Rule;
use crate::services::conventional::parse;

pub const NAME: &str = "conventional-commit";
pub const HELP: &str =
    "Subject must follow `type(scope)!: description` with a configured type and scope.";

/// Once the subject parses, every check below is independent so one commit
/// can carry several of these errors.
pub struct ConventionalCommit {
    cfg: ConventionalConfig,
}

impl ConventionalCommit {
    pub fn new(cfg: &ConventionalConfig) -> Self {
        Self { cfg: cfg.clone() }
    }
}

impl Rule for ConventionalCommit {
    fn name(&self) -> &'static str {
        NAME
    }

    fn help(&self) -> &'static str {
        HELP
    }

    fn validate(&self, commit: &CommitInfo) -> Vec<ValidationError> {
        if commit.subject.trim().is_empty() {
            return vec![ValidationError::new(
                NAME,
                ErrorCode::EmptyDescription,
                "subject is empty",
            )];
        }
        let parts = match parse(&commit.subject) {
            Ok(p) => p,
            Err(e) => {
                return vec![ValidationError::new(
                    NAME,
                    ErrorCode::InvalidConventionalFormat,
                    e.to_string(),
                )
                .with_context("subject", &commit.subject)]
            }
        };

        let mut errors = Vec::new();
        if !self.cfg.types.is_empty() && !self.cfg.types.iter().any(|t| *t == parts.kind) {
            let allowed = self.cfg.types.join(", ");
            errors.push(
                ValidationError::new(
                    NAME,
                    ErrorCode::InvalidConventionalType,
                    format!("type {:?} is not allowed", parts.kind),
                )
                .with_help(format!("Use one of: {allowed}."))
                .with_context("type", &parts.kind)
                .with_context("allowed_types", allowed),
            );
        }

        match &parts.scope {
            None if self.cfg.require_scope => errors.push(
                ValidationError::new(
                    NAME,
                    ErrorCode::MissingConventionalScope,
                    format!("type {:?} needs a scope", parts.kind),
                )
                .with_context("type", &parts.kind),
            ),
            Some(scope)
                if !self.cfg.scopes.is_empty() && !self.cfg.scopes.iter().any(|s| s == scope) =>
            {
                let allowed = self.cfg.scopes.join(", ");
                errors.push(
                    ValidationError::new(
                        NAME,
                        ErrorCode::InvalidConventionalScope,
                        format!("scope {scope:?} is not allowed"),
                    )
                    .with_help(format!("Use one of: {allowed}."))
                    .with_context("scope", scope)
                    .with_context("allowed_scopes", allowed),
                )
            }
            _ => {}
        }

        if parts.breaking && !self.cfg.allow_breaking {
            errors.push(
                ValidationError::new(
                    NAME,
                    ErrorCode::BreakingChangeNotAllowed,
                    "breaking change marker `!` is not allowed",
                )
                .with_context("type", &parts.kind),
            );
        }

        let actual = parts.description.chars().count();
        if parts.description.trim().is_empty() {
            errors.push(ValidationError::new(
                NAME,
                ErrorCode::EmptyDescription,
                "description after the colon is empty",
            ));
        } else if actual > self.cfg.max_description_length {
            errors.push(
                ValidationError::new(
                    NAME,
                    ErrorCode::ConventionalDescTooLong,
                    format!(
                        "description is {actual} characters, limit is {}",
                        self.cfg.max_description_length
                    ),
                )
                .with_context("actual_length", actual)
                .with_context("max_length", self.cfg.max_description_length),
            );
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(cfg: ConventionalConfig, subject: &str) -> Vec<ErrorCode> {
        ConventionalCommit::new(&cfg)
            .validate(&CommitInfo::from_message(subject))
            .into_iter()
            .map(|e| e.code)
            .collect()
    }

    fn scoped() -> ConventionalConfig {
        ConventionalConfig {
            scopes: vec!["api".to_string(), "cli".to_string()],
            ..ConventionalConfig::default()
        }
    }

    #[test]
    fn well_formed_subjects_pass() {
        for s in ["feat: add feature", "fix(api): handle null", "chore(cli)!: drop flag"] {
            assert!(check(scoped(), s).is_empty(), "{s}");
        }
    }

    #[test]
    fn format_failure_stops_the_rule() {
        assert_eq!(
            check(ConventionalConfig::default(), "bad commit message"),
            vec![ErrorCode::InvalidConventionalFormat]
        );
    }

    #[test]
    fn each_dimension_reports_exactly_its_code() {
        assert_eq!(
            check(scoped(), "wip: add feature"),
            vec![ErrorCode::InvalidConventionalType]
        );
        assert_eq!(
            check(scoped(), "feat(db): add index"),
            vec![ErrorCode::InvalidConventionalScope]
        );
        let required = ConventionalConfig {
            require_scope: true,
            ..ConventionalConfig::default()
        };
        assert_eq!(
            check(required, "feat: add index"),
            vec![ErrorCode::MissingConventionalScope]
        );
        let short = ConventionalConfig {
            max_description_length: 50,
            ..ConventionalConfig::default()
        };
        assert_eq!(
            check(
                short,
                "feat: this is a very long commit message that exceeds our custom limit"
            ),
            vec![ErrorCode::ConventionalDescTooLong]
        );
    }

    #[test]
    fn violations_accumulate_after_a_parse() {
        let cfg = ConventionalConfig {
            require_scope: true,
            allow_breaking: false,
            max_description_length: 3,
            ..ConventionalConfig::default()
        };
        assert_eq!(
            check(cfg, "wip!: long text"),
            vec![
                ErrorCode::InvalidConventionalType,
                ErrorCode::MissingConventionalScope,
                ErrorCode::BreakingChangeNotAllowed,
                ErrorCode::ConventionalDescTooLong,
            ]
        );
    }

    #[test]
    fn empty_type_list_allows_any_type() {
        let cfg = ConventionalConfig {
            types: vec![],
            ..ConventionalConfig::default()
        };
        assert!(check(cfg, "wip: add feature").is_empty());
    }

    #[test]
    fn empty_subject_and_description() {
        assert_eq!(
            check(ConventionalConfig::default(), ""),
            vec![ErrorCode::EmptyDescription]
        );
        assert_eq!(
            check(ConventionalConfig::default(), "feat: "),
            vec![ErrorCode::EmptyDescription]
        );
    }

    #[test]
    fn type_error_lists_allowed_types() {
        let errs = ConventionalCommit::new(&ConventionalConfig::default())
            .validate(&CommitInfo::from_message("wip: x"));
        assert!(errs[0].help.contains("feat"));
        assert_eq!(errs[0].context["type"], "wip");
    }
}
