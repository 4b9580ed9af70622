use crate::domain::config::RepoConfig;
use crate::domain::errors::{ErrorCode, ValidationError};
use crate::rules::RepositoryRule;
use crate::services::git::Repository;

pub const NAME: &str = "branch-ahead";
pub const HELP: &str =
    "HEAD must be at most repo.max_commits_ahead commits ahead of repo.reference.";

pub struct BranchAhead {
    reference: String,
    max: usize,
}

impl BranchAhead {
    pub fn new(cfg: &RepoConfig) -> Self {
        Self {
            reference: cfg.reference.clone(),
            max: cfg.max_commits_ahead,
        }
    }
}

impl RepositoryRule for BranchAhead {
    fn name(&self) -> &'static str {
        NAME
    }

    fn help(&self) -> &'static str {
        HELP
    }

    fn validate_repository(&self, repo: &dyn Repository) -> Vec<ValidationError> {
        match repo.commits_ahead(&self.reference) {
            Ok(actual) if actual > self.max => vec![ValidationError::new(
                NAME,
                ErrorCode::TooManyCommitsAhead,
                format!(
                    "HEAD is {actual} commits ahead of {}, limit is {}",
                    self.reference, self.max
                ),
            )
            .with_context("reference", &self.reference)
            .with_context("actual", actual)
            .with_context("max", self.max)],
            Ok(_) => vec![],
            Err(e) => vec![ValidationError::new(NAME, ErrorCode::RepositoryError, e.to_string())
                .with_context("reference", &self.reference)],
        }
    }
}
