use crate::domain::config::JiraConfig;
use crate::domain::errors::{ErrorCode, ValidationError};
use crate::domain::models::CommitInfo;
use crate::rules::Rule;
use anyhow::Context;
use regex::Regex;

pub const NAME: &str = "jira-reference";
pub const HELP: &str = "Commit must reference a Jira issue matching jira.pattern.";

pub struct JiraReference {
    pattern: Regex,
    projects: Vec<String>,
    check_body: bool,
}

impl JiraReference {
    pub fn new(cfg: &JiraConfig) -> anyhow::Result<Self> {
        let pattern = Regex::new(&cfg.pattern)
            .with_context(|| format!("invalid jira.pattern {:?}", cfg.pattern))?;
        Ok(Self {
            pattern,
            projects: cfg.projects.clone(),
            check_body: cfg.check_body,
        })
    }
}

impl Rule for JiraReference {
    fn name(&self) -> &'static str {
        NAME
    }

    fn help(&self) -> &'static str {
        HELP
    }

    fn validate(&self, commit: &CommitInfo) -> Vec<ValidationError> {
        let mut refs: Vec<&str> = self
            .pattern
            .find_iter(&commit.subject)
            .map(|m| m.as_str())
            .collect();
        if self.check_body {
            refs.extend(self.pattern.find_iter(&commit.body).map(|m| m.as_str()));
        }
        if refs.is_empty() {
            return vec![ValidationError::new(
                NAME,
                ErrorCode::MissingJiraReference,
                "no Jira issue reference found",
            )
            .with_context("pattern", self.pattern.as_str())];
        }
        if self.projects.is_empty() {
            return vec![];
        }
        let allowed = self.projects.join(", ");
        refs.into_iter()
            .filter(|r| {
                let project = r.split('-').next().unwrap_or(r);
                !self.projects.iter().any(|p| p == project)
            })
            .map(|r| {
                ValidationError::new(
                    NAME,
                    ErrorCode::InvalidJiraProject,
                    format!("{r} does not belong to an allowed project"),
                )
                .with_help(format!("Reference an issue from: {allowed}."))
                .with_context("reference", r)
                .with_context("allowed_projects", &allowed)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(projects: &[&str], check_body: bool) -> JiraReference {
        JiraReference::new(&JiraConfig {
            projects: projects.iter().map(|s| s.to_string()).collect(),
            check_body,
            ..JiraConfig::default()
        })
        .unwrap()
    }

    fn codes(r: &JiraReference, message: &str) -> Vec<ErrorCode> {
        r.validate(&CommitInfo::from_message(message))
            .into_iter()
            .map(|e| e.code)
            .collect()
    }

    #[test]
    fn subject_reference_satisfies_the_rule() {
        assert!(codes(&rule(&[], false), "feat: add login PROJ-42").is_empty());
        assert_eq!(
            codes(&rule(&[], false), "feat: add login"),
            vec![ErrorCode::MissingJiraReference]
        );
    }

    #[test]
    fn body_is_searched_only_when_enabled() {
        let msg = "feat: add login\n\nRefs: PROJ-42";
        assert_eq!(codes(&rule(&[], false), msg), vec![ErrorCode::MissingJiraReference]);
        assert!(codes(&rule(&[], true), msg).is_empty());
    }

    #[test]
    fn project_allow_list_is_enforced_per_reference() {
        let r = rule(&["PROJ"], true);
        let errs = r.validate(&CommitInfo::from_message(
            "feat: add login PROJ-1\n\nAlso OPS-7",
        ));
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].code, ErrorCode::InvalidJiraProject);
        assert_eq!(errs[0].context["reference"], "OPS-7");
    }
}
