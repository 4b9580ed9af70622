//! Runs a resolved [`RuleSet`] over commits.

use crate::domain::errors::ValidationError;
use crate::domain::models::{CommitInfo, CommitReport, RuleOutcome, RunReport};
use crate::rules::{Rule, RuleSet};
use crate::services::git::Repository;
use crate::services::report::build_run_report;

fn outcome(name: &str, help: &str, errors: &[ValidationError]) -> RuleOutcome {
    RuleOutcome {
        rule: name.to_string(),
        help: help.to_string(),
        passed: errors.is_empty(),
        error_count: errors.len(),
    }
}

fn run_commit_rules(commit: &CommitInfo, rules: &[Box<dyn Rule>]) -> CommitReport {
    let mut outcomes = Vec::with_capacity(rules.len());
    let mut errors = Vec::new();
    for rule in rules {
        let found = rule.validate(commit);
        tracing::debug!(
            commit = %commit.short_hash(),
            rule = rule.name(),
            errors = found.len(),
            "rule evaluated"
        );
        outcomes.push(outcome(rule.name(), rule.help(), &found));
        errors.extend(found);
    }
    CommitReport {
        hash: commit.hash.clone(),
        subject: commit.subject.clone(),
        valid: errors.is_empty(),
        rules: outcomes,
        errors,
    }
}

fn run_repository_rules(set: &RuleSet, repo: &dyn Repository) -> (Vec<RuleOutcome>, Vec<ValidationError>) {
    let mut outcomes = Vec::new();
    let mut errors = Vec::new();
    for rule in &set.repository {
        let found = rule.validate_repository(repo);
        tracing::debug!(rule = rule.name(), errors = found.len(), "repository rule evaluated");
        outcomes.push(outcome(rule.name(), rule.help(), &found));
        errors.extend(found);
    }
    (outcomes, errors)
}

/// Validates one commit with every active rule, repository rules included.
/// Errors are concatenated in rule order.
pub fn validate_commit(commit: &CommitInfo, set: &RuleSet, repo: &dyn Repository) -> CommitReport {
    let mut report = run_commit_rules(commit, &set.commit);
    let (outcomes, errors) = run_repository_rules(set, repo);
    report.rules.extend(outcomes);
    report.errors.extend(errors);
    report.valid = report.errors.is_empty();
    report
}

/// Validates many commits. Repository rules run once for the whole run and
/// land in `repository_errors` rather than on any single commit.
pub fn validate_commits(
    commits: &[CommitInfo],
    set: &RuleSet,
    repo: &dyn Repository,
    skip_merge_commits: bool,
) -> RunReport {
    let mut reports = Vec::with_capacity(commits.len());
    let mut skipped = 0;
    for commit in commits {
        if skip_merge_commits && commit.is_merge {
            tracing::debug!(commit = %commit.short_hash(), "skipping merge commit");
            skipped += 1;
            continue;
        }
        reports.push(run_commit_rules(commit, &set.commit));
    }
    let (_, repository_errors) = run_repository_rules(set, repo);
    build_run_report(reports, skipped, repository_errors)
}
