//! Rule registry.
//!
//! ## Rule map
//! - `subject.rs` - subject length, first-letter case, trailing punctuation.
//! - `conventional.rs` - `type(scope)!: description` policy.
//! - `body.rs` - body presence/size and `Signed-off-by` trailers.
//! - `signature.rs` - signature presence/encoding and trusted-key verification.
//! - `spell.rs` - dictionary spelling check over subject and body.
//! - `jira.rs` - issue references.
//! - `branch.rs` - repository-level checks (commits ahead of a reference).
//!
//! ## Conventions
//! - A rule is built once from its config slice and is pure afterwards.
//! - Rules never see each other's errors.
//! - Execution order is the order of [`RULES`], whatever the config says.

pub mod body;
pub mod branch;
pub mod conventional;
pub mod jira;
pub mod signature;
pub mod spell;
pub mod subject;

use crate::domain::config::{Config, RulesConfig};
use crate::domain::errors::ValidationError;
use crate::domain::models::{CommitInfo, RuleListItem};
use crate::services::git::Repository;
use std::collections::BTreeSet;

pub trait Rule {
    fn name(&self) -> &'static str;
    fn help(&self) -> &'static str;
    fn validate(&self, commit: &CommitInfo) -> Vec<ValidationError>;
}

/// Branch-level checks that need the repository rather than one commit.
pub trait RepositoryRule {
    fn name(&self) -> &'static str;
    fn help(&self) -> &'static str;
    fn validate_repository(&self, repo: &dyn Repository) -> Vec<ValidationError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleScope {
    Commit,
    Repository,
}

impl RuleScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Commit => "commit",
            Self::Repository => "repository",
        }
    }
}

pub struct RuleSpec {
    pub name: &'static str,
    pub help: &'static str,
    pub default_enabled: bool,
    pub scope: RuleScope,
}

const fn commit_rule(name: &'static str, help: &'static str, default_enabled: bool) -> RuleSpec {
    RuleSpec {
        name,
        help,
        default_enabled,
        scope: RuleScope::Commit,
    }
}

pub const RULES: &[RuleSpec] = &[
    commit_rule(subject::LENGTH, subject::LENGTH_HELP, true),
    commit_rule(conventional::NAME, conventional::HELP, true),
    commit_rule(subject::CASE, subject::CASE_HELP, true),
    commit_rule(subject::SUFFIX, subject::SUFFIX_HELP, true),
    commit_rule(body::BODY, body::BODY_HELP, false),
    commit_rule(body::SIGNOFF, body::SIGNOFF_HELP, false),
    commit_rule(signature::SIGNATURE, signature::SIGNATURE_HELP, false),
    commit_rule(signature::SIGNED_IDENTITY, signature::SIGNED_IDENTITY_HELP, false),
    commit_rule(spell::NAME, spell::HELP, false),
    commit_rule(jira::NAME, jira::HELP, false),
    RuleSpec {
        name: branch::NAME,
        help: branch::HELP,
        default_enabled: false,
        scope: RuleScope::Repository,
    },
];

pub fn find_rule(name: &str) -> Option<&'static RuleSpec> {
    RULES.iter().find(|r| r.name == name)
}

/// Names of the rules to run, in declaration order.
///
/// Defaults, plus `enabled`, minus `disabled`. A name listed in both is
/// kept: an explicit opt-in beats an opt-out.
pub fn resolve_active(cfg: &RulesConfig) -> Vec<&'static str> {
    for name in cfg.enabled.iter().chain(cfg.disabled.iter()) {
        if find_rule(name).is_none() {
            tracing::warn!(rule = %name, "ignoring unknown rule name in configuration");
        }
    }
    let enabled: BTreeSet<&str> = cfg.enabled.iter().map(String::as_str).collect();
    let disabled: BTreeSet<&str> = cfg.disabled.iter().map(String::as_str).collect();
    RULES
        .iter()
        .filter(|r| {
            enabled.contains(r.name) || (r.default_enabled && !disabled.contains(r.name))
        })
        .map(|r| r.name)
        .collect()
}

pub fn list_rules(cfg: &RulesConfig) -> Vec<RuleListItem> {
    let active = resolve_active(cfg);
    RULES
        .iter()
        .map(|r| RuleListItem {
            name: r.name.to_string(),
            active: active.contains(&r.name),
            default_enabled: r.default_enabled,
            scope: r.scope.as_str().to_string(),
            help: r.help.to_string(),
        })
        .collect()
}

#[derive(Default)]
pub struct RuleSet {
    pub commit: Vec<Box<dyn Rule>>,
    pub repository: Vec<Box<dyn RepositoryRule>>,
}

impl RuleSet {
    pub fn names(&self) -> Vec<&'static str> {
        self.commit
            .iter()
            .map(|r| r.name())
            .chain(self.repository.iter().map(|r| r.name()))
            .collect()
    }
}

/// Instantiates the active rules from `config`. Fails only when a
/// configured value cannot be compiled (an invalid Jira pattern).
pub fn build(config: &Config) -> anyhow::Result<RuleSet> {
    let active = resolve_active(&config.rules);
    let conventional_mode = active.contains(&conventional::NAME);
    let mut set = RuleSet::default();
    for name in &active {
        match *name {
            subject::LENGTH => set
                .commit
                .push(Box::new(subject::SubjectLength::new(&config.subject))),
            conventional::NAME => set.commit.push(Box::new(
                conventional::ConventionalCommit::new(&config.conventional),
            )),
            subject::CASE => set.commit.push(Box::new(subject::SubjectCase::new(
                &config.subject,
                conventional_mode,
            ))),
            subject::SUFFIX => set
                .commit
                .push(Box::new(subject::SubjectSuffix::new(&config.subject))),
            body::BODY => set.commit.push(Box::new(body::CommitBody::new(&config.body))),
            body::SIGNOFF => set.commit.push(Box::new(body::Signoff::new())),
            signature::SIGNATURE => set
                .commit
                .push(Box::new(signature::SignaturePresence::new(&config.signature))),
            signature::SIGNED_IDENTITY => set
                .commit
                .push(Box::new(signature::SignedIdentity::new(&config.signature))),
            spell::NAME => set.commit.push(Box::new(spell::Spell::new(&config.spell))),
            jira::NAME => set
                .commit
                .push(Box::new(jira::JiraReference::new(&config.jira)?)),
            branch::NAME => set
                .repository
                .push(Box::new(branch::BranchAhead::new(&config.repo))),
            other => tracing::warn!(rule = %other, "rule has no builder"),
        }
    }
    tracing::debug!(rules = ?set.names(), "rules resolved");
    Ok(set)
}
