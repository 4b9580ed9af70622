use crate::domain::models::SshSecuritySettings;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONVENTIONAL_TYPES: &[&str] = &[
    "feat", "fix", "docs", "style", "refactor", "perf", "test", "build", "ci", "chore", "revert",
];

fn default_subject_case() -> String {
    "lower".to_string()
}

fn default_subject_max_length() -> usize {
    100
}

fn default_invalid_suffixes() -> String {
    ".,;:!?".to_string()
}

fn default_conventional_types() -> Vec<String> {
    DEFAULT_CONVENTIONAL_TYPES
        .iter()
        .map(|t| t.to_string())
        .collect()
}

fn default_true() -> bool {
    true
}

fn default_description_length() -> usize {
    72
}

fn default_allowed_signature_types() -> Vec<String> {
    vec!["ssh".to_string(), "gpg".to_string()]
}

fn default_namespace() -> String {
    "git".to_string()
}

fn default_min_rsa_bits() -> u32 {
    2048
}

fn default_min_ec_bits() -> u32 {
    256
}

fn default_locale() -> String {
    "US".to_string()
}

fn default_jira_pattern() -> String {
    "[A-Z][A-Z0-9]+-[0-9]+".to_string()
}

fn default_reference() -> String {
    "main".to_string()
}

fn default_max_ahead() -> usize {
    5
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub subject: SubjectConfig,
    #[serde(default)]
    pub body: BodyConfig,
    #[serde(default)]
    pub conventional: ConventionalConfig,
    #[serde(default)]
    pub signature: SignatureConfig,
    #[serde(default)]
    pub spell: SpellConfig,
    #[serde(default)]
    pub jira: JiraConfig,
    #[serde(default)]
    pub repo: RepoConfig,
    #[serde(default)]
    pub rules: RulesConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubjectConfig {
    #[serde(default = "default_subject_case")]
    pub case: String,
    #[serde(default)]
    pub allow_non_alpha: bool,
    #[serde(default = "default_subject_max_length")]
    pub max_length: usize,
    #[serde(default = "default_invalid_suffixes")]
    pub invalid_suffixes: String,
}

impl Default for SubjectConfig {
    fn default() -> Self {
        Self {
            case: default_subject_case(),
            allow_non_alpha: false,
            max_length: default_subject_max_length(),
            invalid_suffixes: default_invalid_suffixes(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BodyConfig {
    #[serde(default)]
    pub min_length: usize,
    #[serde(default)]
    pub min_lines: usize,
    #[serde(default)]
    pub allow_signoff_only: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConventionalConfig {
    #[serde(default = "default_conventional_types")]
    pub types: Vec<String>,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub require_scope: bool,
    #[serde(default = "default_true")]
    pub allow_breaking: bool,
    #[serde(default = "default_description_length")]
    pub max_description_length: usize,
}

impl Default for ConventionalConfig {
    fn default() -> Self {
        Self {
            types: default_conventional_types(),
            scopes: vec![],
            require_scope: false,
            allow_breaking: true,
            max_description_length: default_description_length(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SignatureConfig {
    #[serde(default = "default_allowed_signature_types")]
    pub allowed_types: Vec<String>,
    #[serde(default)]
    pub key_directory: String,
    #[serde(default)]
    pub allowed_signers: Vec<String>,
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(default = "default_min_rsa_bits")]
    pub minimum_rsa_bits: u32,
    #[serde(default = "default_min_ec_bits")]
    pub minimum_ec_bits: u32,
}

impl SignatureConfig {
    pub fn security(&self) -> SshSecuritySettings {
        SshSecuritySettings {
            minimum_rsa_bits: self.minimum_rsa_bits,
            minimum_ec_bits: self.minimum_ec_bits,
        }
    }
}

impl Default for SignatureConfig {
    fn default() -> Self {
        Self {
            allowed_types: default_allowed_signature_types(),
            key_directory: String::new(),
            allowed_signers: vec![],
            namespace: default_namespace(),
            minimum_rsa_bits: default_min_rsa_bits(),
            minimum_ec_bits: default_min_ec_bits(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SpellConfig {
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default)]
    pub ignore_words: Vec<String>,
}

impl Default for SpellConfig {
    fn default() -> Self {
        Self {
            locale: default_locale(),
            ignore_words: vec![],
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JiraConfig {
    #[serde(default)]
    pub projects: Vec<String>,
    #[serde(default = "default_jira_pattern")]
    pub pattern: String,
    #[serde(default)]
    pub check_body: bool,
}

impl Default for JiraConfig {
    fn default() -> Self {
        Self {
            projects: vec![],
            pattern: default_jira_pattern(),
            check_body: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RepoConfig {
    #[serde(default = "default_reference")]
    pub reference: String,
    #[serde(default = "default_max_ahead")]
    pub max_commits_ahead: usize,
    #[serde(default = "default_true")]
    pub skip_merge_commits: bool,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            reference: default_reference(),
            max_commits_ahead: default_max_ahead(),
            skip_merge_commits: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RulesConfig {
    #[serde(default)]
    pub enabled: Vec<String>,
    #[serde(default)]
    pub disabled: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let c: Config = toml::from_str("").unwrap();
        assert_eq!(c.subject.case, "lower");
        assert_eq!(c.subject.max_length, 100);
        assert_eq!(c.conventional.max_description_length, 72);
        assert_eq!(c.conventional.types.len(), 11);
        assert!(c.conventional.allow_breaking);
        assert_eq!(c.signature.security(), SshSecuritySettings::default());
        assert_eq!(c.repo.reference, "main");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let c: Config = toml::from_str(
            r#"[conventional]
max_description_length = 50
scopes = ["api"]

[rules]
enabled = ["signoff"]
"#,
        )
        .unwrap();
        assert_eq!(c.conventional.max_description_length, 50);
        assert_eq!(c.conventional.scopes, vec!["api"]);
        assert_eq!(c.conventional.types.len(), 11);
        assert_eq!(c.rules.enabled, vec!["signoff"]);
        assert_eq!(c.subject.invalid_suffixes, ".,;:!?");
    }
}
