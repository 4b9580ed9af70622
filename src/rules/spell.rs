use crate::domain::config::SpellConfig;
use crate::domain::errors::{ErrorCode, ValidationError};
use crate::domain::models::CommitInfo;
use crate::rules::Rule;
use crate::services::spelling::{check, Locale};
use std::collections::HashSet;

pub const NAME: &str = "spell";
pub const HELP: &str = "Subject and body must not contain common misspellings for spell.locale.";

pub struct Spell {
    locale: Locale,
    ignore: HashSet<String>,
}

impl Spell {
    pub fn new(cfg: &SpellConfig) -> Self {
        Self {
            locale: Locale::parse(&cfg.locale),
            ignore: cfg.ignore_words.iter().map(|w| w.to_lowercase()).collect(),
        }
    }
}

impl Rule for Spell {
    fn name(&self) -> &'static str {
        NAME
    }

    fn help(&self) -> &'static str {
        HELP
    }

    fn validate(&self, commit: &CommitInfo) -> Vec<ValidationError> {
        [commit.subject.as_str(), commit.body.as_str()]
            .into_iter()
            .flat_map(|text| check(text, self.locale))
            .filter(|m| !self.ignore.contains(&m.word.to_lowercase()))
            .map(|m| {
                ValidationError::new(
                    NAME,
                    ErrorCode::MisspelledWord,
                    format!("{:?} is misspelled; did you mean {:?}?", m.word, m.suggestion),
                )
                .with_context("word", &m.word)
                .with_context("suggestion", &m.suggestion)
                .with_context("locale", self.locale.as_str())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_error_per_finding_across_subject_and_body() {
        let rule = Spell::new(&SpellConfig::default());
        let errs = rule.validate(&CommitInfo::from_message(
            "fix: recieve events\n\nThe enviroment was wrong.",
        ));
        let words: Vec<_> = errs.iter().map(|e| e.context["word"].as_str()).collect();
        assert_eq!(words, vec!["recieve", "enviroment"]);
        assert!(errs.iter().all(|e| e.code == ErrorCode::MisspelledWord));
        assert_eq!(errs[0].context["locale"], "US");
    }

    #[test]
    fn ignore_words_are_case_insensitive() {
        let rule = Spell::new(&SpellConfig {
            locale: "UK".to_string(),
            ignore_words: vec!["Color".to_string()],
        });
        assert!(rule
            .validate(&CommitInfo::from_message("fix: color picker"))
            .is_empty());
        let errs = rule.validate(&CommitInfo::from_message("fix: optimize picker"));
        assert_eq!(errs[0].context["suggestion"], "optimise");
    }
}
