use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConventionalParts {
    pub kind: String,
    pub scope: Option<String>,
    pub breaking: bool,
    pub description: String,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("subject does not follow `type(scope)!: description`: {0:?}")]
pub struct FormatError(pub String);

fn grammar() -> Option<&'static Regex> {
    static GRAMMAR: OnceLock<Option<Regex>> = OnceLock::new();
    GRAMMAR
        .get_or_init(|| Regex::new(r"^([a-z]+)(?:\(([a-z0-9/-]+)\))?(!)?:\s?(.*)$").ok())
        .as_ref()
}

/// Parses a subject line into its conventional-commit parts.
pub fn parse(subject: &str) -> Result<ConventionalParts, FormatError> {
    let caps = grammar()
        .and_then(|g| g.captures(subject))
        .ok_or_else(|| FormatError(subject.to_string()))?;
    let group = |i: usize| caps.get(i).map(|m| m.as_str()).unwrap_or("");
    Ok(ConventionalParts {
        kind: group(1).to_string(),
        scope: caps.get(2).map(|m| m.as_str().to_string()),
        breaking: caps.get(3).is_some(),
        description: group(4).to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::parse;

    #[test]
    fn parses_type_scope_breaking_and_description() {
        let p = parse("feat(api/v2)!: drop legacy endpoint").unwrap();
        assert_eq!(p.kind, "feat");
        assert_eq!(p.scope.as_deref(), Some("api/v2"));
        assert!(p.breaking);
        assert_eq!(p.description, "drop legacy endpoint");
    }

    #[test]
    fn space_after_colon_is_optional() {
        let p = parse("fix:typo").unwrap();
        assert_eq!(p.kind, "fix");
        assert_eq!(p.scope, None);
        assert!(!p.breaking);
        assert_eq!(p.description, "typo");
    }

    #[test]
    fn empty_description_still_parses() {
        let p = parse("docs: ").unwrap();
        assert_eq!(p.description, "");
    }

    #[test]
    fn format_failures_are_not_classified() {
        for bad in [
            "bad commit message",
            "Feat: upper type",
            "feat(scope: unclosed",
            "feat(Scope): upper scope",
            "feat(): empty scope",
            "feat add no colon",
            "",
        ] {
            assert!(parse(bad).is_err(), "{bad:?} should not parse");
        }
    }
}
