use crate::domain::errors::{ErrorCode, ValidationError, ERROR_CODE_SCHEMA_VERSION};
use crate::domain::models::{CommitReport, RunReport};
use std::collections::BTreeSet;

fn recommendation(code: ErrorCode) -> Option<&'static str> {
    let text = match code {
        ErrorCode::InvalidConventionalFormat | ErrorCode::InvalidFormat => {
            "Reword subjects as `type(scope): description` (git commit --amend or git rebase -i)."
        }
        ErrorCode::SubjectTooLong | ErrorCode::ConventionalDescTooLong => {
            "Shorten long subjects and move detail into the commit body."
        }
        ErrorCode::MissingSignoff | ErrorCode::InvalidSignoffFormat => {
            "Add sign-off trailers with `git commit --amend -s` or `git rebase --signoff`."
        }
        ErrorCode::MissingSignature => {
            "Enable signing with `git config commit.gpgsign true` and re-sign the commits."
        }
        ErrorCode::InvalidKeyDirectory | ErrorCode::NoTrustedKeys => {
            "Run `gitward keys list` and make sure signature.key_directory holds trusted *.pub keys."
        }
        ErrorCode::VerificationFailed | ErrorCode::UnauthorizedSigner => {
            "Re-sign with a trusted key (`gitward verify --ref <commit>` shows which key matched)."
        }
        ErrorCode::TooManyCommitsAhead => "Squash the branch before merging.",
        ErrorCode::RepositoryError => {
            "Fetch the reference branch (`git fetch`) so it exists locally."
        }
        _ => return None,
    };
    Some(text)
}

pub fn build_run_report(
    commits: Vec<CommitReport>,
    skipped: usize,
    repository_errors: Vec<ValidationError>,
) -> RunReport {
    let failed = commits.iter().filter(|c| !c.valid).count();
    let valid = failed == 0 && repository_errors.is_empty();
    let overall = if valid { "ok" } else { "needs_attention" }.to_string();

    let codes: BTreeSet<ErrorCode> = commits
        .iter()
        .flat_map(|c| c.errors.iter())
        .chain(repository_errors.iter())
        .map(|e| e.code)
        .collect();
    let mut recommendations: Vec<String> = Vec::new();
    for text in codes.into_iter().filter_map(recommendation) {
        if !recommendations.iter().any(|r| r == text) {
            recommendations.push(text.to_string());
        }
    }

    RunReport {
        schema_version: ERROR_CODE_SCHEMA_VERSION,
        overall,
        valid,
        total: commits.len(),
        failed,
        skipped,
        commits,
        repository_errors,
        recommendations,
    }
}
