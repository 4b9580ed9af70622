use crate::commands::Handled;
use crate::*;
use anyhow::Context;

pub fn handle_runtime_commands(cli: &Cli, config: &Config) -> anyhow::Result<Handled> {
    match &cli.command {
        Commands::Validate(args) => {
            let repo = GitCli::new(&cli.repo);
            let set = rules::build(config)?;
            let report = match &args.message_file {
                Some(path) => {
                    let raw = std::fs::read_to_string(path)
                        .with_context(|| format!("cannot read message file {}", path.display()))?;
                    let commit = CommitInfo::from_message(&raw);
                    build_run_report(vec![validate_commit(&commit, &set, &repo)], 0, vec![])
                }
                None => {
                    let commits = select_commits(&repo, args)?;
                    tracing::debug!(commits = commits.len(), "validating");
                    validate_commits(&commits, &set, &repo, config.repo.skip_merge_commits)
                }
            };
            print_one(cli.json, report.valid, &report, |r| render_run_report(r))?;
            Ok(Handled::from_verdict(report.valid))
        }
        Commands::Verify { reference } => {
            let repo = GitCli::new(&cli.repo);
            let commit = repo
                .commit(reference)
                .with_context(|| format!("cannot read commit {reference}"))?;
            let result = SignatureVerifier::from_config(&config.signature).verify_commit(&commit);
            let verified = result.is_verified();
            print_one(cli.json, verified, &result, |r| {
                render_verification(&commit, r)
            })?;
            Ok(Handled::from_verdict(verified))
        }
        _ => Ok(Handled::No),
    }
}

fn select_commits(repo: &GitCli, args: &ValidateArgs) -> anyhow::Result<Vec<CommitInfo>> {
    if let Some(n) = args.count {
        return repo
            .head_commits(n)
            .with_context(|| format!("cannot read the last {n} commits"));
    }
    if let Some(range) = &args.range {
        let (from, to) = split_range(range)?;
        return repo
            .commit_range(&from, &to)
            .with_context(|| format!("cannot read commits in {range}"));
    }
    let reference = args.reference.as_deref().unwrap_or(DEFAULT_REF);
    let commit = repo
        .commit(reference)
        .with_context(|| format!("cannot read commit {reference}"))?;
    Ok(vec![commit])
}

fn render_run_report(report: &RunReport) -> String {
    let mut lines = Vec::new();
    for c in &report.commits {
        let hash = if c.hash.is_empty() { "message" } else { c.short_hash() };
        let mark = if c.valid { "ok  " } else { "FAIL" };
        lines.push(format!("{mark} {hash} {}", c.subject));
        for e in &c.errors {
            lines.push(format!("     [{}] {}: {}", e.rule, e.code.as_str(), e.message));
            lines.push(format!("       help: {}", e.help));
        }
    }
    for e in &report.repository_errors {
        lines.push(format!("FAIL [{}] {}: {}", e.rule, e.code.as_str(), e.message));
        lines.push(format!("       help: {}", e.help));
    }
    lines.push(format!(
        "overall={} commits={} failed={} skipped={}",
        report.overall, report.total, report.failed, report.skipped
    ));
    for r in &report.recommendations {
        lines.push(format!("recommendation: {r}"));
    }
    lines.join("\n")
}

fn render_verification(commit: &CommitInfo, r: &VerificationResult) -> String {
    let mut lines = vec![
        format!("commit: {}", commit.short_hash()),
        format!("status: {}", r.status.as_str()),
        format!("encoding: {}", r.signature.encoding.as_str()),
    ];
    if let Some(identity) = r.identity.as_ref().filter(|i| !i.is_empty()) {
        lines.push(format!("identity: {identity}"));
    }
    if let (Some(name), Some(fp)) = (&r.key_name, &r.key_fingerprint) {
        lines.push(format!("key: {name} {fp}"));
    }
    if let (Some(code), Some(msg)) = (&r.error_code, &r.error_message) {
        lines.push(format!("error: {}: {msg}", code.as_str()));
    }
    lines.join("\n")
}
