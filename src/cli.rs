use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub const DEFAULT_REF: &str = "HEAD";

#[derive(Parser, Debug)]
#[command(
    name = "gitward",
    version,
    about = "Commit message and signature gate for git repositories"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(long, global = true, help = "Log rule and key decisions to stderr")]
    pub verbose: bool,
    #[arg(
        long,
        global = true,
        help = "Config file (default: <repo>/.gitward.toml, then ~/.config/gitward/config.toml)"
    )]
    pub config: Option<PathBuf>,
    #[arg(long, global = true, default_value = ".", help = "Repository to read commits from")]
    pub repo: PathBuf,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate commits against the active rules.
    Validate(ValidateArgs),
    /// Verify one commit's SSH signature against the trusted keys.
    Verify {
        #[arg(long = "ref", default_value = DEFAULT_REF)]
        reference: String,
    },
    /// List every rule in execution order.
    Rules,
    /// Inspect the trusted key directory.
    Keys {
        #[command(subcommand)]
        command: KeyCommands,
    },
    /// Print the effective configuration.
    Config,
}

#[derive(Args, Debug, Default)]
#[group(multiple = false)]
pub struct ValidateArgs {
    #[arg(long = "ref", help = "Validate a single commit (default: HEAD)")]
    pub reference: Option<String>,
    #[arg(long, help = "Validate the last N commits on HEAD")]
    pub count: Option<usize>,
    #[arg(long, help = "Validate the commits in FROM..TO")]
    pub range: Option<String>,
    #[arg(long, help = "Validate a commit message file (commit-msg hook)")]
    pub message_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum KeyCommands {
    /// List trusted keys and whether they meet the strength policy.
    List {
        #[arg(long, help = "Key directory (default: signature.key_directory)")]
        dir: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_selectors_are_mutually_exclusive() {
        assert!(Cli::try_parse_from(["gitward", "validate", "--ref", "a", "--count", "2"]).is_err());
        let cli = Cli::try_parse_from(["gitward", "validate", "--range", "main..HEAD"]).unwrap();
        let Commands::Validate(args) = cli.command else {
            panic!("expected validate");
        };
        assert_eq!(args.range.as_deref(), Some("main..HEAD"));
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = Cli::try_parse_from(["gitward", "rules", "--json", "--repo", "/tmp/x"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.repo, PathBuf::from("/tmp/x"));
    }
}
