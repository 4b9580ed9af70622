use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod domain;
mod rules;
mod services;

pub use cli::*;
pub use commands::{handle_admin_commands, handle_runtime_commands, Handled};
pub use domain::config::*;
pub use domain::errors::*;
pub use domain::models::*;
pub use services::config::{load_config, ConfigSource};
pub use services::engine::{validate_commit, validate_commits};
pub use services::git::{split_range, GitCli, Repository};
pub use services::output::{print_error, print_one, print_out};
pub use services::report::build_run_report;
pub use services::trust::{load_key, meets_policy, sanitize_key_dir, scan_keys};
pub use services::verifier::SignatureVerifier;

fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<Handled> {
    let (config, source) = load_config(cli.config.as_deref(), &cli.repo)?;

    let handled = handle_runtime_commands(cli, &config)?;
    if handled != Handled::No {
        return Ok(handled);
    }
    handle_admin_commands(cli, &config, &source)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(Handled::Fail) => ExitCode::from(1),
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            print_error(cli.json, &err);
            ExitCode::from(2)
        }
    }
}
