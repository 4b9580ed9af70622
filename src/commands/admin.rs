use crate::commands::Handled;
use crate::*;

pub fn handle_admin_commands(
    cli: &Cli,
    config: &Config,
    source: &ConfigSource,
) -> anyhow::Result<Handled> {
    match &cli.command {
        Commands::Rules => {
            let items = rules::list_rules(&config.rules);
            print_out(cli.json, &items, |r| {
                format!(
                    "{}\t{}\t{}\t{}",
                    if r.active { "on " } else { "off" },
                    r.name,
                    r.scope,
                    r.help
                )
            })?;
        }
        Commands::Keys {
            command: KeyCommands::List { dir },
        } => {
            let raw = dir
                .clone()
                .unwrap_or_else(|| config.signature.key_directory.clone());
            let items = list_keys(&raw, &config.signature.security())?;
            print_out(cli.json, &items, |k| {
                format!(
                    "{}\t{}\t{}\t{}\t{}",
                    k.status,
                    k.name,
                    k.algorithm,
                    k.fingerprint.as_deref().unwrap_or("-"),
                    k.comment.as_deref().unwrap_or("")
                )
            })?;
        }
        Commands::Config => {
            if cli.json {
                print_one(true, true, config, |_| String::new())?;
            } else {
                println!("# source: {}", source.describe());
                print!("{}", toml::to_string_pretty(config)?);
            }
        }
        _ => return Ok(Handled::No),
    }
    Ok(Handled::Pass)
}

/// Scans `raw` and reports every candidate file, parseable or not, so
/// operators see why a key is ignored during verification.
pub fn list_keys(raw: &str, settings: &SshSecuritySettings) -> anyhow::Result<Vec<KeyListItem>> {
    let dir = sanitize_key_dir(raw)?;
    let files = scan_keys(&dir)?;
    Ok(files
        .iter()
        .map(|file| match load_key(file) {
            Ok(key) => {
                let ok = meets_policy(&key.algorithm, settings);
                KeyListItem {
                    name: key.name.clone(),
                    path: key.path.to_string_lossy().to_string(),
                    algorithm: key.algorithm.label(),
                    bits: key.algorithm.bits(),
                    fingerprint: Some(key.fingerprint.clone()),
                    comment: Some(key.comment().to_string()).filter(|c| !c.is_empty()),
                    meets_policy: ok,
                    status: if ok { "trusted" } else { "weak" }.to_string(),
                }
            }
            Err(e) => {
                tracing::debug!(key = %file.path.display(), error = %e, "unparseable key");
                KeyListItem {
                    name: file.name.clone(),
                    path: file.path.to_string_lossy().to_string(),
                    algorithm: "unknown".to_string(),
                    bits: None,
                    fingerprint: None,
                    comment: None,
                    meets_policy: false,
                    status: "unparseable".to_string(),
                }
            }
        })
        .collect())
}
