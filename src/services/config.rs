use crate::domain::config::Config;
use anyhow::Context;
use std::path::{Path, PathBuf};

pub const REPO_CONFIG_FILE: &str = ".gitward.toml";

/// Where the effective configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

impl ConfigSource {
    pub fn describe(&self) -> String {
        match self {
            Self::File(p) => p.display().to_string(),
            Self::Defaults => "built-in defaults".to_string(),
        }
    }
}

fn user_config_path() -> Option<PathBuf> {
    let home = std::env::var("HOME").ok()?;
    Some(PathBuf::from(home).join(".config/gitward/config.toml"))
}

/// Picks the config file: `--config` (must exist), then the repository's
/// `.gitward.toml`, then the user config. No file means defaults.
pub fn locate_config(explicit: Option<&Path>, repo_root: &Path) -> anyhow::Result<ConfigSource> {
    if let Some(p) = explicit {
        if !p.is_file() {
            anyhow::bail!("config file not found: {}", p.display());
        }
        return Ok(ConfigSource::File(p.to_path_buf()));
    }
    let candidates = [Some(repo_root.join(REPO_CONFIG_FILE)), user_config_path()];
    Ok(candidates
        .into_iter()
        .flatten()
        .find(|p| p.is_file())
        .map(ConfigSource::File)
        .unwrap_or(ConfigSource::Defaults))
}

pub fn load_config(explicit: Option<&Path>, repo_root: &Path) -> anyhow::Result<(Config, ConfigSource)> {
    let source = locate_config(explicit, repo_root)?;
    let config = match &source {
        ConfigSource::File(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            toml::from_str(&raw)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        ConfigSource::Defaults => Config::default(),
    };
    tracing::debug!(source = %source.describe(), "configuration loaded");
    Ok((config, source))
}
