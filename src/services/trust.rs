use crate::domain::models::SshSecuritySettings;
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};
use base64::Engine;
use sha2::{Digest, Sha256};
use ssh_key::public::KeyData;
use ssh_key::{EcdsaCurve, PublicKey};
use std::path::{Path, PathBuf};

const KEY_EXTENSIONS: &[&str] = &["pub", "ssh"];

#[derive(thiserror::Error, Debug)]
pub enum KeyStoreError {
    #[error("key directory is not configured")]
    NotConfigured,
    #[error("invalid key directory {path}: {reason}")]
    InvalidDirectory { path: String, reason: String },
    #[error("cannot read key file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("cannot parse key file {path}: {reason}")]
    Parse { path: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyFile {
    /// File stem; the fallback signer name when the key has no usable comment.
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAlgorithm {
    Rsa { bits: u32 },
    Ecdsa { bits: u32 },
    Ed25519,
    Unsupported(String),
}

impl KeyAlgorithm {
    pub fn of(key: &PublicKey) -> Self {
        match key.key_data() {
            KeyData::Rsa(rsa) => Self::Rsa {
                bits: modulus_bits(rsa.n.as_bytes()),
            },
            KeyData::Ecdsa(ec) => Self::Ecdsa {
                bits: match ec.curve() {
                    EcdsaCurve::NistP256 => 256,
                    EcdsaCurve::NistP384 => 384,
                    EcdsaCurve::NistP521 => 521,
                },
            },
            KeyData::Ed25519(_) => Self::Ed25519,
            other => Self::Unsupported(other.algorithm().as_str().to_string()),
        }
    }

    pub fn bits(&self) -> Option<u32> {
        match self {
            Self::Rsa { bits } | Self::Ecdsa { bits } => Some(*bits),
            Self::Ed25519 => Some(256),
            Self::Unsupported(_) => None,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::Rsa { .. } => "rsa".to_string(),
            Self::Ecdsa { bits } => format!("ecdsa-p{}", bits),
            Self::Ed25519 => "ed25519".to_string(),
            Self::Unsupported(name) => name.clone(),
        }
    }
}

/// Bit length of a big-endian unsigned integer, ignoring leading zero bytes.
fn modulus_bits(bytes: &[u8]) -> u32 {
    let trimmed: &[u8] = match bytes.iter().position(|b| *b != 0) {
        Some(i) => &bytes[i..],
        None => return 0,
    };
    (trimmed.len() as u32 - 1) * 8 + (8 - trimmed[0].leading_zeros())
}

/// Minimum-strength policy per algorithm family. Anything not recognised
/// is rejected.
pub fn meets_policy(algorithm: &KeyAlgorithm, settings: &SshSecuritySettings) -> bool {
    match algorithm {
        KeyAlgorithm::Rsa { bits } => *bits >= settings.minimum_rsa_bits,
        KeyAlgorithm::Ecdsa { bits } => {
            matches!(bits, 256 | 384 | 521) && settings.minimum_ec_bits <= *bits
        }
        KeyAlgorithm::Ed25519 => settings.minimum_ec_bits <= 256,
        KeyAlgorithm::Unsupported(_) => false,
    }
}

#[derive(Debug, Clone)]
pub struct TrustedKey {
    pub name: String,
    pub path: PathBuf,
    pub public_key: PublicKey,
    pub algorithm: KeyAlgorithm,
    pub fingerprint: String,
}

impl TrustedKey {
    pub fn comment(&self) -> &str {
        self.public_key.comment()
    }
}

fn expand_home(raw: &str) -> anyhow::Result<PathBuf> {
    if let Some(rest) = raw.strip_prefix("~/") {
        let home = std::env::var("HOME")?;
        return Ok(PathBuf::from(home).join(rest));
    }
    Ok(PathBuf::from(raw))
}

/// Resolves the configured key directory to a canonical, symlink-free path.
pub fn sanitize_key_dir(raw: &str) -> Result<PathBuf, KeyStoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(KeyStoreError::NotConfigured);
    }
    let invalid = |reason: String| KeyStoreError::InvalidDirectory {
        path: trimmed.to_string(),
        reason,
    };
    let expanded = expand_home(trimmed).map_err(|e| invalid(e.to_string()))?;
    let canonical = std::fs::canonicalize(&expanded).map_err(|e| invalid(e.to_string()))?;
    if !canonical.is_dir() {
        return Err(invalid("not a directory".to_string()));
    }
    Ok(canonical)
}

/// Lists candidate key files in deterministic (file name) order.
pub fn scan_keys(dir: &Path) -> Result<Vec<KeyFile>, KeyStoreError> {
    let entries = std::fs::read_dir(dir).map_err(|e| KeyStoreError::InvalidDirectory {
        path: dir.to_string_lossy().to_string(),
        reason: e.to_string(),
    })?;
    let mut out = Vec::new();
    for entry in entries {
        let Ok(entry) = entry else {
            continue;
        };
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        if !ext.map(|e| KEY_EXTENSIONS.contains(&e.as_str())).unwrap_or(false) {
            continue;
        }
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        out.push(KeyFile { name, path });
    }
    out.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
    Ok(out)
}

/// Parses a single `algorithm base64 [comment]` key file.
pub fn load_key(file: &KeyFile) -> Result<TrustedKey, KeyStoreError> {
    let display = file.path.to_string_lossy().to_string();
    let raw = std::fs::read_to_string(&file.path).map_err(|source| KeyStoreError::Read {
        path: display.clone(),
        source,
    })?;
    let line = raw
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty() && !l.starts_with('#'))
        .ok_or_else(|| KeyStoreError::Parse {
            path: display.clone(),
            reason: "no key line".to_string(),
        })?;
    let public_key = PublicKey::from_openssh(line).map_err(|e| KeyStoreError::Parse {
        path: display.clone(),
        reason: e.to_string(),
    })?;
    let fingerprint = fingerprint_of_line(line).ok_or_else(|| KeyStoreError::Parse {
        path: display,
        reason: "key blob is not base64".to_string(),
    })?;
    Ok(TrustedKey {
        name: file.name.clone(),
        path: file.path.clone(),
        algorithm: KeyAlgorithm::of(&public_key),
        public_key,
        fingerprint,
    })
}

/// `SHA256:<base64>` of the wire-encoded key blob, as printed by `ssh-keygen -l`.
fn fingerprint_of_line(line: &str) -> Option<String> {
    let blob = line.split_whitespace().nth(1)?;
    let bytes = STANDARD.decode(blob).ok()?;
    let digest = Sha256::digest(&bytes);
    Some(format!("SHA256:{}", STANDARD_NO_PAD.encode(digest)))
}
