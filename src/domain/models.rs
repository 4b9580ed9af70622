use crate::domain::errors::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

const SCISSORS: &str = "# ------------------------ >8 ------------------------";

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

#[derive(Serialize)]
pub struct JsonErr {
    pub ok: bool,
    pub error: ErrorBody,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

impl Identity {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.email.is_empty()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.name.is_empty(), self.email.is_empty()) {
            (false, false) => write!(f, "{} <{}>", self.name, self.email),
            (false, true) => write!(f, "{}", self.name),
            (true, false) => write!(f, "{}", self.email),
            (true, true) => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureEncoding {
    SshArmored,
    SshInline,
    PgpArmored,
    #[default]
    Empty,
    Unknown,
}

impl SignatureEncoding {
    /// Family name as used by `signature.allowed_types`.
    pub fn family(&self) -> Option<&'static str> {
        match self {
            Self::SshArmored | Self::SshInline => Some("ssh"),
            Self::PgpArmored => Some("gpg"),
            Self::Empty | Self::Unknown => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SshArmored => "ssh_armored",
            Self::SshInline => "ssh_inline",
            Self::PgpArmored => "pgp_armored",
            Self::Empty => "empty",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Signature {
    pub encoding: SignatureEncoding,
    pub data: String,
}

/// One commit as handed to the rules. Built once by the repository
/// collaborator (or from a message file) and only ever borrowed afterwards.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CommitInfo {
    pub hash: String,
    pub subject: String,
    pub body: String,
    pub message: String,
    pub author: Identity,
    pub committer: Identity,
    #[serde(skip)]
    pub raw_signature: String,
    pub signature_encoding: SignatureEncoding,
    #[serde(skip)]
    pub signed_payload: Vec<u8>,
    pub is_merge: bool,
}

impl CommitInfo {
    /// Builds a commit from a raw message the way `git commit` would store
    /// it: comment lines and everything below the scissors line are dropped.
    pub fn from_message(raw: &str) -> Self {
        let mut kept = Vec::new();
        for line in raw.lines() {
            if line == SCISSORS {
                break;
            }
            if line.starts_with('#') {
                continue;
            }
            kept.push(line.trim_end());
        }
        let message = kept.join("\n").trim().to_string();
        let (subject, body) = split_message(&message);
        Self {
            subject,
            body,
            message,
            ..Self::default()
        }
    }

    pub fn short_hash(&self) -> &str {
        short_hash(&self.hash)
    }
}

/// First 12 characters of a commit hash, as shown in text output.
pub fn short_hash(hash: &str) -> &str {
    let end = hash.char_indices().nth(12).map(|(i, _)| i).unwrap_or(hash.len());
    &hash[..end]
}

/// Splits a commit message into subject (first line) and body (the rest,
/// blank lines around it trimmed).
pub fn split_message(message: &str) -> (String, String) {
    let mut lines = message.lines();
    let subject = lines.next().unwrap_or("").trim().to_string();
    let rest: Vec<&str> = lines.collect();
    let body = rest.join("\n").trim_matches('\n').trim().to_string();
    (subject, body)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Verified,
    Failed,
    NoKey,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Verified => "verified",
            Self::Failed => "failed",
            Self::NoKey => "no_key",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerifyErrorCode {
    EmptySignature,
    InvalidSignature,
    InvalidKeyDir,
    NoKeys,
    VerificationFailed,
}

impl VerifyErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmptySignature => "empty_signature",
            Self::InvalidSignature => "invalid_signature",
            Self::InvalidKeyDir => "invalid_key_dir",
            Self::NoKeys => "no_keys",
            Self::VerificationFailed => "verification_failed",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VerificationResult {
    pub status: VerificationStatus,
    pub identity: Option<Identity>,
    pub signature: Signature,
    pub key_name: Option<String>,
    pub key_fingerprint: Option<String>,
    pub error_code: Option<VerifyErrorCode>,
    pub error_message: Option<String>,
}

impl VerificationResult {
    pub fn failed(signature: Signature, code: VerifyErrorCode, message: impl Into<String>) -> Self {
        let status = if code == VerifyErrorCode::NoKeys {
            VerificationStatus::NoKey
        } else {
            VerificationStatus::Failed
        };
        Self {
            status,
            identity: None,
            signature,
            key_name: None,
            key_fingerprint: None,
            error_code: Some(code),
            error_message: Some(message.into()),
        }
    }

    pub fn is_verified(&self) -> bool {
        self.status == VerificationStatus::Verified
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SshSecuritySettings {
    pub minimum_rsa_bits: u32,
    pub minimum_ec_bits: u32,
}

impl Default for SshSecuritySettings {
    fn default() -> Self {
        Self {
            minimum_rsa_bits: 2048,
            minimum_ec_bits: 256,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RuleOutcome {
    pub rule: String,
    pub help: String,
    pub passed: bool,
    pub error_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommitReport {
    pub hash: String,
    pub subject: String,
    pub valid: bool,
    pub rules: Vec<RuleOutcome>,
    pub errors: Vec<ValidationError>,
}

impl CommitReport {
    pub fn short_hash(&self) -> &str {
        short_hash(&self.hash)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Version of the error-code set, see `ERROR_CODE_SCHEMA_VERSION`.
    pub schema_version: u32,
    pub overall: String,
    pub valid: bool,
    pub total: usize,
    pub failed: usize,
    pub skipped: usize,
    pub commits: Vec<CommitReport>,
    pub repository_errors: Vec<ValidationError>,
    pub recommendations: Vec<String>,
}

#[derive(Serialize)]
pub struct RuleListItem {
    pub name: String,
    pub active: bool,
    pub default_enabled: bool,
    pub scope: String,
    pub help: String,
}

#[derive(Serialize)]
pub struct KeyListItem {
    pub name: String,
    pub path: String,
    pub algorithm: String,
    pub bits: Option<u32>,
    pub fingerprint: Option<String>,
    pub comment: Option<String>,
    pub meets_policy: bool,
    pub status: String,
}
