//! Repository collaborator: reads commits out of a git repository.
//!
//! `GitCli` shells out to `git` and hands each raw commit object to
//! [`parse_commit_object`], so everything past process spawning is pure.

use crate::domain::models::{split_message, CommitInfo, Identity};
use crate::services::signature::detect_encoding;
use std::path::{Path, PathBuf};
use std::process::Command;

const SIGNATURE_HEADERS: &[&str] = &["gpgsig", "gpgsig-sha256"];

#[derive(thiserror::Error, Debug)]
pub enum RepositoryError {
    #[error("failed to run git in {root}: {source}")]
    Spawn {
        root: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`git {args}` failed: {stderr}")]
    Git { args: String, stderr: String },
    #[error("malformed commit object {hash}: {reason}")]
    Malformed { hash: String, reason: String },
    #[error("invalid range {0:?}; expected FROM..TO")]
    InvalidRange(String),
}

/// Read access to commits. Every returned [`CommitInfo`] is fully
/// materialised; rules never call back into the repository.
pub trait Repository {
    /// The last `n` commits reachable from HEAD, newest first.
    fn head_commits(&self, n: usize) -> Result<Vec<CommitInfo>, RepositoryError>;
    fn commit(&self, reference: &str) -> Result<CommitInfo, RepositoryError>;
    /// Commits in `from..to`, newest first.
    fn commit_range(&self, from: &str, to: &str) -> Result<Vec<CommitInfo>, RepositoryError>;
    /// Number of commits on HEAD that are not on `reference`.
    fn commits_ahead(&self, reference: &str) -> Result<usize, RepositoryError>;
}

#[derive(Debug, Clone)]
pub struct GitCli {
    pub root: PathBuf,
}

impl GitCli {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn run(&self, args: &[&str]) -> Result<Vec<u8>, RepositoryError> {
        tracing::debug!(root = %self.root.display(), args = ?args, "running git");
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.root)
            .args(args)
            .output()
            .map_err(|source| RepositoryError::Spawn {
                root: self.root.display().to_string(),
                source,
            })?;
        if !output.status.success() {
            return Err(RepositoryError::Git {
                args: args.join(" "),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output.stdout)
    }

    fn run_text(&self, args: &[&str]) -> Result<String, RepositoryError> {
        Ok(String::from_utf8_lossy(&self.run(args)?).trim().to_string())
    }

    fn load_all(&self, hashes: &str) -> Result<Vec<CommitInfo>, RepositoryError> {
        hashes
            .lines()
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .map(|h| self.load(h))
            .collect()
    }

    fn load(&self, hash: &str) -> Result<CommitInfo, RepositoryError> {
        let raw = self.run(&["cat-file", "commit", hash])?;
        parse_commit_object(hash, &raw)
    }
}

impl Repository for GitCli {
    fn head_commits(&self, n: usize) -> Result<Vec<CommitInfo>, RepositoryError> {
        let count = format!("--max-count={n}");
        let hashes = self.run_text(&["rev-list", &count, "HEAD"])?;
        self.load_all(&hashes)
    }

    fn commit(&self, reference: &str) -> Result<CommitInfo, RepositoryError> {
        let spec = format!("{reference}^{{commit}}");
        let hash = self.run_text(&["rev-parse", "--verify", &spec])?;
        self.load(&hash)
    }

    fn commit_range(&self, from: &str, to: &str) -> Result<Vec<CommitInfo>, RepositoryError> {
        let range = format!("{from}..{to}");
        let hashes = self.run_text(&["rev-list", &range])?;
        self.load_all(&hashes)
    }

    fn commits_ahead(&self, reference: &str) -> Result<usize, RepositoryError> {
        let range = format!("{reference}..HEAD");
        let count = self.run_text(&["rev-list", "--count", &range])?;
        count.parse().map_err(|_| RepositoryError::Git {
            args: format!("rev-list --count {range}"),
            stderr: format!("unexpected output {count:?}"),
        })
    }
}

/// Splits `A..B` into its endpoints.
pub fn split_range(range: &str) -> Result<(String, String), RepositoryError> {
    match range.split_once("..") {
        Some((from, to)) if !from.is_empty() && !to.is_empty() && !to.starts_with('.') => {
            Ok((from.to_string(), to.to_string()))
        }
        _ => Err(RepositoryError::InvalidRange(range.to_string())),
    }
}

/// `Name <email> 1700000000 +0000` from an `author`/`committer` header.
fn parse_ident(value: &str) -> Identity {
    match (value.find('<'), value.find('>')) {
        (Some(open), Some(close)) if open < close => {
            Identity::new(value[..open].trim(), value[open + 1..close].trim())
        }
        _ => Identity::new(value.trim(), ""),
    }
}

/// Parses a raw commit object as printed by `git cat-file commit`.
///
/// The signature headers and their continuation lines are removed from the
/// object to produce `signed_payload`, which is what the signer signed.
pub fn parse_commit_object(hash: &str, raw: &[u8]) -> Result<CommitInfo, RepositoryError> {
    let text = std::str::from_utf8(raw).map_err(|e| RepositoryError::Malformed {
        hash: hash.to_string(),
        reason: e.to_string(),
    })?;

    let mut payload = String::with_capacity(text.len());
    let mut signature_lines: Vec<&str> = Vec::new();
    let mut author = Identity::default();
    let mut committer = Identity::default();
    let mut parents = 0usize;
    let mut saw_tree = false;
    let mut in_signature = false;
    let mut capturing = false;
    let mut message = None;

    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        let start = offset;
        offset += line.len();
        let bare = line.trim_end_matches('\n');

        if bare.is_empty() {
            payload.push_str(&text[start..]);
            message = Some(&text[offset..]);
            break;
        }
        if let Some(cont) = bare.strip_prefix(' ') {
            if capturing {
                signature_lines.push(cont);
            } else if !in_signature {
                payload.push_str(line);
            }
            continue;
        }

        let (key, value) = bare.split_once(' ').unwrap_or((bare, ""));
        in_signature = SIGNATURE_HEADERS.contains(&key);
        // Only the first signature header is verified; any further one
        // (sha256 next to sha1) is still kept out of the payload.
        capturing = in_signature && signature_lines.is_empty();
        if capturing {
            signature_lines.push(value);
        }
        if in_signature {
            continue;
        }
        payload.push_str(line);
        match key {
            "tree" => saw_tree = true,
            "parent" => parents += 1,
            "author" => author = parse_ident(value),
            "committer" => committer = parse_ident(value),
            _ => {}
        }
    }

    if !saw_tree {
        return Err(RepositoryError::Malformed {
            hash: hash.to_string(),
            reason: "missing tree header".to_string(),
        });
    }

    let message = message.unwrap_or("").trim().to_string();
    let (subject, body) = split_message(&message);
    let raw_signature = signature_lines.join("\n");
    Ok(CommitInfo {
        hash: hash.to_string(),
        subject,
        body,
        message,
        author,
        committer,
        signature_encoding: detect_encoding(&raw_signature),
        raw_signature,
        signed_payload: payload.into_bytes(),
        is_merge: parents > 1,
    })
}
