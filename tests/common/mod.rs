#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use ed25519_dalek::{Signer, SigningKey};
use serde_json::Value;
use sha2::{Digest, Sha512};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tempfile::TempDir;

pub const AUTHOR: &str = "Ana Lima <ana@example.com> 1700000000 +0000";

pub struct TestEnv {
    _tmp: TempDir,
    pub home: PathBuf,
    pub repo: PathBuf,
    pub keys: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let home = tmp.path().join("home");
        let repo = tmp.path().join("repo");
        let keys = tmp.path().join("keys");
        for dir in [&home, &repo, &keys] {
            fs::create_dir_all(dir).expect("create fixture dir");
        }
        let env = Self {
            _tmp: tmp,
            home,
            repo,
            keys,
        };
        env.git(&["init", "-q"]);
        env.git(&["symbolic-ref", "HEAD", "refs/heads/main"]);
        env
    }

    fn git_cmd(&self, args: &[&str]) -> std::process::Command {
        let mut cmd = std::process::Command::new("git");
        cmd.current_dir(&self.repo)
            .env("HOME", &self.home)
            .env("GIT_CONFIG_NOSYSTEM", "1")
            .env("GIT_AUTHOR_NAME", "Ana Lima")
            .env("GIT_AUTHOR_EMAIL", "ana@example.com")
            .env("GIT_AUTHOR_DATE", "1700000000 +0000")
            .env("GIT_COMMITTER_NAME", "Ana Lima")
            .env("GIT_COMMITTER_EMAIL", "ana@example.com")
            .env("GIT_COMMITTER_DATE", "1700000000 +0000")
            .args(["-c", "commit.gpgsign=false"])
            .args(args);
        cmd
    }

    pub fn git(&self, args: &[&str]) -> String {
        let out = self.git_cmd(args).output().expect("run git");
        assert!(
            out.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&out.stderr)
        );
        String::from_utf8_lossy(&out.stdout).trim().to_string()
    }

    fn git_stdin(&self, args: &[&str], input: &[u8]) -> String {
        let mut child = self
            .git_cmd(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .expect("spawn git");
        child
            .stdin
            .take()
            .expect("git stdin")
            .write_all(input)
            .expect("write git stdin");
        let out = child.wait_with_output().expect("wait for git");
        assert!(out.status.success(), "git {:?} failed", args);
        String::from_utf8_lossy(&out.stdout).trim().to_string()
    }

    /// Creates an empty, unsigned commit on the current branch.
    pub fn commit(&self, message: &str) -> String {
        self.git(&["commit", "-q", "--allow-empty", "-m", message]);
        self.git(&["rev-parse", "HEAD"])
    }

    /// Writes a commit object signed like `git commit -S` with
    /// `gpg.format=ssh` and moves HEAD to it.
    pub fn signed_commit(&self, seed: u8, message: &str) -> String {
        let tree = self.git(&["write-tree"]);
        let parent = self
            .git_cmd(&["rev-parse", "-q", "--verify", "HEAD"])
            .output()
            .ok()
            .filter(|o| o.status.success())
            .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string());
        let mut headers = format!("tree {tree}\n");
        if let Some(p) = parent {
            headers.push_str(&format!("parent {p}\n"));
        }
        headers.push_str(&format!("author {AUTHOR}\ncommitter {AUTHOR}\n"));
        let payload = format!("{headers}\n{message}\n");

        let armored = armor(&sshsig(seed, "git", payload.as_bytes()));
        let gpgsig = armored.trim_end().replace('\n', "\n ");
        let object = format!("{headers}gpgsig {gpgsig}\n\n{message}\n");

        let hash = self.git_stdin(&["hash-object", "-t", "commit", "-w", "--stdin"], object.as_bytes());
        self.git(&["update-ref", "HEAD", &hash]);
        hash
    }

    pub fn write_key(&self, file: &str, seed: u8, comment: &str) -> PathBuf {
        let path = self.keys.join(file);
        fs::write(&path, format!("{}\n", public_key_line(seed, comment))).expect("write key");
        path
    }

    pub fn write_config(&self, toml: &str) -> PathBuf {
        let path = self.repo.join(".gitward.toml");
        fs::write(&path, toml).expect("write config");
        path
    }

    pub fn write_message(&self, text: &str) -> PathBuf {
        let path = self.home.join("COMMIT_EDITMSG");
        fs::write(&path, text).expect("write message file");
        path
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("gitward");
        cmd.env("HOME", &self.home)
            .env("GIT_CONFIG_NOSYSTEM", "1")
            .env_remove("RUST_LOG")
            .arg("--repo")
            .arg(&self.repo);
        cmd
    }

    /// Runs with `--json` and returns the parsed stdout plus the exit code.
    pub fn run_json(&self, args: &[&str]) -> (Value, i32) {
        let out = self.cmd().arg("--json").args(args).output().expect("run gitward");
        let value = serde_json::from_slice(&out.stdout).unwrap_or_else(|e| {
            panic!(
                "invalid json output ({e}): {}\nstderr: {}",
                String::from_utf8_lossy(&out.stdout),
                String::from_utf8_lossy(&out.stderr)
            )
        });
        (value, out.status.code().unwrap_or(-1))
    }

    pub fn key_dir(&self) -> &Path {
        &self.keys
    }
}

fn ssh_string(out: &mut Vec<u8>, field: &[u8]) {
    out.extend_from_slice(&(field.len() as u32).to_be_bytes());
    out.extend_from_slice(field);
}

fn signing_key(seed: u8) -> SigningKey {
    SigningKey::from_bytes(&[seed; 32])
}

fn public_blob(seed: u8) -> Vec<u8> {
    let mut blob = Vec::new();
    ssh_string(&mut blob, b"ssh-ed25519");
    ssh_string(&mut blob, &signing_key(seed).verifying_key().to_bytes());
    blob
}

pub fn public_key_line(seed: u8, comment: &str) -> String {
    format!("ssh-ed25519 {} {}", STANDARD.encode(public_blob(seed)), comment)
        .trim_end()
        .to_string()
}

fn sshsig(seed: u8, namespace: &str, payload: &[u8]) -> Vec<u8> {
    let mut signed = b"SSHSIG".to_vec();
    ssh_string(&mut signed, namespace.as_bytes());
    ssh_string(&mut signed, b"");
    ssh_string(&mut signed, b"sha512");
    ssh_string(&mut signed, &Sha512::digest(payload));

    let mut sig_blob = Vec::new();
    ssh_string(&mut sig_blob, b"ssh-ed25519");
    ssh_string(&mut sig_blob, &signing_key(seed).sign(&signed).to_bytes());

    let mut out = b"SSHSIG".to_vec();
    out.extend_from_slice(&1u32.to_be_bytes());
    ssh_string(&mut out, &public_blob(seed));
    ssh_string(&mut out, namespace.as_bytes());
    ssh_string(&mut out, b"");
    ssh_string(&mut out, b"sha512");
    ssh_string(&mut out, &sig_blob);
    out
}

fn armor(blob: &[u8]) -> String {
    let encoded = STANDARD.encode(blob);
    let mut out = String::from("-----BEGIN SSH SIGNATURE-----\n");
    for chunk in encoded.as_bytes().chunks(70) {
        out.push_str(&String::from_utf8_lossy(chunk));
        out.push('\n');
    }
    out.push_str("-----END SSH SIGNATURE-----\n");
    out
}
