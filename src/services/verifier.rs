//! SSH commit signature verification against a directory of trusted keys.
//!
//! Single pass: decode, scan, then try candidate keys in scan order. The first
//! key that verifies wins and no further keys are tried, so a signature that
//! would also verify under a later key is never reported as ambiguous.

use crate::domain::config::SignatureConfig;
use crate::domain::models::{
    CommitInfo, Identity, Signature, SshSecuritySettings, VerificationResult, VerificationStatus,
    VerifyErrorCode,
};
use crate::services::signature::{decode, encode_armored, DecodedSignature};
use crate::services::trust::{load_key, meets_policy, sanitize_key_dir, scan_keys, TrustedKey};
use ::signature::Verifier;
use sha1::Sha1;
use ssh_key::public::KeyData;
use ssh_key::{Algorithm, SshSig};

const SSHSIG_MAGIC: &[u8] = b"SSHSIG";

#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    pub key_directory: String,
    pub settings: SshSecuritySettings,
    pub namespace: String,
}

impl SignatureVerifier {
    pub fn from_config(cfg: &SignatureConfig) -> Self {
        Self {
            key_directory: cfg.key_directory.clone(),
            settings: cfg.security(),
            namespace: cfg.namespace.clone(),
        }
    }

    pub fn verify_commit(&self, commit: &CommitInfo) -> VerificationResult {
        self.verify(&commit.raw_signature, &commit.signed_payload)
    }

    pub fn verify(&self, raw_signature: &str, payload: &[u8]) -> VerificationResult {
        let signature = Signature::detect(raw_signature);
        if raw_signature.trim().is_empty() {
            return VerificationResult::failed(
                signature,
                VerifyErrorCode::EmptySignature,
                "commit is not signed",
            );
        }

        let decoded = match decode(raw_signature) {
            Ok(d) => d,
            Err(e) => {
                return VerificationResult::failed(
                    signature,
                    VerifyErrorCode::InvalidSignature,
                    e.to_string(),
                )
            }
        };

        let dir = match sanitize_key_dir(&self.key_directory) {
            Ok(d) => d,
            Err(e) => {
                return VerificationResult::failed(
                    signature,
                    VerifyErrorCode::InvalidKeyDir,
                    e.to_string(),
                )
            }
        };
        let candidates = match scan_keys(&dir) {
            Ok(c) => c,
            Err(e) => {
                return VerificationResult::failed(
                    signature,
                    VerifyErrorCode::InvalidKeyDir,
                    e.to_string(),
                )
            }
        };
        if candidates.is_empty() {
            return VerificationResult::failed(
                signature,
                VerifyErrorCode::NoKeys,
                format!("no public keys found in {}", dir.display()),
            );
        }

        let envelope = parse_envelope(&decoded);
        for file in &candidates {
            let key = match load_key(file) {
                Ok(k) => k,
                Err(e) => {
                    tracing::debug!(key = %file.path.display(), error = %e, "skipping unparseable key");
                    continue;
                }
            };
            if !meets_policy(&key.algorithm, &self.settings) {
                tracing::debug!(
                    key = %key.name,
                    algorithm = %key.algorithm.label(),
                    "skipping key below strength policy"
                );
                continue;
            }
            let ok = match &envelope {
                Some(sig) => key.public_key.verify(&self.namespace, payload, sig).is_ok(),
                None => verify_raw(&key, &decoded, payload),
            };
            if ok {
                tracing::debug!(key = %key.name, fingerprint = %key.fingerprint, "signature verified");
                return VerificationResult {
                    status: VerificationStatus::Verified,
                    identity: Some(derive_identity(&key.name, key.comment())),
                    signature,
                    key_name: Some(key.name.clone()),
                    key_fingerprint: Some(key.fingerprint.clone()),
                    error_code: None,
                    error_message: None,
                };
            }
        }

        VerificationResult::failed(
            signature,
            VerifyErrorCode::VerificationFailed,
            format!(
                "signature did not verify against any of {} key(s) in {}",
                candidates.len(),
                dir.display()
            ),
        )
    }
}

/// Decoded blobs carrying the OpenSSH `SSHSIG` magic are full signature
/// envelopes; anything else is treated as a bare `format`/`blob` pair.
fn parse_envelope(decoded: &DecodedSignature) -> Option<SshSig> {
    if !decoded.blob.starts_with(SSHSIG_MAGIC) {
        return None;
    }
    match SshSig::from_pem(encode_armored(&decoded.blob)) {
        Ok(sig) => Some(sig),
        Err(e) => {
            tracing::debug!(error = %e, "SSHSIG envelope did not parse");
            None
        }
    }
}

fn verify_raw(key: &TrustedKey, decoded: &DecodedSignature, payload: &[u8]) -> bool {
    let Ok(algorithm) = Algorithm::new(&decoded.format) else {
        return false;
    };
    if matches!(algorithm, Algorithm::Rsa { hash: None }) {
        return verify_rsa_sha1(key, &decoded.blob, payload);
    }
    let Ok(sig) = ssh_key::Signature::new(algorithm, decoded.blob.clone()) else {
        return false;
    };
    Verifier::<ssh_key::Signature>::verify(key.public_key.key_data(), payload, &sig).is_ok()
}

/// Legacy `ssh-rsa` blobs are PKCS#1 v1.5 over SHA-1, which ssh-key does
/// not verify itself.
fn verify_rsa_sha1(key: &TrustedKey, blob: &[u8], payload: &[u8]) -> bool {
    let KeyData::Rsa(public) = key.public_key.key_data() else {
        return false;
    };
    let Ok(public) = rsa::RsaPublicKey::try_from(public) else {
        return false;
    };
    let Ok(sig) = rsa::pkcs1v15::Signature::try_from(blob) else {
        return false;
    };
    rsa::pkcs1v15::VerifyingKey::<Sha1>::new(public)
        .verify(payload, &sig)
        .is_ok()
}

/// Claimed identity from the matching key's comment. The first token
/// holding an `@` is the email and the remaining tokens form the name; a
/// comment without one falls back to the key file name.
pub fn derive_identity(key_name: &str, comment: &str) -> Identity {
    let tokens: Vec<&str> = comment.split_whitespace().collect();
    let Some(at) = tokens.iter().position(|t| t.contains('@')) else {
        return Identity::new(key_name, "");
    };
    let name = tokens
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != at)
        .map(|(_, t)| *t)
        .collect::<Vec<_>>()
        .join(" ");
    Identity::new(name, strip_angles(tokens[at]))
}

fn strip_angles(s: &str) -> String {
    s.trim().trim_start_matches('<').trim_end_matches('>').to_string()
}
