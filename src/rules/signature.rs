use crate::domain::config::SignatureConfig;
use crate::domain::errors::{ErrorCode, ValidationError};
use crate::domain::models::{CommitInfo, SignatureEncoding, VerificationResult, VerifyErrorCode};
use crate::rules::Rule;
use crate::services::policy::signer_is_allowed;
use crate::services::verifier::SignatureVerifier;

pub const SIGNATURE: &str = "signature";
pub const SIGNATURE_HELP: &str =
    "Commit must be signed with one of signature.allowed_types (ssh, gpg).";
pub const SIGNED_IDENTITY: &str = "signed-identity";
pub const SIGNED_IDENTITY_HELP: &str =
    "Commit signature must verify against a trusted key in signature.key_directory.";

pub struct SignaturePresence {
    allowed_types: Vec<String>,
}

impl SignaturePresence {
    pub fn new(cfg: &SignatureConfig) -> Self {
        Self {
            allowed_types: cfg
                .allowed_types
                .iter()
                .map(|t| t.trim().to_ascii_lowercase())
                .collect(),
        }
    }
}

impl Rule for SignaturePresence {
    fn name(&self) -> &'static str {
        SIGNATURE
    }

    fn help(&self) -> &'static str {
        SIGNATURE_HELP
    }

    fn validate(&self, commit: &CommitInfo) -> Vec<ValidationError> {
        let encoding = commit.signature_encoding;
        let Some(family) = encoding.family() else {
            return match encoding {
                SignatureEncoding::Empty => vec![ValidationError::new(
                    SIGNATURE,
                    ErrorCode::MissingSignature,
                    "commit is not signed",
                )],
                _ => vec![ValidationError::new(
                    SIGNATURE,
                    ErrorCode::InvalidSignatureFormat,
                    "signature is neither an SSH nor a PGP signature",
                )
                .with_context("encoding", encoding.as_str())],
            };
        };
        if self.allowed_types.iter().any(|t| t == family) {
            return vec![];
        }
        let allowed = self.allowed_types.join(", ");
        vec![ValidationError::new(
            SIGNATURE,
            ErrorCode::DisallowedSignatureType,
            format!("{family} signatures are not allowed"),
        )
        .with_help(format!("Sign with one of: {allowed}."))
        .with_context("encoding", encoding.as_str())
        .with_context("allowed_types", allowed)]
    }
}

pub struct SignedIdentity {
    verifier: SignatureVerifier,
    allowed_signers: Vec<String>,
}

impl SignedIdentity {
    pub fn new(cfg: &SignatureConfig) -> Self {
        Self {
            verifier: SignatureVerifier::from_config(cfg),
            allowed_signers: cfg.allowed_signers.clone(),
        }
    }

    fn from_result(&self, result: &VerificationResult) -> Vec<ValidationError> {
        let dir = &self.verifier.key_directory;
        let message = result.error_message.clone().unwrap_or_default();
        let Some(code) = result.error_code else {
            return self.check_signer(result);
        };
        let err = match code {
            VerifyErrorCode::EmptySignature => {
                ValidationError::new(SIGNED_IDENTITY, ErrorCode::MissingSignature, message)
            }
            VerifyErrorCode::InvalidSignature => {
                ValidationError::new(SIGNED_IDENTITY, ErrorCode::InvalidSignature, message)
                    .with_context("encoding", result.signature.encoding.as_str())
            }
            VerifyErrorCode::InvalidKeyDir => {
                ValidationError::new(SIGNED_IDENTITY, ErrorCode::InvalidKeyDirectory, message)
                    .with_context("key_directory", dir)
            }
            VerifyErrorCode::NoKeys => {
                ValidationError::new(SIGNED_IDENTITY, ErrorCode::NoTrustedKeys, message)
                    .with_context("key_directory", dir)
            }
            VerifyErrorCode::VerificationFailed => {
                ValidationError::new(SIGNED_IDENTITY, ErrorCode::VerificationFailed, message)
                    .with_context("key_directory", dir)
            }
        };
        vec![err]
    }

    fn check_signer(&self, result: &VerificationResult) -> Vec<ValidationError> {
        if self.allowed_signers.is_empty() {
            return vec![];
        }
        let identity = result.identity.clone().unwrap_or_default();
        if signer_is_allowed(&identity, &self.allowed_signers) {
            return vec![];
        }
        vec![ValidationError::new(
            SIGNED_IDENTITY,
            ErrorCode::UnauthorizedSigner,
            format!("signer {:?} is not an allowed signer", identity.to_string()),
        )
        .with_context("identity", &identity)
        .with_context("allowed_signers", self.allowed_signers.join(", "))]
    }
}

impl Rule for SignedIdentity {
    fn name(&self) -> &'static str {
        SIGNED_IDENTITY
    }

    fn help(&self) -> &'static str {
        SIGNED_IDENTITY_HELP
    }

    fn validate(&self, commit: &CommitInfo) -> Vec<ValidationError> {
        let result = self.verifier.verify_commit(commit);
        tracing::debug!(
            commit = %commit.short_hash(),
            status = ?result.status,
            key = ?result.key_name,
            "signature verification finished"
        );
        self.from_result(&result)
    }
}
