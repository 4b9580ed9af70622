//! Signature text detection and decoding.
//!
//! Two SSH encodings are accepted: the armored block git writes into the
//! `gpgsig` header, and the compact `format:base64blob` inline form.

use crate::domain::models::{Signature, SignatureEncoding};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

pub const SSH_BEGIN: &str = "-----BEGIN SSH SIGNATURE-----";
pub const SSH_END: &str = "-----END SSH SIGNATURE-----";
pub const PGP_BEGIN: &str = "-----BEGIN PGP SIGNATURE-----";

/// Armored blocks do not name their format.
pub const DEFAULT_ARMORED_FORMAT: &str = "ssh-rsa";

const ARMOR_LINE_WIDTH: usize = 70;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedSignature {
    pub format: String,
    pub blob: Vec<u8>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("signature is empty")]
    Empty,
    #[error("armored signature is missing the begin marker")]
    MissingBeginMarker,
    #[error("armored signature is missing the end marker")]
    MissingEndMarker,
    #[error("signature blob is not valid base64: {0}")]
    InvalidBase64(String),
    #[error("signature blob is empty")]
    EmptyBlob,
    #[error("unsupported signature encoding")]
    UnsupportedEncoding,
}

impl Signature {
    pub fn detect(raw: &str) -> Self {
        Self {
            encoding: detect_encoding(raw),
            data: raw.to_string(),
        }
    }
}

pub fn detect_encoding(raw: &str) -> SignatureEncoding {
    let s = raw.trim();
    if s.is_empty() {
        return SignatureEncoding::Empty;
    }
    if s.contains(SSH_BEGIN) {
        return SignatureEncoding::SshArmored;
    }
    if s.contains(PGP_BEGIN) {
        return SignatureEncoding::PgpArmored;
    }
    if looks_inline(s) {
        return SignatureEncoding::SshInline;
    }
    SignatureEncoding::Unknown
}

fn looks_inline(s: &str) -> bool {
    let Some((format, blob)) = s.split_once(':') else {
        return false;
    };
    !format.is_empty()
        && format
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '@' | '.' | '_' | '-'))
        && !blob.is_empty()
        && blob
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '='))
}

/// Decodes a raw signature string into its format and blob.
pub fn decode(raw: &str) -> Result<DecodedSignature, DecodeError> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(DecodeError::Empty);
    }
    if s.contains("-----BEGIN") || s.contains("-----END") {
        return decode_armored(s);
    }
    decode_inline(s)
}

fn decode_armored(s: &str) -> Result<DecodedSignature, DecodeError> {
    if s.contains(PGP_BEGIN) {
        return Err(DecodeError::UnsupportedEncoding);
    }
    let start = s.find(SSH_BEGIN).ok_or(DecodeError::MissingBeginMarker)?;
    let after_begin = &s[start + SSH_BEGIN.len()..];
    let end = after_begin
        .find(SSH_END)
        .ok_or(DecodeError::MissingEndMarker)?;
    let body: String = after_begin[..end]
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let blob = STANDARD
        .decode(body.as_bytes())
        .map_err(|e| DecodeError::InvalidBase64(e.to_string()))?;
    if blob.is_empty() {
        return Err(DecodeError::EmptyBlob);
    }
    Ok(DecodedSignature {
        format: DEFAULT_ARMORED_FORMAT.to_string(),
        blob,
    })
}

fn decode_inline(s: &str) -> Result<DecodedSignature, DecodeError> {
    if !looks_inline(s) {
        return Err(DecodeError::UnsupportedEncoding);
    }
    let (format, encoded) = s.split_once(':').ok_or(DecodeError::UnsupportedEncoding)?;
    let blob = STANDARD
        .decode(encoded.as_bytes())
        .map_err(|e| DecodeError::InvalidBase64(e.to_string()))?;
    if blob.is_empty() {
        return Err(DecodeError::EmptyBlob);
    }
    Ok(DecodedSignature {
        format: format.to_string(),
        blob,
    })
}

/// Writes `blob` as an armored SSH signature block, 70 columns per line
/// like `ssh-keygen -Y sign`.
pub fn encode_armored(blob: &[u8]) -> String {
    let encoded = STANDARD.encode(blob);
    let mut out = String::with_capacity(encoded.len() + 80);
    out.push_str(SSH_BEGIN);
    out.push('\n');
    for chunk in encoded.as_bytes().chunks(ARMOR_LINE_WIDTH) {
        out.push_str(&String::from_utf8_lossy(chunk));
        out.push('\n');
    }
    out.push_str(SSH_END);
    out.push('\n');
    out
}

#[cfg(test)]
pub fn encode_inline(format: &str, blob: &[u8]) -> String {
    format!("{}:{}", format, STANDARD.encode(blob))
}
