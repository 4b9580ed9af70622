//! Service layer containing business logic and side-effect helpers.
//!
//! ## Service map
//! - `conventional.rs` - `type(scope)!: description` subject parser.
//! - `signature.rs` - signature text detection, decode and armor.
//! - `trust.rs` - key directory scan, key parsing, strength policy.
//! - `verifier.rs` - signature verification against trusted keys.
//! - `policy.rs` - allowed-signer canonicalization and matching.
//! - `spelling.rs` - offline spelling dictionary.
//! - `git.rs` - repository collaborator (`git` CLI + commit object parser).
//! - `config.rs` - config file discovery and loading.
//! - `engine.rs` - runs rules over commits.
//! - `report.rs` - run report assembly.
//! - `output.rs` - JSON/text output helpers.
//!
//! ## Conventions
//! - Prefer pure helpers where possible.
//! - Side effects should be explicit and localized (`git.rs`, `trust.rs`, `config.rs`).
//! - Keep command handlers thin; delegate to services.

pub mod config;
pub mod conventional;
pub mod engine;
pub mod git;
pub mod output;
pub mod policy;
pub mod report;
pub mod signature;
pub mod spelling;
pub mod trust;
pub mod verifier;

#[cfg(test)]
pub mod test_support;
