//! Shared data model layer (structs/constants only).
//!
//! ## Purpose
//! - Keep commit, signature and report structs in one place.
//! - Avoid cyclic imports between rules and services.
//! - Make JSON output schema changes explicit and reviewable.
//!
//! ## Files
//! - `models.rs` — commit/identity/signature records and report structs.
//! - `errors.rs` — the closed validation error taxonomy.
//! - `config.rs` — the ruleset configuration value.
//!
//! ## Rule of thumb
//! Domain types should be data-only: no filesystem/process side effects.
//!
//! ## Compatibility note
//! Changes in these structs can affect `--json` outputs and integration contracts.
//! Keep schema-impacting changes explicit and synchronized with `docs/contracts/*`.

pub mod config;
pub mod errors;
pub mod models;
