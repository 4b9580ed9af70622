//! Command handler layer.
//!
//! This module owns CLI-oriented orchestration and output wiring.
//!
//! ## Files
//! - `runtime.rs` - validate/verify, the commands that gate commits.
//! - `admin.rs` - rules/keys/config inspection.
//!
//! ## Principles
//! - Parse/match CLI inputs here.
//! - Delegate business logic to `services/*` and `rules/*`.
//! - Keep behavior and output schema stable.

pub mod admin;
pub mod runtime;

pub use admin::handle_admin_commands;
pub use runtime::handle_runtime_commands;

/// What a handler did with the parsed command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    /// The command belongs to another handler.
    No,
    Pass,
    /// Ran to completion with a negative verdict (exit code 1).
    Fail,
}

impl Handled {
    pub fn from_verdict(ok: bool) -> Self {
        if ok {
            Self::Pass
        } else {
            Self::Fail
        }
    }
}
