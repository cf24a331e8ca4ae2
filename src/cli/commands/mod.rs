//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results. Commands are
//! routed by [`CommandDispatcher`] and share one [`CheckRegistry`](crate::registry::CheckRegistry).

pub mod completions;
pub mod dispatcher;
pub mod eval;
pub mod list;

pub use dispatcher::{exit_code, Command, CommandDispatcher, CommandResult};
