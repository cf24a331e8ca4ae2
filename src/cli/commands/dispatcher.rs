//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::io::Write;

use crate::cli::args::{Cli, Commands};
use crate::error::{CheckError, ErrorKind, Result};
use crate::registry::CheckRegistry;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command, writing user-facing output to `out`.
    ///
    /// Configuration problems are returned as `Err`; a check that ran and
    /// failed is reported through the [`CommandResult`].
    fn execute(&self, out: &mut dyn Write) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Exit code for an error: `2` for configuration problems, `1` otherwise.
pub fn exit_code(err: &CheckError) -> i32 {
    match err.kind() {
        ErrorKind::Configuration => 2,
        ErrorKind::Assertion | ErrorKind::Environment | ErrorKind::Tooling => 1,
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher<'a> {
    registry: &'a CheckRegistry,
}

impl<'a> CommandDispatcher<'a> {
    /// Create a new dispatcher over `registry`.
    pub fn new(registry: &'a CheckRegistry) -> Self {
        Self { registry }
    }

    /// Get the registry commands resolve against.
    pub fn registry(&self) -> &CheckRegistry {
        self.registry
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, cli: &Cli, out: &mut dyn Write) -> Result<CommandResult> {
        match &cli.command {
            Commands::Eval(args) => {
                let cmd = super::eval::EvalCommand::new(self.registry, args.clone())
                    .quiet(cli.quiet);
                cmd.execute(out)
            }
            Commands::List(args) => {
                let cmd = super::list::ListCommand::new(self.registry, args.clone());
                cmd.execute(out)
            }
            Commands::Completions(args) => {
                let cmd = super::completions::CompletionsCommand::new(args.clone());
                cmd.execute(out)
            }
        }
    }
}
