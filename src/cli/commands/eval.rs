//! Eval command implementation.
//!
//! The `hostcheck eval` command builds one check from a record and reports
//! whether it passed.

use std::io::Write;
use std::path::Path;

use console::style;
use serde_yaml::Value;

use crate::args::CheckArgs;
use crate::checks::Checker;
use crate::cli::args::EvalArgs;
use crate::error::{CheckError, Result};
use crate::registry::CheckRegistry;

use super::dispatcher::{exit_code, Command, CommandResult};

/// The eval command implementation.
pub struct EvalCommand<'a> {
    registry: &'a CheckRegistry,
    args: EvalArgs,
    quiet: bool,
}

impl<'a> EvalCommand<'a> {
    /// Create a new eval command.
    pub fn new(registry: &'a CheckRegistry, args: EvalArgs) -> Self {
        Self {
            registry,
            args,
            quiet: false,
        }
    }

    /// Skip the success line.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Assemble the record from the args file and `-a` pairs.
    pub fn record(&self) -> Result<CheckArgs> {
        let mut record = match &self.args.file {
            Some(path) => load_args_file(path)?,
            None => CheckArgs::new(),
        };
        for (key, raw) in &self.args.args {
            record.set(key.as_str(), scalar(raw));
        }
        Ok(record)
    }
}

impl Command for EvalCommand<'_> {
    fn execute(&self, out: &mut dyn Write) -> Result<CommandResult> {
        let name = &self.args.check_type;
        let check = self.registry.resolve(name, self.record()?)?;
        tracing::debug!("Evaluating {}: {:?}", name, check);

        match check.evaluate() {
            Ok(()) => {
                if !self.quiet {
                    writeln!(out, "{} {}", style("✓").green(), name)?;
                }
                Ok(CommandResult::success())
            }
            Err(e) => {
                tracing::debug!("{} failed with a {} error", name, e.kind());
                writeln!(out, "{} {}: {}", style("✗").red(), name, e)?;
                Ok(CommandResult::failure(exit_code(&e)))
            }
        }
    }
}

fn load_args_file(path: &Path) -> Result<CheckArgs> {
    let args_file_error = |message: String| CheckError::ArgsFile {
        path: path.to_path_buf(),
        message,
    };
    let text = std::fs::read_to_string(path).map_err(|e| args_file_error(e.to_string()))?;
    CheckArgs::from_yaml_str(&text).map_err(|e| args_file_error(e.to_string()))
}

/// Numbers and bools keep their YAML type and a quoted scalar is unquoted;
/// everything else is taken verbatim as a string.
fn scalar(raw: &str) -> Value {
    match serde_yaml::from_str::<Value>(raw) {
        Ok(value @ (Value::Bool(_) | Value::Number(_))) => value,
        Ok(Value::String(text)) if raw.trim_start().starts_with(['"', '\'']) => {
            Value::String(text)
        }
        _ => Value::String(raw.to_string()),
    }
}
