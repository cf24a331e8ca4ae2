//! Script check.
//!
//! Writes a script into a temporary workspace and runs it with an
//! interpreter; the check passes when the script exits with code 0.
//!
//! # Arguments
//!
//! - `script` (required): the script text
//! - `interpreter`: program that runs the script, default `/bin/sh`.
//!   The `run-bash-script` type forces `/bin/bash`.

use super::Checker;
use crate::args::{bind, CheckArgs, Supplied};
use crate::error::{CheckError, Result};
use crate::process::run_combined;
use crate::workspace::with_workspace;
use serde::Deserialize;

/// Registered check type name.
pub const CHECK_NAME: &str = "run-script";

/// Alias that forces the bash interpreter.
pub const BASH_NAME: &str = "run-bash-script";

/// Interpreter used when `interpreter` is absent.
pub const DEFAULT_INTERPRETER: &str = "/bin/sh";

#[derive(Debug, Deserialize)]
struct ScriptArgs {
    script: String,
    #[serde(default)]
    interpreter: Supplied<String>,
}

/// Runs a script and checks its exit status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunScript {
    /// Script text.
    pub script: String,
    /// Interpreter executable.
    pub interpreter: String,
}

impl RunScript {
    /// Build the check from a record.
    pub fn from_args(args: &CheckArgs) -> Result<Self> {
        let parsed: ScriptArgs = bind(CHECK_NAME, args, &["script"])?;
        Ok(Self {
            script: parsed.script,
            interpreter: parsed
                .interpreter
                .or_else(|| DEFAULT_INTERPRETER.to_string()),
        })
    }
}

impl Checker for RunScript {
    fn evaluate(&self) -> Result<()> {
        with_workspace("run-script_", None, |workspace| {
            let path = workspace.write("script", &self.script)?;
            let out = run_combined(&self.interpreter, [&path])?;
            if out.success() {
                Ok(())
            } else {
                Err(CheckError::ScriptFailed {
                    interpreter: self.interpreter.clone(),
                    status: out.status_line(),
                    output: out.output,
                })
            }
        })
    }
}
