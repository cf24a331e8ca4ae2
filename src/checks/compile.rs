//! Compile-and-run check.
//!
//! Compiles a piece of C source with warnings treated as errors and
//! optionally runs the result.
//!
//! # Arguments
//!
//! - `source` (required): the source code to compile
//! - `compiler`: compiler to invoke, `gcc` from `PATH` when absent
//! - `cflags`: extra flags, shell-tokenized, e.g. `"-lsasl2 -DDEBUG"`
//! - `cflags_command`: command whose output supplies more flags, e.g.
//!   `"net-snmp-config --agent-libs"`
//! - `run`: run the compiled program after a successful compile
//!   (default `false`)
//! - `temp_dir`: directory to create the build workspace in

use super::Checker;
use crate::args::{bind, CheckArgs, Supplied};
use crate::error::{CheckError, Result};
use crate::process::{run_captured, run_combined};
use crate::workspace::{with_workspace, Workspace};
use serde::Deserialize;
use std::borrow::Cow;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Registered check type name.
pub const CHECK_NAME: &str = "compile-gcc";

/// Compiler used when the `compiler` argument is absent.
pub const DEFAULT_COMPILER: &str = "gcc";

const WORKSPACE_PREFIX: &str = "compile-gcc_";
const SOURCE_FILE: &str = "src.c";

#[derive(Debug, Deserialize)]
struct CompileArgs {
    source: String,
    #[serde(default)]
    compiler: Supplied<String>,
    #[serde(default)]
    cflags: Supplied<String>,
    #[serde(default, alias = "cflagscommand")]
    cflags_command: Supplied<String>,
    #[serde(default)]
    run: Supplied<bool>,
    #[serde(default, alias = "tempdir")]
    temp_dir: Supplied<PathBuf>,
}

/// Compiles `source` and optionally runs the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileGcc {
    /// C source code.
    pub source: String,
    /// Compiler executable.
    pub compiler: String,
    /// Flags given directly.
    pub cflags: Option<String>,
    /// Command printing additional flags.
    pub cflags_command: Option<String>,
    /// Whether to run the compiled program.
    pub run: bool,
    /// Parent directory for the workspace.
    pub temp_dir: Option<PathBuf>,
}

impl CompileGcc {
    /// Build the check from a record.
    pub fn from_args(args: &CheckArgs) -> Result<Self> {
        let parsed: CompileArgs = bind(CHECK_NAME, args, &["source"])?;

        Ok(Self {
            source: parsed.source,
            compiler: parsed.compiler.or_else(|| DEFAULT_COMPILER.to_string()),
            cflags: parsed.cflags.into_option(),
            cflags_command: parsed.cflags_command.into_option(),
            run: parsed.run.or(false),
            temp_dir: parsed.temp_dir.into_option(),
        })
    }

    /// Extra flags: `cflags` first, then the output of `cflags_command`.
    pub fn extra_flags(&self) -> Result<Vec<String>> {
        let mut flags = Vec::new();

        if let Some(cflags) = &self.cflags {
            flags.extend(split_flags("cflags", cflags)?);
        }

        if let Some(command) = &self.cflags_command {
            flags.extend(flags_from_command(command)?);
        }

        Ok(flags)
    }

    /// Full compiler argument vector for the given artifact and source paths.
    pub fn compiler_args(&self, artifact: &Path, source: &Path) -> Result<Vec<OsString>> {
        let mut argv: Vec<OsString> = vec!["-Werror".into(), "-o".into(), artifact.into()];
        argv.extend(self.extra_flags()?.into_iter().map(OsString::from));
        argv.push(source.into());
        Ok(argv)
    }

    fn build(&self, workspace: &Workspace) -> Result<()> {
        let source = workspace.write(SOURCE_FILE, &native_line_endings(&self.source))?;
        let artifact = workspace.file(&artifact_name());

        let argv = self.compiler_args(&artifact, &source)?;
        tracing::debug!("Compiling with {} {:?}", self.compiler, argv);

        run_checked(&self.compiler, &argv).map_err(|failure| CheckError::CompileFailed {
            compiler: self.compiler.clone(),
            status: failure.status,
            output: failure.output,
        })?;

        if self.run {
            tracing::debug!("Running {}", artifact.display());
            run_checked(&artifact, Vec::<OsString>::new()).map_err(|failure| {
                CheckError::RunFailed {
                    status: failure.status,
                    output: failure.output,
                }
            })?;
        }

        Ok(())
    }
}

impl Checker for CompileGcc {
    fn evaluate(&self) -> Result<()> {
        with_workspace(WORKSPACE_PREFIX, self.temp_dir.as_deref(), |workspace| {
            self.build(workspace)
        })
    }
}

/// Why a subprocess did not succeed, with whatever it printed.
struct Failure {
    status: String,
    output: String,
}

/// Run a program with both streams merged in write order.
fn run_checked(
    program: impl AsRef<std::ffi::OsStr>,
    args: impl IntoIterator<Item = impl AsRef<std::ffi::OsStr>>,
) -> std::result::Result<(), Failure> {
    match run_combined(program, args) {
        Ok(out) if out.success() => Ok(()),
        Ok(out) => Err(Failure {
            status: out.status_line(),
            output: out.output,
        }),
        Err(e) => Err(Failure {
            status: e.to_string(),
            output: String::new(),
        }),
    }
}

/// Run `command` and tokenize what it prints on stdout.
///
/// Fails before spawning anything when the command has no tokens.
fn flags_from_command(command: &str) -> Result<Vec<String>> {
    let mut fields = split_flags("cflags_command", command)?.into_iter();
    let Some(program) = fields.next() else {
        return Err(CheckError::UnexecutableCommand {
            what: "cflags command".to_string(),
            command: command.to_string(),
        });
    };

    let failed = |status: String, output: String| CheckError::FlagCommandFailed {
        command: command.to_string(),
        status,
        output,
    };
    let out = run_captured(&program, fields).map_err(|e| failed(e.to_string(), String::new()))?;
    if !out.success() {
        return Err(failed(out.status_line(), out.combined()));
    }

    let printed = trim_line_terminator(&out.stdout);
    tracing::debug!("cflags command printed {:?}", printed);
    split_flags("cflags command output", printed)
}

fn split_flags(what: &str, input: &str) -> Result<Vec<String>> {
    shlex::split(input).ok_or_else(|| CheckError::Parse {
        what: what.to_string(),
        input: input.to_string(),
    })
}

/// Remove exactly one trailing `\n` or `\r\n`.
fn trim_line_terminator(s: &str) -> &str {
    s.strip_suffix("\r\n")
        .or_else(|| s.strip_suffix('\n'))
        .unwrap_or(s)
}

fn artifact_name() -> String {
    format!("out{}", std::env::consts::EXE_SUFFIX)
}

fn native_line_endings(source: &str) -> Cow<'_, str> {
    if cfg!(windows) {
        Cow::Owned(to_crlf(source))
    } else {
        Cow::Borrowed(source)
    }
}

/// Turn lone `\n` into `\r\n`, leaving existing `\r\n` pairs alone.
fn to_crlf(source: &str) -> String {
    let mut out = String::with_capacity(source.len() + source.len() / 16);
    let mut prev = None;
    for c in source.chars() {
        if c == '\n' && prev != Some('\r') {
            out.push('\r');
        }
        out.push(c);
        prev = Some(c);
    }
    out
}
