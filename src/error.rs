//! Error types for check binding and evaluation.
//!
//! This module defines [`CheckError`], the single error type returned by
//! the binder, the registry and every check, and a [`Result`] type alias.
//!
//! # Error Handling Strategy
//!
//! - Configuration errors are raised before any check logic runs
//! - A failed assertion is an ordinary `Err`, not a panic
//! - Subprocess failures embed the captured output verbatim
//! - Use [`CheckError::kind`] to tell the four families apart

use std::path::PathBuf;
use thiserror::Error;

/// Broad classification of a [`CheckError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The check could not be constructed from its arguments.
    Configuration,
    /// The asserted fact did not hold.
    Assertion,
    /// The host could not be inspected (I/O, missing tools, syscalls).
    Environment,
    /// A flag string, compiler or compiled artifact failed.
    Tooling,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Configuration => write!(f, "configuration"),
            ErrorKind::Assertion => write!(f, "assertion"),
            ErrorKind::Environment => write!(f, "environment"),
            ErrorKind::Tooling => write!(f, "tooling"),
        }
    }
}

/// Core error type for hostcheck operations.
#[derive(Debug, Error)]
pub enum CheckError {
    /// A required argument was not supplied.
    #[error("{check}: missing required argument '{field}'")]
    MissingArgument { check: String, field: String },

    /// Two keys normalize to the same argument name.
    #[error("{check}: argument '{field}' given more than once")]
    DuplicateArgument { check: String, field: String },

    /// An argument could not be decoded into its field type.
    #[error("{check}: {message}")]
    TypeMismatch { check: String, message: String },

    /// Arguments decoded but are not a usable combination.
    #[error("{check}: invalid arguments: {message}")]
    InvalidArgument { check: String, message: String },

    /// No factory is registered under this name.
    #[error("{name} is not a known check type")]
    UnknownCheckType { name: String },

    /// The arguments file could not be read or parsed.
    #[error("Failed to load check arguments from {path}: {message}")]
    ArgsFile { path: PathBuf, message: String },

    /// A resource limit is below what was required.
    #[error("Process {kind} limit for \"{item}\" is {observed}, lower than required ({required})")]
    LimitTooLow {
        kind: String,
        item: String,
        observed: String,
        required: String,
    },

    /// A path that should exist does not.
    #[error("{} doesn't exist and should", .path.display())]
    FileMissing { path: PathBuf },

    /// A path that should not exist does.
    #[error("{} does exist and shouldn't", .path.display())]
    FileUnexpected { path: PathBuf },

    /// A package manager reports the package as absent.
    #[error("{package} isn't installed and should be ({manager})")]
    NotInstalled { manager: String, package: String },

    /// A python module could not be imported.
    #[error("{module} module is not installed: {output}")]
    ModuleMissing { module: String, output: String },

    /// An installed version does not satisfy the requested comparison.
    #[error("{module} is version {found}, expected {expected}")]
    VersionMismatch {
        module: String,
        found: String,
        expected: String,
    },

    /// A script exited unsuccessfully.
    #[error("Script run with {interpreter} failed ({status}): {output}")]
    ScriptFailed {
        interpreter: String,
        status: String,
        output: String,
    },

    /// IO error with the operation that caused it.
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// A subprocess could not be started.
    #[error("Failed to launch '{command}': {source}")]
    CommandLaunch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The resource limit name is not in the symbol table.
    #[error("Unknown resource limit \"{item}\"")]
    UnknownLimit { item: String },

    /// getrlimit failed.
    #[error("Failed to read resource limit \"{item}\": {source}")]
    LimitRead {
        item: String,
        #[source]
        source: std::io::Error,
    },

    /// The check cannot run on this platform.
    #[error("{check} is not supported on {platform}")]
    Unsupported { check: String, platform: String },

    /// A shell-style string has malformed quoting.
    #[error("Unable to parse {what}: {input:?}")]
    Parse { what: String, input: String },

    /// A command string has no tokens.
    #[error("Got unexecutable {what}: {command:?}")]
    UnexecutableCommand { what: String, command: String },

    /// The cflags discovery command failed.
    #[error("Problem running cflags command '{command}' ({status}): {output}")]
    FlagCommandFailed {
        command: String,
        status: String,
        output: String,
    },

    /// The compiler rejected the source.
    #[error("Problem running the {compiler} compile ({status}): {output}")]
    CompileFailed {
        compiler: String,
        status: String,
        output: String,
    },

    /// The compiled artifact exited unsuccessfully.
    #[error("Problem running compiled executable ({status}): {output}")]
    RunFailed { status: String, output: String },

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CheckError {
    /// The family this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CheckError::MissingArgument { .. }
            | CheckError::DuplicateArgument { .. }
            | CheckError::TypeMismatch { .. }
            | CheckError::InvalidArgument { .. }
            | CheckError::UnknownCheckType { .. }
            | CheckError::ArgsFile { .. } => ErrorKind::Configuration,

            CheckError::LimitTooLow { .. }
            | CheckError::FileMissing { .. }
            | CheckError::FileUnexpected { .. }
            | CheckError::NotInstalled { .. }
            | CheckError::ModuleMissing { .. }
            | CheckError::VersionMismatch { .. }
            | CheckError::ScriptFailed { .. } => ErrorKind::Assertion,

            CheckError::Io { .. }
            | CheckError::CommandLaunch { .. }
            | CheckError::UnknownLimit { .. }
            | CheckError::LimitRead { .. }
            | CheckError::Unsupported { .. }
            | CheckError::Other(_) => ErrorKind::Environment,

            CheckError::Parse { .. }
            | CheckError::UnexecutableCommand { .. }
            | CheckError::FlagCommandFailed { .. }
            | CheckError::CompileFailed { .. }
            | CheckError::RunFailed { .. } => ErrorKind::Tooling,
        }
    }

    /// Wrap an IO error with a description of the failed operation.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        CheckError::Io {
            context: context.into(),
            source,
        }
    }
}

impl From<std::io::Error> for CheckError {
    fn from(source: std::io::Error) -> Self {
        CheckError::io("IO error", source)
    }
}

/// Result type alias for hostcheck operations.
pub type Result<T> = std::result::Result<T, CheckError>;
