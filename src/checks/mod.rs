//! Check implementations.
//!
//! Every check implements [`Checker`]: a single `evaluate()` that returns
//! `Ok(())` when the asserted fact holds and a descriptive
//! [`CheckError`](crate::error::CheckError) when it does not. [`Check`] is
//! the closed set of built-in checks the registry constructs.
//!
//! # Modules
//!
//! - [`compile`] - Compile (and optionally run) a piece of C source
//! - [`ulimit`] - Process resource limits, backed by [`rlimit`]
//! - [`file`] - Path existence
//! - [`script`] - Run a script with an interpreter
//! - [`package`] - rpm and dpkg package queries
//! - [`python`] - Python module import and version

pub mod compile;
pub mod file;
pub mod package;
pub mod python;
pub mod rlimit;
pub mod script;
pub mod ulimit;

use crate::error::Result;

pub use compile::CompileGcc;
pub use file::FileCheck;
pub use package::{PackageInstalled, PackageManager};
pub use python::PythonModule;
pub use script::RunScript;
pub use ulimit::{LimitKind, UlimitCheck};

/// A constructed, ready-to-run assertion.
pub trait Checker {
    /// Evaluate the assertion against the current host.
    ///
    /// Implementations must not panic when the assertion fails; failures to
    /// inspect the host are returned through the same error channel.
    fn evaluate(&self) -> Result<()>;
}

/// One built-in check with its bound parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Check {
    CompileGcc(CompileGcc),
    Ulimit(UlimitCheck),
    File(FileCheck),
    RunScript(RunScript),
    Package(PackageInstalled),
    PythonModule(PythonModule),
}

impl Checker for Check {
    fn evaluate(&self) -> Result<()> {
        match self {
            Check::CompileGcc(check) => check.evaluate(),
            Check::Ulimit(check) => check.evaluate(),
            Check::File(check) => check.evaluate(),
            Check::RunScript(check) => check.evaluate(),
            Check::Package(check) => check.evaluate(),
            Check::PythonModule(check) => check.evaluate(),
        }
    }
}

impl From<CompileGcc> for Check {
    fn from(check: CompileGcc) -> Self {
        Check::CompileGcc(check)
    }
}

impl From<UlimitCheck> for Check {
    fn from(check: UlimitCheck) -> Self {
        Check::Ulimit(check)
    }
}

impl From<FileCheck> for Check {
    fn from(check: FileCheck) -> Self {
        Check::File(check)
    }
}

impl From<RunScript> for Check {
    fn from(check: RunScript) -> Self {
        Check::RunScript(check)
    }
}

impl From<PackageInstalled> for Check {
    fn from(check: PackageInstalled) -> Self {
        Check::Package(check)
    }
}

impl From<PythonModule> for Check {
    fn from(check: PythonModule) -> Self {
        Check::PythonModule(check)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CheckError;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn check_delegates_to_variant() {
        let temp = TempDir::new().unwrap();
        let present: Check = FileCheck {
            path: temp.path().to_path_buf(),
            exists: true,
        }
        .into();
        let absent: Check = FileCheck {
            path: PathBuf::from("/definitely/not/here"),
            exists: true,
        }
        .into();

        assert!(present.evaluate().is_ok());
        assert!(matches!(
            absent.evaluate(),
            Err(CheckError::FileMissing { .. })
        ));
    }

    #[test]
    fn checks_are_thread_safe() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Check>();
    }
}
