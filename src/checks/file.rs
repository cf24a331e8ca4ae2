//! File existence check.
//!
//! # Arguments
//!
//! - `name` (required): a path on the filesystem
//! - `exists`: whether the path should exist, default `true`. The
//!   `file-does-not-exist` type always forces this to `false`.
//!
//! No `~` expansion is done, so `~/.bashrc` is looked up literally. On
//! Windows give Windows-style paths.

use super::Checker;
use crate::args::{bind, CheckArgs, Supplied};
use crate::error::{CheckError, Result};
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Registered check type name.
pub const CHECK_NAME: &str = "file-exists";

/// Alias that forces `exists` to `false`.
pub const NOT_EXISTS_NAME: &str = "file-does-not-exist";

#[derive(Debug, Deserialize)]
struct FileArgs {
    name: PathBuf,
    #[serde(default)]
    exists: Supplied<bool>,
}

/// Checks whether a path exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCheck {
    /// Path to look up.
    pub path: PathBuf,
    /// Whether the path should exist.
    pub exists: bool,
}

impl FileCheck {
    /// Build the check from a record.
    pub fn from_args(args: &CheckArgs) -> Result<Self> {
        let parsed: FileArgs = bind(CHECK_NAME, args, &["name"])?;
        Ok(Self {
            path: parsed.name,
            exists: parsed.exists.or(true),
        })
    }
}

impl Checker for FileCheck {
    fn evaluate(&self) -> Result<()> {
        let found = match std::fs::metadata(&self.path) {
            Ok(_) => true,
            Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => false,
            Err(e) => {
                return Err(CheckError::io(
                    format!("Problem inspecting {}", self.path.display()),
                    e,
                ))
            }
        };

        match (found, self.exists) {
            (false, true) => Err(CheckError::FileMissing {
                path: self.path.clone(),
            }),
            (true, false) => Err(CheckError::FileUnexpected {
                path: self.path.clone(),
            }),
            _ => Ok(()),
        }
    }
}
