//! Installed package checks.
//!
//! `yum-installed` asks `rpm -qa <name>`; `dpkg-installed` asks
//! `dpkg-query` for the package status. Both are Linux only.
//!
//! # Arguments
//!
//! - `name` (required): the package name

use super::Checker;
use crate::args::{bind, CheckArgs};
use crate::error::{CheckError, Result};
use crate::process::run_captured;
use anyhow::anyhow;
use serde::Deserialize;
use std::fmt;

/// Registered type name for rpm-based systems.
pub const YUM_NAME: &str = "yum-installed";

/// Registered type name for dpkg-based systems.
pub const DPKG_NAME: &str = "dpkg-installed";

const DPKG_INSTALLED: &str = "install ok installed";

/// The package database to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    /// `rpm -qa`.
    Rpm,
    /// `dpkg-query -W`.
    Dpkg,
}

impl PackageManager {
    fn check_name(self) -> &'static str {
        match self {
            PackageManager::Rpm => YUM_NAME,
            PackageManager::Dpkg => DPKG_NAME,
        }
    }

    fn program(self) -> &'static str {
        match self {
            PackageManager::Rpm => "rpm",
            PackageManager::Dpkg => "dpkg-query",
        }
    }

    fn query_args(self, package: &str) -> Vec<String> {
        match self {
            PackageManager::Rpm => vec!["-qa".to_string(), package.to_string()],
            PackageManager::Dpkg => vec![
                "-W".to_string(),
                "-f=${Status}".to_string(),
                package.to_string(),
            ],
        }
    }

    /// Interpret a query's stdout and exit status.
    ///
    /// Returns `None` when the query itself failed and says nothing about
    /// the package.
    fn installed(self, succeeded: bool, stdout: &str) -> Option<bool> {
        match self {
            PackageManager::Rpm if !succeeded => None,
            PackageManager::Rpm => Some(!stdout.trim().is_empty()),
            // dpkg-query exits 1 for packages it has never heard of.
            PackageManager::Dpkg => Some(succeeded && stdout.contains(DPKG_INSTALLED)),
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program())
    }
}

#[derive(Debug, Deserialize)]
struct PackageArgs {
    name: String,
}

/// Checks that a system package is installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageInstalled {
    /// Package database to ask.
    pub manager: PackageManager,
    /// Package name.
    pub name: String,
}

impl PackageInstalled {
    /// Build the check from a record.
    pub fn from_args(manager: PackageManager, args: &CheckArgs) -> Result<Self> {
        let parsed: PackageArgs = bind(manager.check_name(), args, &["name"])?;
        Ok(Self {
            manager,
            name: parsed.name,
        })
    }
}

impl Checker for PackageInstalled {
    fn evaluate(&self) -> Result<()> {
        let out = run_captured(self.manager.program(), self.manager.query_args(&self.name))?;

        match self.manager.installed(out.success(), &out.stdout) {
            Some(true) => Ok(()),
            Some(false) => Err(CheckError::NotInstalled {
                manager: self.manager.to_string(),
                package: self.name.clone(),
            }),
            None => Err(anyhow!(
                "{} query for {} failed ({}): {}",
                self.manager,
                self.name,
                out.status_line(),
                out.combined()
            )
            .into()),
        }
    }
}
