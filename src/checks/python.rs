//! Python module check.
//!
//! Checks that a python module can be imported and, optionally, that its
//! version satisfies a comparison.
//!
//! # Arguments
//!
//! - `module` (required): module name
//! - `version`: version to compare against. A bare number is accepted,
//!   but quote versions like `1.10`: unquoted it is the float `1.1`.
//! - `comparison`: `gte` (default), `lte`, `gt`, `lt` or `eq`
//! - `min_version`: when set, the installed version must lie between
//!   `min_version` and `version` inclusive; requires `version`
//! - `python`: interpreter to run, default `python` from `PATH`
//! - `statement`: expression printing the version, default
//!   `<module>.__version__`

use super::Checker;
use crate::args::{bind, CheckArgs, Supplied};
use crate::error::{CheckError, Result};
use crate::process::run_captured;
use anyhow::anyhow;
use regex::Regex;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_yaml::Value;
use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

/// Registered check type name.
pub const CHECK_NAME: &str = "python-module-version";

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)^\s*v?",
        r"(?:(\d+)!)?",
        r"(\d+(?:\.\d+)*)",
        r"(?:[-_.]?(alpha|beta|preview|pre|rc|a|b|c)[-_.]?(\d*))?",
        r"(?:-(\d+)|[-_.]?(?:post|rev|r)[-_.]?(\d*))?",
        r"(?:[-_.]?dev[-_.]?(\d*))?",
    ))
    .unwrap()
});

/// How the installed version is compared with `version`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparison {
    /// installed == version
    Eq,
    /// installed >= version
    #[default]
    Gte,
    /// installed <= version
    Lte,
    /// installed > version
    Gt,
    /// installed < version
    Lt,
}

impl Comparison {
    fn holds(self, installed: &Version, expected: &Version) -> bool {
        let ord = installed.cmp(expected);
        match self {
            Comparison::Eq => ord == Ordering::Equal,
            Comparison::Gte => ord != Ordering::Less,
            Comparison::Lte => ord != Ordering::Greater,
            Comparison::Gt => ord == Ordering::Greater,
            Comparison::Lt => ord == Ordering::Less,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            Comparison::Eq => "==",
            Comparison::Gte => ">=",
            Comparison::Lte => "<=",
            Comparison::Gt => ">",
            Comparison::Lt => "<",
        }
    }
}

/// Position of a version relative to its plain release.
///
/// Variant order is the sort order: a dev release of the final version
/// (`1.0.dev0`) sorts before every pre-release of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Phase {
    DevOnly,
    Alpha(u64),
    Beta(u64),
    Candidate(u64),
    Final,
}

/// `.devN` suffix; a version without one sorts after any that has one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Dev {
    Number(u64),
    Absent,
}

/// A PEP 440 public version: epoch, release, pre, post and dev parts.
///
/// Missing trailing release components count as zero, so `6.7 == 6.7.0`.
/// Ordering follows `2.0.0.dev1 < 2.0.0a1 < 2.0.0rc1 < 2.0.0 < 2.0.0.post1`.
/// Local labels (`+ubuntu1`) are ignored.
#[derive(Debug, Clone)]
pub struct Version {
    epoch: u64,
    release: Vec<u64>,
    phase: Phase,
    post: Option<u64>,
    dev: Dev,
    text: String,
}

impl Version {
    /// Parse the version at the start of `input`; trailing text is ignored.
    pub fn parse(input: &str) -> Option<Self> {
        let caps = VERSION_RE.captures(input)?;
        let number = |index: usize| -> Option<Option<u64>> {
            match caps.get(index) {
                None => Some(None),
                Some(m) if m.as_str().is_empty() => Some(Some(0)),
                Some(m) => m.as_str().parse().ok().map(Some),
            }
        };

        let release = caps
            .get(2)?
            .as_str()
            .split('.')
            .map(|p| p.parse().ok())
            .collect::<Option<Vec<u64>>>()?;
        let epoch = number(1)?.unwrap_or(0);
        let pre = number(4)?.unwrap_or(0);
        let post = number(5)?.or(number(6)?);
        let dev = number(7)?;

        let phase = match caps.get(3).map(|m| m.as_str().to_ascii_lowercase()) {
            Some(kind) if kind == "a" || kind == "alpha" => Phase::Alpha(pre),
            Some(kind) if kind == "b" || kind == "beta" => Phase::Beta(pre),
            Some(_) => Phase::Candidate(pre),
            None if post.is_none() && dev.is_some() => Phase::DevOnly,
            None => Phase::Final,
        };

        Some(Self {
            epoch,
            release,
            phase,
            post,
            dev: dev.map_or(Dev::Absent, Dev::Number),
            text: input[caps.get(1).or(caps.get(2))?.start()..caps.get(0)?.end()].to_string(),
        })
    }

    fn cmp_release(&self, other: &Self) -> Ordering {
        let len = self.release.len().max(other.release.len());
        (0..len)
            .map(|i| {
                let a = self.release.get(i).copied().unwrap_or(0);
                let b = other.release.get(i).copied().unwrap_or(0);
                a.cmp(&b)
            })
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch
            .cmp(&other.epoch)
            .then_with(|| self.cmp_release(other))
            .then_with(|| self.phase.cmp(&other.phase))
            .then_with(|| self.post.cmp(&other.post))
            .then_with(|| self.dev.cmp(&other.dev))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// What the installed version must satisfy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionRequirement {
    /// Only check that the module imports.
    Any,
    /// installed <comparison> version
    Compare(Comparison, Version),
    /// min <= installed <= max
    Between(Version, Version),
}

impl VersionRequirement {
    fn accepts(&self, installed: &Version) -> bool {
        match self {
            VersionRequirement::Any => true,
            VersionRequirement::Compare(cmp, expected) => cmp.holds(installed, expected),
            VersionRequirement::Between(min, max) => min <= installed && installed <= max,
        }
    }
}

impl fmt::Display for VersionRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionRequirement::Any => write!(f, "any version"),
            VersionRequirement::Compare(cmp, v) => write!(f, "{} {}", cmp.symbol(), v),
            VersionRequirement::Between(min, max) => write!(f, "between {} and {}", min, max),
        }
    }
}

/// Version text that may have been written as a bare YAML number.
#[derive(Debug)]
struct VersionText(String);

impl<'de> Deserialize<'de> for VersionText {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(text) => Ok(VersionText(text)),
            Value::Number(n) => Ok(VersionText(n.to_string())),
            other => Err(D::Error::custom(format!(
                "expected a version string, got {:?}",
                other
            ))),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PythonArgs {
    module: String,
    #[serde(default)]
    version: Supplied<VersionText>,
    #[serde(default)]
    min_version: Supplied<VersionText>,
    #[serde(default)]
    python: Supplied<String>,
    #[serde(default)]
    comparison: Supplied<Comparison>,
    #[serde(default)]
    statement: Supplied<String>,
}

/// Checks that a python module is importable, optionally at a version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PythonModule {
    /// Module to import.
    pub module: String,
    /// Interpreter to run.
    pub python: String,
    /// Expression that evaluates to the version.
    pub statement: String,
    /// Version constraint.
    pub requirement: VersionRequirement,
}

impl PythonModule {
    /// Build the check from a record.
    pub fn from_args(args: &CheckArgs) -> Result<Self> {
        let parsed: PythonArgs = bind(CHECK_NAME, args, &["module"])?;

        let invalid = |message: String| CheckError::InvalidArgument {
            check: CHECK_NAME.to_string(),
            message,
        };
        let parse = |field: &str, text: &str| {
            Version::parse(text)
                .ok_or_else(|| invalid(format!("{} {:?} is not a version", field, text)))
        };

        let requirement = match (parsed.version.into_option(), parsed.min_version.into_option()) {
            (None, None) => VersionRequirement::Any,
            (None, Some(_)) => {
                return Err(invalid("min_version requires that version is set".to_string()))
            }
            (Some(VersionText(version)), None) => VersionRequirement::Compare(
                parsed.comparison.or(Comparison::default()),
                parse("version", &version)?,
            ),
            (Some(VersionText(version)), Some(VersionText(min))) => {
                VersionRequirement::Between(parse("min_version", &min)?, parse("version", &version)?)
            }
        };

        let statement = parsed
            .statement
            .or_else(|| format!("{}.__version__", parsed.module));

        Ok(Self {
            python: parsed.python.or_else(|| "python".to_string()),
            module: parsed.module,
            statement,
            requirement,
        })
    }

    fn program(&self) -> String {
        format!("import {}; print({})", self.module, self.statement)
    }

    /// Compare the printed version against the requirement.
    pub fn judge(&self, printed: &str) -> Result<()> {
        if self.requirement == VersionRequirement::Any {
            return Ok(());
        }

        // Python 2 prints a one-element tuple for print(x) with parentheses.
        let printed = printed.trim();
        let printed = printed
            .strip_prefix('(')
            .and_then(|p| p.strip_suffix(')'))
            .unwrap_or(printed);

        let installed = Version::parse(printed).ok_or_else(|| {
            CheckError::from(anyhow!(
                "could not read a version for {} from {:?}",
                self.module,
                printed
            ))
        })?;

        if self.requirement.accepts(&installed) {
            Ok(())
        } else {
            Err(CheckError::VersionMismatch {
                module: self.module.clone(),
                found: printed.to_string(),
                expected: self.requirement.to_string(),
            })
        }
    }
}

impl Checker for PythonModule {
    fn evaluate(&self) -> Result<()> {
        let out = run_captured(&self.python, ["-c".to_string(), self.program()])?;
        if !out.success() {
            return Err(CheckError::ModuleMissing {
                module: self.module.clone(),
                output: out.combined(),
            });
        }
        self.judge(&out.stdout)
    }
}
