//! Check registry.
//!
//! The [`CheckRegistry`] maps check type names to factories that bind a
//! [`CheckArgs`] record into a ready-to-run [`Check`]. Legacy names are
//! registered as aliases: they write fixed fields into the record and then
//! delegate to a concrete type.
//!
//! A registry is built once, typically with [`CheckRegistry::with_builtins`],
//! and only read afterwards, so it can be shared freely between threads.
//!
//! # Example
//!
//! ```
//! use hostcheck::{CheckArgs, CheckRegistry};
//!
//! let registry = CheckRegistry::with_builtins();
//! let check = registry
//!     .resolve("open-files", CheckArgs::new().with("limit", 64))
//!     .unwrap();
//! # let _ = check;
//! ```

use crate::args::CheckArgs;
use crate::checks::{
    compile, file, package, python, script, ulimit, Check, CompileGcc, FileCheck,
    PackageInstalled, PackageManager, PythonModule, RunScript, UlimitCheck,
};
use crate::error::{CheckError, Result};
use serde_yaml::Value;
use std::collections::HashMap;

/// Builds a check from its record.
pub type Factory = fn(&CheckArgs) -> Result<Check>;

enum Entry {
    Factory(Factory),
    Alias {
        target: String,
        inject: Vec<(String, Value)>,
    },
}

/// Registry of check types.
pub struct CheckRegistry {
    entries: HashMap<String, Entry>,
}

impl CheckRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Create a registry with every built-in check type and alias.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();

        registry.register(compile::CHECK_NAME, |args| {
            CompileGcc::from_args(args).map(Check::from)
        });
        registry.register(ulimit::CHECK_NAME, |args| {
            UlimitCheck::from_args(args).map(Check::from)
        });
        registry.register(file::CHECK_NAME, |args| {
            FileCheck::from_args(args).map(Check::from)
        });
        registry.register(script::CHECK_NAME, |args| {
            RunScript::from_args(args).map(Check::from)
        });
        registry.register(package::YUM_NAME, |args| {
            PackageInstalled::from_args(PackageManager::Rpm, args).map(Check::from)
        });
        registry.register(package::DPKG_NAME, |args| {
            PackageInstalled::from_args(PackageManager::Dpkg, args).map(Check::from)
        });
        registry.register(python::CHECK_NAME, |args| {
            PythonModule::from_args(args).map(Check::from)
        });

        registry.alias(
            file::NOT_EXISTS_NAME,
            file::CHECK_NAME,
            [("exists", Value::Bool(false))],
        );
        registry.alias(
            script::BASH_NAME,
            script::CHECK_NAME,
            [("interpreter", Value::from("/bin/bash"))],
        );
        registry.alias(
            "open-files",
            ulimit::CHECK_NAME,
            [("item", Value::from("nofile"))],
        );
        registry.alias(
            "address-size",
            ulimit::CHECK_NAME,
            [("item", Value::from("as"))],
        );

        registry
    }

    /// Register a factory under `name`, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, factory: Factory) {
        self.entries.insert(name.into(), Entry::Factory(factory));
    }

    /// Register `name` as an alias of the concrete type `target`.
    ///
    /// Each `(key, value)` in `inject` is written into the record before
    /// `target`'s factory runs, overriding whatever the caller supplied.
    pub fn alias<'a>(
        &mut self,
        name: impl Into<String>,
        target: impl Into<String>,
        inject: impl IntoIterator<Item = (&'a str, Value)>,
    ) {
        let inject = inject
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect();
        self.entries.insert(
            name.into(),
            Entry::Alias {
                target: target.into(),
                inject,
            },
        );
    }

    /// Build the check registered as `name` from `args`.
    pub fn resolve(&self, name: &str, mut args: CheckArgs) -> Result<Check> {
        let factory = match self.entries.get(name) {
            Some(Entry::Factory(factory)) => *factory,
            Some(Entry::Alias { target, inject }) => {
                for (key, value) in inject {
                    args.set(key.as_str(), value.clone());
                }
                tracing::debug!("Check type {} is an alias of {}", name, target);
                match self.entries.get(target) {
                    Some(Entry::Factory(factory)) => *factory,
                    _ => {
                        return Err(CheckError::UnknownCheckType {
                            name: target.clone(),
                        })
                    }
                }
            }
            None => {
                return Err(CheckError::UnknownCheckType {
                    name: name.to_string(),
                })
            }
        };

        factory(&args)
    }

    /// The concrete type an alias points at, if `name` is an alias.
    pub fn alias_target(&self, name: &str) -> Option<&str> {
        match self.entries.get(name) {
            Some(Entry::Alias { target, .. }) => Some(target.as_str()),
            _ => None,
        }
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// All registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Get the number of registered names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CheckRegistry {
    fn default() -> Self {
        Self::new()
    }
}
