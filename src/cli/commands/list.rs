//! List command implementation.
//!
//! The `hostcheck list` command lists registered check types and aliases.

use std::io::Write;

use console::style;
use serde::Serialize;

use crate::cli::args::ListArgs;
use crate::error::Result;
use crate::registry::CheckRegistry;

use super::dispatcher::{Command, CommandResult};

/// The list command implementation.
pub struct ListCommand<'a> {
    registry: &'a CheckRegistry,
    args: ListArgs,
}

#[derive(Debug, Serialize)]
struct ListedCheck<'a> {
    name: &'a str,
    alias_of: Option<&'a str>,
}

impl<'a> ListCommand<'a> {
    /// Create a new list command.
    pub fn new(registry: &'a CheckRegistry, args: ListArgs) -> Self {
        Self { registry, args }
    }

    fn entries(&self) -> Vec<ListedCheck<'a>> {
        self.registry
            .names()
            .into_iter()
            .map(|name| ListedCheck {
                name,
                alias_of: self.registry.alias_target(name),
            })
            .collect()
    }
}

impl Command for ListCommand<'_> {
    fn execute(&self, out: &mut dyn Write) -> Result<CommandResult> {
        let entries = self.entries();

        if self.args.json {
            let json = serde_json::to_string_pretty(&entries).map_err(anyhow::Error::from)?;
            writeln!(out, "{json}")?;
            return Ok(CommandResult::success());
        }

        for entry in &entries {
            match entry.alias_of {
                Some(target) => writeln!(
                    out,
                    "{} {}",
                    entry.name,
                    style(format!("(alias of {target})")).dim()
                )?,
                None => writeln!(out, "{}", entry.name)?,
            }
        }
        Ok(CommandResult::success())
    }
}
