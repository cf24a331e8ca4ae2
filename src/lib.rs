//! Hostcheck - declarative host verification.
//!
//! A check is named by a type string and configured by a loose key/value
//! record. The [`CheckRegistry`] turns the pair into a typed [`Check`], and
//! [`Checker::evaluate`] reports whether the host satisfies it.
//!
//! # Modules
//!
//! - [`args`] - Argument records and the binder that decodes them
//! - [`checks`] - The [`Checker`] trait and every built-in check
//! - [`cli`] - Command-line interface and argument parsing
//! - [`error`] - Error types and result aliases
//! - [`process`] - Subprocess execution with captured output
//! - [`registry`] - Check type names, factories and aliases
//! - [`workspace`] - Scoped scratch directories
//!
//! # Example
//!
//! ```
//! use hostcheck::{CheckArgs, CheckRegistry, Checker};
//!
//! let registry = CheckRegistry::with_builtins();
//! let check = registry
//!     .resolve("file-does-not-exist", CheckArgs::new().with("name", "/no/such/path"))
//!     .unwrap();
//! assert!(check.evaluate().is_ok());
//! ```

pub mod args;
pub mod checks;
pub mod cli;
pub mod error;
pub mod process;
pub mod registry;
pub mod workspace;

pub use args::{CheckArgs, Supplied};
pub use checks::{Check, Checker};
pub use error::{CheckError, ErrorKind, Result};
pub use registry::CheckRegistry;
