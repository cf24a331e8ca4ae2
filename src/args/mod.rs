//! Check arguments and binding.
//!
//! Checks are configured from untyped records ([`CheckArgs`]) and bound
//! into typed parameter structs with [`bind`]. Optional parameters are
//! declared as [`Supplied<T>`] so a default is applied only when the key
//! was absent, never because the supplied value happened to be falsy.
//!
//! # Example
//!
//! ```
//! use hostcheck::args::{bind, CheckArgs, Supplied};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Params {
//!     name: String,
//!     #[serde(default)]
//!     exists: Supplied<bool>,
//! }
//!
//! let args = CheckArgs::new().with("name", "/etc/hosts").with("exists", false);
//! let params: Params = bind("file-exists", &args, &["name"]).unwrap();
//! assert!(!params.exists.or(true));
//! ```

pub mod bind;
pub mod record;
pub mod supplied;

pub use bind::{bind, require};
pub use record::{normalize_key, CheckArgs};
pub use supplied::Supplied;
