//! Binding untyped records into typed check parameters.

use super::record::{normalize_key, CheckArgs};
use crate::error::{CheckError, Result};
use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};

/// Decode `args` into the parameter type `T` for the check named `check`.
///
/// Keys are normalized (case-insensitive, `-` as `_`) before decoding.
/// Every name in `required` must be present or binding fails with
/// [`CheckError::MissingArgument`]; values that do not fit their field
/// fail with [`CheckError::TypeMismatch`]. Keys `T` does not declare are
/// ignored.
pub fn bind<T: DeserializeOwned>(check: &str, args: &CheckArgs, required: &[&str]) -> Result<T> {
    let normalized = normalize(check, args)?;
    require(check, &normalized, required)?;

    let keys: Vec<&str> = normalized.keys().filter_map(|key| key.as_str()).collect();
    tracing::debug!(check, keys = ?keys, "Binding check arguments");

    serde_yaml::from_value(Value::Mapping(normalized)).map_err(|e| CheckError::TypeMismatch {
        check: check.to_string(),
        message: e.to_string(),
    })
}

/// Fail with [`CheckError::MissingArgument`] for the first absent field.
pub fn require(check: &str, args: &Mapping, required: &[&str]) -> Result<()> {
    match required.iter().find(|field| !args.contains_key(**field)) {
        Some(field) => Err(CheckError::MissingArgument {
            check: check.to_string(),
            field: field.to_string(),
        }),
        None => Ok(()),
    }
}

fn normalize(check: &str, args: &CheckArgs) -> Result<Mapping> {
    let mut mapping = Mapping::with_capacity(args.len());
    for (key, value) in args.iter() {
        let key = normalize_key(key);
        if mapping.contains_key(key.as_str()) {
            return Err(CheckError::DuplicateArgument {
                check: check.to_string(),
                field: key,
            });
        }
        mapping.insert(Value::String(key), value.clone());
    }
    Ok(mapping)
}
