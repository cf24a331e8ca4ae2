//! Untyped check records.

use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::BTreeMap;

/// The untyped key/value record a check is built from.
///
/// Keys are kept exactly as written; the binder normalizes them when it
/// decodes. [`CheckArgs::set`] replaces every key that normalizes to the
/// same name so an injected value always wins over a supplied one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckArgs(BTreeMap<String, Value>);

impl CheckArgs {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a record from a YAML (or JSON) mapping.
    pub fn from_yaml_str(input: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document is an empty record, not an error.
        if input.trim().is_empty() {
            return Ok(Self::new());
        }
        serde_yaml::from_str(input)
    }

    /// Set a field, overriding any existing spelling of the same key.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        let key = key.into();
        let wanted = normalize_key(&key);
        self.0.retain(|existing, _| normalize_key(existing) != wanted);
        self.0.insert(key, value.into());
        self
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Get a field by its exact key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Whether a key normalizing to `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        let wanted = normalize_key(key);
        self.0.keys().any(|k| normalize_key(k) == wanted)
    }

    /// Iterate over the raw entries.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the record has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for CheckArgs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut args = CheckArgs::new();
        for (key, value) in iter {
            args.set(key, value);
        }
        args
    }
}

/// Canonical spelling of an argument name: trimmed, lowercase, `-` as `_`.
pub fn normalize_key(key: &str) -> String {
    key.trim().to_ascii_lowercase().replace('-', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_key_folds_case_and_dashes() {
        assert_eq!(normalize_key("Name"), "name");
        assert_eq!(normalize_key("cflags-command"), "cflags_command");
        assert_eq!(normalize_key("cflagsCommand"), "cflagscommand");
        assert_eq!(normalize_key(" item "), "item");
    }

    #[test]
    fn set_overrides_other_spellings() {
        let mut args = CheckArgs::new().with("Exists", true);
        args.set("exists", false);

        assert_eq!(args.len(), 1);
        assert_eq!(args.get("exists"), Some(&Value::Bool(false)));
        assert!(args.get("Exists").is_none());
    }

    #[test]
    fn contains_is_case_insensitive() {
        let args = CheckArgs::new().with("NAME", "/tmp");
        assert!(args.contains("name"));
        assert!(!args.contains("exists"));
    }

    #[test]
    fn from_yaml_str_parses_mapping() {
        let args = CheckArgs::from_yaml_str("item: nofile\nlimit: 1024\n").unwrap();
        assert_eq!(args.get("item"), Some(&Value::from("nofile")));
        assert_eq!(args.get("limit"), Some(&Value::from(1024)));
    }

    #[test]
    fn from_yaml_str_accepts_json() {
        let args = CheckArgs::from_yaml_str(r#"{"name": "/etc/hosts", "exists": false}"#).unwrap();
        assert_eq!(args.get("exists"), Some(&Value::Bool(false)));
    }

    #[test]
    fn from_yaml_str_empty_document_is_empty_record() {
        assert!(CheckArgs::from_yaml_str("  \n").unwrap().is_empty());
    }

    #[test]
    fn from_yaml_str_rejects_sequences() {
        assert!(CheckArgs::from_yaml_str("- a\n- b\n").is_err());
    }

    #[test]
    fn collects_from_pairs() {
        let args: CheckArgs = [("item", "as"), ("type", "soft")].into_iter().collect();
        assert_eq!(args.len(), 2);
        assert!(args.contains("type"));
    }
}
