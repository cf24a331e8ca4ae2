//! Presence marker for optional arguments.

use serde::{Deserialize, Deserializer};

/// An optional argument that remembers whether its key was in the record.
///
/// Declare optional parameter fields as `#[serde(default)] Supplied<T>`:
/// serde only calls [`Deserialize`] when the key is present, so
/// [`Supplied::Absent`] means the key was missing and
/// [`Supplied::Present`] holds whatever was given, including `""`, `0`
/// and `false`. Defaults are applied with [`Supplied::or`], never by
/// looking at a decoded zero value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Supplied<T> {
    /// The key was not in the record.
    Absent,
    /// The key was in the record with this value.
    Present(T),
}

impl<T> Supplied<T> {
    /// Whether the key was in the record.
    pub fn is_present(&self) -> bool {
        matches!(self, Supplied::Present(_))
    }

    /// The supplied value, or `default` when the key was absent.
    pub fn or(self, default: T) -> T {
        match self {
            Supplied::Present(value) => value,
            Supplied::Absent => default,
        }
    }

    /// The supplied value, or a computed default when the key was absent.
    pub fn or_else(self, default: impl FnOnce() -> T) -> T {
        match self {
            Supplied::Present(value) => value,
            Supplied::Absent => default(),
        }
    }

    /// Convert into an `Option`, dropping the presence distinction.
    pub fn into_option(self) -> Option<T> {
        match self {
            Supplied::Present(value) => Some(value),
            Supplied::Absent => None,
        }
    }

    /// Borrow the supplied value, if any.
    pub fn as_option(&self) -> Option<&T> {
        match self {
            Supplied::Present(value) => Some(value),
            Supplied::Absent => None,
        }
    }
}

impl<T> Default for Supplied<T> {
    fn default() -> Self {
        Supplied::Absent
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Supplied<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Supplied::Present)
    }
}
