//! Resource limit symbol table and `getrlimit` access.
//!
//! Item names follow `limits.conf(5)`; only the names listed in
//! [`LIMIT_NAMES`] are supported.

use crate::error::{CheckError, Result};
use std::fmt;

/// Declares the name list and, on unix, the name-to-resource table from one
/// set of entries.
macro_rules! limit_table {
    ($($name:literal => $resource:ident),+ $(,)?) => {
        /// Every symbolic limit name that can be read.
        pub const LIMIT_NAMES: &[&str] = &[$($name),+];

        #[cfg(unix)]
        const LIMITS: &[(&str, Resource)] = &[$(($name, libc::$resource)),+];
    };
}

#[cfg(all(target_os = "linux", target_env = "gnu"))]
type Resource = libc::__rlimit_resource_t;

#[cfg(all(unix, not(all(target_os = "linux", target_env = "gnu"))))]
type Resource = libc::c_int;

limit_table! {
    "as" => RLIMIT_AS,
    "core" => RLIMIT_CORE,
    "cpu" => RLIMIT_CPU,
    "data" => RLIMIT_DATA,
    "fsize" => RLIMIT_FSIZE,
    "memlock" => RLIMIT_MEMLOCK,
    "nofile" => RLIMIT_NOFILE,
    "nproc" => RLIMIT_NPROC,
    "stack" => RLIMIT_STACK,
}

/// A limit value as the kernel reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitValue {
    /// `RLIM_INFINITY`.
    Unbounded,
    /// A finite limit.
    Finite(u64),
}

impl LimitValue {
    /// Whether this observed value meets the `required` one.
    ///
    /// An unbounded requirement is only met by an unbounded value; a
    /// finite requirement is met by an unbounded value or one at least as
    /// large.
    pub fn satisfies(self, required: LimitValue) -> bool {
        match (self, required) {
            (LimitValue::Unbounded, _) => true,
            (LimitValue::Finite(_), LimitValue::Unbounded) => false,
            (LimitValue::Finite(observed), LimitValue::Finite(required)) => observed >= required,
        }
    }
}

impl fmt::Display for LimitValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LimitValue::Unbounded => write!(f, "unlimited"),
            LimitValue::Finite(n) => write!(f, "{}", n),
        }
    }
}

/// Soft and hard values of one limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Current (soft) value.
    pub soft: LimitValue,
    /// Maximum (hard) value.
    pub hard: LimitValue,
}

/// Whether `item` is in the symbol table.
pub fn is_known(item: &str) -> bool {
    LIMIT_NAMES.contains(&item)
}

/// Read the current process limits for `item`.
#[cfg(unix)]
pub fn read(item: &str) -> Result<Limits> {
    let Some(&(_, resource)) = LIMITS.iter().find(|(name, _)| *name == item) else {
        return Err(CheckError::UnknownLimit {
            item: item.to_string(),
        });
    };

    let mut rlim = libc::rlimit {
        rlim_cur: 0,
        rlim_max: 0,
    };
    // SAFETY: `rlim` is a valid, writable rlimit and `resource` comes from libc.
    let rc = unsafe { libc::getrlimit(resource, &mut rlim) };
    if rc != 0 {
        return Err(CheckError::LimitRead {
            item: item.to_string(),
            source: std::io::Error::last_os_error(),
        });
    }

    Ok(Limits {
        soft: from_raw(rlim.rlim_cur),
        hard: from_raw(rlim.rlim_max),
    })
}

/// Resource limits cannot be read on this platform.
#[cfg(not(unix))]
pub fn read(item: &str) -> Result<Limits> {
    if !is_known(item) {
        return Err(CheckError::UnknownLimit {
            item: item.to_string(),
        });
    }
    Err(CheckError::Unsupported {
        check: "ulimit".to_string(),
        platform: std::env::consts::OS.to_string(),
    })
}

/// Interpret a configured non-negative limit.
///
/// The platform's own `RLIM_INFINITY` value means unbounded, the same as
/// it does in the kernel's answer.
#[cfg(unix)]
#[allow(clippy::unnecessary_cast)]
pub fn from_configured(n: u64) -> LimitValue {
    if n == libc::RLIM_INFINITY as u64 {
        LimitValue::Unbounded
    } else {
        LimitValue::Finite(n)
    }
}

/// Interpret a configured non-negative limit.
#[cfg(not(unix))]
pub fn from_configured(n: u64) -> LimitValue {
    LimitValue::Finite(n)
}

#[cfg(unix)]
#[allow(clippy::unnecessary_cast)]
fn from_raw(raw: libc::rlim_t) -> LimitValue {
    if raw == libc::RLIM_INFINITY {
        LimitValue::Unbounded
    } else {
        LimitValue::Finite(raw as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbounded_requirement_needs_unbounded_value() {
        assert!(LimitValue::Unbounded.satisfies(LimitValue::Unbounded));
        assert!(!LimitValue::Finite(u64::MAX - 1).satisfies(LimitValue::Unbounded));
        assert!(!LimitValue::Finite(0).satisfies(LimitValue::Unbounded));
    }

    #[test]
    fn finite_requirement_is_met_by_unbounded_value() {
        assert!(LimitValue::Unbounded.satisfies(LimitValue::Finite(1024)));
    }

    #[test]
    fn finite_requirement_is_a_lower_bound() {
        assert!(LimitValue::Finite(1024).satisfies(LimitValue::Finite(1024)));
        assert!(LimitValue::Finite(4096).satisfies(LimitValue::Finite(1024)));
        assert!(!LimitValue::Finite(1023).satisfies(LimitValue::Finite(1024)));
    }

    #[test]
    fn display() {
        assert_eq!(LimitValue::Unbounded.to_string(), "unlimited");
        assert_eq!(LimitValue::Finite(42).to_string(), "42");
    }

    #[test]
    fn known_names() {
        assert!(is_known("nofile"));
        assert!(is_known("as"));
        assert!(!is_known("bogus"));
    }

    #[cfg(unix)]
    #[test]
    fn name_list_matches_resource_table() {
        let table: Vec<&str> = LIMITS.iter().map(|(name, _)| *name).collect();
        assert_eq!(table, LIMIT_NAMES);
    }

    #[test]
    fn unknown_item_is_surfaced() {
        let err = read("bogus").unwrap_err();
        assert!(matches!(err, CheckError::UnknownLimit { item } if item == "bogus"));
    }

    #[cfg(unix)]
    #[test]
    fn every_name_can_be_read() {
        for name in LIMIT_NAMES {
            let limits = read(name).unwrap_or_else(|e| panic!("{name}: {e}"));
            assert!(limits.soft.satisfies(LimitValue::Finite(0)));
        }
    }

    #[cfg(unix)]
    #[test]
    #[allow(clippy::unnecessary_cast)]
    fn native_infinity_is_unbounded() {
        assert_eq!(
            from_configured(libc::RLIM_INFINITY as u64),
            LimitValue::Unbounded
        );
        assert_eq!(from_configured(1024), LimitValue::Finite(1024));
    }

    #[cfg(unix)]
    #[test]
    fn soft_never_exceeds_hard() {
        let limits = read("nofile").unwrap();
        assert!(limits.hard.satisfies(limits.soft));
    }
}
