//! Resource limit check.
//!
//! Checks that a resource limit of the current process is at least a
//! given minimum.
//!
//! # Arguments
//!
//! - `item` (required): limit name, one of [`LIMIT_NAMES`](super::rlimit::LIMIT_NAMES)
//! - `limit` (required): minimum value; `-1`, or the platform's
//!   `RLIM_INFINITY` (`18446744073709551615` on 64-bit Linux), requires the
//!   limit to be unlimited
//! - `type`: `"soft"` or `"hard"`, default `"hard"`
//!
//! Windows is not supported.

use super::rlimit::{self, LimitValue};
use super::Checker;
use crate::args::{bind, CheckArgs, Supplied};
use crate::error::{CheckError, Result};
use serde::Deserialize;
use std::fmt;

/// Registered check type name.
pub const CHECK_NAME: &str = "ulimit";

/// The configured `limit` that means "unlimited".
pub const UNBOUNDED: i64 = -1;

/// Which of the two values of a limit to compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LimitKind {
    /// The current value.
    Soft,
    /// The maximum the soft value may be raised to.
    Hard,
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LimitKind::Soft => write!(f, "soft"),
            LimitKind::Hard => write!(f, "hard"),
        }
    }
}

/// A configured limit; values above `i64::MAX` only fit the unsigned side.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
enum RawLimit {
    Signed(i64),
    Unsigned(u64),
}

#[derive(Debug, Deserialize)]
struct UlimitArgs {
    item: String,
    limit: RawLimit,
    #[serde(default, rename = "type")]
    kind: Supplied<LimitKind>,
}

/// Checks that a process resource limit is high enough.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UlimitCheck {
    /// Symbolic limit name.
    pub item: String,
    /// Minimum acceptable value.
    pub required: LimitValue,
    /// Soft or hard value.
    pub kind: LimitKind,
}

impl UlimitCheck {
    /// Build the check from a record.
    pub fn from_args(args: &CheckArgs) -> Result<Self> {
        let parsed: UlimitArgs = bind(CHECK_NAME, args, &["item", "limit"])?;

        let required = match parsed.limit {
            RawLimit::Signed(UNBOUNDED) => LimitValue::Unbounded,
            RawLimit::Signed(n) if n < 0 => {
                return Err(CheckError::InvalidArgument {
                    check: CHECK_NAME.to_string(),
                    message: format!("limit must be -1 (unlimited) or non-negative, got {}", n),
                })
            }
            RawLimit::Signed(n) => rlimit::from_configured(n as u64),
            RawLimit::Unsigned(n) => rlimit::from_configured(n),
        };

        Ok(Self {
            item: parsed.item,
            required,
            kind: parsed.kind.or(LimitKind::Hard),
        })
    }

    /// Compare an observed value against the requirement.
    pub fn judge(&self, observed: LimitValue) -> Result<()> {
        if observed.satisfies(self.required) {
            return Ok(());
        }
        Err(CheckError::LimitTooLow {
            kind: self.kind.to_string(),
            item: self.item.clone(),
            observed: observed.to_string(),
            required: self.required.to_string(),
        })
    }
}

impl Checker for UlimitCheck {
    fn evaluate(&self) -> Result<()> {
        let limits = rlimit::read(&self.item)?;
        let observed = match self.kind {
            LimitKind::Soft => limits.soft,
            LimitKind::Hard => limits.hard,
        };

        tracing::debug!(
            "{} limit for {}: observed {}, required {}",
            self.kind,
            self.item,
            observed,
            self.required
        );

        self.judge(observed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(item: &str, limit: i64) -> CheckArgs {
        CheckArgs::new().with("item", item).with("limit", limit)
    }

    #[test]
    fn item_and_limit_are_required() {
        let err = UlimitCheck::from_args(&CheckArgs::new().with("limit", 1)).unwrap_err();
        assert!(matches!(err, CheckError::MissingArgument { field, .. } if field == "item"));

        let err = UlimitCheck::from_args(&CheckArgs::new().with("item", "nofile")).unwrap_err();
        assert!(matches!(err, CheckError::MissingArgument { field, .. } if field == "limit"));
    }

    #[test]
    fn type_defaults_to_hard() {
        let check = UlimitCheck::from_args(&args("as", 1024)).unwrap();
        assert_eq!(
            check,
            UlimitCheck {
                item: "as".into(),
                required: LimitValue::Finite(1024),
                kind: LimitKind::Hard,
            }
        );
    }

    #[test]
    fn soft_type_is_kept() {
        let check = UlimitCheck::from_args(&args("as", 1024).with("type", "soft")).unwrap();
        assert_eq!(check.kind, LimitKind::Soft);
    }

    #[test]
    fn unknown_type_is_rejected() {
        let err = UlimitCheck::from_args(&args("as", 1024).with("type", "medium")).unwrap_err();
        assert!(matches!(err, CheckError::TypeMismatch { .. }));
    }

    #[test]
    fn minus_one_means_unbounded() {
        let check = UlimitCheck::from_args(&args("nofile", -1)).unwrap();
        assert_eq!(check.required, LimitValue::Unbounded);
    }

    #[cfg(all(target_os = "linux", target_pointer_width = "64"))]
    #[test]
    fn native_infinity_limit_means_unbounded() {
        let record = CheckArgs::new().with("item", "nofile").with("limit", u64::MAX);
        let check = UlimitCheck::from_args(&record).unwrap();
        assert_eq!(check.required, LimitValue::Unbounded);
    }

    #[test]
    fn large_finite_limit_is_kept() {
        let record = CheckArgs::new()
            .with("item", "nofile")
            .with("limit", i64::MAX as u64 + 1);
        let check = UlimitCheck::from_args(&record).unwrap();
        assert_eq!(check.required, LimitValue::Finite(i64::MAX as u64 + 1));
    }

    #[test]
    fn other_negative_limits_are_invalid() {
        let err = UlimitCheck::from_args(&args("nofile", -5)).unwrap_err();
        assert!(matches!(err, CheckError::InvalidArgument { .. }));
    }

    #[test]
    fn string_limit_is_a_type_mismatch() {
        let record = CheckArgs::new().with("item", "nofile").with("limit", "lots");
        let err = UlimitCheck::from_args(&record).unwrap_err();
        assert!(matches!(err, CheckError::TypeMismatch { .. }));
    }

    #[test]
    fn judge_unbounded_symmetry() {
        let unbounded = UlimitCheck::from_args(&args("nofile", -1)).unwrap();
        assert!(unbounded.judge(LimitValue::Unbounded).is_ok());
        assert!(unbounded.judge(LimitValue::Finite(1_000_000)).is_err());

        let finite = UlimitCheck::from_args(&args("nofile", 1024)).unwrap();
        assert!(finite.judge(LimitValue::Unbounded).is_ok());
    }

    #[test]
    fn judge_reports_observed_and_required() {
        let check = UlimitCheck::from_args(&args("nofile", -1).with("type", "soft")).unwrap();
        let err = check.judge(LimitValue::Finite(1024)).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("soft"));
        assert!(msg.contains("nofile"));
        assert!(msg.contains("1024"));
        assert!(msg.contains("unlimited"));
    }

    #[test]
    fn unknown_item_fails_at_evaluation() {
        let check = UlimitCheck::from_args(&args("bogus", 0)).unwrap();
        assert!(matches!(
            check.evaluate(),
            Err(CheckError::UnknownLimit { .. })
        ));
    }

    #[cfg(unix)]
    mod unix {
        use super::*;

        fn nofile() -> rlimit::Limits {
            rlimit::read("nofile").unwrap()
        }

        #[test]
        fn soft_limit_equal_to_current_passes() {
            let LimitValue::Finite(current) = nofile().soft else {
                return;
            };
            let record = args("nofile", current as i64).with("type", "soft");
            UlimitCheck::from_args(&record).unwrap().evaluate().unwrap();
        }

        #[test]
        fn soft_limit_above_current_fails() {
            let LimitValue::Finite(current) = nofile().soft else {
                return;
            };
            let record = args("nofile", current as i64 + 1).with("type", "soft");
            let err = UlimitCheck::from_args(&record).unwrap().evaluate().unwrap_err();
            assert!(matches!(err, CheckError::LimitTooLow { .. }));
        }

        #[test]
        fn hard_limit_below_maximum_passes() {
            let LimitValue::Finite(max) = nofile().hard else {
                return;
            };
            let record = args("nofile", max.saturating_sub(1) as i64);
            UlimitCheck::from_args(&record).unwrap().evaluate().unwrap();
        }

        #[test]
        fn zero_soft_limit_passes_for_every_item() {
            for name in rlimit::LIMIT_NAMES {
                let record = args(name, 0).with("type", "soft");
                UlimitCheck::from_args(&record).unwrap().evaluate().unwrap();
            }
        }
    }
}
