//! Verification
//!
//! Post-hoc checks over a mock's setups and invocation log.
//!
//! - `verify_all`: every setup answered at least one call
//! - `verify`: every setup marked verifiable answered at least one call
//! - `verify_call` / `verify_called`: a method was called a number of times
//!
//! Setups registered through `in_sequence(..).setup(..)` or `setup_sequence`
//! never take part in `verify` or `verify_all`.

use crate::matcher::ErasedMatcher;
use crate::result::{MockError, MockResult};
use crate::setup::SetupEntry;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// How many calls a verification expects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Times {
    /// Zero calls
    Never,
    /// Exactly one call
    Once,
    /// One or more calls
    AtLeastOnce,
    /// `n` or more calls
    AtLeast(usize),
    /// `n` or fewer calls
    AtMost(usize),
    /// Exactly `n` calls
    Exactly(usize),
    /// Between `lo` and `hi` calls, both included
    Between(usize, usize),
}

impl Times {
    /// Check a call count
    #[must_use]
    pub const fn check(self, count: usize) -> bool {
        match self {
            Self::Never => count == 0,
            Self::Once => count == 1,
            Self::AtLeastOnce => count >= 1,
            Self::AtLeast(n) => count >= n,
            Self::AtMost(n) => count <= n,
            Self::Exactly(n) => count == n,
            Self::Between(lo, hi) => lo <= count && count <= hi,
        }
    }
}

impl fmt::Display for Times {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Never => write!(f, "never"),
            Self::Once => write!(f, "exactly once"),
            Self::AtLeastOnce => write!(f, "at least once"),
            Self::AtLeast(n) => write!(f, "at least {n} times"),
            Self::AtMost(n) => write!(f, "at most {n} times"),
            Self::Exactly(n) => write!(f, "exactly {n} times"),
            Self::Between(lo, hi) => write!(f, "between {lo} and {hi} times"),
        }
    }
}

/// Which setups a setup verification covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum VerifyScope {
    Verifiable,
    All,
}

pub(crate) fn unmet_setups(setups: &[SetupEntry], scope: VerifyScope) -> Vec<String> {
    setups
        .iter()
        .filter(|s| !s.is_sequenced())
        .filter(|s| scope == VerifyScope::All || s.verifiable)
        .filter(|s| s.invocations == 0)
        .map(|s| {
            let marker = if s.verifiable { " (verifiable)" } else { "" };
            format!("setup {} {}{} was never invoked", s.id, s.describe(), marker)
        })
        .collect()
}

pub(crate) fn check_count(
    method: &str,
    matcher: &ErasedMatcher,
    times: Times,
    count: usize,
) -> Option<String> {
    if times.check(count) {
        return None;
    }
    Some(format!(
        "expected {method}{} to be invoked {times}, but it was invoked {count} time(s)",
        matcher.description()
    ))
}

pub(crate) fn into_result(mock: &str, failures: Vec<String>) -> MockResult<()> {
    if failures.is_empty() {
        debug!(mock, "verification passed");
        return Ok(());
    }
    debug!(mock, failures = failures.len(), "verification failed");
    Err(MockError::VerificationFailed {
        mock: mock.to_string(),
        failures,
    })
}
