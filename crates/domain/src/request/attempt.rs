//! Retry bookkeeping for a single logical request.

use std::fmt;

/// Which send of a logical request is in flight.
///
/// An attempt only ever moves forward. Once a request has been re-issued
/// after a token refresh it stays `Retried`, so a second authentication
/// failure cannot start another refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Attempt {
    /// The original send.
    #[default]
    First,
    /// The single re-send after a token refresh.
    Retried,
}

impl Attempt {
    /// Advances the marker. `Retried` is terminal.
    #[must_use]
    pub const fn next(self) -> Self {
        Self::Retried
    }

    /// Whether an authentication failure on this attempt may trigger a refresh.
    #[must_use]
    pub const fn may_refresh(self) -> bool {
        matches!(self, Self::First)
    }
}

impl fmt::Display for Attempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => f.write_str("first"),
            Self::Retried => f.write_str("retried"),
        }
    }
}
