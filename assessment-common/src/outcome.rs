//! Best-effort computation results
//!
//! Scoring and stored-record decoding never fail the request; when they fall
//! back to defaults the value is tagged `Degraded` with the reason so callers
//! can log it and tests can assert on it.

/// A value that was either computed normally or produced by a fallback
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// Computed from well-formed input
    Computed(T),
    /// Fallback value used because the input was malformed or incomplete
    Degraded { value: T, reason: String },
}

impl<T> Outcome<T> {
    pub fn degraded(value: T, reason: impl Into<String>) -> Self {
        Outcome::Degraded {
            value,
            reason: reason.into(),
        }
    }

    pub fn value(&self) -> &T {
        match self {
            Outcome::Computed(value) => value,
            Outcome::Degraded { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Outcome::Computed(value) => value,
            Outcome::Degraded { value, .. } => value,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Outcome::Degraded { .. })
    }

    /// Reason for the fallback, if any
    pub fn reason(&self) -> Option<&str> {
        match self {
            Outcome::Computed(_) => None,
            Outcome::Degraded { reason, .. } => Some(reason),
        }
    }

    /// Split into the value and the optional fallback reason
    pub fn into_parts(self) -> (T, Option<String>) {
        match self {
            Outcome::Computed(value) => (value, None),
            Outcome::Degraded { value, reason } => (value, Some(reason)),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Computed(value) => Outcome::Computed(f(value)),
            Outcome::Degraded { value, reason } => Outcome::Degraded {
                value: f(value),
                reason,
            },
        }
    }
}
