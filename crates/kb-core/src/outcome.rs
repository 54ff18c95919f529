//! Tagged outcome of a multi-fetch resolution.

use serde::{Deserialize, Serialize};

/// Outcome of a hierarchy or license-definition resolution.
///
/// `Absent` and `BoundExhausted` both mean "no usable answer". They are
/// kept apart for logging and tests; callers that only care about the
/// answer use [`into_option`](Self::into_option).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Resolution<T> {
    /// A consistent, fully hydrated answer.
    Resolved(T),
    /// Some required entity has no payload (not found, denied, transport failure).
    Absent,
    /// An attempt or depth bound was reached before an answer was found.
    BoundExhausted,
}

impl<T> Resolution<T> {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    pub fn is_bound_exhausted(&self) -> bool {
        matches!(self, Self::BoundExhausted)
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Resolved(value) => Some(value),
            Self::Absent | Self::BoundExhausted => None,
        }
    }
}

impl<T> From<Option<T>> for Resolution<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Self::Resolved)
    }
}
