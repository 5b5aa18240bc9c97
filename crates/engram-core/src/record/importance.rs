use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{EngramError, EngramResult};

/// Importance score in [0.0, 1.0].
///
/// Set explicitly at creation or correction; only consolidation decay
/// may lower it afterwards. Out-of-range input is rejected at the
/// boundary, never silently clamped. `clamped` is for decay arithmetic
/// only.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Importance(f64);

impl Importance {
    /// Create a new Importance, rejecting non-finite or out-of-range input.
    pub fn new(value: f64) -> EngramResult<Self> {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(EngramError::validation(
                "importance",
                format!("must be within [0.0, 1.0], got {value}"),
            ));
        }
        Ok(Self(value))
    }

    /// Create an Importance clamped to [0.0, 1.0]. Internal use by decay.
    pub fn clamped(value: f64) -> Self {
        Self(value.clamp(0.0, 1.0))
    }

    /// Get the raw f64 value.
    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}

impl From<Importance> for f64 {
    fn from(i: Importance) -> Self {
        i.0
    }
}
