use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{EngramError, EngramResult};

/// Confidence score in [0.0, 1.0].
///
/// How certain the assistant is that the stored knowledge is accurate.
/// Never auto-adjusted; only creation and correction set it.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Confidence(f64);

impl Confidence {
    /// Create a new Confidence, rejecting non-finite or out-of-range input.
    pub fn new(value: f64) -> EngramResult<Self> {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(EngramError::validation(
                "confidence",
                format!("must be within [0.0, 1.0], got {value}"),
            ));
        }
        Ok(Self(value))
    }

    /// Create a Confidence clamped to [0.0, 1.0].
    pub fn clamped(value: f64) -> Self {
        Self(value.clamp(0.0, 1.0))
    }

    /// Get the raw f64 value.
    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}

impl From<Confidence> for f64 {
    fn from(c: Confidence) -> Self {
        c.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range() {
        assert!(Confidence::new(1.5).is_err());
        assert!(Confidence::new(-0.5).is_err());
        assert!(Confidence::new(f64::NAN).is_err());
    }

    #[test]
    fn accepts_in_range() {
        assert_eq!(Confidence::new(0.8).unwrap().value(), 0.8);
    }
}
