use serde::{Deserialize, Serialize};

/// Thresholds under which a numeric mismatch still counts as correct.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Tolerance {
    /// Largest accepted `|answer - solution|`.
    #[serde(default, alias = "a_tol")]
    pub absolute: f64,
    /// Largest accepted `|answer - solution| / solution`.
    #[serde(default, alias = "r_tol")]
    pub relative: f64,
}

impl Tolerance {
    /// Creates a tolerance from absolute and relative thresholds.
    pub fn new(absolute: f64, relative: f64) -> Self {
        Self { absolute, relative }
    }

    /// Only an absolute threshold.
    pub fn absolute(absolute: f64) -> Self {
        Self::new(absolute, 0.0)
    }

    /// Only a relative threshold.
    pub fn relative(relative: f64) -> Self {
        Self::new(0.0, relative)
    }
}
