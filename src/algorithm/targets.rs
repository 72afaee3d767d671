//! Target evaluation for headline indicators

use std::fmt;

use serde::{Deserialize, Serialize};

/// Share of a higher-is-better target that still counts as close
const CLOSE_BELOW_FACTOR: f64 = 0.8;

/// Multiple of a lower-is-better target that still counts as close
const CLOSE_ABOVE_FACTOR: f64 = 1.2;

/// Which side of the target is good
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetDirection {
    /// Value must reach the target
    HigherIsBetter,
    /// Value must stay at or below the target
    LowerIsBetter,
}

/// Outcome of comparing a value with its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetStatus {
    /// Target met
    Met,
    /// Within 80 % (higher-is-better) or 120 % (lower-is-better) of the target
    Close,
    /// Target missed
    Missed,
}

impl fmt::Display for TargetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Met => write!(f, "Target Met"),
            Self::Close => write!(f, "Close to Target"),
            Self::Missed => write!(f, "Target Missed"),
        }
    }
}

/// An indicator target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Target {
    /// Target value
    pub value: f64,
    /// Which side of the value is good
    pub direction: TargetDirection,
}

impl Target {
    /// Target that must be reached
    #[must_use]
    pub const fn at_least(value: f64) -> Self {
        Self {
            value,
            direction: TargetDirection::HigherIsBetter,
        }
    }

    /// Target that must not be exceeded
    #[must_use]
    pub const fn at_most(value: f64) -> Self {
        Self {
            value,
            direction: TargetDirection::LowerIsBetter,
        }
    }

    /// Compare a value with this target
    #[must_use]
    pub fn evaluate(&self, actual: f64) -> TargetStatus {
        match self.direction {
            TargetDirection::HigherIsBetter => {
                if actual >= self.value {
                    TargetStatus::Met
                } else if actual >= self.value * CLOSE_BELOW_FACTOR {
                    TargetStatus::Close
                } else {
                    TargetStatus::Missed
                }
            }
            TargetDirection::LowerIsBetter => {
                if actual <= self.value {
                    TargetStatus::Met
                } else if actual <= self.value * CLOSE_ABOVE_FACTOR {
                    TargetStatus::Close
                } else {
                    TargetStatus::Missed
                }
            }
        }
    }
}

/// A value, its target and the resulting status
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TargetEvaluation {
    /// Observed value
    pub value: f64,
    /// Target it was compared with
    pub target: Target,
    /// Result of the comparison
    pub status: TargetStatus,
}

impl TargetEvaluation {
    /// Evaluate a value against a target
    #[must_use]
    pub fn new(value: f64, target: Target) -> Self {
        Self {
            value,
            target,
            status: target.evaluate(value),
        }
    }
}
