//! Training configuration input record

use super::error::EstimateError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which formula profile to solve with.
///
/// The tool's formulas evolved in two directions that are not numerically
/// reconcilable, so both are kept as named strategies sharing the same
/// output shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Full model: scheduler strength is the RMS of the per-step schedule
    /// across the whole run (O(steps) summation).
    #[default]
    Rms,
    /// Standard mode: scheduler strength is a closed-form factor taken at
    /// the schedule's center step.
    Midpoint,
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rms" | "advanced" => Ok(Self::Rms),
            "midpoint" | "standard" => Ok(Self::Midpoint),
            other => Err(format!("unknown strategy: {other}. Use: rms, midpoint")),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rms => write!(f, "rms"),
            Self::Midpoint => write!(f, "midpoint"),
        }
    }
}

/// One complete set of training parameters.
///
/// Categorical fields are display-name keys into [`Tables`](super::Tables);
/// an unknown key surfaces as `UnknownKey` at evaluation time. Numeric
/// fields below their domain are clamped, not rejected (steps, batch,
/// grad_accum, images, rank, resolution to ≥ 1; alpha to ≥ 1e-6; offset to
/// [-1, 1]; warmup_fraction to [0, 1]). Non-finite values are rejected as
/// `InvalidInput`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub steps: u32,
    pub batch: u32,
    pub grad_accum: u32,
    pub images: u32,
    pub rank: u32,
    pub alpha: f64,
    pub resolution: u32,
    pub model: String,
    pub objective: String,
    pub optimizer: String,
    pub scheduler: String,
    /// Warmup ramp length as a fraction of total steps, 0.0–1.0
    pub warmup_fraction: f64,
    /// User dial on the recommended rate, -1.0 (-100%) to 1.0 (+100%)
    #[serde(default)]
    pub offset: f64,
    #[serde(default)]
    pub strategy: Strategy,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            steps: 2000,
            batch: 1,
            grad_accum: 2,
            images: 40,
            rank: 32,
            alpha: 16.0,
            resolution: 1024,
            model: "SDXL".to_string(),
            objective: "Character".to_string(),
            optimizer: "AdamW".to_string(),
            scheduler: "Cosine".to_string(),
            warmup_fraction: 0.10,
            offset: 0.0,
            strategy: Strategy::Rms,
        }
    }
}

impl TrainingConfig {
    /// Reject non-finite floats, then apply the clamping contract.
    ///
    /// Returns the sanitized numeric view used by the solver. Clamping is
    /// part of the input contract: out-of-domain values are pulled into
    /// range rather than rejected.
    pub(crate) fn sanitize(&self) -> Result<Sanitized, EstimateError> {
        for (field, value) in [
            ("alpha", self.alpha),
            ("warmup_fraction", self.warmup_fraction),
            ("offset", self.offset),
        ] {
            if !value.is_finite() {
                return Err(EstimateError::InvalidInput {
                    field,
                    reason: format!("{value} is not a finite number"),
                });
            }
        }

        Ok(Sanitized {
            steps: self.steps.max(1),
            batch: f64::from(self.batch.max(1)),
            grad_accum: f64::from(self.grad_accum.max(1)),
            images: f64::from(self.images.max(1)),
            rank: f64::from(self.rank.max(1)),
            alpha: self.alpha.max(1e-6),
            resolution: f64::from(self.resolution.max(1)),
            warmup_fraction: self.warmup_fraction.clamp(0.0, 1.0),
            offset: self.offset.clamp(-1.0, 1.0),
        })
    }
}

/// Numeric fields after the clamping contract has been applied.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Sanitized {
    pub steps: u32,
    pub batch: f64,
    pub grad_accum: f64,
    pub images: f64,
    pub rank: f64,
    pub alpha: f64,
    pub resolution: f64,
    pub warmup_fraction: f64,
    pub offset: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_defaults_match_ui_defaults() {
        let cfg = TrainingConfig::default();
        assert_eq!(cfg.steps, 2000);
        assert_eq!(cfg.model, "SDXL");
        assert_eq!(cfg.scheduler, "Cosine");
        assert_abs_diff_eq!(cfg.warmup_fraction, 0.10);
    }

    #[test]
    fn test_sanitize_clamps_zeros() {
        let cfg = TrainingConfig {
            steps: 0,
            batch: 0,
            grad_accum: 0,
            images: 0,
            rank: 0,
            alpha: 0.0,
            resolution: 0,
            offset: 5.0,
            warmup_fraction: 3.0,
            ..TrainingConfig::default()
        };
        let s = cfg.sanitize().unwrap();
        assert_eq!(s.steps, 1);
        assert_abs_diff_eq!(s.batch, 1.0);
        assert_abs_diff_eq!(s.alpha, 1e-6, epsilon = 1e-15);
        assert_abs_diff_eq!(s.offset, 1.0);
        assert_abs_diff_eq!(s.warmup_fraction, 1.0);
    }

    #[test]
    fn test_sanitize_rejects_nan_alpha() {
        let cfg = TrainingConfig {
            alpha: f64::NAN,
            ..TrainingConfig::default()
        };
        match cfg.sanitize() {
            Err(EstimateError::InvalidInput { field, .. }) => assert_eq!(field, "alpha"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("rms".parse::<Strategy>().unwrap(), Strategy::Rms);
        assert_eq!("STANDARD".parse::<Strategy>().unwrap(), Strategy::Midpoint);
        assert!("fancy".parse::<Strategy>().is_err());
    }
}
