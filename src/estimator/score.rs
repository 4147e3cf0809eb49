//! Confidence scoring
//!
//! Maps the solved rate's deviation from the energy target onto two bounded
//! [0, 100] scores. The stability decay is asymmetric: overshooting the
//! target (too-aggressive rate) decays with a model- and objective-dependent
//! constant, while undershooting decays with one universal constant.

use super::solver::Solution;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Decay constant applied whenever delivered energy is at or below target.
/// Undershoot mainly wastes training time, so it is scored uniformly,
/// independent of model and objective.
pub const UNIVERSAL_UNDERSHOOT_K: f64 = 0.65;

/// Decay constant for the efficiency score's energy-ratio curve.
pub const EFFICIENCY_SENSITIVITY: f64 = 2.0;

/// Lower bound on the batch-noise factor.
const NOISE_FLOOR: f64 = 0.35;

/// Stability band cut-offs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskBand {
    Safe,
    Caution,
    Risky,
}

impl RiskBand {
    pub fn from_score(stability: f64) -> Self {
        if stability >= 85.0 {
            Self::Safe
        } else if stability >= 65.0 {
            Self::Caution
        } else {
            Self::Risky
        }
    }
}

impl fmt::Display for RiskBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Safe => write!(f, "Safe"),
            Self::Caution => write!(f, "Caution"),
            Self::Risky => write!(f, "Risky"),
        }
    }
}

/// Efficiency band cut-offs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EfficiencyBand {
    Optimal,
    Suboptimal,
    Inefficient,
}

impl EfficiencyBand {
    pub fn from_score(efficiency: f64) -> Self {
        if efficiency >= 90.0 {
            Self::Optimal
        } else if efficiency >= 60.0 {
            Self::Suboptimal
        } else {
            Self::Inefficient
        }
    }
}

impl fmt::Display for EfficiencyBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Optimal => write!(f, "Optimal"),
            Self::Suboptimal => write!(f, "Suboptimal"),
            Self::Inefficient => write!(f, "Inefficient"),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Scores {
    pub stability: f64,
    pub efficiency: f64,
    pub risk_band: RiskBand,
    pub efficiency_band: EfficiencyBand,
    pub curvature_factor: f64,
    pub objective_sensitivity: f64,
    pub undershoot_k: f64,
    pub overshoot_k: f64,
}

/// Score a solved configuration.
///
/// `base_energy` is the model's energy constant, `reference_energy` the mean
/// over all models, `arch_modifier` and `objective_sensitivity` come from
/// the static tables.
pub(crate) fn score(
    solution: &Solution,
    base_energy: f64,
    reference_energy: f64,
    arch_modifier: f64,
    objective_sensitivity: f64,
) -> Scores {
    let curvature = (base_energy / reference_energy).sqrt();
    let noise_factor = (1.0 / solution.effective_batch).sqrt().max(NOISE_FLOOR);
    let overshoot_k = curvature * arch_modifier * objective_sensitivity * noise_factor;

    let k = if solution.delivered_energy > solution.target_energy {
        overshoot_k
    } else {
        UNIVERSAL_UNDERSHOOT_K
    };

    let stability = 100.0 * (-k * solution.deviation * solution.deviation).exp();

    let rho = solution.energy_ratio;
    let efficiency = 100.0 * (-EFFICIENCY_SENSITIVITY * (rho - 1.0) * (rho - 1.0)).exp();

    Scores {
        stability,
        efficiency,
        risk_band: RiskBand::from_score(stability),
        efficiency_band: EfficiencyBand::from_score(efficiency),
        curvature_factor: curvature,
        objective_sensitivity,
        undershoot_k: UNIVERSAL_UNDERSHOOT_K,
        overshoot_k,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn solution(deviation_signed: f64) -> Solution {
        // Delivered energy offset from a unit target by the signed deviation
        let target = 1.0e-3;
        let delivered = target * (1.0 + deviation_signed);
        Solution {
            effective_batch: 1.7,
            exposure: 9.0,
            capacity: 1.4,
            resolution_scale: 1.0,
            scheduler_factor: 1.0,
            optimizer_modifier: 1.0,
            target_energy: target,
            base_lr: 5.0e-5,
            adjusted_lr: 5.0e-5 * (1.0 + deviation_signed),
            delivered_energy: delivered,
            energy_ratio: delivered / target,
            deviation: deviation_signed.abs(),
            warmup_fraction: 0.0,
            warmup_steps: 0,
            offset: deviation_signed,
        }
    }

    #[test]
    fn test_perfect_delivery_scores_100() {
        let s = score(&solution(0.0), 0.000712, 0.000712, 1.2, 1.4);
        assert_abs_diff_eq!(s.stability, 100.0);
        assert_abs_diff_eq!(s.efficiency, 100.0);
        assert_eq!(s.risk_band, RiskBand::Safe);
        assert_eq!(s.efficiency_band, EfficiencyBand::Optimal);
    }

    #[test]
    fn test_scores_bounded() {
        for dev in [-0.9, -0.5, -0.1, 0.1, 0.5, 0.9] {
            let s = score(&solution(dev), 0.000712, 0.000657, 2.2, 2.5);
            assert!((0.0..=100.0).contains(&s.stability), "stability {}", s.stability);
            assert!((0.0..=100.0).contains(&s.efficiency), "efficiency {}", s.efficiency);
        }
    }

    #[test]
    fn test_overshoot_scored_harsher_than_undershoot() {
        // Same deviation magnitude, Fidelity-grade sensitivity: overshoot
        // decays faster than the universal undershoot constant.
        let over = score(&solution(0.4), 0.000712, 0.000657, 1.2, 2.5);
        let under = score(&solution(-0.4), 0.000712, 0.000657, 1.2, 2.5);
        assert!(over.overshoot_k > UNIVERSAL_UNDERSHOOT_K);
        assert!(over.stability < under.stability);
    }

    #[test]
    fn test_tolerant_objective_can_undercut_undershoot_k() {
        // Style sensitivity (0.6) with a mild architecture can make
        // overshoot gentler than the fixed undershoot constant; the
        // asymmetry is per-objective, not a hard ordering.
        let s = score(&solution(0.4), 0.000630, 0.000657, 1.0, 0.6);
        assert!(s.overshoot_k < UNIVERSAL_UNDERSHOOT_K);
    }

    #[test]
    fn test_noise_floor_applies_to_large_batches() {
        let mut sol = solution(0.2);
        sol.effective_batch = 64.0; // sqrt(1/64) = 0.125 < floor
        let s = score(&sol, 0.000712, 0.000657, 1.2, 1.4);
        let curvature = (0.000712_f64 / 0.000657).sqrt();
        assert_abs_diff_eq!(s.overshoot_k, curvature * 1.2 * 1.4 * NOISE_FLOOR, epsilon = 1e-12);
    }

    #[test]
    fn test_band_cutoffs() {
        assert_eq!(RiskBand::from_score(85.0), RiskBand::Safe);
        assert_eq!(RiskBand::from_score(84.9), RiskBand::Caution);
        assert_eq!(RiskBand::from_score(65.0), RiskBand::Caution);
        assert_eq!(RiskBand::from_score(64.9), RiskBand::Risky);
        assert_eq!(EfficiencyBand::from_score(90.0), EfficiencyBand::Optimal);
        assert_eq!(EfficiencyBand::from_score(60.0), EfficiencyBand::Suboptimal);
        assert_eq!(EfficiencyBand::from_score(59.9), EfficiencyBand::Inefficient);
    }
}
