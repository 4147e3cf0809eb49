//! The learning-rate estimator core
//!
//! Pure and stateless: [`evaluate`] maps a [`TrainingConfig`] plus the
//! static [`Tables`] to a fresh [`Estimate`]. The caller owns last-known-good
//! storage and decides when to recompute; the core has no result cache and
//! no observers.

mod config;
mod error;
pub mod scheduler;
mod score;
mod solver;
mod tables;

pub use config::{Strategy, TrainingConfig};
pub use error::EstimateError;
pub use score::{EfficiencyBand, RiskBand, EFFICIENCY_SENSITIVITY, UNIVERSAL_UNDERSHOOT_K};
pub use solver::ACCUM_EFFICIENCY;
pub use tables::{ModelProfile, Tables};

use serde::{Deserialize, Serialize};

/// Everything one evaluation produces. Constructed fresh on every call,
/// never mutated afterwards.
///
/// `base_lr` is the recommendation in one canonical unit, a raw learning-rate
/// scalar; percent or scientific formatting is a display concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    /// Recommended learning rate before the user offset. Duplicates
    /// `base_lr` so the statistics section stays field-compatible with
    /// profiles that carry both names.
    pub recommended_lr: f64,
    /// Recommended learning rate with the user offset applied
    pub adjusted_lr: f64,
    /// Same value as `recommended_lr`
    pub base_lr: f64,

    /// Per-model, per-objective energy target
    pub target_energy: f64,
    /// Energy the adjusted rate would deliver through the same factor chain
    pub delivered_energy: f64,
    /// delivered / target
    pub energy_ratio: f64,
    /// |delivered - target| / target
    pub deviation: f64,

    pub effective_batch: f64,
    pub exposure: f64,
    pub capacity: f64,
    pub resolution_scale: f64,

    pub scheduler_factor: f64,
    pub optimizer_modifier: f64,
    pub warmup_fraction: f64,
    pub warmup_steps: u32,

    pub curvature_factor: f64,
    pub objective_sensitivity: f64,
    pub undershoot_k: f64,
    pub overshoot_k: f64,

    pub stability_score: f64,
    pub efficiency_score: f64,
    pub risk_band: RiskBand,
    pub efficiency_band: EfficiencyBand,
}

/// Evaluate one training configuration against the static tables.
///
/// Synchronous and deterministic; cost is dominated by the O(steps)
/// scheduler summation under [`Strategy::Rms`]. Errors are local to the
/// call: the caller keeps whatever estimate it had before.
pub fn evaluate(config: &TrainingConfig, tables: &Tables) -> Result<Estimate, EstimateError> {
    let sane = config.sanitize()?;
    let solution = solver::solve(config, &sane, tables)?;

    let model = tables.model(&config.model)?;
    let arch_modifier = tables.arch_modifier(&model.arch)?;
    let objective_sensitivity = tables.objective_sensitivity(&config.objective)?;

    let scores = score::score(
        &solution,
        model.base_energy,
        tables.reference_energy(),
        arch_modifier,
        objective_sensitivity,
    );

    Ok(Estimate {
        recommended_lr: solution.base_lr,
        adjusted_lr: solution.adjusted_lr,
        base_lr: solution.base_lr,
        target_energy: solution.target_energy,
        delivered_energy: solution.delivered_energy,
        energy_ratio: solution.energy_ratio,
        deviation: solution.deviation,
        effective_batch: solution.effective_batch,
        exposure: solution.exposure,
        capacity: solution.capacity,
        resolution_scale: solution.resolution_scale,
        scheduler_factor: solution.scheduler_factor,
        optimizer_modifier: solution.optimizer_modifier,
        warmup_fraction: solution.warmup_fraction,
        warmup_steps: solution.warmup_steps,
        curvature_factor: scores.curvature_factor,
        objective_sensitivity: scores.objective_sensitivity,
        undershoot_k: scores.undershoot_k,
        overshoot_k: scores.overshoot_k,
        stability_score: scores.stability,
        efficiency_score: scores.efficiency,
        risk_band: scores.risk_band,
        efficiency_band: scores.efficiency_band,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn reference_config() -> TrainingConfig {
        TrainingConfig {
            scheduler: "Constant".to_string(),
            warmup_fraction: 0.0,
            ..TrainingConfig::default()
        }
    }

    #[test]
    fn test_reference_scenario_end_to_end() {
        let tables = Tables::builtin();
        let est = evaluate(&reference_config(), &tables).unwrap();

        let expected_lr = 0.000712 / (85.0_f64.sqrt() * 2.0_f64.sqrt());
        assert_relative_eq!(est.base_lr, expected_lr, max_relative = 1e-12);
        assert_abs_diff_eq!(est.stability_score, 100.0, epsilon = 1e-6);
        assert_abs_diff_eq!(est.efficiency_score, 100.0, epsilon = 1e-6);
        assert_eq!(est.risk_band, RiskBand::Safe);
        assert_eq!(est.efficiency_band, EfficiencyBand::Optimal);
    }

    #[test]
    fn test_unknown_model_errors_cleanly() {
        let tables = Tables::builtin();
        let config = TrainingConfig {
            model: "Unknown-Model".to_string(),
            ..TrainingConfig::default()
        };
        let err = evaluate(&config, &tables).unwrap_err();
        assert_eq!(
            err,
            EstimateError::UnknownKey {
                category: "model",
                key: "Unknown-Model".to_string()
            }
        );
    }

    #[test]
    fn test_offset_round_trip_is_idempotent() {
        // Evaluating at offset 0, then feeding the adjusted rate back through
        // the same factor chain, reproduces the delivered energy.
        let tables = Tables::builtin();
        let first = evaluate(&reference_config(), &tables).unwrap();
        let replayed = first.adjusted_lr
            * first.scheduler_factor
            * first.exposure
            * first.capacity
            * first.resolution_scale
            * first.optimizer_modifier;
        assert_relative_eq!(replayed, first.delivered_energy, max_relative = 1e-9);
    }

    #[test]
    fn test_positive_offset_drops_both_scores() {
        let tables = Tables::builtin();
        let centered = evaluate(&reference_config(), &tables).unwrap();
        let config = TrainingConfig {
            offset: 0.5,
            ..reference_config()
        };
        let pushed = evaluate(&config, &tables).unwrap();
        assert!(pushed.stability_score < centered.stability_score);
        assert!(pushed.efficiency_score < centered.efficiency_score);
        assert_relative_eq!(pushed.energy_ratio, 1.5, max_relative = 1e-9);
    }

    #[test]
    fn test_determinism() {
        let tables = Tables::builtin();
        let config = TrainingConfig {
            scheduler: "Cosine (Restarts)".to_string(),
            warmup_fraction: 0.15,
            offset: -0.2,
            ..TrainingConfig::default()
        };
        let a = evaluate(&config, &tables).unwrap();
        let b = evaluate(&config, &tables).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_every_builtin_model_evaluates() {
        let tables = Tables::builtin();
        for model in tables.models.keys() {
            let config = TrainingConfig {
                model: model.clone(),
                ..TrainingConfig::default()
            };
            let est = evaluate(&config, &tables).unwrap();
            assert!(est.base_lr.is_finite() && est.base_lr > 0.0, "{model}");
        }
    }

    #[test]
    fn test_recommended_lr_duplicates_base_lr() {
        // The statistics section carries the recommendation under both
        // names; they must stay byte-for-byte in sync.
        let tables = Tables::builtin();
        let est = evaluate(&TrainingConfig::default(), &tables).unwrap();
        assert_eq!(est.recommended_lr.to_bits(), est.base_lr.to_bits());

        let json = serde_json::to_value(&est).unwrap();
        assert!(json.get("recommended_lr").is_some());
        assert!(json.get("base_lr").is_some());
        assert_eq!(json["recommended_lr"], json["base_lr"]);
    }

    #[test]
    fn test_estimate_serializes() {
        let tables = Tables::builtin();
        let est = evaluate(&TrainingConfig::default(), &tables).unwrap();
        let json = serde_json::to_string(&est).unwrap();
        let back: Estimate = serde_json::from_str(&json).unwrap();
        assert_eq!(est, back);
    }
}
