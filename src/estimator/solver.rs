//! Energy/learning-rate solver
//!
//! Solves for the learning rate whose "energy" — a proxy for cumulative
//! parameter-update magnitude over the run — matches the per-model,
//! per-objective target, then applies the user offset.

use super::config::{Sanitized, Strategy, TrainingConfig};
use super::error::EstimateError;
use super::scheduler;
use super::tables::Tables;

/// Partial-efficiency constant for gradient accumulation: accumulated
/// micro-batches count for less than true batch growth.
pub const ACCUM_EFFICIENCY: f64 = 0.7;

/// Everything the solve produces, before confidence scoring.
#[derive(Debug, Clone)]
pub(crate) struct Solution {
    pub effective_batch: f64,
    pub exposure: f64,
    pub capacity: f64,
    pub resolution_scale: f64,
    pub scheduler_factor: f64,
    pub optimizer_modifier: f64,
    pub target_energy: f64,
    pub base_lr: f64,
    pub adjusted_lr: f64,
    pub delivered_energy: f64,
    pub energy_ratio: f64,
    pub deviation: f64,
    pub warmup_fraction: f64,
    pub warmup_steps: u32,
    pub offset: f64,
}

pub(crate) fn solve(
    config: &TrainingConfig,
    sane: &Sanitized,
    tables: &Tables,
) -> Result<Solution, EstimateError> {
    let model = tables.model(&config.model)?;
    let exponent = tables.arch_resolution_exponent(&model.arch)?;
    let optimizer_modifier = tables.optimizer_mod(&config.optimizer)?;
    let objective_mod = tables.objective_energy_mod(&config.objective)?;

    let effective_batch = sane.batch + ACCUM_EFFICIENCY * (sane.grad_accum - 1.0);
    let exposure = (f64::from(sane.steps) * effective_batch / sane.images).sqrt();
    let capacity = (sane.rank / sane.alpha).sqrt();
    let resolution_scale = (sane.resolution / model.native_res).powf(exponent);

    let scheduler_factor = match config.strategy {
        Strategy::Rms => {
            scheduler::scheduler_rms(&config.scheduler, sane.steps, sane.warmup_fraction)
        }
        Strategy::Midpoint => {
            scheduler::midpoint_factor(&config.scheduler, sane.steps, sane.warmup_fraction)
        }
    };

    let target_energy = model.base_energy * objective_mod;

    let base_lr = target_energy
        / (scheduler_factor * exposure * capacity * resolution_scale * optimizer_modifier);
    let adjusted_lr = base_lr * (1.0 + sane.offset);

    // Recomputed explicitly rather than simplified to adjusted = target *
    // (1 + offset); the deviation below must be self-consistent with the
    // same factor chain that produced the rate.
    let delivered_energy =
        adjusted_lr * scheduler_factor * exposure * capacity * resolution_scale * optimizer_modifier;

    let energy_ratio = delivered_energy / target_energy;
    let deviation = (delivered_energy - target_energy).abs() / target_energy;

    Ok(Solution {
        effective_batch,
        exposure,
        capacity,
        resolution_scale,
        scheduler_factor,
        optimizer_modifier,
        target_energy,
        base_lr,
        adjusted_lr,
        delivered_energy,
        energy_ratio,
        deviation,
        warmup_fraction: sane.warmup_fraction,
        warmup_steps: scheduler::warmup_steps(sane.steps, sane.warmup_fraction),
        offset: sane.offset,
    })
}
