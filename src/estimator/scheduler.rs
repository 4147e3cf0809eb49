//! Learning rate schedule evaluation
//!
//! Reduces a whole training schedule to a single scalar. The canonical
//! reduction is the root-mean-square of the per-step multiplier across the
//! run, with the warmup ramp applied multiplicatively at every step — see
//! [`scheduler_rms`]. The alternate "standard mode" reduction is a
//! closed-form midpoint factor — see [`midpoint_factor`].
//!
//! Scheduler kinds are matched by display name. An unrecognized name falls
//! back to a constant 1.0 multiplier rather than an error.

use std::f64::consts::PI;

/// Floor for the cosine family of schedules
pub const COSINE_FLOOR: f64 = 0.10;

/// Decay constant for the Rex schedule
pub const REX_DECAY_K: f64 = 4.0;

/// Display names of the supported schedulers, in UI order.
pub const SCHEDULERS: &[&str] = &[
    "Constant",
    "Linear",
    "Cosine",
    "Cosine (Restarts)",
    "Cosine (Hard Restarts)",
    "Rex",
    "Adafactor",
];

/// Per-step schedule multiplier.
///
/// `step` is 1-indexed and `total_steps` must be ≥ 1. The cosine schedule is
/// allowed to go negative past its midpoint; the RMS aggregation squares it
/// away. Unrecognized kinds return 1.0.
pub fn scheduler_multiplier(kind: &str, step: u32, total_steps: u32) -> f64 {
    let total = total_steps.max(1);
    let t = f64::from(step) / f64::from(total);

    match kind {
        "Constant" => 1.0,
        "Linear" => {
            if total <= 1 {
                1.0
            } else {
                (1.0 - t).max(0.0)
            }
        }
        "Cosine" => COSINE_FLOOR + (1.0 - COSINE_FLOOR) * (PI * t).cos(),
        "Cosine (Restarts)" => {
            let cycle = (total / 2).max(1);
            let local = step % cycle;
            COSINE_FLOOR + (1.0 - COSINE_FLOOR) * (PI * f64::from(local) / f64::from(cycle)).cos()
        }
        "Cosine (Hard Restarts)" => {
            let cycle = (total / 2).max(1);
            let local = step % cycle;
            (PI * f64::from(local) / f64::from(cycle)).cos().max(0.0)
        }
        "Rex" => (-REX_DECAY_K * t).exp(),
        "Adafactor" => 1.0 / f64::from(step).sqrt(),
        _ => 1.0,
    }
}

/// Number of warmup steps for a run: `floor(total_steps * warmup_fraction)`.
pub fn warmup_steps(total_steps: u32, warmup_fraction: f64) -> u32 {
    (f64::from(total_steps) * warmup_fraction) as u32
}

/// Root-mean-square of the effective per-step multiplier over a full run.
///
/// The warmup ramp (`step / warmup_steps` while inside warmup) multiplies
/// every scheduler shape, which is why this is an O(total_steps) summation
/// rather than a closed form. Deterministic: identical inputs always produce
/// the identical scalar.
pub fn scheduler_rms(kind: &str, total_steps: u32, warmup_fraction: f64) -> f64 {
    let total = total_steps.max(1);
    let warmup = warmup_steps(total, warmup_fraction);

    let mut sum_sq = 0.0;
    for step in 1..=total {
        let base = scheduler_multiplier(kind, step, total);
        let warmup_factor = if warmup > 0 && step <= warmup {
            f64::from(step) / f64::from(warmup)
        } else {
            1.0
        };
        let s = warmup_factor * base;
        sum_sq += s * s;
    }

    (sum_sq / f64::from(total)).sqrt()
}

/// Closed-form schedule factor used by the standard-mode strategy.
///
/// Takes the multiplier at the middle step of the run, clamps it to the
/// cosine floor, and discounts it by half the warmup fraction. Cheaper than
/// [`scheduler_rms`] and deliberately not reconciled with it numerically;
/// the two target different quantities.
pub fn midpoint_factor(kind: &str, total_steps: u32, warmup_fraction: f64) -> f64 {
    let total = total_steps.max(1);
    let mid = total.div_ceil(2);
    let center = scheduler_multiplier(kind, mid, total).max(COSINE_FLOOR);
    center * (1.0 - warmup_fraction / 2.0)
}
