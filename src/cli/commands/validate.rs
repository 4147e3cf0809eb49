//! Validate command implementation
//!
//! Re-evaluates a profile's configuration and checks the stored statistics
//! against the recomputation. Catches profiles written by a different
//! formula version or edited by hand.

use crate::cli::logging::log;
use crate::cli::{LogLevel, ValidateArgs};
use crate::estimator::{evaluate, Estimate, Tables};
use crate::profile::Profile;

/// Relative tolerance for comparing stored against recomputed statistics.
const TOLERANCE: f64 = 1e-6;

fn relative_mismatch(stored: f64, recomputed: f64) -> bool {
    let scale = stored.abs().max(recomputed.abs()).max(f64::MIN_POSITIVE);
    (stored - recomputed).abs() / scale > TOLERANCE
}

/// Compare the stored statistics to a fresh evaluation, returning the names
/// of fields that no longer match.
pub fn find_mismatches(stored: &Estimate, recomputed: &Estimate) -> Vec<&'static str> {
    let pairs = [
        ("recommended_lr", stored.recommended_lr, recomputed.recommended_lr),
        ("base_lr", stored.base_lr, recomputed.base_lr),
        ("adjusted_lr", stored.adjusted_lr, recomputed.adjusted_lr),
        ("target_energy", stored.target_energy, recomputed.target_energy),
        (
            "delivered_energy",
            stored.delivered_energy,
            recomputed.delivered_energy,
        ),
        (
            "scheduler_factor",
            stored.scheduler_factor,
            recomputed.scheduler_factor,
        ),
        (
            "stability_score",
            stored.stability_score,
            recomputed.stability_score,
        ),
        (
            "efficiency_score",
            stored.efficiency_score,
            recomputed.efficiency_score,
        ),
    ];

    pairs
        .into_iter()
        .filter(|(_, stored, recomputed)| relative_mismatch(*stored, *recomputed))
        .map(|(name, _, _)| name)
        .collect()
}

pub fn run_validate(args: ValidateArgs, log_level: LogLevel) -> Result<(), String> {
    let profile = Profile::load(&args.profile).map_err(|e| e.to_string())?;
    let config = profile.to_config().map_err(|e| e.to_string())?;

    let tables = Tables::builtin();
    let recomputed = evaluate(&config, &tables).map_err(|e| e.to_string())?;

    log(
        log_level,
        LogLevel::Verbose,
        &format!(
            "Profile {} ({} v{})",
            args.profile.display(),
            profile.meta.app,
            profile.meta.version
        ),
    );

    match &profile.statistics {
        None => {
            log(
                log_level,
                LogLevel::Normal,
                "Profile has no stored statistics; configuration evaluates cleanly.",
            );
            Ok(())
        }
        Some(stored) => {
            let mismatches = find_mismatches(stored, &recomputed);
            if mismatches.is_empty() {
                log(
                    log_level,
                    LogLevel::Normal,
                    "Profile is consistent: stored statistics match recomputation.",
                );
                Ok(())
            } else {
                Err(format!(
                    "stored statistics diverge from recomputation: {}",
                    mismatches.join(", ")
                ))
            }
        }
    }
}
