//! Estimate command implementation

use crate::cli::logging::log;
use crate::cli::{EstimateArgs, LogLevel, OutputFormat};
use crate::estimator::{evaluate, Estimate, Tables, TrainingConfig};
use crate::profile::Profile;

/// Resolve the effective configuration: explicit flags win, then the loaded
/// profile (if any), then the built-in defaults.
pub fn resolve_config(args: &EstimateArgs, seed: TrainingConfig) -> TrainingConfig {
    TrainingConfig {
        steps: args.steps.unwrap_or(seed.steps),
        batch: args.batch.unwrap_or(seed.batch),
        grad_accum: args.grad_accum.unwrap_or(seed.grad_accum),
        images: args.images.unwrap_or(seed.images),
        rank: args.rank.unwrap_or(seed.rank),
        alpha: args.alpha.unwrap_or(seed.alpha),
        resolution: args.resolution.unwrap_or(seed.resolution),
        model: args.model.clone().unwrap_or(seed.model),
        objective: args.objective.clone().unwrap_or(seed.objective),
        optimizer: args.optimizer.clone().unwrap_or(seed.optimizer),
        scheduler: args.scheduler.clone().unwrap_or(seed.scheduler),
        warmup_fraction: args.warmup.map_or(seed.warmup_fraction, |pct| pct / 100.0),
        offset: args.offset.unwrap_or(seed.offset),
        strategy: args.strategy.unwrap_or(seed.strategy),
    }
}

/// Format the headline recommendation the way the tool displays it:
/// scientific notation with the plain decimal alongside.
pub fn format_lr(estimate: &Estimate) -> String {
    format!("{:.2e} ({:.6})", estimate.adjusted_lr, estimate.adjusted_lr)
}

fn format_summary(config: &TrainingConfig, estimate: &Estimate) -> String {
    let offset_pct = config.offset * 100.0;
    [
        format!("Recommended LR: {}", format_lr(estimate)),
        format!("  Offset: {offset_pct:+.0}% (base {:.2e})", estimate.base_lr),
        format!(
            "  Stability Confidence: {:.1}% [{}]",
            estimate.stability_score, estimate.risk_band
        ),
        format!(
            "  Convergence Efficiency: {:.1}% [{}]",
            estimate.efficiency_score, estimate.efficiency_band
        ),
    ]
    .join("\n")
}

fn format_breakdown(estimate: &Estimate) -> String {
    [
        "Factors:".to_string(),
        format!("  Effective batch: {:.4}", estimate.effective_batch),
        format!("  Exposure: {:.4}", estimate.exposure),
        format!("  Capacity: {:.4}", estimate.capacity),
        format!("  Resolution scale: {:.4}", estimate.resolution_scale),
        format!("  Scheduler factor: {:.4}", estimate.scheduler_factor),
        format!("  Optimizer modifier: {:.2}", estimate.optimizer_modifier),
        format!("  Warmup steps: {}", estimate.warmup_steps),
        format!("  Target energy: {:.6e}", estimate.target_energy),
        format!("  Delivered energy: {:.6e}", estimate.delivered_energy),
        format!("  Energy ratio: {:.4}", estimate.energy_ratio),
    ]
    .join("\n")
}

pub fn run_estimate(args: EstimateArgs, log_level: LogLevel) -> Result<(), String> {
    let seed = match &args.profile {
        Some(path) => {
            let profile = Profile::load(path).map_err(|e| e.to_string())?;
            profile.to_config().map_err(|e| e.to_string())?
        }
        None => TrainingConfig::default(),
    };

    let config = resolve_config(&args, seed);
    let tables = Tables::builtin();
    let estimate = evaluate(&config, &tables).map_err(|e| e.to_string())?;

    match args.format {
        OutputFormat::Json => {
            let profile = Profile::from_parts(&config, Some(estimate.clone()));
            let json = serde_json::to_string_pretty(&profile).map_err(|e| e.to_string())?;
            log(log_level, LogLevel::Normal, &json);
        }
        OutputFormat::Text => {
            log(log_level, LogLevel::Normal, &format_summary(&config, &estimate));
            log(log_level, LogLevel::Verbose, &format_breakdown(&estimate));
        }
    }

    if let Some(path) = &args.save {
        let profile = Profile::from_parts(&config, Some(estimate));
        profile.save(path).map_err(|e| e.to_string())?;
        log(
            log_level,
            LogLevel::Normal,
            &format!("Profile saved to {}", path.display()),
        );
    }

    Ok(())
}
