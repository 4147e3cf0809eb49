//! Info command implementation

use crate::cli::logging::log;
use crate::cli::{InfoArgs, LogLevel, OutputFormat};
use crate::estimator::{scheduler, Tables};

/// Format the model table as a string
pub fn format_models(tables: &Tables) -> String {
    let mut lines = vec!["Models:".to_string()];
    for (name, profile) in &tables.models {
        lines.push(format!(
            "  {name:<16} native {:>4}px  energy {:.6}  arch {}",
            profile.native_res, profile.base_energy, profile.arch
        ));
    }
    lines.join("\n")
}

/// Format the optimizer table as a string
pub fn format_optimizers(tables: &Tables) -> String {
    let mut lines = vec!["Optimizers:".to_string()];
    for (name, modifier) in &tables.optimizer_mods {
        lines.push(format!("  {name:<22} modifier {modifier:.2}"));
    }
    lines.join("\n")
}

/// Format the scheduler list as a string
pub fn format_schedulers() -> String {
    let mut lines = vec!["Schedulers:".to_string()];
    for name in scheduler::SCHEDULERS {
        lines.push(format!("  {name}"));
    }
    lines.join("\n")
}

/// Format the objective table as a string
pub fn format_objectives(tables: &Tables) -> String {
    let mut lines = vec!["Objectives:".to_string()];
    for (name, energy_mod) in &tables.objective_energy_mod {
        let sensitivity = tables
            .objective_sensitivity
            .get(name)
            .copied()
            .unwrap_or(1.0);
        lines.push(format!(
            "  {name:<12} energy mod {energy_mod:.2}  sensitivity {sensitivity:.1}"
        ));
    }
    lines.join("\n")
}

pub fn run_info(args: InfoArgs, log_level: LogLevel) -> Result<(), String> {
    let tables = Tables::builtin();

    match args.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&tables).map_err(|e| e.to_string())?;
            log(log_level, LogLevel::Normal, &json);
        }
        OutputFormat::Text => {
            log(log_level, LogLevel::Normal, &format_models(&tables));
            log(log_level, LogLevel::Normal, &format_schedulers());
            log(log_level, LogLevel::Normal, &format_objectives(&tables));
            log(log_level, LogLevel::Normal, &format_optimizers(&tables));
        }
    }

    Ok(())
}
