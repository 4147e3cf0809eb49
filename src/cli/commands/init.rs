//! Init command implementation

use crate::cli::logging::log;
use crate::cli::{InitArgs, LogLevel};
use crate::estimator::{evaluate, Tables, TrainingConfig};
use crate::profile::{default_profile_path, Profile};
use std::path::{Path, PathBuf};

fn destination(args: &InitArgs) -> PathBuf {
    args.path
        .clone()
        .unwrap_or_else(|| default_profile_path(Path::new(".")))
}

pub fn run_init(args: InitArgs, log_level: LogLevel) -> Result<(), String> {
    let path = destination(&args);

    if path.exists() && !args.force {
        return Err(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        ));
    }

    let config = TrainingConfig::default();
    let tables = Tables::builtin();
    let estimate = evaluate(&config, &tables).map_err(|e| e.to_string())?;

    let profile = Profile::from_parts(&config, Some(estimate));
    profile.save(&path).map_err(|e| e.to_string())?;

    log(
        log_level,
        LogLevel::Normal,
        &format!("Default profile written to {}", path.display()),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_loadable_profile() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("default.json");
        let args = InitArgs {
            path: Some(path.clone()),
            force: false,
        };
        run_init(args, LogLevel::Quiet).unwrap();

        let profile = Profile::load(&path).unwrap();
        assert_eq!(profile.to_config().unwrap(), TrainingConfig::default());
        assert!(profile.statistics.is_some());
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("default.json");
        std::fs::write(&path, "{}").unwrap();
        let args = InitArgs {
            path: Some(path),
            force: false,
        };
        assert!(run_init(args, LogLevel::Quiet).is_err());
    }
}
