//! JSON profile persistence
//!
//! A profile stores one complete parameter set plus the statistics it
//! produced: a `meta` stamp, a `configuration` section with one field per
//! training parameter (held as display strings, warmup as a percent label),
//! and a `statistics` snapshot of the last estimate. The estimator core
//! neither reads nor writes this format; it only supplies the
//! [`TrainingConfig`] and [`Estimate`] this module serializes.

use crate::estimator::{Estimate, EstimateError, Strategy, TrainingConfig};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// File name of the default profile, looked up next to a chosen directory.
pub const DEFAULT_PROFILE_NAME: &str = "lrtool.default.json";

/// Profile save/load errors.
#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Profile configuration error: {0}")]
    Config(#[from] EstimateError),
}

/// Metadata stamp on every saved profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    pub app: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<String>,
}

impl Meta {
    fn stamp() -> Self {
        Self {
            app: "lrtool".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            saved_at: Some(Utc::now().to_rfc3339()),
        }
    }
}

/// The `configuration` section: one display-string field per parameter.
/// Missing fields fall back to the corresponding default on load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grad_accum: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objective: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimizer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduler: Option<String>,
    /// Warmup as a percent label, e.g. "10%"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warmup: Option<String>,
    #[serde(default)]
    pub slider_offset: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
}

/// A full persisted profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub meta: Meta,
    pub configuration: ProfileConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistics: Option<Estimate>,
}

impl Profile {
    /// Build a profile from a configuration and the estimate it produced.
    pub fn from_parts(config: &TrainingConfig, estimate: Option<Estimate>) -> Self {
        let warmup_percent = (config.warmup_fraction * 100.0).round() as i64;
        Self {
            meta: Meta::stamp(),
            configuration: ProfileConfig {
                steps: Some(config.steps.to_string()),
                batch: Some(config.batch.to_string()),
                grad_accum: Some(config.grad_accum.to_string()),
                images: Some(config.images.to_string()),
                rank: Some(config.rank.to_string()),
                alpha: Some(config.alpha.to_string()),
                resolution: Some(config.resolution.to_string()),
                model: Some(config.model.clone()),
                objective: Some(config.objective.clone()),
                optimizer: Some(config.optimizer.clone()),
                scheduler: Some(config.scheduler.clone()),
                warmup: Some(format!("{warmup_percent}%")),
                slider_offset: config.offset,
                strategy: Some(config.strategy.to_string()),
            },
            statistics: estimate,
        }
    }

    /// Reconstruct the training configuration. Missing fields fall back to
    /// defaults; present but unparsable fields are an error.
    pub fn to_config(&self) -> Result<TrainingConfig, EstimateError> {
        let defaults = TrainingConfig::default();
        let c = &self.configuration;

        let warmup_fraction = match &c.warmup {
            Some(label) => parse_warmup(label)?,
            None => defaults.warmup_fraction,
        };

        Ok(TrainingConfig {
            steps: parse_field("steps", &c.steps, defaults.steps)?,
            batch: parse_field("batch", &c.batch, defaults.batch)?,
            grad_accum: parse_field("grad_accum", &c.grad_accum, defaults.grad_accum)?,
            images: parse_field("images", &c.images, defaults.images)?,
            rank: parse_field("rank", &c.rank, defaults.rank)?,
            alpha: parse_field("alpha", &c.alpha, defaults.alpha)?,
            resolution: parse_field("resolution", &c.resolution, defaults.resolution)?,
            model: c.model.clone().unwrap_or(defaults.model),
            objective: c.objective.clone().unwrap_or(defaults.objective),
            optimizer: c.optimizer.clone().unwrap_or(defaults.optimizer),
            scheduler: c.scheduler.clone().unwrap_or(defaults.scheduler),
            warmup_fraction,
            offset: self.configuration.slider_offset,
            strategy: match &c.strategy {
                Some(s) => s.parse().map_err(|reason| EstimateError::InvalidInput {
                    field: "strategy",
                    reason,
                })?,
                None => defaults.strategy,
            },
        })
    }

    /// Write the profile as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), ProfileError> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Read a profile from disk.
    pub fn load(path: &Path) -> Result<Self, ProfileError> {
        let file = File::open(path)?;
        let profile = serde_json::from_reader(BufReader::new(file))?;
        Ok(profile)
    }
}

/// Default-profile path inside a directory.
pub fn default_profile_path(dir: &Path) -> PathBuf {
    dir.join(DEFAULT_PROFILE_NAME)
}

fn parse_field<T>(field: &'static str, value: &Option<String>, default: T) -> Result<T, EstimateError>
where
    T: FromStr,
    T::Err: Display,
{
    match value {
        Some(s) => s.trim().parse().map_err(|e| EstimateError::InvalidInput {
            field,
            reason: format!("{e}"),
        }),
        None => Ok(default),
    }
}

/// Parse a warmup label like "10%" (or a bare "10") into a fraction.
fn parse_warmup(label: &str) -> Result<f64, EstimateError> {
    let trimmed = label.trim().trim_end_matches('%').trim();
    let percent: f64 = trimmed.parse().map_err(|_| EstimateError::InvalidInput {
        field: "warmup",
        reason: format!("{label:?} is not a percent value"),
    })?;
    Ok(percent / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimator::{evaluate, Tables};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_config_round_trip() {
        let config = TrainingConfig {
            steps: 1500,
            offset: -0.25,
            warmup_fraction: 0.05,
            model: "FLUX.1".to_string(),
            ..TrainingConfig::default()
        };
        let profile = Profile::from_parts(&config, None);
        let back = profile.to_config().unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_warmup_label_formats() {
        assert_abs_diff_eq!(parse_warmup("10%").unwrap(), 0.10);
        assert_abs_diff_eq!(parse_warmup(" 25% ").unwrap(), 0.25);
        assert_abs_diff_eq!(parse_warmup("0").unwrap(), 0.0);
        assert!(parse_warmup("lots").is_err());
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let profile: Profile = serde_json::from_str(
            r#"{
                "meta": {"app": "lrtool", "version": "1.0.0"},
                "configuration": {"steps": "3000", "model": "SD1.5"}
            }"#,
        )
        .unwrap();
        let config = profile.to_config().unwrap();
        assert_eq!(config.steps, 3000);
        assert_eq!(config.model, "SD1.5");
        // Everything else defaulted
        assert_eq!(config.batch, 1);
        assert_eq!(config.scheduler, "Cosine");
        assert_abs_diff_eq!(config.warmup_fraction, 0.10);
    }

    #[test]
    fn test_unparsable_field_is_an_error() {
        let profile: Profile = serde_json::from_str(
            r#"{
                "meta": {"app": "lrtool", "version": "1.0.0"},
                "configuration": {"steps": "a lot"}
            }"#,
        )
        .unwrap();
        match profile.to_config() {
            Err(EstimateError::InvalidInput { field, .. }) => assert_eq!(field, "steps"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");

        let tables = Tables::builtin();
        let config = TrainingConfig::default();
        let estimate = evaluate(&config, &tables).unwrap();
        let profile = Profile::from_parts(&config, Some(estimate.clone()));

        profile.save(&path).unwrap();
        let loaded = Profile::load(&path).unwrap();

        assert_eq!(loaded.configuration, profile.configuration);
        assert_eq!(loaded.statistics.as_ref(), Some(&estimate));
        assert_eq!(loaded.meta.app, "lrtool");
    }

    #[test]
    fn test_default_profile_path() {
        let p = default_profile_path(Path::new("/tmp"));
        assert_eq!(p, Path::new("/tmp").join(DEFAULT_PROFILE_NAME));
    }
}
