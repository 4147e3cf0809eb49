//! Static lookup tables for the learning-rate heuristics
//!
//! Every categorical input (model, optimizer, objective, architecture tag)
//! resolves through these tables to a numeric modifier. The built-in data is
//! the tool's fixed domain knowledge; callers may deserialize a replacement
//! set, but lookups are read-only either way.

use super::error::EstimateError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Static profile for a supported base model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelProfile {
    /// Reference pixel size the model was trained at
    pub native_res: f64,
    /// Reference target-energy constant
    pub base_energy: f64,
    /// Architecture tag, keys into the arch modifier/exponent tables
    pub arch: String,
}

/// The full static table set consumed by [`evaluate`](super::evaluate).
///
/// Invariant: every architecture tag referenced by a model profile exists in
/// both `arch_modifiers` and `arch_resolution_exponent`. The built-in set
/// satisfies this; lookups report `UnknownKey` if a custom set does not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tables {
    pub models: BTreeMap<String, ModelProfile>,
    pub arch_modifiers: BTreeMap<String, f64>,
    pub arch_resolution_exponent: BTreeMap<String, f64>,
    pub optimizer_mods: BTreeMap<String, f64>,
    pub objective_energy_mod: BTreeMap<String, f64>,
    pub objective_sensitivity: BTreeMap<String, f64>,
}

impl Tables {
    /// The built-in table set.
    pub fn builtin() -> Self {
        let models = [
            ("SD1.5", 512.0, 0.000630, "classic_ldm"),
            ("SD2.1", 768.0, 0.000665, "classic_ldm"),
            ("SDXL", 1024.0, 0.000712, "sdxl_backbone"),
            ("Pony (SDXL)", 1024.0, 0.000690, "sdxl_backbone"),
            ("SDXL Turbo", 1024.0, 0.000660, "distilled_sdxl"),
            ("SDXL Lightning", 1024.0, 0.000650, "lightning_sdxl"),
            ("FLUX.1", 1024.0, 0.000657, "flux"),
            ("FLUX.2 Dev", 1024.0, 0.000657, "flux"),
            ("Z-Image", 1024.0, 0.000602, "highly_compressed"),
        ]
        .into_iter()
        .map(|(name, native_res, base_energy, arch)| {
            (
                name.to_string(),
                ModelProfile {
                    native_res,
                    base_energy,
                    arch: arch.to_string(),
                },
            )
        })
        .collect();

        let arch_modifiers = [
            ("classic_ldm", 1.0),
            ("sdxl_backbone", 1.2),
            ("flux", 1.25),
            ("distilled_sdxl", 1.45),
            ("lightning_sdxl", 1.55),
            ("highly_compressed", 2.2),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        let arch_resolution_exponent = [
            ("classic_ldm", 0.95),
            ("sdxl_backbone", 0.925),
            ("flux", 0.91),
            ("distilled_sdxl", 0.90),
            ("lightning_sdxl", 0.875),
            ("highly_compressed", 0.85),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        let optimizer_mods = [
            ("AdamW", 1.00),
            ("AdamW (8-Bit)", 1.02),
            ("Adam", 1.02),
            ("Adam (8-Bit)", 1.04),
            ("Adagrad", 1.08),
            ("Adagrad (8-Bit)", 1.10),
            ("RMSprop", 1.05),
            ("RMSprop (8-Bit)", 1.07),
            ("Adafactor", 0.90),
            ("AdEMAMix", 0.97),
            ("AdEMAMix (8-Bit)", 1.00),
            ("Simplified AdEMAMix", 0.98),
            ("SGD", 0.85),
            ("SGD (8-Bit)", 0.88),
            ("Lars", 0.88),
            ("Lars (8-Bit)", 0.90),
            ("Lam", 0.90),
            ("Lam (8-Bit)", 0.92),
            ("Lion", 0.90),
            ("Lion (8-Bit)", 0.93),
            ("Muon", 0.80),
            ("AdaMuon", 0.85),
            ("CAME", 0.95),
            ("CAME (8-Bit)", 0.98),
            ("Adopt", 0.92),
            ("Tiger", 0.88),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        let objective_energy_mod = [
            ("Style", 0.93),
            ("Concept", 0.97),
            ("Character", 1.00),
            ("Fidelity", 1.05),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        let objective_sensitivity = [
            ("Style", 0.6),
            ("Concept", 1.0),
            ("Character", 1.4),
            ("Fidelity", 2.5),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        Self {
            models,
            arch_modifiers,
            arch_resolution_exponent,
            optimizer_mods,
            objective_energy_mod,
            objective_sensitivity,
        }
    }

    /// Mean base energy across all models. Used as the reference point for
    /// the stability curvature factor.
    pub fn reference_energy(&self) -> f64 {
        if self.models.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.models.values().map(|m| m.base_energy).sum();
        sum / self.models.len() as f64
    }

    pub fn model(&self, name: &str) -> Result<&ModelProfile, EstimateError> {
        self.models.get(name).ok_or_else(|| EstimateError::UnknownKey {
            category: "model",
            key: name.to_string(),
        })
    }

    pub fn arch_modifier(&self, arch: &str) -> Result<f64, EstimateError> {
        self.arch_modifiers
            .get(arch)
            .copied()
            .ok_or_else(|| EstimateError::UnknownKey {
                category: "architecture",
                key: arch.to_string(),
            })
    }

    pub fn arch_resolution_exponent(&self, arch: &str) -> Result<f64, EstimateError> {
        self.arch_resolution_exponent
            .get(arch)
            .copied()
            .ok_or_else(|| EstimateError::UnknownKey {
                category: "architecture",
                key: arch.to_string(),
            })
    }

    pub fn optimizer_mod(&self, name: &str) -> Result<f64, EstimateError> {
        self.optimizer_mods
            .get(name)
            .copied()
            .ok_or_else(|| EstimateError::UnknownKey {
                category: "optimizer",
                key: name.to_string(),
            })
    }

    pub fn objective_energy_mod(&self, name: &str) -> Result<f64, EstimateError> {
        self.objective_energy_mod
            .get(name)
            .copied()
            .ok_or_else(|| EstimateError::UnknownKey {
                category: "objective",
                key: name.to_string(),
            })
    }

    pub fn objective_sensitivity(&self, name: &str) -> Result<f64, EstimateError> {
        self.objective_sensitivity
            .get(name)
            .copied()
            .ok_or_else(|| EstimateError::UnknownKey {
                category: "objective",
                key: name.to_string(),
            })
    }
}

impl Default for Tables {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_builtin_arch_tags_resolve() {
        let tables = Tables::builtin();
        for profile in tables.models.values() {
            assert!(tables.arch_modifier(&profile.arch).is_ok());
            assert!(tables.arch_resolution_exponent(&profile.arch).is_ok());
        }
    }

    #[test]
    fn test_reference_energy_is_mean() {
        let tables = Tables::builtin();
        let n = tables.models.len() as f64;
        let sum: f64 = tables.models.values().map(|m| m.base_energy).sum();
        assert_abs_diff_eq!(tables.reference_energy(), sum / n, epsilon = 1e-12);
        // All built-in energies sit near 6-7e-4, so must the mean
        assert!(tables.reference_energy() > 6.0e-4);
        assert!(tables.reference_energy() < 7.2e-4);
    }

    #[test]
    fn test_unknown_model_reports_key() {
        let tables = Tables::builtin();
        let err = tables.model("Unknown-Model").unwrap_err();
        match err {
            EstimateError::UnknownKey { category, key } => {
                assert_eq!(category, "model");
                assert_eq!(key, "Unknown-Model");
            }
            other => panic!("expected UnknownKey, got {other:?}"),
        }
    }

    #[test]
    fn test_sdxl_profile_values() {
        let tables = Tables::builtin();
        let sdxl = tables.model("SDXL").unwrap();
        assert_abs_diff_eq!(sdxl.native_res, 1024.0);
        assert_abs_diff_eq!(sdxl.base_energy, 0.000712, epsilon = 1e-12);
        assert_eq!(sdxl.arch, "sdxl_backbone");
    }

    #[test]
    fn test_tables_round_trip_json() {
        let tables = Tables::builtin();
        let json = serde_json::to_string(&tables).unwrap();
        let back: Tables = serde_json::from_str(&json).unwrap();
        assert_eq!(tables, back);
    }
}
