//! lrtool: heuristic learning-rate calculator for LoRA fine-tunes
//!
//! Recommends a learning rate for LoRA (low-rank adaptation) fine-tunes of
//! image-generation models from static heuristics, and scores how confident
//! the recommendation is. The core is a pure function: a [`TrainingConfig`]
//! plus the static [`Tables`] produce a fresh [`Estimate`] on every call,
//! with no hidden state.
//!
//! # Example
//!
//! ```
//! use lrtool::{evaluate, Tables, TrainingConfig};
//!
//! let tables = Tables::builtin();
//! let config = TrainingConfig::default();
//! let estimate = evaluate(&config, &tables).unwrap();
//! assert!(estimate.base_lr > 0.0);
//! ```

pub mod cli;
pub mod estimator;
pub mod profile;

pub use estimator::{
    evaluate, EfficiencyBand, Estimate, EstimateError, RiskBand, Strategy, Tables, TrainingConfig,
};
pub use profile::{Profile, ProfileError};
