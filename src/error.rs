//! Top-level error type returned by [`crate::run_simulation`].
//!
//! Per `spec.md` §7, the engine's only failure mode beyond the ordinary,
//! silently-handled protocol branches (dropped loops, suppressed exports,
//! no-op withdraws, truncated convergence) is programmer misuse. This crate
//! surfaces that as two variants: a failed boundary validation (the normal
//! case for bad input), and an unreachable-in-practice unknown-scenario
//! variant kept only because [`crate::config::SimConfig`] can be
//! constructed by hand outside of `serde` deserialization.

use thiserror::Error;

use crate::config::ConfigError;

/// Error returned by [`crate::run_simulation`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// The supplied config failed boundary validation.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// A config's `scenario` could not be mapped to a known scenario. The
    /// typed [`crate::config::Scenario`] enum makes this unreachable via
    /// `serde` deserialization; it is retained as a fatal precondition
    /// violation for any other way a config is constructed.
    #[error("unknown scenario: {0}")]
    UnknownScenario(String),
}
