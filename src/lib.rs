//! In-memory BGP-4 path-vector routing simulator core.
//!
//! Accepts a declarative description of an inter-domain topology
//! ([`config::SimConfig`]): autonomous systems, peering links, originated
//! prefixes, per-AS policies, and a named scenario. Drives the BGP decision
//! and propagation algorithm to convergence and returns a per-AS routing
//! state, a protocol-level event timeline, and aggregate metrics
//! ([`results::SimResults`]).
//!
//! The hard part is the BGP engine: route representation ([`route`]),
//! per-peer RIB accounting and the deterministic best-path selection
//! algorithm ([`as_node`]), import/export policy ([`policy`]), and the
//! iterative convergence driver across an arbitrary peering graph
//! ([`simulator`]).
//!
//! This crate performs no I/O: no real sockets, no wire-format BGP
//! messages, no timers. It is single-threaded and synchronous; convergence
//! is logical, not wall-clock. See `SPEC_FULL.md` for the full design.

#![deny(missing_docs)]

pub mod as_node;
pub mod config;
pub mod error;
pub mod policy;
pub mod results;
pub mod route;
pub mod simulator;
pub mod timeline;
pub mod types;

pub use config::SimConfig;
pub use error::SimError;
pub use results::SimResults;
use simulator::Simulator;

/// Run a simulation to convergence.
///
/// Validates `config` (see [`config::SimConfig::validate`]), then builds the
/// topology, runs the configured scenario, and returns the final results.
/// This is the crate's only entry point; it performs no I/O.
pub fn run_simulation(config: SimConfig) -> Result<SimResults, SimError> {
    let origin_as = config.validate()?;
    let simulator = Simulator::new(config, origin_as);
    Ok(simulator.run())
}

#[cfg(test)]
mod test;
