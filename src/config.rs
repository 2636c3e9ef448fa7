//! Simulation configuration: the typed input record `run_simulation`
//! accepts, and the boundary validation that stands in for the external
//! validator `spec.md` treats as a separate collaborator (see
//! `SPEC_FULL.md` §4.4).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::policy::Policy;
use crate::types::{AsId, Prefix};

const MAX_NODES: usize = 100;
const MAX_PREFIXES: usize = 50;
const MIN_FLAP_COUNT: u32 = 1;
const MAX_FLAP_COUNT: u32 = 10;
const MAX_PREPEND: u8 = 10;
const DEFAULT_MAX_STEPS: u32 = 100;
const DEFAULT_FLAP_COUNT: u32 = 3;

fn default_prefixes() -> Vec<Prefix> {
    vec![Prefix::from("10.0.1.0/24")]
}

fn default_scenario() -> Scenario {
    Scenario::Baseline
}

fn default_flap_count() -> u32 {
    DEFAULT_FLAP_COUNT
}

fn default_max_steps() -> u32 {
    DEFAULT_MAX_STEPS
}

/// The named simulation mode to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// `origin_as` originates every prefix; convergence is driven once.
    Baseline,
    /// `origin_as` originates, converges, then `hijacker` originates the
    /// same prefixes and convergence is driven again.
    Hijack,
    /// Repeated announce/withdraw churn on the origin, `flap_count` times.
    RouteFlap,
}

/// Declarative description of an inter-domain topology, its policies, and
/// the scenario to run. Field names and defaults match `spec.md` §6.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// AS identifiers present in the topology. Non-empty, at most 100.
    pub nodes: Vec<AsId>,
    /// Undirected peering links; both endpoints must be in `nodes`.
    pub links: Vec<[AsId; 2]>,
    /// Prefixes to originate. At most 50. Defaults to `["10.0.1.0/24"]`.
    #[serde(default = "default_prefixes")]
    pub prefixes: Vec<Prefix>,
    /// The originating AS. Defaults to `nodes[0]`.
    #[serde(default)]
    pub origin_as: Option<AsId>,
    /// Which scenario to run. Defaults to `Baseline`.
    #[serde(default = "default_scenario")]
    pub scenario: Scenario,
    /// The hijacking AS; required when `scenario` is `Hijack`.
    #[serde(default)]
    pub hijacker: Option<AsId>,
    /// Number of announce/withdraw cycles for `RouteFlap`. 1..=10, default 3.
    #[serde(default = "default_flap_count")]
    pub flap_count: u32,
    /// Per-AS import/export policy overrides.
    #[serde(default)]
    pub policies: IndexMap<AsId, Policy>,
    /// Maximum convergence rounds before giving up. Default 100.
    #[serde(default = "default_max_steps")]
    pub max_steps: u32,
}

/// A configuration failed one of the boundary checks `spec.md` §6 assigns
/// to the external validator. Since this crate has no sibling validator
/// process, these checks run once, inside `run_simulation`, before the
/// engine ever sees the config.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// `nodes` was empty.
    #[error("'nodes' must be a non-empty list")]
    EmptyNodes,
    /// `nodes` exceeded the 100-node limit.
    #[error("too many nodes: {0} (max {MAX_NODES})")]
    TooManyNodes(usize),
    /// The same AS identifier appeared twice in `nodes`.
    #[error("duplicate node AS{0}")]
    DuplicateNode(AsId),
    /// A link named an endpoint not present in `nodes`.
    #[error("link [{0}, {1}] references a node not in 'nodes'")]
    UnknownLinkEndpoint(AsId, AsId),
    /// `prefixes` exceeded the 50-prefix limit.
    #[error("too many prefixes: {0} (max {MAX_PREFIXES})")]
    TooManyPrefixes(usize),
    /// A prefix did not parse as an IPv4 CIDR.
    #[error("invalid prefix format: {0}")]
    InvalidPrefixFormat(Prefix),
    /// `origin_as` was not present in `nodes`.
    #[error("origin_as '{0}' not in nodes list")]
    UnknownOriginAs(AsId),
    /// `scenario` was `Hijack` but no `hijacker` was supplied.
    #[error("'hijacker' field required for hijack scenario")]
    MissingHijacker,
    /// `hijacker` was not present in `nodes`.
    #[error("hijacker '{0}' not in nodes list")]
    UnknownHijacker(AsId),
    /// `hijacker` was the same AS as the (resolved) `origin_as`.
    #[error("hijacker '{0}' must differ from origin_as")]
    HijackerIsOrigin(AsId),
    /// `flap_count` fell outside 1..=10.
    #[error("flap_count {0} out of range ({MIN_FLAP_COUNT}..={MAX_FLAP_COUNT})")]
    FlapCountOutOfRange(u32),
    /// A policy was keyed by an AS identifier not present in `nodes`.
    #[error("policy for AS '{0}' references a node not in 'nodes'")]
    UnknownPolicyAs(AsId),
    /// A policy's `as_path_prepend` fell outside 0..=10.
    #[error("as_path_prepend {0} out of range for AS '{1}' (0..={MAX_PREPEND})")]
    PrependOutOfRange(u8, AsId),
}

impl SimConfig {
    /// Validate this config and return the effective origin AS (resolving
    /// the `nodes[0]` default) once every check has passed.
    ///
    /// This mirrors `original_source/BGP-Playground/app/utils/validators.py`
    /// field for field; see `SPEC_FULL.md` §4.4.
    pub fn validate(&self) -> Result<AsId, ConfigError> {
        if self.nodes.is_empty() {
            return Err(ConfigError::EmptyNodes);
        }
        if self.nodes.len() > MAX_NODES {
            return Err(ConfigError::TooManyNodes(self.nodes.len()));
        }
        let node_set: std::collections::HashSet<&AsId> = self.nodes.iter().collect();
        if node_set.len() != self.nodes.len() {
            for (i, n) in self.nodes.iter().enumerate() {
                if self.nodes[..i].contains(n) {
                    return Err(ConfigError::DuplicateNode(n.clone()));
                }
            }
        }

        for [a, b] in &self.links {
            if !node_set.contains(a) || !node_set.contains(b) {
                return Err(ConfigError::UnknownLinkEndpoint(a.clone(), b.clone()));
            }
        }

        if self.prefixes.len() > MAX_PREFIXES {
            return Err(ConfigError::TooManyPrefixes(self.prefixes.len()));
        }
        for prefix in &self.prefixes {
            if prefix.parse_cidr().is_err() {
                return Err(ConfigError::InvalidPrefixFormat(prefix.clone()));
            }
        }

        let origin_as = self.origin_as.clone().unwrap_or_else(|| self.nodes[0].clone());
        if !node_set.contains(&origin_as) {
            return Err(ConfigError::UnknownOriginAs(origin_as));
        }

        if self.scenario == Scenario::Hijack {
            let hijacker = self
                .hijacker
                .as_ref()
                .ok_or(ConfigError::MissingHijacker)?;
            if !node_set.contains(hijacker) {
                return Err(ConfigError::UnknownHijacker(hijacker.clone()));
            }
            if *hijacker == origin_as {
                return Err(ConfigError::HijackerIsOrigin(hijacker.clone()));
            }
        }

        if self.scenario == Scenario::RouteFlap
            && !(MIN_FLAP_COUNT..=MAX_FLAP_COUNT).contains(&self.flap_count)
        {
            return Err(ConfigError::FlapCountOutOfRange(self.flap_count));
        }

        for (asn, policy) in &self.policies {
            if !node_set.contains(asn) {
                return Err(ConfigError::UnknownPolicyAs(asn.clone()));
            }
            if policy.as_path_prepend > MAX_PREPEND {
                return Err(ConfigError::PrependOutOfRange(
                    policy.as_path_prepend,
                    asn.clone(),
                ));
            }
        }

        Ok(origin_as)
    }
}
