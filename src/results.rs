//! Result types returned by [`crate::run_simulation`]: the timeline,
//! aggregate metrics, final per-AS RIBs, and a topology summary.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::Scenario;
use crate::route::RouteRecord;
use crate::timeline::{EventType, TimelineEvent};
use crate::types::{AsId, Prefix};

/// Aggregate metrics computed once a simulation run finishes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// Total rounds the convergence driver ran (equals `current_step`).
    pub convergence_steps: u64,
    /// Count of "update" events in the timeline.
    pub total_updates: usize,
    /// Total timeline length.
    pub total_events: usize,
    /// Count of best-path changes across all nodes over the whole run.
    pub best_route_changes_total: u64,
    /// Mean AS-path length across every `(node, prefix)` entry in every
    /// final RIB, or 0 if no routes were learned anywhere.
    pub avg_as_path_length: f64,
    /// Count of `(node, prefix)` entries across all final RIBs.
    pub routes_learned_total: usize,
    /// `100 * reachable node*prefix pairs / (|nodes| * |prefixes|)`.
    pub reachable_prefix_pairs_pct: f64,
    /// For the hijack scenario only: the percentage of routes in
    /// non-hijacker RIBs whose AS path contains the hijacker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hijack_coverage_pct: Option<f64>,
}

/// A node in the topology summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopologyNode {
    /// The AS identifier of this node.
    pub id: AsId,
}

/// An undirected edge in the topology summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopologyEdge {
    /// One endpoint of the link.
    pub from: AsId,
    /// The other endpoint of the link.
    pub to: AsId,
}

/// The topology the simulation ran over, echoed back for convenience.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topology {
    /// Every configured node.
    pub nodes: Vec<TopologyNode>,
    /// Every configured link.
    pub edges: Vec<TopologyEdge>,
}

/// The full result of a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimResults {
    /// The append-only protocol-level event log.
    pub timeline: Vec<TimelineEvent>,
    /// Aggregate metrics derived from the timeline and final RIBs.
    pub metrics: Metrics,
    /// Every node's selected best path per prefix, in its external form.
    pub final_ribs: IndexMap<AsId, IndexMap<Prefix, RouteRecord>>,
    /// The topology the simulation ran over.
    pub topology: Topology,
}

/// Compute [`Metrics`] from a finished run's timeline and final RIBs.
pub(crate) fn calculate_metrics(
    timeline: &[TimelineEvent],
    current_step: u64,
    best_route_changes_total: u64,
    final_ribs: &IndexMap<AsId, IndexMap<Prefix, RouteRecord>>,
    prefixes: &[Prefix],
    scenario: Scenario,
    hijacker: Option<&AsId>,
) -> Metrics {
    let total_updates = timeline
        .iter()
        .filter(|e| e.event_type == EventType::Update)
        .count();

    let mut total_len = 0usize;
    let mut route_count = 0usize;
    for rib in final_ribs.values() {
        for route in rib.values() {
            total_len += route.as_path.len();
            route_count += 1;
        }
    }
    let avg_as_path_length = if route_count > 0 {
        total_len as f64 / route_count as f64
    } else {
        0.0
    };

    let reachable_prefix_pairs_pct = if !prefixes.is_empty() && !final_ribs.is_empty() {
        let total_pairs = final_ribs.len() * prefixes.len();
        let reachable: usize = final_ribs
            .values()
            .map(|rib| prefixes.iter().filter(|p| rib.contains_key(*p)).count())
            .sum();
        (reachable as f64 / total_pairs as f64) * 100.0
    } else {
        0.0
    };

    let hijack_coverage_pct = if scenario == Scenario::Hijack {
        hijacker.map(|hijacker| calculate_hijack_coverage(final_ribs, hijacker))
    } else {
        None
    };

    Metrics {
        convergence_steps: current_step,
        total_updates,
        total_events: timeline.len(),
        best_route_changes_total,
        avg_as_path_length,
        routes_learned_total: route_count,
        reachable_prefix_pairs_pct,
        hijack_coverage_pct,
    }
}

fn calculate_hijack_coverage(
    final_ribs: &IndexMap<AsId, IndexMap<Prefix, RouteRecord>>,
    hijacker: &AsId,
) -> f64 {
    let mut hijacked = 0usize;
    let mut total = 0usize;
    for (asn, rib) in final_ribs {
        if asn == hijacker {
            continue;
        }
        for route in rib.values() {
            total += 1;
            if route.as_path.contains(hijacker) {
                hijacked += 1;
            }
        }
    }
    if total > 0 {
        (hijacked as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}
