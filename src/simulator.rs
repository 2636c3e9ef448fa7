//! Builds the topology, runs the chosen scenario, drives the convergence
//! fixpoint, records the timeline, and derives metrics.

use indexmap::IndexMap;

use crate::as_node::AsNode;
use crate::config::{Scenario, SimConfig};
use crate::results::{calculate_metrics, SimResults, Topology, TopologyEdge, TopologyNode};
use crate::route::Route;
use crate::timeline::{EventType, TimelineEvent};
use crate::types::{AsId, Prefix};

/// Drives one simulation run from a validated config to a [`SimResults`].
///
/// The simulator exclusively owns its [`AsNode`]s; each node exclusively
/// owns its own RIBs and policy. All entities live for the duration of this
/// one run.
pub struct Simulator {
    config: SimConfig,
    origin_as: AsId,
    nodes: IndexMap<AsId, AsNode>,
    timeline: Vec<TimelineEvent>,
    current_step: u64,
    best_route_changes_total: u64,
}

impl Simulator {
    /// Construct a simulator for an already-validated config. `origin_as`
    /// is the resolved origin (defaulting `config.origin_as` to
    /// `config.nodes[0]` is [`crate::config::SimConfig::validate`]'s job,
    /// not this constructor's).
    pub fn new(config: SimConfig, origin_as: AsId) -> Self {
        Simulator {
            config,
            origin_as,
            nodes: IndexMap::new(),
            timeline: Vec::new(),
            current_step: 0,
            best_route_changes_total: 0,
        }
    }

    /// Run the configured scenario to convergence and return the results.
    pub fn run(mut self) -> SimResults {
        self.build_topology();
        self.establish_sessions();

        match self.config.scenario {
            Scenario::Baseline => self.run_baseline(),
            Scenario::Hijack => self.run_hijack(),
            Scenario::RouteFlap => self.run_route_flap(),
        }

        self.generate_results()
    }

    /// For each configured node, construct an [`AsNode`] with the
    /// configured policy (default if none). For each configured link,
    /// register both directions of the (undirected) peering.
    fn build_topology(&mut self) {
        for asn in &self.config.nodes {
            let policy = self.config.policies.get(asn).cloned().unwrap_or_default();
            self.nodes.insert(asn.clone(), AsNode::new(asn.clone(), policy));
        }
        for [a, b] in &self.config.links {
            self.nodes.get_mut(a).expect("link endpoint validated").add_neighbor(b.clone());
            self.nodes.get_mut(b).expect("link endpoint validated").add_neighbor(a.clone());
        }
    }

    /// Log one "open" event per directed peering. A peering is modeled as
    /// logically established for the entire run; there is no session state
    /// machine beyond this single startup log entry.
    fn establish_sessions(&mut self) {
        for asn in self.sorted_asns() {
            for neighbor in self.sorted_neighbors(&asn) {
                self.log(
                    TimelineEvent::new(self.current_step, EventType::Open)
                        .with_from_as(asn.clone())
                        .with_to_as(neighbor)
                        .with_details("BGP session established"),
                );
            }
        }
    }

    fn run_baseline(&mut self) {
        let prefixes = self.config.prefixes.clone();
        for prefix in &prefixes {
            self.originate(&self.origin_as.clone(), prefix.clone(), "Origin announcement");
        }
        self.propagate_until_convergence();
    }

    fn run_hijack(&mut self) {
        let hijacker = self
            .config
            .hijacker
            .clone()
            .expect("hijack scenario validated to carry a hijacker");
        let prefixes = self.config.prefixes.clone();

        for prefix in &prefixes {
            self.originate(
                &self.origin_as.clone(),
                prefix.clone(),
                "Legitimate origin announcement",
            );
        }
        self.current_step += 1;
        self.propagate_until_convergence();

        for prefix in &prefixes {
            self.originate(&hijacker, prefix.clone(), "HIJACK: Malicious announcement");
        }
        self.current_step += 1;
        self.propagate_until_convergence();
    }

    fn run_route_flap(&mut self) {
        let prefixes = self.config.prefixes.clone();
        for flap in 1..=self.config.flap_count {
            for prefix in &prefixes {
                self.originate(
                    &self.origin_as.clone(),
                    prefix.clone(),
                    format!("Route announcement (flap {flap})"),
                );
            }
            self.current_step += 1;
            self.propagate_until_convergence();

            // This deletes the origin's own best-path entry directly,
            // without issuing withdraw messages through rib_in. Neighbors
            // still hold the route in their own rib_in[origin], so the
            // decision process will reinstate it from their perspective
            // until the origin re-originates. This models flap as churn
            // on the origin only, not genuine withdraw propagation; see
            // `spec.md` §9's open question, resolved by keeping this
            // behavior exactly.
            for prefix in &prefixes {
                let origin_asn = self.origin_as.clone();
                self.nodes.get_mut(&origin_asn).unwrap().remove_from_rib(prefix);
                self.log(
                    TimelineEvent::new(self.current_step, EventType::Withdraw)
                        .with_from_as(origin_asn)
                        .with_prefix(prefix.clone())
                        .with_details(format!("Route withdrawal (flap {flap})")),
                );
            }
            self.current_step += 1;
            self.propagate_until_convergence();
        }
    }

    fn originate(&mut self, asn: &AsId, prefix: Prefix, details: impl Into<String>) {
        self.nodes.get_mut(asn).unwrap().originate_route(prefix.clone());
        self.log(
            TimelineEvent::new(self.current_step, EventType::Update)
                .with_from_as(asn.clone())
                .with_prefix(prefix)
                .with_details(details),
        );
    }

    /// Run rounds of stage-then-apply propagation until a round produces no
    /// best-path changes anywhere, or `max_steps` rounds have elapsed.
    ///
    /// Staging is pure with respect to every node's `rib_in`: it only
    /// reads each node's current `rib`, so every update within a round
    /// sees a consistent snapshot of every sender's best path as of the
    /// start of the round. That, together with a deterministic iteration
    /// order over nodes/peers/prefixes, is what makes convergence
    /// deterministic.
    fn propagate_until_convergence(&mut self) {
        let mut rounds = 0u32;
        loop {
            if rounds >= self.config.max_steps {
                log::debug!("convergence not reached within max_steps, stopping");
                break;
            }
            self.current_step += 1;
            rounds += 1;

            let staged = self.stage_updates();
            let mut converged = true;

            for (from_asn, to_asn, prefix, route) in &staged {
                let changed = self
                    .nodes
                    .get_mut(to_asn)
                    .unwrap()
                    .receive_route(route.clone(), from_asn);
                if changed {
                    self.best_route_changes_total += 1;
                    converged = false;
                    self.log(
                        TimelineEvent::new(self.current_step, EventType::Update)
                            .with_from_as(from_asn.clone())
                            .with_to_as(to_asn.clone())
                            .with_prefix(prefix.clone())
                            .with_details("Route update"),
                    );
                }
            }

            if staged.is_empty() {
                for asn in self.sorted_asns() {
                    for neighbor in self.sorted_neighbors(&asn) {
                        self.log(
                            TimelineEvent::new(self.current_step, EventType::Keepalive)
                                .with_from_as(asn.clone())
                                .with_to_as(neighbor),
                        );
                    }
                }
                break;
            }

            if converged {
                break;
            }
        }
    }

    /// Compute every candidate advertisement for this round, without
    /// mutating any node's `rib_in`.
    fn stage_updates(&self) -> Vec<(AsId, AsId, Prefix, Route)> {
        let mut staged = Vec::new();
        for asn in self.sorted_asns() {
            let node = &self.nodes[&asn];
            let mut rib_entries: Vec<(&Prefix, &Route)> = node.rib().iter().collect();
            rib_entries.sort_by(|a, b| a.0.cmp(b.0));

            for neighbor in self.sorted_neighbors(&asn) {
                for (prefix, route) in &rib_entries {
                    if let Some(prepared) = node.prepare_advertisement(route, &neighbor) {
                        staged.push((asn.clone(), neighbor.clone(), (*prefix).clone(), prepared));
                    }
                }
            }
        }
        staged
    }

    fn generate_results(&self) -> SimResults {
        let mut final_ribs = IndexMap::new();
        for asn in self.sorted_asns() {
            let node = &self.nodes[&asn];
            let mut prefixes: Vec<&Prefix> = node.rib().keys().collect();
            prefixes.sort();
            let mut rib_records = IndexMap::new();
            for prefix in prefixes {
                rib_records.insert(prefix.clone(), node.rib()[prefix].to_record());
            }
            final_ribs.insert(asn.clone(), rib_records);
        }

        let metrics = calculate_metrics(
            &self.timeline,
            self.current_step,
            self.best_route_changes_total,
            &final_ribs,
            &self.config.prefixes,
            self.config.scenario,
            self.config.hijacker.as_ref(),
        );

        let topology = Topology {
            nodes: self
                .config
                .nodes
                .iter()
                .map(|id| TopologyNode { id: id.clone() })
                .collect(),
            edges: self
                .config
                .links
                .iter()
                .map(|[from, to]| TopologyEdge {
                    from: from.clone(),
                    to: to.clone(),
                })
                .collect(),
        };

        SimResults {
            timeline: self.timeline.clone(),
            metrics,
            final_ribs,
            topology,
        }
    }

    fn log(&mut self, event: TimelineEvent) {
        self.timeline.push(event);
    }

    fn sorted_asns(&self) -> Vec<AsId> {
        let mut asns: Vec<AsId> = self.nodes.keys().cloned().collect();
        asns.sort();
        asns
    }

    fn sorted_neighbors(&self, asn: &AsId) -> Vec<AsId> {
        let mut neighbors: Vec<AsId> = self.nodes[asn].neighbors().iter().cloned().collect();
        neighbors.sort();
        neighbors
    }
}
