//! One autonomous system's BGP state: neighbor set, per-peer RIB-in, the
//! best-path RIB, its policy, and the decision process that ties them
//! together.

use indexmap::{IndexMap, IndexSet};

use crate::policy::Policy;
use crate::route::Route;
use crate::types::{AsId, Prefix};

/// An autonomous system node.
///
/// Invariant: every peer in `neighbors` has an entry (possibly empty) in
/// `rib_in`. A prefix is in `rib` iff at least one peer's `rib_in` currently
/// holds a candidate for it, and the stored value is exactly the output of
/// the decision process over those candidates.
#[derive(Debug, Clone)]
pub struct AsNode {
    asn: AsId,
    neighbors: IndexSet<AsId>,
    /// Per-peer inbound RIB: last route heard from that peer, per prefix.
    /// The node's own `asn` is used as a virtual peer key for originated
    /// routes, so a single decision-process implementation handles both
    /// learned and originated routes uniformly.
    rib_in: IndexMap<AsId, IndexMap<Prefix, Route>>,
    /// Currently selected best path per prefix.
    rib: IndexMap<Prefix, Route>,
    policy: Policy,
}

impl AsNode {
    /// Construct a new, neighborless AS node with the given policy.
    pub fn new(asn: AsId, policy: Policy) -> Self {
        AsNode {
            asn,
            neighbors: IndexSet::new(),
            rib_in: IndexMap::new(),
            rib: IndexMap::new(),
            policy,
        }
    }

    /// This node's AS identifier.
    pub fn asn(&self) -> &AsId {
        &self.asn
    }

    /// The peers this node has a (logically always-established) session
    /// with, in insertion order.
    pub fn neighbors(&self) -> &IndexSet<AsId> {
        &self.neighbors
    }

    /// The currently selected best path per prefix.
    pub fn rib(&self) -> &IndexMap<Prefix, Route> {
        &self.rib
    }

    /// Insert `peer` into `neighbors` and ensure `rib_in[peer]` exists.
    /// Idempotent.
    pub fn add_neighbor(&mut self, peer: AsId) {
        self.neighbors.insert(peer.clone());
        self.rib_in.entry(peer).or_default();
    }

    /// Originate a route for `prefix`: `as_path = [self.asn]`, `origin =
    /// IGP`, `local_pref = 100`, `med = 0`, `next_hop = self.asn`. Installed
    /// into `rib_in[self.asn][prefix]` (self acts as a virtual peer) and
    /// into `rib[prefix]`.
    pub fn originate_route(&mut self, prefix: Prefix) -> Route {
        let route = Route::originated(&self.asn, prefix.clone());
        log::debug!("AS{} originating route for {}", self.asn, prefix);
        self.rib_in
            .entry(self.asn.clone())
            .or_default()
            .insert(prefix.clone(), route.clone());
        self.rib.insert(prefix.clone(), route.clone());
        // The virtual self-peer is the sole candidate the first time a
        // prefix is originated, but re-origination must still run through
        // the decision process uniformly (e.g. route_flap re-announcing
        // after another peer's route has taken over `rib`).
        self.run_decision_process(&prefix);
        route
    }

    /// Receive a route advertised by `from_asn`. Returns whether this
    /// caused the node's best path for `route.prefix` to change.
    pub fn receive_route(&mut self, route: Route, from_asn: &AsId) -> bool {
        if route.has_loop(&self.asn) {
            log::trace!(
                "AS{} detected loop in path {:?}, dropping",
                self.asn,
                route.as_path
            );
            return false;
        }
        if route.next_hop.is_none() {
            log::trace!("AS{} received route with no next_hop, dropping", self.asn);
            return false;
        }

        let prefix = route.prefix.clone();
        let mut imported = self.policy.apply_import(&route, from_asn);
        imported.next_hop = Some(from_asn.clone());

        self.rib_in
            .entry(from_asn.clone())
            .or_default()
            .insert(prefix.clone(), imported);

        let changed = self.run_decision_process(&prefix);
        log::trace!(
            "AS{} decision process for {} from AS{}: changed={}",
            self.asn,
            prefix,
            from_asn,
            changed
        );
        changed
    }

    /// Withdraw the route held from `from_asn` for `prefix`, if any, and
    /// re-run the decision process. No-op (returns `false`) if `from_asn`
    /// held no route for `prefix`.
    pub fn withdraw_route(&mut self, prefix: &Prefix, from_asn: &AsId) -> bool {
        let removed = self
            .rib_in
            .get_mut(from_asn)
            .map(|routes| routes.shift_remove(prefix).is_some())
            .unwrap_or(false);
        if !removed {
            return false;
        }
        self.run_decision_process(prefix)
    }

    /// Remove `prefix` from this node's own `rib` directly, without
    /// touching `rib_in` or re-running the decision process. Used only by
    /// the `route_flap` scenario (see `crate::simulator::Simulator`), which
    /// deliberately models flap as churn on the origin's own best path
    /// rather than genuine withdraw propagation. Returns whether a route
    /// was present to remove.
    pub fn remove_from_rib(&mut self, prefix: &Prefix) -> bool {
        self.rib.shift_remove(prefix).is_some()
    }

    /// Prepare `route` (one of this node's own best paths) for
    /// advertisement to `to_asn`. Returns `None` if the advertisement is
    /// suppressed, either by split horizon (never re-advertise a route back
    /// to the peer it was learned from) or by export policy.
    pub fn prepare_advertisement(&self, route: &Route, to_asn: &AsId) -> Option<Route> {
        if route.next_hop.as_ref() == Some(to_asn) {
            return None;
        }

        let mut prepared = route.clone();
        if prepared.as_path.first() != Some(&self.asn) {
            prepared.as_path.insert(0, self.asn.clone());
        }

        let mut prepared = self.policy.apply_export(&prepared, &self.asn, to_asn)?;
        prepared.next_hop = Some(self.asn.clone());
        Some(prepared)
    }

    /// Run the BGP decision process for `prefix`: collect candidates from
    /// every peer's `rib_in`, select the best one, and update `rib` if it
    /// differs from what's currently installed. Returns whether `rib`
    /// changed.
    fn run_decision_process(&mut self, prefix: &Prefix) -> bool {
        let candidates: Vec<(&Route, &AsId)> = self
            .rib_in
            .iter()
            .filter_map(|(peer, routes)| routes.get(prefix).map(|route| (route, peer)))
            .collect();

        if candidates.is_empty() {
            return self.rib.shift_remove(prefix).is_some();
        }

        let winner = select_best_route(&candidates).clone();

        let unchanged = self
            .rib
            .get(prefix)
            .map(|current| current.selection_eq(&winner))
            .unwrap_or(false);
        if unchanged {
            return false;
        }

        self.rib.insert(prefix.clone(), winner);
        true
    }
}

/// The BGP best-path selection algorithm, given every candidate route along
/// with the peer it was learned from.
///
/// 1. A single candidate wins outright.
/// 2. Otherwise, candidates are grouped by first-hop AS (`as_path[0]`, or
///    the announcing peer if the path is empty) and, within each group, MED
///    is compared: lowest wins, ties broken by the lexicographically
///    smallest peer identifier. MED is only ever compared among routes from
///    the same neighbor AS.
/// 3. The reduced, one-per-first-hop-AS set is then sorted on
///    `(-local_pref, as_path length, origin ordinal, peer identifier)` and
///    the first entry wins.
fn select_best_route<'a>(candidates: &[(&'a Route, &'a AsId)]) -> &'a Route {
    if candidates.len() == 1 {
        return candidates[0].0;
    }

    let mut by_first_hop: IndexMap<&AsId, Vec<(&Route, &AsId)>> = IndexMap::new();
    for &(route, peer) in candidates {
        let first_hop = route.as_path.first().unwrap_or(peer);
        by_first_hop.entry(first_hop).or_default().push((route, peer));
    }

    let mut reduced: Vec<(&Route, &AsId)> = by_first_hop
        .into_values()
        .map(|mut group| {
            group.sort_by(|a, b| a.0.med.cmp(&b.0.med).then_with(|| a.1.cmp(b.1)));
            group[0]
        })
        .collect();

    reduced.sort_by(|a, b| {
        b.0.local_pref
            .cmp(&a.0.local_pref)
            .then_with(|| a.0.as_path.len().cmp(&b.0.as_path.len()))
            .then_with(|| a.0.origin.value().cmp(&b.0.origin.value()))
            .then_with(|| a.1.cmp(b.1))
    });

    reduced[0].0
}
