use indexmap::IndexMap;

use crate::config::{Scenario, SimConfig};
use crate::policy::{ExportFilter, FilterAction, Policy};
use crate::run_simulation;
use crate::types::{AsId, Prefix};

fn asn(s: &str) -> AsId {
    AsId::from(s)
}

fn prefix(s: &str) -> Prefix {
    Prefix::from(s)
}

fn linear_config(scenario: Scenario) -> SimConfig {
    SimConfig {
        nodes: vec![asn("100"), asn("200"), asn("300")],
        links: vec![[asn("100"), asn("200")], [asn("200"), asn("300")]],
        prefixes: vec![prefix("10.0.1.0/24")],
        origin_as: Some(asn("100")),
        scenario,
        hijacker: None,
        flap_count: 3,
        policies: IndexMap::new(),
        max_steps: 50,
    }
}

#[test]
fn linear_three_as_baseline_converges_to_the_shortest_paths() {
    let results = run_simulation(linear_config(Scenario::Baseline)).unwrap();
    let p = prefix("10.0.1.0/24");

    let origin_route = &results.final_ribs[&asn("100")][&p];
    assert_eq!(origin_route.as_path, vec![asn("100")]);

    let middle_route = &results.final_ribs[&asn("200")][&p];
    assert_eq!(middle_route.as_path, vec![asn("100")]);

    let far_route = &results.final_ribs[&asn("300")][&p];
    assert_eq!(far_route.as_path, vec![asn("200"), asn("100")]);

    assert!(results.metrics.reachable_prefix_pairs_pct > 99.0);
}

#[test]
fn local_pref_override_beats_a_shorter_as_path() {
    let mut policies = IndexMap::new();
    let mut local_pref_map = IndexMap::new();
    local_pref_map.insert(asn("200"), 500);
    policies.insert(
        asn("300"),
        Policy {
            local_pref_map,
            ..Policy::default()
        },
    );

    let config = SimConfig {
        nodes: vec![asn("100"), asn("200"), asn("300")],
        links: vec![
            [asn("100"), asn("200")],
            [asn("100"), asn("300")],
            [asn("200"), asn("300")],
        ],
        prefixes: vec![prefix("10.0.1.0/24")],
        origin_as: Some(asn("100")),
        scenario: Scenario::Baseline,
        hijacker: None,
        flap_count: 3,
        policies,
        max_steps: 50,
    };

    let results = run_simulation(config).unwrap();
    let route = &results.final_ribs[&asn("300")][&prefix("10.0.1.0/24")];
    assert_eq!(route.as_path, vec![asn("200"), asn("100")]);
    assert_eq!(route.local_pref, 500);
}

#[test]
fn hijack_scenario_diverts_a_downstream_node_onto_the_hijacker() {
    let config = SimConfig {
        nodes: vec![asn("100"), asn("200"), asn("300"), asn("400")],
        links: vec![
            [asn("100"), asn("200")],
            [asn("200"), asn("300")],
            [asn("300"), asn("400")],
        ],
        prefixes: vec![prefix("10.0.1.0/24")],
        origin_as: Some(asn("100")),
        scenario: Scenario::Hijack,
        hijacker: Some(asn("300")),
        flap_count: 3,
        policies: IndexMap::new(),
        max_steps: 50,
    };

    let results = run_simulation(config).unwrap();
    let p = prefix("10.0.1.0/24");

    let hijacked_route = &results.final_ribs[&asn("400")][&p];
    assert_eq!(hijacked_route.as_path, vec![asn("300")]);

    let legitimate_route = &results.final_ribs[&asn("200")][&p];
    assert_eq!(legitimate_route.as_path, vec![asn("100")]);

    let coverage = results.metrics.hijack_coverage_pct.unwrap();
    assert!(coverage > 0.0);
}

#[test]
fn as_path_prepend_de_prefers_the_prepending_exporter() {
    let mut policies = IndexMap::new();
    policies.insert(
        asn("200"),
        Policy {
            as_path_prepend: 3,
            ..Policy::default()
        },
    );

    let config = SimConfig {
        nodes: vec![asn("100"), asn("200"), asn("300"), asn("400")],
        links: vec![
            [asn("100"), asn("200")],
            [asn("100"), asn("300")],
            [asn("200"), asn("400")],
            [asn("300"), asn("400")],
        ],
        prefixes: vec![prefix("10.0.1.0/24")],
        origin_as: Some(asn("100")),
        scenario: Scenario::Baseline,
        hijacker: None,
        flap_count: 3,
        policies,
        max_steps: 50,
    };

    let results = run_simulation(config).unwrap();
    let route = &results.final_ribs[&asn("400")][&prefix("10.0.1.0/24")];
    assert_eq!(route.as_path, vec![asn("300"), asn("100")]);
}

#[test]
fn export_deny_filter_keeps_a_prefix_from_ever_reaching_a_downstream_node() {
    let mut policies = IndexMap::new();
    policies.insert(
        asn("200"),
        Policy {
            export_filters: vec![ExportFilter {
                action: FilterAction::Deny,
                prefix: prefix("10.0.1.0/24"),
            }],
            ..Policy::default()
        },
    );

    let config = SimConfig {
        nodes: vec![asn("100"), asn("200"), asn("300")],
        links: vec![[asn("100"), asn("200")], [asn("200"), asn("300")]],
        prefixes: vec![prefix("10.0.1.0/24")],
        origin_as: Some(asn("100")),
        scenario: Scenario::Baseline,
        hijacker: None,
        flap_count: 3,
        policies,
        max_steps: 50,
    };

    let results = run_simulation(config).unwrap();
    assert!(results.final_ribs[&asn("300")].is_empty());
    assert!(results.final_ribs[&asn("200")].contains_key(&prefix("10.0.1.0/24")));
}

#[test]
fn a_peering_ring_converges_without_looping_back_to_the_origin() {
    let config = SimConfig {
        nodes: vec![asn("100"), asn("200"), asn("300")],
        links: vec![
            [asn("100"), asn("200")],
            [asn("200"), asn("300")],
            [asn("300"), asn("100")],
        ],
        prefixes: vec![prefix("10.0.1.0/24")],
        origin_as: Some(asn("100")),
        scenario: Scenario::Baseline,
        hijacker: None,
        flap_count: 3,
        policies: IndexMap::new(),
        max_steps: 50,
    };

    let results = run_simulation(config).unwrap();
    let origin_route = &results.final_ribs[&asn("100")][&prefix("10.0.1.0/24")];
    assert_eq!(origin_route.as_path, vec![asn("100")]);
    assert!(results.metrics.convergence_steps < 50);
}

#[test]
fn route_flap_ends_with_the_origin_withdrawn_but_downstream_unchanged() {
    let mut config = linear_config(Scenario::RouteFlap);
    config.flap_count = 2;

    let results = run_simulation(config).unwrap();
    let p = prefix("10.0.1.0/24");

    // The last flap's withdraw step removes only the origin's own rib
    // entry (see `crate::as_node::AsNode::remove_from_rib`); it never
    // touches a neighbor's rib_in, so downstream nodes still advertise
    // the stale path among themselves.
    assert!(!results.final_ribs[&asn("100")].contains_key(&p));
    assert!(results.final_ribs[&asn("200")].contains_key(&p));
    assert!(results.final_ribs[&asn("300")].contains_key(&p));
}
