use std::collections::HashSet;

use maplit::hashset;

use crate::as_node::AsNode;
use crate::policy::Policy;
use crate::route::Route;
use crate::types::{AsId, OriginType, Prefix};

fn asn(s: &str) -> AsId {
    AsId::from(s)
}

fn prefix(s: &str) -> Prefix {
    Prefix::from(s)
}

#[test]
fn add_neighbor_is_idempotent() {
    let mut node = AsNode::new(asn("100"), Policy::default());
    node.add_neighbor(asn("200"));
    node.add_neighbor(asn("200"));
    node.add_neighbor(asn("300"));
    let observed: HashSet<AsId> = node.neighbors().iter().cloned().collect();
    assert_eq!(observed, hashset! { asn("200"), asn("300") });
}

#[test]
fn originate_route_installs_into_rib() {
    let mut node = AsNode::new(asn("100"), Policy::default());
    let route = node.originate_route(prefix("10.0.1.0/24"));
    assert_eq!(node.rib().get(&prefix("10.0.1.0/24")), Some(&route));
    assert_eq!(route.as_path, vec![asn("100")]);
}

#[test]
fn receive_route_installs_first_candidate() {
    let mut node = AsNode::new(asn("200"), Policy::default());
    node.add_neighbor(asn("100"));
    let incoming = Route {
        prefix: prefix("10.0.1.0/24"),
        as_path: vec![asn("100")],
        origin: OriginType::Igp,
        local_pref: 100,
        med: 0,
        next_hop: Some(asn("100")),
    };
    let changed = node.receive_route(incoming.clone(), &asn("100"));
    assert!(changed);
    assert_eq!(node.rib().get(&prefix("10.0.1.0/24")), Some(&incoming));
}

#[test]
fn receive_route_drops_routes_containing_own_asn() {
    let mut node = AsNode::new(asn("200"), Policy::default());
    node.add_neighbor(asn("100"));
    let looping = Route {
        prefix: prefix("10.0.1.0/24"),
        as_path: vec![asn("100"), asn("200")],
        origin: OriginType::Igp,
        local_pref: 100,
        med: 0,
        next_hop: Some(asn("100")),
    };
    let changed = node.receive_route(looping, &asn("100"));
    assert!(!changed);
    assert!(node.rib().is_empty());
}

#[test]
fn higher_local_pref_wins_over_shorter_as_path() {
    let mut node = AsNode::new(asn("300"), Policy::default());
    node.add_neighbor(asn("100"));
    node.add_neighbor(asn("200"));

    let short_but_low_pref = Route {
        prefix: prefix("10.0.1.0/24"),
        as_path: vec![asn("100")],
        origin: OriginType::Igp,
        local_pref: 50,
        med: 0,
        next_hop: Some(asn("100")),
    };
    let long_but_high_pref = Route {
        prefix: prefix("10.0.1.0/24"),
        as_path: vec![asn("200"), asn("999")],
        origin: OriginType::Igp,
        local_pref: 200,
        med: 0,
        next_hop: Some(asn("200")),
    };

    node.receive_route(short_but_low_pref, &asn("100"));
    node.receive_route(long_but_high_pref.clone(), &asn("200"));

    assert_eq!(
        node.rib().get(&prefix("10.0.1.0/24")),
        Some(&long_but_high_pref)
    );
}

#[test]
fn med_is_only_compared_within_the_same_first_hop_as() {
    // Two peers both relay a route whose first hop is AS100 (e.g. both are
    // route reflectors for it), with equal local_pref and as_path length:
    // the decision process must group them by as_path[0] and pick the
    // lower-MED one, breaking a further tie on peer identifier.
    let mut node = AsNode::new(asn("300"), Policy::default());
    node.add_neighbor(asn("100"));
    node.add_neighbor(asn("150"));

    let via_peer_100 = Route {
        prefix: prefix("10.0.1.0/24"),
        as_path: vec![asn("100")],
        origin: OriginType::Igp,
        local_pref: 100,
        med: 50,
        next_hop: Some(asn("100")),
    };
    let via_peer_150 = Route {
        prefix: prefix("10.0.1.0/24"),
        as_path: vec![asn("100")],
        origin: OriginType::Igp,
        local_pref: 100,
        med: 5,
        next_hop: Some(asn("150")),
    };

    node.receive_route(via_peer_100, &asn("100"));
    node.receive_route(via_peer_150.clone(), &asn("150"));

    let winner = node.rib().get(&prefix("10.0.1.0/24")).unwrap();
    assert_eq!(winner.med, 5);
}

#[test]
fn withdraw_route_is_a_no_op_when_peer_held_nothing() {
    let mut node = AsNode::new(asn("200"), Policy::default());
    node.add_neighbor(asn("100"));
    assert!(!node.withdraw_route(&prefix("10.0.1.0/24"), &asn("100")));
}

#[test]
fn withdraw_route_falls_back_to_remaining_candidate() {
    let mut node = AsNode::new(asn("300"), Policy::default());
    node.add_neighbor(asn("100"));
    node.add_neighbor(asn("200"));

    let via_100 = Route {
        prefix: prefix("10.0.1.0/24"),
        as_path: vec![asn("100")],
        origin: OriginType::Igp,
        local_pref: 100,
        med: 0,
        next_hop: Some(asn("100")),
    };
    let via_200 = Route {
        prefix: prefix("10.0.1.0/24"),
        as_path: vec![asn("200"), asn("999")],
        origin: OriginType::Igp,
        local_pref: 100,
        med: 0,
        next_hop: Some(asn("200")),
    };

    node.receive_route(via_100.clone(), &asn("100"));
    node.receive_route(via_200, &asn("200"));
    assert_eq!(node.rib().get(&prefix("10.0.1.0/24")), Some(&via_100));

    let changed = node.withdraw_route(&prefix("10.0.1.0/24"), &asn("100"));
    assert!(changed);
    assert!(node.rib().get(&prefix("10.0.1.0/24")).is_none());
}

#[test]
fn prepare_advertisement_respects_split_horizon() {
    let mut node = AsNode::new(asn("200"), Policy::default());
    node.add_neighbor(asn("100"));
    let route = Route {
        prefix: prefix("10.0.1.0/24"),
        as_path: vec![asn("100")],
        origin: OriginType::Igp,
        local_pref: 100,
        med: 0,
        next_hop: Some(asn("100")),
    };
    node.receive_route(route.clone(), &asn("100"));
    let installed = node.rib()[&prefix("10.0.1.0/24")].clone();
    assert!(node.prepare_advertisement(&installed, &asn("100")).is_none());
}

#[test]
fn prepare_advertisement_does_not_reprepend_a_self_originated_path() {
    let mut node = AsNode::new(asn("200"), Policy::default());
    let route = node.originate_route(prefix("10.0.1.0/24"));
    let prepared = node.prepare_advertisement(&route, &asn("300")).unwrap();
    assert_eq!(prepared.as_path, vec![asn("200")]);
    assert_eq!(prepared.next_hop, Some(asn("200")));
}

#[test]
fn prepare_advertisement_prepends_own_asn_for_a_transited_path() {
    let mut node = AsNode::new(asn("200"), Policy::default());
    node.add_neighbor(asn("100"));
    let upstream = Route {
        prefix: prefix("10.0.1.0/24"),
        as_path: vec![asn("100")],
        origin: OriginType::Igp,
        local_pref: 100,
        med: 0,
        next_hop: Some(asn("100")),
    };
    node.receive_route(upstream, &asn("100"));
    let installed = node.rib()[&prefix("10.0.1.0/24")].clone();
    let prepared = node.prepare_advertisement(&installed, &asn("300")).unwrap();
    assert_eq!(prepared.as_path, vec![asn("200"), asn("100")]);
    assert_eq!(prepared.next_hop, Some(asn("200")));
}

#[test]
fn remove_from_rib_does_not_touch_rib_in() {
    let mut node = AsNode::new(asn("100"), Policy::default());
    node.originate_route(prefix("10.0.1.0/24"));
    assert!(node.remove_from_rib(&prefix("10.0.1.0/24")));
    assert!(node.rib().get(&prefix("10.0.1.0/24")).is_none());
}
