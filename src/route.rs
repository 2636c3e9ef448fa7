//! BGP route representation.

use serde::{Deserialize, Serialize};

use crate::types::{AsId, OriginType, Prefix};

/// One BGP NLRI and its path attributes.
///
/// Routes are value types by convention: every RIB-to-RIB transfer in
/// [`crate::as_node::AsNode`] goes through [`Route::clone`] (or simply
/// `Clone::clone`, since ordinary clone is already a deep copy here; there
/// is no shared-reference aliasing of `as_path` between two RIBs). Policy
/// application and AS-path prepending always mutate the crossing copy, never
/// the original.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// The prefix this route announces reachability for.
    pub prefix: Prefix,
    /// Ordered AS path, leftmost = most recent hop, rightmost = origin.
    pub as_path: Vec<AsId>,
    /// Origin type attribute.
    pub origin: OriginType,
    /// Local preference; higher is more preferred.
    pub local_pref: u32,
    /// Multi-exit discriminator; lower is more preferred, comparable only
    /// among routes sharing the same first-hop AS.
    pub med: u32,
    /// AS identifier of the immediate advertiser, or the originator itself
    /// for a self-originated route. `None` only for a route that has not
    /// yet traversed any peering (e.g. a hand-built route in a test).
    pub next_hop: Option<AsId>,
}

impl Route {
    /// Construct a route originated by `asn` for `prefix`, per
    /// [`crate::as_node::AsNode::originate_route`]: `as_path = [asn]`,
    /// `origin = IGP`, `local_pref = 100`, `med = 0`, `next_hop = asn`.
    pub fn originated(asn: &AsId, prefix: Prefix) -> Self {
        Route {
            prefix,
            as_path: vec![asn.clone()],
            origin: OriginType::Igp,
            local_pref: 100,
            med: 0,
            next_hop: Some(asn.clone()),
        }
    }

    /// True iff `asn` appears anywhere in the AS path (BGP loop prevention).
    pub fn has_loop(&self, asn: &AsId) -> bool {
        self.as_path.iter().any(|hop| hop == asn)
    }

    /// Equality used by the decision process to decide whether the best
    /// path actually changed. Deliberately ignores `next_hop` and `med`: a
    /// mere peer-path permutation that leaves the observable best path
    /// identical must not cause an unbounded update storm.
    pub fn selection_eq(&self, other: &Route) -> bool {
        self.as_path == other.as_path
            && self.local_pref == other.local_pref
            && self.origin == other.origin
    }

    /// Render the externally-visible form of this route: origin as its
    /// symbolic name, every other field as-is.
    pub fn to_record(&self) -> RouteRecord {
        RouteRecord {
            prefix: self.prefix.clone(),
            as_path: self.as_path.clone(),
            origin: self.origin.name().to_string(),
            local_pref: self.local_pref,
            med: self.med,
            next_hop: self.next_hop.clone(),
        }
    }
}

/// The externally-serialized form of a [`Route`]: identical fields, but
/// `origin` is rendered as its symbolic name rather than the enum variant,
/// matching what an HTTP adapter (out of scope for this crate) would hand
/// back to a caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRecord {
    /// The prefix this route announces reachability for.
    pub prefix: Prefix,
    /// Ordered AS path, leftmost = most recent hop.
    pub as_path: Vec<AsId>,
    /// Symbolic origin name: `"IGP"`, `"EGP"`, or `"INCOMPLETE"`.
    pub origin: String,
    /// Local preference; higher is more preferred.
    pub local_pref: u32,
    /// Multi-exit discriminator; lower is more preferred.
    pub med: u32,
    /// AS identifier of the immediate advertiser.
    pub next_hop: Option<AsId>,
}
