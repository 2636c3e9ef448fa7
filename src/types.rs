//! Core identifier and attribute types shared by every other module.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An autonomous system identifier.
///
/// The simulator treats this as an opaque token: it is only ever compared,
/// hashed, and ordered lexicographically (the tie-break rule in the decision
/// process, see [`crate::as_node::AsNode`]). Real deployments use numeric AS
/// numbers, but nothing here depends on that, so the identifier is kept as a
/// string the way the topology config names it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AsId(pub String);

impl AsId {
    /// Borrow the identifier as a plain string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AsId {
    fn from(s: &str) -> Self {
        AsId(s.to_string())
    }
}

impl From<String> for AsId {
    fn from(s: String) -> Self {
        AsId(s)
    }
}

/// An IPv4 CIDR prefix, e.g. `10.0.1.0/24`.
///
/// Per the spec this is opaque to the engine: it is compared only for
/// equality (and hashed, for RIB-in/RIB keys). The config-validation layer
/// (see [`crate::config`]) is the only place that actually parses the
/// string as a CIDR, to reject malformed input at the boundary; the engine
/// itself never looks inside it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Prefix(pub String);

impl Prefix {
    /// Borrow the prefix as a plain string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse this prefix as an IPv4 CIDR, for validation purposes only.
    pub fn parse_cidr(&self) -> Result<ipnetwork::Ipv4Network, ipnetwork::IpNetworkError> {
        ipnetwork::Ipv4Network::from_str(&self.0)
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Prefix {
    fn from(s: &str) -> Self {
        Prefix(s.to_string())
    }
}

impl From<String> for Prefix {
    fn from(s: String) -> Self {
        Prefix(s)
    }
}

/// BGP path origin attribute, ordered `Igp < Egp < Incomplete` (lower is
/// more preferred in the decision process).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OriginType {
    /// Learned from an Interior Gateway Protocol (most preferred). Ordinal 0.
    Igp = 0,
    /// Learned from an Exterior Gateway Protocol. Ordinal 1.
    Egp = 1,
    /// Origin unknown (least preferred). Ordinal 2.
    Incomplete = 2,
}

impl OriginType {
    /// The integer ordinal used in the decision process's compound sort key.
    pub fn value(self) -> u8 {
        self as u8
    }

    /// The symbolic name used when serializing a route to its external form.
    pub fn name(self) -> &'static str {
        match self {
            OriginType::Igp => "IGP",
            OriginType::Egp => "EGP",
            OriginType::Incomplete => "INCOMPLETE",
        }
    }
}

impl fmt::Display for OriginType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
