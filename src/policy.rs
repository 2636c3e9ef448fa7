//! Per-AS import and export policy.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::route::Route;
use crate::types::{AsId, Prefix};

/// Action taken by an export filter entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterAction {
    /// Suppress export of a matching prefix.
    Deny,
    /// Explicitly allow export of a matching prefix (the default when no
    /// filter matches, so this variant exists mainly so config authors can
    /// be explicit about an allow-listed entry).
    Permit,
}

/// One entry in a policy's ordered export filter list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportFilter {
    /// Whether this entry denies or explicitly permits `prefix`.
    pub action: FilterAction,
    /// The prefix this filter entry matches.
    pub prefix: Prefix,
}

/// A per-AS BGP routing policy: local-pref assignment on import, prefix
/// deny filters and AS-path prepending on export.
///
/// A default `Policy` has empty maps and zero prepend: import is identity,
/// export is identity except for the standard one-hop prepend
/// [`crate::as_node::AsNode`] performs itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    /// Neighbor AS -> local-pref to assign on import from that neighbor.
    #[serde(default)]
    pub local_pref_map: IndexMap<AsId, u32>,
    /// Ordered export filters; first matching prefix wins.
    #[serde(default)]
    pub export_filters: Vec<ExportFilter>,
    /// Extra copies of the exporter's own AS identifier to prepend on
    /// export, in addition to the standard one-hop prepend. Must be 0..=10.
    #[serde(default)]
    pub as_path_prepend: u8,
}

impl Policy {
    /// Apply this policy's import rules to a route learned from `from_asn`.
    ///
    /// Returns a clone with `local_pref` overwritten if `from_asn` has an
    /// entry in `local_pref_map`; otherwise the route's own `local_pref` is
    /// left untouched. Import never filters a route.
    pub fn apply_import(&self, route: &Route, from_asn: &AsId) -> Route {
        let mut modified = route.clone();
        if let Some(&local_pref) = self.local_pref_map.get(from_asn) {
            modified.local_pref = local_pref;
        }
        modified
    }

    /// Apply this policy's export rules for a route headed to `to_asn`,
    /// already carrying `exporter`'s own hop at the front of the AS path.
    ///
    /// Scans `export_filters` in order; a matching `Deny` suppresses the
    /// route entirely (`None`). Otherwise returns a clone with
    /// `as_path_prepend` additional copies of `exporter` inserted at the
    /// front, on top of the one hop already added for the normal traversal.
    pub fn apply_export(&self, route: &Route, exporter: &AsId, _to_asn: &AsId) -> Option<Route> {
        for filter in &self.export_filters {
            if filter.action == FilterAction::Deny && filter.prefix == route.prefix {
                return None;
            }
        }

        let mut modified = route.clone();
        for _ in 0..self.as_path_prepend {
            modified.as_path.insert(0, exporter.clone());
        }
        Some(modified)
    }
}
