//! Protocol-level event log. Events are logged, never parsed or replayed;
//! BGP messages exist here only as a record of what happened during
//! convergence, not as wire-format packets (see `spec.md` Non-goals).

use serde::{Deserialize, Serialize};

use crate::types::{AsId, Prefix};

/// The kind of protocol-level event recorded in the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    /// A BGP session between two peers was (logically) established.
    Open,
    /// A route was advertised and accepted, changing the recipient's best
    /// path, or an origination/re-origination took place.
    Update,
    /// A route was withdrawn.
    Withdraw,
    /// A full propagation round produced no staged updates.
    Keepalive,
}

/// One entry in the simulation's append-only timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEvent {
    /// The `current_step` counter value when this event was logged.
    pub timestamp: u64,
    /// The kind of event.
    pub event_type: EventType,
    /// The AS this event originated from, if applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_as: Option<AsId>,
    /// The AS this event was directed to, if applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_as: Option<AsId>,
    /// The prefix this event concerns, if applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<Prefix>,
    /// Free-form human-readable detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl TimelineEvent {
    /// Start building an event of `event_type` at `timestamp`, with every
    /// optional field absent. Chain the `with_*` builders to fill in what's
    /// relevant for a particular occurrence.
    pub fn new(timestamp: u64, event_type: EventType) -> Self {
        TimelineEvent {
            timestamp,
            event_type,
            from_as: None,
            to_as: None,
            prefix: None,
            details: None,
        }
    }

    /// Set the AS this event originated from.
    pub fn with_from_as(mut self, from_as: AsId) -> Self {
        self.from_as = Some(from_as);
        self
    }

    /// Set the AS this event was directed to.
    pub fn with_to_as(mut self, to_as: AsId) -> Self {
        self.to_as = Some(to_as);
        self
    }

    /// Set the prefix this event concerns.
    pub fn with_prefix(mut self, prefix: Prefix) -> Self {
        self.prefix = Some(prefix);
        self
    }

    /// Set free-form human-readable detail.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}
