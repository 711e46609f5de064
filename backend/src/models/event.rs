//! Event logging for slot-level auditing
//!
//! The engine records one event per significant step of a slot. The log is
//! bounded: once `limit` events are held, the oldest is discarded for each
//! new one.
//!
//! # Event Types
//!
//! - **SlotStarted**: arrivals generated for a slot
//! - **BacklogDrained**: one node's queue retried
//! - **ClockAdvanced**: the clock moved to the next slot
//! - **SimulationReset**: state reinitialized
//!
//! # Example
//!
//! ```rust
//! use network_simulator_core_rs::models::{Event, EventLog};
//!
//! let mut log = EventLog::new(100);
//! log.log(Event::SlotStarted { slot: "08:00".to_string(), arrivals: 200 });
//! assert_eq!(log.events_at_slot("08:00").len(), 1);
//! ```

use crate::models::topology::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Simulation event capturing a state change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Arrivals generated at the start of a slot
    SlotStarted { slot: String, arrivals: usize },

    /// A node's backlog was retried
    BacklogDrained {
        slot: String,
        node: NodeId,
        sent: usize,
        remaining: usize,
    },

    /// Clock moved from one slot label to the next
    ClockAdvanced { from: String, to: String },

    /// Engine state reinitialized
    SimulationReset,
}

impl Event {
    /// Slot label the event belongs to, if any
    pub fn slot(&self) -> Option<&str> {
        match self {
            Event::SlotStarted { slot, .. } | Event::BacklogDrained { slot, .. } => Some(slot.as_str()),
            Event::ClockAdvanced { from, .. } => Some(from.as_str()),
            Event::SimulationReset => None,
        }
    }

    /// Stable event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::SlotStarted { .. } => "SlotStarted",
            Event::BacklogDrained { .. } => "BacklogDrained",
            Event::ClockAdvanced { .. } => "ClockAdvanced",
            Event::SimulationReset => "SimulationReset",
        }
    }

    pub fn node(&self) -> Option<&str> {
        match self {
            Event::BacklogDrained { node, .. } => Some(node.as_str()),
            _ => None,
        }
    }
}

/// Bounded, ordered event log
#[derive(Debug, Clone)]
pub struct EventLog {
    events: VecDeque<Event>,
    limit: usize,
}

impl EventLog {
    /// Create an empty log retaining at most `limit` events (0 disables logging)
    pub fn new(limit: usize) -> Self {
        Self {
            events: VecDeque::new(),
            limit,
        }
    }

    /// Append an event, evicting the oldest when full
    pub fn log(&mut self, event: Event) {
        if self.limit == 0 {
            return;
        }
        while self.events.len() >= self.limit {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// All retained events, oldest first
    pub fn events(&self) -> impl Iterator<Item = &Event> + '_ {
        self.events.iter()
    }

    pub fn events_at_slot(&self, slot: &str) -> Vec<&Event> {
        self.events.iter().filter(|e| e.slot() == Some(slot)).collect()
    }

    pub fn events_of_type(&self, event_type: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    pub fn events_for_node(&self, node: &str) -> Vec<&Event> {
        self.events.iter().filter(|e| e.node() == Some(node)).collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
