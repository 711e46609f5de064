//! Slot clock for the simulation
//!
//! The simulation operates in discrete, labeled slots. The slot sequence is
//! cyclic: advancing past the last label wraps to the first.

use serde::{Deserialize, Serialize};

/// Cyclic sequence of labeled slots with a current position
///
/// # Example
/// ```
/// use network_simulator_core_rs::SlotClock;
///
/// let mut clock = SlotClock::new(vec!["08:00".to_string(), "08:15".to_string()]);
/// assert_eq!(clock.current_slot(), "08:00");
///
/// clock.advance();
/// assert_eq!(clock.current_slot(), "08:15");
///
/// clock.advance();
/// assert_eq!(clock.current_slot(), "08:00");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotClock {
    /// Ordered slot labels
    slots: Vec<String>,
    /// Index of the current slot in `slots`
    current_index: usize,
}

impl SlotClock {
    /// Create a new clock positioned at the first slot
    ///
    /// # Arguments
    /// * `slots` - Ordered, non-empty list of slot labels
    pub fn new(slots: Vec<String>) -> Self {
        assert!(!slots.is_empty(), "slot sequence must not be empty");
        Self {
            slots,
            current_index: 0,
        }
    }

    /// Advance to the next slot, wrapping to the first after the last
    ///
    /// Returns the label of the new current slot.
    pub fn advance(&mut self) -> &str {
        self.current_index = (self.current_index + 1) % self.slots.len();
        &self.slots[self.current_index]
    }

    /// Label of the current slot
    pub fn current_slot(&self) -> &str {
        &self.slots[self.current_index]
    }

    /// Position of the current slot in the sequence (0-indexed)
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Check whether `label` is the current slot
    pub fn is_current(&self, label: &str) -> bool {
        self.current_slot() == label
    }

    /// Return to the first slot
    pub fn reset(&mut self) {
        self.current_index = 0;
    }

    /// Number of slots in one cycle
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// All slot labels in cycle order
    pub fn slots(&self) -> &[String] {
        &self.slots
    }
}
