//! Routing Module
//!
//! Shortest-path search and capacity-aware admission control.
//!
//! # Admission Flow
//!
//! ```text
//! packet → PathFinder::shortest_path → CapacityLedger::can_admit → CapacityLedger::reserve
//!                   ↓ (empty path)              ↓ (any hop saturated)
//!              stays queued                stays queued, nothing reserved
//! ```
//!
//! # Critical Invariants
//!
//! - **All-or-nothing**: a path is reserved on every hop or on none
//! - **Capacity bound**: usage never exceeds capacity on any directed link
//! - **Fresh slots**: usage returns to zero at the start of each slot

pub mod ledger;
pub mod path_finder;

pub use ledger::{CapacityLedger, LinkKey};
pub use path_finder::PathFinder;
