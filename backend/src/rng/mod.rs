//! Deterministic random number generation
//!
//! Destination selection for generated packets draws from this module only,
//! so a seed fully determines a run.

mod xorshift;

pub use xorshift::RngManager;
