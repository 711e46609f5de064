//! xorshift64* random number generator
//!
//! Fast, deterministic PRNG with 64-bit state. Same seed yields the same
//! sequence, which keeps traffic generation reproducible across runs and
//! across `reset()`.

use serde::{Deserialize, Serialize};

/// Deterministic random number generator using xorshift64*
///
/// # Example
/// ```
/// use network_simulator_core_rs::RngManager;
///
/// let mut rng = RngManager::new(12345);
/// let idx = rng.pick_index(4); // [0, 4)
/// assert!(idx < 4);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngManager {
    state: u64,
}

impl RngManager {
    /// Create a new RNG with given seed
    ///
    /// A zero seed is mapped to 1 (xorshift state must be non-zero).
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u64 value
    pub fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Generate random value in range [min, max)
    ///
    /// # Panics
    /// Panics if min >= max
    pub fn range(&mut self, min: i64, max: i64) -> i64 {
        assert!(min < max, "min must be less than max");

        let value = self.next();
        let range_size = (max - min) as u64;
        min + (value % range_size) as i64
    }

    /// Pick a uniformly distributed index in [0, len)
    ///
    /// # Panics
    /// Panics if `len` is zero
    pub fn pick_index(&mut self, len: usize) -> usize {
        assert!(len > 0, "cannot pick from an empty range");
        self.range(0, len as i64) as usize
    }

    /// Get current RNG state
    ///
    /// `RngManager::new(state)` resumes the sequence from this point.
    pub fn get_state(&self) -> u64 {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_seed_converted_to_nonzero() {
        let rng = RngManager::new(0);
        assert_ne!(rng.get_state(), 0, "Zero seed should be converted to 1");
    }

    #[test]
    #[should_panic(expected = "min must be less than max")]
    fn test_range_invalid_bounds() {
        let mut rng = RngManager::new(12345);
        rng.range(100, 50);
    }

    #[test]
    #[should_panic(expected = "cannot pick from an empty range")]
    fn test_pick_index_empty() {
        let mut rng = RngManager::new(12345);
        rng.pick_index(0);
    }

    #[test]
    fn test_pick_index_covers_range() {
        let mut rng = RngManager::new(7);
        let mut seen = [false; 4];
        for _ in 0..200 {
            seen[rng.pick_index(4)] = true;
        }
        assert!(seen.iter().all(|s| *s), "every index should be drawn: {:?}", seen);
    }

    #[test]
    fn test_state_resumes_sequence() {
        let mut rng = RngManager::new(99999);
        rng.next();
        let mut resumed = RngManager::new(rng.get_state());
        assert_eq!(rng.next(), resumed.next());
    }
}
