//! Serial number source.
//!
//! Serials only need to be unique within this authority, not unpredictable, so
//! a seeded `StdRng` is enough. The source is owned by whoever issues
//! certificates and needs `&mut` access; callers sharing one across threads
//! must put it behind their own lock.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Pseudo-random generator of positive 63-bit certificate serial numbers.
#[derive(Debug, Clone)]
pub struct SerialSource {
    rng: StdRng,
}

impl SerialSource {
    /// Seeds the generator once from the current time.
    pub fn from_time() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        Self::from_seed(nanos)
    }

    /// Seeds the generator with a fixed value, giving a repeatable sequence.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Returns the next serial as minimal big-endian bytes.
    pub fn next_serial(&mut self) -> Vec<u8> {
        let value = (self.rng.random::<u64>() >> 1).max(1);
        let bytes = value.to_be_bytes();
        let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len() - 1);
        bytes[start..].to_vec()
    }
}

impl Default for SerialSource {
    fn default() -> Self {
        Self::from_time()
    }
}
