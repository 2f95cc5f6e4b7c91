//! Injected randomness seam
//!
//! Core logic never calls a global random source directly. Hang-up draws
//! and canned-line selection go through `RngSource`, so tests can inject a
//! seeded generator and force deterministic outcomes.

use parking_lot::Mutex;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of uniform randomness for core decisions
pub trait RngSource: Send + Sync {
    /// Uniform draw in [0.0, 1.0)
    fn next_f64(&self) -> f64;

    /// Uniform index in [0, len). `len` must be non-zero.
    fn pick_index(&self, len: usize) -> usize;
}

/// Seedable deterministic source (ChaCha8)
pub struct SeededRng {
    inner: Mutex<ChaCha8Rng>,
}

impl SeededRng {
    pub fn seed_from_u64(seed: u64) -> Self {
        Self {
            inner: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }
}

impl RngSource for SeededRng {
    fn next_f64(&self) -> f64 {
        self.inner.lock().gen::<f64>()
    }

    fn pick_index(&self, len: usize) -> usize {
        debug_assert!(len > 0, "pick_index on empty range");
        self.inner.lock().gen_range(0..len)
    }
}

/// OS-entropy-backed source for production use
pub struct SystemRng {
    inner: Mutex<ChaCha8Rng>,
}

impl SystemRng {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(ChaCha8Rng::from_rng(rand::thread_rng()).unwrap_or_else(|_| {
                // from_rng on thread_rng cannot realistically fail; fall back
                // to an entropy-derived seed if it somehow does.
                ChaCha8Rng::from_entropy()
            })),
        }
    }
}

impl Default for SystemRng {
    fn default() -> Self {
        Self::new()
    }
}

impl RngSource for SystemRng {
    fn next_f64(&self) -> f64 {
        self.inner.lock().gen::<f64>()
    }

    fn pick_index(&self, len: usize) -> usize {
        debug_assert!(len > 0, "pick_index on empty range");
        self.inner.lock().gen_range(0..len)
    }
}

/// Fixed-sequence source for tests that need exact control
pub struct ScriptedRng {
    values: Mutex<Vec<f64>>,
}

impl ScriptedRng {
    /// Values are returned in order; once exhausted, 0.99 is returned
    /// (which never trips a probability check).
    pub fn new(values: Vec<f64>) -> Self {
        let mut v = values;
        v.reverse();
        Self {
            values: Mutex::new(v),
        }
    }
}

impl RngSource for ScriptedRng {
    fn next_f64(&self) -> f64 {
        self.values.lock().pop().unwrap_or(0.99)
    }

    fn pick_index(&self, len: usize) -> usize {
        debug_assert!(len > 0, "pick_index on empty range");
        (self.next_f64() * len as f64) as usize % len
    }
}
