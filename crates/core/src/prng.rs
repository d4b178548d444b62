//! Seedable Xorshift64 generator used for random seed placement.
//!
//! Headless renders must be reproducible, so the default seed distribution
//! draws from this generator rather than from an ambient OS source.

use serde::{Deserialize, Serialize};

use crate::vector::Vector;

/// Xorshift64 with the (13, 7, 17) shift triple.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    /// Replaces a zero seed, which would lock the generator at zero.
    const FALLBACK_SEED: u64 = 0x0DE5_EED5_F1E1_D5A1;

    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { Self::FALLBACK_SEED } else { seed },
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Uniform in `[0, 1)` from the top 53 bits.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform point in the canvas rectangle `width × height`.
    pub fn next_point(&mut self, width: f64, height: f64) -> Vector {
        let x = self.next_f64() * width;
        let y = self.next_f64() * height;
        Vector::new(x, y)
    }
}
