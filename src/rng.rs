//! The game's pseudo-random number generator
//!
//! A 32-bit multiplicative linear congruential generator, the classic
//! "Super-Duper" LCG(2^32, 69069, 0). It is intentionally cheap and
//! non-cryptographic: one multiply per draw, and the low bits are
//! discarded by shifting the state right by 8 on output.
//!
//! It implements [`RngCore`]/[`SeedableRng`] so it sits behind the same
//! seam any other deterministic generator would, but the concrete
//! sequence is part of the game's behavior (terrain shape and mine
//! placement replay exactly for a given seed) and must not be swapped.

use rand_core::{RngCore, SeedableRng};

/// Multiplier 3 * 7 * 11 * 13 * 23
const MULTIPLIER: u32 = 69069;

/// "Super-Duper" multiplicative LCG
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuperDuperRng {
    state: u32,
}

impl SuperDuperRng {
    /// Create a generator from a raw 32-bit seed
    ///
    /// A zero seed would lock the generator at zero forever, so it is
    /// mapped to 1.
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    /// Draw the next value: advance the state and expose it shifted
    /// right by 8 bits (the low bits of an LCG are the weakest)
    pub fn next(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(MULTIPLIER);
        self.state >> 8
    }

    /// Draw an 8-bit value (the game's usual Bernoulli-threshold draw)
    pub fn next_byte(&mut self) -> u8 {
        (self.next() & 0xFF) as u8
    }
}

impl RngCore for SuperDuperRng {
    fn next_u32(&mut self) -> u32 {
        self.next()
    }

    fn next_u64(&mut self) -> u64 {
        // Two dependent draws; fine for game use, never for crypto.
        u64::from(self.next()) << 32 | u64::from(self.next())
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let word = self.next().to_le_bytes();
            chunk.copy_from_slice(&word[..chunk.len()]);
        }
    }
}

impl SeedableRng for SuperDuperRng {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }
}
