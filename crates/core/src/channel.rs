//! Noisy channel simulator for line chips.
//!
//! Models the wire between line encoder and line decoder in a deterministic
//! way using seeded randomness. All channel effects are reproducible given the
//! same seed.
//!
//! # Simulated Effects
//!
//! - **Chip flips**: each chip is inverted independently with probability
//!   `flip_rate` (binary symmetric channel)
//! - **Truncation**: the last `truncate_chips` chips never arrive
//!
//! A single flip inside a Manchester pair turns `10`/`01` into `11`/`00` and
//! is always detected. Two flips in the same pair swap `10` and `01` and go
//! unnoticed.
//!
//! # Determinism
//!
//! All randomness comes from a seeded ChaCha8 RNG. Given the same seed
//! and inputs, outputs are bit-identical.

use crate::error::{Error, Result};
use crate::line::ManchesterSequence;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Configuration for channel simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelConfig {
    /// Per-chip flip probability [0.0, 1.0]
    pub flip_rate: f64,

    /// Number of chips lost from the end of every transmission
    pub truncate_chips: usize,

    /// Random seed for determinism
    pub seed: u64,
}

impl ChannelConfig {
    /// Create a configuration with no impairments (perfect channel).
    pub fn perfect(seed: u64) -> Self {
        Self {
            flip_rate: 0.0,
            truncate_chips: 0,
            seed,
        }
    }

    /// Create a channel that only flips chips.
    pub fn noisy(flip_rate: f64, seed: u64) -> Self {
        Self {
            flip_rate,
            truncate_chips: 0,
            seed,
        }
    }

    /// Check that the flip rate is a probability.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.flip_rate) {
            return Err(Error::Config(format!(
                "flip rate must be within [0, 1], got {}",
                self.flip_rate
            )));
        }
        Ok(())
    }

    pub fn is_perfect(&self) -> bool {
        self.flip_rate == 0.0 && self.truncate_chips == 0
    }
}

/// Channel simulator implementing chip flips and truncation.
///
/// # Thread Safety
/// Not thread-safe; use one instance per thread or synchronize externally.
pub struct NoisyChannel {
    config: ChannelConfig,
    rng: ChaCha8Rng,

    // Statistics
    chips_sent: u64,
    chips_flipped: u64,
    chips_truncated: u64,
}

impl NoisyChannel {
    /// Create a new channel simulator with the given configuration.
    ///
    /// # Errors
    /// Returns `Error::Config` if the flip rate is not a probability.
    pub fn new(config: ChannelConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            chips_sent: 0,
            chips_flipped: 0,
            chips_truncated: 0,
        })
    }

    /// Send chips through the simulated channel and return what arrives.
    pub fn transmit(&mut self, chips: &ManchesterSequence) -> ManchesterSequence {
        self.chips_sent += chips.len() as u64;

        let keep = chips.len().saturating_sub(self.config.truncate_chips);
        self.chips_truncated += (chips.len() - keep) as u64;

        let mut flipped = 0u64;
        let mut received = Vec::with_capacity(keep);
        for &chip in &chips.as_slice()[..keep] {
            if self.config.flip_rate > 0.0 && self.rng.gen_bool(self.config.flip_rate) {
                flipped += 1;
                received.push(chip.flipped());
            } else {
                received.push(chip);
            }
        }
        self.chips_flipped += flipped;

        if !self.config.is_perfect() {
            log::debug!(
                "channel: {} chips in, {} flipped, {} truncated",
                chips.len(),
                flipped,
                chips.len() - keep
            );
        }

        ManchesterSequence::from(received)
    }

    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    /// Get statistics about channel behavior.
    pub fn stats(&self) -> ChannelStats {
        ChannelStats {
            chips_sent: self.chips_sent,
            chips_flipped: self.chips_flipped,
            chips_truncated: self.chips_truncated,
        }
    }
}

/// Statistics about channel simulator behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelStats {
    /// Total chips sent into the channel
    pub chips_sent: u64,

    /// Chips inverted in transit
    pub chips_flipped: u64,

    /// Chips lost to truncation
    pub chips_truncated: u64,
}

impl ChannelStats {
    /// Observed flip rate over delivered chips.
    pub fn flip_rate(&self) -> f64 {
        let delivered = self.chips_sent - self.chips_truncated;
        if delivered == 0 {
            0.0
        } else {
            self.chips_flipped as f64 / delivered as f64
        }
    }
}
