//! Random-source plumbing.
//!
//! A game consumes exactly one [`RngCore`] stream and the order of draws is part
//! of the engine's contract, so every random decision goes through the named
//! helpers here. [`DrawSplitter`] derives several decorrelated values from a
//! single caller-visible draw for components that need more than one check
//! per decision.

use crate::constants::{SPLITMIX_GAMMA, SPLITMIX_MUL_A, SPLITMIX_MUL_B, UNIT_SCALE_53};
use crate::numbers::{clamp01, floor_f64_to_usize, u64_to_f64};
use hmac::{Hmac, Mac};
use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use sha2::Sha256;

/// Standard per-game random source.
pub type GameRng = CountingRng<SmallRng>;

/// Wrapper that counts how many draws were taken from the inner generator.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl CountingRng<SmallRng> {
    /// Seed a game stream from a user-facing seed.
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        Self::wrap(SmallRng::seed_from_u64(derive_stream_seed(seed, b"plate-appearance")))
    }
}

impl<R: RngCore> CountingRng<R> {
    /// Wrap an existing generator.
    #[must_use]
    pub const fn wrap(rng: R) -> Self {
        Self { rng, draws: 0 }
    }

    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl<R: RngCore> RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}

/// Seed for the `game_index`-th game of a run, decorrelated from its neighbours.
///
/// Whole games can then be simulated independently (and in parallel) while the
/// run as a whole stays reproducible from one seed.
#[must_use]
pub fn derive_game_seed(run_seed: u64, game_index: u64) -> u64 {
    let mut tag = *b"game:\0\0\0\0\0\0\0\0";
    tag[5..].copy_from_slice(&game_index.to_le_bytes());
    derive_stream_seed(run_seed, &tag)
}

fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()) else {
        return user_seed ^ SPLITMIX_GAMMA;
    };
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0_u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}

/// One draw mapped into the open interval (0, 1).
pub fn unit_draw<R: RngCore + ?Sized>(rng: &mut R) -> f64 {
    safe_sample_ratio(rng.next_u32())
}

fn safe_sample_ratio(sample: u32) -> f64 {
    let denom = f64::from(u32::MAX) + 1.0;
    ((f64::from(sample) + 0.5) / denom).clamp(0.0, 1.0)
}

/// Bernoulli roll against a probability clamped to [0, 1]. Always consumes one draw.
pub fn roll_chance<R: RngCore + ?Sized>(rng: &mut R, probability: f64) -> bool {
    unit_draw(rng) < clamp01(probability)
}

/// Sum of `count` dice with `faces` sides each, one draw per die.
pub fn roll_dice<R: RngCore + ?Sized>(rng: &mut R, count: u32, faces: u32) -> i64 {
    let faces = faces.max(1);
    (0..count)
        .map(|_| {
            let face = floor_f64_to_usize(unit_draw(rng) * f64::from(faces));
            i64::try_from(face).unwrap_or(0).min(i64::from(faces) - 1) + 1
        })
        .sum()
}

/// Pick one entry proportionally to its weight using a single draw.
///
/// Negative weights count as zero; returns `None` (without drawing) when every
/// weight is zero.
pub fn weighted_pick<R, T>(rng: &mut R, entries: &[(T, f64)]) -> Option<T>
where
    R: RngCore + ?Sized,
    T: Copy,
{
    let total: f64 = entries.iter().map(|(_, w)| w.max(0.0)).sum();
    if total <= 0.0 {
        return None;
    }
    let mut target = unit_draw(rng) * total;
    let mut last = None;
    for (item, weight) in entries {
        let weight = weight.max(0.0);
        if weight <= 0.0 {
            continue;
        }
        last = Some(*item);
        if target < weight {
            return Some(*item);
        }
        target -= weight;
    }
    last
}

/// Small-state sub-stream splitter.
///
/// Seeds a splitmix64 sequence from the bits of one caller-visible draw, so a
/// component can run several statistically independent checks (type, location
/// and timing recognition, for instance) without taking extra draws from the
/// game stream. The same draw always yields the same sequence.
#[derive(Debug, Clone)]
pub struct DrawSplitter {
    state: u64,
}

impl DrawSplitter {
    #[must_use]
    pub const fn new(draw: f64) -> Self {
        Self {
            state: draw.to_bits(),
        }
    }

    /// Next decorrelated value in [0, 1).
    pub fn next_unit(&mut self) -> f64 {
        self.state = self.state.wrapping_add(SPLITMIX_GAMMA);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(SPLITMIX_MUL_A);
        z = (z ^ (z >> 27)).wrapping_mul(SPLITMIX_MUL_B);
        z ^= z >> 31;
        u64_to_f64(z >> 11) * UNIT_SCALE_53
    }

    /// Convenience for the common "three checks from one draw" case.
    pub fn triple(&mut self) -> [f64; 3] {
        [self.next_unit(), self.next_unit(), self.next_unit()]
    }
}
