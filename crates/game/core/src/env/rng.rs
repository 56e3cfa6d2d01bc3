//! Seeded randomness for world generation and wild attacks.
//!
//! Every random draw is a pure function of `(game_seed, nonce, actor, context)`,
//! so replaying the same intents over the same seed reproduces the same world.

/// Stateless random oracle keyed by a 64-bit seed.
pub trait RngOracle: Send + Sync {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Random value in `[min, max]` inclusive.
    fn range_i32(&self, seed: u64, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        let span = max.abs_diff(min) + 1;
        min + (self.next_u32(seed) % span) as i32
    }

    /// Random index in `[0, len)`. Returns 0 for empty ranges.
    fn index(&self, seed: u64, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.next_u32(seed) as usize % len
    }
}

/// PCG-XSH-RR generator: 64-bit LCG state, 32-bit permuted output.
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        Self::pcg_output(Self::pcg_step(seed))
    }
}

/// Mixes the game seed with the action nonce, the acting entity, and a
/// per-draw context into one seed.
///
/// Use distinct `context` values when one action needs several independent
/// draws (e.g. `0` for x and `1` for y of a wild attack cell).
pub fn compute_seed(game_seed: u64, nonce: u64, actor_id: u32, context: u32) -> u64 {
    let mut hash = game_seed;
    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (actor_id as u64).wrapping_mul(0x517cc1b727220a95);
    hash ^= (context as u64).wrapping_mul(0x85ebca6b);

    // avalanche
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;
    hash
}

/// Sequential draws for one purpose (for example world generation), each
/// keyed by an incrementing context.
#[derive(Clone, Debug)]
pub struct SeedStream {
    game_seed: u64,
    nonce: u64,
    actor_id: u32,
    context: u32,
}

impl SeedStream {
    pub fn new(game_seed: u64, nonce: u64, actor_id: u32) -> Self {
        Self {
            game_seed,
            nonce,
            actor_id,
            context: 0,
        }
    }

    fn next_seed(&mut self) -> u64 {
        let seed = compute_seed(self.game_seed, self.nonce, self.actor_id, self.context);
        self.context = self.context.wrapping_add(1);
        seed
    }

    pub fn range_i32(&mut self, min: i32, max: i32) -> i32 {
        let seed = self.next_seed();
        PcgRng.range_i32(seed, min, max)
    }

    pub fn index(&mut self, len: usize) -> usize {
        let seed = self.next_seed();
        PcgRng.index(seed, len)
    }
}
