//! Deterministic environment facts consulted by the rules.
mod rng;

pub use rng::{PcgRng, RngOracle, SeedStream, compute_seed};
