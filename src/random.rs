//! Seeded random number generation.
//!
//! Every stream in the crate comes from [`create_rng`], so a run is fully
//! determined by its seed. ChaCha8 keeps the stream stable across
//! platforms and `rand` releases.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// The generator type used by the orchestrator.
pub type SaRng = ChaCha8Rng;

/// Creates a deterministic generator from a 64-bit seed.
pub fn create_rng(seed: u64) -> SaRng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Seed of run `run` (1-based) in a session seeded with `master`.
///
/// Independent of run order, so sequential and parallel sessions agree.
pub fn run_seed(master: u64, run: usize) -> u64 {
    master.wrapping_add(run as u64)
}
