pub use rand_chacha::ChaCha8Rng as SeededRng;

pub fn new_rng(seed: u32) -> SeededRng {
    rand_seeder::Seeder::from(seed).make_rng()
}

/// Mixes a session seed with a per-entity id so that each agent draws from
/// its own stream.
pub fn entity_seed(seed: u32, id: u64) -> u32 {
    seed ^ (id as u32) ^ ((id >> 32) as u32).rotate_left(16)
}
