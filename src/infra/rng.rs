use rand::Rng;

use crate::engine::RandomSource;

/// Системный RNG для реальных матчей.
#[derive(Clone, Debug, Default)]
pub struct SystemRng;

impl RandomSource for SystemRng {
    fn coin_flip(&mut self) -> bool {
        rand::thread_rng().gen_bool(0.5)
    }
}

/// Детерминированный RNG для тестов и CLI.
/// Позволяет воспроизводить один и тот же жребий при одинаковом seed.
#[derive(Clone, Debug)]
pub struct DeterministicRng {
    inner: rand::rngs::StdRng,
}

impl DeterministicRng {
    pub fn from_seed(seed: u64) -> Self {
        use rand::SeedableRng;
        Self {
            inner: rand::rngs::StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for DeterministicRng {
    fn coin_flip(&mut self) -> bool {
        self.inner.gen_bool(0.5)
    }
}
