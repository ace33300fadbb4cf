use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::SeedableRng;
use std::collections::BTreeSet;

/// Picks the next fact to ask about
pub trait QuestionPolicy {
    /// A member of `candidates`, or `None` when it is empty
    fn choose(&mut self, candidates: &BTreeSet<String>) -> Option<String>;
}

/// Uniformly random choice. Seed it for reproducible sessions.
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl Default for RandomPolicy {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl QuestionPolicy for RandomPolicy {
    fn choose(&mut self, candidates: &BTreeSet<String>) -> Option<String> {
        candidates.iter().choose(&mut self.rng).cloned()
    }
}

/// Always the smallest label
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstPolicy;

impl QuestionPolicy for FirstPolicy {
    fn choose(&mut self, candidates: &BTreeSet<String>) -> Option<String> {
        candidates.iter().next().cloned()
    }
}
