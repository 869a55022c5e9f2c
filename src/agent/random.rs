use rand::{SeedableRng, rngs::StdRng};
use serde::Serialize;

use crate::{
    agent::{Policy, PolicyIdentifier},
    error::GymResult,
    gym::trading::{action_space::ActionSpace, observation::Observation},
};

/// Samples actions uniformly from the action space.
///
/// Seeded, so an episode replays identically after [`Policy::reset`].
#[derive(Debug, Clone, Serialize)]
pub struct RandomPolicy {
    seed: u64,
    #[serde(skip)]
    space: ActionSpace,
    #[serde(skip)]
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            space: ActionSpace::default(),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn identifier(&self) -> PolicyIdentifier {
        PolicyIdentifier::Random
    }

    fn reset(&mut self) {
        self.rng = StdRng::seed_from_u64(self.seed);
    }

    fn predict(&mut self, _obs: &Observation) -> GymResult<f64> {
        Ok(self.space.sample(&mut self.rng))
    }
}
