use serde::{Deserialize, Serialize};

use crate::{
    agent::{Policy, PolicyIdentifier},
    error::GymResult,
    gym::trading::observation::Observation,
};

/// Returns the same action on every step.
///
/// `ConstantPolicy::new(0.0)` is the do-nothing policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConstantPolicy {
    action: f64,
}

impl ConstantPolicy {
    pub fn new(action: f64) -> Self {
        Self { action }
    }
}

impl Policy for ConstantPolicy {
    fn identifier(&self) -> PolicyIdentifier {
        PolicyIdentifier::named("Constant")
    }

    fn predict(&mut self, _obs: &Observation) -> GymResult<f64> {
        Ok(self.action)
    }
}
