use serde::{Deserialize, Serialize};

use crate::{
    agent::{Policy, PolicyIdentifier},
    error::{GymResult, PolicyError},
    gym::trading::observation::Observation,
};

// ================================================================================================
// Precomputed SMA Crossover
// ================================================================================================

/// Trades the crossover of the precomputed short and long moving averages.
///
/// Reads the latest bar's SMAs straight from the observation:
/// - short above long (golden cross): buy with `strength` of the affordable cash
/// - short below long (death cross): sell `strength` of the holdings
/// - equal: hold
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmaCrossoverPolicy {
    strength: f64,
}

impl Default for SmaCrossoverPolicy {
    fn default() -> Self {
        Self { strength: 1.0 }
    }
}

impl SmaCrossoverPolicy {
    /// `strength` must lie in `(0, 1]`.
    pub fn with_strength(strength: f64) -> GymResult<Self> {
        if !(strength > 0.0 && strength <= 1.0) {
            return Err(PolicyError::InvalidInput(format!(
                "crossover strength must lie in (0, 1], got {strength}"
            ))
            .into());
        }
        Ok(Self { strength })
    }
}

impl Policy for SmaCrossoverPolicy {
    fn identifier(&self) -> PolicyIdentifier {
        PolicyIdentifier::named("SmaCrossover")
    }

    fn predict(&mut self, obs: &Observation) -> GymResult<f64> {
        let (fast, slow) = obs.latest_sma();
        let action = if fast > slow {
            self.strength
        } else if fast < slow {
            -self.strength
        } else {
            0.0
        };
        Ok(action)
    }
}
