pub mod constant;
pub mod crossover;
pub mod random;

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use strum::{Display, EnumString};

use crate::{error::GymResult, gym::trading::observation::Observation};

/// Represents the unique identifier of a policy, used for tracking results in reports.
#[derive(
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Display,
    Default,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumString,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PolicyIdentifier {
    /// A custom user-defined policy.
    #[strum(to_string = "{0}")]
    Named(Arc<String>),

    #[default]
    Random,
}

impl PolicyIdentifier {
    pub fn named(name: &str) -> Self {
        Self::Named(Arc::new(name.to_string()))
    }
}

/// Maps an observation to a trading action.
///
/// The environment clamps whatever is returned into `[-1, 1]`; implementations
/// only need to return a finite number. Any decision-maker fits behind this
/// trait, from a fixed rule to a trained model.
pub trait Policy {
    /// Decide on an action for the current observation.
    fn predict(&mut self, obs: &Observation) -> GymResult<f64>;

    /// Optional policy name for logging/debugging.
    fn identifier(&self) -> PolicyIdentifier {
        PolicyIdentifier::named("UnnamedPolicy: override Policy::identifier()")
    }

    /// Reset internal state at the start of an episode. Default is no-op.
    fn reset(&mut self) {}
}

impl Policy for Box<dyn Policy> {
    fn predict(&mut self, obs: &Observation) -> GymResult<f64> {
        (**self).predict(obs)
    }

    fn identifier(&self) -> PolicyIdentifier {
        (**self).identifier()
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}

impl Policy for Box<dyn Policy + Send> {
    fn predict(&mut self, obs: &Observation) -> GymResult<f64> {
        (**self).predict(obs)
    }

    fn identifier(&self) -> PolicyIdentifier {
        (**self).identifier()
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::constant::ConstantPolicy;

    #[test]
    fn identifiers_display_their_name() {
        assert_eq!(PolicyIdentifier::named("Crossover").to_string(), "Crossover");
        assert_eq!(PolicyIdentifier::Random.to_string(), "RANDOM");
    }

    #[test]
    fn boxed_policies_forward() {
        let mut boxed: Box<dyn Policy> = Box::new(ConstantPolicy::new(0.25));
        let obs = crate::gym::trading::observation::tests_support::observation(2);
        assert_eq!(boxed.predict(&obs).unwrap(), 0.25);
        assert_eq!(boxed.identifier(), ConstantPolicy::new(0.25).identifier());
    }
}
