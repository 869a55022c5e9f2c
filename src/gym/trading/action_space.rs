use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{EnvError, GymResult};

/// Continuous, one-dimensional action space.
///
/// Positive actions buy a fraction of the affordable shares, negative actions
/// sell a fraction of the holdings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActionSpace {
    low: f64,
    high: f64,
}

impl Default for ActionSpace {
    fn default() -> Self {
        Self {
            low: -1.0,
            high: 1.0,
        }
    }
}

impl ActionSpace {
    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn contains(&self, action: f64) -> bool {
        (self.low..=self.high).contains(&action)
    }

    /// Clamps a finite action into the space. Non-finite actions are rejected.
    pub fn clamp(&self, action: f64) -> GymResult<f64> {
        if !action.is_finite() {
            return Err(EnvError::InvalidAction(action).into());
        }
        Ok(action.clamp(self.low, self.high))
    }

    /// Draws a uniformly distributed action.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        rng.random_range(self.low..=self.high)
    }
}
