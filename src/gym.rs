use serde::{Deserialize, Serialize};

use crate::{impl_add_sub_primitive, impl_from_primitive, impl_neg_primitive};

pub mod trading;

/// Represents a per-step reward in currency units.
///
/// The value is the change in portfolio valuation over one step minus the
/// trade penalty, computed in plain `f64` arithmetic so a reward can be
/// reproduced exactly from the published cash/holdings/price figures.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Reward(pub f64);
impl_from_primitive!(Reward, f64);
impl_add_sub_primitive!(Reward, f64);
impl_neg_primitive!(Reward, f64);

/// Represents the lifecycle status of the trading environment.
///
/// # Lifecycle
///
/// The environment follows a finite state machine (FSM) with the following valid transitions.
/// Other transitions return an error.
///
/// ```md
/// Current State                  | Action  | Next State | Notes
/// -------------------------------|---------|------------|----------------------------------------
/// `Ready` / `Active`             | step()  | Active     | Continue within episode
/// `Ready` / `Active` (last bar)  | step()  | Terminated | Cursor reached the last usable index
/// `Terminated`                   | step()  | error      | `EnvError::InvalidState`
/// any                            | reset() | Ready      | Portfolio and cursor re-initialized
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EnvStatus {
    /// Freshly reset, no step taken yet.
    #[default]
    Ready,

    /// At least one step has been taken and the episode is still running.
    Active,

    /// The cursor has reached the last usable index.
    ///
    /// A call to `reset()` is required before stepping again.
    Terminated,
}

impl EnvStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self, Self::Terminated)
    }

    pub fn can_step(&self) -> bool {
        !self.is_terminated()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepOutcome {
    InProgress,
    /// end of data
    Done,
}

impl StepOutcome {
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

impl From<bool> for StepOutcome {
    fn from(done: bool) -> Self {
        if done { Self::Done } else { Self::InProgress }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewards_sum() {
        let total: Reward = [Reward(1.5), Reward(-0.5), Reward(2.0)].into_iter().sum();
        assert_eq!(total, Reward(3.0));
        assert_eq!(-Reward(2.0), Reward(-2.0));
        assert_eq!(f64::from(Reward(4.0) - Reward(1.0)), 3.0);
    }

    #[test]
    fn status_transitions_are_queryable() {
        assert!(EnvStatus::default().is_ready());
        assert!(EnvStatus::Active.can_step());
        assert!(!EnvStatus::Terminated.can_step());
        assert!(StepOutcome::from(true).is_done());
        assert!(!StepOutcome::from(false).is_done());
    }
}
