use crate::{
    error::GymResult,
    gym::{Reward, StepOutcome, trading::observation::Observation},
};

pub mod action;
pub mod action_space;
pub mod config;
pub mod env;
pub mod factory;
pub mod observation;
pub mod portfolio;

pub trait Env {
    fn reset(&mut self) -> GymResult<Observation>;
    fn step(&mut self, action: f64) -> GymResult<(Observation, Reward, StepOutcome)>;
}
