//! A single-asset trading environment for reinforcement-learning agents.
//!
//! An agent observes a fixed-length window of price bars plus its own cash and
//! holdings, answers with a scalar action in `[-1, 1]`, and is rewarded with the
//! change in portfolio value net of a per-share trade penalty.
//!
//! ```no_run
//! use tickgym::prelude::*;
//!
//! # fn main() -> GymResult<()> {
//! let series = MarketSeries::read_csv("data/prices.csv")?;
//! let cfg = EnvConfig::default().with_lookback(10);
//! let mut env = make(series, cfg)?;
//!
//! let journal = env.evaluate_policy(&mut SmaCrossoverPolicy::default())?;
//! println!("profit: {:.2}", journal.profit());
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod data;
pub mod error;
pub mod evaluation;
pub mod gym;
mod macros;
pub mod prelude;
pub mod report;
