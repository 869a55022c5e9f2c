use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    agent::Policy,
    data::series::MarketSeries,
    error::{EnvError, GymResult, IoError},
    gym::{
        EnvStatus, Reward, StepOutcome,
        trading::{
            Env,
            action::TradeDecision,
            action_space::ActionSpace,
            config::EnvConfig,
            observation::{Observation, encode_observation},
            portfolio::PortfolioState,
        },
    },
    report::journal::{Journal, StepRecord},
};

/// Auxiliary data describing the most recent transition.
///
/// Everything needed to recompute the reward independently is published here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepInfo {
    /// Cursor after the step.
    pub cursor: usize,
    /// Action after clamping to the action space.
    pub action: f64,
    pub decision: TradeDecision,
    /// Shares bought or sold; zero for a hold.
    pub traded: u64,
    /// Close at the pre-step cursor; the execution price.
    pub price: f64,
    /// Close used to value the portfolio after the step.
    pub next_price: f64,
    pub prev_value: f64,
    pub new_value: f64,
    pub penalty: f64,
    pub done: bool,
}

impl StepInfo {
    /// The info as a JSON object, for callers expecting a string-keyed map.
    pub fn to_map(&self) -> GymResult<Map<String, Value>> {
        match serde_json::to_value(self).map_err(IoError::Json)? {
            Value::Object(map) => Ok(map),
            _ => Ok(Map::new()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Environment {
    // === Public (configurable) ===
    /// Set at construction and never mutated.
    cfg: EnvConfig,

    action_space: ActionSpace,

    // === Internal only ===
    /// Shared, read-only price history.
    series: MarketSeries,

    portfolio: PortfolioState,

    /// Index of the bar the next trade executes at. Starts at `lookback`.
    cursor: usize,

    env_status: EnvStatus,

    last_info: Option<StepInfo>,
}

impl Environment {
    pub fn config(&self) -> &EnvConfig {
        &self.cfg
    }

    pub fn action_space(&self) -> ActionSpace {
        self.action_space
    }

    pub fn series(&self) -> &MarketSeries {
        &self.series
    }

    pub fn portfolio(&self) -> &PortfolioState {
        &self.portfolio
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn status(&self) -> EnvStatus {
        self.env_status
    }

    /// Info of the last `step()`; `None` right after a reset.
    pub fn info(&self) -> Option<&StepInfo> {
        self.last_info.as_ref()
    }

    /// Terminal-style valuation: `cash + shares_owned * close_at(cursor)`.
    pub fn portfolio_value(&self) -> GymResult<f64> {
        let price = self.series.close_at(self.cursor)?;
        Ok(self.portfolio.value_at(price))
    }

    /// Runs one full episode with `policy` and returns its journal.
    pub fn evaluate_policy<P: Policy + ?Sized>(&mut self, policy: &mut P) -> GymResult<Journal> {
        let mut obs = self.reset()?;
        policy.reset();

        let mut records = Vec::with_capacity(self.cfg.steps_per_episode(self.series.len()));
        loop {
            let action = policy.predict(&obs)?;
            let (next_obs, reward, outcome) = self.step(action)?;
            if let Some(info) = self.last_info {
                records.push(StepRecord::new(&info, reward, &self.portfolio));
            }
            obs = next_obs;
            if outcome.is_done() {
                break;
            }
        }

        let final_value = self.portfolio_value()?;
        tracing::info!(
            policy = %policy.identifier(),
            steps = records.len(),
            final_value,
            "Episode finished"
        );
        Ok(Journal::new(records, self.cfg.initial_cash(), final_value))
    }
}

impl Env for Environment {
    #[tracing::instrument(skip(self), fields(lookback = self.cfg.lookback()))]
    fn reset(&mut self) -> GymResult<Observation> {
        self.restart();
        tracing::debug!(cash = self.portfolio.cash(), "Environment Reset");
        self.observe()
    }

    #[tracing::instrument(skip(self), fields(cursor = self.cursor))]
    fn step(&mut self, action: f64) -> GymResult<(Observation, Reward, StepOutcome)> {
        self.check_step_status()?;
        let action = self.action_space.clamp(action)?;

        let info = transition(&self.series, &self.cfg, &mut self.portfolio, &mut self.cursor, action)?;
        let reward = Reward(info.new_value - info.prev_value - info.penalty);
        let outcome = StepOutcome::from(info.done);

        self.update_env_status(outcome);
        self.last_info = Some(info);

        Ok((self.observe()?, reward, outcome))
    }
}

impl Environment {
    fn restart(&mut self) {
        self.portfolio = PortfolioState::new(self.cfg.initial_cash());
        self.cursor = self.cfg.lookback();
        self.env_status = EnvStatus::Ready;
        self.last_info = None;
    }

    fn observe(&self) -> GymResult<Observation> {
        encode_observation(
            &self.series,
            self.cursor,
            &self.portfolio,
            self.cfg.lookback(),
        )
    }

    fn check_step_status(&self) -> GymResult<()> {
        if self.env_status.can_step() {
            Ok(())
        } else {
            Err(EnvError::InvalidState(
                "Episode is terminated. Call `reset()` before stepping.".to_string(),
            )
            .into())
        }
    }

    fn update_env_status(&mut self, outcome: StepOutcome) {
        self.env_status = if outcome.is_done() {
            tracing::info!(
                cursor = self.cursor,
                cash = self.portfolio.cash(),
                shares_owned = self.portfolio.shares_owned(),
                "Episode terminated"
            );
            EnvStatus::Terminated
        } else {
            EnvStatus::Active
        };
    }
}

/// Pure transition logic: trades at the current bar, then advances the cursor by one.
///
/// On the terminal step there is no later close to read, so the portfolio is
/// valued at the execution price and the last bar's move never shows up in a
/// reward. Terminal valuation through [`Environment::portfolio_value`] does
/// use the last close.
pub(crate) fn transition(
    series: &MarketSeries,
    cfg: &EnvConfig,
    portfolio: &mut PortfolioState,
    cursor: &mut usize,
    action: f64,
) -> GymResult<StepInfo> {
    let price = series.close_at(*cursor)?;
    let prev_value = portfolio.value_at(price);

    let decision = TradeDecision::size(action, portfolio, price, cfg.min_trade_units());
    let traded = portfolio.apply(decision, price);
    if traded > 0 {
        tracing::debug!(?decision, price, cash = portfolio.cash(), "Trade executed");
    } else if action != 0.0 {
        tracing::trace!(action, price, "Trade below minimum size skipped");
    }

    *cursor += 1;
    let done = *cursor >= series.len() - 1;
    let next_price = if done {
        price
    } else {
        series.close_at(*cursor)?
    };

    Ok(StepInfo {
        cursor: *cursor,
        action,
        decision,
        traded,
        price,
        next_price,
        prev_value,
        new_value: portfolio.value_at(next_price),
        penalty: cfg.trade_penalty_factor() * traded as f64,
        done,
    })
}

// ================================================================================================
// Building
// ================================================================================================
impl Environment {
    pub(super) fn new(series: MarketSeries, cfg: EnvConfig) -> Self {
        Self {
            portfolio: PortfolioState::new(cfg.initial_cash()),
            cursor: cfg.lookback(),
            action_space: ActionSpace::default(),
            env_status: EnvStatus::Ready,
            last_info: None,
            series,
            cfg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        agent::constant::ConstantPolicy,
        data::bar::PriceBar,
        error::{ErrorKind, GymError},
        gym::trading::factory::make,
    };

    // ========================================================================
    // Fixtures
    // ========================================================================

    fn series(closes: &[f64]) -> MarketSeries {
        MarketSeries::from_bars(closes.iter().map(|c| PriceBar::flat(*c)).collect()).unwrap()
    }

    fn env(closes: &[f64], cfg: EnvConfig) -> Environment {
        make(series(closes), cfg).unwrap()
    }

    fn flat_cfg() -> EnvConfig {
        EnvConfig::default()
            .with_lookback(2)
            .with_trade_penalty_factor(0.0)
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    #[test]
    fn reset_restores_initial_state() {
        let mut env = env(&[100.0, 101.0, 99.0, 105.0, 110.0, 112.0], flat_cfg());
        let first = env.reset().unwrap();

        env.step(1.0).unwrap();
        env.step(-0.5).unwrap();
        assert!(env.status().is_active());

        let again = env.reset().unwrap();
        assert_eq!(first, again);
        assert_eq!(env.cursor(), 2);
        assert_eq!(env.portfolio().cash(), 10_000.0);
        assert_eq!(env.portfolio().shares_owned(), 0);
        assert!(env.status().is_ready());
        assert!(env.info().is_none());
    }

    #[test]
    fn stepping_a_terminated_env_is_invalid_state() {
        let mut env = env(&[10.0, 10.0, 10.0, 10.0], flat_cfg());
        env.reset().unwrap();
        let (_, _, outcome) = env.step(0.0).unwrap();
        assert!(outcome.is_done());
        assert!(env.status().is_terminated());

        let err = env.step(0.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);

        env.reset().unwrap();
        assert!(env.step(0.0).is_ok());
    }

    #[test]
    fn non_finite_action_is_rejected_without_side_effects() {
        let mut env = env(&[10.0; 6], flat_cfg());
        env.reset().unwrap();
        let err = env.step(f64::NAN).unwrap_err();
        assert!(matches!(err, GymError::Env(EnvError::InvalidAction(_))));
        assert_eq!(env.cursor(), 2);
        assert!(env.status().is_ready());
    }

    #[test]
    fn episode_length_matches_series() {
        let closes = [10.0; 9];
        let cfg = flat_cfg().with_lookback(3);
        let mut env = env(&closes, cfg);
        env.reset().unwrap();

        let mut steps = 0;
        loop {
            steps += 1;
            let (_, _, outcome) = env.step(0.0).unwrap();
            if outcome.is_done() {
                break;
            }
        }
        assert_eq!(steps, closes.len() - 3 - 1);
        assert_eq!(env.cursor(), closes.len() - 1);
    }

    // ========================================================================
    // Rewards
    // ========================================================================

    #[test]
    fn reward_tracks_price_move_minus_penalty() {
        let cfg = EnvConfig::default()
            .with_lookback(1)
            .with_initial_cash(1_000.0)
            .with_trade_penalty_factor(0.5);
        let mut env = env(&[10.0, 10.0, 12.0, 11.0, 11.0], cfg);
        env.reset().unwrap();

        // buy 100 @ 10, valued @ 12
        let (_, reward, _) = env.step(1.0).unwrap();
        assert_eq!(reward, Reward(1_200.0 - 1_000.0 - 50.0));

        // hold, 12 -> 11
        let (_, reward, _) = env.step(0.0).unwrap();
        assert_eq!(reward, Reward(-100.0));

        // terminal step: sell everything @ 11, valued at the same price
        let (obs, reward, outcome) = env.step(-1.0).unwrap();
        assert!(outcome.is_done());
        assert_eq!(reward, Reward(-50.0));
        assert_eq!(obs.cash(), 1_100.0);
        assert_eq!(obs.shares_owned(), 0.0);
    }

    #[test]
    fn terminal_step_values_at_execution_price() {
        let cfg = EnvConfig::default()
            .with_lookback(1)
            .with_initial_cash(100.0)
            .with_trade_penalty_factor(0.0);
        let mut env = env(&[10.0, 10.0, 50.0], cfg);
        env.reset().unwrap();

        let (_, reward, outcome) = env.step(1.0).unwrap();
        assert!(outcome.is_done());
        assert_eq!(reward, Reward(0.0));
        let info = env.info().unwrap();
        assert_eq!(info.next_price, info.price);

        // the valuation after the episode still sees the last close
        assert_eq!(env.portfolio_value().unwrap(), 500.0);
    }

    #[test]
    fn info_map_exposes_transition_fields() {
        let mut env = env(&[5.0; 6], flat_cfg());
        env.reset().unwrap();
        env.step(0.5).unwrap();

        let map = env.info().unwrap().to_map().unwrap();
        assert_eq!(map["traded"], Value::from(1_000));
        assert_eq!(map["done"], Value::from(false));
        assert_eq!(map["cursor"], Value::from(3));
    }

    // ========================================================================
    // Policy evaluation
    // ========================================================================

    #[test]
    fn evaluate_policy_journals_every_step() {
        let mut env = env(&[100.0, 100.0, 100.0, 120.0, 120.0, 120.0], flat_cfg());
        let journal = env.evaluate_policy(&mut ConstantPolicy::new(1.0)).unwrap();

        assert_eq!(journal.records().len(), 3);
        assert_eq!(journal.records()[0].traded, 100);
        assert_eq!(journal.total_reward(), Reward(2_000.0));
        assert_eq!(journal.final_value(), 12_000.0);
        assert_eq!(journal.profit(), 2_000.0);
    }
}
