use crate::{
    data::series::MarketSeries,
    error::GymResult,
    gym::trading::{action::TradeDecision, config::EnvConfig, portfolio::PortfolioState},
    report::summary::StrategyOutcome,
};

/// Buy as many whole shares as the initial cash affords at the first tradable
/// close (`close_at(lookback)`) and value the position at the last close.
///
/// This is what a policy that always answers `1.0` would end with under a zero
/// trade penalty, so it is the natural yardstick for any learned policy.
pub fn buy_and_hold(series: &MarketSeries, cfg: &EnvConfig) -> GymResult<StrategyOutcome> {
    cfg.validate_for(series)?;

    let entry = series.close_at(cfg.lookback())?;
    let exit = series.close_at(series.len() - 1)?;

    let mut portfolio = PortfolioState::new(cfg.initial_cash());
    let units = portfolio.affordable_units(entry);
    if units >= cfg.min_trade_units() {
        portfolio.apply(TradeDecision::Buy(units), entry);
    }

    Ok(StrategyOutcome::new(cfg.initial_cash(), portfolio.value_at(exit)))
}
