use crate::{
    data::series::MarketSeries,
    error::GymResult,
    gym::trading::{config::EnvConfig, env::Environment},
};

/// Builds a trading environment over `series`.
///
/// Fails with `EnvError::InvalidConfig` when the configuration is malformed or
/// the series is too short for the configured lookback.
#[tracing::instrument(skip(series, cfg), fields(bars = series.len(), hash = tracing::field::Empty))]
pub fn make(series: MarketSeries, cfg: EnvConfig) -> GymResult<Environment> {
    cfg.validate_for(&series)?;

    let hash = cfg.hash()?;
    tracing::Span::current().record("hash", &hash);

    tracing::debug!(lookback = cfg.lookback(), "Environment built");
    Ok(Environment::new(series, cfg))
}

/// Builds a train/test environment pair over disjoint sub-ranges of `series`.
///
/// Both environments read the same underlying bars.
pub fn make_split(
    series: &MarketSeries,
    cfg: EnvConfig,
    train_fraction: f64,
) -> GymResult<(Environment, Environment)> {
    let (train, test) = series.split(train_fraction)?;
    Ok((make(train, cfg)?, make(test, cfg)?))
}
