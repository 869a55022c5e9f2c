use ndarray::{Array1, ArrayView1};

use crate::{
    data::series::MarketSeries,
    error::{EnvError, GymResult},
    gym::trading::portfolio::PortfolioState,
};

/// Fixed-length state vector handed to a policy.
///
/// # Layout (for a lookback of `L`)
///
/// ```md
/// Range           | Content
/// ----------------|---------------------------------------------------
/// [0, 4L)         | open, high, low, close of each bar, oldest first
/// [4L, 5L)        | sma_short of each bar, oldest first
/// [5L, 6L)        | sma_long of each bar, oldest first
/// 6L              | cash
/// 6L + 1          | shares owned
/// ```
///
/// Only [`encode_observation`] builds one, and it requires `L >= 1`, so the
/// latest-bar accessors always have a bar to read.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation(Array1<f64>);

impl Observation {
    pub fn as_array(&self) -> ArrayView1<'_, f64> {
        self.0.view()
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.0.to_vec()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }

    pub fn lookback(&self) -> usize {
        self.len().saturating_sub(2) / 6
    }

    pub fn cash(&self) -> f64 {
        self.0[6 * self.lookback()]
    }

    pub fn shares_owned(&self) -> f64 {
        self.0[6 * self.lookback() + 1]
    }

    /// Close of the most recent bar in the window.
    pub fn latest_close(&self) -> f64 {
        self.0[4 * self.lookback() - 1]
    }

    /// `(sma_short, sma_long)` of the most recent bar in the window.
    pub fn latest_sma(&self) -> (f64, f64) {
        let l = self.lookback();
        (self.0[5 * l - 1], self.0[6 * l - 1])
    }
}

impl From<Observation> for Vec<f64> {
    fn from(obs: Observation) -> Self {
        obs.0.to_vec()
    }
}

/// Encodes the window `[cursor - lookback, cursor)` and the portfolio.
///
/// A zero `lookback` is `EnvError::InvalidConfig`; a window outside the series
/// is a range error.
pub fn encode_observation(
    series: &MarketSeries,
    cursor: usize,
    portfolio: &PortfolioState,
    lookback: usize,
) -> GymResult<Observation> {
    if lookback == 0 {
        return Err(EnvError::InvalidConfig("lookback must be positive".to_string()).into());
    }
    let window = series.window(cursor, lookback)?;

    let mut values = Vec::with_capacity(6 * lookback + 2);
    values.extend(window.iter().flat_map(|bar| bar.ohlc()));
    values.extend(window.iter().map(|bar| bar.sma_short));
    values.extend(window.iter().map(|bar| bar.sma_long));
    values.push(portfolio.cash());
    values.push(portfolio.shares_owned() as f64);

    Ok(Observation(Array1::from_vec(values)))
}


#[cfg(test)]
pub(crate) mod tests_support {
    use super::*;
    use crate::data::bar::PriceBar;

    /// Observation over flat bars at 100 with a fresh 10k portfolio.
    pub(crate) fn observation(lookback: usize) -> Observation {
        with_sma(lookback, 100.0, 100.0)
    }

    /// Observation whose latest bar carries the given moving averages.
    pub(crate) fn with_sma(lookback: usize, sma_short: f64, sma_long: f64) -> Observation {
        let mut bars = vec![PriceBar::flat(100.0); lookback];
        if let Some(last) = bars.last_mut() {
            last.sma_short = sma_short;
            last.sma_long = sma_long;
        }
        let series = MarketSeries::from_bars(bars).unwrap();
        encode_observation(&series, lookback, &PortfolioState::new(10_000.0), lookback).unwrap()
    }
}
