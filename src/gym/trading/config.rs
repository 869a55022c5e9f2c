use serde::{Deserialize, Serialize};

use crate::{
    data::series::MarketSeries,
    error::{EnvError, GymResult, IoError},
    gym::trading::portfolio::MAX_SHARES,
};

// ================================================================================================
// Defaults
// ================================================================================================

pub const DEFAULT_LOOKBACK: usize = 5;
pub const DEFAULT_INITIAL_CASH: f64 = 10_000.0;
pub const DEFAULT_TRADE_PENALTY_FACTOR: f64 = 0.01;
pub const DEFAULT_MIN_TRADE_UNITS: u64 = 1;

/// Configuration blueprint for a trading environment.
///
/// Set once at construction and never mutated by the environment.
///
/// # Parameters
///
/// - `lookback`: number of most recent bars encoded into each observation.
/// - `initial_cash`: cash balance restored by every `reset()`.
/// - `trade_penalty_factor`: reward deduction per share traded.
/// - `min_trade_units`: trades smaller than this many shares are skipped.
///
/// # Example
///
/// ```
/// # use tickgym::prelude::*;
/// let cfg = EnvConfig::default()
///     .with_lookback(2)
///     .with_trade_penalty_factor(0.0);
///
/// assert_eq!(cfg.observation_len(), 14);
/// assert_eq!(cfg.initial_cash(), 10_000.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvConfig {
    lookback: usize,
    initial_cash: f64,
    trade_penalty_factor: f64,
    min_trade_units: u64,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            lookback: DEFAULT_LOOKBACK,
            initial_cash: DEFAULT_INITIAL_CASH,
            trade_penalty_factor: DEFAULT_TRADE_PENALTY_FACTOR,
            min_trade_units: DEFAULT_MIN_TRADE_UNITS,
        }
    }
}

// ================================================================================================
// Builder Methods
// ================================================================================================

impl EnvConfig {
    pub fn with_lookback(self, lookback: usize) -> Self {
        Self { lookback, ..self }
    }

    pub fn with_initial_cash(self, initial_cash: f64) -> Self {
        Self {
            initial_cash,
            ..self
        }
    }

    pub fn with_trade_penalty_factor(self, trade_penalty_factor: f64) -> Self {
        Self {
            trade_penalty_factor,
            ..self
        }
    }

    pub fn with_min_trade_units(self, min_trade_units: u64) -> Self {
        Self {
            min_trade_units,
            ..self
        }
    }
}

// ================================================================================================
// Accessor Methods
// ================================================================================================

impl EnvConfig {
    pub fn lookback(&self) -> usize {
        self.lookback
    }

    pub fn initial_cash(&self) -> f64 {
        self.initial_cash
    }

    pub fn trade_penalty_factor(&self) -> f64 {
        self.trade_penalty_factor
    }

    pub fn min_trade_units(&self) -> u64 {
        self.min_trade_units
    }

    /// Length of every observation vector: 4 OHLC + 2 SMA values per bar, plus cash and shares.
    pub fn observation_len(&self) -> usize {
        6 * self.lookback + 2
    }

    /// Number of `step()` calls in one episode over a series of `series_len` bars.
    pub fn steps_per_episode(&self, series_len: usize) -> usize {
        series_len.saturating_sub(self.lookback + 1)
    }
}

// ================================================================================================
// Validation & Serialization
// ================================================================================================

impl EnvConfig {
    /// Checks the configuration against a series of `series_len` bars.
    ///
    /// The series must hold at least `lookback + 2` bars so that one step can be taken.
    pub fn validate(&self, series_len: usize) -> GymResult<()> {
        if self.lookback == 0 {
            return Err(invalid("lookback must be positive"));
        }
        if !self.initial_cash.is_finite() || self.initial_cash <= 0.0 {
            return Err(invalid(format!(
                "initial cash must be positive and finite, got {}",
                self.initial_cash
            )));
        }
        if !self.trade_penalty_factor.is_finite() || self.trade_penalty_factor < 0.0 {
            return Err(invalid(format!(
                "trade penalty factor must be non-negative and finite, got {}",
                self.trade_penalty_factor
            )));
        }
        if self.min_trade_units == 0 {
            return Err(invalid("min trade units must be positive"));
        }
        if series_len < self.lookback + 2 {
            return Err(invalid(format!(
                "series of {series_len} bars is too short for lookback {} (need at least {})",
                self.lookback,
                self.lookback + 2
            )));
        }
        Ok(())
    }

    /// [`EnvConfig::validate`] plus the checks that need the bars themselves.
    ///
    /// Rejects an initial cash that could buy more than [`MAX_SHARES`] at the
    /// cheapest close, since share counts past that point are not exact.
    pub fn validate_for(&self, series: &MarketSeries) -> GymResult<()> {
        self.validate(series.len())?;

        let min_close = series
            .bars()
            .iter()
            .map(|bar| bar.close)
            .fold(f64::INFINITY, f64::min);
        if self.initial_cash / min_close > MAX_SHARES as f64 {
            return Err(invalid(format!(
                "initial cash {} buys more than {MAX_SHARES} shares at the lowest close {min_close}",
                self.initial_cash
            )));
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> GymResult<Self> {
        serde_json::from_str(json).map_err(|e| IoError::Json(e).into())
    }

    pub fn to_json_string(&self) -> GymResult<String> {
        serde_json::to_string(self).map_err(|e| IoError::Json(e).into())
    }

    /// Computes a deterministic hash of this configuration.
    ///
    /// Used to tag reports with the configuration that produced them.
    pub fn hash(&self) -> GymResult<String> {
        let mut hasher = blake3::Hasher::new();
        let bytes = postcard::to_stdvec(self).map_err(EnvError::Encoding)?;
        hasher.update(&bytes);
        Ok(format!("{}", hasher.finalize()))
    }
}

fn invalid(msg: impl Into<String>) -> crate::error::GymError {
    EnvError::InvalidConfig(msg.into()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{data::bar::PriceBar, error::ErrorKind};

    #[test]
    fn defaults_match_documented_values() {
        let cfg = EnvConfig::default();
        assert_eq!(cfg.lookback(), 5);
        assert_eq!(cfg.initial_cash(), 10_000.0);
        assert_eq!(cfg.trade_penalty_factor(), 0.01);
        assert_eq!(cfg.min_trade_units(), 1);
        assert_eq!(cfg.observation_len(), 32);
    }

    #[test]
    fn validate_rejects_malformed_values() {
        let base = EnvConfig::default();
        let cases = [
            base.with_lookback(0),
            base.with_initial_cash(0.0),
            base.with_initial_cash(f64::NAN),
            base.with_trade_penalty_factor(-0.1),
            base.with_trade_penalty_factor(f64::INFINITY),
            base.with_min_trade_units(0),
        ];
        for cfg in cases {
            let err = cfg.validate(100).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput, "{cfg:?}");
        }
    }

    #[test]
    fn validate_requires_room_for_one_step() {
        let cfg = EnvConfig::default().with_lookback(5);
        assert!(cfg.validate(7).is_ok());
        assert!(cfg.validate(6).is_err());
        assert!(cfg.validate(5).is_err());
        assert_eq!(cfg.steps_per_episode(7), 1);
    }

    #[test]
    fn validate_for_bounds_the_share_count() {
        let series = MarketSeries::from_bars(vec![PriceBar::flat(1.0); 10]).unwrap();
        let sane = EnvConfig::default().with_initial_cash(1e12);
        assert!(sane.validate_for(&series).is_ok());

        let huge = EnvConfig::default().with_initial_cash(1e20);
        let err = huge.validate_for(&series).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        // the length check still applies
        let short = MarketSeries::from_bars(vec![PriceBar::flat(1.0); 3]).unwrap();
        assert!(EnvConfig::default().validate_for(&short).is_err());
    }

    #[test]
    fn json_fills_missing_fields_with_defaults() {
        let cfg = EnvConfig::from_json_str(r#"{"lookback": 3, "min_trade_units": 5}"#).unwrap();
        assert_eq!(cfg.lookback(), 3);
        assert_eq!(cfg.min_trade_units(), 5);
        assert_eq!(cfg.initial_cash(), DEFAULT_INITIAL_CASH);

        let back = EnvConfig::from_json_str(&cfg.to_json_string().unwrap()).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn hash_is_deterministic_and_sensitive() {
        let a = EnvConfig::default();
        assert_eq!(a.hash().unwrap(), a.hash().unwrap());
        assert_ne!(a.hash().unwrap(), a.with_lookback(6).hash().unwrap());
    }
}
