use serde::{Deserialize, Serialize};

use crate::error::{DataError, GymResult};

/// One period of price history plus its precomputed trailing moving averages.
///
/// Bars arrive fully formed from the preprocessing step: the short and long
/// simple moving averages of `close` are never recomputed here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub sma_short: f64,
    pub sma_long: f64,
}

impl PriceBar {
    /// A bar where every price and indicator equals `price`.
    pub fn flat(price: f64) -> Self {
        Self {
            open: price,
            high: price,
            low: price,
            close: price,
            sma_short: price,
            sma_long: price,
        }
    }

    pub fn ohlc(&self) -> [f64; 4] {
        [self.open, self.high, self.low, self.close]
    }

    /// Checks the bar is usable by the simulation.
    ///
    /// All fields must be finite and non-negative; `close` must be strictly
    /// positive since trade sizing divides by it.
    pub(crate) fn validate(&self, row: usize) -> GymResult<()> {
        let fields = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
            ("sma_short", self.sma_short),
            ("sma_long", self.sma_long),
        ];

        if let Some((name, value)) = fields.iter().find(|(_, v)| !v.is_finite() || *v < 0.0) {
            return Err(DataError::InvalidBar {
                row,
                msg: format!("`{name}` must be finite and non-negative, got {value}"),
            }
            .into());
        }

        if self.close <= 0.0 {
            return Err(DataError::InvalidBar {
                row,
                msg: format!("`close` must be positive, got {}", self.close),
            }
            .into());
        }

        Ok(())
    }
}
