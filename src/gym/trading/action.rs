use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

use crate::gym::trading::portfolio::PortfolioState;

/// The portfolio change implied by one (already clamped) action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeDecision {
    Buy(u64),
    Sell(u64),
    Hold,
}

/// Direction of a [`TradeDecision`], as reported in journals.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum TradeSide {
    Buy,
    Sell,
    Hold,
}

impl TradeDecision {
    /// Sizes a trade for `action` in `[-1, 1]`.
    ///
    /// - `action > 0` buys `floor(action * floor(cash / price))` shares.
    /// - `action < 0` sells `floor(|action| * shares_owned)` shares.
    ///
    /// Sizes below `min_trade_units` become [`TradeDecision::Hold`]; fractional
    /// actions are never turned into partial trades.
    pub fn size(action: f64, portfolio: &PortfolioState, price: f64, min_trade_units: u64) -> Self {
        let decision = if action > 0.0 {
            let max_affordable = portfolio.affordable_units(price);
            Self::Buy((action * max_affordable as f64).floor() as u64)
        } else if action < 0.0 {
            let held = portfolio.shares_owned();
            Self::Sell(((action.abs() * held as f64).floor() as u64).min(held))
        } else {
            Self::Hold
        };

        if decision.units() >= min_trade_units {
            decision
        } else {
            Self::Hold
        }
    }

    pub fn units(&self) -> u64 {
        match self {
            Self::Buy(units) | Self::Sell(units) => *units,
            Self::Hold => 0,
        }
    }

    pub fn side(&self) -> TradeSide {
        match self {
            Self::Buy(_) => TradeSide::Buy,
            Self::Sell(_) => TradeSide::Sell,
            Self::Hold => TradeSide::Hold,
        }
    }

    pub fn is_hold(&self) -> bool {
        matches!(self, Self::Hold)
    }
}
