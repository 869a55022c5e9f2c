use serde::{Deserialize, Serialize};

use crate::gym::trading::action::TradeDecision;

/// Largest holding the portfolio will ever reach (2^53).
///
/// Share counts above this are no longer exact as `f64`, so sizing caps buys
/// here and `shares_owned + units` can never overflow.
pub const MAX_SHARES: u64 = 1 << 53;

/// Cash balance and share holdings of a single environment.
///
/// Only the environment's step logic mutates it. No margin and no shorting:
/// `cash >= 0` and `shares_owned >= 0` hold after every executed trade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortfolioState {
    cash: f64,
    shares_owned: u64,
}

impl PortfolioState {
    pub fn new(cash: f64) -> Self {
        Self {
            cash,
            shares_owned: 0,
        }
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn shares_owned(&self) -> u64 {
        self.shares_owned
    }

    /// `cash + shares_owned * price`.
    pub fn value_at(&self, price: f64) -> f64 {
        self.cash + self.shares_owned as f64 * price
    }

    /// Whole shares the current cash can pay for at `price`, capped so the
    /// holding stays within [`MAX_SHARES`].
    pub fn affordable_units(&self, price: f64) -> u64 {
        let room = MAX_SHARES.saturating_sub(self.shares_owned);
        let units = (self.cash / price).floor().min(room as f64) as u64;
        // floor(cash / price) can round up across an integer boundary
        if units > 0 && units as f64 * price > self.cash {
            units - 1
        } else {
            units
        }
    }

    /// Executes `decision` at `price` and returns the number of shares traded.
    pub(crate) fn apply(&mut self, decision: TradeDecision, price: f64) -> u64 {
        match decision {
            TradeDecision::Buy(units) => {
                debug_assert!(units <= self.affordable_units(price));
                self.cash -= units as f64 * price;
                self.shares_owned += units;
                units
            }
            TradeDecision::Sell(units) => {
                debug_assert!(units <= self.shares_owned);
                self.cash += units as f64 * price;
                self.shares_owned -= units;
                units
            }
            TradeDecision::Hold => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buy_then_sell_round_trips_cash() {
        let mut p = PortfolioState::new(10_000.0);
        assert_eq!(p.apply(TradeDecision::Buy(100), 100.0), 100);
        assert_eq!(p.cash(), 0.0);
        assert_eq!(p.shares_owned(), 100);
        assert_eq!(p.value_at(101.0), 10_100.0);

        assert_eq!(p.apply(TradeDecision::Sell(40), 110.0), 40);
        assert_eq!(p.cash(), 4_400.0);
        assert_eq!(p.shares_owned(), 60);
    }

    #[test]
    fn hold_changes_nothing() {
        let mut p = PortfolioState::new(500.0);
        assert_eq!(p.apply(TradeDecision::Hold, 3.0), 0);
        assert_eq!(p, PortfolioState::new(500.0));
    }

    #[test]
    fn affordable_units_never_overspend() {
        let p = PortfolioState::new(0.3);
        let price = 0.1;
        let units = p.affordable_units(price);
        assert!(units as f64 * price <= p.cash());
        assert!(units >= 2);

        assert_eq!(PortfolioState::new(99.99).affordable_units(100.0), 0);
        assert_eq!(PortfolioState::new(10_000.0).affordable_units(100.0), 100);
    }

    #[test]
    fn huge_cash_is_capped_at_max_shares() {
        let mut p = PortfolioState::new(1e20);
        let units = p.affordable_units(1.0);
        assert_eq!(units, MAX_SHARES);
        assert_eq!(p.apply(TradeDecision::Buy(units), 1.0), MAX_SHARES);

        // no room left, a second full buy is a no-op instead of an overflow
        assert_eq!(p.affordable_units(1.0), 0);
        assert_eq!(p.apply(TradeDecision::Buy(p.affordable_units(1.0)), 1.0), 0);
        assert_eq!(p.shares_owned(), MAX_SHARES);
    }
}
