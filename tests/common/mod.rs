#![allow(dead_code)]

use tickgym::prelude::*;

// ================================================================================================
// Fixtures
// ================================================================================================

/// `n` bars with every price field at `close`.
pub fn flat_series(n: usize, close: f64) -> MarketSeries {
    MarketSeries::from_bars(vec![PriceBar::flat(close); n]).expect("valid flat series")
}

/// Closes following `closes`, with a cheap trailing mean standing in for the SMAs.
pub fn series_from_closes(closes: &[f64]) -> MarketSeries {
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let mean = |w: usize| {
                let from = i.saturating_sub(w - 1);
                let window = &closes[from..=i];
                window.iter().sum::<f64>() / window.len() as f64
            };
            PriceBar {
                open: close,
                high: close * 1.01,
                low: close * 0.99,
                close,
                sma_short: mean(3),
                sma_long: mean(6),
            }
        })
        .collect();
    MarketSeries::from_bars(bars).expect("valid series")
}

/// A deterministic zig-zag around `base`.
pub fn zigzag_series(n: usize, base: f64) -> MarketSeries {
    let closes: Vec<f64> = (0..n)
        .map(|i| base + ((i * 7) % 11) as f64 - 5.0)
        .collect();
    series_from_closes(&closes)
}

pub fn cfg(lookback: usize, cash: f64, penalty: f64) -> EnvConfig {
    EnvConfig::default()
        .with_lookback(lookback)
        .with_initial_cash(cash)
        .with_trade_penalty_factor(penalty)
}

/// Steps `env` through `actions` until the episode ends, returning every transition.
pub fn replay(
    env: &mut Environment,
    actions: &[f64],
) -> GymResult<Vec<(Observation, Reward, StepOutcome)>> {
    env.reset()?;
    let mut out = Vec::new();
    for &action in actions {
        let step = env.step(action)?;
        let done = step.2.is_done();
        out.push(step);
        if done {
            break;
        }
    }
    Ok(out)
}
