use std::{env, path::Path};

use anyhow::Result;
use rand::{Rng, SeedableRng, rngs::StdRng};
use tickgym::prelude::*;
use tracing_subscriber::EnvFilter;

const SMA_SHORT: usize = 5;
const SMA_LONG: usize = 20;

/// Evaluates a seeded random policy and the crossover policy on a universe of
/// random-walk instruments, writing one summary per policy.
fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_thread_ids(true)
        .init();

    let count: usize = env::args()
        .nth(1)
        .map(|s| s.parse())
        .transpose()?
        .unwrap_or(16);

    let instruments = (0..count)
        .map(|i| random_walk(i as u64, 750).map(|s| Instrument::new(format!("SYM{i:03}"), s)))
        .collect::<GymResult<Vec<_>>>()?;

    let cfg = EnvConfig::default()
        .with_lookback(5)
        .with_trade_penalty_factor(0.01);

    let out = Path::new("demos/reports/random_universe");

    let random = evaluate_instruments(&instruments, cfg, |inst| {
        RandomPolicy::new(inst.symbol.bytes().map(u64::from).sum())
    })?;
    random.to_csv(out.join("random"), None)?;

    let crossover = evaluate_instruments(&instruments, cfg, |_| SmaCrossoverPolicy::default())?;
    crossover.to_csv(out.join("crossover"), None)?;

    println!("\n--- Random Universe ({count} instruments, config {}) ---", cfg.hash()?);
    println!(
        "Random policy beats buy-and-hold on    {:>3} instruments",
        random.agent_wins()
    );
    println!(
        "Crossover policy beats buy-and-hold on {:>3} instruments",
        crossover.agent_wins()
    );
    Ok(())
}

fn random_walk(seed: u64, n: usize) -> GymResult<MarketSeries> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut closes = Vec::with_capacity(n + SMA_LONG);
    let mut price: f64 = 50.0 + rng.random_range(0.0..100.0);
    for _ in 0..n + SMA_LONG {
        price = (price * (1.0 + rng.random_range(-0.02..0.02))).max(1.0);
        closes.push(price);
    }

    let sma = |end: usize, window: usize| closes[end + 1 - window..=end].iter().sum::<f64>() / window as f64;

    let bars = (SMA_LONG - 1..closes.len())
        .map(|i| {
            let close = closes[i];
            let open = closes[i - 1];
            PriceBar {
                open,
                high: open.max(close),
                low: open.min(close),
                close,
                sma_short: sma(i, SMA_SHORT),
                sma_long: sma(i, SMA_LONG),
            }
        })
        .collect();

    MarketSeries::from_bars(bars)
}
