use std::{env, fs, path::Path, time::Instant};

use anyhow::{Context, Result};
use tickgym::prelude::*;
use time::macros::format_description;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const SMA_SHORT: usize = 5;
const SMA_LONG: usize = 20;

fn main() -> Result<()> {
    let _guard = init_tracing()?;

    // Optional CSV with open, high, low, close, sma_short, sma_long columns.
    let series = match env::args().nth(1) {
        Some(path) => MarketSeries::read_csv(&path)
            .with_context(|| format!("Failed to load price history from {path}"))?,
        None => synthetic_series(500)?,
    };

    let cfg = EnvConfig::default().with_lookback(10);
    let (mut train, mut test) = make_split(&series, cfg, 0.8)?;

    let mut policy = SmaCrossoverPolicy::with_strength(0.5)?;
    let start = Instant::now();
    let train_journal = train.evaluate_policy(&mut policy)?;
    let test_journal = test.evaluate_policy(&mut policy)?;
    let elapsed = start.elapsed();

    let baseline = buy_and_hold(test.series(), &cfg)?;

    let path = Path::new("demos/reports/sma_crossover");
    test_journal.to_csv(path, None)?;

    println!("\n--- SMA Crossover ---");
    println!("Train profit:           {:>12.2}", train_journal.profit());
    println!("Test profit:            {:>12.2}", test_journal.profit());
    println!("Test ROI:               {:>11.2}%", test_journal.roi() * 100.0);
    println!("Buy-and-hold test ROI:  {:>11.2}%", baseline.roi * 100.0);
    println!("Shares traded (test):   {:>12}", test_journal.total_traded());
    println!("Evaluation time:        {elapsed:?}");

    drop(_guard);
    Ok(())
}

// ================================================================================================
// Tracing Configuration
// ================================================================================================

fn init_tracing() -> Result<Option<WorkerGuard>> {
    let app_name = "tickgym";

    let in_container =
        env::var("CONTAINER").is_ok() || std::path::Path::new("/.dockerenv").exists();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if in_container {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_current_span(true)
            .with_thread_ids(true)
            .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
            .init();

        info!("Logging to stdout (container mode)");
        Ok(None)
    } else {
        let log_dir = dirs::state_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".local/state")))
            .context("Failed to find a state directory")?
            .join(app_name)
            .join("logs");
        fs::create_dir_all(&log_dir)?;

        let timestamp = time::OffsetDateTime::now_utc()
            .format(&format_description!(
                "[year][month][day]-[hour][minute][second]"
            ))
            .context("Failed to format timestamp")?;
        let file_name = format!("{app_name}-sma-crossover-{timestamp}.log");

        let file_appender = tracing_appender::rolling::never(&log_dir, &file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(non_blocking)
            .with_current_span(true)
            .with_thread_ids(true)
            .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
            .init();

        info!(log_file = %log_dir.join(file_name).display(), "Logging to file (local mode)");
        Ok(Some(guard))
    }
}

// ================================================================================================
// Helper Functions
// ================================================================================================

/// A trending sine wave with trailing SMAs, warm-up rows dropped.
fn synthetic_series(n: usize) -> Result<MarketSeries> {
    let closes: Vec<f64> = (0..n + SMA_LONG)
        .map(|i| {
            let t = i as f64;
            100.0 + 0.05 * t + 8.0 * (t / 15.0).sin()
        })
        .collect();

    let sma = |end: usize, window: usize| closes[end + 1 - window..=end].iter().sum::<f64>() / window as f64;

    let bars = (SMA_LONG - 1..closes.len())
        .map(|i| {
            let close = closes[i];
            let open = closes[i - 1];
            PriceBar {
                open,
                high: open.max(close) + 0.25,
                low: open.min(close) - 0.25,
                close,
                sma_short: sma(i, SMA_SHORT),
                sma_long: sma(i, SMA_LONG),
            }
        })
        .collect();

    Ok(MarketSeries::from_bars(bars)?)
}
