use indicatif::{ProgressBar, ProgressStyle};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::{
    agent::Policy,
    data::series::MarketSeries,
    error::{EnvError, GymResult},
    gym::trading::{config::EnvConfig, factory::make},
    report::{
        baseline::buy_and_hold,
        summary::{StrategyOutcome, Summary, SummaryRow},
    },
};

/// A named price series.
#[derive(Debug, Clone)]
pub struct Instrument {
    pub symbol: String,
    pub series: MarketSeries,
}

impl Instrument {
    pub fn new(symbol: impl Into<String>, series: MarketSeries) -> Self {
        Self {
            symbol: symbol.into(),
            series,
        }
    }
}

/// Runs one episode of `policy` on `instrument` and compares it with buy-and-hold.
#[tracing::instrument(skip_all, fields(symbol = %instrument.symbol))]
pub fn evaluate_instrument<P: Policy + ?Sized>(
    instrument: &Instrument,
    cfg: EnvConfig,
    policy: &mut P,
) -> GymResult<SummaryRow> {
    let mut env = make(instrument.series.clone(), cfg)?;
    let journal = env.evaluate_policy(policy)?;
    let baseline = buy_and_hold(&instrument.series, &cfg)?;

    Ok(SummaryRow {
        symbol: instrument.symbol.clone(),
        agent: policy.identifier().to_string(),
        agent_outcome: StrategyOutcome::from(&journal),
        buy_and_hold: baseline,
    })
}

/// Evaluates a fresh policy per instrument in parallel.
///
/// `make_policy` is called once per instrument, so stateful policies never
/// leak state across series. The first error aborts the run.
pub fn evaluate_instruments<P, F>(
    instruments: &[Instrument],
    cfg: EnvConfig,
    make_policy: F,
) -> GymResult<Summary>
where
    P: Policy,
    F: Fn(&Instrument) -> P + Sync,
{
    let config_id = cfg.hash()?;
    let pb = progress_bar(instruments.len() as u64)?;
    pb.set_message("Running evaluation...");

    let rows = instruments
        .par_iter()
        .map(|instrument| {
            let mut policy = make_policy(instrument);
            let row = evaluate_instrument(instrument, cfg, &mut policy)?;
            pb.inc(1);
            Ok(row)
        })
        .collect::<GymResult<Vec<_>>>()?;

    pb.finish_with_message("Evaluation complete.");
    Ok(Summary::new(config_id, rows))
}

fn progress_bar(capacity: u64) -> GymResult<ProgressBar> {
    let bar = ProgressBar::new(capacity);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta_precise}) {msg}")
            .map_err(EnvError::ProgressBar)?
            .progress_chars("#>-"));
    Ok(bar)
}
