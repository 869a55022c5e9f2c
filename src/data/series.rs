use std::{ops::Range, sync::Arc};

use crate::{
    data::bar::PriceBar,
    error::{DataError, EnvError, GymResult},
};

/// Immutable, index-addressable price history.
///
/// The bars live in a shared `Arc<[PriceBar]>`; a series is a view over a
/// contiguous range of that storage. Sub-ranges produced by [`MarketSeries::split`]
/// and [`MarketSeries::slice`] share the same allocation, so a train/test pair
/// (or any number of environments) can read the same history without copying.
///
/// All indices are relative to the view, not to the underlying storage.
#[derive(Debug, Clone)]
pub struct MarketSeries {
    bars: Arc<[PriceBar]>,
    range: Range<usize>,
}

impl MarketSeries {
    /// Builds a series, validating every bar.
    pub fn from_bars(bars: Vec<PriceBar>) -> GymResult<Self> {
        if bars.is_empty() {
            return Err(DataError::EmptySeries("no bars supplied".to_string()).into());
        }
        bars.iter()
            .enumerate()
            .try_for_each(|(row, bar)| bar.validate(row))?;

        let len = bars.len();
        Ok(Self {
            bars: Arc::from(bars),
            range: 0..len,
        })
    }

    /// Total bar count.
    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars[self.range.clone()]
    }

    pub fn get(&self, index: usize) -> GymResult<&PriceBar> {
        self.bars().get(index).ok_or_else(|| {
            DataError::IndexOutOfRange {
                index,
                len: self.len(),
            }
            .into()
        })
    }

    pub fn close_at(&self, index: usize) -> GymResult<f64> {
        self.get(index).map(|bar| bar.close)
    }

    /// Returns bars `[end - size, end)`.
    ///
    /// Fails if `end < size` or `end > len()`.
    pub fn window(&self, end: usize, size: usize) -> GymResult<&[PriceBar]> {
        if end < size || end > self.len() {
            return Err(DataError::WindowOutOfRange {
                end,
                size,
                len: self.len(),
            }
            .into());
        }
        Ok(&self.bars()[end - size..end])
    }

    /// A sub-view over `range`, sharing this series' storage.
    pub fn slice(&self, range: Range<usize>) -> GymResult<Self> {
        if range.start > range.end || range.end > self.len() {
            return Err(DataError::WindowOutOfRange {
                end: range.end,
                size: range.end.saturating_sub(range.start),
                len: self.len(),
            }
            .into());
        }
        if range.is_empty() {
            return Err(DataError::EmptySeries(format!("empty slice {range:?}")).into());
        }

        let offset = self.range.start;
        Ok(Self {
            bars: Arc::clone(&self.bars),
            range: offset + range.start..offset + range.end,
        })
    }

    /// Splits chronologically into disjoint `(train, test)` views.
    ///
    /// The first `floor(len * train_fraction)` bars form the train part.
    pub fn split(&self, train_fraction: f64) -> GymResult<(Self, Self)> {
        if !train_fraction.is_finite() || train_fraction <= 0.0 || train_fraction >= 1.0 {
            return Err(EnvError::InvalidConfig(format!(
                "train fraction must lie in (0, 1), got {train_fraction}"
            ))
            .into());
        }

        let cut = (self.len() as f64 * train_fraction).floor() as usize;
        let train = self.slice(0..cut)?;
        let test = self.slice(cut..self.len())?;
        Ok((train, test))
    }

    /// Whether both views read from the same allocation.
    pub fn shares_storage_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.bars, &other.bars)
    }
}
