use std::{path::Path, sync::Arc};

use itertools::izip;
use polars::{
    df,
    frame::DataFrame,
    prelude::{
        DataType, Field, LazyCsvReader, LazyFileListReader, PlPath, PlSmallStr, Schema, SchemaRef,
    },
};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::{
    data::{bar::PriceBar, series::MarketSeries},
    error::{DataError, GymResult, IoError},
};

/// Canonical column names of an indicator-annotated bar table.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    PartialOrd,
    Ord,
    EnumIter,
    EnumCount,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum BarCol {
    Open,
    High,
    Low,
    Close,
    /// Trailing SMA of close over the short period (5 bars upstream).
    SmaShort,
    /// Trailing SMA of close over the long period (20 bars upstream).
    SmaLong,
}

impl From<BarCol> for PlSmallStr {
    fn from(value: BarCol) -> Self {
        value.as_str().into()
    }
}

impl BarCol {
    pub fn name(&self) -> PlSmallStr {
        (*self).into()
    }

    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    pub fn to_schema() -> SchemaRef {
        let fields: Vec<Field> = Self::iter()
            .map(|col| Field::new(col.into(), DataType::Float64))
            .collect();
        Arc::new(Schema::from_iter(fields))
    }
}

impl MarketSeries {
    /// Reads a CSV bar table with a header row naming the [`BarCol`] columns.
    pub fn read_csv(path: impl AsRef<Path>) -> GymResult<Self> {
        let path = path.as_ref();
        let uri = path.to_str().ok_or_else(|| {
            IoError::FileSystem(format!(
                "Path contains invalid UTF-8 characters: {}",
                path.display()
            ))
        })?;

        let df = LazyCsvReader::new(PlPath::new(uri))
            .with_has_header(true)
            .finish()
            .map_err(|e| DataError::DataFrame(format!("Failed to scan '{uri}': {e}")))?
            .collect()
            .map_err(|e| DataError::DataFrame(format!("Failed to read '{uri}': {e}")))?;

        Self::from_df(&df)
    }

    /// Converts a bar table into a series.
    ///
    /// Rows with a null or NaN in any canonical column (the indicator warm-up
    /// rows) are dropped. Extra columns are ignored.
    pub fn from_df(df: &DataFrame) -> GymResult<Self> {
        let open = f64_column(df, BarCol::Open)?;
        let high = f64_column(df, BarCol::High)?;
        let low = f64_column(df, BarCol::Low)?;
        let close = f64_column(df, BarCol::Close)?;
        let sma_short = f64_column(df, BarCol::SmaShort)?;
        let sma_long = f64_column(df, BarCol::SmaLong)?;

        let bars: Vec<PriceBar> = izip!(open, high, low, close, sma_short, sma_long)
            .filter_map(|(open, high, low, close, sma_short, sma_long)| {
                let bar = PriceBar {
                    open: open?,
                    high: high?,
                    low: low?,
                    close: close?,
                    sma_short: sma_short?,
                    sma_long: sma_long?,
                };
                (!has_nan(&bar)).then_some(bar)
            })
            .collect();

        let dropped = df.height() - bars.len();
        if dropped > 0 {
            tracing::debug!(dropped, kept = bars.len(), "Dropped incomplete bar rows");
        }

        Self::from_bars(bars)
    }

    /// The series as a bar table with the canonical schema.
    pub fn to_df(&self) -> GymResult<DataFrame> {
        let bars = self.bars();
        df!(
            BarCol::Open.as_str() => bars.iter().map(|b| b.open).collect::<Vec<_>>(),
            BarCol::High.as_str() => bars.iter().map(|b| b.high).collect::<Vec<_>>(),
            BarCol::Low.as_str() => bars.iter().map(|b| b.low).collect::<Vec<_>>(),
            BarCol::Close.as_str() => bars.iter().map(|b| b.close).collect::<Vec<_>>(),
            BarCol::SmaShort.as_str() => bars.iter().map(|b| b.sma_short).collect::<Vec<_>>(),
            BarCol::SmaLong.as_str() => bars.iter().map(|b| b.sma_long).collect::<Vec<_>>(),
        )
        .map_err(|e| DataError::DataFrame(e.to_string()).into())
    }
}

fn has_nan(bar: &PriceBar) -> bool {
    bar.ohlc()
        .into_iter()
        .chain([bar.sma_short, bar.sma_long])
        .any(f64::is_nan)
}

fn f64_column(df: &DataFrame, col: BarCol) -> GymResult<Vec<Option<f64>>> {
    let column = df
        .column(col.as_str())
        .map_err(|_| DataError::MissingColumn(col.to_string()))?;
    let casted = column
        .cast(&DataType::Float64)
        .map_err(|e| DataError::DataFrame(format!("Column `{col}` is not numeric: {e}")))?;
    let values = casted
        .f64()
        .map_err(|e| DataError::DataFrame(e.to_string()))?
        .into_iter()
        .collect();
    Ok(values)
}
