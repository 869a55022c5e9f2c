use std::sync::Arc;

use polars::{
    df,
    frame::DataFrame,
    prelude::{DataType, Field, PlSmallStr, Schema, SchemaRef},
};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::{
    error::{DataError, GymResult},
    gym::{
        Reward,
        trading::{action::TradeSide, env::StepInfo, portfolio::PortfolioState},
    },
    report::io::{Report, ReportName, ToSchema},
};

/// Columns of the per-step episode journal.
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
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum JournalCol {
    /// Cursor after the step.
    Cursor,
    /// Clamped action.
    Action,
    /// `buy`, `sell` or `hold`.
    Side,
    /// Shares traded in the step.
    Traded,
    /// Execution price.
    Price,
    Reward,
    Cash,
    SharesOwned,
    /// Portfolio value used for the reward (`new_value`).
    Value,
}

impl From<JournalCol> for PlSmallStr {
    fn from(value: JournalCol) -> Self {
        value.as_str().into()
    }
}

impl JournalCol {
    pub fn name(&self) -> PlSmallStr {
        (*self).into()
    }

    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

/// One row of the journal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub cursor: usize,
    pub action: f64,
    pub side: TradeSide,
    pub traded: u64,
    pub price: f64,
    pub reward: f64,
    pub cash: f64,
    pub shares_owned: u64,
    pub value: f64,
}

impl StepRecord {
    pub(crate) fn new(info: &StepInfo, reward: Reward, portfolio: &PortfolioState) -> Self {
        Self {
            cursor: info.cursor,
            action: info.action,
            side: info.decision.side(),
            traded: info.traded,
            price: info.price,
            reward: reward.0,
            cash: portfolio.cash(),
            shares_owned: portfolio.shares_owned(),
            value: info.new_value,
        }
    }
}

/// Step-by-step record of one episode plus its terminal valuation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Journal {
    records: Vec<StepRecord>,
    initial_value: f64,
    /// `cash + shares_owned * close` at the final cursor.
    final_value: f64,
}

impl Journal {
    pub fn new(records: Vec<StepRecord>, initial_value: f64, final_value: f64) -> Self {
        Self {
            records,
            initial_value,
            final_value,
        }
    }

    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    pub fn rewards(&self) -> Vec<Reward> {
        self.records.iter().map(|r| Reward(r.reward)).collect()
    }

    pub fn total_reward(&self) -> Reward {
        self.records.iter().map(|r| Reward(r.reward)).sum()
    }

    pub fn total_traded(&self) -> u64 {
        self.records.iter().map(|r| r.traded).sum()
    }

    pub fn initial_value(&self) -> f64 {
        self.initial_value
    }

    pub fn final_value(&self) -> f64 {
        self.final_value
    }

    pub fn profit(&self) -> f64 {
        self.final_value - self.initial_value
    }

    /// Profit relative to the initial value.
    pub fn roi(&self) -> f64 {
        self.profit() / self.initial_value
    }
}

impl ReportName for Journal {
    fn base_name(&self) -> String {
        "journal".to_string()
    }
}

impl ToSchema for Journal {
    fn to_schema() -> SchemaRef {
        let fields: Vec<Field> = JournalCol::iter()
            .map(|col| {
                let dtype = match col {
                    JournalCol::Cursor | JournalCol::Traded | JournalCol::SharesOwned => {
                        DataType::UInt64
                    }
                    JournalCol::Side => DataType::String,
                    JournalCol::Action
                    | JournalCol::Price
                    | JournalCol::Reward
                    | JournalCol::Cash
                    | JournalCol::Value => DataType::Float64,
                };
                Field::new(col.into(), dtype)
            })
            .collect();

        Arc::new(Schema::from_iter(fields))
    }
}

impl Report for Journal {
    fn as_df(&self) -> GymResult<DataFrame> {
        let r = &self.records;
        df!(
            JournalCol::Cursor.as_str() => r.iter().map(|x| x.cursor as u64).collect::<Vec<_>>(),
            JournalCol::Action.as_str() => r.iter().map(|x| x.action).collect::<Vec<_>>(),
            JournalCol::Side.as_str() => r.iter().map(|x| x.side.to_string()).collect::<Vec<_>>(),
            JournalCol::Traded.as_str() => r.iter().map(|x| x.traded).collect::<Vec<_>>(),
            JournalCol::Price.as_str() => r.iter().map(|x| x.price).collect::<Vec<_>>(),
            JournalCol::Reward.as_str() => r.iter().map(|x| x.reward).collect::<Vec<_>>(),
            JournalCol::Cash.as_str() => r.iter().map(|x| x.cash).collect::<Vec<_>>(),
            JournalCol::SharesOwned.as_str() => r.iter().map(|x| x.shares_owned).collect::<Vec<_>>(),
            JournalCol::Value.as_str() => r.iter().map(|x| x.value).collect::<Vec<_>>(),
        )
        .map_err(|e| DataError::DataFrame(e.to_string()).into())
    }
}

#[cfg(test)]
mod tests {
    use polars::prelude::{LazyCsvReader, LazyFileListReader, PlPath};

    use super::*;
    use crate::report::io::{ToCsv, ToJson};

    fn record(cursor: usize, side: TradeSide, traded: u64, reward: f64) -> StepRecord {
        StepRecord {
            cursor,
            action: 0.0,
            side,
            traded,
            price: 10.0,
            reward,
            cash: 100.0,
            shares_owned: 0,
            value: 100.0,
        }
    }

    fn journal() -> Journal {
        Journal::new(
            vec![
                record(3, TradeSide::Buy, 5, 1.5),
                record(4, TradeSide::Hold, 0, -0.5),
                record(5, TradeSide::Sell, 5, 2.0),
            ],
            1_000.0,
            1_250.0,
        )
    }

    #[test]
    fn aggregates() {
        let j = journal();
        assert_eq!(j.total_reward(), Reward(3.0));
        assert_eq!(j.total_traded(), 10);
        assert_eq!(j.profit(), 250.0);
        assert_eq!(j.roi(), 0.25);
        assert_eq!(j.rewards().len(), 3);
    }

    #[test]
    fn dataframe_matches_schema() {
        let df = journal().as_df().unwrap();
        assert_eq!(df.height(), 3);

        let schema = df.schema();
        for (name, expected_dtype) in Journal::to_schema().iter() {
            assert_eq!(
                schema.get(name),
                Some(expected_dtype),
                "Type mismatch for column '{name}'"
            );
        }
    }

    #[test]
    fn json_rows_carry_column_names() {
        let json = journal().to_json().unwrap();
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0]["side"], "buy");
        assert_eq!(rows[2]["traded"], 5);
    }

    #[test]
    fn csv_round_trip() {
        let dir = std::env::temp_dir().join("tickgym-journal-test");
        let path = journal().to_csv(&dir, Some(b';')).unwrap();
        assert!(path.ends_with("journal.csv"));

        let df = LazyCsvReader::new(PlPath::new(path.to_str().unwrap()))
            .with_has_header(true)
            .with_separator(b';')
            .finish()
            .unwrap()
            .collect()
            .unwrap();
        assert_eq!(df.height(), 3);
        assert_eq!(df.get_column_names().len(), 9);
    }
}
