use std::sync::Arc;

use polars::{
    df,
    frame::DataFrame,
    prelude::{DataType, Field, PlSmallStr, Schema, SchemaRef},
};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::{
    error::{DataError, GymResult},
    report::{
        io::{Report, ReportName, ToSchema},
        journal::Journal,
    },
};

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
pub enum SummaryCol {
    Symbol,
    Agent,
    AgentValue,
    AgentProfit,
    AgentRoi,
    BuyAndHoldValue,
    BuyAndHoldProfit,
    BuyAndHoldRoi,
    ConfigId,
}

impl From<SummaryCol> for PlSmallStr {
    fn from(value: SummaryCol) -> Self {
        value.as_str().into()
    }
}

impl SummaryCol {
    pub fn name(&self) -> PlSmallStr {
        (*self).into()
    }

    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

// ================================================================================================
// Outcomes
// ================================================================================================

/// Terminal valuation of one strategy over one series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategyOutcome {
    pub absolute_value: f64,
    pub profit: f64,
    /// `profit / initial_value`, as a fraction.
    pub roi: f64,
}

impl StrategyOutcome {
    pub fn new(initial_value: f64, final_value: f64) -> Self {
        let profit = final_value - initial_value;
        Self {
            absolute_value: final_value,
            profit,
            roi: profit / initial_value,
        }
    }

    /// `true` if `self` ends strictly above `other`.
    pub fn beats(&self, other: &Self) -> bool {
        self.absolute_value > other.absolute_value
    }
}

impl From<&Journal> for StrategyOutcome {
    fn from(journal: &Journal) -> Self {
        Self::new(journal.initial_value(), journal.final_value())
    }
}

/// Policy versus buy-and-hold on a single instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub symbol: String,
    pub agent: String,
    pub agent_outcome: StrategyOutcome,
    pub buy_and_hold: StrategyOutcome,
}

// ================================================================================================
// Summary Report
// ================================================================================================

/// Cross-instrument comparison of a policy against the buy-and-hold baseline.
///
/// | symbol | agent        | agent_value | agent_profit | agent_roi | buy_and_hold_value | ... | config_id |
/// |--------|--------------|-------------|--------------|-----------|--------------------|-----|-----------|
/// | AAA    | SmaCrossover | 10412.0     | 412.0        | 0.0412    | 10150.0            | ... | 9f2c...   |
///
/// Rows are kept sorted by symbol so reports are stable across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    config_id: String,
    rows: Vec<SummaryRow>,
}

impl Summary {
    pub fn new(config_id: impl Into<String>, mut rows: Vec<SummaryRow>) -> Self {
        rows.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        Self {
            config_id: config_id.into(),
            rows,
        }
    }

    pub fn config_id(&self) -> &str {
        &self.config_id
    }

    pub fn rows(&self) -> &[SummaryRow] {
        &self.rows
    }

    pub fn get(&self, symbol: &str) -> Option<&SummaryRow> {
        self.rows.iter().find(|r| r.symbol == symbol)
    }

    /// Number of instruments on which the policy ended above buy-and-hold.
    pub fn agent_wins(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| r.agent_outcome.beats(&r.buy_and_hold))
            .count()
    }
}

impl ReportName for Summary {
    fn base_name(&self) -> String {
        "summary".to_string()
    }
}

impl ToSchema for Summary {
    fn to_schema() -> SchemaRef {
        let fields: Vec<Field> = SummaryCol::iter()
            .map(|col| {
                let dtype = match col {
                    SummaryCol::Symbol | SummaryCol::Agent | SummaryCol::ConfigId => {
                        DataType::String
                    }
                    _ => DataType::Float64,
                };
                Field::new(col.into(), dtype)
            })
            .collect();

        Arc::new(Schema::from_iter(fields))
    }
}

impl Report for Summary {
    fn as_df(&self) -> GymResult<DataFrame> {
        let r = &self.rows;
        df!(
            SummaryCol::Symbol.as_str() => r.iter().map(|x| x.symbol.as_str()).collect::<Vec<_>>(),
            SummaryCol::Agent.as_str() => r.iter().map(|x| x.agent.as_str()).collect::<Vec<_>>(),
            SummaryCol::AgentValue.as_str() => r.iter().map(|x| x.agent_outcome.absolute_value).collect::<Vec<_>>(),
            SummaryCol::AgentProfit.as_str() => r.iter().map(|x| x.agent_outcome.profit).collect::<Vec<_>>(),
            SummaryCol::AgentRoi.as_str() => r.iter().map(|x| x.agent_outcome.roi).collect::<Vec<_>>(),
            SummaryCol::BuyAndHoldValue.as_str() => r.iter().map(|x| x.buy_and_hold.absolute_value).collect::<Vec<_>>(),
            SummaryCol::BuyAndHoldProfit.as_str() => r.iter().map(|x| x.buy_and_hold.profit).collect::<Vec<_>>(),
            SummaryCol::BuyAndHoldRoi.as_str() => r.iter().map(|x| x.buy_and_hold.roi).collect::<Vec<_>>(),
            SummaryCol::ConfigId.as_str() => vec![self.config_id.as_str(); r.len()],
        )
        .map_err(|e| DataError::DataFrame(e.to_string()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::io::{ToCsv, ToJson};

    fn row(symbol: &str, agent_final: f64, bh_final: f64) -> SummaryRow {
        SummaryRow {
            symbol: symbol.to_string(),
            agent: "Constant".to_string(),
            agent_outcome: StrategyOutcome::new(1_000.0, agent_final),
            buy_and_hold: StrategyOutcome::new(1_000.0, bh_final),
        }
    }

    fn summary() -> Summary {
        Summary::new(
            "cfg",
            vec![row("ZZZ", 900.0, 1_100.0), row("AAA", 1_200.0, 1_050.0)],
        )
    }

    #[test]
    fn outcome_from_values() {
        let o = StrategyOutcome::new(1_000.0, 1_100.0);
        assert_eq!(o.absolute_value, 1_100.0);
        assert_eq!(o.profit, 100.0);
        assert!((o.roi - 0.1).abs() < 1e-12);
    }

    #[test]
    fn rows_are_sorted_by_symbol() {
        let s = summary();
        let symbols: Vec<_> = s.rows().iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, ["AAA", "ZZZ"]);
        assert_eq!(s.agent_wins(), 1);
        assert!(s.get("ZZZ").is_some());
        assert!(s.get("MISSING").is_none());
    }

    #[test]
    fn dataframe_matches_schema() {
        let df = summary().as_df().unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), SummaryCol::COUNT);

        let schema = df.schema();
        for (name, expected_dtype) in Summary::to_schema().iter() {
            assert_eq!(schema.get(name), Some(expected_dtype));
        }
    }

    #[test]
    fn json_and_csv_output() {
        let s = summary();
        let json = s.to_json().unwrap();
        assert_eq!(json[0]["symbol"], "AAA");
        assert_eq!(json[1]["config_id"], "cfg");
        assert_eq!(json[0]["agent_profit"], 200.0);

        let dir = std::env::temp_dir().join("tickgym-summary-test");
        let path = s.to_csv(&dir, None).unwrap();
        let text = std::fs::read_to_string(path).unwrap();
        let header = text.lines().next().unwrap();
        assert!(header.starts_with("symbol,agent,agent_value"));
        assert_eq!(text.lines().count(), 3);
    }
}
