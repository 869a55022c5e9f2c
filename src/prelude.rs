// 1. Traits
pub use crate::agent::Policy;
pub use crate::gym::trading::Env;
pub use crate::report::io::{Report, ReportName, ToCsv, ToJson, ToSchema};

// 2. The Core "Loop" Types
pub use crate::gym::trading::{
    action::{TradeDecision, TradeSide},
    action_space::ActionSpace,
    config::EnvConfig,
    env::{Environment, StepInfo},
    factory::{make, make_split},
    observation::Observation,
    portfolio::PortfolioState,
};
pub use crate::gym::{EnvStatus, Reward, StepOutcome};

// 3. Market Data
pub use crate::data::{bar::PriceBar, schema::BarCol, series::MarketSeries};

// 4. Policies
pub use crate::agent::{
    PolicyIdentifier, constant::ConstantPolicy, crossover::SmaCrossoverPolicy,
    random::RandomPolicy,
};

// 5. Evaluation & Reports
pub use crate::evaluation::{Instrument, evaluate_instrument, evaluate_instruments};
pub use crate::report::{
    baseline::buy_and_hold,
    journal::{Journal, StepRecord},
    summary::{StrategyOutcome, Summary, SummaryRow},
};

// 6. Errors
pub use crate::error::{
    DataError, EnvError, ErrorKind, GymError, GymResult, IoError, PolicyError,
};
