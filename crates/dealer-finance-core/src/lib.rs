pub mod amortization;
pub mod config;
pub mod engine;
pub mod error;
pub mod inputs;
pub mod products;
pub mod quote;
pub mod types;

pub use config::EngineConfig;
pub use engine::{FinanceEdit, FinanceEngine, FinanceSnapshot, ResultSummary};
pub use error::FinanceError;
pub use inputs::{Adjustment, FinanceInputs, InputField};
pub use products::{FinanceProduct, FinanceResults, ProductCalculator, ProductQuote};
pub use types::*;

/// Standard result type for the parsing and configuration edges of the engine
pub type FinanceResult<T> = Result<T, FinanceError>;
