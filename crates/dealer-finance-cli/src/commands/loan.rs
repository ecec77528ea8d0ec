use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use dealer_finance_core::quote::{self, LoanInput};

use crate::input;

/// Arguments for a plain loan payment
#[derive(Args)]
pub struct PaymentArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount financed
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (4.5 = 4.5%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Term in months
    #[arg(long)]
    pub term: Option<u32>,

    /// Include the month-by-month amortization schedule
    #[arg(long)]
    pub schedule: bool,
}

pub fn run_payment(args: PaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = input::read_request::<LoanInput>(args.input.as_deref())?;
    let loan_input = if let Some(request) = request {
        request
    } else {
        LoanInput {
            principal: args.principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate: args.rate
                .ok_or("--rate is required (or provide --input)")?,
            term_months: args.term
                .ok_or("--term is required (or provide --input)")?,
        }
    };

    let result = quote::loan_payment(&loan_input, args.schedule);
    Ok(serde_json::to_value(result)?)
}
