use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use dealer_finance_core::products::FinanceProduct;
use dealer_finance_core::quote::{self, QuoteInput};
use dealer_finance_core::{EngineConfig, Vehicle};

use crate::input;

/// Arguments for a full product quote
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct QuoteArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Vehicle display name
    #[arg(long, default_value = "Vehicle")]
    pub vehicle: String,

    /// Vehicle price
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Down payment amount (applied after --down-payment-pct)
    #[arg(long)]
    pub down_payment: Option<Decimal>,

    /// Down payment as a percentage of the price
    #[arg(long, alias = "dp-pct")]
    pub down_payment_pct: Option<Decimal>,

    /// Annual interest rate in percent (4.5 = 4.5%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Term in months
    #[arg(long)]
    pub term: Option<u32>,

    /// Balloon lump sum due at the end of the term
    #[arg(long)]
    pub balloon: Option<Decimal>,

    /// Lease residual value
    #[arg(long)]
    pub residual: Option<Decimal>,

    /// Product to report in the summary or schedule (standard, balloon, lease, islamic)
    #[arg(long)]
    pub product: Option<FinanceProduct>,
}

pub fn run_quote(args: QuoteArgs, config: &EngineConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let quote_input = build_request(args)?;
    let result = quote::quote_finance(&quote_input, config);
    Ok(serde_json::to_value(result)?)
}

/// Month-by-month schedule for `--product` (standard loan by default).
pub fn run_schedule(args: QuoteArgs, config: &EngineConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let quote_input = build_request(args)?;
    let result = quote::product_schedule(&quote_input, config);
    Ok(serde_json::to_value(result)?)
}

fn build_request(args: QuoteArgs) -> Result<QuoteInput, Box<dyn std::error::Error>> {
    if let Some(request) = input::read_request::<QuoteInput>(args.input.as_deref())? {
        return Ok(request);
    }

    Ok(QuoteInput {
        vehicle: Vehicle::new(
            args.vehicle,
            args.price.ok_or("--price is required (or provide --input)")?,
        ),
        down_payment_percentage: args.down_payment_pct,
        down_payment_amount: args.down_payment,
        interest_rate: args.rate,
        loan_term_months: args.term,
        balloon_amount: args.balloon,
        residual_value: args.residual,
        product: args.product,
    })
}
