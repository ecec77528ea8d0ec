//! One-shot entry points wrapped in the standard computation envelope.
//!
//! These are what the CLI and the Node bindings call: build a session from
//! a request, run it, and return a snapshot with methodology, assumptions
//! and any clamping warnings attached.

use std::time::Instant;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amortization::{
    build_schedule, compute_annuity_payment, AmortizationRow, MAX_SCHEDULE_MONTHS,
};
use crate::config::EngineConfig;
use crate::engine::{FinanceEdit, FinanceEngine, FinanceSnapshot};
use crate::inputs::Adjustment;
use crate::products::{FinanceProduct, ProductQuote};
use crate::types::{with_metadata, ComputationOutput, Money, Months, Percent, Vehicle};

const QUOTE_METHODOLOGY: &str =
    "Level-payment annuity (standard, balloon); straight-line depreciation plus finance charge on price + residual (lease)";

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// A quote request. Omitted fields fall back to the configured defaults.
///
/// When both down payment fields are given the amount wins, since it is
/// applied after the percentage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteInput {
    pub vehicle: Vehicle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub down_payment_percentage: Option<Percent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub down_payment_amount: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<Percent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loan_term_months: Option<Months>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balloon_amount: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub residual_value: Option<Money>,
    /// Product to mark active in the summary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<FinanceProduct>,
}

/// A recorded sequence of edits to replay against a fresh session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInput {
    pub vehicle: Vehicle,
    #[serde(default)]
    pub edits: Vec<FinanceEdit>,
}

/// Parameters for a bare loan calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanInput {
    pub principal: Money,
    /// Annual rate, percent
    pub annual_rate: Percent,
    pub term_months: Months,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanOutput {
    pub monthly_payment: Money,
    pub total_payment: Money,
    pub total_interest: Money,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub schedule: Vec<AmortizationRow>,
}

/// Repayment schedule for one product of a quote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSchedule {
    pub product: FinanceProduct,
    pub monthly_payment: Option<Money>,
    /// Balance still owed after the last instalment (the balloon, if any)
    pub final_balance: Money,
    pub schedule: Vec<AmortizationRow>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Quote all four products for a vehicle.
pub fn quote_finance(input: &QuoteInput, config: &EngineConfig) -> ComputationOutput<FinanceSnapshot> {
    let start = Instant::now();
    let (engine, adjustments) = open_quote(input, config);
    finish(&engine, input.vehicle.price, adjustments, start)
}

/// Month-by-month schedule for the requested product (standard loan when
/// none is named). Lease and Islamic finance have no schedule.
pub fn product_schedule(
    input: &QuoteInput,
    config: &EngineConfig,
) -> ComputationOutput<ProductSchedule> {
    let start = Instant::now();
    let (engine, adjustments) = open_quote(input, config);
    let product = engine.active_product();

    let mut warnings: Vec<String> = adjustments.iter().map(ToString::to_string).collect();
    let schedule = engine.active_schedule();
    if matches!(product, FinanceProduct::Lease | FinanceProduct::IslamicFinance) {
        warnings.push(format!("{} does not amortize a balance; no schedule.", product.label()));
    } else if schedule.is_empty() {
        warnings.push("Nothing is financed; schedule is empty.".into());
    }

    let final_balance = engine
        .results()
        .balloon()
        .filter(|_| product == FinanceProduct::BalloonPayment)
        .map(|q| q.final_lump_sum)
        .unwrap_or_default();

    let assumptions = serde_json::json!({
        "compounding": "monthly",
        "payment_timing": "end of month",
        "final_balance_accrues_interest": false,
    });

    with_metadata(
        "Level-payment annuity schedule",
        &assumptions,
        warnings,
        start.elapsed().as_micros() as u64,
        ProductSchedule {
            product,
            monthly_payment: engine.active_quote().and_then(ProductQuote::monthly_payment),
            final_balance,
            schedule,
        },
    )
}

/// Replay edits in order against a fresh session and return the final state.
pub fn replay_session(input: &SessionInput, config: &EngineConfig) -> ComputationOutput<FinanceSnapshot> {
    let start = Instant::now();
    let mut engine = FinanceEngine::with_config(input.vehicle.clone(), config);
    let mut adjustments: Vec<Adjustment> = Vec::new();

    for edit in &input.edits {
        engine.apply(edit.clone());
        adjustments.extend_from_slice(engine.adjustments());
    }

    finish(&engine, input.vehicle.price, adjustments, start)
}

/// Monthly payment and totals for a plain amortizing loan, optionally with
/// the month-by-month schedule.
pub fn loan_payment(input: &LoanInput, with_schedule: bool) -> ComputationOutput<LoanOutput> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let monthly_payment =
        compute_annuity_payment(input.principal, input.annual_rate, input.term_months);

    if input.principal <= Decimal::ZERO {
        warnings.push("Principal is not positive; nothing is financed.".into());
    } else if monthly_payment.is_zero() {
        warnings.push("Payment is not representable for these inputs; reported as 0.".into());
    }
    if input.annual_rate.is_zero() {
        warnings.push("Zero rate: principal repaid in equal instalments.".into());
    }
    if with_schedule && input.term_months > MAX_SCHEDULE_MONTHS {
        warnings.push(format!(
            "Term of {} months exceeds the {MAX_SCHEDULE_MONTHS}-month schedule limit; schedule omitted.",
            input.term_months
        ));
    }

    let total_payment = monthly_payment
        .checked_mul(Decimal::from(input.term_months))
        .unwrap_or_default();
    let total_interest = if monthly_payment.is_zero() {
        Decimal::ZERO
    } else {
        (total_payment - input.principal).max(Decimal::ZERO)
    };

    let schedule = if with_schedule {
        build_schedule(
            input.principal,
            input.annual_rate,
            input.term_months,
            Decimal::ZERO,
        )
    } else {
        Vec::new()
    };

    let assumptions = serde_json::json!({
        "compounding": "monthly",
        "rate_basis": "annual percentage / 12",
        "payment_timing": "end of month",
    });

    with_metadata(
        "Level-payment annuity",
        &assumptions,
        warnings,
        start.elapsed().as_micros() as u64,
        LoanOutput {
            monthly_payment,
            total_payment,
            total_interest,
            schedule,
        },
    )
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Open a session and apply the request's overrides. The amount is applied
/// after the percentage, so it wins when both are given.
fn open_quote(input: &QuoteInput, config: &EngineConfig) -> (FinanceEngine, Vec<Adjustment>) {
    let mut engine = FinanceEngine::with_config(input.vehicle.clone(), config);
    let mut adjustments: Vec<Adjustment> = Vec::new();

    if let Some(pct) = input.down_payment_percentage {
        engine.set_down_payment_percentage(pct);
        adjustments.extend_from_slice(engine.adjustments());
    }
    if let Some(amount) = input.down_payment_amount {
        engine.set_down_payment_amount(amount);
        adjustments.extend_from_slice(engine.adjustments());
    }
    if let Some(rate) = input.interest_rate {
        engine.set_interest_rate(rate);
        adjustments.extend_from_slice(engine.adjustments());
    }
    if let Some(term) = input.loan_term_months {
        engine.set_loan_term(term);
        adjustments.extend_from_slice(engine.adjustments());
    }
    if let Some(balloon) = input.balloon_amount {
        engine.set_balloon_amount(balloon);
        adjustments.extend_from_slice(engine.adjustments());
    }
    if let Some(residual) = input.residual_value {
        engine.set_residual_value(residual);
        adjustments.extend_from_slice(engine.adjustments());
    }
    if let Some(product) = input.product {
        engine.select_product(product);
    }

    (engine, adjustments)
}

fn finish(
    engine: &FinanceEngine,
    requested_price: Money,
    adjustments: Vec<Adjustment>,
    start: Instant,
) -> ComputationOutput<FinanceSnapshot> {
    let mut warnings: Vec<String> = Vec::new();

    if requested_price < Decimal::ZERO {
        warnings.push(format!(
            "vehicle_price adjusted from {requested_price} to 0: price cannot be negative"
        ));
    }
    warnings.extend(adjustments.iter().map(ToString::to_string));

    if engine.inputs().vehicle_price.is_zero() {
        warnings.push("Vehicle price is zero; every product quotes 0.".into());
    }
    if engine.active_product() == FinanceProduct::IslamicFinance {
        warnings.push("Islamic finance is disclosed only; no figures are computed.".into());
    }

    let inputs = engine.inputs();
    let assumptions = serde_json::json!({
        "interest_rate_pct": inputs.interest_rate.to_string(),
        "loan_term_months": inputs.loan_term_months,
        "down_payment_anchor": "percentage",
        "balloon_accrues_interest": false,
        "lease_finance_charge_base": "price + residual",
    });

    with_metadata(
        QUOTE_METHODOLOGY,
        &assumptions,
        warnings,
        start.elapsed().as_micros() as u64,
        engine.snapshot(),
    )
}
