//! Balloon loan: a lump sum is set aside for the end of the term and only
//! the remainder is amortized.
//!
//! The balloon is not amortized and accrues no interest in this model. It
//! is reported separately as `final_lump_sum` and never folded into the
//! monthly payment.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{safe_amount, FinanceProduct, ProductCalculator, ProductQuote};
use crate::amortization::{build_schedule, compute_annuity_payment, AmortizationRow};
use crate::inputs::FinanceInputs;
use crate::types::Money;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalloonQuote {
    /// Amount amortized (price less down payment less balloon)
    pub principal: Money,
    pub monthly_payment: Money,
    /// Due at the end of the term, on top of the last instalment
    pub final_lump_sum: Money,
    /// Instalments plus down payment plus balloon
    pub total_payment: Money,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BalloonLoan;

impl ProductCalculator for BalloonLoan {
    fn product(&self) -> FinanceProduct {
        FinanceProduct::BalloonPayment
    }

    fn quote(&self, inputs: &FinanceInputs) -> ProductQuote {
        ProductQuote::BalloonPayment(quote_balloon(inputs))
    }

    /// Instalments amortize the principal; the balloon stays outstanding
    /// until the final lump sum.
    fn schedule(&self, inputs: &FinanceInputs) -> Vec<AmortizationRow> {
        let quote = quote_balloon(inputs);
        build_schedule(
            quote.principal,
            inputs.interest_rate,
            inputs.loan_term_months,
            quote.final_lump_sum,
        )
    }
}

pub fn quote_balloon(inputs: &FinanceInputs) -> BalloonQuote {
    let down = safe_amount(Some(inputs.down_payment_amount), "balloon down payment");
    let balloon = safe_amount(Some(inputs.balloon_amount), "balloon amount");
    let principal = safe_amount(
        inputs
            .vehicle_price
            .checked_sub(down)
            .and_then(|p| p.checked_sub(balloon)),
        "balloon principal",
    );

    // A zero principal waives the instalments, not the balloon
    let monthly_payment = if principal.is_zero() {
        Decimal::ZERO
    } else {
        compute_annuity_payment(principal, inputs.interest_rate, inputs.loan_term_months)
    };

    let total_payment = safe_amount(
        monthly_payment
            .checked_mul(Decimal::from(inputs.loan_term_months))
            .and_then(|i| i.checked_add(down))
            .and_then(|t| t.checked_add(balloon)),
        "balloon total payment",
    );

    BalloonQuote {
        principal,
        monthly_payment,
        final_lump_sum: balloon,
        total_payment,
    }
}
