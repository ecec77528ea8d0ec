//! Lease: the customer pays for the depreciation over the term plus a
//! finance charge.
//!
//! The finance charge is computed on `price + residual` at the monthly rate
//! and added to straight-line depreciation. This is the sum-based lease
//! formula used on the site, not a money-factor convention and not an
//! approximation of the loan annuity.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{safe_amount, FinanceProduct, ProductCalculator, ProductQuote};
use crate::amortization::monthly_rate;
use crate::inputs::FinanceInputs;
use crate::types::Money;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaseQuote {
    pub monthly_payment: Money,
    /// Lease payments over the full term
    pub total_payment: Money,
    /// Monthly share of `price - residual`
    pub depreciation_component: Money,
    /// Monthly charge on `price + residual`
    pub finance_charge_component: Money,
    pub residual_value: Money,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Lease;

impl ProductCalculator for Lease {
    fn product(&self) -> FinanceProduct {
        FinanceProduct::Lease
    }

    fn quote(&self, inputs: &FinanceInputs) -> ProductQuote {
        ProductQuote::Lease(quote_lease(inputs))
    }
}

pub fn quote_lease(inputs: &FinanceInputs) -> LeaseQuote {
    let term = Decimal::from(inputs.loan_term_months);
    let residual = safe_amount(Some(inputs.residual_value), "lease residual");

    let depreciation = safe_amount(
        inputs.vehicle_price.checked_sub(residual),
        "lease depreciation",
    );
    let depreciation_component = safe_amount(
        depreciation.checked_div(term),
        "lease monthly depreciation",
    );
    let finance_charge_component = safe_amount(
        inputs
            .vehicle_price
            .checked_add(residual)
            .and_then(|base| base.checked_mul(monthly_rate(inputs.interest_rate))),
        "lease finance charge",
    );

    let monthly_payment = safe_amount(
        depreciation_component.checked_add(finance_charge_component),
        "lease payment",
    );

    LeaseQuote {
        monthly_payment,
        total_payment: safe_amount(monthly_payment.checked_mul(term), "lease total payment"),
        depreciation_component,
        finance_charge_component,
        residual_value: residual,
    }
}
