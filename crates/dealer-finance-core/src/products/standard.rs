//! Standard amortizing loan: everything after the down payment is repaid
//! in level monthly instalments.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{safe_amount, FinanceProduct, ProductCalculator, ProductQuote};
use crate::amortization::{build_schedule, compute_annuity_payment, AmortizationRow};
use crate::inputs::FinanceInputs;
use crate::types::Money;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardQuote {
    /// Amount financed (price less down payment)
    pub principal: Money,
    pub monthly_payment: Money,
    /// Instalments plus down payment
    pub total_payment: Money,
    /// Instalments less principal
    pub total_interest: Money,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StandardLoan;

impl ProductCalculator for StandardLoan {
    fn product(&self) -> FinanceProduct {
        FinanceProduct::StandardLoan
    }

    fn quote(&self, inputs: &FinanceInputs) -> ProductQuote {
        ProductQuote::StandardLoan(quote_standard(inputs))
    }

    fn schedule(&self, inputs: &FinanceInputs) -> Vec<AmortizationRow> {
        let principal = quote_standard(inputs).principal;
        build_schedule(
            principal,
            inputs.interest_rate,
            inputs.loan_term_months,
            Decimal::ZERO,
        )
    }
}

pub fn quote_standard(inputs: &FinanceInputs) -> StandardQuote {
    let down = safe_amount(Some(inputs.down_payment_amount), "standard down payment");
    let principal = safe_amount(
        inputs.vehicle_price.checked_sub(down),
        "standard principal",
    );

    if principal.is_zero() {
        return StandardQuote {
            principal,
            monthly_payment: Decimal::ZERO,
            total_payment: down,
            total_interest: Decimal::ZERO,
        };
    }

    let monthly_payment =
        compute_annuity_payment(principal, inputs.interest_rate, inputs.loan_term_months);
    let instalments = monthly_payment.checked_mul(Decimal::from(inputs.loan_term_months));

    StandardQuote {
        principal,
        monthly_payment,
        total_payment: safe_amount(
            instalments.and_then(|i| i.checked_add(down)),
            "standard total payment",
        ),
        total_interest: safe_amount(
            instalments.and_then(|i| i.checked_sub(principal)),
            "standard total interest",
        ),
    }
}
