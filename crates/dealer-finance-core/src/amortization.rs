//! Level-payment annuity maths shared by the loan products.
//!
//! Every operation here runs on checked decimal arithmetic. A result that
//! cannot be represented (division by zero, overflow of `(1+r)^n`) is
//! coerced to zero before it leaves the module, so callers never see a
//! panic or a garbage value.

use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Months, Percent};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const MONTHS_PER_YEAR: Decimal = dec!(12);
const PERCENT: Decimal = dec!(100);

/// Longest schedule `build_schedule` lays out, in months (50 years).
pub const MAX_SCHEDULE_MONTHS: Months = 600;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// A single month of an amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    /// Month number (1-indexed)
    pub month: Months,
    /// Balance outstanding at the start of the month
    pub opening_balance: Money,
    /// Instalment paid this month
    pub payment: Money,
    /// Interest accrued on the opening balance
    pub interest: Money,
    /// Portion of the payment that reduces the balance
    pub principal_repaid: Money,
    /// Balance outstanding after the payment
    pub closing_balance: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Periodic (monthly) rate as a decimal factor from an annual percentage.
///
/// `4.5` → `0.00375`.
pub fn monthly_rate(annual_rate_percent: Percent) -> Decimal {
    annual_rate_percent / PERCENT / MONTHS_PER_YEAR
}

/// Monthly payment that fully amortizes `principal` over `term_months`.
///
/// `payment = P * r(1+r)^n / ((1+r)^n - 1)` with `r` the monthly rate.
///
/// * `principal <= 0` returns 0 without touching the formula.
/// * A zero rate pays the principal off in equal slices, `P / n`.
/// * Anything else that cannot be represented (`n == 0`, overflow) is 0.
pub fn compute_annuity_payment(
    principal: Money,
    annual_rate_percent: Percent,
    term_months: Months,
) -> Money {
    if principal <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let r = monthly_rate(annual_rate_percent);
    let payment = if r.is_zero() {
        principal.checked_div(Decimal::from(term_months))
    } else {
        annuity_factor(r, term_months).and_then(|factor| principal.checked_mul(factor))
    };

    finite_or_zero(payment, "annuity payment").max(Decimal::ZERO)
}

/// Month-by-month breakdown of a level-payment loan.
///
/// `principal` is the amortizing part of the debt. `final_balance` is owed
/// on top of it, accrues no interest and is still outstanding after the
/// last instalment: pass 0 for a standard loan and the lump sum for a
/// balloon loan. Each row's balances include `final_balance`.
///
/// Returns an empty schedule when there is nothing to amortize (no
/// principal, zero term, or a payment that degenerated to zero), when the
/// term exceeds [`MAX_SCHEDULE_MONTHS`], or when a row cannot be
/// represented. The final row absorbs accumulated rounding so the closing
/// balance is exactly `final_balance`.
pub fn build_schedule(
    principal: Money,
    annual_rate_percent: Percent,
    term_months: Months,
    final_balance: Money,
) -> Vec<AmortizationRow> {
    if term_months > MAX_SCHEDULE_MONTHS {
        log::warn!(
            "schedule of {term_months} months exceeds {MAX_SCHEDULE_MONTHS}; not built"
        );
        return Vec::new();
    }

    let payment = compute_annuity_payment(principal, annual_rate_percent, term_months);
    if payment.is_zero() {
        return Vec::new();
    }

    let r = monthly_rate(annual_rate_percent);
    let final_balance = final_balance.max(Decimal::ZERO);
    lay_out_schedule(principal, r, payment, term_months, final_balance).unwrap_or_else(|| {
        log::warn!("amortization schedule: result not representable, coerced to empty");
        Vec::new()
    })
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// `r(1+r)^n / ((1+r)^n - 1)`; `None` when the denominator vanishes or any
/// step overflows.
fn annuity_factor(r: Decimal, n: Months) -> Option<Decimal> {
    let growth = Decimal::ONE.checked_add(r)?.checked_powu(u64::from(n))?;
    let denominator = growth.checked_sub(Decimal::ONE)?;
    r.checked_mul(growth)?.checked_div(denominator)
}

fn lay_out_schedule(
    principal: Money,
    r: Decimal,
    payment: Money,
    term_months: Months,
    final_balance: Money,
) -> Option<Vec<AmortizationRow>> {
    let mut schedule = Vec::new();
    let mut amortizing = principal;

    for month in 1..=term_months {
        let opening_balance = amortizing.checked_add(final_balance)?;
        let interest = amortizing.checked_mul(r)?;
        let (payment, principal_repaid) = if month == term_months {
            (amortizing.checked_add(interest)?, amortizing)
        } else {
            (payment, payment.checked_sub(interest)?)
        };
        amortizing = amortizing.checked_sub(principal_repaid)?;

        schedule.push(AmortizationRow {
            month,
            opening_balance,
            payment,
            interest,
            principal_repaid,
            closing_balance: amortizing.checked_add(final_balance)?,
        });
    }

    Some(schedule)
}

/// Resolve a checked computation to a safe value. Unrepresentable results
/// become 0.
pub(crate) fn finite_or_zero(value: Option<Decimal>, context: &str) -> Money {
    match value {
        Some(v) => v,
        None => {
            log::warn!("{context}: result not representable, coerced to 0");
            Decimal::ZERO
        }
    }
}
