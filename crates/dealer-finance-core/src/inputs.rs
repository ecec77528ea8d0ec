//! Finance inputs and the down-payment synchroniser.
//!
//! `FinanceInputs` stores the down payment twice, as an amount and as a
//! percentage of the vehicle price. The setters keep the two views in step:
//! editing one re-derives the other before returning, so
//! `amount == price * percentage / 100` holds after every call.
//!
//! Both views are stored rather than derived from a single ratio. A long
//! run of alternating edits can therefore accumulate decimal rounding; each
//! individual edit stays within 1e-6 relative.
//!
//! Out-of-range values are never rejected. Each setter clamps to the
//! nearest valid value and reports what it changed as an [`Adjustment`].

use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::amortization::finite_or_zero;
use crate::config::EngineConfig;
use crate::types::{Money, Months, Percent};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Largest down payment the site offers, as a share of the price.
pub const MAX_DOWN_PAYMENT_PERCENTAGE: Percent = dec!(50);
pub const MIN_INTEREST_RATE: Percent = dec!(1);
pub const MAX_INTEREST_RATE: Percent = dec!(10);
pub const MIN_TERM_MONTHS: Months = 12;
pub const MAX_TERM_MONTHS: Months = 84;
pub const TERM_STEP_MONTHS: Months = 12;

const PERCENT: Decimal = dec!(100);

// ---------------------------------------------------------------------------
// Adjustments
// ---------------------------------------------------------------------------

/// Identifies one of the user-editable inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputField {
    VehiclePrice,
    DownPaymentAmount,
    DownPaymentPercentage,
    InterestRate,
    LoanTermMonths,
    BalloonAmount,
    ResidualValue,
}

impl InputField {
    pub fn name(&self) -> &'static str {
        match self {
            InputField::VehiclePrice => "vehicle_price",
            InputField::DownPaymentAmount => "down_payment_amount",
            InputField::DownPaymentPercentage => "down_payment_percentage",
            InputField::InterestRate => "interest_rate",
            InputField::LoanTermMonths => "loan_term_months",
            InputField::BalloonAmount => "balloon_amount",
            InputField::ResidualValue => "residual_value",
        }
    }
}

/// A requested value that was clamped into its valid range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adjustment {
    pub field: InputField,
    pub requested: Decimal,
    pub applied: Decimal,
    pub reason: String,
}

impl Adjustment {
    fn new(field: InputField, requested: Decimal, applied: Decimal, reason: impl Into<String>) -> Self {
        Self {
            field,
            requested,
            applied,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Adjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} adjusted from {} to {}: {}",
            self.field.name(),
            self.requested,
            self.applied,
            self.reason
        )
    }
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// The editable inputs shared by every finance product.
///
/// Fields are public for reading and for building fixtures. Writes that
/// bypass the setters also bypass clamping and amount/percentage
/// synchronisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceInputs {
    /// Cash price of the vehicle
    pub vehicle_price: Money,
    /// Down payment in currency
    pub down_payment_amount: Money,
    /// Down payment as a percentage of the price (derived view of the amount)
    pub down_payment_percentage: Percent,
    /// Annual interest rate, percent
    pub interest_rate: Percent,
    /// Term in months (12..=84, step 12)
    pub loan_term_months: Months,
    /// Lump sum due at the end of a balloon loan
    pub balloon_amount: Money,
    /// Estimated value of the vehicle when a lease ends
    pub residual_value: Money,
}

impl FinanceInputs {
    /// Seed inputs for a vehicle from the configured defaults.
    ///
    /// Defaults pass through the setters, so a config with out-of-range
    /// values still yields valid inputs.
    pub fn from_vehicle_price(price: Money, config: &EngineConfig) -> Self {
        let mut inputs = Self {
            vehicle_price: Decimal::ZERO,
            down_payment_amount: Decimal::ZERO,
            down_payment_percentage: Decimal::ZERO,
            interest_rate: MIN_INTEREST_RATE,
            loan_term_months: MIN_TERM_MONTHS,
            balloon_amount: Decimal::ZERO,
            residual_value: Decimal::ZERO,
        };

        let mut adjustments = inputs.set_vehicle_price(price);
        adjustments.extend(inputs.set_down_payment_percentage(config.down_payment_percentage));
        adjustments.extend(inputs.set_interest_rate(config.interest_rate));
        adjustments.extend(inputs.set_loan_term(config.loan_term_months));
        let balloon = default_share(inputs.vehicle_price, config.balloon_percentage, "balloon");
        adjustments.extend(inputs.set_balloon_amount(balloon));
        let residual = default_share(inputs.vehicle_price, config.residual_percentage, "residual");
        adjustments.extend(inputs.set_residual_value(residual));

        for adj in &adjustments {
            log::warn!("default {adj}");
        }
        inputs
    }

    /// Set the price and re-derive the down payment amount from the current
    /// percentage. The percentage is the anchor across price edits: a 20%
    /// down payment stays 20% of whatever the new price is.
    ///
    /// Balloon and residual amounts are kept as absolute values but are
    /// re-clamped to the new price.
    pub fn set_vehicle_price(&mut self, price: Money) -> Vec<Adjustment> {
        let mut adjustments = Vec::new();

        let applied = if price < Decimal::ZERO {
            adjustments.push(Adjustment::new(
                InputField::VehiclePrice,
                price,
                Decimal::ZERO,
                "price cannot be negative",
            ));
            Decimal::ZERO
        } else {
            price
        };

        self.vehicle_price = applied;
        self.down_payment_amount = share_of(applied, self.down_payment_percentage);

        let (balloon, adj) = clamp_money(InputField::BalloonAmount, self.balloon_amount, applied);
        self.balloon_amount = balloon;
        adjustments.extend(adj);

        let (residual, adj) = clamp_money(InputField::ResidualValue, self.residual_value, applied);
        self.residual_value = residual;
        adjustments.extend(adj);

        adjustments
    }

    /// Set the down payment amount and re-derive the percentage.
    ///
    /// The amount is clamped to `0..=price * 50%`. With a zero price the
    /// percentage short-circuits to 0.
    pub fn set_down_payment_amount(&mut self, amount: Money) -> Vec<Adjustment> {
        let ceiling = share_of(self.vehicle_price, MAX_DOWN_PAYMENT_PERCENTAGE);
        let (applied, adjustment) = clamp_money(InputField::DownPaymentAmount, amount, ceiling);

        self.down_payment_amount = applied;
        self.down_payment_percentage = percentage_of(applied, self.vehicle_price);

        adjustment.into_iter().collect()
    }

    /// Set the down payment percentage (clamped to `0..=50`) and re-derive
    /// the amount.
    pub fn set_down_payment_percentage(&mut self, percentage: Percent) -> Vec<Adjustment> {
        let (applied, adjustment) = clamp_range(
            InputField::DownPaymentPercentage,
            percentage,
            Decimal::ZERO,
            MAX_DOWN_PAYMENT_PERCENTAGE,
        );

        self.down_payment_percentage = applied;
        self.down_payment_amount = share_of(self.vehicle_price, applied);

        adjustment.into_iter().collect()
    }

    /// Set the annual interest rate, clamped to `1..=10` percent.
    pub fn set_interest_rate(&mut self, rate: Percent) -> Vec<Adjustment> {
        let (applied, adjustment) = clamp_range(
            InputField::InterestRate,
            rate,
            MIN_INTEREST_RATE,
            MAX_INTEREST_RATE,
        );
        self.interest_rate = applied;
        adjustment.into_iter().collect()
    }

    /// Set the term. Snaps to the nearest 12-month step within `12..=84`.
    pub fn set_loan_term(&mut self, months: Months) -> Vec<Adjustment> {
        let applied = snap_term(months);
        self.loan_term_months = applied;

        if applied == months {
            Vec::new()
        } else {
            vec![Adjustment::new(
                InputField::LoanTermMonths,
                Decimal::from(months),
                Decimal::from(applied),
                format!(
                    "term must be a multiple of {TERM_STEP_MONTHS} between {MIN_TERM_MONTHS} and {MAX_TERM_MONTHS} months"
                ),
            )]
        }
    }

    /// Set the balloon lump sum, clamped to `0..=price`.
    pub fn set_balloon_amount(&mut self, amount: Money) -> Vec<Adjustment> {
        let (applied, adjustment) =
            clamp_money(InputField::BalloonAmount, amount, self.vehicle_price);
        self.balloon_amount = applied;
        adjustment.into_iter().collect()
    }

    /// Set the lease residual value, clamped to `0..=price`.
    pub fn set_residual_value(&mut self, value: Money) -> Vec<Adjustment> {
        let (applied, adjustment) =
            clamp_money(InputField::ResidualValue, value, self.vehicle_price);
        self.residual_value = applied;
        adjustment.into_iter().collect()
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// `percentage` of `price`. The factor is taken first so the product can
/// never exceed the price for percentages up to 100. Overflow yields 0.
fn share_of(price: Money, percentage: Percent) -> Money {
    finite_or_zero(
        percentage
            .checked_div(PERCENT)
            .and_then(|factor| factor.checked_mul(price)),
        "price share",
    )
}

/// Share of the price for a configured default, with the percentage held
/// to `0..=100`.
fn default_share(price: Money, percentage: Percent, label: &str) -> Money {
    let applied = percentage.clamp(Decimal::ZERO, PERCENT);
    if applied != percentage {
        log::warn!("default {label} percentage adjusted from {percentage} to {applied}");
    }
    share_of(price, applied)
}

/// `amount` as a percentage of `price`; 0 when the price is 0.
fn percentage_of(amount: Money, price: Money) -> Percent {
    if price.is_zero() {
        return Decimal::ZERO;
    }
    amount / price * PERCENT
}

fn clamp_money(field: InputField, value: Money, ceiling: Money) -> (Money, Option<Adjustment>) {
    clamp_range(field, value, Decimal::ZERO, ceiling)
}

fn clamp_range(
    field: InputField,
    value: Decimal,
    floor: Decimal,
    ceiling: Decimal,
) -> (Decimal, Option<Adjustment>) {
    if value < floor {
        let reason = format!("below minimum {floor}");
        (floor, Some(Adjustment::new(field, value, floor, reason)))
    } else if value > ceiling {
        let reason = format!("above maximum {ceiling}");
        (ceiling, Some(Adjustment::new(field, value, ceiling, reason)))
    } else {
        (value, None)
    }
}

fn snap_term(months: Months) -> Months {
    let steps = months.saturating_add(TERM_STEP_MONTHS / 2) / TERM_STEP_MONTHS;
    (steps * TERM_STEP_MONTHS).clamp(MIN_TERM_MONTHS, MAX_TERM_MONTHS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn sample_inputs() -> FinanceInputs {
        FinanceInputs::from_vehicle_price(dec!(100000), &EngineConfig::default())
    }

    fn assert_ratio_consistent(inputs: &FinanceInputs) {
        let expected = inputs.vehicle_price * inputs.down_payment_percentage / dec!(100);
        let diff = (inputs.down_payment_amount - expected).abs();
        let scale = inputs.down_payment_amount.abs().max(Decimal::ONE);
        assert!(
            diff / scale < dec!(0.000001),
            "amount {} inconsistent with {}% of {}",
            inputs.down_payment_amount,
            inputs.down_payment_percentage,
            inputs.vehicle_price
        );
    }

    #[test]
    fn test_defaults_from_price() {
        let inputs = sample_inputs();
        assert_eq!(inputs.vehicle_price, dec!(100000));
        assert_eq!(inputs.down_payment_percentage, dec!(20));
        assert_eq!(inputs.down_payment_amount, dec!(20000));
        assert_eq!(inputs.interest_rate, dec!(4.5));
        assert_eq!(inputs.loan_term_months, 60);
        assert_eq!(inputs.balloon_amount, dec!(30000));
        assert_eq!(inputs.residual_value, dec!(40000));
    }

    #[test]
    fn test_set_amount_derives_percentage() {
        let mut inputs = sample_inputs();
        let adj = inputs.set_down_payment_amount(dec!(15000));
        assert!(adj.is_empty());
        assert_eq!(inputs.down_payment_percentage, dec!(15));
        assert_ratio_consistent(&inputs);
    }

    #[test]
    fn test_set_percentage_derives_amount() {
        let mut inputs = sample_inputs();
        inputs.set_down_payment_percentage(dec!(35));
        assert_eq!(inputs.down_payment_amount, dec!(35000));
        assert_ratio_consistent(&inputs);
    }

    #[test]
    fn test_price_change_keeps_percentage_anchor() {
        let mut inputs = sample_inputs();
        inputs.set_down_payment_amount(dec!(25000));
        inputs.set_vehicle_price(dec!(60000));

        assert_eq!(inputs.down_payment_percentage, dec!(25));
        assert_eq!(inputs.down_payment_amount, dec!(15000));
        assert_ratio_consistent(&inputs);
    }

    #[test]
    fn test_price_change_reclamps_product_amounts() {
        let mut inputs = sample_inputs();
        inputs.set_balloon_amount(dec!(45000));
        inputs.set_residual_value(dec!(50000));

        let adj = inputs.set_vehicle_price(dec!(40000));
        assert_eq!(inputs.balloon_amount, dec!(40000));
        assert_eq!(inputs.residual_value, dec!(40000));
        assert_eq!(adj.len(), 2);
    }

    #[test]
    fn test_zero_price_short_circuits_percentage() {
        let mut inputs = sample_inputs();
        inputs.set_vehicle_price(Decimal::ZERO);
        inputs.set_down_payment_amount(dec!(5000));

        assert_eq!(inputs.down_payment_amount, Decimal::ZERO);
        assert_eq!(inputs.down_payment_percentage, Decimal::ZERO);
    }

    #[test]
    fn test_negative_price_clamped() {
        let mut inputs = sample_inputs();
        let adj = inputs.set_vehicle_price(dec!(-10));
        assert_eq!(inputs.vehicle_price, Decimal::ZERO);
        assert_eq!(adj[0].field, InputField::VehiclePrice);
        assert_eq!(adj[0].applied, Decimal::ZERO);
    }

    #[test]
    fn test_amount_clamped_to_half_price() {
        let mut inputs = sample_inputs();
        let adj = inputs.set_down_payment_amount(dec!(80000));
        assert_eq!(inputs.down_payment_amount, dec!(50000));
        assert_eq!(inputs.down_payment_percentage, dec!(50));
        assert_eq!(adj.len(), 1);
    }

    #[test]
    fn test_negative_amount_clamped() {
        let mut inputs = sample_inputs();
        inputs.set_down_payment_amount(dec!(-1));
        assert_eq!(inputs.down_payment_amount, Decimal::ZERO);
        assert_eq!(inputs.down_payment_percentage, Decimal::ZERO);
    }

    #[test]
    fn test_percentage_clamped() {
        let mut inputs = sample_inputs();
        let adj = inputs.set_down_payment_percentage(dec!(75));
        assert_eq!(inputs.down_payment_percentage, dec!(50));
        assert_eq!(inputs.down_payment_amount, dec!(50000));
        assert_eq!(adj[0].requested, dec!(75));
    }

    #[test]
    fn test_rate_clamped() {
        let mut inputs = sample_inputs();
        inputs.set_interest_rate(dec!(0));
        assert_eq!(inputs.interest_rate, dec!(1));
        inputs.set_interest_rate(dec!(25));
        assert_eq!(inputs.interest_rate, dec!(10));
        let adj = inputs.set_interest_rate(dec!(6.9));
        assert!(adj.is_empty());
        assert_eq!(inputs.interest_rate, dec!(6.9));
    }

    #[test]
    fn test_term_snapping() {
        assert_eq!(snap_term(0), 12);
        assert_eq!(snap_term(17), 12);
        assert_eq!(snap_term(18), 24);
        assert_eq!(snap_term(60), 60);
        assert_eq!(snap_term(100), 84);
        assert_eq!(snap_term(Months::MAX), 84);
    }

    #[test]
    fn test_term_adjustment_reported() {
        let mut inputs = sample_inputs();
        assert!(inputs.set_loan_term(36).is_empty());
        let adj = inputs.set_loan_term(40);
        assert_eq!(inputs.loan_term_months, 36);
        assert_eq!(adj[0].field, InputField::LoanTermMonths);
    }

    #[test]
    fn test_round_trip_does_not_drift() {
        let mut inputs = FinanceInputs::from_vehicle_price(dec!(37999), &EngineConfig::default());
        inputs.set_down_payment_amount(dec!(7123.45));
        let pct = inputs.down_payment_percentage;
        inputs.set_down_payment_percentage(pct);

        let diff = (inputs.down_payment_amount - dec!(7123.45)).abs();
        assert!(diff < dec!(0.000001), "drifted by {diff}");
    }

    #[test]
    fn test_adjustment_display() {
        let adj = Adjustment::new(
            InputField::InterestRate,
            dec!(12),
            dec!(10),
            "above maximum 10",
        );
        assert_eq!(
            adj.to_string(),
            "interest_rate adjusted from 12 to 10: above maximum 10"
        );
    }

    #[test]
    fn test_oversized_config_shares_capped_at_price() {
        let config = EngineConfig {
            balloon_percentage: dec!(1e20),
            residual_percentage: dec!(-5),
            ..EngineConfig::default()
        };
        let inputs = FinanceInputs::from_vehicle_price(dec!(1e20), &config);

        assert_eq!(inputs.vehicle_price, dec!(1e20));
        assert_eq!(inputs.balloon_amount, dec!(1e20));
        assert_eq!(inputs.residual_value, Decimal::ZERO);
    }

    #[test]
    fn test_share_of_overflow_is_zero() {
        assert_eq!(share_of(Decimal::MAX, dec!(1e20)), Decimal::ZERO);
    }
}
