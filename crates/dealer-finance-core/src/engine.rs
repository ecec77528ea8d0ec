//! A finance session for one vehicle.
//!
//! `FinanceEngine` owns the inputs, the active product and the latest
//! quotes. Every setter clamps, synchronises the down payment, and reruns
//! all four calculators before it returns, so a read after any edit never
//! sees stale figures, including for products that are not on screen.

use serde::{Deserialize, Serialize};

use crate::amortization::AmortizationRow;
use crate::config::EngineConfig;
use crate::inputs::{Adjustment, FinanceInputs};
use crate::products::{
    default_calculators, FinanceProduct, FinanceResults, IslamicFinance, ProductCalculator,
    ProductQuote,
};
use crate::types::{Money, Months, Percent, Vehicle};

// ---------------------------------------------------------------------------
// Edits and read models
// ---------------------------------------------------------------------------

/// A single user action, as sent by the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum FinanceEdit {
    SetVehiclePrice(Money),
    SetDownPaymentAmount(Money),
    SetDownPaymentPercentage(Percent),
    SetInterestRate(Percent),
    SetLoanTerm(Months),
    SetBalloonAmount(Money),
    SetResidualValue(Money),
    SelectProduct(FinanceProduct),
    NextProduct,
    PrevProduct,
}

/// The figures the presenter shows for the current state.
///
/// `monthly_payment` and `total_payment` belong to the active product and
/// are `None` when that product is not priced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSummary {
    pub vehicle_name: String,
    pub active_product: FinanceProduct,
    pub monthly_payment: Option<Money>,
    pub total_payment: Option<Money>,
    pub total_interest: Money,
    pub balloon_monthly_payment: Money,
    pub lease_monthly_payment: Money,
    /// Priced product with the lowest monthly payment
    pub cheapest_product: Option<FinanceProduct>,
}

/// Full state of a session, as handed to the presenter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceSnapshot {
    pub vehicle: Vehicle,
    pub inputs: FinanceInputs,
    pub active_product: FinanceProduct,
    pub summary: ResultSummary,
    pub results: FinanceResults,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct FinanceEngine {
    vehicle: Vehicle,
    inputs: FinanceInputs,
    active: FinanceProduct,
    calculators: Vec<Box<dyn ProductCalculator>>,
    results: FinanceResults,
    adjustments: Vec<Adjustment>,
}

impl FinanceEngine {
    pub fn new(vehicle: Vehicle) -> Self {
        Self::with_config(vehicle, &EngineConfig::default())
    }

    /// Start a session seeded from the vehicle price and `config` defaults.
    pub fn with_config(mut vehicle: Vehicle, config: &EngineConfig) -> Self {
        let inputs = FinanceInputs::from_vehicle_price(vehicle.price, config);
        vehicle.price = inputs.vehicle_price;
        let calculators = default_calculators(IslamicFinance::from_config(config));
        let results = FinanceResults::compute(&calculators, &inputs);

        log::debug!(
            "finance session opened for {} at {}",
            vehicle.name,
            inputs.vehicle_price
        );

        Self {
            vehicle,
            inputs,
            active: FinanceProduct::default(),
            calculators,
            results,
            adjustments: Vec::new(),
        }
    }

    // -- Setters -------------------------------------------------------------

    pub fn set_vehicle_price(&mut self, price: Money) -> &FinanceResults {
        let adjustments = self.inputs.set_vehicle_price(price);
        self.vehicle.price = self.inputs.vehicle_price;
        self.commit(adjustments)
    }

    pub fn set_down_payment_amount(&mut self, amount: Money) -> &FinanceResults {
        let adjustments = self.inputs.set_down_payment_amount(amount);
        self.commit(adjustments)
    }

    pub fn set_down_payment_percentage(&mut self, percentage: Percent) -> &FinanceResults {
        let adjustments = self.inputs.set_down_payment_percentage(percentage);
        self.commit(adjustments)
    }

    pub fn set_interest_rate(&mut self, rate: Percent) -> &FinanceResults {
        let adjustments = self.inputs.set_interest_rate(rate);
        self.commit(adjustments)
    }

    pub fn set_loan_term(&mut self, months: Months) -> &FinanceResults {
        let adjustments = self.inputs.set_loan_term(months);
        self.commit(adjustments)
    }

    pub fn set_balloon_amount(&mut self, amount: Money) -> &FinanceResults {
        let adjustments = self.inputs.set_balloon_amount(amount);
        self.commit(adjustments)
    }

    pub fn set_residual_value(&mut self, value: Money) -> &FinanceResults {
        let adjustments = self.inputs.set_residual_value(value);
        self.commit(adjustments)
    }

    /// Dispatch an edit to the matching setter or selection call.
    pub fn apply(&mut self, edit: FinanceEdit) -> &FinanceResults {
        match edit {
            FinanceEdit::SetVehiclePrice(v) => self.set_vehicle_price(v),
            FinanceEdit::SetDownPaymentAmount(v) => self.set_down_payment_amount(v),
            FinanceEdit::SetDownPaymentPercentage(p) => self.set_down_payment_percentage(p),
            FinanceEdit::SetInterestRate(r) => self.set_interest_rate(r),
            FinanceEdit::SetLoanTerm(m) => self.set_loan_term(m),
            FinanceEdit::SetBalloonAmount(v) => self.set_balloon_amount(v),
            FinanceEdit::SetResidualValue(v) => self.set_residual_value(v),
            FinanceEdit::SelectProduct(p) => {
                self.select_product(p);
                &self.results
            }
            FinanceEdit::NextProduct => {
                self.next_product();
                &self.results
            }
            FinanceEdit::PrevProduct => {
                self.prev_product();
                &self.results
            }
        }
    }

    // -- Product selection ---------------------------------------------------

    /// Switching products leaves the inputs alone. Results are already
    /// current for every product, so nothing is recomputed.
    pub fn select_product(&mut self, product: FinanceProduct) -> FinanceProduct {
        self.adjustments.clear();
        self.active = product;
        self.active
    }

    pub fn next_product(&mut self) -> FinanceProduct {
        self.select_product(self.active.next())
    }

    pub fn prev_product(&mut self) -> FinanceProduct {
        self.select_product(self.active.prev())
    }

    // -- Readers -------------------------------------------------------------

    pub fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    pub fn inputs(&self) -> &FinanceInputs {
        &self.inputs
    }

    pub fn active_product(&self) -> FinanceProduct {
        self.active
    }

    pub fn results(&self) -> &FinanceResults {
        &self.results
    }

    pub fn active_quote(&self) -> Option<&ProductQuote> {
        self.results.get(self.active)
    }

    /// Clamps applied by the most recent edit.
    pub fn adjustments(&self) -> &[Adjustment] {
        &self.adjustments
    }

    pub fn summary(&self) -> ResultSummary {
        let active = self.active_quote();
        ResultSummary {
            vehicle_name: self.vehicle.name.clone(),
            active_product: self.active,
            monthly_payment: active.and_then(ProductQuote::monthly_payment),
            total_payment: active.and_then(ProductQuote::total_payment),
            total_interest: self
                .results
                .standard()
                .map(|q| q.total_interest)
                .unwrap_or_default(),
            balloon_monthly_payment: self
                .results
                .balloon()
                .map(|q| q.monthly_payment)
                .unwrap_or_default(),
            lease_monthly_payment: self
                .results
                .lease()
                .map(|q| q.monthly_payment)
                .unwrap_or_default(),
            cheapest_product: self.results.cheapest_monthly(),
        }
    }

    /// Repayment schedule for `product` under the current inputs. Empty for
    /// products that do not amortize a balance.
    pub fn schedule(&self, product: FinanceProduct) -> Vec<AmortizationRow> {
        self.calculators
            .iter()
            .find(|c| c.product() == product)
            .map(|c| c.schedule(&self.inputs))
            .unwrap_or_default()
    }

    pub fn active_schedule(&self) -> Vec<AmortizationRow> {
        self.schedule(self.active)
    }

    pub fn snapshot(&self) -> FinanceSnapshot {
        FinanceSnapshot {
            vehicle: self.vehicle.clone(),
            inputs: self.inputs.clone(),
            active_product: self.active,
            summary: self.summary(),
            results: self.results.clone(),
        }
    }

    // -- Internals -----------------------------------------------------------

    fn commit(&mut self, adjustments: Vec<Adjustment>) -> &FinanceResults {
        for adj in &adjustments {
            log::warn!("{adj}");
        }
        self.adjustments = adjustments;
        self.recompute();
        &self.results
    }

    fn recompute(&mut self) {
        self.results = FinanceResults::compute(&self.calculators, &self.inputs);
        log::debug!(
            "recomputed {} products: price={} down={} ({}%) rate={}% term={}",
            self.results.quotes.len(),
            self.inputs.vehicle_price,
            self.inputs.down_payment_amount,
            self.inputs.down_payment_percentage,
            self.inputs.interest_rate,
            self.inputs.loan_term_months
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn sample_engine() -> FinanceEngine {
        FinanceEngine::new(Vehicle::new("Roadster GT", dec!(100000)))
    }

    #[test]
    fn test_initial_state() {
        let engine = sample_engine();
        assert_eq!(engine.active_product(), FinanceProduct::StandardLoan);
        assert_eq!(engine.results().quotes.len(), 4);
        assert!(engine.adjustments().is_empty());
    }

    #[test]
    fn test_setter_recomputes_every_product() {
        let mut engine = sample_engine();
        let before = engine.results().clone();
        engine.set_interest_rate(dec!(7));

        let after = engine.results();
        for product in [
            FinanceProduct::StandardLoan,
            FinanceProduct::BalloonPayment,
            FinanceProduct::Lease,
        ] {
            assert_ne!(before.get(product), after.get(product), "{product} stale");
        }
    }

    #[test]
    fn test_setter_returns_fresh_results() {
        let mut engine = sample_engine();
        let principal = engine
            .set_down_payment_amount(dec!(30000))
            .standard()
            .map(|q| q.principal);
        assert_eq!(principal, Some(dec!(70000)));
    }

    #[test]
    fn test_switching_product_keeps_inputs() {
        let mut engine = sample_engine();
        engine.set_loan_term(36);
        let inputs = engine.inputs().clone();

        engine.next_product();
        engine.next_product();
        assert_eq!(engine.active_product(), FinanceProduct::Lease);
        assert_eq!(engine.inputs(), &inputs);
    }

    #[test]
    fn test_adjustments_reset_per_edit() {
        let mut engine = sample_engine();
        engine.set_interest_rate(dec!(50));
        assert_eq!(engine.adjustments().len(), 1);
        engine.set_interest_rate(dec!(5));
        assert!(engine.adjustments().is_empty());
    }

    #[test]
    fn test_apply_dispatch() {
        let mut engine = sample_engine();
        engine.apply(FinanceEdit::SetDownPaymentPercentage(dec!(10)));
        engine.apply(FinanceEdit::PrevProduct);

        assert_eq!(engine.inputs().down_payment_amount, dec!(10000));
        assert_eq!(engine.active_product(), FinanceProduct::IslamicFinance);
    }

    #[test]
    fn test_summary_for_islamic_has_no_active_figures() {
        let mut engine = sample_engine();
        engine.select_product(FinanceProduct::IslamicFinance);
        let summary = engine.summary();

        assert_eq!(summary.monthly_payment, None);
        assert_eq!(summary.total_payment, None);
        assert!(summary.lease_monthly_payment > Decimal::ZERO);
    }

    #[test]
    fn test_edit_json_shape() {
        let edit: FinanceEdit =
            serde_json::from_str(r#"{ "op": "set_loan_term", "value": 48 }"#).unwrap();
        assert_eq!(edit, FinanceEdit::SetLoanTerm(48));

        let edit: FinanceEdit = serde_json::from_str(r#"{ "op": "next_product" }"#).unwrap();
        assert_eq!(edit, FinanceEdit::NextProduct);
    }

    #[test]
    fn test_summary_names_cheapest_product() {
        let engine = sample_engine();
        assert_eq!(
            engine.summary().cheapest_product,
            Some(FinanceProduct::BalloonPayment)
        );
    }

    #[test]
    fn test_schedule_per_product() {
        let mut engine = sample_engine();
        assert_eq!(engine.active_schedule().len(), 60);

        engine.select_product(FinanceProduct::BalloonPayment);
        let balloon = engine.active_schedule();
        assert_eq!(balloon.last().map(|r| r.closing_balance), Some(dec!(30000)));

        assert!(engine.schedule(FinanceProduct::Lease).is_empty());
        assert!(engine.schedule(FinanceProduct::IslamicFinance).is_empty());
    }
}
