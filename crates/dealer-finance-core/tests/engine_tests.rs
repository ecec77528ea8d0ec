use dealer_finance_core::products::FinanceProduct;
use dealer_finance_core::{EngineConfig, FinanceEdit, FinanceEngine, ProductQuote, Vehicle};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Fixtures
// ===========================================================================

fn scenario_engine() -> FinanceEngine {
    let mut engine = FinanceEngine::new(Vehicle::new("Roadster GT", dec!(100000)));
    engine.set_down_payment_amount(dec!(20000));
    engine.set_interest_rate(dec!(4.5));
    engine.set_loan_term(60);
    engine.set_balloon_amount(dec!(30000));
    engine.set_residual_value(dec!(40000));
    engine
}

fn assert_all_non_negative(engine: &FinanceEngine) {
    for quote in &engine.results().quotes {
        for amount in quote.amounts() {
            assert!(
                amount >= Decimal::ZERO,
                "{} produced negative figure {amount}",
                quote.product()
            );
        }
    }
}

// ===========================================================================
// Reference scenarios
// ===========================================================================

#[test]
fn test_scenario_a_standard_loan() {
    let engine = scenario_engine();
    let q = engine.results().standard().unwrap();

    assert_eq!(q.principal, dec!(80000));
    // ≈ 1491.44 per month
    assert!((q.monthly_payment - dec!(1491.44)).abs() < dec!(0.01));
    // 60 * 1491.4415 - 80000
    assert!((q.total_interest - dec!(9486.49)).abs() < dec!(0.01));
    assert!((q.total_payment - dec!(109486.49)).abs() < dec!(0.01));
}

#[test]
fn test_scenario_b_balloon_loan() {
    let engine = scenario_engine();
    let q = engine.results().balloon().unwrap();

    assert_eq!(q.principal, dec!(50000));
    assert!((q.monthly_payment - dec!(932.15)).abs() < dec!(0.01));
    assert_eq!(q.final_lump_sum, dec!(30000));
}

#[test]
fn test_scenario_c_lease() {
    let engine = scenario_engine();
    let q = engine.results().lease().unwrap();

    assert_eq!(q.depreciation_component, dec!(1000));
    assert_eq!(q.finance_charge_component, dec!(525));
    assert_eq!(q.monthly_payment, dec!(1525));
}

#[test]
fn test_scenario_d_zero_price() {
    let mut engine = scenario_engine();
    engine.set_vehicle_price(Decimal::ZERO);

    for quote in &engine.results().quotes {
        match quote {
            ProductQuote::IslamicFinance(_) => assert_eq!(quote.monthly_payment(), None),
            _ => assert_eq!(quote.monthly_payment(), Some(Decimal::ZERO)),
        }
        for amount in quote.amounts() {
            assert_eq!(amount, Decimal::ZERO, "{} not zero", quote.product());
        }
    }
    assert_eq!(engine.inputs().down_payment_amount, Decimal::ZERO);
}

// ===========================================================================
// Synchronisation
// ===========================================================================

#[test]
fn test_price_edit_reanchors_on_percentage() {
    let mut engine = scenario_engine();
    engine.set_down_payment_percentage(dec!(30));
    engine.set_vehicle_price(dec!(50000));

    assert_eq!(engine.inputs().down_payment_percentage, dec!(30));
    assert_eq!(engine.inputs().down_payment_amount, dec!(15000));
    assert_eq!(engine.results().standard().unwrap().principal, dec!(35000));
}

#[test]
fn test_price_restored_after_zero() {
    let mut engine = scenario_engine();
    engine.set_vehicle_price(Decimal::ZERO);
    engine.set_vehicle_price(dec!(100000));

    // Percentage survived the zero price, so the amount comes back
    assert_eq!(engine.inputs().down_payment_amount, dec!(20000));
}

// ===========================================================================
// Product isolation and selection
// ===========================================================================

#[test]
fn test_balloon_edit_only_moves_balloon_product() {
    let mut engine = scenario_engine();
    let before = engine.results().clone();
    engine.set_balloon_amount(dec!(10000));
    let after = engine.results();

    assert_eq!(before.standard(), after.standard());
    assert_eq!(before.lease(), after.lease());
    assert_ne!(before.balloon(), after.balloon());
}

#[test]
fn test_residual_edit_only_moves_lease_product() {
    let mut engine = scenario_engine();
    let before = engine.results().clone();
    engine.set_residual_value(dec!(20000));
    let after = engine.results();

    assert_eq!(before.standard(), after.standard());
    assert_eq!(before.balloon(), after.balloon());
    assert_ne!(before.lease(), after.lease());
}

#[test]
fn test_full_carousel_cycle() {
    let mut engine = scenario_engine();
    let inputs = engine.inputs().clone();
    let results = engine.results().clone();

    let mut seen = Vec::new();
    for _ in 0..FinanceProduct::ALL.len() {
        seen.push(engine.next_product());
    }
    assert_eq!(engine.active_product(), FinanceProduct::StandardLoan);
    assert_eq!(seen.len(), 4);
    assert_eq!(engine.inputs(), &inputs);
    assert_eq!(engine.results(), &results);

    assert_eq!(engine.prev_product(), FinanceProduct::IslamicFinance);
}

#[test]
fn test_summary_follows_active_product() {
    let mut engine = scenario_engine();
    engine.select_product(FinanceProduct::Lease);
    let summary = engine.summary();

    assert_eq!(summary.active_product, FinanceProduct::Lease);
    assert_eq!(summary.monthly_payment, Some(dec!(1525)));
    assert_eq!(summary.lease_monthly_payment, dec!(1525));
    assert!((summary.balloon_monthly_payment - dec!(932.15)).abs() < dec!(0.01));
    assert!((summary.total_interest - dec!(9486.49)).abs() < dec!(0.01));
}

// ===========================================================================
// Guards
// ===========================================================================

#[test]
fn test_extreme_inputs_stay_safe() {
    let mut engine = FinanceEngine::new(Vehicle::new("Hypercar", dec!(5_000_000_000_000)));
    let edits = [
        FinanceEdit::SetInterestRate(dec!(-3)),
        FinanceEdit::SetLoanTerm(0),
        FinanceEdit::SetDownPaymentPercentage(dec!(120)),
        FinanceEdit::SetBalloonAmount(dec!(-100)),
        FinanceEdit::SetResidualValue(dec!(99_000_000_000_000)),
    ];
    for edit in edits {
        engine.apply(edit);
        assert!(!engine.adjustments().is_empty());
        assert_all_non_negative(&engine);
    }

    let inputs = engine.inputs();
    assert_eq!(inputs.interest_rate, dec!(1));
    assert_eq!(inputs.loan_term_months, 12);
    assert_eq!(inputs.down_payment_percentage, dec!(50));
    assert_eq!(inputs.balloon_amount, Decimal::ZERO);
    assert_eq!(inputs.residual_value, inputs.vehicle_price);
}

#[test]
fn test_unvalidated_config_stays_safe() {
    let config = EngineConfig {
        balloon_percentage: dec!(1e20),
        residual_percentage: dec!(1e20),
        ..EngineConfig::default()
    };
    let engine = FinanceEngine::with_config(Vehicle::new("Hypercar", dec!(1e20)), &config);

    let inputs = engine.inputs();
    assert_eq!(inputs.balloon_amount, inputs.vehicle_price);
    assert_eq!(inputs.residual_value, inputs.vehicle_price);
    assert_all_non_negative(&engine);
}

#[test]
fn test_balloon_schedule_closes_at_lump_sum() {
    let mut engine = scenario_engine();
    engine.select_product(FinanceProduct::BalloonPayment);
    let schedule = engine.active_schedule();

    assert_eq!(schedule.len(), 60);
    assert_eq!(schedule[0].opening_balance, dec!(80000));
    assert_eq!(schedule[59].closing_balance, dec!(30000));
}

#[test]
fn test_snapshot_serializes() {
    let engine = scenario_engine();
    let json = serde_json::to_value(engine.snapshot()).unwrap();

    assert_eq!(json["active_product"], "standard_loan");
    assert_eq!(json["results"]["quotes"][2]["product"], "lease");
    let lease_monthly: Decimal = json["results"]["quotes"][2]["monthly_payment"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();
    assert_eq!(lease_monthly, dec!(1525));
}

#[test]
fn test_cheapest_monthly_skips_islamic() {
    let mut engine = scenario_engine();
    assert_eq!(
        engine.results().cheapest_monthly(),
        Some(FinanceProduct::BalloonPayment)
    );

    // With no price every priced product ties at zero; the disclosure never wins
    engine.set_vehicle_price(Decimal::ZERO);
    assert_ne!(
        engine.results().cheapest_monthly(),
        Some(FinanceProduct::IslamicFinance)
    );
}
