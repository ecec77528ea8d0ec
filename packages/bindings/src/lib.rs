use napi::Result as NapiResult;
use napi_derive::napi;

use dealer_finance_core::products::FinanceProduct;
use dealer_finance_core::quote;
use dealer_finance_core::EngineConfig;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Engine defaults from an optional JSON config; absent or empty means
/// built-in defaults.
fn engine_config(config_json: Option<String>) -> NapiResult<EngineConfig> {
    match config_json {
        Some(json) if !json.trim().is_empty() => {
            EngineConfig::from_json(&json).map_err(to_napi_error)
        }
        _ => Ok(EngineConfig::default()),
    }
}

// ---------------------------------------------------------------------------
// Quotes
// ---------------------------------------------------------------------------

#[napi]
pub fn quote_finance(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    let input: quote::QuoteInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let config = engine_config(config_json)?;
    let output = quote::quote_finance(&input, &config);
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Repayment schedule for the product named in the quote request.
#[napi]
pub fn product_schedule(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    let input: quote::QuoteInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let config = engine_config(config_json)?;
    let output = quote::product_schedule(&input, &config);
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Replay the page's edit log against a fresh session. The presenter keeps
/// the log and calls this after every edit.
#[napi]
pub fn apply_finance_edits(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    let input: quote::SessionInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let config = engine_config(config_json)?;
    let output = quote::replay_session(&input, &config);
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Loans
// ---------------------------------------------------------------------------

#[napi]
pub fn annuity_payment(input_json: String) -> NapiResult<String> {
    let input: quote::LoanInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = quote::loan_payment(&input, false);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let input: quote::LoanInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = quote::loan_payment(&input, true);
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

#[napi]
pub fn list_products() -> NapiResult<String> {
    let products: Vec<serde_json::Value> = FinanceProduct::ALL
        .iter()
        .map(|p| {
            serde_json::json!({
                "product": p,
                "label": p.label(),
                "computed": p.is_computed(),
                "next": p.next(),
                "prev": p.prev(),
            })
        })
        .collect();
    serde_json::to_string(&products).map_err(to_napi_error)
}
