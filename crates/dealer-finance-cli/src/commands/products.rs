use serde_json::{json, Value};

use dealer_finance_core::products::FinanceProduct;

pub fn run_products() -> Result<Value, Box<dyn std::error::Error>> {
    let products: Vec<Value> = FinanceProduct::ALL
        .iter()
        .map(|p| {
            json!({
                "product": p,
                "label": p.label(),
                "computed": p.is_computed(),
            })
        })
        .collect();
    Ok(Value::Array(products))
}
