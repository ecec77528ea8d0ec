pub mod csv_out;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("JSON serialization error: {}", e),
    }
}

/// Flatten nested objects and arrays into dotted `field` / `value` pairs,
/// e.g. `summary.monthly_payment` or `results.quotes.2.monthly_payment`.
pub fn flatten(value: &Value) -> Vec<(String, Value)> {
    let mut rows = Vec::new();
    flatten_into("", value, &mut rows);
    rows
}

fn flatten_into(prefix: &str, value: &Value, rows: &mut Vec<(String, Value)>) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, val) in map {
                flatten_into(&join_key(prefix, key), val, rows);
            }
        }
        Value::Array(arr) if arr.iter().any(|v| v.is_object()) => {
            for (i, val) in arr.iter().enumerate() {
                flatten_into(&join_key(prefix, &i.to_string()), val, rows);
            }
        }
        _ => rows.push((prefix.to_string(), value.clone())),
    }
}

fn join_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Look up a dotted path such as `summary.monthly_payment`.
pub fn lookup<'a>(map: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut parts = path.split('.');
    let mut current = map.get(parts.next()?)?;
    for part in parts {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_nested() {
        let value = json!({
            "summary": { "monthly_payment": "1525" },
            "results": { "quotes": [ { "product": "lease" } ] },
            "warnings": ["a", "b"]
        });
        let rows = flatten(&value);
        let keys: Vec<&str> = rows.iter().map(|(k, _)| k.as_str()).collect();
        assert!(keys.contains(&"summary.monthly_payment"));
        assert!(keys.contains(&"results.quotes.0.product"));
        assert!(keys.contains(&"warnings"));
    }

    #[test]
    fn test_lookup_dotted() {
        let value = json!({ "summary": { "monthly_payment": "932.15" } });
        let map = value.as_object().unwrap();
        assert_eq!(lookup(map, "summary.monthly_payment"), Some(&json!("932.15")));
        assert_eq!(lookup(map, "summary.missing"), None);
    }
}
