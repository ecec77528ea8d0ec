use std::fs;
use std::path::Path;

use dealer_finance_core::EngineConfig;
use tracing::info;

/// Load engine defaults from a JSON or YAML file, or use the built-in
/// defaults when no path is given.
pub fn load(path: Option<&str>) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };

    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config '{}': {}", path, e))?;

    let config = if is_yaml(path) {
        let config: EngineConfig = serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config '{}': {}", path, e))?;
        config.validate()?;
        config
    } else {
        EngineConfig::from_json(&contents)?
    };

    info!("Loaded engine configuration from {}", path);
    Ok(config)
}

fn is_yaml(path: &str) -> bool {
    matches!(
        Path::new(path).extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}
