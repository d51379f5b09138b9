//! Settings file loading

use std::path::Path;
use tracing::info;
use dex_core::AppSettings;

use crate::DataError;

/// Load settings from a JSON file
///
/// Missing fields fall back to their defaults; an empty id range or a zero
/// page size is rejected.
pub fn load_settings(path: &Path) -> Result<AppSettings, DataError> {
    let text = std::fs::read_to_string(path)?;
    let settings = parse_settings(&text)?;
    info!("Loaded settings from {}", path.display());
    Ok(settings)
}

/// Parse and validate settings JSON
///
/// The document must be an object; serde would otherwise accept an array as
/// positional fields.
pub fn parse_settings(text: &str) -> Result<AppSettings, DataError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    if !value.is_object() {
        return Err(DataError::InvalidConfig("settings must be a JSON object".to_string()));
    }
    let settings: AppSettings = serde_json::from_value(value)?;
    validate(&settings)?;
    Ok(settings)
}

fn validate(settings: &AppSettings) -> Result<(), DataError> {
    if settings.id_space().is_none() {
        return Err(DataError::InvalidConfig(format!(
            "min_id {} is greater than max_id {}",
            settings.min_id, settings.max_id
        )));
    }
    if settings.page_size == 0 {
        return Err(DataError::InvalidConfig("page_size must be at least 1".to_string()));
    }
    if let Some(url) = &settings.api_base_url {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(DataError::InvalidConfig(format!("api_base_url {:?} is not an http(s) URL", url)));
        }
    }
    Ok(())
}
