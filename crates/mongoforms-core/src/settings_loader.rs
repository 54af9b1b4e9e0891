//! Settings loading from configuration files.
//!
//! A TOML or JSON file is read over the defaults, then `MONGOFORMS_*`
//! environment variables override individual keys:
//!
//! | Env Var | Setting |
//! |---|---|
//! | `MONGOFORMS_DEBUG` | `debug` |
//! | `MONGOFORMS_LOG_LEVEL` | `log_level` |
//! | `MONGOFORMS_STATIC_URL` | `static_url` |
//! | `MONGOFORMS_ADD_BUTTON_LABEL` | `add_button_label` |
//! | `MONGOFORMS_SIMPLE_LIST_SEPARATOR` | `simple_list_separator` |
//!
//! ```rust,no_run
//! use mongoforms_core::settings_loader;
//!
//! let settings = settings_loader::from_toml_file_with_env("config/mongoforms.toml").unwrap();
//! ```

use std::path::Path;

use crate::error::{FormsError, FormsResult};
use crate::settings::Settings;

/// Parses settings from TOML. Absent keys keep their defaults.
pub fn from_toml_str(toml_str: &str) -> FormsResult<Settings> {
    toml::from_str(toml_str)
        .map_err(|e| FormsError::ConfigurationError(format!("Failed to parse TOML: {e}")))
}

/// Parses settings from JSON. Absent keys keep their defaults.
pub fn from_json_str(json_str: &str) -> FormsResult<Settings> {
    serde_json::from_str(json_str)
        .map_err(|e| FormsError::ConfigurationError(format!("Failed to parse JSON: {e}")))
}

/// Loads settings from a TOML file.
pub fn from_toml_file(path: impl AsRef<Path>) -> FormsResult<Settings> {
    from_toml_str(&read_file(path.as_ref(), "TOML")?)
}

/// Loads settings from a JSON file.
pub fn from_json_file(path: impl AsRef<Path>) -> FormsResult<Settings> {
    from_json_str(&read_file(path.as_ref(), "JSON")?)
}

/// Loads settings from a TOML file, then applies environment overrides.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> FormsResult<Settings> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// The defaults with environment overrides applied.
pub fn from_env() -> Settings {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Applies the `MONGOFORMS_*` environment variables that are set.
pub fn apply_env_overrides(settings: &mut Settings) {
    apply_overrides(settings, |key| std::env::var(key).ok());
}

fn apply_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(debug) = lookup("MONGOFORMS_DEBUG") {
        settings.debug = matches!(debug.to_lowercase().as_str(), "true" | "1" | "yes");
    }
    let strings: [(&str, &mut String); 4] = [
        ("MONGOFORMS_LOG_LEVEL", &mut settings.log_level),
        ("MONGOFORMS_STATIC_URL", &mut settings.static_url),
        ("MONGOFORMS_ADD_BUTTON_LABEL", &mut settings.add_button_label),
        (
            "MONGOFORMS_SIMPLE_LIST_SEPARATOR",
            &mut settings.simple_list_separator,
        ),
    ];
    for (key, slot) in strings {
        if let Some(value) = lookup(key) {
            *slot = value;
        }
    }
}

fn read_file(path: &Path, format: &str) -> FormsResult<String> {
    std::fs::read_to_string(path).map_err(|e| {
        FormsError::ConfigurationError(format!(
            "Failed to read {format} file '{}': {e}",
            path.display()
        ))
    })
}
