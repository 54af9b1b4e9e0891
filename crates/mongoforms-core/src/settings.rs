//! Settings for mongoforms.
//!
//! [`Settings`] holds the handful of knobs the document widgets and the
//! logging setup read. [`SETTINGS`] is the global, set-once instance; widgets
//! read it through [`LazySettings::get_or_default`] so an unconfigured
//! process still renders with the defaults.

use std::collections::HashMap;
use std::sync::{LazyLock, OnceLock};

use serde::{Deserialize, Serialize};

use crate::error::{FormsError, FormsResult};

/// The complete set of mongoforms settings.
///
/// Keys missing from a configuration file keep their default.
///
/// ```
/// use mongoforms_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert_eq!(settings.static_url, "/static/");
/// assert_eq!(settings.add_button_label, "Add");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Switches the log format to pretty output.
    pub debug: bool,
    /// URL prefix for widget scripts and stylesheets.
    pub static_url: String,
    /// Text of the "add row" button rendered by list widgets.
    pub add_button_label: String,
    /// Separator used when a comma-separated list is shown in a text input.
    pub simple_list_separator: String,
    /// The log level or filter directive (e.g. "info", "mongoforms_forms=debug").
    pub log_level: String,
    /// Application values mongoforms itself does not read.
    pub extra: HashMap<String, serde_json::Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            static_url: "/static/".to_string(),
            add_button_label: "Add".to_string(),
            simple_list_separator: ", ".to_string(),
            log_level: "info".to_string(),
            extra: HashMap::new(),
        }
    }
}

static DEFAULT_SETTINGS: LazyLock<Settings> = LazyLock::new(Settings::default);

/// Settings that are configured at most once per process.
#[derive(Debug, Default)]
pub struct LazySettings {
    cell: OnceLock<Settings>,
}

impl LazySettings {
    /// Creates an unconfigured container.
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    /// Installs `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`FormsError::ConfigurationError`] if settings were already
    /// configured; the first configuration stays in effect.
    pub fn configure(&self, settings: Settings) -> FormsResult<()> {
        self.cell.set(settings).map_err(|_| {
            FormsError::ConfigurationError("settings have already been configured".to_string())
        })
    }

    /// Returns the configured settings, if any.
    pub fn get(&self) -> Option<&Settings> {
        self.cell.get()
    }

    /// Returns the configured settings, or the defaults if none were configured.
    pub fn get_or_default(&self) -> &Settings {
        self.get().unwrap_or(&DEFAULT_SETTINGS)
    }
}

/// The global settings instance.
pub static SETTINGS: LazySettings = LazySettings::new();
