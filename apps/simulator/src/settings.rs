//! # Simulator Settings
//!
//! Loads the restaurant configuration and pricing policy the engine runs
//! with.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     MESA_FIXED_EXPENSES=15000                                          │
//! │     MESA_TAX_REGIME=lucro_presumido                                    │
//! │                                                                         │
//! │  2. TOML Settings File                                                 │
//! │     --config <FILE>, or                                                │
//! │     ~/.config/mesa/settings.toml (Linux)                               │
//! │     ~/Library/Application Support/com.mesa.mesa/settings.toml (macOS)  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     RestaurantConfig::default(), PricingPolicy::default()              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Settings File Format
//! The `[restaurant]` table uses the same camelCase keys as the web app's
//! stored JSON blob.
//! ```toml
//! [restaurant]
//! businessName = "Cantina da Praça"
//! fixedExpenses = 15000.0
//! taxRegime = "simples_nacional"
//! stateIcmsRate = 18.0
//!
//! [policy]
//! break_even_buffer_percentage = 5.0
//!
//! [policy.tax]
//! simples_nacional_rate = 12.0
//!
//! [policy.advisory]
//! food_cost_max = 35.0
//!
//! [display]
//! currency_symbol = "R$"
//! ```

use std::path::{Path, PathBuf};

use mesa_core::{PricingPolicy, RestaurantConfig, TaxRegime};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{SimError, SimResult};

// =============================================================================
// Display Settings
// =============================================================================

/// How money is rendered in text reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub currency_symbol: String,
    pub decimal_separator: char,
    pub thousands_separator: char,
}

impl Default for DisplaySettings {
    /// Brazilian real: `R$ 1.234,56`
    fn default() -> Self {
        DisplaySettings {
            currency_symbol: "R$".to_string(),
            decimal_separator: ',',
            thousands_separator: '.',
        }
    }
}

impl DisplaySettings {
    /// Formats an amount with two decimals and grouped thousands.
    ///
    /// ## Example
    /// ```rust
    /// use mesa_simulator::settings::DisplaySettings;
    ///
    /// let display = DisplaySettings::default();
    /// assert_eq!(display.format_currency(1234.5), "R$ 1.234,50");
    /// assert_eq!(display.format_currency(-0.5), "-R$ 0,50");
    /// ```
    pub fn format_currency(&self, amount: f64) -> String {
        let cents = (amount * 100.0).round() as i64;
        let whole = (cents / 100).unsigned_abs();
        let frac = (cents % 100).unsigned_abs();

        let digits = whole.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(self.thousands_separator);
            }
            grouped.push(ch);
        }

        format!(
            "{}{} {}{}{:02}",
            if cents < 0 { "-" } else { "" },
            self.currency_symbol,
            grouped,
            self.decimal_separator,
            frac
        )
    }
}

// =============================================================================
// Settings
// =============================================================================

/// Complete simulator settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Restaurant configuration handed to the engine.
    pub restaurant: RestaurantConfig,

    /// Rates, buffer and advisory thresholds.
    pub policy: PricingPolicy,

    /// Report formatting.
    pub display: DisplaySettings,
}

impl Settings {
    /// Loads settings from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Settings file (a missing file is not an error)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> SimResult<Self> {
        let mut settings = match config_path.or_else(Self::default_config_path) {
            Some(path) if path.exists() => {
                info!(path = %path.display(), "Loading settings from file");
                Self::from_file(&path)?
            }
            Some(path) => {
                debug!(path = %path.display(), "Settings file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        settings.apply_env_overrides(|var| std::env::var(var).ok())?;
        settings.validate()?;

        Ok(settings)
    }

    /// Parses a settings file without applying environment overrides.
    pub fn from_file(path: &Path) -> SimResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| SimError::io(path, e))?;
        Ok(toml::from_str(&contents)?)
    }

    /// Writes settings as pretty TOML, creating parent directories.
    pub fn save(&self, config_path: Option<PathBuf>) -> SimResult<PathBuf> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or(SimError::NoConfigPath)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| SimError::io(parent, e))?;
        }

        std::fs::write(&path, self.to_toml()?).map_err(|e| SimError::io(&path, e))?;

        info!(path = %path.display(), "Settings saved");
        Ok(path)
    }

    /// Renders the settings as pretty TOML.
    pub fn to_toml(&self) -> SimResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validates restaurant configuration and policy.
    pub fn validate(&self) -> SimResult<()> {
        self.restaurant.validate()?;
        self.policy.validate()?;
        Ok(())
    }

    /// Applies environment variable overrides.
    ///
    /// `lookup` returns the value of a variable, if set. Unparseable values
    /// are rejected instead of ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> SimResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = lookup("MESA_BUSINESS_NAME") {
            self.restaurant.business_name = name;
        }

        if let Some(value) = lookup("MESA_FIXED_EXPENSES") {
            debug!(value = %value, "Overriding fixed expenses from environment");
            self.restaurant.fixed_expenses = parse_env("MESA_FIXED_EXPENSES", &value)?;
        }

        if let Some(value) = lookup("MESA_TAX_REGIME") {
            debug!(value = %value, "Overriding tax regime from environment");
            self.restaurant.tax_regime = value
                .parse::<TaxRegime>()
                .map_err(|e| SimError::InvalidEnv {
                    var: "MESA_TAX_REGIME".to_string(),
                    value: value.clone(),
                    reason: e.to_string(),
                })?;
        }

        if let Some(value) = lookup("MESA_STATE_ICMS_RATE") {
            self.restaurant.state_icms_rate = Some(parse_env("MESA_STATE_ICMS_RATE", &value)?);
        }

        if let Some(value) = lookup("MESA_BREAK_EVEN_BUFFER") {
            self.policy.break_even_buffer_percentage =
                parse_env("MESA_BREAK_EVEN_BUFFER", &value)?;
        }

        Ok(())
    }

    /// Returns the default settings file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "mesa", "mesa")
            .map(|dirs| dirs.config_dir().join("settings.toml"))
    }
}

fn parse_env(var: &str, value: &str) -> SimResult<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|e| SimError::InvalidEnv {
            var: var.to_string(),
            value: value.to_string(),
            reason: e.to_string(),
        })
}
