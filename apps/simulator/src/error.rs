//! Error types for the pricing simulator.

use std::path::PathBuf;

use mesa_core::CoreError;

/// Simulator errors.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// The engine rejected the request (invalid input or infeasible price).
    #[error(transparent)]
    Pricing(#[from] CoreError),

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Settings file is not valid TOML: {0}")]
    SettingsParse(#[from] toml::de::Error),

    #[error("Could not serialize settings: {0}")]
    SettingsWrite(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid value for {var}: '{value}' ({reason})")]
    InvalidEnv {
        var: String,
        value: String,
        reason: String,
    },

    #[error("No settings path available; pass --config")]
    NoConfigPath,

    #[error("Failed to write output: {0}")]
    Output(#[source] std::io::Error),
}

impl SimError {
    /// Wraps an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SimError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for simulator operations.
pub type SimResult<T> = Result<T, SimError>;
