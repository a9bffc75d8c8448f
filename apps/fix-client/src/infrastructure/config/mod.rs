//! Configuration module for the FIX client.
//!
//! Loads the YAML file that names contexts, initiators and sessions,
//! interpolates environment variables, validates cross references and
//! resolves the context a command runs against.
//!
//! # Usage
//!
//! ```rust,ignore
//! use fix_client::infrastructure::config::{load_config, resolve_context};
//!
//! let config = load_config("fix.yaml")?;
//! let context = resolve_context(&config, Some("uat"), Path::new("."))?;
//! ```
//!
//! # File shape
//!
//! ```yaml
//! current_context: uat
//! contexts:
//!   - name: uat
//!     initiator: uat-gw
//!     sessions: [uat-md]
//! initiators:
//!   - name: uat-gw
//!     socket_connect_host: fix.example.com
//!     socket_connect_port: 9876
//! sessions:
//!   - name: uat-md
//!     begin_string: FIXT.1.1
//!     default_appl_ver_id: FIX.5.0SP2
//!     sender_comp_id: CLIENT
//!     target_comp_id: ${FIX_TARGET:-BROKER}
//! ```

mod context;
mod settings;

use std::path::Path;

use thiserror::Error;

pub use context::{ResolvedContext, resolve_context};
pub use settings::{ContextConfig, FixConfig, InitiatorConfig};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),

    /// Requested context does not exist.
    #[error("Unknown context '{0}'")]
    UnknownContext(String),

    /// No context named and no `current_context` set.
    #[error("No context selected: pass --context or set current_context")]
    NoContextSelected,

    /// Context lists no sessions.
    #[error("Context '{0}' has no sessions")]
    NoSessions(String),

    /// A session's data dictionary file is missing.
    #[error("Data dictionary for session '{session}' not found: {path}")]
    MissingDictionary {
        /// Session name.
        session: String,
        /// Resolved dictionary path.
        path: String,
    },
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: &Path) -> Result<FixConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    let config = load_config_from_string(&contents)?;
    tracing::debug!(
        path = %path.display(),
        contexts = config.contexts.len(),
        initiators = config.initiators.len(),
        sessions = config.sessions.len(),
        "Configuration loaded"
    );
    Ok(config)
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<FixConfig, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: FixConfig = serde_yaml_bw::from_str(&interpolated)?;
    config.validate()?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is compile-time constant
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map_or("", |m| m.as_str());
        match std::env::var(&cap[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.to_string(),
        }
    })
    .into_owned()
}
