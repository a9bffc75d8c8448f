//! Configuration file types.

use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::application::ports::InitiatorSettings;
use crate::domain::session::SessionDefinition;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixConfig {
    /// Context used when none is named on the command line.
    #[serde(default)]
    pub current_context: Option<String>,
    /// Named contexts.
    #[serde(default)]
    pub contexts: Vec<ContextConfig>,
    /// Initiator socket settings.
    #[serde(default)]
    pub initiators: Vec<InitiatorConfig>,
    /// Session definitions.
    #[serde(default)]
    pub sessions: Vec<SessionDefinition>,
}

/// A named pairing of one initiator with one or more sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Context name.
    pub name: String,
    /// Initiator name.
    pub initiator: String,
    /// Session names, first one is used.
    pub sessions: Vec<String>,
}

/// Initiator socket and timer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitiatorConfig {
    /// Initiator name.
    pub name: String,
    /// Acceptor host.
    pub socket_connect_host: String,
    /// Acceptor port.
    pub socket_connect_port: u16,
    /// Connect timeout in seconds (0 = unset).
    #[serde(default)]
    pub socket_timeout_secs: u64,
    /// Heartbeat interval in seconds.
    #[serde(default = "default_heart_bt_int")]
    pub heart_bt_int: u64,
    /// Initial reconnect delay in seconds.
    #[serde(default = "default_reconnect_interval")]
    pub reconnect_interval: u64,
    /// Connection retries before giving up (0 = unlimited).
    #[serde(default = "default_max_reconnect_attempts")]
    pub max_reconnect_attempts: u32,
}

const fn default_heart_bt_int() -> u64 {
    30
}

const fn default_reconnect_interval() -> u64 {
    5
}

const fn default_max_reconnect_attempts() -> u32 {
    3
}

impl InitiatorConfig {
    /// Convert to the port-level settings.
    #[must_use]
    pub fn to_settings(&self) -> InitiatorSettings {
        InitiatorSettings {
            name: self.name.clone(),
            host: self.socket_connect_host.clone(),
            port: self.socket_connect_port,
            socket_timeout: Duration::from_secs(self.socket_timeout_secs),
            heartbeat_interval: Duration::from_secs(self.heart_bt_int),
            reconnect_interval: Duration::from_secs(self.reconnect_interval),
            max_reconnect_attempts: self.max_reconnect_attempts,
        }
    }
}

impl FixConfig {
    /// Find a context by name.
    #[must_use]
    pub fn context(&self, name: &str) -> Option<&ContextConfig> {
        self.contexts.iter().find(|c| c.name == name)
    }

    /// Find an initiator by name.
    #[must_use]
    pub fn initiator(&self, name: &str) -> Option<&InitiatorConfig> {
        self.initiators.iter().find(|i| i.name == name)
    }

    /// Find a session by name.
    #[must_use]
    pub fn session(&self, name: &str) -> Option<&SessionDefinition> {
        self.sessions.iter().find(|s| s.name == name)
    }

    /// Validate names and cross references.
    pub(super) fn validate(&self) -> Result<(), ConfigError> {
        unique_names("context", self.contexts.iter().map(|c| c.name.as_str()))?;
        unique_names("initiator", self.initiators.iter().map(|i| i.name.as_str()))?;
        unique_names("session", self.sessions.iter().map(|s| s.name.as_str()))?;

        if let Some(current) = &self.current_context
            && self.context(current).is_none()
        {
            return Err(ConfigError::ValidationError(format!(
                "current_context '{current}' is not defined"
            )));
        }

        for initiator in &self.initiators {
            if initiator.socket_connect_host.is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "initiator '{}' has no socket_connect_host",
                    initiator.name
                )));
            }
            if initiator.socket_connect_port == 0 {
                return Err(ConfigError::ValidationError(format!(
                    "initiator '{}' has no socket_connect_port",
                    initiator.name
                )));
            }
            if initiator.heart_bt_int == 0 {
                return Err(ConfigError::ValidationError(format!(
                    "initiator '{}': heart_bt_int must be positive",
                    initiator.name
                )));
            }
        }

        for session in &self.sessions {
            if session.begin_string.is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "session '{}' has no begin_string",
                    session.name
                )));
            }
        }

        for context in &self.contexts {
            if self.initiator(&context.initiator).is_none() {
                return Err(ConfigError::ValidationError(format!(
                    "context '{}' references unknown initiator '{}'",
                    context.name, context.initiator
                )));
            }
            if let Some(missing) = context.sessions.iter().find(|s| self.session(s).is_none()) {
                return Err(ConfigError::ValidationError(format!(
                    "context '{}' references unknown session '{missing}'",
                    context.name
                )));
            }
        }

        Ok(())
    }
}

fn unique_names<'a>(kind: &str, names: impl Iterator<Item = &'a str>) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for name in names {
        if name.is_empty() {
            return Err(ConfigError::ValidationError(format!("{kind} without a name")));
        }
        if !seen.insert(name) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate {kind} name '{name}'"
            )));
        }
    }
    Ok(())
}
