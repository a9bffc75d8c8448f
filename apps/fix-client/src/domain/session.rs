//! Session Definition
//!
//! Identifies one logical counterparty link: the protocol version pair,
//! routing identifiers and data dictionaries.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One configured FIX session.
///
/// Empty strings mean "not set"; the message builder skips empty routing
/// identifiers rather than sending them as empty fields.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionDefinition {
    /// Name used to reference this session from a context.
    pub name: String,
    /// Transport version (BeginString), e.g. `FIXT.1.1` or `FIX.4.4`.
    pub begin_string: String,
    /// Application version (DefaultApplVerID), e.g. `FIX.5.0SP2`.
    pub default_appl_ver_id: String,
    /// SenderCompID.
    pub sender_comp_id: String,
    /// SenderSubID.
    pub sender_sub_id: String,
    /// TargetCompID.
    pub target_comp_id: String,
    /// TargetSubID.
    pub target_sub_id: String,
    /// Transport data dictionary file.
    pub transport_data_dictionary: Option<PathBuf>,
    /// Application data dictionary file.
    pub app_data_dictionary: Option<PathBuf>,
    /// Logon Username (553).
    pub username: String,
    /// Logon Password (554).
    pub password: String,
}

impl SessionDefinition {
    /// `(BeginString, DefaultApplVerID)` as used by the message builder.
    #[must_use]
    pub fn version_pair(&self) -> (&str, &str) {
        (&self.begin_string, &self.default_appl_ver_id)
    }

    /// `SENDER->TARGET` label for logs.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}->{}", self.sender_comp_id, self.target_comp_id)
    }
}

impl fmt::Debug for SessionDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionDefinition")
            .field("name", &self.name)
            .field("begin_string", &self.begin_string)
            .field("default_appl_ver_id", &self.default_appl_ver_id)
            .field("sender_comp_id", &self.sender_comp_id)
            .field("sender_sub_id", &self.sender_sub_id)
            .field("target_comp_id", &self.target_comp_id)
            .field("target_sub_id", &self.target_sub_id)
            .field("transport_data_dictionary", &self.transport_data_dictionary)
            .field("app_data_dictionary", &self.app_data_dictionary)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
