//! Context resolution.

use std::path::{Path, PathBuf};

use super::{ConfigError, FixConfig};
use crate::application::ports::{ConnectionContext, InitiatorSettings};
use crate::domain::session::SessionDefinition;

/// A context with its initiator and sessions looked up and checked.
#[derive(Debug, Clone)]
pub struct ResolvedContext {
    name: String,
    initiator: InitiatorSettings,
    sessions: Vec<SessionDefinition>,
}

impl ResolvedContext {
    /// Build a context directly.
    #[must_use]
    pub const fn new(
        name: String,
        initiator: InitiatorSettings,
        sessions: Vec<SessionDefinition>,
    ) -> Self {
        Self {
            name,
            initiator,
            sessions,
        }
    }
}

impl ConnectionContext for ResolvedContext {
    fn name(&self) -> &str {
        &self.name
    }

    fn sessions(&self) -> &[SessionDefinition] {
        &self.sessions
    }

    fn initiator(&self) -> &InitiatorSettings {
        &self.initiator
    }
}

/// Select and resolve a context.
///
/// Selection order: `requested`, then `current_context`, then the only
/// context when exactly one is defined. Relative dictionary paths are
/// resolved against `base_dir` and must exist.
///
/// # Errors
///
/// Returns `ConfigError` when no context can be selected, the named one
/// is unknown, it lists no sessions, or a dictionary file is missing.
pub fn resolve_context(
    config: &FixConfig,
    requested: Option<&str>,
    base_dir: &Path,
) -> Result<ResolvedContext, ConfigError> {
    let name = match (requested, config.current_context.as_deref()) {
        (Some(name), _) | (None, Some(name)) => name,
        (None, None) if config.contexts.len() == 1 => config.contexts[0].name.as_str(),
        (None, None) => return Err(ConfigError::NoContextSelected),
    };

    let context = config
        .context(name)
        .ok_or_else(|| ConfigError::UnknownContext(name.to_string()))?;

    if context.sessions.is_empty() {
        return Err(ConfigError::NoSessions(context.name.clone()));
    }

    let initiator = config
        .initiator(&context.initiator)
        .ok_or_else(|| {
            ConfigError::ValidationError(format!(
                "context '{}' references unknown initiator '{}'",
                context.name, context.initiator
            ))
        })?
        .to_settings();

    let sessions = context
        .sessions
        .iter()
        .map(|session_name| {
            let session = config.session(session_name).ok_or_else(|| {
                ConfigError::ValidationError(format!(
                    "context '{}' references unknown session '{session_name}'",
                    context.name
                ))
            })?;
            with_dictionaries(session.clone(), base_dir)
        })
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(
        context = %context.name,
        initiator = %initiator.name,
        sessions = sessions.len(),
        "Context resolved"
    );

    Ok(ResolvedContext::new(context.name.clone(), initiator, sessions))
}

fn with_dictionaries(
    mut session: SessionDefinition,
    base_dir: &Path,
) -> Result<SessionDefinition, ConfigError> {
    session.transport_data_dictionary = session
        .transport_data_dictionary
        .take()
        .map(|path| existing(&session.name, base_dir, path))
        .transpose()?;
    session.app_data_dictionary = session
        .app_data_dictionary
        .take()
        .map(|path| existing(&session.name, base_dir, path))
        .transpose()?;
    Ok(session)
}

fn existing(session: &str, base_dir: &Path, path: PathBuf) -> Result<PathBuf, ConfigError> {
    let resolved = if path.is_relative() {
        base_dir.join(path)
    } else {
        path
    };
    if resolved.is_file() {
        Ok(resolved)
    } else {
        Err(ConfigError::MissingDictionary {
            session: session.to_string(),
            path: resolved.display().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::load_config_from_string;
    use super::*;

    const TWO_CONTEXTS: &str = r"
contexts:
  - name: uat
    initiator: gw
    sessions: [md, orders]
  - name: empty
    initiator: gw
    sessions: []
initiators:
  - name: gw
    socket_connect_host: 127.0.0.1
    socket_connect_port: 9876
sessions:
  - name: md
    begin_string: FIXT.1.1
    default_appl_ver_id: FIX.5.0SP2
    sender_comp_id: CLIENT
    target_comp_id: BROKER
  - name: orders
    begin_string: FIX.4.4
    sender_comp_id: CLIENT
    target_comp_id: BROKER
";

    fn config(yaml: &str) -> FixConfig {
        load_config_from_string(yaml).unwrap()
    }

    #[test]
    fn explicit_context_keeps_session_order() {
        let resolved = resolve_context(&config(TWO_CONTEXTS), Some("uat"), Path::new(".")).unwrap();
        assert_eq!(resolved.name(), "uat");
        assert_eq!(resolved.initiator().port, 9876);
        let names: Vec<_> = resolved.sessions().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["md", "orders"]);
    }

    #[test]
    fn current_context_is_the_fallback() {
        let yaml = format!("current_context: uat\n{TWO_CONTEXTS}");
        let resolved = resolve_context(&config(&yaml), None, Path::new(".")).unwrap();
        assert_eq!(resolved.name(), "uat");
    }

    #[test]
    fn requested_context_beats_current_context() {
        let yaml = format!("current_context: uat\n{TWO_CONTEXTS}");
        let err = resolve_context(&config(&yaml), Some("empty"), Path::new(".")).unwrap_err();
        assert!(matches!(err, ConfigError::NoSessions(name) if name == "empty"));
    }

    #[test]
    fn ambiguous_selection_is_an_error() {
        let err = resolve_context(&config(TWO_CONTEXTS), None, Path::new(".")).unwrap_err();
        assert!(matches!(err, ConfigError::NoContextSelected));
    }

    #[test]
    fn unknown_context_is_an_error() {
        let err = resolve_context(&config(TWO_CONTEXTS), Some("prod"), Path::new(".")).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownContext(name) if name == "prod"));
    }

    #[test]
    fn sole_context_is_selected_implicitly() {
        let yaml = TWO_CONTEXTS.replace(
            "  - name: empty\n    initiator: gw\n    sessions: []\n",
            "",
        );
        let resolved = resolve_context(&config(&yaml), None, Path::new(".")).unwrap();
        assert_eq!(resolved.name(), "uat");
    }

    #[test]
    fn relative_dictionaries_resolve_against_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("FIXT11.xml"), "<fix/>").unwrap();
        let yaml = TWO_CONTEXTS.replace(
            "default_appl_ver_id: FIX.5.0SP2\n",
            "default_appl_ver_id: FIX.5.0SP2\n    transport_data_dictionary: FIXT11.xml\n",
        );
        let resolved = resolve_context(&config(&yaml), Some("uat"), dir.path()).unwrap();
        assert_eq!(
            resolved.sessions()[0].transport_data_dictionary.as_deref(),
            Some(dir.path().join("FIXT11.xml").as_path())
        );
    }

    #[test]
    fn missing_dictionary_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = TWO_CONTEXTS.replace(
            "default_appl_ver_id: FIX.5.0SP2\n",
            "default_appl_ver_id: FIX.5.0SP2\n    app_data_dictionary: FIX50SP2.xml\n",
        );
        let err = resolve_context(&config(&yaml), Some("uat"), dir.path()).unwrap_err();
        assert!(
            matches!(err, ConfigError::MissingDictionary { ref session, .. } if session == "md")
        );
    }
}
