//! Host configuration.
//!
//! A [`Config`] is usually deserialized from JSON. Every section is optional
//! and falls back to its default.
//!
//! ```json
//! {
//!     "log": { "level": "arbor_dom=debug", "ansi": true },
//!     "features": "POINTER_EVENTS | PASSIVE_EVENTS",
//!     "ssr": { "doctype": true }
//! }
//! ```

use arbor_events::{FeatureFlags, GestureConfig};
use arbor_ssr::SsrOptions;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Error produced while loading a [`Config`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The input is not a valid configuration document.
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
    /// The log filter could not be parsed.
    #[error("invalid log filter `{filter}`: {reason}")]
    LogFilter {
        /// The rejected filter.
        filter: String,
        /// Parser message.
        reason: String,
    },
}

/// Logging options, see [`install_tracing`](crate::logging::install_tracing).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directives in `RUST_LOG` syntax.
    pub level: String,
    /// Colored output.
    pub ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            ansi: false,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging.
    pub log: LogConfig,
    /// Native input features of the host.
    pub features: FeatureFlags,
    /// Server rendering.
    pub ssr: SsrOptions,
}

impl Config {
    /// Parses and validates a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed or the log filter does
    /// not parse.
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the parts serde cannot.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::LogFilter`] if `log.level` is not a valid filter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        EnvFilter::try_new(&self.log.level).map_err(|err| ConfigError::LogFilter {
            filter: self.log.level.clone(),
            reason: err.to_string(),
        })?;
        Ok(())
    }

    /// Returns the options for a [`GestureEventSource`](arbor_events::GestureEventSource).
    #[must_use]
    pub const fn gesture_config(&self) -> GestureConfig {
        GestureConfig {
            features: self.features,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_events::ListenerKind;

    #[test]
    fn empty_document_uses_defaults() {
        let config = Config::from_json_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.log.level, "info");
        assert!(!config.ssr.doctype);
        assert_eq!(
            ListenerKind::select(config.gesture_config().features),
            ListenerKind::Mouse
        );
    }

    #[test]
    fn sections_are_read() {
        let config = Config::from_json_str(
            r#"{
                "log": { "level": "arbor_dom=debug" },
                "features": "POINTER_EVENTS | TOUCH_EVENTS",
                "ssr": { "doctype": true }
            }"#,
        )
        .unwrap();
        assert_eq!(config.log.level, "arbor_dom=debug");
        assert!(!config.log.ansi);
        assert!(config.ssr.doctype);
        assert_eq!(
            config.features,
            FeatureFlags::POINTER_EVENTS | FeatureFlags::TOUCH_EVENTS
        );
        assert_eq!(
            ListenerKind::select(config.gesture_config().features),
            ListenerKind::Pointer
        );
    }

    #[test]
    fn malformed_documents_fail() {
        assert!(matches!(
            Config::from_json_str(r#"{"ssr": {"doctype": "yes"}}"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn bad_log_filter_fails() {
        let err = Config::from_json_str(r#"{"log": {"level": "arbor=loud"}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::LogFilter { ref filter, .. } if filter == "arbor=loud"));
    }
}
