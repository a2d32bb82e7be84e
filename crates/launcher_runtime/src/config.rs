//! Launcher runtime configuration.

use launcher_contract::{DEFAULT_EVENT_CHANNEL, DEFAULT_METHOD_CHANNEL};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Package id of the launcher itself.
pub const DEFAULT_LAUNCHER_PACKAGE: &str = "com.moonode.launcher";

/// Package opened by `launchMoonodeApp`.
pub const DEFAULT_FEATURED_PACKAGE: &str = "com.moonode.app";

/// Failure loading a [`LauncherConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid TOML for this schema.
    #[error("invalid launcher config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A field holds an unusable value.
    #[error("invalid launcher config field `{field}`: {reason}")]
    Invalid {
        /// Offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Static settings of the launcher runtime. Every field has a default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LauncherConfig {
    /// Own package id, compared against the OS default home package.
    pub launcher_package: String,
    /// Package launched by `launchMoonodeApp`.
    pub featured_package: String,
    /// Method channel name exposed to the platform shell.
    pub method_channel: String,
    /// Event channel name exposed to the platform shell.
    pub event_channel: String,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            launcher_package: DEFAULT_LAUNCHER_PACKAGE.to_string(),
            featured_package: DEFAULT_FEATURED_PACKAGE.to_string(),
            method_channel: DEFAULT_METHOD_CHANNEL.to_string(),
            event_channel: DEFAULT_EVENT_CHANNEL.to_string(),
        }
    }
}

impl LauncherConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns an error when the document does not parse or a field is empty.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every identifier is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for the first empty or whitespace-bearing field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("launcher_package", &self.launcher_package),
            ("featured_package", &self.featured_package),
            ("method_channel", &self.method_channel),
            ("event_channel", &self.event_channel),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must not be empty".to_string(),
                });
            }
            if value.chars().any(char::is_whitespace) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("`{value}` contains whitespace"),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = LauncherConfig::from_toml_str("").expect("parse");
        assert_eq!(config, LauncherConfig::default());
        assert_eq!(config.featured_package, "com.moonode.app");
    }

    #[test]
    fn fields_override_defaults() {
        let config = LauncherConfig::from_toml_str(
            r#"
            launcher_package = "org.example.home"
            featured_package = "org.example.tv"
            "#,
        )
        .expect("parse");
        assert_eq!(config.launcher_package, "org.example.home");
        assert_eq!(config.featured_package, "org.example.tv");
        assert_eq!(config.method_channel, DEFAULT_METHOD_CHANNEL);
    }

    #[test]
    fn empty_and_unknown_fields_are_rejected() {
        let err = LauncherConfig::from_toml_str(r#"featured_package = " ""#)
            .expect_err("empty package");
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "featured_package",
                ..
            }
        ));

        let err = LauncherConfig::from_toml_str("auto_start = true").expect_err("unknown field");
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
