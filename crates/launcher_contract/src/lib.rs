//! Shared launcher contracts exchanged between the inventory core and the platform shell.
//!
//! This crate is intentionally runtime-agnostic. It defines the serializable application record,
//! the package change events streamed to the shell, and the method-channel request/response
//! payloads without depending on host adapters or runtime internals.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default method channel name used by the platform shell.
pub const DEFAULT_METHOD_CHANNEL: &str = "com.moonode.launcher/method";

/// Default event channel name used by the platform shell.
pub const DEFAULT_EVENT_CHANNEL: &str = "com.moonode.launcher/event";

/// One launchable entry surfaced to the platform shell.
///
/// Records are rebuilt on every resolution. The package name is the only identity they carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    /// Human-readable label.
    #[serde(rename = "name")]
    pub display_name: String,
    /// OS package identifier.
    pub package_name: String,
    /// Version string reported by the OS, when any.
    pub version: Option<String>,
    /// Encoded banner image bytes.
    pub banner: Option<Vec<u8>>,
    /// Encoded icon image bytes.
    pub icon: Option<Vec<u8>>,
    /// Whether the entry was resolved only through the general launch surface.
    pub sideloaded: bool,
}

impl ApplicationRecord {
    /// Returns the package identifier for this record.
    pub fn package_name(&self) -> &str {
        &self.package_name
    }
}

/// Package lifecycle change delivered to the single event subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum ChangeEvent {
    /// A package was installed and resolved to at least one launchable record.
    #[serde(rename = "PACKAGE_ADDED")]
    Added {
        /// Records resolved for the new package.
        #[serde(rename = "activitiesInfo")]
        records: Vec<ApplicationRecord>,
    },
    /// A package was updated or its metadata changed.
    #[serde(rename = "PACKAGE_CHANGED")]
    Changed {
        /// Records resolved for the changed package.
        #[serde(rename = "activitiesInfo")]
        records: Vec<ApplicationRecord>,
    },
    /// A package was uninstalled.
    #[serde(rename = "PACKAGE_REMOVED")]
    Removed {
        /// Identifier of the removed package.
        #[serde(rename = "packageName")]
        package_name: String,
    },
}

impl ChangeEvent {
    /// Returns a stable action token for diagnostics.
    pub const fn action(&self) -> &'static str {
        match self {
            Self::Added { .. } => "PACKAGE_ADDED",
            Self::Changed { .. } => "PACKAGE_CHANGED",
            Self::Removed { .. } => "PACKAGE_REMOVED",
        }
    }
}

/// Raw method-channel invocation received from the platform shell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    /// Method name, such as `getApplications`.
    pub method: String,
    /// Method arguments. Package-scoped methods take a bare package name string.
    #[serde(default)]
    pub arguments: Value,
}

impl MethodCall {
    /// Creates a call without arguments.
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            arguments: Value::Null,
        }
    }

    /// Creates a call carrying a package name argument.
    pub fn with_package(method: impl Into<String>, package_name: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            arguments: Value::String(package_name.into()),
        }
    }
}

/// Typed launcher method understood by the inventory core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LauncherMethod {
    /// Cold inventory snapshot.
    GetApplications,
    /// Launch a package by identifier.
    LaunchApp {
        /// Target package.
        package_name: String,
    },
    /// Launch the configured featured package.
    LaunchFeaturedApp,
    /// Open the system settings screen.
    OpenSettings,
    /// Open the system details screen for a package.
    OpenAppInfo {
        /// Target package.
        package_name: String,
    },
    /// Ask the OS to uninstall a package.
    UninstallApp {
        /// Target package.
        package_name: String,
    },
    /// Whether this launcher is the default home surface.
    IsDefaultLauncher,
    /// Whether an image picker is available on the device.
    CheckForGetContentAvailability,
}

impl LauncherMethod {
    /// Returns the stable method-channel name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::GetApplications => "getApplications",
            Self::LaunchApp { .. } => "launchApp",
            Self::LaunchFeaturedApp => "launchMoonodeApp",
            Self::OpenSettings => "openSettings",
            Self::OpenAppInfo { .. } => "openAppInfo",
            Self::UninstallApp { .. } => "uninstallApp",
            Self::IsDefaultLauncher => "isDefaultLauncher",
            Self::CheckForGetContentAvailability => "checkForGetContentAvailability",
        }
    }
}

/// Method-channel response payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MethodResponse {
    /// Inventory snapshot.
    Applications(Vec<ApplicationRecord>),
    /// Boolean command outcome.
    Bool(bool),
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn record(package_name: &str, sideloaded: bool) -> ApplicationRecord {
        ApplicationRecord {
            display_name: "App".to_string(),
            package_name: package_name.to_string(),
            version: Some("1.0".to_string()),
            banner: None,
            icon: Some(vec![1, 2]),
            sideloaded,
        }
    }

    #[test]
    fn application_record_uses_shell_field_names() {
        let value = serde_json::to_value(record("com.a", true)).expect("serialize");
        assert_eq!(
            value,
            json!({
                "name": "App",
                "packageName": "com.a",
                "version": "1.0",
                "banner": null,
                "icon": [1, 2],
                "sideloaded": true
            })
        );
    }

    #[test]
    fn change_events_are_tagged_by_action() {
        let added = serde_json::to_value(ChangeEvent::Added {
            records: vec![record("com.a", false)],
        })
        .expect("serialize added");
        assert_eq!(added["action"], "PACKAGE_ADDED");
        assert_eq!(added["activitiesInfo"][0]["packageName"], "com.a");

        let removed = serde_json::to_value(ChangeEvent::Removed {
            package_name: "com.a".to_string(),
        })
        .expect("serialize removed");
        assert_eq!(
            removed,
            json!({ "action": "PACKAGE_REMOVED", "packageName": "com.a" })
        );
    }

    #[test]
    fn change_event_parses_from_wire_shape() {
        let event: ChangeEvent = serde_json::from_value(json!({
            "action": "PACKAGE_CHANGED",
            "activitiesInfo": []
        }))
        .expect("parse");
        assert_eq!(event, ChangeEvent::Changed { records: vec![] });
        assert_eq!(event.action(), "PACKAGE_CHANGED");
    }

    #[test]
    fn method_call_arguments_default_to_null() {
        let call: MethodCall =
            serde_json::from_value(json!({ "method": "openSettings" })).expect("parse");
        assert_eq!(call, MethodCall::new("openSettings"));
        assert_eq!(
            MethodCall::with_package("launchApp", "com.a").arguments,
            json!("com.a")
        );
    }

    #[test]
    fn method_responses_serialize_untagged() {
        assert_eq!(
            serde_json::to_value(MethodResponse::Bool(true)).expect("bool"),
            json!(true)
        );
        assert_eq!(
            serde_json::to_value(MethodResponse::Applications(vec![])).expect("apps"),
            json!([])
        );
    }
}
