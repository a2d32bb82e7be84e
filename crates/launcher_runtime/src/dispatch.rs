//! Method-channel request parsing and dispatch.

use std::sync::Arc;

use launcher_contract::{LauncherMethod, MethodCall, MethodResponse};
use launcher_host::{HostError, LauncherCommandService};
use serde_json::Value;
use thiserror::Error;

use crate::{config::LauncherConfig, resolver::InventoryResolver};

/// Failure turning a raw method call into a typed request.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The method name is not part of the launcher channel.
    #[error("unknown launcher method `{0}`")]
    UnknownMethod(String),
    /// The method exists but its arguments do not fit.
    #[error("invalid arguments for `{method}`: {reason}")]
    InvalidArguments {
        /// Method name.
        method: String,
        /// Why the arguments were rejected.
        reason: String,
    },
    /// The payload is not a JSON method call.
    #[error("malformed method call: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Parses a raw call into a [`LauncherMethod`].
///
/// # Errors
///
/// Returns [`DispatchError::UnknownMethod`] for unrecognised names and
/// [`DispatchError::InvalidArguments`] when a package-scoped method lacks a package name.
pub fn parse_method(call: &MethodCall) -> Result<LauncherMethod, DispatchError> {
    let method = match call.method.as_str() {
        "getApplications" => LauncherMethod::GetApplications,
        "launchApp" => LauncherMethod::LaunchApp {
            package_name: package_argument(call)?,
        },
        "launchMoonodeApp" => LauncherMethod::LaunchFeaturedApp,
        "openSettings" => LauncherMethod::OpenSettings,
        "openAppInfo" => LauncherMethod::OpenAppInfo {
            package_name: package_argument(call)?,
        },
        "uninstallApp" => LauncherMethod::UninstallApp {
            package_name: package_argument(call)?,
        },
        "isDefaultLauncher" => LauncherMethod::IsDefaultLauncher,
        "checkForGetContentAvailability" => LauncherMethod::CheckForGetContentAvailability,
        other => return Err(DispatchError::UnknownMethod(other.to_string())),
    };
    Ok(method)
}

fn package_argument(call: &MethodCall) -> Result<String, DispatchError> {
    match &call.arguments {
        Value::String(package_name) if !package_name.trim().is_empty() => {
            Ok(package_name.clone())
        }
        Value::String(_) => Err(DispatchError::InvalidArguments {
            method: call.method.clone(),
            reason: "package name is empty".to_string(),
        }),
        other => Err(DispatchError::InvalidArguments {
            method: call.method.clone(),
            reason: format!("expected a package name string, got {other}"),
        }),
    }
}

/// Executes typed launcher methods against the resolver and shell command service.
///
/// Command failures become `false` responses; they are logged, never propagated.
#[derive(Clone)]
pub struct MethodDispatcher {
    resolver: InventoryResolver,
    commands: Arc<dyn LauncherCommandService>,
    config: LauncherConfig,
}

impl MethodDispatcher {
    /// Creates a dispatcher.
    pub fn new(
        resolver: InventoryResolver,
        commands: Arc<dyn LauncherCommandService>,
        config: LauncherConfig,
    ) -> Self {
        Self {
            resolver,
            commands,
            config,
        }
    }

    /// Executes one typed method.
    pub fn dispatch(&self, method: &LauncherMethod) -> MethodResponse {
        let name = method.name();
        match method {
            LauncherMethod::GetApplications => {
                MethodResponse::Applications(self.resolver.resolve_all())
            }
            LauncherMethod::LaunchApp { package_name } => {
                outcome(name, self.commands.launch_app(package_name))
            }
            LauncherMethod::LaunchFeaturedApp => outcome(
                name,
                self.commands.launch_app(&self.config.featured_package),
            ),
            LauncherMethod::OpenSettings => outcome(name, self.commands.open_settings()),
            LauncherMethod::OpenAppInfo { package_name } => {
                outcome(name, self.commands.open_app_info(package_name))
            }
            LauncherMethod::UninstallApp { package_name } => {
                outcome(name, self.commands.uninstall_app(package_name))
            }
            LauncherMethod::IsDefaultLauncher => {
                let is_default = match self.commands.default_home_package() {
                    Ok(home) => home.as_deref() == Some(self.config.launcher_package.as_str()),
                    Err(err) => {
                        tracing::warn!(method = name, error = %err, "default home lookup failed");
                        false
                    }
                };
                MethodResponse::Bool(is_default)
            }
            LauncherMethod::CheckForGetContentAvailability => {
                let available = self.commands.has_image_picker().unwrap_or_else(|err| {
                    tracing::warn!(method = name, error = %err, "image picker lookup failed");
                    false
                });
                MethodResponse::Bool(available)
            }
        }
    }

    /// Parses and executes one raw call.
    ///
    /// # Errors
    ///
    /// Returns an error when the call does not name a known method with valid arguments.
    pub fn handle_call(&self, call: &MethodCall) -> Result<MethodResponse, DispatchError> {
        let method = parse_method(call)?;
        Ok(self.dispatch(&method))
    }

    /// Decodes a JSON call, executes it, and encodes the response.
    ///
    /// # Errors
    ///
    /// Returns an error when decoding, parsing, or encoding fails.
    pub fn handle_json(&self, raw: &str) -> Result<Value, DispatchError> {
        let call: MethodCall = serde_json::from_str(raw)?;
        let response = self.handle_call(&call)?;
        Ok(serde_json::to_value(response)?)
    }
}

fn outcome(method: &'static str, result: Result<(), HostError>) -> MethodResponse {
    match result {
        Ok(()) => MethodResponse::Bool(true),
        Err(err) => {
            tracing::warn!(method, error = %err, "launcher command failed");
            MethodResponse::Bool(false)
        }
    }
}
