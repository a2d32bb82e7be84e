//! Host failure taxonomy shared by every service contract in this crate.

use thiserror::Error;

/// Failure reported by an OS collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// The package is not (or no longer) installed.
    #[error("package not found: {package_name}")]
    PackageNotFound {
        /// Package that was looked up.
        package_name: String,
    },
    /// Activity enumeration failed as a whole.
    #[error("activity query failed for {category}: {reason}")]
    QueryFailed {
        /// Stable category token that was queried.
        category: &'static str,
        /// Host-provided reason.
        reason: String,
    },
    /// Per-activity or per-package metadata could not be loaded.
    #[error("metadata unavailable for {package_name}: {reason}")]
    MetadataUnavailable {
        /// Package whose metadata failed.
        package_name: String,
        /// Host-provided reason.
        reason: String,
    },
    /// The OS refused a package listener registration.
    #[error("listener registration failed: {0}")]
    RegistrationFailed(String),
    /// A single-shot shell command was rejected by the OS.
    #[error("command {command} failed: {reason}")]
    CommandFailed {
        /// Stable command token.
        command: &'static str,
        /// Host-provided reason.
        reason: String,
    },
    /// The capability is not supported on the active host.
    #[error("host capability unavailable: {0}")]
    Unavailable(&'static str),
}
