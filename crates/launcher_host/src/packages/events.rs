//! Package-lifecycle listener contracts and no-op adapter.

use std::sync::Arc;

use crate::{HostError, ListenerToken};

/// Callback object registered with the OS for package-lifecycle notifications.
///
/// Callbacks arrive on an OS-managed context and may run concurrently with catalog queries.
pub trait PackageListener: Send + Sync {
    /// A package was installed.
    fn on_package_added(&self, package_name: &str);

    /// A package was updated or its components changed.
    fn on_package_changed(&self, package_name: &str);

    /// A package was uninstalled.
    fn on_package_removed(&self, package_name: &str);

    /// Packages became available again, e.g. after external storage was mounted.
    fn on_packages_available(&self, _package_names: &[String], _replacing: bool) {}

    /// Packages became unavailable without being uninstalled.
    fn on_packages_unavailable(&self, _package_names: &[String], _replacing: bool) {}
}

/// Host service owning OS-level package listener registrations for the current user.
pub trait PackageEventSource: Send + Sync {
    /// Registers a listener and returns the token needed to unregister it.
    fn register(&self, listener: Arc<dyn PackageListener>) -> Result<ListenerToken, HostError>;

    /// Unregisters a previously registered listener. Unknown tokens are ignored.
    fn unregister(&self, token: ListenerToken);
}

#[derive(Debug, Clone, Copy, Default)]
/// Event source for targets without package notifications.
pub struct NoopPackageEventSource;

impl PackageEventSource for NoopPackageEventSource {
    fn register(&self, _listener: Arc<dyn PackageListener>) -> Result<ListenerToken, HostError> {
        Err(HostError::Unavailable("package-events"))
    }

    fn unregister(&self, _token: ListenerToken) {}
}
