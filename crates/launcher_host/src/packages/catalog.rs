//! Package catalog service contract and no-op adapter.

use crate::{ActivityDescriptor, HostError, LaunchCategory};

/// Host service answering installed-package queries.
///
/// Calls may block on IPC to a system service. Implementations must tolerate being called from
/// the owner thread and from listener callbacks at the same time.
pub trait PackageCatalogService: Send + Sync {
    /// Enumerates launch-capable activities for one category, in OS order.
    fn query_activities(
        &self,
        category: LaunchCategory,
    ) -> Result<Vec<ActivityDescriptor>, HostError>;

    /// Loads the human-readable label of an activity.
    fn load_label(&self, activity: &ActivityDescriptor) -> Result<String, HostError>;

    /// Loads the encoded icon of an activity, when it has one.
    fn load_icon(&self, activity: &ActivityDescriptor) -> Result<Option<Vec<u8>>, HostError>;

    /// Loads the encoded banner of an activity, when it has one.
    fn load_banner(&self, activity: &ActivityDescriptor) -> Result<Option<Vec<u8>>, HostError>;

    /// Returns the installed version name of a package.
    fn package_version(&self, package_name: &str) -> Result<Option<String>, HostError>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Empty catalog for unsupported targets.
pub struct NoopPackageCatalog;

impl PackageCatalogService for NoopPackageCatalog {
    fn query_activities(
        &self,
        _category: LaunchCategory,
    ) -> Result<Vec<ActivityDescriptor>, HostError> {
        Ok(Vec::new())
    }

    fn load_label(&self, activity: &ActivityDescriptor) -> Result<String, HostError> {
        Err(HostError::PackageNotFound {
            package_name: activity.package_name.clone(),
        })
    }

    fn load_icon(&self, activity: &ActivityDescriptor) -> Result<Option<Vec<u8>>, HostError> {
        Err(HostError::PackageNotFound {
            package_name: activity.package_name.clone(),
        })
    }

    fn load_banner(&self, activity: &ActivityDescriptor) -> Result<Option<Vec<u8>>, HostError> {
        Err(HostError::PackageNotFound {
            package_name: activity.package_name.clone(),
        })
    }

    fn package_version(&self, package_name: &str) -> Result<Option<String>, HostError> {
        Err(HostError::PackageNotFound {
            package_name: package_name.to_string(),
        })
    }
}
