//! Shared package-domain models.

/// Launch surface an activity is enumerated under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LaunchCategory {
    /// Restricted category for 10-foot, remote-driven launchers.
    TvOptimized,
    /// Default launcher category, including sideloaded apps.
    General,
}

impl LaunchCategory {
    /// Returns the OS intent category token.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TvOptimized => "android.intent.category.LEANBACK_LAUNCHER",
            Self::General => "android.intent.category.LAUNCHER",
        }
    }

    /// Whether records resolved through this surface are flagged as sideloaded.
    pub const fn is_sideloaded(self) -> bool {
        matches!(self, Self::General)
    }
}

impl std::fmt::Display for LaunchCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One launch-capable activity returned by an enumeration query.
///
/// Label, icon and banner are loaded separately through the catalog and may each fail.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActivityDescriptor {
    /// Owning package identifier.
    pub package_name: String,
    /// Activity class name within the package.
    pub activity_name: String,
}

impl ActivityDescriptor {
    /// Creates a descriptor from package and activity names.
    pub fn new(package_name: impl Into<String>, activity_name: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            activity_name: activity_name.into(),
        }
    }
}

/// Opaque handle for one registered package listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerToken(pub u64);
