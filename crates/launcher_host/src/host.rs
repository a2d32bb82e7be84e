//! Host service bundle injected into the launcher runtime.

use std::sync::Arc;

use crate::{
    LauncherCommandService, MemoryPackageHost, NoopLauncherCommandService, NoopPackageCatalog,
    NoopPackageEventSource, PackageCatalogService, PackageEventSource, RecordingCommandService,
};

/// Runtime-selected host services for the launcher inventory core.
///
/// All platform-specific adapter selection happens before this bundle crosses into
/// `launcher_runtime`, which keeps the resolver and bridge decoupled from OS bindings.
#[derive(Clone)]
pub struct LauncherHostServices {
    /// Installed-package queries.
    pub catalog: Arc<dyn PackageCatalogService>,
    /// Package-lifecycle listener registration.
    pub package_events: Arc<dyn PackageEventSource>,
    /// Single-shot shell commands.
    pub commands: Arc<dyn LauncherCommandService>,
}

impl LauncherHostServices {
    /// Services for targets without any package manager.
    pub fn noop() -> Self {
        Self {
            catalog: Arc::new(NoopPackageCatalog),
            package_events: Arc::new(NoopPackageEventSource),
            commands: Arc::new(NoopLauncherCommandService),
        }
    }

    /// Services backed by the in-memory package host and command recorder.
    pub fn memory(packages: &MemoryPackageHost, commands: &RecordingCommandService) -> Self {
        Self {
            catalog: Arc::new(packages.clone()),
            package_events: Arc::new(packages.clone()),
            commands: Arc::new(commands.clone()),
        }
    }
}
