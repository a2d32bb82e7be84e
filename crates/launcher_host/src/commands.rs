//! Single-shot shell command contracts and adapters.

use std::{collections::BTreeSet, sync::Arc};

use parking_lot::Mutex;

use crate::HostError;

/// Host service for one-shot platform commands issued on behalf of the shell.
///
/// Every command is a single stateless OS call. Failures are reported, never retried.
pub trait LauncherCommandService: Send + Sync {
    /// Launches a package through its preferred launch surface.
    fn launch_app(&self, package_name: &str) -> Result<(), HostError>;

    /// Opens the system settings screen.
    fn open_settings(&self) -> Result<(), HostError>;

    /// Opens the system details screen for a package.
    fn open_app_info(&self, package_name: &str) -> Result<(), HostError>;

    /// Asks the OS to start uninstalling a package.
    fn uninstall_app(&self, package_name: &str) -> Result<(), HostError>;

    /// Returns the package currently resolved as the default home surface.
    fn default_home_package(&self) -> Result<Option<String>, HostError>;

    /// Returns whether some activity can pick image content.
    fn has_image_picker(&self) -> Result<bool, HostError>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Command service for targets without shell integration.
pub struct NoopLauncherCommandService;

impl LauncherCommandService for NoopLauncherCommandService {
    fn launch_app(&self, _package_name: &str) -> Result<(), HostError> {
        Err(HostError::Unavailable("launch-app"))
    }

    fn open_settings(&self) -> Result<(), HostError> {
        Err(HostError::Unavailable("open-settings"))
    }

    fn open_app_info(&self, _package_name: &str) -> Result<(), HostError> {
        Err(HostError::Unavailable("open-app-info"))
    }

    fn uninstall_app(&self, _package_name: &str) -> Result<(), HostError> {
        Err(HostError::Unavailable("uninstall-app"))
    }

    fn default_home_package(&self) -> Result<Option<String>, HostError> {
        Err(HostError::Unavailable("default-home"))
    }

    fn has_image_picker(&self) -> Result<bool, HostError> {
        Err(HostError::Unavailable("image-picker"))
    }
}

/// Command accepted by a [`RecordingCommandService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LauncherCommand {
    /// `launch_app`.
    Launch(String),
    /// `open_settings`.
    OpenSettings,
    /// `open_app_info`.
    OpenAppInfo(String),
    /// `uninstall_app`.
    Uninstall(String),
}

#[derive(Debug, Default)]
struct RecordingState {
    launchable: BTreeSet<String>,
    default_home: Option<String>,
    image_picker: bool,
    failing: bool,
    accepted: Vec<LauncherCommand>,
}

/// In-memory command service that records accepted commands.
///
/// Launches only succeed for packages marked launchable, mirroring an OS that finds no launch
/// intent for a missing package.
#[derive(Debug, Clone, Default)]
pub struct RecordingCommandService {
    inner: Arc<Mutex<RecordingState>>,
}

impl RecordingCommandService {
    /// Marks a package as launchable.
    pub fn allow_launch(&self, package_name: &str) {
        self.inner.lock().launchable.insert(package_name.to_string());
    }

    /// Sets the package reported as default home surface.
    pub fn set_default_home(&self, package_name: Option<&str>) {
        self.inner.lock().default_home = package_name.map(str::to_string);
    }

    /// Sets whether an image picker is reported as available.
    pub fn set_image_picker(&self, available: bool) {
        self.inner.lock().image_picker = available;
    }

    /// Makes every subsequent command fail.
    pub fn fail_all(&self, failing: bool) {
        self.inner.lock().failing = failing;
    }

    /// Commands accepted so far, in call order.
    pub fn accepted(&self) -> Vec<LauncherCommand> {
        self.inner.lock().accepted.clone()
    }

    fn accept(
        &self,
        command_name: &'static str,
        command: LauncherCommand,
    ) -> Result<(), HostError> {
        let mut state = self.inner.lock();
        if state.failing {
            return Err(HostError::CommandFailed {
                command: command_name,
                reason: "injected command failure".to_string(),
            });
        }
        state.accepted.push(command);
        Ok(())
    }
}

impl LauncherCommandService for RecordingCommandService {
    fn launch_app(&self, package_name: &str) -> Result<(), HostError> {
        if !self.inner.lock().launchable.contains(package_name) {
            return Err(HostError::PackageNotFound {
                package_name: package_name.to_string(),
            });
        }
        self.accept("launch-app", LauncherCommand::Launch(package_name.to_string()))
    }

    fn open_settings(&self) -> Result<(), HostError> {
        self.accept("open-settings", LauncherCommand::OpenSettings)
    }

    fn open_app_info(&self, package_name: &str) -> Result<(), HostError> {
        self.accept(
            "open-app-info",
            LauncherCommand::OpenAppInfo(package_name.to_string()),
        )
    }

    fn uninstall_app(&self, package_name: &str) -> Result<(), HostError> {
        self.accept(
            "uninstall-app",
            LauncherCommand::Uninstall(package_name.to_string()),
        )
    }

    fn default_home_package(&self) -> Result<Option<String>, HostError> {
        let state = self.inner.lock();
        if state.failing {
            return Err(HostError::CommandFailed {
                command: "default-home",
                reason: "injected command failure".to_string(),
            });
        }
        Ok(state.default_home.clone())
    }

    fn has_image_picker(&self) -> Result<bool, HostError> {
        let state = self.inner.lock();
        if state.failing {
            return Err(HostError::CommandFailed {
                command: "image-picker",
                reason: "injected command failure".to_string(),
            });
        }
        Ok(state.image_picker)
    }
}
