//! In-memory package host used by tests and headless runs.

use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    sync::Arc,
};

use parking_lot::Mutex;

use crate::{
    ActivityDescriptor, HostError, LaunchCategory, ListenerToken, PackageCatalogService,
    PackageEventSource, PackageListener,
};

/// Activity seeded into a [`MemoryPackageHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryActivity {
    /// Package and activity names.
    pub descriptor: ActivityDescriptor,
    /// Launch surface the activity is enumerated under.
    pub category: LaunchCategory,
    /// Label returned by [`PackageCatalogService::load_label`].
    pub label: String,
    /// Encoded icon bytes.
    pub icon: Option<Vec<u8>>,
    /// Encoded banner bytes.
    pub banner: Option<Vec<u8>>,
}

impl MemoryActivity {
    /// Creates a TV-optimized activity named `<package>.TvActivity`.
    pub fn tv(package_name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(package_name, label, LaunchCategory::TvOptimized)
    }

    /// Creates a general launcher activity named `<package>.MainActivity`.
    pub fn general(package_name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(package_name, label, LaunchCategory::General)
    }

    fn new(
        package_name: impl Into<String>,
        label: impl Into<String>,
        category: LaunchCategory,
    ) -> Self {
        let package_name = package_name.into();
        let activity_name = match category {
            LaunchCategory::TvOptimized => format!("{package_name}.TvActivity"),
            LaunchCategory::General => format!("{package_name}.MainActivity"),
        };
        Self {
            descriptor: ActivityDescriptor::new(package_name, activity_name),
            category,
            label: label.into(),
            icon: None,
            banner: None,
        }
    }

    /// Overrides the activity class name.
    pub fn with_activity_name(mut self, activity_name: impl Into<String>) -> Self {
        self.descriptor.activity_name = activity_name.into();
        self
    }

    /// Attaches icon bytes.
    pub fn with_icon(mut self, icon: Vec<u8>) -> Self {
        self.icon = Some(icon);
        self
    }

    /// Attaches banner bytes.
    pub fn with_banner(mut self, banner: Vec<u8>) -> Self {
        self.banner = Some(banner);
        self
    }
}

#[derive(Default)]
struct MemoryHostState {
    activities: Vec<MemoryActivity>,
    versions: HashMap<String, Option<String>>,
    failing_metadata: BTreeSet<String>,
    failing_queries: BTreeSet<LaunchCategory>,
    reject_registrations: bool,
    listeners: BTreeMap<ListenerToken, Arc<dyn PackageListener>>,
    next_token: u64,
    query_log: Vec<LaunchCategory>,
    unregister_calls: usize,
    unknown_unregistrations: usize,
}

impl MemoryHostState {
    fn activity(&self, descriptor: &ActivityDescriptor) -> Result<&MemoryActivity, HostError> {
        if self.failing_metadata.contains(&descriptor.package_name) {
            return Err(HostError::MetadataUnavailable {
                package_name: descriptor.package_name.clone(),
                reason: "injected metadata failure".to_string(),
            });
        }
        self.activities
            .iter()
            .find(|activity| activity.descriptor == *descriptor)
            .ok_or_else(|| HostError::PackageNotFound {
                package_name: descriptor.package_name.clone(),
            })
    }
}

/// In-memory package manager implementing both [`PackageCatalogService`] and
/// [`PackageEventSource`].
///
/// Mutations that model OS package events (`install_package`, `update_package`,
/// `remove_package`, `set_packages_available`) notify every registered listener after the state
/// lock is released, so listeners may query the catalog from inside their callbacks.
#[derive(Clone, Default)]
pub struct MemoryPackageHost {
    inner: Arc<Mutex<MemoryHostState>>,
}

impl MemoryPackageHost {
    /// Seeds an activity without notifying listeners.
    pub fn add_activity(&self, activity: MemoryActivity) {
        let mut state = self.inner.lock();
        state
            .versions
            .entry(activity.descriptor.package_name.clone())
            .or_insert(None);
        state.activities.push(activity);
    }

    /// Seeds or replaces the version name of a package without notifying listeners.
    pub fn set_version(&self, package_name: &str, version: Option<&str>) {
        self.inner
            .lock()
            .versions
            .insert(package_name.to_string(), version.map(str::to_string));
    }

    /// Installs a package with its activities and notifies listeners.
    ///
    /// A package with no activities models an install that exposes nothing launchable.
    pub fn install_package(
        &self,
        package_name: &str,
        version: Option<&str>,
        activities: Vec<MemoryActivity>,
    ) {
        {
            let mut state = self.inner.lock();
            state
                .activities
                .retain(|activity| activity.descriptor.package_name != package_name);
            state.activities.extend(activities);
            state
                .versions
                .insert(package_name.to_string(), version.map(str::to_string));
        }
        for listener in self.listener_snapshot() {
            listener.on_package_added(package_name);
        }
    }

    /// Replaces the activities of an installed package and notifies listeners.
    pub fn update_package(
        &self,
        package_name: &str,
        version: Option<&str>,
        activities: Vec<MemoryActivity>,
    ) {
        {
            let mut state = self.inner.lock();
            state
                .activities
                .retain(|activity| activity.descriptor.package_name != package_name);
            state.activities.extend(activities);
            state
                .versions
                .insert(package_name.to_string(), version.map(str::to_string));
        }
        for listener in self.listener_snapshot() {
            listener.on_package_changed(package_name);
        }
    }

    /// Uninstalls a package and notifies listeners.
    pub fn remove_package(&self, package_name: &str) {
        {
            let mut state = self.inner.lock();
            state
                .activities
                .retain(|activity| activity.descriptor.package_name != package_name);
            state.versions.remove(package_name);
        }
        for listener in self.listener_snapshot() {
            listener.on_package_removed(package_name);
        }
    }

    /// Reports an availability transition, e.g. external storage mount or unmount.
    pub fn set_packages_available(&self, package_names: &[String], available: bool) {
        for listener in self.listener_snapshot() {
            if available {
                listener.on_packages_available(package_names, false);
            } else {
                listener.on_packages_unavailable(package_names, false);
            }
        }
    }

    /// Makes every metadata lookup for `package_name` fail.
    pub fn fail_metadata_for(&self, package_name: &str) {
        self.inner
            .lock()
            .failing_metadata
            .insert(package_name.to_string());
    }

    /// Makes whole-category enumeration fail.
    pub fn fail_query(&self, category: LaunchCategory) {
        self.inner.lock().failing_queries.insert(category);
    }

    /// Makes subsequent listener registrations fail.
    pub fn reject_registrations(&self, reject: bool) {
        self.inner.lock().reject_registrations = reject;
    }

    /// Number of listeners currently registered.
    pub fn registered_listener_count(&self) -> usize {
        self.inner.lock().listeners.len()
    }

    /// Total number of `unregister` calls received.
    pub fn unregister_calls(&self) -> usize {
        self.inner.lock().unregister_calls
    }

    /// Number of `unregister` calls that named an unknown or already removed token.
    pub fn unknown_unregistrations(&self) -> usize {
        self.inner.lock().unknown_unregistrations
    }

    /// Categories queried so far, in call order.
    pub fn query_log(&self) -> Vec<LaunchCategory> {
        self.inner.lock().query_log.clone()
    }

    /// Clears the query log.
    pub fn clear_query_log(&self) {
        self.inner.lock().query_log.clear();
    }

    fn listener_snapshot(&self) -> Vec<Arc<dyn PackageListener>> {
        self.inner.lock().listeners.values().cloned().collect()
    }
}

impl PackageCatalogService for MemoryPackageHost {
    fn query_activities(
        &self,
        category: LaunchCategory,
    ) -> Result<Vec<ActivityDescriptor>, HostError> {
        let mut state = self.inner.lock();
        state.query_log.push(category);
        if state.failing_queries.contains(&category) {
            return Err(HostError::QueryFailed {
                category: category.as_str(),
                reason: "injected query failure".to_string(),
            });
        }
        Ok(state
            .activities
            .iter()
            .filter(|activity| activity.category == category)
            .map(|activity| activity.descriptor.clone())
            .collect())
    }

    fn load_label(&self, activity: &ActivityDescriptor) -> Result<String, HostError> {
        let state = self.inner.lock();
        state.activity(activity).map(|found| found.label.clone())
    }

    fn load_icon(&self, activity: &ActivityDescriptor) -> Result<Option<Vec<u8>>, HostError> {
        let state = self.inner.lock();
        state.activity(activity).map(|found| found.icon.clone())
    }

    fn load_banner(&self, activity: &ActivityDescriptor) -> Result<Option<Vec<u8>>, HostError> {
        let state = self.inner.lock();
        state.activity(activity).map(|found| found.banner.clone())
    }

    fn package_version(&self, package_name: &str) -> Result<Option<String>, HostError> {
        let state = self.inner.lock();
        if state.failing_metadata.contains(package_name) {
            return Err(HostError::MetadataUnavailable {
                package_name: package_name.to_string(),
                reason: "injected metadata failure".to_string(),
            });
        }
        state
            .versions
            .get(package_name)
            .cloned()
            .ok_or_else(|| HostError::PackageNotFound {
                package_name: package_name.to_string(),
            })
    }
}

impl PackageEventSource for MemoryPackageHost {
    fn register(&self, listener: Arc<dyn PackageListener>) -> Result<ListenerToken, HostError> {
        let mut state = self.inner.lock();
        if state.reject_registrations {
            return Err(HostError::RegistrationFailed(
                "launcher apps service rejected callback".to_string(),
            ));
        }
        state.next_token += 1;
        let token = ListenerToken(state.next_token);
        state.listeners.insert(token, listener);
        tracing::debug!(token = token.0, "package listener registered");
        Ok(token)
    }

    fn unregister(&self, token: ListenerToken) {
        let mut state = self.inner.lock();
        state.unregister_calls += 1;
        if state.listeners.remove(&token).is_none() {
            state.unknown_unregistrations += 1;
            tracing::warn!(token = token.0, "unregister for unknown package listener");
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Default)]
    struct LogListener {
        seen: Mutex<Vec<String>>,
    }

    impl PackageListener for LogListener {
        fn on_package_added(&self, package_name: &str) {
            self.seen.lock().push(format!("added:{package_name}"));
        }

        fn on_package_changed(&self, package_name: &str) {
            self.seen.lock().push(format!("changed:{package_name}"));
        }

        fn on_package_removed(&self, package_name: &str) {
            self.seen.lock().push(format!("removed:{package_name}"));
        }

        fn on_packages_unavailable(&self, package_names: &[String], _replacing: bool) {
            self.seen
                .lock()
                .push(format!("unavailable:{}", package_names.join(",")));
        }
    }

    #[test]
    fn queries_filter_by_category_in_seed_order() {
        let host = MemoryPackageHost::default();
        host.add_activity(MemoryActivity::tv("com.a", "A"));
        host.add_activity(MemoryActivity::general("com.b", "B"));
        host.add_activity(MemoryActivity::tv("com.c", "C"));

        let tv = host
            .query_activities(LaunchCategory::TvOptimized)
            .expect("tv query");
        let names: Vec<_> = tv.iter().map(|a| a.package_name.as_str()).collect();
        assert_eq!(names, vec!["com.a", "com.c"]);
        assert_eq!(host.query_log(), vec![LaunchCategory::TvOptimized]);
    }

    #[test]
    fn metadata_loads_and_injected_failures() {
        let host = MemoryPackageHost::default();
        host.add_activity(MemoryActivity::tv("com.a", "A").with_icon(vec![7]));
        host.set_version("com.a", Some("2.1"));
        let descriptor = ActivityDescriptor::new("com.a", "com.a.TvActivity");

        assert_eq!(host.load_label(&descriptor).expect("label"), "A");
        assert_eq!(host.load_icon(&descriptor).expect("icon"), Some(vec![7]));
        assert_eq!(host.load_banner(&descriptor).expect("banner"), None);
        assert_eq!(
            host.package_version("com.a").expect("version"),
            Some("2.1".to_string())
        );

        host.fail_metadata_for("com.a");
        assert!(host.load_label(&descriptor).is_err());
        assert!(host.package_version("com.a").is_err());

        host.fail_query(LaunchCategory::General);
        assert!(host.query_activities(LaunchCategory::General).is_err());
    }

    #[test]
    fn lifecycle_mutations_notify_registered_listeners() {
        let host = MemoryPackageHost::default();
        let listener = Arc::new(LogListener::default());
        let token = host.register(listener.clone()).expect("register");

        host.install_package("com.a", Some("1"), vec![MemoryActivity::tv("com.a", "A")]);
        host.update_package("com.a", Some("2"), vec![MemoryActivity::tv("com.a", "A")]);
        host.set_packages_available(&["com.a".to_string()], false);
        host.remove_package("com.a");

        assert_eq!(
            *listener.seen.lock(),
            vec![
                "added:com.a".to_string(),
                "changed:com.a".to_string(),
                "unavailable:com.a".to_string(),
                "removed:com.a".to_string(),
            ]
        );
        assert!(host.package_version("com.a").is_err());

        host.unregister(token);
        host.unregister(token);
        assert_eq!(host.registered_listener_count(), 0);
        assert_eq!(host.unregister_calls(), 2);
        assert_eq!(host.unknown_unregistrations(), 1);
    }

    #[test]
    fn rejected_registration_leaves_no_listener() {
        let host = MemoryPackageHost::default();
        host.reject_registrations(true);
        let err = host
            .register(Arc::new(LogListener::default()))
            .expect_err("registration should fail");
        assert!(matches!(err, HostError::RegistrationFailed(_)));
        assert_eq!(host.registered_listener_count(), 0);
    }
}
