//! Launchable-application inventory resolution across the TV-optimized and general surfaces.

use std::{collections::HashSet, sync::Arc};

use launcher_contract::ApplicationRecord;
use launcher_host::{ActivityDescriptor, HostError, LaunchCategory, PackageCatalogService};

/// Resolves installed packages into de-duplicated [`ApplicationRecord`]s.
///
/// A package exposing a TV-optimized activity is reported only through that surface; its general
/// launcher activities are suppressed. Packages reachable only through the general surface are
/// flagged as sideloaded. Host failures never abort a resolution: a failed general query
/// contributes nothing, a failed TV-optimized query leaves nothing classifiable, and a failed
/// metadata lookup drops that one entry.
#[derive(Clone)]
pub struct InventoryResolver {
    catalog: Arc<dyn PackageCatalogService>,
}

impl InventoryResolver {
    /// Creates a resolver over a package catalog.
    pub fn new(catalog: Arc<dyn PackageCatalogService>) -> Self {
        Self { catalog }
    }

    /// Resolves every launchable application. TV-derived records come first.
    ///
    /// When the TV-optimized query fails no general entry can be classified safely, so the
    /// result is empty rather than reporting TV packages as sideloaded.
    pub fn resolve_all(&self) -> Vec<ApplicationRecord> {
        let Some(tv) = self.query(LaunchCategory::TvOptimized) else {
            return Vec::new();
        };
        let tv_packages: HashSet<&str> = tv
            .iter()
            .map(|activity| activity.package_name.as_str())
            .collect();
        let general: Vec<ActivityDescriptor> = self
            .query(LaunchCategory::General)
            .unwrap_or_default()
            .into_iter()
            .filter(|activity| !tv_packages.contains(activity.package_name.as_str()))
            .collect();

        let records: Vec<ApplicationRecord> = self
            .build_records(&tv, LaunchCategory::TvOptimized)
            .into_iter()
            .chain(self.build_records(&general, LaunchCategory::General))
            .collect();
        tracing::debug!(
            tv_activities = tv.len(),
            sideloaded_activities = general.len(),
            records = records.len(),
            "resolved application inventory"
        );
        records
    }

    /// Resolves the launchable applications of one package.
    ///
    /// When the package has any TV-optimized activity the general surface is not queried at all.
    /// A failed TV-optimized query resolves to nothing. The result is usually empty or a single
    /// record but callers must treat it as a set.
    pub fn resolve_for_package(&self, package_name: &str) -> Vec<ApplicationRecord> {
        let Some(tv) = self.query_package(LaunchCategory::TvOptimized, package_name) else {
            return Vec::new();
        };
        if !tv.is_empty() {
            return self.build_records(&tv, LaunchCategory::TvOptimized);
        }
        let general = self
            .query_package(LaunchCategory::General, package_name)
            .unwrap_or_default();
        self.build_records(&general, LaunchCategory::General)
    }

    fn query(&self, category: LaunchCategory) -> Option<Vec<ActivityDescriptor>> {
        self.catalog
            .query_activities(category)
            .map_err(|err| {
                tracing::warn!(%category, error = %err, "activity query failed");
            })
            .ok()
    }

    fn query_package(
        &self,
        category: LaunchCategory,
        package_name: &str,
    ) -> Option<Vec<ActivityDescriptor>> {
        self.query(category).map(|activities| {
            activities
                .into_iter()
                .filter(|activity| activity.package_name == package_name)
                .collect()
        })
    }

    fn build_records(
        &self,
        activities: &[ActivityDescriptor],
        category: LaunchCategory,
    ) -> Vec<ApplicationRecord> {
        activities
            .iter()
            .filter_map(|activity| match self.build_record(activity, category) {
                Ok(record) => Some(record),
                Err(err) => {
                    tracing::warn!(
                        package = %activity.package_name,
                        activity = %activity.activity_name,
                        error = %err,
                        "dropping unresolvable activity"
                    );
                    None
                }
            })
            .collect()
    }

    fn build_record(
        &self,
        activity: &ActivityDescriptor,
        category: LaunchCategory,
    ) -> Result<ApplicationRecord, HostError> {
        Ok(ApplicationRecord {
            display_name: self.catalog.load_label(activity)?,
            package_name: activity.package_name.clone(),
            version: self.catalog.package_version(&activity.package_name)?,
            banner: self.catalog.load_banner(activity)?,
            icon: self.catalog.load_icon(activity)?,
            sideloaded: category.is_sideloaded(),
        })
    }
}

#[cfg(test)]
mod tests {
    use launcher_host::{MemoryActivity, MemoryPackageHost};
    use pretty_assertions::assert_eq;

    use super::*;

    fn resolver_for(host: &MemoryPackageHost) -> InventoryResolver {
        InventoryResolver::new(Arc::new(host.clone()))
    }

    fn summary(records: &[ApplicationRecord]) -> Vec<(String, String, bool)> {
        records
            .iter()
            .map(|record| {
                (
                    record.package_name.clone(),
                    record.display_name.clone(),
                    record.sideloaded,
                )
            })
            .collect()
    }

    #[test]
    fn tv_surface_wins_and_general_only_packages_are_sideloaded() {
        let host = MemoryPackageHost::default();
        host.add_activity(MemoryActivity::general("com.a", "A-general"));
        host.add_activity(MemoryActivity::tv("com.a", "A"));
        host.add_activity(MemoryActivity::general("com.b", "B"));

        let records = resolver_for(&host).resolve_all();
        assert_eq!(
            summary(&records),
            vec![
                ("com.a".to_string(), "A".to_string(), false),
                ("com.b".to_string(), "B".to_string(), true),
            ]
        );
    }

    #[test]
    fn every_general_activity_of_a_tv_package_is_suppressed() {
        let host = MemoryPackageHost::default();
        host.add_activity(MemoryActivity::tv("com.a", "A"));
        host.add_activity(
            MemoryActivity::general("com.a", "A one")
                .with_activity_name("One"),
        );
        host.add_activity(
            MemoryActivity::general("com.a", "A two")
                .with_activity_name("Two"),
        );

        let records = resolver_for(&host).resolve_all();
        assert_eq!(
            summary(&records),
            vec![("com.a".to_string(), "A".to_string(), false)]
        );
    }

    #[test]
    fn non_sideloaded_records_precede_sideloaded_ones() {
        let host = MemoryPackageHost::default();
        host.add_activity(MemoryActivity::general("com.z", "Z"));
        host.add_activity(MemoryActivity::tv("com.y", "Y"));
        host.add_activity(MemoryActivity::general("com.x", "X"));
        host.add_activity(MemoryActivity::tv("com.w", "W"));

        let records = resolver_for(&host).resolve_all();
        let flags: Vec<bool> = records.iter().map(|record| record.sideloaded).collect();
        assert_eq!(flags, vec![false, false, true, true]);
    }

    #[test]
    fn records_carry_version_and_images() {
        let host = MemoryPackageHost::default();
        host.add_activity(
            MemoryActivity::tv("com.a", "A")
                .with_icon(vec![1])
                .with_banner(vec![2]),
        );
        host.set_version("com.a", Some("3.4.5"));

        let records = resolver_for(&host).resolve_all();
        assert_eq!(
            records,
            vec![ApplicationRecord {
                display_name: "A".to_string(),
                package_name: "com.a".to_string(),
                version: Some("3.4.5".to_string()),
                banner: Some(vec![2]),
                icon: Some(vec![1]),
                sideloaded: false,
            }]
        );
    }

    #[test]
    fn failing_entries_are_dropped_without_aborting() {
        let host = MemoryPackageHost::default();
        host.add_activity(MemoryActivity::tv("com.a", "A"));
        host.add_activity(MemoryActivity::tv("com.broken", "Broken"));
        host.add_activity(MemoryActivity::general("com.b", "B"));
        host.fail_metadata_for("com.broken");

        let records = resolver_for(&host).resolve_all();
        assert_eq!(
            summary(&records),
            vec![
                ("com.a".to_string(), "A".to_string(), false),
                ("com.b".to_string(), "B".to_string(), true),
            ]
        );
    }

    #[test]
    fn failed_tv_query_never_reports_tv_packages_as_sideloaded() {
        let host = MemoryPackageHost::default();
        host.add_activity(MemoryActivity::tv("com.a", "A"));
        host.add_activity(MemoryActivity::general("com.a", "A-general"));
        host.add_activity(MemoryActivity::general("com.b", "B"));
        host.fail_query(LaunchCategory::TvOptimized);

        let resolver = resolver_for(&host);
        assert!(resolver.resolve_all().is_empty());
        assert!(resolver.resolve_for_package("com.a").is_empty());
        assert!(!host.query_log().contains(&LaunchCategory::General));
    }

    #[test]
    fn failed_general_query_keeps_tv_records() {
        let host = MemoryPackageHost::default();
        host.add_activity(MemoryActivity::tv("com.a", "A"));
        host.add_activity(MemoryActivity::general("com.b", "B"));
        host.fail_query(LaunchCategory::General);

        let resolver = resolver_for(&host);
        assert_eq!(
            summary(&resolver.resolve_all()),
            vec![("com.a".to_string(), "A".to_string(), false)]
        );
        assert!(resolver.resolve_for_package("com.b").is_empty());
    }

    #[test]
    fn package_resolution_short_circuits_on_tv_match() {
        let host = MemoryPackageHost::default();
        host.add_activity(MemoryActivity::tv("com.a", "A"));
        host.add_activity(MemoryActivity::general("com.a", "A-general"));

        let records = resolver_for(&host).resolve_for_package("com.a");
        assert_eq!(
            summary(&records),
            vec![("com.a".to_string(), "A".to_string(), false)]
        );
        assert_eq!(host.query_log(), vec![LaunchCategory::TvOptimized]);
    }

    #[test]
    fn package_resolution_falls_back_to_general_surface() {
        let host = MemoryPackageHost::default();
        host.add_activity(MemoryActivity::tv("com.a", "A"));
        host.add_activity(MemoryActivity::general("com.b", "B"));

        let records = resolver_for(&host).resolve_for_package("com.b");
        assert_eq!(
            summary(&records),
            vec![("com.b".to_string(), "B".to_string(), true)]
        );
        assert_eq!(
            host.query_log(),
            vec![LaunchCategory::TvOptimized, LaunchCategory::General]
        );
    }

    #[test]
    fn package_without_launchable_activity_resolves_empty() {
        let host = MemoryPackageHost::default();
        host.set_version("com.c", Some("1"));
        assert!(resolver_for(&host).resolve_for_package("com.c").is_empty());
    }

    #[test]
    fn tv_package_with_failing_metadata_is_not_reported_as_sideloaded() {
        let host = MemoryPackageHost::default();
        host.add_activity(MemoryActivity::tv("com.a", "A"));
        host.add_activity(MemoryActivity::general("com.a", "A-general"));
        host.fail_metadata_for("com.a");

        assert!(resolver_for(&host).resolve_for_package("com.a").is_empty());
        assert!(resolver_for(&host).resolve_all().is_empty());
    }
}
