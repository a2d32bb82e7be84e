//! Package-domain contracts and in-memory adapters.

mod catalog;
mod events;
mod memory;
mod types;

pub use catalog::{NoopPackageCatalog, PackageCatalogService};
pub use events::{NoopPackageEventSource, PackageEventSource, PackageListener};
pub use memory::{MemoryActivity, MemoryPackageHost};
pub use types::{ActivityDescriptor, LaunchCategory, ListenerToken};
