//! Typed host-domain contracts for the OS collaborators of the launcher inventory core.
//!
//! This crate is the API-first boundary for platform services. It exposes the package catalog,
//! package-lifecycle listener registration, and single-shot shell command traits, together with
//! in-memory and no-op adapters. Concrete OS adapters live with the platform shell.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod commands;
pub mod error;
pub mod host;
pub mod packages;

pub use commands::{
    LauncherCommand, LauncherCommandService, NoopLauncherCommandService, RecordingCommandService,
};
pub use error::HostError;
pub use host::LauncherHostServices;
pub use packages::{
    ActivityDescriptor, LaunchCategory, ListenerToken, MemoryActivity, MemoryPackageHost,
    NoopPackageCatalog, NoopPackageEventSource, PackageCatalogService, PackageEventSource,
    PackageListener,
};
