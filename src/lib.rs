//! pkgscout - dependency and entry-point discovery for Bower packages
//!
//! pkgscout inspects one git-hosted Bower package at a time and answers two
//! questions for build tooling:
//!
//! - Which packages does it need? Runtime dependencies are followed
//!   transitively, dev dependencies of the package itself are included but not
//!   followed further.
//! - Which documents does it ship as entry points? The package is installed
//!   into a clean working area and its declared `main` files are reported.
//!
//! # Examples
//!
//! ```no_run
//! use pkgscout::{BowerCli, Config, TwoPassResolver};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load()?;
//! let resolver = TwoPassResolver::new(Arc::new(BowerCli::from_config(&config)));
//!
//! let deps = resolver.resolve_all("PolymerElements", "paper-input", "1.1.0").await?;
//! println!("Resolved {} packages", deps.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`request`] - Normalize package references into registry queries
//! - [`registry`] - Registry query capability and its event stream
//! - [`gateway`] - Fault-tolerant single-package lookups
//! - [`walker`] - Concurrent transitive dependency walk
//! - [`resolver`] - Cache-warming two-pass resolution
//! - [`bower`] - Bower process client
//! - [`installer`] - Install, entry-point discovery and pruning
//! - [`analysis`] - Install, resolve and prune in one go
//! - [`config`] - User configuration
//! - [`error`] - Error types and result handling

pub mod analysis;
pub mod bower;
pub mod config;
pub mod error;
pub mod gateway;
pub mod installer;
pub mod registry;
pub mod request;
pub mod resolver;
pub mod walker;

pub use analysis::{analyze, AnalysisReport};
pub use bower::BowerCli;
pub use config::Config;
pub use error::{Error, Result};
pub use gateway::{PackageManifest, RegistryGateway};
pub use installer::{
    select_entry_points, EntryPoints, InstalledPackage, InstalledPackages, Installer,
};
pub use registry::{LogEntry, PackageInfo, QueryMode, RegistryClient, RegistryEvent};
pub use request::{DependencyIdentity, PackageId, ResolutionRequest};
pub use resolver::TwoPassResolver;
pub use walker::{DependencyList, DependencyWalker, VisitedSet};
