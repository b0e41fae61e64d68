//! Two-pass transitive dependency resolution
//!
//! The registry only reports the tag and source it resolved a package to when
//! it serves that package from its cache. A cold walk therefore comes back
//! with gaps, so every resolution runs two complete walks: an online one that
//! fills the registry cache and is thrown away, then an offline one that reads
//! purely from the now-warm cache and is returned.
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
//! let deps = resolver
//!     .resolve_all("PolymerElements", "paper-button", "1.0.11")
//!     .await?;
//! for dep in deps {
//!     println!("{} -> {}/{}#{}", dep.name, dep.owner, dep.repo, dep.version);
//! }
//! # Ok(())
//! # }
//! ```

use crate::gateway::RegistryGateway;
use crate::registry::{QueryMode, RegistryClient};
use crate::walker::{DependencyList, DependencyWalker};
use crate::{Error, PackageId, ResolutionRequest, Result};
use std::sync::Arc;
use tokio::task::JoinError;
use tracing::{debug, info, warn};

pub struct TwoPassResolver {
    gateway: RegistryGateway,
}

impl TwoPassResolver {
    pub fn new(client: Arc<dyn RegistryClient>) -> Self {
        Self {
            gateway: RegistryGateway::new(client),
        }
    }

    /// Gather the runtime dependencies of `owner/repo#version` transitively,
    /// plus its direct dev dependencies
    ///
    /// A failed warming pass is logged and ignored. Only a failure of the
    /// offline pass is returned.
    pub async fn resolve_all(
        &self,
        owner: &str,
        repo: &str,
        version: &str,
    ) -> Result<DependencyList> {
        let request = ResolutionRequest::from_parts(owner, repo, version);
        info!(request = %request, "finding transitive dependencies");

        match self.run_pass(&request, QueryMode::Online).await {
            Ok(discarded) => debug!(
                request = %request,
                identities = discarded.len(),
                "registry cache warmed"
            ),
            Err(e) => warn!(
                request = %request,
                error = %e,
                "cache warming pass failed, continuing with offline pass"
            ),
        }

        let dependencies = self
            .run_pass(&request, QueryMode::Offline)
            .await
            .map_err(|e| Error::Resolution(format!("offline pass for {} failed: {}", request, e)))?;

        info!(
            request = %request,
            identities = dependencies.len(),
            "dependencies resolved"
        );
        Ok(dependencies)
    }

    pub async fn resolve(&self, package: &PackageId) -> Result<DependencyList> {
        self.resolve_all(&package.owner, &package.repo, &package.version)
            .await
    }

    /// One full walk on its own task, with its own visited set
    async fn run_pass(
        &self,
        request: &ResolutionRequest,
        mode: QueryMode,
    ) -> std::result::Result<DependencyList, JoinError> {
        let walker = DependencyWalker::new(self.gateway.clone(), mode);
        let root = request.clone();
        tokio::spawn(async move { walker.walk_from(&root).await }).await
    }
}
