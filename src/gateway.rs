//! Single-package metadata lookup
//!
//! Wraps a [`RegistryClient`] query, watches its log stream for the cache
//! hit that carries the resolved identity, and never fails: a registry error
//! for one package turns into an empty manifest so the rest of the graph can
//! still be resolved.

use crate::registry::{QueryMode, RegistryClient, RegistryEvent};
use crate::{DependencyIdentity, ResolutionRequest};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Dependency tables and resolved identity for one package
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackageManifest {
    pub dependencies: BTreeMap<String, String>,
    pub dev_dependencies: BTreeMap<String, String>,
    /// Present only when the registry reported a cache hit for the package
    pub identity: Option<DependencyIdentity>,
}

impl PackageManifest {
    pub fn empty() -> Self {
        Self::default()
    }
}

#[derive(Clone)]
pub struct RegistryGateway {
    client: Arc<dyn RegistryClient>,
}

impl RegistryGateway {
    pub fn new(client: Arc<dyn RegistryClient>) -> Self {
        Self { client }
    }

    /// Fetch the manifest for `request`
    ///
    /// If several cache hits are logged the last one wins.
    pub async fn fetch_manifest(
        &self,
        request: &ResolutionRequest,
        mode: QueryMode,
    ) -> PackageManifest {
        debug!(request = %request, offline = mode.is_offline(), "querying registry");

        let mut events = self.client.query(request, mode);
        let mut identity = None;

        while let Some(event) = events.recv().await {
            match event {
                RegistryEvent::Log(entry) => {
                    if let Some(hit) = entry.cache_hit() {
                        identity =
                            DependencyIdentity::for_request(request, hit.name, hit.tag, hit.source);
                        if identity.is_none() {
                            debug!(request = %request, "cache hit without a usable source");
                        }
                    }
                }
                RegistryEvent::End(info) => {
                    return PackageManifest {
                        dependencies: info.dependencies,
                        dev_dependencies: info.dev_dependencies,
                        identity,
                    };
                }
                RegistryEvent::Error(message) => {
                    warn!(request = %request, error = %message, "registry lookup failed");
                    return PackageManifest::empty();
                }
            }
        }

        warn!(request = %request, "registry closed the query without a result");
        PackageManifest::empty()
    }
}
