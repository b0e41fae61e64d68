//! Recursive, concurrent dependency walk
//!
//! Starting from one package, the walker queries the registry, expands every
//! dependency it has not seen yet and recurses into all of them at once. Dev
//! dependencies are only expanded for the root package. Each node contributes
//! its own identity (when the registry reported one) followed by everything
//! its children collected.
//!
//! Siblings share a [`VisitedSet`]. A name is claimed in the set before its
//! branch is created, so when two branches both reach the same transitive
//! dependency only the first one to claim it queries the registry.

use crate::gateway::RegistryGateway;
use crate::registry::QueryMode;
use crate::{DependencyIdentity, ResolutionRequest};
use futures::future::{join_all, BoxFuture, FutureExt};
use std::collections::HashSet;
use std::sync::Mutex;
use tracing::debug;

/// Flat, unordered identities gathered by one walk
pub type DependencyList = Vec<DependencyIdentity>;

/// Dependency names claimed during one walk
///
/// Keyed by the local name a manifest uses, not by owner/repo. Names are
/// never removed.
#[derive(Debug, Default)]
pub struct VisitedSet {
    names: Mutex<HashSet<String>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `name`, returning `false` if it was already claimed
    pub fn insert(&self, name: &str) -> bool {
        self.names
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(name.to_string())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Walks a dependency graph through the registry in a single query mode
pub struct DependencyWalker {
    gateway: RegistryGateway,
    mode: QueryMode,
}

impl DependencyWalker {
    pub fn new(gateway: RegistryGateway, mode: QueryMode) -> Self {
        Self { gateway, mode }
    }

    /// Walk the whole graph below `root` with a fresh visited set
    pub async fn walk_from(&self, root: &ResolutionRequest) -> DependencyList {
        let visited = VisitedSet::new();
        let list = self.walk(root.clone(), &visited, true).await;
        debug!(
            root = %root,
            visited = visited.len(),
            identities = list.len(),
            "walk finished"
        );
        list
    }

    /// Walk one node and everything below it
    ///
    /// `is_root` controls whether dev dependencies are expanded. The walk
    /// cannot fail; unreachable packages contribute nothing.
    pub fn walk<'a>(
        &'a self,
        request: ResolutionRequest,
        visited: &'a VisitedSet,
        is_root: bool,
    ) -> BoxFuture<'a, DependencyList> {
        async move {
            let manifest = self.gateway.fetch_manifest(&request, self.mode).await;

            // Dev dependency specs override runtime ones of the same name.
            let mut candidates = manifest.dependencies;
            if is_root {
                candidates.extend(manifest.dev_dependencies);
            }

            let mut result: DependencyList = manifest.identity.into_iter().collect();

            // Claiming happens here, before any child future exists. Nothing
            // between the lookup and the insert yields, so concurrent
            // siblings can never both claim the same name.
            let pending: Vec<(String, String)> = candidates
                .into_iter()
                .filter(|(name, _)| visited.insert(name))
                .collect();

            if pending.is_empty() {
                return result;
            }

            let children = pending.into_iter().map(|(name, spec)| {
                let child = ResolutionRequest::for_dependency(&name, &spec);
                debug!(parent = %request, dependency = %name, request = %child, "expanding");
                self.walk(child, visited, false)
            });

            for sub_list in join_all(children).await {
                result.extend(sub_list);
            }

            result
        }
        .boxed()
    }
}
