//! Registry query capability and event model
//!
//! The registry is consulted one package at a time. A query produces a stream
//! of events: zero or more log entries followed by exactly one terminal event,
//! either the package info or an error. Log entries matter because the
//! registry only reports the concrete tag and source it resolved to through a
//! `cached` log entry, never through the terminal result.
//!
//! Clients are injected as `Arc<dyn RegistryClient>` so callers can choose
//! between the real Bower process and an in-memory registry in tests.

use crate::ResolutionRequest;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tokio::sync::mpsc;

/// Log id the registry emits when it served a package from its resolution cache
pub const CACHED_LOG_ID: &str = "cached";

/// Whether a query may reach the network or must stay on cached data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryMode {
    /// Network allowed; populates the registry cache as a side effect
    Online,
    /// Cache only
    Offline,
}

impl QueryMode {
    pub fn is_offline(self) -> bool {
        matches!(self, QueryMode::Offline)
    }
}

/// Terminal package info for one query
///
/// Only the dependency tables are consumed; every other field the registry
/// reports is ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageInfo {
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
    #[serde(default)]
    pub dev_dependencies: BTreeMap<String, String>,
}

/// One intermediate log entry emitted during a query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<LogData>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogData {
    #[serde(default)]
    pub pkg_meta: Option<PkgMeta>,
    #[serde(default)]
    pub resolver: Option<ResolverInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PkgMeta {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "_resolution", default)]
    pub resolution: Option<Resolution>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    #[serde(default)]
    pub tag: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolverInfo {
    #[serde(default)]
    pub source: Option<String>,
}

/// Cache-hit details carried by a `cached` log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheHit<'a> {
    pub name: &'a str,
    pub tag: &'a str,
    pub source: Option<&'a str>,
}

impl LogEntry {
    /// Build a `cached` entry, mostly useful for test registries
    pub fn cached(name: &str, tag: &str, source: &str) -> Self {
        Self {
            level: "info".to_string(),
            id: CACHED_LOG_ID.to_string(),
            message: format!("{}#{}", name, tag),
            data: Some(LogData {
                pkg_meta: Some(PkgMeta {
                    name: name.to_string(),
                    resolution: Some(Resolution {
                        tag: Some(tag.to_string()),
                    }),
                }),
                resolver: Some(ResolverInfo {
                    source: Some(source.to_string()),
                }),
            }),
        }
    }

    /// The cache hit this entry reports, if it is a `cached` entry that
    /// carries a resolved tag
    pub fn cache_hit(&self) -> Option<CacheHit<'_>> {
        if self.id != CACHED_LOG_ID {
            return None;
        }

        let data = self.data.as_ref()?;
        let pkg_meta = data.pkg_meta.as_ref()?;
        let tag = pkg_meta.resolution.as_ref()?.tag.as_deref()?;
        let source = data.resolver.as_ref().and_then(|r| r.source.as_deref());

        Some(CacheHit {
            name: &pkg_meta.name,
            tag,
            source,
        })
    }

    pub fn is_error(&self) -> bool {
        self.level == "error"
    }
}

/// Event emitted while a query runs
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryEvent {
    Log(LogEntry),
    End(PackageInfo),
    Error(String),
}

/// A registry that can be queried for one package's metadata
///
/// Implementations send any number of [`RegistryEvent::Log`] events followed
/// by one [`RegistryEvent::End`] or [`RegistryEvent::Error`], then drop the
/// sender. Must be called from within a tokio runtime.
pub trait RegistryClient: Send + Sync {
    fn query(
        &self,
        request: &ResolutionRequest,
        mode: QueryMode,
    ) -> mpsc::UnboundedReceiver<RegistryEvent>;
}
