//! Package reference normalization
//!
//! Registry queries are keyed by a resolution request, normally
//! `owner/repo#version`. Manifests also declare dependencies as bare versions
//! (resolved against the declared name), and registry cache events identify
//! packages by their git source URI. This module turns all of those shapes
//! into one canonical form. Nothing here touches the network or filesystem.
//!
//! # Examples
//!
//! ```
//! use pkgscout::{DependencyIdentity, ResolutionRequest};
//!
//! let request = ResolutionRequest::from_parts("acme", "widgets", "1.0.0");
//! assert_eq!(request.as_str(), "acme/widgets#1.0.0");
//!
//! let identity = DependencyIdentity::from_source(
//!     "widgets",
//!     "2.3.1",
//!     "git://github.com/Acme/Widgets.git",
//! )
//! .unwrap();
//! assert_eq!(identity.owner, "Acme");
//! assert_eq!(identity.repo, "Widgets");
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Canonical registry query string
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResolutionRequest(String);

/// Borrowed view of an `owner/repo[#version]` request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestParts<'a> {
    pub owner: &'a str,
    pub repo: &'a str,
    pub version: Option<&'a str>,
}

impl ResolutionRequest {
    /// Build `owner/repo#version`
    pub fn from_parts(owner: &str, repo: &str, version: &str) -> Self {
        Self(format!("{}/{}#{}", owner, repo, version))
    }

    /// Normalize a manifest entry (`name: spec`) into a queryable request
    ///
    /// Specs that already name a location (`owner/repo`, `owner/repo#1.2.0`,
    /// git URLs) pass through untouched. Anything else is a bare version or
    /// range and gets paired with the dependency name, leaving the registry to
    /// resolve the name against its known sources.
    pub fn for_dependency(name: &str, spec: &str) -> Self {
        if spec.contains('/') {
            Self(spec.to_string())
        } else {
            Self(format!("{}#{}", name, spec))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split an `owner/repo[#version]` request
    ///
    /// The repo is the last path segment before `#`; everything ahead of it
    /// is the owner, so nested owners like `group/sub/repo` keep their full
    /// path. Returns `None` for bare names and for URL-shaped requests.
    pub fn split(&self) -> Option<RequestParts<'_>> {
        if is_location_uri(&self.0) {
            return None;
        }

        let (path, version) = match self.0.split_once('#') {
            Some((path, version)) => (path, Some(version).filter(|v| !v.is_empty())),
            None => (self.0.as_str(), None),
        };

        let (owner, repo) = path.rsplit_once('/')?;
        if owner.is_empty() || repo.is_empty() {
            return None;
        }

        Some(RequestParts {
            owner,
            repo,
            version,
        })
    }
}

impl fmt::Display for ResolutionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fully pinned `(owner, repo, version)` triple, as accepted on the command line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageId {
    pub owner: String,
    pub repo: String,
    pub version: String,
}

impl PackageId {
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            version: version.into(),
        }
    }

    /// `owner/repo`, the form the installer reports as an endpoint source
    pub fn source(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    pub fn to_request(&self) -> ResolutionRequest {
        ResolutionRequest::from_parts(&self.owner, &self.repo, &self.version)
    }
}

impl FromStr for PackageId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let request = ResolutionRequest(s.trim().to_string());
        let parts = request
            .split()
            .ok_or_else(|| Error::InvalidRequest(s.to_string()))?;
        let version = parts
            .version
            .ok_or_else(|| Error::InvalidRequest(s.to_string()))?;

        Ok(Self::new(parts.owner, parts.repo, version))
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.version)
    }
}

/// Registry-confirmed identity of one dependency graph node
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DependencyIdentity {
    pub name: String,
    pub version: String,
    pub owner: String,
    pub repo: String,
}

impl DependencyIdentity {
    /// Derive an identity from a registry source URI such as
    /// `git://github.com/Owner/Repo.git` and the tag it resolved to
    pub fn from_source(name: &str, tag: &str, source: &str) -> Option<Self> {
        let (owner, repo) = owner_repo_from_source(source)?;
        Some(Self {
            name: name.to_string(),
            version: tag.to_string(),
            owner,
            repo,
        })
    }

    /// Derive an identity for a cache hit observed while querying `request`
    ///
    /// When the request itself is `owner/repo[#version]` the owner and repo
    /// come from it; otherwise they come from the resolver source URI. The
    /// version is always the resolved tag.
    pub fn for_request(
        request: &ResolutionRequest,
        name: &str,
        tag: &str,
        source: Option<&str>,
    ) -> Option<Self> {
        if let Some(parts) = request.split() {
            return Some(Self {
                name: name.to_string(),
                version: tag.to_string(),
                owner: parts.owner.to_string(),
                repo: parts.repo.to_string(),
            });
        }

        Self::from_source(name, tag, source?)
    }
}

/// Split a git source location into `(owner, repo)`
///
/// Handles full URLs (`git://host/Owner/Repo.git`), scp-style remotes
/// (`git@host:Owner/Repo.git`) and plain `Owner/Repo` paths. The `.git` suffix
/// is dropped and nested owner paths are preserved.
pub fn owner_repo_from_source(source: &str) -> Option<(String, String)> {
    let source = source.trim();
    let path = match Url::parse(source) {
        Ok(url) if url.has_host() || url.scheme() == "file" => url.path().to_string(),
        _ => match source.split_once(':') {
            Some((_, path)) if !source.contains("://") => path.to_string(),
            _ => source.to_string(),
        },
    };

    let path = path.trim_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    let (owner, repo) = path.rsplit_once('/')?;

    if owner.is_empty() || repo.is_empty() {
        return None;
    }

    Some((owner.to_string(), repo.to_string()))
}

fn is_location_uri(s: &str) -> bool {
    s.contains("://") || s.starts_with("git@")
}
