//! Package installation and entry-point discovery
//!
//! Installs one package into the local working area through Bower and picks
//! out the entry documents its manifest declares as `main`. Dependencies that
//! Bower installs alongside the package are ignored.
//!
//! # Examples
//!
//! ```no_run
//! use pkgscout::{Config, Installer, PackageId};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let installer = Installer::from_config(&Config::load()?);
//! let package: PackageId = "PolymerElements/paper-button#1.0.11".parse()?;
//!
//! for entry in installer.install(&package).await? {
//!     println!("{}", entry.display());
//! }
//! installer.prune().await?;
//! # Ok(())
//! # }
//! ```

use crate::bower::BowerCli;
use crate::config::Config;
use crate::{Error, PackageId, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Bower's install report, keyed by installed package name
pub type InstalledPackages = BTreeMap<String, InstalledPackage>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledPackage {
    #[serde(default)]
    pub endpoint: Endpoint,
    #[serde(default)]
    pub canonical_dir: PathBuf,
    #[serde(default)]
    pub pkg_meta: InstalledMeta,
}

/// What was asked for when the package was installed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub target: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstalledMeta {
    #[serde(default)]
    pub main: Option<EntryPoints>,
}

/// `main` may be a single path or a list of paths
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryPoints {
    Single(String),
    Many(Vec<String>),
}

impl EntryPoints {
    pub fn to_vec(&self) -> Vec<&str> {
        match self {
            EntryPoints::Single(path) => vec![path.as_str()],
            EntryPoints::Many(paths) => paths.iter().map(String::as_str).collect(),
        }
    }
}

/// Pick the entry documents of `package` out of an install report
///
/// Only entries whose endpoint source is exactly `owner/repo` count. Paths are
/// joined onto the package's canonical directory, in declaration order. Blank
/// paths are ignored, so a `main` holding nothing but blanks is missing.
pub fn select_entry_points(
    installed: &InstalledPackages,
    package: &PackageId,
) -> Result<Vec<PathBuf>> {
    let source = package.source();

    let Some((name, entry)) = installed
        .iter()
        .find(|(_, entry)| entry.endpoint.source == source)
    else {
        return Err(Error::PackageNotInstalled(package.to_string()));
    };

    debug!(package = %name, dir = %entry.canonical_dir.display(), "examining installed package");

    let mains = entry
        .pkg_meta
        .main
        .as_ref()
        .map(EntryPoints::to_vec)
        .unwrap_or_default()
        .into_iter()
        .filter(|main| !main.trim().is_empty())
        .collect::<Vec<_>>();

    if mains.is_empty() {
        return Err(Error::MissingEntryPoint(package.to_string()));
    }

    // Declared paths are always relative to the package, even with a leading `/`.
    Ok(mains
        .into_iter()
        .map(|main| entry.canonical_dir.join(main.trim_start_matches('/')))
        .collect())
}

/// Installs packages into, and clears, the local working area
pub struct Installer {
    bower: BowerCli,
    components_dir: PathBuf,
}

impl Installer {
    pub fn new(bower: BowerCli, components_dir: impl Into<PathBuf>) -> Self {
        Self {
            bower,
            components_dir: components_dir.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            BowerCli::from_config(config),
            config.install.components_path(),
        )
    }

    pub fn components_dir(&self) -> &Path {
        &self.components_dir
    }

    /// Install `package` and return the paths of its declared entry documents
    ///
    /// Entry documents that are declared but missing on disk are still
    /// returned, with a warning.
    pub async fn install(&self, package: &PackageId) -> Result<Vec<PathBuf>> {
        info!(package = %package, "installing");

        let installed = self.bower.install(&package.to_request()).await?;
        let entry_points = select_entry_points(&installed, package)?;

        for path in &entry_points {
            if !path.exists() {
                warn!(package = %package, path = %path.display(), "declared entry point not found on disk");
            }
        }

        Ok(entry_points)
    }

    /// Remove the local install working area
    ///
    /// Never touches Bower's shared cache. Succeeds if there is nothing to
    /// remove.
    pub async fn prune(&self) -> Result<()> {
        info!(dir = %self.components_dir.display(), "pruning");

        match tokio::fs::remove_dir_all(&self.components_dir).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn report(json: &str) -> InstalledPackages {
        serde_json::from_str(json).unwrap()
    }

    fn paper_button() -> PackageId {
        PackageId::new("PolymerElements", "paper-button", "1.0.11")
    }

    #[test]
    fn test_single_main_ignores_dependencies() {
        let installed = report(
            r#"{
                "polymer": {
                    "endpoint": { "name": "polymer", "source": "Polymer/polymer", "target": "^1.1.0" },
                    "canonicalDir": "/work/bower_components/polymer",
                    "pkgMeta": { "main": "polymer.html" }
                },
                "paper-button": {
                    "endpoint": { "name": "paper-button", "source": "PolymerElements/paper-button", "target": "1.0.11" },
                    "canonicalDir": "/work/bower_components/paper-button",
                    "pkgMeta": { "name": "paper-button", "main": "paper-button.html" }
                }
            }"#,
        );

        let entries = select_entry_points(&installed, &paper_button()).unwrap();
        assert_eq!(
            entries,
            vec![PathBuf::from("/work/bower_components/paper-button/paper-button.html")]
        );
    }

    #[test]
    fn test_main_list_keeps_order() {
        let installed = report(
            r#"{
                "paper-button": {
                    "endpoint": { "source": "PolymerElements/paper-button" },
                    "canonicalDir": "/c/paper-button",
                    "pkgMeta": { "main": ["b.html", "a.html"] }
                }
            }"#,
        );

        let entries = select_entry_points(&installed, &paper_button()).unwrap();
        assert_eq!(
            entries,
            vec![
                PathBuf::from("/c/paper-button/b.html"),
                PathBuf::from("/c/paper-button/a.html")
            ]
        );
    }

    #[test]
    fn test_missing_main_is_distinct_error() {
        let installed = report(
            r#"{
                "paper-button": {
                    "endpoint": { "source": "PolymerElements/paper-button" },
                    "canonicalDir": "/c/paper-button",
                    "pkgMeta": { "name": "paper-button" }
                }
            }"#,
        );
        assert!(matches!(
            select_entry_points(&installed, &paper_button()),
            Err(Error::MissingEntryPoint(_))
        ));

        let empty_list = report(
            r#"{ "paper-button": { "endpoint": { "source": "PolymerElements/paper-button" }, "pkgMeta": { "main": [] } } }"#,
        );
        assert!(matches!(
            select_entry_points(&empty_list, &paper_button()),
            Err(Error::MissingEntryPoint(_))
        ));
    }

    #[test]
    fn test_blank_main_is_missing() {
        for main in [r#""""#, r#""   ""#, r#"["", ""]"#] {
            let installed = report(&format!(
                r#"{{ "paper-button": {{ "endpoint": {{ "source": "PolymerElements/paper-button" }}, "canonicalDir": "/c/pb", "pkgMeta": {{ "main": {} }} }} }}"#,
                main
            ));
            assert!(
                matches!(
                    select_entry_points(&installed, &paper_button()),
                    Err(Error::MissingEntryPoint(_))
                ),
                "main = {}",
                main
            );
        }

        let mixed = report(
            r#"{ "paper-button": { "endpoint": { "source": "PolymerElements/paper-button" }, "canonicalDir": "/c/pb", "pkgMeta": { "main": ["", "paper-button.html"] } } }"#,
        );
        assert_eq!(
            select_entry_points(&mixed, &paper_button()).unwrap(),
            vec![PathBuf::from("/c/pb/paper-button.html")]
        );
    }

    #[test]
    fn test_rooted_main_stays_inside_package_dir() {
        let installed = report(
            r#"{ "paper-button": { "endpoint": { "source": "PolymerElements/paper-button" }, "canonicalDir": "/c/pb", "pkgMeta": { "main": ["/paper-button.html", "//nested/x.html"] } } }"#,
        );

        let entries = select_entry_points(&installed, &paper_button()).unwrap();
        assert_eq!(
            entries,
            vec![
                PathBuf::from("/c/pb/paper-button.html"),
                PathBuf::from("/c/pb/nested/x.html")
            ]
        );
        assert!(entries.iter().all(|path| path.starts_with("/c/pb")));
    }

    #[test]
    fn test_only_dependencies_installed() {
        let installed = report(
            r#"{ "polymer": { "endpoint": { "source": "Polymer/polymer" }, "pkgMeta": { "main": "polymer.html" } } }"#,
        );
        let err = select_entry_points(&installed, &paper_button()).unwrap_err();
        assert!(matches!(err, Error::PackageNotInstalled(_)));
        assert!(err.to_string().contains("PolymerElements/paper-button#1.0.11"));

        assert!(matches!(
            select_entry_points(&InstalledPackages::new(), &paper_button()),
            Err(Error::PackageNotInstalled(_))
        ));
    }

    #[tokio::test]
    async fn test_prune_removes_working_area_and_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let components = temp.path().join("bower_components");
        std::fs::create_dir_all(components.join("polymer")).unwrap();
        std::fs::write(components.join("polymer").join("polymer.html"), "<link>").unwrap();

        let installer = Installer::new(BowerCli::new("bower", temp.path()), &components);
        installer.prune().await.unwrap();
        assert!(!components.exists());
        assert!(temp.path().exists());

        installer.prune().await.unwrap();
    }
}
