//! Install-resolve-prune analysis of a single package
//!
//! Bower only reports reliable results for one main package at a time, so a
//! full analysis clears the working area, installs the package to find its
//! entry documents, resolves its dependencies and clears the working area
//! again.

use crate::installer::Installer;
use crate::resolver::TwoPassResolver;
use crate::walker::DependencyList;
use crate::{PackageId, Result};
use serde::Serialize;
use std::path::PathBuf;
use tracing::warn;

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub package: PackageId,
    pub entry_points: Vec<PathBuf>,
    pub dependencies: DependencyList,
    /// RFC 3339 timestamp of when resolution finished
    pub resolved_at: String,
}

/// Analyze `package`
///
/// The closing prune runs even when installation or resolution failed; the
/// first error wins.
pub async fn analyze(
    installer: &Installer,
    resolver: &TwoPassResolver,
    package: &PackageId,
) -> Result<AnalysisReport> {
    installer.prune().await?;

    let outcome = install_and_resolve(installer, resolver, package).await;
    let pruned = installer.prune().await;

    let (entry_points, dependencies) = outcome?;
    if let Err(e) = pruned {
        warn!(error = %e, "failed to prune after analysis");
        return Err(e);
    }

    Ok(AnalysisReport {
        package: package.clone(),
        entry_points,
        dependencies,
        resolved_at: chrono::Utc::now().to_rfc3339(),
    })
}

async fn install_and_resolve(
    installer: &Installer,
    resolver: &TwoPassResolver,
    package: &PackageId,
) -> Result<(Vec<PathBuf>, DependencyList)> {
    let entry_points = installer.install(package).await?;
    let dependencies = resolver.resolve(package).await?;
    Ok((entry_points, dependencies))
}
