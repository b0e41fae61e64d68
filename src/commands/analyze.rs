use super::spinner;
use anyhow::Result;
use pkgscout::{analyze, BowerCli, Config, Installer, PackageId, TwoPassResolver};
use std::sync::Arc;

pub async fn run(package: &str) -> Result<()> {
    let package: PackageId = package.parse()?;
    let config = Config::load()?;
    let installer = Installer::from_config(&config);
    let resolver = TwoPassResolver::new(Arc::new(BowerCli::from_config(&config)));

    let progress = spinner(&format!("Analyzing {}...", package));
    let result = analyze(&installer, &resolver, &package).await;
    progress.finish_and_clear();

    let mut report = result?;
    report.dependencies.sort();

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
