use super::spinner;
use anyhow::Result;
use pkgscout::{BowerCli, Config, PackageId, TwoPassResolver};
use std::sync::Arc;

pub async fn run(package: &str) -> Result<()> {
    let package: PackageId = package.parse()?;
    let config = Config::load()?;
    let resolver = TwoPassResolver::new(Arc::new(BowerCli::from_config(&config)));

    let progress = spinner(&format!("Resolving dependencies of {}...", package));
    let result = resolver.resolve(&package).await;
    progress.finish_and_clear();

    let mut dependencies = result?;
    dependencies.sort();

    println!("{}", serde_json::to_string_pretty(&dependencies)?);
    Ok(())
}
