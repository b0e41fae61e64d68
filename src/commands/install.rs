use super::spinner;
use anyhow::Result;
use pkgscout::{Config, Installer, PackageId};

pub async fn run(package: &str) -> Result<()> {
    let package: PackageId = package.parse()?;
    let installer = Installer::from_config(&Config::load()?);

    let progress = spinner(&format!("Installing {}...", package));
    let result = installer.install(&package).await;
    progress.finish_and_clear();

    for entry_point in result? {
        println!("{}", entry_point.display());
    }
    Ok(())
}
