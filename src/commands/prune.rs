use anyhow::Result;
use pkgscout::{Config, Installer};

pub async fn run() -> Result<()> {
    let installer = Installer::from_config(&Config::load()?);
    installer.prune().await?;

    println!("✓ Removed {}", installer.components_dir().display());
    Ok(())
}
