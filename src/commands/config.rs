use anyhow::Result;
use pkgscout::Config;

pub fn run(action: &crate::ConfigAction) -> Result<()> {
    use crate::ConfigAction;

    match action {
        ConfigAction::Show => show_config(),
        ConfigAction::Path => {
            println!("{}", Config::default_path()?.display());
            Ok(())
        }
        ConfigAction::Set { key, value } => set_config(key, value),
    }
}

fn set_config(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load_file()?;

    match key {
        "bower.command" => config.bower.command = value.to_string(),
        "bower.extra_args" => {
            config.bower.extra_args = value.split_whitespace().map(str::to_string).collect()
        }
        "install.working_dir" => config.install.working_dir = value.to_string(),
        "install.components_dir" => {
            if value.trim().is_empty() {
                anyhow::bail!("install.components_dir cannot be empty");
            }
            config.install.components_dir = value.to_string()
        }
        _ => {
            anyhow::bail!(
                "Unknown configuration key '{}'\n\n\
                 Available keys: bower.command, bower.extra_args, install.working_dir, install.components_dir",
                key
            );
        }
    }

    config.save()?;
    println!("✓ {} = \"{}\"", key, value);
    println!("  Saved to {}", Config::default_path()?.display());

    Ok(())
}

fn show_config() -> Result<()> {
    let config = Config::load()?;
    let config_path = Config::default_path()?;

    println!("Config file: {}", config_path.display());
    if !config_path.exists() {
        println!("  (not found, using defaults)");
    }
    println!();

    println!("[bower]");
    println!("  command:        {}", config.bower.command_path());
    if config.bower.extra_args.is_empty() {
        println!("  extra_args:     (none)");
    } else {
        println!("  extra_args:     {}", config.bower.extra_args.join(" "));
    }
    println!();

    println!("[install]");
    println!(
        "  working_dir:    {}",
        config.install.working_dir_path().display()
    );
    println!(
        "  components_dir: {}",
        config.install.components_path().display()
    );

    Ok(())
}
