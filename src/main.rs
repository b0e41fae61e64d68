use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

/// pkgscout - dependency and entry-point discovery for Bower packages
#[derive(Parser)]
#[command(name = "pkgscout")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve transitive dependencies of a package (prints JSON)
    Deps {
        /// Package to resolve (e.g., PolymerElements/paper-button#1.0.11)
        package: String,
    },

    /// Install a package and list its entry points
    Install {
        /// Package to install (e.g., PolymerElements/paper-button#1.0.11)
        package: String,
    },

    /// Remove the local install working area
    Prune,

    /// Install, resolve and prune in one go (prints JSON)
    Analyze {
        /// Package to analyze (e.g., PolymerElements/paper-button#1.0.11)
        package: String,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,

    /// Print the config file location
    Path,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., bower.command)
        key: String,
        /// Configuration value
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "pkgscout=debug,warn"
    } else {
        "pkgscout=info,warn"
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Deps { package } => commands::deps::run(&package).await,
        Commands::Install { package } => commands::install::run(&package).await,
        Commands::Prune => commands::prune::run().await,
        Commands::Analyze { package } => commands::analyze::run(&package).await,
        Commands::Config { action } => commands::config::run(&action),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "pkgscout", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
