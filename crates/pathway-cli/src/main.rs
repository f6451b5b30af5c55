mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pathway::config::CONFIG_FILE;
use pathway::PathwayConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use commands::serve::ServeOptions;

#[derive(Parser)]
#[command(name = "pathway")]
#[command(version, about = "Pathway - file-system routing for axum", long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(short, long, global = true, default_value = CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve a routes directory
    Serve {
        /// Routes directory (default: routing.base_path from the config file)
        dir: Option<PathBuf>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Address to bind
        #[arg(long)]
        host: Option<String>,

        /// Expose the /_liveReload token endpoint
        #[arg(long)]
        live_reload: bool,
    },

    /// List the routes a directory produces
    Routes {
        /// Routes directory (default: routing.base_path from the config file)
        dir: Option<PathBuf>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    // .env is optional
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let config = PathwayConfig::load(&cli.config)?;

    match cli.command {
        Commands::Serve {
            dir,
            port,
            host,
            live_reload,
        } => {
            let options = ServeOptions {
                dir,
                port,
                host,
                live_reload,
            };
            commands::serve::execute(options.apply(config))?;
        }
        Commands::Routes { dir, json } => {
            commands::routes::execute(config, dir, json)?;
        }
    }

    Ok(())
}
