use anyhow::{Context, Result};
use colored::Colorize;
use pathway::{ModuleRegistry, PathwayConfig, Server};
use std::path::PathBuf;

/// Flags of `pathway serve`; each one overrides the config file
#[derive(Debug, Default)]
pub struct ServeOptions {
    pub dir: Option<PathBuf>,
    pub port: Option<u16>,
    pub host: Option<String>,
    pub live_reload: bool,
}

impl ServeOptions {
    pub fn apply(self, mut config: PathwayConfig) -> PathwayConfig {
        if let Some(dir) = self.dir {
            config.routing.base_path = dir.to_string_lossy().into_owned();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if self.live_reload {
            config.dev.live_reload = true;
        }
        config
    }
}

pub fn execute(config: PathwayConfig) -> Result<()> {
    let server_config = config.into_server_config();
    let base = server_config.base_path().to_path_buf();

    println!();
    println!("{}", "🚀 Starting pathway server...".green().bold());
    println!();
    println!("  {} Routes: {}", "📂".cyan(), base.display());
    if server_config.live_reload_enabled() {
        println!("  {} Live reload: {}", "🔄".cyan(), pathway::LIVE_RELOAD_PATH);
    }

    // Handlers are compiled in; from the CLI every file is a static asset
    let mut server = Server::new(server_config, ModuleRegistry::new(&base));

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async {
            let report = server.prepare().await.context("Failed to build routes")?;
            println!("  {} {} routes", "✓".green(), report.patch.registered.len());
            for (target, reason) in &report.patch.failed {
                println!("  {} {} ({})", "✗".red(), target, reason);
            }

            println!();
            println!(
                "{}",
                format!("Server running at http://{}", server.config().address())
                    .green()
                    .bold()
            );
            println!("{}", "Press Ctrl+C to stop".dimmed());
            println!();

            server.fire().await.context("Server stopped with an error")
        })
}
