use anyhow::{Context, Result};
use colored::Colorize;
use pathway::{ModuleRegistry, PathwayConfig, RouteBuilder, RouteTable};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// One line of `pathway routes`
#[derive(Debug, Serialize, PartialEq)]
pub struct RouteRow {
    pub target: String,
    pub kind: &'static str,
}

pub fn rows(table: &RouteTable) -> Vec<RouteRow> {
    table
        .iter()
        .map(|route| RouteRow {
            target: route.target.clone(),
            kind: route.kind().as_str(),
        })
        .collect()
}

pub fn execute(config: PathwayConfig, dir: Option<PathBuf>, json: bool) -> Result<()> {
    let base = dir.unwrap_or_else(|| PathBuf::from(&config.routing.base_path));
    let builder = RouteBuilder::new(&base, Arc::new(ModuleRegistry::new(&base)))
        .translator(config.translator());

    let report = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(builder.build())
        .with_context(|| format!("Failed to build routes from {}", base.display()))?;

    let rows = rows(&report.routes);

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("{}", format!("Routes in {}", base.display()).green().bold());
    println!();
    for row in &rows {
        println!("  {:<40} {}", row.target, row.kind.cyan());
    }
    println!();
    println!(
        "  {} {} routes checked in {:.1}ms",
        "✓".green(),
        report.checked,
        report.elapsed.as_secs_f64() * 1000.0
    );

    Ok(())
}
