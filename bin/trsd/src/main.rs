//! ---
//! trs_section: "01-core-functionality"
//! trs_subsection: "binary"
//! trs_type: "source"
//! trs_scope: "code"
//! trs_description: "Binary entrypoint for the TRS daemon."
//! trs_version: "v0.1.0"
//! trs_owner: "tbd"
//! ---
use std::fs::File;
use std::io::{self, Write};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::signal;
use tracing::{info, warn};
use trs_api::{spawn_api_server, ApiState};
use trs_common::config::AppConfig;
use trs_common::logging::init_tracing;
use trs_core::HallGenerator;

#[derive(Debug, Parser)]
#[command(author, version, about = "TRS daemon", long_about = None)]
struct Cli {
    #[arg(long, value_name = "FILE", help = "Path to configuration file")]
    config: Option<PathBuf>,

    #[arg(long, help = "Override the configured random seed")]
    seed: Option<u64>,

    #[arg(long, help = "Override the configured API listen address")]
    listen: Option<SocketAddr>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Run the daemon")]
    Run,
    #[command(about = "Generate one hall snapshot and write it as JSON")]
    Snapshot {
        /// Output file path. Use '-' for stdout.
        #[arg(long, default_value = "-")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut candidates = Vec::new();
    if let Some(path) = &cli.config {
        candidates.push(path.clone());
    }
    candidates.push(PathBuf::from("configs/example.prod.toml"));
    candidates.push(PathBuf::from("configs/example.dev.toml"));

    let loaded = AppConfig::load_with_source(&candidates)?;
    let mut config = loaded.config;
    apply_overrides(&mut config, &cli);

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_daemon(config, loaded.source).await,
        Commands::Snapshot { output } => write_snapshot(&config, &output),
    }
}

fn apply_overrides(config: &mut AppConfig, cli: &Cli) {
    if let Some(seed) = cli.seed {
        config.simulation.random_seed = Some(seed);
    }
    if let Some(listen) = cli.listen {
        config.api.listen = listen;
    }
}

async fn run_daemon(config: AppConfig, config_path: PathBuf) -> Result<()> {
    init_tracing("trsd", &config.logging)?;
    info!(config_path = %config_path.display(), "configuration loaded");

    let generator = HallGenerator::from_config(&config);
    let state = Arc::new(ApiState::new(generator));

    let api_server = if config.api.enabled {
        let static_dir = config.api.static_dir.clone().and_then(|dir| {
            if dir.is_dir() {
                Some(dir)
            } else {
                warn!(static_dir = %dir.display(), "api static_dir not found; serving API without assets");
                None
            }
        });
        let server = spawn_api_server(state, config.api.listen, static_dir)?;
        info!(address = %server.addr(), "api server listening");
        Some(server)
    } else {
        info!("api server disabled by configuration");
        None
    };

    info!("daemon running; waiting for termination signal");
    signal::ctrl_c().await?;
    info!("ctrl-c received; shutting down");

    if let Some(server) = api_server {
        server.shutdown().await?;
    }

    Ok(())
}

fn write_snapshot(config: &AppConfig, output: &Path) -> Result<()> {
    let mut generator = HallGenerator::from_config(config);
    let snapshot = generator.generate();

    if output.as_os_str() == "-" {
        let mut stdout = io::stdout().lock();
        serde_json::to_writer_pretty(&mut stdout, &snapshot)?;
        stdout.write_all(b"\n")?;
    } else {
        let file = File::create(output)
            .with_context(|| format!("failed to create output file {}", output.display()))?;
        serde_json::to_writer_pretty(file, &snapshot)?;
        eprintln!(
            "generated {} racks for {} -> {}",
            snapshot.racks().len(),
            snapshot.site(),
            output.display()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_cli() -> Cli {
        Cli {
            config: None,
            seed: None,
            listen: None,
            command: None,
        }
    }

    #[test]
    fn overrides_replace_configured_values() {
        let mut config = AppConfig::default();
        let mut cli = base_cli();
        cli.seed = Some(7);
        cli.listen = Some("127.0.0.1:9000".parse().expect("addr"));

        apply_overrides(&mut config, &cli);
        assert_eq!(config.simulation.random_seed, Some(7));
        assert_eq!(config.api.listen.port(), 9000);
    }

    #[test]
    fn overrides_leave_untouched_fields_alone() {
        let mut config = AppConfig::default();
        config.simulation.random_seed = Some(99);
        apply_overrides(&mut config, &base_cli());
        assert_eq!(config.simulation.random_seed, Some(99));
    }

    #[test]
    fn snapshot_command_writes_the_wire_contract() {
        let mut config = AppConfig::default();
        config.simulation.random_seed = Some(12);

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("hall.json");
        write_snapshot(&config, &path).expect("snapshot written");

        let contents = std::fs::read_to_string(&path).expect("read back");
        let value: serde_json::Value = serde_json::from_str(&contents).expect("valid json");
        assert_eq!(value["racks"].as_array().expect("racks").len(), 24);
        assert!(value["currentSetpoint"].is_number());
        assert!(value["overallHeadroom"].is_string());
    }
}
