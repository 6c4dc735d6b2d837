use anyhow::Context;
use clap::{Parser, Subcommand};
use fleet_core::{ProbeId, ProbeProgram};
use serde::Serialize;
use std::path::{Path, PathBuf};

mod client;
mod render;

use client::MetadataClient;

#[derive(Parser)]
#[command(name = "fleet")]
#[command(about = "Fleet CLI - Agent, schema and probe management")]
#[command(version = fleet_core::VERSION)]
struct Cli {
    /// Metadata service base URL
    #[arg(long, env = "FLEET_ENDPOINT", default_value = "http://localhost:8081")]
    endpoint: String,

    /// Print raw JSON responses
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List agents with their health
    Agents,
    /// Show table metadata per agent
    Tables,
    /// Show the fleet-wide schema
    Schema,
    /// Probe lifecycle commands
    Probe {
        #[command(subcommand)]
        action: ProbeAction,
    },
    /// Service status
    Status,
}

#[derive(Subcommand)]
enum ProbeAction {
    /// Register a probe on every active agent
    Register {
        name: String,
        /// JSON file holding the probe program
        #[arg(long)]
        program: PathBuf,
    },
    /// Show the aggregated state of one or more probes
    Info {
        #[arg(required = true)]
        probe_ids: Vec<ProbeId>,
    },
    /// Evict a probe from the fleet
    Evict { name: String },
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn load_program(path: &Path) -> anyhow::Result<ProbeProgram> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read probe program {}", path.display()))?;
    ProbeProgram::from_json(raw)
        .with_context(|| format!("probe program {} is not valid JSON", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = MetadataClient::new(cli.endpoint);

    match cli.command {
        Commands::Agents => {
            let resp = client.agents().await?;
            if cli.json {
                print_json(&resp)?;
            } else {
                print!("{}", render::agents(&resp));
            }
        }
        Commands::Tables => {
            let resp = client.agent_tables().await?;
            if cli.json {
                print_json(&resp)?;
            } else {
                print!("{}", render::agent_tables(&resp));
            }
        }
        Commands::Schema => {
            let resp = client.schema().await?;
            if cli.json {
                print_json(&resp)?;
            } else {
                print!("{}", render::schema(&resp));
            }
        }
        Commands::Probe { action } => handle_probe_action(&client, action, cli.json).await?,
        Commands::Status => {
            let resp = client.health().await?;
            if cli.json {
                print_json(&resp)?;
            } else {
                println!("📊 Metadata service: {}", resp["status"].as_str().unwrap_or("unknown"));
            }
        }
    }
    Ok(())
}

async fn handle_probe_action(
    client: &MetadataClient,
    action: ProbeAction,
    json: bool,
) -> anyhow::Result<()> {
    match action {
        ProbeAction::Register { name, program } => {
            let program = load_program(&program)?;
            let resp = client.register_probe(name.clone(), program).await?;
            if json {
                print_json(&resp)?;
            } else {
                print!("{}", render::registration(&name, &resp));
            }
        }
        ProbeAction::Info { probe_ids } => {
            let resp = client.probe_info(probe_ids).await?;
            if json {
                print_json(&resp)?;
            } else {
                print!("{}", render::probe_info(&resp));
            }
        }
        ProbeAction::Evict { name } => {
            let resp = client.evict_probe(name.clone()).await?;
            if json {
                print_json(&resp)?;
            } else {
                println!("🗑️  Probe '{}' evicted", name);
            }
        }
    }
    Ok(())
}
