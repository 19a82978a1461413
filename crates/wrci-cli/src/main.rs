//! WRCI command line runner
//!
//! Parses a pipeline file and runs it against the docker CLI.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wrci_sdk::{EngineConfig, MountSpec, PipelineEngineBuilder, RunOutcome};

const DEFAULT_LOG_FILTER: &str = "wrci=info,wrci_sdk=info,wrci_runtime=info";

#[derive(Parser, Debug)]
#[command(name = "wrci", version, about = "Run WRCI pipeline files in helper containers")]
struct Cli {
    /// Pipeline file to run
    #[arg(long, value_name = "PATH")]
    pipelinefile: PathBuf,

    /// Bind mount for every helper container (repeatable)
    #[arg(short = 'v', long = "volume", value_name = "HOST:CONTAINER")]
    volumes: Vec<MountSpec>,

    /// Print the parsed program as JSON
    #[arg(long)]
    dump_ast: bool,

    /// Parse only, do not run anything
    #[arg(long)]
    check: bool,

    /// Configuration file (YAML, TOML or JSON)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Container CLI binary
    #[arg(long, value_name = "BIN")]
    container_cli: Option<String>,

    /// Directory inside containers holding the pipeline scripts
    #[arg(long, value_name = "PATH")]
    mount_root: Option<String>,

    /// Log filter, e.g. `debug` or `wrci_runtime=debug`
    #[arg(long, value_name = "FILTER")]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref())?;
    run(cli)
}

/// Initialize tracing subscriber
fn init_tracing(level: Option<&str>) -> Result<()> {
    let filter = match level {
        Some(level) => tracing_subscriber::EnvFilter::try_new(level)
            .with_context(|| format!("Invalid log level '{}'", level))?,
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    Ok(())
}

fn load_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = EngineConfig::load(cli.config.as_deref())?;
    config.mounts.extend(cli.volumes.iter().cloned());
    if let Some(bin) = &cli.container_cli {
        config.container_cli = bin.clone();
    }
    if let Some(root) = &cli.mount_root {
        config.mount_root = root.clone();
    }
    Ok(config)
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    let engine = PipelineEngineBuilder::new().with_config(config).build()?;

    let program = engine.load_file(&cli.pipelinefile)?;
    if cli.dump_ast {
        println!("{}", serde_json::to_string_pretty(&program)?);
    }
    if cli.check {
        info!("{} is valid", cli.pipelinefile.display());
        return Ok(());
    }

    let report = engine.run(&program)?;
    match report.outcome {
        RunOutcome::Completed => info!("Pipeline completed"),
        RunOutcome::Exited => info!("Pipeline stopped by EXIT"),
    }
    Ok(())
}
