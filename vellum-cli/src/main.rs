//! Vellum CLI - schema validation and document resolution.
//!
//! ```bash
//! vellum check --schema schema.json
//! vellum find --collection posts --where '{"slug":{"equals":"hello"}}' --depth 1
//! ```
//!
//! Settings come from `vellum.toml` and `VELLUM_*` environment variables; see
//! `vellum --help` for the flags that override them.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use vellum_core::config::VellumConfig;

#[derive(Parser)]
#[command(name = "vellum", about = "Vellum content resolver", version)]
struct Cli {
    /// Configuration file
    #[arg(long, global = true, default_value = vellum_core::config::CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a collection schema file
    Check {
        /// Schema file (defaults to storage.schema_path)
        #[arg(long)]
        schema: Option<PathBuf>,
    },
    /// Resolve and populate documents of a collection
    Find(commands::find::FindArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = run(cli).await;

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = VellumConfig::load_from(&cli.config)?;
    config.validate()?;
    vellum_core::logging::init_logging(&config.logging)?;

    let output = match cli.command {
        Commands::Check { schema } => {
            let path = schema.unwrap_or_else(|| PathBuf::from(&config.storage.schema_path));
            commands::check::run(&path)?
        }
        Commands::Find(args) => commands::find::run(&config, &args).await?,
    };
    println!("{}", output);
    Ok(())
}
