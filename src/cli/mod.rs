pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ncc-api")]
#[command(about = "NCC API - industrial relations registry server and tooling")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Start the HTTP API server")]
    Serve {
        #[arg(long, help = "Port to listen on (defaults to PORT / NCC_API_PORT)")]
        port: Option<u16>,

        #[arg(long, help = "Use the in-memory store instead of PostgreSQL")]
        memory: bool,
    },

    #[command(about = "Apply PostgreSQL migrations")]
    Migrate,

    #[command(about = "Validate a negotiation JSON document and print the derived values")]
    CheckNegotiation {
        #[arg(help = "Path to a negotiation body as it would be POSTed")]
        file: PathBuf,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Serve { port, memory } => commands::serve::handle(port, memory).await,
        Commands::Migrate => commands::migrate::handle(output_format).await,
        Commands::CheckNegotiation { file } => commands::check::handle(&file, output_format),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_serve_flags() {
        let cli = Cli::try_parse_from(["ncc-api", "serve", "--port", "8081", "--memory"]).unwrap();
        assert!(matches!(cli.command, Commands::Serve { port: Some(8081), memory: true }));
    }

    #[test]
    fn parses_check_negotiation() {
        let cli = Cli::try_parse_from(["ncc-api", "--json", "check-negotiation", "n.json"]).unwrap();
        assert!(matches!(OutputFormat::from_cli(&cli), OutputFormat::Json));
        assert!(matches!(cli.command, Commands::CheckNegotiation { .. }));
    }
}
