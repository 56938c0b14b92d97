//! mtnav CLI - Main Entry Point
//!
//! Lists destinations, navigates the application under test and dispatches
//! external methods to whichever implementation provides them.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use mtnav_cli::commands::{call, config, destinations, navigate, GlobalOptions};
use mtnav_cli::output::{self, OutputFormat};
use mtnav_common::Scheme;

/// mtnav - navigate a web application through its UI or REST API
#[derive(Parser)]
#[command(name = "mtnav")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file (defaults to ~/.mtnav/config.toml)
    #[arg(short, long, env = "MTNAV_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Application hostname
    #[arg(long, global = true)]
    hostname: Option<String>,

    /// Application scheme (http or https)
    #[arg(long, global = true)]
    scheme: Option<Scheme>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered destinations
    Destinations(destinations::DestinationsArgs),

    /// Navigate to a destination
    Navigate(navigate::NavigateArgs),

    /// Call an external method
    Call(call::CallArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(config::ConfigCommands),

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .init();

    if let Err(e) = run(cli) {
        output::print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let options = GlobalOptions {
        config: cli.config,
        hostname: cli.hostname,
        scheme: cli.scheme,
    };

    match cli.command {
        Commands::Destinations(args) => destinations::execute(args, cli.format)?,
        Commands::Navigate(args) => navigate::execute(args, &options, cli.format)?,
        Commands::Call(args) => call::execute(args, &options, cli.format)?,
        Commands::Config(cmd) => config::execute(cmd, &options, cli.format)?,
        Commands::Version => {
            println!("mtnav v{}", mtnav_common::VERSION);
        }
    }

    Ok(())
}
