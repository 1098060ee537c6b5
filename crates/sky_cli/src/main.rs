mod commands;
mod config;
mod crypto;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sky-cli")]
#[command(about = "Skycoin wallet cryptography CLI")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to <config dir>/sky/cli.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive key pairs from a seed
    Keypair(commands::keypair::KeypairArgs),
    /// Build or validate an address
    Address(commands::address::AddressArgs),
    /// Sign a digest
    Sign(commands::signature::SignArgs),
    /// Verify a signature against a public key
    Verify(commands::signature::VerifyArgs),
    /// Recover the signer of a digest
    Recover(commands::signature::RecoverArgs),
    /// Derive a shared secret
    Ecdh(commands::ecdh::EcdhArgs),
    /// Hash a transaction and compute per-input signing digests
    Tx(commands::transaction::TxArgs),
    /// Firmware image fingerprint and signatures
    Firmware {
        #[command(subcommand)]
        cmd: commands::firmware::FirmwareCommands,
    },
    /// Configuration
    Config {
        #[command(subcommand)]
        cmd: commands::config::ConfigCommands,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = config::CliConfig::load(cli.config.as_deref())?;
    if cli.json {
        config.output = config::OutputFormat::Json;
    }

    // Logs go to stderr so command output stays parseable
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| format!("sky_cli={0},sky_core={0}", config.log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    tracing::debug!("Configuration loaded: output {:?}", config.output);

    match cli.command {
        Commands::Keypair(args) => commands::keypair::handle_keypair_command(args, &config),
        Commands::Address(args) => commands::address::handle_address_command(args, &config),
        Commands::Sign(args) => commands::signature::handle_sign_command(args, &config),
        Commands::Verify(args) => commands::signature::handle_verify_command(args, &config),
        Commands::Recover(args) => commands::signature::handle_recover_command(args, &config),
        Commands::Ecdh(args) => commands::ecdh::handle_ecdh_command(args, &config),
        Commands::Tx(args) => commands::transaction::handle_tx_command(args, &config),
        Commands::Firmware { cmd } => commands::firmware::handle_firmware_command(cmd, &config),
        Commands::Config { cmd } => commands::config::handle_config_command(cmd, &config),
    }
}
