use crate::config::CliConfig;
use crate::crypto::SeedArgs;
use anyhow::Result;
use clap::Args;
use serde_json::{json, Value};
use sky_core::{address_from_pubkey, derive_keypair, generate_keypairs, KeyPair};

#[derive(Args)]
pub struct KeypairArgs {
    #[command(flatten)]
    pub seed: SeedArgs,
    /// Number of chain keys to derive; 0 hashes the seed straight into one key
    #[arg(long)]
    pub count: Option<usize>,
    /// Include secret keys in the output
    #[arg(long)]
    pub show_secret: bool,
}

pub fn handle_keypair_command(args: KeypairArgs, config: &CliConfig) -> Result<()> {
    let seed = args.seed.bytes()?;
    let count = args.count.unwrap_or(config.keypair.count);

    let keypairs = if count == 0 {
        vec![derive_keypair(&seed)?]
    } else {
        generate_keypairs(&seed, count)?
    };
    tracing::debug!("Derived {} key pair(s)", keypairs.len());

    if args.show_secret {
        tracing::warn!("Printing secret keys");
    }

    let report: Vec<Value> = keypairs
        .iter()
        .enumerate()
        .map(|(index, keypair)| keypair_report(index, keypair, args.show_secret))
        .collect();
    super::print_report(config.output, &Value::Array(report))
}

fn keypair_report(index: usize, keypair: &KeyPair, show_secret: bool) -> Value {
    let mut report = json!({
        "index": index,
        "public_key": keypair.public.to_hex(),
        "address": address_from_pubkey(&keypair.public),
    });
    if show_secret {
        report["secret_key"] = json!(keypair.secret.to_hex());
    }
    report
}
