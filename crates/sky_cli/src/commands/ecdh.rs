use crate::config::CliConfig;
use crate::crypto::{parse_pubkey, parse_secret};
use anyhow::Result;
use clap::Args;
use serde_json::json;
use sky_core::{ecdh, ecdh_point, ecdh_shared_secret};

#[derive(Args)]
pub struct EcdhArgs {
    /// Own secret key (hex)
    #[arg(long)]
    pub seckey: String,
    /// Peer public key (hex)
    #[arg(long)]
    pub pubkey: String,
}

pub fn handle_ecdh_command(args: EcdhArgs, config: &CliConfig) -> Result<()> {
    let secret = parse_secret(&args.seckey)?;
    let remote = parse_pubkey(&args.pubkey)?;

    super::print_report(
        config.output,
        &json!({
            "ecdh": hex::encode(&ecdh(&secret, &remote)?[..]),
            "shared_x": hex::encode(&ecdh_shared_secret(&secret, &remote)?[..]),
            "shared_point": hex::encode(&ecdh_point(&secret, &remote)?[..]),
        }),
    )
}
