use crate::config::CliConfig;
use crate::crypto::{parse_pubkey, parse_secret, parse_signature, DigestArgs};
use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;
use sky_core::{recover, sign, verify_signature};

#[derive(Args)]
pub struct SignArgs {
    /// Secret key (hex)
    #[arg(long)]
    pub seckey: String,
    #[command(flatten)]
    pub digest: DigestArgs,
}

#[derive(Args)]
pub struct VerifyArgs {
    /// Expected signer public key (hex)
    #[arg(long)]
    pub pubkey: String,
    #[command(flatten)]
    pub digest: DigestArgs,
    /// 65-byte signature (hex)
    #[arg(long)]
    pub signature: String,
}

#[derive(Args)]
pub struct RecoverArgs {
    #[command(flatten)]
    pub digest: DigestArgs,
    /// 65-byte signature (hex)
    #[arg(long)]
    pub signature: String,
}

pub fn handle_sign_command(args: SignArgs, config: &CliConfig) -> Result<()> {
    let secret = parse_secret(&args.seckey)?;
    let digest = args.digest.digest()?;

    let signature = sign(&secret, &digest).context("Signing failed")?;
    super::print_report(
        config.output,
        &json!({
            "digest": hex::encode(digest),
            "signature": signature.to_hex(),
        }),
    )
}

pub fn handle_verify_command(args: VerifyArgs, config: &CliConfig) -> Result<()> {
    let pubkey = parse_pubkey(&args.pubkey)?;
    let digest = args.digest.digest()?;
    let signature = parse_signature(&args.signature)?;

    verify_signature(&pubkey, &digest, &signature)
        .context("Signature does not match the public key")?;
    super::print_report(config.output, &json!({ "valid": true }))
}

pub fn handle_recover_command(args: RecoverArgs, config: &CliConfig) -> Result<()> {
    let digest = args.digest.digest()?;
    let signature = parse_signature(&args.signature)?;

    let pubkey = recover(&digest, &signature).context("No public key recovers from this signature")?;
    super::print_report(config.output, &json!({ "public_key": pubkey.to_hex() }))
}
