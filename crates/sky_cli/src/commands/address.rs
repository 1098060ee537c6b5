use crate::config::CliConfig;
use crate::crypto::parse_pubkey;
use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;
use sky_core::{address_hash, Address};

#[derive(Args)]
pub struct AddressArgs {
    /// Compressed public key (hex) to build the address of
    #[arg(long, required_unless_present = "check", conflicts_with = "check")]
    pub pubkey: Option<String>,
    /// Existing address to validate
    #[arg(long)]
    pub check: Option<String>,
}

pub fn handle_address_command(args: AddressArgs, config: &CliConfig) -> Result<()> {
    let report = match (args.pubkey, args.check) {
        (Some(pubkey), _) => {
            let pubkey = parse_pubkey(&pubkey)?;
            let address = Address::from_pubkey(&pubkey);
            json!({
                "address": address.to_string(),
                "key": hex::encode(address_hash(&pubkey)),
            })
        }
        (None, Some(text)) => {
            let address: Address = text
                .parse()
                .with_context(|| format!("'{}' is not a valid address", text))?;
            json!({
                "address": text,
                "valid": true,
                "version": address.version,
                "key": hex::encode(address.key),
            })
        }
        (None, None) => anyhow::bail!("Either --pubkey or --check is required"),
    };
    super::print_report(config.output, &report)
}
