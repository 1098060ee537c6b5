use crate::config::CliConfig;
use crate::crypto::{parse_digest, parse_output, parse_secret};
use anyhow::{Context, Result};
use clap::Args;
use serde_json::{json, Value};
use sky_core::Transaction;

#[derive(Args)]
pub struct TxArgs {
    /// Input hash (hex); repeat for each input
    #[arg(long = "input", required = true)]
    pub inputs: Vec<String>,
    /// Output as ADDRESS:COINS:HOURS; repeat for each output
    #[arg(long = "output")]
    pub outputs: Vec<String>,
    /// Sign every input with this secret key (hex)
    #[arg(long)]
    pub seckey: Option<String>,
}

pub fn handle_tx_command(args: TxArgs, config: &CliConfig) -> Result<()> {
    let mut tx = Transaction::new();

    for input in &args.inputs {
        let input = parse_digest(input).with_context(|| format!("Invalid input '{}'", input))?;
        tx.add_input(&input)?;
    }
    for output in &args.outputs {
        let (address, coins, hours) = parse_output(output)?;
        tx.add_output_address(coins, hours, &address)
            .with_context(|| format!("Invalid output '{}'", output))?;
    }

    let secret = args.seckey.as_deref().map(parse_secret).transpose()?;
    let inner_hash = tx.inner_hash();

    let mut inputs = Vec::with_capacity(tx.inputs().len());
    for (index, input) in tx.inputs().iter().enumerate() {
        let mut entry = json!({
            "index": index,
            "hash": hex::encode(input),
            "msg_to_sign": hex::encode(tx.msg_to_sign(index)?),
        });
        if let Some(secret) = &secret {
            entry["signature"] = json!(tx.sign_input(index, secret)?.to_hex());
        }
        inputs.push(entry);
    }

    let report = json!({
        "inner_hash": hex::encode(inner_hash),
        "inputs": Value::Array(inputs),
        "outputs": tx.outputs().len(),
    });
    super::print_report(config.output, &report)
}
