use crate::config::CliConfig;
use crate::crypto::{parse_digest, parse_secret};
use anyhow::{Context, Result};
use clap::Subcommand;
use serde_json::{json, Value};
use sky_core::{firmware_hash_matches, FirmwareImage, SlotStatus, FIRMWARE_MAGIC};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Subcommand)]
pub enum FirmwareCommands {
    /// Print the hash the slot signatures cover
    Fingerprint {
        /// Firmware image, with or without a SKY1 header
        file: PathBuf,
    },
    /// Check each signature slot against the trusted keys
    Check {
        file: PathBuf,
    },
    /// Write a copy with a fresh header and empty slots
    Prepare {
        input: PathBuf,
        output: PathBuf,
    },
    /// Sign the image in place
    Sign {
        file: PathBuf,
        /// Slot number, 1 to 3
        #[arg(long)]
        slot: usize,
        /// Secret key of a trusted signer (hex)
        #[arg(long)]
        seckey: String,
    },
    /// Empty one signature slot in place
    Clear {
        file: PathBuf,
        /// Slot number, 1 to 3
        #[arg(long)]
        slot: usize,
    },
    /// Compare the image fingerprint against an expected hash
    Verify {
        file: PathBuf,
        /// Expected fingerprint (hex)
        #[arg(long)]
        expected: String,
    },
}

pub fn handle_firmware_command(cmd: FirmwareCommands, config: &CliConfig) -> Result<()> {
    match cmd {
        FirmwareCommands::Fingerprint { file } => {
            let image = load_image(&file)?;
            super::print_report(
                config.output,
                &json!({
                    "code_length": image.code_length(),
                    "fingerprint": hex::encode(image.fingerprint()),
                }),
            )
        }
        FirmwareCommands::Check { file } => {
            let image = load_image(&file)?;
            let keys = config.trusted_keys().context("Invalid trusted key in configuration")?;
            let statuses = image.check_signatures(&keys);
            let fully_signed = image.is_fully_signed(&keys);

            super::print_report(
                config.output,
                &json!({
                    "fingerprint": hex::encode(image.fingerprint()),
                    "slots": Value::Array(statuses.iter().map(slot_report).collect()),
                    "fully_signed": fully_signed,
                }),
            )?;
            if statuses.iter().any(|status| matches!(status, SlotStatus::Invalid { .. })) {
                anyhow::bail!("Firmware carries an invalid signature");
            }
            Ok(())
        }
        FirmwareCommands::Prepare { input, output } => {
            let mut image = load_image(&input)?;
            image.reset_metadata();
            fs::write(&output, image.as_bytes())
                .with_context(|| format!("Failed to write {}", output.display()))?;
            tracing::info!("Prepared firmware written to {}", output.display());
            super::print_report(
                config.output,
                &json!({ "fingerprint": hex::encode(image.fingerprint()) }),
            )
        }
        FirmwareCommands::Sign { file, slot, seckey } => {
            let slot_index = slot_index(slot)?;
            let secret = parse_secret(&seckey)?;
            let keys = config.trusted_keys().context("Invalid trusted key in configuration")?;

            let mut image = load_image(&file)?;
            let index = image.sign_slot(slot_index, &secret, &keys)?;
            fs::write(&file, image.as_bytes())
                .with_context(|| format!("Failed to write {}", file.display()))?;
            super::print_report(config.output, &json!({ "slot": slot, "key_index": index }))
        }
        FirmwareCommands::Clear { file, slot } => {
            let mut image = load_image(&file)?;
            image.clear_slot(slot_index(slot)?)?;
            fs::write(&file, image.as_bytes())
                .with_context(|| format!("Failed to write {}", file.display()))?;
            tracing::info!("Cleared slot {} of {}", slot, file.display());
            super::print_report(config.output, &json!({ "slot": slot, "cleared": true }))
        }
        FirmwareCommands::Verify { file, expected } => {
            let image = load_image(&file)?;
            let expected = parse_digest(&expected)?;
            if !firmware_hash_matches(&image.fingerprint(), &expected) {
                anyhow::bail!("Firmware fingerprint does not match");
            }
            super::print_report(config.output, &json!({ "valid": true }))
        }
    }
}

/// Map a 1-based slot number to the library's slot index
fn slot_index(slot: usize) -> Result<usize> {
    slot.checked_sub(1)
        .ok_or_else(|| anyhow::anyhow!("Slots are numbered from 1"))
}

/// Read an image; raw code without a header gets a fresh one
fn load_image(path: &Path) -> Result<FirmwareImage> {
    let data = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let image = if data.starts_with(FIRMWARE_MAGIC) {
        FirmwareImage::parse(data)?
    } else {
        tracing::debug!("{} has no header, wrapping raw code", path.display());
        FirmwareImage::wrap(&data)?
    };
    Ok(image)
}

fn slot_report(status: &SlotStatus) -> Value {
    match status {
        SlotStatus::Empty => json!("empty"),
        SlotStatus::Valid { index } => json!({ "status": "valid", "key_index": index }),
        SlotStatus::Duplicate { index } => json!({ "status": "duplicate", "key_index": index }),
        SlotStatus::Invalid { index } => json!({ "status": "invalid", "key_index": index }),
    }
}
