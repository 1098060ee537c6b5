//! Configuration management for the Skycoin CLI

use serde::{Deserialize, Serialize};
use sky_core::{CryptoError, FirmwareKeys, PublicKey, BOOTLOADER_PUBKEYS};
use std::path::{Path, PathBuf};

/// How command results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
}

/// Main CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// Result format
    pub output: OutputFormat,
    /// Log filter used when RUST_LOG is unset
    pub log_level: String,
    /// Key derivation settings
    pub keypair: KeypairConfig,
    /// Firmware signing settings
    pub firmware: FirmwareConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeypairConfig {
    /// Chain keys derived when `--count` is not given
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirmwareConfig {
    /// Trusted signing keys (hex), slot index 1 first
    pub trusted_keys: Vec<String>,
}

impl CliConfig {
    /// `<config dir>/sky/cli.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sky").join("cli.toml"))
    }

    /// Load configuration: defaults, then `SKY_*` environment, then the file
    pub fn load(custom_path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let trusted_keys: Vec<String> = BOOTLOADER_PUBKEYS.iter().map(|k| k.to_string()).collect();

        let mut builder = config::Config::builder()
            // Default configuration
            .set_default("output", "text")?
            .set_default("log_level", "info")?
            .set_default("keypair.count", 1)?
            .set_default("firmware.trusted_keys", trusted_keys)?
            // Environment variables, e.g. SKY_OUTPUT=json or SKY_KEYPAIR__COUNT=5
            .add_source(config::Environment::with_prefix("SKY").separator("__"));

        // Configuration file
        if let Some(path) = custom_path.map(Path::to_path_buf).or_else(Self::default_path) {
            builder = builder.add_source(config::File::from(path).required(false));
        }

        builder.build()?.try_deserialize()
    }

    /// Parse the trusted firmware key table
    pub fn trusted_keys(&self) -> Result<FirmwareKeys, CryptoError> {
        let keys = self
            .firmware
            .trusted_keys
            .iter()
            .map(|hex| PublicKey::from_hex(hex))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(FirmwareKeys::new(keys))
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
