use crate::config::CliConfig;
use anyhow::Result;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,
    /// Print the default configuration file location
    Path,
}

pub fn handle_config_command(cmd: ConfigCommands, config: &CliConfig) -> Result<()> {
    match cmd {
        ConfigCommands::Show => print!("{}", config.to_toml()?),
        ConfigCommands::Path => match CliConfig::default_path() {
            Some(path) => println!("{}", path.display()),
            None => anyhow::bail!("Could not determine the user config directory"),
        },
    }
    Ok(())
}
