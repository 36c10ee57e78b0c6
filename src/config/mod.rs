pub mod settings;
pub mod store;

#[cfg(feature = "cli")]
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

pub use settings::ShopSettings;
pub use store::TomlFileStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Csv,
    Json,
}

/// Console front-end: runs one `/mcshop` command against the data file.
#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "mcshop")]
#[command(about = "View, price and sell items from the mcshop data file")]
pub struct CliConfig {
    #[arg(long, default_value = "mcshop.toml", help = "Plugin settings file")]
    pub settings: String,

    #[arg(long, help = "Override storage.data_file from the settings")]
    pub store: Option<String>,

    #[arg(long, help = "Run the command as this player instead of the console")]
    pub player: Option<String>,

    #[arg(long = "permission", help = "Permission node granted to --player")]
    pub permissions: Vec<String>,

    #[arg(long, value_name = "ID:AMOUNT", help = "Item stack in the player's main hand")]
    pub hand: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log as JSON lines")]
    pub log_json: bool,

    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}
