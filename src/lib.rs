pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use crate::app::{CatalogView, CommandHandler, ShopCommand, ShopPlugin, StaticCatalog};
pub use crate::config::{ShopSettings, TomlFileStore};
pub use crate::core::{ItemId, ItemStack, LedgerDefaults, PricingLedger, SharedLedger};
pub use utils::error::{Result, ShopError};
