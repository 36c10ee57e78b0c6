// Application layer: the /mcshop command surface on top of the ledger.

pub mod catalog;
pub mod commands;
pub mod plugin;
pub mod sale;

pub use catalog::{CatalogView, StaticCatalog};
pub use commands::{CommandHandler, ShopCommand, COMMAND_NAME};
pub use plugin::ShopPlugin;
