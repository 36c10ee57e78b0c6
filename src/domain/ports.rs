use crate::domain::model::{ItemId, ItemStack};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Sectioned key-value document the ledger is loaded from and flushed to.
pub trait ConfigStore {
    fn section(&self, name: &str) -> Option<&toml::Table>;
    fn replace_section(&mut self, name: &str, section: toml::Table);
    fn persist(&mut self) -> Result<()>;
}

#[async_trait]
pub trait CommandSender: Send + Sync {
    fn name(&self) -> &str;
    fn has_permission(&self, node: &str) -> bool;
    async fn send_message(&self, message: &str);

    /// `None` for the server console and other non-player senders.
    fn as_player(&self) -> Option<&dyn Player> {
        None
    }
}

pub trait Player: Send + Sync {
    fn main_hand(&self) -> Option<ItemStack>;
    fn set_main_hand(&self, stack: Option<ItemStack>);
}

#[async_trait]
pub trait Economy: Send + Sync {
    /// Credits `amount` to the player and returns the new balance.
    async fn deposit(&self, player: &str, amount: f64) -> Result<f64>;
}

pub trait ItemCatalog: Send + Sync {
    fn items(&self) -> Vec<ItemId>;
    fn display_name(&self, item: ItemId) -> String;
}
