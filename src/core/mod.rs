pub mod ledger;
pub mod shared;

pub use crate::domain::model::{CatalogEntry, ItemId, ItemStack, SaleQuote, SaleReceipt};
pub use crate::domain::ports::{CommandSender, ConfigStore, Economy, ItemCatalog, Player};
pub use crate::utils::error::Result;
pub use ledger::{LedgerDefaults, LoadReport, PricingLedger, DEFAULT_MIN_AMOUNT, DEFAULT_PRICE};
pub use shared::SharedLedger;
