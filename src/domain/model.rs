use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::error::ShopError;

/// Numeric id of an item kind, as used for keys in the data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(u32);

impl ItemId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ItemId {
    type Err = ShopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::utils::validation::parse_item_id(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub item: ItemId,
    pub amount: u32,
}

impl ItemStack {
    pub fn new(item: ItemId, amount: u32) -> Self {
        Self { item, amount }
    }
}

/// A sale that passed the minimum-amount check but has not been paid out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SaleQuote {
    pub item: ItemId,
    pub quantity: u32,
    pub unit_price: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SaleReceipt {
    pub player: String,
    pub item: ItemId,
    pub quantity: u32,
    pub unit_price: f64,
    pub total: f64,
    pub sold_at: DateTime<Utc>,
}

impl SaleReceipt {
    pub fn from_quote(player: &str, quote: SaleQuote) -> Self {
        Self {
            player: player.to_string(),
            item: quote.item,
            quantity: quote.quantity,
            unit_price: quote.unit_price,
            total: quote.total,
            sold_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntry {
    pub item: ItemId,
    pub name: String,
    pub price: f64,
    pub min_amount: u32,
    pub price_overridden: bool,
    pub min_amount_overridden: bool,
}
