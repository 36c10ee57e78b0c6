//! Read-only views of the ledger for shop listings.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::ShopSettings;
use crate::core::{CatalogEntry, ItemCatalog, ItemId, PricingLedger};
use crate::utils::error::{Result, ShopError};
use crate::utils::validation::parse_item_id;

/// Item names from the `[catalog]` settings table.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    names: BTreeMap<ItemId, String>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(mut self, item: ItemId, name: impl Into<String>) -> Self {
        self.names.insert(item, name.into());
        self
    }

    pub fn from_settings(settings: &ShopSettings) -> Self {
        let mut catalog = Self::new();
        let Some(entries) = &settings.catalog else {
            return catalog;
        };

        for (key, name) in entries {
            match parse_item_id(key) {
                Ok(item) => {
                    catalog.names.insert(item, name.clone());
                }
                Err(_) => tracing::warn!("⚠️ Invalid item ID in catalog settings: {}", key),
            }
        }
        catalog
    }
}

impl ItemCatalog for StaticCatalog {
    fn items(&self) -> Vec<ItemId> {
        self.names.keys().copied().collect()
    }

    fn display_name(&self, item: ItemId) -> String {
        self.names
            .get(&item)
            .cloned()
            .unwrap_or_else(|| fallback_name(item))
    }
}

pub fn fallback_name(item: ItemId) -> String {
    format!("ITEM_{}", item)
}

pub fn format_money(amount: f64, symbol: &str) -> String {
    format!("{:.2}{}", amount, symbol)
}

#[derive(Debug, Clone, Default)]
pub struct CatalogView {
    entries: Vec<CatalogEntry>,
}

impl CatalogView {
    /// Every catalog item plus every item with a ledger entry, by id.
    pub fn build(ledger: &PricingLedger, catalog: &dyn ItemCatalog) -> Self {
        let items: BTreeSet<ItemId> = catalog
            .items()
            .into_iter()
            .chain(ledger.known_items())
            .collect();

        let entries = items
            .into_iter()
            .map(|item| CatalogEntry {
                item,
                name: catalog.display_name(item),
                price: ledger.price(item),
                min_amount: ledger.min_amount(item),
                price_overridden: ledger.has_price_entry(item),
                min_amount_overridden: ledger.has_min_amount_entry(item),
            })
            .collect();

        Self { entries }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn page_count(&self, page_size: usize) -> usize {
        self.entries.len().div_ceil(page_size.max(1)).max(1)
    }

    /// 1-based page; `None` past the last page.
    pub fn page(&self, page: usize, page_size: usize) -> Option<&[CatalogEntry]> {
        let page_size = page_size.max(1);
        if page == 0 || page > self.page_count(page_size) {
            return None;
        }
        let start = (page - 1) * page_size;
        let end = (start + page_size).min(self.entries.len());
        Some(&self.entries[start..end])
    }

    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for entry in &self.entries {
            writer.serialize(entry)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| ShopError::Io(e.into_error()))?;
        String::from_utf8(bytes)
            .map_err(|e| ShopError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }
}

/// Item tooltip lines, as shown in the shop inventory.
pub fn lore(entry: &CatalogEntry, currency_symbol: &str) -> Vec<String> {
    vec![
        format!("Price: {}", format_money(entry.price, currency_symbol)),
        format!("Min. Amount: {}", entry.min_amount),
        format!("ID: {}", entry.item),
    ]
}

pub fn summary_line(entry: &CatalogEntry, currency_symbol: &str) -> String {
    format!(
        "{} (ID: {}) - Price: {}, Min. Amount: {}",
        entry.name,
        entry.item,
        format_money(entry.price, currency_symbol),
        entry.min_amount
    )
}
