//! Per-item price and minimum-sale-amount overrides.
//!
//! Items without an entry fall back to [`LedgerDefaults`]. The ledger is
//! filled from a [`ConfigStore`] when the plugin is enabled, mutated by admin
//! commands, and written back when the plugin is disabled.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use crate::domain::model::{ItemId, SaleQuote};
use crate::domain::ports::ConfigStore;
use crate::utils::error::{Result, ShopError};
use crate::utils::validation::{parse_item_id, parse_min_amount, parse_price};

pub const DEFAULT_PRICE: f64 = 10.0;
pub const DEFAULT_MIN_AMOUNT: u32 = 1;

pub const PRICES_SECTION: &str = "prices";
pub const MIN_AMOUNTS_SECTION: &str = "min-amounts";
/// Older data files used a camel-cased section name.
pub const LEGACY_MIN_AMOUNTS_SECTION: &str = "minAmounts";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LedgerDefaults {
    pub price: f64,
    pub min_amount: u32,
}

impl Default for LedgerDefaults {
    fn default() -> Self {
        Self {
            price: DEFAULT_PRICE,
            min_amount: DEFAULT_MIN_AMOUNT,
        }
    }
}

/// Outcome of [`PricingLedger::load_from`]. Skipped entries are warnings only.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub prices_loaded: usize,
    pub min_amounts_loaded: usize,
    pub skipped: Vec<ShopError>,
}

impl LoadReport {
    pub fn has_warnings(&self) -> bool {
        !self.skipped.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct PricingLedger {
    prices: BTreeMap<ItemId, f64>,
    min_amounts: BTreeMap<ItemId, u32>,
    defaults: LedgerDefaults,
}

impl PricingLedger {
    pub fn new(defaults: LedgerDefaults) -> Self {
        Self {
            prices: BTreeMap::new(),
            min_amounts: BTreeMap::new(),
            defaults,
        }
    }

    pub fn defaults(&self) -> LedgerDefaults {
        self.defaults
    }

    pub fn price(&self, item: ItemId) -> f64 {
        self.prices.get(&item).copied().unwrap_or(self.defaults.price)
    }

    pub fn min_amount(&self, item: ItemId) -> u32 {
        self.min_amounts
            .get(&item)
            .copied()
            .unwrap_or(self.defaults.min_amount)
    }

    pub fn has_price_entry(&self, item: ItemId) -> bool {
        self.prices.contains_key(&item)
    }

    pub fn has_min_amount_entry(&self, item: ItemId) -> bool {
        self.min_amounts.contains_key(&item)
    }

    pub fn prices(&self) -> &BTreeMap<ItemId, f64> {
        &self.prices
    }

    pub fn min_amounts(&self) -> &BTreeMap<ItemId, u32> {
        &self.min_amounts
    }

    /// Every item with at least one override, ascending.
    pub fn known_items(&self) -> BTreeSet<ItemId> {
        self.prices
            .keys()
            .chain(self.min_amounts.keys())
            .copied()
            .collect()
    }

    /// Parses `raw` and overwrites the price of `item`. On error nothing changes.
    pub fn set_price(&mut self, item: ItemId, raw: &str) -> Result<f64> {
        let price = parse_price(raw)?;
        let previous = self.prices.insert(item, price);
        tracing::debug!(%item, price, ?previous, "Price updated");
        Ok(price)
    }

    /// Parses `raw` and overwrites the minimum sale amount of `item`.
    /// Zero and negative amounts are rejected.
    pub fn set_min_amount(&mut self, item: ItemId, raw: &str) -> Result<u32> {
        let min_amount = parse_min_amount(raw)?;
        let previous = self.min_amounts.insert(item, min_amount);
        tracing::debug!(%item, min_amount, ?previous, "Minimum amount updated");
        Ok(min_amount)
    }

    pub fn compute_sale_value(&self, item: ItemId, quantity: u32) -> Result<f64> {
        self.quote(item, quantity).map(|quote| quote.total)
    }

    pub fn quote(&self, item: ItemId, quantity: u32) -> Result<SaleQuote> {
        let required = self.min_amount(item);
        if quantity < required {
            return Err(ShopError::InsufficientQuantity {
                item,
                required,
                offered: quantity,
            });
        }

        let unit_price = self.price(item);
        let total = unit_price * f64::from(quantity);
        if !total.is_finite() {
            return Err(ShopError::invalid_value(
                "sale_value",
                &format!("{} x {}", unit_price, quantity),
                "total is out of range",
            ));
        }
        Ok(SaleQuote {
            item,
            quantity,
            unit_price,
            total,
        })
    }

    /// Replaces both mappings with the contents of `store`.
    pub fn load_from<S: ConfigStore + ?Sized>(&mut self, store: &S) -> LoadReport {
        let mut report = LoadReport::default();

        let mut prices = BTreeMap::new();
        if let Some(section) = store.section(PRICES_SECTION) {
            for (key, value) in section {
                match parse_entry(PRICES_SECTION, key, value, price_value) {
                    Ok((item, price)) => {
                        insert_entry(&mut prices, &mut report, PRICES_SECTION, key, item, price)
                    }
                    Err(e) => skip(&mut report, e),
                }
            }
        }

        let min_section = store
            .section(MIN_AMOUNTS_SECTION)
            .map(|section| (MIN_AMOUNTS_SECTION, section))
            .or_else(|| {
                store
                    .section(LEGACY_MIN_AMOUNTS_SECTION)
                    .map(|section| (LEGACY_MIN_AMOUNTS_SECTION, section))
            });

        let mut min_amounts = BTreeMap::new();
        if let Some((name, section)) = min_section {
            for (key, value) in section {
                match parse_entry(name, key, value, min_amount_value) {
                    Ok((item, min_amount)) => {
                        insert_entry(&mut min_amounts, &mut report, name, key, item, min_amount)
                    }
                    Err(e) => skip(&mut report, e),
                }
            }
        }

        report.prices_loaded = prices.len();
        report.min_amounts_loaded = min_amounts.len();
        self.prices = without_keys(prices);
        self.min_amounts = without_keys(min_amounts);

        tracing::debug!(
            prices = report.prices_loaded,
            min_amounts = report.min_amounts_loaded,
            skipped = report.skipped.len(),
            "Ledger loaded"
        );
        report
    }

    /// Writes both mappings into `store` and persists it. On failure the
    /// in-memory ledger is unchanged and can be saved again later.
    pub fn save_to<S: ConfigStore + ?Sized>(&self, store: &mut S) -> Result<()> {
        let prices: toml::Table = self
            .prices
            .iter()
            .map(|(item, price)| (item.to_string(), toml::Value::Float(*price)))
            .collect();
        let min_amounts: toml::Table = self
            .min_amounts
            .iter()
            .map(|(item, min)| (item.to_string(), toml::Value::Integer(i64::from(*min))))
            .collect();

        store.replace_section(PRICES_SECTION, prices);
        store.replace_section(MIN_AMOUNTS_SECTION, min_amounts);
        store.persist()
    }
}

fn parse_entry<T>(
    section: &str,
    key: &str,
    value: &toml::Value,
    convert: fn(&toml::Value) -> Result<T>,
) -> Result<(ItemId, T)> {
    let item = parse_item_id(key).map_err(|_| ShopError::UnknownKey {
        section: section.to_string(),
        key: key.to_string(),
    })?;
    Ok((item, convert(value)?))
}

fn price_value(value: &toml::Value) -> Result<f64> {
    match value {
        toml::Value::Float(f) => parse_price(&f.to_string()),
        toml::Value::Integer(i) => parse_price(&i.to_string()),
        toml::Value::String(s) => parse_price(s),
        other => Err(ShopError::invalid_value("price", &other.to_string(), "not a number")),
    }
}

fn min_amount_value(value: &toml::Value) -> Result<u32> {
    match value {
        toml::Value::Integer(i) => parse_min_amount(&i.to_string()),
        // `4.0` reads as 4; `4.5` is still rejected below.
        toml::Value::Float(f) if f.fract() == 0.0 && f.abs() <= f64::from(u32::MAX) => {
            parse_min_amount(&(*f as i64).to_string())
        }
        toml::Value::String(s) => parse_min_amount(s),
        other => Err(ShopError::invalid_value(
            "min_amount",
            &other.to_string(),
            "not an integer",
        )),
    }
}

/// Keeps one value per item. The canonical spelling of an id (`7`, not
/// `007`) wins; any other spelling of the same id is reported and dropped.
fn insert_entry<'a, T>(
    entries: &mut BTreeMap<ItemId, (&'a str, T)>,
    report: &mut LoadReport,
    section: &str,
    key: &'a str,
    item: ItemId,
    value: T,
) {
    match entries.entry(item) {
        Entry::Vacant(slot) => {
            slot.insert((key, value));
        }
        Entry::Occupied(mut slot) => {
            let (dropped, kept) = if key == item.to_string() {
                let (previous, _) = slot.insert((key, value));
                (previous, key)
            } else {
                (key, slot.get().0)
            };
            skip(
                report,
                ShopError::DuplicateKey {
                    section: section.to_string(),
                    key: dropped.to_string(),
                    kept: kept.to_string(),
                    item,
                },
            );
        }
    }
}

fn without_keys<T>(entries: BTreeMap<ItemId, (&str, T)>) -> BTreeMap<ItemId, T> {
    entries
        .into_iter()
        .map(|(item, (_, value))| (item, value))
        .collect()
}

fn skip(report: &mut LoadReport, error: ShopError) {
    tracing::warn!("⚠️ {}", error);
    report.skipped.push(error);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryStore;

    fn id(n: u32) -> ItemId {
        ItemId::new(n)
    }

    #[test]
    fn test_defaults_for_unknown_items() {
        let ledger = PricingLedger::default();
        for n in [0, 1, 64, 9999] {
            assert_eq!(ledger.price(id(n)), 10.0);
            assert_eq!(ledger.min_amount(id(n)), 1);
        }
    }

    #[test]
    fn test_custom_defaults() {
        let ledger = PricingLedger::new(LedgerDefaults {
            price: 2.5,
            min_amount: 8,
        });
        assert_eq!(ledger.price(id(3)), 2.5);
        assert_eq!(ledger.min_amount(id(3)), 8);
    }

    #[test]
    fn test_set_price_overwrites_without_existing_entry() {
        let mut ledger = PricingLedger::default();
        assert!(!ledger.has_price_entry(id(1)));

        assert_eq!(ledger.set_price(id(1), "12.5").unwrap(), 12.5);
        assert_eq!(ledger.price(id(1)), 12.5);

        ledger.set_price(id(1), "4").unwrap();
        assert_eq!(ledger.price(id(1)), 4.0);
    }

    #[test]
    fn test_invalid_price_keeps_previous_value() {
        let mut ledger = PricingLedger::default();
        ledger.set_price(id(1), "12.5").unwrap();

        let err = ledger.set_price(id(1), "abc").unwrap_err();
        assert!(matches!(err, ShopError::InvalidValue { .. }));
        assert_eq!(ledger.price(id(1)), 12.5);

        assert!(ledger.set_price(id(2), "abc").is_err());
        assert!(!ledger.has_price_entry(id(2)));
    }

    #[test]
    fn test_negative_min_amount_is_rejected() {
        let mut ledger = PricingLedger::default();
        ledger.set_min_amount(id(5), "4").unwrap();

        let err = ledger.set_min_amount(id(5), "-3").unwrap_err();
        assert!(matches!(err, ShopError::InvalidValue { .. }));
        assert!(ledger.set_min_amount(id(5), "0").is_err());
        assert_eq!(ledger.min_amount(id(5)), 4);
    }

    #[test]
    fn test_sale_below_minimum_fails() {
        let mut ledger = PricingLedger::default();
        ledger.set_min_amount(id(7), "16").unwrap();

        match ledger.compute_sale_value(id(7), 15) {
            Err(ShopError::InsufficientQuantity {
                item,
                required,
                offered,
            }) => {
                assert_eq!(item, id(7));
                assert_eq!(required, 16);
                assert_eq!(offered, 15);
            }
            other => panic!("expected InsufficientQuantity, got {:?}", other),
        }
        assert_eq!(ledger.compute_sale_value(id(7), 16).unwrap(), 160.0);
    }

    #[test]
    fn test_sale_value_is_price_times_quantity() {
        let mut ledger = PricingLedger::default();
        ledger.set_price(id(3), "2.0").unwrap();
        assert_eq!(ledger.compute_sale_value(id(3), 5).unwrap(), 10.0);

        let quote = ledger.quote(id(3), 5).unwrap();
        assert_eq!(quote.unit_price, 2.0);
        assert_eq!(quote.quantity, 5);
    }

    #[test]
    fn test_sale_value_out_of_range_is_rejected() {
        let mut ledger = PricingLedger::default();
        ledger.set_price(id(1), "1e308").unwrap();

        let err = ledger.compute_sale_value(id(1), 64).unwrap_err();
        assert!(matches!(err, ShopError::InvalidValue { ref field, .. } if field == "sale_value"));
        assert_eq!(ledger.compute_sale_value(id(1), 1).unwrap(), 1e308);
    }

    #[test]
    fn test_zero_quantity_with_default_minimum() {
        let ledger = PricingLedger::default();
        assert!(ledger.compute_sale_value(id(1), 0).is_err());
    }

    #[test]
    fn test_load_skips_malformed_keys() {
        let store = MemoryStore::from_toml(
            r#"
[prices]
1 = 12.5
"01" = 99.0
stone = 3.0
2 = 4
3 = "oops"
"007" = 2.0
7 = 1.0

[min-amounts]
1 = 8
-4 = 2
2 = 0
3 = 4.0
4 = 4.5
"#,
        )
        .unwrap();

        let mut ledger = PricingLedger::default();
        let report = ledger.load_from(&store);

        assert_eq!(report.prices_loaded, 3);
        assert_eq!(report.min_amounts_loaded, 2);
        assert_eq!(report.skipped.len(), 7);
        assert!(report.has_warnings());
        assert_eq!(ledger.price(id(1)), 12.5);
        assert_eq!(ledger.price(id(2)), 4.0);
        assert_eq!(ledger.price(id(3)), DEFAULT_PRICE);
        assert_eq!(ledger.price(id(7)), 1.0);
        assert_eq!(ledger.min_amount(id(1)), 8);
        assert_eq!(ledger.min_amount(id(2)), DEFAULT_MIN_AMOUNT);
        assert_eq!(ledger.min_amount(id(3)), 4);
        assert_eq!(ledger.min_amount(id(4)), DEFAULT_MIN_AMOUNT);

        let mut duplicates: Vec<&str> = report
            .skipped
            .iter()
            .filter_map(|e| match e {
                ShopError::DuplicateKey { key, kept, .. } => {
                    assert_eq!(kept.as_str(), key.trim_start_matches('0'));
                    Some(key.as_str())
                }
                _ => None,
            })
            .collect();
        duplicates.sort_unstable();
        assert_eq!(duplicates, vec!["007", "01"]);
    }

    #[test]
    fn test_load_missing_sections_is_empty() {
        let store = MemoryStore::from_toml("title = \"shop\"\n").unwrap();
        let mut ledger = PricingLedger::default();
        ledger.set_price(id(1), "99").unwrap();

        let report = ledger.load_from(&store);
        assert_eq!(report.prices_loaded, 0);
        assert!(!report.has_warnings());
        assert!(ledger.prices().is_empty());
        assert!(ledger.min_amounts().is_empty());
    }

    #[test]
    fn test_load_reads_legacy_min_amounts_section() {
        let store = MemoryStore::from_toml("[minAmounts]\n12 = 32\n").unwrap();
        let mut ledger = PricingLedger::default();
        ledger.load_from(&store);
        assert_eq!(ledger.min_amount(id(12)), 32);
    }

    #[test]
    fn test_save_then_load_reproduces_mappings() {
        let mut ledger = PricingLedger::default();
        ledger.set_price(id(1), "12.5").unwrap();
        ledger.set_price(id(264), "150").unwrap();
        ledger.set_min_amount(id(1), "16").unwrap();

        let mut store = MemoryStore::new();
        ledger.save_to(&mut store).unwrap();
        assert_eq!(store.persist_count(), 1);

        let mut reloaded = PricingLedger::default();
        let report = reloaded.load_from(&store);
        assert!(!report.has_warnings());
        assert_eq!(reloaded.prices(), ledger.prices());
        assert_eq!(reloaded.min_amounts(), ledger.min_amounts());
    }

    #[test]
    fn test_failed_save_keeps_ledger() {
        let mut ledger = PricingLedger::default();
        ledger.set_price(id(1), "3").unwrap();

        let mut store = MemoryStore::new();
        store.fail_persist(true);
        let err = ledger.save_to(&mut store).unwrap_err();
        assert!(matches!(err, ShopError::Persistence { .. }));
        assert_eq!(ledger.price(id(1)), 3.0);
    }

    #[test]
    fn test_known_items_is_union() {
        let mut ledger = PricingLedger::default();
        ledger.set_price(id(9), "1").unwrap();
        ledger.set_min_amount(id(2), "3").unwrap();
        ledger.set_min_amount(id(9), "3").unwrap();
        let items: Vec<_> = ledger.known_items().into_iter().collect();
        assert_eq!(items, vec![id(2), id(9)]);
    }
}
