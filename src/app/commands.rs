//! `/mcshop` argument parsing and dispatch.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::app::catalog::{format_money, summary_line, CatalogView};
use crate::app::sale;
use crate::config::ShopSettings;
use crate::core::{CommandSender, Economy, ItemCatalog, ItemId, SharedLedger};
use crate::utils::error::{ErrorSeverity, Result, ShopError};
use crate::utils::validation::parse_item_id;

pub const COMMAND_NAME: &str = "mcshop";

const LIST: &str = "list";
const PRICE: &str = "price";
const SELL_HAND: &str = "sellhand";
const SET_MIN_AMOUNT: &str = "setminamount";
const SET_PRICE: &str = "setprice";

pub const SUBCOMMANDS: [&str; 5] = [LIST, PRICE, SELL_HAND, SET_MIN_AMOUNT, SET_PRICE];

pub const USAGE: &str = "/mcshop [list [page] | price <item-id> | setprice <item-id> <price> | \
                         setminamount <item-id> <amount> | sellhand]";

/// Id and value arguments stay raw so they are validated in dispatch order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShopCommand {
    List { page: usize },
    Price { item: String },
    SetPrice { item: String, price: String },
    SetMinAmount { item: String, amount: String },
    SellHand,
}

impl ShopCommand {
    /// True when `args` select the listing, in any letter case.
    pub fn is_listing(args: &[&str]) -> bool {
        args.first().map_or(true, |sub| sub.eq_ignore_ascii_case(LIST))
    }

    pub fn parse(args: &[&str]) -> Result<Self> {
        let Some((first, rest)) = args.split_first() else {
            return Ok(ShopCommand::List { page: 1 });
        };

        let sub = first.to_ascii_lowercase();
        match (sub.as_str(), rest) {
            (LIST, []) => Ok(ShopCommand::List { page: 1 }),
            (LIST, [page]) => {
                let page = page
                    .trim()
                    .parse::<usize>()
                    .ok()
                    .filter(|p| *p > 0)
                    .ok_or_else(|| ShopError::invalid_value("page", page, "not a page number"))?;
                Ok(ShopCommand::List { page })
            }
            (PRICE, [item]) => Ok(ShopCommand::Price {
                item: item.to_string(),
            }),
            (SET_PRICE, [item, price]) => Ok(ShopCommand::SetPrice {
                item: item.to_string(),
                price: price.to_string(),
            }),
            (SET_MIN_AMOUNT, [item, amount]) => Ok(ShopCommand::SetMinAmount {
                item: item.to_string(),
                amount: amount.to_string(),
            }),
            (SELL_HAND, []) => Ok(ShopCommand::SellHand),
            _ => Err(ShopError::Usage {
                usage: USAGE.to_string(),
            }),
        }
    }
}

#[derive(Clone)]
pub struct CommandHandler {
    ledger: SharedLedger,
    settings: Arc<ShopSettings>,
    catalog: Arc<dyn ItemCatalog>,
    economy: Option<Arc<dyn Economy>>,
}

impl CommandHandler {
    pub fn new(
        ledger: SharedLedger,
        settings: Arc<ShopSettings>,
        catalog: Arc<dyn ItemCatalog>,
        economy: Option<Arc<dyn Economy>>,
    ) -> Self {
        Self {
            ledger,
            settings,
            catalog,
            economy,
        }
    }

    pub fn ledger(&self) -> &SharedLedger {
        &self.ledger
    }

    pub fn catalog_view(&self) -> CatalogView {
        self.ledger
            .read(|ledger| CatalogView::build(ledger, self.catalog.as_ref()))
    }

    /// Returns `false` when the arguments match no subcommand, so the host
    /// can print its usage line. Every other outcome is reported to the sender.
    pub async fn on_command(&self, sender: &dyn CommandSender, label: &str, args: &[&str]) -> bool {
        if !label.eq_ignore_ascii_case(COMMAND_NAME) {
            return false;
        }

        let result = match ShopCommand::parse(args) {
            Ok(command) => self.execute(sender, command).await,
            Err(ShopError::Usage { .. }) => return false,
            Err(e) => Err(e),
        };

        match result {
            Ok(lines) => {
                for line in lines {
                    sender.send_message(&line).await;
                }
            }
            Err(e) => {
                if e.severity() >= ErrorSeverity::High {
                    tracing::error!(sender = sender.name(), "❌ {}", e);
                } else {
                    tracing::debug!(sender = sender.name(), "Command rejected: {}", e);
                }
                sender.send_message(&e.user_friendly_message()).await;
            }
        }
        true
    }

    pub async fn execute(
        &self,
        sender: &dyn CommandSender,
        command: ShopCommand,
    ) -> Result<Vec<String>> {
        let symbol = self.settings.shop.currency_symbol.as_str();

        match command {
            ShopCommand::List { page } => self.list(page),
            ShopCommand::Price { item } => {
                let item = parse_item_id(&item)?;
                let (price, min_amount) = self
                    .ledger
                    .read(|ledger| (ledger.price(item), ledger.min_amount(item)));
                Ok(vec![format!(
                    "{} (ID: {}) - Price: {}, Min. Amount: {}",
                    self.catalog.display_name(item),
                    item,
                    format_money(price, symbol),
                    min_amount
                )])
            }
            ShopCommand::SetPrice { item, price } => {
                let item = parse_item_id(&item)?;
                self.require_permission(sender, &self.settings.permissions.set_price)?;

                let require_listed = self.settings.shop.require_listed_item;
                let price = self.ledger.update(|ledger| {
                    if require_listed && !ledger.has_price_entry(item) {
                        return Err(ShopError::ItemNotListed { item });
                    }
                    ledger.set_price(item, &price)
                })?;

                tracing::info!(sender = sender.name(), %item, price, "Price set");
                Ok(vec![format!(
                    "Price for item {} set to {}.",
                    item,
                    format_money(price, symbol)
                )])
            }
            ShopCommand::SetMinAmount { item, amount } => {
                let item = parse_item_id(&item)?;
                self.require_permission(sender, &self.settings.permissions.set_min_amount)?;

                let require_listed = self.settings.shop.require_listed_item;
                let min_amount = self.ledger.update(|ledger| {
                    if require_listed && !ledger.has_min_amount_entry(item) {
                        return Err(ShopError::ItemNotListed { item });
                    }
                    ledger.set_min_amount(item, &amount)
                })?;

                tracing::info!(sender = sender.name(), %item, min_amount, "Minimum amount set");
                Ok(vec![format!(
                    "Minimum amount for item {} set to {}.",
                    item, min_amount
                )])
            }
            ShopCommand::SellHand => {
                let player = sender.as_player().ok_or(ShopError::NotAPlayer)?;
                let receipt = sale::sell_hand(
                    sender.name(),
                    player,
                    &self.ledger,
                    self.economy.as_deref(),
                )
                .await?;

                Ok(vec![format!(
                    "Sold {} of {} for {}.",
                    receipt.quantity,
                    self.catalog.display_name(receipt.item),
                    format_money(receipt.total, symbol)
                )])
            }
        }
    }

    fn list(&self, page: usize) -> Result<Vec<String>> {
        let view = self.catalog_view();
        let page_size = self.settings.shop.page_size;
        let page_count = view.page_count(page_size);
        let entries = view.page(page, page_size).ok_or_else(|| {
            ShopError::invalid_value(
                "page",
                &page.to_string(),
                format!("only {} page(s)", page_count),
            )
        })?;

        let symbol = self.settings.shop.currency_symbol.as_str();
        let mut lines = Vec::with_capacity(entries.len() + 1);
        lines.push(format!("MCShop - page {}/{}", page, page_count));
        if entries.is_empty() {
            lines.push("No items are listed.".to_string());
        }
        lines.extend(entries.iter().map(|entry| summary_line(entry, symbol)));
        Ok(lines)
    }

    fn require_permission(&self, sender: &dyn CommandSender, node: &str) -> Result<()> {
        if sender.has_permission(node) {
            Ok(())
        } else {
            Err(ShopError::PermissionDenied {
                node: node.to_string(),
            })
        }
    }

    pub fn tab_complete(&self, args: &[&str]) -> Vec<String> {
        match args {
            [] => SUBCOMMANDS.iter().map(|s| s.to_string()).collect(),
            [prefix] => {
                let prefix = prefix.to_ascii_lowercase();
                SUBCOMMANDS
                    .iter()
                    .filter(|s| s.starts_with(&prefix))
                    .map(|s| s.to_string())
                    .collect()
            }
            [sub, prefix] => {
                let sub = sub.to_ascii_lowercase();
                if ![PRICE, SET_PRICE, SET_MIN_AMOUNT].contains(&sub.as_str()) {
                    return Vec::new();
                }
                let mut items: BTreeSet<ItemId> = self.catalog.items().into_iter().collect();
                items.extend(self.ledger.read(|ledger| ledger.known_items()));
                items
                    .into_iter()
                    .map(|item| item.to_string())
                    .filter(|id| id.starts_with(prefix))
                    .collect()
            }
            _ => Vec::new(),
        }
    }
}
