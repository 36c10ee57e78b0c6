use std::sync::{Arc, Mutex, PoisonError};

use crate::app::catalog::CatalogView;
use crate::app::commands::CommandHandler;
use crate::config::{OutputFormat, ShopSettings};
use crate::core::{CommandSender, ConfigStore, Economy, ItemCatalog, PricingLedger, SharedLedger};
use crate::utils::error::Result;
use crate::utils::validation::Validate;

/// Plugin instance between host enable and disable.
pub struct ShopPlugin<S: ConfigStore> {
    store: Mutex<S>,
    handler: CommandHandler,
}

impl<S: ConfigStore> ShopPlugin<S> {
    /// Validates the settings and loads the ledger from `store`.
    /// Unreadable entries are skipped with a warning.
    pub fn enable(
        settings: ShopSettings,
        store: S,
        catalog: Arc<dyn ItemCatalog>,
        economy: Option<Arc<dyn Economy>>,
    ) -> Result<Self> {
        settings.validate()?;

        let mut ledger = PricingLedger::new(settings.ledger_defaults());
        let report = ledger.load_from(&store);
        if report.has_warnings() {
            tracing::warn!(
                "⚠️ Skipped {} invalid entr(ies) in the data file",
                report.skipped.len()
            );
        }
        if economy.is_none() {
            tracing::warn!("⚠️ No economy service registered, sellhand is disabled");
        }
        tracing::info!(
            "✅ mcshop enabled: {} price(s), {} minimum amount(s)",
            report.prices_loaded,
            report.min_amounts_loaded
        );

        let handler = CommandHandler::new(
            SharedLedger::new(ledger),
            Arc::new(settings),
            catalog,
            economy,
        );

        Ok(Self {
            store: Mutex::new(store),
            handler,
        })
    }

    pub fn ledger(&self) -> &SharedLedger {
        self.handler.ledger()
    }

    pub fn handler(&self) -> &CommandHandler {
        &self.handler
    }

    pub async fn on_command(&self, sender: &dyn CommandSender, label: &str, args: &[&str]) -> bool {
        self.handler.on_command(sender, label, args).await
    }

    pub fn tab_complete(&self, args: &[&str]) -> Vec<String> {
        self.handler.tab_complete(args)
    }

    pub fn export_catalog(&self, format: OutputFormat) -> Result<String> {
        let view: CatalogView = self.handler.catalog_view();
        match format {
            OutputFormat::Csv => view.to_csv(),
            OutputFormat::Json => view.to_json(),
            OutputFormat::Text => Ok(view
                .entries()
                .iter()
                .map(|entry| {
                    format!(
                        "{}\t{}\t{}\t{}",
                        entry.item, entry.name, entry.price, entry.min_amount
                    )
                })
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    /// Writes the ledger to the store.
    pub fn save(&self) -> Result<()> {
        let mut store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
        self.ledger().read(|ledger| ledger.save_to(&mut *store))
    }

    /// Flushes the ledger. A failed save is logged and returned; the plugin
    /// stays usable and may be saved again.
    pub fn disable(&self) -> Result<()> {
        match self.save() {
            Ok(()) => {
                tracing::info!("💾 mcshop disabled, data saved");
                Ok(())
            }
            Err(e) => {
                tracing::error!("❌ Failed to save shop data: {}", e);
                tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
                Err(e)
            }
        }
    }

    pub fn into_store(self) -> S {
        self.store.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}
