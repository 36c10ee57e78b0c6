use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::core::ledger::PricingLedger;

/// Ledger handle that can be cloned into command handlers.
///
/// Both mappings sit behind one lock, so a reader never sees a half-applied
/// mutation.
#[derive(Debug, Clone, Default)]
pub struct SharedLedger {
    inner: Arc<Mutex<PricingLedger>>,
}

impl SharedLedger {
    pub fn new(ledger: PricingLedger) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ledger)),
        }
    }

    pub fn read<R>(&self, f: impl FnOnce(&PricingLedger) -> R) -> R {
        f(&self.lock())
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut PricingLedger) -> R) -> R {
        f(&mut self.lock())
    }

    // Every mutation is a single map insert, so a poisoned ledger is still consistent.
    fn lock(&self) -> MutexGuard<'_, PricingLedger> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
