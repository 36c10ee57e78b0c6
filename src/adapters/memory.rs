//! In-process implementations of the host ports, used by the console binary
//! and by tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::core::{CommandSender, ConfigStore, Economy, ItemStack, Player};
use crate::utils::error::{Result, ShopError};

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    document: toml::Table,
    persist_count: usize,
    fail_persist: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let document = toml::from_str(content).map_err(|e| ShopError::ConfigValidation {
            field: "memory_store".to_string(),
            message: format!("TOML parsing error: {}", e),
        })?;
        Ok(Self {
            document,
            ..Self::default()
        })
    }

    /// Makes every following `persist` call fail.
    pub fn fail_persist(&mut self, fail: bool) {
        self.fail_persist = fail;
    }

    pub fn persist_count(&self) -> usize {
        self.persist_count
    }

    pub fn document(&self) -> &toml::Table {
        &self.document
    }
}

impl ConfigStore for MemoryStore {
    fn section(&self, name: &str) -> Option<&toml::Table> {
        self.document.get(name).and_then(|value| value.as_table())
    }

    fn replace_section(&mut self, name: &str, section: toml::Table) {
        self.document
            .insert(name.to_string(), toml::Value::Table(section));
    }

    fn persist(&mut self) -> Result<()> {
        if self.fail_persist {
            return Err(ShopError::Persistence {
                path: "<memory>".to_string(),
                message: "persist disabled".to_string(),
            });
        }
        self.persist_count += 1;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryEconomy {
    balances: Mutex<HashMap<String, f64>>,
    offline: bool,
}

impl MemoryEconomy {
    pub fn new() -> Self {
        Self::default()
    }

    /// An economy whose deposits always fail.
    pub fn offline() -> Self {
        Self {
            balances: Mutex::default(),
            offline: true,
        }
    }

    pub fn balance(&self, player: &str) -> f64 {
        self.balances
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(player)
            .copied()
            .unwrap_or(0.0)
    }
}

#[async_trait]
impl Economy for MemoryEconomy {
    async fn deposit(&self, player: &str, amount: f64) -> Result<f64> {
        if self.offline {
            return Err(ShopError::Economy {
                message: "economy backend offline".to_string(),
            });
        }
        if !amount.is_finite() || amount < 0.0 {
            return Err(ShopError::Economy {
                message: format!("refusing to deposit {}", amount),
            });
        }

        let mut balances = self.balances.lock().unwrap_or_else(PoisonError::into_inner);
        let balance = balances.entry(player.to_string()).or_insert(0.0);
        *balance += amount;
        Ok(*balance)
    }
}

/// Server console: every permission, no inventory.
#[derive(Debug, Default)]
pub struct ConsoleSender {
    messages: Mutex<Vec<String>>,
}

impl ConsoleSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl CommandSender for ConsoleSender {
    fn name(&self) -> &str {
        "CONSOLE"
    }

    fn has_permission(&self, _node: &str) -> bool {
        true
    }

    async fn send_message(&self, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}

#[derive(Debug)]
pub struct MemoryPlayer {
    name: String,
    permissions: HashSet<String>,
    hand: Mutex<Option<ItemStack>>,
    messages: Mutex<Vec<String>>,
}

impl MemoryPlayer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            permissions: HashSet::new(),
            hand: Mutex::new(None),
            messages: Mutex::new(Vec::new()),
        }
    }

    pub fn with_permission(mut self, node: impl Into<String>) -> Self {
        self.permissions.insert(node.into());
        self
    }

    pub fn holding(self, stack: ItemStack) -> Self {
        self.set_main_hand(Some(stack));
        self
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last_message(&self) -> Option<String> {
        self.messages().pop()
    }
}

#[async_trait]
impl CommandSender for MemoryPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn has_permission(&self, node: &str) -> bool {
        self.permissions.contains(node) || self.permissions.contains("*")
    }

    async fn send_message(&self, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }

    fn as_player(&self) -> Option<&dyn Player> {
        Some(self)
    }
}

impl Player for MemoryPlayer {
    fn main_hand(&self) -> Option<ItemStack> {
        *self.hand.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_main_hand(&self, stack: Option<ItemStack>) {
        *self.hand.lock().unwrap_or_else(PoisonError::into_inner) = stack;
    }
}
