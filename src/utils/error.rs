use crate::domain::model::ItemId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShopError {
    #[error("Invalid {field} '{value}': {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Need at least {required} of item {item} to sell it, got {offered}")]
    InsufficientQuantity {
        item: ItemId,
        required: u32,
        offered: u32,
    },

    #[error("Skipped unknown key '{key}' in section '{section}'")]
    UnknownKey { section: String, key: String },

    #[error("Skipped key '{key}' in section '{section}': item {item} is already set by '{kept}'")]
    DuplicateKey {
        section: String,
        key: String,
        kept: String,
        item: ItemId,
    },

    #[error("Failed to persist store '{path}': {message}")]
    Persistence { path: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV export error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Invalid configuration value for '{field}': {value} ({reason})")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing permission '{node}'")]
    PermissionDenied { node: String },

    #[error("Command can only be executed by a player")]
    NotAPlayer,

    #[error("No item in main hand")]
    EmptyHand,

    #[error("Item {item} is not listed in the shop")]
    ItemNotListed { item: ItemId },

    #[error("No economy service registered")]
    EconomyUnavailable,

    #[error("Economy transaction failed: {message}")]
    Economy { message: String },

    #[error("Usage: {usage}")]
    Usage { usage: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Sale,
    Permission,
    Configuration,
    Storage,
    Economy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ShopError {
    pub fn invalid_value(field: &str, value: &str, reason: impl Into<String>) -> Self {
        ShopError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ShopError::InvalidValue { .. } | ShopError::Usage { .. } => ErrorCategory::Input,
            ShopError::InsufficientQuantity { .. }
            | ShopError::EmptyHand
            | ShopError::ItemNotListed { .. } => ErrorCategory::Sale,
            ShopError::PermissionDenied { .. } | ShopError::NotAPlayer => {
                ErrorCategory::Permission
            }
            ShopError::ConfigValidation { .. }
            | ShopError::InvalidConfigValue { .. }
            | ShopError::UnknownKey { .. }
            | ShopError::DuplicateKey { .. } => ErrorCategory::Configuration,
            ShopError::Persistence { .. }
            | ShopError::Io(_)
            | ShopError::Serialization(_)
            | ShopError::Csv(_) => ErrorCategory::Storage,
            ShopError::EconomyUnavailable | ShopError::Economy { .. } => ErrorCategory::Economy,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ShopError::UnknownKey { .. } | ShopError::DuplicateKey { .. } => ErrorSeverity::Low,
            ShopError::InvalidValue { .. }
            | ShopError::Usage { .. }
            | ShopError::InsufficientQuantity { .. }
            | ShopError::EmptyHand
            | ShopError::ItemNotListed { .. }
            | ShopError::PermissionDenied { .. }
            | ShopError::NotAPlayer => ErrorSeverity::Medium,
            ShopError::ConfigValidation { .. }
            | ShopError::InvalidConfigValue { .. }
            | ShopError::EconomyUnavailable
            | ShopError::Economy { .. } => ErrorSeverity::High,
            ShopError::Persistence { .. }
            | ShopError::Io(_)
            | ShopError::Serialization(_)
            | ShopError::Csv(_) => ErrorSeverity::Critical,
        }
    }

    /// Warnings are logged and counted but never stop the caller.
    pub fn is_warning(&self) -> bool {
        self.severity() == ErrorSeverity::Low
    }

    /// Text shown to the player or operator who issued the command.
    pub fn user_friendly_message(&self) -> String {
        match self {
            ShopError::InvalidValue { field, value, .. } => {
                format!("Invalid {}: {}", field.replace('_', " "), value)
            }
            ShopError::InsufficientQuantity { required, .. } => {
                format!("You need at least {} of this item to sell it.", required)
            }
            ShopError::UnknownKey { key, .. } => format!("Invalid item ID in config: {}", key),
            ShopError::DuplicateKey { key, item, .. } => {
                format!("Duplicate item ID in config: {} (item {})", key, item)
            }
            ShopError::PermissionDenied { .. } => {
                "You don't have permission to use this command.".to_string()
            }
            ShopError::NotAPlayer => "This command can only be executed by a player.".to_string(),
            ShopError::EmptyHand => "You need to hold an item to sell it.".to_string(),
            ShopError::ItemNotListed { .. } => {
                "This item is not available in the shop.".to_string()
            }
            ShopError::EconomyUnavailable => "Economy plugin not found.".to_string(),
            ShopError::Economy { .. } => "The sale could not be paid out.".to_string(),
            ShopError::Usage { usage } => format!("Usage: {}", usage),
            ShopError::Persistence { .. } | ShopError::Io(_) => {
                "Failed to access the shop data file.".to_string()
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => "Check the command arguments and try again",
            ErrorCategory::Sale => "Hold a larger stack or ask an admin about the minimum amount",
            ErrorCategory::Permission => "Ask a server operator for the required permission",
            ErrorCategory::Configuration => "Fix the settings file and restart the plugin",
            ErrorCategory::Storage => {
                "Check that the data file is writable; in-memory prices are kept until the next save"
            }
            ErrorCategory::Economy => "Make sure an economy service is installed and running",
        }
    }
}

pub type Result<T> = std::result::Result<T, ShopError>;
