use crate::core::LedgerDefaults;
use crate::utils::error::{Result, ShopError};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_range, Validate,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Largest page the host's chest inventory can show.
pub const MAX_PAGE_SIZE: usize = 54;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShopSettings {
    #[serde(default)]
    pub shop: ShopSection,
    #[serde(default)]
    pub storage: StorageSection,
    #[serde(default)]
    pub permissions: PermissionSection,
    /// item id -> display name
    pub catalog: Option<BTreeMap<String, String>>,
    pub logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopSection {
    pub default_price: f64,
    pub default_min_amount: u32,
    /// Only allow setprice/setminamount on items that already have an entry.
    pub require_listed_item: bool,
    pub currency_symbol: String,
    pub page_size: usize,
}

impl Default for ShopSection {
    fn default() -> Self {
        Self {
            default_price: crate::core::DEFAULT_PRICE,
            default_min_amount: crate::core::DEFAULT_MIN_AMOUNT,
            require_listed_item: false,
            currency_symbol: "$".to_string(),
            page_size: MAX_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    pub data_file: String,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            data_file: "plugins/mcshop/config.toml".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionSection {
    pub set_price: String,
    pub set_min_amount: String,
}

impl Default for PermissionSection {
    fn default() -> Self {
        Self {
            set_price: "mcshop.setprice".to_string(),
            set_min_amount: "mcshop.setminamount".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSection {
    pub level: Option<String>,
    pub json: Option<bool>,
}

impl ShopSettings {
    /// 從 TOML 檔案載入設定
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 檔案不存在時使用預設值
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!("No settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::from_file(path)
    }

    /// 從 TOML 字串解析設定
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ShopError::ConfigValidation {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${MCSHOP_DATA})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ShopError::ConfigValidation {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn ledger_defaults(&self) -> LedgerDefaults {
        LedgerDefaults {
            price: self.shop.default_price,
            min_amount: self.shop.default_min_amount,
        }
    }

    pub fn data_file(&self) -> &str {
        &self.storage.data_file
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or("info")
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }

    /// 驗證設定的合理性
    pub fn validate_settings(&self) -> Result<()> {
        let price = self.shop.default_price;
        if !price.is_finite() || price < 0.0 {
            return Err(ShopError::InvalidConfigValue {
                field: "shop.default_price".to_string(),
                value: price.to_string(),
                reason: "Default price must be a finite, non-negative number".to_string(),
            });
        }

        validate_positive_number(
            "shop.default_min_amount",
            self.shop.default_min_amount as usize,
            1,
        )?;
        validate_range("shop.page_size", self.shop.page_size, 1, MAX_PAGE_SIZE)?;
        validate_path("storage.data_file", &self.storage.data_file)?;
        validate_non_empty_string("permissions.set_price", &self.permissions.set_price)?;
        validate_non_empty_string(
            "permissions.set_min_amount",
            &self.permissions.set_min_amount,
        )?;

        Ok(())
    }
}

impl Validate for ShopSettings {
    fn validate(&self) -> Result<()> {
        self.validate_settings()
    }
}
