use crate::domain::model::ItemId;
use crate::utils::error::{Result, ShopError};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// 解析物品 ID (非負整數)
pub fn parse_item_id(raw: &str) -> Result<ItemId> {
    let trimmed = raw.trim();
    trimmed
        .parse::<u32>()
        .map(ItemId::new)
        .map_err(|e| ShopError::invalid_value("item_id", raw, e.to_string()))
}

/// 解析價格：必須是有限且非負的數字
pub fn parse_price(raw: &str) -> Result<f64> {
    let price: f64 = raw
        .trim()
        .parse()
        .map_err(|_| ShopError::invalid_value("price", raw, "not a number"))?;

    if !price.is_finite() {
        return Err(ShopError::invalid_value("price", raw, "must be a finite number"));
    }
    if price < 0.0 {
        return Err(ShopError::invalid_value("price", raw, "cannot be negative"));
    }
    // -0.0 parses fine but would be saved as "-0.0"
    Ok(price.abs())
}

/// 解析最低出售數量：必須是正整數
pub fn parse_min_amount(raw: &str) -> Result<u32> {
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| ShopError::invalid_value("min_amount", raw, "not an integer"))?;

    if value < 1 {
        return Err(ShopError::invalid_value(
            "min_amount",
            raw,
            "must be at least 1",
        ));
    }

    u32::try_from(value)
        .map_err(|_| ShopError::invalid_value("min_amount", raw, "too large"))
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ShopError::InvalidConfigValue {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ShopError::InvalidConfigValue {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(ShopError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ShopError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(ShopError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}
