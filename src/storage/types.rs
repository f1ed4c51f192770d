use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

use crate::catalog::{FeedSetting, Image, OptionValue, Store};

// ============================================================================
// Error Types
// ============================================================================

/// Database-specific errors with user-friendly messages
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Another process holds a lock on the catalog database
    #[error("The catalog database is locked by another process. Try again shortly.")]
    Locked,

    /// Migration failed
    #[error("Database migration failed: {0}")]
    Migration(String),

    /// Generic database error
    #[error("Database error: {0}")]
    Other(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Check if a sqlx error indicates database locking
    pub(crate) fn from_sqlx(err: sqlx::Error) -> Self {
        if is_lock_message(&err.to_string()) {
            return DatabaseError::Locked;
        }
        DatabaseError::Other(err)
    }
}

/// SQLITE_BUSY (5) and SQLITE_LOCKED (6) surface only through their messages.
pub(crate) fn is_lock_message(message: &str) -> bool {
    let message = message.to_lowercase();
    message.contains("database is locked")
        || message.contains("database table is locked")
        || message.contains("sqlite_busy")
        || message.contains("sqlite_locked")
}

// ============================================================================
// Insert Types
// ============================================================================

/// A store to insert.
#[derive(Debug, Clone)]
pub struct NewStore {
    pub code: String,
    pub name: String,
    pub url: String,
    pub meta_description: Option<String>,
}

/// A product to insert. Link it to stores with `link_product_to_store`.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub slug: String,
    pub available_on: Option<DateTime<FixedOffset>>,
}

/// A variant to insert together with its option values and images.
#[derive(Debug, Clone)]
pub struct NewVariant {
    pub price: Decimal,
    pub cost_currency: String,
    /// Sort key among the product's variants.
    pub position: i64,
    pub option_values: Vec<OptionValue>,
    pub image_urls: Vec<String>,
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct StoreRow {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub url: String,
    pub meta_description: Option<String>,
}

impl StoreRow {
    pub(crate) fn into_store(self) -> Store {
        Store {
            id: self.id,
            code: self.code,
            name: self.name,
            url: self.url,
            meta_description: self.meta_description,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct FeedSettingRow {
    pub include_brand: bool,
    pub include_material: bool,
    pub include_gtin: bool,
    pub include_mpn: bool,
    pub include_condition: bool,
    pub include_item_group_id: bool,
}

impl FeedSettingRow {
    pub(crate) fn into_setting(self) -> FeedSetting {
        FeedSetting {
            include_brand: self.include_brand,
            include_material: self.include_material,
            include_gtin: self.include_gtin,
            include_mpn: self.include_mpn,
            include_condition: self.include_condition,
            include_item_group_id: self.include_item_group_id,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ProductRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub slug: String,
    /// RFC 3339 text
    pub available_on: Option<String>,
}

impl ProductRow {
    pub(crate) fn parse_available_on(&self) -> Result<Option<DateTime<FixedOffset>>> {
        self.available_on
            .as_deref()
            .map(|raw| {
                DateTime::parse_from_rfc3339(raw).with_context(|| {
                    format!("Invalid available_on '{}' for product {}", raw, self.id)
                })
            })
            .transpose()
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct VariantRow {
    pub id: i64,
    pub product_id: i64,
    /// Decimal text, kept as text so the stored scale survives
    pub price: String,
    pub cost_currency: String,
}

impl VariantRow {
    pub(crate) fn parse_price(&self) -> Result<Decimal> {
        Decimal::from_str(&self.price)
            .with_context(|| format!("Invalid price '{}' for variant {}", self.price, self.id))
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct OptionValueRow {
    pub variant_id: i64,
    pub name: String,
    pub presentation: String,
}

impl OptionValueRow {
    pub(crate) fn into_option_value(self) -> OptionValue {
        OptionValue {
            name: self.name,
            presentation: self.presentation,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ImageRow {
    pub variant_id: i64,
    pub plp_url: String,
}

impl ImageRow {
    pub(crate) fn into_image(self) -> Image {
        Image {
            plp_url: self.plp_url,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct PropertyRow {
    pub product_id: i64,
    pub name: String,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_messages_detected() {
        assert!(is_lock_message("error returned from database: database is locked"));
        assert!(is_lock_message("SQLITE_BUSY"));
        assert!(!is_lock_message("no such table: stores"));
    }

    #[test]
    fn test_price_text_keeps_scale() {
        let row = VariantRow {
            id: 1,
            product_id: 1,
            price: "20.00".to_string(),
            cost_currency: "USD".to_string(),
        };
        assert_eq!(row.parse_price().unwrap().to_string(), "20.00");
    }

    #[test]
    fn test_bad_price_names_variant() {
        let row = VariantRow {
            id: 77,
            product_id: 1,
            price: "twelve".to_string(),
            cost_currency: "USD".to_string(),
        };
        let err = row.parse_price().unwrap_err();
        assert!(err.to_string().contains("variant 77"));
    }

    #[test]
    fn test_available_on_parsing() {
        let mut row = ProductRow {
            id: 3,
            name: "Shirt".to_string(),
            description: None,
            slug: "shirt".to_string(),
            available_on: None,
        };
        assert_eq!(row.parse_available_on().unwrap(), None);

        row.available_on = Some("2020-01-01T00:00:00+00:00".to_string());
        assert!(row.parse_available_on().unwrap().is_some());

        row.available_on = Some("yesterday".to_string());
        assert!(row
            .parse_available_on()
            .unwrap_err()
            .to_string()
            .contains("product 3"));
    }
}
