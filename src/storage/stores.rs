use anyhow::{Context, Result};

use super::schema::Database;
use super::types::{FeedSettingRow, NewStore, StoreRow};
use crate::catalog::{FeedSetting, Store};
use crate::util::validate_store_url;

impl Database {
    // ========================================================================
    // Store Operations
    // ========================================================================

    /// Insert a store and return its id.
    ///
    /// The store URL must pass [`validate_store_url`]; every product link in
    /// the feed is built from it.
    pub async fn insert_store(&self, store: &NewStore) -> Result<i64> {
        validate_store_url(&store.url)
            .with_context(|| format!("Store '{}' has an unusable URL", store.code))?;

        let result = sqlx::query(
            "INSERT INTO stores (code, name, url, meta_description) VALUES (?, ?, ?, ?)",
        )
        .bind(&store.code)
        .bind(&store.name)
        .bind(&store.url)
        .bind(&store.meta_description)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to insert store '{}'", store.code))?;

        Ok(result.last_insert_rowid())
    }

    /// Look up a store by its code.
    pub async fn get_store_by_code(&self, code: &str) -> Result<Option<Store>> {
        let row: Option<StoreRow> = sqlx::query_as(
            "SELECT id, code, name, url, meta_description FROM stores WHERE code = ?",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(StoreRow::into_store))
    }

    // ========================================================================
    // Feed Setting Operations
    // ========================================================================

    /// Create or replace the feed settings for a store.
    pub async fn save_feed_setting(&self, store_id: i64, setting: &FeedSetting) -> Result<()> {
        sqlx::query(
            r#"
                INSERT INTO feed_settings (
                    store_id, include_brand, include_material, include_gtin,
                    include_mpn, include_condition, include_item_group_id
                )
                VALUES (?, ?, ?, ?, ?, ?, ?)
                ON CONFLICT(store_id) DO UPDATE SET
                    include_brand = excluded.include_brand,
                    include_material = excluded.include_material,
                    include_gtin = excluded.include_gtin,
                    include_mpn = excluded.include_mpn,
                    include_condition = excluded.include_condition,
                    include_item_group_id = excluded.include_item_group_id
            "#,
        )
        .bind(store_id)
        .bind(setting.include_brand)
        .bind(setting.include_material)
        .bind(setting.include_gtin)
        .bind(setting.include_mpn)
        .bind(setting.include_condition)
        .bind(setting.include_item_group_id)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to save feed settings for store {}", store_id))?;

        Ok(())
    }

    /// Feed settings for a store, or `None` if none were saved.
    pub async fn get_feed_setting(&self, store_id: i64) -> Result<Option<FeedSetting>> {
        let row: Option<FeedSettingRow> = sqlx::query_as(
            r#"
                SELECT include_brand, include_material, include_gtin,
                       include_mpn, include_condition, include_item_group_id
                FROM feed_settings
                WHERE store_id = ?
            "#,
        )
        .bind(store_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(FeedSettingRow::into_setting))
    }
}
