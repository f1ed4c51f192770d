use anyhow::{Context, Result};

use super::schema::Database;
use super::types::{NewProduct, NewVariant};

impl Database {
    // ========================================================================
    // Product Operations
    // ========================================================================

    /// Insert a product and return its id.
    ///
    /// `available_on` is stored as RFC 3339 text so its offset survives.
    pub async fn insert_product(&self, product: &NewProduct) -> Result<i64> {
        let available_on = product.available_on.map(|date| date.to_rfc3339());

        let result = sqlx::query(
            "INSERT INTO products (name, description, slug, available_on) VALUES (?, ?, ?, ?)",
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.slug)
        .bind(available_on)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to insert product '{}'", product.slug))?;

        Ok(result.last_insert_rowid())
    }

    /// Make a product part of a store's catalog. Linking twice is a no-op.
    pub async fn link_product_to_store(&self, product_id: i64, store_id: i64) -> Result<()> {
        sqlx::query("INSERT OR IGNORE INTO product_stores (product_id, store_id) VALUES (?, ?)")
            .bind(product_id)
            .bind(store_id)
            .execute(&self.pool)
            .await
            .with_context(|| {
                format!(
                    "Failed to link product {} to store {}",
                    product_id, store_id
                )
            })?;
        Ok(())
    }

    /// Set a named product property, replacing any previous value.
    pub async fn set_product_property(
        &self,
        product_id: i64,
        name: &str,
        value: &str,
    ) -> Result<()> {
        sqlx::query(
            r#"
                INSERT INTO product_properties (product_id, name, value) VALUES (?, ?, ?)
                ON CONFLICT(product_id, name) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(product_id)
        .bind(name)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    // ========================================================================
    // Variant Operations
    // ========================================================================

    /// Insert a variant with its option values and images, in one
    /// transaction. Option values and images keep the order given.
    pub async fn insert_variant(&self, product_id: i64, variant: &NewVariant) -> Result<i64> {
        let mut tx = self.pool.begin().await?;

        let variant_id = sqlx::query(
            "INSERT INTO variants (product_id, price, cost_currency, position) VALUES (?, ?, ?, ?)",
        )
        .bind(product_id)
        .bind(variant.price.to_string())
        .bind(&variant.cost_currency)
        .bind(variant.position)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("Failed to insert variant for product {}", product_id))?
        .last_insert_rowid();

        for (position, option) in (0i64..).zip(&variant.option_values) {
            sqlx::query(
                "INSERT INTO option_values (variant_id, position, name, presentation) VALUES (?, ?, ?, ?)",
            )
            .bind(variant_id)
            .bind(position)
            .bind(&option.name)
            .bind(&option.presentation)
            .execute(&mut *tx)
            .await?;
        }

        for (position, url) in (0i64..).zip(&variant.image_urls) {
            sqlx::query("INSERT INTO images (variant_id, position, plp_url) VALUES (?, ?, ?)")
                .bind(variant_id)
                .bind(position)
                .bind(url)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(variant_id)
    }
}
