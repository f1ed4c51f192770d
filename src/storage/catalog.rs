use anyhow::Result;
use std::collections::HashMap;

use super::schema::Database;
use super::types::{ImageRow, OptionValueRow, ProductRow, PropertyRow, VariantRow};
use crate::catalog::{CatalogSnapshot, Image, OptionValue, Product, Properties, Store, Variant};

impl Database {
    // ========================================================================
    // Catalog Loading
    // ========================================================================

    /// Load everything needed to build `store`'s feed into memory.
    ///
    /// All queries run inside one read transaction, so the snapshot is
    /// consistent even if the catalog is being edited concurrently.
    ///
    /// Ordering: products by id; variants by position then id; option
    /// values and images by position then id. Variants without images are
    /// included; the feed builder skips them.
    pub async fn load_catalog(&self, store: &Store) -> Result<CatalogSnapshot> {
        let mut tx = self.pool.begin().await?;

        let product_rows: Vec<ProductRow> = sqlx::query_as(
            r#"
                SELECT p.id, p.name, p.description, p.slug, p.available_on
                FROM products p
                JOIN product_stores ps ON ps.product_id = p.id
                WHERE ps.store_id = ?
                ORDER BY p.id
            "#,
        )
        .bind(store.id)
        .fetch_all(&mut *tx)
        .await?;

        let memberships: Vec<(i64, i64)> = sqlx::query_as(
            r#"
                SELECT product_id, store_id
                FROM product_stores
                WHERE product_id IN (SELECT product_id FROM product_stores WHERE store_id = ?)
                ORDER BY product_id, store_id
            "#,
        )
        .bind(store.id)
        .fetch_all(&mut *tx)
        .await?;

        let property_rows: Vec<PropertyRow> = sqlx::query_as(
            r#"
                SELECT pp.product_id, pp.name, pp.value
                FROM product_properties pp
                JOIN product_stores ps ON ps.product_id = pp.product_id
                WHERE ps.store_id = ?
            "#,
        )
        .bind(store.id)
        .fetch_all(&mut *tx)
        .await?;

        let variant_rows: Vec<VariantRow> = sqlx::query_as(
            r#"
                SELECT v.id, v.product_id, v.price, v.cost_currency
                FROM variants v
                JOIN product_stores ps ON ps.product_id = v.product_id
                WHERE ps.store_id = ?
                ORDER BY v.product_id, v.position, v.id
            "#,
        )
        .bind(store.id)
        .fetch_all(&mut *tx)
        .await?;

        let option_rows: Vec<OptionValueRow> = sqlx::query_as(
            r#"
                SELECT ov.variant_id, ov.name, ov.presentation
                FROM option_values ov
                JOIN variants v ON v.id = ov.variant_id
                JOIN product_stores ps ON ps.product_id = v.product_id
                WHERE ps.store_id = ?
                ORDER BY ov.variant_id, ov.position, ov.id
            "#,
        )
        .bind(store.id)
        .fetch_all(&mut *tx)
        .await?;

        let image_rows: Vec<ImageRow> = sqlx::query_as(
            r#"
                SELECT i.variant_id, i.plp_url
                FROM images i
                JOIN variants v ON v.id = i.variant_id
                JOIN product_stores ps ON ps.product_id = v.product_id
                WHERE ps.store_id = ?
                ORDER BY i.variant_id, i.position, i.id
            "#,
        )
        .bind(store.id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        let mut store_ids: HashMap<i64, Vec<i64>> = HashMap::new();
        for (product_id, store_id) in memberships {
            store_ids.entry(product_id).or_default().push(store_id);
        }

        let mut properties: HashMap<i64, Properties> = HashMap::new();
        for row in property_rows {
            properties
                .entry(row.product_id)
                .or_default()
                .insert(row.name, row.value);
        }

        let mut option_values: HashMap<i64, Vec<OptionValue>> = HashMap::new();
        for row in option_rows {
            option_values
                .entry(row.variant_id)
                .or_default()
                .push(row.into_option_value());
        }

        let mut images: HashMap<i64, Vec<Image>> = HashMap::new();
        for row in image_rows {
            images
                .entry(row.variant_id)
                .or_default()
                .push(row.into_image());
        }

        let mut variants: HashMap<i64, Vec<Variant>> = HashMap::new();
        for row in variant_rows {
            let price = row.parse_price()?;
            variants.entry(row.product_id).or_default().push(Variant {
                id: row.id,
                price,
                option_values: option_values.remove(&row.id).unwrap_or_default(),
                images: images.remove(&row.id).unwrap_or_default(),
                cost_currency: row.cost_currency,
            });
        }

        let mut products = Vec::with_capacity(product_rows.len());
        for row in product_rows {
            let available_on = row.parse_available_on()?;
            products.push(Product {
                id: row.id,
                available_on,
                properties: properties.remove(&row.id).unwrap_or_default(),
                store_ids: store_ids.remove(&row.id).unwrap_or_default(),
                variants: variants.remove(&row.id).unwrap_or_default(),
                name: row.name,
                description: row.description,
                slug: row.slug,
            });
        }

        tracing::debug!(
            store = %store.code,
            products = products.len(),
            "Loaded catalog snapshot"
        );
        Ok(CatalogSnapshot::new(vec![store.clone()], products))
    }
}
