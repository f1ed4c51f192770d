use chrono::{DateTime, Utc};
use quick_xml::events::{BytesDecl, BytesStart, Event};

use super::error::FeedError;
use super::header::write_header;
use super::item::ItemFields;
use super::xml::{finish, new_writer, write_end, write_start, GOOGLE_NAMESPACE};
use crate::catalog::{CatalogSource, FeedSetting, Store, Variant};

/// Builds a complete RSS 2.0 shopping feed for one store.
///
/// The assembler only reads from its catalog. Each call produces a fresh
/// document; nothing is cached between calls.
///
/// # Example
///
/// ```ignore
/// let snapshot = db.load_catalog(&store).await?;
/// let xml = FeedAssembler::new(&snapshot).generate(&store, &setting)?;
/// ```
#[derive(Debug)]
pub struct FeedAssembler<'a, C: CatalogSource + ?Sized> {
    catalog: &'a C,
}

impl<'a, C: CatalogSource + ?Sized> FeedAssembler<'a, C> {
    pub fn new(catalog: &'a C) -> Self {
        Self { catalog }
    }

    /// Generates the feed using the current time for availability.
    pub fn generate(&self, store: &Store, setting: &FeedSetting) -> Result<String, FeedError> {
        self.generate_at(store, setting, Utc::now())
    }

    /// Generates the feed as of `now`.
    ///
    /// Items follow catalog order: products as the catalog returns them,
    /// then each product's image-bearing variants in order. Identical inputs
    /// produce byte-identical output.
    ///
    /// # Errors
    ///
    /// - [`FeedError::Catalog`] if the catalog lookup fails
    /// - [`FeedError::Write`] / [`FeedError::Utf8`] if serialization fails
    pub fn generate_at(
        &self,
        store: &Store,
        setting: &FeedSetting,
        now: DateTime<Utc>,
    ) -> Result<String, FeedError> {
        let products = self.catalog.products_for_store(store)?;

        let mut writer = new_writer();
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(FeedError::write)?;

        let mut rss = BytesStart::new("rss");
        rss.push_attribute(("version", "2.0"));
        rss.push_attribute(("xmlns:g", GOOGLE_NAMESPACE));
        write_start(&mut writer, rss)?;
        write_start(&mut writer, BytesStart::new("channel"))?;

        write_header(&mut writer, store)?;

        let mut items = 0usize;
        let mut skipped = 0usize;
        for product in products {
            let eligible: Vec<&Variant> = product.eligible_variants().collect();
            let without_images = product.variants.len() - eligible.len();
            if without_images > 0 {
                tracing::debug!(
                    product_id = product.id,
                    skipped = without_images,
                    "Skipping variants without images"
                );
                skipped += without_images;
            }

            for variant in eligible {
                ItemFields::resolve(store, product, variant, setting, now)?.write(&mut writer)?;
                items += 1;
            }
        }

        write_end(&mut writer, "channel")?;
        write_end(&mut writer, "rss")?;

        let xml = finish(writer)?;
        tracing::info!(
            store = %store.code,
            items,
            skipped,
            bytes = xml.len(),
            "Generated product feed"
        );
        Ok(xml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogError, CatalogSnapshot, Image, OptionValue, Product, Properties};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn store() -> Store {
        Store {
            id: 1,
            code: "acme".to_string(),
            name: "Acme".to_string(),
            url: "https://acme.test".to_string(),
            meta_description: Some("Best stuff".to_string()),
        }
    }

    fn variant(id: i64, option: &str, images: usize) -> Variant {
        Variant {
            id,
            price: Decimal::new(1999, 2),
            cost_currency: "USD".to_string(),
            option_values: vec![OptionValue {
                name: option.to_string(),
                presentation: option.to_string(),
            }],
            images: (0..images)
                .map(|i| Image {
                    plp_url: format!("http://img/{id}-{i}.jpg"),
                })
                .collect(),
        }
    }

    fn product(id: i64, variants: Vec<Variant>) -> Product {
        Product {
            id,
            name: format!("Product {id}"),
            description: Some(format!("Description {id}")),
            slug: format!("product-{id}"),
            available_on: DateTime::parse_from_rfc3339("2020-01-01T00:00:00+00:00").ok(),
            properties: Properties::new(),
            store_ids: vec![1],
            variants,
        }
    }

    /// Catalog that always fails, to check error propagation.
    struct BrokenCatalog;

    impl CatalogSource for BrokenCatalog {
        fn products_for_store(&self, _store: &Store) -> Result<Vec<&Product>, CatalogError> {
            Err(CatalogError::Unavailable("connection reset".to_string()))
        }
    }

    #[test]
    fn test_empty_catalog_document() {
        let snapshot = CatalogSnapshot::new(vec![store()], vec![]);
        let xml = FeedAssembler::new(&snapshot)
            .generate_at(&store(), &FeedSetting::default(), now())
            .unwrap();

        let expected = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:g="http://base.google.com/ns/1.0">
  <channel>
    <title>Acme</title>
    <link>https://acme.test</link>
    <description>Best stuff</description>
  </channel>
</rss>"#;
        assert_eq!(xml, expected);
    }

    #[test]
    fn test_items_follow_catalog_order() {
        let snapshot = CatalogSnapshot::new(
            vec![store()],
            vec![
                product(1, vec![variant(11, "S", 1), variant(12, "M", 1)]),
                product(2, vec![variant(21, "Blue", 1)]),
            ],
        );
        let xml = FeedAssembler::new(&snapshot)
            .generate_at(&store(), &FeedSetting::default(), now())
            .unwrap();

        let positions: Vec<usize> = ["<g:id>11<", "<g:id>12<", "<g:id>21<"]
            .iter()
            .map(|needle| xml.find(needle).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(xml.matches("<item>").count(), 3);
    }

    #[test]
    fn test_variants_without_images_are_skipped() {
        let snapshot = CatalogSnapshot::new(
            vec![store()],
            vec![product(
                1,
                vec![variant(11, "S", 1), variant(12, "M", 0), variant(13, "L", 2)],
            )],
        );
        let xml = FeedAssembler::new(&snapshot)
            .generate_at(&store(), &FeedSetting::default(), now())
            .unwrap();

        assert!(xml.contains("<g:id>11</g:id>"));
        assert!(!xml.contains("<g:id>12</g:id>"));
        assert!(xml.contains("<g:id>13</g:id>"));
        assert_eq!(xml.matches("<item>").count(), 2);
    }

    #[test]
    fn test_products_of_other_stores_are_excluded() {
        let mut foreign = product(2, vec![variant(21, "S", 1)]);
        foreign.store_ids = vec![9];
        let snapshot = CatalogSnapshot::new(
            vec![store()],
            vec![product(1, vec![variant(11, "S", 1)]), foreign],
        );
        let xml = FeedAssembler::new(&snapshot)
            .generate_at(&store(), &FeedSetting::default(), now())
            .unwrap();

        assert!(xml.contains("<g:id>11</g:id>"));
        assert!(!xml.contains("<g:id>21</g:id>"));
    }

    #[test]
    fn test_catalog_error_propagates_unchanged() {
        let err = FeedAssembler::new(&BrokenCatalog)
            .generate_at(&store(), &FeedSetting::default(), now())
            .unwrap_err();

        match err {
            FeedError::Catalog(inner) => {
                assert_eq!(inner, CatalogError::Unavailable("connection reset".to_string()))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_store_propagates() {
        let snapshot = CatalogSnapshot::new(vec![], vec![]);
        let err = FeedAssembler::new(&snapshot)
            .generate_at(&store(), &FeedSetting::default(), now())
            .unwrap_err();
        assert!(matches!(err, FeedError::Catalog(CatalogError::StoreNotFound(1))));
        assert_eq!(err.to_string(), "Store 1 not found in catalog");
    }

    #[test]
    fn test_generation_is_idempotent() {
        let snapshot = CatalogSnapshot::new(
            vec![store()],
            vec![product(1, vec![variant(11, "S", 1), variant(12, "M", 1)])],
        );
        let assembler = FeedAssembler::new(&snapshot);
        let first = assembler
            .generate_at(&store(), &FeedSetting::default(), now())
            .unwrap();
        let second = assembler
            .generate_at(&store(), &FeedSetting::default(), now())
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_assembler_over_trait_object() {
        let snapshot =
            CatalogSnapshot::new(vec![store()], vec![product(1, vec![variant(11, "S", 1)])]);
        let catalog: &dyn CatalogSource = &snapshot;
        let xml = FeedAssembler::new(catalog)
            .generate(&store(), &FeedSetting::default())
            .unwrap();
        assert!(xml.contains("<g:availability>in stock</g:availability>"));
    }
}
