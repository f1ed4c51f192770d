use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeMap;

// ============================================================================
// Store
// ============================================================================

/// A storefront whose catalog is exported as one feed channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Store {
    pub id: i64,
    /// Short unique code used to select the store from the CLI.
    pub code: String,
    pub name: String,
    /// Public base URL. Product links are built as `{url}/{slug}`.
    pub url: String,
    pub meta_description: Option<String>,
}

// ============================================================================
// Feed Settings
// ============================================================================

/// Per-store toggles for optional item attributes.
///
/// Every field uses `#[serde(default)]` so a config `[feed]` table may
/// specify any subset of keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FeedSetting {
    pub include_brand: bool,
    pub include_material: bool,
    pub include_gtin: bool,
    pub include_mpn: bool,
    pub include_condition: bool,
    /// Emit `g:item_group_id` (the product id) so variants group together.
    pub include_item_group_id: bool,
}

impl Default for FeedSetting {
    fn default() -> Self {
        Self {
            include_brand: true,
            include_material: false,
            include_gtin: false,
            include_mpn: false,
            include_condition: false,
            include_item_group_id: false,
        }
    }
}

impl FeedSetting {
    /// Whether the given property-backed attribute is switched on.
    pub fn includes(&self, attribute: OptionalAttribute) -> bool {
        match attribute {
            OptionalAttribute::Brand => self.include_brand,
            OptionalAttribute::Material => self.include_material,
            OptionalAttribute::Gtin => self.include_gtin,
            OptionalAttribute::Mpn => self.include_mpn,
            OptionalAttribute::Condition => self.include_condition,
        }
    }
}

/// Optional item attributes sourced from product properties.
///
/// Each attribute reads the product property of the same key and is written
/// as a `g:`-prefixed element. Variants are listed in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionalAttribute {
    Brand,
    Material,
    Gtin,
    Mpn,
    Condition,
}

impl OptionalAttribute {
    pub const ALL: [OptionalAttribute; 5] = [
        OptionalAttribute::Brand,
        OptionalAttribute::Material,
        OptionalAttribute::Gtin,
        OptionalAttribute::Mpn,
        OptionalAttribute::Condition,
    ];

    /// Product property key holding the value.
    pub fn property_key(self) -> &'static str {
        match self {
            OptionalAttribute::Brand => "brand",
            OptionalAttribute::Material => "material",
            OptionalAttribute::Gtin => "gtin",
            OptionalAttribute::Mpn => "mpn",
            OptionalAttribute::Condition => "condition",
        }
    }

    /// Feed element name.
    pub fn element(self) -> &'static str {
        match self {
            OptionalAttribute::Brand => "g:brand",
            OptionalAttribute::Material => "g:material",
            OptionalAttribute::Gtin => "g:gtin",
            OptionalAttribute::Mpn => "g:mpn",
            OptionalAttribute::Condition => "g:condition",
        }
    }
}

// ============================================================================
// Products
// ============================================================================

/// Named product attributes such as `brand` or `material`.
///
/// Blank values are treated as absent by [`Properties::get`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties(BTreeMap<String, String>);

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Value for `key`, or `None` when missing or blank.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

/// A product and its variants, as linked to one or more stores.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub slug: String,
    /// Availability date. `None` means the product is not available.
    pub available_on: Option<DateTime<FixedOffset>>,
    pub properties: Properties,
    pub store_ids: Vec<i64>,
    /// Variants in catalog order, including ones without images.
    pub variants: Vec<Variant>,
}

impl Product {
    pub fn belongs_to(&self, store: &Store) -> bool {
        self.store_ids.contains(&store.id)
    }

    /// Variants that carry at least one image, in catalog order.
    pub fn eligible_variants(&self) -> impl Iterator<Item = &Variant> {
        self.variants.iter().filter(|v| v.is_eligible())
    }
}

/// A sellable variant of a product.
#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    pub id: i64,
    /// Price at the precision it was stored with.
    pub price: Decimal,
    /// ISO 4217 code, e.g. `USD`.
    pub cost_currency: String,
    pub option_values: Vec<OptionValue>,
    pub images: Vec<Image>,
}

impl Variant {
    /// Only variants with an image can be listed; `g:image_link` is required.
    pub fn is_eligible(&self) -> bool {
        !self.images.is_empty()
    }
}

/// An option value such as a size or colour, e.g. `name = "Red"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionValue {
    pub name: String,
    pub presentation: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    /// Public display URL used for product listing pages.
    pub plp_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variant(id: i64, images: usize) -> Variant {
        Variant {
            id,
            price: Decimal::new(1999, 2),
            cost_currency: "USD".to_string(),
            option_values: vec![],
            images: (0..images)
                .map(|i| Image {
                    plp_url: format!("https://img.test/{id}/{i}.jpg"),
                })
                .collect(),
        }
    }

    #[test]
    fn test_default_setting_includes_brand_only() {
        let setting = FeedSetting::default();
        assert!(setting.includes(OptionalAttribute::Brand));
        for attribute in &OptionalAttribute::ALL[1..] {
            assert!(!setting.includes(*attribute), "{attribute:?} should be off");
        }
        assert!(!setting.include_item_group_id);
    }

    #[test]
    fn test_properties_blank_values_are_absent() {
        let properties: Properties = [("brand", "   "), ("material", ""), ("gtin", "123")]
            .into_iter()
            .collect();
        assert_eq!(properties.get("brand"), None);
        assert_eq!(properties.get("material"), None);
        assert_eq!(properties.get("gtin"), Some("123"));
        assert_eq!(properties.get("mpn"), None);
        assert_eq!(properties.len(), 3);
    }

    #[test]
    fn test_properties_insert_overwrites() {
        let mut properties = Properties::new();
        assert!(properties.is_empty());
        properties.insert("brand", "Acme");
        properties.insert("brand", "Globex");
        assert_eq!(properties.get("brand"), Some("Globex"));
    }

    #[test]
    fn test_eligible_variants_skip_imageless_and_keep_order() {
        let product = Product {
            id: 1,
            name: "Shirt".to_string(),
            description: None,
            slug: "shirt".to_string(),
            available_on: None,
            properties: Properties::new(),
            store_ids: vec![7],
            variants: vec![variant(1, 1), variant(2, 0), variant(3, 2)],
        };

        let ids: Vec<i64> = product.eligible_variants().map(|v| v.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_belongs_to_checks_store_membership() {
        let store = Store {
            id: 7,
            code: "acme".to_string(),
            name: "Acme".to_string(),
            url: "https://acme.test".to_string(),
            meta_description: None,
        };
        let mut product = Product {
            id: 1,
            name: "Shirt".to_string(),
            description: None,
            slug: "shirt".to_string(),
            available_on: None,
            properties: Properties::new(),
            store_ids: vec![3, 7],
            variants: vec![],
        };
        assert!(product.belongs_to(&store));
        product.store_ids = vec![3];
        assert!(!product.belongs_to(&store));
    }

    #[test]
    fn test_feed_setting_partial_deserialize() {
        let setting: FeedSetting = toml::from_str("include_gtin = true").unwrap();
        assert!(setting.include_brand);
        assert!(setting.include_gtin);
        assert!(!setting.include_mpn);
    }
}
