use chrono::{DateTime, Utc};
use quick_xml::events::BytesStart;

use super::availability::{classify, Availability};
use super::error::FeedError;
use super::xml::{write_end, write_start, write_text_element, XmlWriter};
use crate::catalog::{FeedSetting, OptionalAttribute, Product, Store, Variant};

/// Field values for one `<item>`, resolved from a variant and its product.
///
/// Fields are listed in the order they are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFields {
    pub id: String,
    pub title: String,
    pub description: String,
    pub link: String,
    pub image_link: String,
    pub price: String,
    pub availability: Availability,
    /// Present only for in-stock products.
    pub availability_date: Option<String>,
    /// Enabled optional attributes with a value, as `(element, value)`.
    pub optional: Vec<(&'static str, String)>,
}

impl ItemFields {
    /// Resolves every field for `variant`.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::MissingImage`] if the variant has no images.
    /// Callers are expected to have filtered those out already, so this
    /// indicates a bug upstream rather than bad data.
    pub fn resolve(
        store: &Store,
        product: &Product,
        variant: &Variant,
        setting: &FeedSetting,
        now: DateTime<Utc>,
    ) -> Result<Self, FeedError> {
        let image = variant
            .images
            .first()
            .ok_or(FeedError::MissingImage {
                variant_id: variant.id,
            })?;

        Ok(Self {
            id: variant.id.to_string(),
            title: item_title(product, variant),
            description: product.description.clone().unwrap_or_default(),
            link: product_link(store, product),
            image_link: image.plp_url.clone(),
            price: item_price(variant),
            availability: classify(product.available_on, now),
            availability_date: Availability::date_for(product.available_on, now),
            optional: optional_attributes(product, setting),
        })
    }

    /// Writes the fields as one `<item>` element.
    pub(crate) fn write(&self, writer: &mut XmlWriter) -> Result<(), FeedError> {
        write_start(writer, BytesStart::new("item"))?;

        write_text_element(writer, "g:id", &self.id)?;
        write_text_element(writer, "g:title", &self.title)?;
        write_text_element(writer, "g:description", &self.description)?;
        write_text_element(writer, "g:link", &self.link)?;
        write_text_element(writer, "g:image_link", &self.image_link)?;
        write_text_element(writer, "g:price", &self.price)?;
        write_text_element(writer, "g:availability", self.availability.as_str())?;
        if let Some(ref date) = self.availability_date {
            write_text_element(writer, "g:availability_date", date)?;
        }
        for (element, value) in &self.optional {
            write_text_element(writer, element, value)?;
        }

        write_end(writer, "item")
    }
}

/// `"{product} - {first option value}"`, or just the product name when the
/// variant has no option values.
pub fn item_title(product: &Product, variant: &Variant) -> String {
    match variant.option_values.first() {
        Some(option) => format!("{} - {}", product.name, option.name),
        None => product.name.clone(),
    }
}

/// `"{store url}/{slug}"`. A trailing slash on the store URL is dropped.
pub fn product_link(store: &Store, product: &Product) -> String {
    format!("{}/{}", store.url.trim_end_matches('/'), product.slug)
}

/// `"{price} {currency}"` with the price at its stored scale.
pub fn item_price(variant: &Variant) -> String {
    format!("{} {}", variant.price, variant.cost_currency)
}

fn optional_attributes(product: &Product, setting: &FeedSetting) -> Vec<(&'static str, String)> {
    let mut attributes: Vec<(&'static str, String)> = OptionalAttribute::ALL
        .into_iter()
        .filter(|attribute| setting.includes(*attribute))
        .filter_map(|attribute| {
            product
                .properties
                .get(attribute.property_key())
                .map(|value| (attribute.element(), value.to_string()))
        })
        .collect();

    if setting.include_item_group_id {
        attributes.push(("g:item_group_id", product.id.to_string()));
    }

    attributes
}
