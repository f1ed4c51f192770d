//! Catalog domain model and the read-only collaborator the feed builder
//! queries.
//!
//! - [`types`] - stores, feed settings, products, variants, images
//! - [`source`] - the [`CatalogSource`] trait and an in-memory
//!   [`CatalogSnapshot`] implementation
//!
//! All values are snapshots; nothing here is mutated during feed generation.

mod source;
mod types;

pub use source::{CatalogError, CatalogSnapshot, CatalogSource};
pub use types::{
    FeedSetting, Image, OptionValue, OptionalAttribute, Product, Properties, Store, Variant,
};
