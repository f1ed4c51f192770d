use thiserror::Error;

use super::types::{Product, Store};

/// Errors reported by a catalog collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The store is not known to this catalog.
    #[error("Store {0} not found in catalog")]
    StoreNotFound(i64),

    /// The catalog could not be read.
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}

/// Read access to the products linked to a store.
///
/// Implementations return products in catalog order with every variant
/// attached, including variants without images. Filtering to eligible
/// variants is the caller's job.
pub trait CatalogSource {
    fn products_for_store(&self, store: &Store) -> Result<Vec<&Product>, CatalogError>;
}

/// Point-in-time, in-memory copy of a catalog.
///
/// Built by `storage::Database::load_catalog` or by hand in tests.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    stores: Vec<Store>,
    products: Vec<Product>,
}

impl CatalogSnapshot {
    pub fn new(stores: Vec<Store>, products: Vec<Product>) -> Self {
        Self { stores, products }
    }

    pub fn stores(&self) -> &[Store] {
        &self.stores
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }
}

impl CatalogSource for CatalogSnapshot {
    fn products_for_store(&self, store: &Store) -> Result<Vec<&Product>, CatalogError> {
        if !self.stores.iter().any(|s| s.id == store.id) {
            return Err(CatalogError::StoreNotFound(store.id));
        }

        Ok(self
            .products
            .iter()
            .filter(|product| product.belongs_to(store))
            .collect())
    }
}
