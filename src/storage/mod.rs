//! SQLite catalog reader.
//!
//! Holds stores, per-store feed settings, and products with their variants,
//! option values, images and properties. [`Database::load_catalog`] turns a
//! store's slice of it into an in-memory [`crate::catalog::CatalogSnapshot`].

mod catalog;
mod products;
mod schema;
mod stores;
mod types;

pub use schema::Database;
pub use types::{DatabaseError, NewProduct, NewStore, NewVariant};
