//! Utility functions for common operations.
//!
//! - **Text sanitizing**: drop characters XML 1.0 cannot carry
//! - **URL validation**: check store base URLs before they end up in links

mod text;
mod url_validator;

pub use text::strip_invalid_xml_chars;
pub use url_validator::{validate_store_url, UrlValidationError};
