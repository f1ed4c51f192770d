//! Google Shopping feed generation.
//!
//! Turns a store and its catalog into an RSS 2.0 document with one `<item>`
//! per sellable variant:
//!
//! - `assembler` - [`FeedAssembler`], the entry point; writes the RSS
//!   envelope and walks the catalog
//! - `header` - channel `<title>`, `<link>` and `<description>`
//! - `item` - per-variant field resolution ([`ItemFields`])
//! - `availability` - availability classification from a product's date
//! - `xml` - escaping and element writing over `quick-xml`
//!
//! # Example
//!
//! ```ignore
//! use shopfeed::feed::FeedAssembler;
//!
//! let snapshot = db.load_catalog(&store).await?;
//! let xml = FeedAssembler::new(&snapshot).generate(&store, &setting)?;
//! ```

mod assembler;
mod availability;
mod error;
mod header;
mod item;
mod xml;

pub use assembler::FeedAssembler;
pub use availability::{classify, format_date, Availability};
pub use error::FeedError;
pub use item::{item_price, item_title, product_link, ItemFields};
pub use xml::{escape_text, GOOGLE_NAMESPACE};
