//! Google Shopping RSS feed generation for online stores.
//!
//! The crate is split into a pure feed builder and the pieces needed to
//! run it against a real catalog:
//!
//! - [`catalog`] - domain model and the [`catalog::CatalogSource`] seam
//! - [`feed`] - header, item and availability rendering plus the
//!   [`feed::FeedAssembler`] that ties them together
//! - [`storage`] - SQLite catalog reader producing catalog snapshots
//! - [`config`] - optional TOML configuration
//! - [`util`] - text sanitizing and URL validation

pub mod catalog;
pub mod config;
pub mod feed;
pub mod storage;
pub mod util;
