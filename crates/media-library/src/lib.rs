//! media-library: track catalog abstractions and free-text queries
//!
//! This crate provides the `Track` type, a `MediaCatalog` trait over the
//! device's media index, an in-memory catalog, and the query function that
//! resolves a spoken free-text filter into an ordered list of tracks.

mod types;
pub use types::{CatalogEntry, Track};

mod error;
pub use error::{LibraryError, Result};

mod catalog;
pub use catalog::{MediaCatalog, MemoryCatalog};

mod loader;
pub use loader::{load_catalog, parse_catalog};

mod query;
pub use query::query;
