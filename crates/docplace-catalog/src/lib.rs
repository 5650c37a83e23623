//! Order-preserving localized string catalog.
//!
//! The site's localization file is a nested YAML mapping
//! (locale → section → key → record) where key order within a section is
//! semantically meaningful and must round-trip exactly. [`LocaleDocument`]
//! round-trips the whole file; [`OrderedCatalog`] is an explicit
//! ordered-pairs view of the documentation section supporting insertion
//! after a given key.

mod catalog;
mod document;

pub use catalog::{CatalogEntry, OrderedCatalog};
pub use document::LocaleDocument;

/// Error type for catalog operations.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The persisted locale YAML is malformed.
    #[error("{0}")]
    Parse(String),

    /// The anchor key is absent from the catalog.
    #[error("anchor key `{0}` not found in catalog")]
    AnchorNotFound(String),

    /// The key to insert already exists.
    #[error("catalog key `{0}` already exists")]
    DuplicateKey(String),
}
