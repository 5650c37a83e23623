//! Ordered-pairs catalog container.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::CatalogError;

/// Localized string record for one documentation page.
///
/// All known fields are optional: existing records may carry any subset.
/// Unrecognized fields round-trip through `extra` so no data is lost when
/// the catalog is rewritten.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Page title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Title used in the HTML `<title>` / meta tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,

    /// Page description for search and previews.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Short title shown in the navigation menu.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu_title: Option<String>,

    /// Unrecognized record fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: serde_yaml::Mapping,
}

/// Key-ordered sequence of catalog records.
///
/// An explicit ordered-pairs container: iteration order equals on-disk
/// document order before and after mutation. Keys are unique.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OrderedCatalog {
    pairs: Vec<(String, CatalogEntry)>,
}

impl OrderedCatalog {
    /// Create a catalog from ordered pairs.
    #[must_use]
    pub fn new(pairs: Vec<(String, CatalogEntry)>) -> Self {
        Self { pairs }
    }

    /// Keys in document order.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        self.pairs.iter().map(|(key, _)| key.as_str()).collect()
    }

    /// Ordered (key, entry) pairs.
    #[must_use]
    pub fn pairs(&self) -> &[(String, CatalogEntry)] {
        &self.pairs
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// True if the catalog has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// True if a record with the given key exists.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.pairs.iter().any(|(existing, _)| existing == key)
    }

    /// Insert a new record immediately after the record keyed by
    /// `anchor_key`, rebuilding the pair sequence so every other pair keeps
    /// its original relative order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateKey`] if `key` already exists and
    /// [`CatalogError::AnchorNotFound`] if the anchor is absent; the catalog
    /// is left unchanged in both cases.
    pub fn insert_after(
        &mut self,
        anchor_key: &str,
        key: impl Into<String>,
        entry: CatalogEntry,
    ) -> Result<(), CatalogError> {
        let key = key.into();
        if self.contains_key(&key) {
            return Err(CatalogError::DuplicateKey(key));
        }

        let mut rebuilt = Vec::with_capacity(self.pairs.len() + 1);
        let mut pending = Some((key, entry));
        for pair in self.pairs.drain(..) {
            let matched = pair.0 == anchor_key;
            rebuilt.push(pair);
            if matched && let Some(new_pair) = pending.take() {
                debug!(anchor = anchor_key, key = %new_pair.0, "inserted catalog record after anchor");
                rebuilt.push(new_pair);
            }
        }

        self.pairs = rebuilt;
        if pending.is_some() {
            // Anchor never matched; the rebuilt sequence equals the original.
            return Err(CatalogError::AnchorNotFound(anchor_key.to_owned()));
        }
        Ok(())
    }
}
