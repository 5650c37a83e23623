//! Locale document round-trip.
//!
//! The persisted locale file nests the catalog under `locale → section`
//! (e.g. `en.docs`). Only that section is parsed and mutated; every other
//! locale and section is carried as raw YAML values and written back
//! untouched.

use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::{CatalogEntry, CatalogError, OrderedCatalog};

/// A fully materialized locale file with a typed view of one section.
///
/// Loaded once per run, mutated via [`set_catalog`](Self::set_catalog),
/// serialized back at the end.
#[derive(Clone, Debug)]
pub struct LocaleDocument {
    root: Mapping,
    locale: String,
    section: String,
}

impl LocaleDocument {
    /// Parse a locale document from YAML.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] if the content is not a YAML mapping
    /// or the locale/section values are present but not mappings.
    pub fn from_yaml(content: &str, locale: &str, section: &str) -> Result<Self, CatalogError> {
        let root: Value = serde_yaml::from_str(content)
            .map_err(|e| CatalogError::Parse(format!("Invalid locale YAML: {e}")))?;
        let root = match root {
            Value::Mapping(mapping) => mapping,
            Value::Null => Mapping::new(),
            other => {
                return Err(CatalogError::Parse(format!(
                    "Expected a mapping at the document root, found {}",
                    type_name(&other)
                )));
            }
        };

        let doc = Self {
            root,
            locale: locale.to_owned(),
            section: section.to_owned(),
        };
        // Validate the section shape up front so later mutation can't fail
        // on malformed input.
        let _ = doc.section_mapping()?;
        Ok(doc)
    }

    /// Serialize the document back to YAML.
    pub fn to_yaml(&self) -> Result<String, CatalogError> {
        serde_yaml::to_string(&self.root)
            .map_err(|e| CatalogError::Parse(format!("Failed to serialize locale YAML: {e}")))
    }

    /// Extract the section as an ordered catalog.
    ///
    /// A missing locale or section yields an empty catalog; the container is
    /// created on the next [`set_catalog`](Self::set_catalog).
    pub fn catalog(&self) -> Result<OrderedCatalog, CatalogError> {
        let Some(section) = self.section_mapping()? else {
            return Ok(OrderedCatalog::default());
        };

        let mut pairs = Vec::with_capacity(section.len());
        for (key, value) in section {
            let Value::String(key) = key else {
                return Err(CatalogError::Parse(format!(
                    "Non-string key in `{}.{}`",
                    self.locale, self.section
                )));
            };
            let entry: CatalogEntry = serde_yaml::from_value(value.clone()).map_err(|e| {
                CatalogError::Parse(format!(
                    "Invalid record `{}.{}.{key}`: {e}",
                    self.locale, self.section
                ))
            })?;
            pairs.push((key.clone(), entry));
        }
        Ok(OrderedCatalog::new(pairs))
    }

    /// Replace the section with the given catalog, creating the locale and
    /// section containers if they do not yet exist.
    pub fn set_catalog(&mut self, catalog: &OrderedCatalog) -> Result<(), CatalogError> {
        let mut section = Mapping::with_capacity(catalog.len());
        for (key, entry) in catalog.pairs() {
            let value = serde_yaml::to_value(entry).map_err(|e| {
                CatalogError::Parse(format!("Failed to serialize record `{key}`: {e}"))
            })?;
            section.insert(Value::String(key.clone()), value);
        }

        let locale_key = Value::String(self.locale.clone());
        if !self.root.contains_key(&locale_key) {
            debug!(locale = %self.locale, "creating empty locale container");
            self.root
                .insert(locale_key.clone(), Value::Mapping(Mapping::new()));
        }
        let Some(Value::Mapping(locale)) = self.root.get_mut(&locale_key) else {
            return Err(CatalogError::Parse(format!(
                "Locale `{}` is not a mapping",
                self.locale
            )));
        };
        locale.insert(Value::String(self.section.clone()), Value::Mapping(section));
        Ok(())
    }

    /// Borrow the section mapping, or `None` if the locale or section is
    /// absent.
    fn section_mapping(&self) -> Result<Option<&Mapping>, CatalogError> {
        let locale_key = Value::String(self.locale.clone());
        let Some(locale) = self.root.get(&locale_key) else {
            return Ok(None);
        };
        let Value::Mapping(locale) = locale else {
            return Err(CatalogError::Parse(format!(
                "Locale `{}` is not a mapping",
                self.locale
            )));
        };
        let section_key = Value::String(self.section.clone());
        let Some(section) = locale.get(&section_key) else {
            return Ok(None);
        };
        match section {
            Value::Mapping(section) => Ok(Some(section)),
            other => Err(CatalogError::Parse(format!(
                "Section `{}.{}` is not a mapping, found {}",
                self.locale,
                self.section,
                type_name(other)
            ))),
        }
    }
}

/// Short YAML type name for error messages.
fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
