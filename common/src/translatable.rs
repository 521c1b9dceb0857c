//! Declared per-locale fields for persisted entities.
//!
//! Entities that store one column per locale (`title_en`, `title_es`, ...)
//! declare their translatable fields once in a [`TranslatableSchema`]. The
//! schema then answers every per-locale question explicitly: which column
//! holds a locale's value, which columns a migration must create, and which
//! value an accessor should return for the active locale. Lookups report where
//! the value came from through [`TranslatedValue`] instead of silently falling
//! back.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use crate::error::LocaleError;
use crate::locale::{LocaleMap, LocaleRegistry};

/// Read access to an entity's stored attributes.
pub trait AttributeSource {
    /// Returns the stored value of `key`, if any.
    fn attribute(&self, key: &str) -> Option<String>;
}

impl<S: BuildHasher> AttributeSource for HashMap<String, String, S> {
    fn attribute(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl AttributeSource for BTreeMap<String, String> {
    fn attribute(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Outcome of a translatable field lookup.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TranslatedValue {
    /// The value was stored under the bare field name.
    Exact(String),
    /// The value was stored in the requested locale's column.
    Localized {
        /// Locale whose column held the value.
        locale: String,
        /// The stored value.
        value: String,
    },
    /// The requested locale had no value; the main locale's column was used.
    Fallback {
        /// The main locale.
        locale: String,
        /// The stored value.
        value: String,
    },
    /// No value exists for the field.
    Missing,
}

impl TranslatedValue {
    /// Borrows the resolved value, if any.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Exact(value)
            | Self::Localized { value, .. }
            | Self::Fallback { value, .. } => Some(value),
            Self::Missing => None,
        }
    }

    /// Consumes the outcome, yielding the resolved value.
    #[must_use]
    pub fn into_value(self) -> Option<String> {
        match self {
            Self::Exact(value)
            | Self::Localized { value, .. }
            | Self::Fallback { value, .. } => Some(value),
            Self::Missing => None,
        }
    }
}

/// Value assigned to a translatable field before it is persisted.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FieldValue {
    /// One value for the locale active while saving.
    Single(String),
    /// Explicit values per locale.
    PerLocale(Vec<(String, String)>),
}

/// Static declaration of an entity's translatable fields.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TranslatableSchema {
    available: Vec<String>,
    main: String,
    fields: Vec<(String, Vec<String>)>,
    nullable: bool,
}

impl TranslatableSchema {
    /// Starts an empty schema for the registry's locales.
    #[must_use]
    pub fn new(registry: &LocaleRegistry) -> Self {
        Self {
            available: registry.available_locales().to_vec(),
            main: registry.main_locale().to_owned(),
            fields: Vec::new(),
            nullable: false,
        }
    }

    /// Declares `name` as translatable in every available locale.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>) -> Self {
        let locales = self.available.clone();
        self.fields.push((name.into(), locales));
        self
    }

    /// Declares `name` as translatable in a subset of the available locales.
    ///
    /// # Errors
    ///
    /// Returns [`LocaleError::UnknownLocale`] when a locale is not available.
    pub fn field_in<I, S>(mut self, name: impl Into<String>, locales: I) -> Result<Self, LocaleError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut declared = Vec::new();
        for locale in locales {
            let code = locale.into();
            if !self.available.contains(&code) {
                return Err(LocaleError::UnknownLocale { locale: code });
            }
            declared.push(code);
        }
        self.fields.push((name.into(), declared));
        Ok(self)
    }

    /// When set, lookups report [`TranslatedValue::Missing`] instead of
    /// falling back to the main locale.
    #[must_use]
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Whether `field` was declared translatable.
    #[must_use]
    pub fn is_translatable(&self, field: &str) -> bool {
        self.locales_for(field).is_some()
    }

    /// Locales declared for `field`.
    #[must_use]
    pub fn locales_for(&self, field: &str) -> Option<&[String]> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, locales)| locales.as_slice())
    }

    /// Column holding `field` in `locale`.
    ///
    /// ```
    /// use translator_common::TranslatableSchema;
    ///
    /// assert_eq!(TranslatableSchema::column_name("title", "es"), "title_es");
    /// ```
    #[must_use]
    pub fn column_name(field: &str, locale: &str) -> String {
        format!("{field}_{locale}")
    }

    /// Every per-locale column a migration must create for `field`.
    #[must_use]
    pub fn localized_columns(&self, field: &str) -> Vec<String> {
        self.locales_for(field)
            .map(|locales| {
                locales
                    .iter()
                    .map(|locale| Self::column_name(field, locale))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Splits a per-locale column name into its declared field and locale.
    #[must_use]
    pub fn split_column<'key>(&self, column: &'key str) -> Option<(&'key str, &'key str)> {
        self.fields.iter().find_map(|(field, locales)| {
            let locale = column.strip_prefix(field.as_str())?.strip_prefix('_')?;
            if !locales.iter().any(|declared| declared == locale) {
                return None;
            }
            let (name, _) = column.split_at(field.len());
            Some((name, locale))
        })
    }

    /// Resolves `field` for `locale` from `source`.
    pub fn value(
        &self,
        source: &impl AttributeSource,
        field: &str,
        locale: &str,
    ) -> TranslatedValue {
        if let Some(value) = source.attribute(field) {
            return TranslatedValue::Exact(value);
        }

        let Some(locales) = self.locales_for(field) else {
            return TranslatedValue::Missing;
        };

        if locales.iter().any(|declared| declared == locale)
            && let Some(value) = source.attribute(&Self::column_name(field, locale))
        {
            return TranslatedValue::Localized {
                locale: locale.to_owned(),
                value,
            };
        }

        if self.nullable || locale == self.main {
            return TranslatedValue::Missing;
        }

        source
            .attribute(&Self::column_name(field, &self.main))
            .map_or(TranslatedValue::Missing, |value| TranslatedValue::Fallback {
                locale: self.main.clone(),
                value,
            })
    }

    /// Collects the stored value of `field` for every available locale.
    pub fn translations(&self, source: &impl AttributeSource, field: &str) -> LocaleMap<String> {
        let mut values = LocaleMap::empty(self.available.iter().cloned());
        for locale in self.locales_for(field).unwrap_or_default() {
            if let Some(value) = source.attribute(&Self::column_name(field, locale)) {
                values.set(locale, value);
            }
        }
        values
    }

    /// Expands an assigned field value into per-locale column pairs.
    ///
    /// A single value is stored under `current_locale`. Locales the field was
    /// not declared for are dropped.
    #[must_use]
    pub fn expand(&self, field: &str, value: FieldValue, current_locale: &str) -> Vec<(String, String)> {
        let declared = self.locales_for(field).unwrap_or_default();
        let pairs = match value {
            FieldValue::Single(text) => vec![(current_locale.to_owned(), text)],
            FieldValue::PerLocale(values) => values,
        };
        pairs
            .into_iter()
            .filter(|(locale, _)| declared.contains(locale))
            .map(|(locale, text)| (Self::column_name(field, &locale), text))
            .collect()
    }
}
