//! Ordered per-locale result maps.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Ordered mapping from every available locale to an optional value.
///
/// The key set is fixed when the map is created, normally from
/// [`LocaleRegistry::locale_map`](super::LocaleRegistry::locale_map), so
/// callers can rely on one entry per available locale. Writes to locales
/// outside that set are rejected.
///
/// ```
/// use translator_common::LocaleMap;
///
/// let mut urls: LocaleMap<String> = LocaleMap::empty(["en", "es"]);
/// assert!(urls.set("es", "/es/blog".to_owned()));
/// assert!(!urls.set("de", "/de/blog".to_owned()));
///
/// assert_eq!(urls.len(), 2);
/// assert_eq!(urls.get("es").map(String::as_str), Some("/es/blog"));
/// assert_eq!(urls.get("en"), None);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocaleMap<T> {
    entries: Vec<(String, Option<T>)>,
}

impl<T> LocaleMap<T> {
    /// Creates a map holding no value for each of `locales`.
    pub fn empty<I, S>(locales: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: locales
                .into_iter()
                .map(|locale| (locale.into(), None))
                .collect(),
        }
    }

    /// Stores `value` for `locale`; returns `false` when the locale is not a key.
    pub fn set(&mut self, locale: &str, value: T) -> bool {
        match self.slot_mut(locale) {
            Some(slot) => {
                *slot = Some(value);
                true
            }
            None => false,
        }
    }

    /// Returns the value stored for `locale`, if any.
    #[must_use]
    pub fn get(&self, locale: &str) -> Option<&T> {
        self.entries
            .iter()
            .find(|(key, _)| key == locale)
            .and_then(|(_, value)| value.as_ref())
    }

    /// Whether `locale` is one of the map's keys.
    #[must_use]
    pub fn contains_locale(&self, locale: &str) -> bool {
        self.entries.iter().any(|(key, _)| key == locale)
    }

    /// Number of locales in the map, with or without a value.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no locales at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the locale keys in order.
    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Iterates over every entry in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&T>)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_ref()))
    }

    /// Iterates over the entries that hold a value.
    pub fn present(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries
            .iter()
            .filter_map(|(key, value)| value.as_ref().map(|inner| (key.as_str(), inner)))
    }

    /// Transforms every stored value, keeping the key set.
    #[must_use]
    pub fn map_values<U, F>(self, mut transform: F) -> LocaleMap<U>
    where
        F: FnMut(&str, T) -> U,
    {
        LocaleMap {
            entries: self
                .entries
                .into_iter()
                .map(|(key, value)| {
                    let mapped = value.map(|inner| transform(&key, inner));
                    (key, mapped)
                })
                .collect(),
        }
    }

    fn slot_mut(&mut self, locale: &str) -> Option<&mut Option<T>> {
        self.entries
            .iter_mut()
            .find(|(key, _)| key == locale)
            .map(|(_, value)| value)
    }
}

impl<T> IntoIterator for LocaleMap<T> {
    type Item = (String, Option<T>);
    type IntoIter = std::vec::IntoIter<(String, Option<T>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<T: Serialize> Serialize for LocaleMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
