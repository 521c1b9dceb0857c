//! Translation rows and the store adapter they are read from.
//!
//! The store is an external collaborator (normally an ORM table); the engine
//! only needs group-wide reads, per-locale reads, and the list of groups.
//! [`MemoryStore`] implements the contract in memory for tests and small
//! embedded deployments.

use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// One stored translation.
///
/// At most one row exists per `(group, needle, locale)`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TranslationRow {
    /// Group the row belongs to.
    pub group: String,
    /// Key of the text within its group.
    pub needle: String,
    /// Locale of the text.
    pub locale: String,
    /// The translated text.
    pub text: String,
}

impl TranslationRow {
    /// Creates a row.
    #[must_use]
    pub fn new(
        group: impl Into<String>,
        needle: impl Into<String>,
        locale: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            needle: needle.into(),
            locale: locale.into(),
            text: text.into(),
        }
    }

    fn same_key(&self, other: &Self) -> bool {
        self.group == other.group && self.needle == other.needle && self.locale == other.locale
    }
}

/// Query interface over persisted translation rows.
#[cfg_attr(test, mockall::automock)]
pub trait TranslationStore: Send + Sync {
    /// Returns every row of `group` in storage order.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the query cannot be completed.
    fn rows_for_group(&self, group: &str) -> Result<Vec<TranslationRow>, StoreError>;

    /// Returns every row of `locale` across all groups.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the query cannot be completed.
    fn rows_for_locale(&self, locale: &str) -> Result<Vec<TranslationRow>, StoreError>;

    /// Returns each group name once.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the query cannot be completed.
    fn distinct_groups(&self) -> Result<Vec<String>, StoreError>;
}

/// In-memory [`TranslationStore`].
///
/// ```
/// use translator_text::{MemoryStore, TranslationRow, TranslationStore};
///
/// let store = MemoryStore::from_rows([
///     TranslationRow::new("blog", "title", "en", "Blog"),
///     TranslationRow::new("blog", "title", "en", "News"),
/// ]);
///
/// let rows = store.rows_for_group("blog").expect("memory store never fails");
/// assert_eq!(rows.len(), 1);
/// assert_eq!(rows[0].text, "News");
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: RwLock<Vec<TranslationRow>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store from `rows`; later rows replace earlier ones with the
    /// same key.
    #[must_use]
    pub fn from_rows(rows: impl IntoIterator<Item = TranslationRow>) -> Self {
        let store = Self::new();
        for row in rows {
            store.upsert(row);
        }
        store
    }

    /// Inserts `row`, replacing any row with the same group, needle, and locale.
    pub fn upsert(&self, row: TranslationRow) {
        let mut rows = self.rows.write().unwrap_or_else(PoisonError::into_inner);
        match rows.iter_mut().find(|existing| existing.same_key(&row)) {
            Some(existing) => *existing = row,
            None => rows.push(row),
        }
    }

    /// Removes the row with the given key; returns whether one existed.
    pub fn remove(&self, group: &str, needle: &str, locale: &str) -> bool {
        let mut rows = self.rows.write().unwrap_or_else(PoisonError::into_inner);
        let before = rows.len();
        rows.retain(|row| !(row.group == group && row.needle == needle && row.locale == locale));
        rows.len() != before
    }

    fn select(&self, predicate: impl Fn(&TranslationRow) -> bool) -> Vec<TranslationRow> {
        self.rows
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|row| predicate(row))
            .cloned()
            .collect()
    }
}

impl TranslationStore for MemoryStore {
    fn rows_for_group(&self, group: &str) -> Result<Vec<TranslationRow>, StoreError> {
        Ok(self.select(|row| row.group == group))
    }

    fn rows_for_locale(&self, locale: &str) -> Result<Vec<TranslationRow>, StoreError> {
        Ok(self.select(|row| row.locale == locale))
    }

    fn distinct_groups(&self) -> Result<Vec<String>, StoreError> {
        let rows = self.rows.read().unwrap_or_else(PoisonError::into_inner);
        let mut groups: Vec<String> = Vec::new();
        for row in rows.iter() {
            if !groups.contains(&row.group) {
                groups.push(row.group.clone());
            }
        }
        Ok(groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn store() -> MemoryStore {
        MemoryStore::from_rows([
            TranslationRow::new("blog", "title", "en", "Blog"),
            TranslationRow::new("blog", "title", "es", "Bitácora"),
            TranslationRow::new("menu", "home", "en", "Home"),
        ])
    }

    #[rstest]
    fn filters_rows_by_group(store: MemoryStore) {
        let rows = store.rows_for_group("blog").expect("memory store never fails");

        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|row| row.group == "blog"));
    }

    #[rstest]
    fn filters_rows_by_locale(store: MemoryStore) {
        let rows = store.rows_for_locale("en").expect("memory store never fails");

        assert_eq!(
            rows.iter().map(|row| row.needle.as_str()).collect::<Vec<_>>(),
            ["title", "home"]
        );
    }

    #[rstest]
    fn lists_groups_once_in_first_seen_order(store: MemoryStore) {
        store.upsert(TranslationRow::new("blog", "intro", "en", "Intro"));

        assert_eq!(
            store.distinct_groups().expect("memory store never fails"),
            ["blog", "menu"]
        );
    }

    #[rstest]
    fn upsert_keeps_one_row_per_key(store: MemoryStore) {
        store.upsert(TranslationRow::new("blog", "title", "en", "News"));

        let rows = store.rows_for_group("blog").expect("memory store never fails");
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().any(|row| row.text == "News"));
    }

    #[rstest]
    fn removes_rows_by_key(store: MemoryStore) {
        assert!(store.remove("blog", "title", "es"));
        assert!(!store.remove("blog", "title", "es"));
        assert_eq!(
            store.rows_for_group("blog").expect("memory store never fails").len(),
            1
        );
    }
}
