//! Resolution of `[locale.]group.needle` references into stored text.
//!
//! Groups are loaded wholesale on first use and kept in-process until they
//! are flushed. When an [`ExternalCache`] is attached and the registry enables
//! caching, loads go through it first so that other processes share the same
//! group payloads.

use std::fmt;
use std::sync::Arc;

use log::{debug, warn};
use translator_common::{IntervalRules, LocaleMap, LocaleRegistry, Replacements, TextReference};

use crate::cache::{ExternalCache, GroupCache};
use crate::error::TextError;
use crate::store::{TranslationRow, TranslationStore};

/// Prefix of external cache keys; the group name follows it.
pub const CACHE_PREFIX: &str = "translator.group.";

const TARGET: &str = "translator::text";

/// External cache key for `group`.
///
/// ```
/// assert_eq!(translator_text::cache_key("blog"), "translator.group.blog");
/// ```
#[must_use]
pub fn cache_key(group: &str) -> String {
    format!("{CACHE_PREFIX}{group}")
}

/// Looks up translated texts with locale fallback and group caching.
pub struct TextResolver {
    registry: Arc<LocaleRegistry>,
    store: Arc<dyn TranslationStore>,
    cache: Option<Arc<dyn ExternalCache>>,
    groups: GroupCache,
}

impl fmt::Debug for TextResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextResolver")
            .field("registry", &self.registry)
            .field("external_cache", &self.cache.is_some())
            .field("groups", &self.groups)
            .finish_non_exhaustive()
    }
}

impl TextResolver {
    /// Creates a resolver that shares loaded groups through `cache`.
    ///
    /// The cache is only consulted while the registry has caching enabled.
    #[must_use]
    pub fn new(
        registry: Arc<LocaleRegistry>,
        store: Arc<dyn TranslationStore>,
        cache: Arc<dyn ExternalCache>,
    ) -> Self {
        Self {
            registry,
            store,
            cache: Some(cache),
            groups: GroupCache::new(),
        }
    }

    /// Creates a resolver that only caches groups in-process.
    #[must_use]
    pub fn without_cache(registry: Arc<LocaleRegistry>, store: Arc<dyn TranslationStore>) -> Self {
        Self {
            registry,
            store,
            cache: None,
            groups: GroupCache::new(),
        }
    }

    /// The registry lookups are resolved against.
    #[must_use]
    pub fn registry(&self) -> &LocaleRegistry {
        &self.registry
    }

    /// Resolves `reference` to text.
    ///
    /// Without an explicit locale the registry's current locale is used. When
    /// nothing is stored and `or_default` is set, the main locale is tried
    /// next. Replacements run on the resolved text. Malformed references and
    /// missing rows yield `Ok(None)`.
    ///
    /// ```
    /// use std::sync::Arc;
    /// use translator_common::{LocaleRegistry, Replacements};
    /// use translator_text::{MemoryStore, TextResolver, TranslationRow};
    ///
    /// let registry = LocaleRegistry::builder(["en", "es"], "en").build().expect("valid");
    /// let store = MemoryStore::from_rows([TranslationRow::new("g", "n", "en", "Hello :name")]);
    /// let resolver = TextResolver::without_cache(Arc::new(registry), Arc::new(store));
    ///
    /// let hello = resolver
    ///     .text("es.g.n", &Replacements::from([("name", "John")]), true)
    ///     .expect("memory store never fails");
    /// assert_eq!(hello.as_deref(), Some("Hello John"));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a [`TextError`] when the group cannot be loaded.
    pub fn text(
        &self,
        reference: &str,
        replacements: &Replacements,
        or_default: bool,
    ) -> Result<Option<String>, TextError> {
        let Some(parsed) = TextReference::parse(reference, &self.registry) else {
            debug!(target: TARGET, "nothing to resolve in `{reference}`");
            return Ok(None);
        };

        let locale = parsed
            .locale()
            .map_or_else(|| self.registry.current_locale(), str::to_owned);
        let mut text = self.find_text(parsed.group(), parsed.needle(), &locale)?;

        if text.is_none() && or_default && !self.registry.is_main_locale(&locale) {
            let main = self.registry.main_locale();
            debug!(
                target: TARGET,
                "`{}.{}` missing for `{locale}`; falling back to `{main}`",
                parsed.group(),
                parsed.needle()
            );
            text = self.find_text(parsed.group(), parsed.needle(), main)?;
        }

        Ok(text.map(|value| replacements.apply(&value)))
    }

    /// Resolves `reference` in every available locale.
    ///
    /// An explicit locale segment is ignored. References without a needle
    /// yield the empty locale skeleton.
    ///
    /// # Errors
    ///
    /// Returns a [`TextError`] when the group cannot be loaded.
    pub fn texts(
        &self,
        reference: &str,
        replacements: &Replacements,
    ) -> Result<LocaleMap<String>, TextError> {
        let mut texts = self.registry.locale_map();
        let Some(parsed) = TextReference::parse(reference, &self.registry) else {
            return Ok(texts);
        };

        for row in self.load_group(parsed.group())?.iter() {
            if row.needle == parsed.needle() {
                texts.set(&row.locale, row.text.clone());
            }
        }

        Ok(texts.map_values(|_, text| replacements.apply(&text)))
    }

    /// Resolves `reference` and picks the interval rule matching `count`.
    ///
    /// Yields `Ok(None)` when the text is missing, its rules are malformed,
    /// or no rule contains `count`.
    ///
    /// # Errors
    ///
    /// Returns a [`TextError`] when the group cannot be loaded.
    pub fn choice(
        &self,
        reference: &str,
        count: i64,
        replacements: &Replacements,
        or_default: bool,
    ) -> Result<Option<String>, TextError> {
        let Some(text) = self.text(reference, replacements, or_default)? else {
            return Ok(None);
        };

        match IntervalRules::parse(&text) {
            Ok(rules) => Ok(rules.search(count).map(str::to_owned)),
            Err(error) => {
                warn!(target: TARGET, "cannot choose from `{reference}`: {error}");
                Ok(None)
            }
        }
    }

    /// Invalidates `group`, or every group the store knows when `None`.
    ///
    /// The next lookup reloads invalidated groups from the store.
    ///
    /// # Errors
    ///
    /// Returns a [`TextError`] when the store cannot list its groups or the
    /// external cache rejects a removal.
    pub fn cache_flush(&self, group: Option<&str>) -> Result<(), TextError> {
        if let Some(name) = group {
            return self.flush_group(name);
        }

        let names = self.store.distinct_groups()?;
        debug!(target: TARGET, "flushing {} groups", names.len());
        for name in &names {
            self.flush_group(name)?;
        }
        self.groups.clear();
        Ok(())
    }

    /// Rows of `name`, loading the group when needed.
    ///
    /// # Errors
    ///
    /// Returns a [`TextError`] when the group cannot be loaded.
    pub fn group(&self, name: &str) -> Result<Arc<[TranslationRow]>, TextError> {
        self.load_group(name)
    }

    /// Rows of `locale` (default: the current locale), across the whole store
    /// or restricted to `group`.
    ///
    /// # Errors
    ///
    /// Returns a [`TextError`] when the store or group load fails.
    pub fn locale_rows(
        &self,
        locale: Option<&str>,
        group: Option<&str>,
    ) -> Result<Vec<TranslationRow>, TextError> {
        let locale = locale.map_or_else(|| self.registry.current_locale(), str::to_owned);
        match group {
            None => Ok(self.store.rows_for_locale(&locale)?),
            Some(name) => Ok(self
                .load_group(name)?
                .iter()
                .filter(|row| row.locale == locale)
                .cloned()
                .collect()),
        }
    }

    fn find_text(
        &self,
        group: &str,
        needle: &str,
        locale: &str,
    ) -> Result<Option<String>, TextError> {
        Ok(self
            .load_group(group)?
            .iter()
            .find(|row| row.needle == needle && row.locale == locale)
            .map(|row| row.text.clone()))
    }

    fn external(&self) -> Option<&dyn ExternalCache> {
        if self.registry.caching_enabled() {
            self.cache.as_deref()
        } else {
            None
        }
    }

    fn load_group(&self, group: &str) -> Result<Arc<[TranslationRow]>, TextError> {
        if let Some(rows) = self.groups.get(group) {
            return Ok(rows);
        }

        let rows = match self.external() {
            Some(cache) => self.load_through(cache, group)?,
            None => self.query_store(group)?,
        };
        let rows: Arc<[TranslationRow]> = Arc::from(rows);
        self.groups.insert(group, Arc::clone(&rows));
        Ok(rows)
    }

    fn load_through(
        &self,
        cache: &dyn ExternalCache,
        group: &str,
    ) -> Result<Vec<TranslationRow>, TextError> {
        let key = cache_key(group);
        if cache.has(&key)?
            && let Some(payload) = cache.get(&key)?
        {
            match serde_json::from_str::<Vec<TranslationRow>>(&payload) {
                Ok(rows) => {
                    debug!(target: TARGET, "group `{group}` read from the external cache");
                    return Ok(rows);
                }
                Err(error) => {
                    warn!(target: TARGET, "discarding undecodable cache entry `{key}`: {error}");
                    if let Err(forget_error) = cache.forget(&key) {
                        warn!(target: TARGET, "{forget_error}");
                    }
                }
            }
        }

        let rows = self.query_store(group)?;
        match serde_json::to_string(&rows) {
            Ok(payload) => {
                if let Err(error) = cache.put(&key, payload, self.registry.cache_ttl()) {
                    warn!(target: TARGET, "group `{group}` was not cached: {error}");
                }
            }
            Err(error) => warn!(target: TARGET, "cannot encode group `{group}`: {error}"),
        }
        Ok(rows)
    }

    fn query_store(&self, group: &str) -> Result<Vec<TranslationRow>, TextError> {
        let rows = self.store.rows_for_group(group)?;
        debug!(target: TARGET, "loaded {} rows for group `{group}`", rows.len());
        Ok(rows)
    }

    fn flush_group(&self, group: &str) -> Result<(), TextError> {
        if let Some(cache) = &self.cache {
            cache.forget(&cache_key(group))?;
        }
        self.groups.remove(group);
        debug!(target: TARGET, "flushed group `{group}`");
        Ok(())
    }
}
