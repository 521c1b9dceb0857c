use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use log::debug;
use unic_langid::LanguageIdentifier;

use super::{ActiveLocale, FixedLocale, LocaleMap};
use crate::error::LocaleError;

/// Lifetime of group entries written to the external cache unless configured.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Process-wide locale configuration.
///
/// Holds the available locales in configured order, the main locale, the
/// effective URL prefix of every locale, and the caching policy. The registry
/// is immutable once built; only the [`ActiveLocale`] it delegates to may
/// change between requests.
#[derive(Clone)]
pub struct LocaleRegistry {
    available: Vec<String>,
    main: String,
    prefixes: Vec<String>,
    prefix_main: bool,
    caching: bool,
    cache_ttl: Duration,
    active: Arc<dyn ActiveLocale>,
}

impl LocaleRegistry {
    /// Starts building a registry for `available` locales with `main` as the
    /// fallback locale.
    ///
    /// ```
    /// use translator_common::LocaleRegistry;
    ///
    /// let registry = LocaleRegistry::builder(["en", "es"], "en")
    ///     .prefix("es", "espanol")
    ///     .build()
    ///     .expect("valid locale configuration");
    ///
    /// assert_eq!(registry.prefix_for("es").expect("es is available"), "espanol");
    /// assert_eq!(registry.prefix_for("en").expect("en is available"), "");
    /// ```
    pub fn builder<I, S>(available: I, main: impl Into<String>) -> LocaleRegistryBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        LocaleRegistryBuilder {
            available: available.into_iter().map(Into::into).collect(),
            main: main.into(),
            prefixes: Vec::new(),
            prefix_main: false,
            caching: true,
            cache_ttl: DEFAULT_CACHE_TTL,
            active: None,
        }
    }

    /// Returns the available locales in configured order.
    #[must_use]
    pub fn available_locales(&self) -> &[String] {
        &self.available
    }

    /// Returns the main (fallback) locale.
    #[must_use]
    pub fn main_locale(&self) -> &str {
        &self.main
    }

    /// Returns the locale active for the current unit of work.
    #[must_use]
    pub fn current_locale(&self) -> String {
        self.active.current_locale()
    }

    /// Whether `code` is the main locale.
    #[must_use]
    pub fn is_main_locale(&self, code: &str) -> bool {
        self.main == code
    }

    /// Whether `code` is one of the available locales.
    #[must_use]
    pub fn is_available(&self, code: &str) -> bool {
        self.position(code).is_some()
    }

    /// Whether the main locale still receives a URL prefix.
    #[must_use]
    pub const fn prefixing_main_locale(&self) -> bool {
        self.prefix_main
    }

    /// Returns the URL segment for `code`; empty for an unprefixed main locale.
    ///
    /// # Errors
    ///
    /// Returns [`LocaleError::UnknownLocale`] when `code` is not available.
    pub fn prefix_for(&self, code: &str) -> Result<&str, LocaleError> {
        self.position(code)
            .and_then(|index| self.prefixes.get(index))
            .map(String::as_str)
            .ok_or_else(|| LocaleError::UnknownLocale {
                locale: code.to_owned(),
            })
    }

    /// Returns the locale whose non-empty prefix equals `segment`.
    #[must_use]
    pub fn locale_for_prefix(&self, segment: &str) -> Option<&str> {
        if segment.is_empty() {
            return None;
        }
        self.available
            .iter()
            .zip(&self.prefixes)
            .find(|(_, prefix)| prefix.as_str() == segment)
            .map(|(locale, _)| locale.as_str())
    }

    /// Whether group lookups may use the external cache.
    #[must_use]
    pub const fn caching_enabled(&self) -> bool {
        self.caching
    }

    /// Lifetime of entries written to the external cache.
    #[must_use]
    pub const fn cache_ttl(&self) -> Duration {
        self.cache_ttl
    }

    /// Creates a map with one empty entry per available locale.
    #[must_use]
    pub fn locale_map<T>(&self) -> LocaleMap<T> {
        LocaleMap::empty(self.available.iter().cloned())
    }

    fn position(&self, code: &str) -> Option<usize> {
        self.available.iter().position(|locale| locale == code)
    }
}

impl fmt::Debug for LocaleRegistry {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("LocaleRegistry")
            .field("available", &self.available)
            .field("main", &self.main)
            .field("prefixes", &self.prefixes)
            .field("prefix_main", &self.prefix_main)
            .field("caching", &self.caching)
            .field("cache_ttl", &self.cache_ttl)
            .finish_non_exhaustive()
    }
}

/// Builder validating locale configuration before a [`LocaleRegistry`] exists.
#[must_use]
pub struct LocaleRegistryBuilder {
    available: Vec<String>,
    main: String,
    prefixes: Vec<(String, String)>,
    prefix_main: bool,
    caching: bool,
    cache_ttl: Duration,
    active: Option<Arc<dyn ActiveLocale>>,
}

impl LocaleRegistryBuilder {
    /// Maps `locale` to a URL prefix other than its own code.
    pub fn prefix(mut self, locale: impl Into<String>, prefix: impl Into<String>) -> Self {
        self.prefixes.push((locale.into(), prefix.into()));
        self
    }

    /// Whether the main locale keeps its prefix in generated URLs.
    pub fn prefix_main_locale(mut self, enabled: bool) -> Self {
        self.prefix_main = enabled;
        self
    }

    /// Whether translation groups are mirrored into the external cache.
    pub fn caching(mut self, enabled: bool) -> Self {
        self.caching = enabled;
        self
    }

    /// Lifetime of external cache entries.
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Source consulted for the active locale; defaults to the main locale.
    pub fn active_locale(mut self, source: Arc<dyn ActiveLocale>) -> Self {
        self.active = Some(source);
        self
    }

    /// Validates the configuration and builds the registry.
    ///
    /// # Errors
    ///
    /// Returns a [`LocaleError`] when the locale list is empty or repeats a
    /// code, a code is not a language identifier, the main locale is not
    /// available, or a prefix is malformed, unknown, or shared.
    pub fn build(self) -> Result<LocaleRegistry, LocaleError> {
        validate_locales(&self.available)?;

        if !self.available.contains(&self.main) {
            return Err(LocaleError::MainLocaleUnavailable { locale: self.main });
        }

        let prefixes = self.effective_prefixes()?;
        ensure_unique_prefixes(&self.available, &prefixes)?;

        debug!(
            target: "translator::locale",
            "registry ready with locales {:?}, main `{}`",
            self.available,
            self.main,
        );

        let active = self
            .active
            .unwrap_or_else(|| Arc::new(FixedLocale::new(self.main.clone())));

        Ok(LocaleRegistry {
            available: self.available,
            main: self.main,
            prefixes,
            prefix_main: self.prefix_main,
            caching: self.caching,
            cache_ttl: self.cache_ttl,
            active,
        })
    }

    fn effective_prefixes(&self) -> Result<Vec<String>, LocaleError> {
        for (locale, prefix) in &self.prefixes {
            if !self.available.contains(locale) {
                return Err(LocaleError::UnknownLocale {
                    locale: locale.clone(),
                });
            }
            let segment = prefix.trim().trim_matches('/');
            if segment.is_empty() || segment.contains('/') {
                return Err(LocaleError::InvalidPrefix {
                    locale: locale.clone(),
                    prefix: prefix.clone(),
                });
            }
        }

        Ok(self
            .available
            .iter()
            .map(|locale| {
                if *locale == self.main && !self.prefix_main {
                    return String::new();
                }
                self.prefixes
                    .iter()
                    .rev()
                    .find(|(declared, _)| declared == locale)
                    .map_or_else(
                        || locale.clone(),
                        |(_, prefix)| prefix.trim().trim_matches('/').to_owned(),
                    )
            })
            .collect())
    }
}

fn validate_locales(available: &[String]) -> Result<(), LocaleError> {
    if available.is_empty() {
        return Err(LocaleError::NoLocales);
    }

    let mut seen = HashSet::new();
    for locale in available {
        if locale.parse::<LanguageIdentifier>().is_err() {
            return Err(LocaleError::InvalidLocale {
                locale: locale.clone(),
            });
        }
        if !seen.insert(locale.as_str()) {
            return Err(LocaleError::DuplicateLocale {
                locale: locale.clone(),
            });
        }
    }
    Ok(())
}

fn ensure_unique_prefixes(available: &[String], prefixes: &[String]) -> Result<(), LocaleError> {
    for (index, prefix) in prefixes.iter().enumerate() {
        if prefix.is_empty() {
            continue;
        }
        let clash = prefixes
            .iter()
            .enumerate()
            .skip(index + 1)
            .find(|(_, other)| *other == prefix);
        if let Some((other_index, _)) = clash {
            return Err(LocaleError::DuplicatePrefix {
                prefix: prefix.clone(),
                first: available.get(index).cloned().unwrap_or_default(),
                second: available.get(other_index).cloned().unwrap_or_default(),
            });
        }
    }
    Ok(())
}
