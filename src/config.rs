//! Translator configuration loaded from TOML.
//!
//! The file describes the locales an application serves, how each maps to a
//! URL prefix, the root URL generated links hang off, and whether loaded
//! translation groups are shared through the external cache. Every field is
//! optional; omitted values fall back to a single-locale English setup served
//! from `http://localhost`.
//!
//! ```toml
//! available_locales = ["en", "es", "fr"]
//! main_locale = "en"
//! prefix_main_locale = false
//! root_url = "https://example.com"
//!
//! [prefixes]
//! es = "espanol"
//!
//! [cache]
//! enabled = true
//! ttl_seconds = 300
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use serde::Deserialize;
use thiserror::Error;
use translator_common::{ActiveLocale, LocaleError, LocaleRegistry, normalise_locale};
use translator_url::UrlError;
use url::Url;

const TARGET: &str = "translator::config";
const DEFAULT_LOCALE: &str = "en";
const DEFAULT_ROOT_URL: &str = "http://localhost";

/// Errors raised while loading configuration or building from it.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration from {path}: {source}")]
    Read {
        /// File that was read.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid TOML for this schema.
    #[error("failed to parse configuration: {source}")]
    Parse {
        /// Parser error.
        #[source]
        source: Box<toml::de::Error>,
    },

    /// The locale settings are inconsistent.
    #[error("invalid locale settings: {0}")]
    Locale(#[from] LocaleError),

    /// `root_url` is not an absolute URL.
    #[error("invalid root URL `{url}`: {source}")]
    RootUrl {
        /// Configured value.
        url: String,
        /// Parser error.
        #[source]
        source: url::ParseError,
    },

    /// `root_url` parses but cannot be used as a base for generated paths.
    #[error(transparent)]
    InvalidRoot(#[from] UrlError),
}

/// Settings for the translator.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TranslatorConfig {
    /// Locale codes the application serves, in display order.
    pub available_locales: Vec<String>,
    /// Locale used when a translation is missing. Blank values fall back to
    /// `en`.
    pub main_locale: String,
    /// Whether the main locale's URLs carry a prefix too.
    pub prefix_main_locale: bool,
    /// Base of absolute URLs.
    pub root_url: String,
    /// URL prefixes for locales whose prefix differs from their code.
    pub prefixes: BTreeMap<String, String>,
    /// External cache settings for translation groups.
    pub cache: CacheConfig,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            available_locales: vec![DEFAULT_LOCALE.to_owned()],
            main_locale: DEFAULT_LOCALE.to_owned(),
            prefix_main_locale: false,
            root_url: DEFAULT_ROOT_URL.to_owned(),
            prefixes: BTreeMap::new(),
            cache: CacheConfig::default(),
        }
    }
}

/// External cache settings.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    /// Whether loaded groups are written to the external cache.
    pub enabled: bool,
    /// Lifetime of external cache entries, in seconds.
    #[serde(default = "CacheConfig::default_ttl_seconds")]
    pub ttl_seconds: u64,
}

impl CacheConfig {
    const fn default_ttl_seconds() -> u64 {
        300
    }

    /// Entry lifetime as a [`Duration`].
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_seconds: Self::default_ttl_seconds(),
        }
    }
}

impl TranslatorConfig {
    /// Parses configuration from TOML text.
    ///
    /// ```
    /// use translator::TranslatorConfig;
    ///
    /// let config = TranslatorConfig::from_toml_str("available_locales = [\"en\", \"es\"]\n")
    ///     .expect("valid configuration");
    /// assert_eq!(config.available_locales, ["en", "es"]);
    /// assert_eq!(config.main_locale(), "en");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown fields.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        toml::from_str(source).map_err(|error| ConfigError::Parse {
            source: Box::new(error),
        })
    }

    /// Reads and parses the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read and
    /// [`ConfigError::Parse`] when its contents are invalid.
    pub fn from_path(path: &Utf8Path) -> Result<Self, ConfigError> {
        debug!(target: TARGET, "reading configuration from {path}");
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Loads configuration for `path` through `loader`.
    ///
    /// Production code passes [`Self::from_path`]; tests inject a stub so no
    /// file has to exist.
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use translator::TranslatorConfig;
    ///
    /// let config = TranslatorConfig::load_with(Utf8Path::new("translator.toml"), |_| {
    ///     Ok(TranslatorConfig::default())
    /// })
    /// .expect("stub loader succeeds");
    /// assert_eq!(config.root_url, "http://localhost");
    /// ```
    ///
    /// # Errors
    ///
    /// Propagates the loader's error.
    pub fn load_with<F>(path: &Utf8Path, loader: F) -> Result<Self, ConfigError>
    where
        F: FnOnce(&Utf8Path) -> Result<Self, ConfigError>,
    {
        loader(path)
    }

    /// The main locale with surrounding whitespace removed.
    #[must_use]
    pub fn main_locale(&self) -> &str {
        normalise_locale(Some(self.main_locale.as_str())).unwrap_or(DEFAULT_LOCALE)
    }

    /// Parses [`root_url`](Self::root_url).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::RootUrl`] when the value is not an absolute URL.
    pub fn root(&self) -> Result<Url, ConfigError> {
        Url::parse(self.root_url.trim()).map_err(|source| ConfigError::RootUrl {
            url: self.root_url.clone(),
            source,
        })
    }

    /// Builds the locale registry, reading the current locale from `active`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Locale`] when the locale settings are
    /// inconsistent, for example a main locale that is not available.
    pub fn into_registry(self, active: Arc<dyn ActiveLocale>) -> Result<LocaleRegistry, ConfigError> {
        let main = self.main_locale().to_owned();
        let mut builder = LocaleRegistry::builder(self.available_locales, main)
            .prefix_main_locale(self.prefix_main_locale)
            .caching(self.cache.enabled)
            .cache_ttl(self.cache.ttl())
            .active_locale(active);
        for (locale, prefix) in self.prefixes {
            builder = builder.prefix(locale, prefix);
        }

        let registry = builder.build()?;
        debug!(
            target: TARGET,
            "serving {} locales with main locale `{}`",
            registry.available_locales().len(),
            registry.main_locale()
        );
        Ok(registry)
    }
}
