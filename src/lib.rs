//! Locale-aware URL generation and cached translation lookup.
//!
//! [`Translator`] wires the two engines to one [`LocaleRegistry`] built from
//! [`TranslatorConfig`]: [`TextResolver`] resolves `[locale.]group.needle`
//! references against a translation store, and [`UrlResolver`] builds
//! locale-prefixed URLs for named routes. Collaborators (store, external
//! cache, route registry, active-locale source) are injected at construction.
//!
//! ```
//! use std::sync::Arc;
//! use translator::{
//!     FixedLocale, MemoryStore, RouteDescriptor, RouteTable, TranslationRow, Translator,
//!     TranslatorConfig,
//! };
//!
//! let config = TranslatorConfig::from_toml_str(concat!(
//!     "available_locales = [\"en\", \"es\"]\n",
//!     "root_url = \"https://example.com\"\n",
//! ))
//! .expect("valid configuration");
//! let store = MemoryStore::from_rows([TranslationRow::new("blog", "title", "en", "Blog")]);
//! let routes: RouteTable = [RouteDescriptor::new("blog", "blog")].into_iter().collect();
//!
//! let translator = Translator::from_config(
//!     config,
//!     Arc::new(FixedLocale::new("es")),
//!     Arc::new(store),
//!     None,
//!     Arc::new(routes),
//! )
//! .expect("valid configuration");
//!
//! assert_eq!(translator.text("blog.title").expect("lookup").as_deref(), Some("Blog"));
//! assert_eq!(
//!     translator.route("blog").expect("route exists").as_deref(),
//!     Some("https://example.com/es/blog")
//! );
//! ```

pub mod config;

use std::sync::Arc;

pub use config::{CacheConfig, ConfigError, TranslatorConfig};
pub use translator_common::{
    ActiveLocale, FixedLocale, LocaleError, LocaleMap, LocaleRegistry, Replacements, SharedLocale,
    TranslatableSchema, TranslatedValue,
};
pub use translator_text::{
    ExternalCache, MemoryCache, MemoryStore, TextError, TextResolver, TranslationRow,
    TranslationStore,
};
pub use translator_url::{
    Fallback, LocalePermission, RequestContext, RouteDescriptor, RouteParameters, RouteRegistry,
    RouteTable, StaticRequest, UrlError, UrlResolver,
};

/// Both resolution engines sharing one locale registry.
#[derive(Debug)]
pub struct Translator {
    registry: Arc<LocaleRegistry>,
    text: TextResolver,
    urls: UrlResolver,
}

impl Translator {
    /// Builds both engines from `config`.
    ///
    /// Without a `cache`, loaded groups are only kept in-process regardless
    /// of the cache settings.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the locale settings are inconsistent or
    /// the root URL is unusable.
    pub fn from_config(
        config: TranslatorConfig,
        active: Arc<dyn ActiveLocale>,
        store: Arc<dyn TranslationStore>,
        cache: Option<Arc<dyn ExternalCache>>,
        routes: Arc<dyn RouteRegistry>,
    ) -> Result<Self, ConfigError> {
        let root = config.root()?;
        let registry = Arc::new(config.into_registry(active)?);

        let text = cache.map_or_else(
            || TextResolver::without_cache(Arc::clone(&registry), Arc::clone(&store)),
            |cache| TextResolver::new(Arc::clone(&registry), Arc::clone(&store), cache),
        );
        let urls = UrlResolver::new(Arc::clone(&registry), routes, root)?;

        Ok(Self {
            registry,
            text,
            urls,
        })
    }

    /// The shared locale registry.
    #[must_use]
    pub fn registry(&self) -> &LocaleRegistry {
        &self.registry
    }

    /// The text engine.
    #[must_use]
    pub const fn texts(&self) -> &TextResolver {
        &self.text
    }

    /// The URL engine.
    #[must_use]
    pub const fn urls(&self) -> &UrlResolver {
        &self.urls
    }

    /// Starts a translatable-field schema for the registry's locales.
    #[must_use]
    pub fn schema(&self) -> TranslatableSchema {
        TranslatableSchema::new(&self.registry)
    }

    /// Resolves `reference` with main-locale fallback and no replacements.
    ///
    /// # Errors
    ///
    /// Returns a [`TextError`] when the group cannot be loaded.
    pub fn text(&self, reference: &str) -> Result<Option<String>, TextError> {
        self.text.text(reference, &Replacements::new(), true)
    }

    /// Absolute URL of the route named `name` without parameters or fallback.
    ///
    /// # Errors
    ///
    /// Returns a [`UrlError`] when the route does not exist or needs
    /// parameters.
    pub fn route(&self, name: &str) -> Result<Option<String>, UrlError> {
        self.urls
            .route(name, &RouteParameters::new(), true, &Fallback::None)
    }
}
