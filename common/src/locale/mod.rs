//! Locale registry, active-locale sources, and per-locale result maps.
//!
//! The [`LocaleRegistry`] is built once from configuration and answers every
//! policy question the engines ask: which locales exist, which one is the
//! main fallback, and which URL segment each locale is served under. The
//! active locale is delegated to an [`ActiveLocale`] source so the registry
//! itself never changes after construction.

mod map;
mod registry;
mod selection;

pub use map::LocaleMap;
pub use registry::{DEFAULT_CACHE_TTL, LocaleRegistry, LocaleRegistryBuilder};
pub use selection::{ActiveLocale, FixedLocale, SharedLocale, normalise_locale};
