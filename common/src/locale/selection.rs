//! Sources for the locale that is active for the current unit of work.
//!
//! The surrounding framework decides which locale a request runs under; the
//! engines only ever ask an [`ActiveLocale`] for the answer. Two sources ship
//! with the crate: [`FixedLocale`] for services pinned to one locale and
//! [`SharedLocale`] for servers that switch the locale per request.

use std::sync::{Arc, PoisonError, RwLock};

use log::debug;

/// Supplies the locale code that lookups without an explicit locale use.
pub trait ActiveLocale: Send + Sync {
    /// Returns the active locale code.
    fn current_locale(&self) -> String;
}

/// Active-locale source that never changes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FixedLocale {
    locale: String,
}

impl FixedLocale {
    /// Creates a source that always reports `locale`.
    ///
    /// ```
    /// use translator_common::{ActiveLocale, FixedLocale};
    ///
    /// let source = FixedLocale::new("es");
    /// assert_eq!(source.current_locale(), "es");
    /// ```
    #[must_use]
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
        }
    }
}

impl ActiveLocale for FixedLocale {
    fn current_locale(&self) -> String {
        self.locale.clone()
    }
}

/// Switchable active-locale source shared between a request handler and the
/// engines.
///
/// Clones share the same slot, so a middleware can call [`SharedLocale::set`]
/// while the engines hold another clone.
#[derive(Clone, Debug)]
pub struct SharedLocale {
    slot: Arc<RwLock<String>>,
}

impl SharedLocale {
    /// Creates a shared source starting at `locale`.
    #[must_use]
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(RwLock::new(locale.into())),
        }
    }

    /// Switches the active locale for every clone of this source.
    ///
    /// Blank values are ignored so a missing request header cannot clear the
    /// active locale.
    pub fn set(&self, locale: &str) {
        let Some(candidate) = normalise_locale(Some(locale)) else {
            debug!(target: "translator::locale", "ignoring blank active locale");
            return;
        };

        let mut guard = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        candidate.clone_into(&mut guard);
    }
}

impl ActiveLocale for SharedLocale {
    fn current_locale(&self) -> String {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Trim whitespace and discard empty locale candidates.
#[must_use]
pub fn normalise_locale(input: Option<&str>) -> Option<&str> {
    input
        .map(str::trim)
        .and_then(|value| if value.is_empty() { None } else { Some(value) })
}
