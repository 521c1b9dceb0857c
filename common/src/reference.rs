//! Parsing of dotted `locale.group.needle` and `locale.route` references.

use crate::locale::LocaleRegistry;

/// A translation reference split into its optional locale, group, and needle.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TextReference {
    locale: Option<String>,
    group: String,
    needle: String,
}

impl TextReference {
    /// Parses `[locale.]group.needle`.
    ///
    /// The leading segment is read as a locale only when it names an
    /// available locale. Whatever remains must still contain a group and a
    /// needle; otherwise there is nothing to resolve and `None` is returned.
    /// Dots after the group belong to the needle.
    ///
    /// ```
    /// use translator_common::{LocaleRegistry, TextReference};
    ///
    /// let registry = LocaleRegistry::builder(["en", "es"], "en").build().expect("valid");
    ///
    /// let explicit = TextReference::parse("es.blog.title", &registry).expect("reference");
    /// assert_eq!(explicit.locale(), Some("es"));
    /// assert_eq!(explicit.group(), "blog");
    /// assert_eq!(explicit.needle(), "title");
    ///
    /// assert!(TextReference::parse("es.blog", &registry).is_none());
    /// ```
    #[must_use]
    pub fn parse(input: &str, registry: &LocaleRegistry) -> Option<Self> {
        let trimmed = input.trim();
        let (locale, remainder) = match trimmed.split_once('.') {
            Some((head, rest)) if registry.is_available(head) => (Some(head), rest),
            _ => (None, trimmed),
        };

        let (group, needle) = remainder.split_once('.')?;
        if group.is_empty() || needle.is_empty() {
            return None;
        }

        Some(Self {
            locale: locale.map(str::to_owned),
            group: group.to_owned(),
            needle: needle.to_owned(),
        })
    }

    /// Explicit locale, when the reference carried one.
    #[must_use]
    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    /// Group name.
    #[must_use]
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Needle within the group.
    #[must_use]
    pub fn needle(&self) -> &str {
        &self.needle
    }
}

/// A route reference split into locale and route name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RouteReference {
    locale: String,
    name: String,
}

impl RouteReference {
    /// Parses `[locale.]route`.
    ///
    /// Only the first dot separates the locale; any further dots are part of
    /// the route name. Without a dot the route is resolved for
    /// `current_locale`.
    ///
    /// ```
    /// use translator_common::RouteReference;
    ///
    /// let reference = RouteReference::parse("es.blog.show", || "en".to_owned());
    /// assert_eq!(reference.locale(), "es");
    /// assert_eq!(reference.name(), "blog.show");
    ///
    /// let implicit = RouteReference::parse("home", || "en".to_owned());
    /// assert_eq!(implicit.locale(), "en");
    /// assert_eq!(implicit.name(), "home");
    /// ```
    #[must_use]
    pub fn parse(input: &str, current_locale: impl FnOnce() -> String) -> Self {
        match input.split_once('.') {
            Some((locale, name)) => Self {
                locale: locale.to_owned(),
                name: name.to_owned(),
            },
            None => Self {
                locale: current_locale(),
                name: input.to_owned(),
            },
        }
    }

    /// Locale the route is requested in.
    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Route name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}
