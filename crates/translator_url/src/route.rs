//! Route descriptors and the registry they are looked up in.

use std::collections::{BTreeSet, HashMap};

use crate::template::Template;

/// Token that grants a route to every locale when it appears in a
/// permission list.
pub const ALL_LOCALES: &str = "all";

/// Locales a route can be served in.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LocalePermission {
    /// Every available locale.
    All,
    /// Only the listed locales.
    Only(BTreeSet<String>),
}

impl LocalePermission {
    /// Permission for exactly `locales`.
    pub fn only<I, S>(locales: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Only(locales.into_iter().map(Into::into).collect())
    }

    /// Reads a permission list where the [`ALL_LOCALES`] token grants every
    /// locale.
    ///
    /// ```
    /// use translator_url::LocalePermission;
    ///
    /// assert_eq!(LocalePermission::from_tokens(["es", "all"]), LocalePermission::All);
    /// assert!(LocalePermission::from_tokens(["es"]).permits("es"));
    /// assert!(!LocalePermission::from_tokens(["es"]).permits("en"));
    /// ```
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let locales: BTreeSet<String> = tokens.into_iter().map(Into::into).collect();
        if locales.contains(ALL_LOCALES) {
            Self::All
        } else {
            Self::Only(locales)
        }
    }

    /// Whether `locale` is granted. Availability is checked separately by the
    /// resolver.
    #[must_use]
    pub fn permits(&self, locale: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(locales) => locales.contains(locale),
        }
    }
}

/// A named route as registered by the host framework.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RouteDescriptor {
    name: String,
    path: String,
    domain: Option<String>,
    locales: LocalePermission,
}

impl RouteDescriptor {
    /// Creates a route served in every locale at `path`.
    ///
    /// `path` is the locale-independent part of the URL; placeholders are
    /// written `{name}` or `{name?}` when optional.
    #[must_use]
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            domain: None,
            locales: LocalePermission::All,
        }
    }

    /// Serves the route on `domain`, which may contain placeholders.
    #[must_use]
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Restricts the locales the route is served in.
    #[must_use]
    pub fn with_locales(mut self, locales: LocalePermission) -> Self {
        self.locales = locales;
        self
    }

    /// Route name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path template.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Domain template, when the route has one.
    #[must_use]
    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    /// Locales the route is granted for.
    #[must_use]
    pub const fn locales(&self) -> &LocalePermission {
        &self.locales
    }

    /// Placeholder names, domain first, in order of appearance.
    ///
    /// ```
    /// use translator_url::RouteDescriptor;
    ///
    /// let route = RouteDescriptor::new("blog.show", "blog/{slug}/{page?}")
    ///     .with_domain("{account}.example.com");
    /// assert_eq!(route.parameters(), ["account", "slug", "page"]);
    /// ```
    #[must_use]
    pub fn parameters(&self) -> Vec<String> {
        let domain = self.domain.as_deref().map(Template::parse);
        let path = Template::parse(&self.path);
        domain
            .iter()
            .flat_map(Template::placeholders)
            .chain(path.placeholders())
            .map(str::to_owned)
            .collect()
    }
}

/// Lookup of routes by name.
#[cfg_attr(test, mockall::automock)]
pub trait RouteRegistry: Send + Sync {
    /// Returns the route registered as `name`.
    fn route_by_name(&self, name: &str) -> Option<RouteDescriptor>;
}

/// In-memory [`RouteRegistry`].
#[derive(Clone, Debug, Default)]
pub struct RouteTable {
    routes: HashMap<String, RouteDescriptor>,
}

impl RouteTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `route`, returning any route it replaced.
    pub fn insert(&mut self, route: RouteDescriptor) -> Option<RouteDescriptor> {
        self.routes.insert(route.name().to_owned(), route)
    }

    /// Number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether no route is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl FromIterator<RouteDescriptor> for RouteTable {
    fn from_iter<I: IntoIterator<Item = RouteDescriptor>>(iter: I) -> Self {
        let mut table = Self::new();
        for route in iter {
            table.insert(route);
        }
        table
    }
}

impl RouteRegistry for RouteTable {
    fn route_by_name(&self, name: &str) -> Option<RouteDescriptor> {
        self.routes.get(name).cloned()
    }
}
