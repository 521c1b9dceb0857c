//! Locale-aware URLs for named routes and the active request.
//!
//! Every generated path is `/{locale prefix}/{route path}`, with the prefix
//! omitted for an unprefixed main locale. Absolute URLs are joined to the
//! configured root (or the route's own domain); relative URLs are
//! root-relative and always begin with `/`.

use std::fmt;
use std::sync::Arc;

use log::debug;
use translator_common::{LocaleMap, LocaleRegistry, RouteReference};
use url::{Position, Url, form_urlencoded};

use crate::encoding;
use crate::error::UrlError;
use crate::parameters::RouteParameters;
use crate::request::RequestContext;
use crate::route::{RouteDescriptor, RouteRegistry};
use crate::template::Template;

const TARGET: &str = "translator::url";

/// What to do when a route is not served in the requested locale.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum Fallback {
    /// Yield no URL.
    #[default]
    None,
    /// Try the current locale instead.
    Current,
    /// Try the given locale instead.
    Locale(String),
}

/// Generates locale-prefixed URLs.
pub struct UrlResolver {
    registry: Arc<LocaleRegistry>,
    routes: Arc<dyn RouteRegistry>,
    root: Url,
}

impl fmt::Debug for UrlResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UrlResolver")
            .field("registry", &self.registry)
            .field("root", &self.root.as_str())
            .finish_non_exhaustive()
    }
}

impl UrlResolver {
    /// Creates a resolver generating URLs under `root`.
    ///
    /// # Errors
    ///
    /// Returns [`UrlError::InvalidUrl`] when `root` cannot carry a path,
    /// such as `mailto:` URLs.
    pub fn new(
        registry: Arc<LocaleRegistry>,
        routes: Arc<dyn RouteRegistry>,
        root: Url,
    ) -> Result<Self, UrlError> {
        if root.cannot_be_a_base() {
            return Err(UrlError::InvalidUrl {
                url: root.into(),
                reason: "the root URL must have a host and path".to_owned(),
            });
        }
        Ok(Self {
            registry,
            routes,
            root,
        })
    }

    /// The registry locales are resolved against.
    #[must_use]
    pub fn registry(&self) -> &LocaleRegistry {
        &self.registry
    }

    /// The root URL absolute URLs are joined to.
    #[must_use]
    pub const fn root(&self) -> &Url {
        &self.root
    }

    /// URL of the route named by `name` (`[locale.]route`).
    ///
    /// Only the first dot separates the locale. When the route is not served
    /// in that locale, `fallback` decides which locale to try next; if none
    /// is permitted the result is `Ok(None)`.
    ///
    /// ```
    /// use std::sync::Arc;
    /// use translator_common::LocaleRegistry;
    /// use translator_url::{Fallback, RouteDescriptor, RouteParameters, RouteTable, UrlResolver};
    /// use url::Url;
    ///
    /// let registry = LocaleRegistry::builder(["en", "es"], "en").build().expect("valid");
    /// let routes: RouteTable = [RouteDescriptor::new("blog.show", "blog/{slug}")].into_iter().collect();
    /// let root = Url::parse("https://example.com").expect("valid root");
    /// let urls = UrlResolver::new(Arc::new(registry), Arc::new(routes), root).expect("valid root");
    ///
    /// let url = urls
    ///     .route("es.blog.show", &RouteParameters::from([("slug", "hola"), ("page", "2")]), false, &Fallback::None)
    ///     .expect("route exists");
    /// assert_eq!(url.as_deref(), Some("/es/blog/hola?page=2"));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`UrlError::RouteNotFound`] for unknown routes and
    /// [`UrlError::MissingParameter`] when a required placeholder has no value.
    pub fn route(
        &self,
        name: &str,
        parameters: &RouteParameters,
        absolute: bool,
        fallback: &Fallback,
    ) -> Result<Option<String>, UrlError> {
        let reference = RouteReference::parse(name, || self.registry.current_locale());
        let route = self.lookup(reference.name())?;

        let Some(locale) = self.negotiate(&route, reference.locale(), fallback) else {
            debug!(
                target: TARGET,
                "route `{}` is not served in `{}`",
                route.name(),
                reference.locale()
            );
            return Ok(None);
        };

        self.build(&route, &locale, parameters, absolute).map(Some)
    }

    /// URLs of `route_name` in every available locale.
    ///
    /// # Errors
    ///
    /// Returns [`UrlError::RouteNotFound`] for unknown routes and
    /// [`UrlError::MissingParameter`] when a required placeholder has no value.
    pub fn routes(
        &self,
        route_name: &str,
        parameters: &RouteParameters,
        absolute: bool,
    ) -> Result<LocaleMap<String>, UrlError> {
        let route = self.lookup(route_name)?;
        let mut urls = self.registry.locale_map();
        for locale in self.registry.available_locales() {
            if self.has_route_locale(&route, locale) {
                let url = self.build(&route, locale, parameters, absolute)?;
                urls.set(locale, url);
            }
        }
        Ok(urls)
    }

    /// The active request's URL in `locale`.
    ///
    /// Without a locale, or for the current locale, the request path is
    /// returned as is. Requests that matched a route yield `Ok(None)` when the
    /// route is not served in `locale`; unmatched requests (error pages) are
    /// localized unconditionally.
    ///
    /// # Errors
    ///
    /// Returns [`UrlError::UnknownLocale`] when `locale` is not available.
    pub fn current(
        &self,
        request: &dyn RequestContext,
        locale: Option<&str>,
        absolute: bool,
    ) -> Result<Option<String>, UrlError> {
        let path = request.path();
        let Some(target) = locale.filter(|target| *target != self.registry.current_locale()) else {
            if !absolute {
                return Ok(Some(path.to_owned()));
            }
            let separator = if path.starts_with('/') { "" } else { "/" };
            return Ok(Some(format!(
                "{}{separator}{path}",
                self.origin_and_mount(&self.root)
            )));
        };

        if let Some(route) = request.matched_route()
            && !self.has_route_locale(route, target)
        {
            return Ok(None);
        }

        self.localize(path, target, absolute, true).map(Some)
    }

    /// [`current`](Self::current) for every available locale.
    ///
    /// # Errors
    ///
    /// Propagates the first error of [`current`](Self::current).
    pub fn current_all(
        &self,
        request: &dyn RequestContext,
        absolute: bool,
    ) -> Result<LocaleMap<String>, UrlError> {
        let mut urls = self.registry.locale_map();
        for locale in self.registry.available_locales() {
            if let Some(url) = self.current(request, Some(locale), absolute)? {
                urls.set(locale, url);
            }
        }
        Ok(urls)
    }

    /// Whether `route` is granted `locale` and `locale` is available.
    #[must_use]
    pub fn has_route_locale(&self, route: &RouteDescriptor, locale: &str) -> bool {
        route.locales().permits(locale) && self.registry.is_available(locale)
    }

    /// [`has_route_locale`](Self::has_route_locale) by route name; `false`
    /// for unknown routes.
    #[must_use]
    pub fn has_locale(&self, route_name: &str, locale: &str) -> bool {
        self.routes
            .route_by_name(route_name)
            .is_some_and(|route| self.has_route_locale(&route, locale))
    }

    /// Rewrites `uri` for `locale`.
    ///
    /// With `uri_has_prefix`, a leading segment naming a known locale prefix
    /// is replaced; any other URI gets the target prefix prepended. Query
    /// strings are kept. Applying the same locale twice changes nothing.
    ///
    /// ```
    /// use std::sync::Arc;
    /// use translator_common::LocaleRegistry;
    /// use translator_url::{RouteTable, UrlResolver};
    /// use url::Url;
    ///
    /// let registry = LocaleRegistry::builder(["en", "es"], "en").build().expect("valid");
    /// let root = Url::parse("https://example.com").expect("valid root");
    /// let urls = UrlResolver::new(Arc::new(registry), Arc::new(RouteTable::new()), root)
    ///     .expect("valid root");
    ///
    /// assert_eq!(urls.localize("/es/blog?page=2", "en", false, true).expect("en"), "/blog?page=2");
    /// assert_eq!(urls.localize("/blog", "es", true, true).expect("es"), "https://example.com/es/blog");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`UrlError::UnknownLocale`] when `locale` is not available.
    pub fn localize(
        &self,
        uri: &str,
        locale: &str,
        absolute: bool,
        uri_has_prefix: bool,
    ) -> Result<String, UrlError> {
        let target = self.registry.prefix_for(locale)?;
        let relative = self.strip_root(uri);
        let (path, query) = split_query(&relative);
        let trimmed = path.trim_matches('/');

        let base = match trimmed.split_once('/') {
            _ if !uri_has_prefix => trimmed,
            Some((first, rest)) if self.registry.locale_for_prefix(first).is_some() => rest,
            None if self.registry.locale_for_prefix(trimmed).is_some() => "",
            _ => trimmed,
        };

        Ok(self.assemble(&self.root, &join_path([target, base]), query, absolute))
    }

    fn lookup(&self, name: &str) -> Result<RouteDescriptor, UrlError> {
        self.routes
            .route_by_name(name)
            .ok_or_else(|| UrlError::RouteNotFound {
                name: name.to_owned(),
            })
    }

    fn negotiate(
        &self,
        route: &RouteDescriptor,
        requested: &str,
        fallback: &Fallback,
    ) -> Option<String> {
        if self.has_route_locale(route, requested) {
            return Some(requested.to_owned());
        }

        let candidate = match fallback {
            Fallback::None => return None,
            Fallback::Current => self.registry.current_locale(),
            Fallback::Locale(code) => code.clone(),
        };
        if !self.has_route_locale(route, &candidate) {
            return None;
        }
        debug!(
            target: TARGET,
            "route `{}` falls back from `{requested}` to `{candidate}`",
            route.name()
        );
        Some(candidate)
    }

    fn build(
        &self,
        route: &RouteDescriptor,
        locale: &str,
        parameters: &RouteParameters,
        absolute: bool,
    ) -> Result<String, UrlError> {
        let prefix = self.registry.prefix_for(locale)?;
        let path_template = Template::parse(route.path());
        let path = path_template.render(route.name(), parameters, encoding::parameter)?;

        let domain_template = route.domain().map(Template::parse);
        let base = match &domain_template {
            Some(template) => {
                let host = template.render(route.name(), parameters, str::to_owned)?;
                domain_base(&self.root, &host)?
            }
            None => self.root.clone(),
        };

        let consumed: Vec<&str> = domain_template
            .iter()
            .flat_map(Template::placeholders)
            .chain(path_template.placeholders())
            .collect();
        let mut query = form_urlencoded::Serializer::new(String::new());
        for (name, value) in parameters.iter() {
            if !consumed.contains(&name) {
                query.append_pair(name, value);
            }
        }
        let query = query.finish();

        let app_path = join_path([prefix, path.as_str()]);
        debug!(target: TARGET, "built `{}` for `{locale}`: {app_path}", route.name());
        Ok(self.assemble(&base, &app_path, Some(&query), absolute))
    }

    /// Joins `app_path` and `query` to `base`, keeping the root's own path
    /// in absolute URLs only.
    ///
    /// The path is written as given rather than through [`Url::set_path`],
    /// which would resolve dot segments and backslashes in encoded values.
    fn assemble(&self, base: &Url, app_path: &str, query: Option<&str>, absolute: bool) -> String {
        let mut tail = encoding::path(&normalise_path(app_path)).into_owned();
        if let Some(query) = query.filter(|query| !query.is_empty()) {
            tail.push('?');
            tail.push_str(&encoding::query(query));
        }

        if absolute {
            format!("{}{tail}", self.origin_and_mount(base))
        } else {
            tail
        }
    }

    /// Scheme, authority and, for the root's origin, the mount path of `base`.
    fn origin_and_mount(&self, base: &Url) -> String {
        format!("{}{}", &base[..Position::BeforePath], self.mount_path(base))
    }

    /// Path the application is mounted under when `base` is the root URL.
    fn mount_path(&self, base: &Url) -> String {
        if base.origin() == self.root.origin() {
            self.root.path().trim_end_matches('/').to_owned()
        } else {
            String::new()
        }
    }

    /// Reduces absolute URLs on the root's origin to their path and query.
    fn strip_root(&self, uri: &str) -> String {
        match Url::parse(uri) {
            Ok(parsed) if parsed.origin() == self.root.origin() => {
                let mount = self.mount_path(&parsed);
                let tail = &parsed[Position::BeforePath..Position::AfterQuery];
                tail.strip_prefix(mount.as_str()).unwrap_or(tail).to_owned()
            }
            _ => uri.to_owned(),
        }
    }
}

fn split_query(uri: &str) -> (&str, Option<&str>) {
    match uri.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (uri, None),
    }
}

fn join_path<'a>(segments: impl IntoIterator<Item = &'a str>) -> String {
    let joined: Vec<&str> = segments
        .into_iter()
        .flat_map(|segment| segment.split('/'))
        .filter(|segment| !segment.is_empty())
        .collect();
    format!("/{}", joined.join("/"))
}

fn normalise_path(path: &str) -> String {
    join_path([path])
}

fn domain_base(root: &Url, host: &str) -> Result<Url, UrlError> {
    let candidate = format!("{}://{host}", root.scheme());
    Url::parse(&candidate).map_err(|error| UrlError::InvalidUrl {
        url: candidate,
        reason: error.to_string(),
    })
}

#[cfg(test)]
mod tests;
