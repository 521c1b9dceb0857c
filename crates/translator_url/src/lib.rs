//! Locale-prefixed URLs for named routes.
//!
//! Routes are registered once with a locale-independent path template and
//! the set of locales they are served in. [`UrlResolver`] turns
//! `[locale.]route` names into URLs carrying the locale's path prefix,
//! negotiates a fallback locale when a route is not served in the requested
//! one, and rewrites the active request's path for locale switchers.

mod encoding;
mod error;
mod parameters;
mod request;
mod resolver;
mod route;
mod template;

pub use error::UrlError;
pub use parameters::RouteParameters;
pub use request::{RequestContext, StaticRequest};
pub use resolver::{Fallback, UrlResolver};
pub use route::{ALL_LOCALES, LocalePermission, RouteDescriptor, RouteRegistry, RouteTable};
