//! Error types for URL generation.
//!
//! A route that exists but is not served in a locale is not an error; the
//! resolver reports it as `Ok(None)`. These variants cover caller bugs and
//! URLs that cannot be assembled.

use thiserror::Error;
use translator_common::LocaleError;

/// Errors surfaced by [`UrlResolver`](crate::UrlResolver) operations.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum UrlError {
    /// No route is registered under the requested name.
    #[error("route `{name}` is not defined")]
    RouteNotFound {
        /// Name that was looked up.
        name: String,
    },

    /// A required path or domain parameter had no value.
    #[error("route `{route}` requires parameter `{parameter}`")]
    MissingParameter {
        /// Route being generated.
        route: String,
        /// Parameter without a value.
        parameter: String,
    },

    /// The target locale is not available.
    #[error(transparent)]
    UnknownLocale(#[from] LocaleError),

    /// The root URL or a route domain does not form a valid URL.
    #[error("invalid URL `{url}`: {reason}")]
    InvalidUrl {
        /// The offending URL text.
        url: String,
        /// Parser message.
        reason: String,
    },
}
