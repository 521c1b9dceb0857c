//! Error types for locale configuration and interval rule decoding.

use thiserror::Error;

/// Errors raised by the locale registry and its builder.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LocaleError {
    /// The locale code is not part of the available set.
    #[error("locale `{locale}` is not available")]
    UnknownLocale {
        /// The rejected locale code.
        locale: String,
    },

    /// The registry was configured without any locale.
    #[error("at least one available locale is required")]
    NoLocales,

    /// The same locale code was listed more than once.
    #[error("locale `{locale}` is listed more than once")]
    DuplicateLocale {
        /// The repeated locale code.
        locale: String,
    },

    /// The locale code does not parse as a language identifier.
    #[error("locale `{locale}` is not a valid language identifier")]
    InvalidLocale {
        /// The malformed locale code.
        locale: String,
    },

    /// The main locale is missing from the available set.
    #[error("main locale `{locale}` is not one of the available locales")]
    MainLocaleUnavailable {
        /// The configured main locale.
        locale: String,
    },

    /// A URL prefix is blank or contains a path separator.
    #[error("prefix `{prefix}` for locale `{locale}` must be a single non-empty path segment")]
    InvalidPrefix {
        /// Locale the prefix was declared for.
        locale: String,
        /// The rejected prefix.
        prefix: String,
    },

    /// Two locales were mapped to the same URL prefix.
    #[error("prefix `{prefix}` is shared by locales `{first}` and `{second}`")]
    DuplicatePrefix {
        /// The shared prefix.
        prefix: String,
        /// First locale using the prefix.
        first: String,
        /// Second locale using the prefix.
        second: String,
    },
}

/// Errors raised while decoding interval rules.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum IntervalError {
    /// A rule's interval prefix could not be decoded.
    #[error("malformed interval rule `{rule}`: {reason}")]
    MalformedRule {
        /// The offending rule text.
        rule: String,
        /// Description of the decoding failure.
        reason: String,
    },
}
