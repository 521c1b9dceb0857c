//! Shared translator infrastructure: the locale registry, active-locale
//! sources, per-locale result maps, interval rules for pluralised text,
//! reference parsing, replacement substitution, and the translatable-field
//! schema used by model layers.

pub mod error;
pub mod interval;
pub mod locale;
pub mod reference;
pub mod replacements;
pub mod translatable;

pub use error::{IntervalError, LocaleError};
pub use interval::{Bound, Interval, IntervalRule, IntervalRules};
pub use locale::{
    ActiveLocale, FixedLocale, LocaleMap, LocaleRegistry, LocaleRegistryBuilder, SharedLocale,
    normalise_locale,
};
pub use reference::{RouteReference, TextReference};
pub use replacements::Replacements;
pub use translatable::{AttributeSource, FieldValue, TranslatableSchema, TranslatedValue};
