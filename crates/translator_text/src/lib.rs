//! Grouped translation lookup.
//!
//! Translations are stored as `(group, needle, locale, text)` rows behind a
//! [`TranslationStore`]. [`TextResolver`] turns `[locale.]group.needle`
//! references into text, falling back to the main locale when asked, and
//! keeps loaded groups in-process with an optional [`ExternalCache`] layer
//! shared between processes.

mod cache;
mod error;
mod resolver;
mod store;

pub use cache::{DEFAULT_MEMORY_CACHE_CAPACITY, ExternalCache, GroupCache, MemoryCache};
pub use error::{CacheError, StoreError, TextError};
pub use resolver::{CACHE_PREFIX, TextResolver, cache_key};
pub use store::{MemoryStore, TranslationRow, TranslationStore};
