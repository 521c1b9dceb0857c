//! Placeholder substitution for resolved texts.

/// Ordered `:name` → value substitution rules.
///
/// Rules are applied in insertion order with literal substring replacement,
/// so a rule for `name` also rewrites the start of `:names`; callers that
/// need both should add the longer token first. Tokens without a rule stay
/// untouched.
///
/// ```
/// use translator_common::Replacements;
///
/// let rules = Replacements::from([("name", "John")]);
/// assert_eq!(rules.apply("Hello :name, you are :age"), "Hello John, you are :age");
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Replacements {
    rules: Vec<(String, String)>,
}

impl Replacements {
    /// Creates an empty rule set.
    #[must_use]
    pub const fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Adds a rule, returning the updated set.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(name, value);
        self
    }

    /// Adds a rule replacing `:name` with `value`.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.rules.push((name.into(), value.into()));
    }

    /// Whether no rule has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Applies every rule to `text` in insertion order.
    #[must_use]
    pub fn apply(&self, text: &str) -> String {
        self.rules
            .iter()
            .fold(text.to_owned(), |current, (name, value)| {
                current.replace(&format!(":{name}"), value)
            })
    }
}

impl<K, V> FromIterator<(K, V)> for Replacements
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            rules: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Replacements
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(rules: [(K, V); N]) -> Self {
        rules.into_iter().collect()
    }
}
