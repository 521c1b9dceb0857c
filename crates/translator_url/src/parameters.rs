//! Ordered route parameters.

/// Named values for route placeholders.
///
/// Values whose name matches a `{placeholder}` in the route's templates are
/// substituted; the rest become the query string, in insertion order.
///
/// ```
/// use translator_url::RouteParameters;
///
/// let params = RouteParameters::from([("slug", "hello"), ("page", "2")]);
/// assert_eq!(params.get("slug"), Some("hello"));
/// assert_eq!(params.get("missing"), None);
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RouteParameters {
    values: Vec<(String, String)>,
}

impl RouteParameters {
    /// Creates an empty parameter list.
    #[must_use]
    pub const fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Adds a parameter, returning the updated list.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(name, value);
        self
    }

    /// Adds a parameter. A later value for an existing name replaces it in place.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.values.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.values.push((name, value)),
        }
    }

    /// Value for `name`, if set.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Iterates over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Whether no parameter is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }
}

impl<K, V> FromIterator<(K, V)> for RouteParameters
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (name, value) in iter {
            params.push(name, value);
        }
        params
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for RouteParameters
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(values: [(K, V); N]) -> Self {
        values.into_iter().collect()
    }
}
