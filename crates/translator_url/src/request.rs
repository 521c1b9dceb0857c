//! The slice of the active request that URL switching needs.

use crate::route::RouteDescriptor;

/// Read access to the request being served.
pub trait RequestContext {
    /// Request path without scheme, host, or query.
    fn path(&self) -> &str;

    /// Route the request matched, if any. Error pages match none.
    fn matched_route(&self) -> Option<&RouteDescriptor>;
}

/// Fixed [`RequestContext`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StaticRequest {
    path: String,
    route: Option<RouteDescriptor>,
}

impl StaticRequest {
    /// A request for `path` that matched no route.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            route: None,
        }
    }

    /// Marks the request as matched by `route`.
    #[must_use]
    pub fn with_route(mut self, route: RouteDescriptor) -> Self {
        self.route = Some(route);
        self
    }
}

impl RequestContext for StaticRequest {
    fn path(&self) -> &str {
        &self.path
    }

    fn matched_route(&self) -> Option<&RouteDescriptor> {
        self.route.as_ref()
    }
}
