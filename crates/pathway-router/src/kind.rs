//! Route kinds and reserved targets
//!
//! The kind of a route is decided exactly once, when the route is built,
//! and travels with the route from then on. Nothing downstream compares
//! target strings to rediscover it.

/// Fixed target of the error-handler file (`_onError.*`)
pub const ERROR_TARGET: &str = "/_onError";

/// Fixed target of the not-found file (`_notFound.*`)
pub const NOT_FOUND_TARGET: &str = "/_notFound";

/// How a discovered route is registered with the routing engine
///
/// # Examples
///
/// ```
/// use pathway_router::RouteKind;
///
/// assert_eq!(RouteKind::for_dynamic_target("/_onError"), RouteKind::ErrorHandler);
/// assert_eq!(RouteKind::for_dynamic_target("/_notFound"), RouteKind::NotFound);
/// assert_eq!(RouteKind::for_dynamic_target("/users/:id"), RouteKind::Normal);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteKind {
    /// Ordinary handler module
    Normal,
    /// Handler installed in the engine's error slot
    ErrorHandler,
    /// Handler installed as the engine's not-found fallback
    NotFound,
    /// File that is not a handler module, served as-is
    Static,
}

impl RouteKind {
    /// Classifies a translated dynamic pattern
    ///
    /// Only meaningful for files the module loader accepted; unsupported
    /// files are always [`RouteKind::Static`].
    pub fn for_dynamic_target(target: &str) -> Self {
        match target {
            ERROR_TARGET => Self::ErrorHandler,
            NOT_FOUND_TARGET => Self::NotFound,
            _ => Self::Normal,
        }
    }

    /// Lower-case label used in logs and CLI output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::ErrorHandler => "error",
            Self::NotFound => "not-found",
            Self::Static => "static",
        }
    }

    /// Whether this kind also occupies one of the engine's dedicated slots
    pub fn is_special(&self) -> bool {
        matches!(self, Self::ErrorHandler | Self::NotFound)
    }
}

impl std::fmt::Display for RouteKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
