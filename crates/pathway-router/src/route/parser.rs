//! Pattern parsing for route files
//!
//! Pure functional parsers that transform relative file paths into route patterns.
//! All functions are **pure**: same input → same output, no side effects.

use super::segment::{classify_segment, strip_extension, SegmentType};
use crate::path::{normalize_path, segments};
use crate::TranslatorConfig;

/// Internal state accumulator for fold-based parsing
///
/// All mutations are local to the fold accumulator. Each builder method
/// consumes and returns Self, enabling functional chaining.
#[derive(Default)]
struct ParseState {
    pattern: String,
    reserved: Option<&'static str>,
}

impl ParseState {
    /// Adds a literal segment to the pattern
    fn with_static_segment(mut self, segment: &str) -> Self {
        self.pattern.push('/');
        self.pattern.push_str(segment);
        self
    }

    /// Adds a named parameter segment
    fn with_param(mut self, name: &str) -> Self {
        self.pattern.push_str("/:");
        self.pattern.push_str(name);
        self
    }

    /// Records a reserved target, which replaces the whole pattern
    fn with_reserved(mut self, target: &'static str) -> Self {
        self.reserved = Some(target);
        self
    }

    /// Finalizes the pattern, handling the reserved and empty cases
    fn finalize(self) -> String {
        match self.reserved {
            Some(target) => target.to_string(),
            None if self.pattern.is_empty() => "/".to_string(),
            None => self.pattern,
        }
    }
}

/// Processes a single segment and updates the parse state
///
/// Pure function: (state, segment) -> new state
fn process_segment(state: ParseState, segment: SegmentType<'_>) -> ParseState {
    match segment {
        SegmentType::Static(text) => state.with_static_segment(text),
        SegmentType::Dynamic(name) => state.with_param(name),
        SegmentType::Index => state,
        SegmentType::Reserved(target) => state.with_reserved(target),
    }
}

/// Translates a relative file path into a dynamic route pattern
///
/// Uses functional composition:
/// - `segments` - break the path into non-empty segments
/// - `strip_extension` - applied to the final segment only
/// - `classify_segment` - typed view of each segment
/// - `fold` - accumulate the pattern through `ParseState`
///
/// # Examples
///
/// ```
/// use pathway_router::{to_dynamic_pattern, TranslatorConfig};
///
/// let config = TranslatorConfig::default();
///
/// assert_eq!(to_dynamic_pattern("index.page", &config), "/");
/// assert_eq!(to_dynamic_pattern("about.page", &config), "/about");
/// assert_eq!(to_dynamic_pattern("blog/index.page", &config), "/blog");
/// assert_eq!(to_dynamic_pattern("profile/@name.page", &config), "/profile/:name");
/// assert_eq!(to_dynamic_pattern("users/@id/posts.page", &config), "/users/:id/posts");
/// assert_eq!(to_dynamic_pattern("admin/_onError.page", &config), "/_onError");
/// assert_eq!(to_dynamic_pattern("", &config), "/");
/// ```
///
/// # Special Segments
///
/// - final `index` (configurable) - dropped, the directory is the route
/// - final `_onError` - the fixed target `/_onError`
/// - final `_notFound` - the fixed target `/_notFound`
pub fn to_dynamic_pattern(relative_path: &str, config: &TranslatorConfig) -> String {
    let parts: Vec<&str> = segments(relative_path).collect();
    let last = parts.len().saturating_sub(1);

    parts
        .into_iter()
        .enumerate()
        .map(|(idx, part)| {
            let is_last = idx == last;
            let text = if is_last { strip_extension(part) } else { part };
            classify_segment(text, is_last, config)
        })
        .fold(ParseState::default(), process_segment)
        .finalize()
}

/// Translates a relative file path into a literal static-asset pattern
///
/// The path is kept as-is: extensions stay, dynamic markers and reserved
/// names are not interpreted. Only separators are normalized.
///
/// ```
/// use pathway_router::to_static_pattern;
///
/// assert_eq!(to_static_pattern("logo.png"), "/logo.png");
/// assert_eq!(to_static_pattern("img\\@2x\\logo.png"), "/img/@2x/logo.png");
/// assert_eq!(to_static_pattern(""), "/");
/// ```
pub fn to_static_pattern(relative_path: &str) -> String {
    normalize_path(relative_path).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dynamic(path: &str) -> String {
        to_dynamic_pattern(path, &TranslatorConfig::default())
    }

    #[test]
    fn test_static_route() {
        assert_eq!(dynamic("about.page"), "/about");
        assert_eq!(dynamic("docs/getting-started.page"), "/docs/getting-started");
    }

    #[test]
    fn test_index_route() {
        assert_eq!(dynamic("index.page"), "/");
        assert_eq!(dynamic("users/index.page"), "/users");
    }

    #[test]
    fn test_index_directory_is_literal() {
        assert_eq!(dynamic("index/about.page"), "/index/about");
    }

    #[test]
    fn test_dynamic_route() {
        assert_eq!(dynamic("profile/@name.page"), "/profile/:name");
        assert_eq!(dynamic("@org/@repo/index.page"), "/:org/:repo");
    }

    #[test]
    fn test_extension_is_irrelevant() {
        assert_eq!(dynamic("profile/@name.page"), dynamic("profile/@name.rs"));
        assert_eq!(dynamic("profile/@name"), "/profile/:name");
    }

    #[test]
    fn test_reserved_targets() {
        assert_eq!(dynamic("_onError.page"), "/_onError");
        assert_eq!(dynamic("_notFound.page"), "/_notFound");
        assert_eq!(dynamic("deep/nested/_onError.page"), "/_onError");
    }

    #[test]
    fn test_reserved_directory_is_literal() {
        assert_eq!(dynamic("_onError/details.page"), "/_onError/details");
    }

    #[test]
    fn test_empty_path() {
        assert_eq!(dynamic(""), "/");
        assert_eq!(dynamic("/"), "/");
    }

    #[test]
    fn test_windows_separators() {
        assert_eq!(dynamic("profile\\@name.page"), "/profile/:name");
    }

    #[test]
    fn test_static_pattern_keeps_path() {
        assert_eq!(to_static_pattern("index.html"), "/index.html");
        assert_eq!(to_static_pattern("_onError.png"), "/_onError.png");
        assert_eq!(to_static_pattern("/already/rooted.css"), "/already/rooted.css");
    }
}
