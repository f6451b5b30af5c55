//! Integration tests for pathway-router
//!
//! Covers the translation of whole route trees the way a discovered
//! directory is fed through the translator, one relative path at a time.

use pathway_router::*;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case("index.page", "/")]
#[case("about.page", "/about")]
#[case("blog/index.page", "/blog")]
#[case("blog/first-post.page", "/blog/first-post")]
#[case("profile/@name.page", "/profile/:name")]
#[case("profile/@name.rs", "/profile/:name")]
#[case("profile/@name", "/profile/:name")]
#[case("shop/@category/@item.page", "/shop/:category/:item")]
#[case("shop/@category/index.page", "/shop/:category")]
#[case("_onError.page", "/_onError")]
#[case("errors/_onError.page", "/_onError")]
#[case("_notFound.page", "/_notFound")]
#[case("", "/")]
fn test_dynamic_patterns(#[case] path: &str, #[case] expected: &str) {
    assert_eq!(to_dynamic_pattern(path, &TranslatorConfig::default()), expected);
}

#[rstest]
#[case("logo.png", "/logo.png")]
#[case("css/site.css", "/css/site.css")]
#[case("profile/@name.png", "/profile/@name.png")]
#[case("index.html", "/index.html")]
#[case("", "/")]
fn test_static_patterns(#[case] path: &str, #[case] expected: &str) {
    assert_eq!(to_static_pattern(path), expected);
}

#[test]
fn test_one_parameter_at_dynamic_position() {
    let pattern = to_dynamic_pattern("profile/@name.page", &TranslatorConfig::default());
    let params: Vec<&str> = pattern
        .split('/')
        .filter_map(|s| s.strip_prefix(':'))
        .collect();

    assert_eq!(params, vec!["name"]);
    assert_eq!(pattern.split('/').position(|s| s == ":name"), Some(2));
}

#[test]
fn test_kinds_for_scenario_tree() {
    let config = TranslatorConfig::default();
    let kinds: Vec<RouteKind> = ["index.page", "profile/@name.page", "_onError.page", "_notFound.page"]
        .iter()
        .map(|p| RouteKind::for_dynamic_target(&to_dynamic_pattern(p, &config)))
        .collect();

    assert_eq!(
        kinds,
        vec![
            RouteKind::Normal,
            RouteKind::Normal,
            RouteKind::ErrorHandler,
            RouteKind::NotFound,
        ]
    );
}

#[test]
fn test_custom_markers() {
    let config = TranslatorConfig::new("_index", ':');
    assert_eq!(to_dynamic_pattern("users/:id/_index.page", &config), "/users/:id");
    assert_eq!(to_dynamic_pattern("users/index.page", &config), "/users/index");
}

#[test]
fn test_translation_is_deterministic() {
    let config = TranslatorConfig::default();
    let first = to_dynamic_pattern("a/@b/c.page", &config);
    let second = to_dynamic_pattern("a/@b/c.page", &config);
    assert_eq!(first, second);
}
