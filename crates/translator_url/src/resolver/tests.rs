//! Unit tests for route and request URL generation.

use super::*;
use crate::request::StaticRequest;
use crate::route::{LocalePermission, MockRouteRegistry, RouteTable};
use rstest::{fixture, rstest};
use translator_common::SharedLocale;

struct Harness {
    active: Arc<SharedLocale>,
    urls: UrlResolver,
}

fn table() -> RouteTable {
    [
        RouteDescriptor::new("home", "/"),
        RouteDescriptor::new("blog.show", "blog/{slug}/{page?}"),
        RouteDescriptor::new("offers", "offers")
            .with_locales(LocalePermission::only(["es"])),
        RouteDescriptor::new("account", "dashboard")
            .with_domain("{account}.example.com"),
        RouteDescriptor::new("legacy", "legacy").with_locales(LocalePermission::only(["es", "de"])),
    ]
    .into_iter()
    .collect()
}

fn harness_with(root: &str, prefix_main: bool) -> Harness {
    let active = Arc::new(SharedLocale::new("en"));
    let registry = LocaleRegistry::builder(["en", "es", "fr"], "en")
        .prefix("es", "espanol")
        .prefix_main_locale(prefix_main)
        .active_locale(active.clone())
        .build()
        .expect("fixture configuration is valid");
    let root = Url::parse(root).expect("fixture root is valid");
    let urls = UrlResolver::new(Arc::new(registry), Arc::new(table()), root)
        .expect("fixture root can carry paths");
    Harness { active, urls }
}

#[fixture]
fn harness() -> Harness {
    harness_with("https://example.com", false)
}

fn no_params() -> RouteParameters {
    RouteParameters::new()
}

#[rstest]
#[case("home", false, "/")]
#[case("es.home", false, "/espanol")]
#[case("fr.home", true, "https://example.com/fr")]
#[case("home", true, "https://example.com/")]
fn builds_prefixed_urls(harness: Harness, #[case] name: &str, #[case] absolute: bool, #[case] expected: &str) {
    let url = harness
        .urls
        .route(name, &no_params(), absolute, &Fallback::None)
        .expect("route exists");

    assert_eq!(url.as_deref(), Some(expected));
}

#[rstest]
fn substitutes_parameters_and_appends_the_rest(harness: Harness) {
    let params = RouteParameters::from([("slug", "hello world"), ("sort", "new & hot")]);

    let url = harness
        .urls
        .route("fr.blog.show", &params, false, &Fallback::None)
        .expect("route exists");

    assert_eq!(url.as_deref(), Some("/fr/blog/hello%20world?sort=new+%26+hot"));
}

#[rstest]
#[case("a\\b", "/blog/a%5Cb")]
#[case("..", "/blog/%2E%2E")]
#[case("x/../../admin", "/blog/x/%2E%2E/%2E%2E/admin")]
#[case("hello world", "/blog/hello%20world")]
fn parameter_values_cannot_leave_the_route_path(
    harness: Harness,
    #[case] slug: &str,
    #[case] expected: &str,
) {
    let params = RouteParameters::from([("slug", slug)]);

    let relative = harness
        .urls
        .route("en.blog.show", &params, false, &Fallback::None)
        .expect("route exists");
    let absolute = harness
        .urls
        .route("en.blog.show", &params, true, &Fallback::None)
        .expect("route exists");

    assert_eq!(relative.as_deref(), Some(expected));
    assert_eq!(absolute, Some(format!("https://example.com{expected}")));
}

#[rstest]
fn optional_parameters_fill_in_when_given(harness: Harness) {
    let params = RouteParameters::from([("slug", "hello"), ("page", "2")]);

    let url = harness
        .urls
        .route("blog.show", &params, false, &Fallback::None)
        .expect("route exists");

    assert_eq!(url.as_deref(), Some("/blog/hello/2"));
}

#[rstest]
fn missing_required_parameters_are_errors(harness: Harness) {
    let err = harness
        .urls
        .route("blog.show", &no_params(), false, &Fallback::None)
        .expect_err("slug is required");

    assert_eq!(
        err,
        UrlError::MissingParameter {
            route: "blog.show".to_owned(),
            parameter: "slug".to_owned(),
        }
    );
}

#[rstest]
fn unknown_routes_are_errors(harness: Harness) {
    let err = harness
        .urls
        .route("es.missing", &no_params(), false, &Fallback::None)
        .expect_err("route is not registered");

    assert_eq!(err, UrlError::RouteNotFound { name: "missing".to_owned() });
}

#[rstest]
fn domain_routes_keep_the_root_scheme(harness: Harness) {
    let params = RouteParameters::from([("account", "acme")]);

    let absolute = harness
        .urls
        .route("es.account", &params, true, &Fallback::None)
        .expect("route exists");
    let relative = harness
        .urls
        .route("es.account", &params, false, &Fallback::None)
        .expect("route exists");

    assert_eq!(absolute.as_deref(), Some("https://acme.example.com/espanol/dashboard"));
    assert_eq!(relative.as_deref(), Some("/espanol/dashboard"));
}

#[rstest]
fn unpermitted_locales_yield_nothing_without_fallback(harness: Harness) {
    let url = harness
        .urls
        .route("fr.offers", &no_params(), true, &Fallback::None)
        .expect("route exists");

    assert_eq!(url, None);
}

#[rstest]
fn current_locale_fallback_applies_when_permitted(harness: Harness) {
    harness.active.set("es");

    let url = harness
        .urls
        .route("fr.offers", &no_params(), true, &Fallback::Current)
        .expect("route exists");

    assert_eq!(url.as_deref(), Some("https://example.com/espanol/offers"));
}

#[rstest]
#[case::current(Fallback::Current, None)]
#[case::permitted(Fallback::Locale("es".to_owned()), Some("/espanol/offers"))]
#[case::unpermitted(Fallback::Locale("fr".to_owned()), None)]
#[case::unavailable(Fallback::Locale("de".to_owned()), None)]
fn fallbacks_must_be_permitted(
    harness: Harness,
    #[case] fallback: Fallback,
    #[case] expected: Option<&str>,
) {
    let url = harness
        .urls
        .route("fr.offers", &no_params(), false, &fallback)
        .expect("route exists");

    assert_eq!(url.as_deref(), expected);
}

#[rstest]
fn routes_cover_every_available_locale(harness: Harness) {
    let urls = harness.urls.routes("offers", &no_params(), false).expect("route exists");

    assert_eq!(urls.locales().collect::<Vec<_>>(), ["en", "es", "fr"]);
    assert_eq!(urls.present().collect::<Vec<_>>(), [("es", &"/espanol/offers".to_owned())]);
}

#[rstest]
fn routes_granted_to_all_have_every_locale(harness: Harness) {
    let urls = harness.urls.routes("home", &no_params(), false).expect("route exists");

    assert_eq!(urls.present().count(), 3);
}

#[rstest]
fn permitted_but_unavailable_locales_are_skipped(harness: Harness) {
    assert!(harness.urls.has_locale("legacy", "es"));
    assert!(!harness.urls.has_locale("legacy", "de"));
    assert!(!harness.urls.has_locale("missing", "es"));

    let urls = harness.urls.routes("legacy", &no_params(), false).expect("route exists");
    assert_eq!(urls.present().count(), 1);
}

#[rstest]
#[case("/blog?page=2", "es", false, "/espanol/blog?page=2")]
#[case("/espanol/blog", "fr", false, "/fr/blog")]
#[case("/espanol/blog", "en", false, "/blog")]
#[case("espanol", "fr", false, "/fr")]
#[case("/espanol/blog", "en", true, "https://example.com/blog")]
#[case("https://example.com/espanol/blog?x=1", "fr", false, "/fr/blog?x=1")]
fn localizes_uris(
    harness: Harness,
    #[case] uri: &str,
    #[case] locale: &str,
    #[case] absolute: bool,
    #[case] expected: &str,
) {
    assert_eq!(
        harness.urls.localize(uri, locale, absolute, true).expect("locale is available"),
        expected
    );
}

#[rstest]
fn localize_can_ignore_existing_prefixes(harness: Harness) {
    assert_eq!(
        harness.urls.localize("/espanol/blog", "fr", false, false).expect("locale is available"),
        "/fr/espanol/blog"
    );
}

#[rstest]
#[case("/blog", "es")]
#[case("/espanol/blog?page=2", "en")]
#[case("/fr/blog/", "fr")]
#[case("/", "es")]
fn localize_is_idempotent(harness: Harness, #[case] uri: &str, #[case] locale: &str) {
    let once = harness.urls.localize(uri, locale, false, true).expect("locale is available");
    let twice = harness.urls.localize(&once, locale, false, true).expect("locale is available");

    assert_eq!(once, twice);

    let absolute = harness.urls.localize(uri, locale, true, true).expect("locale is available");
    let again = harness.urls.localize(&absolute, locale, true, true).expect("locale is available");
    assert_eq!(absolute, again);
}

#[rstest]
fn localize_rejects_unknown_locales(harness: Harness) {
    let err = harness
        .urls
        .localize("/blog", "de", false, true)
        .expect_err("de is not available");

    assert!(matches!(err, UrlError::UnknownLocale(_)), "unexpected error: {err:?}");
}

#[rstest]
fn prefixed_main_locale_gets_its_code() {
    let harness = harness_with("https://example.com", true);

    assert_eq!(
        harness.urls.localize("/en/blog", "en", false, true).expect("locale is available"),
        "/en/blog"
    );
    assert_eq!(
        harness.urls.localize("/en/blog", "es", false, true).expect("locale is available"),
        "/espanol/blog"
    );
}

#[rstest]
fn mounted_roots_stay_out_of_relative_urls() {
    let harness = harness_with("https://example.com/app/", false);

    let absolute = harness
        .urls
        .route("es.home", &no_params(), true, &Fallback::None)
        .expect("route exists");
    let relative = harness
        .urls
        .route("es.home", &no_params(), false, &Fallback::None)
        .expect("route exists");

    assert_eq!(absolute.as_deref(), Some("https://example.com/app/espanol"));
    assert_eq!(relative.as_deref(), Some("/espanol"));
}

#[rstest]
fn current_keeps_the_path_for_the_current_locale(harness: Harness) {
    let request = StaticRequest::new("/blog/hello");

    assert_eq!(
        harness.urls.current(&request, None, false).expect("no locale change"),
        Some("/blog/hello".to_owned())
    );
    assert_eq!(
        harness.urls.current(&request, Some("en"), true).expect("no locale change"),
        Some("https://example.com/blog/hello".to_owned())
    );
}

#[rstest]
#[case(None, false, "/blog//post/")]
#[case(Some("en"), false, "/blog//post/")]
#[case(None, true, "https://example.com/blog//post/")]
fn current_returns_the_request_path_verbatim(
    harness: Harness,
    #[case] locale: Option<&str>,
    #[case] absolute: bool,
    #[case] expected: &str,
) {
    let request = StaticRequest::new("/blog//post/");

    assert_eq!(
        harness.urls.current(&request, locale, absolute).expect("no locale change"),
        Some(expected.to_owned())
    );
}

#[rstest]
fn current_joins_mounted_roots_verbatim() {
    let harness = harness_with("https://example.com/app/", false);
    let request = StaticRequest::new("/blog/?page=2");

    assert_eq!(
        harness.urls.current(&request, None, true).expect("no locale change"),
        Some("https://example.com/app/blog/?page=2".to_owned())
    );
}

#[rstest]
fn current_respects_the_matched_route(harness: Harness) {
    harness.active.set("es");
    let offers = harness.urls.routes.route_by_name("offers").expect("route is registered");
    let request = StaticRequest::new("/espanol/offers").with_route(offers);

    assert_eq!(harness.urls.current(&request, Some("fr"), false).expect("fr is available"), None);

    let all = harness.urls.current_all(&request, false).expect("locales are available");
    assert_eq!(all.get("es").map(String::as_str), Some("/espanol/offers"));
    assert_eq!(all.get("en"), None);
    assert_eq!(all.get("fr"), None);
}

#[rstest]
fn unmatched_requests_localize_everywhere(harness: Harness) {
    let request = StaticRequest::new("/espanol/missing-page");

    let all = harness.urls.current_all(&request, false).expect("locales are available");

    assert_eq!(all.get("en").map(String::as_str), Some("/espanol/missing-page"));
    assert_eq!(all.get("es").map(String::as_str), Some("/espanol/missing-page"));
    assert_eq!(all.get("fr").map(String::as_str), Some("/fr/missing-page"));
}

#[test]
fn resolves_routes_through_the_registry_once_per_call() {
    let registry = LocaleRegistry::builder(["en", "es"], "en")
        .build()
        .expect("fixture configuration is valid");
    let mut routes = MockRouteRegistry::new();
    routes
        .expect_route_by_name()
        .withf(|name| name == "home")
        .times(1)
        .returning(|_| Some(RouteDescriptor::new("home", "/")));
    let root = Url::parse("http://localhost").expect("fixture root is valid");
    let urls = UrlResolver::new(Arc::new(registry), Arc::new(routes), root).expect("valid root");

    let url = urls
        .route("es.home", &RouteParameters::new(), false, &Fallback::None)
        .expect("route exists");
    assert_eq!(url.as_deref(), Some("/es"));
}

#[test]
fn rejects_roots_without_a_path() {
    let registry = LocaleRegistry::builder(["en"], "en")
        .build()
        .expect("fixture configuration is valid");
    let root = Url::parse("mailto:team@example.com").expect("parses as a URL");

    let err = UrlResolver::new(Arc::new(registry), Arc::new(RouteTable::new()), root)
        .expect_err("mailto roots cannot carry paths");
    assert!(matches!(err, UrlError::InvalidUrl { .. }));
}
