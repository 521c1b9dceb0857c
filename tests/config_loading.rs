//! Behaviour-driven tests for translator configuration loading.

use std::cell::RefCell;
use std::sync::Arc;
use std::time::Duration;

mod support;

use camino::Utf8PathBuf;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use support::locale::{StepLocale, StepLocales};
use support::value::StepText;
use tempfile::TempDir;
use translator::{FixedLocale, LocaleRegistry, TranslatorConfig};

#[derive(Default)]
struct ConfigWorld {
    directory: RefCell<Option<TempDir>>,
    path: RefCell<Option<Utf8PathBuf>>,
    outcome: RefCell<Option<Result<LocaleRegistry, String>>>,
}

#[fixture]
fn world() -> ConfigWorld {
    ConfigWorld::default()
}

fn write_config(world: &ConfigWorld, contents: &str) {
    let directory = tempfile::tempdir().expect("temp dir");
    let path = Utf8PathBuf::try_from(directory.path().join("translator.toml")).expect("UTF-8 path");
    std::fs::write(&path, contents).expect("write configuration");

    world.path.borrow_mut().replace(path);
    world.directory.borrow_mut().replace(directory);
}

fn registry(world: &ConfigWorld) -> std::cell::Ref<'_, LocaleRegistry> {
    std::cell::Ref::map(world.outcome.borrow(), |outcome| match outcome {
        Some(Ok(registry)) => registry,
        Some(Err(error)) => panic!("expected configuration loading to succeed: {error}"),
        None => panic!("configuration should be loaded"),
    })
}

#[given("no configuration file is provided")]
fn no_file(world: &ConfigWorld) {
    world.path.borrow_mut().take();
}

#[given("a configuration file serving {locales} with main locale {main}")]
fn file_with_locales(world: &ConfigWorld, locales: StepLocales, main: StepLocale) {
    let listed = locales
        .into_inner()
        .iter()
        .map(|code| format!("\"{code}\""))
        .collect::<Vec<_>>()
        .join(", ");
    let contents = format!(
        "available_locales = [{listed}]\nmain_locale = \"{}\"\n",
        main.into_inner()
    );
    write_config(world, &contents);
}

#[given("a configuration file containing {contents}")]
fn file_with_contents(world: &ConfigWorld, contents: StepText) {
    write_config(world, &format!("{}\n", contents.into_inner()));
}

#[when("the translator configuration is loaded")]
fn load(world: &ConfigWorld) {
    let outcome = world
        .path
        .borrow()
        .clone()
        .map_or_else(
            || {
                TranslatorConfig::load_with(camino::Utf8Path::new("translator.toml"), |_| {
                    Ok(TranslatorConfig::default())
                })
            },
            |path| TranslatorConfig::load_with(&path, TranslatorConfig::from_path),
        )
        .and_then(|config| config.into_registry(Arc::new(FixedLocale::new("en"))))
    .map_err(|error| error.to_string());

    world.outcome.borrow_mut().replace(outcome);
}

#[then("the main locale is {expected}")]
fn assert_main_locale(world: &ConfigWorld, expected: StepLocale) {
    assert_eq!(registry(world).main_locale(), expected.into_inner());
}

#[then("the cache TTL is {seconds} seconds")]
fn assert_cache_ttl(world: &ConfigWorld, seconds: u64) {
    assert_eq!(registry(world).cache_ttl(), Duration::from_secs(seconds));
}

#[then("the locales {locales} are available")]
fn assert_available(world: &ConfigWorld, locales: StepLocales) {
    assert_eq!(registry(world).available_locales(), locales.into_inner().as_slice());
}

#[then("a configuration error mentioning {snippet} is reported")]
fn assert_error(world: &ConfigWorld, snippet: StepText) {
    let borrow = world.outcome.borrow();
    match borrow.as_ref() {
        Some(Err(error)) => assert!(
            error.contains(snippet.as_ref()),
            "expected error '{error}' to mention '{}'",
            snippet.as_ref()
        ),
        Some(Ok(registry)) => {
            panic!("expected configuration loading to fail but built {registry:?}")
        }
        None => panic!("configuration should be loaded"),
    }
}

#[scenario("tests/features/config_loading.feature", index = 0)]
fn scenario_defaults(world: ConfigWorld) {
    let _ = world;
}

#[scenario("tests/features/config_loading.feature", index = 1)]
fn scenario_file(world: ConfigWorld) {
    let _ = world;
}

#[scenario("tests/features/config_loading.feature", index = 2)]
fn scenario_unknown_fields(world: ConfigWorld) {
    let _ = world;
}

#[scenario("tests/features/config_loading.feature", index = 3)]
fn scenario_inconsistent_locales(world: ConfigWorld) {
    let _ = world;
}
