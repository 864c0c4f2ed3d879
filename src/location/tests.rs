//! Tests for central root resolution.

use super::*;
use crate::cache::SwitchableCache;
use crate::env::MemoryEnv;
use rstest::{fixture, rstest};

#[fixture]
fn store() -> Arc<MemoryEnv> {
    Arc::new(MemoryEnv::new())
}

#[rstest]
fn root_prefers_the_central_variable(store: Arc<MemoryEnv>) {
    store.set(CENTRAL_LOCATION_ENV, "/central".as_ref());
    store.set("XDG_CACHE_HOME", "/xdg".as_ref());

    let location = CentralLocation::with_store(store);

    assert_eq!(location.root(), "/central");
}

#[rstest]
#[case("")]
#[case("   ")]
fn root_ignores_blank_central_variable(store: Arc<MemoryEnv>, #[case] value: &str) {
    store.set(CENTRAL_LOCATION_ENV, value.as_ref());
    store.set("XDG_CACHE_HOME", "/home/testuser/.cache".as_ref());

    let location = CentralLocation::with_store(store);

    assert_eq!(location.root(), "/home/testuser/.cache/artifact-cache");
}

#[rstest]
fn root_falls_back_below_the_user_cache(store: Arc<MemoryEnv>) {
    let location = CentralLocation::with_store(store);
    assert!(location.root().ends_with(DEFAULT_SUBDIR));
}

#[rstest]
fn explicit_root_wins_over_environment(store: Arc<MemoryEnv>) {
    store.set(CENTRAL_LOCATION_ENV, "/central".as_ref());
    let location = CentralLocation::with_store(store).with_root("/pinned");
    assert_eq!(location.root(), "/pinned");
}

#[rstest]
#[case("nltk", "/central/nltk")]
#[case("huggingface/transformers", "/central/huggingface/transformers")]
#[case("/huggingface//datasets/", "/central/huggingface/datasets")]
#[case("../escape", "/central/escape")]
fn path_for_nests_namespaces_under_the_root(
    store: Arc<MemoryEnv>,
    #[case] namespace: &str,
    #[case] expected: &str,
) {
    store.set(CENTRAL_LOCATION_ENV, "/central".as_ref());
    let location = CentralLocation::with_store(store);
    assert_eq!(location.path_for(namespace), expected);
}

#[rstest]
fn path_for_reads_the_root_at_call_time(store: Arc<MemoryEnv>) {
    let location = CentralLocation::with_store(store.clone());
    store.set(CENTRAL_LOCATION_ENV, "/before".as_ref());
    assert_eq!(location.path_for("nltk"), "/before/nltk");

    store.set(CENTRAL_LOCATION_ENV, "/after".as_ref());
    assert_eq!(location.path_for("nltk"), "/after/nltk");
}

#[rstest]
fn cache_for_shares_the_store_and_settings(store: Arc<MemoryEnv>) {
    store.set(CENTRAL_LOCATION_ENV, "/central".as_ref());
    let location = CentralLocation::with_store(store.clone()).initialize_if_missing(false);

    let cache = location.cache_for("nltk", "NLTK_DATA");
    assert_eq!(cache.path(), "/central/nltk");
    assert_eq!(cache.variable(), "NLTK_DATA");
    assert!(!cache.initialize_if_missing());

    cache.enable().expect("enable without touching the filesystem");
    assert!(store.is_set_to("NLTK_DATA", "/central/nltk"));
}

#[rstest]
fn switchable_root_redirects_later_defaults(store: Arc<MemoryEnv>) {
    store.set(CENTRAL_LOCATION_ENV, "/original".as_ref());
    let location = CentralLocation::with_store(store.clone()).initialize_if_missing(false);
    let root = location.switchable_root("/redirected");

    root.enable().expect("enable central root");
    assert_eq!(location.path_for("nltk"), "/redirected/nltk");

    root.disable();
    assert_eq!(location.path_for("nltk"), "/original/nltk");
}

#[test]
fn install_root_is_the_executable_directory() {
    let expected = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(std::path::Path::to_path_buf));
    assert_eq!(
        install_root().map(Utf8Path::as_std_path),
        expected.as_deref()
    );
}
