//! Behavioural coverage for central root resolution from the process
//! environment.
#![cfg(unix)]

use artifact_cache::libraries::{huggingface, nltk};
use artifact_cache::{CENTRAL_LOCATION_ENV, CentralLocation, SwitchableCache};
use camino::Utf8PathBuf;
use color_eyre::eyre::{Result, ensure};
use rstest::rstest;
use serial_test::serial;

#[rstest]
#[serial]
fn central_variable_takes_precedence_over_xdg() -> Result<()> {
    temp_env::with_vars(
        [
            (CENTRAL_LOCATION_ENV, Some("/srv/central")),
            ("XDG_CACHE_HOME", Some("/srv/xdg")),
        ],
        || -> Result<()> {
            let location = CentralLocation::process();
            ensure!(location.root() == Utf8PathBuf::from("/srv/central"));
            ensure!(
                location.path_for("huggingface/datasets")
                    == Utf8PathBuf::from("/srv/central/huggingface/datasets")
            );
            Ok(())
        },
    )
}

#[rstest]
#[serial]
fn xdg_cache_home_is_used_without_a_central_variable() -> Result<()> {
    temp_env::with_vars(
        [
            (CENTRAL_LOCATION_ENV, None),
            ("XDG_CACHE_HOME", Some("/srv/xdg")),
        ],
        || -> Result<()> {
            let root = CentralLocation::process().root();
            ensure!(root == Utf8PathBuf::from("/srv/xdg/artifact-cache"), "got {root}");
            Ok(())
        },
    )
}

#[rstest]
#[serial]
fn enabling_the_switchable_root_redirects_later_defaults() -> Result<()> {
    temp_env::with_vars_unset(
        [CENTRAL_LOCATION_ENV, nltk::VARIABLE, huggingface::VARIABLE],
        || -> Result<()> {
            let location = CentralLocation::process().initialize_if_missing(false);
            let root = location.switchable_root("/srv/moved");

            root.enable()?;
            let cache = nltk::build(&location);
            ensure!(cache.path() == Utf8PathBuf::from("/srv/moved/nltk"));
            cache.enable()?;
            ensure!(std::env::var(nltk::VARIABLE).as_deref() == Ok("/srv/moved/nltk"));
            cache.disable();

            root.disable();
            ensure!(std::env::var_os(CENTRAL_LOCATION_ENV).is_none());
            let internal = huggingface::build_internal(&location);
            ensure!(internal.path() != Utf8PathBuf::from("/srv/moved/huggingface"));
            Ok(())
        },
    )
}
