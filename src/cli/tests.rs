//! Tests for the command-line front end.

use std::sync::Arc;

use clap::Parser;
use rstest::rstest;

use super::*;
use crate::env::MemoryEnv;

fn location(store: &Arc<MemoryEnv>) -> CentralLocation {
    CentralLocation::with_store(store.clone())
        .with_root("/srv/cache")
        .initialize_if_missing(false)
}

fn render(write: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
    let mut out = Vec::new();
    write(&mut out).unwrap_or_else(|err| panic!("writing output: {err}"));
    String::from_utf8(out).unwrap_or_else(|err| panic!("utf-8 output: {err}"))
}

#[test]
fn statuses_default_to_every_top_level_cache() {
    let store = Arc::new(MemoryEnv::from_vars([("NLTK_DATA", "/srv/cache/nltk")]));
    let rows = statuses(&[], &location(&store));

    let variables: Vec<_> = rows.iter().map(|row| row.variable.as_str()).collect();
    assert_eq!(
        variables,
        ["NLTK_DATA", "HF_HOME", "TRANSFORMERS_CACHE", "HF_DATASETS_CACHE"]
    );
    assert!(rows[0].enabled);
    assert!(rows[1..].iter().all(|row| !row.enabled));
    assert_eq!(rows[2].path, Utf8PathBuf::from("/srv/cache/huggingface/transformers"));
}

#[test]
fn status_table_lists_state_and_path() {
    let store = Arc::new(MemoryEnv::from_vars([("NLTK_DATA", "/srv/cache/nltk")]));
    let rows = statuses(&[Library::Nltk], &location(&store));

    let table = render(|out| write_status(out, &rows, false));
    let lines: Vec<_> = table.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("LIBRARY"));
    assert!(lines[1].starts_with("nltk"));
    assert!(lines[1].contains("NLTK_DATA"));
    assert!(lines[1].contains("enabled"));
    assert!(lines[1].ends_with("/srv/cache/nltk"));
}

#[test]
fn status_json_serialises_rows() {
    let store = Arc::new(MemoryEnv::new());
    let rows = statuses(&[Library::Datasets], &location(&store));

    let json = render(|out| write_status(out, &rows, true));
    let value: serde_json::Value =
        serde_json::from_str(&json).unwrap_or_else(|err| panic!("valid json: {err}"));
    assert_eq!(value[0]["library"], "datasets");
    assert_eq!(value[0]["member"], "datasets");
    assert_eq!(value[0]["variable"], "HF_DATASETS_CACHE");
    assert_eq!(value[0]["path"], "/srv/cache/huggingface/datasets");
    assert_eq!(value[0]["enabled"], false);
}

#[test]
fn exports_quote_paths_for_the_shell() {
    let rows = vec![CacheStatus {
        library: Library::Nltk,
        member: "nltk",
        variable: "NLTK_DATA".to_owned(),
        path: Utf8PathBuf::from("/srv/it's here"),
        enabled: false,
    }];

    let exports = render(|out| write_exports(out, &rows));
    assert_eq!(exports, "export NLTK_DATA='/srv/it'\\''s here'\n");
}

#[rstest]
#[case::plain("/a/b", "'/a/b'")]
#[case::spaces("/a b", "'/a b'")]
#[case::quote("it's", r"'it'\''s'")]
fn shell_quote_wraps_values(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(shell_quote(input), expected);
}

#[test]
fn parses_exec_with_libraries_and_trailing_command() {
    let cli = Cli::try_parse_from([
        "artifact-cache",
        "--no-create",
        "exec",
        "-l",
        "nltk",
        "--library",
        "transformers",
        "--",
        "python",
        "-c",
        "pass",
    ])
    .unwrap_or_else(|err| panic!("parse: {err}"));

    assert!(cli.no_create);
    let Command::Exec { libraries, command } = cli.command else {
        panic!("expected the exec subcommand");
    };
    assert_eq!(libraries, [Library::Nltk, Library::Transformers]);
    assert_eq!(command, ["python", "-c", "pass"]);
}

#[test]
fn exec_requires_a_command() {
    let result = Cli::try_parse_from(["artifact-cache", "exec", "-l", "nltk"]);
    assert!(result.is_err());
}

#[test]
fn rejects_unknown_library() {
    let result = Cli::try_parse_from(["artifact-cache", "status", "spacy"]);
    assert!(result.is_err());
}

#[test]
fn global_central_location_is_accepted_after_subcommand() {
    let cli = Cli::try_parse_from(["artifact-cache", "env", "--central-location", "/data"])
        .unwrap_or_else(|err| panic!("parse: {err}"));
    assert_eq!(cli.central_location, Some(Utf8PathBuf::from("/data")));
}

#[cfg(unix)]
#[rstest]
#[case::success(0, ExitCode::SUCCESS)]
#[case::failure(3, ExitCode::from(3))]
fn exit_code_mirrors_child_status(#[case] code: i32, #[case] expected: ExitCode) {
    use std::os::unix::process::ExitStatusExt;

    let status = ExitStatus::from_raw(code << 8);
    assert_eq!(format!("{:?}", exit_code(status)), format!("{expected:?}"));
}

#[cfg(unix)]
#[test]
fn exit_code_is_failure_for_signals() {
    use std::os::unix::process::ExitStatusExt;

    let status = ExitStatus::from_raw(9);
    assert_eq!(
        format!("{:?}", exit_code(status)),
        format!("{:?}", ExitCode::FAILURE)
    );
}
