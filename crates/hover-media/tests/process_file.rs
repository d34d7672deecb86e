//! Processing stylesheets from disk.

use std::io::Write;

use hover_media::{Error, Processor};
use pretty_assertions::assert_eq;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn process_file_rewrites_contents() {
    init_logging();
    let mut file = tempfile::Builder::new().suffix(".css").tempfile().unwrap();
    write!(file, ".nav a:hover {{ color: red; }}\n.nav a {{ color: blue; }}\n").unwrap();

    let css = Processor::new().process_file(file.path()).unwrap();
    assert_eq!(
        css,
        "@media (hover: hover) and (pointer: fine) {.nav a:hover { color: red; } }\n.nav a { color: blue; }\n"
    );
}

#[test]
fn process_file_reports_missing_file() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.css");

    let err = Processor::new().process_file(&path).unwrap_err();
    match err {
        Error::Io { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn process_file_keeps_syntax_error_position() {
    init_logging();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "a {{}}\n\n}}").unwrap();

    let err = Processor::new().process_file(file.path()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "CSS syntax error at line 3, column 1: Unexpected }"
    );
}
