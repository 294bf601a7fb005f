use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use todo_txt::ops::TaskStore;
use todo_txt::parse::ParseContext;

fn ctx() -> ParseContext {
    ParseContext::new(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
}

fn read_fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Could not read fixture {}: {}", name, e))
}

/// Load a file and print it back in canonical form
fn rewrite(source: &str) -> String {
    TaskStore::from_text(source, &ctx()).to_text().unwrap()
}

// ============================================================================
// Canonical files are fixed points
// ============================================================================

#[test]
fn round_trip_canonical_file() {
    let source = read_fixture("canonical.txt");
    assert_eq!(rewrite(&source), source);
}

#[test]
fn round_trip_canonical_file_keeps_every_entry() {
    let source = read_fixture("canonical.txt");
    let store = TaskStore::from_text(&source, &ctx());
    assert_eq!(store.len(), source.lines().count());
    assert_eq!(store.iter().filter(|e| e.is_comment()).count(), 1);
}

// ============================================================================
// Messy input is normalized
// ============================================================================

#[test]
fn messy_file_is_corrected() {
    let source = read_fixture("messy.txt");
    let expected = read_fixture("messy_corrected.txt");
    assert_eq!(rewrite(&source), expected);
}

#[test]
fn corrected_file_is_stable() {
    let once = rewrite(&read_fixture("messy.txt"));
    let twice = rewrite(&once);
    assert_eq!(twice, once);
}

#[test]
fn round_trip_empty_file() {
    assert_eq!(rewrite(""), "");
    assert_eq!(rewrite("\n\n   \n"), "");
}

#[test]
fn round_trip_without_trailing_newline() {
    assert_eq!(rewrite("24-03-10 Buy milk"), "24-03-10 Buy milk\n");
}

#[test]
fn round_trip_crlf_line_endings() {
    assert_eq!(
        rewrite("24-03-10 Buy milk\r\n;; note\r\n"),
        "24-03-10 Buy milk\n;; note\n"
    );
}
