//! Integration tests for the uidoc CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to get a uidoc command
fn uidoc() -> Command {
    Command::cargo_bin("uidoc").unwrap()
}

/// Helper to create a test site (with the sample Article catalogue)
fn setup_test_site() -> TempDir {
    let tmp = TempDir::new().unwrap();
    uidoc()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success();
    tmp
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    uidoc()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("schema documentation"));
}

#[test]
fn test_version_displays() {
    uidoc()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("uidoc"));
}

#[test]
fn test_unknown_command_fails() {
    uidoc()
        .arg("unknown-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

// ============================================================================
// Init Command Tests
// ============================================================================

#[test]
fn test_init_creates_site_structure() {
    let tmp = TempDir::new().unwrap();

    uidoc()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized"));

    assert!(tmp.path().join("uidoc.yaml").exists());
    assert!(tmp.path().join("schemas").is_dir());
    assert!(tmp.path().join("schemas/i18n/en").is_dir());
    assert!(tmp.path().join("templates").is_dir());
    assert!(tmp.path().join("examples").is_dir());
    assert!(tmp.path().join("css").is_dir());
    assert!(tmp.path().join("pages").is_dir());

    // sample catalogue
    assert!(tmp.path().join("schemas/Article.json").exists());
    assert!(tmp.path().join("templates/Article.tpl").exists());
    assert!(tmp.path().join("examples/Article.json").exists());
}

#[test]
fn test_init_bare_skips_sample() {
    let tmp = TempDir::new().unwrap();

    uidoc()
        .current_dir(tmp.path())
        .args(["init", "--bare"])
        .assert()
        .success();

    assert!(!tmp.path().join("schemas/Article.json").exists());
}

#[test]
fn test_init_twice_does_not_fail() {
    let tmp = setup_test_site();

    uidoc()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

// ============================================================================
// Schema Command Tests
// ============================================================================

#[test]
fn test_schema_list_shows_sample() {
    let tmp = setup_test_site();

    uidoc()
        .current_dir(tmp.path())
        .args(["schema", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Article"))
        .stdout(predicate::str::contains("Content"));
}

#[test]
fn test_schema_list_topic_filter() {
    let tmp = setup_test_site();

    uidoc()
        .current_dir(tmp.path())
        .args(["schema", "list", "--topic", "Nonexistent"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No schemas found"));
}

#[test]
fn test_schema_show_prints_localized_metadata() {
    let tmp = setup_test_site();

    uidoc()
        .current_dir(tmp.path())
        .args(["schema", "show", "Article"])
        .assert()
        .success()
        .stdout(predicate::str::contains("A basic text article"))
        .stdout(predicate::str::contains("Headline text"));
}

#[test]
fn test_schema_show_json_prints_record() {
    let tmp = setup_test_site();

    uidoc()
        .current_dir(tmp.path())
        .args(["schema", "show", "Article", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"@type\": \"Article\""));
}

#[test]
fn test_schema_show_unknown_type_fails() {
    let tmp = setup_test_site();

    uidoc()
        .current_dir(tmp.path())
        .args(["schema", "show", "Missing"])
        .assert()
        .failure();
}

#[test]
fn test_malformed_record_is_reported_not_fatal() {
    let tmp = setup_test_site();
    fs::write(tmp.path().join("schemas/Broken.json"), "{ not json").unwrap();

    uidoc()
        .current_dir(tmp.path())
        .args(["schema", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Article"))
        .stderr(predicate::str::contains("Broken.json"));
}

// ============================================================================
// Topic Command Tests
// ============================================================================

#[test]
fn test_topic_list_groups_types() {
    let tmp = setup_test_site();

    uidoc()
        .current_dir(tmp.path())
        .args(["topic", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Content"))
        .stdout(predicate::str::contains("Article"));
}

// ============================================================================
// Generate Command Tests
// ============================================================================

#[test]
fn test_generate_writes_pages_and_feeds() {
    let tmp = setup_test_site();

    uidoc()
        .current_dir(tmp.path())
        .arg("generate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated"));

    let out = tmp.path().join("public");
    assert!(out.join("index.html").exists());
    assert!(out.join("Article/index.html").exists());
    assert!(out.join("Article.json").exists());
    assert!(out.join("schemas.json").exists());
    assert!(out.join("templates.json").exists());
    assert!(out.join("examples.json").exists());
    assert!(out.join("topics.json").exists());
    assert!(out.join("css/style.css").exists());
    // header pages link site.css; the embedded default backs it
    assert!(out.join("css/site.css").exists());

    let page = fs::read_to_string(out.join("Article/index.html")).unwrap();
    assert!(page.contains("A basic text article"));
}

#[test]
fn test_generate_topics_feed_is_bare_names() {
    let tmp = setup_test_site();

    uidoc()
        .current_dir(tmp.path())
        .arg("generate")
        .assert()
        .success();

    let feed: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(tmp.path().join("public/topics.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(feed, serde_json::json!(["Content"]));
}

#[test]
fn test_generate_is_rerunnable() {
    let tmp = setup_test_site();

    uidoc()
        .current_dir(tmp.path())
        .arg("generate")
        .assert()
        .success();
    uidoc()
        .current_dir(tmp.path())
        .arg("generate")
        .assert()
        .success();
}

#[test]
fn test_generate_refuses_foreign_output_dir() {
    let tmp = setup_test_site();
    let out = tmp.path().join("public");
    fs::create_dir_all(&out).unwrap();
    fs::write(out.join("precious.txt"), "do not delete").unwrap();

    uidoc()
        .current_dir(tmp.path())
        .arg("generate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    assert!(out.join("precious.txt").exists());
}

// ============================================================================
// Page Command Tests
// ============================================================================

#[test]
fn test_page_add_list_remove() {
    let tmp = setup_test_site();

    uidoc()
        .current_dir(tmp.path())
        .args(["page", "add", "Landing"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created page"));

    uidoc()
        .current_dir(tmp.path())
        .args(["page", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Landing"));

    uidoc()
        .current_dir(tmp.path())
        .args(["page", "remove", "Landing", "--yes"])
        .assert()
        .success();

    uidoc()
        .current_dir(tmp.path())
        .args(["page", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No saved pages"));
}

#[test]
fn test_page_add_duplicate_fails() {
    let tmp = setup_test_site();

    uidoc()
        .current_dir(tmp.path())
        .args(["page", "add", "Landing"])
        .assert()
        .success();
    uidoc()
        .current_dir(tmp.path())
        .args(["page", "add", "Landing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_page_drop_appends_example_module() {
    let tmp = setup_test_site();

    uidoc()
        .current_dir(tmp.path())
        .args(["page", "drop", "Landing", "Article"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 modules, 1/1 types"));

    uidoc()
        .current_dir(tmp.path())
        .args(["page", "show", "Landing"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0: "))
        .stdout(predicate::str::contains("Article"));
}

#[test]
fn test_page_drop_without_example_is_noop() {
    let tmp = setup_test_site();
    fs::write(
        tmp.path().join("schemas/Quote.json"),
        r#"{ "@type": "Quote" }"#,
    )
    .unwrap();

    uidoc()
        .current_dir(tmp.path())
        .args(["page", "drop", "Landing", "Quote"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing added"));

    // nothing was persisted by the no-op
    uidoc()
        .current_dir(tmp.path())
        .args(["page", "show", "Landing"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 modules"));
}

#[test]
fn test_page_edit_inline_json() {
    let tmp = setup_test_site();

    uidoc()
        .current_dir(tmp.path())
        .args(["page", "drop", "Landing", "Article"])
        .assert()
        .success();

    uidoc()
        .current_dir(tmp.path())
        .args([
            "page",
            "edit",
            "Landing",
            "0",
            "--json",
            r#"{ "@type": "Article", "title": "Edited headline", "body": "x" }"#,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated module"));

    let stored = fs::read_to_string(tmp.path().join("pages/Landing.json")).unwrap();
    assert!(stored.contains("Edited headline"));
}

#[test]
fn test_page_edit_invalid_json_leaves_page_unchanged() {
    let tmp = setup_test_site();

    uidoc()
        .current_dir(tmp.path())
        .args(["page", "drop", "Landing", "Article"])
        .assert()
        .success();

    let before = fs::read_to_string(tmp.path().join("pages/Landing.json")).unwrap();

    uidoc()
        .current_dir(tmp.path())
        .args(["page", "edit", "Landing", "0", "--json", "{ not json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid JSON"));

    let after = fs::read_to_string(tmp.path().join("pages/Landing.json")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_page_edit_out_of_bounds_fails() {
    let tmp = setup_test_site();

    uidoc()
        .current_dir(tmp.path())
        .args(["page", "edit", "Landing", "3", "--json", "{}"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no module at index"));
}

#[test]
fn test_page_rm_module_empties_page() {
    let tmp = setup_test_site();

    uidoc()
        .current_dir(tmp.path())
        .args(["page", "drop", "Landing", "Article"])
        .assert()
        .success();

    uidoc()
        .current_dir(tmp.path())
        .args(["page", "rm-module", "Landing", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 modules"));
}

#[test]
fn test_page_preview_prints_standalone_document() {
    let tmp = setup_test_site();

    uidoc()
        .current_dir(tmp.path())
        .args(["page", "drop", "Landing", "Article"])
        .assert()
        .success();

    uidoc()
        .current_dir(tmp.path())
        .args(["page", "preview", "Landing", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<!DOCTYPE html>"))
        .stdout(predicate::str::contains("Hello world"));
}

// ============================================================================
// Completions Command Tests
// ============================================================================

#[test]
fn test_completions_bash() {
    uidoc()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("uidoc"));
}
