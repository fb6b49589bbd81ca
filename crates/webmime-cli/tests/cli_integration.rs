use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn webmime(config_dir: &Path) -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("webmime");
    cmd.env_remove("RUST_LOG");
    cmd.arg("--config-dir").arg(config_dir);
    cmd
}

fn document(config_dir: &Path) -> String {
    std::fs::read_to_string(config_dir.join("webui_mime_types.json")).unwrap()
}

#[test]
fn test_list_empty() {
    let temp = tempfile::tempdir().unwrap();

    webmime(temp.path())
        .arg("list")
        .assert()
        .success()
        .stdout("No overrides configured.\n");

    assert!(!temp.path().join("webui_mime_types.json").exists());
}

#[test]
fn test_add_then_list() {
    let temp = tempfile::tempdir().unwrap();

    webmime(temp.path())
        .args(["add", ".JPG", " image/jpeg "])
        .assert()
        .success();
    webmime(temp.path())
        .args(["add", "avif", "image/avif"])
        .assert()
        .success();

    webmime(temp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains(".avif      image/avif"))
        .stdout(predicate::str::contains(".jpg       image/jpeg"));

    assert_eq!(
        document(temp.path()),
        "{\n  \"avif\": \"image/avif\",\n  \"jpg\": \"image/jpeg\"\n}\n"
    );
}

#[test]
fn test_add_duplicate_is_rejected() {
    let temp = tempfile::tempdir().unwrap();
    webmime(temp.path())
        .args(["add", "jpg", "image/jpeg"])
        .assert()
        .success();

    webmime(temp.path())
        .args(["add", "JPG", "image/x"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already exists"));

    assert!(document(temp.path()).contains("image/jpeg"));
}

#[test]
fn test_add_invalid_entry_is_rejected() {
    let temp = tempfile::tempdir().unwrap();

    webmime(temp.path())
        .args(["add", "...", "text/plain"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("valid file extension"));

    webmime(temp.path())
        .args(["add", "txt", "   "])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("valid content type"));
}

#[test]
fn test_update_changes_entry() {
    let temp = tempfile::tempdir().unwrap();
    webmime(temp.path())
        .args(["add", "js", "application/javascript"])
        .assert()
        .success();

    webmime(temp.path())
        .args(["update", ".js", "mjs", "text/javascript"])
        .assert()
        .success();

    assert_eq!(
        document(temp.path()),
        "{\n  \"mjs\": \"text/javascript\"\n}\n"
    );

    webmime(temp.path())
        .args(["update", "js", "js", "text/javascript"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no override for extension 'js'"));
}

#[test]
fn test_remove_is_all_or_nothing() {
    let temp = tempfile::tempdir().unwrap();
    for (ext, content_type) in [
        ("css", "text/css"),
        ("js", "text/javascript"),
        ("svg", "image/svg+xml"),
    ] {
        webmime(temp.path())
            .args(["add", ext, content_type])
            .assert()
            .success();
    }

    webmime(temp.path())
        .args(["remove", "css", "html"])
        .assert()
        .code(2);
    assert!(document(temp.path()).contains("\"css\""));

    webmime(temp.path())
        .args(["remove", ".CSS", "svg"])
        .assert()
        .success();
    assert_eq!(
        document(temp.path()),
        "{\n  \"js\": \"text/javascript\"\n}\n"
    );
}

#[test]
fn test_lookup_by_extension() {
    let temp = tempfile::tempdir().unwrap();
    webmime(temp.path())
        .args(["add", "png", "image/png"])
        .assert()
        .success();

    webmime(temp.path())
        .args(["lookup", "PNG"])
        .assert()
        .success()
        .stdout("image/png\n");

    webmime(temp.path())
        .args(["lookup", "gif"])
        .assert()
        .code(1)
        .stdout("");
}

#[test]
fn test_lookup_by_path_requires_existing_file() {
    let temp = tempfile::tempdir().unwrap();
    let config_dir = temp.path().join("config");
    webmime(&config_dir)
        .args(["add", "png", "image/png"])
        .assert()
        .success();

    let asset = temp.path().join("logo.png");
    webmime(&config_dir)
        .arg("lookup")
        .arg("--path")
        .arg(&asset)
        .assert()
        .code(1);

    std::fs::write(&asset, b"\x89PNG").unwrap();
    webmime(&config_dir)
        .arg("lookup")
        .arg("--path")
        .arg(&asset)
        .assert()
        .success()
        .stdout("image/png\n");
}

#[test]
fn test_list_json() {
    let temp = tempfile::tempdir().unwrap();
    webmime(temp.path())
        .args(["add", "wasm", "application/wasm"])
        .assert()
        .success();

    let output = webmime(temp.path())
        .args(["list", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json[0]["extension"], "wasm");
    assert_eq!(json[0]["content_type"], "application/wasm");
}

#[test]
fn test_corrupt_document_warns_and_lists_empty() {
    let temp = tempfile::tempdir().unwrap();
    std::fs::write(temp.path().join("webui_mime_types.json"), "[1, 2, 3]").unwrap();

    webmime(temp.path())
        .arg("list")
        .assert()
        .success()
        .stdout("No overrides configured.\n")
        .stderr(predicate::str::contains("Failed to load WebUI MIME overrides"));
}
