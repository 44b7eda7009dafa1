use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::tempdir;

const PAGE: &str = "<html>\n<script>\nvar a = 1;\n</script>\n<body>\n</body>\n</html>\n";

fn polyloc() -> Command {
    Command::new(env!("CARGO_BIN_EXE_polyloc"))
}

#[test]
fn shows_help() {
    polyloc()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("polyloc"))
        .stdout(predicate::str::contains("--map-ext"));
}

#[test]
fn requires_paths() {
    polyloc().assert().failure();
}

#[test]
fn prints_table_for_directory() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("page.html"), PAGE).unwrap();
    fs::write(dir.path().join("style.css"), "p {\n  color: red;\n}\n").unwrap();

    polyloc()
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("PSLOC"))
        .stdout(predicate::str::contains("page.html#1.javascript"))
        .stdout(predicate::str::contains("TOTAL (2 files)"));
}

#[test]
fn json_output_links_extract_to_host() {
    let dir = tempdir().unwrap();
    let page = dir.path().join("page.html");
    fs::write(&page, PAGE).unwrap();

    let output = polyloc()
        .args(["--format", "json"])
        .arg(&page)
        .output()
        .unwrap();
    assert!(output.status.success());

    let v: Value = serde_json::from_slice(&output.stdout).unwrap();
    let units = v["units"].as_array().unwrap();
    assert_eq!(units.len(), 2);
    assert_eq!(units[0]["has_embedded_code"], true);
    assert_eq!(units[1]["embedded_of"], units[0]["id"]);
    assert_eq!(units[1]["metrics"]["lsloc"], 1);
    // <html> <script> <body>
    assert_eq!(units[0]["metrics"]["lsloc"], 3);
}

#[test]
fn missing_file_is_reported_but_not_fatal() {
    let dir = tempdir().unwrap();
    let ok = dir.path().join("ok.html");
    fs::write(&ok, "<p>\n").unwrap();

    polyloc()
        .arg(dir.path().join("missing.html"))
        .arg(&ok)
        .assert()
        .success()
        .stderr(predicate::str::contains("[warn]"))
        .stdout(predicate::str::contains("1 files could not be fully processed"));
}

#[test]
fn map_ext_routes_unknown_extension() {
    let dir = tempdir().unwrap();
    let vue = dir.path().join("app.vue");
    fs::write(&vue, "<template>\n<div>\n</div>\n</template>\n").unwrap();

    let output = polyloc()
        .args(["--format", "json", "--map-ext", "vue=html"])
        .arg(&vue)
        .output()
        .unwrap();
    let v: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(v["units"][0]["language"], "html");
    assert_eq!(v["totals"]["lsloc"], 2);
}

#[test]
fn map_ext_to_unknown_language_fails() {
    let dir = tempdir().unwrap();
    polyloc()
        .args(["--map-ext", "vue=cobol"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("cobol"));
}

#[test]
fn diff_dir_receives_artifact() {
    let src = tempdir().unwrap();
    let out = tempdir().unwrap();
    let page = src.path().join("page.html");
    fs::write(&page, PAGE).unwrap();

    polyloc()
        .arg("--diff-dir")
        .arg(out.path())
        .arg(&page)
        .assert()
        .success();

    let artifacts: Vec<_> = fs::read_dir(out.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(artifacts.len(), 1);
    let text = fs::read_to_string(&artifacts[0]).unwrap();
    assert!(text.contains("\t1\t<html>\n"));
    assert!(text.contains("\t1\tvar a = 1;\n"));
}

#[test]
fn dups_lists_identical_files() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.html"), PAGE).unwrap();
    fs::write(dir.path().join("b.html"), PAGE).unwrap();

    polyloc()
        .arg("--dups")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Duplicate files:"))
        .stdout(predicate::str::contains("a.html"));
}

#[test]
fn complexity_adds_second_table() {
    let dir = tempdir().unwrap();
    let js = dir.path().join("app.js");
    fs::write(&js, "if (a == b) {\n  x = y + 1;\n}\n").unwrap();

    polyloc()
        .arg("--complexity")
        .arg(&js)
        .assert()
        .success()
        .stdout(predicate::str::contains("COND"));
}

#[test]
fn bad_profiles_file_fails() {
    let dir = tempdir().unwrap();
    let profiles = dir.path().join("profiles.json");
    fs::write(&profiles, "{ not json").unwrap();

    polyloc()
        .arg("--profiles")
        .arg(&profiles)
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("[error]"));
}
