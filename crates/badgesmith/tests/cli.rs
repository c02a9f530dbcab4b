use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const CATALOG: &str = r#"{
  "go": {"badge_url": "https://img.example/go.svg"},
  "rust": {"badge_url": "https://img.example/rust.svg"},
  "docker": {}
}"#;

const README: &str = "# Portfolio Site\n\
<!--- Blurb\n\
Static site listing my work.\n\
-->\n\
<!-- Badges: rust, go, unknown -->\n\
<!--- Start of badges -->\n\
<img alt=\"Stale\" src=\"old.svg\" />\n\
<!--- End of badges -->\n\
<!--- Start of Thumbnail-->\n\
<img src=\"./images/thumb.png\" />\n\
<!--- End of Thumbnail-->\n";

const ROW: &str = r#"<p align="left"><img alt="Go" src="https://img.example/go.svg" /> <img alt="Rust" src="https://img.example/rust.svg" /></p>"#;

fn badgesmith(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("badgesmith").unwrap();
    cmd.current_dir(dir).arg("--no-color");
    cmd
}

fn workspace() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("badges.json"), CATALOG).unwrap();
    fs::write(tmp.path().join("README.md"), README).unwrap();
    tmp
}

#[test]
fn test_badges_rewrites_region() {
    let tmp = workspace();
    badgesmith(tmp.path())
        .args(["badges", "README.md"])
        .assert()
        .success()
        .stdout("")
        .stderr(predicate::str::contains("Unknown badge 'unknown', skipping"));

    let written = fs::read_to_string(tmp.path().join("README.md")).unwrap();
    assert!(written.contains(&format!(
        "<!--- Start of badges -->\n{}\n<!--- End of badges -->",
        ROW
    )));
    assert!(!written.contains("Stale"));
    assert!(written.starts_with("# Portfolio Site\n"));
}

#[test]
fn test_badges_second_run_is_noop() {
    let tmp = workspace();
    badgesmith(tmp.path()).args(["badges", "README.md"]).assert().success();
    let first = fs::read_to_string(tmp.path().join("README.md")).unwrap();

    badgesmith(tmp.path())
        .args(["badges", "--check", "README.md"])
        .assert()
        .success();
    assert_eq!(fs::read_to_string(tmp.path().join("README.md")).unwrap(), first);
}

#[test]
fn test_bad_catalog_entry_skipped_alone() {
    let tmp = workspace();
    fs::write(
        tmp.path().join("badges.json"),
        r#"{"go": {"badge_url": "https://img.example/go.svg"}, "rust": "n/a"}"#,
    )
    .unwrap();
    badgesmith(tmp.path())
        .args(["badges", "README.md"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Unknown badge 'rust', skipping"));
    assert!(fs::read_to_string(tmp.path().join("README.md"))
        .unwrap()
        .contains(
            "<!--- Start of badges -->\n<p align=\"left\"><img alt=\"Go\" src=\"https://img.example/go.svg\" /></p>\n<!--- End of badges -->"
        ));
}

#[test]
fn test_missing_catalog_leaves_file_alone() {
    let tmp = workspace();
    fs::remove_file(tmp.path().join("badges.json")).unwrap();
    badgesmith(tmp.path())
        .args(["badges", "README.md"])
        .assert()
        .success()
        .stderr(predicate::str::contains("No badges available"));
    assert_eq!(
        fs::read_to_string(tmp.path().join("README.md")).unwrap(),
        README
    );
}

#[test]
fn test_check_reports_pending_change() {
    let tmp = workspace();
    badgesmith(tmp.path())
        .args(["badges", "--check", "README.md"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("-<img alt=\"Stale\" src=\"old.svg\" />"));
    assert_eq!(
        fs::read_to_string(tmp.path().join("README.md")).unwrap(),
        README
    );
}

#[test]
fn test_keys_file_overrides_request() {
    let tmp = workspace();
    fs::write(tmp.path().join("keys.txt"), "go\n\n").unwrap();
    badgesmith(tmp.path())
        .args(["badges", "--keys-file", "keys.txt", "README.md"])
        .assert()
        .success();
    let written = fs::read_to_string(tmp.path().join("README.md")).unwrap();
    assert!(written.contains(
        "<!--- Start of badges -->\n<p align=\"left\"><img alt=\"Go\" src=\"https://img.example/go.svg\" /></p>\n<!--- End of badges -->"
    ));
}

#[test]
fn test_missing_file_skipped() {
    let tmp = workspace();
    badgesmith(tmp.path())
        .args(["badges", "absent.md", "README.md"])
        .assert()
        .success()
        .stderr(predicate::str::contains("absent.md (not found)"));
    assert!(fs::read_to_string(tmp.path().join("README.md"))
        .unwrap()
        .contains(ROW));
}

#[test]
fn test_scan_prints_records() {
    let tmp = workspace();
    let assert = badgesmith(tmp.path())
        .args([
            "scan",
            "--repo-name",
            "octo/site",
            "--is-private",
            "False",
            "--files",
            "README.md",
            "notes.txt",
        ])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let records: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(
        records,
        serde_json::json!([{
            "title": "Portfolio Site",
            "blurb": "Static site listing my work.",
            "badges": ROW,
            "thumbnail_url": "https://raw.githubusercontent.com/octo/site/main/images/thumb.png",
            "url": "https://github.com/octo/site/blob/main/README.md"
        }])
    );
    assert!(fs::read_to_string(tmp.path().join("README.md"))
        .unwrap()
        .contains(ROW));
}

#[test]
fn test_scan_private_repository() {
    let tmp = workspace();
    badgesmith(tmp.path())
        .args([
            "scan",
            "--repo-name",
            "octo/site",
            "--is-private",
            "TRUE",
            "--files",
            "README.md",
        ])
        .assert()
        .success()
        .stdout("[]\n");
    assert!(fs::read_to_string(tmp.path().join("README.md"))
        .unwrap()
        .contains(ROW));
}

#[test]
fn test_grid_injected_between_markers() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("README.md"),
        "# Me\n<!--- Start of project grid -->\n<!--- End of project grid -->\nFooter\n",
    )
    .unwrap();
    fs::write(
        tmp.path().join("projects.json"),
        r#"[{"title":"Alpha","blurb":"First","badges":"","thumbnail_url":"","url":"https://x/a"},
            {"title":"Beta","blurb":"Second","badges":"","thumbnail_url":"https://x/b.png","url":"https://x/b"}]"#,
    )
    .unwrap();

    badgesmith(tmp.path()).arg("grid").assert().success();

    let written = fs::read_to_string(tmp.path().join("README.md")).unwrap();
    assert!(written.starts_with(
        "# Me\n<!--- Start of project grid -->\n<div style=\"text-align: center;\">\n"
    ));
    assert!(written.ends_with("</div>\n<!--- End of project grid -->\nFooter\n"));
    let alpha = written.find(">Alpha</h3>").unwrap();
    let beta = written.find(">Beta</h3>").unwrap();
    assert!(alpha < beta);
    assert!(written.contains(r#"<img src="https://x/b.png""#));

    badgesmith(tmp.path())
        .args(["grid", "--check"])
        .assert()
        .success();
}

#[test]
fn test_bad_config_is_rejected() {
    let tmp = workspace();
    fs::write(tmp.path().join("config.json"), r#"{"badges": {"colour": 1}}"#).unwrap();
    badgesmith(tmp.path())
        .args(["--config", "config.json", "badges", "README.md"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse 'config.json'"));
    assert_eq!(
        fs::read_to_string(tmp.path().join("README.md")).unwrap(),
        README
    );
}

#[test]
fn test_usage_error() {
    Command::cargo_bin("badgesmith")
        .unwrap()
        .arg("badges")
        .assert()
        .code(2);
}
