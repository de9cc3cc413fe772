use predicates::prelude::*;

use crate::common::{STANDARD_CONFIG, TestProject};

#[test]
fn test_missing_config() {
    let project = TestProject::new();

    project
        .ngdeps()
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("ngdeps.toml not found"))
        .stderr(predicate::str::contains("suggestion"));
}

/// The configuration is found from a subdirectory
#[test]
fn test_config_found_in_parent_directory() {
    let project = TestProject::standard();
    project.write("src/app/nested/.keep", "");

    project
        .ngdeps()
        .current_dir(project.path().join("src/app/nested"))
        .args(["resolve", "app"])
        .assert()
        .success()
        .stdout("core\n");
}

#[test]
fn test_explicit_config_path() {
    let project = TestProject::standard();
    std::fs::rename(project.path().join("ngdeps.toml"), project.path().join("web.toml")).unwrap();

    project.ngdeps().args(["--config", "web.toml", "resolve", "app"]).assert().success().stdout("core\n");
}

#[test]
fn test_explicit_config_missing() {
    let project = TestProject::standard();

    project.ngdeps().args(["--config", "missing.toml", "validate"]).assert().failure();
}

#[test]
fn test_invalid_toml() {
    let project = TestProject::standard();
    project.write("ngdeps.toml", "[[roots]\npath = ");

    project
        .ngdeps()
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration file syntax"));
}

#[test]
fn test_config_without_roots() {
    let project = TestProject::standard();
    project.write("ngdeps.toml", "[[templates]]\npath = \"index.html\"\n");

    project
        .ngdeps()
        .arg("inject")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_missing_source_root() {
    let project = TestProject::standard();
    project.write("ngdeps.toml", &STANDARD_CONFIG.replace("path = \"src\"", "path = \"app\""));

    project
        .ngdeps()
        .arg("inject")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Source root not found"));
}

/// Files that do not parse are skipped rather than failing the scan
#[test]
fn test_unparseable_source_is_skipped() {
    let project = TestProject::standard();
    project.write("src/broken.js", "angular.module('broken', [;\n");

    project.ngdeps().args(["resolve", "app"]).assert().success().stdout("core\n");
}
