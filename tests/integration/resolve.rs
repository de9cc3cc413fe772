use predicates::prelude::*;
use serde_json::Value;

use crate::common::TestProject;

#[test]
fn test_resolve_prints_load_order() {
    let project = TestProject::standard();

    project.ngdeps().args(["resolve", "app"]).assert().success().stdout("core\n");
}

#[test]
fn test_resolve_files() {
    let project = TestProject::standard();

    project
        .ngdeps()
        .args(["resolve", "app", "--files"])
        .assert()
        .success()
        .stdout("/static/core/core.js\n/static/app/app.js\n/static/app/main.ctrl.js\n");
}

#[test]
fn test_resolve_json() {
    let project = TestProject::standard();

    let assert = project.ngdeps().args(["resolve", "app", "--files", "--format", "json"]).assert().success();
    let output: Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();

    assert_eq!(output["module"], "app");
    assert_eq!(output["order"], serde_json::json!(["core"]));
    assert_eq!(output["files"][0], "/static/core/core.js");
}

#[test]
fn test_resolve_tree_marks_external_modules() {
    let project = TestProject::standard();

    project
        .ngdeps()
        .args(["resolve", "app", "--tree"])
        .assert()
        .success()
        .stdout("app\n├── core\n└── ngRoute (external)\n");
}

/// The tree still renders when the root reaches a cycle
#[test]
fn test_resolve_tree_shows_cycle() {
    let project = TestProject::standard();
    project.write("src/core/core.js", "angular.module('core', ['app']);\n");

    project
        .ngdeps()
        .args(["resolve", "app", "--tree"])
        .assert()
        .success()
        .stdout(predicate::str::contains("app (circular reference)"));

    project
        .ngdeps()
        .args(["resolve", "app"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Circular dependency detected: app -> core -> app"));
}

#[test]
fn test_resolve_unknown_module() {
    let project = TestProject::standard();

    project
        .ngdeps()
        .args(["resolve", "admin"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Module 'admin' not found in the scanned sources"));
}
