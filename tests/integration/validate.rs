use predicates::prelude::*;
use serde_json::Value;

use crate::common::{INDEX_HTML, TestProject};

fn json_output(project: &TestProject, args: &[&str], success: bool) -> Value {
    let assert = project.ngdeps().args(args).assert();
    let assert = if success {
        assert.success()
    } else {
        assert.failure()
    };
    serde_json::from_slice(&assert.get_output().stdout).unwrap()
}

/// Test validating a clean project
#[test]
fn test_validate_clean_project() {
    let project = TestProject::standard();

    project
        .ngdeps()
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ Scanned 3 file(s), 2 module(s), 1 template(s)"))
        .stdout(predicate::str::contains("No blocking problems found"));

    // Validation never writes
    assert_eq!(project.read("index.html"), INDEX_HTML);
}

#[test]
fn test_validate_json_clean_project() {
    let project = TestProject::standard();

    let results = json_output(&project, &["validate", "--format", "json"], true);
    assert_eq!(results["valid"], true);
    assert_eq!(results["modules"], 2);
    assert_eq!(results["files_scanned"], 3);
    assert_eq!(results["templates"], 1);
    assert!(results["cycle"].is_null());
    assert_eq!(results["issues"], Value::Array(Vec::new()));
    assert_eq!(results["errors"], Value::Array(Vec::new()));
}

/// Build issues are warnings by default and keep validation passing
#[test]
fn test_validate_undeclared_module_is_warning() {
    let project = TestProject::standard();
    project.write("src/widgets.js", "angular.module('widgets').directive('chart', ['$q', function ($q) {}]);\n");

    project
        .ngdeps()
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("⚠ Warning: module 'widgets' is referenced but never declared"));

    let results = json_output(&project, &["validate", "--format", "json"], true);
    assert_eq!(results["issues"][0]["kind"], "undeclared_module");
    assert_eq!(results["issues"][0]["module"], "widgets");
    assert_eq!(results["warnings"].as_array().unwrap().len(), 1);
}

#[test]
fn test_validate_strict_turns_findings_into_errors() {
    let project = TestProject::standard();
    project.write("src/widgets.js", "angular.module('widgets').directive('chart', ['$q', function ($q) {}]);\n");

    project
        .ngdeps()
        .args(["validate", "--strict"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("✗ module 'widgets' is referenced but never declared"))
        .stderr(predicate::str::contains("Validation failed with 1 issue(s)"));
}

/// Cycles fail validation even without --strict
#[test]
fn test_validate_cycle_always_fails() {
    let project = TestProject::standard();
    project.write("src/core/core.js", "angular.module('core', ['app']);\n");

    let results = json_output(&project, &["validate", "--format", "json"], false);
    assert_eq!(results["valid"], false);
    assert_eq!(results["cycle"], serde_json::json!(["app", "core", "app"]));
    let errors = results["errors"].as_array().unwrap();
    assert!(errors.iter().any(|e| e.as_str().unwrap().contains("app -> core -> app")));
}

#[test]
fn test_validate_reports_template_errors() {
    let project = TestProject::standard();
    project.write("index.html", "<!-- ngdeps:begin admin -->\n<!-- ngdeps:end -->\n");

    project
        .ngdeps()
        .arg("validate")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Module 'admin' not found in the scanned sources"))
        .stderr(predicate::str::contains("Validation failed with 1 issue(s)"));
}

#[test]
fn test_validate_json_lists_violations() {
    let project = TestProject::standard();
    project.write(
        "src/reports/reports.js",
        "angular.module('reports', []).controller('ReportsCtrl', ['api', function (api) {}]);\n",
    );

    let results = json_output(&project, &["validate", "--format", "json"], true);
    let violation = &results["violations"][0];
    assert_eq!(violation["kind"], "missing_dependency");
    assert_eq!(violation["module"], "reports");
    assert_eq!(violation["provider"], "ReportsCtrl");
    assert_eq!(violation["inject"], "api");
    assert_eq!(violation["owner"], "core");
}

#[test]
fn test_validate_global_provider_scope() {
    let project = TestProject::standard();
    project.write(
        "ngdeps.toml",
        &format!("{}\n[validation]\nprovider_scope = \"global\"\n", crate::common::STANDARD_CONFIG),
    );
    project.write("src/mocks/mocks.js", "angular.module('mocks', []).factory('api', [function () {}]);\n");

    let results = json_output(&project, &["validate", "--format", "json"], true);
    let violation = &results["violations"][0];
    assert_eq!(violation["kind"], "global_provider_collision");
    assert_eq!(violation["provider"], "api");
}

/// Minify checks can be turned off
#[test]
fn test_validate_minify_ready_disabled() {
    let project = TestProject::standard();
    project.write(
        "ngdeps.toml",
        &format!("{}\n[validation]\nminify_ready = false\n", crate::common::STANDARD_CONFIG),
    );
    project.write("src/util/clock.js", "angular.module('core').factory('clock', function ($window) {});\n");

    let results = json_output(&project, &["validate", "--strict", "--format", "json"], true);
    assert_eq!(results["issues"], Value::Array(Vec::new()));
}
