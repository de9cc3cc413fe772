use predicates::prelude::*;

use crate::common::{INDEX_HTML, INJECTED_INDEX_HTML, TestProject};

/// Injecting into a fresh template writes the load-ordered tags
#[test]
fn test_inject_rewrites_template() {
    let project = TestProject::standard();

    project
        .ngdeps()
        .arg("inject")
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated 1 of 1 template(s)"));

    assert_eq!(project.read("index.html"), INJECTED_INDEX_HTML);
}

/// A second run finds nothing to change
#[test]
fn test_inject_twice_is_stable() {
    let project = TestProject::standard();

    project.ngdeps().arg("inject").assert().success();
    project
        .ngdeps()
        .arg("inject")
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated 0 of 1 template(s)"));

    assert_eq!(project.read("index.html"), INJECTED_INDEX_HTML);
}

/// Stale tags inside the region are replaced
#[test]
fn test_inject_replaces_stale_tags() {
    let project = TestProject::standard();
    project.write(
        "index.html",
        &INDEX_HTML.replace(
            "<!-- ngdeps:begin app -->\n",
            "<!-- ngdeps:begin app -->\n    <script src=\"/static/old.js\"></script>\n",
        ),
    );

    project.ngdeps().arg("inject").assert().success();

    assert_eq!(project.read("index.html"), INJECTED_INDEX_HTML);
}

#[test]
fn test_inject_dry_run_leaves_template() {
    let project = TestProject::standard();

    project
        .ngdeps()
        .args(["inject", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("would be updated"));

    assert_eq!(project.read("index.html"), INDEX_HTML);
}

/// Injection violations are warnings unless strict
#[test]
fn test_inject_warns_on_violation() {
    let project = TestProject::standard();
    project.write(
        "src/reports/reports.js",
        "angular.module('reports', []).controller('ReportsCtrl', ['api', function (api) {}]);\n",
    );

    project
        .ngdeps()
        .arg("inject")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Warning: module 'reports': 'ReportsCtrl' injects 'api' from module 'core', which 'reports' does not depend on",
        ));

    assert_eq!(project.read("index.html"), INJECTED_INDEX_HTML);
}

#[test]
fn test_inject_strict_fails_before_writing() {
    let project = TestProject::standard();
    project.write(
        "src/reports/reports.js",
        "angular.module('reports', []).controller('ReportsCtrl', ['api', function (api) {}]);\n",
    );

    project
        .ngdeps()
        .args(["inject", "--strict"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("✗ module 'reports'"))
        .stderr(predicate::str::contains("Validation failed with 1 issue(s)"));

    assert_eq!(project.read("index.html"), INDEX_HTML);
}

#[test]
fn test_inject_strict_from_config() {
    let project = TestProject::standard();
    project.write(
        "ngdeps.toml",
        &format!("{}\n[validation]\nstrict = true\n", crate::common::STANDARD_CONFIG),
    );
    project.write("src/util/clock.js", "angular.module('core').factory('clock', function ($window) {});\n");

    project
        .ngdeps()
        .arg("inject")
        .assert()
        .failure()
        .stdout(predicate::str::contains("is not minify-ready"));

    assert_eq!(project.read("index.html"), INDEX_HTML);
}

/// Cycles only warn, but a region whose root reaches one cannot be rendered
#[test]
fn test_inject_cycle_reachable_from_root_is_fatal() {
    let project = TestProject::standard();
    project.write("src/core/core.js", "angular.module('core', ['app']);\n");

    project
        .ngdeps()
        .arg("inject")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Warning: Circular dependency detected"))
        .stderr(predicate::str::contains("Circular dependency detected"));

    assert_eq!(project.read("index.html"), INDEX_HTML);
}

#[test]
fn test_inject_strict_cycle() {
    let project = TestProject::standard();
    project.write("src/core/core.js", "angular.module('core', ['app']);\n");

    project
        .ngdeps()
        .args(["inject", "--strict"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Circular dependency detected: app -> core -> app"));
}

#[test]
fn test_inject_template_without_markers() {
    let project = TestProject::standard();
    project.write("index.html", "<html></html>\n");

    project
        .ngdeps()
        .arg("inject")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Marker 'ngdeps:begin' not found"));
}

#[test]
fn test_inject_unknown_root_module() {
    let project = TestProject::standard();
    project.write("index.html", "<!-- ngdeps:begin admin -->\n<!-- ngdeps:end -->\n");

    project
        .ngdeps()
        .arg("inject")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Module 'admin' not found"));
}

/// Async globs and custom tag templates flow through to the output
#[test]
fn test_inject_async_files_with_custom_tags() {
    let project = TestProject::standard();
    project.write(
        "ngdeps.toml",
        r#"
[[roots]]
path = "src"
strip_prefix = "src"
async = ["src/app/*.ctrl.js"]

[[templates]]
path = "index.html"

[tags]
script = '<script defer src="{{ path }}"{% if async %} async{% endif %}></script>'
"#,
    );

    project.ngdeps().arg("inject").assert().success();

    let html = project.read("index.html");
    assert!(html.contains("<script defer src=\"core/core.js\"></script>"));
    assert!(html.contains("<script defer src=\"app/main.ctrl.js\" async></script>"));
}

#[test]
fn test_inject_quiet_prints_nothing() {
    let project = TestProject::standard();

    project.ngdeps().args(["--quiet", "inject"]).assert().success().stdout(predicate::str::is_empty());

    assert_eq!(project.read("index.html"), INJECTED_INDEX_HTML);
}
