use predicates::prelude::*;

use crate::common::TestProject;

#[test]
fn test_graph_to_stdout() {
    let project = TestProject::standard();

    project
        .ngdeps()
        .arg("graph")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("digraph modules {"))
        .stdout(predicate::str::contains("\"app\" -> \"core\";"))
        .stdout(predicate::str::contains("ngRoute").not());
}

#[test]
fn test_graph_to_file() {
    let project = TestProject::standard();

    project
        .ngdeps()
        .args(["graph", "--output", "modules.dot"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 2 module(s) to modules.dot"));

    let dot = project.read("modules.dot");
    assert!(dot.contains("    \"core\";\n"));
    assert!(dot.ends_with("}\n"));
}
