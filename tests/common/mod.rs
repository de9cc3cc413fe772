//! Shared helpers for the integration suite.

use assert_cmd::Command;
use ngdeps_cli::test_utils::SourceTree;
use std::path::{Path, PathBuf};

/// Configuration for the standard project: one root, one template.
pub const STANDARD_CONFIG: &str = r#"
[[roots]]
path = "src"
strip_prefix = "src"
prefix = "/static"

[[templates]]
path = "index.html"
"#;

/// Template with a single region for `app`.
pub const INDEX_HTML: &str = "\
<html>
  <head>
    <!-- ngdeps:begin app -->
    <!-- ngdeps:end -->
  </head>
</html>
";

/// `INDEX_HTML` after injection into the standard project.
pub const INJECTED_INDEX_HTML: &str = "\
<html>
  <head>
    <!-- ngdeps:begin app -->
    <script src=\"/static/core/core.js\"></script>
    <script src=\"/static/app/app.js\"></script>
    <script src=\"/static/app/main.ctrl.js\"></script>
    <!-- ngdeps:end -->
  </head>
</html>
";

/// A temporary project directory driven through the `ngdeps` binary.
pub struct TestProject {
    tree: SourceTree,
}

impl TestProject {
    /// Empty project directory.
    pub fn new() -> Self {
        Self {
            tree: SourceTree::new(),
        }
    }

    /// Project with `core` and `app` modules and an `index.html` template.
    ///
    /// `app` depends on `core` and on the external `ngRoute`; its controller
    /// injects the `api` factory registered by `core`.
    pub fn standard() -> Self {
        let project = Self::new();
        project.write("ngdeps.toml", STANDARD_CONFIG);
        project.write(
            "src/core/core.js",
            "angular.module('core', [])\n  .factory('api', ['$http', function ($http) { return {}; }]);\n",
        );
        project.write("src/app/app.js", "angular.module('app', ['core', 'ngRoute']);\n");
        project.write(
            "src/app/main.ctrl.js",
            "angular.module('app').controller('MainCtrl', ['$scope', 'api', function ($scope, api) {}]);\n",
        );
        project.write("index.html", INDEX_HTML);
        project
    }

    pub fn path(&self) -> &Path {
        self.tree.path()
    }

    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        self.tree.write(relative, content)
    }

    pub fn read(&self, relative: &str) -> String {
        self.tree.read(relative)
    }

    /// `ngdeps` running in the project directory without colors or spinners.
    pub fn ngdeps(&self) -> Command {
        let mut cmd = Command::cargo_bin("ngdeps").unwrap();
        cmd.current_dir(self.path())
            .env("NO_COLOR", "1")
            .env("NGDEPS_NO_PROGRESS", "1")
            .env_remove("RUST_LOG");
        cmd
    }
}
