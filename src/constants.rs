//! Global constants used throughout the ngdeps codebase.
//!
//! Default labels, templates and limits live here so the configuration layer,
//! the graph builder and the CLI agree on them.

/// Name of the project configuration file searched for in parent directories.
pub const CONFIG_FILE_NAME: &str = "ngdeps.toml";

/// Suffix appended to a file identifier to request asynchronous loading.
///
/// File name mappers attach it; the tag renderer strips it again and sets the
/// `async` template variable instead.
pub const ASYNC_MARKER: &str = "!async";

/// File extension scanned when the configuration names none.
pub const DEFAULT_EXTENSION: &str = "js";

/// Default begin label for template markers.
pub const DEFAULT_BEGIN_MARKER: &str = "ngdeps:begin";

/// Default end label for template markers.
pub const DEFAULT_END_MARKER: &str = "ngdeps:end";

/// Default tera template for script entries.
pub const DEFAULT_SCRIPT_TAG: &str =
    r#"<script src="{{ path }}"{% if async %} async{% endif %}></script>"#;

/// Default tera template for stylesheet entries (`.css` files).
pub const DEFAULT_STYLE_TAG: &str = r#"<link rel="stylesheet" href="{{ path }}">"#;

/// Maximum number of source files read concurrently during a scan.
///
/// Reads are buffered in file order, so raising this never changes results.
pub const MAX_CONCURRENT_READS: usize = 32;

/// Environment variable that hides progress spinners when set.
pub const NO_PROGRESS_ENV: &str = "NGDEPS_NO_PROGRESS";
