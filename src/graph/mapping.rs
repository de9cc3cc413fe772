//! Configurable file name mapping.

use glob::Pattern;
use std::path::{Path, PathBuf};

use super::FileNameMapper;
use crate::constants::ASYNC_MARKER;
use crate::utils::to_slash_path;

/// Turns file system paths into URL-style identifiers.
///
/// The path is made relative to `base`, then `strip_prefix` is removed
/// (component-wise), then `prefix` is prepended. Files whose base-relative
/// path matches one of the async patterns get the `!async` token appended.
///
/// ```rust
/// use ngdeps_cli::graph::{FileNameMapper, PathMapping};
/// use std::path::Path;
///
/// let mapping = PathMapping::new("/project")
///     .with_strip_prefix("src")
///     .with_prefix("/static");
/// assert_eq!(mapping.map_path(Path::new("/project/src/app/app.js")), "/static/app/app.js");
/// ```
#[derive(Debug, Clone, Default)]
pub struct PathMapping {
    base: PathBuf,
    strip_prefix: Option<PathBuf>,
    prefix: Option<String>,
    async_patterns: Vec<Pattern>,
}

impl PathMapping {
    /// Map paths relative to `base`.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            ..Self::default()
        }
    }

    /// Remove this leading path from every identifier.
    #[must_use]
    pub fn with_strip_prefix(mut self, strip_prefix: impl Into<PathBuf>) -> Self {
        self.strip_prefix = Some(strip_prefix.into());
        self
    }

    /// Prepend this URL prefix to every identifier.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Mark files matching any of `patterns` for asynchronous loading.
    #[must_use]
    pub fn with_async_patterns(mut self, patterns: Vec<Pattern>) -> Self {
        self.async_patterns = patterns;
        self
    }
}

impl FileNameMapper for PathMapping {
    fn map_path(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.base).unwrap_or(path);
        let relative_str = to_slash_path(relative);

        let stripped = match &self.strip_prefix {
            Some(strip) => relative.strip_prefix(strip).unwrap_or(relative),
            None => relative,
        };
        let mut id = to_slash_path(stripped);

        if let Some(prefix) = self.prefix.as_deref().filter(|prefix| !prefix.is_empty()) {
            id = format!("{}/{}", prefix.trim_end_matches('/'), id);
        }

        if self.async_patterns.iter().any(|pattern| pattern.matches(&relative_str)) {
            id.push_str(ASYNC_MARKER);
        }

        id
    }
}
