//! Rendering one HTML tag per file entry.

use std::error::Error as _;
use tera::{Context as TeraContext, Tera};

use crate::constants::{ASYNC_MARKER, DEFAULT_SCRIPT_TAG, DEFAULT_STYLE_TAG};
use crate::core::NgdepsError;

const SCRIPT_TEMPLATE: &str = "script";
const STYLE_TEMPLATE: &str = "style";

/// Renders file entries into `<script>` and `<link>` tags.
///
/// Two tera templates are compiled up front. Each sees the variables `path`
/// (the entry without its `!async` token) and `async` (whether the token was
/// present). Entries ending in `.css` use the style template, everything else
/// the script template.
///
/// ```rust
/// use ngdeps_cli::templating::TagRenderer;
///
/// let renderer = TagRenderer::with_defaults()?;
/// assert_eq!(renderer.render("app.js")?, r#"<script src="app.js"></script>"#);
/// assert_eq!(renderer.render("lib.js!async")?, r#"<script src="lib.js" async></script>"#);
/// assert_eq!(renderer.render("app.css")?, r#"<link rel="stylesheet" href="app.css">"#);
/// # Ok::<(), ngdeps_cli::core::NgdepsError>(())
/// ```
#[derive(Debug)]
pub struct TagRenderer {
    tera: Tera,
}

impl TagRenderer {
    /// Compile the given script and style templates.
    ///
    /// # Errors
    ///
    /// Returns [`NgdepsError::TemplateError`] when a template does not parse.
    pub fn new(script: &str, style: &str) -> Result<Self, NgdepsError> {
        let mut tera = Tera::default();
        tera.autoescape_on(Vec::new());
        for (name, source) in [(SCRIPT_TEMPLATE, script), (STYLE_TEMPLATE, style)] {
            tera.add_raw_template(name, source).map_err(|e| template_error(name, &e))?;
        }
        Ok(Self {
            tera,
        })
    }

    /// Compile the built-in templates.
    pub fn with_defaults() -> Result<Self, NgdepsError> {
        Self::new(DEFAULT_SCRIPT_TAG, DEFAULT_STYLE_TAG)
    }

    /// Render the tag for one file entry.
    pub fn render(&self, entry: &str) -> Result<String, NgdepsError> {
        let (path, is_async) = split_async(entry);
        let name = if path.ends_with(".css") {
            STYLE_TEMPLATE
        } else {
            SCRIPT_TEMPLATE
        };

        let mut context = TeraContext::new();
        context.insert("path", path);
        context.insert("async", &is_async);

        self.tera.render(name, &context).map_err(|e| template_error(name, &e))
    }
}

/// Split the `!async` token off a file entry.
pub fn split_async(entry: &str) -> (&str, bool) {
    match entry.strip_suffix(ASYNC_MARKER) {
        Some(path) => (path, true),
        None => (entry, false),
    }
}

/// Tera wraps the useful message in its source chain; collect all of it.
fn template_error(name: &str, error: &tera::Error) -> NgdepsError {
    let mut reason = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        reason.push_str(": ");
        reason.push_str(&cause.to_string());
        source = cause.source();
    }

    NgdepsError::TemplateError {
        name: name.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_async() {
        assert_eq!(split_async("lib.js!async"), ("lib.js", true));
        assert_eq!(split_async("lib.js"), ("lib.js", false));
    }

    #[test]
    fn test_custom_templates() {
        let renderer = TagRenderer::new(
            r#"<script type="text/javascript" src="/assets/{{ path }}"></script>"#,
            r#"<link href="{{ path }}" rel="stylesheet" media="all">"#,
        )
        .unwrap();

        assert_eq!(
            renderer.render("app/app.js").unwrap(),
            r#"<script type="text/javascript" src="/assets/app/app.js"></script>"#
        );
        assert_eq!(
            renderer.render("theme.css").unwrap(),
            r#"<link href="theme.css" rel="stylesheet" media="all">"#
        );
    }

    #[test]
    fn test_paths_are_not_html_escaped() {
        let renderer = TagRenderer::with_defaults().unwrap();
        assert_eq!(
            renderer.render("/static/a&b.js").unwrap(),
            r#"<script src="/static/a&b.js"></script>"#
        );
    }

    #[test]
    fn test_async_css_uses_style_template() {
        let renderer = TagRenderer::with_defaults().unwrap();
        assert_eq!(
            renderer.render("print.css!async").unwrap(),
            r#"<link rel="stylesheet" href="print.css">"#
        );
    }

    #[test]
    fn test_invalid_template_rejected() {
        let err = TagRenderer::new("{% if %}", DEFAULT_STYLE_TAG).unwrap_err();
        assert!(matches!(err, NgdepsError::TemplateError { name, .. } if name == "script"));
    }
}
