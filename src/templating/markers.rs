//! Marker regions inside template files.
//!
//! A region starts at a line containing the begin label followed by the name
//! of a root module and ends at the next end label:
//!
//! ```html
//! <!-- ngdeps:begin app -->
//! <script src="old.js"></script>
//! <!-- ngdeps:end -->
//! ```
//!
//! Rewriting replaces everything between the two marker lines and keeps the
//! marker lines themselves, so a template can be rewritten any number of times.
//! When both labels share a line, the end label is moved onto its own line.

use regex::Regex;

use crate::constants::{DEFAULT_BEGIN_MARKER, DEFAULT_END_MARKER};
use crate::core::NgdepsError;

/// Begin and end labels delimiting injection regions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markers {
    /// Label opening a region; the root module name follows it
    pub begin: String,
    /// Label closing a region
    pub end: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            begin: DEFAULT_BEGIN_MARKER.to_string(),
            end: DEFAULT_END_MARKER.to_string(),
        }
    }
}

/// Module name right after the begin label, optionally glued to `-->`.
const MODULE_NAME_PATTERN: &str = r"^\s+([A-Za-z_$][\w.$-]*?)(?:-->|\s|$)";

/// Rewrite every marker region of `content`.
///
/// `render` receives the root module named by each begin marker and returns
/// the lines to place inside the region. Each line is indented like the begin
/// marker line.
///
/// # Errors
///
/// - [`NgdepsError::MissingMarker`] when the begin label never occurs, or an
///   end label is missing after a begin label
/// - [`NgdepsError::MissingRootModule`] when a begin label is not followed by
///   a module name
/// - whatever `render` returns
pub fn inject_markers<F>(
    content: &str,
    file: &str,
    markers: &Markers,
    mut render: F,
) -> Result<String, NgdepsError>
where
    F: FnMut(&str) -> Result<Vec<String>, NgdepsError>,
{
    let newline = if content.contains("\r\n") {
        "\r\n"
    } else {
        "\n"
    };

    let module_name = Regex::new(MODULE_NAME_PATTERN).map_err(|e| NgdepsError::Other {
        message: format!("Invalid module name pattern: {e}"),
    })?;

    let mut output = String::with_capacity(content.len());
    let mut rest = content;
    let mut regions = 0usize;

    while let Some(begin_at) = rest.find(&markers.begin) {
        let line_start = rest[..begin_at].rfind('\n').map_or(0, |i| i + 1);
        let line_end = rest[begin_at..].find('\n').map_or(rest.len(), |i| begin_at + i);
        let label_end = begin_at + markers.begin.len();

        let name = module_name
            .captures(&rest[label_end..line_end])
            .and_then(|captures| captures.get(1))
            .ok_or_else(|| NgdepsError::MissingRootModule {
                file: file.to_string(),
                label: markers.begin.clone(),
            })?;
        let module = name.as_str();
        let name_end = label_end + name.end();

        let end_at = rest[name_end..]
            .find(&markers.end)
            .map(|offset| name_end + offset)
            .ok_or_else(|| NgdepsError::MissingMarker {
                file: file.to_string(),
                label: markers.end.clone(),
            })?;

        let marker_line = &rest[line_start..begin_at];
        let indent = &marker_line[..marker_line.len() - marker_line.trim_start().len()];

        tracing::debug!("{file}: injecting tags for root module '{module}'");
        let lines = render(module)?;

        if end_at < line_end {
            // Both labels on one line: split after the begin comment and move
            // the end label onto its own line.
            let split = rest[name_end..end_at].find("-->").map_or(name_end, |i| name_end + i + 3);
            output.push_str(&rest[..split]);
            output.push_str(newline);
            for line in &lines {
                output.push_str(indent);
                output.push_str(line);
                output.push_str(newline);
            }
            output.push_str(indent);
            output.push_str(rest[split..end_at].trim_start());
        } else {
            let end_line_start = rest[..end_at].rfind('\n').map_or(0, |i| i + 1);
            output.push_str(&rest[..line_end]);
            output.push('\n');
            for line in &lines {
                output.push_str(indent);
                output.push_str(line);
                output.push_str(newline);
            }
            output.push_str(&rest[end_line_start..end_at]);
        }
        output.push_str(&markers.end);

        rest = &rest[end_at + markers.end.len()..];
        regions += 1;
    }

    if regions == 0 {
        return Err(NgdepsError::MissingMarker {
            file: file.to_string(),
            label: markers.begin.clone(),
        });
    }

    output.push_str(rest);
    Ok(output)
}
