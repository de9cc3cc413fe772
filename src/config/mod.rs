//! Project configuration (`ngdeps.toml`).
//!
//! A project is described by one TOML file. Relative paths inside it are
//! resolved against the directory containing the file, so `ngdeps` behaves
//! the same from any subdirectory of the project.
//!
//! ```toml
//! extensions = ["js"]
//!
//! [[roots]]
//! path = "src"
//! strip_prefix = "src"
//! prefix = "/static"
//! async = ["vendor/**"]
//! exclude = ["**/*.spec.js"]
//!
//! [[templates]]
//! path = "index.html"
//!
//! [markers]
//! begin = "ngdeps:begin"
//! end = "ngdeps:end"
//!
//! [validation]
//! minify_ready = true
//! provider_scope = "module"
//! strict = false
//!
//! [tags]
//! script = '<script src="{{ path }}"{% if async %} async{% endif %}></script>'
//! style = '<link rel="stylesheet" href="{{ path }}">'
//! ```
//!
//! Every section except `[[roots]]` is optional.

mod parser;

pub use parser::{find_config, find_config_from, parse_config};

use anyhow::Result;
use glob::Pattern;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{
    DEFAULT_BEGIN_MARKER, DEFAULT_END_MARKER, DEFAULT_EXTENSION, DEFAULT_SCRIPT_TAG,
    DEFAULT_STYLE_TAG,
};
use crate::core::NgdepsError;
use crate::graph::{BuildOptions, PathMapping, SourceRoot};
use crate::templating::{Markers, TagRenderer};
use crate::validate::ProviderScope;

/// Contents of `ngdeps.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Source file extensions to scan
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Directories to scan, in order
    #[serde(default)]
    pub roots: Vec<RootConfig>,

    /// Template files to rewrite
    #[serde(default)]
    pub templates: Vec<TemplateConfig>,

    /// Marker labels
    #[serde(default)]
    pub markers: MarkersConfig,

    /// Validation behaviour
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Tag templates
    #[serde(default)]
    pub tags: TagsConfig,
}

/// One `[[roots]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootConfig {
    /// Directory to scan
    pub path: PathBuf,
    /// Leading path removed from file identifiers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strip_prefix: Option<PathBuf>,
    /// URL prefix prepended to file identifiers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    /// Globs (relative to the project) of files loaded asynchronously
    #[serde(default, rename = "async")]
    pub async_patterns: Vec<String>,
    /// Globs (relative to the root) of files to skip
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// One `[[templates]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Template file to rewrite
    pub path: PathBuf,
}

/// `[markers]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkersConfig {
    /// Label opening a region
    pub begin: String,
    /// Label closing a region
    pub end: String,
}

impl Default for MarkersConfig {
    fn default() -> Self {
        Self {
            begin: DEFAULT_BEGIN_MARKER.to_string(),
            end: DEFAULT_END_MARKER.to_string(),
        }
    }
}

/// `[validation]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Report constructors that do not survive minification
    pub minify_ready: bool,
    /// How provider names registered by several modules are attributed
    pub provider_scope: ProviderScope,
    /// Treat every finding as fatal
    pub strict: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            minify_ready: true,
            provider_scope: ProviderScope::default(),
            strict: false,
        }
    }
}

/// `[tags]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagsConfig {
    /// Template for script entries
    pub script: String,
    /// Template for `.css` entries
    pub style: String,
}

impl Default for TagsConfig {
    fn default() -> Self {
        Self {
            script: DEFAULT_SCRIPT_TAG.to_string(),
            style: DEFAULT_STYLE_TAG.to_string(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    vec![DEFAULT_EXTENSION.to_string()]
}

impl ProjectConfig {
    /// Reject configurations that cannot drive a scan.
    pub fn validate(&self) -> Result<(), NgdepsError> {
        if self.roots.is_empty() {
            return Err(config_error("at least one [[roots]] entry is required"));
        }
        if self.extensions.iter().all(|ext| ext.trim_start_matches('.').is_empty()) {
            return Err(config_error("`extensions` must name at least one file extension"));
        }
        if self.markers.begin.trim().is_empty() || self.markers.end.trim().is_empty() {
            return Err(config_error("marker labels must not be empty"));
        }
        if self.markers.begin == self.markers.end {
            return Err(config_error("begin and end marker labels must differ"));
        }
        Ok(())
    }
}

fn config_error(message: &str) -> NgdepsError {
    NgdepsError::ConfigError {
        message: message.to_string(),
    }
}

fn compile_globs(patterns: &[String]) -> Result<Vec<Pattern>, NgdepsError> {
    patterns
        .iter()
        .map(|pattern| {
            Pattern::new(pattern)
                .map_err(|e| config_error(&format!("invalid glob '{pattern}': {e}")))
        })
        .collect()
}

/// A loaded configuration together with the directory it applies to.
#[derive(Debug, Clone)]
pub struct Project {
    /// Directory containing `ngdeps.toml`
    pub dir: PathBuf,
    /// Parsed configuration
    pub config: ProjectConfig,
}

impl Project {
    /// Find, parse and validate the configuration.
    ///
    /// `explicit` is the `--config` argument, if any.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = find_config(explicit)?;
        Self::from_file(&path)
    }

    /// Parse and validate the configuration at `path`.
    pub fn from_file(path: &Path) -> Result<Self> {
        let config: ProjectConfig = parse_config(path)?;
        config.validate()?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Ok(Self {
            dir,
            config,
        })
    }

    /// Resolve a configured path against the project directory.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.dir.join(path)
        }
    }

    /// Source roots with their mappers and exclude globs.
    pub fn source_roots(&self) -> Result<Vec<SourceRoot>, NgdepsError> {
        self.config
            .roots
            .iter()
            .map(|root| -> Result<SourceRoot, NgdepsError> {
                let mut mapping = PathMapping::new(&self.dir)
                    .with_async_patterns(compile_globs(&root.async_patterns)?);
                if let Some(strip) = &root.strip_prefix {
                    mapping = mapping.with_strip_prefix(strip);
                }
                if let Some(prefix) = &root.prefix {
                    mapping = mapping.with_prefix(prefix);
                }

                Ok(SourceRoot::new(self.resolve_path(&root.path))
                    .with_mapper(mapping)
                    .with_exclude(compile_globs(&root.exclude)?))
            })
            .collect()
    }

    /// Template files to rewrite, resolved against the project directory.
    pub fn template_paths(&self) -> Vec<PathBuf> {
        self.config.templates.iter().map(|template| self.resolve_path(&template.path)).collect()
    }

    /// Scan options derived from `extensions` and `[validation]`.
    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            extensions: self.config.extensions.clone(),
            require_minify_ready: self.config.validation.minify_ready,
        }
    }

    /// Marker labels from `[markers]`.
    pub fn markers(&self) -> Markers {
        Markers {
            begin: self.config.markers.begin.clone(),
            end: self.config.markers.end.clone(),
        }
    }

    /// Tag renderer compiled from `[tags]`.
    pub fn tag_renderer(&self) -> Result<TagRenderer, NgdepsError> {
        TagRenderer::new(&self.config.tags.script, &self.config.tags.style)
    }
}
