//! Declaration extraction from AngularJS-style source files.
//!
//! The extractor turns one file's source text into an ordered list of
//! [`Declaration`] events. It never executes code: the file is parsed with
//! `oxc` and an AST visitor recognises call chains rooted at
//! `angular.module(...)`:
//!
//! ```javascript
//! angular.module('shop', ['core'])          // Module { deps: Some([core]) }
//!     .factory('cart', ['api', function (api) {}])
//!     .value('currency', 'EUR');
//!
//! var app = angular.module('shop');         // Module { deps: None }
//! app.controller('CartCtrl', function () {});
//! ```
//!
//! Events come out in JavaScript evaluation order, so a chain reports its
//! module first and its providers afterwards.
//!
//! Files are parsed as classic scripts (sloppy mode), the way a browser loads
//! them. A file that fails to parse yields no events at all. Malformed or unrelated
//! files are never fatal to a scan.

mod constructor;
mod visitor;

use oxc_allocator::Allocator;
use oxc_parser::{Parser, ParserReturn};
use oxc_span::SourceType;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Registration methods that declare a named, injectable unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// `.provider(name, ctor)`; dependencies come from the `$get` member
    Provider,
    /// `.factory(name, ctor)`
    Factory,
    /// `.service(name, ctor)`
    Service,
    /// `.controller(name, ctor)`
    Controller,
    /// `.directive(name, ctor)`
    Directive,
    /// `.value(name, value)`
    Value,
    /// `.constant(name, value)`
    Constant,
    /// `.decorator(name, fn)`
    Decorator,
    /// `.animation(name, fn)`
    Animation,
    /// `.filter(name, fn)`
    Filter,
}

impl ProviderKind {
    /// Map a chain method name to a provider kind.
    pub fn from_method(method: &str) -> Option<Self> {
        Some(match method {
            "provider" => Self::Provider,
            "factory" => Self::Factory,
            "service" => Self::Service,
            "controller" => Self::Controller,
            "directive" => Self::Directive,
            "value" => Self::Value,
            "constant" => Self::Constant,
            "decorator" => Self::Decorator,
            "animation" => Self::Animation,
            "filter" => Self::Filter,
            _ => return None,
        })
    }

    /// The method name as written in source.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Provider => "provider",
            Self::Factory => "factory",
            Self::Service => "service",
            Self::Controller => "controller",
            Self::Directive => "directive",
            Self::Value => "value",
            Self::Constant => "constant",
            Self::Decorator => "decorator",
            Self::Animation => "animation",
            Self::Filter => "filter",
        }
    }

    /// Whether declarations of this kind have their constructor validated.
    ///
    /// `value`, `constant`, `decorator`, `animation` and `filter` are recorded
    /// but never checked for injects.
    pub const fn is_validated(self) -> bool {
        matches!(
            self,
            Self::Provider | Self::Factory | Self::Service | Self::Controller | Self::Directive
        )
    }

    /// Whether this kind registers a new injectable name.
    ///
    /// Decorators modify a service registered elsewhere.
    pub const fn registers_name(self) -> bool {
        !matches!(self, Self::Decorator)
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Statically recognised shape of a provider's constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constructor {
    /// Minify-ready: `['a', 'b', function (a, b) {}]` or a zero-argument function.
    Annotated(Vec<String>),
    /// A function with parameters but no annotation array.
    Bare {
        /// Number of declared parameters
        params: usize,
    },
    /// Something that cannot be a valid constructor.
    Missing {
        /// Human-readable explanation
        reason: String,
    },
    /// An expression whose shape is unknowable without executing code.
    Opaque,
}

/// One declaration event, applied to the graph in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    /// `angular.module(name, deps)` when `dependencies` is `Some`, otherwise
    /// the getter form `angular.module(name)`.
    Module {
        /// Module name
        name: String,
        /// Declared dependency list, absent for a plain reference
        dependencies: Option<Vec<String>>,
    },
    /// `angular.module(expr, ...)` whose name is not a string literal. The
    /// chain it starts belongs to no known module.
    DynamicModule,
    /// A provider-like registration on the current chain.
    Provider {
        /// Registration method
        kind: ProviderKind,
        /// Registered name
        name: String,
        /// Recognised constructor shape
        constructor: Constructor,
    },
}

/// Names bound to module chains, shared between the files of one source root.
///
/// `var app = angular.module('app', [])` in one file makes `app.factory(...)`
/// recognisable in files processed later within the same root.
#[derive(Debug, Default, Clone)]
pub struct ChainScope {
    aliases: HashSet<String>,
}

impl ChainScope {
    /// Create an empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `name` is bound to a module chain.
    pub fn is_alias(&self, name: &str) -> bool {
        self.aliases.contains(name)
    }

    pub(crate) fn bind(&mut self, name: impl Into<String>) {
        self.aliases.insert(name.into());
    }
}

/// Extract declarations from one file, updating the shared chain scope.
///
/// Returns an empty list when the source does not parse.
pub fn extract(source: &str, scope: &mut ChainScope) -> Vec<Declaration> {
    let allocator = Allocator::default();
    let ParserReturn {
        program,
        errors,
        panicked,
        ..
    } = Parser::new(&allocator, source, SourceType::cjs()).parse();

    if panicked || !errors.is_empty() {
        tracing::debug!("Skipping unparsable source ({} parse errors)", errors.len());
        return Vec::new();
    }

    visitor::DeclarationVisitor::run(&program, scope)
}

/// Extract declarations from a standalone source text.
pub fn extract_declarations(source: &str) -> Vec<Declaration> {
    extract(source, &mut ChainScope::new())
}
