//! AST visitor recognising `angular.module(...)` call chains.

use oxc_ast::ast::{
    Argument, ArrayExpression, CallExpression, Expression, ObjectPropertyKind, Program,
    VariableDeclarator,
};
use oxc_ast_visit::{Visit, walk};

use super::constructor::{FunctionTable, classify};
use super::{ChainScope, Constructor, Declaration, ProviderKind};

/// Chain methods that return the module object without registering anything.
const TRANSPARENT_METHODS: &[&str] = &["config", "run"];

/// Collects [`Declaration`] events in evaluation order.
///
/// Calls are recorded after their callee and arguments have been walked, so
/// `angular.module('a', []).factory(...)` reports the module before the
/// factory even though the factory call is the outer AST node.
pub(super) struct DeclarationVisitor<'a, 's> {
    functions: FunctionTable<'a>,
    scope: &'s mut ChainScope,
    events: Vec<Declaration>,
}

impl<'a, 's> DeclarationVisitor<'a, 's> {
    pub(super) fn run(program: &'a Program<'a>, scope: &'s mut ChainScope) -> Vec<Declaration> {
        let mut visitor = Self {
            functions: FunctionTable::from_program(program),
            scope,
            events: Vec::new(),
        };
        visitor.visit_program(program);
        visitor.events
    }

    /// Whether `expr` evaluates to the module object of a recognised chain.
    fn is_chain(&self, expr: &Expression<'_>) -> bool {
        match unparenthesized(expr) {
            Expression::Identifier(ident) => self.scope.is_alias(ident.name.as_str()),
            Expression::CallExpression(call) => self.is_registration(call),
            _ => false,
        }
    }

    /// Whether `call` is `angular.module(...)` or a method call on a chain.
    fn is_registration(&self, call: &CallExpression<'_>) -> bool {
        match chain_link(call) {
            Some((object, "module")) if is_angular(object) => true,
            Some((object, method))
                if ProviderKind::from_method(method).is_some()
                    || TRANSPARENT_METHODS.contains(&method) =>
            {
                self.is_chain(object)
            }
            _ => false,
        }
    }

    /// Walk an argument of a registration call without entering function
    /// bodies. Registered callbacks run later, inside the injector, so
    /// module calls in them say nothing about the chain being built.
    fn visit_registered_value(&mut self, expr: &Expression<'a>) {
        match unparenthesized(expr) {
            Expression::FunctionExpression(_) | Expression::ArrowFunctionExpression(_) => {}
            Expression::ArrayExpression(array) => {
                for element in &array.elements {
                    match element.as_expression() {
                        Some(expr) => self.visit_registered_value(expr),
                        None => self.visit_array_expression_element(element),
                    }
                }
            }
            Expression::ObjectExpression(object) => {
                for property in &object.properties {
                    match property {
                        ObjectPropertyKind::ObjectProperty(prop) => {
                            self.visit_registered_value(&prop.value);
                        }
                        ObjectPropertyKind::SpreadProperty(spread) => {
                            self.visit_expression(&spread.argument);
                        }
                    }
                }
            }
            other => self.visit_expression(other),
        }
    }

    fn record_call(&mut self, call: &CallExpression<'a>) {
        let Some((object, method)) = chain_link(call) else {
            return;
        };

        if method == "module" && is_angular(object) {
            let Some(name) = call.arguments.first().and_then(string_argument) else {
                tracing::debug!("angular.module call without a literal name; chain owner unknown");
                self.events.push(Declaration::DynamicModule);
                return;
            };
            // Any second argument declares the module, even one we cannot read.
            let dependencies = call.arguments.get(1).map(|argument| {
                match argument.as_expression().map(unparenthesized) {
                    Some(Expression::ArrayExpression(array)) => string_elements(array),
                    _ => {
                        tracing::debug!(
                            "Dependencies of module '{name}' are not an array literal; recording none"
                        );
                        Vec::new()
                    }
                }
            });
            self.events.push(Declaration::Module {
                name,
                dependencies,
            });
            return;
        }

        let Some(kind) = ProviderKind::from_method(method) else {
            return;
        };
        if !self.is_chain(object) {
            return;
        }
        let Some(name) = call.arguments.first().and_then(string_argument) else {
            tracing::debug!("Ignoring .{kind}() call without a literal name");
            return;
        };

        let constructor = if kind.is_validated() {
            classify(kind, call.arguments.get(1).and_then(Argument::as_expression), &self.functions)
        } else {
            Constructor::Opaque
        };

        self.events.push(Declaration::Provider {
            kind,
            name,
            constructor,
        });
    }
}

impl<'a> Visit<'a> for DeclarationVisitor<'a, '_> {
    fn visit_call_expression(&mut self, it: &CallExpression<'a>) {
        if self.is_registration(it) {
            self.visit_expression(&it.callee);
            for argument in &it.arguments {
                match argument.as_expression() {
                    Some(expr) => self.visit_registered_value(expr),
                    None => self.visit_argument(argument),
                }
            }
        } else {
            walk::walk_call_expression(self, it);
        }
        self.record_call(it);
    }

    fn visit_variable_declarator(&mut self, it: &VariableDeclarator<'a>) {
        walk::walk_variable_declarator(self, it);

        if let Some(init) = &it.init
            && self.is_chain(init)
            && let Some(ident) = it.id.get_binding_identifier()
        {
            tracing::trace!("Binding module chain alias '{}'", ident.name);
            self.scope.bind(ident.name.as_str());
        }
    }
}

/// Split `object.method(...)` into its object and method name.
fn chain_link<'b, 'a>(call: &'b CallExpression<'a>) -> Option<(&'b Expression<'a>, &'b str)> {
    match unparenthesized(&call.callee) {
        Expression::StaticMemberExpression(member) => {
            Some((&member.object, member.property.name.as_str()))
        }
        _ => None,
    }
}

fn is_angular(expr: &Expression<'_>) -> bool {
    matches!(unparenthesized(expr), Expression::Identifier(ident) if ident.name.as_str() == "angular")
}

pub(super) fn unparenthesized<'b, 'a>(mut expr: &'b Expression<'a>) -> &'b Expression<'a> {
    while let Expression::ParenthesizedExpression(inner) = expr {
        expr = &inner.expression;
    }
    expr
}

pub(super) fn string_value(expr: &Expression<'_>) -> Option<String> {
    match unparenthesized(expr) {
        Expression::StringLiteral(literal) => Some(literal.value.to_string()),
        _ => None,
    }
}

fn string_argument(arg: &Argument<'_>) -> Option<String> {
    arg.as_expression().and_then(string_value)
}

fn string_elements(array: &ArrayExpression<'_>) -> Vec<String> {
    array
        .elements
        .iter()
        .filter_map(|element| {
            let value = element.as_expression().and_then(string_value);
            if value.is_none() {
                tracing::debug!("Skipping non-literal module dependency");
            }
            value
        })
        .collect()
}
