//! Classification of provider constructors into [`Constructor`] shapes.

use oxc_ast::ast::{
    ArrayExpression, AssignmentTarget, Expression, FormalParameters, Function, ObjectExpression,
    ObjectPropertyKind, Program, Statement,
};
use std::collections::HashMap;

use super::visitor::{string_value, unparenthesized};
use super::{Constructor, ProviderKind};

/// Top-level function declarations of one file, by name.
///
/// Lets `.controller('Ctrl', Ctrl)` see the parameters of `function Ctrl(...)`.
pub(super) struct FunctionTable<'a> {
    functions: HashMap<&'a str, &'a Function<'a>>,
}

impl<'a> FunctionTable<'a> {
    pub(super) fn from_program(program: &'a Program<'a>) -> Self {
        let functions = program
            .body
            .iter()
            .filter_map(|statement| match statement {
                Statement::FunctionDeclaration(func) => {
                    func.id.as_ref().map(move |id| (id.name.as_str(), &**func))
                }
                _ => None,
            })
            .collect();
        Self {
            functions,
        }
    }

    fn get(&self, name: &str) -> Option<&'a Function<'a>> {
        self.functions.get(name).copied()
    }
}

/// Classify the constructor argument of a validated registration.
///
/// For `provider` the shape of interest is its `$get` member; every other kind
/// is classified directly.
pub(super) fn classify<'a>(
    kind: ProviderKind,
    expr: Option<&Expression<'a>>,
    functions: &FunctionTable<'a>,
) -> Constructor {
    let Some(expr) = expr else {
        return missing("no constructor argument");
    };

    if kind == ProviderKind::Provider {
        provider_getter(expr, functions)
    } else {
        injectable(expr, functions)
    }
}

fn injectable<'a>(expr: &Expression<'a>, functions: &FunctionTable<'a>) -> Constructor {
    match unparenthesized(expr) {
        Expression::ArrayExpression(array) => annotation(array),
        Expression::FunctionExpression(func) => from_params(&func.params),
        Expression::ArrowFunctionExpression(arrow) => from_params(&arrow.params),
        Expression::Identifier(ident) => functions
            .get(ident.name.as_str())
            .map_or(Constructor::Opaque, |func| from_params(&func.params)),
        _ => Constructor::Opaque,
    }
}

fn annotation(array: &ArrayExpression<'_>) -> Constructor {
    let Some((last, names)) = array.elements.split_last() else {
        return missing("empty annotation array");
    };

    if last.as_expression().is_none_or(|expr| string_value(expr).is_some()) {
        return missing("annotation array must end with the constructor function");
    }

    let names: Option<Vec<String>> = names
        .iter()
        .map(|element| element.as_expression().and_then(string_value))
        .collect();

    match names {
        Some(names) => Constructor::Annotated(names),
        None => missing("annotation array entries before the constructor must be string literals"),
    }
}

fn from_params(params: &FormalParameters<'_>) -> Constructor {
    let count = params.items.len() + usize::from(params.rest.is_some());
    if count == 0 {
        Constructor::Annotated(Vec::new())
    } else {
        Constructor::Bare {
            params: count,
        }
    }
}

/// Locate and classify the `$get` member of a provider definition.
fn provider_getter<'a>(expr: &Expression<'a>, functions: &FunctionTable<'a>) -> Constructor {
    let getter = match unparenthesized(expr) {
        Expression::ObjectExpression(object) => {
            return object_getter(object).map_or_else(
                || missing("provider object has no $get member"),
                |getter| injectable(getter, functions),
            );
        }
        Expression::ArrayExpression(array) => {
            // `['dep', function (dep) { this.$get = ... }]`
            return match array.elements.last().and_then(|last| last.as_expression()) {
                Some(last) if string_value(last).is_none() => provider_getter(last, functions),
                _ => missing("annotation array must end with the provider constructor"),
            };
        }
        Expression::FunctionExpression(func) => {
            func.body.as_ref().and_then(|body| statements_getter(&body.statements))
        }
        Expression::ArrowFunctionExpression(arrow) => statements_getter(&arrow.body.statements),
        Expression::Identifier(ident) => match functions.get(ident.name.as_str()) {
            Some(func) => func.body.as_ref().and_then(|body| statements_getter(&body.statements)),
            None => return Constructor::Opaque,
        },
        _ => return Constructor::Opaque,
    };

    getter.map_or_else(
        || missing("provider constructor never defines $get"),
        |getter| injectable(getter, functions),
    )
}

/// Find `this.$get = X`, `return { $get: X }` or an arrow body `({ $get: X })`.
fn statements_getter<'b, 'a>(statements: &'b [Statement<'a>]) -> Option<&'b Expression<'a>> {
    statements.iter().find_map(|statement| match statement {
        Statement::ExpressionStatement(stmt) => match unparenthesized(&stmt.expression) {
            Expression::AssignmentExpression(assign) => match &assign.left {
                AssignmentTarget::StaticMemberExpression(member)
                    if member.property.name.as_str() == "$get"
                        && matches!(member.object, Expression::ThisExpression(_)) =>
                {
                    Some(&assign.right)
                }
                _ => None,
            },
            Expression::ObjectExpression(object) => object_getter(object),
            _ => None,
        },
        Statement::ReturnStatement(ret) => match ret.argument.as_ref().map(unparenthesized) {
            Some(Expression::ObjectExpression(object)) => object_getter(object),
            _ => None,
        },
        _ => None,
    })
}

fn object_getter<'b, 'a>(object: &'b ObjectExpression<'a>) -> Option<&'b Expression<'a>> {
    object.properties.iter().find_map(|property| match property {
        ObjectPropertyKind::ObjectProperty(prop)
            if prop.key.static_name().is_some_and(|name| name == "$get") =>
        {
            Some(&prop.value)
        }
        _ => None,
    })
}

fn missing(reason: &str) -> Constructor {
    Constructor::Missing {
        reason: reason.to_string(),
    }
}
