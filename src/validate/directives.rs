//! Directive legality: defined, used at a legal location, not repeated
//! unless marked `repeatable`, and passed arguments matching its own
//! definition.

use std::collections::HashSet;

use graphql_parser::query::Text;
use graphql_parser::schema::{Directive, DirectiveLocation};

use crate::error::{ErrorSink, GqlError};
use crate::schema_context::SchemaContext;
use crate::validate::values::{check_value, VarScope};

/// Existence, location legality, repeatability, and argument shape — every
/// check that doesn't need a variable scope to answer. Called from both
/// passes of [`crate::validate::walk`], since a directive's placement is a
/// structural fact independent of which operation (if any) is doing the
/// asking.
pub fn check_directives_structural<'a, T>(
    schema: &SchemaContext<'_, 'a, T>,
    directives: &[Directive<'a, T>],
    location: DirectiveLocation,
    sink: &mut ErrorSink,
) where
    T: Text<'a>,
{
    use crate::ext::TypeExt;

    let mut seen_non_repeatable = HashSet::new();

    for directive in directives {
        let def = match schema.directive_def(directive.name.as_ref()) {
            Some(def) => def,
            None => {
                sink.push(GqlError::UndefinedDirective(directive.name.as_ref().to_string()));
                continue;
            }
        };

        if !def.locations.contains(&location) {
            sink.push(GqlError::InvalidDirectiveLocation {
                directive: directive.name.as_ref().to_string(),
            });
        }

        if !def.repeatable && !seen_non_repeatable.insert(directive.name.as_ref().to_string()) {
            sink.push(GqlError::RepeatedDirective(directive.name.as_ref().to_string()));
        }

        let mut seen_args = HashSet::new();
        for (arg_name, _) in &directive.arguments {
            if !seen_args.insert(arg_name.as_ref()) {
                sink.push(GqlError::DuplicateArgumentName(arg_name.as_ref().to_string()));
            }

            if !def.arguments.iter().any(|a| a.name.as_ref() == arg_name.as_ref()) {
                sink.push(GqlError::UndefinedDirectiveArgument {
                    directive: directive.name.as_ref().to_string(),
                    argument: arg_name.as_ref().to_string(),
                });
            }
        }

        for arg_def in &def.arguments {
            let provided = directive
                .arguments
                .iter()
                .any(|(name, _)| name.as_ref() == arg_def.name.as_ref());

            if !provided {
                let required = arg_def.value_type.is_non_null() && arg_def.default_value.is_none();
                if required {
                    sink.push(GqlError::MissingRequiredDirectiveArgument {
                        directive: directive.name.as_ref().to_string(),
                        argument: arg_def.name.as_ref().to_string(),
                    });
                }
            }
        }
    }
}

/// Type-checks each directive's argument values against its definition,
/// with `vars` resolving any `Value::Variable` found along the way. Kept
/// separate from [`check_directives_structural`] because the variable
/// scope in play depends on where in a document the directive sits — a
/// fragment definition's own directives have no operation scope yet
/// (Phase 1 skips this entirely), while a field or spread's directives
/// inside an operation body do (Phase 2 calls this once it knows which
/// operation's variables apply).
pub fn check_directive_values<'a, T>(
    schema: &SchemaContext<'_, 'a, T>,
    directives: &[Directive<'a, T>],
    vars: &VarScope<'_, '_, 'a, T>,
    sink: &mut ErrorSink,
) where
    T: Text<'a>,
{
    for directive in directives {
        let def = match schema.directive_def(directive.name.as_ref()) {
            Some(def) => def,
            None => continue,
        };

        for (arg_name, value) in &directive.arguments {
            if let Some(arg_def) = def.arguments.iter().find(|a| a.name.as_ref() == arg_name.as_ref()) {
                check_value(
                    schema,
                    arg_name.as_ref(),
                    value,
                    &arg_def.value_type,
                    vars,
                    sink,
                );
            }
        }
    }
}
