//! Value typing and coercion.
//!
//! A bare value in a list position is coerced into a one-element list
//! rather than rejected outright, and a `null` literal in a nullable
//! position is accepted regardless of whether the named type is a builtin
//! scalar, a custom scalar, an enum, or an input object.
//!
//! Variables are handled according to which of two contexts they're typed
//! in: inside an operation, a `$var` reference is checked against that
//! operation's own variable declarations; inside a default value (a
//! variable definition's default, or an input object field's default),
//! variables are not allowed at all.

use graphql_parser::query::{Text, Value, VariableDefinition};
use graphql_parser::schema::Type;
use indexmap::IndexMap;

use crate::error::{ErrorSink, GqlError};
use crate::ext::{type_to_string, TypeExt};
use crate::schema_context::{SchemaContext, TypeEntry};

/// Where a variable reference is permitted to resolve against a
/// declaration, and where it's forbidden outright.
pub enum VarScope<'m, 'v, 'a, T>
where
    T: Text<'a>,
{
    Operation(&'m IndexMap<String, &'v VariableDefinition<'a, T>>),
    DefaultValue,
}

pub fn check_value<'a, T>(
    schema: &SchemaContext<'_, 'a, T>,
    name: &str,
    value: &Value<'a, T>,
    expected: &Type<'a, T>,
    vars: &VarScope<'_, '_, 'a, T>,
    sink: &mut ErrorSink,
) where
    T: Text<'a>,
{
    if let Value::Variable(var_name) = value {
        match vars {
            VarScope::DefaultValue => {
                sink.push(GqlError::VariableInDefaultValue);
            }
            VarScope::Operation(defs) => match defs.get(var_name.as_ref()) {
                Some(def) => {
                    if !is_variable_type_compatible(&def.var_type, expected) {
                        sink.push(GqlError::VariableTypeMismatch {
                            variable: var_name.as_ref().to_string(),
                            variable_ty: type_to_string(&def.var_type),
                            location_ty: type_to_string(expected),
                        });
                    }
                }
                None => sink.push(GqlError::UndefinedVariable(var_name.as_ref().to_string())),
            },
        }
        return;
    }

    if let Type::NonNullType(inner) = expected {
        if matches!(value, Value::Null) {
            sink.push(GqlError::IncorrectValueType(type_to_string(expected)));
            return;
        }
        check_value(schema, name, value, inner, vars, sink);
        return;
    }

    if matches!(value, Value::Null) {
        return;
    }

    match expected {
        Type::ListType(item_ty) => match value {
            Value::List(items) => {
                for item in items.iter() {
                    check_value(schema, name, item, item_ty, vars, sink);
                }
            }
            // List input coercion: a bare value in a list position is
            // treated as a single-element list.
            _ => check_value(schema, name, value, item_ty, vars, sink),
        },
        Type::NamedType(type_name) => {
            check_named_value(schema, name, value, type_name.as_ref(), vars, sink)
        }
        Type::NonNullType(_) => unreachable!("handled above"),
    }
}

fn check_named_value<'a, T>(
    schema: &SchemaContext<'_, 'a, T>,
    name: &str,
    value: &Value<'a, T>,
    type_name: &str,
    vars: &VarScope<'_, '_, 'a, T>,
    sink: &mut ErrorSink,
) where
    T: Text<'a>,
{
    let ok = match (type_name, value) {
        ("Int", Value::Int(_)) => true,
        ("Float", Value::Int(_) | Value::Float(_)) => true,
        ("String", Value::String(_)) => true,
        ("Boolean", Value::Boolean(_)) => true,
        ("ID", Value::Int(_) | Value::String(_)) => true,
        _ => {
            return match schema.find_type(type_name) {
                Some(TypeEntry::Defined(def)) => {
                    check_user_defined_value(schema, name, value, def, vars, sink)
                }
                Some(TypeEntry::Builtin(_)) | None => {
                    sink.push(GqlError::IncorrectValueType(type_name.to_string()));
                }
            };
        }
    };

    if !ok {
        sink.push(GqlError::IncorrectValueType(type_name.to_string()));
    }
}

fn check_user_defined_value<'a, T>(
    schema: &SchemaContext<'_, 'a, T>,
    name: &str,
    value: &Value<'a, T>,
    def: &graphql_parser::schema::TypeDefinition<'a, T>,
    vars: &VarScope<'_, '_, 'a, T>,
    sink: &mut ErrorSink,
) where
    T: Text<'a>,
{
    use crate::ext::TypeDefinitionExt;

    if let Some(enum_ty) = def.as_enum() {
        match value {
            Value::Enum(variant) if enum_ty.values.iter().any(|v| v.name.as_ref() == variant.as_ref()) => {}
            _ => sink.push(GqlError::IncorrectValueType(enum_ty.name.as_ref().to_string())),
        }
        return;
    }

    if let Some(input_ty) = def.as_input_object() {
        match value {
            Value::Object(fields) => {
                for provided in fields.keys() {
                    if !input_ty
                        .fields
                        .iter()
                        .any(|f| f.name.as_ref() == provided.as_ref())
                    {
                        sink.push(GqlError::UndefinedInputObjectField {
                            ty: input_ty.name.as_ref().to_string(),
                            field: provided.as_ref().to_string(),
                        });
                    }
                }

                for field in &input_ty.fields {
                    match fields.get(field.name.as_ref()) {
                        Some(provided) => check_value(
                            schema,
                            &format!("{}.{}", name, field.name.as_ref()),
                            provided,
                            &field.value_type,
                            vars,
                            sink,
                        ),
                        None => {
                            let required =
                                field.value_type.is_non_null() && field.default_value.is_none();
                            if required {
                                sink.push(GqlError::MissingRequiredInputObjectField {
                                    ty: input_ty.name.as_ref().to_string(),
                                    field: field.name.as_ref().to_string(),
                                });
                            }
                        }
                    }
                }
            }
            _ => sink.push(GqlError::IncorrectValueType(input_ty.name.as_ref().to_string())),
        }
        return;
    }

    // Custom scalars, and object/interface/union types reached only through
    // malformed schemas, accept any literal: coercion of non-enum,
    // non-input-object leaf values is left to the collaborator that
    // actually executes the document.
    debug_assert!(
        def.as_scalar().is_some() || def.as_object().is_some() || def.as_interface().is_some() || def.as_union().is_some(),
        "check_named_value only reaches check_user_defined_value for a defined type, and enum/input-object are handled above"
    );
}

/// The "are variable usages allowed" compatibility relation (GraphQL
/// October 2021 §5.8.5): a variable of type `var_ty` may be used where
/// `loc_ty` is expected if the two are structurally equal once non-null
/// wrappers on `var_ty` are stripped to match `loc_ty`'s nullability. This
/// crate does not implement the spec's further relaxation that permits a
/// nullable variable with a non-null default value to satisfy a non-null
/// location — the variable's declared type is the only thing considered.
fn is_variable_type_compatible<'a, T>(var_ty: &Type<'a, T>, loc_ty: &Type<'a, T>) -> bool
where
    T: Text<'a>,
{
    match loc_ty {
        Type::NonNullType(loc_inner) => match var_ty {
            Type::NonNullType(var_inner) => is_variable_type_compatible(var_inner, loc_inner),
            _ => false,
        },
        Type::ListType(loc_inner) => match var_ty {
            Type::ListType(var_inner) => is_variable_type_compatible(var_inner, loc_inner),
            Type::NonNullType(var_inner) => is_variable_type_compatible(var_inner, loc_ty),
            Type::NamedType(_) => false,
        },
        Type::NamedType(loc_name) => match var_ty {
            Type::NamedType(var_name) => var_name.as_ref() == loc_name.as_ref(),
            Type::NonNullType(var_inner) => is_variable_type_compatible(var_inner, loc_ty),
            Type::ListType(_) => false,
        },
    }
}
