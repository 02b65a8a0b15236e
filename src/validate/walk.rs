//! The selection-set walker shared by both validation phases.
//!
//! A recursive visitor calling back at every node cannot bound its stack
//! depth, so this crate uses one explicit `Vec`-backed worklist that both
//! phases call into:
//!
//! - Phase 1 (`validate::fragments`) walks each fragment definition's own
//!   body in [`Pass::FragmentBody`], checking field existence, leaf/
//!   composite discipline, argument shape, and directive legality — but
//!   not argument *values*, since a fragment's variables belong to
//!   whichever operation ultimately spreads it, a question Phase 1 cannot
//!   answer. A spread fragment's own body is left to that fragment's own
//!   visit; this walk only checks that the spread itself is legal.
//! - Phase 2 (`validate::operations`) walks each operation's own body in
//!   [`Pass::Operation`], which performs the full structural check *and*
//!   argument-value typing against that operation's variable declarations,
//!   then follows every fragment spread into the fragment's body — at
//!   that point skipping the structural checks Phase 1 already ran, but
//!   continuing to type-check argument values with this operation's own
//!   variables in scope.

use graphql_parser::query::{Selection, SelectionSet, Text};
use graphql_parser::schema::DirectiveLocation;

use crate::document_context::DocumentContext;
use crate::error::{ErrorSink, GqlError};
use crate::ext::{FragmentDefinitionExt, TypeExt};
use crate::schema_context::SchemaContext;
use crate::validate::directives::{check_directive_values, check_directives_structural};
use crate::validate::values::{check_value, VarScope};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    FragmentBody,
    Operation,
}

struct Frame<'s, 'a, T>
where
    T: Text<'a>,
{
    parent_type: String,
    set: &'s SelectionSet<'a, T>,
    inside_named_fragment: bool,
}

pub fn walk_selection_set<'a, T>(
    schema: &SchemaContext<'_, 'a, T>,
    doc: &DocumentContext<'_, 'a, T>,
    pass: Pass,
    vars: &VarScope<'_, '_, 'a, T>,
    parent_type: &str,
    root: &SelectionSet<'a, T>,
    sink: &mut ErrorSink,
) where
    T: Text<'a>,
{
    let mut stack = vec![Frame {
        parent_type: parent_type.to_string(),
        set: root,
        inside_named_fragment: false,
    }];

    while let Some(Frame {
        parent_type,
        set,
        inside_named_fragment,
    }) = stack.pop()
    {
        // Phase 1 never performs value typing; Phase 2 always does, but
        // only performs the structural checks above the first named
        // fragment boundary it crosses.
        let do_structural = pass == Pass::FragmentBody || !inside_named_fragment;
        let do_values = pass == Pass::Operation;

        for selection in &set.items {
            match selection {
                Selection::Field(field) => {
                    let field_name = field.name.as_ref();
                    let field_def = schema.field_def(&parent_type, field_name);

                    if do_structural
                        && field_name != "__typename"
                        && field_def.is_none()
                        && schema.find_type(&parent_type).is_some()
                    {
                        sink.push(GqlError::UndefinedField {
                            ty: parent_type.clone(),
                            field: field_name.to_string(),
                        });
                    }

                    if do_structural {
                        check_field_arguments(schema, &parent_type, field, sink);
                        check_directives_structural(
                            schema,
                            &field.directives,
                            DirectiveLocation::Field,
                            sink,
                        );
                    }

                    if do_values {
                        if let Some(def) = field_def {
                            for (arg_name, value) in &field.arguments {
                                if let Some(arg_def) =
                                    def.arguments.iter().find(|a| a.name.as_ref() == arg_name.as_ref())
                                {
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
                        check_directive_values(schema, &field.directives, vars, sink);
                    }

                    if let Some(def) = field_def {
                        let return_name = def.field_type.named().as_ref().to_string();

                        if do_structural {
                            let has_subselection = !field.selection_set.items.is_empty();
                            if schema.find_type(&return_name).is_none() {
                                sink.push(GqlError::MissingTypeDefinition(return_name.clone()));
                            } else if schema.is_leaf(&return_name) && has_subselection {
                                sink.push(GqlError::UnexpectedSubselection {
                                    ty: return_name.clone(),
                                    field: field_name.to_string(),
                                });
                            } else if schema.is_composite(&return_name) && !has_subselection {
                                sink.push(GqlError::MissingSubselection {
                                    ty: return_name.clone(),
                                    field: field_name.to_string(),
                                });
                            }
                        }

                        if schema.is_composite(&return_name) {
                            stack.push(Frame {
                                parent_type: return_name,
                                set: &field.selection_set,
                                inside_named_fragment,
                            });
                        }
                    } else if field_name == "__typename" {
                        // Leaf meta-field; no subselection expected, nothing
                        // further to resolve.
                    }
                }
                Selection::InlineFragment(inline) => {
                    let condition = inline
                        .type_condition
                        .as_ref()
                        .map(|graphql_parser::query::TypeCondition::On(name)| name.as_ref().to_string())
                        .unwrap_or_else(|| parent_type.clone());

                    if do_structural {
                        match schema.find_type(&condition) {
                            Some(entry) if entry.is_composite() => {
                                if !schema.types_overlap(&condition, &parent_type) {
                                    sink.push(GqlError::ImpossibleInlineFragment {
                                        condition: condition.clone(),
                                        parent: parent_type.clone(),
                                    });
                                }
                            }
                            Some(_) => {
                                sink.push(GqlError::NonCompositeInlineFragmentTarget(condition.clone()));
                            }
                            None => {
                                sink.push(GqlError::UndefinedInlineFragmentTarget(condition.clone()));
                            }
                        }

                        check_directives_structural(
                            schema,
                            &inline.directives,
                            DirectiveLocation::InlineFragment,
                            sink,
                        );
                    }

                    if do_values {
                        check_directive_values(schema, &inline.directives, vars, sink);
                    }

                    stack.push(Frame {
                        parent_type: condition,
                        set: &inline.selection_set,
                        inside_named_fragment,
                    });
                }
                Selection::FragmentSpread(spread) => {
                    let name = spread.fragment_name.as_ref();

                    if do_structural {
                        check_directives_structural(
                            schema,
                            &spread.directives,
                            DirectiveLocation::FragmentSpread,
                            sink,
                        );

                        match doc.fragment_def(name) {
                            Some(frag) => {
                                let on_type = frag.on_type().as_ref();
                                if schema.is_composite(on_type)
                                    && !schema.types_overlap(on_type, &parent_type)
                                {
                                    sink.push(GqlError::ImpossibleFragmentSpread {
                                        fragment: name.to_string(),
                                        parent: parent_type.clone(),
                                    });
                                }
                            }
                            None => {
                                sink.push(GqlError::UndefinedFragment(name.to_string()));
                            }
                        }
                    }

                    if do_values {
                        check_directive_values(schema, &spread.directives, vars, sink);
                    }

                    // Phase 1 leaves the spread's body to that fragment's
                    // own walk; Phase 2 follows it to type-check argument
                    // values in this operation's variable scope.
                    if pass == Pass::Operation {
                        if let Some(frag) = doc.fragment_def(name) {
                            stack.push(Frame {
                                parent_type: frag.on_type().as_ref().to_string(),
                                set: &frag.selection_set,
                                inside_named_fragment: true,
                            });
                        }
                    }
                }
            }
        }
    }
}

fn check_field_arguments<'a, T>(
    schema: &SchemaContext<'_, 'a, T>,
    parent_type: &str,
    field: &graphql_parser::query::Field<'a, T>,
    sink: &mut ErrorSink,
) where
    T: Text<'a>,
{
    let field_def = match schema.field_def(parent_type, field.name.as_ref()) {
        Some(def) => def,
        None => return,
    };

    let mut seen = std::collections::HashSet::new();
    for (arg_name, _) in &field.arguments {
        if !seen.insert(arg_name.as_ref()) {
            sink.push(GqlError::DuplicateArgumentName(arg_name.as_ref().to_string()));
        }

        if !field_def
            .arguments
            .iter()
            .any(|a| a.name.as_ref() == arg_name.as_ref())
        {
            sink.push(GqlError::UndefinedArgument {
                field: field.name.as_ref().to_string(),
                argument: arg_name.as_ref().to_string(),
            });
        }
    }

    for arg_def in &field_def.arguments {
        // An explicit `null` counts as provided here: the value-typing pass
        // is what rejects it against a non-null argument type
        // (`IncorrectValueType`), so this check doesn't also report the
        // same mistake as "missing".
        let provided = field
            .arguments
            .iter()
            .any(|(name, _)| name.as_ref() == arg_def.name.as_ref());

        let required = arg_def.value_type.is_non_null() && arg_def.default_value.is_none();
        if required && !provided {
            sink.push(GqlError::MissingRequiredArgument {
                field: field.name.as_ref().to_string(),
                argument: arg_def.name.as_ref().to_string(),
            });
        }
    }
}
