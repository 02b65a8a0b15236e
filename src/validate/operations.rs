//! Phase 2 — operations, gated on Phase 1 succeeding.
//!
//! Operation name uniqueness and anonymous-operation isolation, then per
//! operation: root-type resolution, variable declaration legality,
//! directive/selection-set validation against this operation's own
//! variables, and the subscription single-root-field invariant.

use std::collections::HashSet;

use graphql_parser::query::{Selection, SelectionSet, Text};
use indexmap::IndexMap;

use crate::document_context::DocumentContext;
use crate::error::{ErrorSink, GqlError, OpKindName};
use crate::ext::{OpKind, OperationDefinitionExt, TypeExt};
use crate::schema_context::SchemaContext;
use crate::validate::values::{check_value, VarScope};
use crate::validate::walk::{walk_selection_set, Pass};

pub fn check_operations<'a, T>(
    schema: &SchemaContext<'_, 'a, T>,
    doc: &DocumentContext<'_, 'a, T>,
    sink: &mut ErrorSink,
) where
    T: Text<'a>,
{
    check_operation_and_anonymity(doc, sink);

    for (index, entry) in doc.operations.iter().enumerate() {
        let op = entry.definition;
        let kind = op.op_kind();

        let root_type = match schema.root_type_name(kind) {
            Some(name) => name.to_string(),
            None => {
                sink.push(GqlError::UndefinedRootType(op_kind_name(kind)));
                continue;
            }
        };

        let mut var_defs: IndexMap<String, &graphql_parser::query::VariableDefinition<'a, T>> =
            IndexMap::new();
        let mut seen_vars = HashSet::new();
        for var_def in op.op_variable_definitions() {
            let name = var_def.name.as_ref().to_string();
            if !seen_vars.insert(name.clone()) {
                sink.push(GqlError::DuplicateVariableName(name.clone()));
            }
            var_defs.entry(name).or_insert(var_def);

            let named = var_def.var_type.named().as_ref();
            if schema.find_type(named).is_none() {
                sink.push(GqlError::UndefinedType(named.to_string()));
            } else if !schema.is_input_type(&var_def.var_type) {
                sink.push(GqlError::NonInputVariable {
                    variable: var_def.name.as_ref().to_string(),
                    ty: crate::ext::type_to_string(&var_def.var_type),
                });
            }

            if let Some(default) = &var_def.default_value {
                check_value(
                    schema,
                    var_def.name.as_ref(),
                    default,
                    &var_def.var_type,
                    &VarScope::DefaultValue,
                    sink,
                );
            }
        }

        let used = doc.variable_requirements(index);
        for declared in var_defs.keys() {
            if !used.contains(declared) {
                sink.push(GqlError::UnusedVariable {
                    operation: entry.name.clone().unwrap_or_default(),
                    variable: declared.clone(),
                });
            }
        }

        let vars = VarScope::Operation(&var_defs);

        crate::validate::directives::check_directives_structural(
            schema,
            op.op_directives(),
            kind.root_directive_location(),
            sink,
        );
        crate::validate::directives::check_directive_values(
            schema,
            op.op_directives(),
            &vars,
            sink,
        );

        walk_selection_set(
            schema,
            doc,
            Pass::Operation,
            &vars,
            &root_type,
            op.op_selection_set(),
            sink,
        );

        if kind == OpKind::Subscription {
            let found = count_top_level_fields(doc, op.op_selection_set());
            if found != 1 {
                sink.push(GqlError::MultipleSubscriptionRoots {
                    operation: entry.name.clone().unwrap_or_default(),
                    found,
                });
            }
        }
    }
}

fn check_operation_and_anonymity<'a, T>(doc: &DocumentContext<'_, 'a, T>, sink: &mut ErrorSink)
where
    T: Text<'a>,
{
    let mut seen = HashSet::new();
    let mut anonymous_count = 0;

    for entry in &doc.operations {
        match &entry.name {
            Some(name) => {
                if !seen.insert(name.clone()) {
                    sink.push(GqlError::DuplicateOperationName(name.clone()));
                }
            }
            None => anonymous_count += 1,
        }
    }

    if anonymous_count > 0 && doc.operations.len() > 1 {
        sink.push(GqlError::MixedAnonymousOperation);
    }
}

fn op_kind_name(kind: OpKind) -> OpKindName {
    match kind {
        OpKind::Query => OpKindName::Query,
        OpKind::Mutation => OpKindName::Mutation,
        OpKind::Subscription => OpKindName::Subscription,
    }
}

/// Counts the selections that would occur at the top level once fragment
/// spreads and inline fragments are flattened away — not the fields'
/// further subselections, which don't count toward the "exactly one root
/// field" rule. Bounded to the same explicit-stack traversal discipline as
/// the rest of the walker; a cyclic document never reaches this check
/// since Phase 1 rejects it first.
fn count_top_level_fields<'a, T>(
    doc: &DocumentContext<'_, 'a, T>,
    root: &SelectionSet<'a, T>,
) -> usize
where
    T: Text<'a>,
{
    let mut count = 0;
    let mut stack: Vec<&SelectionSet<'a, T>> = vec![root];

    while let Some(set) = stack.pop() {
        for selection in &set.items {
            match selection {
                Selection::Field(_) => count += 1,
                Selection::InlineFragment(inline) => stack.push(&inline.selection_set),
                Selection::FragmentSpread(spread) => {
                    if let Some(frag) = doc.fragment_def(spread.fragment_name.as_ref()) {
                        stack.push(&frag.selection_set);
                    }
                }
            }
        }
    }

    count
}
