//! Phase 1 — fragment definitions.
//!
//! Runs independently of any operation: name uniqueness, cycle-freedom,
//! usage, type-condition legality, and the body's own structural shape.
//! Phase 2 only runs once every check here has passed, so that a broken
//! fragment doesn't also cascade into a pile of per-operation duplicates.

use graphql_parser::query::Text;
use indexmap::{IndexMap, IndexSet};

use graphql_parser::schema::DirectiveLocation;

use crate::document_context::DocumentContext;
use crate::error::{ErrorSink, GqlError};
use crate::ext::FragmentDefinitionExt;
use crate::schema_context::SchemaContext;
use crate::topo::{topo_sort, TopoResult};
use crate::validate::directives::check_directives_structural;
use crate::validate::values::VarScope;
use crate::validate::walk::{walk_selection_set, Pass};

pub fn check_fragments<'a, T>(
    schema: &SchemaContext<'_, 'a, T>,
    doc: &DocumentContext<'_, 'a, T>,
    sink: &mut ErrorSink,
) where
    T: Text<'a>,
{
    for name in doc.duplicate_fragment_names() {
        sink.push(GqlError::DuplicateFragmentName(name.to_string()));
    }

    let mut deps: IndexMap<String, IndexSet<String>> = IndexMap::new();
    for name in doc.fragment_names() {
        if let Some(d) = doc.fragment_deps(name) {
            deps.insert(name.to_string(), d.clone());
        }
    }

    if let TopoResult::Cyclic(cycle) = topo_sort(&deps) {
        sink.push(GqlError::CyclicFragmentSpread(cycle));
    }

    for name in doc.fragment_names() {
        if !doc.is_fragment_reachable(name) {
            sink.push(GqlError::UnusedFragment {
                fragment: name.to_string(),
            });
        }

        let frag = match doc.fragment_def(name) {
            Some(frag) => frag,
            None => continue,
        };

        check_directives_structural(
            schema,
            &frag.directives,
            DirectiveLocation::FragmentDefinition,
            sink,
        );

        let on_type = frag.on_type().as_ref();
        match schema.find_type(on_type) {
            None => sink.push(GqlError::UndefinedFragmentTarget {
                fragment: name.to_string(),
                ty: on_type.to_string(),
            }),
            Some(entry) if !entry.is_composite() => {
                sink.push(GqlError::NonCompositeFragmentTarget {
                    fragment: name.to_string(),
                    ty: on_type.to_string(),
                })
            }
            Some(_) => {
                walk_selection_set(
                    schema,
                    doc,
                    Pass::FragmentBody,
                    &VarScope::DefaultValue,
                    on_type,
                    &frag.selection_set,
                    sink,
                );
            }
        }
    }
}
