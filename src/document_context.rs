//! A read-only index over an executable document.
//!
//! Every walk here is built on an explicit `Vec`-backed stack rather than
//! recursing over the AST directly: a document with a selection set nested
//! 1024 levels deep must not blow the native call stack.

use graphql_parser::query::{
    Definition, Document as QueryDocument, FragmentDefinition, OperationDefinition, Selection,
    SelectionSet, Text, Value,
};
use indexmap::{IndexMap, IndexSet};

use crate::ext::OperationDefinitionExt;

/// One operation definition together with the name it would be looked up
/// under; `None` marks an anonymous operation (there can be at most one
/// per valid document, but the context makes no such assumption — that is
/// what `LoneAnonymousOperation` checks for).
pub struct OperationEntry<'v, 'a, T>
where
    T: Text<'a>,
{
    pub name: Option<String>,
    pub definition: &'v OperationDefinition<'a, T>,
}

pub struct DocumentContext<'v, 'a, T>
where
    T: Text<'a>,
{
    pub operations: Vec<OperationEntry<'v, 'a, T>>,
    fragments: IndexMap<String, &'v FragmentDefinition<'a, T>>,
    /// Names of fragments spread directly within each fragment's own
    /// selection set (one hop, not transitive).
    fragment_deps: IndexMap<String, IndexSet<String>>,
    /// Every fragment name reachable from some operation, transitively
    /// through fragment spreads.
    reachable_fragments: IndexSet<String>,
    /// Variables referenced transitively (through spread fragments) by each
    /// operation, keyed by the operation's position in `operations`.
    variable_requirements: Vec<IndexSet<String>>,
    duplicate_fragment_names: IndexSet<String>,
}

impl<'v, 'a, T> DocumentContext<'v, 'a, T>
where
    T: Text<'a>,
{
    pub fn new(document: &'v QueryDocument<'a, T>) -> Self {
        let mut operations = Vec::new();
        let mut fragments: IndexMap<String, &'v FragmentDefinition<'a, T>> = IndexMap::new();
        let mut duplicate_fragment_names = IndexSet::new();

        for definition in &document.definitions {
            match definition {
                Definition::Operation(op) => {
                    operations.push(OperationEntry {
                        name: op.op_name().map(|n| n.as_ref().to_string()),
                        definition: op,
                    });
                }
                Definition::Fragment(frag) => {
                    let name = frag.name.as_ref().to_string();
                    if fragments.contains_key(&name) {
                        duplicate_fragment_names.insert(name);
                    } else {
                        fragments.insert(name, frag);
                    }
                }
            }
        }

        let mut fragment_deps = IndexMap::new();
        for (name, frag) in &fragments {
            let (deps, _vars) = walk_selection_set(&frag.selection_set);
            fragment_deps.insert(name.clone(), deps);
        }

        let mut reachable_fragments = IndexSet::new();
        let mut variable_requirements = Vec::with_capacity(operations.len());

        for op in &operations {
            let (direct_deps, mut vars) = walk_selection_set(op.definition.op_selection_set());

            // Explicit worklist: expand fragment spreads transitively
            // without recursing into `fragment_deps`.
            let mut stack: Vec<String> = direct_deps.iter().cloned().collect();
            let mut seen: IndexSet<String> = direct_deps;
            while let Some(name) = stack.pop() {
                reachable_fragments.insert(name.clone());
                if let Some(frag) = fragments.get(&name) {
                    let (_deps, frag_vars) = walk_selection_set(&frag.selection_set);
                    vars.extend(frag_vars);
                }
                if let Some(deps) = fragment_deps.get(&name) {
                    for dep in deps {
                        if seen.insert(dep.clone()) {
                            stack.push(dep.clone());
                        }
                    }
                }
            }

            variable_requirements.push(vars);
        }

        DocumentContext {
            operations,
            fragments,
            fragment_deps,
            reachable_fragments,
            variable_requirements,
            duplicate_fragment_names,
        }
    }

    pub fn fragment_def(&self, name: &str) -> Option<&'v FragmentDefinition<'a, T>> {
        self.fragments.get(name).copied()
    }

    pub fn fragment_names(&self) -> impl Iterator<Item = &str> {
        self.fragments.keys().map(|s| s.as_str())
    }

    pub fn duplicate_fragment_names(&self) -> impl Iterator<Item = &str> {
        self.duplicate_fragment_names.iter().map(|s| s.as_str())
    }

    pub fn fragment_deps(&self, name: &str) -> Option<&IndexSet<String>> {
        self.fragment_deps.get(name)
    }

    pub fn is_fragment_reachable(&self, name: &str) -> bool {
        self.reachable_fragments.contains(name)
    }

    pub fn variable_requirements(&self, op_index: usize) -> &IndexSet<String> {
        &self.variable_requirements[op_index]
    }
}

/// Walks one selection set with an explicit stack, collecting the fragment
/// names spread directly within it (not through nested fragment bodies,
/// which `DocumentContext::new` expands separately via `fragment_deps`) and
/// every variable referenced by a field argument or directive argument
/// anywhere underneath it.
fn walk_selection_set<'a, T>(root: &SelectionSet<'a, T>) -> (IndexSet<String>, IndexSet<String>)
where
    T: Text<'a>,
{
    let mut fragment_spreads = IndexSet::new();
    let mut variables = IndexSet::new();
    let mut stack: Vec<&SelectionSet<'a, T>> = vec![root];

    while let Some(set) = stack.pop() {
        for selection in &set.items {
            match selection {
                Selection::Field(field) => {
                    for (_, value) in &field.arguments {
                        collect_variables(value, &mut variables);
                    }
                    for directive in &field.directives {
                        for (_, value) in &directive.arguments {
                            collect_variables(value, &mut variables);
                        }
                    }
                    stack.push(&field.selection_set);
                }
                Selection::FragmentSpread(spread) => {
                    fragment_spreads.insert(spread.fragment_name.as_ref().to_string());
                    for directive in &spread.directives {
                        for (_, value) in &directive.arguments {
                            collect_variables(value, &mut variables);
                        }
                    }
                }
                Selection::InlineFragment(inline) => {
                    for directive in &inline.directives {
                        for (_, value) in &directive.arguments {
                            collect_variables(value, &mut variables);
                        }
                    }
                    stack.push(&inline.selection_set);
                }
            }
        }
    }

    (fragment_spreads, variables)
}

/// Collects every `Value::Variable` nested inside `value`, via an explicit
/// stack rather than matching-and-recursing, so a deeply nested input
/// object or list literal cannot exhaust the native stack.
fn collect_variables<'a, T>(value: &Value<'a, T>, out: &mut IndexSet<String>)
where
    T: Text<'a>,
{
    let mut stack = vec![value];
    while let Some(value) = stack.pop() {
        match value {
            Value::Variable(name) => {
                out.insert(name.as_ref().to_string());
            }
            Value::List(items) => {
                stack.extend(items.iter());
            }
            Value::Object(fields) => {
                stack.extend(fields.values());
            }
            Value::Int(_)
            | Value::Float(_)
            | Value::String(_)
            | Value::Boolean(_)
            | Value::Null
            | Value::Enum(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphql_parser::parse_query;

    #[test]
    fn walks_a_selection_set_nested_well_past_a_thousand_levels() {
        let depth = 1200;
        let mut src = String::new();
        for _ in 0..depth {
            src.push_str("field { ");
        }
        src.push_str("leaf(x: $v)");
        for _ in 0..depth {
            src.push_str(" }");
        }
        let query = format!("query Deep($v: Int) {{ {} }}", src);

        let document = parse_query::<String>(&query).unwrap();
        let ctx = DocumentContext::new(&document);

        assert_eq!(ctx.operations.len(), 1);
        assert!(ctx.variable_requirements(0).contains("v"));
    }
}
