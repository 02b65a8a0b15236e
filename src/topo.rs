//! Cycle detection over the fragment-spread dependency graph.
//!
//! Kahn's algorithm finds cycles with an explicit queue and in-degree
//! table rather than a recursive walk that clones a `visited` set at every
//! spread, and it reports every fragment left over once the queue drains,
//! rather than just the first fragment on the recursion path.

use indexmap::{IndexMap, IndexSet};

/// The result of sorting a dependency graph whose nodes are fragment
/// names.
pub enum TopoResult {
    /// No cycles; fragments in a valid processing order (dependencies
    /// before dependents is not actually required by any caller here, but
    /// falls out of Kahn's algorithm for free).
    Sorted(Vec<String>),
    /// At least one cycle exists. Contains the names of every fragment
    /// that never reached in-degree zero, i.e. every fragment that
    /// participates in some cycle (directly or by depending only on
    /// cyclic fragments).
    Cyclic(Vec<String>),
}

/// Runs Kahn's algorithm over `deps`, a map from fragment name to the set
/// of fragment names it directly spreads.
pub fn topo_sort(deps: &IndexMap<String, IndexSet<String>>) -> TopoResult {
    let mut in_degree: IndexMap<&str, usize> = IndexMap::new();
    for name in deps.keys() {
        in_degree.entry(name.as_str()).or_insert(0);
    }
    for targets in deps.values() {
        for target in targets {
            if deps.contains_key(target) {
                *in_degree.entry(target.as_str()).or_insert(0) += 1;
            }
        }
    }

    let mut queue: Vec<&str> = in_degree
        .iter()
        .filter(|(_, degree)| **degree == 0)
        .map(|(name, _)| *name)
        .collect();
    // Deterministic processing order, independent of the hash-free but
    // still insertion-order-sensitive `IndexMap` iteration above.
    queue.sort_unstable();

    let mut order = Vec::with_capacity(deps.len());
    let mut cursor = 0;

    while cursor < queue.len() {
        let name = queue[cursor];
        cursor += 1;
        order.push(name.to_string());

        if let Some(targets) = deps.get(name) {
            let mut newly_free = Vec::new();
            for target in targets {
                if let Some(degree) = in_degree.get_mut(target.as_str()) {
                    *degree -= 1;
                    if *degree == 0 {
                        newly_free.push(target.as_str());
                    }
                }
            }
            newly_free.sort_unstable();
            queue.extend(newly_free);
        }
    }

    if order.len() == deps.len() {
        TopoResult::Sorted(order)
    } else {
        let ordered: IndexSet<&str> = order.iter().map(|s| s.as_str()).collect();
        let mut cyclic: Vec<String> = deps
            .keys()
            .filter(|name| !ordered.contains(name.as_str()))
            .cloned()
            .collect();
        cyclic.sort_unstable();
        TopoResult::Cyclic(cyclic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(pairs: &[(&str, &[&str])]) -> IndexMap<String, IndexSet<String>> {
        pairs
            .iter()
            .map(|(name, deps)| {
                (
                    name.to_string(),
                    deps.iter().map(|d| d.to_string()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn sorts_a_dag() {
        let deps = graph(&[("a", &["b"]), ("b", &["c"]), ("c", &[])]);
        match topo_sort(&deps) {
            TopoResult::Sorted(order) => assert_eq!(order, vec!["a", "b", "c"]),
            TopoResult::Cyclic(_) => panic!("expected a sort, found a cycle"),
        }
    }

    #[test]
    fn detects_a_self_cycle() {
        let deps = graph(&[("a", &["a"])]);
        match topo_sort(&deps) {
            TopoResult::Sorted(_) => panic!("expected a cycle"),
            TopoResult::Cyclic(cycle) => assert_eq!(cycle, vec!["a"]),
        }
    }

    #[test]
    fn detects_a_longer_cycle_leaving_acyclic_nodes_sorted() {
        let deps = graph(&[("a", &["b"]), ("b", &["c"]), ("c", &["b"]), ("d", &[])]);
        match topo_sort(&deps) {
            TopoResult::Sorted(_) => panic!("expected a cycle"),
            TopoResult::Cyclic(cycle) => assert_eq!(cycle, vec!["b", "c"]),
        }
    }
}
