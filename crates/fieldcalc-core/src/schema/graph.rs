use super::{FieldId, Reference, ReferenceKind};
use crate::{Error, Result};

use indexmap::{IndexMap, IndexSet};
use std::collections::HashMap;

/// Directed reference graph keyed by field id.
///
/// Edges point from the depended-on field to the dependent field. Removing
/// edges and propagating errors to the dependents are separate steps: the
/// removal methods only report which fields lost a source.
#[derive(Debug, Clone, Default)]
pub struct ReferenceGraph {
    /// Depended-on field -> edges leaving it
    outgoing: IndexMap<FieldId, IndexSet<Reference>>,

    /// Dependent field -> edges entering it
    incoming: IndexMap<FieldId, IndexSet<Reference>>,
}

/// Edges removed from a [`ReferenceGraph`] and the fields that lost a source
/// through them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Detached {
    pub edges: Vec<Reference>,
    pub dependents: Vec<FieldId>,
}

impl ReferenceGraph {
    pub fn new() -> ReferenceGraph {
        ReferenceGraph::default()
    }

    /// Adds an edge. Returns `false` if it was already present.
    pub fn insert(&mut self, edge: Reference) -> bool {
        let inserted = self
            .outgoing
            .entry(edge.from.clone())
            .or_default()
            .insert(edge.clone());

        if inserted {
            self.incoming.entry(edge.to.clone()).or_default().insert(edge);
        }

        inserted
    }

    /// Removes an edge. Returns `false` if it was not present.
    pub fn remove(&mut self, edge: &Reference) -> bool {
        let removed = self
            .outgoing
            .get_mut(&edge.from)
            .is_some_and(|edges| edges.shift_remove(edge));

        if removed {
            if let Some(edges) = self.incoming.get_mut(&edge.to) {
                edges.shift_remove(edge);
            }
        }

        removed
    }

    pub fn contains(&self, edge: &Reference) -> bool {
        self.outgoing
            .get(&edge.from)
            .is_some_and(|edges| edges.contains(edge))
    }

    pub fn len(&self) -> usize {
        self.outgoing.values().map(IndexSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn edges(&self) -> impl Iterator<Item = &Reference> + '_ {
        self.outgoing.values().flatten()
    }

    /// Fields directly computed from `field_id`, optionally restricted to one
    /// edge kind.
    pub fn dependents(&self, field_id: &FieldId, kind: Option<ReferenceKind>) -> Vec<FieldId> {
        let Some(edges) = self.outgoing.get(field_id) else {
            return vec![];
        };

        let mut dependents = IndexSet::new();
        for edge in edges {
            if kind.map_or(true, |kind| kind == edge.kind) {
                dependents.insert(edge.to.clone());
            }
        }
        dependents.into_iter().collect()
    }

    /// Fields `field_id` is directly computed from.
    pub fn precedents(&self, field_id: &FieldId) -> Vec<FieldId> {
        let Some(edges) = self.incoming.get(field_id) else {
            return vec![];
        };

        let precedents: IndexSet<_> = edges.iter().map(|edge| edge.from.clone()).collect();
        precedents.into_iter().collect()
    }

    /// Removes the value edges leaving `field_id` and every edge entering it.
    ///
    /// The dependents are the targets of the removed outgoing edges; the
    /// field's own inputs are dropped silently.
    pub fn remove_references(&mut self, field_id: &FieldId) -> Detached {
        let mut detached = self.detach_outgoing(field_id, ReferenceKind::Value);

        let inbound: Vec<_> = self
            .incoming
            .get(field_id)
            .map(|edges| edges.iter().cloned().collect())
            .unwrap_or_default();

        for edge in inbound {
            if self.remove(&edge) {
                detached.edges.push(edge);
            }
        }

        detached
    }

    /// Removes the lookup edges leaving the link field `field_id`.
    pub fn remove_lookup_references(&mut self, field_id: &FieldId) -> Detached {
        self.detach_outgoing(field_id, ReferenceKind::Lookup)
    }

    fn detach_outgoing(&mut self, field_id: &FieldId, kind: ReferenceKind) -> Detached {
        let edges: Vec<_> = self
            .outgoing
            .get(field_id)
            .map(|edges| {
                edges
                    .iter()
                    .filter(|edge| edge.kind == kind)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        let mut detached = Detached::default();
        for edge in edges {
            if self.remove(&edge) {
                if !detached.dependents.contains(&edge.to) {
                    detached.dependents.push(edge.to.clone());
                }
                detached.edges.push(edge);
            }
        }
        detached
    }

    /// Successive dependent frontiers reachable from `seed`.
    ///
    /// The first pass holds the direct dependents of the seed, each following
    /// pass the not yet visited dependents of the previous one. Seed fields
    /// never reappear.
    pub fn invalidation_passes(&self, seed: &[FieldId]) -> Vec<Vec<FieldId>> {
        let mut visited: IndexSet<FieldId> = seed.iter().cloned().collect();
        let mut frontier: Vec<FieldId> = seed.to_vec();
        let mut passes = vec![];

        loop {
            let mut next = vec![];
            for field_id in &frontier {
                for dependent in self.dependents(field_id, None) {
                    if visited.insert(dependent.clone()) {
                        next.push(dependent);
                    }
                }
            }

            if next.is_empty() {
                return passes;
            }

            passes.push(next.clone());
            frontier = next;
        }
    }

    /// Returns a cycle as a field path that starts and ends at the same field.
    pub fn find_cycle(&self) -> Option<Vec<FieldId>> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Visiting,
            Done,
        }

        fn visit<'a>(
            graph: &'a ReferenceGraph,
            node: &'a FieldId,
            marks: &mut HashMap<&'a FieldId, Mark>,
            stack: &mut Vec<&'a FieldId>,
        ) -> Option<Vec<FieldId>> {
            match marks.get(node) {
                Some(Mark::Done) => return None,
                Some(Mark::Visiting) => {
                    let start = stack.iter().position(|n| *n == node)?;
                    let mut path: Vec<FieldId> =
                        stack[start..].iter().map(|n| (*n).clone()).collect();
                    path.push(node.clone());
                    return Some(path);
                }
                None => {}
            }

            marks.insert(node, Mark::Visiting);
            stack.push(node);

            if let Some(edges) = graph.outgoing.get(node) {
                for edge in edges {
                    if let Some(cycle) = visit(graph, &edge.to, marks, stack) {
                        return Some(cycle);
                    }
                }
            }

            stack.pop();
            marks.insert(node, Mark::Done);
            None
        }

        let mut marks = HashMap::new();
        let mut stack = vec![];

        for node in self.outgoing.keys() {
            if let Some(cycle) = visit(self, node, &mut marks, &mut stack) {
                return Some(cycle);
            }
        }

        None
    }

    pub fn check_acyclic(&self) -> Result<()> {
        match self.find_cycle() {
            Some(path) => Err(Error::circular_reference(path)),
            None => Ok(()),
        }
    }
}

impl FromIterator<Reference> for ReferenceGraph {
    fn from_iter<I: IntoIterator<Item = Reference>>(iter: I) -> Self {
        let mut graph = ReferenceGraph::new();
        graph.extend(iter);
        graph
    }
}

impl Extend<Reference> for ReferenceGraph {
    fn extend<I: IntoIterator<Item = Reference>>(&mut self, iter: I) {
        for edge in iter {
            self.insert(edge);
        }
    }
}
