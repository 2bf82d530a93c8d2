//! Typed relationship graph between model components.
//!
//! Two relation kinds tie components together:
//! - `Boundary`: the source bounds the target (one dimension below it), e.g.
//!   a corner at the end of a line, a surface enclosing a block;
//! - `Internal`: the source is embedded inside the target without being part
//!   of its boundary, e.g. a fault line floating inside a surface.
//!
//! The graph stores mirrored outgoing/incoming adjacency so both directions
//! of every query are O(degree). It is immutable during an inspection run;
//! all mutation happens through the model builders.

use std::collections::HashMap;

use crate::model::component::ComponentId;

/// Kind of a directed relation between two components.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Relation {
    /// Source is part of the boundary of the target.
    Boundary,
    /// Source is embedded inside the target, off its boundary.
    Internal,
}

/// Directed typed graph over component ids.
#[derive(Clone, Debug, Default)]
pub struct RelationshipGraph {
    /// `a -> [(b, rel)]`: a is boundary-of / internal-to b.
    outgoing: HashMap<ComponentId, Vec<(ComponentId, Relation)>>,
    /// Mirror of `outgoing`, keyed by target.
    incoming: HashMap<ComponentId, Vec<(ComponentId, Relation)>>,
}

impl RelationshipGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `source -> target` with the given relation kind.
    ///
    /// Duplicate arrows are ignored so builders may re-declare a relation
    /// without skewing the degree counts the validators rely on.
    pub fn add_relation(&mut self, source: ComponentId, target: ComponentId, relation: Relation) {
        let outs = self.outgoing.entry(source).or_default();
        if outs.iter().any(|&(t, r)| t == target && r == relation) {
            return;
        }
        outs.push((target, relation));
        self.incoming
            .entry(target)
            .or_default()
            .push((source, relation));
    }

    /// Whether `source` is a boundary of `target`.
    #[inline]
    pub fn is_boundary(&self, source: ComponentId, target: ComponentId) -> bool {
        self.has_relation(source, target, Relation::Boundary)
    }

    /// Whether `source` is internal to (embedded in) `target`.
    #[inline]
    pub fn is_internal(&self, source: ComponentId, target: ComponentId) -> bool {
        self.has_relation(source, target, Relation::Internal)
    }

    fn has_relation(&self, source: ComponentId, target: ComponentId, relation: Relation) -> bool {
        self.outgoing
            .get(&source)
            .is_some_and(|outs| outs.iter().any(|&(t, r)| t == target && r == relation))
    }

    /// Number of components `id` is embedded in.
    pub fn nb_embeddings(&self, id: ComponentId) -> usize {
        self.embeddings(id).count()
    }

    /// Number of components `id` is a boundary of.
    pub fn nb_incidences(&self, id: ComponentId) -> usize {
        self.incidences(id).count()
    }

    /// Components `id` is embedded in.
    pub fn embeddings(&self, id: ComponentId) -> impl Iterator<Item = ComponentId> + '_ {
        self.out_relations(id, Relation::Internal)
    }

    /// Components `id` is a boundary of.
    pub fn incidences(&self, id: ComponentId) -> impl Iterator<Item = ComponentId> + '_ {
        self.out_relations(id, Relation::Boundary)
    }

    /// Components forming the boundary of `id`.
    pub fn boundaries_of(&self, id: ComponentId) -> impl Iterator<Item = ComponentId> + '_ {
        self.in_relations(id, Relation::Boundary)
    }

    /// Components embedded inside `id`.
    pub fn internals_of(&self, id: ComponentId) -> impl Iterator<Item = ComponentId> + '_ {
        self.in_relations(id, Relation::Internal)
    }

    fn out_relations(
        &self,
        id: ComponentId,
        relation: Relation,
    ) -> impl Iterator<Item = ComponentId> + '_ {
        self.outgoing
            .get(&id)
            .into_iter()
            .flatten()
            .filter(move |&&(_, r)| r == relation)
            .map(|&(t, _)| t)
    }

    fn in_relations(
        &self,
        id: ComponentId,
        relation: Relation,
    ) -> impl Iterator<Item = ComponentId> + '_ {
        self.incoming
            .get(&id)
            .into_iter()
            .flatten()
            .filter(move |&&(_, r)| r == relation)
            .map(|&(s, _)| s)
    }

    #[cfg(debug_assertions)]
    pub(crate) fn debug_assert_consistent(&self) {
        for (src, outs) in &self.outgoing {
            for (dst, rel) in outs {
                let ok = self
                    .incoming
                    .get(dst)
                    .is_some_and(|ins| ins.iter().any(|(s, r)| s == src && r == rel));
                debug_assert!(ok, "missing mirror in[{dst:?}] for ({src:?} -> {dst:?})");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(raw: u64) -> ComponentId {
        ComponentId::new(raw)
    }

    #[test]
    fn boundary_and_internal_are_distinct() {
        let mut graph = RelationshipGraph::new();
        graph.add_relation(c(1), c(2), Relation::Boundary);
        graph.add_relation(c(3), c(2), Relation::Internal);
        assert!(graph.is_boundary(c(1), c(2)));
        assert!(!graph.is_internal(c(1), c(2)));
        assert!(graph.is_internal(c(3), c(2)));
        assert!(!graph.is_boundary(c(3), c(2)));
    }

    #[test]
    fn degree_counts() {
        let mut graph = RelationshipGraph::new();
        graph.add_relation(c(1), c(2), Relation::Boundary);
        graph.add_relation(c(1), c(3), Relation::Boundary);
        graph.add_relation(c(1), c(4), Relation::Internal);
        assert_eq!(graph.nb_incidences(c(1)), 2);
        assert_eq!(graph.nb_embeddings(c(1)), 1);
        assert_eq!(graph.nb_incidences(c(5)), 0);
    }

    #[test]
    fn duplicate_relations_are_ignored() {
        let mut graph = RelationshipGraph::new();
        graph.add_relation(c(1), c(2), Relation::Boundary);
        graph.add_relation(c(1), c(2), Relation::Boundary);
        assert_eq!(graph.nb_incidences(c(1)), 1);
        assert_eq!(graph.boundaries_of(c(2)).count(), 1);
    }

    #[test]
    fn mirrored_queries_agree() {
        let mut graph = RelationshipGraph::new();
        graph.add_relation(c(1), c(2), Relation::Boundary);
        graph.add_relation(c(3), c(2), Relation::Internal);
        let bounds: Vec<_> = graph.boundaries_of(c(2)).collect();
        assert_eq!(bounds, vec![c(1)]);
        let internals: Vec<_> = graph.internals_of(c(2)).collect();
        assert_eq!(internals, vec![c(3)]);
        #[cfg(debug_assertions)]
        graph.debug_assert_consistent();
    }
}
