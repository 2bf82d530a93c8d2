//! Model-wide unique-vertex index.
//!
//! A unique vertex is a model-wide vertex identity shared by the mesh
//! vertices of possibly many components: the corner point, the line
//! endpoints, the surface border vertices and the block corner all meeting
//! at one geometric location resolve to one unique vertex.
//!
//! The index stores, per unique vertex, the ordered list of
//! [`ComponentMeshVertex`](crate::model::ComponentMeshVertex) (CMV) pairs
//! resolving to it, plus the reverse CMV -> unique-vertex map. The reverse
//! map keeps the first claim of each CMV: a second claim is preserved in the
//! forward list so the inspector can report the non-bijective link instead
//! of silently overwriting it.

use std::collections::HashMap;

use crate::model::component::ComponentMeshVertex;

/// Index of unique vertices and their associated CMVs.
#[derive(Clone, Debug, Default)]
pub struct UniqueVertexIndex {
    cmvs: Vec<Vec<ComponentMeshVertex>>,
    by_cmv: HashMap<ComponentMeshVertex, usize>,
}

impl UniqueVertexIndex {
    /// Creates an index with `nb_unique_vertices` empty vertices.
    pub fn new(nb_unique_vertices: usize) -> Self {
        Self {
            cmvs: vec![Vec::new(); nb_unique_vertices],
            by_cmv: HashMap::new(),
        }
    }

    #[inline]
    pub fn nb_unique_vertices(&self) -> usize {
        self.cmvs.len()
    }

    /// Associates `cmv` with the unique vertex `unique_vertex_id`.
    ///
    /// If the CMV was already claimed by another unique vertex, the earlier
    /// claim wins in the reverse map and the new one is recorded only in the
    /// forward list; the inspector reports it as a non-bijective link.
    ///
    /// # Panics
    /// Panics if `unique_vertex_id` is out of range; callers (the model
    /// builders) are expected to have sized the index first.
    pub fn link(&mut self, unique_vertex_id: usize, cmv: ComponentMeshVertex) {
        let set = self
            .cmvs
            .get_mut(unique_vertex_id)
            .unwrap_or_else(|| panic!("unique vertex {unique_vertex_id} out of range"));
        if set.contains(&cmv) {
            return;
        }
        set.push(cmv);
        self.by_cmv.entry(cmv).or_insert(unique_vertex_id);
    }

    /// CMVs associated with `unique_vertex_id`.
    ///
    /// # Panics
    /// Panics if `unique_vertex_id` is out of range (programming-contract
    /// violation: unique vertex ids come from `0..nb_unique_vertices`).
    #[inline]
    pub fn component_mesh_vertices(&self, unique_vertex_id: usize) -> &[ComponentMeshVertex] {
        &self.cmvs[unique_vertex_id]
    }

    /// The unique vertex `cmv` resolves to, if any.
    #[inline]
    pub fn unique_vertex(&self, cmv: ComponentMeshVertex) -> Option<usize> {
        self.by_cmv.get(&cmv).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::component::ComponentId;

    fn cmv(component: u64, vertex: u32) -> ComponentMeshVertex {
        ComponentMeshVertex::new(ComponentId::new(component), vertex)
    }

    #[test]
    fn link_and_resolve() {
        let mut index = UniqueVertexIndex::new(2);
        index.link(0, cmv(1, 0));
        index.link(0, cmv(2, 3));
        index.link(1, cmv(2, 4));
        assert_eq!(index.component_mesh_vertices(0), &[cmv(1, 0), cmv(2, 3)]);
        assert_eq!(index.unique_vertex(cmv(2, 4)), Some(1));
        assert_eq!(index.unique_vertex(cmv(9, 0)), None);
    }

    #[test]
    fn double_claim_keeps_first_owner() {
        let mut index = UniqueVertexIndex::new(2);
        index.link(0, cmv(1, 0));
        index.link(1, cmv(1, 0));
        // Reverse map keeps the first claim; the forward list keeps both so
        // the inspector can report the conflict.
        assert_eq!(index.unique_vertex(cmv(1, 0)), Some(0));
        assert_eq!(index.component_mesh_vertices(1), &[cmv(1, 0)]);
    }

    #[test]
    fn relink_same_pair_is_idempotent() {
        let mut index = UniqueVertexIndex::new(1);
        index.link(0, cmv(1, 0));
        index.link(0, cmv(1, 0));
        assert_eq!(index.component_mesh_vertices(0).len(), 1);
    }

    #[test]
    fn out_of_range_link_panics() {
        let result = std::panic::catch_unwind(|| {
            let mut index = UniqueVertexIndex::new(1);
            index.link(3, cmv(1, 0));
        });
        assert!(result.is_err());
    }
}
