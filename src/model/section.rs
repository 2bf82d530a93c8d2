//! `Section`: 2D boundary-representation model.
//!
//! The planar counterpart of [`BRep`](crate::model::BRep): corners, lines
//! and surfaces only. Surfaces play the role blocks play in 3D, so the
//! meshedness prerequisite here is "all surfaces carry polygons".

use once_cell::sync::OnceCell;

use crate::model::component::{ComponentId, ComponentKind, ComponentMeshVertex};
use crate::model::core::ModelBody;
use crate::model::mesh::ComponentMesh;
use crate::model::relationships::Relation;
use crate::model_error::ModelError;

/// 2D model: corners, lines and surfaces.
#[derive(Clone, Debug, Default)]
pub struct Section {
    body: ModelBody,
    surfaces_meshed: OnceCell<bool>,
}

impl Section {
    pub fn builder() -> SectionBuilder {
        SectionBuilder::default()
    }

    #[inline]
    pub fn nb_unique_vertices(&self) -> usize {
        self.body.vertices.nb_unique_vertices()
    }

    /// All CMVs resolving to `unique_vertex_id`.
    ///
    /// # Panics
    /// Panics if `unique_vertex_id >= nb_unique_vertices()`.
    #[inline]
    pub fn component_mesh_vertices(&self, unique_vertex_id: usize) -> &[ComponentMeshVertex] {
        self.body.vertices.component_mesh_vertices(unique_vertex_id)
    }

    /// CMVs of `unique_vertex_id` belonging to components of `kind`.
    pub fn component_mesh_vertices_of_kind(
        &self,
        unique_vertex_id: usize,
        kind: ComponentKind,
    ) -> Vec<ComponentMeshVertex> {
        self.body.cmvs_of_kind(unique_vertex_id, kind)
    }

    #[inline]
    pub fn unique_vertex(&self, cmv: ComponentMeshVertex) -> Option<usize> {
        self.body.vertices.unique_vertex(cmv)
    }

    #[inline]
    pub fn is_boundary(&self, source: ComponentId, target: ComponentId) -> bool {
        self.body.graph.is_boundary(source, target)
    }

    #[inline]
    pub fn is_internal(&self, source: ComponentId, target: ComponentId) -> bool {
        self.body.graph.is_internal(source, target)
    }

    #[inline]
    pub fn nb_embeddings(&self, id: ComponentId) -> usize {
        self.body.graph.nb_embeddings(id)
    }

    #[inline]
    pub fn nb_incidences(&self, id: ComponentId) -> usize {
        self.body.graph.nb_incidences(id)
    }

    pub fn embeddings(&self, id: ComponentId) -> impl Iterator<Item = ComponentId> + '_ {
        self.body.graph.embeddings(id)
    }

    pub fn incidences(&self, id: ComponentId) -> impl Iterator<Item = ComponentId> + '_ {
        self.body.graph.incidences(id)
    }

    pub fn boundaries_of(&self, id: ComponentId) -> impl Iterator<Item = ComponentId> + '_ {
        self.body.graph.boundaries_of(id)
    }

    #[inline]
    pub fn kind(&self, id: ComponentId) -> Option<ComponentKind> {
        self.body.kind(id)
    }

    #[inline]
    pub fn kind_of(&self, id: ComponentId) -> ComponentKind {
        self.body.kind_of(id)
    }

    #[inline]
    pub fn mesh(&self, id: ComponentId) -> Option<&ComponentMesh> {
        self.body.mesh(id)
    }

    pub fn corners(&self) -> impl Iterator<Item = ComponentId> + '_ {
        self.body.components_of_kind(ComponentKind::Corner)
    }

    pub fn lines(&self) -> impl Iterator<Item = ComponentId> + '_ {
        self.body.components_of_kind(ComponentKind::Line)
    }

    pub fn surfaces(&self) -> impl Iterator<Item = ComponentId> + '_ {
        self.body.components_of_kind(ComponentKind::Surface)
    }

    pub fn cmv_exists(&self, cmv: ComponentMeshVertex) -> bool {
        self.body.cmv_exists(cmv)
    }

    /// Whether every surface carries a mesh with at least one polygon.
    ///
    /// Embedding rules for lines are only meaningful when the embedding
    /// surfaces are meshed; otherwise they short-circuit to "not
    /// applicable". Computed once per model.
    pub fn surfaces_are_meshed(&self) -> bool {
        *self
            .surfaces_meshed
            .get_or_init(|| self.body.all_meshed(ComponentKind::Surface))
    }
}

/// Assembles a [`Section`].
#[derive(Debug, Default)]
pub struct SectionBuilder {
    body: ModelBody,
}

impl SectionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_corner(&mut self, mesh: Option<ComponentMesh>) -> ComponentId {
        self.body.add_component(ComponentKind::Corner, mesh)
    }

    pub fn add_line(&mut self, mesh: Option<ComponentMesh>) -> ComponentId {
        self.body.add_component(ComponentKind::Line, mesh)
    }

    pub fn add_surface(&mut self, mesh: Option<ComponentMesh>) -> ComponentId {
        self.body.add_component(ComponentKind::Surface, mesh)
    }

    /// Replaces (or removes) the mesh of an existing component. Stale vertex
    /// links become "inexistant CMV" issues on the next inspection.
    pub fn set_mesh(
        &mut self,
        id: ComponentId,
        mesh: Option<ComponentMesh>,
    ) -> Result<(), ModelError> {
        self.body.set_mesh(id, mesh)
    }

    pub fn add_boundary(
        &mut self,
        source: ComponentId,
        target: ComponentId,
    ) -> Result<(), ModelError> {
        self.body.add_relation(source, target, Relation::Boundary)
    }

    pub fn add_internal(
        &mut self,
        source: ComponentId,
        target: ComponentId,
    ) -> Result<(), ModelError> {
        self.body.add_relation(source, target, Relation::Internal)
    }

    pub fn set_nb_unique_vertices(&mut self, nb_unique_vertices: usize) {
        self.body.vertices = crate::model::vertices::UniqueVertexIndex::new(nb_unique_vertices);
    }

    pub fn link_vertex(
        &mut self,
        unique_vertex_id: usize,
        cmv: ComponentMeshVertex,
    ) -> Result<(), ModelError> {
        self.body.link_vertex(unique_vertex_id, cmv)
    }

    pub fn build(self) -> Section {
        #[cfg(debug_assertions)]
        self.body.graph.debug_assert_consistent();
        Section {
            body: self.body,
            surfaces_meshed: OnceCell::new(),
        }
    }
}
