//! `BRep`: 3D boundary-representation model.
//!
//! A `BRep` owns corners, lines, surfaces and blocks, the relationship graph
//! tying them together, and the unique-vertex index resolving their mesh
//! vertices to model-wide identities. The type is read-only once built; all
//! assembly goes through [`BRepBuilder`].

use once_cell::sync::OnceCell;

use crate::model::component::{ComponentId, ComponentKind, ComponentMeshVertex};
use crate::model::core::ModelBody;
use crate::model::mesh::ComponentMesh;
use crate::model::relationships::Relation;
use crate::model_error::ModelError;

/// 3D model: corners, lines, surfaces and blocks.
#[derive(Clone, Debug, Default)]
pub struct BRep {
    body: ModelBody,
    blocks_meshed: OnceCell<bool>,
}

impl BRep {
    pub fn builder() -> BRepBuilder {
        BRepBuilder::default()
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

    /// The unique vertex `cmv` resolves to, if it is linked at all.
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

    /// Components `id` is embedded in.
    pub fn embeddings(&self, id: ComponentId) -> impl Iterator<Item = ComponentId> + '_ {
        self.body.graph.embeddings(id)
    }

    /// Components `id` is a boundary of.
    pub fn incidences(&self, id: ComponentId) -> impl Iterator<Item = ComponentId> + '_ {
        self.body.graph.incidences(id)
    }

    /// Components forming the boundary of `id`.
    pub fn boundaries_of(&self, id: ComponentId) -> impl Iterator<Item = ComponentId> + '_ {
        self.body.graph.boundaries_of(id)
    }

    /// Surfaces the line `id` is embedded in.
    pub fn nb_embedding_surfaces(&self, id: ComponentId) -> usize {
        self.embeddings_of_kind(id, ComponentKind::Surface).count()
    }

    /// Blocks the component `id` is embedded in.
    pub fn nb_embedding_blocks(&self, id: ComponentId) -> usize {
        self.embeddings_of_kind(id, ComponentKind::Block).count()
    }

    pub fn embeddings_of_kind(
        &self,
        id: ComponentId,
        kind: ComponentKind,
    ) -> impl Iterator<Item = ComponentId> + '_ {
        self.embeddings(id)
            .filter(move |&target| self.kind(target) == Some(kind))
    }

    #[inline]
    pub fn kind(&self, id: ComponentId) -> Option<ComponentKind> {
        self.body.kind(id)
    }

    /// Kind of a component known to exist; panics on an unknown id.
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

    pub fn blocks(&self) -> impl Iterator<Item = ComponentId> + '_ {
        self.body.components_of_kind(ComponentKind::Block)
    }

    /// Whether `cmv` denotes an existing vertex of an existing mesh.
    pub fn cmv_exists(&self, cmv: ComponentMeshVertex) -> bool {
        self.body.cmv_exists(cmv)
    }

    /// Whether every block carries a mesh with at least one polyhedron.
    ///
    /// Several rules are only meaningful on volumetric meshes; when blocks
    /// are unmeshed those rules short-circuit to "not applicable" instead of
    /// cascading false positives. Computed once per model.
    pub fn blocks_are_meshed(&self) -> bool {
        *self
            .blocks_meshed
            .get_or_init(|| self.body.all_meshed(ComponentKind::Block))
    }
}

/// Assembles a [`BRep`]. All methods that take ids validate them and report
/// [`ModelError`]; rule-level inconsistencies (the inspector's concern) are
/// deliberately representable.
#[derive(Debug, Default)]
pub struct BRepBuilder {
    body: ModelBody,
}

impl BRepBuilder {
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

    pub fn add_block(&mut self, mesh: Option<ComponentMesh>) -> ComponentId {
        self.body.add_component(ComponentKind::Block, mesh)
    }

    /// Replaces (or removes) the mesh of an existing component.
    ///
    /// Existing vertex links are left untouched; links into a removed or
    /// shrunk mesh become "inexistant CMV" issues on the next inspection.
    pub fn set_mesh(
        &mut self,
        id: ComponentId,
        mesh: Option<ComponentMesh>,
    ) -> Result<(), ModelError> {
        self.body.set_mesh(id, mesh)
    }

    /// Declares `source` a boundary of `target`.
    pub fn add_boundary(
        &mut self,
        source: ComponentId,
        target: ComponentId,
    ) -> Result<(), ModelError> {
        self.body.add_relation(source, target, Relation::Boundary)
    }

    /// Declares `source` embedded in `target`.
    pub fn add_internal(
        &mut self,
        source: ComponentId,
        target: ComponentId,
    ) -> Result<(), ModelError> {
        self.body.add_relation(source, target, Relation::Internal)
    }

    /// Sizes the unique-vertex index. Must be called before `link_vertex`.
    pub fn set_nb_unique_vertices(&mut self, nb_unique_vertices: usize) {
        self.body.vertices = crate::model::vertices::UniqueVertexIndex::new(nb_unique_vertices);
    }

    /// Associates one component mesh vertex with a unique vertex.
    pub fn link_vertex(
        &mut self,
        unique_vertex_id: usize,
        cmv: ComponentMeshVertex,
    ) -> Result<(), ModelError> {
        self.body.link_vertex(unique_vertex_id, cmv)
    }

    pub fn build(self) -> BRep {
        #[cfg(debug_assertions)]
        self.body.graph.debug_assert_consistent();
        BRep {
            body: self.body,
            blocks_meshed: OnceCell::new(),
        }
    }
}
