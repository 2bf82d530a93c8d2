//! Shared storage behind `Section` and `BRep`.
//!
//! Both model kinds own the same three pieces: the component table, the
//! relationship graph and the unique-vertex index. The public query surfaces
//! live on `Section`/`BRep`; this module only holds the common plumbing.

use std::collections::BTreeMap;

use crate::model::component::{ComponentId, ComponentKind, ComponentMeshVertex};
use crate::model::mesh::ComponentMesh;
use crate::model::relationships::{Relation, RelationshipGraph};
use crate::model::vertices::UniqueVertexIndex;
use crate::model_error::ModelError;

/// One component of the model: its kind plus an optional mesh.
///
/// An unmeshed component is a valid-but-flagged state, reported by the
/// inspector rather than rejected at construction.
#[derive(Clone, Debug)]
pub(crate) struct Component {
    pub(crate) kind: ComponentKind,
    pub(crate) mesh: Option<ComponentMesh>,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct ModelBody {
    // BTreeMap keeps component iteration (and thus reports) deterministic.
    components: BTreeMap<ComponentId, Component>,
    next_id: u64,
    pub(crate) graph: RelationshipGraph,
    pub(crate) vertices: UniqueVertexIndex,
}

impl ModelBody {
    pub(crate) fn add_component(
        &mut self,
        kind: ComponentKind,
        mesh: Option<ComponentMesh>,
    ) -> ComponentId {
        self.next_id += 1;
        let id = ComponentId::new(self.next_id);
        self.components.insert(id, Component { kind, mesh });
        id
    }

    pub(crate) fn set_mesh(
        &mut self,
        id: ComponentId,
        mesh: Option<ComponentMesh>,
    ) -> Result<(), ModelError> {
        let component = self
            .components
            .get_mut(&id)
            .ok_or(ModelError::UnknownComponent(id))?;
        component.mesh = mesh;
        Ok(())
    }

    pub(crate) fn kind(&self, id: ComponentId) -> Option<ComponentKind> {
        self.components.get(&id).map(|c| c.kind)
    }

    /// Kind of a component known to exist.
    ///
    /// # Panics
    /// Panics on an unknown id: CMVs and relations only ever hold ids issued
    /// by `add_component`, so a miss is an engine bug, not bad model data.
    pub(crate) fn kind_of(&self, id: ComponentId) -> ComponentKind {
        self.kind(id)
            .unwrap_or_else(|| panic!("component {id} not in model"))
    }

    pub(crate) fn mesh(&self, id: ComponentId) -> Option<&ComponentMesh> {
        self.components.get(&id).and_then(|c| c.mesh.as_ref())
    }

    pub(crate) fn components_of_kind(
        &self,
        kind: ComponentKind,
    ) -> impl Iterator<Item = ComponentId> + '_ {
        self.components
            .iter()
            .filter(move |(_, c)| c.kind == kind)
            .map(|(&id, _)| id)
    }

    pub(crate) fn add_relation(
        &mut self,
        source: ComponentId,
        target: ComponentId,
        relation: Relation,
    ) -> Result<(), ModelError> {
        if source == target {
            return Err(ModelError::SelfRelation(source));
        }
        let source_kind = self
            .kind(source)
            .ok_or(ModelError::UnknownComponent(source))?;
        let target_kind = self
            .kind(target)
            .ok_or(ModelError::UnknownComponent(target))?;
        let valid = match relation {
            // A boundary component sits exactly one dimension below.
            Relation::Boundary => source_kind.dimension() + 1 == target_kind.dimension(),
            // An embedded component may be any strictly lower dimension.
            Relation::Internal => source_kind.dimension() < target_kind.dimension(),
        };
        if !valid {
            return Err(match relation {
                Relation::Boundary => ModelError::InvalidBoundaryRelation {
                    lower: source,
                    lower_kind: source_kind,
                    upper: target,
                    upper_kind: target_kind,
                },
                Relation::Internal => ModelError::InvalidInternalRelation {
                    lower: source,
                    lower_kind: source_kind,
                    upper: target,
                    upper_kind: target_kind,
                },
            });
        }
        self.graph.add_relation(source, target, relation);
        Ok(())
    }

    pub(crate) fn link_vertex(
        &mut self,
        unique_vertex_id: usize,
        cmv: ComponentMeshVertex,
    ) -> Result<(), ModelError> {
        if unique_vertex_id >= self.vertices.nb_unique_vertices() {
            return Err(ModelError::UniqueVertexOutOfRange {
                unique_vertex: unique_vertex_id,
                nb_unique_vertices: self.vertices.nb_unique_vertices(),
            });
        }
        if !self.components.contains_key(&cmv.component) {
            return Err(ModelError::UnknownComponent(cmv.component));
        }
        let nb_vertices = self.mesh(cmv.component).map_or(0, ComponentMesh::nb_vertices);
        if cmv.vertex >= nb_vertices {
            return Err(ModelError::MeshVertexOutOfRange { cmv, nb_vertices });
        }
        self.vertices.link(unique_vertex_id, cmv);
        Ok(())
    }

    /// CMVs of `unique_vertex_id` whose component has the given kind,
    /// preserving the index order.
    pub(crate) fn cmvs_of_kind(
        &self,
        unique_vertex_id: usize,
        kind: ComponentKind,
    ) -> Vec<ComponentMeshVertex> {
        self.vertices
            .component_mesh_vertices(unique_vertex_id)
            .iter()
            .filter(|cmv| self.kind(cmv.component) == Some(kind))
            .copied()
            .collect()
    }

    /// Whether `cmv` denotes an existing mesh vertex of an existing
    /// component.
    pub(crate) fn cmv_exists(&self, cmv: ComponentMeshVertex) -> bool {
        self.mesh(cmv.component)
            .is_some_and(|mesh| cmv.vertex < mesh.nb_vertices())
    }

    /// All components of `kind` have a mesh with at least one element.
    pub(crate) fn all_meshed(&self, kind: ComponentKind) -> bool {
        self.components_of_kind(kind)
            .all(|id| self.mesh(id).is_some_and(|mesh| mesh.nb_elements() > 0))
    }
}
