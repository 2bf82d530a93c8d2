//! Full topology inspection of a [`BRep`] model.
//!
//! The inspector combines the model-wide vertex-linking checks with the four
//! per-kind rule sets ([`BRepCornersTopology`], [`BRepLinesTopology`],
//! [`BRepSurfacesTopology`], [`BRepBlocksTopology`]). Every check collects
//! issues; nothing fails fast.

use std::fmt;

use rayon::prelude::*;

use crate::inspect::issues::InspectionIssues;
use crate::model::{BRep, ComponentId};

pub mod blocks;
pub mod corners;
pub mod lines;
pub mod surfaces;

pub use blocks::{BRepBlocksInspectionResult, BRepBlocksTopology};
pub use corners::{BRepCornersInspectionResult, BRepCornersTopology};
pub use lines::{BRepLinesInspectionResult, BRepLinesTopology};
pub use surfaces::{BRepSurfacesInspectionResult, BRepSurfacesTopology};

/// Aggregated result of a full `BRep` topology inspection.
#[derive(Clone, Debug, serde::Serialize)]
pub struct BRepTopologyInspectionResult {
    pub corners: BRepCornersInspectionResult,
    pub lines: BRepLinesInspectionResult,
    pub surfaces: BRepSurfacesInspectionResult,
    pub blocks: BRepBlocksInspectionResult,
    pub unique_vertices_not_linked_to_any_component: InspectionIssues<usize>,
    pub unique_vertices_linked_to_inexistant_cmv: InspectionIssues<usize>,
    pub unique_vertices_nonbijectively_linked_to_cmv: InspectionIssues<usize>,
    pub meshed_components_not_linked_to_a_unique_vertex: InspectionIssues<ComponentId>,
}

impl Default for BRepTopologyInspectionResult {
    fn default() -> Self {
        Self {
            corners: BRepCornersInspectionResult::default(),
            lines: BRepLinesInspectionResult::default(),
            surfaces: BRepSurfacesInspectionResult::default(),
            blocks: BRepBlocksInspectionResult::default(),
            unique_vertices_not_linked_to_any_component: InspectionIssues::new(
                "Unique vertices not linked to any component mesh vertex",
            ),
            unique_vertices_linked_to_inexistant_cmv: InspectionIssues::new(
                "Unique vertices linked to an inexistant component mesh vertex",
            ),
            unique_vertices_nonbijectively_linked_to_cmv: InspectionIssues::new(
                "Unique vertices whose component mesh vertices resolve to another unique vertex",
            ),
            meshed_components_not_linked_to_a_unique_vertex: InspectionIssues::new(
                "Meshed components with no vertex linked to a unique vertex",
            ),
        }
    }
}

impl BRepTopologyInspectionResult {
    /// Total number of issues across every category, counted once each.
    pub fn nb_issues(&self) -> usize {
        self.corners.nb_issues()
            + self.lines.nb_issues()
            + self.surfaces.nb_issues()
            + self.blocks.nb_issues()
            + self.unique_vertices_not_linked_to_any_component.nb_issues()
            + self.unique_vertices_linked_to_inexistant_cmv.nb_issues()
            + self
                .unique_vertices_nonbijectively_linked_to_cmv
                .nb_issues()
            + self
                .meshed_components_not_linked_to_a_unique_vertex
                .nb_issues()
    }

    pub fn is_empty(&self) -> bool {
        self.nb_issues() == 0
    }
}

impl fmt::Display for BRepTopologyInspectionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.unique_vertices_not_linked_to_any_component)?;
        writeln!(f, "{}", self.unique_vertices_linked_to_inexistant_cmv)?;
        writeln!(f, "{}", self.unique_vertices_nonbijectively_linked_to_cmv)?;
        writeln!(
            f,
            "{}",
            self.meshed_components_not_linked_to_a_unique_vertex
        )?;
        writeln!(f, "{}", self.corners)?;
        writeln!(f, "{}", self.lines)?;
        writeln!(f, "{}", self.surfaces)?;
        write!(f, "{}", self.blocks)
    }
}

/// Per-vertex linking issues, merged across parallel workers.
#[derive(Default)]
struct VertexLinkingBuffers {
    not_linked: Vec<(usize, String)>,
    inexistant: Vec<(usize, String)>,
    nonbijective: Vec<(usize, String)>,
}

impl VertexLinkingBuffers {
    fn merge(&mut self, mut other: Self) {
        self.not_linked.append(&mut other.not_linked);
        self.inexistant.append(&mut other.inexistant);
        self.nonbijective.append(&mut other.nonbijective);
    }
}

/// Runs every topology check of a `BRep` model.
pub struct BRepTopologyInspector<'a> {
    brep: &'a BRep,
}

impl<'a> BRepTopologyInspector<'a> {
    pub fn new(brep: &'a BRep) -> Self {
        Self { brep }
    }

    /// Whether the model topology is valid: at least one unique vertex,
    /// every meshed component and unique vertex properly linked, and every
    /// per-kind rule satisfied at every unique vertex.
    pub fn brep_topology_is_valid(&self) -> bool {
        if self.brep.nb_unique_vertices() == 0 {
            return false;
        }
        if !self.meshed_components_are_linked_to_unique_vertices() {
            return false;
        }
        let corners = BRepCornersTopology::new(self.brep);
        let lines = BRepLinesTopology::new(self.brep);
        let surfaces = BRepSurfacesTopology::new(self.brep);
        let blocks = BRepBlocksTopology::new(self.brep);
        (0..self.brep.nb_unique_vertices())
            .into_par_iter()
            .all(|uv| {
                self.unique_vertex_is_not_linked_to_any_component(uv)
                    .is_none()
                    && self.unique_vertex_linking_issues(uv).is_empty()
                    && corners.corner_topology_is_valid(uv)
                    && lines.line_topology_is_valid(uv)
                    && surfaces.surface_topology_is_valid(uv)
                    && blocks.block_topology_is_valid(uv)
            })
    }

    /// A unique vertex carrying no CMV at all is dangling.
    pub fn unique_vertex_is_not_linked_to_any_component(
        &self,
        unique_vertex_id: usize,
    ) -> Option<String> {
        self.brep
            .component_mesh_vertices(unique_vertex_id)
            .is_empty()
            .then(|| {
                format!("unique vertex {unique_vertex_id} is not linked to any component mesh vertex")
            })
    }

    /// Broken links of one unique vertex: CMVs pointing into missing meshes
    /// or resolving back to a different unique vertex.
    fn unique_vertex_linking_issues(&self, unique_vertex_id: usize) -> Vec<String> {
        let mut messages = Vec::new();
        for &cmv in self.brep.component_mesh_vertices(unique_vertex_id) {
            if !self.brep.cmv_exists(cmv) {
                messages.push(format!(
                    "unique vertex {unique_vertex_id} is linked to {cmv}, which does not exist in the component mesh"
                ));
            } else if self.brep.unique_vertex(cmv) != Some(unique_vertex_id) {
                messages.push(format!(
                    "unique vertex {unique_vertex_id} is linked to {cmv}, which resolves to another unique vertex"
                ));
            }
        }
        messages
    }

    fn meshed_components_are_linked_to_unique_vertices(&self) -> bool {
        self.unlinked_meshed_components().is_empty()
    }

    /// Meshed components with no vertex linked anywhere. Reported at the
    /// component level; per-vertex gaps belong to the per-kind results.
    fn unlinked_meshed_components(&self) -> Vec<ComponentId> {
        let components = self
            .brep
            .corners()
            .chain(self.brep.lines())
            .chain(self.brep.surfaces())
            .chain(self.brep.blocks());
        let mut unlinked = Vec::new();
        for component in components {
            let Some(mesh) = self.brep.mesh(component) else {
                continue;
            };
            if mesh.is_empty() {
                continue;
            }
            let linked = (0..mesh.nb_vertices()).any(|vertex| {
                self.brep
                    .unique_vertex(crate::model::ComponentMeshVertex::new(component, vertex))
                    .is_some()
            });
            if !linked {
                unlinked.push(component);
            }
        }
        unlinked
    }

    /// Runs every check and aggregates the issues.
    pub fn inspect_brep_topology(&self) -> BRepTopologyInspectionResult {
        log::debug!(
            "inspecting brep topology: {} unique vertices",
            self.brep.nb_unique_vertices()
        );
        let mut result = BRepTopologyInspectionResult {
            corners: BRepCornersTopology::new(self.brep).inspect_corners(),
            lines: BRepLinesTopology::new(self.brep).inspect_lines(),
            surfaces: BRepSurfacesTopology::new(self.brep).inspect_surfaces(),
            blocks: BRepBlocksTopology::new(self.brep).inspect_blocks(),
            ..Default::default()
        };
        for component in self.unlinked_meshed_components() {
            result.meshed_components_not_linked_to_a_unique_vertex.add_issue(
                component,
                format!("component {component} is meshed but none of its vertices is linked to a unique vertex"),
            );
        }
        let linking = (0..self.brep.nb_unique_vertices())
            .into_par_iter()
            .fold(VertexLinkingBuffers::default, |mut acc, uv| {
                if let Some(message) = self.unique_vertex_is_not_linked_to_any_component(uv) {
                    acc.not_linked.push((uv, message));
                }
                for &cmv in self.brep.component_mesh_vertices(uv) {
                    if !self.brep.cmv_exists(cmv) {
                        acc.inexistant.push((
                            uv,
                            format!(
                                "unique vertex {uv} is linked to {cmv}, which does not exist in the component mesh"
                            ),
                        ));
                    } else if self.brep.unique_vertex(cmv) != Some(uv) {
                        acc.nonbijective.push((
                            uv,
                            format!(
                                "unique vertex {uv} is linked to {cmv}, which resolves to another unique vertex"
                            ),
                        ));
                    }
                }
                acc
            })
            .reduce(VertexLinkingBuffers::default, |mut a, b| {
                a.merge(b);
                a
            });
        for (uv, message) in linking.not_linked {
            result
                .unique_vertices_not_linked_to_any_component
                .add_issue(uv, message);
        }
        for (uv, message) in linking.inexistant {
            result
                .unique_vertices_linked_to_inexistant_cmv
                .add_issue(uv, message);
        }
        for (uv, message) in linking.nonbijective {
            result
                .unique_vertices_nonbijectively_linked_to_cmv
                .add_issue(uv, message);
        }
        let nb_issues = result.nb_issues();
        if nb_issues > 0 {
            log::warn!("brep topology inspection found {nb_issues} issues");
        }
        result
    }
}

/// Convenience entry point over [`BRepTopologyInspector`].
pub fn inspect_brep_topology(brep: &BRep) -> BRepTopologyInspectionResult {
    BRepTopologyInspector::new(brep).inspect_brep_topology()
}
