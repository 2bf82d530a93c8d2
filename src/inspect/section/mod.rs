//! Full topology inspection of a [`Section`] model.

use std::fmt;

use rayon::prelude::*;

use crate::inspect::issues::InspectionIssues;
use crate::model::{ComponentId, ComponentMeshVertex, Section};

pub mod corners;
pub mod lines;
pub mod surfaces;

pub use corners::{SectionCornersInspectionResult, SectionCornersTopology};
pub use lines::{SectionLinesInspectionResult, SectionLinesTopology};
pub use surfaces::{SectionSurfacesInspectionResult, SectionSurfacesTopology};

/// Aggregated result of a full `Section` topology inspection.
#[derive(Clone, Debug, serde::Serialize)]
pub struct SectionTopologyInspectionResult {
    pub corners: SectionCornersInspectionResult,
    pub lines: SectionLinesInspectionResult,
    pub surfaces: SectionSurfacesInspectionResult,
    pub unique_vertices_not_linked_to_any_component: InspectionIssues<usize>,
    pub unique_vertices_linked_to_inexistant_cmv: InspectionIssues<usize>,
    pub unique_vertices_nonbijectively_linked_to_cmv: InspectionIssues<usize>,
    pub meshed_components_not_linked_to_a_unique_vertex: InspectionIssues<ComponentId>,
}

impl Default for SectionTopologyInspectionResult {
    fn default() -> Self {
        Self {
            corners: SectionCornersInspectionResult::default(),
            lines: SectionLinesInspectionResult::default(),
            surfaces: SectionSurfacesInspectionResult::default(),
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

impl SectionTopologyInspectionResult {
    /// Total number of issues across every category, counted once each.
    pub fn nb_issues(&self) -> usize {
        self.corners.nb_issues()
            + self.lines.nb_issues()
            + self.surfaces.nb_issues()
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

impl fmt::Display for SectionTopologyInspectionResult {
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
        write!(f, "{}", self.surfaces)
    }
}

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

/// Runs every topology check of a `Section` model.
pub struct SectionTopologyInspector<'a> {
    section: &'a Section,
}

impl<'a> SectionTopologyInspector<'a> {
    pub fn new(section: &'a Section) -> Self {
        Self { section }
    }

    /// Whether the model topology is valid: at least one unique vertex,
    /// every meshed component and unique vertex properly linked, and every
    /// per-kind rule satisfied at every unique vertex.
    pub fn section_topology_is_valid(&self) -> bool {
        if self.section.nb_unique_vertices() == 0 {
            return false;
        }
        if !self.unlinked_meshed_components().is_empty() {
            return false;
        }
        let corners = SectionCornersTopology::new(self.section);
        let lines = SectionLinesTopology::new(self.section);
        let surfaces = SectionSurfacesTopology::new(self.section);
        (0..self.section.nb_unique_vertices())
            .into_par_iter()
            .all(|uv| {
                self.unique_vertex_is_not_linked_to_any_component(uv)
                    .is_none()
                    && self.unique_vertex_linking_issues(uv).is_empty()
                    && corners.corner_topology_is_valid(uv)
                    && lines.line_topology_is_valid(uv)
                    && surfaces.surface_topology_is_valid(uv)
            })
    }

    /// A unique vertex carrying no CMV at all is dangling.
    pub fn unique_vertex_is_not_linked_to_any_component(
        &self,
        unique_vertex_id: usize,
    ) -> Option<String> {
        self.section
            .component_mesh_vertices(unique_vertex_id)
            .is_empty()
            .then(|| {
                format!("unique vertex {unique_vertex_id} is not linked to any component mesh vertex")
            })
    }

    fn unique_vertex_linking_issues(&self, unique_vertex_id: usize) -> Vec<String> {
        let mut messages = Vec::new();
        for &cmv in self.section.component_mesh_vertices(unique_vertex_id) {
            if !self.section.cmv_exists(cmv) {
                messages.push(format!(
                    "unique vertex {unique_vertex_id} is linked to {cmv}, which does not exist in the component mesh"
                ));
            } else if self.section.unique_vertex(cmv) != Some(unique_vertex_id) {
                messages.push(format!(
                    "unique vertex {unique_vertex_id} is linked to {cmv}, which resolves to another unique vertex"
                ));
            }
        }
        messages
    }

    fn unlinked_meshed_components(&self) -> Vec<ComponentId> {
        let components = self
            .section
            .corners()
            .chain(self.section.lines())
            .chain(self.section.surfaces());
        let mut unlinked = Vec::new();
        for component in components {
            let Some(mesh) = self.section.mesh(component) else {
                continue;
            };
            if mesh.is_empty() {
                continue;
            }
            let linked = (0..mesh.nb_vertices()).any(|vertex| {
                self.section
                    .unique_vertex(ComponentMeshVertex::new(component, vertex))
                    .is_some()
            });
            if !linked {
                unlinked.push(component);
            }
        }
        unlinked
    }

    /// Runs every check and aggregates the issues.
    pub fn inspect_section_topology(&self) -> SectionTopologyInspectionResult {
        log::debug!(
            "inspecting section topology: {} unique vertices",
            self.section.nb_unique_vertices()
        );
        let mut result = SectionTopologyInspectionResult {
            corners: SectionCornersTopology::new(self.section).inspect_corners(),
            lines: SectionLinesTopology::new(self.section).inspect_lines(),
            surfaces: SectionSurfacesTopology::new(self.section).inspect_surfaces(),
            ..Default::default()
        };
        for component in self.unlinked_meshed_components() {
            result.meshed_components_not_linked_to_a_unique_vertex.add_issue(
                component,
                format!("component {component} is meshed but none of its vertices is linked to a unique vertex"),
            );
        }
        let linking = (0..self.section.nb_unique_vertices())
            .into_par_iter()
            .fold(VertexLinkingBuffers::default, |mut acc, uv| {
                if let Some(message) = self.unique_vertex_is_not_linked_to_any_component(uv) {
                    acc.not_linked.push((uv, message));
                }
                for &cmv in self.section.component_mesh_vertices(uv) {
                    if !self.section.cmv_exists(cmv) {
                        acc.inexistant.push((
                            uv,
                            format!(
                                "unique vertex {uv} is linked to {cmv}, which does not exist in the component mesh"
                            ),
                        ));
                    } else if self.section.unique_vertex(cmv) != Some(uv) {
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
            log::warn!("section topology inspection found {nb_issues} issues");
        }
        result
    }
}

/// Convenience entry point over [`SectionTopologyInspector`].
pub fn inspect_section_topology(section: &Section) -> SectionTopologyInspectionResult {
    SectionTopologyInspector::new(section).inspect_section_topology()
}
