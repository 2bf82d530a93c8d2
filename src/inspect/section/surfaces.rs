//! Surface topology rules for `Section` models.
//!
//! Where two surfaces meet a line must separate them, and a vertex shared
//! between a line and a meshed surface must lie on the surface mesh border.

use std::fmt;

use rayon::prelude::*;

use crate::inspect::helpers::{components_of, unlinked_component_vertices};
use crate::inspect::issues::{InspectionIssues, InspectionIssuesMap};
use crate::model::{ComponentId, ComponentKind, Section};

#[derive(Clone, Debug, serde::Serialize)]
pub struct SectionSurfacesInspectionResult {
    pub surfaces_not_meshed: InspectionIssues<ComponentId>,
    pub surfaces_not_linked_to_a_unique_vertex: InspectionIssuesMap<u32>,
    pub unique_vertices_linked_to_several_surfaces_with_no_line_in_between:
        InspectionIssues<usize>,
    pub unique_vertices_linked_to_a_line_and_not_on_a_surface_border: InspectionIssues<usize>,
}

impl Default for SectionSurfacesInspectionResult {
    fn default() -> Self {
        Self {
            surfaces_not_meshed: InspectionIssues::new("Surfaces without mesh"),
            surfaces_not_linked_to_a_unique_vertex: InspectionIssuesMap::new(
                "Surfaces with mesh vertices not linked to a unique vertex",
            ),
            unique_vertices_linked_to_several_surfaces_with_no_line_in_between:
                InspectionIssues::new(
                    "Unique vertices shared by two surfaces with no line in between",
                ),
            unique_vertices_linked_to_a_line_and_not_on_a_surface_border: InspectionIssues::new(
                "Unique vertices linked to a line but not on the border of an incident surface",
            ),
        }
    }
}

impl SectionSurfacesInspectionResult {
    pub fn nb_issues(&self) -> usize {
        self.surfaces_not_meshed.nb_issues()
            + self.surfaces_not_linked_to_a_unique_vertex.nb_issues()
            + self
                .unique_vertices_linked_to_several_surfaces_with_no_line_in_between
                .nb_issues()
            + self
                .unique_vertices_linked_to_a_line_and_not_on_a_surface_border
                .nb_issues()
    }

    pub(crate) fn merge(&mut self, other: Self) {
        self.surfaces_not_meshed.append(other.surfaces_not_meshed);
        self.surfaces_not_linked_to_a_unique_vertex
            .append(other.surfaces_not_linked_to_a_unique_vertex);
        self.unique_vertices_linked_to_several_surfaces_with_no_line_in_between
            .append(other.unique_vertices_linked_to_several_surfaces_with_no_line_in_between);
        self.unique_vertices_linked_to_a_line_and_not_on_a_surface_border
            .append(other.unique_vertices_linked_to_a_line_and_not_on_a_surface_border);
    }
}

impl fmt::Display for SectionSurfacesInspectionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.surfaces_not_meshed)?;
        writeln!(f, "{}", self.surfaces_not_linked_to_a_unique_vertex)?;
        writeln!(
            f,
            "{}",
            self.unique_vertices_linked_to_several_surfaces_with_no_line_in_between
        )?;
        write!(
            f,
            "{}",
            self.unique_vertices_linked_to_a_line_and_not_on_a_surface_border
        )
    }
}

/// Surface rule set, evaluated per unique vertex.
pub struct SectionSurfacesTopology<'a> {
    section: &'a Section,
}

impl<'a> SectionSurfacesTopology<'a> {
    pub fn new(section: &'a Section) -> Self {
        Self { section }
    }

    /// Whether every surface rule holds at `unique_vertex_id`.
    pub fn surface_topology_is_valid(&self, unique_vertex_id: usize) -> bool {
        self.vertex_is_part_of_two_surfaces_with_no_line(unique_vertex_id)
            .is_none()
            && self
                .vertex_is_part_of_line_and_not_on_surface_border(unique_vertex_id)
                .is_none()
    }

    /// Exactly two surfaces at the vertex: some line bounding both must run
    /// through it.
    pub fn vertex_is_part_of_two_surfaces_with_no_line(
        &self,
        unique_vertex_id: usize,
    ) -> Option<String> {
        let surfaces = components_of(
            &self
                .section
                .component_mesh_vertices_of_kind(unique_vertex_id, ComponentKind::Surface),
        );
        if surfaces.len() != 2 {
            return None;
        }
        let lines = self
            .section
            .component_mesh_vertices_of_kind(unique_vertex_id, ComponentKind::Line);
        for line in components_of(&lines) {
            if self.section.is_boundary(line, surfaces[0])
                && self.section.is_boundary(line, surfaces[1])
            {
                return None;
            }
        }
        Some(format!(
            "unique vertex {unique_vertex_id} is part of surfaces {} and {}, but no line boundary of both surfaces is linked to it",
            surfaces[0], surfaces[1]
        ))
    }

    /// A vertex shared between a line and a meshed surface must lie on the
    /// surface mesh border.
    pub fn vertex_is_part_of_line_and_not_on_surface_border(
        &self,
        unique_vertex_id: usize,
    ) -> Option<String> {
        if !self.section.surfaces_are_meshed() {
            return None;
        }
        if self
            .section
            .component_mesh_vertices_of_kind(unique_vertex_id, ComponentKind::Line)
            .is_empty()
        {
            return None;
        }
        for surface_cmv in self
            .section
            .component_mesh_vertices_of_kind(unique_vertex_id, ComponentKind::Surface)
        {
            let Some(mesh) = self.section.mesh(surface_cmv.component) else {
                continue;
            };
            if !mesh.is_vertex_on_border(surface_cmv.vertex) {
                return Some(format!(
                    "unique vertex {unique_vertex_id} is part of a line and surface {}, but mesh vertex {} is not on the surface border",
                    surface_cmv.component, surface_cmv.vertex
                ));
            }
        }
        None
    }

    /// Runs every surface check over all components and unique vertices.
    pub fn inspect_surfaces(&self) -> SectionSurfacesInspectionResult {
        let mut result = SectionSurfacesInspectionResult::default();
        for surface in self.section.surfaces() {
            match self.section.mesh(surface) {
                None => result
                    .surfaces_not_meshed
                    .add_issue(surface, format!("surface {surface} is not meshed")),
                Some(mesh) => {
                    if mesh.is_empty() {
                        result
                            .surfaces_not_meshed
                            .add_issue(surface, format!("surface {surface} is not meshed"));
                    }
                    result.surfaces_not_linked_to_a_unique_vertex.add_issues(
                        surface,
                        unlinked_component_vertices(surface, mesh, |cmv| {
                            self.section.unique_vertex(cmv)
                        }),
                    );
                }
            }
        }
        let per_vertex = (0..self.section.nb_unique_vertices())
            .into_par_iter()
            .fold(SectionSurfacesInspectionResult::default, |mut acc, uv| {
                if let Some(message) = self.vertex_is_part_of_two_surfaces_with_no_line(uv) {
                    acc.unique_vertices_linked_to_several_surfaces_with_no_line_in_between
                        .add_issue(uv, message);
                }
                if let Some(message) = self.vertex_is_part_of_line_and_not_on_surface_border(uv) {
                    acc.unique_vertices_linked_to_a_line_and_not_on_a_surface_border
                        .add_issue(uv, message);
                }
                acc
            })
            .reduce(SectionSurfacesInspectionResult::default, |mut a, b| {
                a.merge(b);
                a
            });
        result.merge(per_vertex);
        result
    }
}
