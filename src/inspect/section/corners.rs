//! Corner topology rules for `Section` models.
//!
//! Same vertex rules as in 3D: one corner per unique vertex, one embedding
//! at most, and every line through the vertex bounded by the corner.

use std::fmt;

use rayon::prelude::*;

use crate::inspect::helpers::unlinked_component_vertices;
use crate::inspect::issues::{InspectionIssues, InspectionIssuesMap};
use crate::model::{ComponentId, ComponentKind, Section};

#[derive(Clone, Debug, serde::Serialize)]
pub struct SectionCornersInspectionResult {
    pub corners_not_meshed: InspectionIssues<ComponentId>,
    pub corners_not_linked_to_a_unique_vertex: InspectionIssuesMap<u32>,
    pub unique_vertices_linked_to_multiple_corners: InspectionIssues<usize>,
    pub unique_vertices_linked_to_multiple_internals_corner: InspectionIssues<usize>,
    pub unique_vertices_linked_to_not_internal_nor_boundary_corner: InspectionIssues<usize>,
    pub unique_vertices_linked_to_not_boundary_line_corner: InspectionIssues<usize>,
}

impl Default for SectionCornersInspectionResult {
    fn default() -> Self {
        Self {
            corners_not_meshed: InspectionIssues::new("Corners without mesh"),
            corners_not_linked_to_a_unique_vertex: InspectionIssuesMap::new(
                "Corners with mesh vertices not linked to a unique vertex",
            ),
            unique_vertices_linked_to_multiple_corners: InspectionIssues::new(
                "Unique vertices linked to multiple corners",
            ),
            unique_vertices_linked_to_multiple_internals_corner: InspectionIssues::new(
                "Unique vertices linked to a corner with multiple embeddings",
            ),
            unique_vertices_linked_to_not_internal_nor_boundary_corner: InspectionIssues::new(
                "Unique vertices linked to an isolated corner (neither internal nor boundary)",
            ),
            unique_vertices_linked_to_not_boundary_line_corner: InspectionIssues::new(
                "Unique vertices linked to a corner part of a line but not boundary of it",
            ),
        }
    }
}

impl SectionCornersInspectionResult {
    pub fn nb_issues(&self) -> usize {
        self.corners_not_meshed.nb_issues()
            + self.corners_not_linked_to_a_unique_vertex.nb_issues()
            + self.unique_vertices_linked_to_multiple_corners.nb_issues()
            + self
                .unique_vertices_linked_to_multiple_internals_corner
                .nb_issues()
            + self
                .unique_vertices_linked_to_not_internal_nor_boundary_corner
                .nb_issues()
            + self
                .unique_vertices_linked_to_not_boundary_line_corner
                .nb_issues()
    }

    pub(crate) fn merge(&mut self, other: Self) {
        self.corners_not_meshed.append(other.corners_not_meshed);
        self.corners_not_linked_to_a_unique_vertex
            .append(other.corners_not_linked_to_a_unique_vertex);
        self.unique_vertices_linked_to_multiple_corners
            .append(other.unique_vertices_linked_to_multiple_corners);
        self.unique_vertices_linked_to_multiple_internals_corner
            .append(other.unique_vertices_linked_to_multiple_internals_corner);
        self.unique_vertices_linked_to_not_internal_nor_boundary_corner
            .append(other.unique_vertices_linked_to_not_internal_nor_boundary_corner);
        self.unique_vertices_linked_to_not_boundary_line_corner
            .append(other.unique_vertices_linked_to_not_boundary_line_corner);
    }
}

impl fmt::Display for SectionCornersInspectionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.corners_not_meshed)?;
        writeln!(f, "{}", self.corners_not_linked_to_a_unique_vertex)?;
        writeln!(f, "{}", self.unique_vertices_linked_to_multiple_corners)?;
        writeln!(
            f,
            "{}",
            self.unique_vertices_linked_to_multiple_internals_corner
        )?;
        writeln!(
            f,
            "{}",
            self.unique_vertices_linked_to_not_internal_nor_boundary_corner
        )?;
        write!(
            f,
            "{}",
            self.unique_vertices_linked_to_not_boundary_line_corner
        )
    }
}

/// Corner rule set, evaluated per unique vertex.
pub struct SectionCornersTopology<'a> {
    section: &'a Section,
}

impl<'a> SectionCornersTopology<'a> {
    pub fn new(section: &'a Section) -> Self {
        Self { section }
    }

    pub fn corner_topology_is_valid(&self, unique_vertex_id: usize) -> bool {
        let corners = self
            .section
            .component_mesh_vertices_of_kind(unique_vertex_id, ComponentKind::Corner);
        if corners.is_empty() {
            return true;
        }
        if corners.len() != 1 {
            return false;
        }
        let corner = corners[0].component;
        let nb_embeddings = self.section.nb_embeddings(corner);
        if nb_embeddings > 1 {
            return false;
        }
        if nb_embeddings == 0 {
            if self.section.nb_incidences(corner) < 1 {
                return false;
            }
        } else if self.section.nb_incidences(corner) > 1 {
            return false;
        }
        self.section
            .component_mesh_vertices_of_kind(unique_vertex_id, ComponentKind::Line)
            .iter()
            .all(|line| self.section.is_boundary(corner, line.component))
    }

    pub fn unique_vertex_has_multiple_corners(&self, unique_vertex_id: usize) -> Option<String> {
        let corners = self
            .section
            .component_mesh_vertices_of_kind(unique_vertex_id, ComponentKind::Corner);
        (corners.len() > 1)
            .then(|| format!("unique vertex {unique_vertex_id} is part of several corners"))
    }

    pub fn corner_has_multiple_embeddings(&self, unique_vertex_id: usize) -> Option<String> {
        let corners = self
            .section
            .component_mesh_vertices_of_kind(unique_vertex_id, ComponentKind::Corner);
        let corner = corners.first()?.component;
        (self.section.nb_embeddings(corner) > 1).then(|| {
            format!(
                "unique vertex {unique_vertex_id} is linked to corner {corner}, which has several embeddings"
            )
        })
    }

    pub fn corner_is_not_internal_nor_boundary(&self, unique_vertex_id: usize) -> Option<String> {
        let corners = self
            .section
            .component_mesh_vertices_of_kind(unique_vertex_id, ComponentKind::Corner);
        let corner = corners.first()?.component;
        (self.section.nb_embeddings(corner) < 1 && self.section.nb_incidences(corner) < 1).then(
            || {
                format!(
                    "unique vertex {unique_vertex_id} is linked to corner {corner}, which is neither internal nor boundary of any component"
                )
            },
        )
    }

    pub fn corner_is_part_of_line_but_not_boundary(
        &self,
        unique_vertex_id: usize,
    ) -> Option<String> {
        let corners = self
            .section
            .component_mesh_vertices_of_kind(unique_vertex_id, ComponentKind::Corner);
        let corner = corners.first()?.component;
        for line in self
            .section
            .component_mesh_vertices_of_kind(unique_vertex_id, ComponentKind::Line)
        {
            if !self.section.is_boundary(corner, line.component) {
                return Some(format!(
                    "unique vertex {unique_vertex_id} is linked to corner {corner}, part of line {}, but not boundary of it",
                    line.component
                ));
            }
        }
        None
    }

    pub fn inspect_corners(&self) -> SectionCornersInspectionResult {
        let mut result = SectionCornersInspectionResult::default();
        for corner in self.section.corners() {
            match self.section.mesh(corner) {
                None => result
                    .corners_not_meshed
                    .add_issue(corner, format!("corner {corner} is not meshed")),
                Some(mesh) => {
                    if mesh.is_empty() {
                        result
                            .corners_not_meshed
                            .add_issue(corner, format!("corner {corner} is not meshed"));
                    }
                    result.corners_not_linked_to_a_unique_vertex.add_issues(
                        corner,
                        unlinked_component_vertices(corner, mesh, |cmv| {
                            self.section.unique_vertex(cmv)
                        }),
                    );
                }
            }
        }
        let per_vertex = (0..self.section.nb_unique_vertices())
            .into_par_iter()
            .fold(SectionCornersInspectionResult::default, |mut acc, uv| {
                if let Some(message) = self.unique_vertex_has_multiple_corners(uv) {
                    acc.unique_vertices_linked_to_multiple_corners
                        .add_issue(uv, message);
                }
                if let Some(message) = self.corner_has_multiple_embeddings(uv) {
                    acc.unique_vertices_linked_to_multiple_internals_corner
                        .add_issue(uv, message);
                }
                if let Some(message) = self.corner_is_not_internal_nor_boundary(uv) {
                    acc.unique_vertices_linked_to_not_internal_nor_boundary_corner
                        .add_issue(uv, message);
                }
                if let Some(message) = self.corner_is_part_of_line_but_not_boundary(uv) {
                    acc.unique_vertices_linked_to_not_boundary_line_corner
                        .add_issue(uv, message);
                }
                acc
            })
            .reduce(SectionCornersInspectionResult::default, |mut a, b| {
                a.merge(b);
                a
            });
        result.merge(per_vertex);
        result
    }
}
