//! Corner topology rules for `BRep` models.
//!
//! A unique vertex may carry at most one corner; that corner must be
//! embedded in at most one component, must be a boundary or an embedding of
//! something, and must bound every line passing through the vertex (lines
//! only terminate or branch at corners).

use std::fmt;

use rayon::prelude::*;

use crate::inspect::helpers::unlinked_component_vertices;
use crate::inspect::issues::{InspectionIssues, InspectionIssuesMap};
use crate::model::{BRep, ComponentId, ComponentKind};

/// All corner-related issue categories of one inspection run.
#[derive(Clone, Debug, serde::Serialize)]
pub struct BRepCornersInspectionResult {
    pub corners_not_meshed: InspectionIssues<ComponentId>,
    pub corners_not_linked_to_a_unique_vertex: InspectionIssuesMap<u32>,
    pub unique_vertices_linked_to_multiple_corners: InspectionIssues<usize>,
    pub unique_vertices_linked_to_multiple_internals_corner: InspectionIssues<usize>,
    pub unique_vertices_linked_to_not_internal_nor_boundary_corner: InspectionIssues<usize>,
    pub unique_vertices_linked_to_not_boundary_line_corner: InspectionIssues<usize>,
}

impl Default for BRepCornersInspectionResult {
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

impl BRepCornersInspectionResult {
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

impl fmt::Display for BRepCornersInspectionResult {
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
pub struct BRepCornersTopology<'a> {
    brep: &'a BRep,
}

impl<'a> BRepCornersTopology<'a> {
    pub fn new(brep: &'a BRep) -> Self {
        Self { brep }
    }

    /// Whether every corner rule holds at `unique_vertex_id`.
    pub fn corner_topology_is_valid(&self, unique_vertex_id: usize) -> bool {
        let corners = self
            .brep
            .component_mesh_vertices_of_kind(unique_vertex_id, ComponentKind::Corner);
        if corners.is_empty() {
            return true;
        }
        if corners.len() != 1 {
            return false;
        }
        let corner = corners[0].component;
        let nb_embeddings = self.brep.nb_embeddings(corner);
        if nb_embeddings > 1 {
            return false;
        }
        if nb_embeddings == 0 {
            if self.brep.nb_incidences(corner) < 1 {
                return false;
            }
        } else if self.brep.nb_incidences(corner) > 1 {
            return false;
        }
        self.brep
            .component_mesh_vertices_of_kind(unique_vertex_id, ComponentKind::Line)
            .iter()
            .all(|line| self.brep.is_boundary(corner, line.component))
    }

    pub fn unique_vertex_has_multiple_corners(&self, unique_vertex_id: usize) -> Option<String> {
        let corners = self
            .brep
            .component_mesh_vertices_of_kind(unique_vertex_id, ComponentKind::Corner);
        (corners.len() > 1)
            .then(|| format!("unique vertex {unique_vertex_id} is part of several corners"))
    }

    pub fn corner_has_multiple_embeddings(&self, unique_vertex_id: usize) -> Option<String> {
        let corners = self
            .brep
            .component_mesh_vertices_of_kind(unique_vertex_id, ComponentKind::Corner);
        let corner = corners.first()?.component;
        (self.brep.nb_embeddings(corner) > 1).then(|| {
            format!(
                "unique vertex {unique_vertex_id} is linked to corner {corner}, which has several embeddings"
            )
        })
    }

    pub fn corner_is_not_internal_nor_boundary(&self, unique_vertex_id: usize) -> Option<String> {
        let corners = self
            .brep
            .component_mesh_vertices_of_kind(unique_vertex_id, ComponentKind::Corner);
        let corner = corners.first()?.component;
        (self.brep.nb_embeddings(corner) < 1 && self.brep.nb_incidences(corner) < 1).then(|| {
            format!(
                "unique vertex {unique_vertex_id} is linked to corner {corner}, which is neither internal nor boundary of any component"
            )
        })
    }

    pub fn corner_is_part_of_line_but_not_boundary(
        &self,
        unique_vertex_id: usize,
    ) -> Option<String> {
        let corners = self
            .brep
            .component_mesh_vertices_of_kind(unique_vertex_id, ComponentKind::Corner);
        let corner = corners.first()?.component;
        for line in self
            .brep
            .component_mesh_vertices_of_kind(unique_vertex_id, ComponentKind::Line)
        {
            if !self.brep.is_boundary(corner, line.component) {
                return Some(format!(
                    "unique vertex {unique_vertex_id} is linked to corner {corner}, part of line {}, but not boundary of it",
                    line.component
                ));
            }
        }
        None
    }

    /// Runs every corner check over all components and unique vertices.
    pub fn inspect_corners(&self) -> BRepCornersInspectionResult {
        let mut result = BRepCornersInspectionResult::default();
        for corner in self.brep.corners() {
            match self.brep.mesh(corner) {
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
                        unlinked_component_vertices(corner, mesh, |cmv| self.brep.unique_vertex(cmv)),
                    );
                }
            }
        }
        let per_vertex = (0..self.brep.nb_unique_vertices())
            .into_par_iter()
            .fold(BRepCornersInspectionResult::default, |mut acc, uv| {
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
            .reduce(BRepCornersInspectionResult::default, |mut a, b| {
                a.merge(b);
                a
            });
        result.merge(per_vertex);
        result
    }
}
