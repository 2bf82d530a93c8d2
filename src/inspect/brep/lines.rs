//! Line topology rules for `BRep` models.
//!
//! Lines must sit on the border of surfaces or run through the interior of
//! surfaces or blocks; a vertex carried by several lines must also carry a
//! corner (lines only meet at corners).

use std::fmt;

use rayon::prelude::*;

use crate::inspect::helpers::{components_of, unlinked_component_vertices};
use crate::inspect::issues::{InspectionIssues, InspectionIssuesMap};
use crate::model::{BRep, ComponentId, ComponentKind};

/// All line-related issue categories of one inspection run.
#[derive(Clone, Debug, serde::Serialize)]
pub struct BRepLinesInspectionResult {
    pub lines_not_meshed: InspectionIssues<ComponentId>,
    pub lines_not_linked_to_a_unique_vertex: InspectionIssuesMap<u32>,
    pub unique_vertices_linked_to_not_internal_nor_boundary_line: InspectionIssues<usize>,
    pub unique_vertices_linked_to_a_line_with_invalid_embeddings: InspectionIssues<usize>,
    pub unique_vertices_linked_to_a_single_and_invalid_line: InspectionIssues<usize>,
    pub unique_vertices_linked_to_several_lines_but_not_linked_to_a_corner: InspectionIssues<usize>,
}

impl Default for BRepLinesInspectionResult {
    fn default() -> Self {
        Self {
            lines_not_meshed: InspectionIssues::new("Lines without mesh"),
            lines_not_linked_to_a_unique_vertex: InspectionIssuesMap::new(
                "Lines with mesh vertices not linked to a unique vertex",
            ),
            unique_vertices_linked_to_not_internal_nor_boundary_line: InspectionIssues::new(
                "Unique vertices linked to a line which is neither internal nor boundary",
            ),
            unique_vertices_linked_to_a_line_with_invalid_embeddings: InspectionIssues::new(
                "Unique vertices linked to a line with invalid embeddings",
            ),
            unique_vertices_linked_to_a_single_and_invalid_line: InspectionIssues::new(
                "Unique vertices linked to a single line with invalid relations",
            ),
            unique_vertices_linked_to_several_lines_but_not_linked_to_a_corner:
                InspectionIssues::new(
                    "Unique vertices linked to several lines but no corner",
                ),
        }
    }
}

impl BRepLinesInspectionResult {
    pub fn nb_issues(&self) -> usize {
        self.lines_not_meshed.nb_issues()
            + self.lines_not_linked_to_a_unique_vertex.nb_issues()
            + self
                .unique_vertices_linked_to_not_internal_nor_boundary_line
                .nb_issues()
            + self
                .unique_vertices_linked_to_a_line_with_invalid_embeddings
                .nb_issues()
            + self
                .unique_vertices_linked_to_a_single_and_invalid_line
                .nb_issues()
            + self
                .unique_vertices_linked_to_several_lines_but_not_linked_to_a_corner
                .nb_issues()
    }

    pub(crate) fn merge(&mut self, other: Self) {
        self.lines_not_meshed.append(other.lines_not_meshed);
        self.lines_not_linked_to_a_unique_vertex
            .append(other.lines_not_linked_to_a_unique_vertex);
        self.unique_vertices_linked_to_not_internal_nor_boundary_line
            .append(other.unique_vertices_linked_to_not_internal_nor_boundary_line);
        self.unique_vertices_linked_to_a_line_with_invalid_embeddings
            .append(other.unique_vertices_linked_to_a_line_with_invalid_embeddings);
        self.unique_vertices_linked_to_a_single_and_invalid_line
            .append(other.unique_vertices_linked_to_a_single_and_invalid_line);
        self.unique_vertices_linked_to_several_lines_but_not_linked_to_a_corner
            .append(other.unique_vertices_linked_to_several_lines_but_not_linked_to_a_corner);
    }
}

impl fmt::Display for BRepLinesInspectionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.lines_not_meshed)?;
        writeln!(f, "{}", self.lines_not_linked_to_a_unique_vertex)?;
        writeln!(
            f,
            "{}",
            self.unique_vertices_linked_to_not_internal_nor_boundary_line
        )?;
        writeln!(
            f,
            "{}",
            self.unique_vertices_linked_to_a_line_with_invalid_embeddings
        )?;
        writeln!(
            f,
            "{}",
            self.unique_vertices_linked_to_a_single_and_invalid_line
        )?;
        write!(
            f,
            "{}",
            self.unique_vertices_linked_to_several_lines_but_not_linked_to_a_corner
        )
    }
}

/// Line rule set, evaluated per unique vertex.
pub struct BRepLinesTopology<'a> {
    brep: &'a BRep,
}

impl<'a> BRepLinesTopology<'a> {
    pub fn new(brep: &'a BRep) -> Self {
        Self { brep }
    }

    /// Whether every line rule holds at `unique_vertex_id`.
    pub fn line_topology_is_valid(&self, unique_vertex_id: usize) -> bool {
        self.vertex_is_part_of_not_boundary_nor_internal_line(unique_vertex_id)
            .is_none()
            && self
                .vertex_is_part_of_line_with_invalid_embeddings(unique_vertex_id)
                .is_none()
            && self
                .vertex_is_part_of_invalid_unique_line(unique_vertex_id)
                .is_none()
            && self
                .vertex_has_lines_but_is_not_a_corner(unique_vertex_id)
                .is_none()
    }

    /// A line at the vertex is neither embedded anywhere nor a boundary of
    /// anything.
    pub fn vertex_is_part_of_not_boundary_nor_internal_line(
        &self,
        unique_vertex_id: usize,
    ) -> Option<String> {
        let lines = self
            .brep
            .component_mesh_vertices_of_kind(unique_vertex_id, ComponentKind::Line);
        for line in components_of(&lines) {
            if self.brep.nb_embeddings(line) < 1 && self.brep.nb_incidences(line) < 1 {
                return Some(format!(
                    "unique vertex {unique_vertex_id} is part of line {line}, which is neither internal nor boundary of any component"
                ));
            }
        }
        None
    }

    /// An embedding of a line at the vertex is inconsistent: the line is
    /// both boundary and internal to the same component, or the embedding
    /// component carries no mesh vertex at this unique vertex.
    pub fn vertex_is_part_of_line_with_invalid_embeddings(
        &self,
        unique_vertex_id: usize,
    ) -> Option<String> {
        let lines = self
            .brep
            .component_mesh_vertices_of_kind(unique_vertex_id, ComponentKind::Line);
        let cmvs = self.brep.component_mesh_vertices(unique_vertex_id);
        for line in components_of(&lines) {
            for embedding in self.brep.embeddings(line) {
                if self.brep.is_boundary(line, embedding) {
                    return Some(format!(
                        "unique vertex {unique_vertex_id} is part of line {line}, which is both internal and boundary of component {embedding}"
                    ));
                }
                if self.brep.kind_of(embedding) == ComponentKind::Block
                    && !self.brep.blocks_are_meshed()
                {
                    continue;
                }
                if !cmvs.iter().any(|cmv| cmv.component == embedding) {
                    return Some(format!(
                        "unique vertex {unique_vertex_id} is part of line {line}, internal to component {embedding}, but no mesh vertex of that component is linked to it"
                    ));
                }
            }
        }
        None
    }

    /// Exactly one line at the vertex: its surface/block relations must
    /// describe a valid interior or border position.
    pub fn vertex_is_part_of_invalid_unique_line(&self, unique_vertex_id: usize) -> Option<String> {
        let lines = components_of(
            &self
                .brep
                .component_mesh_vertices_of_kind(unique_vertex_id, ComponentKind::Line),
        );
        if lines.len() != 1 {
            return None;
        }
        let line = lines[0];
        let surfaces = components_of(
            &self
                .brep
                .component_mesh_vertices_of_kind(unique_vertex_id, ComponentKind::Surface),
        );
        match surfaces.len() {
            1 => {
                let surface = surfaces[0];
                if !self.brep.is_internal(line, surface)
                    && !(self.brep.nb_embeddings(surface) > 0
                        && self.brep.is_boundary(line, surface))
                {
                    return Some(format!(
                        "unique vertex {unique_vertex_id} is part of only line {line} and only surface {surface}, but the line is neither internal nor boundary of the surface"
                    ));
                }
            }
            0 => {
                if self.brep.blocks_are_meshed() {
                    let blocks = components_of(
                        &self
                            .brep
                            .component_mesh_vertices_of_kind(unique_vertex_id, ComponentKind::Block),
                    );
                    if !(blocks.len() == 1 && self.brep.is_internal(line, blocks[0])) {
                        return Some(format!(
                            "unique vertex {unique_vertex_id} is part of only line {line} and no surface, but the line is not internal to exactly one block"
                        ));
                    }
                }
            }
            _ => {
                for surface in surfaces {
                    if !self.brep.is_boundary(line, surface)
                        && !self.brep.is_internal(line, surface)
                    {
                        return Some(format!(
                            "unique vertex {unique_vertex_id} is part of only line {line}, which is neither internal nor boundary of surface {surface}"
                        ));
                    }
                }
            }
        }
        None
    }

    /// Several lines meet at the vertex: a corner is required there.
    pub fn vertex_has_lines_but_is_not_a_corner(&self, unique_vertex_id: usize) -> Option<String> {
        let lines = components_of(
            &self
                .brep
                .component_mesh_vertices_of_kind(unique_vertex_id, ComponentKind::Line),
        );
        if lines.len() > 1
            && self
                .brep
                .component_mesh_vertices_of_kind(unique_vertex_id, ComponentKind::Corner)
                .is_empty()
        {
            return Some(format!(
                "unique vertex {unique_vertex_id} is part of several lines but no corner"
            ));
        }
        None
    }

    /// Runs every line check over all components and unique vertices.
    pub fn inspect_lines(&self) -> BRepLinesInspectionResult {
        let mut result = BRepLinesInspectionResult::default();
        for line in self.brep.lines() {
            match self.brep.mesh(line) {
                None => result
                    .lines_not_meshed
                    .add_issue(line, format!("line {line} is not meshed")),
                Some(mesh) => {
                    if mesh.is_empty() {
                        result
                            .lines_not_meshed
                            .add_issue(line, format!("line {line} is not meshed"));
                    }
                    result.lines_not_linked_to_a_unique_vertex.add_issues(
                        line,
                        unlinked_component_vertices(line, mesh, |cmv| self.brep.unique_vertex(cmv)),
                    );
                }
            }
        }
        let per_vertex = (0..self.brep.nb_unique_vertices())
            .into_par_iter()
            .fold(BRepLinesInspectionResult::default, |mut acc, uv| {
                if let Some(message) = self.vertex_is_part_of_not_boundary_nor_internal_line(uv) {
                    acc.unique_vertices_linked_to_not_internal_nor_boundary_line
                        .add_issue(uv, message);
                }
                if let Some(message) = self.vertex_is_part_of_line_with_invalid_embeddings(uv) {
                    acc.unique_vertices_linked_to_a_line_with_invalid_embeddings
                        .add_issue(uv, message);
                }
                if let Some(message) = self.vertex_is_part_of_invalid_unique_line(uv) {
                    acc.unique_vertices_linked_to_a_single_and_invalid_line
                        .add_issue(uv, message);
                }
                if let Some(message) = self.vertex_has_lines_but_is_not_a_corner(uv) {
                    acc.unique_vertices_linked_to_several_lines_but_not_linked_to_a_corner
                        .add_issue(uv, message);
                }
                acc
            })
            .reduce(BRepLinesInspectionResult::default, |mut a, b| {
                a.merge(b);
                a
            });
        result.merge(per_vertex);
        result
    }
}
