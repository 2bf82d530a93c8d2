//! Line topology rules for `Section` models.
//!
//! In 2D, surfaces play the embedding role blocks play in 3D: a line either
//! borders surfaces or runs through their interior, and embedded lines may
//! not also bound anything.

use std::fmt;

use rayon::prelude::*;

use crate::inspect::helpers::{components_of, unlinked_component_vertices};
use crate::inspect::issues::{InspectionIssues, InspectionIssuesMap};
use crate::model::{ComponentId, ComponentKind, Section};

#[derive(Clone, Debug, serde::Serialize)]
pub struct SectionLinesInspectionResult {
    pub lines_not_meshed: InspectionIssues<ComponentId>,
    pub lines_not_linked_to_a_unique_vertex: InspectionIssuesMap<u32>,
    pub unique_vertices_linked_to_not_internal_nor_boundary_line: InspectionIssues<usize>,
    pub unique_vertices_linked_to_a_line_with_invalid_embeddings: InspectionIssues<usize>,
    pub unique_vertices_linked_to_a_single_and_invalid_line: InspectionIssues<usize>,
    pub unique_vertices_linked_to_several_lines_but_not_linked_to_a_corner: InspectionIssues<usize>,
}

impl Default for SectionLinesInspectionResult {
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

impl SectionLinesInspectionResult {
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

impl fmt::Display for SectionLinesInspectionResult {
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
pub struct SectionLinesTopology<'a> {
    section: &'a Section,
}

impl<'a> SectionLinesTopology<'a> {
    pub fn new(section: &'a Section) -> Self {
        Self { section }
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

    pub fn vertex_is_part_of_not_boundary_nor_internal_line(
        &self,
        unique_vertex_id: usize,
    ) -> Option<String> {
        let lines = self
            .section
            .component_mesh_vertices_of_kind(unique_vertex_id, ComponentKind::Line);
        for line in components_of(&lines) {
            if self.section.nb_embeddings(line) < 1 && self.section.nb_incidences(line) < 1 {
                return Some(format!(
                    "unique vertex {unique_vertex_id} is part of line {line}, which is neither internal nor boundary of any component"
                ));
            }
        }
        None
    }

    /// An embedded line may be embedded exactly once, bound nothing, and
    /// must share its vertices with the embedding surface when that surface
    /// is meshed.
    pub fn vertex_is_part_of_line_with_invalid_embeddings(
        &self,
        unique_vertex_id: usize,
    ) -> Option<String> {
        let lines = self
            .section
            .component_mesh_vertices_of_kind(unique_vertex_id, ComponentKind::Line);
        let cmvs = self.section.component_mesh_vertices(unique_vertex_id);
        for line in components_of(&lines) {
            let nb_embeddings = self.section.nb_embeddings(line);
            if nb_embeddings > 1 {
                return Some(format!(
                    "unique vertex {unique_vertex_id} is part of line {line}, which has several embeddings"
                ));
            }
            if nb_embeddings == 1 && self.section.nb_incidences(line) > 0 {
                return Some(format!(
                    "unique vertex {unique_vertex_id} is part of line {line}, which is both internal and boundary of components"
                ));
            }
            if self.section.surfaces_are_meshed() {
                for embedding in self.section.embeddings(line) {
                    if !cmvs.iter().any(|cmv| cmv.component == embedding) {
                        return Some(format!(
                            "unique vertex {unique_vertex_id} is part of line {line}, internal to surface {embedding}, but no mesh vertex of that surface is linked to it"
                        ));
                    }
                }
            }
        }
        None
    }

    /// Exactly one line at the vertex: its surface relations must describe
    /// a valid interior or border position.
    pub fn vertex_is_part_of_invalid_unique_line(&self, unique_vertex_id: usize) -> Option<String> {
        let lines = components_of(
            &self
                .section
                .component_mesh_vertices_of_kind(unique_vertex_id, ComponentKind::Line),
        );
        if lines.len() != 1 {
            return None;
        }
        let line = lines[0];
        let surfaces = components_of(
            &self
                .section
                .component_mesh_vertices_of_kind(unique_vertex_id, ComponentKind::Surface),
        );
        if surfaces.len() > 2 {
            return Some(format!(
                "unique vertex {unique_vertex_id} is part of only line {line} but of more than two surfaces"
            ));
        }
        if self.section.nb_embeddings(line) > 0 {
            if self.section.surfaces_are_meshed()
                && !(surfaces.len() == 1 && self.section.is_internal(line, surfaces[0]))
            {
                return Some(format!(
                    "unique vertex {unique_vertex_id} is part of line {line}, which is internal to a surface, but the line is not internal to exactly one surface there"
                ));
            }
        } else {
            for surface in surfaces {
                if !self.section.is_boundary(line, surface) {
                    return Some(format!(
                        "unique vertex {unique_vertex_id} is part of line {line} and surface {surface}, but the line is not boundary of the surface"
                    ));
                }
            }
        }
        None
    }

    /// Several lines meet at the vertex: a corner is required there.
    pub fn vertex_has_lines_but_is_not_a_corner(&self, unique_vertex_id: usize) -> Option<String> {
        let lines = components_of(
            &self
                .section
                .component_mesh_vertices_of_kind(unique_vertex_id, ComponentKind::Line),
        );
        if lines.len() > 1
            && self
                .section
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
    pub fn inspect_lines(&self) -> SectionLinesInspectionResult {
        let mut result = SectionLinesInspectionResult::default();
        for line in self.section.lines() {
            match self.section.mesh(line) {
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
                        unlinked_component_vertices(line, mesh, |cmv| {
                            self.section.unique_vertex(cmv)
                        }),
                    );
                }
            }
        }
        let per_vertex = (0..self.section.nb_unique_vertices())
            .into_par_iter()
            .fold(SectionLinesInspectionResult::default, |mut acc, uv| {
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
            .reduce(SectionLinesInspectionResult::default, |mut a, b| {
                a.merge(b);
                a
            });
        result.merge(per_vertex);
        result
    }
}
