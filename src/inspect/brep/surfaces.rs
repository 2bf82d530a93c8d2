//! Surface topology rules for `BRep` models.
//!
//! Surfaces bound or cross blocks; where several surfaces meet, a line must
//! run along the junction, and a vertex shared with a line must lie on the
//! surface mesh border unless the line cuts through the surface interior.

use std::fmt;

use rayon::prelude::*;

use crate::inspect::helpers::{components_of, unlinked_component_vertices};
use crate::inspect::issues::{InspectionIssues, InspectionIssuesMap};
use crate::model::{BRep, ComponentId, ComponentKind};

/// All surface-related issue categories of one inspection run.
#[derive(Clone, Debug, serde::Serialize)]
pub struct BRepSurfacesInspectionResult {
    pub surfaces_not_meshed: InspectionIssues<ComponentId>,
    pub surfaces_not_linked_to_a_unique_vertex: InspectionIssuesMap<u32>,
    pub unique_vertices_linked_to_not_internal_nor_boundary_surface: InspectionIssues<usize>,
    pub unique_vertices_linked_to_a_surface_with_invalid_embeddings: InspectionIssues<usize>,
    pub unique_vertices_linked_to_a_single_and_invalid_surface: InspectionIssues<usize>,
    pub unique_vertices_linked_to_several_and_invalid_surfaces: InspectionIssues<usize>,
    pub unique_vertices_linked_to_a_line_and_not_on_a_surface_border: InspectionIssues<usize>,
}

impl Default for BRepSurfacesInspectionResult {
    fn default() -> Self {
        Self {
            surfaces_not_meshed: InspectionIssues::new("Surfaces without mesh"),
            surfaces_not_linked_to_a_unique_vertex: InspectionIssuesMap::new(
                "Surfaces with mesh vertices not linked to a unique vertex",
            ),
            unique_vertices_linked_to_not_internal_nor_boundary_surface: InspectionIssues::new(
                "Unique vertices linked to a surface which is neither internal nor boundary",
            ),
            unique_vertices_linked_to_a_surface_with_invalid_embeddings: InspectionIssues::new(
                "Unique vertices linked to a surface with invalid embeddings",
            ),
            unique_vertices_linked_to_a_single_and_invalid_surface: InspectionIssues::new(
                "Unique vertices linked to a single surface with invalid relations",
            ),
            unique_vertices_linked_to_several_and_invalid_surfaces: InspectionIssues::new(
                "Unique vertices linked to several surfaces with invalid junctions",
            ),
            unique_vertices_linked_to_a_line_and_not_on_a_surface_border: InspectionIssues::new(
                "Unique vertices linked to a line but not on the border of an incident surface",
            ),
        }
    }
}

impl BRepSurfacesInspectionResult {
    pub fn nb_issues(&self) -> usize {
        self.surfaces_not_meshed.nb_issues()
            + self.surfaces_not_linked_to_a_unique_vertex.nb_issues()
            + self
                .unique_vertices_linked_to_not_internal_nor_boundary_surface
                .nb_issues()
            + self
                .unique_vertices_linked_to_a_surface_with_invalid_embeddings
                .nb_issues()
            + self
                .unique_vertices_linked_to_a_single_and_invalid_surface
                .nb_issues()
            + self
                .unique_vertices_linked_to_several_and_invalid_surfaces
                .nb_issues()
            + self
                .unique_vertices_linked_to_a_line_and_not_on_a_surface_border
                .nb_issues()
    }

    pub(crate) fn merge(&mut self, other: Self) {
        self.surfaces_not_meshed.append(other.surfaces_not_meshed);
        self.surfaces_not_linked_to_a_unique_vertex
            .append(other.surfaces_not_linked_to_a_unique_vertex);
        self.unique_vertices_linked_to_not_internal_nor_boundary_surface
            .append(other.unique_vertices_linked_to_not_internal_nor_boundary_surface);
        self.unique_vertices_linked_to_a_surface_with_invalid_embeddings
            .append(other.unique_vertices_linked_to_a_surface_with_invalid_embeddings);
        self.unique_vertices_linked_to_a_single_and_invalid_surface
            .append(other.unique_vertices_linked_to_a_single_and_invalid_surface);
        self.unique_vertices_linked_to_several_and_invalid_surfaces
            .append(other.unique_vertices_linked_to_several_and_invalid_surfaces);
        self.unique_vertices_linked_to_a_line_and_not_on_a_surface_border
            .append(other.unique_vertices_linked_to_a_line_and_not_on_a_surface_border);
    }
}

impl fmt::Display for BRepSurfacesInspectionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.surfaces_not_meshed)?;
        writeln!(f, "{}", self.surfaces_not_linked_to_a_unique_vertex)?;
        writeln!(
            f,
            "{}",
            self.unique_vertices_linked_to_not_internal_nor_boundary_surface
        )?;
        writeln!(
            f,
            "{}",
            self.unique_vertices_linked_to_a_surface_with_invalid_embeddings
        )?;
        writeln!(
            f,
            "{}",
            self.unique_vertices_linked_to_a_single_and_invalid_surface
        )?;
        writeln!(
            f,
            "{}",
            self.unique_vertices_linked_to_several_and_invalid_surfaces
        )?;
        write!(
            f,
            "{}",
            self.unique_vertices_linked_to_a_line_and_not_on_a_surface_border
        )
    }
}

/// Surface rule set, evaluated per unique vertex.
pub struct BRepSurfacesTopology<'a> {
    brep: &'a BRep,
}

impl<'a> BRepSurfacesTopology<'a> {
    pub fn new(brep: &'a BRep) -> Self {
        Self { brep }
    }

    /// Whether every surface rule holds at `unique_vertex_id`.
    pub fn surface_topology_is_valid(&self, unique_vertex_id: usize) -> bool {
        self.vertex_is_part_of_not_boundary_nor_internal_surface(unique_vertex_id)
            .is_none()
            && self
                .vertex_is_part_of_surface_with_invalid_embeddings(unique_vertex_id)
                .is_none()
            && self
                .vertex_is_part_of_invalid_unique_surface(unique_vertex_id)
                .is_none()
            && self
                .vertex_is_part_of_invalid_multiple_surfaces(unique_vertex_id)
                .is_none()
            && self
                .vertex_is_part_of_line_and_not_on_surface_border(unique_vertex_id)
                .is_none()
    }

    /// A surface at the vertex is neither embedded anywhere nor a boundary
    /// of anything.
    pub fn vertex_is_part_of_not_boundary_nor_internal_surface(
        &self,
        unique_vertex_id: usize,
    ) -> Option<String> {
        let surfaces = self
            .brep
            .component_mesh_vertices_of_kind(unique_vertex_id, ComponentKind::Surface);
        for surface in components_of(&surfaces) {
            if self.brep.nb_embeddings(surface) < 1 && self.brep.nb_incidences(surface) < 1 {
                return Some(format!(
                    "unique vertex {unique_vertex_id} is part of surface {surface}, which is neither internal nor boundary of any component"
                ));
            }
        }
        None
    }

    /// An embedding of a surface at the vertex is inconsistent: the surface
    /// is both boundary and internal to the same block, or the embedding
    /// block carries no mesh vertex at this unique vertex.
    pub fn vertex_is_part_of_surface_with_invalid_embeddings(
        &self,
        unique_vertex_id: usize,
    ) -> Option<String> {
        let surfaces = self
            .brep
            .component_mesh_vertices_of_kind(unique_vertex_id, ComponentKind::Surface);
        let cmvs = self.brep.component_mesh_vertices(unique_vertex_id);
        for surface in components_of(&surfaces) {
            for embedding in self.brep.embeddings(surface) {
                if self.brep.is_boundary(surface, embedding) {
                    return Some(format!(
                        "unique vertex {unique_vertex_id} is part of surface {surface}, which is both internal and boundary of component {embedding}"
                    ));
                }
                if self.brep.blocks_are_meshed()
                    && !cmvs.iter().any(|cmv| cmv.component == embedding)
                {
                    return Some(format!(
                        "unique vertex {unique_vertex_id} is part of surface {surface}, internal to component {embedding}, but no mesh vertex of that component is linked to it"
                    ));
                }
            }
        }
        None
    }

    /// Exactly one surface at the vertex: its block relations must describe
    /// a valid interior or border position.
    pub fn vertex_is_part_of_invalid_unique_surface(
        &self,
        unique_vertex_id: usize,
    ) -> Option<String> {
        let surfaces = components_of(
            &self
                .brep
                .component_mesh_vertices_of_kind(unique_vertex_id, ComponentKind::Surface),
        );
        if surfaces.len() != 1 {
            return None;
        }
        let surface = surfaces[0];
        let blocks = components_of(
            &self
                .brep
                .component_mesh_vertices_of_kind(unique_vertex_id, ComponentKind::Block),
        );
        if blocks.len() > 2 {
            return Some(format!(
                "unique vertex {unique_vertex_id} is part of only surface {surface} but of more than two blocks"
            ));
        }
        if self.brep.nb_embeddings(surface) > 0 {
            if self.brep.blocks_are_meshed() {
                if blocks.len() != 1 {
                    return Some(format!(
                        "unique vertex {unique_vertex_id} is part of surface {surface}, which is internal to a block, but not part of exactly one block"
                    ));
                }
                if !self.brep.is_internal(surface, blocks[0]) {
                    return Some(format!(
                        "unique vertex {unique_vertex_id} is part of surface {surface} and block {}, but the surface is not internal to the block",
                        blocks[0]
                    ));
                }
            }
        } else {
            for block in blocks {
                if !self.brep.is_boundary(surface, block) {
                    return Some(format!(
                        "unique vertex {unique_vertex_id} is part of surface {surface} and block {block}, but the surface is not boundary of the block"
                    ));
                }
            }
        }
        None
    }

    /// Several surfaces at the vertex: they must meet along lines with
    /// consistent incidences.
    pub fn vertex_is_part_of_invalid_multiple_surfaces(
        &self,
        unique_vertex_id: usize,
    ) -> Option<String> {
        let surfaces = components_of(
            &self
                .brep
                .component_mesh_vertices_of_kind(unique_vertex_id, ComponentKind::Surface),
        );
        if surfaces.len() < 2 {
            return None;
        }
        let line_cmvs = self
            .brep
            .component_mesh_vertices_of_kind(unique_vertex_id, ComponentKind::Line);
        let lines = components_of(&line_cmvs);
        match lines.len() {
            0 => Some(format!(
                "unique vertex {unique_vertex_id} is part of several surfaces but no line"
            )),
            1 => {
                let line = lines[0];
                if !self
                    .brep
                    .component_mesh_vertices_of_kind(unique_vertex_id, ComponentKind::Corner)
                    .is_empty()
                    && line_cmvs.len() < 2
                {
                    return Some(format!(
                        "unique vertex {unique_vertex_id} is a corner shared by several surfaces but only one mesh vertex of line {line} is linked to it"
                    ));
                }
                for surface in surfaces {
                    if !self.brep.is_boundary(line, surface)
                        && !self.brep.is_internal(line, surface)
                    {
                        return Some(format!(
                            "unique vertex {unique_vertex_id} is part of line {line} and surface {surface}, but the line is neither internal nor boundary of the surface"
                        ));
                    }
                }
                None
            }
            _ => {
                for &line in &lines {
                    if self.brep.nb_embeddings(line) < 1
                        && !self.line_bounds_enough_surfaces(line, &surfaces)
                    {
                        return Some(format!(
                            "unique vertex {unique_vertex_id} is part of line {line}, which does not bound enough of the surfaces meeting there"
                        ));
                    }
                }
                None
            }
        }
    }

    /// A non-embedded line at a surface junction must bound at least two of
    /// the surfaces, or a single surface that is itself embedded.
    fn line_bounds_enough_surfaces(&self, line: ComponentId, surfaces: &[ComponentId]) -> bool {
        let bounded: Vec<ComponentId> = surfaces
            .iter()
            .copied()
            .filter(|&surface| self.brep.is_boundary(line, surface))
            .collect();
        match bounded.len() {
            0 => false,
            1 => self.brep.nb_embeddings(bounded[0]) > 0,
            _ => true,
        }
    }

    /// A vertex shared between a line and a surface must lie on the surface
    /// mesh border when the line borders or crosses that surface.
    pub fn vertex_is_part_of_line_and_not_on_surface_border(
        &self,
        unique_vertex_id: usize,
    ) -> Option<String> {
        let line_cmvs = self
            .brep
            .component_mesh_vertices_of_kind(unique_vertex_id, ComponentKind::Line);
        if line_cmvs.is_empty() {
            return None;
        }
        let lines = components_of(&line_cmvs);
        for surface_cmv in self
            .brep
            .component_mesh_vertices_of_kind(unique_vertex_id, ComponentKind::Surface)
        {
            let Some(mesh) = self.brep.mesh(surface_cmv.component) else {
                continue;
            };
            if mesh.is_vertex_on_border(surface_cmv.vertex) {
                continue;
            }
            for &line in &lines {
                if self.brep.is_boundary(line, surface_cmv.component)
                    || self.brep.is_internal(line, surface_cmv.component)
                {
                    return Some(format!(
                        "unique vertex {unique_vertex_id} is part of line {line} and surface {}, but mesh vertex {} is not on the surface border",
                        surface_cmv.component, surface_cmv.vertex
                    ));
                }
            }
        }
        None
    }

    /// Runs every surface check over all components and unique vertices.
    pub fn inspect_surfaces(&self) -> BRepSurfacesInspectionResult {
        let mut result = BRepSurfacesInspectionResult::default();
        for surface in self.brep.surfaces() {
            match self.brep.mesh(surface) {
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
                            self.brep.unique_vertex(cmv)
                        }),
                    );
                }
            }
        }
        let per_vertex = (0..self.brep.nb_unique_vertices())
            .into_par_iter()
            .fold(BRepSurfacesInspectionResult::default, |mut acc, uv| {
                if let Some(message) = self.vertex_is_part_of_not_boundary_nor_internal_surface(uv)
                {
                    acc.unique_vertices_linked_to_not_internal_nor_boundary_surface
                        .add_issue(uv, message);
                }
                if let Some(message) = self.vertex_is_part_of_surface_with_invalid_embeddings(uv) {
                    acc.unique_vertices_linked_to_a_surface_with_invalid_embeddings
                        .add_issue(uv, message);
                }
                if let Some(message) = self.vertex_is_part_of_invalid_unique_surface(uv) {
                    acc.unique_vertices_linked_to_a_single_and_invalid_surface
                        .add_issue(uv, message);
                }
                if let Some(message) = self.vertex_is_part_of_invalid_multiple_surfaces(uv) {
                    acc.unique_vertices_linked_to_several_and_invalid_surfaces
                        .add_issue(uv, message);
                }
                if let Some(message) = self.vertex_is_part_of_line_and_not_on_surface_border(uv) {
                    acc.unique_vertices_linked_to_a_line_and_not_on_a_surface_border
                        .add_issue(uv, message);
                }
                acc
            })
            .reduce(BRepSurfacesInspectionResult::default, |mut a, b| {
                a.merge(b);
                a
            });
        result.merge(per_vertex);
        result
    }
}
