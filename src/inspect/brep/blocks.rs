//! Block topology rules for `BRep` models.
//!
//! Two checks run per unique vertex: two blocks sharing a vertex must share
//! a boundary surface there, and the number of mesh vertices each block
//! contributes to the unique vertex must match the count predicted from the
//! surfaces, lines and corners meeting it.

use std::fmt;

use rayon::prelude::*;

use crate::inspect::helpers::{components_of, unlinked_component_vertices};
use crate::inspect::issues::{InspectionIssues, InspectionIssuesMap};
use crate::model::{BRep, ComponentId, ComponentKind};

/// All block-related issue categories of one inspection run.
#[derive(Clone, Debug, serde::Serialize)]
pub struct BRepBlocksInspectionResult {
    pub blocks_not_meshed: InspectionIssues<ComponentId>,
    pub blocks_not_linked_to_a_unique_vertex: InspectionIssuesMap<u32>,
    pub blocks_with_not_closed_boundary_surfaces: InspectionIssuesMap<ComponentId>,
    pub unique_vertices_part_of_two_blocks_and_no_boundary_surface: InspectionIssues<usize>,
    pub unique_vertices_with_incorrect_block_cmvs_count: InspectionIssues<usize>,
    pub unique_vertices_on_an_open_model_shell_border: InspectionIssues<usize>,
}

impl Default for BRepBlocksInspectionResult {
    fn default() -> Self {
        Self {
            blocks_not_meshed: InspectionIssues::new("Blocks without mesh"),
            blocks_not_linked_to_a_unique_vertex: InspectionIssuesMap::new(
                "Blocks with mesh vertices not linked to a unique vertex",
            ),
            blocks_with_not_closed_boundary_surfaces: InspectionIssuesMap::new(
                "Blocks with boundary surfaces which are not closed",
            ),
            unique_vertices_part_of_two_blocks_and_no_boundary_surface: InspectionIssues::new(
                "Unique vertices shared by two blocks with no boundary surface in between",
            ),
            unique_vertices_with_incorrect_block_cmvs_count: InspectionIssues::new(
                "Unique vertices with an unexpected number of block mesh vertices",
            ),
            unique_vertices_on_an_open_model_shell_border: InspectionIssues::new(
                "Unique vertices where the model boundary shell is open",
            ),
        }
    }
}

impl BRepBlocksInspectionResult {
    pub fn nb_issues(&self) -> usize {
        self.blocks_not_meshed.nb_issues()
            + self.blocks_not_linked_to_a_unique_vertex.nb_issues()
            + self.blocks_with_not_closed_boundary_surfaces.nb_issues()
            + self
                .unique_vertices_part_of_two_blocks_and_no_boundary_surface
                .nb_issues()
            + self
                .unique_vertices_with_incorrect_block_cmvs_count
                .nb_issues()
            + self
                .unique_vertices_on_an_open_model_shell_border
                .nb_issues()
    }

    pub(crate) fn merge(&mut self, other: Self) {
        self.blocks_not_meshed.append(other.blocks_not_meshed);
        self.blocks_not_linked_to_a_unique_vertex
            .append(other.blocks_not_linked_to_a_unique_vertex);
        self.blocks_with_not_closed_boundary_surfaces
            .append(other.blocks_with_not_closed_boundary_surfaces);
        self.unique_vertices_part_of_two_blocks_and_no_boundary_surface
            .append(other.unique_vertices_part_of_two_blocks_and_no_boundary_surface);
        self.unique_vertices_with_incorrect_block_cmvs_count
            .append(other.unique_vertices_with_incorrect_block_cmvs_count);
        self.unique_vertices_on_an_open_model_shell_border
            .append(other.unique_vertices_on_an_open_model_shell_border);
    }
}

impl fmt::Display for BRepBlocksInspectionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.blocks_not_meshed)?;
        writeln!(f, "{}", self.blocks_not_linked_to_a_unique_vertex)?;
        writeln!(f, "{}", self.blocks_with_not_closed_boundary_surfaces)?;
        writeln!(
            f,
            "{}",
            self.unique_vertices_part_of_two_blocks_and_no_boundary_surface
        )?;
        writeln!(
            f,
            "{}",
            self.unique_vertices_with_incorrect_block_cmvs_count
        )?;
        write!(f, "{}", self.unique_vertices_on_an_open_model_shell_border)
    }
}

/// Block rule set, evaluated per unique vertex.
pub struct BRepBlocksTopology<'a> {
    brep: &'a BRep,
}

impl<'a> BRepBlocksTopology<'a> {
    pub fn new(brep: &'a BRep) -> Self {
        Self { brep }
    }

    /// Whether every block rule holds at `unique_vertex_id`.
    pub fn block_topology_is_valid(&self, unique_vertex_id: usize) -> bool {
        self.vertex_is_part_of_two_blocks_and_no_boundary_surface(unique_vertex_id)
            .is_none()
            && self
                .vertex_block_cmvs_count_is_incorrect(unique_vertex_id)
                .is_none()
            && self
                .vertex_is_on_open_model_shell_border(unique_vertex_id)
                .is_none()
    }

    /// Exactly two blocks at the vertex: a surface bounding both, or a line
    /// on a surface bounding either, must separate them.
    pub fn vertex_is_part_of_two_blocks_and_no_boundary_surface(
        &self,
        unique_vertex_id: usize,
    ) -> Option<String> {
        let blocks = components_of(
            &self
                .brep
                .component_mesh_vertices_of_kind(unique_vertex_id, ComponentKind::Block),
        );
        if blocks.len() != 2 {
            return None;
        }
        for surface_cmv in self
            .brep
            .component_mesh_vertices_of_kind(unique_vertex_id, ComponentKind::Surface)
        {
            if self.brep.is_boundary(surface_cmv.component, blocks[0])
                && self.brep.is_boundary(surface_cmv.component, blocks[1])
            {
                return None;
            }
        }
        for line_cmv in self
            .brep
            .component_mesh_vertices_of_kind(unique_vertex_id, ComponentKind::Line)
        {
            for surface in self.brep.incidences(line_cmv.component) {
                if self.brep.is_boundary(surface, blocks[0])
                    || self.brep.is_boundary(surface, blocks[1])
                {
                    return None;
                }
            }
        }
        Some(format!(
            "unique vertex {unique_vertex_id} is part of blocks {} and {}, but no surface boundary of both blocks is linked to it",
            blocks[0], blocks[1]
        ))
    }

    /// Each block at the vertex must contribute exactly the number of mesh
    /// vertices predicted from the surfaces, lines and corners meeting it.
    pub fn vertex_block_cmvs_count_is_incorrect(&self, unique_vertex_id: usize) -> Option<String> {
        if !self.brep.blocks_are_meshed() {
            return None;
        }
        let block_cmvs = self
            .brep
            .component_mesh_vertices_of_kind(unique_vertex_id, ComponentKind::Block);
        for block in components_of(&block_cmvs) {
            let nb_block_cmvs = block_cmvs
                .iter()
                .filter(|cmv| cmv.component == block)
                .count() as i64;
            let predicted = self.predicted_block_cmvs_count(unique_vertex_id, block);
            if nb_block_cmvs != predicted {
                return Some(format!(
                    "unique vertex {unique_vertex_id} has {nb_block_cmvs} mesh vertices in block {block} where {predicted} were predicted"
                ));
            }
        }
        None
    }

    /// Predicts how many mesh vertices `block` should contribute to the
    /// unique vertex.
    ///
    /// A block vertex is duplicated once per extra boundary-surface sheet
    /// passing through the unique vertex and once per internal surface
    /// crossing it; lines correct for sheets that merge along them.
    fn predicted_block_cmvs_count(&self, unique_vertex_id: usize, block: ComponentId) -> i64 {
        let mut nb_boundary_surface_cmvs: i64 = 0;
        let mut nb_internal_surface_cmvs: i64 = 0;
        for surface_cmv in self
            .brep
            .component_mesh_vertices_of_kind(unique_vertex_id, ComponentKind::Surface)
        {
            if self.brep.is_boundary(surface_cmv.component, block) {
                nb_boundary_surface_cmvs += 1;
            } else if self.brep.is_internal(surface_cmv.component, block) {
                nb_internal_surface_cmvs += 1;
            }
        }
        let block_boundary_surfaces: Vec<ComponentId> = self
            .brep
            .boundaries_of(block)
            .filter(|&surface| self.brep.kind_of(surface) == ComponentKind::Surface)
            .collect();
        let mut nb_lines_on_block_boundary: i64 = 0;
        let mut nb_lines_internal_to_internal_surface: i64 = 0;
        let mut nb_free_lines: i64 = 0;
        let mut nb_lines_bounding_several_internal_surfaces: i64 = 0;
        for line_cmv in self
            .brep
            .component_mesh_vertices_of_kind(unique_vertex_id, ComponentKind::Line)
        {
            let line = line_cmv.component;
            if self.brep.nb_embedding_blocks(line) != 0 {
                continue;
            }
            let line_is_on_block_boundary = block_boundary_surfaces.iter().any(|&surface| {
                self.brep.is_boundary(line, surface) || self.brep.is_internal(line, surface)
            });
            if line_is_on_block_boundary {
                nb_lines_on_block_boundary += 1;
                continue;
            }
            if self.brep.nb_embedding_surfaces(line) > 0 {
                if self
                    .brep
                    .embeddings_of_kind(line, ComponentKind::Surface)
                    .any(|surface| self.brep.is_internal(surface, block))
                {
                    nb_lines_internal_to_internal_surface += 1;
                }
                continue;
            }
            let line_is_inside_block = self
                .brep
                .incidences(line)
                .all(|surface| self.brep.is_internal(surface, block));
            if !line_is_inside_block {
                continue;
            }
            if self.brep.nb_incidences(line) == 1 {
                nb_free_lines += 1;
            } else {
                nb_lines_bounding_several_internal_surfaces += 1;
            }
        }
        let mut predicted = 1 + nb_internal_surface_cmvs;
        if nb_boundary_surface_cmvs > 0 {
            predicted += nb_boundary_surface_cmvs - 1 - nb_lines_on_block_boundary;
        }
        let nb_merging_lines = nb_lines_internal_to_internal_surface
            + nb_free_lines
            + nb_lines_bounding_several_internal_surfaces;
        predicted -= nb_merging_lines;
        if nb_merging_lines != 0 || nb_lines_on_block_boundary != 0 {
            predicted += self
                .brep
                .component_mesh_vertices_of_kind(unique_vertex_id, ComponentKind::Corner)
                .len() as i64;
        }
        predicted
    }

    /// Boundary surfaces of `block` whose mesh still has border vertices.
    ///
    /// The surfaces enclosing a block must be topologically closed; a
    /// border vertex on one of them means the enclosure has a free edge.
    pub fn block_boundary_surfaces_are_not_closed(
        &self,
        block: ComponentId,
    ) -> InspectionIssues<ComponentId> {
        let mut issues = InspectionIssues::new(format!(
            "Block {block} has boundary surfaces which are not closed"
        ));
        for surface in self.brep.boundaries_of(block) {
            if self.brep.kind_of(surface) != ComponentKind::Surface {
                continue;
            }
            let Some(mesh) = self.brep.mesh(surface) else {
                continue;
            };
            if !mesh.is_closed() {
                issues.add_issue(
                    surface,
                    format!(
                        "surface {surface} is a boundary of block {block} but its mesh is not closed"
                    ),
                );
            }
        }
        issues
    }

    /// The model shell must be watertight: a border vertex of a surface
    /// bounding a block must be matched, at the same unique vertex, by a
    /// border vertex of another such surface.
    pub fn vertex_is_on_open_model_shell_border(&self, unique_vertex_id: usize) -> Option<String> {
        let mut lone_surface = None;
        let mut nb_shell_borders = 0;
        for surface_cmv in self
            .brep
            .component_mesh_vertices_of_kind(unique_vertex_id, ComponentKind::Surface)
        {
            if self.brep.nb_incidences(surface_cmv.component) == 0 {
                continue;
            }
            let Some(mesh) = self.brep.mesh(surface_cmv.component) else {
                continue;
            };
            if mesh.is_vertex_on_border(surface_cmv.vertex) {
                nb_shell_borders += 1;
                lone_surface = Some(surface_cmv.component);
            }
        }
        if nb_shell_borders == 1 {
            let surface = lone_surface?;
            return Some(format!(
                "unique vertex {unique_vertex_id} lies on the border of boundary surface {surface} with no other boundary surface border to close the shell"
            ));
        }
        None
    }

    /// Runs every block check over all components and unique vertices.
    pub fn inspect_blocks(&self) -> BRepBlocksInspectionResult {
        let mut result = BRepBlocksInspectionResult::default();
        for block in self.brep.blocks() {
            match self.brep.mesh(block) {
                None => result
                    .blocks_not_meshed
                    .add_issue(block, format!("block {block} is not meshed")),
                Some(mesh) => {
                    if mesh.is_empty() {
                        result
                            .blocks_not_meshed
                            .add_issue(block, format!("block {block} is not meshed"));
                    }
                    result.blocks_not_linked_to_a_unique_vertex.add_issues(
                        block,
                        unlinked_component_vertices(block, mesh, |cmv| self.brep.unique_vertex(cmv)),
                    );
                }
            }
            result
                .blocks_with_not_closed_boundary_surfaces
                .add_issues(block, self.block_boundary_surfaces_are_not_closed(block));
        }
        let per_vertex = (0..self.brep.nb_unique_vertices())
            .into_par_iter()
            .fold(BRepBlocksInspectionResult::default, |mut acc, uv| {
                if let Some(message) =
                    self.vertex_is_part_of_two_blocks_and_no_boundary_surface(uv)
                {
                    acc.unique_vertices_part_of_two_blocks_and_no_boundary_surface
                        .add_issue(uv, message);
                }
                if let Some(message) = self.vertex_block_cmvs_count_is_incorrect(uv) {
                    acc.unique_vertices_with_incorrect_block_cmvs_count
                        .add_issue(uv, message);
                }
                if let Some(message) = self.vertex_is_on_open_model_shell_border(uv) {
                    acc.unique_vertices_on_an_open_model_shell_border
                        .add_issue(uv, message);
                }
                acc
            })
            .reduce(BRepBlocksInspectionResult::default, |mut a, b| {
                a.merge(b);
                a
            });
        result.merge(per_vertex);
        result
    }
}
