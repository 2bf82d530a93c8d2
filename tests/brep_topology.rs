//! End-to-end inspection of small hand-built 3D models.

use brep_inspect::inspect::{BRepTopologyInspector, inspect_brep_topology};
use brep_inspect::model::{BRep, BRepBuilder, ComponentId, ComponentMesh, ComponentMeshVertex};
use brep_inspect::model_error::ModelError;

fn cmv(component: ComponentId, vertex: u32) -> ComponentMeshVertex {
    ComponentMeshVertex::new(component, vertex)
}

/// A line embedded in a meshed block, with a corner at each end.
fn stick_in_block() -> Result<BRep, ModelError> {
    let mut builder = BRep::builder();
    let corner_a = builder.add_corner(Some(ComponentMesh::points(1)));
    let corner_b = builder.add_corner(Some(ComponentMesh::points(1)));
    let line = builder.add_line(Some(ComponentMesh::new(2, 1)));
    let block = builder.add_block(Some(ComponentMesh::new(2, 1)));
    builder.add_boundary(corner_a, line)?;
    builder.add_boundary(corner_b, line)?;
    builder.add_internal(line, block)?;
    builder.set_nb_unique_vertices(2);
    builder.link_vertex(0, cmv(corner_a, 0))?;
    builder.link_vertex(0, cmv(line, 0))?;
    builder.link_vertex(0, cmv(block, 0))?;
    builder.link_vertex(1, cmv(corner_b, 0))?;
    builder.link_vertex(1, cmv(line, 1))?;
    builder.link_vertex(1, cmv(block, 1))?;
    Ok(builder.build())
}

#[test]
fn stick_in_block_is_valid() {
    let brep = stick_in_block().unwrap();
    let inspector = BRepTopologyInspector::new(&brep);
    assert!(inspector.brep_topology_is_valid());
    let result = inspector.inspect_brep_topology();
    assert_eq!(result.nb_issues(), 0, "unexpected issues:\n{result}");
    assert!(result.is_empty());
}

#[test]
fn empty_model_is_invalid() {
    let brep = BRep::builder().build();
    assert!(!BRepTopologyInspector::new(&brep).brep_topology_is_valid());
}

#[test]
fn vertex_with_two_corners_is_reported() {
    let mut builder = BRep::builder();
    let corner_a = builder.add_corner(Some(ComponentMesh::points(1)));
    let corner_b = builder.add_corner(Some(ComponentMesh::points(1)));
    let line = builder.add_line(Some(ComponentMesh::new(2, 1)));
    builder.add_boundary(corner_a, line).unwrap();
    builder.add_boundary(corner_b, line).unwrap();
    builder.set_nb_unique_vertices(2);
    builder.link_vertex(0, cmv(corner_a, 0)).unwrap();
    builder.link_vertex(0, cmv(corner_b, 0)).unwrap();
    builder.link_vertex(0, cmv(line, 0)).unwrap();
    builder.link_vertex(1, cmv(line, 1)).unwrap();
    let brep = builder.build();

    let inspector = BRepTopologyInspector::new(&brep);
    assert!(!inspector.brep_topology_is_valid());
    let result = inspector.inspect_brep_topology();
    assert_eq!(
        result
            .corners
            .unique_vertices_linked_to_multiple_corners
            .nb_issues(),
        1
    );
    let values: Vec<_> = result
        .corners
        .unique_vertices_linked_to_multiple_corners
        .values()
        .copied()
        .collect();
    assert_eq!(values, vec![0]);
}

#[test]
fn line_branching_without_corner_is_reported() {
    let mut builder = BRep::builder();
    let corner_a = builder.add_corner(Some(ComponentMesh::points(1)));
    let corner_b = builder.add_corner(Some(ComponentMesh::points(1)));
    let line_a = builder.add_line(Some(ComponentMesh::new(2, 1)));
    let line_b = builder.add_line(Some(ComponentMesh::new(2, 1)));
    let block = builder.add_block(Some(ComponentMesh::new(3, 1)));
    builder.add_boundary(corner_a, line_a).unwrap();
    builder.add_boundary(corner_b, line_b).unwrap();
    builder.add_internal(line_a, block).unwrap();
    builder.add_internal(line_b, block).unwrap();
    builder.set_nb_unique_vertices(3);
    // both lines meet at unique vertex 0 where no corner sits
    builder.link_vertex(0, cmv(line_a, 0)).unwrap();
    builder.link_vertex(0, cmv(line_b, 0)).unwrap();
    builder.link_vertex(0, cmv(block, 0)).unwrap();
    builder.link_vertex(1, cmv(corner_a, 0)).unwrap();
    builder.link_vertex(1, cmv(line_a, 1)).unwrap();
    builder.link_vertex(1, cmv(block, 1)).unwrap();
    builder.link_vertex(2, cmv(corner_b, 0)).unwrap();
    builder.link_vertex(2, cmv(line_b, 1)).unwrap();
    builder.link_vertex(2, cmv(block, 2)).unwrap();
    let brep = builder.build();

    let inspector = BRepTopologyInspector::new(&brep);
    assert!(!inspector.brep_topology_is_valid());
    let result = inspector.inspect_brep_topology();
    assert_eq!(
        result
            .lines
            .unique_vertices_linked_to_several_lines_but_not_linked_to_a_corner
            .nb_issues(),
        1
    );
}

fn two_blocks(with_boundary_surface: bool) -> BRep {
    let mut builder = BRep::builder();
    let block_a = builder.add_block(Some(ComponentMesh::new(1, 1)));
    let block_b = builder.add_block(Some(ComponentMesh::new(1, 1)));
    let surface = with_boundary_surface.then(|| {
        let surface = builder.add_surface(Some(ComponentMesh::new(1, 1)));
        builder.add_boundary(surface, block_a).unwrap();
        builder.add_boundary(surface, block_b).unwrap();
        surface
    });
    builder.set_nb_unique_vertices(1);
    builder.link_vertex(0, cmv(block_a, 0)).unwrap();
    builder.link_vertex(0, cmv(block_b, 0)).unwrap();
    if let Some(surface) = surface {
        builder.link_vertex(0, cmv(surface, 0)).unwrap();
    }
    builder.build()
}

#[test]
fn two_blocks_without_boundary_surface_are_reported() {
    let brep = two_blocks(false);
    let inspector = BRepTopologyInspector::new(&brep);
    assert!(!inspector.brep_topology_is_valid());
    let result = inspector.inspect_brep_topology();
    assert_eq!(
        result
            .blocks
            .unique_vertices_part_of_two_blocks_and_no_boundary_surface
            .nb_issues(),
        1
    );
}

#[test]
fn two_blocks_with_boundary_surface_are_valid() {
    let brep = two_blocks(true);
    let inspector = BRepTopologyInspector::new(&brep);
    let result = inspector.inspect_brep_topology();
    assert_eq!(result.nb_issues(), 0, "unexpected issues:\n{result}");
    assert!(inspector.brep_topology_is_valid());
}

#[test]
fn open_boundary_surface_of_a_block_is_reported() {
    let mut builder = BRep::builder();
    let block = builder.add_block(Some(ComponentMesh::new(1, 1)));
    // the enclosing surface still has a border vertex: the shell is open
    let surface = builder.add_surface(Some(ComponentMesh::with_border(2, 1, [0])));
    builder.add_boundary(surface, block).unwrap();
    builder.set_nb_unique_vertices(2);
    builder.link_vertex(0, cmv(surface, 0)).unwrap();
    builder.link_vertex(0, cmv(block, 0)).unwrap();
    builder.link_vertex(1, cmv(surface, 1)).unwrap();
    let brep = builder.build();

    let inspector = BRepTopologyInspector::new(&brep);
    assert!(!inspector.brep_topology_is_valid());
    let result = inspector.inspect_brep_topology();
    assert_eq!(
        result.blocks.blocks_with_not_closed_boundary_surfaces.nb_issues(),
        1
    );
    assert_eq!(
        result
            .blocks
            .unique_vertices_on_an_open_model_shell_border
            .nb_issues(),
        1
    );
}

#[test]
fn closed_boundary_surface_of_a_block_is_accepted() {
    let mut builder = BRep::builder();
    let block = builder.add_block(Some(ComponentMesh::new(1, 1)));
    let surface = builder.add_surface(Some(ComponentMesh::with_border(2, 1, [])));
    builder.add_boundary(surface, block).unwrap();
    builder.set_nb_unique_vertices(2);
    builder.link_vertex(0, cmv(surface, 0)).unwrap();
    builder.link_vertex(0, cmv(block, 0)).unwrap();
    builder.link_vertex(1, cmv(surface, 1)).unwrap();
    let brep = builder.build();

    let result = inspect_brep_topology(&brep);
    assert_eq!(result.nb_issues(), 0, "unexpected issues:\n{result}");
}

#[test]
fn closed_line_endpoints_at_one_vertex_do_not_require_a_corner() {
    // a closed line: both endpoint mesh vertices resolve to the same
    // cornerless unique vertex, which still counts as a single line there
    let mut builder = BRep::builder();
    let line = builder.add_line(Some(ComponentMesh::new(2, 1)));
    let block = builder.add_block(Some(ComponentMesh::new(1, 1)));
    builder.add_internal(line, block).unwrap();
    builder.set_nb_unique_vertices(1);
    builder.link_vertex(0, cmv(line, 0)).unwrap();
    builder.link_vertex(0, cmv(line, 1)).unwrap();
    builder.link_vertex(0, cmv(block, 0)).unwrap();
    let brep = builder.build();

    let inspector = BRepTopologyInspector::new(&brep);
    let result = inspector.inspect_brep_topology();
    assert_eq!(
        result
            .lines
            .unique_vertices_linked_to_several_lines_but_not_linked_to_a_corner
            .nb_issues(),
        0
    );
    assert!(inspector.brep_topology_is_valid());
}

#[test]
fn dangling_unique_vertex_is_reported() {
    let mut builder = BRep::builder();
    let corner = builder.add_corner(Some(ComponentMesh::points(1)));
    let line = builder.add_line(Some(ComponentMesh::new(2, 1)));
    let block = builder.add_block(Some(ComponentMesh::new(2, 1)));
    builder.add_boundary(corner, line).unwrap();
    builder.add_internal(line, block).unwrap();
    builder.set_nb_unique_vertices(4);
    builder.link_vertex(0, cmv(corner, 0)).unwrap();
    builder.link_vertex(0, cmv(line, 0)).unwrap();
    builder.link_vertex(0, cmv(block, 0)).unwrap();
    builder.link_vertex(1, cmv(line, 1)).unwrap();
    builder.link_vertex(1, cmv(block, 1)).unwrap();
    let brep = builder.build();

    let result = inspect_brep_topology(&brep);
    assert_eq!(
        result.unique_vertices_not_linked_to_any_component.nb_issues(),
        2
    );
    let values: Vec<_> = result
        .unique_vertices_not_linked_to_any_component
        .values()
        .copied()
        .collect();
    assert_eq!(values, vec![2, 3]);
}

#[test]
fn link_into_shrunk_mesh_is_reported_as_inexistant() {
    let mut builder = BRep::builder();
    let corner = builder.add_corner(Some(ComponentMesh::points(1)));
    let line = builder.add_line(Some(ComponentMesh::new(2, 1)));
    let block = builder.add_block(Some(ComponentMesh::new(2, 1)));
    builder.add_boundary(corner, line).unwrap();
    builder.add_internal(line, block).unwrap();
    builder.set_nb_unique_vertices(2);
    builder.link_vertex(0, cmv(corner, 0)).unwrap();
    builder.link_vertex(0, cmv(line, 0)).unwrap();
    builder.link_vertex(0, cmv(block, 0)).unwrap();
    builder.link_vertex(1, cmv(line, 1)).unwrap();
    builder.link_vertex(1, cmv(block, 1)).unwrap();
    // shrinking the line mesh leaves the link to vertex 1 stale
    builder
        .set_mesh(line, Some(ComponentMesh::new(1, 1)))
        .unwrap();
    let brep = builder.build();

    let inspector = BRepTopologyInspector::new(&brep);
    assert!(!inspector.brep_topology_is_valid());
    let result = inspector.inspect_brep_topology();
    assert_eq!(result.unique_vertices_linked_to_inexistant_cmv.nb_issues(), 1);
}

#[test]
fn unmeshed_components_are_reported() {
    let mut builder = BRep::builder();
    let corner = builder.add_corner(None);
    let line = builder.add_line(Some(ComponentMesh::new(2, 1)));
    let block = builder.add_block(Some(ComponentMesh::new(2, 1)));
    builder.add_boundary(corner, line).unwrap();
    builder.add_internal(line, block).unwrap();
    builder.set_nb_unique_vertices(2);
    builder.link_vertex(0, cmv(line, 0)).unwrap();
    builder.link_vertex(0, cmv(block, 0)).unwrap();
    builder.link_vertex(1, cmv(line, 1)).unwrap();
    builder.link_vertex(1, cmv(block, 1)).unwrap();
    let brep = builder.build();

    let result = inspect_brep_topology(&brep);
    assert_eq!(result.corners.corners_not_meshed.nb_issues(), 1);
}

#[test]
fn inspection_is_idempotent() {
    let brep = two_blocks(false);
    let first = inspect_brep_topology(&brep);
    let second = inspect_brep_topology(&brep);
    assert_eq!(first.nb_issues(), second.nb_issues());
    assert_eq!(first.to_string(), second.to_string());
}

#[test]
fn aggregate_count_matches_category_sum() {
    let brep = two_blocks(false);
    let result = inspect_brep_topology(&brep);
    let sum = result.corners.nb_issues()
        + result.lines.nb_issues()
        + result.surfaces.nb_issues()
        + result.blocks.nb_issues()
        + result.unique_vertices_not_linked_to_any_component.nb_issues()
        + result.unique_vertices_linked_to_inexistant_cmv.nb_issues()
        + result
            .unique_vertices_nonbijectively_linked_to_cmv
            .nb_issues()
        + result
            .meshed_components_not_linked_to_a_unique_vertex
            .nb_issues();
    assert_eq!(result.nb_issues(), sum);
}

#[test]
fn result_serializes_to_json() {
    let brep = stick_in_block().unwrap();
    let result = inspect_brep_topology(&brep);
    let json = serde_json::to_value(&result).unwrap();
    assert!(json.get("corners").is_some());
    assert!(json.get("blocks").is_some());
}

#[test]
fn builder_rejects_inverted_boundary_dimension() {
    let mut builder = BRepBuilder::new();
    let line = builder.add_line(Some(ComponentMesh::new(2, 1)));
    let corner = builder.add_corner(Some(ComponentMesh::points(1)));
    assert!(matches!(
        builder.add_boundary(line, corner),
        Err(ModelError::InvalidBoundaryRelation { .. })
    ));
}

#[test]
fn builder_rejects_out_of_range_links() {
    let mut builder = BRepBuilder::new();
    let corner = builder.add_corner(Some(ComponentMesh::points(1)));
    builder.set_nb_unique_vertices(1);
    assert!(matches!(
        builder.link_vertex(5, cmv(corner, 0)),
        Err(ModelError::UniqueVertexOutOfRange { .. })
    ));
    assert!(matches!(
        builder.link_vertex(0, cmv(corner, 3)),
        Err(ModelError::MeshVertexOutOfRange { .. })
    ));
}
