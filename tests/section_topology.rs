//! End-to-end inspection of small hand-built 2D models.

use brep_inspect::inspect::{SectionTopologyInspector, inspect_section_topology};
use brep_inspect::model::{
    ComponentId, ComponentMesh, ComponentMeshVertex, Section, SectionBuilder,
};
use brep_inspect::model_error::ModelError;

fn cmv(component: ComponentId, vertex: u32) -> ComponentMeshVertex {
    ComponentMeshVertex::new(component, vertex)
}

/// One surface bounded by one line with a corner at each end.
fn bounded_surface() -> Result<Section, ModelError> {
    let mut builder = Section::builder();
    let corner_a = builder.add_corner(Some(ComponentMesh::points(1)));
    let corner_b = builder.add_corner(Some(ComponentMesh::points(1)));
    let line = builder.add_line(Some(ComponentMesh::new(2, 1)));
    let surface = builder.add_surface(Some(ComponentMesh::with_border(2, 1, [0, 1])));
    builder.add_boundary(corner_a, line)?;
    builder.add_boundary(corner_b, line)?;
    builder.add_boundary(line, surface)?;
    builder.set_nb_unique_vertices(2);
    builder.link_vertex(0, cmv(corner_a, 0))?;
    builder.link_vertex(0, cmv(line, 0))?;
    builder.link_vertex(0, cmv(surface, 0))?;
    builder.link_vertex(1, cmv(corner_b, 0))?;
    builder.link_vertex(1, cmv(line, 1))?;
    builder.link_vertex(1, cmv(surface, 1))?;
    Ok(builder.build())
}

#[test]
fn bounded_surface_is_valid() {
    let section = bounded_surface().unwrap();
    let inspector = SectionTopologyInspector::new(&section);
    assert!(inspector.section_topology_is_valid());
    let result = inspector.inspect_section_topology();
    assert_eq!(result.nb_issues(), 0, "unexpected issues:\n{result}");
}

#[test]
fn empty_section_is_invalid() {
    let section = Section::builder().build();
    assert!(!SectionTopologyInspector::new(&section).section_topology_is_valid());
}

#[test]
fn two_surfaces_without_line_are_reported() {
    let mut builder = SectionBuilder::new();
    let surface_a = builder.add_surface(Some(ComponentMesh::with_border(1, 1, [0])));
    let surface_b = builder.add_surface(Some(ComponentMesh::with_border(1, 1, [0])));
    builder.set_nb_unique_vertices(1);
    builder.link_vertex(0, cmv(surface_a, 0)).unwrap();
    builder.link_vertex(0, cmv(surface_b, 0)).unwrap();
    let section = builder.build();

    let inspector = SectionTopologyInspector::new(&section);
    assert!(!inspector.section_topology_is_valid());
    let result = inspector.inspect_section_topology();
    assert_eq!(
        result
            .surfaces
            .unique_vertices_linked_to_several_surfaces_with_no_line_in_between
            .nb_issues(),
        1
    );
}

#[test]
fn line_vertex_off_the_surface_border_is_reported() {
    let mut builder = SectionBuilder::new();
    let corner_a = builder.add_corner(Some(ComponentMesh::points(1)));
    let corner_b = builder.add_corner(Some(ComponentMesh::points(1)));
    let line = builder.add_line(Some(ComponentMesh::new(2, 1)));
    // vertex 0 of the surface mesh is an interior vertex
    let surface = builder.add_surface(Some(ComponentMesh::with_border(2, 1, [1])));
    builder.add_boundary(corner_a, line).unwrap();
    builder.add_boundary(corner_b, line).unwrap();
    builder.add_boundary(line, surface).unwrap();
    builder.set_nb_unique_vertices(2);
    builder.link_vertex(0, cmv(corner_a, 0)).unwrap();
    builder.link_vertex(0, cmv(line, 0)).unwrap();
    builder.link_vertex(0, cmv(surface, 0)).unwrap();
    builder.link_vertex(1, cmv(corner_b, 0)).unwrap();
    builder.link_vertex(1, cmv(line, 1)).unwrap();
    builder.link_vertex(1, cmv(surface, 1)).unwrap();
    let section = builder.build();

    let inspector = SectionTopologyInspector::new(&section);
    assert!(!inspector.section_topology_is_valid());
    let result = inspector.inspect_section_topology();
    assert_eq!(
        result
            .surfaces
            .unique_vertices_linked_to_a_line_and_not_on_a_surface_border
            .nb_issues(),
        1
    );
}

#[test]
fn embedded_line_with_incidences_is_reported() {
    let mut builder = SectionBuilder::new();
    let corner = builder.add_corner(Some(ComponentMesh::points(1)));
    let line = builder.add_line(Some(ComponentMesh::new(2, 1)));
    let surface_a = builder.add_surface(Some(ComponentMesh::with_border(3, 1, [2])));
    let surface_b = builder.add_surface(Some(ComponentMesh::with_border(2, 1, [0, 1])));
    builder.add_boundary(corner, line).unwrap();
    // internal to one surface AND boundary of another: invalid embedding
    builder.add_internal(line, surface_a).unwrap();
    builder.add_boundary(line, surface_b).unwrap();
    builder.set_nb_unique_vertices(3);
    builder.link_vertex(0, cmv(corner, 0)).unwrap();
    builder.link_vertex(0, cmv(line, 0)).unwrap();
    builder.link_vertex(0, cmv(surface_a, 0)).unwrap();
    builder.link_vertex(0, cmv(surface_b, 0)).unwrap();
    builder.link_vertex(1, cmv(line, 1)).unwrap();
    builder.link_vertex(1, cmv(surface_a, 1)).unwrap();
    builder.link_vertex(1, cmv(surface_b, 1)).unwrap();
    builder.link_vertex(2, cmv(surface_a, 2)).unwrap();
    let section = builder.build();

    let result = inspect_section_topology(&section);
    assert!(
        result
            .lines
            .unique_vertices_linked_to_a_line_with_invalid_embeddings
            .nb_issues()
            >= 1
    );
}

#[test]
fn nonbijective_link_is_reported() {
    let mut builder = SectionBuilder::new();
    let corner = builder.add_corner(Some(ComponentMesh::points(1)));
    let line = builder.add_line(Some(ComponentMesh::new(2, 1)));
    let surface = builder.add_surface(Some(ComponentMesh::with_border(2, 1, [0, 1])));
    builder.add_boundary(corner, line).unwrap();
    builder.add_boundary(line, surface).unwrap();
    builder.set_nb_unique_vertices(2);
    builder.link_vertex(0, cmv(corner, 0)).unwrap();
    builder.link_vertex(0, cmv(line, 0)).unwrap();
    builder.link_vertex(0, cmv(surface, 0)).unwrap();
    builder.link_vertex(1, cmv(line, 1)).unwrap();
    builder.link_vertex(1, cmv(surface, 1)).unwrap();
    // the corner vertex claims a second unique vertex; the first claim wins
    builder.link_vertex(1, cmv(corner, 0)).unwrap();
    let section = builder.build();

    let result = inspect_section_topology(&section);
    assert_eq!(
        result
            .unique_vertices_nonbijectively_linked_to_cmv
            .nb_issues(),
        1
    );
    let values: Vec<_> = result
        .unique_vertices_nonbijectively_linked_to_cmv
        .values()
        .copied()
        .collect();
    assert_eq!(values, vec![1]);
}

#[test]
fn inspection_is_idempotent() {
    let section = bounded_surface().unwrap();
    let first = inspect_section_topology(&section);
    let second = inspect_section_topology(&section);
    assert_eq!(first.nb_issues(), second.nb_issues());
    assert_eq!(first.to_string(), second.to_string());
}
