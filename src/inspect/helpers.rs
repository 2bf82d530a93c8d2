//! Small query helpers shared by the per-kind validators.

use itertools::Itertools;

use crate::model::{ComponentId, ComponentMesh, ComponentMeshVertex};

use super::issues::InspectionIssues;

/// Distinct component ids of a CMV slice, preserving first-seen order.
///
/// A unique vertex may hold several CMVs of the same component (e.g. both
/// endpoints of a closed line), so rules quantifying over components rather
/// than mesh vertices go through this.
pub(crate) fn components_of(cmvs: &[ComponentMeshVertex]) -> Vec<ComponentId> {
    cmvs.iter().map(|cmv| cmv.component).unique().collect()
}

/// Mesh vertices of one component that do not resolve to any unique vertex.
pub(crate) fn unlinked_component_vertices(
    component: ComponentId,
    mesh: &ComponentMesh,
    unique_vertex: impl Fn(ComponentMeshVertex) -> Option<usize>,
) -> InspectionIssues<u32> {
    let mut issues = InspectionIssues::new(format!(
        "Component {component} has mesh vertices not linked to a unique vertex"
    ));
    for vertex in 0..mesh.nb_vertices() {
        if unique_vertex(ComponentMeshVertex::new(component, vertex)).is_none() {
            issues.add_issue(
                vertex,
                format!("vertex {vertex} is not linked to a unique vertex"),
            );
        }
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmv(component: u64, vertex: u32) -> ComponentMeshVertex {
        ComponentMeshVertex::new(ComponentId::new(component), vertex)
    }

    #[test]
    fn components_of_deduplicates_in_order() {
        let cmvs = [cmv(3, 0), cmv(1, 2), cmv(3, 5), cmv(2, 0)];
        let components = components_of(&cmvs);
        assert_eq!(
            components,
            vec![ComponentId::new(3), ComponentId::new(1), ComponentId::new(2)]
        );
    }

    #[test]
    fn unlinked_vertices_are_reported_individually() {
        let mesh = ComponentMesh::new(3, 2);
        let issues = unlinked_component_vertices(ComponentId::new(1), &mesh, |cmv| {
            (cmv.vertex != 1).then_some(0)
        });
        assert_eq!(issues.nb_issues(), 1);
        assert_eq!(issues.values().copied().collect::<Vec<_>>(), vec![1]);
    }
}
