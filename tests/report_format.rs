//! Rendering and serialization of inspection reports.

use brep_inspect::inspect::{InspectionIssues, InspectionIssuesMap, inspect_brep_topology};
use brep_inspect::model::{BRep, ComponentId, ComponentMesh, ComponentMeshVertex};
use proptest::prelude::*;

#[test]
fn empty_categories_render_no_issues() {
    let brep = BRep::builder().build();
    let report = inspect_brep_topology(&brep).to_string();
    assert!(report.contains("-> no issues"));
    assert!(!report.contains("\n  -> unique vertex"));
}

#[test]
fn messages_are_listed_under_their_category() {
    let mut builder = BRep::builder();
    let block_a = builder.add_block(Some(ComponentMesh::new(1, 1)));
    let block_b = builder.add_block(Some(ComponentMesh::new(1, 1)));
    builder.set_nb_unique_vertices(1);
    builder
        .link_vertex(0, ComponentMeshVertex::new(block_a, 0))
        .unwrap();
    builder
        .link_vertex(0, ComponentMeshVertex::new(block_b, 0))
        .unwrap();
    let brep = builder.build();

    let report = inspect_brep_topology(&brep).to_string();
    assert!(report.contains("Unique vertices shared by two blocks"));
    assert!(report.contains("-> unique vertex 0 is part of blocks"));
}

#[test]
fn issues_map_display_names_the_owner() {
    let mut map: InspectionIssuesMap<u32> = InspectionIssuesMap::new("Unlinked vertices");
    let mut sub = InspectionIssues::new("Component 7 has mesh vertices not linked");
    sub.add_issue(2_u32, "vertex 2 is not linked to a unique vertex");
    map.add_issues(ComponentId::new(7), sub);
    let text = map.to_string();
    assert!(text.contains("[7]"));
    assert!(text.contains("vertex 2 is not linked"));
}

proptest! {
    #[test]
    fn nb_issues_matches_recorded_messages(messages in proptest::collection::vec(".*", 0..20)) {
        let mut issues: InspectionIssues<usize> = InspectionIssues::new("category");
        for (value, message) in messages.iter().enumerate() {
            issues.add_issue(value, message.clone());
        }
        prop_assert_eq!(issues.nb_issues(), messages.len());
        prop_assert_eq!(issues.is_empty(), messages.is_empty());
    }

    #[test]
    fn append_preserves_counts(left in 0_usize..50, right in 0_usize..50) {
        let mut a: InspectionIssues<usize> = InspectionIssues::new("category");
        for i in 0..left {
            a.add_issue(i, "left");
        }
        let mut b: InspectionIssues<usize> = InspectionIssues::new("category");
        for i in 0..right {
            b.add_issue(i, "right");
        }
        a.append(b);
        prop_assert_eq!(a.nb_issues(), left + right);
    }
}
