//! Topology inspectors and their issue collections.
//!
//! Inspection never mutates the model and never fails: every rule violation
//! becomes an entry in an issue collection, and models with thousands of
//! defects are inspected as readily as pristine ones. Per-vertex rule
//! evaluation runs in parallel; workers fill private buffers that are merged
//! at the end.

pub mod brep;
mod helpers;
pub mod issues;
pub mod section;

pub use brep::{
    BRepBlocksInspectionResult, BRepBlocksTopology, BRepCornersInspectionResult,
    BRepCornersTopology, BRepLinesInspectionResult, BRepLinesTopology,
    BRepSurfacesInspectionResult, BRepSurfacesTopology, BRepTopologyInspectionResult,
    BRepTopologyInspector, inspect_brep_topology,
};
pub use issues::{InspectionIssues, InspectionIssuesMap};
pub use section::{
    SectionCornersInspectionResult, SectionCornersTopology, SectionLinesInspectionResult,
    SectionLinesTopology, SectionSurfacesInspectionResult, SectionSurfacesTopology,
    SectionTopologyInspectionResult, SectionTopologyInspector, inspect_section_topology,
};
