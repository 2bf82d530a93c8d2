//! brep-inspect: topology consistency checks for boundary-representation
//! geological models.
//!
//! A model is a set of components (corners, lines, surfaces, blocks in 3D;
//! no blocks in 2D), a relationship graph recording which components bound
//! or are embedded in which others, and a unique-vertex index resolving the
//! mesh vertices of every component to model-wide vertex identities.
//! The inspectors walk every unique vertex, evaluate the rule set of each
//! component kind there, and collect every violation as an issue instead of
//! stopping at the first one.
//!
//! # Example
//!
//! ```
//! use brep_inspect::model::{BRep, ComponentMesh, ComponentMeshVertex};
//! use brep_inspect::inspect::inspect_brep_topology;
//!
//! # fn main() -> Result<(), brep_inspect::ModelError> {
//! let mut builder = BRep::builder();
//! let corner = builder.add_corner(Some(ComponentMesh::points(1)));
//! let line = builder.add_line(Some(ComponentMesh::new(2, 1)));
//! builder.add_boundary(corner, line)?;
//! builder.set_nb_unique_vertices(2);
//! builder.link_vertex(0, ComponentMeshVertex::new(corner, 0))?;
//! builder.link_vertex(0, ComponentMeshVertex::new(line, 0))?;
//! builder.link_vertex(1, ComponentMeshVertex::new(line, 1))?;
//! let brep = builder.build();
//!
//! let result = inspect_brep_topology(&brep);
//! println!("{result}");
//! # Ok(())
//! # }
//! ```

pub mod inspect;
pub mod model;
pub mod model_error;

pub use inspect::{
    BRepTopologyInspectionResult, BRepTopologyInspector, InspectionIssues, InspectionIssuesMap,
    SectionTopologyInspectionResult, SectionTopologyInspector, inspect_brep_topology,
    inspect_section_topology,
};
pub use model::{
    BRep, BRepBuilder, ComponentId, ComponentKind, ComponentMesh, ComponentMeshVertex, Section,
    SectionBuilder,
};
pub use model_error::ModelError;

/// Common imports for downstream users.
pub mod prelude {
    pub use crate::inspect::{inspect_brep_topology, inspect_section_topology};
    pub use crate::model::{
        BRep, BRepBuilder, ComponentId, ComponentKind, ComponentMesh, ComponentMeshVertex,
        Section, SectionBuilder,
    };
    pub use crate::model_error::ModelError;
}
