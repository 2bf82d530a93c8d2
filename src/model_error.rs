//! `ModelError`: unified error type for model construction APIs.
//!
//! Only *building* a model can fail. Inspection never returns errors: rule
//! violations are data, collected into issue reports, and violated internal
//! contracts (out-of-range unique-vertex ids) panic, since a constructed
//! model is assumed internally consistent at the API boundary.

use thiserror::Error;

use crate::model::{ComponentId, ComponentKind, ComponentMeshVertex};

/// Unified error type for `SectionBuilder`/`BRepBuilder` operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A relation or link referenced a component id never added to the model.
    #[error("component `{0}` does not exist in the model")]
    UnknownComponent(ComponentId),
    /// Boundary relations require the lower component one dimension below
    /// the upper one.
    #[error(
        "invalid boundary relation: {lower_kind} `{lower}` cannot bound {upper_kind} `{upper}`"
    )]
    InvalidBoundaryRelation {
        lower: ComponentId,
        lower_kind: ComponentKind,
        upper: ComponentId,
        upper_kind: ComponentKind,
    },
    /// Internal relations require the lower component strictly below the
    /// upper one.
    #[error(
        "invalid internal relation: {lower_kind} `{lower}` cannot be embedded in {upper_kind} `{upper}`"
    )]
    InvalidInternalRelation {
        lower: ComponentId,
        lower_kind: ComponentKind,
        upper: ComponentId,
        upper_kind: ComponentKind,
    },
    /// A component cannot relate to itself.
    #[error("component `{0}` cannot be related to itself")]
    SelfRelation(ComponentId),
    /// A vertex link targeted a unique vertex beyond the declared count.
    #[error("unique vertex {unique_vertex} out of range (model has {nb_unique_vertices})")]
    UniqueVertexOutOfRange {
        unique_vertex: usize,
        nb_unique_vertices: usize,
    },
    /// A vertex link referenced a mesh vertex the component does not have.
    #[error("CMV {cmv} is out of range: component mesh has {nb_vertices} vertices")]
    MeshVertexOutOfRange { cmv: ComponentMeshVertex, nb_vertices: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn relation_errors_render_both_components_and_carry_no_source() {
        let err = ModelError::InvalidBoundaryRelation {
            lower: ComponentId::new(2),
            lower_kind: ComponentKind::Line,
            upper: ComponentId::new(1),
            upper_kind: ComponentKind::Corner,
        };
        assert_eq!(
            err.to_string(),
            "invalid boundary relation: line `2` cannot bound corner `1`"
        );
        assert!(err.source().is_none());
    }
}
