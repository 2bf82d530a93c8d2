//! Core types for B-Rep geological models.
//!
//! This module provides the read surface the topology inspector consumes:
//! - [`ComponentId`], [`ComponentKind`] and [`ComponentMeshVertex`] handles
//! - [`ComponentMesh`] per-component mesh summaries
//! - the typed [`RelationshipGraph`] (boundary / internal relations)
//! - the [`UniqueVertexIndex`] resolving mesh vertices model-wide
//! - the [`Section`] (2D) and [`BRep`] (3D) models with their builders
//!
//! Models are assembled through the fallible builders and immutable
//! afterwards, which is what makes the per-vertex inspection embarrassingly
//! parallel.

pub mod brep;
pub mod component;
mod core;
pub mod mesh;
pub mod relationships;
pub mod section;
pub mod vertices;

pub use brep::{BRep, BRepBuilder};
pub use component::{ComponentId, ComponentKind, ComponentMeshVertex};
pub use mesh::ComponentMesh;
pub use relationships::{Relation, RelationshipGraph};
pub use section::{Section, SectionBuilder};
pub use vertices::UniqueVertexIndex;
