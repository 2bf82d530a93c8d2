//! `ComponentId`: a strong, zero-cost handle for model components
//!
//! Every component of a B-Rep model (corner, line, surface, block) is
//! represented by a unique, opaque identifier. `ComponentId` wraps a nonzero
//! `u64` to enforce at compile- and runtime that 0 is reserved as an
//! invalid or sentinel value.
//!
//! This module also provides [`ComponentKind`], the closed set of component
//! kinds with their topological dimension, and [`ComponentMeshVertex`], the
//! (component, local mesh vertex) value pair resolved through the
//! unique-vertex index.

use std::{fmt, num::NonZeroU64};

/// Opaque identifier of one model component.
///
/// # Memory layout
/// This type is `repr(transparent)`, meaning it has the same ABI and
/// alignment as its single field (`NonZeroU64`).
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[repr(transparent)]
pub struct ComponentId(NonZeroU64);

impl ComponentId {
    /// Creates a new `ComponentId` from a raw `u64` value.
    ///
    /// # Panics
    ///
    /// Panics if `raw == 0`. We reserve 0 as an invalid or sentinel value.
    #[inline]
    pub fn new(raw: u64) -> Self {
        ComponentId(NonZeroU64::new(raw).expect("ComponentId must be non-zero"))
    }

    /// Returns the inner `u64` value of this `ComponentId`.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Debug for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ComponentId").field(&self.get()).finish()
    }
}

/// Prints the numeric id without any wrapper text.
impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// The closed set of component kinds of a B-Rep model.
///
/// Blocks only exist in 3D models ([`BRep`](crate::model::BRep)); the other
/// three kinds are common to `Section` and `BRep`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd, serde::Serialize, serde::Deserialize)]
pub enum ComponentKind {
    /// 0D point component.
    Corner,
    /// 1D curve component.
    Line,
    /// 2D surface component.
    Surface,
    /// 3D volume component (BRep only).
    Block,
}

impl ComponentKind {
    /// Topological dimension of the component kind.
    pub fn dimension(self) -> u8 {
        match self {
            ComponentKind::Corner => 0,
            ComponentKind::Line => 1,
            ComponentKind::Surface => 2,
            ComponentKind::Block => 3,
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ComponentKind::Corner => "corner",
            ComponentKind::Line => "line",
            ComponentKind::Surface => "surface",
            ComponentKind::Block => "block",
        };
        f.write_str(name)
    }
}

/// A component-mesh-vertex (CMV): one local vertex of one component's mesh.
///
/// CMVs are never owned standalone; they are always resolved through the
/// model's unique-vertex index.
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct ComponentMeshVertex {
    /// The component owning the mesh.
    pub component: ComponentId,
    /// Local vertex index within that component's mesh.
    pub vertex: u32,
}

impl ComponentMeshVertex {
    #[inline]
    pub fn new(component: ComponentId, vertex: u32) -> Self {
        Self { component, vertex }
    }
}

impl fmt::Debug for ComponentMeshVertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cmv({}, {})", self.component, self.vertex)
    }
}

impl fmt::Display for ComponentMeshVertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.component, self.vertex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_zero_panics() {
        assert!(std::panic::catch_unwind(|| ComponentId::new(0)).is_err());
    }

    #[test]
    fn debug_and_display() {
        let id = ComponentId::new(7);
        assert_eq!(format!("{:?}", id), "ComponentId(7)");
        assert_eq!(format!("{}", id), "7");
    }

    #[test]
    fn kind_dimensions_are_ordered() {
        use ComponentKind::*;
        assert!(Corner.dimension() < Line.dimension());
        assert!(Line.dimension() < Surface.dimension());
        assert!(Surface.dimension() < Block.dimension());
    }

    #[test]
    fn cmv_ordering_and_hash() {
        let a = ComponentMeshVertex::new(ComponentId::new(1), 0);
        let b = ComponentMeshVertex::new(ComponentId::new(1), 1);
        assert!(a < b);
        use std::collections::HashSet;
        let set: HashSet<_> = [a, b, a].into_iter().collect();
        assert_eq!(set.len(), 2);
    }
}
