//! Per-component mesh summary consumed by the topology validators.
//!
//! The inspector never walks mesh connectivity; it only needs vertex and
//! element counts plus the border classification of surface vertices. Those
//! are captured here as plain precomputed data, built once when the model is
//! assembled, so validators stay read-only with no hidden cache mutation.

/// Read-only summary of one component's mesh.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct ComponentMesh {
    nb_vertices: u32,
    nb_elements: u32,
    border: Vec<bool>,
}

impl ComponentMesh {
    /// Mesh summary without border information (corners, lines, blocks).
    ///
    /// `nb_elements` counts the top-dimensional cells: edges for a line
    /// mesh, polyhedra for a block mesh, 1 for a corner point set.
    pub fn new(nb_vertices: u32, nb_elements: u32) -> Self {
        Self {
            nb_vertices,
            nb_elements,
            border: Vec::new(),
        }
    }

    /// Mesh summary for a corner: a point set with `nb_vertices` points.
    pub fn points(nb_vertices: u32) -> Self {
        Self::new(nb_vertices, nb_vertices)
    }

    /// Mesh summary with an explicit set of border vertices (surfaces).
    ///
    /// Vertices not listed are interior. Border membership is fixed at
    /// construction; the validators only ever read it.
    ///
    /// # Panics
    /// Panics if a border vertex index is `>= nb_vertices`.
    pub fn with_border(
        nb_vertices: u32,
        nb_elements: u32,
        border_vertices: impl IntoIterator<Item = u32>,
    ) -> Self {
        let mut border = vec![false; nb_vertices as usize];
        for vertex in border_vertices {
            border[vertex as usize] = true;
        }
        Self {
            nb_vertices,
            nb_elements,
            border,
        }
    }

    #[inline]
    pub fn nb_vertices(&self) -> u32 {
        self.nb_vertices
    }

    #[inline]
    pub fn nb_elements(&self) -> u32 {
        self.nb_elements
    }

    /// Whether the mesh has any vertex at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nb_vertices == 0
    }

    /// Whether `vertex` lies on the mesh border.
    ///
    /// Meshes built without border information report every vertex as
    /// interior.
    #[inline]
    pub fn is_vertex_on_border(&self, vertex: u32) -> bool {
        self.border.get(vertex as usize).copied().unwrap_or(false)
    }

    /// Whether the mesh has no border vertex at all (a closed surface).
    pub fn is_closed(&self) -> bool {
        !self.border.iter().any(|&on_border| on_border)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn border_classification() {
        let mesh = ComponentMesh::with_border(4, 2, [0, 3]);
        assert!(mesh.is_vertex_on_border(0));
        assert!(!mesh.is_vertex_on_border(1));
        assert!(!mesh.is_vertex_on_border(2));
        assert!(mesh.is_vertex_on_border(3));
    }

    #[test]
    fn empty_mesh() {
        let mesh = ComponentMesh::new(0, 0);
        assert!(mesh.is_empty());
        assert!(!mesh.is_vertex_on_border(0));
    }

    #[test]
    fn closedness_follows_the_border_table() {
        assert!(ComponentMesh::new(4, 2).is_closed());
        assert!(ComponentMesh::with_border(4, 2, []).is_closed());
        assert!(!ComponentMesh::with_border(4, 2, [1]).is_closed());
    }

    #[test]
    #[should_panic]
    fn out_of_range_border_vertex_panics() {
        let _ = ComponentMesh::with_border(2, 1, [2]);
    }
}
