//! Core triangle mesh type.
//!
//! Collision geometry is static in the body frame, so the mesh is a
//! plain vertex list plus a flat index buffer. All mutation happens at
//! load time; the collision phases only ever read.

use glam::DVec3;
use kessler_types::{KesslerError, KesslerResult};
use serde::{Deserialize, Serialize};

/// A triangle mesh in the body frame.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TriangleMesh {
    /// Vertex positions.
    pub vertices: Vec<DVec3>,

    /// Triangle indices: each triangle is `[v0, v1, v2]`,
    /// stored flat: `[t0v0, t0v1, t0v2, t1v0, ...]`.
    ///
    /// Winding is counter-clockwise seen from outside the body; face
    /// normals are derived from it.
    pub indices: Vec<u32>,
}

impl TriangleMesh {
    /// Creates an empty mesh with pre-allocated capacity.
    pub fn with_capacity(vertex_capacity: usize, triangle_capacity: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_capacity),
            indices: Vec::with_capacity(triangle_capacity * 3),
        }
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Returns the position of vertex `i`.
    #[inline]
    pub fn position(&self, i: usize) -> DVec3 {
        self.vertices[i]
    }

    /// Returns the three vertex indices of triangle `t`.
    #[inline]
    pub fn triangle(&self, t: usize) -> [u32; 3] {
        let base = t * 3;
        [self.indices[base], self.indices[base + 1], self.indices[base + 2]]
    }

    /// Validates mesh integrity.
    ///
    /// Checks:
    /// - Index count divisible by 3
    /// - Triangle indices within bounds
    /// - No degenerate triangles (repeated vertex indices)
    pub fn validate(&self) -> KesslerResult<()> {
        if self.indices.len() % 3 != 0 {
            return Err(KesslerError::InvalidMesh(
                "Index count is not divisible by 3".into(),
            ));
        }

        let n = self.vertices.len();
        for (i, &idx) in self.indices.iter().enumerate() {
            if idx as usize >= n {
                return Err(KesslerError::InvalidMesh(format!(
                    "Index {} at position {} is out of range (vertex count: {})",
                    idx, i, n
                )));
            }
        }

        for t in 0..self.triangle_count() {
            let [a, b, c] = self.triangle(t);
            if a == b || b == c || a == c {
                return Err(KesslerError::InvalidMesh(format!(
                    "Triangle {} has repeated vertex indices: [{}, {}, {}]",
                    t, a, b, c
                )));
            }
        }

        Ok(())
    }

    /// Largest vertex distance from the body-frame origin.
    ///
    /// Useful as a starting point for a body's bounding radius.
    pub fn bounding_radius(&self) -> f64 {
        self.vertices
            .iter()
            .map(|v| v.length())
            .fold(0.0, f64::max)
    }
}
