//! Triangle mesh data shared by primitives, imported meshes and terrain.

use nalgebra::{Isometry3, Point3};

/// Indexed triangle mesh.
///
/// `indices` holds three entries per triangle, counter-clockwise when seen
/// from the side the face points to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub const fn empty() -> Self {
        Self {
            positions: Vec::new(),
            indices: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Append `other`, offsetting its indices past this mesh's vertices.
    pub fn append(&mut self, other: &Self) {
        let offset = u32::try_from(self.positions.len()).unwrap_or(u32::MAX);
        self.positions.extend_from_slice(&other.positions);
        self.indices.extend(other.indices.iter().map(|i| i + offset));
    }

    /// Multiply every vertex component-wise by `scale`.
    ///
    /// An odd number of negative components mirrors the mesh, so the
    /// winding is flipped to keep faces pointing outwards.
    pub fn scale(&mut self, scale: [f32; 3]) {
        for p in &mut self.positions {
            p[0] *= scale[0];
            p[1] *= scale[1];
            p[2] *= scale[2];
        }
        let mirrored = scale.iter().filter(|s| **s < 0.0).count() % 2 == 1;
        if mirrored {
            self.flip_winding();
        }
    }

    pub fn translate(&mut self, offset: [f32; 3]) {
        for p in &mut self.positions {
            p[0] += offset[0];
            p[1] += offset[1];
            p[2] += offset[2];
        }
    }

    /// Apply a rigid transform to every vertex.
    pub fn transform(&mut self, iso: &Isometry3<f32>) {
        for p in &mut self.positions {
            let q = iso * Point3::new(p[0], p[1], p[2]);
            *p = [q.x, q.y, q.z];
        }
    }

    /// Reverse the vertex order of every triangle.
    pub fn flip_winding(&mut self) {
        for tri in self.indices.chunks_exact_mut(3) {
            tri.swap(1, 2);
        }
    }

    /// Axis-aligned bounds as `(min, max)`, or `None` for a mesh without
    /// vertices.
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let first = *self.positions.first()?;
        Some(self.positions.iter().fold((first, first), |(mut lo, mut hi), p| {
            for k in 0..3 {
                lo[k] = lo[k].min(p[k]);
                hi[k] = hi[k].max(p[k]);
            }
            (lo, hi)
        }))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
