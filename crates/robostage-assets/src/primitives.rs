//! Triangle meshes for URDF primitive shapes.
//!
//! All primitives are centred on the origin. Cylinders run along the local
//! Z axis as URDF defines them.

use std::f32::consts::{PI, TAU};

use crate::error::ResourceError;
use crate::mesh::MeshData;

pub const CYLINDER_SEGMENTS: u32 = 32;
pub const SPHERE_SEGMENTS: u32 = 32;
pub const SPHERE_RINGS: u32 = 16;

fn check_positive(kind: &'static str, name: &str, value: f32) -> Result<(), ResourceError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ResourceError::InvalidPrimitive {
            kind,
            message: format!("{name} must be positive and finite, got {value}"),
        })
    }
}

/// Axis-aligned box with edge lengths `size`.
pub fn box_mesh(size: [f32; 3]) -> Result<MeshData, ResourceError> {
    for (name, v) in ["x", "y", "z"].iter().zip(size) {
        check_positive("box", name, v)?;
    }
    let h = size.map(|s| s * 0.5);
    // Corner `i` takes the positive half extent on axis k when bit k is set.
    let positions = (0..8u32)
        .map(|i| {
            [
                if i & 1 == 0 { -h[0] } else { h[0] },
                if i & 2 == 0 { -h[1] } else { h[1] },
                if i & 4 == 0 { -h[2] } else { h[2] },
            ]
        })
        .collect();
    let indices = vec![
        0, 3, 1, 0, 2, 3, // -z
        4, 5, 7, 4, 7, 6, // +z
        0, 1, 5, 0, 5, 4, // -y
        2, 7, 3, 2, 6, 7, // +y
        0, 4, 6, 0, 6, 2, // -x
        1, 3, 7, 1, 7, 5, // +x
    ];
    Ok(MeshData { positions, indices })
}

/// Closed cylinder along Z with `segments` sides.
pub fn cylinder_mesh(radius: f32, length: f32, segments: u32) -> Result<MeshData, ResourceError> {
    check_positive("cylinder", "radius", radius)?;
    check_positive("cylinder", "length", length)?;
    let segments = segments.max(3);
    let half = length * 0.5;

    let mut positions = Vec::with_capacity(2 * segments as usize + 2);
    for z in [-half, half] {
        for s in 0..segments {
            let phi = TAU * s as f32 / segments as f32;
            positions.push([radius * phi.cos(), radius * phi.sin(), z]);
        }
    }
    let bottom_centre = 2 * segments;
    let top_centre = bottom_centre + 1;
    positions.push([0.0, 0.0, -half]);
    positions.push([0.0, 0.0, half]);

    let mut indices = Vec::with_capacity(12 * segments as usize);
    for s in 0..segments {
        let next = (s + 1) % segments;
        let (b0, b1) = (s, next);
        let (t0, t1) = (segments + s, segments + next);
        indices.extend_from_slice(&[b0, b1, t1, b0, t1, t0]);
        indices.extend_from_slice(&[top_centre, t0, t1]);
        indices.extend_from_slice(&[bottom_centre, b1, b0]);
    }
    Ok(MeshData { positions, indices })
}

/// UV sphere.
pub fn sphere_mesh(radius: f32, segments: u32, rings: u32) -> Result<MeshData, ResourceError> {
    check_positive("sphere", "radius", radius)?;
    Ok(uv_ellipsoid([radius; 3], segments, rings))
}

/// UV ellipsoid with semi-axes `axes` along X, Y and Z.
pub fn ellipsoid_mesh(axes: [f32; 3], segments: u32, rings: u32) -> Result<MeshData, ResourceError> {
    for (name, v) in ["a", "b", "c"].iter().zip(axes) {
        check_positive("ellipsoid", name, v)?;
    }
    Ok(uv_ellipsoid(axes, segments, rings))
}

fn uv_ellipsoid(axes: [f32; 3], segments: u32, rings: u32) -> MeshData {
    let segments = segments.max(3);
    let rings = rings.max(2);

    let mut positions = Vec::with_capacity(((rings + 1) * segments) as usize);
    for r in 0..=rings {
        let theta = PI * r as f32 / rings as f32;
        let (st, ct) = theta.sin_cos();
        for s in 0..segments {
            let (sp, cp) = (TAU * s as f32 / segments as f32).sin_cos();
            positions.push([axes[0] * st * cp, axes[1] * st * sp, axes[2] * ct]);
        }
    }

    let mut indices = Vec::new();
    for r in 0..rings {
        for s in 0..segments {
            let next = (s + 1) % segments;
            let i0 = r * segments + s;
            let i1 = r * segments + next;
            let i2 = (r + 1) * segments + s;
            let i3 = (r + 1) * segments + next;
            // Pole rows collapse to a point; skip their degenerate halves.
            if r != 0 {
                indices.extend_from_slice(&[i0, i2, i1]);
            }
            if r != rings - 1 {
                indices.extend_from_slice(&[i1, i2, i3]);
            }
        }
    }
    MeshData { positions, indices }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
