//! Smooth guide surfaces through a set of key points.

use crate::error::{ParameterError, finite, positive};
use crate::heightfield::HeightField;
use crate::params::Bounds;

/// Points closer than this to a key point take its height exactly.
const SNAP_DISTANCE: f32 = 1.0e-6;

/// Inverse-distance-weighted surface: `z(p) = Σ wᵢ zᵢ / Σ wᵢ` with
/// `wᵢ = 1 / |p - pᵢ|^order`.
#[derive(Debug, Clone, PartialEq)]
pub struct HarmonicGuideSurface {
    key_points: Vec<[f32; 3]>,
    order: f32,
}

impl HarmonicGuideSurface {
    pub fn new(key_points: Vec<[f32; 3]>, order: f32) -> Result<Self, ParameterError> {
        if key_points.is_empty() {
            return Err(ParameterError::Empty("key point"));
        }
        for p in &key_points {
            for &c in p {
                finite("key point", c)?;
            }
        }
        positive("order", order)?;
        Ok(Self { key_points, order })
    }

    pub fn key_points(&self) -> &[[f32; 3]] {
        &self.key_points
    }

    /// Surface height at `(x, y)`.
    pub fn height(&self, x: f32, y: f32) -> f32 {
        let mut weighted = 0.0;
        let mut total = 0.0;
        for &[px, py, pz] in &self.key_points {
            let d = (x - px).hypot(y - py);
            if d < SNAP_DISTANCE {
                return pz;
            }
            let w = d.powf(-self.order);
            weighted += w * pz;
            total += w;
        }
        weighted / total
    }

    /// Sample the surface on a `rows × cols` grid over `bounds`.
    pub fn to_heightfield(
        &self,
        bounds: Bounds,
        rows: usize,
        cols: usize,
    ) -> Result<HeightField, ParameterError> {
        HeightField::from_fn(bounds, rows, cols, |x, y| self.height(x, y))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
