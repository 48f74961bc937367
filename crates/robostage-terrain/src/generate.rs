//! Single-shape and sectioned terrain generation.

use bevy::log::debug;

use crate::error::ParameterError;
use crate::heightfield::HeightField;
use crate::params::TerrainParams;
use crate::shapes::{Direction, Slope, TerrainShape};

/// Sample `shape` over the whole terrain.
///
/// Heights are measured from `params.origin[2]`; shapes that grow along a
/// direction start at the terrain's minimum X or Y edge.
pub fn generate(params: &TerrainParams, shape: &TerrainShape) -> Result<HeightField, ParameterError> {
    params.validate()?;
    shape.validate()?;

    let bounds = params.bounds();
    let (rows, cols) = params.grid_size();
    let size = [params.width, params.depth];
    let sampler = shape.sampler();
    let mut field = HeightField::from_fn(bounds, rows, cols, |x, y| {
        sampler.height([x - bounds.min_x, y - bounds.min_y], size, [x, y])
    })?;
    field.offset(params.origin[2]);

    debug!(
        "generated {} terrain: {rows}x{cols} vertices, heights {:.3}..{:.3}",
        shape.kind(),
        field.min_height(),
        field.max_height()
    );
    Ok(field)
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// A shape applied to a rectangular part of the terrain.
///
/// `x` and `y` are relative ranges in `[0, 1]` of the terrain's width and
/// depth.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainSection {
    pub x: [f32; 2],
    pub y: [f32; 2],
    pub shape: TerrainShape,
}

impl TerrainSection {
    pub fn new(x: [f32; 2], y: [f32; 2], shape: TerrainShape) -> Self {
        Self { x, y, shape }
    }

    fn validate(&self, index: usize) -> Result<(), ParameterError> {
        for (axis, [lo, hi]) in [("x", self.x), ("y", self.y)] {
            if !(lo.is_finite() && hi.is_finite() && 0.0 <= lo && lo < hi && hi <= 1.0) {
                return Err(ParameterError::Section {
                    index,
                    message: format!("{axis} range [{lo}, {hi}] is not within [0, 1]"),
                });
            }
        }
        self.shape
            .validate()
            .map_err(|e| ParameterError::Section {
                index,
                message: e.to_string(),
            })
    }

    /// Whether relative position `(u, v)` falls in this section. Ranges are
    /// half-open except at the far terrain edge.
    fn contains(&self, u: f32, v: f32) -> bool {
        let within = |[lo, hi]: [f32; 2], t: f32| lo <= t && (t < hi || (hi >= 1.0 && t <= 1.0));
        within(self.x, u) && within(self.y, v)
    }
}

/// Quarter split used when no sections are given: flat, stairs, ramp and
/// noise, in that order.
pub fn default_sections(params: &TerrainParams) -> Vec<TerrainSection> {
    vec![
        TerrainSection::new([0.0, 0.5], [0.0, 0.5], TerrainShape::Flat),
        TerrainSection::new(
            [0.5, 1.0],
            [0.0, 0.5],
            TerrainShape::Stairs {
                rise: 0.2,
                run: params.width * 0.5 / 5.0,
                direction: Direction::X,
            },
        ),
        TerrainSection::new(
            [0.0, 0.5],
            [0.5, 1.0],
            TerrainShape::Ramp {
                height: 1.0,
                direction: Direction::X,
                slope: Slope::Linear,
            },
        ),
        TerrainSection::new(
            [0.5, 1.0],
            [0.5, 1.0],
            TerrainShape::Noise {
                seed: 0,
                amplitude: 0.3,
                scale: 0.5,
                base_height: 0.0,
            },
        ),
    ]
}

/// Terrain made of several sections, each with its own shape.
///
/// A vertex takes its height from the last section that covers it;
/// vertices outside every section stay at the base height. Each shape is
/// evaluated relative to its own section's start corner.
pub fn generate_combined(
    params: &TerrainParams,
    sections: &[TerrainSection],
) -> Result<HeightField, ParameterError> {
    params.validate()?;
    if sections.is_empty() {
        return Err(ParameterError::Empty("section"));
    }
    for (index, section) in sections.iter().enumerate() {
        section.validate(index)?;
    }

    let bounds = params.bounds();
    let (rows, cols) = params.grid_size();
    let samplers: Vec<_> = sections.iter().map(|s| s.shape.sampler()).collect();
    let mut field = HeightField::flat(bounds, rows, cols, 0.0)?;

    for i in 0..rows {
        let u = i as f32 / (rows - 1) as f32;
        for j in 0..cols {
            let v = j as f32 / (cols - 1) as f32;
            let Some(k) = sections.iter().rposition(|s| s.contains(u, v)) else {
                continue;
            };
            let section = &sections[k];
            let local = [
                (u - section.x[0]) * params.width,
                (v - section.y[0]) * params.depth,
            ];
            let size = [
                (section.x[1] - section.x[0]) * params.width,
                (section.y[1] - section.y[0]) * params.depth,
            ];
            let [x, y] = field.xy(i, j);
            field.set(i, j, samplers[k].height(local, size, [x, y]));
        }
    }
    field.offset(params.origin[2]);

    debug!(
        "generated combined terrain with {} sections: {rows}x{cols} vertices",
        sections.len()
    );
    Ok(field)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
