//! Grids of randomly chosen terrain patches with smooth transitions.
//!
//! The terrain is split into `nx × ny` equal patches. Each patch draws a
//! shape from a palette and a base height that stays within
//! `max_height_diff` of its already-placed neighbours. Near every internal
//! patch edge the two adjacent patch functions are evaluated at the same
//! point and mixed with a transition weight, first along X and then along
//! Y, so the seams are continuous.

use std::f32::consts::PI;

use bevy::log::debug;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use robostage_core::seed::derive_seed_indexed;

use crate::error::{ParameterError, finite};
use crate::heightfield::HeightField;
use crate::params::TerrainParams;
use crate::shapes::{Direction, ShapeSampler, Slope, TerrainShape};

/// Largest allowed padding, as a fraction of a patch.
pub const MAX_PADDING_RATIO: f32 = 0.4;

/// Blend weight profile across a patch seam.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    /// `(1 - cos(πt)) / 2`.
    Cosine,
    /// Logistic curve centred on the seam, rescaled to hit 0 and 1 at the
    /// ends of the blend zone.
    Sigmoid { steepness: f32 },
}

impl Transition {
    /// Cosine below 0.5, a sigmoid of steepness `5 * smoothness` above.
    pub fn from_smoothness(smoothness: f32) -> Self {
        if smoothness < 0.5 {
            Self::Cosine
        } else {
            Self::Sigmoid {
                steepness: 5.0 * smoothness,
            }
        }
    }

    /// Weight of the far patch at `t ∈ [0, 1]` across the blend zone.
    pub fn weight(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Cosine => (1.0 - (PI * t).cos()) / 2.0,
            Self::Sigmoid { steepness } => {
                let s = |x: f32| 1.0 / (1.0 + (-steepness * (x - 0.5) * 2.0).exp());
                let (lo, hi) = (s(0.0), s(1.0));
                if hi - lo <= f32::EPSILON {
                    t
                } else {
                    (s(t) - lo) / (hi - lo)
                }
            }
        }
    }
}

/// Settings for [`generate_patches`].
#[derive(Debug, Clone, PartialEq)]
pub struct PatchConfig {
    /// Patches along X and Y.
    pub patches: [usize; 2],
    /// Shapes to choose from, uniformly.
    pub palette: Vec<TerrainShape>,
    /// Re-roll stair and ramp directions per patch.
    pub random_directions: bool,
    /// Blend half-width as a fraction of a patch, clamped to
    /// [`MAX_PADDING_RATIO`].
    pub padding_ratio: f32,
    pub transition: Transition,
    /// Largest base-height step between neighbouring patches. Ramp heights
    /// are capped to this and noise amplitudes to half of it.
    pub max_height_diff: f32,
    pub seed: u64,
}

impl Default for PatchConfig {
    fn default() -> Self {
        Self {
            patches: [3, 3],
            palette: default_palette(),
            random_directions: true,
            padding_ratio: 0.15,
            transition: Transition::from_smoothness(0.5),
            max_height_diff: 0.3,
            seed: 0,
        }
    }
}

impl PatchConfig {
    pub fn validate(&self) -> Result<(), ParameterError> {
        let [nx, ny] = self.patches;
        if nx == 0 || ny == 0 {
            return Err(ParameterError::Empty("patch per axis"));
        }
        if self.palette.is_empty() {
            return Err(ParameterError::Empty("palette shape"));
        }
        for shape in &self.palette {
            shape.validate()?;
        }
        finite("padding_ratio", self.padding_ratio)?;
        if self.padding_ratio < 0.0 {
            return Err(ParameterError::InvalidRange {
                name: "padding_ratio",
                min: 0.0,
                max: self.padding_ratio,
            });
        }
        finite("max_height_diff", self.max_height_diff)?;
        if self.max_height_diff < 0.0 {
            return Err(ParameterError::InvalidRange {
                name: "max_height_diff",
                min: 0.0,
                max: self.max_height_diff,
            });
        }
        if let Transition::Sigmoid { steepness } = self.transition {
            finite("steepness", steepness)?;
        }
        Ok(())
    }
}

/// Flat ground, stairs, ramp and gentle noise.
pub fn default_palette() -> Vec<TerrainShape> {
    vec![
        TerrainShape::Flat,
        TerrainShape::Stairs {
            rise: 0.1,
            run: 0.5,
            direction: Direction::X,
        },
        TerrainShape::Ramp {
            height: 0.3,
            direction: Direction::X,
            slope: Slope::Sinusoidal,
        },
        TerrainShape::Noise {
            seed: 0,
            amplitude: 0.1,
            scale: 1.0,
            base_height: 0.0,
        },
    ]
}

/// What was placed in one patch.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchInfo {
    /// `[ix, iy]` position in the patch grid.
    pub index: [usize; 2],
    pub shape: TerrainShape,
    pub base_height: f32,
}

/// Output of [`generate_patches`].
#[derive(Debug, Clone, PartialEq)]
pub struct PatchTerrain {
    pub field: HeightField,
    /// Patches in X-major order.
    pub patches: Vec<PatchInfo>,
}

impl PatchTerrain {
    pub fn patch(&self, ix: usize, iy: usize) -> Option<&PatchInfo> {
        self.patches.iter().find(|p| p.index == [ix, iy])
    }
}

struct Patch {
    sampler: ShapeSampler,
    base: f32,
    corner: [f32; 2],
}

/// Generate a patch-grid terrain. The same seed always gives the same
/// terrain.
pub fn generate_patches(
    params: &TerrainParams,
    config: &PatchConfig,
) -> Result<PatchTerrain, ParameterError> {
    params.validate()?;
    config.validate()?;

    let [nx, ny] = config.patches;
    let bounds = params.bounds();
    let patch_size = [params.width / nx as f32, params.depth / ny as f32];
    let padding = config.padding_ratio.min(MAX_PADDING_RATIO);
    let mhd = config.max_height_diff;
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

    let mut infos: Vec<PatchInfo> = Vec::with_capacity(nx * ny);
    let mut patches: Vec<Patch> = Vec::with_capacity(nx * ny);
    for ix in 0..nx {
        for iy in 0..ny {
            let Some(chosen) = config.palette.choose(&mut rng) else {
                return Err(ParameterError::Empty("palette shape"));
            };
            let shape = adapt_shape(chosen, config, (ix * ny + iy) as u64, &mut rng);

            let neighbours: Vec<f32> = [
                ix.checked_sub(1).map(|x| x * ny + iy),
                iy.checked_sub(1).map(|y| ix * ny + y),
            ]
            .into_iter()
            .flatten()
            .map(|k| infos[k].base_height)
            .collect();
            let base = if neighbours.is_empty() {
                rng.gen_range(-0.1..=0.1)
            } else {
                let mean = neighbours.iter().sum::<f32>() / neighbours.len() as f32;
                mean + rng.gen_range(-mhd / 2.0..=mhd / 2.0)
            };

            patches.push(Patch {
                sampler: shape.sampler(),
                base,
                corner: [
                    bounds.min_x + ix as f32 * patch_size[0],
                    bounds.min_y + iy as f32 * patch_size[1],
                ],
            });
            infos.push(PatchInfo {
                index: [ix, iy],
                shape,
                base_height: base,
            });
        }
    }

    let patch_height = |ix: usize, iy: usize, x: f32, y: f32| {
        let patch = &patches[ix * ny + iy];
        let local = [x - patch.corner[0], y - patch.corner[1]];
        patch.base + patch.sampler.height(local, patch_size, [x, y])
    };

    let radius = [padding * patch_size[0], padding * patch_size[1]];
    let (rows, cols) = params.grid_size();
    let mut field = HeightField::from_fn(bounds, rows, cols, |x, y| {
        let lx = x - bounds.min_x;
        let ly = y - bounds.min_y;
        blend(ly, patch_size[1], ny, radius[1], config.transition, |iy| {
            blend(lx, patch_size[0], nx, radius[0], config.transition, |ix| {
                patch_height(ix, iy, x, y)
            })
        })
    })?;
    field.offset(params.origin[2]);

    debug!(
        "generated {nx}x{ny} patch terrain (seed {}): heights {:.3}..{:.3}",
        config.seed,
        field.min_height(),
        field.max_height()
    );
    Ok(PatchTerrain {
        field,
        patches: infos,
    })
}

/// Apply per-patch limits and randomisation to a palette shape.
fn adapt_shape(
    shape: &TerrainShape,
    config: &PatchConfig,
    patch_index: u64,
    rng: &mut ChaCha8Rng,
) -> TerrainShape {
    let mhd = config.max_height_diff;
    match *shape {
        TerrainShape::Flat => TerrainShape::Flat,
        TerrainShape::Stairs {
            rise,
            run,
            direction,
        } => TerrainShape::Stairs {
            rise,
            run,
            direction: if config.random_directions {
                *[Direction::X, Direction::Y]
                    .choose(rng)
                    .unwrap_or(&direction)
            } else {
                direction
            },
        },
        TerrainShape::Ramp {
            height,
            direction,
            slope,
        } => TerrainShape::Ramp {
            height: height.min(mhd),
            direction: if config.random_directions {
                *[Direction::X, Direction::Y, Direction::Diagonal]
                    .choose(rng)
                    .unwrap_or(&direction)
            } else {
                direction
            },
            slope,
        },
        TerrainShape::Noise {
            amplitude,
            scale,
            base_height,
            ..
        } => TerrainShape::Noise {
            seed: derive_seed_indexed(config.seed, patch_index),
            amplitude: amplitude.min(mhd / 2.0),
            scale,
            base_height,
        },
    }
}

/// Height at offset `coord` along one axis split into `count` cells of
/// `cell`, where `height(k)` evaluates cell `k` at the current point.
/// Within `radius` of an internal edge the two adjacent cells are mixed.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn blend<F>(coord: f32, cell: f32, count: usize, radius: f32, transition: Transition, height: F) -> f32
where
    F: Fn(usize) -> f32,
{
    let k = ((coord / cell).floor().max(0.0) as usize).min(count - 1);
    if radius <= 0.0 {
        return height(k);
    }
    let start = k as f32 * cell;
    let end = start + cell;
    if k > 0 && coord - start < radius {
        let w = transition.weight((coord - (start - radius)) / (2.0 * radius));
        (1.0 - w) * height(k - 1) + w * height(k)
    } else if k + 1 < count && end - coord < radius {
        let w = transition.weight((coord - (end - radius)) / (2.0 * radius));
        (1.0 - w) * height(k) + w * height(k + 1)
    } else {
        height(k)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
