//! Height functions for the basic terrain shapes.

use std::f32::consts::PI;

use crate::error::{ParameterError, finite, positive};
use crate::noise::Perlin;

/// Axis along which stairs climb or a ramp rises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    X,
    Y,
    /// Halfway between X and Y: progress is the mean of both.
    Diagonal,
}

impl Direction {
    /// Distance travelled along this direction for a local offset.
    fn distance(self, local: [f32; 2]) -> f32 {
        match self {
            Self::X => local[0],
            Self::Y => local[1],
            Self::Diagonal => (local[0] + local[1]) / 2.0,
        }
    }

    /// Length of a region of `size` along this direction.
    fn extent(self, size: [f32; 2]) -> f32 {
        self.distance(size)
    }
}

/// Height profile of a ramp as a function of progress in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Slope {
    #[default]
    Linear,
    Quadratic,
    /// Half a sine wave: flat at both ends.
    Sinusoidal,
}

impl Slope {
    pub fn apply(self, progress: f32) -> f32 {
        let p = progress.clamp(0.0, 1.0);
        match self {
            Self::Linear => p,
            Self::Quadratic => p * p,
            Self::Sinusoidal => ((p * PI - PI / 2.0).sin() + 1.0) / 2.0,
        }
    }
}

/// A terrain height function.
#[derive(Debug, Clone, PartialEq)]
pub enum TerrainShape {
    Flat,
    /// Steps of height `rise` every `run` meters: at distance `d` from the
    /// start edge the height is `rise * floor(d / run)`.
    Stairs {
        rise: f32,
        run: f32,
        direction: Direction,
    },
    /// Rises by `height` over the full extent along `direction`.
    Ramp {
        height: f32,
        direction: Direction,
        slope: Slope,
    },
    /// `base_height + amplitude * perlin(x * scale, y * scale)` in world
    /// coordinates.
    Noise {
        seed: u64,
        amplitude: f32,
        scale: f32,
        base_height: f32,
    },
}

impl TerrainShape {
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::Stairs { .. } => "stairs",
            Self::Ramp { .. } => "ramp",
            Self::Noise { .. } => "noise",
        }
    }

    pub fn validate(&self) -> Result<(), ParameterError> {
        match *self {
            Self::Flat => {}
            Self::Stairs { rise, run, .. } => {
                finite("rise", rise)?;
                positive("run", run)?;
            }
            Self::Ramp { height, .. } => {
                finite("height", height)?;
            }
            Self::Noise {
                amplitude,
                scale,
                base_height,
                ..
            } => {
                finite("amplitude", amplitude)?;
                positive("scale", scale)?;
                finite("base_height", base_height)?;
            }
        }
        Ok(())
    }

    /// Evaluator for this shape. Builds the noise table once.
    pub fn sampler(&self) -> ShapeSampler {
        let noise = match self {
            Self::Noise { seed, .. } => Some(Perlin::new(*seed)),
            _ => None,
        };
        ShapeSampler {
            shape: self.clone(),
            noise,
        }
    }
}

/// Evaluates a [`TerrainShape`] over a rectangular region.
#[derive(Debug, Clone)]
pub struct ShapeSampler {
    shape: TerrainShape,
    noise: Option<Perlin>,
}

impl ShapeSampler {
    pub fn shape(&self) -> &TerrainShape {
        &self.shape
    }

    /// Height at `local` (offset from the region's start corner) within a
    /// region of `size`. `world` is the absolute position, used by noise so
    /// neighbouring regions sharing a seed join seamlessly.
    pub fn height(&self, local: [f32; 2], size: [f32; 2], world: [f32; 2]) -> f32 {
        match self.shape {
            TerrainShape::Flat => 0.0,
            TerrainShape::Stairs {
                rise,
                run,
                direction,
            } => {
                let d = direction
                    .distance(local)
                    .clamp(0.0, direction.extent(size));
                // Absorb rounding so a vertex on a step edge lands on the upper step.
                rise * (d / run + 1.0e-5).floor()
            }
            TerrainShape::Ramp {
                height,
                direction,
                slope,
            } => {
                let extent = direction.extent(size);
                let progress = if extent > 0.0 {
                    direction.distance(local) / extent
                } else {
                    0.0
                };
                height * slope.apply(progress)
            }
            TerrainShape::Noise {
                amplitude,
                scale,
                base_height,
                ..
            } => {
                let n = self
                    .noise
                    .as_ref()
                    .map_or(0.0, |p| p.get(world[0] * scale, world[1] * scale));
                base_height + amplitude * n
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    const SIZE: [f32; 2] = [5.0, 5.0];

    fn at(shape: &TerrainShape, x: f32, y: f32) -> f32 {
        shape.sampler().height([x, y], SIZE, [x, y])
    }

    #[test]
    fn stairs_step_every_run() {
        let stairs = TerrainShape::Stairs {
            rise: 0.2,
            run: 0.3,
            direction: Direction::X,
        };
        assert_relative_eq!(at(&stairs, 0.0, 0.0), 0.0);
        assert_relative_eq!(at(&stairs, 0.29, 1.0), 0.0);
        assert_relative_eq!(at(&stairs, 0.3, 1.0), 0.2);
        assert_relative_eq!(at(&stairs, 0.95, 4.0), 0.6);
        assert_relative_eq!(at(&stairs, 5.0, 0.0), 0.2 * 16.0, epsilon = 1e-5);
        // Clamped to the region.
        assert_relative_eq!(at(&stairs, 9.0, 0.0), 0.2 * 16.0, epsilon = 1e-5);
    }

    #[test]
    fn stairs_along_y_ignore_x() {
        let stairs = TerrainShape::Stairs {
            rise: 0.5,
            run: 1.0,
            direction: Direction::Y,
        };
        assert_relative_eq!(at(&stairs, 4.0, 0.5), 0.0);
        assert_relative_eq!(at(&stairs, 0.0, 2.5), 1.0);
    }

    #[test]
    fn ramp_profiles() {
        let ramp = |slope| TerrainShape::Ramp {
            height: 2.0,
            direction: Direction::X,
            slope,
        };
        assert_relative_eq!(at(&ramp(Slope::Linear), 2.5, 0.0), 1.0);
        assert_relative_eq!(at(&ramp(Slope::Quadratic), 2.5, 0.0), 0.5);
        assert_relative_eq!(at(&ramp(Slope::Sinusoidal), 2.5, 0.0), 1.0, epsilon = 1e-6);
        assert_relative_eq!(at(&ramp(Slope::Sinusoidal), 5.0, 0.0), 2.0, epsilon = 1e-6);
        assert_relative_eq!(at(&ramp(Slope::Linear), 0.0, 3.0), 0.0);
    }

    #[test]
    fn diagonal_ramp_uses_mean_progress() {
        let ramp = TerrainShape::Ramp {
            height: 1.0,
            direction: Direction::Diagonal,
            slope: Slope::Linear,
        };
        assert_relative_eq!(at(&ramp, 5.0, 0.0), 0.5);
        assert_relative_eq!(at(&ramp, 5.0, 5.0), 1.0);
    }

    #[test]
    fn noise_is_seeded() {
        let noise = |seed| TerrainShape::Noise {
            seed,
            amplitude: 0.5,
            scale: 0.7,
            base_height: 1.0,
        };
        let a: Vec<f32> = (0..20).map(|k| at(&noise(3), k as f32 * 0.3, 1.1)).collect();
        let b: Vec<f32> = (0..20).map(|k| at(&noise(3), k as f32 * 0.3, 1.1)).collect();
        let c: Vec<f32> = (0..20).map(|k| at(&noise(4), k as f32 * 0.3, 1.1)).collect();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.iter().all(|h| (h - 1.0).abs() <= 0.75));
    }

    #[test]
    fn invalid_shapes_rejected() {
        let bad = [
            TerrainShape::Stairs {
                rise: 0.2,
                run: 0.0,
                direction: Direction::X,
            },
            TerrainShape::Ramp {
                height: f32::NAN,
                direction: Direction::Y,
                slope: Slope::Linear,
            },
            TerrainShape::Noise {
                seed: 0,
                amplitude: 1.0,
                scale: -1.0,
                base_height: 0.0,
            },
        ];
        for shape in &bad {
            assert!(shape.validate().is_err(), "{shape:?}");
        }
        assert!(TerrainShape::Flat.validate().is_ok());
    }
}
