//! Terrain extents and grid layout.

use robostage_core::TerrainConfig;

use crate::error::{ParameterError, finite, positive};

/// Upper bound on grid vertices for a single height field.
pub const MAX_CELLS: usize = 16 * 1024 * 1024;

/// Axis-aligned rectangle in the XY plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl Bounds {
    /// Rectangle of `width` × `depth` centred on `(x, y)`.
    pub fn centered(x: f32, y: f32, width: f32, depth: f32) -> Self {
        Self {
            min_x: x - width / 2.0,
            max_x: x + width / 2.0,
            min_y: y - depth / 2.0,
            max_y: y + depth / 2.0,
        }
    }

    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn depth(&self) -> f32 {
        self.max_y - self.min_y
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        (self.min_x..=self.max_x).contains(&x) && (self.min_y..=self.max_y).contains(&y)
    }
}

/// Size and placement of a generated terrain.
///
/// The terrain spans `width` along X and `depth` along Y, centred on
/// `origin`'s XY with heights offset by `origin[2]`. The grid spacing is
/// the closest spacing to `cell_size` that divides each side evenly, so
/// the outermost vertices lie exactly on the terrain edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainParams {
    pub width: f32,
    pub depth: f32,
    pub cell_size: f32,
    pub origin: [f32; 3],
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            width: 10.0,
            depth: 10.0,
            cell_size: 0.2,
            origin: [0.0; 3],
        }
    }
}

impl TerrainParams {
    pub fn new(width: f32, depth: f32, cell_size: f32) -> Self {
        Self {
            width,
            depth,
            cell_size,
            origin: [0.0; 3],
        }
    }

    #[must_use]
    pub const fn at(mut self, origin: [f32; 3]) -> Self {
        self.origin = origin;
        self
    }

    /// Parameters whose grid has the configured resolution along X.
    pub fn from_config(width: f32, depth: f32, config: &TerrainConfig) -> Self {
        let steps = config.resolution[0].saturating_sub(1).max(1);
        Self::new(width, depth, width / steps as f32)
    }

    pub fn validate(&self) -> Result<(), ParameterError> {
        positive("width", self.width)?;
        positive("depth", self.depth)?;
        positive("cell_size", self.cell_size)?;
        for v in self.origin {
            finite("origin", v)?;
        }
        let (rows, cols) = self.grid_size();
        if rows.saturating_mul(cols) > MAX_CELLS {
            return Err(ParameterError::Grid {
                rows,
                cols,
                max: MAX_CELLS,
            });
        }
        Ok(())
    }

    /// Vertices along X and Y. At least two on each side.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn grid_size(&self) -> (usize, usize) {
        let count = |extent: f32| ((extent / self.cell_size).round().max(1.0) as usize) + 1;
        (count(self.width), count(self.depth))
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::centered(self.origin[0], self.origin[1], self.width, self.depth)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
