//! Regular height grids and their triangle meshes.

use robostage_assets::MeshData;

use crate::error::ParameterError;
use crate::params::{Bounds, MAX_CELLS};

/// Heights sampled on a regular grid over `bounds`.
///
/// Row `i` runs along X, column `j` along Y. Vertex `(i, j)` sits at
/// `x = min_x + width * i / (rows - 1)`, `y = min_y + depth * j / (cols - 1)`.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightField {
    rows: usize,
    cols: usize,
    heights: Vec<f32>,
    bounds: Bounds,
}

impl HeightField {
    /// Constant-height field.
    pub fn flat(
        bounds: Bounds,
        rows: usize,
        cols: usize,
        height: f32,
    ) -> Result<Self, ParameterError> {
        check_grid(rows, cols)?;
        Ok(Self {
            rows,
            cols,
            heights: vec![height; rows * cols],
            bounds,
        })
    }

    /// Field from row-major heights.
    pub fn from_heights(
        bounds: Bounds,
        rows: usize,
        cols: usize,
        heights: Vec<f32>,
    ) -> Result<Self, ParameterError> {
        check_grid(rows, cols)?;
        if heights.len() != rows * cols {
            return Err(ParameterError::ShapeMismatch {
                expected: (rows, cols),
                found: (heights.len() / cols, heights.len() % cols),
            });
        }
        Ok(Self {
            rows,
            cols,
            heights,
            bounds,
        })
    }

    /// Sample `f(x, y)` at every grid vertex.
    pub fn from_fn<F>(
        bounds: Bounds,
        rows: usize,
        cols: usize,
        mut f: F,
    ) -> Result<Self, ParameterError>
    where
        F: FnMut(f32, f32) -> f32,
    {
        let mut field = Self::flat(bounds, rows, cols, 0.0)?;
        for i in 0..rows {
            for j in 0..cols {
                let [x, y] = field.xy(i, j);
                field.heights[i * cols + j] = f(x, y);
            }
        }
        Ok(field)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f32> {
        (i < self.rows && j < self.cols).then(|| self.heights[i * self.cols + j])
    }

    pub fn set(&mut self, i: usize, j: usize, height: f32) {
        if i < self.rows && j < self.cols {
            self.heights[i * self.cols + j] = height;
        }
    }

    /// XY position of vertex `(i, j)`.
    pub fn xy(&self, i: usize, j: usize) -> [f32; 2] {
        let u = i as f32 / (self.rows - 1) as f32;
        let v = j as f32 / (self.cols - 1) as f32;
        [
            self.bounds.min_x + self.bounds.width() * u,
            self.bounds.min_y + self.bounds.depth() * v,
        ]
    }

    /// Nearest grid vertex to `(x, y)`, clamped to the field.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn nearest(&self, x: f32, y: f32) -> (usize, usize) {
        let u = ((x - self.bounds.min_x) / self.bounds.width()).clamp(0.0, 1.0);
        let v = ((y - self.bounds.min_y) / self.bounds.depth()).clamp(0.0, 1.0);
        (
            (u * (self.rows - 1) as f32).round() as usize,
            (v * (self.cols - 1) as f32).round() as usize,
        )
    }

    /// Height of the vertex nearest to `(x, y)`.
    pub fn height_at(&self, x: f32, y: f32) -> f32 {
        let (i, j) = self.nearest(x, y);
        self.heights[i * self.cols + j]
    }

    pub fn max_height(&self) -> f32 {
        self.heights.iter().copied().fold(f32::NEG_INFINITY, f32::max)
    }

    pub fn min_height(&self) -> f32 {
        self.heights.iter().copied().fold(f32::INFINITY, f32::min)
    }

    /// Apply `f(x, y, height)` to every vertex.
    pub fn map<F>(&mut self, mut f: F)
    where
        F: FnMut(f32, f32, f32) -> f32,
    {
        for i in 0..self.rows {
            for j in 0..self.cols {
                let [x, y] = self.xy(i, j);
                let h = &mut self.heights[i * self.cols + j];
                *h = f(x, y, *h);
            }
        }
    }

    /// Add a constant to every height.
    pub fn offset(&mut self, dz: f32) {
        for h in &mut self.heights {
            *h += dz;
        }
    }

    /// Triangulated grid with faces pointing up (+Z).
    ///
    /// Each grid cell is the quad `v1 = i*cols + j`, `v2 = v1 + 1`,
    /// `v3 = v1 + cols + 1`, `v4 = v1 + cols`, split along `v1`–`v3`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_mesh(&self) -> MeshData {
        let mut positions = Vec::with_capacity(self.rows * self.cols);
        for i in 0..self.rows {
            for j in 0..self.cols {
                let [x, y] = self.xy(i, j);
                positions.push([x, y, self.heights[i * self.cols + j]]);
            }
        }

        let cols = self.cols as u32;
        let mut indices = Vec::with_capacity((self.rows - 1) * (self.cols - 1) * 6);
        for i in 0..self.rows as u32 - 1 {
            for j in 0..cols - 1 {
                let v1 = i * cols + j;
                let v2 = v1 + 1;
                let v3 = v1 + cols + 1;
                let v4 = v1 + cols;
                indices.extend_from_slice(&[v1, v4, v3, v1, v3, v2]);
            }
        }
        MeshData { positions, indices }
    }
}

fn check_grid(rows: usize, cols: usize) -> Result<(), ParameterError> {
    if rows < 2 || cols < 2 || rows.saturating_mul(cols) > MAX_CELLS {
        return Err(ParameterError::Grid {
            rows,
            cols,
            max: MAX_CELLS,
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
