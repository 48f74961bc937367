//! Resolved material data.

use robostage_urdf::Material;

/// Colour assigned when a visual carries no material.
pub const DEFAULT_COLOR: [f32; 4] = [0.8, 0.8, 0.8, 1.0];

/// Material as handed to the host scene.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialData {
    pub name: String,
    pub base_color: [f32; 4],
    pub texture: Option<String>,
}

impl MaterialData {
    pub fn from_urdf(material: &Material) -> Self {
        Self {
            name: material.name.clone(),
            base_color: material.color.unwrap_or(DEFAULT_COLOR),
            texture: material.texture.clone(),
        }
    }
}

impl Default for MaterialData {
    fn default() -> Self {
        Self {
            name: String::new(),
            base_color: DEFAULT_COLOR,
            texture: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
