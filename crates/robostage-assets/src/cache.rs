//! Per-session geometry asset cache.
//!
//! The cache is an explicit object owned by one import session. Identical
//! geometry (same primitive parameters or same mesh file and scale, with the
//! same material) resolves to one shared [`GeometryAsset`].

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use bevy::log::debug;

use crate::error::ResourceError;
use crate::material::MaterialData;
use crate::mesh::MeshData;

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

fn bits<const N: usize>(values: [f32; N]) -> [u32; N] {
    values.map(f32::to_bits)
}

/// Identity of the geometry part of an asset.
///
/// Float parameters are stored as their bit patterns so equal parameters
/// hash equally.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GeometryKey {
    Box([u32; 3]),
    Cylinder { radius: u32, length: u32 },
    Sphere { radius: u32 },
    Ellipsoid([u32; 3]),
    /// Canonical absolute mesh path and scale.
    Mesh { path: PathBuf, scale: [u32; 3] },
}

impl GeometryKey {
    pub fn cuboid(size: [f32; 3]) -> Self {
        Self::Box(bits(size))
    }

    pub fn cylinder(radius: f32, length: f32) -> Self {
        Self::Cylinder {
            radius: radius.to_bits(),
            length: length.to_bits(),
        }
    }

    pub fn sphere(radius: f32) -> Self {
        Self::Sphere {
            radius: radius.to_bits(),
        }
    }

    pub fn ellipsoid(axes: [f32; 3]) -> Self {
        Self::Ellipsoid(bits(axes))
    }

    pub fn mesh(path: PathBuf, scale: [f32; 3]) -> Self {
        Self::Mesh {
            path,
            scale: bits(scale),
        }
    }
}

/// Material part of a resolution key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MaterialKey {
    pub name: String,
    pub color: [u32; 4],
    pub texture: Option<String>,
}

impl From<&MaterialData> for MaterialKey {
    fn from(m: &MaterialData) -> Self {
        Self {
            name: m.name.clone(),
            color: bits(m.base_color),
            texture: m.texture.clone(),
        }
    }
}

/// Deterministic cache key of a geometry asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolutionKey {
    pub geometry: GeometryKey,
    pub material: Option<MaterialKey>,
}

impl ResolutionKey {
    pub fn new(geometry: GeometryKey, material: Option<&MaterialData>) -> Self {
        Self {
            geometry,
            material: material.map(MaterialKey::from),
        }
    }
}

// ---------------------------------------------------------------------------
// GeometryAsset
// ---------------------------------------------------------------------------

/// A resolved mesh together with its material.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryAsset {
    pub key: ResolutionKey,
    pub mesh: Arc<MeshData>,
    pub material: Option<MaterialData>,
}

// ---------------------------------------------------------------------------
// GeometryCache
// ---------------------------------------------------------------------------

/// Session-scoped map from resolution key to shared asset.
///
/// Meshes are cached separately from assets so one mesh file used with
/// several materials is only decoded once. Failed loads are not stored.
#[derive(Debug, Default)]
pub struct GeometryCache {
    assets: HashMap<ResolutionKey, Arc<GeometryAsset>>,
    meshes: HashMap<GeometryKey, Arc<MeshData>>,
    hits: usize,
    misses: usize,
}

impl GeometryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the asset for `key`, building its mesh with `build` on a miss.
    pub fn get_or_try_insert<F>(
        &mut self,
        key: ResolutionKey,
        material: Option<MaterialData>,
        build: F,
    ) -> Result<Arc<GeometryAsset>, ResourceError>
    where
        F: FnOnce() -> Result<MeshData, ResourceError>,
    {
        if let Some(asset) = self.assets.get(&key) {
            self.hits += 1;
            debug!("geometry cache hit: {:?}", key.geometry);
            return Ok(Arc::clone(asset));
        }
        self.misses += 1;

        let mesh = match self.meshes.get(&key.geometry) {
            Some(mesh) => Arc::clone(mesh),
            None => {
                let mesh = Arc::new(build()?);
                self.meshes.insert(key.geometry.clone(), Arc::clone(&mesh));
                mesh
            }
        };

        let asset = Arc::new(GeometryAsset {
            key: key.clone(),
            mesh,
            material,
        });
        self.assets.insert(key, Arc::clone(&asset));
        Ok(asset)
    }

    pub fn get(&self, key: &ResolutionKey) -> Option<&Arc<GeometryAsset>> {
        self.assets.get(key)
    }

    /// Number of distinct assets.
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Number of distinct meshes backing the assets.
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }

    pub fn clear(&mut self) {
        self.assets.clear();
        self.meshes.clear();
        self.hits = 0;
        self.misses = 0;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::box_mesh;

    fn red() -> MaterialData {
        MaterialData {
            name: "red".into(),
            base_color: [1.0, 0.0, 0.0, 1.0],
            texture: None,
        }
    }

    #[test]
    fn equal_parameters_give_equal_keys() {
        assert_eq!(GeometryKey::cuboid([1.0, 2.0, 3.0]), GeometryKey::cuboid([1.0, 2.0, 3.0]));
        assert_ne!(GeometryKey::cuboid([1.0, 2.0, 3.0]), GeometryKey::cuboid([1.0, 2.0, 3.5]));
        assert_ne!(GeometryKey::sphere(1.0), GeometryKey::cylinder(1.0, 1.0));
    }

    #[test]
    fn same_key_returns_same_arc() {
        let mut cache = GeometryCache::new();
        let key = ResolutionKey::new(GeometryKey::cuboid([1.0; 3]), None);
        let a = cache
            .get_or_try_insert(key.clone(), None, || box_mesh([1.0; 3]))
            .unwrap();
        let b = cache
            .get_or_try_insert(key, None, || panic!("must not rebuild"))
            .unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);
    }

    #[test]
    fn material_splits_assets_but_shares_mesh() {
        let mut cache = GeometryCache::new();
        let geometry = GeometryKey::cuboid([1.0; 3]);
        let plain = cache
            .get_or_try_insert(ResolutionKey::new(geometry.clone(), None), None, || {
                box_mesh([1.0; 3])
            })
            .unwrap();
        let red = red();
        let tinted = cache
            .get_or_try_insert(
                ResolutionKey::new(geometry, Some(&red)),
                Some(red.clone()),
                || panic!("mesh already cached"),
            )
            .unwrap();
        assert!(!Arc::ptr_eq(&plain, &tinted));
        assert!(Arc::ptr_eq(&plain.mesh, &tinted.mesh));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.mesh_count(), 1);
    }

    #[test]
    fn failures_are_not_cached() {
        let mut cache = GeometryCache::new();
        let key = ResolutionKey::new(GeometryKey::mesh("/nope.obj".into(), [1.0; 3]), None);
        let fail = || {
            Err(ResourceError::NotFound {
                uri: "/nope.obj".into(),
                searched: Vec::new(),
            })
        };
        assert!(cache.get_or_try_insert(key.clone(), None, fail).is_err());
        assert!(cache.get_or_try_insert(key, None, fail).is_err());
        assert!(cache.is_empty());
        assert_eq!(cache.misses(), 2);
    }
}
