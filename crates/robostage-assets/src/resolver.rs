//! Visual geometry resolution.

use std::path::Path;
use std::sync::Arc;

use bevy::log::{debug, warn};
use nalgebra::Isometry3;
use robostage_urdf::{Geometry, LinkData, Visual, origin_to_isometry};

use crate::cache::{GeometryAsset, GeometryCache, GeometryKey, ResolutionKey};
use crate::error::ResourceError;
use crate::importer::{MeshImporter, ObjImporter};
use crate::locator::MeshLocator;
use crate::material::MaterialData;
use crate::mesh::MeshData;
use crate::primitives::{
    CYLINDER_SEGMENTS, SPHERE_RINGS, SPHERE_SEGMENTS, box_mesh, cylinder_mesh, sphere_mesh,
};

/// A visual element ready to attach to a scene node.
#[derive(Debug, Clone)]
pub struct ResolvedVisual {
    pub name: Option<String>,
    /// Pose of the visual in its link frame.
    pub origin: Isometry3<f32>,
    pub asset: Arc<GeometryAsset>,
}

/// Result of resolving every visual of one link.
///
/// Failed visuals are left out of `visuals` and listed in `failures`.
#[derive(Debug, Default)]
pub struct LinkGeometry {
    pub visuals: Vec<ResolvedVisual>,
    pub failures: Vec<ResourceError>,
}

/// Turns URDF visuals into cached [`GeometryAsset`]s.
pub struct GeometryResolver {
    locator: MeshLocator,
    importer: Box<dyn MeshImporter>,
    cache: GeometryCache,
    load_meshes: bool,
}

impl std::fmt::Debug for GeometryResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeometryResolver")
            .field("locator", &self.locator)
            .field("cache", &self.cache)
            .field("load_meshes", &self.load_meshes)
            .finish_non_exhaustive()
    }
}

impl GeometryResolver {
    /// Resolver with the OBJ importer and an empty cache.
    pub fn new(locator: MeshLocator) -> Self {
        Self::with_importer(locator, Box::new(ObjImporter))
    }

    pub fn with_importer(locator: MeshLocator, importer: Box<dyn MeshImporter>) -> Self {
        Self {
            locator,
            importer,
            cache: GeometryCache::new(),
            load_meshes: true,
        }
    }

    /// Resolver for a description file: relative mesh paths are taken from
    /// the file's directory.
    pub fn for_description(path: &Path, package_roots: Vec<std::path::PathBuf>) -> Self {
        Self::new(MeshLocator::new(
            path.parent().map(Path::to_path_buf),
            package_roots,
        ))
    }

    /// When disabled, mesh references resolve to [`ResourceError::Skipped`]
    /// without touching the filesystem. Primitives are unaffected.
    #[must_use]
    pub fn load_meshes(mut self, enabled: bool) -> Self {
        self.load_meshes = enabled;
        self
    }

    pub fn cache(&self) -> &GeometryCache {
        &self.cache
    }

    pub fn locator(&self) -> &MeshLocator {
        &self.locator
    }

    /// Resolve one visual's geometry and material.
    pub fn resolve(&mut self, visual: &Visual) -> Result<Arc<GeometryAsset>, ResourceError> {
        let material = visual.material.as_ref().map(MaterialData::from_urdf);
        match &visual.geometry {
            Geometry::Box { size } => {
                let size = *size;
                self.insert_primitive(GeometryKey::cuboid(size), material, || box_mesh(size))
            }
            Geometry::Cylinder { radius, length } => {
                let (radius, length) = (*radius, *length);
                self.insert_primitive(GeometryKey::cylinder(radius, length), material, || {
                    cylinder_mesh(radius, length, CYLINDER_SEGMENTS)
                })
            }
            Geometry::Sphere { radius } => {
                let radius = *radius;
                self.insert_primitive(GeometryKey::sphere(radius), material, || {
                    sphere_mesh(radius, SPHERE_SEGMENTS, SPHERE_RINGS)
                })
            }
            Geometry::Mesh { filename, scale } => self.resolve_mesh(filename, *scale, material),
        }
    }

    /// Resolve every visual of `link`, collecting failures instead of
    /// stopping at the first one.
    pub fn resolve_link(&mut self, link: &LinkData) -> LinkGeometry {
        let mut out = LinkGeometry::default();
        for visual in &link.visuals {
            match self.resolve(visual) {
                Ok(asset) => out.visuals.push(ResolvedVisual {
                    name: visual.name.clone(),
                    origin: origin_to_isometry(&visual.origin),
                    asset,
                }),
                Err(ResourceError::Skipped(uri)) => {
                    debug!("link {}: mesh loading disabled, skipping {uri}", link.name);
                }
                Err(e) => {
                    warn!("link {}: {e}", link.name);
                    out.failures.push(e);
                }
            }
        }
        out
    }

    fn insert_primitive<F>(
        &mut self,
        geometry: GeometryKey,
        material: Option<MaterialData>,
        build: F,
    ) -> Result<Arc<GeometryAsset>, ResourceError>
    where
        F: FnOnce() -> Result<MeshData, ResourceError>,
    {
        let key = ResolutionKey::new(geometry, material.as_ref());
        self.cache.get_or_try_insert(key, material, build)
    }

    fn resolve_mesh(
        &mut self,
        uri: &str,
        scale: [f32; 3],
        material: Option<MaterialData>,
    ) -> Result<Arc<GeometryAsset>, ResourceError> {
        if !self.load_meshes {
            return Err(ResourceError::Skipped(uri.to_string()));
        }
        let path = self.locator.locate(uri)?;
        if !self.importer.supports(&path) {
            return Err(ResourceError::Unsupported {
                extension: path
                    .extension()
                    .map(|e| e.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                path,
            });
        }

        let key = ResolutionKey::new(GeometryKey::mesh(path.clone(), scale), material.as_ref());
        let importer = &self.importer;
        self.cache.get_or_try_insert(key, material, || {
            debug!("importing mesh {}", path.display());
            let mut mesh = importer.load(&path)?;
            mesh.scale(scale);
            Ok(mesh)
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use robostage_urdf::{Material, Origin};

    use super::*;

    const TRIANGLE_OBJ: &str = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";

    fn scratch(tag: &str) -> PathBuf {
        let dir =
            std::env::temp_dir().join(format!("robostage-resolver-{tag}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn visual(geometry: Geometry) -> Visual {
        Visual {
            name: None,
            origin: Origin::default(),
            geometry,
            material: None,
        }
    }

    fn mesh_visual(filename: &str, scale: [f32; 3]) -> Visual {
        visual(Geometry::Mesh {
            filename: filename.into(),
            scale,
        })
    }

    #[test]
    fn identical_primitives_share_asset() {
        let mut resolver = GeometryResolver::new(MeshLocator::default());
        let a = resolver
            .resolve(&visual(Geometry::Box { size: [0.1, 0.2, 0.3] }))
            .unwrap();
        let b = resolver
            .resolve(&visual(Geometry::Box { size: [0.1, 0.2, 0.3] }))
            .unwrap();
        let c = resolver
            .resolve(&visual(Geometry::Sphere { radius: 0.1 }))
            .unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(resolver.cache().len(), 2);
    }

    #[test]
    fn material_is_attached() {
        let mut resolver = GeometryResolver::new(MeshLocator::default());
        let mut v = visual(Geometry::Cylinder {
            radius: 0.05,
            length: 0.4,
        });
        v.material = Some(Material {
            name: "blue".into(),
            color: Some([0.0, 0.0, 1.0, 1.0]),
            texture: None,
        });
        let asset = resolver.resolve(&v).unwrap();
        let material = asset.material.as_ref().unwrap();
        assert_eq!(material.name, "blue");
        assert_eq!(material.base_color, [0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn relative_mesh_resolves_and_caches() {
        let dir = scratch("relative");
        std::fs::write(dir.join("tri.obj"), TRIANGLE_OBJ).unwrap();
        let mut resolver = GeometryResolver::for_description(&dir.join("robot.urdf"), Vec::new());

        let a = resolver.resolve(&mesh_visual("tri.obj", [2.0; 3])).unwrap();
        let b = resolver
            .resolve(&mesh_visual(&format!("file://{}", dir.join("tri.obj").display()), [2.0; 3]))
            .unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.mesh.positions[1], [2.0, 0.0, 0.0]);

        let unscaled = resolver.resolve(&mesh_visual("tri.obj", [1.0; 3])).unwrap();
        assert!(!Arc::ptr_eq(&a, &unscaled));
    }

    #[test]
    fn missing_mesh_is_not_found() {
        let mut resolver = GeometryResolver::new(MeshLocator::default());
        let err = resolver
            .resolve(&mesh_visual("package://ghost/m.obj", [1.0; 3]))
            .unwrap_err();
        assert!(matches!(err, ResourceError::NotFound { .. }));
        assert!(resolver.cache().is_empty());
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        let dir = scratch("unsupported");
        std::fs::write(dir.join("part.dae"), "<COLLADA/>").unwrap();
        let mut resolver = GeometryResolver::for_description(&dir.join("r.urdf"), Vec::new());
        let err = resolver.resolve(&mesh_visual("part.dae", [1.0; 3])).unwrap_err();
        assert!(matches!(err, ResourceError::Unsupported { ref extension, .. } if extension == "dae"));
    }

    #[test]
    fn disabled_mesh_loading_skips_meshes_only() {
        let mut resolver = GeometryResolver::new(MeshLocator::default()).load_meshes(false);
        let link = LinkData::new("l")
            .with_visual(Geometry::Mesh {
                filename: "missing.obj".into(),
                scale: [1.0; 3],
            })
            .with_visual(Geometry::Sphere { radius: 1.0 });
        let out = resolver.resolve_link(&link);
        assert_eq!(out.visuals.len(), 1);
        assert!(out.failures.is_empty());
    }

    #[test]
    fn resolve_link_collects_failures() {
        let mut resolver = GeometryResolver::new(MeshLocator::default());
        let link = LinkData::new("l")
            .with_visual(Geometry::Box { size: [1.0; 3] })
            .with_visual(Geometry::Mesh {
                filename: "/no/such/file.obj".into(),
                scale: [1.0; 3],
            })
            .with_visual(Geometry::Sphere { radius: -1.0 });
        let out = resolver.resolve_link(&link);
        assert_eq!(out.visuals.len(), 1);
        assert_eq!(out.failures.len(), 2);
    }
}
