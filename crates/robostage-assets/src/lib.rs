//! Geometry and material resolution for robostage.
//!
//! Maps URDF visual geometry to triangle meshes: primitives are generated,
//! mesh files are located and decoded through a [`MeshImporter`], and every
//! result is shared through a session-owned [`GeometryCache`].

pub mod cache;
pub mod error;
pub mod importer;
pub mod locator;
pub mod material;
pub mod mesh;
pub mod primitives;
pub mod resolver;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use cache::{GeometryAsset, GeometryCache, GeometryKey, MaterialKey, ResolutionKey};
pub use error::ResourceError;
pub use importer::{MeshImporter, ObjImporter};
pub use locator::MeshLocator;
pub use material::{DEFAULT_COLOR, MaterialData};
pub use mesh::MeshData;
pub use primitives::{box_mesh, cylinder_mesh, ellipsoid_mesh, sphere_mesh};
pub use resolver::{GeometryResolver, LinkGeometry, ResolvedVisual};
