//! Mesh file importers.

use std::path::Path;

use crate::error::ResourceError;
use crate::mesh::MeshData;

/// Decodes mesh files into [`MeshData`].
///
/// Hosts that understand more formats plug in their own implementation.
pub trait MeshImporter {
    /// Lower-case file extensions this importer accepts.
    fn extensions(&self) -> &[&str];

    fn load(&self, path: &Path) -> Result<MeshData, ResourceError>;

    fn supports(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| self.extensions().contains(&e.to_ascii_lowercase().as_str()))
    }
}

/// Wavefront OBJ importer backed by `tobj`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjImporter;

impl MeshImporter for ObjImporter {
    fn extensions(&self) -> &[&str] {
        &["obj"]
    }

    /// Load every model in the file and merge them into one mesh.
    fn load(&self, path: &Path) -> Result<MeshData, ResourceError> {
        let options = tobj::LoadOptions {
            single_index: true,
            triangulate: true,
            ..Default::default()
        };
        let (models, _materials) =
            tobj::load_obj(path, &options).map_err(|e| ResourceError::Load {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let mut out = MeshData::empty();
        for model in models {
            let part = MeshData {
                positions: model
                    .mesh
                    .positions
                    .chunks_exact(3)
                    .map(|p| [p[0], p[1], p[2]])
                    .collect(),
                indices: model.mesh.indices,
            };
            out.append(&part);
        }
        if out.is_empty() {
            return Err(ResourceError::Load {
                path: path.to_path_buf(),
                message: "file contains no faces".into(),
            });
        }
        Ok(out)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
