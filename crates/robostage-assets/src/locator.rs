//! Mesh filename resolution.
//!
//! URDF mesh references come in three shapes:
//! - `package://<pkg>/<rel>`: looked up under each package root as
//!   `<root>/<pkg>/<rel>`, then by walking up from the description's
//!   directory to an ancestor named `<pkg>`;
//! - `file://<path>`: the prefix is stripped;
//! - anything else: a path, relative ones taken from the description's
//!   directory.

use std::path::{Path, PathBuf};

use crate::error::ResourceError;

const PACKAGE_SCHEME: &str = "package://";
const FILE_SCHEME: &str = "file://";

#[derive(Debug, Clone, Default)]
pub struct MeshLocator {
    /// Directory containing the description file.
    pub base_dir: Option<PathBuf>,
    pub package_roots: Vec<PathBuf>,
}

impl MeshLocator {
    pub fn new(base_dir: Option<PathBuf>, package_roots: Vec<PathBuf>) -> Self {
        Self {
            base_dir,
            package_roots,
        }
    }

    /// Candidate paths for `uri`, in search order.
    pub fn candidates(&self, uri: &str) -> Vec<PathBuf> {
        if let Some(rest) = uri.strip_prefix(PACKAGE_SCHEME) {
            let (package, relative) = rest.split_once('/').unwrap_or((rest, ""));
            let mut out: Vec<PathBuf> = self
                .package_roots
                .iter()
                .map(|root| root.join(package).join(relative))
                .collect();
            if let Some(base) = &self.base_dir {
                out.extend(
                    base.ancestors()
                        .filter(|dir| dir.file_name().is_some_and(|n| n == package))
                        .map(|dir| dir.join(relative)),
                );
            }
            return out;
        }

        let path = Path::new(uri.strip_prefix(FILE_SCHEME).unwrap_or(uri));
        match &self.base_dir {
            Some(base) if path.is_relative() => vec![base.join(path)],
            _ => vec![path.to_path_buf()],
        }
    }

    /// First existing candidate, canonicalised.
    pub fn locate(&self, uri: &str) -> Result<PathBuf, ResourceError> {
        let searched = self.candidates(uri);
        searched
            .iter()
            .find(|p| p.is_file())
            .map(|p| std::fs::canonicalize(p).unwrap_or_else(|_| p.clone()))
            .ok_or_else(|| ResourceError::NotFound {
                uri: uri.to_string(),
                searched,
            })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
