//! Name to bytes lookup.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::error::AssetError;

/// Locates the source bytes of a named SVG resource.
pub trait ResourceResolver: Send + Sync {
    fn resolve(&self, name: &str) -> Result<Vec<u8>, AssetError>;
}

/// Searches a list of directories for `name` and then `name.<extension>`.
#[derive(Debug, Clone)]
pub struct DirectoryResolver {
    search_paths: Vec<PathBuf>,
    extension: String,
}

impl DirectoryResolver {
    pub fn new(search_paths: Vec<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            search_paths,
            extension: extension.into(),
        }
    }

    /// Single directory, `.svg` extension.
    pub fn single(dir: impl AsRef<Path>) -> Self {
        Self::new(vec![dir.as_ref().to_path_buf()], "svg")
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    fn candidates<'a>(&'a self, name: &'a str) -> impl Iterator<Item = PathBuf> + 'a {
        let suffix = format!(".{}", self.extension);
        let with_ext = (!self.extension.is_empty() && !name.ends_with(&suffix))
            .then(|| format!("{}{}", name, suffix));
        self.search_paths.iter().flat_map(move |dir| {
            std::iter::once(dir.join(name)).chain(with_ext.clone().map(|n| dir.join(n)))
        })
    }
}

/// Names are plain file stems: no separators, no parent references.
fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && !name.contains(['/', '\\'])
        && name != "."
        && !name.contains("..")
}

impl ResourceResolver for DirectoryResolver {
    fn resolve(&self, name: &str) -> Result<Vec<u8>, AssetError> {
        if !is_valid_name(name) {
            return Err(AssetError::NotFound(name.to_string()));
        }

        for path in self.candidates(name) {
            match std::fs::read(&path) {
                Ok(data) => {
                    trace!(path = %path.display(), "Resolved SVG resource");
                    return Ok(data);
                }
                Err(e) if e.kind() == ErrorKind::NotFound || path.is_dir() => {}
                Err(e) => return Err(e.into()),
            }
        }
        Err(AssetError::NotFound(name.to_string()))
    }
}
