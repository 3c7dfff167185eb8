use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset not found: {name}")]
    NotFound { name: String },
    #[error("asset name must be a relative path inside the asset root: {name}")]
    InvalidName { name: String },
    #[error("failed to read asset {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },
}

impl AssetError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, AssetError::NotFound { .. })
    }
}

pub trait AssetReader {
    fn read_entire_file(&self, name: &str) -> Result<Vec<u8>, AssetError>;
}

#[derive(Debug, Clone)]
pub struct DirAssetReader {
    root: PathBuf,
}

impl DirAssetReader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, name: &str) -> Result<PathBuf, AssetError> {
        let relative = Path::new(name);
        let is_contained = !name.is_empty()
            && relative
                .components()
                .all(|component| matches!(component, Component::Normal(_) | Component::CurDir));
        if !is_contained {
            return Err(AssetError::InvalidName {
                name: name.to_string(),
            });
        }
        Ok(self.root.join(relative))
    }
}

impl AssetReader for DirAssetReader {
    fn read_entire_file(&self, name: &str) -> Result<Vec<u8>, AssetError> {
        let path = self.resolve(name)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                warn!(asset = name, path = %path.display(), "asset_not_found");
                Err(AssetError::NotFound {
                    name: name.to_string(),
                })
            }
            Err(source) => Err(AssetError::Io {
                name: name.to_string(),
                source,
            }),
        }
    }
}
