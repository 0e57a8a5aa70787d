//! Almacén de artefactos sobre el sistema de archivos local.
//!
//! Implementación durable mínima del contrato de artefactos: cada clave
//! (`{sesión}/step_{id}.jpg`) se materializa como un archivo bajo el
//! directorio raíz, y la referencia de recuperación es un URL `file://` con
//! marca de vencimiento, análogo a los enlaces pre-firmados del almacén de
//! objetos real.
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use survey_core::errors::ArtifactStoreError;
use survey_core::store::ArtifactStore;

pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Las claves viajan con `/` como separador; se rechaza cualquier intento
    /// de escapar del directorio raíz.
    fn path_for(&self, key: &str) -> Result<PathBuf, ArtifactStoreError> {
        let relative = Path::new(key);
        let escapes = relative.components()
                              .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)));
        if escapes || key.is_empty() {
            return Err(ArtifactStoreError::Write(format!("invalid artifact key {key:?}")));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ArtifactStore for FsArtifactStore {
    async fn put(&self, key: &str, bytes: Vec<u8>, _content_type: &str) -> Result<(), ArtifactStoreError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| ArtifactStoreError::Write(err.to_string()))?;
        }
        fs::write(&path, bytes).map_err(|err| ArtifactStoreError::Write(err.to_string()))
    }

    async fn retrieval_ref(&self, key: &str, ttl: Duration) -> Result<String, ArtifactStoreError> {
        let path = self.path_for(key).map_err(|_| ArtifactStoreError::NotFound(key.to_string()))?;
        if !path.is_file() {
            return Err(ArtifactStoreError::NotFound(key.to_string()));
        }
        let expires = Utc::now() + chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::hours(1));
        Ok(format!("file://{}?expires={}", path.display(), expires.timestamp()))
    }
}
