//! Almacén de artefactos: objetos binarios con clave determinista.
//!
//! Las claves son deterministas por (sesión, paso), de modo que una retoma
//! sobrescribe el artefacto anterior en lugar de duplicarlo. La referencia de
//! recuperación es un URL con vencimiento, apto para entregarlo al revisor.
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use crate::errors::ArtifactStoreError;

#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Escribe (o sobrescribe) el objeto bajo `key`.
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), ArtifactStoreError>;

    /// Referencia de recuperación con vida limitada.
    async fn retrieval_ref(&self, key: &str, ttl: Duration) -> Result<String, ArtifactStoreError>;
}

#[derive(Debug, Clone)]
struct StoredObject {
    bytes: Vec<u8>,
    content_type: String,
}

/// Implementación en memoria, pensada para pruebas y para el recorrido de
/// demostración.
#[derive(Default)]
pub struct InMemoryArtifactStore {
    objects: DashMap<String, StoredObject>,
}

impl InMemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.contains_key(key)
    }

    /// Lectura directa para aserciones en pruebas.
    pub fn bytes_of(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.get(key).map(|o| o.bytes.clone())
    }

    pub fn content_type_of(&self, key: &str) -> Option<String> {
        self.objects.get(key).map(|o| o.content_type.clone())
    }
}

#[async_trait]
impl ArtifactStore for InMemoryArtifactStore {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), ArtifactStoreError> {
        self.objects.insert(key.to_string(),
                            StoredObject { bytes, content_type: content_type.to_string() });
        Ok(())
    }

    async fn retrieval_ref(&self, key: &str, ttl: Duration) -> Result<String, ArtifactStoreError> {
        if !self.objects.contains_key(key) {
            return Err(ArtifactStoreError::NotFound(key.to_string()));
        }
        let expires = Utc::now() + chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::hours(1));
        Ok(format!("memory://{key}?expires={}", expires.timestamp()))
    }
}
