//! Errores del motor, agrupados por frontera de servicio.

use std::time::Duration;

use thiserror::Error;
use uuid::Uuid;

use survey_domain::{DomainError, StepId};

/// Defectos detectados al construir el catálogo. Son errores de programación
/// de la tabla, no condiciones de ejecución.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("duplicate step id {0}")] DuplicateId(StepId),
    #[error("step id {0} must be strictly positive")] NonPositiveId(StepId),
    #[error("manual-entry step {step} references {related}, which is not a capture step in the catalog")]
    BadRelatedStep { step: StepId, related: StepId },
    #[error("catalog has no steps")] Empty,
}

/// Fallos del almacén de agregados (libro mayor por sesión).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("survey {0} not found")] NotFound(Uuid),
    #[error(transparent)] Domain(#[from] DomainError),
    #[error("storage backend: {0}")] Backend(String),
}

/// Fallos del almacén de artefactos (objetos binarios).
#[derive(Debug, Error)]
pub enum ArtifactStoreError {
    #[error("artifact {0} not found")] NotFound(String),
    #[error("artifact write failed: {0}")] Write(String),
}

/// Fallos de la llamada opaca al servicio de validación visual. Ninguna de
/// estas variantes muta estado: el llamador reintenta la entrega completa.
#[derive(Debug, Error)]
pub enum ValidationServiceError {
    #[error("validation service unavailable: {0}")] Unavailable(String),
    #[error("validation call timed out after {0:?}")] Timeout(Duration),
    #[error("submission rejected: {0}")] Rejected(String),
}
