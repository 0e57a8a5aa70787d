//! Pipeline captura → validación → persistencia.
//!
//! Rol en el recorrido:
//! - Convierte una entrega (foto recién tomada, omisión o dato confirmado)
//!   en un resultado durable y revisable: veredicto del analizador, artefacto
//!   almacenado y upsert idempotente en el libro mayor.
//! - La foto se guarda SIEMPRE que el analizador haya respondido, también con
//!   veredicto negativo: el usuario la tomó y el revisor humano debe poder
//!   juzgar los casos límite que el algoritmo rechazó.
//! - Los fallos de escritura (artefacto o libro mayor) se registran y se
//!   sigue adelante; reintentar el mismo paso reescribe ambas cosas bajo las
//!   mismas claves, así que el estado parcial se cura solo.
//! - Ningún error de transporte sube más allá de esta capa: el resultado es
//!   siempre el tri-estado `Completed | Skipped | Failed`.
use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use uuid::Uuid;

use survey_domain::{StepId, StepRecord, Verdict};

use crate::catalog::StepCatalog;
use crate::errors::ValidationServiceError;
use crate::store::{ArtifactStore, SurveyStore};
use crate::validate::ValidationService;

/// Tope por defecto para la llamada al analizador, el único punto del
/// pipeline con latencia apreciable.
pub const DEFAULT_VALIDATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Entrega de un paso.
#[derive(Debug, Clone)]
pub enum SubmitRequest {
    /// Foto recién tomada.
    Capture { image: Vec<u8>, content_type: String },
    /// El usuario omite el paso.
    Skip,
    /// Dato confirmado por el usuario (pasos de entrada manual).
    ManualEntry { value: String },
}

/// Resultado de una entrega. `Failed` no mutó estado y admite reintento con
/// los mismos bytes.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Completed(Verdict),
    Skipped,
    Failed(String),
}

impl StepOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, StepOutcome::Completed(_))
    }

    pub fn verdict(&self) -> Option<&Verdict> {
        match self {
            StepOutcome::Completed(v) => Some(v),
            _ => None,
        }
    }
}

pub struct CapturePipeline<V, S, A>
    where V: ValidationService,
          S: SurveyStore,
          A: ArtifactStore
{
    catalog: Arc<StepCatalog>,
    validator: V,
    surveys: S,
    artifacts: A,
    validation_timeout: Option<Duration>,
}

impl<V, S, A> CapturePipeline<V, S, A>
    where V: ValidationService,
          S: SurveyStore,
          A: ArtifactStore
{
    pub fn new(catalog: Arc<StepCatalog>, validator: V, surveys: S, artifacts: A) -> Self {
        Self { catalog,
               validator,
               surveys,
               artifacts,
               validation_timeout: Some(DEFAULT_VALIDATION_TIMEOUT) }
    }

    /// Ajusta (o desactiva con `None`) el tope de la llamada de validación.
    pub fn with_validation_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.validation_timeout = timeout;
        self
    }

    pub fn catalog(&self) -> &Arc<StepCatalog> {
        &self.catalog
    }

    pub fn surveys(&self) -> &S {
        &self.surveys
    }

    pub fn artifacts(&self) -> &A {
        &self.artifacts
    }

    /// Clave determinista del artefacto de un paso. Retomar la foto del mismo
    /// paso sobrescribe la anterior.
    pub fn artifact_key(survey_id: Uuid, step_id: StepId, content_type: &str) -> String {
        format!("{survey_id}/step_{step_id}.{}", extension_for(content_type))
    }

    /// Entrega de un paso. Ver el encabezado del módulo para la política de
    /// fallos parciales.
    pub async fn submit(&self, survey_id: Uuid, step_id: StepId, request: SubmitRequest) -> StepOutcome {
        if let Err(err) = self.surveys.find_or_create(survey_id).await {
            return StepOutcome::Failed(format!("survey store unavailable: {err}"));
        }
        match request {
            SubmitRequest::Skip => self.submit_skip(survey_id, step_id).await,
            SubmitRequest::ManualEntry { value } => self.submit_manual(survey_id, step_id, value).await,
            SubmitRequest::Capture { image, content_type } => {
                self.submit_capture(survey_id, step_id, image, content_type).await
            }
        }
    }

    /// Omisión: registro sintetizado, sin llamada al analizador ni artefacto.
    async fn submit_skip(&self, survey_id: Uuid, step_id: StepId) -> StepOutcome {
        debug!("recording skip for survey {survey_id}, step {step_id}");
        self.persist_record(survey_id, StepRecord::skipped(step_id)).await;
        StepOutcome::Skipped
    }

    /// Entrada manual: el valor confirmado por el usuario reemplaza a una
    /// captura nueva. Los límites declarados por el paso se aplican antes de
    /// aceptar el valor.
    async fn submit_manual(&self, survey_id: Uuid, step_id: StepId, value: String) -> StepOutcome {
        let normalized = match self.catalog.get(step_id).and_then(|s| s.entry()) {
            Some(entry) => match entry.validate(&value) {
                Ok(v) => v,
                Err(reason) => return StepOutcome::Failed(reason),
            },
            None => value,
        };
        let record = StepRecord::manually_entered(step_id, normalized);
        let verdict = record.verdict.clone();
        self.persist_record(survey_id, record).await;
        StepOutcome::Completed(verdict)
    }

    /// El caso difícil: validar, guardar el artefacto incondicionalmente y
    /// reemplazar el registro del paso.
    async fn submit_capture(&self,
                            survey_id: Uuid,
                            step_id: StepId,
                            image: Vec<u8>,
                            content_type: String)
                            -> StepOutcome {
        let Some(step) = self.catalog.get(step_id) else {
            return StepOutcome::Failed(format!("step {step_id} is not in the catalog"));
        };
        let Some(prompt) = step.prompt() else {
            return StepOutcome::Failed(format!("step {step_id} does not take captures"));
        };

        // a. llamada opaca al analizador; si falla no se almacena nada y el
        //    llamador puede reintentar con los mismos bytes
        let verdict = match self.call_validator(&image, &content_type, prompt).await {
            Ok(v) => v,
            Err(err) => return StepOutcome::Failed(err.to_string()),
        };

        // b. el analizador respondió: la foto se preserva siempre, incluso
        //    con veredicto negativo
        let key = Self::artifact_key(survey_id, step_id, &content_type);
        if let Err(err) = self.artifacts.put(&key, image, &content_type).await {
            warn!("artifact write failed for {key}: {err}; continuing without durable copy");
        }

        // c. upsert del registro (reemplazo total del anterior)
        self.persist_record(survey_id, StepRecord::captured(step_id, key, verdict.clone())).await;

        StepOutcome::Completed(verdict)
    }

    async fn call_validator(&self,
                            image: &[u8],
                            content_type: &str,
                            prompt: &crate::catalog::PromptConfig)
                            -> Result<Verdict, ValidationServiceError> {
        match self.validation_timeout {
            Some(limit) => match tokio::time::timeout(limit, self.validator.validate(image, content_type, prompt)).await {
                Ok(result) => result,
                Err(_) => Err(ValidationServiceError::Timeout(limit)),
            },
            None => self.validator.validate(image, content_type, prompt).await,
        }
    }

    async fn persist_record(&self, survey_id: Uuid, record: StepRecord) {
        let step_id = record.step_id;
        if let Err(err) = self.surveys.upsert_step(survey_id, record).await {
            warn!("ledger write failed for survey {survey_id}, step {step_id}: {err}; progression still allowed");
        }
    }

    /// Resolución de imagen relacionada para pasos de entrada manual: clave
    /// del artefacto más reciente del paso de captura asociado, o `None` si
    /// ese paso aún no registró nada (el paso manual cae a entrada pura).
    pub async fn related_artifact_key(&self, survey_id: Uuid, step_id: StepId) -> Option<String> {
        let related = self.catalog.get(step_id)?.related_step()?;
        let survey = self.surveys.get(survey_id).await.ok()?;
        survey.record(related)?.artifact_key.clone()
    }
}

fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/png" => "png",
        "image/webp" => "webp",
        // jpg cubre image/jpeg y cualquier tipo no reconocido
        _ => "jpg",
    }
}
