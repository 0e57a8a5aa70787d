//! Almacén de agregados por sesión.
//!
//! Rol en el recorrido:
//! - Un registro por token de sesión; `find_or_create` da semántica de
//!   crear-en-primera-lectura con valores por defecto, `get` plano devuelve
//!   NotFound.
//! - Navegación (`advance_step`) y libro mayor (`upsert_step`) se actualizan
//!   por operaciones separadas para que no se pisen entre sí.
//! - Todas las escrituras son último-gana a granularidad de registro o campo
//!   escalar; no hay bloqueo optimista porque una sola persona conduce una
//!   sesión desde un solo dispositivo.
use async_trait::async_trait;
use dashmap::DashMap;
use log::debug;
use uuid::Uuid;

use survey_domain::{StepRecord, Survey, SurveyStatus, StepId};

use crate::errors::StoreError;

#[async_trait]
pub trait SurveyStore: Send + Sync {
    /// Lectura plana; NotFound si la sesión no existe.
    async fn get(&self, survey_id: Uuid) -> Result<Survey, StoreError>;

    /// Crear-en-primera-lectura con estado inicial por defecto.
    async fn find_or_create(&self, survey_id: Uuid) -> Result<Survey, StoreError>;

    /// Reemplaza por completo el registro en `record.step_id`. Sobre un
    /// recorrido completado es un no-op exitoso, nunca un error.
    async fn upsert_step(&self, survey_id: Uuid, record: StepRecord) -> Result<(), StoreError>;

    /// Actualiza únicamente la posición de navegación.
    async fn advance_step(&self, survey_id: Uuid, step_id: StepId) -> Result<(), StoreError>;

    /// Aplica el ciclo de vida unidireccional y devuelve el agregado
    /// resultante. Repetir una finalización devuelve el estado existente.
    async fn transition_status(&self, survey_id: Uuid, target: SurveyStatus) -> Result<Survey, StoreError>;
}

/// Implementación en memoria sobre un mapa concurrente.
#[derive(Default)]
pub struct InMemorySurveyStore {
    inner: DashMap<Uuid, Survey>,
}

impl InMemorySurveyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[async_trait]
impl SurveyStore for InMemorySurveyStore {
    async fn get(&self, survey_id: Uuid) -> Result<Survey, StoreError> {
        self.inner
            .get(&survey_id)
            .map(|s| s.clone())
            .ok_or(StoreError::NotFound(survey_id))
    }

    async fn find_or_create(&self, survey_id: Uuid) -> Result<Survey, StoreError> {
        let entry = self.inner.entry(survey_id).or_insert_with(|| Survey::new(survey_id));
        Ok(entry.clone())
    }

    async fn upsert_step(&self, survey_id: Uuid, record: StepRecord) -> Result<(), StoreError> {
        let mut survey = self.inner.get_mut(&survey_id).ok_or(StoreError::NotFound(survey_id))?;
        if !survey.upsert_step(record) {
            // finalización idempotente: la escritura tardía se ignora
            debug!("ledger write ignored, survey {survey_id} already completed");
        }
        Ok(())
    }

    async fn advance_step(&self, survey_id: Uuid, step_id: StepId) -> Result<(), StoreError> {
        let mut survey = self.inner.get_mut(&survey_id).ok_or(StoreError::NotFound(survey_id))?;
        survey.advance_to(step_id);
        Ok(())
    }

    async fn transition_status(&self, survey_id: Uuid, target: SurveyStatus) -> Result<Survey, StoreError> {
        let mut survey = self.inner.get_mut(&survey_id).ok_or(StoreError::NotFound(survey_id))?;
        survey.transition_to(target)?;
        Ok(survey.clone())
    }
}
