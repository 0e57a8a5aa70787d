//! Ensamblador de revisión: proyección de sólo lectura del recorrido.
//!
//! Recorre el catálogo en orden canónico y lo cruza con el libro mayor:
//! paso sin registro → "no completado"; campos estructurados con valor en
//! blanco → "no encontrado" (se filtran); clave de artefacto → referencia de
//! recuperación con vida limitada. La única escritura que dispara es la
//! transición puntual a `UnderReview` al entrar por primera vez desde un
//! recorrido en progreso.
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use survey_domain::{StepAction, StepId, SurveyStatus};

use crate::catalog::{StepCatalog, StepKind};
use crate::errors::StoreError;
use crate::store::{ArtifactStore, SurveyStore};

/// Vida de las referencias de recuperación entregadas al revisor.
pub const REVIEW_REF_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewStepEntry {
    pub step_id: StepId,
    pub title: String,
    pub kind: StepKind,
    pub completed: bool,
    pub skipped: bool,
    pub manually_entered: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_valid: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_value: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub structured_fields: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewSummary {
    pub survey_id: Uuid,
    pub status: SurveyStatus,
    pub steps: Vec<ReviewStepEntry>,
    pub generated_at: DateTime<Utc>,
}

impl ReviewSummary {
    /// Proyección JSON lista para entregar a una capa de presentación.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

pub struct ReviewAssembler<'a, S, A>
    where S: SurveyStore,
          A: ArtifactStore
{
    catalog: &'a StepCatalog,
    surveys: &'a S,
    artifacts: &'a A,
}

impl<'a, S, A> ReviewAssembler<'a, S, A>
    where S: SurveyStore,
          A: ArtifactStore
{
    pub fn new(catalog: &'a StepCatalog, surveys: &'a S, artifacts: &'a A) -> Self {
        Self { catalog, surveys, artifacts }
    }

    pub async fn assemble(&self, survey_id: Uuid) -> Result<ReviewSummary, StoreError> {
        let survey = self.surveys.get(survey_id).await?;
        let survey = if survey.status == SurveyStatus::InProgress {
            self.surveys.transition_status(survey_id, SurveyStatus::UnderReview).await?
        } else {
            survey
        };

        let mut steps = Vec::with_capacity(self.catalog.len());
        for step in self.catalog.steps() {
            let record = survey.record(step.id());
            let artifact_url = match record.and_then(|r| r.artifact_key.as_deref()) {
                Some(key) => match self.artifacts.retrieval_ref(key, REVIEW_REF_TTL).await {
                    Ok(url) => Some(url),
                    Err(err) => {
                        warn!("no retrieval ref for {key}: {err}");
                        None
                    }
                },
                None => None,
            };
            steps.push(ReviewStepEntry {
                step_id: step.id(),
                title: step.title().to_string(),
                kind: step.kind(),
                completed: record.is_some(),
                skipped: record.map(|r| r.was_skipped()).unwrap_or(false),
                manually_entered: record.map(|r| r.action == StepAction::ManuallyEntered).unwrap_or(false),
                message: record.map(|r| r.verdict.message.clone()),
                is_valid: record.map(|r| r.verdict.is_valid),
                extracted_value: record.and_then(|r| r.verdict.extracted_value.clone()),
                structured_fields: record.map(|r| r.verdict.present_fields()).unwrap_or_default(),
                artifact_url,
            });
        }

        Ok(ReviewSummary { survey_id,
                           status: survey.status,
                           steps,
                           generated_at: Utc::now() })
    }

    /// Entradas aún pendientes (sin registro), útil para avisar antes de
    /// finalizar.
    pub async fn pending_steps(&self, survey_id: Uuid) -> Result<Vec<StepId>, StoreError> {
        let survey = self.surveys.get(survey_id).await?;
        Ok(self.catalog
               .steps()
               .iter()
               .filter(|s| s.is_counted() && survey.record(s.id()).is_none())
               .map(|s| s.id())
               .collect())
    }
}
