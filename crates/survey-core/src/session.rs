//! Conductor de sesión: progresión del lado del llamador.
//!
//! El pipeline decide qué pasó con una entrega; esta capa decide a dónde va
//! el usuario después. Mantiene el estado transitorio que nunca se persiste:
//! la posición local, el contador de reintentos por paso, el contexto de
//! retoma al editar desde revisión y la anulación manual ("usar de todos
//! modos") que desbloquea el avance tras reintentos fallidos repetidos.
use std::collections::HashMap;

use log::warn;
use uuid::Uuid;

use survey_domain::{StepId, Survey, SurveyStatus};

use crate::errors::StoreError;
use crate::pipeline::{CapturePipeline, StepOutcome, SubmitRequest};
use crate::sequencer::{RetakeContext, Sequencer};
use crate::store::{ArtifactStore, SurveyStore};
use crate::validate::ValidationService;

/// Intentos fallidos tras los cuales se ofrece avanzar con veredicto
/// negativo. La anulación no escribe registro nuevo: el libro mayor conserva
/// el veredicto real para que lo adjudique el revisor humano.
pub const USE_ANYWAY_THRESHOLD: u32 = 2;

pub struct GuidedSession<V, S, A>
    where V: ValidationService,
          S: SurveyStore,
          A: ArtifactStore
{
    survey_id: Uuid,
    pipeline: CapturePipeline<V, S, A>,
    position: StepId,
    retake: RetakeContext,
    failed_attempts: HashMap<StepId, u32>,
}

impl<V, S, A> GuidedSession<V, S, A>
    where V: ValidationService,
          S: SurveyStore,
          A: ArtifactStore
{
    /// Abre (o retoma) la sesión y se posiciona donde el servidor la dejó.
    pub async fn start(pipeline: CapturePipeline<V, S, A>, survey_id: Uuid) -> Result<Self, StoreError> {
        let survey = pipeline.surveys().find_or_create(survey_id).await?;
        Ok(Self { survey_id,
                  pipeline,
                  position: survey.current_step,
                  retake: RetakeContext::inactive(),
                  failed_attempts: HashMap::new() })
    }

    pub fn survey_id(&self) -> Uuid {
        self.survey_id
    }

    pub fn position(&self) -> StepId {
        self.position
    }

    pub fn pipeline(&self) -> &CapturePipeline<V, S, A> {
        &self.pipeline
    }

    pub fn at_review(&self) -> bool {
        Sequencer::new(self.pipeline.catalog()).is_review(self.position)
    }

    pub fn failed_attempts(&self, step_id: StepId) -> u32 {
        self.failed_attempts.get(&step_id).copied().unwrap_or(0)
    }

    /// La anulación manual sólo se ofrece tras alcanzar el umbral de
    /// intentos fallidos en el paso actual.
    pub fn can_use_anyway(&self) -> bool {
        self.failed_attempts(self.position) >= USE_ANYWAY_THRESHOLD
    }

    /// Entrega el paso actual y aplica la política de progresión:
    /// - veredicto válido u omisión → avanzar;
    /// - veredicto negativo → quedarse, sumar al contador de reintentos;
    /// - fallo de servicio → quedarse sin tocar el contador (los bytes ya
    ///   capturados se reutilizan al reintentar).
    pub async fn submit(&mut self, request: SubmitRequest) -> StepOutcome {
        let step = self.position;
        let outcome = self.pipeline.submit(self.survey_id, step, request).await;
        match &outcome {
            StepOutcome::Completed(verdict) if verdict.is_valid => {
                self.failed_attempts.remove(&step);
                self.advance().await;
            }
            StepOutcome::Completed(_) => {
                *self.failed_attempts.entry(step).or_insert(0) += 1;
            }
            StepOutcome::Skipped => {
                self.failed_attempts.remove(&step);
                self.advance().await;
            }
            StepOutcome::Failed(_) => {}
        }
        outcome
    }

    /// Atajo para omitir el paso actual.
    pub async fn skip(&mut self) -> StepOutcome {
        self.submit(SubmitRequest::Skip).await
    }

    /// Avanza pese al veredicto negativo. No escribe registro: el del último
    /// intento ya refleja lo que el analizador opinó de verdad.
    pub async fn use_anyway(&mut self) -> Option<StepId> {
        if !self.can_use_anyway() {
            return None;
        }
        self.failed_attempts.remove(&self.position);
        Some(self.advance().await)
    }

    /// Confirmación de una pantalla de guía (o cualquier avance manual que no
    /// produce entrega).
    pub async fn acknowledge(&mut self) -> StepId {
        self.advance().await
    }

    /// Navegación directa a una posición, sin armar retorno de retoma.
    pub async fn go_to(&mut self, step_id: StepId) {
        self.move_to(step_id).await;
    }

    /// Navegación hacia atrás.
    pub async fn go_back(&mut self) -> StepId {
        let previous = Sequencer::new(self.pipeline.catalog()).previous(self.position);
        self.move_to(previous).await;
        previous
    }

    /// Edita un paso desde la pantalla de revisión: salta al paso y deja
    /// armado el retorno, de modo que la próxima entrega completada vuelva
    /// aquí en vez de seguir la secuencia normal.
    pub async fn edit_step(&mut self, step_id: StepId) {
        self.retake = RetakeContext::returning_to(self.position);
        self.failed_attempts.remove(&step_id);
        self.move_to(step_id).await;
    }

    /// Entra a revisión: dispara la única escritura del ensamblador (la
    /// transición a `UnderReview`) si el recorrido seguía en progreso.
    pub async fn enter_review(&mut self) -> Result<Survey, StoreError> {
        let survey = self.pipeline.surveys().get(self.survey_id).await?;
        let survey = if survey.status == SurveyStatus::InProgress {
            self.pipeline
                .surveys()
                .transition_status(self.survey_id, SurveyStatus::UnderReview)
                .await?
        } else {
            survey
        };
        let review = self.pipeline.catalog().review_id();
        self.move_to(review).await;
        Ok(survey)
    }

    /// Finalización idempotente del recorrido.
    pub async fn finish(&mut self) -> Result<Survey, StoreError> {
        self.pipeline
            .surveys()
            .transition_status(self.survey_id, SurveyStatus::Completed)
            .await
    }

    /// Avance por secuenciador; consume el contexto de retoma si estaba
    /// activo.
    async fn advance(&mut self) -> StepId {
        let next = Sequencer::new(self.pipeline.catalog()).next(self.position, self.retake);
        self.retake = RetakeContext::inactive();
        self.move_to(next).await;
        next
    }

    async fn move_to(&mut self, step_id: StepId) {
        self.position = step_id;
        if let Err(err) = self.pipeline.surveys().advance_step(self.survey_id, step_id).await {
            warn!("position update failed for survey {}: {err}", self.survey_id);
        }
    }
}
