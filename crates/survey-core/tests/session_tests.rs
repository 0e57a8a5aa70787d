//! Pruebas del conductor de sesión: política de progresión, anulación manual
//! y edición desde revisión.
use std::sync::Arc;

use survey_adapters::{residential_site_catalog, MockVisionClient, VisionValidationService};
use survey_core::store::{InMemoryArtifactStore, InMemorySurveyStore, SurveyStore};
use survey_core::{CapturePipeline, GuidedSession, StepOutcome, SubmitRequest};
use survey_domain::{StepId, SurveyStatus};
use uuid::Uuid;

const VALID_JSON: &str = r#"{"isValid": true, "description": "looks right"}"#;
const INVALID_JSON: &str = r#"{"isValid": false, "description": "not what was asked"}"#;

async fn session_with(client: MockVisionClient)
                      -> GuidedSession<VisionValidationService<MockVisionClient>, InMemorySurveyStore, InMemoryArtifactStore> {
    let pipeline = CapturePipeline::new(Arc::new(residential_site_catalog()),
                                        VisionValidationService::with_default_config(client),
                                        InMemorySurveyStore::new(),
                                        InMemoryArtifactStore::new());
    GuidedSession::start(pipeline, Uuid::new_v4()).await.unwrap()
}

fn capture(bytes: &[u8]) -> SubmitRequest {
    SubmitRequest::Capture { image: bytes.to_vec(), content_type: "image/jpeg".to_string() }
}

#[tokio::test]
async fn valid_verdicts_advance_and_invalid_ones_hold_position() {
    let mut session = session_with(MockVisionClient::scripted([VALID_JSON, INVALID_JSON])).await;
    // bienvenida → guía 0.5 → paso 1
    session.acknowledge().await;
    session.acknowledge().await;
    assert_eq!(session.position(), StepId::whole(1));

    let ok = session.submit(capture(b"good")).await;
    assert!(ok.verdict().unwrap().is_valid);
    assert_eq!(session.position(), StepId::whole(2));

    let bad = session.submit(capture(b"bad")).await;
    assert!(!bad.verdict().unwrap().is_valid);
    assert_eq!(session.position(), StepId::whole(2), "negative verdict must not advance");
    assert_eq!(session.failed_attempts(StepId::whole(2)), 1);
}

#[tokio::test]
async fn use_anyway_unblocks_after_two_failed_attempts() {
    let mut session = session_with(MockVisionClient::always(INVALID_JSON)).await;
    session.acknowledge().await;
    session.acknowledge().await;
    assert_eq!(session.position(), StepId::whole(1));

    session.submit(capture(b"try 1")).await;
    assert!(!session.can_use_anyway());
    session.submit(capture(b"try 2")).await;
    assert!(session.can_use_anyway());

    let landed = session.use_anyway().await.expect("override available");
    assert_eq!(landed, StepId::whole(2));

    // el libro mayor conserva el veredicto negativo real para el revisor
    let survey = session.pipeline().surveys().get(session.survey_id()).await.unwrap();
    let record = survey.record(StepId::whole(1)).unwrap();
    assert!(!record.verdict.is_valid);
    assert_eq!(survey.ledger.len(), 1);
}

#[tokio::test]
async fn use_anyway_is_not_offered_below_the_threshold() {
    let mut session = session_with(MockVisionClient::always(INVALID_JSON)).await;
    session.acknowledge().await;
    session.acknowledge().await;
    session.submit(capture(b"one bad try")).await;
    assert!(session.use_anyway().await.is_none());
    assert_eq!(session.position(), StepId::whole(1));
}

#[tokio::test]
async fn service_failures_do_not_consume_retry_attempts() {
    // la cola simulada vacía produce error de backend, no veredicto
    let mut session = session_with(MockVisionClient::default()).await;
    session.acknowledge().await;
    session.acknowledge().await;
    let outcome = session.submit(capture(b"photo")).await;
    assert!(matches!(outcome, StepOutcome::Failed(_)));
    assert_eq!(session.failed_attempts(StepId::whole(1)), 0);
    assert_eq!(session.position(), StepId::whole(1));
}

#[tokio::test]
async fn editing_from_review_returns_to_review_after_the_redo() {
    let mut session = session_with(MockVisionClient::always(VALID_JSON)).await;
    session.enter_review().await.unwrap();
    let review = session.position();
    assert!(session.at_review());

    // editar el paso 5 desde revisión
    session.edit_step(StepId::whole(5)).await;
    assert_eq!(session.position(), StepId::whole(5));

    // la entrega completada vuelve a revisión, no al paso 6
    session.submit(capture(b"retaken photo")).await;
    assert_eq!(session.position(), review);

    // y el contexto de retoma quedó consumido: el avance siguiente es normal
    session.edit_step(StepId::whole(1)).await;
    session.submit(capture(b"redo step 1")).await;
    assert_eq!(session.position(), review);
}

#[tokio::test]
async fn entering_review_transitions_the_survey_once() {
    let mut session = session_with(MockVisionClient::always(VALID_JSON)).await;
    let survey = session.enter_review().await.unwrap();
    assert_eq!(survey.status, SurveyStatus::UnderReview);
    // reentrar no es un error ni retrocede el estado
    let again = session.enter_review().await.unwrap();
    assert_eq!(again.status, SurveyStatus::UnderReview);
}

#[tokio::test]
async fn finish_is_idempotent_and_freezes_the_ledger() {
    let mut session = session_with(MockVisionClient::always(VALID_JSON)).await;
    session.acknowledge().await;
    session.acknowledge().await;
    session.submit(capture(b"photo")).await;

    let first = session.finish().await.unwrap();
    let second = session.finish().await.unwrap();
    assert_eq!(first.completed_at, second.completed_at);
    assert_eq!(second.status, SurveyStatus::Completed);

    // una entrega tardía se acepta como no-op: el libro mayor no cambia
    let before = session.pipeline().surveys().get(session.survey_id()).await.unwrap().ledger.len();
    session.submit(SubmitRequest::Skip).await;
    let after = session.pipeline().surveys().get(session.survey_id()).await.unwrap().ledger.len();
    assert_eq!(before, after);
}

#[tokio::test]
async fn skippable_step_skip_advances_past_it() {
    let mut session = session_with(MockVisionClient::always(VALID_JSON)).await;
    session.go_to(StepId::whole(8)).await; // segunda etiqueta de A/C, omitible
    let outcome = session.skip().await;
    assert_eq!(outcome, StepOutcome::Skipped);
    assert_eq!(session.position(), StepId::from_f64(8.5));
}
