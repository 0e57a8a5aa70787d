//! Recorrido de punta a punta: sesión completa, revisión y finalización.
use std::sync::Arc;

use survey_adapters::{residential_site_catalog, MockVisionClient, VisionValidationService};
use survey_core::catalog::StepKind;
use survey_core::store::{InMemoryArtifactStore, InMemorySurveyStore, SurveyStore};
use survey_core::{CapturePipeline, GuidedSession, ReviewAssembler, SubmitRequest};
use survey_domain::{StepId, SurveyStatus};
use uuid::Uuid;

const VALID_JSON: &str = r#"{"isValid": true, "description": "shows what was requested"}"#;

#[tokio::test]
async fn a_full_session_produces_a_reviewable_completed_survey() {
    let catalog = Arc::new(residential_site_catalog());
    let pipeline = CapturePipeline::new(catalog.clone(),
                                        VisionValidationService::with_default_config(MockVisionClient::always(VALID_JSON)),
                                        InMemorySurveyStore::new(),
                                        InMemoryArtifactStore::new());
    let survey_id = Uuid::new_v4();
    let mut session = GuidedSession::start(pipeline, survey_id).await.unwrap();

    session.acknowledge().await; // bienvenida → 0.5
    while !session.at_review() {
        let step = catalog.get(session.position()).unwrap();
        match step.kind() {
            StepKind::Guide => {
                session.acknowledge().await;
            }
            StepKind::Capture => {
                let outcome = session.submit(SubmitRequest::Capture { image: b"frame".to_vec(),
                                                                      content_type: "image/jpeg".to_string() })
                                     .await;
                assert!(outcome.is_completed(), "capture at {} failed", step.id());
            }
            StepKind::ManualEntry => {
                session.submit(SubmitRequest::ManualEntry { value: "150".to_string() }).await;
            }
        }
    }

    // todos los pasos contables quedaron registrados; las guías no escriben
    let survey = session.pipeline().surveys().get(survey_id).await.unwrap();
    assert_eq!(survey.ledger.len(), 12);
    assert!(survey.record(StepId::from_f64(0.5)).is_none());

    // un artefacto por captura, ninguno para la entrada manual
    assert_eq!(session.pipeline().artifacts().len(), 11);
    assert!(session.pipeline().artifacts().contains(&format!("{survey_id}/step_12.jpg")));
    assert!(!session.pipeline().artifacts().contains(&format!("{survey_id}/step_11.jpg")));

    let reviewed = session.enter_review().await.unwrap();
    assert_eq!(reviewed.status, SurveyStatus::UnderReview);

    let assembler = ReviewAssembler::new(&catalog, session.pipeline().surveys(), session.pipeline().artifacts());
    let summary = assembler.assemble(survey_id).await.unwrap();
    assert!(summary.steps
                   .iter()
                   .filter(|s| s.kind != StepKind::Guide)
                   .all(|s| s.completed));

    let completed = session.finish().await.unwrap();
    assert_eq!(completed.status, SurveyStatus::Completed);
    assert!(completed.completed_at.is_some());
}
