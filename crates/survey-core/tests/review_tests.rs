//! Pruebas del ensamblador de revisión.
use std::sync::Arc;

use survey_adapters::{residential_site_catalog, MockVisionClient, VisionValidationService};
use survey_core::store::{InMemoryArtifactStore, InMemorySurveyStore, SurveyStore};
use survey_core::{CapturePipeline, ReviewAssembler, SubmitRequest};
use survey_domain::{StepId, SurveyStatus};
use uuid::Uuid;

const LABEL_JSON: &str = r#"{"isValid": true, "description": "a readable label",
                             "structuredData": {"lra": "112A", "rla": "", "voltage": "240V", "frequency": ""}}"#;

fn capture(bytes: &[u8]) -> SubmitRequest {
    SubmitRequest::Capture { image: bytes.to_vec(), content_type: "image/jpeg".to_string() }
}

#[tokio::test]
async fn review_joins_catalog_order_with_the_ledger() {
    let catalog = Arc::new(residential_site_catalog());
    let pipeline = CapturePipeline::new(catalog.clone(),
                                        VisionValidationService::with_default_config(MockVisionClient::always(LABEL_JSON)),
                                        InMemorySurveyStore::new(),
                                        InMemoryArtifactStore::new());
    let survey_id = Uuid::new_v4();

    pipeline.submit(survey_id, StepId::whole(7), capture(b"label photo")).await;
    pipeline.submit(survey_id, StepId::whole(8), SubmitRequest::Skip).await;
    pipeline.submit(survey_id, StepId::whole(11), SubmitRequest::ManualEntry { value: "200".to_string() }).await;

    let assembler = ReviewAssembler::new(&catalog, pipeline.surveys(), pipeline.artifacts());
    let summary = assembler.assemble(survey_id).await.unwrap();

    // el resumen sigue el orden canónico del catálogo completo
    assert_eq!(summary.steps.len(), catalog.len());
    let ids: Vec<StepId> = summary.steps.iter().map(|s| s.step_id).collect();
    assert_eq!(ids, catalog.sequence_ids());

    let labeled = summary.steps.iter().find(|s| s.step_id == StepId::whole(7)).unwrap();
    assert!(labeled.completed);
    assert!(!labeled.skipped);
    // los campos en blanco se tratan como "no encontrado" y se filtran
    assert_eq!(labeled.structured_fields.len(), 2);
    assert!(labeled.structured_fields.contains_key("lra"));
    assert!(labeled.structured_fields.contains_key("voltage"));
    assert!(labeled.artifact_url.as_deref().unwrap().contains("step_7.jpg"));

    let skipped = summary.steps.iter().find(|s| s.step_id == StepId::whole(8)).unwrap();
    assert!(skipped.completed);
    assert!(skipped.skipped);
    assert!(skipped.artifact_url.is_none());

    let manual = summary.steps.iter().find(|s| s.step_id == StepId::whole(11)).unwrap();
    assert!(manual.manually_entered);
    assert_eq!(manual.extracted_value.as_deref(), Some("200"));

    let untouched = summary.steps.iter().find(|s| s.step_id == StepId::whole(1)).unwrap();
    assert!(!untouched.completed);
    assert!(untouched.message.is_none());

    // la proyección JSON conserva los ids decimales y el estado
    let json = summary.to_json();
    assert_eq!(json["status"], "UNDER_REVIEW");
    assert_eq!(json["steps"][0]["step_id"], 0.5);
}

#[tokio::test]
async fn first_entry_to_review_transitions_the_survey() {
    let catalog = Arc::new(residential_site_catalog());
    let surveys = InMemorySurveyStore::new();
    let artifacts = InMemoryArtifactStore::new();
    let survey_id = Uuid::new_v4();
    surveys.find_or_create(survey_id).await.unwrap();

    let assembler = ReviewAssembler::new(&catalog, &surveys, &artifacts);
    let summary = assembler.assemble(survey_id).await.unwrap();
    assert_eq!(summary.status, SurveyStatus::UnderReview);
    assert_eq!(surveys.get(survey_id).await.unwrap().status, SurveyStatus::UnderReview);

    // re-ensamblar no vuelve a transicionar ni falla
    let again = assembler.assemble(survey_id).await.unwrap();
    assert_eq!(again.status, SurveyStatus::UnderReview);
}

#[tokio::test]
async fn assembling_a_completed_survey_leaves_it_completed() {
    let catalog = Arc::new(residential_site_catalog());
    let surveys = InMemorySurveyStore::new();
    let artifacts = InMemoryArtifactStore::new();
    let survey_id = Uuid::new_v4();
    surveys.find_or_create(survey_id).await.unwrap();
    surveys.transition_status(survey_id, SurveyStatus::Completed).await.unwrap();

    let assembler = ReviewAssembler::new(&catalog, &surveys, &artifacts);
    let summary = assembler.assemble(survey_id).await.unwrap();
    assert_eq!(summary.status, SurveyStatus::Completed);
}

#[tokio::test]
async fn unknown_surveys_are_not_created_by_review() {
    let catalog = Arc::new(residential_site_catalog());
    let surveys = InMemorySurveyStore::new();
    let artifacts = InMemoryArtifactStore::new();
    let assembler = ReviewAssembler::new(&catalog, &surveys, &artifacts);
    assert!(assembler.assemble(Uuid::new_v4()).await.is_err());
}

#[tokio::test]
async fn pending_steps_lists_uncompleted_counted_steps() {
    let catalog = Arc::new(residential_site_catalog());
    let pipeline = CapturePipeline::new(catalog.clone(),
                                        VisionValidationService::with_default_config(MockVisionClient::always(LABEL_JSON)),
                                        InMemorySurveyStore::new(),
                                        InMemoryArtifactStore::new());
    let survey_id = Uuid::new_v4();
    pipeline.submit(survey_id, StepId::whole(1), capture(b"meter")).await;

    let assembler = ReviewAssembler::new(&catalog, pipeline.surveys(), pipeline.artifacts());
    let pending = assembler.pending_steps(survey_id).await.unwrap();
    // 12 pasos contables, uno resuelto; las guías nunca aparecen
    assert_eq!(pending.len(), 11);
    assert!(!pending.contains(&StepId::whole(1)));
    assert!(!pending.contains(&StepId::from_f64(0.5)));
}
