//! Recorrido de demostración del motor guiado de captura.
//!
//! Conduce una sesión completa contra el cliente de visión simulado y los
//! almacenes locales: guías, capturas (con un rechazo y una retoma en el
//! medio), una omisión, la confirmación de amperaje y el resumen final de
//! revisión.
use std::sync::Arc;

use uuid::Uuid;

use std::time::Duration;

use survey_adapters::{residential_site_catalog, MockVisionClient, VisionConfig, VisionValidationService};
use survey_core::catalog::StepKind;
use survey_core::store::InMemorySurveyStore;
use survey_core::{CapturePipeline, GuidedSession, ReviewAssembler, StepOutcome, SubmitRequest};

#[cfg(feature = "fs_demo")]
fn artifact_store() -> survey_adapters::FsArtifactStore {
    survey_adapters::FsArtifactStore::new("artifacts")
}

#[cfg(not(feature = "fs_demo"))]
fn artifact_store() -> survey_core::InMemoryArtifactStore {
    survey_core::InMemoryArtifactStore::new()
}

const VALID_METER: &str = r#"{"isValid": true, "description": "A clear electricity meter, numbers legible",
                              "structuredData": {"model": "EM-420", "manufacturer": "Itron", "serial": "", "voltage": "240V"}}"#;
const BLURRY: &str = r#"{"isValid": false, "description": "The photo is too blurry to identify a meter"}"#;
const VALID_GENERIC: &str = r#"{"isValid": true, "description": "Shows what was requested"}"#;

fn capture(bytes: &[u8]) -> SubmitRequest {
    SubmitRequest::Capture { image: bytes.to_vec(), content_type: "image/jpeg".to_string() }
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let catalog = Arc::new(residential_site_catalog());
    // primera foto rechazada para mostrar la retoma; después todo pasa
    let client = MockVisionClient::scripted([BLURRY, VALID_METER, VALID_GENERIC]);
    let config = VisionConfig::from_env();
    let timeout = Duration::from_secs(config.timeout_secs);
    let pipeline = CapturePipeline::new(catalog.clone(),
                                        VisionValidationService::new(client, config),
                                        InMemorySurveyStore::new(),
                                        artifact_store()).with_validation_timeout(Some(timeout));

    let survey_id = Uuid::new_v4();
    let mut session = GuidedSession::start(pipeline, survey_id).await.expect("open session");
    println!("== Site survey session {survey_id} ==");

    // Bienvenida → primer paso del catálogo
    session.acknowledge().await;

    while !session.at_review() {
        let position = session.position();
        let step = catalog.get(position).expect("position inside catalog");
        let progress = catalog.progress_at(position);
        println!("\n[{position}] {} ({} of {})", step.title(), progress.current, progress.total);

        match step.kind() {
            StepKind::Guide => {
                println!("  guide screen, user taps the confirmation button");
                session.acknowledge().await;
            }
            StepKind::Capture if step.skippable() => {
                println!("  conditional step, user skips it");
                session.skip().await;
            }
            StepKind::Capture => {
                let mut outcome = session.submit(capture(b"simulated camera frame")).await;
                while let StepOutcome::Completed(verdict) = &outcome {
                    if verdict.is_valid {
                        println!("  accepted: {}", verdict.message);
                        break;
                    }
                    println!("  rejected: {} -> retaking", verdict.message);
                    outcome = session.submit(capture(b"simulated retake frame")).await;
                }
                if let StepOutcome::Failed(reason) = outcome {
                    println!("  analysis failed ({reason}), keeping the photo and retrying later");
                }
            }
            StepKind::ManualEntry => {
                let related = session.pipeline().related_artifact_key(survey_id, position).await;
                match related {
                    Some(key) => println!("  re-reading the stored photo at {key}"),
                    None => println!("  no prior photo, falling back to manual input"),
                }
                session.submit(SubmitRequest::ManualEntry { value: "200".to_string() }).await;
                println!("  user confirms 200A");
            }
        }
    }

    let survey = session.enter_review().await.expect("enter review");
    println!("\n== Review ({:?}) ==", survey.status);
    let assembler = ReviewAssembler::new(&catalog, session.pipeline().surveys(), session.pipeline().artifacts());
    let summary = assembler.assemble(survey_id).await.expect("assemble review");
    for entry in &summary.steps {
        let state = if entry.skipped {
            "skipped"
        } else if entry.manually_entered {
            "entered"
        } else if entry.completed {
            "captured"
        } else {
            "pending"
        };
        let value = entry.extracted_value.as_deref().unwrap_or("-");
        println!("  [{}] {:<40} {:<9} value: {}", entry.step_id, entry.title, state, value);
        for (field, found) in &entry.structured_fields {
            println!("        {field}: {found}");
        }
    }

    let finished = session.finish().await.expect("complete survey");
    println!("\nSurvey completed at {:?}", finished.completed_at);
}
