//! survey-core: motor del recorrido guiado de captura
pub mod catalog;
pub mod errors;
pub mod pipeline;
pub mod review;
pub mod sequencer;
pub mod session;
pub mod store;
pub mod validate;

pub use catalog::{AnalysisIntent, EntryField, EntryKind, GuideScreen, PromptConfig, StepCatalog, StepDefinition, StepKind};
pub use errors::{ArtifactStoreError, CatalogError, StoreError, ValidationServiceError};
pub use pipeline::{CapturePipeline, StepOutcome, SubmitRequest};
pub use review::{ReviewAssembler, ReviewStepEntry, ReviewSummary};
pub use sequencer::{RetakeContext, Sequencer};
pub use session::GuidedSession;
pub use store::{ArtifactStore, InMemoryArtifactStore, InMemorySurveyStore, SurveyStore};
pub use validate::ValidationService;
