//! survey-domain: modelo de dominio del recorrido guiado (sin IO)
pub mod error;
pub mod record;
pub mod step_id;
pub mod survey;
pub mod verdict;

pub use error::DomainError;
pub use record::{StepAction, StepRecord};
pub use step_id::StepId;
pub use survey::{Survey, SurveyStatus};
pub use verdict::Verdict;
