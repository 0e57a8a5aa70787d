//! Catálogo de pasos: definiciones inmutables y tabla ordenada.
mod definition;
mod table;

pub use definition::{AnalysisIntent, EntryField, EntryKind, GuideScreen, PromptConfig, StepDefinition, StepKind};
pub use table::{Progress, StepCatalog};
