//! Almacenes del motor: agregados por sesión y artefactos binarios.
mod artifact;
mod survey;

pub use artifact::{ArtifactStore, InMemoryArtifactStore};
pub use survey::{InMemorySurveyStore, SurveyStore};
