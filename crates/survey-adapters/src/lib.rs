//! survey-adapters: catálogo concreto, adaptador de visión y almacenes locales
pub mod catalog;
pub mod fs_store;
pub mod vision;

pub use catalog::residential_site_catalog;
pub use fs_store::FsArtifactStore;
pub use vision::{MockVisionClient, VisionClient, VisionClientError, VisionConfig, VisionRequest, VisionValidationService};
