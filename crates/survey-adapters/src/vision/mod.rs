//! Adaptador del servicio de validación visual.
//!
//! Separa tres responsabilidades que el contrato del motor ve como una sola:
//! - `prompt`: armado del prompt de sistema (contrato JSON + instrucciones de
//!   extracción de campos nombrados);
//! - `client`: la llamada opaca al modelo de visión (con un cliente simulado
//!   para pruebas y demostración);
//! - `parse`/`extract`: interpretación tolerante de la respuesta cruda y
//!   post-procesamiento según la intención del paso.
mod client;
mod config;
mod extract;
mod parse;
mod prompt;
mod service;

pub use client::{MockVisionClient, VisionClient, VisionClientError, VisionRequest};
pub use config::VisionConfig;
pub use parse::RawAnalysis;
pub use service::VisionValidationService;
