//! Contrato del servicio de validación visual.
//!
//! La llamada es opaca para el motor: recibe los bytes de la imagen y la
//! configuración de prompt del paso, y devuelve un veredicto estructurado o
//! un error de servicio. Es la única operación del pipeline con latencia
//! apreciable (segundos) y su único punto de suspensión.
use async_trait::async_trait;

use survey_domain::Verdict;

use crate::catalog::PromptConfig;
use crate::errors::ValidationServiceError;

#[async_trait]
pub trait ValidationService: Send + Sync {
    async fn validate(&self,
                      image: &[u8],
                      content_type: &str,
                      prompt: &PromptConfig)
                      -> Result<Verdict, ValidationServiceError>;
}
