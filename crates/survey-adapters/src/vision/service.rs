//! Implementación del contrato `ValidationService` sobre un `VisionClient`.
use async_trait::async_trait;
use log::debug;

use survey_core::catalog::PromptConfig;
use survey_core::errors::ValidationServiceError;
use survey_core::validate::ValidationService;
use survey_domain::Verdict;

use super::client::{VisionClient, VisionRequest};
use super::config::VisionConfig;
use super::extract::{process_extraction, process_validation};
use super::parse::parse_response;
use super::prompt::system_prompt;

pub struct VisionValidationService<C: VisionClient> {
    client: C,
    config: VisionConfig,
}

impl<C: VisionClient> VisionValidationService<C> {
    pub fn new(client: C, config: VisionConfig) -> Self {
        Self { client, config }
    }

    pub fn with_default_config(client: C) -> Self {
        Self::new(client, VisionConfig::default())
    }

    pub fn config(&self) -> &VisionConfig {
        &self.config
    }
}

#[async_trait]
impl<C: VisionClient> ValidationService for VisionValidationService<C> {
    async fn validate(&self,
                      image: &[u8],
                      content_type: &str,
                      prompt: &PromptConfig)
                      -> Result<Verdict, ValidationServiceError> {
        // Guardas previas a la llamada: tipo y tamaño, igual que el endpoint
        // original antes de tocar el modelo.
        if !content_type.starts_with("image/") {
            return Err(ValidationServiceError::Rejected(format!("unsupported content type {content_type}")));
        }
        if image.len() > self.config.max_image_bytes {
            return Err(ValidationServiceError::Rejected(format!("image of {} bytes exceeds the {} byte limit",
                                                                image.len(),
                                                                self.config.max_image_bytes)));
        }

        let system = system_prompt(&prompt.structured_fields);
        let request = VisionRequest { model: &self.config.model,
                                      system_prompt: &system,
                                      user_prompt: &prompt.user_prompt,
                                      image,
                                      content_type };
        let raw = self.client
                      .complete(request)
                      .await
                      .map_err(|err| ValidationServiceError::Unavailable(err.to_string()))?;
        debug!("vision response: {} bytes of text", raw.len());

        let analysis = parse_response(&raw);
        Ok(if prompt.wants_extraction() {
            process_extraction(analysis)
        } else {
            process_validation(analysis)
        })
    }
}
