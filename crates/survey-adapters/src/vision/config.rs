//! Configuración del adaptador de visión desde variables de entorno.
//! Convención `SURVEY_VISION_*`, con valores por defecto razonables.

use std::env;

use dotenvy::dotenv;
use once_cell::sync::Lazy;

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

/// Límite del original para el payload de imagen aceptado por el analizador.
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct VisionConfig {
    /// Modelo de visión a invocar.
    pub model: String,
    /// Tope en segundos sugerido para la llamada (lo aplica el pipeline).
    pub timeout_secs: u64,
    /// Tamaño máximo de imagen aceptado antes de llamar al modelo.
    pub max_image_bytes: usize,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self { model: "gpt-4o".to_string(),
               timeout_secs: 30,
               max_image_bytes: DEFAULT_MAX_IMAGE_BYTES }
    }
}

impl VisionConfig {
    pub fn from_env() -> Self {
        Lazy::force(&DOTENV_LOADED);
        let defaults = Self::default();
        let model = env::var("SURVEY_VISION_MODEL").unwrap_or(defaults.model);
        let timeout_secs = env::var("SURVEY_VISION_TIMEOUT_SECS").ok()
                                                                 .and_then(|v| v.parse().ok())
                                                                 .unwrap_or(defaults.timeout_secs);
        let max_image_bytes = env::var("SURVEY_VISION_MAX_IMAGE_BYTES").ok()
                                                                       .and_then(|v| v.parse().ok())
                                                                       .unwrap_or(defaults.max_image_bytes);
        Self { model, timeout_secs, max_image_bytes }
    }
}
