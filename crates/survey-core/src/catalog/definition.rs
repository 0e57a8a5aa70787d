//! Definición de un paso del catálogo.
//!
//! Los pasos vienen en tres sabores cerrados, de modo que el secuenciador y
//! el pipeline puedan hacer match exhaustivo sin adivinar campos opcionales:
//! - `Guide`: pantalla informativa de transición, sin captura ni análisis.
//! - `Capture`: toma de foto validada por el servicio de visión.
//! - `ManualEntry`: confirmación de un dato por el usuario, normalmente
//!   re-analizando la foto de un paso de captura anterior (`related_step`).
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use survey_domain::StepId;

/// Etiqueta plana del sabor de paso, para proyecciones y reportes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind { Guide, Capture, ManualEntry }

/// Qué se espera del análisis de la imagen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisIntent {
    /// Juzgar si la imagen satisface el requisito del paso.
    #[default]
    Validate,
    /// Leer un valor puntual de la imagen (p. ej. el amperaje del interruptor).
    ExtractValue,
}

/// Instrucciones opacas para el servicio de validación: prompt libre más un
/// mapa opcional de campos nombrados a extraer (nombre → descripción para el
/// analizador). El orden de declaración se conserva.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptConfig {
    pub user_prompt: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub structured_fields: IndexMap<String, String>,
    #[serde(default)]
    pub intent: AnalysisIntent,
}

impl PromptConfig {
    pub fn validation(user_prompt: impl Into<String>) -> Self {
        Self { user_prompt: user_prompt.into(),
               structured_fields: IndexMap::new(),
               intent: AnalysisIntent::Validate }
    }

    pub fn with_fields(mut self, fields: IndexMap<String, String>) -> Self {
        self.structured_fields = fields;
        self
    }

    pub fn extracting(mut self) -> Self {
        self.intent = AnalysisIntent::ExtractValue;
        self
    }

    pub fn wants_extraction(&self) -> bool {
        self.intent == AnalysisIntent::ExtractValue
    }
}

/// Contenido de una pantalla de guía.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuideScreen {
    pub main_description: String,
    pub paragraphs: Vec<String>,
    pub button_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tip: Option<String>,
}

/// Clase de valor que acepta un paso de entrada manual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind { Amperage, Number, Text }

/// Campo de entrada manual con sus límites de validación.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryField {
    pub kind: EntryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
}

impl EntryField {
    /// Normaliza y valida un valor confirmado por el usuario. Para entradas
    /// numéricas se descartan los caracteres no numéricos (el usuario suele
    /// teclear "200A") y se aplican los límites declarados.
    pub fn validate(&self, raw: &str) -> Result<String, String> {
        match self.kind {
            EntryKind::Text => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Err("value must not be empty".to_string());
                }
                Ok(trimmed.to_string())
            }
            EntryKind::Amperage | EntryKind::Number => {
                let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
                if digits.is_empty() {
                    return Err("value must contain a number".to_string());
                }
                let value: u32 = digits.parse().map_err(|_| "value out of numeric range".to_string())?;
                if let Some(min) = self.min {
                    if value < min {
                        return Err(format!("value must be at least {min}"));
                    }
                }
                if let Some(max) = self.max {
                    if value > max {
                        return Err(format!("value must be at most {max}"));
                    }
                }
                Ok(value.to_string())
            }
        }
    }
}

/// Un paso del catálogo. Inmutable una vez construida la tabla.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepDefinition {
    Guide {
        id: StepId,
        title: String,
        description: String,
        instructions: String,
        tips: Vec<String>,
        guide: GuideScreen,
    },
    Capture {
        id: StepId,
        title: String,
        description: String,
        instructions: String,
        tips: Vec<String>,
        skippable: bool,
        prompt: PromptConfig,
    },
    ManualEntry {
        id: StepId,
        title: String,
        description: String,
        instructions: String,
        tips: Vec<String>,
        skippable: bool,
        /// Paso de captura cuya foto almacenada re-analiza este paso.
        related_step: StepId,
        entry: EntryField,
        prompt: PromptConfig,
    },
}

impl StepDefinition {
    pub fn id(&self) -> StepId {
        match self {
            StepDefinition::Guide { id, .. }
            | StepDefinition::Capture { id, .. }
            | StepDefinition::ManualEntry { id, .. } => *id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            StepDefinition::Guide { title, .. }
            | StepDefinition::Capture { title, .. }
            | StepDefinition::ManualEntry { title, .. } => title,
        }
    }

    pub fn instructions(&self) -> &str {
        match self {
            StepDefinition::Guide { instructions, .. }
            | StepDefinition::Capture { instructions, .. }
            | StepDefinition::ManualEntry { instructions, .. } => instructions,
        }
    }

    pub fn kind(&self) -> StepKind {
        match self {
            StepDefinition::Guide { .. } => StepKind::Guide,
            StepDefinition::Capture { .. } => StepKind::Capture,
            StepDefinition::ManualEntry { .. } => StepKind::ManualEntry,
        }
    }

    pub fn skippable(&self) -> bool {
        match self {
            StepDefinition::Guide { .. } => false,
            StepDefinition::Capture { skippable, .. }
            | StepDefinition::ManualEntry { skippable, .. } => *skippable,
        }
    }

    /// Configuración de análisis, si el paso la tiene (las guías no).
    pub fn prompt(&self) -> Option<&PromptConfig> {
        match self {
            StepDefinition::Guide { .. } => None,
            StepDefinition::Capture { prompt, .. }
            | StepDefinition::ManualEntry { prompt, .. } => Some(prompt),
        }
    }

    pub fn related_step(&self) -> Option<StepId> {
        match self {
            StepDefinition::ManualEntry { related_step, .. } => Some(*related_step),
            _ => None,
        }
    }

    pub fn entry(&self) -> Option<&EntryField> {
        match self {
            StepDefinition::ManualEntry { entry, .. } => Some(entry),
            _ => None,
        }
    }

    /// Las guías no cuentan para la barra de progreso.
    pub fn is_counted(&self) -> bool {
        !matches!(self, StepDefinition::Guide { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::{EntryField, EntryKind};

    fn amperage_field() -> EntryField {
        EntryField { kind: EntryKind::Amperage,
                     placeholder: Some("Enter amperage (e.g. 200)".to_string()),
                     min: Some(50),
                     max: Some(400) }
    }

    #[test]
    fn entry_validation_strips_unit_suffix() {
        assert_eq!(amperage_field().validate("200A").unwrap(), "200");
        assert_eq!(amperage_field().validate(" 125 a ").unwrap(), "125");
    }

    #[test]
    fn entry_validation_enforces_bounds() {
        assert!(amperage_field().validate("30").is_err());
        assert!(amperage_field().validate("900").is_err());
        assert!(amperage_field().validate("no digits").is_err());
    }

    #[test]
    fn text_entry_rejects_blank_values() {
        let field = EntryField { kind: EntryKind::Text, placeholder: None, min: None, max: None };
        assert!(field.validate("   ").is_err());
        assert_eq!(field.validate(" serial-9 ").unwrap(), "serial-9");
    }
}
