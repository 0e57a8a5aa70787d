//! Interpretación tolerante de la respuesta cruda del modelo.
//!
//! El modelo promete JSON pero no siempre cumple: puede envolverlo en vallas
//! de código markdown o devolver prosa. La política es degradar, nunca
//! fallar: una respuesta no parseable se convierte en un análisis inválido
//! que conserva el texto crudo como descripción, para que el revisor humano
//! vea qué dijo el modelo.
use std::collections::BTreeMap;

use serde::Deserialize;

/// Forma cruda de la respuesta del analizador, tal como viaja en JSON.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawAnalysis {
    pub is_valid: Option<bool>,
    pub description: Option<String>,
    pub extracted_value: Option<String>,
    pub structured_data: Option<BTreeMap<String, String>>,
}

/// Parsea el texto crudo del modelo. Nunca falla: lo no parseable degrada a
/// `is_valid = false` con el texto como descripción.
pub(crate) fn parse_response(raw: &str) -> RawAnalysis {
    let cleaned = strip_code_fences(raw);
    match serde_json::from_str::<RawAnalysis>(&cleaned) {
        Ok(analysis) => analysis,
        Err(_) => RawAnalysis { is_valid: Some(false),
                                description: Some(raw.trim().to_string()),
                                extracted_value: None,
                                structured_data: None },
    }
}

/// Quita vallas de código markdown (```json ... ```) si envuelven el texto.
pub(crate) fn strip_code_fences(raw: &str) -> String {
    let trimmed = raw.trim();
    if !trimmed.starts_with("```") {
        return trimmed.to_string();
    }
    let mut lines: Vec<&str> = trimmed.lines().collect();
    if let Some(first) = lines.first() {
        if first.trim_start().starts_with("```") {
            lines.remove(0);
        }
    }
    if let Some(last) = lines.last() {
        if last.trim_start().starts_with("```") {
            lines.pop();
        }
    }
    lines.join("\n").trim().to_string()
}
