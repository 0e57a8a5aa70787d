//! Veredicto estructurado del servicio de análisis visual.
//!
//! Un `Verdict` es la opinión del analizador sobre una captura: si satisface
//! el requisito del paso, con qué confianza, y qué valores pudo extraer de
//! etiquetas o placas. El motor no interpreta la imagen; sólo transporta y
//! persiste esta estructura.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Verdict {
    pub is_valid: bool,
    /// Confianza en [0, 1]; el constructor la recorta a ese rango.
    pub confidence: f64,
    /// Explicación legible (retroalimentación del analizador o texto sintetizado).
    pub message: String,
    /// Valor puntual extraído si el paso lo pedía (p. ej. "200A").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_value: Option<String>,
    /// Campos nombrados extraídos de etiquetas. Cadena vacía = "no encontrado".
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub structured_fields: BTreeMap<String, String>,
}

impl Verdict {
    pub fn new(is_valid: bool, confidence: f64, message: impl Into<String>) -> Self {
        Self { is_valid,
               confidence: confidence.clamp(0.0, 1.0),
               message: message.into(),
               extracted_value: None,
               structured_fields: BTreeMap::new() }
    }

    /// Veredicto sintetizado cuando el usuario omite un paso. No hay llamada
    /// al analizador ni artefacto; queda constancia para el revisor humano.
    pub fn skipped() -> Self {
        Verdict::new(false, 0.0, "Step skipped by user")
    }

    /// Veredicto sintetizado para una entrada manual confirmada por el
    /// usuario: válida por definición, con el valor confirmado como extracto.
    pub fn manual_entry(value: impl Into<String>) -> Self {
        let mut v = Verdict::new(true, 1.0, "Data entry confirmed by user");
        v.extracted_value = Some(value.into());
        v
    }

    pub fn with_extracted(mut self, value: impl Into<String>) -> Self {
        self.extracted_value = Some(value.into());
        self
    }

    pub fn with_structured(mut self, fields: BTreeMap<String, String>) -> Self {
        self.structured_fields = fields;
        self
    }

    /// Campos estructurados con valor real; las cadenas vacías se tratan como
    /// "no encontrado" y se filtran.
    pub fn present_fields(&self) -> BTreeMap<String, String> {
        self.structured_fields
            .iter()
            .filter(|(_, v)| !v.trim().is_empty())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::Verdict;
    use std::collections::BTreeMap;

    #[test]
    fn confidence_is_clamped_to_unit_range() {
        assert_eq!(Verdict::new(true, 1.7, "m").confidence, 1.0);
        assert_eq!(Verdict::new(false, -0.2, "m").confidence, 0.0);
    }

    #[test]
    fn skip_verdict_is_invalid_with_zero_confidence() {
        let v = Verdict::skipped();
        assert!(!v.is_valid);
        assert_eq!(v.confidence, 0.0);
        assert_eq!(v.message, "Step skipped by user");
    }

    #[test]
    fn manual_entry_verdict_carries_the_confirmed_value() {
        let v = Verdict::manual_entry("200");
        assert!(v.is_valid);
        assert_eq!(v.confidence, 1.0);
        assert_eq!(v.extracted_value.as_deref(), Some("200"));
    }

    #[test]
    fn present_fields_filters_blank_values() {
        let mut fields = BTreeMap::new();
        fields.insert("lra".to_string(), "112A".to_string());
        fields.insert("rla".to_string(), "".to_string());
        fields.insert("voltage".to_string(), "   ".to_string());
        let v = Verdict::new(true, 0.9, "ok").with_structured(fields);
        let present = v.present_fields();
        assert_eq!(present.len(), 1);
        assert_eq!(present.get("lra").map(String::as_str), Some("112A"));
    }
}
