//! Post-procesamiento del análisis según la intención del paso.
//!
//! Validación simple: el veredicto sigue al `isValid` del modelo con
//! confianza fija alta/baja. Extracción de valor: cadena de recuperación en
//! orden de preferencia — valor extraído explícito, número de amperaje en la
//! descripción, rechazo explícito ("unable to read"), y como último recurso
//! cualquier número de 2-3 dígitos suelto.
use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use survey_domain::Verdict;

use super::parse::RawAnalysis;

static AMPERAGE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(\d+)\s*A").expect("amperage regex"));
static BARE_NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{2,3})\b").expect("bare number regex"));

fn structured(analysis: &RawAnalysis) -> BTreeMap<String, String> {
    analysis.structured_data.clone().unwrap_or_default()
}

/// Pasos de validación: juicio directo del modelo.
pub(crate) fn process_validation(analysis: RawAnalysis) -> Verdict {
    let is_valid = analysis.is_valid == Some(true);
    let description = analysis.description
                              .clone()
                              .unwrap_or_else(|| "No description provided".to_string());
    let confidence = if is_valid { 0.9 } else { 0.1 };
    let mut verdict = Verdict::new(is_valid, confidence, description).with_structured(structured(&analysis));
    if let Some(value) = analysis.extracted_value {
        verdict = verdict.with_extracted(value);
    }
    verdict
}

/// Pasos de lectura de valor: cadena de recuperación con confianza
/// decreciente.
pub(crate) fn process_extraction(analysis: RawAnalysis) -> Verdict {
    let fields = structured(&analysis);
    let description = analysis.description.clone().unwrap_or_default();

    // 1. valor extraído explícito en el JSON
    if let Some(value) = analysis.extracted_value.as_deref().filter(|v| !v.trim().is_empty()) {
        let message = if description.is_empty() {
            format!("Successfully extracted value: {value}")
        } else {
            description.clone()
        };
        return Verdict::new(true, 0.95, message).with_extracted(value.to_string())
                                                .with_structured(fields);
    }

    // 2. número de amperaje dentro de la descripción ("... 200 A ...")
    if let Some(caps) = AMPERAGE_RE.captures(&description) {
        let value = format!("{}A", &caps[1]);
        return Verdict::new(true, 0.9, description.clone()).with_extracted(value)
                                                           .with_structured(fields);
    }

    // 3. rechazo explícito del modelo
    let lowered = description.to_lowercase();
    if lowered.contains("unable to read") || lowered.contains("cannot read") {
        let message = if description.is_empty() {
            "Unable to read value from image".to_string()
        } else {
            description
        };
        return Verdict::new(false, 0.0, message).with_structured(fields);
    }

    // 4. último recurso: cualquier número suelto de 2-3 dígitos
    if let Some(caps) = BARE_NUMBER_RE.captures(&description) {
        let value = format!("{}A", &caps[1]);
        return Verdict::new(true, 0.7, description.clone()).with_extracted(value)
                                                           .with_structured(fields);
    }

    let message = if description.is_empty() {
        "Could not extract a value from the image".to_string()
    } else {
        description
    };
    Verdict::new(false, 0.0, message).with_structured(fields)
}

#[cfg(test)]
mod tests {
    use super::{process_extraction, process_validation};
    use crate::vision::parse::RawAnalysis;

    fn analysis(description: &str) -> RawAnalysis {
        RawAnalysis { is_valid: None,
                      description: Some(description.to_string()),
                      extracted_value: None,
                      structured_data: None }
    }

    #[test]
    fn validation_maps_the_model_judgement_to_fixed_confidence() {
        let mut raw = analysis("a sharp meter photo");
        raw.is_valid = Some(true);
        let verdict = process_validation(raw);
        assert!(verdict.is_valid);
        assert_eq!(verdict.confidence, 0.9);

        let mut raw = analysis("too blurry");
        raw.is_valid = Some(false);
        let verdict = process_validation(raw);
        assert!(!verdict.is_valid);
        assert_eq!(verdict.confidence, 0.1);
    }

    #[test]
    fn missing_is_valid_counts_as_invalid() {
        let verdict = process_validation(analysis("no judgement came back"));
        assert!(!verdict.is_valid);
    }

    #[test]
    fn explicit_extracted_value_wins_with_highest_confidence() {
        let mut raw = analysis("the switch reads 200");
        raw.extracted_value = Some("200A".to_string());
        let verdict = process_extraction(raw);
        assert!(verdict.is_valid);
        assert_eq!(verdict.confidence, 0.95);
        assert_eq!(verdict.extracted_value.as_deref(), Some("200A"));
    }

    #[test]
    fn amperage_is_recovered_from_the_description() {
        let verdict = process_extraction(analysis("The main switch shows 150 A on its handle"));
        assert!(verdict.is_valid);
        assert_eq!(verdict.confidence, 0.9);
        assert_eq!(verdict.extracted_value.as_deref(), Some("150A"));
    }

    #[test]
    fn explicit_refusal_fails_before_the_bare_number_fallback() {
        // "read" no debe dispararse como número; el rechazo explícito manda
        let verdict = process_extraction(analysis("Unable to read amperage from the photo"));
        assert!(!verdict.is_valid);
        assert_eq!(verdict.extracted_value, None);
    }

    #[test]
    fn bare_two_or_three_digit_number_is_a_last_resort() {
        let verdict = process_extraction(analysis("the biggest switch is marked 125 on top"));
        assert!(verdict.is_valid);
        assert_eq!(verdict.confidence, 0.7);
        assert_eq!(verdict.extracted_value.as_deref(), Some("125A"));
    }

    #[test]
    fn nothing_recoverable_means_failure() {
        let verdict = process_extraction(analysis("a wall with no switch visible"));
        assert!(!verdict.is_valid);
        assert_eq!(verdict.confidence, 0.0);
    }
}
