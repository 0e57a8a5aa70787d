//! Armado del prompt de sistema para el analizador.
//!
//! El contrato con el modelo es un objeto JSON fijo; cuando el paso declara
//! campos estructurados, el prompt enumera cada clave con su descripción y
//! exige que TODAS las claves aparezcan siempre (cadena vacía = no
//! encontrado), para que la respuesta sea procesable sin adivinar.
use indexmap::IndexMap;

const ANALYST_ROLE: &str =
    "You are an expert electrical system analyst specializing in battery system installations.";

pub(crate) fn system_prompt(structured_fields: &IndexMap<String, String>) -> String {
    let structured_json = if structured_fields.is_empty() {
        String::new()
    } else {
        let entries: Vec<String> = structured_fields.keys()
                                                    .map(|key| {
                                                        format!("    \"{key}\": \"value if found, empty string if not found\"")
                                                    })
                                                    .collect();
        format!(",\n  \"structuredData\": {{\n{}\n  }}", entries.join(",\n"))
    };

    let structured_instructions = if structured_fields.is_empty() {
        String::new()
    } else {
        let described: Vec<String> = structured_fields.iter()
                                                      .map(|(key, description)| format!("  * {key}: {description}"))
                                                      .collect();
        format!("\n- In \"structuredData\", extract the following specifications from labels:\n{}\n\
                 - ALWAYS include ALL keys in structuredData, even if not found - use empty string (\"\") \
                 for values you cannot clearly read\n\
                 - Only put actual values if you can clearly see and read them from the image",
                described.join("\n"))
    };

    format!("{ANALYST_ROLE}\n\n\
             IMPORTANT: You must respond in the following JSON format:\n\
             {{\n  \"isValid\": true/false,\n  \"description\": \"Detailed description of what you see in \
             the image\",\n  \"extractedValue\": \"extracted value if applicable (e.g., '200A' for \
             amperage)\"{structured_json}\n}}\n\n\
             For validation:\n\
             - Set \"isValid\" to true if the image clearly shows what was requested and is suitable for \
             the survey\n\
             - Set \"isValid\" to false if the image doesn't show the requested content, is unclear, or \
             unsuitable\n\
             - In \"description\", explain what you see and why it is or isn't valid\n\
             - If asked to extract a specific value (like amperage), include it in \
             \"extractedValue\"{structured_instructions}")
}

#[cfg(test)]
mod tests {
    use super::system_prompt;
    use indexmap::IndexMap;

    #[test]
    fn plain_prompt_has_no_structured_block() {
        let prompt = system_prompt(&IndexMap::new());
        assert!(prompt.contains("\"isValid\""));
        assert!(!prompt.contains("structuredData"));
    }

    #[test]
    fn structured_prompt_lists_every_requested_key() {
        let mut fields = IndexMap::new();
        fields.insert("lra".to_string(), "LRA - look for 'LRA'".to_string());
        fields.insert("voltage".to_string(), "Voltage ratings".to_string());
        let prompt = system_prompt(&fields);
        assert!(prompt.contains("\"lra\": \"value if found, empty string if not found\""));
        assert!(prompt.contains("\"voltage\": \"value if found, empty string if not found\""));
        assert!(prompt.contains("* lra: LRA - look for 'LRA'"));
        assert!(prompt.contains("* voltage: Voltage ratings"));
        assert!(prompt.contains("ALWAYS include ALL keys"));
    }
}
