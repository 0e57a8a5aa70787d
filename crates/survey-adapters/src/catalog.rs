//! Catálogo por defecto: relevamiento residencial de instalación eléctrica.
//!
//! La tabla completa del recorrido, tal como la conduce la aplicación móvil:
//! tres tramos (medidor exterior, equipos de A/C, tablero interior) con sus
//! pantallas de guía en posiciones fraccionarias (0.5, 6.5, 8.5), los pasos
//! de captura numerados 1..12 y el paso de confirmación de amperaje (11) que
//! re-analiza la foto del interruptor principal (10).
use indexmap::IndexMap;

use survey_core::catalog::{EntryField, EntryKind, GuideScreen, PromptConfig, StepCatalog, StepDefinition};
use survey_domain::StepId;

fn fields(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn guide(id: f64,
         title: &str,
         description: &str,
         instructions: &str,
         tips: &[&str],
         main_description: &str,
         paragraphs: &[&str],
         button_label: &str,
         tip: &str)
         -> StepDefinition {
    StepDefinition::Guide { id: StepId::from_f64(id),
                            title: title.to_string(),
                            description: description.to_string(),
                            instructions: instructions.to_string(),
                            tips: strings(tips),
                            guide: GuideScreen { main_description: main_description.to_string(),
                                                 paragraphs: strings(paragraphs),
                                                 button_label: button_label.to_string(),
                                                 tip: Some(tip.to_string()) } }
}

fn capture(id: f64,
           title: &str,
           description: &str,
           instructions: &str,
           tips: &[&str],
           skippable: bool,
           prompt: PromptConfig)
           -> StepDefinition {
    StepDefinition::Capture { id: StepId::from_f64(id),
                              title: title.to_string(),
                              description: description.to_string(),
                              instructions: instructions.to_string(),
                              tips: strings(tips),
                              skippable,
                              prompt }
}

/// Campos de etiqueta comunes a los pasos de placa de A/C.
fn ac_label_fields() -> IndexMap<String, String> {
    fields(&[("lra", "LRA (Locked Rotor Amperage) - look for 'LRA' followed by a number and 'A'"),
             ("rla", "RLA (Rated Load Amperage) - look for 'RLA' followed by a number and 'A'"),
             ("voltage", "Voltage ratings - look for voltage values like '240V', '480V', etc."),
             ("frequency", "Frequency - look for 'Hz' values like '60Hz', '50Hz'"),
             ("power", "Power ratings - look for 'HP' values like '5HP', '10HP'"),
             ("model", "Model number from equipment labels"),
             ("manufacturer", "Manufacturer name from equipment labels")])
}

const AC_LABEL_PROMPT: &str = "Does the image contain a metallic or paper label with printed technical \
                               specifications? Is the label the primary subject of the photo? Does the label \
                               look like it's from an A/C unit?";

/// Construye el catálogo completo del relevamiento residencial.
///
/// La tabla es estática y pequeña; cualquier error de construcción es un
/// defecto de la propia tabla, por eso aquí se desenvuelve.
pub fn residential_site_catalog() -> StepCatalog {
    let steps = vec![
        // --- tramo exterior: medidor de electricidad ---
        guide(0.5,
              "Let's Start Outside",
              "Guide to electricity meter location",
              "First, we'll take photos of your electricity meter and the surrounding area. Please walk to \
               the outside wall of your home where your electricity meter is located.",
              &["Your electricity meter is usually mounted on an exterior wall",
                "It may be near other utility connections",
                "Look for a round or square device with numbers"],
              "First, we'll take photos of your electricity meter and the surrounding area.",
              &["Please walk to the outside wall of your home where your electricity meter is located."],
              "I'm at the Meter",
              "Your electricity meter is usually mounted on an exterior wall and may be near other utility \
               connections."),
        capture(1.0,
                "Electricity Meter Close-up",
                "Capture a detailed photo of your electricity meter",
                "Let's start with your electricity meter. Please get close enough so the numbers on it are \
                 clear and legible.",
                &["Get within 2-3 feet of the meter",
                  "Ensure good lighting on the meter face",
                  "Hold your device steady to avoid blur",
                  "Make sure the entire meter is visible in the frame"],
                false,
                PromptConfig::validation("Does the image contain an object that is identifiable as an \
                                          electricity meter (circular or rectangular, with a glass/plastic \
                                          cover and visible dials or digital display)? Is the image sharp \
                                          and not blurry? Is the meter the primary subject, filling a \
                                          significant portion of the frame?")
                    .with_fields(fields(&[("model", "Model number from equipment labels"),
                                          ("manufacturer", "Manufacturer name from equipment labels"),
                                          ("serial", "Serial number from equipment labels"),
                                          ("voltage",
                                           "Voltage ratings - look for voltage values like '240V', '480V', etc.")]))),
        capture(2.0,
                "Area Around Meter (Wide Shot)",
                "Capture a wide view showing the meter and surrounding area",
                "Now, please take about 10 steps back from the wall and take a wide photo showing the entire \
                 area around the meter.",
                &["Step back 10 steps from the meter",
                  "Include the ground, wall, and meter in frame",
                  "Show any potential obstructions like windows, doors, or utility boxes",
                  "Capture the building exterior context"],
                false,
                PromptConfig::validation("Is there an electric meter visible within a wider shot of a \
                                          building's exterior wall? Does the image show the ground, the \
                                          wall, or any potential obstructions near the meter?")),
        capture(3.0,
                "Area to the RIGHT of Meter",
                "Capture the wall and space to the right of the meter",
                "Staying where you are, please pan your camera to the right and capture the wall and any \
                 open space next to the meter.",
                &["Stay in the same position as the wide shot",
                  "Pan camera to the right of the meter",
                  "Show the exterior wall and adjacent ground space",
                  "Capture any obstacles or features in this area"],
                false,
                PromptConfig::validation("Does the image show an exterior wall and adjacent ground space? \
                                          Does it capture the area to the right side of where the meter \
                                          would be located?")),
        capture(4.0,
                "Area to the LEFT of Meter",
                "Capture the wall and space to the left of the meter",
                "Great. Now, please pan to the left and capture the wall and space on the other side of the \
                 meter.",
                &["Stay in the same position",
                  "Pan camera to the left of the meter",
                  "Show the exterior wall and adjacent ground space",
                  "Ensure this is different from the previous shots"],
                false,
                PromptConfig::validation("Does the image show an exterior wall and adjacent ground space? \
                                          Does it capture the area to the left side of where the meter \
                                          would be located?")),
        capture(5.0,
                "Adjacent Wall / Side Yard",
                "Show the entire side wall of the house",
                "Let's see the whole side of the house. Please take a photo from corner to corner to show \
                 the entire wall.",
                &["Step back to capture the full wall length",
                  "Include house corners if possible",
                  "Show the entire exterior wall expanse",
                  "Capture ground area in front of the wall"],
                false,
                PromptConfig::validation("Does the image show a long expanse of an exterior wall, maybe \
                                          including a corner of the house? Is the full side wall visible \
                                          with at least a corner?")),
        capture(6.0,
                "Area Behind Fence (Conditional)",
                "Show the space behind any fence if present",
                "If there is a fence on this side of the house, please take a photo of the area behind it.",
                &["Only take this photo if a fence is present",
                  "Show the space between fence and house wall",
                  "Capture any access points or gates",
                  "Include fence condition and height"],
                false,
                PromptConfig::validation("Does the image contain a fence? Does the image show the space \
                                          between the fence and the house wall?")),
        // --- tramo de climatización ---
        guide(6.5,
              "Now Find Your A/C Units",
              "Guide to air conditioning units",
              "Next, we need to capture photos of your air conditioning unit labels. Please walk to your \
               outdoor air conditioning unit(s). These are usually located outside your home, often near a \
               side or back wall.",
              &["Look for the large metal box with a fan on top",
                "Usually located outside near side or back walls",
                "Connected to your home's cooling system"],
              "Next, we need to capture photos of your air conditioning unit labels.",
              &["Please walk to your outdoor air conditioning unit(s). These are usually located outside \
                 your home, often near a side or back wall."],
              "I'm at My A/C Unit",
              "Look for the large metal box with a fan on top, typically connected to your home's cooling \
               system."),
        capture(7.0,
                "A/C Unit Label",
                "Capture the technical label on your A/C unit",
                "Please find the label on your A/C unit. We need a clear, close-up photo where the 'LRA' \
                 number is readable.",
                &["Look for a metallic or paper label on the unit",
                  "Get close enough to read technical specifications",
                  "Ensure good lighting on the label",
                  "Look specifically for LRA or RLA numbers"],
                false,
                PromptConfig::validation(AC_LABEL_PROMPT).with_fields(ac_label_fields())),
        capture(8.0,
                "Second A/C Unit Label (Conditional)",
                "Capture the label on your second A/C unit if present",
                "If you have a second A/C unit, please take a photo of its label as well. If not, you can \
                 skip this.",
                &["Only take this photo if you have multiple A/C units",
                  "Follow the same process as the first unit",
                  "Look for LRA or RLA specifications",
                  "Ensure the label is clearly readable"],
                true,
                PromptConfig::validation(AC_LABEL_PROMPT).with_fields(ac_label_fields())),
        // --- tramo interior: tablero principal ---
        guide(8.5,
              "Find Your Electrical Panel",
              "Guide to main electrical panel",
              "Finally, we need to take photos of your main electrical panel (breaker box). Please go \
               inside your home and locate your main electrical panel. This is usually found in a garage, \
               basement, utility room, or closet.",
              &["Look for a gray metal box on the wall",
                "Has a hinged door that opens to reveal circuit breakers",
                "Usually found in garage, basement, or utility room"],
              "Finally, we need to take photos of your main electrical panel (breaker box).",
              &["Please go inside your home and locate your main electrical panel. This is usually found in \
                 a garage, basement, utility room, or closet."],
              "I Found the Electrical Panel",
              "Look for a gray metal box on the wall with a hinged door that opens to reveal rows of \
               circuit breaker switches."),
        capture(9.0,
                "Main Breaker Box (Panel Interior)",
                "Capture the interior of your main electrical panel",
                "Now, please find your main breaker box. Open the metal door and take a photo of all the \
                 switches inside.",
                &["Open the panel door safely",
                  "Ensure good lighting inside the panel",
                  "Capture all rows of breaker switches",
                  "Include the main switch at the top"],
                false,
                PromptConfig::validation("Does the image show the inside of an electrical panel with \
                                          multiple rows of breaker switches? Is the entire set of breakers \
                                          visible? Can you identify individual circuit breakers?")),
        capture(10.0,
                "Main Disconnect Switch (Close-up)",
                "Capture a close-up of the main disconnect switch",
                "Find the main switch, which is usually the largest one at the top. We need a clear, \
                 close-up photo of it to see the number on the switch (e.g., 100, 150, or 200).",
                &["Focus on the largest switch, usually at the top",
                  "Get close enough to read the amperage number",
                  "Look for numbers like 100, 125, 150, 200",
                  "Ensure the switch label is clearly visible"],
                false,
                PromptConfig::validation("Does the image focus on a single, larger breaker switch, often \
                                          labeled 'Main'? Is there a number (e.g., 100, 125, 150, 200) \
                                          visible and readable on or near the switch? Is this clearly the \
                                          main disconnect switch?")
                    .with_fields(fields(&[("amperage", "Amperage - look for 'A' followed by a number")]))),
        StepDefinition::ManualEntry {
            id: StepId::whole(11),
            title: "Confirm Main Disconnect Amperage".to_string(),
            description: "AI will read the amperage from the main switch photo".to_string(),
            instructions: "The AI is analyzing your main switch photo to read the amperage number. Please \
                           confirm if the reading is correct."
                .to_string(),
            tips: strings(&["Review the AI-detected amperage value",
                            "Confirm if the number matches what you see",
                            "Enter manually if AI reading is incorrect",
                            "Common values are 100A, 150A, 200A"]),
            skippable: false,
            related_step: StepId::whole(10),
            entry: EntryField { kind: EntryKind::Amperage,
                                placeholder: Some("Enter amperage (e.g., 200)".to_string()),
                                min: Some(50),
                                max: Some(400) },
            prompt: PromptConfig::validation("Read and extract the amperage number (e.g., 100, 125, 150, \
                                              200) from the main disconnect switch in this image. Return \
                                              ONLY the numeric value followed by 'A' (e.g., '200A') if \
                                              clearly visible. If you cannot read the number clearly, \
                                              respond with 'Unable to read amperage'.")
                .with_fields(fields(&[("amperage", "Amperage - look for 'A' followed by a number")]))
                .extracting(),
        },
        capture(12.0,
                "Area Around Main Breaker Box",
                "Show the location and context of the breaker box",
                "Finally, please take a wide photo showing the area around the breaker box so we can see \
                 its location and any nearby obstructions.",
                &["Step back to show the breaker box in context",
                  "Include surrounding walls, floor, or ceiling",
                  "Show any nearby obstacles or equipment",
                  "Capture the installation environment (garage, closet, etc.)"],
                false,
                PromptConfig::validation("Is the breaker box visible within a larger context (e.g., on a \
                                          garage wall, in a closet, utility room)? Does the image show the \
                                          surrounding area and any potential obstructions or nearby \
                                          equipment?")),
    ];
    StepCatalog::new(steps).expect("default catalog table is well formed")
}

#[cfg(test)]
mod tests {
    use super::residential_site_catalog;
    use survey_core::catalog::StepKind;
    use survey_domain::StepId;

    #[test]
    fn catalog_covers_the_full_walkthrough_in_order() {
        let catalog = residential_site_catalog();
        let ids: Vec<f64> = catalog.sequence_ids().iter().map(|i| i.as_f64()).collect();
        assert_eq!(ids,
                   vec![0.5, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 6.5, 7.0, 8.0, 8.5, 9.0, 10.0, 11.0, 12.0]);
        assert_eq!(catalog.review_id(), StepId::whole(13));
    }

    #[test]
    fn guides_sit_at_fractional_positions() {
        let catalog = residential_site_catalog();
        for id in [0.5, 6.5, 8.5] {
            let step = catalog.get(StepId::from_f64(id)).unwrap();
            assert_eq!(step.kind(), StepKind::Guide, "step {id} should be a guide");
        }
    }

    #[test]
    fn amperage_confirmation_reanalyzes_the_main_switch_photo() {
        let catalog = residential_site_catalog();
        let step = catalog.get(StepId::whole(11)).unwrap();
        assert_eq!(step.kind(), StepKind::ManualEntry);
        assert_eq!(step.related_step(), Some(StepId::whole(10)));
        assert!(step.prompt().unwrap().wants_extraction());
        let entry = step.entry().unwrap();
        assert_eq!(entry.min, Some(50));
        assert_eq!(entry.max, Some(400));
    }

    #[test]
    fn only_the_second_ac_label_is_skippable() {
        let catalog = residential_site_catalog();
        assert!(catalog.get(StepId::whole(8)).unwrap().skippable());
        assert!(!catalog.get(StepId::whole(6)).unwrap().skippable());
        assert!(!catalog.get(StepId::whole(1)).unwrap().skippable());
    }

    #[test]
    fn progress_counts_only_real_steps() {
        let catalog = residential_site_catalog();
        // 15 entradas, 3 guías → 12 pasos contables
        let at_first = catalog.progress_at(StepId::whole(1));
        assert_eq!(at_first.total, 12);
        assert_eq!(at_first.current, 1);
        // una guía no cuenta
        let at_guide = catalog.progress_at(StepId::from_f64(6.5));
        assert_eq!(at_guide.current, 0);
        // último paso → 100%
        let at_last = catalog.progress_at(StepId::whole(12));
        assert_eq!(at_last.current, 12);
        assert_eq!(at_last.percent, 100);
    }
}
