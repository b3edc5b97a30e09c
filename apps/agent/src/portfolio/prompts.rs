// Prompt constants for the portfolio generation call.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::{ANSWER_CUE, END_OF_OUTPUT, JSON_ONLY_INSTRUCTION};
use crate::portfolio::cards::{PROJECT_CARD_TEMPLATE, PROJECTS_GRID_MARKER};
use crate::portfolio::record::{PortfolioRecord, StyleKey};

/// System instruction. Replace `{json_only}`, `{card_template}`, `{grid_marker}`
/// and `{end_marker}` before sending.
pub const PORTFOLIO_SYSTEM_TEMPLATE: &str = r#"Eres un redactor experto en portafolios web profesionales.
A partir de los datos del usuario, genera el contenido de su portafolio.

{json_only}

El objeto JSON debe tener EXACTAMENTE estos campos (todos obligatorios, todos cadenas de texto):
{
  "name": "nombre completo de la persona",
  "profession": "profesión o título profesional",
  "photo": "URL de la foto de perfil",
  "bio": "biografía breve en primera persona, 2 a 4 frases",
  "projects": "fragmento HTML con las tarjetas de proyectos"
}

REGLAS para "projects":
1. Debe empezar con <div class="{grid_marker}"> y terminar con </div>
2. Dentro, una tarjeta por proyecto usando EXACTAMENTE esta plantilla, sin cambiar clases ni etiquetas:
{card_template}
3. Sustituye {image}, {title} y {description} con los datos de cada proyecto
4. Si no hay proyectos, devuelve <div class="{grid_marker}"></div>

REGLAS generales:
- Usa SOLO los datos proporcionados; si un campo no se especifica, escribe un valor profesional genérico
- Conserva las URLs tal cual
- Escapa las comillas dobles dentro de las cadenas JSON
- Termina tu respuesta con {end_marker}"#;

/// Builds the system instruction with every placeholder filled.
pub fn system_instruction() -> String {
    PORTFOLIO_SYSTEM_TEMPLATE
        .replace("{json_only}", JSON_ONLY_INSTRUCTION)
        .replace("{grid_marker}", PROJECTS_GRID_MARKER)
        .replace("{end_marker}", END_OF_OUTPUT)
        .replace("{card_template}", PROJECT_CARD_TEMPLATE)
}

const NOT_SPECIFIED: &str = "(no especificado)";

/// Renders the record as the plain-text summary the model sees.
pub fn record_summary(record: &PortfolioRecord) -> String {
    let field = |value: &Option<String>| value.as_deref().unwrap_or(NOT_SPECIFIED).to_string();

    let mut lines = vec![
        format!("Nombre: {}", field(&record.name)),
        format!("Profesión: {}", field(&record.profession)),
        format!("Foto: {}", field(&record.photo_url)),
        format!("Descripción: {}", field(&record.bio)),
        format!("Email: {}", field(&record.email)),
        format!("LinkedIn: {}", field(&record.linkedin_url)),
    ];

    if record.projects.is_empty() {
        lines.push("Proyectos: ninguno".to_string());
    } else {
        lines.push("Proyectos:".to_string());
        lines.extend(record.projects.iter().map(|p| {
            format!("- {} (imagen: {}): {}", p.title, p.image_url, p.description)
        }));
    }

    let styles: Vec<String> = StyleKey::ALL
        .iter()
        .filter_map(|key| record.style(*key).map(|v| format!("{key:?}: {v}")))
        .collect();
    if !styles.is_empty() {
        lines.push(format!("Estilo solicitado: {}", styles.join(", ")));
    }

    lines.join("\n")
}

/// Full instruction sent to the model: system text, user data, answer cue.
pub fn build_instruction(record: &PortfolioRecord) -> String {
    format!(
        "{}\n\nUsuario:\n{}\n\n{}\n",
        system_instruction(),
        record_summary(record),
        ANSWER_CUE
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::parser::parse;

    #[test]
    fn test_system_instruction_has_no_unfilled_placeholders() {
        let system = system_instruction();
        for placeholder in ["{json_only}", "{grid_marker}", "{end_marker}", "{card_template}"] {
            assert!(!system.contains(placeholder), "{placeholder} not filled");
        }
        assert!(system.contains(PROJECT_CARD_TEMPLATE));
        assert!(system.contains(r#"<div class="projects-grid">"#));
        assert!(system.contains(END_OF_OUTPUT));
    }

    #[test]
    fn test_summary_marks_missing_fields() {
        let summary = record_summary(&parse("Nombre: Ana").record);
        assert!(summary.contains("Nombre: Ana"));
        assert!(summary.contains("Profesión: (no especificado)"));
        assert!(summary.contains("Proyectos: ninguno"));
        assert!(!summary.contains("Estilo solicitado"));
    }

    #[test]
    fn test_summary_lists_projects_and_styles() {
        let record =
            parse("Proyectos:\n- Tienda (t.png): ventas online\nColor primario: #000").record;
        let summary = record_summary(&record);
        assert!(summary.contains("- Tienda (imagen: t.png): ventas online"));
        assert!(summary.contains("Estilo solicitado: PrimaryColor: #000"));
    }

    #[test]
    fn test_instruction_ends_with_answer_cue() {
        let instruction = build_instruction(&parse("Nombre: Ana").record);
        assert!(instruction.trim_end().ends_with(ANSWER_CUE));
        assert!(instruction.contains("Usuario:\nNombre: Ana"));
    }
}
