//! Project Card Builder.

use crate::portfolio::record::ProjectEntry;
use crate::portfolio::template::RenderDefaults;

/// Class on the wrapper around the project cards. Model output must carry it too.
pub const PROJECTS_GRID_MARKER: &str = "projects-grid";

pub const NO_PROJECTS_HTML: &str =
    r#"<p class="no-projects">No hay proyectos disponibles por el momento.</p>"#;

/// The card every project is rendered with. The model is asked to reuse it verbatim.
pub const PROJECT_CARD_TEMPLATE: &str = r#"<div class="project-card">
    <img src="{image}" alt="{title}" class="project-image" loading="lazy">
    <div class="project-body">
        <h3 class="text-xl font-semibold mb-2">{title}</h3>
        <p class="opacity-80">{description}</p>
    </div>
</div>"#;

fn build_card(project: &ProjectEntry, defaults: &RenderDefaults) -> String {
    let image = if project.image_url.is_empty() {
        defaults.project_image_url.as_str()
    } else {
        project.image_url.as_str()
    };

    PROJECT_CARD_TEMPLATE
        .replace("{image}", image)
        .replace("{title}", &project.title)
        .replace("{description}", &project.description)
}

/// Renders all projects inside the grid wrapper, or the placeholder when empty.
pub fn build_cards(projects: &[ProjectEntry], defaults: &RenderDefaults) -> String {
    if projects.is_empty() {
        return NO_PROJECTS_HTML.to_string();
    }

    let cards = projects
        .iter()
        .map(|p| build_card(p, defaults))
        .collect::<Vec<_>>()
        .join("\n");

    format!("<div class=\"{PROJECTS_GRID_MARKER}\">\n{cards}\n</div>")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(title: &str, image: &str, description: &str) -> ProjectEntry {
        ProjectEntry {
            title: title.to_string(),
            image_url: image.to_string(),
            description: description.to_string(),
        }
    }

    #[test]
    fn test_empty_projects_render_placeholder() {
        let html = build_cards(&[], &RenderDefaults::default());
        assert_eq!(html, NO_PROJECTS_HTML);
        assert!(!html.contains(PROJECTS_GRID_MARKER));
    }

    #[test]
    fn test_one_card_per_project_in_order() {
        let projects = vec![
            project("Tienda", "t.png", "E-commerce"),
            project("Blog", "b.png", "Proyecto destacado"),
        ];
        let html = build_cards(&projects, &RenderDefaults::default());

        assert!(html.starts_with(r#"<div class="projects-grid">"#));
        assert_eq!(html.matches(r#"class="project-card""#).count(), 2);
        let tienda = html.find("Tienda").unwrap();
        let blog = html.find("Blog").unwrap();
        assert!(tienda < blog);
        assert!(html.contains(r#"<img src="t.png" alt="Tienda""#));
        assert!(html.contains("<p class=\"opacity-80\">E-commerce</p>"));
    }

    #[test]
    fn test_empty_image_uses_default_project_image() {
        let defaults = RenderDefaults::default();
        let html = build_cards(&[project("Sin foto", "", "x")], &defaults);
        assert!(html.contains(&defaults.project_image_url));
    }
}
