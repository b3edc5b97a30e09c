//! Template Renderer: one fixed portfolio document with literal `[TOKEN]` placeholders.
//!
//! Substitution is plain find-and-replace in a fixed order (style tokens first,
//! `[PROYECTOS]` last). Field text is inserted verbatim, without HTML escaping.

use crate::portfolio::record::{PortfolioRecord, StyleKey};

pub const TOKEN_NAME: &str = "[NOMBRE]";
pub const TOKEN_PROFESSION: &str = "[PROFESION]";
pub const TOKEN_PHOTO: &str = "[FOTO]";
pub const TOKEN_BIO: &str = "[DESCRIPCION]";
pub const TOKEN_EMAIL: &str = "[EMAIL]";
pub const TOKEN_LINKEDIN: &str = "[LINKEDIN]";
pub const TOKEN_PROJECTS: &str = "[PROYECTOS]";

/// Values used for anything the prompt (or the model) did not provide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderDefaults {
    pub name: String,
    pub profession: String,
    pub photo_url: String,
    pub bio: String,
    pub email: String,
    pub linkedin_url: String,
    pub project_image_url: String,
    pub primary_color: String,
    pub secondary_color: String,
    pub heading_font: String,
    pub body_font: String,
    pub hero_background: String,
}

impl Default for RenderDefaults {
    fn default() -> Self {
        Self {
            name: "Tu Nombre".to_string(),
            profession: "Profesional".to_string(),
            photo_url: "https://via.placeholder.com/300".to_string(),
            bio: "Descripción pendiente".to_string(),
            email: "correo@ejemplo.com".to_string(),
            linkedin_url: "https://www.linkedin.com".to_string(),
            project_image_url:
                "https://images.unsplash.com/photo-1498050108023-c5249f4df085?w=800&h=450&fit=crop"
                    .to_string(),
            primary_color: "#3b82f6".to_string(),
            secondary_color: "#1f2937".to_string(),
            heading_font: "Poppins".to_string(),
            body_font: "Inter".to_string(),
            hero_background: "linear-gradient(135deg, #6366f1 0%, #9333ea 100%)".to_string(),
        }
    }
}

impl RenderDefaults {
    pub fn style(&self, key: StyleKey) -> &str {
        match key {
            StyleKey::PrimaryColor => &self.primary_color,
            StyleKey::SecondaryColor => &self.secondary_color,
            StyleKey::HeadingFont => &self.heading_font,
            StyleKey::BodyFont => &self.body_font,
            StyleKey::HeroBackground => &self.hero_background,
        }
    }
}

/// Fully resolved values for one document. Both the fallback path and the
/// model path end here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContent<'a> {
    pub name: &'a str,
    pub profession: &'a str,
    pub photo_url: &'a str,
    pub bio: &'a str,
    pub email: &'a str,
    pub linkedin_url: &'a str,
    pub projects_html: &'a str,
    /// Style values in `StyleKey::ALL` order.
    pub styles: [&'a str; 5],
}

impl<'a> PageContent<'a> {
    /// Resolves a record against the defaults.
    pub fn from_record(
        record: &'a PortfolioRecord,
        projects_html: &'a str,
        defaults: &'a RenderDefaults,
    ) -> Self {
        Self {
            name: record.name.as_deref().unwrap_or(&defaults.name),
            profession: record.profession.as_deref().unwrap_or(&defaults.profession),
            photo_url: record.photo_url.as_deref().unwrap_or(&defaults.photo_url),
            bio: record.bio.as_deref().unwrap_or(&defaults.bio),
            email: record.email.as_deref().unwrap_or(&defaults.email),
            linkedin_url: record
                .linkedin_url
                .as_deref()
                .unwrap_or(&defaults.linkedin_url),
            projects_html,
            styles: StyleKey::ALL.map(|key| record.style(key).unwrap_or(defaults.style(key))),
        }
    }
}

/// Substitutes resolved content into the document template.
pub fn render_page(content: &PageContent<'_>) -> String {
    let mut html = PORTFOLIO_TEMPLATE.to_string();

    for (key, value) in StyleKey::ALL.iter().zip(content.styles) {
        html = html.replace(key.token(), value);
    }

    let substitutions = [
        (TOKEN_NAME, content.name),
        (TOKEN_PROFESSION, content.profession),
        (TOKEN_PHOTO, content.photo_url),
        (TOKEN_BIO, content.bio),
        (TOKEN_EMAIL, content.email),
        (TOKEN_LINKEDIN, content.linkedin_url),
        (TOKEN_PROJECTS, content.projects_html),
    ];
    for (token, value) in substitutions {
        html = html.replace(token, value);
    }

    html
}

/// Deterministic render of a parsed record with a pre-built projects fragment.
pub fn render(record: &PortfolioRecord, projects_html: &str, defaults: &RenderDefaults) -> String {
    render_page(&PageContent::from_record(record, projects_html, defaults))
}

const PORTFOLIO_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="es">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>[NOMBRE] | [PROFESION]</title>
    <script src="https://cdn.tailwindcss.com"></script>
    <link rel="preconnect" href="https://fonts.googleapis.com">
    <link href="https://fonts.googleapis.com/css2?family=Inter:wght@400;600&family=Poppins:wght@600;700&display=swap" rel="stylesheet">
    <style>
        :root {
            --color-primary: [COLOR_PRIMARIO];
            --color-secondary: [COLOR_SECUNDARIO];
            --font-heading: '[FUENTE_TITULOS]', sans-serif;
            --font-body: '[FUENTE_TEXTO]', sans-serif;
            --hero-background: [FONDO_HERO];
        }
        body { font-family: var(--font-body); color: var(--color-secondary); scroll-behavior: smooth; }
        h1, h2, h3, .brand { font-family: var(--font-heading); }
        .hero { background: var(--hero-background); }
        .accent { color: var(--color-primary); }
        .btn-primary { background: var(--color-primary); color: #ffffff; }
        .projects-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(18rem, 1fr)); gap: 2rem; }
        .project-card { background: #ffffff; border-radius: 0.75rem; overflow: hidden; box-shadow: 0 10px 25px rgba(0, 0, 0, 0.08); transition: transform 0.3s ease; }
        .project-card:hover { transform: translateY(-0.5rem); }
        .project-image { width: 100%; aspect-ratio: 16 / 9; object-fit: cover; }
        .project-body { padding: 1.5rem; }
        .no-projects { text-align: center; opacity: 0.7; }
        .fade-in { opacity: 0; transform: translateY(1rem); transition: all 0.6s ease; }
        .fade-in.visible { opacity: 1; transform: none; }
    </style>
</head>
<body class="bg-gray-50">
    <nav class="fixed top-0 inset-x-0 bg-white/90 backdrop-blur shadow-sm z-50">
        <div class="max-w-6xl mx-auto px-6 py-4 flex items-center justify-between">
            <a href="#inicio" class="brand text-xl font-bold accent">[NOMBRE]</a>
            <button id="menu-toggle" class="md:hidden" aria-label="Abrir menú">&#9776;</button>
            <ul id="menu" class="hidden md:flex gap-8">
                <li><a href="#sobre-mi" class="hover:underline">Sobre mí</a></li>
                <li><a href="#proyectos" class="hover:underline">Proyectos</a></li>
                <li><a href="#contacto" class="hover:underline">Contacto</a></li>
            </ul>
        </div>
    </nav>

    <header id="inicio" class="hero min-h-screen flex items-center text-white">
        <div class="max-w-6xl mx-auto px-6 flex flex-col md:flex-row items-center gap-12">
            <img src="[FOTO]" alt="[NOMBRE]" class="w-56 h-56 rounded-full object-cover border-4 border-white shadow-xl">
            <div>
                <h1 class="text-4xl md:text-6xl font-bold mb-4">[NOMBRE]</h1>
                <p class="text-xl md:text-2xl opacity-90">[PROFESION]</p>
                <a href="#contacto" class="btn-primary inline-block mt-8 px-6 py-3 rounded-full font-semibold">Contáctame</a>
            </div>
        </div>
    </header>

    <section id="sobre-mi" class="fade-in max-w-4xl mx-auto px-6 py-20">
        <h2 class="text-3xl font-bold mb-6 accent">Sobre mí</h2>
        <p class="text-lg leading-relaxed">[DESCRIPCION]</p>
    </section>

    <section id="proyectos" class="fade-in max-w-6xl mx-auto px-6 py-20">
        <h2 class="text-3xl font-bold mb-10 text-center accent">Mis Proyectos</h2>
        [PROYECTOS]
    </section>

    <section id="contacto" class="fade-in bg-white py-20">
        <div class="max-w-4xl mx-auto px-6 text-center">
            <h2 class="text-3xl font-bold mb-6 accent">Contacto</h2>
            <p class="mb-4"><a href="mailto:[EMAIL]" class="hover:underline">[EMAIL]</a></p>
            <p><a href="[LINKEDIN]" target="_blank" rel="noopener noreferrer" class="btn-primary inline-block px-6 py-3 rounded-full">LinkedIn</a></p>
        </div>
    </section>

    <footer class="py-8 text-center text-sm opacity-70">
        &copy; <span id="year"></span> [NOMBRE]
    </footer>

    <script>
        document.getElementById('year').textContent = new Date().getFullYear();
        document.getElementById('menu-toggle').addEventListener('click', function () {
            document.getElementById('menu').classList.toggle('hidden');
        });
        const observer = new IntersectionObserver(function (entries) {
            entries.forEach(function (entry) {
                if (entry.isIntersecting) {
                    entry.target.classList.add('visible');
                }
            });
        }, { threshold: 0.1 });
        document.querySelectorAll('.fade-in').forEach(function (el) { observer.observe(el); });
    </script>
</body>
</html>
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::parser::parse;

    const ALL_TOKENS: &[&str] = &[
        TOKEN_NAME,
        TOKEN_PROFESSION,
        TOKEN_PHOTO,
        TOKEN_BIO,
        TOKEN_EMAIL,
        TOKEN_LINKEDIN,
        TOKEN_PROJECTS,
    ];

    #[test]
    fn test_template_contains_every_token() {
        for token in ALL_TOKENS {
            assert!(PORTFOLIO_TEMPLATE.contains(token), "missing {token}");
        }
        for key in StyleKey::ALL {
            assert!(PORTFOLIO_TEMPLATE.contains(key.token()), "missing {}", key.token());
        }
    }

    #[test]
    fn test_name_replaces_every_occurrence() {
        let record = parse("Nombre: Valeria Ruiz").record;
        let html = render(&record, "", &RenderDefaults::default());

        let occurrences = PORTFOLIO_TEMPLATE.matches(TOKEN_NAME).count();
        assert!(occurrences >= 2);
        assert_eq!(html.matches("Valeria Ruiz").count(), occurrences);
        assert!(html.contains(r#"class="brand text-xl font-bold accent">Valeria Ruiz</a>"#));
        assert!(html.contains(r#"<h1 class="text-4xl md:text-6xl font-bold mb-4">Valeria Ruiz</h1>"#));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let defaults = RenderDefaults::default();
        let html = render(&PortfolioRecord::default(), "", &defaults);
        assert!(html.contains(&defaults.name));
        assert!(html.contains(&defaults.photo_url));
        assert!(html.contains("Descripción pendiente"));
        assert!(html.contains(&defaults.email));
        assert!(html.contains(&defaults.hero_background));
    }

    #[test]
    fn test_no_tokens_survive_rendering() {
        let html = render(&PortfolioRecord::default(), "<div></div>", &RenderDefaults::default());
        for token in ALL_TOKENS {
            assert!(!html.contains(token), "{token} left in output");
        }
        for key in StyleKey::ALL {
            assert!(!html.contains(key.token()));
        }
    }

    #[test]
    fn test_style_overrides_reach_css() {
        let record = parse("Color primario: #ff6600\nFuente títulos: Lora").record;
        let html = render(&record, "", &RenderDefaults::default());
        assert!(html.contains("--color-primary: #ff6600;"));
        assert!(html.contains("--font-heading: 'Lora', sans-serif;"));
        assert!(html.contains("--color-secondary: #1f2937;"));
    }

    #[test]
    fn test_user_text_is_inserted_verbatim() {
        let record = parse("Descripción: <b>negrita</b> & más").record;
        let html = render(&record, "", &RenderDefaults::default());
        assert!(html.contains("<b>negrita</b> & más"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let record = parse("Nombre: Ana\nProyectos:\n- A (a.png): uno").record;
        let defaults = RenderDefaults::default();
        let first = render(&record, "<div class=\"projects-grid\"></div>", &defaults);
        let second = render(&record, "<div class=\"projects-grid\"></div>", &defaults);
        assert_eq!(first, second);
    }

    #[test]
    fn test_custom_defaults_are_honoured() {
        let defaults = RenderDefaults {
            bio: "Bio por defecto".to_string(),
            ..RenderDefaults::default()
        };
        let html = render(&PortfolioRecord::default(), "", &defaults);
        assert!(html.contains("Bio por defecto"));
        assert!(!html.contains("Descripción pendiente"));
    }
}
