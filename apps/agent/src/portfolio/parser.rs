//! Prompt Parser: turns the line-oriented free-text prompt into a `PortfolioRecord`.
//!
//! The format is a best-effort micro-format, not a grammar:
//!
//! ```text
//! Nombre: Ana
//! Profesión: Diseñadora
//! Proyectos:
//! - Tienda (https://img/tienda.png): e-commerce en Rust
//! Color primario: #ff6600
//! ```
//!
//! Parsing never fails. Lines that contribute nothing are returned in
//! `ParsedPrompt::ignored` so callers can surface diagnostics.

use crate::portfolio::record::{
    IgnoreReason, IgnoredLine, ParsedPrompt, PortfolioRecord, ProjectEntry, StyleKey,
    DEFAULT_PROJECT_DESCRIPTION,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    Profession,
    Photo,
    Bio,
    Email,
    Linkedin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Key {
    Field(Field),
    Style(StyleKey),
    Projects,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Projects,
}

/// Maps a lower-cased, trimmed key to what it sets.
fn classify_key(key: &str) -> Option<Key> {
    let key = key.replace('_', " ");
    let key = match key.as_str() {
        "nombre" | "name" => Key::Field(Field::Name),
        "profesión" | "profesion" | "profession" => Key::Field(Field::Profession),
        "foto" | "photo" | "imagen" => Key::Field(Field::Photo),
        "descripción" | "descripcion" | "bio" | "sobre mí" | "sobre mi" => Key::Field(Field::Bio),
        "email" | "correo" => Key::Field(Field::Email),
        "linkedin" => Key::Field(Field::Linkedin),
        "proyectos" | "projects" => Key::Projects,
        "color primario" | "primary color" => Key::Style(StyleKey::PrimaryColor),
        "color secundario" | "secondary color" => Key::Style(StyleKey::SecondaryColor),
        "fuente títulos" | "fuente titulos" | "heading font" => Key::Style(StyleKey::HeadingFont),
        "fuente" | "fuente texto" | "body font" => Key::Style(StyleKey::BodyFont),
        "fondo hero" | "hero background" => Key::Style(StyleKey::HeroBackground),
        _ => return None,
    };
    Some(key)
}

fn set_field(record: &mut PortfolioRecord, field: Field, value: String) {
    let slot = match field {
        Field::Name => &mut record.name,
        Field::Profession => &mut record.profession,
        Field::Photo => &mut record.photo_url,
        Field::Bio => &mut record.bio,
        Field::Email => &mut record.email,
        Field::Linkedin => &mut record.linkedin_url,
    };
    *slot = Some(value);
}

/// Parses one project list item (leading `-` already removed).
///
/// Returns `None` unless the item has a `(` followed by a `)` and a
/// non-empty title before the `(`.
pub fn parse_project_line(item: &str) -> Option<ProjectEntry> {
    let open = item.find('(')?;
    let close = open + item[open..].find(')')?;

    let title = item[..open].trim();
    if title.is_empty() {
        return None;
    }
    let image_url = item[open + 1..close].trim();

    // The last `:` anywhere in the item starts the description, even one
    // inside the image URL.
    let description = item
        .rfind(':')
        .map(|idx| item[idx + 1..].trim())
        .filter(|d| !d.is_empty())
        .unwrap_or(DEFAULT_PROJECT_DESCRIPTION);

    Some(ProjectEntry {
        title: title.to_string(),
        image_url: image_url.to_string(),
        description: description.to_string(),
    })
}

/// Parses a prompt into a record. Never fails.
pub fn parse(prompt_text: &str) -> ParsedPrompt {
    let mut record = PortfolioRecord::default();
    let mut ignored = Vec::new();
    let mut section = Section::None;

    for (idx, raw) in prompt_text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let mut skip = |reason: IgnoreReason| {
            ignored.push(IgnoredLine {
                line: idx + 1,
                text: line.to_string(),
                reason,
            })
        };

        if let Some(item) = line.strip_prefix('-') {
            if section != Section::Projects {
                skip(IgnoreReason::OutsideProjects);
                continue;
            }
            match parse_project_line(item) {
                Some(project) => record.projects.push(project),
                None => skip(IgnoreReason::MalformedProject),
            }
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            skip(IgnoreReason::Unstructured);
            continue;
        };
        let value = value.trim();

        match classify_key(&key.trim().to_lowercase()) {
            Some(Key::Projects) => section = Section::Projects,
            // An empty value leaves the slot unset so the render default applies.
            Some(Key::Field(_) | Key::Style(_)) if value.is_empty() => {}
            Some(Key::Field(field)) => set_field(&mut record, field, value.to_string()),
            Some(Key::Style(style)) => {
                record.styles.insert(style, value.to_string());
            }
            None => skip(IgnoreReason::UnknownKey),
        }
    }

    ParsedPrompt { record, ignored }
}
