use std::collections::BTreeMap;

/// Description used when a project line carries no trailing `: text`.
pub const DEFAULT_PROJECT_DESCRIPTION: &str = "Proyecto destacado";

/// A single project parsed from a `- Title (image): description` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectEntry {
    pub title: String,
    pub image_url: String,
    pub description: String,
}

/// Style knobs a prompt may override. Values are taken verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StyleKey {
    PrimaryColor,
    SecondaryColor,
    HeadingFont,
    BodyFont,
    HeroBackground,
}

impl StyleKey {
    pub const ALL: [StyleKey; 5] = [
        StyleKey::PrimaryColor,
        StyleKey::SecondaryColor,
        StyleKey::HeadingFont,
        StyleKey::BodyFont,
        StyleKey::HeroBackground,
    ];

    /// The template token this style is substituted into.
    pub fn token(self) -> &'static str {
        match self {
            StyleKey::PrimaryColor => "[COLOR_PRIMARIO]",
            StyleKey::SecondaryColor => "[COLOR_SECUNDARIO]",
            StyleKey::HeadingFont => "[FUENTE_TITULOS]",
            StyleKey::BodyFont => "[FUENTE_TEXTO]",
            StyleKey::HeroBackground => "[FONDO_HERO]",
        }
    }
}

pub type StyleOverrides = BTreeMap<StyleKey, String>;

/// Structured form of one generation request.
///
/// Built once by the parser and only borrowed afterwards. Every `None` is
/// filled from `RenderDefaults` at render time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortfolioRecord {
    pub name: Option<String>,
    pub profession: Option<String>,
    pub photo_url: Option<String>,
    pub bio: Option<String>,
    pub email: Option<String>,
    pub linkedin_url: Option<String>,
    pub projects: Vec<ProjectEntry>,
    pub styles: StyleOverrides,
}

impl PortfolioRecord {
    pub fn style(&self, key: StyleKey) -> Option<&str> {
        self.styles.get(&key).map(String::as_str)
    }
}

/// Why the parser skipped a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// `key: value` with a key the parser does not know.
    UnknownKey,
    /// Project line without a `(image)` part or without a title.
    MalformedProject,
    /// `- item` line outside the projects section.
    OutsideProjects,
    /// Free text that is neither a key line nor a list item.
    Unstructured,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoredLine {
    /// 1-based line number in the original prompt.
    pub line: usize,
    pub text: String,
    pub reason: IgnoreReason,
}

/// Parser output: the record plus everything that did not make it in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPrompt {
    pub record: PortfolioRecord,
    pub ignored: Vec<IgnoredLine>,
}
