use indexmap::IndexMap;
use serde::Deserialize;

/// Named lookup tables consulted by the table-driven variants.
///
/// Tables keep their declaration order; that order decides both which
/// label is tried first and the ordering hint of the emitted at-rule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct Theme {
    #[serde(default)]
    pub breakpoints: Option<IndexMap<String, String>>,
    #[serde(default)]
    pub media: Option<IndexMap<String, String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeTable {
    Breakpoints,
    Media,
}

impl Theme {
    pub fn table(&self, table: ThemeTable) -> Option<&IndexMap<String, String>> {
        match table {
            ThemeTable::Breakpoints => self.breakpoints.as_ref(),
            ThemeTable::Media => self.media.as_ref(),
        }
    }

    pub fn with_breakpoint(mut self, name: &str, width: &str) -> Self {
        self.breakpoints
            .get_or_insert_with(IndexMap::new)
            .insert(name.to_string(), width.to_string());
        self
    }

    pub fn with_media(mut self, name: &str, query: &str) -> Self {
        self.media
            .get_or_insert_with(IndexMap::new)
            .insert(name.to_string(), query.to_string());
        self
    }
}

pub fn default_breakpoints() -> Vec<(String, String)> {
    vec![
        ("sm".to_string(), "640px".to_string()),
        ("md".to_string(), "768px".to_string()),
        ("lg".to_string(), "1024px".to_string()),
        ("xl".to_string(), "1280px".to_string()),
        ("2xl".to_string(), "1536px".to_string()),
    ]
}

pub fn default_media_queries() -> Vec<(String, String)> {
    vec![
        (
            "dark".to_string(),
            "(prefers-color-scheme: dark)".to_string(),
        ),
        (
            "light".to_string(),
            "(prefers-color-scheme: light)".to_string(),
        ),
        ("print".to_string(), "print".to_string()),
        (
            "motion-safe".to_string(),
            "(prefers-reduced-motion: no-preference)".to_string(),
        ),
        (
            "motion-reduce".to_string(),
            "(prefers-reduced-motion: reduce)".to_string(),
        ),
        (
            "portrait".to_string(),
            "(orientation: portrait)".to_string(),
        ),
        (
            "landscape".to_string(),
            "(orientation: landscape)".to_string(),
        ),
    ]
}

/// Walks a default table merged with theme overrides, without copying it.
///
/// Default keys keep their position with the theme value substituted;
/// theme-only keys follow in theme order.
pub fn table_entries<'a>(
    defaults: &'a [(String, String)],
    overrides: Option<&'a IndexMap<String, String>>,
) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
    let merged = defaults.iter().map(move |(name, value)| {
        let value = overrides
            .and_then(|table| table.get(name))
            .unwrap_or(value);
        (name.as_str(), value.as_str())
    });
    let theme_only = overrides
        .into_iter()
        .flatten()
        .filter(move |(name, _)| !defaults.iter().any(|(known, _)| known == *name))
        .map(|(name, value)| (name.as_str(), value.as_str()));

    merged.chain(theme_only)
}
