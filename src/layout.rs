/// Layout primitives emitted ahead of the generated utilities.
pub const LAYOUT_CSS: &str = include_str!("layout.css");

/// Class names the layout stylesheet defines as standalone primitives.
pub const LAYOUT_PRIMITIVES: &[&str] = &[
    "stack",
    "center",
    "center-contents",
    "cluster",
    "with-sidebar",
    "switcher",
    "cover",
    "item-grid",
    "frame",
    "superimpose",
    "superimposed",
    "with-icon",
    "divider",
    "row",
];

/// Static CSS injected verbatim before generated rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preflight {
    css: String,
}

impl Preflight {
    pub fn new(css: impl Into<String>) -> Self {
        Self { css: css.into() }
    }

    pub fn layout() -> Self {
        Self::new(LAYOUT_CSS)
    }

    pub fn css(&self) -> &str {
        &self.css
    }
}
