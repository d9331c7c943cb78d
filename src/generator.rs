use std::collections::BTreeSet;
use std::fmt;
use std::ops::Deref;

use crate::preset::{MatchedUtility, Preset};
use crate::theme::Theme;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GeneratorConfig {
    pub minify: bool,
    pub theme: Option<Theme>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub css: CssOutput,
    pub class_count: usize,
    pub unmatched: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssOutput(String);

impl CssOutput {
    pub fn new(css: String) -> Self {
        Self(css)
    }
}

impl Deref for CssOutput {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.0.as_str()
    }
}

impl fmt::Display for CssOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct RuleSortKey {
    parent_bucket: u8,
    order: u32,
    parent: String,
    position: usize,
}

fn build_rule_sort_key(matched: &MatchedUtility, position: usize) -> RuleSortKey {
    match &matched.context.parent {
        Some(parent) => RuleSortKey {
            parent_bucket: 1,
            order: matched.context.order.unwrap_or(0),
            parent: parent.clone(),
            position,
        },
        None => RuleSortKey {
            parent_bucket: 0,
            order: 0,
            parent: String::new(),
            position,
        },
    }
}

/// Renders the preflight followed by one rule per distinct matched token.
///
/// Unwrapped rules come first in token order. Wrapped rules follow, grouped
/// by their parent chain and ordered by the chain's ordering hint.
pub fn generate(classes: &[String], preset: &Preset, config: &GeneratorConfig) -> GenerationResult {
    let mut seen = BTreeSet::new();
    let mut rules = Vec::<(RuleSortKey, MatchedUtility)>::new();
    let mut unmatched = Vec::new();

    for class in classes {
        if !seen.insert(class.as_str()) {
            continue;
        }
        match preset.match_token(class, config.theme.as_ref()) {
            Some(matched) => {
                let sort_key = build_rule_sort_key(&matched, rules.len());
                rules.push((sort_key, matched));
            }
            None => {
                tracing::debug!(token = class.as_str(), "no utility matched");
                unmatched.push(class.clone());
            }
        }
    }

    rules.sort_by(|(left_key, _), (right_key, _)| left_key.cmp(right_key));
    let class_count = rules.len();

    let mut blocks = Vec::new();
    let preflight = preset.preflight_css();
    if !preflight.trim().is_empty() {
        blocks.push(preflight.trim_end().to_string());
    }

    let mut group_parents: Vec<&str> = Vec::new();
    let mut group_rules: Vec<String> = Vec::new();
    let mut group_key: Option<&str> = None;
    for (_, matched) in &rules {
        let parent = matched.context.parent.as_deref();
        if parent.is_none() {
            blocks.push(render_rule(matched, config.minify));
            continue;
        }
        if group_key != parent && !group_rules.is_empty() {
            blocks.push(wrap_group(&group_parents, &group_rules, config.minify));
            group_rules.clear();
        }
        group_key = parent;
        group_parents = matched.context.parents();
        group_rules.push(render_rule(matched, config.minify));
    }
    if !group_rules.is_empty() {
        blocks.push(wrap_group(&group_parents, &group_rules, config.minify));
    }

    let separator = if config.minify { "" } else { "\n" };
    GenerationResult {
        css: CssOutput::new(blocks.join(separator)),
        class_count,
        unmatched,
    }
}

fn render_rule(matched: &MatchedUtility, minify: bool) -> String {
    let selector = format!(
        ".{}{}",
        escape_selector(&matched.token),
        matched.context.selector.as_deref().unwrap_or_default()
    );

    if minify {
        let declarations = matched
            .declaration
            .iter()
            .map(|(property, value)| format!("{}:{}", property, value))
            .collect::<Vec<_>>()
            .join(";");
        return format!("{}{{{}}}", selector, declarations);
    }

    let lines = matched
        .declaration
        .iter()
        .map(|(property, value)| format!("  {}: {};", property, value))
        .collect::<Vec<_>>()
        .join("\n");
    format!("{} {{\n{}\n}}", selector, lines)
}

fn wrap_group(parents: &[&str], rules: &[String], minify: bool) -> String {
    let mut body = rules.join(if minify { "" } else { "\n" });
    for wrapper in parents.iter().rev() {
        body = wrap_rule(wrapper, &body, minify);
    }
    body
}

fn wrap_rule(wrapper: &str, rule: &str, minify: bool) -> String {
    if minify {
        format!("{}{{{}}}", wrapper, rule)
    } else {
        format!("{} {{\n{}\n}}", wrapper, indent_css_block(rule, 2))
    }
}

fn indent_css_block(css: &str, spaces: usize) -> String {
    let padding = " ".repeat(spaces);
    css.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{}{}", padding, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Escapes a class name for use after `.` in a selector.
///
/// Only ASCII letters, digits, `_`, `-` and non-ASCII characters pass
/// through. Whitespace, control characters and a leading digit take a hex
/// escape; every other ASCII character is backslash-escaped.
fn escape_selector(class: &str) -> String {
    let mut escaped = String::with_capacity(class.len() * 2);

    for (idx, ch) in class.chars().enumerate() {
        if (idx == 0 && ch.is_ascii_digit()) || ch.is_whitespace() || ch.is_control() {
            escaped.push_str(&format!("\\{:x} ", ch as u32));
            continue;
        }
        if ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' || !ch.is_ascii() {
            escaped.push(ch);
            continue;
        }
        escaped.push('\\');
        escaped.push(ch);
    }

    escaped
}
