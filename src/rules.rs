use regex::{Captures, Regex};

use crate::error::PresetError;
use crate::options::ScaleConfig;

/// Ordered CSS declarations produced by one rule.
///
/// Setting a property that is already present replaces its value in place,
/// so the first insertion decides the position.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Declaration {
    entries: Vec<(String, String)>,
}

impl Declaration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(property: &str, value: impl Into<String>) -> Self {
        let mut declaration = Self::new();
        declaration.set(property, value);
        declaration
    }

    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        let mut declaration = Self::new();
        for (property, value) in pairs {
            declaration.set(property, *value);
        }
        declaration
    }

    pub fn set(&mut self, property: &str, value: impl Into<String>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(name, _)| name == property) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((property.to_string(), value)),
        }
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Capture groups of a pattern rule with the numeric readings producers use.
pub struct RuleCaptures<'t> {
    captures: Captures<'t>,
}

impl<'t> RuleCaptures<'t> {
    pub fn raw(&self, group: usize) -> &'t str {
        self.captures
            .get(group)
            .map(|m| m.as_str())
            .unwrap_or_default()
    }

    /// Integer reading with truncation, `NaN` when no digits lead the group.
    pub fn int(&self, group: usize) -> f64 {
        parse_int(self.raw(group))
    }

    pub fn decimal(&self, group: usize) -> f64 {
        parse_float(self.raw(group))
    }

    pub fn ident(&self, group: usize) -> &'t str {
        self.raw(group)
    }
}

pub type Producer = fn(&RuleCaptures<'_>, &ScaleConfig) -> Declaration;

/// A matcher paired with the declarations it yields.
#[derive(Debug, Clone)]
pub enum Rule {
    /// Matches the token literally and yields a fixed declaration.
    Static {
        name: String,
        declaration: Declaration,
    },
    /// Matches a regex and computes the declaration from its captures.
    Pattern {
        name: String,
        regex: Regex,
        producer: Producer,
    },
}

impl Rule {
    pub fn exact(name: &str, pairs: &[(&str, &str)]) -> Self {
        Self::Static {
            name: name.to_string(),
            declaration: Declaration::from_pairs(pairs),
        }
    }

    pub fn pattern(name: &str, pattern: &str, producer: Producer) -> Result<Self, PresetError> {
        let regex = Regex::new(pattern).map_err(|source| PresetError::InvalidPattern {
            rule: name.to_string(),
            source,
        })?;
        Ok(Self::Pattern {
            name: name.to_string(),
            regex,
            producer,
        })
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Static { name, .. } | Self::Pattern { name, .. } => name,
        }
    }

    fn produce(&self, token: &str, scale: &ScaleConfig) -> Option<Declaration> {
        match self {
            Self::Static { name, declaration } => (name == token).then(|| declaration.clone()),
            Self::Pattern {
                regex, producer, ..
            } => {
                let captures = regex.captures(token)?;
                Some(producer(&RuleCaptures { captures }, scale))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch {
    pub rule: String,
    pub declaration: Declaration,
}

/// Rules in precedence order; the first matching entry wins.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn lookup(&self, token: &str, scale: &ScaleConfig) -> Option<RuleMatch> {
        self.rules.iter().find_map(|rule| {
            let declaration = rule.produce(token, scale)?;
            tracing::trace!(token, rule = rule.name(), "rule matched");
            Some(RuleMatch {
                rule: rule.name().to_string(),
                declaration,
            })
        })
    }
}

/// Leading-integer reading: optional sign then digits, anything after the
/// digits is ignored.
pub fn parse_int(raw: &str) -> f64 {
    let trimmed = raw.trim_start();
    let (negative, digits) = split_sign(trimmed);
    let end = digits
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return f64::NAN;
    }
    let value = digits[..end].parse::<f64>().unwrap_or(f64::NAN);
    if negative { -value } else { value }
}

/// Longest decimal prefix reading, `NaN` when there is none.
pub fn parse_float(raw: &str) -> f64 {
    let trimmed = raw.trim_start();
    let (negative, body) = split_sign(trimmed);
    if body.starts_with("Infinity") {
        return if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let bytes = body.as_bytes();
    let mut idx = 0usize;
    let mut mantissa_digits = 0usize;
    while idx < bytes.len() && bytes[idx].is_ascii_digit() {
        idx += 1;
        mantissa_digits += 1;
    }
    let mut end = idx;
    if idx < bytes.len() && bytes[idx] == b'.' {
        idx += 1;
        while idx < bytes.len() && bytes[idx].is_ascii_digit() {
            idx += 1;
            mantissa_digits += 1;
        }
        end = idx;
    }
    if mantissa_digits == 0 {
        return f64::NAN;
    }
    if idx < bytes.len() && (bytes[idx] == b'e' || bytes[idx] == b'E') {
        let mut exp_idx = idx + 1;
        if exp_idx < bytes.len() && (bytes[exp_idx] == b'+' || bytes[exp_idx] == b'-') {
            exp_idx += 1;
        }
        let exp_start = exp_idx;
        while exp_idx < bytes.len() && bytes[exp_idx].is_ascii_digit() {
            exp_idx += 1;
        }
        if exp_idx > exp_start {
            end = exp_idx;
        }
    }

    let mut literal = body[..end].to_string();
    if literal.starts_with('.') {
        literal.insert(0, '0');
    }
    if let Some(stripped) = literal.strip_suffix('.') {
        literal = stripped.to_string();
    }
    let literal = literal.replacen(".e", "e", 1).replacen(".E", "E", 1);
    let value = literal.parse::<f64>().unwrap_or(f64::NAN);
    if negative { -value } else { value }
}

fn split_sign(raw: &str) -> (bool, &str) {
    if let Some(rest) = raw.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = raw.strip_prefix('+') {
        (false, rest)
    } else {
        (false, raw)
    }
}

/// Renders a number the way it reads when interpolated into a template
/// string: integral values lose their fraction and non-finite values are
/// spelled out.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        };
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if !(1e-6..1e21).contains(&magnitude) {
        let formatted = format!("{:e}", value);
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => formatted,
        };
    }
    format!("{}", value)
}

pub fn px(value: f64) -> String {
    format!("{}px", format_number(value))
}

/// The preset's utility rules in precedence order.
pub fn spritz_rules() -> Result<RuleTable, PresetError> {
    let rules = vec![
        // switcher breakpoint and item-grid column floor
        Rule::pattern("cusp", r"^cusp-(\d+)$", |caps, scale| {
            Declaration::single("--cusp", px(caps.int(1) * scale.base_space))
        })?,
        Rule::pattern("min-item-width", r"^min-item-width-(\d+)$", |caps, scale| {
            Declaration::single("--min-item-width", px(caps.int(1) * scale.base_space))
        })?,
        Rule::exact("align-start", &[("align-items", "flex-start")]),
        Rule::exact("align-end", &[("align-items", "flex-end")]),
        Rule::exact("align-stretch", &[("align-items", "stretch")]),
        Rule::exact("align-center", &[("align-items", "center")]),
        Rule::exact("align-baseline", &[("align-items", "baseline")]),
        Rule::exact("justify-start", &[("justify-content", "flex-start")]),
        Rule::exact("justify-center", &[("justify-content", "center")]),
        Rule::exact("justify-end", &[("justify-content", "flex-end")]),
        Rule::exact("justify-around", &[("justify-content", "space-around")]),
        Rule::exact("justify-between", &[("justify-content", "space-between")]),
        Rule::exact("justify-evenly", &[("justify-content", "space-evenly")]),
        Rule::pattern("basis", r"^basis-(\d+)$", |caps, scale| {
            Declaration::single("flex-basis", px(caps.int(1) * scale.base_space))
        })?,
        Rule::pattern("grow", r"^grow-(\d+)$", |caps, _| {
            Declaration::single("flex-grow", caps.raw(1))
        })?,
        Rule::exact("grow-max", &[("flex-grow", "999")]),
        Rule::pattern("shrink", r"^shrink-(\d+)$", |caps, _| {
            Declaration::single("flex-shrink", caps.raw(1))
        })?,
        Rule::exact("relative", &[("position", "relative")]),
        Rule::exact("absolute", &[("position", "absolute")]),
        Rule::exact("fixed", &[("position", "fixed")]),
        Rule::exact("sticky", &[("position", "sticky")]),
        Rule::exact("static", &[("position", "static")]),
        Rule::pattern("inset", r"^inset-(\d+)$", |caps, scale| {
            Declaration::single("inset", px(caps.int(1) * scale.base_gap))
        })?,
        Rule::pattern("inset-inline", r"^inset-inline-(\d+)$", |caps, scale| {
            Declaration::single("inset-inline", px(caps.int(1) * scale.base_gap))
        })?,
        Rule::pattern("inset-block", r"^inset-block-(\d+)$", |caps, scale| {
            Declaration::single("inset-block", px(caps.int(1) * scale.base_gap))
        })?,
        Rule::pattern("top", r"^top-(\d+)$", |caps, scale| {
            Declaration::single("top", px(caps.int(1) * scale.base_gap))
        })?,
        Rule::pattern("right", r"^right-(\d+)$", |caps, scale| {
            Declaration::single("right", px(caps.int(1) * scale.base_gap))
        })?,
        Rule::pattern("bottom", r"^bottom-(\d+)$", |caps, scale| {
            Declaration::single("bottom", px(caps.int(1) * scale.base_gap))
        })?,
        Rule::pattern("left", r"^left-(\d+)$", |caps, scale| {
            Declaration::single("left", px(caps.int(1) * scale.base_gap))
        })?,
        // small spacing: gaps and padding
        Rule::pattern("gap", r"^gap-(\d+)$", |caps, scale| {
            Declaration::single("gap", px(caps.int(1) * scale.base_gap))
        })?,
        Rule::pattern("gap-inline", r"^gap-inline-(\d+)$", |caps, scale| {
            Declaration::single("column-gap", px(caps.int(1) * scale.base_gap))
        })?,
        Rule::pattern("gap-block", r"^gap-block-(\d+)$", |caps, scale| {
            Declaration::single("row-gap", px(caps.int(1) * scale.base_gap))
        })?,
        Rule::pattern("pad", r"^pad-(\d+)$", |caps, scale| {
            Declaration::single("padding", px(caps.int(1) * scale.base_gap))
        })?,
        Rule::pattern("pad-inline", r"^pad-inline-(\d+)$", |caps, scale| {
            Declaration::single("padding-inline", px(caps.int(1) * scale.base_gap))
        })?,
        Rule::pattern("pad-block", r"^pad-block-(\d+)$", |caps, scale| {
            Declaration::single("padding-block", px(caps.int(1) * scale.base_gap))
        })?,
        Rule::pattern("min-inline", r"^min-inline-(\d+)$", |caps, scale| {
            Declaration::single("min-inline-size", px(caps.int(1) * scale.base_space))
        })?,
        Rule::pattern("max-inline", r"^max-inline-(\d+)$", |caps, scale| {
            Declaration::single(
                "max-inline-size",
                format!("min({}, 100%)", px(caps.int(1) * scale.base_space)),
            )
        })?,
        Rule::pattern("inline", r"^inline-(\d+)$", |caps, scale| {
            Declaration::single("inline-size", px(caps.int(1) * scale.base_space))
        })?,
        Rule::pattern("min-block", r"^min-block-(\d+)$", |caps, scale| {
            Declaration::single("min-block-size", px(caps.int(1) * scale.base_gap))
        })?,
        Rule::pattern("max-block", r"^max-block-(\d+)$", |caps, scale| {
            Declaration::single("max-block-size", px(caps.int(1) * scale.base_gap))
        })?,
        Rule::pattern("block", r"^block-(\d+)$", |caps, scale| {
            Declaration::single("block-size", px(caps.int(1) * scale.base_gap))
        })?,
        Rule::pattern("nudge", r"^nudge-([\d\.]+)$", |caps, _| {
            Declaration::single("margin-block-start", px(caps.decimal(1)))
        })?,
        Rule::pattern("push", r"^push-(\d+)$", |caps, scale| {
            Declaration::single("margin-block-end", px(caps.int(1) * scale.base_gap))
        })?,
        Rule::exact("aspect-square", &[("aspect-ratio", "1/1")]),
        Rule::exact("aspect-portrait", &[("aspect-ratio", "3/4")]),
        Rule::exact("aspect-landscape", &[("aspect-ratio", "4/3")]),
        Rule::exact("aspect-video", &[("aspect-ratio", "16/9")]),
        Rule::exact("float-left", &[("float", "left")]),
        Rule::exact("float-right", &[("float", "right")]),
        Rule::exact("float-none", &[("float", "none")]),
        Rule::exact("italic", &[("font-style", "italic")]),
        Rule::exact("non-italic", &[("font-style", "normal")]),
        Rule::pattern("weight", r"^weight-(\d+)$", |caps, _| {
            Declaration::single("font-weight", caps.raw(1))
        })?,
        Rule::exact(
            "truncate",
            &[
                ("overflow", "hidden"),
                ("text-overflow", "ellipsis"),
                ("white-space", "nowrap"),
            ],
        ),
        Rule::pattern("line-clamp", r"^line-clamp-(\d+)$", |caps, _| {
            let mut declaration = Declaration::from_pairs(&[
                ("overflow", "hidden"),
                ("display", "-webkit-box"),
                ("-webkit-box-orient", "vertical"),
            ]);
            declaration.set("-webkit-line-clamp", caps.raw(1));
            declaration
        })?,
        Rule::exact("list-inside", &[("list-style-position", "inside")]),
        Rule::exact("list-outside", &[("list-style-position", "outside")]),
        Rule::exact("list-none", &[("list-style-type", "none")]),
        Rule::exact("list-disc", &[("list-style-type", "disc")]),
        Rule::exact("text-start", &[("text-align", "start")]),
        Rule::exact("text-end", &[("text-align", "end")]),
        Rule::exact("text-center", &[("text-align", "center")]),
        // theme tokens referenced by name
        Rule::pattern("text-color", r"^text-(.+)$", |caps, _| {
            Declaration::single("color", format!("var(--color-{})", caps.ident(1)))
        })?,
        Rule::pattern("bg-color", r"^bg-(.+)$", |caps, _| {
            Declaration::single(
                "background-color",
                format!("var(--color-{})", caps.ident(1)),
            )
        })?,
        Rule::pattern("font-family", r"^font-(.+)$", |caps, _| {
            Declaration::single("font-family", format!("var(--font-{})", caps.ident(1)))
        })?,
        Rule::exact("underline", &[("text-decoration-line", "underline")]),
        Rule::exact("line-through", &[("text-decoration-line", "line-through")]),
        Rule::exact("no-line", &[("text-decoration-line", "none")]),
        Rule::exact(
            "decoration-from-font",
            &[("text-decoration-thickness", "from-font")],
        ),
        Rule::pattern("decoration", r"^decoration-([\d\.]+)$", |caps, _| {
            Declaration::single("text-decoration-thickness", px(caps.decimal(1)))
        })?,
    ];

    Ok(RuleTable::new(rules))
}
