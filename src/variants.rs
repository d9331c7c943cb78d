use crate::theme::{
    Theme, ThemeTable, default_breakpoints, default_media_queries, table_entries,
};

/// Character that must immediately follow a variant label.
pub const VARIANT_SEPARATOR: char = ':';

/// Join token used when several parent wrappers nest around one rule.
pub const PARENT_SEPARATOR: &str = " $$ ";

const MEDIA_ORDER_BASE: u32 = 100;
const BREAKPOINT_ORDER_BASE: u32 = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rewrite {
    /// Appended to the generated selector, e.g. `:hover`.
    Selector(String),
    /// At-rule the generated rule is nested in, e.g. `@media print`.
    Parent { wrapper: String, order: Option<u32> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantRewrite {
    pub matcher: String,
    pub rewrite: Rewrite,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantMatch {
    NoMatch,
    Matched(VariantRewrite),
}

/// State threaded through the variant chain for a single token.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MatchContext {
    pub matcher: String,
    pub selector: Option<String>,
    pub parent: Option<String>,
    pub order: Option<u32>,
}

impl MatchContext {
    pub fn new(token: &str) -> Self {
        Self {
            matcher: token.to_string(),
            ..Self::default()
        }
    }

    /// Folds a variant rewrite into the context.
    ///
    /// Selector suffixes and parent wrappers accumulate in firing order. The
    /// ordering hint keeps the highest value seen so the emitted position of
    /// a nested rule does not depend on the order its labels were written in.
    pub fn apply(&mut self, rewrite: VariantRewrite) {
        self.matcher = rewrite.matcher;
        match rewrite.rewrite {
            Rewrite::Selector(suffix) => {
                self.selector
                    .get_or_insert_with(String::new)
                    .push_str(&suffix);
            }
            Rewrite::Parent { wrapper, order } => {
                self.parent = Some(match self.parent.take() {
                    Some(existing) => format!("{}{}{}", existing, PARENT_SEPARATOR, wrapper),
                    None => wrapper,
                });
                if let Some(order) = order {
                    self.order = Some(self.order.map_or(order, |current| current.max(order)));
                }
            }
        }
    }

    pub fn parents(&self) -> Vec<&str> {
        self.parent
            .as_deref()
            .map(|parent| parent.split(PARENT_SEPARATOR).collect())
            .unwrap_or_default()
    }
}

fn strip_label<'a>(token: &'a str, label: &str) -> Option<&'a str> {
    token.strip_prefix(label)?.strip_prefix(VARIANT_SEPARATOR)
}

/// Variant whose label and selector suffix are both constants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedVariant {
    pub label: String,
    pub suffix: String,
}

impl FixedVariant {
    pub fn new(label: &str, suffix: &str) -> Self {
        Self {
            label: label.to_string(),
            suffix: suffix.to_string(),
        }
    }

    pub fn pseudo_class(label: &str) -> Self {
        Self::new(label, &format!(":{}", label))
    }

    pub fn match_token(&self, token: &str) -> VariantMatch {
        match strip_label(token, &self.label) {
            Some(rest) => VariantMatch::Matched(VariantRewrite {
                matcher: rest.to_string(),
                rewrite: Rewrite::Selector(self.suffix.clone()),
            }),
            None => VariantMatch::NoMatch,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapperKind {
    /// `@media (min-width: <value>)`
    MinWidth,
    /// `@media <value>`
    Media,
}

impl WrapperKind {
    fn render(self, value: &str) -> String {
        match self {
            Self::MinWidth => format!("@media (min-width: {})", value),
            Self::Media => format!("@media {}", value),
        }
    }
}

/// Variant whose labels come from a theme table merged over defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableVariant {
    pub name: String,
    pub table: ThemeTable,
    pub defaults: Vec<(String, String)>,
    pub wrapper: WrapperKind,
    pub order_base: u32,
}

impl TableVariant {
    pub fn breakpoints() -> Self {
        Self {
            name: "breakpoints".to_string(),
            table: ThemeTable::Breakpoints,
            defaults: default_breakpoints(),
            wrapper: WrapperKind::MinWidth,
            order_base: BREAKPOINT_ORDER_BASE,
        }
    }

    pub fn media() -> Self {
        Self {
            name: "media".to_string(),
            table: ThemeTable::Media,
            defaults: default_media_queries(),
            wrapper: WrapperKind::Media,
            order_base: MEDIA_ORDER_BASE,
        }
    }

    pub fn match_token(&self, token: &str, theme: Option<&Theme>) -> VariantMatch {
        let overrides = theme.and_then(|theme| theme.table(self.table));
        if self.defaults.is_empty() && overrides.is_none() {
            return VariantMatch::NoMatch;
        }

        for (idx, (name, value)) in table_entries(&self.defaults, overrides).enumerate() {
            if let Some(rest) = strip_label(token, name) {
                let position = u32::try_from(idx).unwrap_or(u32::MAX);
                return VariantMatch::Matched(VariantRewrite {
                    matcher: rest.to_string(),
                    rewrite: Rewrite::Parent {
                        wrapper: self.wrapper.render(value),
                        order: Some(self.order_base.saturating_add(position)),
                    },
                });
            }
        }
        VariantMatch::NoMatch
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Variant {
    Fixed(FixedVariant),
    Table(TableVariant),
}

impl Variant {
    pub fn name(&self) -> &str {
        match self {
            Self::Fixed(variant) => &variant.label,
            Self::Table(variant) => &variant.name,
        }
    }

    pub fn match_token(&self, token: &str, theme: Option<&Theme>) -> VariantMatch {
        match self {
            Self::Fixed(variant) => variant.match_token(token),
            Self::Table(variant) => variant.match_token(token, theme),
        }
    }
}

/// Ordered list of variants applied to a token before rule matching.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VariantChain {
    variants: Vec<Variant>,
}

impl VariantChain {
    pub fn new(variants: Vec<Variant>) -> Self {
        Self { variants }
    }

    pub fn push(&mut self, variant: Variant) {
        self.variants.push(variant);
    }

    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    /// Strips every recognized label from the front of `token`.
    ///
    /// Each pass takes the first variant that matches the current residual,
    /// then starts over from the top of the chain. Every match consumes at
    /// least the separator, so the loop ends once no variant recognizes the
    /// residual.
    pub fn apply(&self, token: &str, theme: Option<&Theme>) -> MatchContext {
        let mut context = MatchContext::new(token);

        'scan: loop {
            for variant in &self.variants {
                if let VariantMatch::Matched(rewrite) =
                    variant.match_token(&context.matcher, theme)
                {
                    tracing::trace!(
                        token,
                        variant = variant.name(),
                        residual = rewrite.matcher.as_str(),
                        "variant matched"
                    );
                    context.apply(rewrite);
                    continue 'scan;
                }
            }
            break;
        }

        context
    }
}

pub fn default_fixed_variants() -> Vec<FixedVariant> {
    vec![
        FixedVariant::pseudo_class("hover"),
        FixedVariant::pseudo_class("focus"),
        FixedVariant::pseudo_class("focus-visible"),
        FixedVariant::pseudo_class("focus-within"),
        FixedVariant::pseudo_class("active"),
        FixedVariant::pseudo_class("visited"),
        FixedVariant::pseudo_class("disabled"),
        FixedVariant::pseudo_class("checked"),
        FixedVariant::new("first", ":first-child"),
        FixedVariant::new("last", ":last-child"),
        FixedVariant::new("only", ":only-child"),
        FixedVariant::new("odd", ":nth-of-type(odd)"),
        FixedVariant::new("even", ":nth-of-type(even)"),
        FixedVariant::pseudo_class("first-of-type"),
        FixedVariant::pseudo_class("last-of-type"),
        FixedVariant::new("before", "::before"),
        FixedVariant::new("after", "::after"),
        FixedVariant::new("placeholder", "::placeholder"),
    ]
}

/// Fixed-label variants first, then the theme-driven media tables.
pub fn default_chain() -> VariantChain {
    let mut variants = default_fixed_variants()
        .into_iter()
        .map(Variant::Fixed)
        .collect::<Vec<_>>();
    variants.push(Variant::Table(TableVariant::breakpoints()));
    variants.push(Variant::Table(TableVariant::media()));
    VariantChain::new(variants)
}

#[cfg(test)]
mod tests {
    use super::{
        FixedVariant, MatchContext, PARENT_SEPARATOR, Rewrite, TableVariant, Variant,
        VariantChain, VariantMatch, VariantRewrite, WrapperKind, default_chain,
        default_fixed_variants,
    };
    use crate::theme::{Theme, ThemeTable};
    use pretty_assertions::assert_eq;

    #[test]
    fn fixed_variant_strips_label_and_appends_suffix() {
        for variant in default_fixed_variants() {
            let token = format!("{}:gap-4", variant.label);
            assert_eq!(
                variant.match_token(&token),
                VariantMatch::Matched(VariantRewrite {
                    matcher: "gap-4".to_string(),
                    rewrite: Rewrite::Selector(variant.suffix.clone()),
                })
            );
        }
    }

    #[test]
    fn fixed_variant_requires_separator_after_label() {
        let hover = FixedVariant::pseudo_class("hover");
        assert_eq!(hover.match_token("hovered:gap-4"), VariantMatch::NoMatch);
        assert_eq!(hover.match_token("hoverx:gap-4"), VariantMatch::NoMatch);
        assert_eq!(hover.match_token("hover-gap-4"), VariantMatch::NoMatch);
        assert_eq!(hover.match_token("gap-4"), VariantMatch::NoMatch);
    }

    #[test]
    fn first_does_not_swallow_first_of_type() {
        let context = default_chain().apply("first-of-type:pad-1", None);
        assert_eq!(context.matcher, "pad-1");
        assert_eq!(context.selector.as_deref(), Some(":first-of-type"));
    }

    #[test]
    fn unmatched_token_passes_through_unchanged() {
        let chain = default_chain();
        for token in ["unknown-class", "gap-4", "hovered:x", "tablet:pad-2", ""] {
            let context = chain.apply(token, Some(&Theme::default()));
            assert_eq!(context, MatchContext::new(token));
            for variant in chain.variants() {
                assert_eq!(variant.match_token(token, None), VariantMatch::NoMatch);
            }
        }
    }

    #[test]
    fn hover_prefix_yields_selector_suffix() {
        let context = default_chain().apply("hover:gap-4", None);
        assert_eq!(context.matcher, "gap-4");
        assert_eq!(context.selector.as_deref(), Some(":hover"));
        assert_eq!(context.parent, None);
        assert_eq!(context.order, None);
    }

    #[test]
    fn selector_suffixes_accumulate_in_firing_order() {
        let context = default_chain().apply("focus:hover:gap-4", None);
        assert_eq!(context.matcher, "gap-4");
        assert_eq!(context.selector.as_deref(), Some(":focus:hover"));
    }

    #[test]
    fn breakpoint_uses_theme_value() {
        let theme = Theme::default().with_breakpoint("md", "640px");
        let context = default_chain().apply("md:pad-2", Some(&theme));
        assert_eq!(context.matcher, "pad-2");
        assert_eq!(
            context.parent.as_deref(),
            Some("@media (min-width: 640px)")
        );
        assert_eq!(context.order, Some(201));
    }

    #[test]
    fn breakpoint_defaults_apply_without_theme() {
        let context = default_chain().apply("lg:pad-2", None);
        assert_eq!(
            context.parent.as_deref(),
            Some("@media (min-width: 1024px)")
        );
    }

    #[test]
    fn theme_only_breakpoint_is_recognized() {
        let theme = Theme::default().with_breakpoint("tablet", "900px");
        let context = default_chain().apply("tablet:pad-2", Some(&theme));
        assert_eq!(context.matcher, "pad-2");
        assert_eq!(
            context.parent.as_deref(),
            Some("@media (min-width: 900px)")
        );
        assert_eq!(context.order, Some(205));
    }

    #[test]
    fn table_without_defaults_or_theme_passes_through() {
        let variant = TableVariant {
            name: "custom".to_string(),
            table: ThemeTable::Media,
            defaults: Vec::new(),
            wrapper: WrapperKind::Media,
            order_base: 0,
        };
        assert_eq!(variant.match_token("print:pad-2", None), VariantMatch::NoMatch);
        assert_eq!(
            variant.match_token("print:pad-2", Some(&Theme::default())),
            VariantMatch::NoMatch
        );

        let theme = Theme::default().with_media("print", "print");
        assert_eq!(
            variant.match_token("print:pad-2", Some(&theme)),
            VariantMatch::Matched(VariantRewrite {
                matcher: "pad-2".to_string(),
                rewrite: Rewrite::Parent {
                    wrapper: "@media print".to_string(),
                    order: Some(0),
                },
            })
        );
    }

    #[test]
    fn parents_join_in_firing_order() {
        let chain = default_chain();
        let cases: [(&str, &[&str]); 4] = [
            ("pad-1", &[]),
            ("md:pad-1", &["@media (min-width: 768px)"]),
            (
                "dark:md:pad-1",
                &["@media (prefers-color-scheme: dark)", "@media (min-width: 768px)"],
            ),
            (
                "print:dark:md:pad-1",
                &[
                    "@media print",
                    "@media (prefers-color-scheme: dark)",
                    "@media (min-width: 768px)",
                ],
            ),
        ];

        for (token, expected) in cases {
            let context = chain.apply(token, None);
            assert_eq!(context.matcher, "pad-1");
            assert_eq!(context.parents(), expected.to_vec());
            let joined = expected.join(PARENT_SEPARATOR);
            assert_eq!(context.parent.unwrap_or_default(), joined);
        }
    }

    #[test]
    fn order_hint_is_independent_of_label_order() {
        let chain = default_chain();
        let left = chain.apply("md:dark:pad-1", None);
        let right = chain.apply("dark:md:pad-1", None);
        assert_eq!(left.order, right.order);
        assert_eq!(left.order, Some(201));
    }

    #[test]
    fn repeated_labels_are_each_consumed() {
        let context = default_chain().apply("hover:hover:gap-4", None);
        assert_eq!(context.matcher, "gap-4");
        assert_eq!(context.selector.as_deref(), Some(":hover:hover"));
    }

    #[test]
    fn empty_label_still_consumes_separator() {
        let chain = VariantChain::new(vec![Variant::Fixed(FixedVariant::new("", ":x"))]);
        let context = chain.apply("::gap-1", None);
        assert_eq!(context.matcher, "gap-1");
        assert_eq!(context.selector.as_deref(), Some(":x:x"));

        let theme = Theme::default().with_media("", "print");
        let context = default_chain().apply(":gap-1", Some(&theme));
        assert_eq!(context.matcher, "gap-1");
        assert_eq!(context.parent.as_deref(), Some("@media print"));
    }

    #[test]
    fn chain_order_decides_between_colliding_labels() {
        let theme = Theme::default().with_media("hover", "(hover: hover)");
        let context = default_chain().apply("hover:gap-4", Some(&theme));
        assert_eq!(context.selector.as_deref(), Some(":hover"));
        assert_eq!(context.parent, None);

        let chain = VariantChain::new(vec![
            Variant::Table(TableVariant::media()),
            Variant::Fixed(FixedVariant::pseudo_class("hover")),
        ]);
        let context = chain.apply("hover:gap-4", Some(&theme));
        assert_eq!(context.parent.as_deref(), Some("@media (hover: hover)"));
        assert_eq!(context.selector, None);
    }
}
