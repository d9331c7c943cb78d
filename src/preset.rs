use crate::error::PresetError;
use crate::layout::Preflight;
use crate::options::{PresetOptions, ScaleConfig};
use crate::rules::{Declaration, Rule, RuleTable, spritz_rules};
use crate::theme::Theme;
use crate::variants::{MatchContext, Variant, VariantChain, default_chain};

pub const PRESET_NAME: &str = "@spritz-css/uno-preset";

/// Everything a host engine needs to turn class names into CSS.
#[derive(Debug, Clone)]
pub struct Preset {
    pub name: String,
    pub options: PresetOptions,
    pub scale: ScaleConfig,
    pub variants: VariantChain,
    pub rules: RuleTable,
    pub preflights: Vec<Preflight>,
}

/// A token that made it through the variant chain and hit a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedUtility {
    pub token: String,
    pub context: MatchContext,
    pub rule: String,
    pub declaration: Declaration,
}

pub fn preset_spritz(options: PresetOptions) -> Result<Preset, PresetError> {
    let scale = ScaleConfig::from_options(&options);
    let rules = spritz_rules()?;
    let variants = default_chain();
    tracing::debug!(
        base_gap = scale.base_gap,
        base_space = scale.base_space,
        rules = rules.len(),
        variants = variants.variants().len(),
        "assembled preset"
    );

    Ok(Preset {
        name: PRESET_NAME.to_string(),
        options,
        scale,
        variants,
        rules,
        preflights: vec![Preflight::layout()],
    })
}

impl Preset {
    /// Runs one token through the variant chain and the rule table.
    pub fn match_token(&self, token: &str, theme: Option<&Theme>) -> Option<MatchedUtility> {
        let context = self.variants.apply(token, theme);
        let found = self.rules.lookup(&context.matcher, &self.scale)?;
        Some(MatchedUtility {
            token: token.to_string(),
            context,
            rule: found.rule,
            declaration: found.declaration,
        })
    }

    /// Appends a variant after the built-in ones.
    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variants.push(variant);
        self
    }

    /// Appends a rule; it only applies to tokens no built-in rule matches.
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn preflight_css(&self) -> String {
        self.preflights
            .iter()
            .map(Preflight::css)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
