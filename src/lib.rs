//! Utility-class CSS preset: layout primitives, spacing rules and
//! state/media variants for an atomic CSS engine.
//!
//! A host engine hands every class name it finds to [`Preset::match_token`],
//! which strips variant labels (`hover:`, `md:`, `dark:` ...) and looks the
//! residual up in the rule table. [`generator::generate`] is a small
//! reference emitter built on the same contract.

pub mod config;
pub mod error;
pub mod generator;
pub mod layout;
pub mod options;
pub mod preset;
pub mod rules;
pub mod theme;
pub mod variants;

pub use error::{ConfigError, PresetError};
pub use generator::{GenerationResult, GeneratorConfig, generate};
pub use options::{PresetOptions, ScaleConfig};
pub use preset::{MatchedUtility, PRESET_NAME, Preset, preset_spritz};
pub use rules::{Declaration, Rule, RuleTable};
pub use theme::Theme;
pub use variants::{MatchContext, Variant, VariantChain, VariantMatch};
