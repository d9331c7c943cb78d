use serde::Deserialize;

pub const DEFAULT_BASE_GAP: f64 = 4.0;
pub const DEFAULT_BASE_SPACE: f64 = 40.0;

/// Options accepted when building the preset.
///
/// Both units are optional; a missing or zero value falls back to the
/// built-in default.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Default)]
pub struct PresetOptions {
    #[serde(default)]
    pub base_gap: Option<f64>,
    #[serde(default)]
    pub base_space: Option<f64>,
}

/// Resolved numeric units used by the spacing producers.
///
/// `base_gap` scales small spacing (gaps, padding, block sizes), while
/// `base_space` scales large spacing (inline sizes, flex basis, cusps).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleConfig {
    pub base_gap: f64,
    pub base_space: f64,
}

impl ScaleConfig {
    pub fn from_options(options: &PresetOptions) -> Self {
        Self {
            base_gap: resolve_unit(options.base_gap, DEFAULT_BASE_GAP),
            base_space: resolve_unit(options.base_space, DEFAULT_BASE_SPACE),
        }
    }
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self::from_options(&PresetOptions::default())
    }
}

fn resolve_unit(value: Option<f64>, fallback: f64) -> f64 {
    match value {
        Some(unit) if unit != 0.0 && !unit.is_nan() => unit,
        _ => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_BASE_GAP, DEFAULT_BASE_SPACE, PresetOptions, ScaleConfig};

    #[test]
    fn defaults_when_options_missing() {
        let scale = ScaleConfig::default();
        assert_eq!(scale.base_gap, DEFAULT_BASE_GAP);
        assert_eq!(scale.base_space, DEFAULT_BASE_SPACE);
    }

    #[test]
    fn honors_overrides() {
        let scale = ScaleConfig::from_options(&PresetOptions {
            base_gap: Some(8.0),
            base_space: Some(16.0),
        });
        assert_eq!(scale.base_gap, 8.0);
        assert_eq!(scale.base_space, 16.0);
    }

    #[test]
    fn zero_falls_back_to_default() {
        let scale = ScaleConfig::from_options(&PresetOptions {
            base_gap: Some(0.0),
            base_space: None,
        });
        assert_eq!(scale.base_gap, DEFAULT_BASE_GAP);
        assert_eq!(scale.base_space, DEFAULT_BASE_SPACE);
    }
}
