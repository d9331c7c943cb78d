use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::generator::GeneratorConfig;
use crate::options::PresetOptions;
use crate::theme::Theme;

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub minify: bool,
    #[serde(default)]
    pub options: PresetOptions,
    #[serde(default)]
    pub theme: Theme,
}

impl Config {
    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            minify: self.minify,
            theme: Some(self.theme.clone()),
        }
    }
}

pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(
        path = %path.display(),
        minify = config.minify,
        "loaded config"
    );
    Ok(config)
}

pub fn parse(text: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(text)
}

#[cfg(test)]
mod tests {
    use super::{Config, load, parse};
    use crate::error::ConfigError;
    use crate::theme::ThemeTable;
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn loads_toml_config() {
        let path = temp_path("spritz_config");
        let _ = fs::write(
            &path,
            r#"
minify = true

[options]
base_gap = 8
base_space = 32.5
"#,
        );
        let config = load(&path).expect("config should parse");
        assert!(config.minify);
        assert_eq!(config.options.base_gap, Some(8.0));
        assert_eq!(config.options.base_space, Some(32.5));
    }

    #[test]
    fn defaults_when_empty() {
        let config = parse("").expect("config should parse");
        assert_eq!(config, Config::default());
        assert!(config.theme.table(ThemeTable::Breakpoints).is_none());
        assert!(config.theme.table(ThemeTable::Media).is_none());
    }

    #[test]
    fn loads_theme_tables() {
        let config = parse(
            r#"
[theme.breakpoints]
md = "640px"
tablet = "900px"

[theme.media]
dark = "(prefers-color-scheme: dark)"
"#,
        )
        .expect("config should parse");
        let breakpoints = config
            .theme
            .table(ThemeTable::Breakpoints)
            .expect("breakpoints present");
        assert_eq!(breakpoints["md"], "640px");
        assert_eq!(breakpoints["tablet"], "900px");
        let media = config.theme.table(ThemeTable::Media).expect("media present");
        assert_eq!(media["dark"], "(prefers-color-scheme: dark)");

        let generator = config.generator_config();
        assert!(!generator.minify);
        assert_eq!(generator.theme.as_ref(), Some(&config.theme));
    }

    #[test]
    fn reports_missing_file() {
        let path = temp_path("spritz_config_missing");
        let err = load(&path).expect_err("missing file should fail");
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("failed to read config"));
    }

    #[test]
    fn reports_invalid_toml() {
        let path = temp_path("spritz_config_invalid");
        let _ = fs::write(&path, "options = [");
        let err = load(&path).expect_err("invalid toml should fail");
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("failed to parse config"));
    }

    fn temp_path(prefix: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        std::env::temp_dir().join(format!("{}_{}.toml", prefix, nanos))
    }
}
