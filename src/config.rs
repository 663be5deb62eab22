use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct SiteConfig {
    pub root: PathBuf,
    // Active site locale; empty means built-in English
    pub locale: String,
    // Catalog location, relative paths resolve against `root`
    pub catalog_dir: Option<PathBuf>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DisplayConfig {
    // Language of langpack's own messages: "auto" follows $LANG
    pub language: String,
    // Default output format for `list`: table | csv | json | count
    pub format: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            locale: String::new(),
            catalog_dir: None,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            language: "auto".to_string(),
            format: "table".to_string(),
        }
    }
}

impl Config {
    pub fn new() -> Result<Self> {
        let config_path = Self::get_config_path();

        if config_path.exists() {
            let content = fs::read_to_string(&config_path)
                .with_context(|| format!("failed to read {}", config_path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("invalid config {}", config_path.display()))?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path();
        if let Some(config_dir) = config_path.parent() {
            fs::create_dir_all(config_dir)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&config_path, content)
            .with_context(|| format!("failed to write {}", config_path.display()))?;
        Ok(())
    }

    pub fn get_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".langpack")
            .join("config.toml")
    }

    /// Site root: `--root` wins over `LANGPACK_ROOT`, which wins over the config file.
    pub fn effective_root(&self, cli_root: Option<PathBuf>) -> PathBuf {
        cli_root
            .or_else(|| std::env::var_os("LANGPACK_ROOT").map(PathBuf::from))
            .unwrap_or_else(|| self.site.root.clone())
    }

    pub fn get_effective_language(&self) -> String {
        if self.display.language == "auto" {
            std::env::var("LANG")
                .unwrap_or_else(|_| "en_US".to_string())
                .split('.')
                .next()
                .unwrap_or("en")
                .to_string()
        } else {
            self.display.language.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let config: Config = toml::from_str("[site]\nlocale = \"de_DE\"\n").unwrap();
        assert_eq!(config.site.locale, "de_DE");
        assert_eq!(config.site.root, PathBuf::from("."));
        assert_eq!(config.display.format, "table");
    }

    #[test]
    fn cli_root_overrides_config() {
        let config = Config::default();
        let root = config.effective_root(Some(PathBuf::from("/srv/site")));
        assert_eq!(root, PathBuf::from("/srv/site"));
    }

    #[test]
    fn explicit_display_language_is_used() {
        let mut config = Config::default();
        config.display.language = "zh_CN".to_string();
        assert_eq!(config.get_effective_language(), "zh_CN");
    }
}
