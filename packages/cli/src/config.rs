use maildraft_common::{IconSource, MarkupPolicy};
use maildraft_compiler_html::CompileOptions;
use maildraft_preview::PreviewOptions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "maildraft.config.json";

/// Maildraft configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory holding `<name>.json` + `<name>.html` template pairs
    #[serde(default = "default_templates_dir")]
    pub templates_dir: String,

    /// Where `compile` and `preview` write their files
    #[serde(default = "default_out_dir")]
    pub out_dir: String,

    #[serde(default)]
    pub compiler_options: CompilerOptions,
}

fn default_templates_dir() -> String {
    "templates".to_string()
}

fn default_out_dir() -> String {
    "dist".to_string()
}

fn default_pretty() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerOptions {
    /// Document title; the template name when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default = "default_pretty")]
    pub pretty: bool,

    /// Insert text and column markup without sanitizing
    #[serde(default)]
    pub trusted_markup: bool,

    /// Base URL of `<platform>.png` social icons
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_base_url: Option<String>,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            title: None,
            pretty: default_pretty(),
            trusted_markup: false,
            icon_base_url: None,
        }
    }
}

impl CompilerOptions {
    fn markup(&self) -> MarkupPolicy {
        if self.trusted_markup {
            MarkupPolicy::Trusted
        } else {
            MarkupPolicy::Sanitize
        }
    }

    fn icon_source(&self) -> IconSource {
        IconSource::from_base_url(self.icon_base_url.clone())
    }

    pub fn compile_options(&self, template_name: &str) -> CompileOptions {
        CompileOptions {
            title: self
                .title
                .clone()
                .unwrap_or_else(|| template_name.to_string()),
            pretty: self.pretty,
            markup: self.markup(),
            icon_source: self.icon_source(),
            ..Default::default()
        }
    }

    pub fn preview_options(&self) -> PreviewOptions {
        PreviewOptions {
            markup: self.markup(),
            icon_source: self.icon_source(),
            ..Default::default()
        }
    }
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    pub fn get_templates_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.templates_dir)
    }

    pub fn get_out_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.out_dir)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            templates_dir: default_templates_dir(),
            out_dir: default_out_dir(),
            compiler_options: CompilerOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "templatesDir": "emails",
            "outDir": "build",
            "compilerOptions": {
                "title": "Weekly",
                "pretty": false,
                "trustedMarkup": true,
                "iconBaseUrl": "https://cdn.example.com/icons/"
            }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.templates_dir, "emails");
        assert_eq!(config.out_dir, "build");

        let options = config.compiler_options.compile_options("ignored");
        assert_eq!(options.title, "Weekly");
        assert!(!options.pretty);
        assert_eq!(options.markup, MarkupPolicy::Trusted);
        assert_eq!(
            options.icon_source,
            IconSource::BaseUrl {
                base_url: "https://cdn.example.com/icons".to_string()
            }
        );
    }

    #[test]
    fn test_default_config() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.templates_dir, "templates");
        assert_eq!(config.out_dir, "dist");

        let options = config.compiler_options.compile_options("weekly");
        assert_eq!(options.title, "weekly");
        assert!(options.pretty);
        assert_eq!(options.markup, MarkupPolicy::Sanitize);
        assert_eq!(options.icon_source, IconSource::Placeholder);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path().to_str().unwrap()).unwrap();
        assert_eq!(config, Config::default());
    }
}
