use maildraft_blocks::Platform;
use serde::{Deserialize, Serialize};

/// Where social icon images are fetched from
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum IconSource {
    /// Generic placeholder image service showing the platform initial
    #[default]
    Placeholder,
    /// Brand assets hosted at `{base_url}/{platform}.png`
    BaseUrl {
        #[serde(rename = "baseUrl")]
        base_url: String,
    },
}

impl IconSource {
    pub fn from_base_url(base_url: Option<String>) -> Self {
        match base_url {
            Some(base_url) if !base_url.trim().is_empty() => IconSource::BaseUrl {
                base_url: base_url.trim_end_matches('/').to_string(),
            },
            _ => IconSource::Placeholder,
        }
    }

    pub fn icon_url(&self, platform: Platform, size: u32) -> String {
        match self {
            IconSource::Placeholder => {
                let initial = platform.label().chars().next().unwrap_or('?');
                format!("https://placehold.co/{size}x{size}/333333/ffffff?text={initial}")
            }
            IconSource::BaseUrl { base_url } => format!("{}/{}.png", base_url, platform.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_uses_initial_and_size() {
        let url = IconSource::Placeholder.icon_url(Platform::Linkedin, 32);
        assert_eq!(url, "https://placehold.co/32x32/333333/ffffff?text=L");
    }

    #[test]
    fn test_base_url_uses_platform_asset() {
        let source = IconSource::from_base_url(Some("https://cdn.example.com/icons/".to_string()));
        assert_eq!(
            source.icon_url(Platform::Instagram, 24),
            "https://cdn.example.com/icons/instagram.png"
        );
        assert_eq!(IconSource::from_base_url(Some(" ".to_string())), IconSource::Placeholder);
    }
}
