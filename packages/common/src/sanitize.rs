//! Allow-list sanitizer for the raw markup fields (`text.html` and each
//! `columns[i].html`). Both renderers run markup through here before
//! inserting it, since compiled templates are delivered to third parties.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashSet;
use tracing::debug;

/// How raw markup fields are treated by the renderers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkupPolicy {
    /// Strip everything outside the email allow-list
    #[default]
    Sanitize,
    /// Insert markup verbatim (staff-only tooling)
    Trusted,
}

/// Inline CSS properties kept on sanitized markup
///
/// Layout that mail clients honour; positioning and anything able to load
/// resources or overlay the message is dropped.
pub const EMAIL_STYLE_PROPERTIES: &[&str] = &[
    "background-color",
    "border",
    "border-bottom",
    "border-collapse",
    "border-color",
    "border-left",
    "border-radius",
    "border-right",
    "border-style",
    "border-top",
    "border-width",
    "color",
    "display",
    "font",
    "font-family",
    "font-size",
    "font-style",
    "font-weight",
    "height",
    "letter-spacing",
    "line-height",
    "margin",
    "margin-bottom",
    "margin-left",
    "margin-right",
    "margin-top",
    "max-width",
    "padding",
    "padding-bottom",
    "padding-left",
    "padding-right",
    "padding-top",
    "text-align",
    "text-decoration",
    "text-transform",
    "vertical-align",
    "white-space",
    "width",
];

/// Sanitizer configured for email body markup
pub struct Sanitizer {
    policy: MarkupPolicy,
    builder: ammonia::Builder<'static>,
}

impl Sanitizer {
    pub fn new(policy: MarkupPolicy) -> Self {
        let mut builder = ammonia::Builder::default();
        builder
            .add_tags(&["font", "center"])
            .add_generic_attributes(&["style", "align"])
            .add_tag_attributes("a", &["target"])
            .add_tag_attributes("font", &["color", "face", "size"])
            .filter_style_properties(EMAIL_STYLE_PROPERTIES.iter().copied().collect::<HashSet<_>>())
            .link_rel(Some("noopener noreferrer"));

        Self { policy, builder }
    }

    pub fn policy(&self) -> MarkupPolicy {
        self.policy
    }

    /// Clean one markup fragment according to the policy
    pub fn clean<'a>(&self, markup: &'a str) -> Cow<'a, str> {
        match self.policy {
            MarkupPolicy::Trusted => Cow::Borrowed(markup),
            MarkupPolicy::Sanitize => {
                let cleaned = self.builder.clean(markup).to_string();
                if cleaned.len() != markup.len() {
                    debug!(before = markup.len(), after = cleaned.len(), "Sanitizer rewrote markup");
                }
                Cow::Owned(cleaned)
            }
        }
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new(MarkupPolicy::default())
    }
}

impl std::fmt::Debug for Sanitizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sanitizer").field("policy", &self.policy).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_scripts_and_handlers() {
        let sanitizer = Sanitizer::default();
        let cleaned = sanitizer.clean(r#"<p onclick="steal()">Hi<script>alert(1)</script></p>"#);

        assert!(cleaned.contains("<p>Hi</p>"));
        assert!(!cleaned.contains("script"));
        assert!(!cleaned.contains("onclick"));
    }

    #[test]
    fn test_keeps_inline_styles_and_links() {
        let sanitizer = Sanitizer::default();
        let cleaned = sanitizer.clean(r#"<p style="color: red"><a href="https://example.com">Read</a></p>"#);

        assert!(cleaned.contains("style="));
        assert!(cleaned.contains("color"));
        assert!(cleaned.contains(r#"href="https://example.com""#));
    }

    #[test]
    fn test_style_properties_are_filtered() {
        let sanitizer = Sanitizer::default();
        let cleaned = sanitizer.clean(
            r#"<p style="color: red; position: fixed; background-image: url(https://tracker.example/x.gif)">Hi</p>"#,
        );

        assert!(cleaned.contains("color"));
        assert!(cleaned.contains("red"));
        assert!(!cleaned.contains("position"));
        assert!(!cleaned.contains("tracker.example"));
    }

    #[test]
    fn test_trusted_policy_is_verbatim() {
        let sanitizer = Sanitizer::new(MarkupPolicy::Trusted);
        let markup = "<p>x</p><script>1</script>";
        assert_eq!(sanitizer.clean(markup), markup);
    }
}
