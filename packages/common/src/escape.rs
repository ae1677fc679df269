//! Escaping for values interpolated into generated markup.

use std::borrow::Cow;

/// Escape text content
pub fn escape_text(text: &str) -> Cow<'_, str> {
    html_escape::encode_text(text)
}

/// Escape a value placed inside a double-quoted attribute
pub fn escape_attr(value: &str) -> Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(value)
}

/// Drop characters that could end a CSS declaration or the surrounding
/// attribute (`red; position: fixed` must not become two declarations)
pub fn css_value(value: &str) -> Cow<'_, str> {
    const FORBIDDEN: &[char] = &[';', '"', '\'', '<', '>', '{', '}', '\\'];

    if value.contains(FORBIDDEN) {
        Cow::Owned(value.chars().filter(|c| !FORBIDDEN.contains(c)).collect())
    } else {
        Cow::Borrowed(value)
    }
}

const ALLOWED_SCHEMES: &[&str] = &["http", "https", "mailto", "tel"];

/// Return the url if it is safe to place in `href`/`src`
///
/// Relative urls and fragments pass; absolute urls must use an allowed
/// scheme, which rules out `javascript:` and `data:`.
pub fn safe_url(url: &str) -> Option<&str> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }

    match url.split_once(':') {
        Some((scheme, _)) if !scheme.contains(&['/', '?', '#'][..]) => {
            let scheme = scheme.to_ascii_lowercase();
            ALLOWED_SCHEMES.contains(&scheme.as_str()).then_some(url)
        }
        _ => Some(url),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_attr_quotes() {
        assert_eq!(escape_attr(r#"a"b"#), "a&quot;b");
        assert_eq!(escape_text("<b>"), "&lt;b&gt;");
    }

    #[test]
    fn test_css_value_cannot_break_out() {
        assert_eq!(css_value("#ffffff"), "#ffffff");
        assert_eq!(css_value("red; position: fixed"), "red position: fixed");
        assert_eq!(css_value(r#"red" onmouseover="x"#), "red onmouseover=x");
    }

    #[test]
    fn test_safe_url() {
        assert_eq!(safe_url("https://example.com"), Some("https://example.com"));
        assert_eq!(safe_url("mailto:desk@example.com"), Some("mailto:desk@example.com"));
        assert_eq!(safe_url("/issues/42"), Some("/issues/42"));
        assert_eq!(safe_url("#"), Some("#"));
        assert_eq!(safe_url("JavaScript:alert(1)"), None);
        assert_eq!(safe_url("data:text/html,hi"), None);
        assert_eq!(safe_url("   "), None);
    }
}
