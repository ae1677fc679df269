use crate::escape::css_value;
use std::fmt;

/// Ordered inline `style` declarations
///
/// Values pass through [`css_value`] so settings cannot inject extra
/// declarations or close the attribute.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InlineStyle {
    declarations: Vec<(&'static str, String)>,
}

impl InlineStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, property: &'static str, value: impl AsRef<str>) -> Self {
        self.declarations
            .push((property, css_value(value.as_ref()).into_owned()));
        self
    }

    pub fn px(self, property: &'static str, value: u32) -> Self {
        self.set(property, px(value))
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.declarations.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

impl fmt::Display for InlineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (property, value)) in self.declarations.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}: {};", property, value)?;
        }
        Ok(())
    }
}

pub fn px(value: u32) -> String {
    format!("{}px", value)
}

/// Width of each column as a percentage; guards a zero count
pub fn column_width_percent(column_count: u32) -> String {
    let width = 100.0 / column_count.max(1) as f64;
    let rounded = (width * 100.0).round() / 100.0;
    format!("{}%", rounded)
}
