//! Helpers shared by the interactive renderer and the HTML compiler.

pub mod escape;
pub mod icons;
pub mod sanitize;
pub mod style;

pub use escape::{css_value, escape_attr, escape_text, safe_url};
pub use icons::IconSource;
pub use sanitize::{MarkupPolicy, Sanitizer};
pub use style::{column_width_percent, px, InlineStyle};
