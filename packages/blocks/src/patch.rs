//! # Partial Updates
//!
//! Patches are shallow merges: a field present in the patch replaces the
//! block's field, every other field is left alone. Array fields (`columns`,
//! `links`) are replaced whole, so callers read-modify-write the full array.
//!
//! Optional url fields use `Option<Option<String>>`: the outer `None` leaves
//! the field untouched, `Some(None)` (JSON `null`) clears it.

use crate::block::*;
use crate::error::{BlockError, BlockResult};
use crate::registry::{placeholder_column, COLUMN_RANGE};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// Distinguish a missing key from an explicit `null`
fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

fn merge<T: Clone>(target: &mut T, value: &Option<T>) {
    if let Some(value) = value {
        *target = value.clone();
    }
}

fn merge_url(target: &mut Option<String>, value: &Option<Option<String>>) {
    if let Some(value) = value {
        *target = value.clone().filter(|url| !url.trim().is_empty());
    }
}

// ---------------------------------------------------------------------------
// Content patches
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderContentPatch {
    #[serde(deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub logo: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextContentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageContentPatch {
    #[serde(deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub src: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub link: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonContentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub url: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnsContentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<Column>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialContentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<SocialLink>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FooterContentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unsubscribe_text: Option<String>,
}

/// Partial replacement of a block's content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentPatch {
    Header(HeaderContentPatch),
    Text(TextContentPatch),
    Image(ImageContentPatch),
    Button(ButtonContentPatch),
    Divider,
    Columns(ColumnsContentPatch),
    Social(SocialContentPatch),
    Footer(FooterContentPatch),
}

impl ContentPatch {
    pub fn block_type(&self) -> BlockType {
        match self {
            ContentPatch::Header(_) => BlockType::Header,
            ContentPatch::Text(_) => BlockType::Text,
            ContentPatch::Image(_) => BlockType::Image,
            ContentPatch::Button(_) => BlockType::Button,
            ContentPatch::Divider => BlockType::Divider,
            ContentPatch::Columns(_) => BlockType::Columns,
            ContentPatch::Social(_) => BlockType::Social,
            ContentPatch::Footer(_) => BlockType::Footer,
        }
    }

    /// Decode a partial content object sent by a host page for a block of
    /// the given variant
    pub fn from_json(block_type: BlockType, value: serde_json::Value) -> BlockResult<Self> {
        let shape = |e| BlockError::invalid_shape(block_type, "content patch", e);
        Ok(match block_type {
            BlockType::Header => ContentPatch::Header(serde_json::from_value(value).map_err(shape)?),
            BlockType::Text => ContentPatch::Text(serde_json::from_value(value).map_err(shape)?),
            BlockType::Image => ContentPatch::Image(serde_json::from_value(value).map_err(shape)?),
            BlockType::Button => ContentPatch::Button(serde_json::from_value(value).map_err(shape)?),
            BlockType::Divider => ContentPatch::Divider,
            BlockType::Columns => ContentPatch::Columns(serde_json::from_value(value).map_err(shape)?),
            BlockType::Social => ContentPatch::Social(serde_json::from_value(value).map_err(shape)?),
            BlockType::Footer => ContentPatch::Footer(serde_json::from_value(value).map_err(shape)?),
        })
    }
}

// ---------------------------------------------------------------------------
// Settings patches
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeaderSettingsPatch {
    pub background_color: Option<Color>,
    pub text_color: Option<Color>,
    pub padding: Option<u32>,
    pub align: Option<Align>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextSettingsPatch {
    pub font_size: Option<u32>,
    pub text_color: Option<Color>,
    pub padding: Option<u32>,
    pub align: Option<Align>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageSettingsPatch {
    pub width: Option<u32>,
    pub padding: Option<u32>,
    pub align: Option<Align>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ButtonSettingsPatch {
    pub background_color: Option<Color>,
    pub text_color: Option<Color>,
    pub border_radius: Option<u32>,
    pub padding: Option<u32>,
    pub align: Option<Align>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DividerSettingsPatch {
    pub color: Option<Color>,
    pub style: Option<BorderStyle>,
    pub thickness: Option<u32>,
    pub padding: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColumnsSettingsPatch {
    pub column_count: Option<u32>,
    pub gap: Option<u32>,
    pub padding: Option<u32>,
    pub align: Option<Align>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SocialSettingsPatch {
    pub icon_size: Option<u32>,
    pub gap: Option<u32>,
    pub padding: Option<u32>,
    pub align: Option<Align>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FooterSettingsPatch {
    pub background_color: Option<Color>,
    pub text_color: Option<Color>,
    pub font_size: Option<u32>,
    pub padding: Option<u32>,
    pub align: Option<Align>,
}

/// Partial replacement of a block's settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SettingsPatch {
    Header(HeaderSettingsPatch),
    Text(TextSettingsPatch),
    Image(ImageSettingsPatch),
    Button(ButtonSettingsPatch),
    Divider(DividerSettingsPatch),
    Columns(ColumnsSettingsPatch),
    Social(SocialSettingsPatch),
    Footer(FooterSettingsPatch),
}

impl SettingsPatch {
    pub fn block_type(&self) -> BlockType {
        match self {
            SettingsPatch::Header(_) => BlockType::Header,
            SettingsPatch::Text(_) => BlockType::Text,
            SettingsPatch::Image(_) => BlockType::Image,
            SettingsPatch::Button(_) => BlockType::Button,
            SettingsPatch::Divider(_) => BlockType::Divider,
            SettingsPatch::Columns(_) => BlockType::Columns,
            SettingsPatch::Social(_) => BlockType::Social,
            SettingsPatch::Footer(_) => BlockType::Footer,
        }
    }

    /// Decode a partial settings object for a block of the given variant
    pub fn from_json(block_type: BlockType, value: serde_json::Value) -> BlockResult<Self> {
        let shape = |e| BlockError::invalid_shape(block_type, "settings patch", e);
        Ok(match block_type {
            BlockType::Header => SettingsPatch::Header(serde_json::from_value(value).map_err(shape)?),
            BlockType::Text => SettingsPatch::Text(serde_json::from_value(value).map_err(shape)?),
            BlockType::Image => SettingsPatch::Image(serde_json::from_value(value).map_err(shape)?),
            BlockType::Button => SettingsPatch::Button(serde_json::from_value(value).map_err(shape)?),
            BlockType::Divider => SettingsPatch::Divider(serde_json::from_value(value).map_err(shape)?),
            BlockType::Columns => SettingsPatch::Columns(serde_json::from_value(value).map_err(shape)?),
            BlockType::Social => SettingsPatch::Social(serde_json::from_value(value).map_err(shape)?),
            BlockType::Footer => SettingsPatch::Footer(serde_json::from_value(value).map_err(shape)?),
        })
    }
}

// ---------------------------------------------------------------------------
// Application
// ---------------------------------------------------------------------------

impl Block {
    /// Shallow-merge a content patch into this block
    pub fn apply_content_patch(&mut self, patch: &ContentPatch) -> BlockResult<()> {
        let block_type = self.block_type();
        let column_count = match self.settings() {
            BlockSettings::Columns(s) => s.column_count,
            _ => 0,
        };
        let (content, _) = self.parts_mut();

        match (content, patch) {
            (BlockContent::Header(c), ContentPatch::Header(p)) => {
                merge_url(&mut c.logo, &p.logo);
                merge(&mut c.title, &p.title);
            }
            (BlockContent::Text(c), ContentPatch::Text(p)) => {
                merge(&mut c.html, &p.html);
            }
            (BlockContent::Image(c), ContentPatch::Image(p)) => {
                merge_url(&mut c.src, &p.src);
                merge(&mut c.alt, &p.alt);
                merge_url(&mut c.link, &p.link);
            }
            (BlockContent::Button(c), ContentPatch::Button(p)) => {
                merge(&mut c.text, &p.text);
                merge_url(&mut c.url, &p.url);
            }
            (BlockContent::Divider(_), ContentPatch::Divider) => {}
            (BlockContent::Columns(c), ContentPatch::Columns(p)) => {
                // The count is changed through settings; content must match it
                if let Some(columns) = &p.columns {
                    if columns.len() != column_count as usize || !COLUMN_RANGE.contains(&column_count) {
                        return Err(BlockError::ColumnCount {
                            len: columns.len(),
                            column_count,
                        });
                    }
                }
                merge(&mut c.columns, &p.columns);
            }
            (BlockContent::Social(c), ContentPatch::Social(p)) => {
                merge(&mut c.links, &p.links);
            }
            (BlockContent::Footer(c), ContentPatch::Footer(p)) => {
                merge(&mut c.address, &p.address);
                merge(&mut c.unsubscribe_text, &p.unsubscribe_text);
            }
            _ => {
                return Err(BlockError::PatchMismatch {
                    block: block_type,
                    patch: patch.block_type(),
                })
            }
        }

        Ok(())
    }

    /// Shallow-merge a settings patch into this block
    ///
    /// A `columnCount` outside [`COLUMN_RANGE`] is clamped, and the column
    /// list is resized to match the resulting count.
    pub fn apply_settings_patch(&mut self, patch: &SettingsPatch) -> BlockResult<()> {
        let block_type = self.block_type();
        let id = self.id().to_string();
        let (content, settings) = self.parts_mut();

        match (settings, patch) {
            (BlockSettings::Header(s), SettingsPatch::Header(p)) => {
                merge(&mut s.background_color, &p.background_color);
                merge(&mut s.text_color, &p.text_color);
                merge(&mut s.padding, &p.padding);
                merge(&mut s.align, &p.align);
            }
            (BlockSettings::Text(s), SettingsPatch::Text(p)) => {
                merge(&mut s.font_size, &p.font_size);
                merge(&mut s.text_color, &p.text_color);
                merge(&mut s.padding, &p.padding);
                merge(&mut s.align, &p.align);
            }
            (BlockSettings::Image(s), SettingsPatch::Image(p)) => {
                merge(&mut s.width, &p.width);
                merge(&mut s.padding, &p.padding);
                merge(&mut s.align, &p.align);
            }
            (BlockSettings::Button(s), SettingsPatch::Button(p)) => {
                merge(&mut s.background_color, &p.background_color);
                merge(&mut s.text_color, &p.text_color);
                merge(&mut s.border_radius, &p.border_radius);
                merge(&mut s.padding, &p.padding);
                merge(&mut s.align, &p.align);
            }
            (BlockSettings::Divider(s), SettingsPatch::Divider(p)) => {
                merge(&mut s.color, &p.color);
                merge(&mut s.style, &p.style);
                merge(&mut s.thickness, &p.thickness);
                merge(&mut s.padding, &p.padding);
            }
            (BlockSettings::Columns(s), SettingsPatch::Columns(p)) => {
                if let Some(requested) = p.column_count {
                    let count = requested.clamp(*COLUMN_RANGE.start(), *COLUMN_RANGE.end());
                    if count != requested {
                        warn!(block_id = %id, requested, clamped = count, "Column count out of range");
                    }
                    s.column_count = count;

                    if let BlockContent::Columns(c) = content {
                        resize_columns(&mut c.columns, count);
                    }
                }
                merge(&mut s.gap, &p.gap);
                merge(&mut s.padding, &p.padding);
                merge(&mut s.align, &p.align);
            }
            (BlockSettings::Social(s), SettingsPatch::Social(p)) => {
                merge(&mut s.icon_size, &p.icon_size);
                merge(&mut s.gap, &p.gap);
                merge(&mut s.padding, &p.padding);
                merge(&mut s.align, &p.align);
            }
            (BlockSettings::Footer(s), SettingsPatch::Footer(p)) => {
                merge(&mut s.background_color, &p.background_color);
                merge(&mut s.text_color, &p.text_color);
                merge(&mut s.font_size, &p.font_size);
                merge(&mut s.padding, &p.padding);
                merge(&mut s.align, &p.align);
            }
            _ => {
                return Err(BlockError::PatchMismatch {
                    block: block_type,
                    patch: patch.block_type(),
                })
            }
        }

        Ok(())
    }
}

impl Block {
    /// Clamp `columnCount` into [`COLUMN_RANGE`] and size `columns` to it
    pub(crate) fn fit_columns(&mut self) {
        let id = self.id().to_string();
        if let (BlockContent::Columns(c), BlockSettings::Columns(s)) = self.parts_mut() {
            let count = s.column_count.clamp(*COLUMN_RANGE.start(), *COLUMN_RANGE.end());
            if count != s.column_count || c.columns.len() != count as usize {
                warn!(
                    block_id = %id,
                    column_count = s.column_count,
                    columns = c.columns.len(),
                    fitted = count,
                    "Normalized columns block"
                );
            }
            s.column_count = count;
            resize_columns(&mut c.columns, count);
        }
    }
}

fn resize_columns(columns: &mut Vec<Column>, count: u32) {
    let count = count as usize;
    columns.truncate(count);
    while columns.len() < count {
        columns.push(placeholder_column(columns.len() as u32 + 1));
    }
}
