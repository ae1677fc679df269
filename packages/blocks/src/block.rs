//! # Block Data Model
//!
//! A template is an ordered list of [`Block`]s. Each block pairs a
//! variant-specific content payload with variant-specific style settings.
//! Both are closed sum types over the eight [`BlockType`]s, and a block is
//! only ever constructed with content and settings of the same variant.
//!
//! ## Persisted shape
//!
//! ```text
//! { "id": "blk-1a2b-1", "type": "button",
//!   "content":  { "text": "Read more", "url": "https://..." },
//!   "settings": { "backgroundColor": "#e94560", "padding": 20, ... } }
//! ```

use crate::error::{BlockError, BlockResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Opaque block identifier, unique within one document
pub type BlockId = String;

/// CSS color value (`#rrggbb`, named color, ...)
pub type Color = Cow<'static, str>;

/// The closed set of block variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    Header,
    Text,
    Image,
    Button,
    Divider,
    Columns,
    Social,
    Footer,
}

impl BlockType {
    /// Palette order
    pub const ALL: [BlockType; 8] = [
        BlockType::Header,
        BlockType::Text,
        BlockType::Image,
        BlockType::Button,
        BlockType::Divider,
        BlockType::Columns,
        BlockType::Social,
        BlockType::Footer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Header => "header",
            BlockType::Text => "text",
            BlockType::Image => "image",
            BlockType::Button => "button",
            BlockType::Divider => "divider",
            BlockType::Columns => "columns",
            BlockType::Social => "social",
            BlockType::Footer => "footer",
        }
    }

    /// Human readable palette label
    pub fn label(&self) -> &'static str {
        match self {
            BlockType::Header => "Header",
            BlockType::Text => "Text",
            BlockType::Image => "Image",
            BlockType::Button => "Button",
            BlockType::Divider => "Divider",
            BlockType::Columns => "Columns",
            BlockType::Social => "Social Links",
            BlockType::Footer => "Footer",
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockType {
    type Err = BlockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| BlockError::UnknownBlockType(s.to_string()))
    }
}

/// Horizontal alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl Align {
    pub fn as_str(&self) -> &'static str {
        match self {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
        }
    }
}

/// Divider line style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl BorderStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            BorderStyle::Solid => "solid",
            BorderStyle::Dashed => "dashed",
            BorderStyle::Dotted => "dotted",
        }
    }
}

/// Social network of a [`SocialLink`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Facebook,
    Twitter,
    Instagram,
    Linkedin,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::Facebook,
        Platform::Twitter,
        Platform::Instagram,
        Platform::Linkedin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Facebook => "facebook",
            Platform::Twitter => "twitter",
            Platform::Instagram => "instagram",
            Platform::Linkedin => "linkedin",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Platform::Facebook => "Facebook",
            Platform::Twitter => "Twitter",
            Platform::Instagram => "Instagram",
            Platform::Linkedin => "LinkedIn",
        }
    }
}

/// Treat `null`, a missing key and `""` alike
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

// ---------------------------------------------------------------------------
// Content
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderContent {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub logo: Option<String>,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextContent {
    #[serde(default)]
    pub html: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ImageContent {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub src: Option<String>,
    #[serde(default)]
    pub alt: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ButtonContent {
    #[serde(default)]
    pub text: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DividerContent {}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Column {
    #[serde(default)]
    pub html: String,
}

impl Column {
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ColumnsContent {
    #[serde(default)]
    pub columns: Vec<Column>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialLink {
    pub platform: Platform,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub url: Option<String>,
}

impl SocialLink {
    /// The link's url, if it is set
    pub fn active_url(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SocialContent {
    #[serde(default)]
    pub links: Vec<SocialLink>,
}

impl SocialContent {
    /// Links that render; entries without a url are skipped entirely
    pub fn active_links(&self) -> impl Iterator<Item = (&SocialLink, &str)> {
        self.links
            .iter()
            .filter_map(|link| link.active_url().map(|url| (link, url)))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FooterContent {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub unsubscribe_text: String,
}

/// Variant-specific content payload
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BlockContent {
    Header(HeaderContent),
    Text(TextContent),
    Image(ImageContent),
    Button(ButtonContent),
    Divider(DividerContent),
    Columns(ColumnsContent),
    Social(SocialContent),
    Footer(FooterContent),
}

impl BlockContent {
    pub fn block_type(&self) -> BlockType {
        match self {
            BlockContent::Header(_) => BlockType::Header,
            BlockContent::Text(_) => BlockType::Text,
            BlockContent::Image(_) => BlockType::Image,
            BlockContent::Button(_) => BlockType::Button,
            BlockContent::Divider(_) => BlockType::Divider,
            BlockContent::Columns(_) => BlockType::Columns,
            BlockContent::Social(_) => BlockType::Social,
            BlockContent::Footer(_) => BlockType::Footer,
        }
    }

    /// Decode a content object for the given variant
    pub fn from_value(block_type: BlockType, value: serde_json::Value) -> BlockResult<Self> {
        let shape = |e| BlockError::invalid_shape(block_type, "content", e);
        Ok(match block_type {
            BlockType::Header => BlockContent::Header(serde_json::from_value(value).map_err(shape)?),
            BlockType::Text => BlockContent::Text(serde_json::from_value(value).map_err(shape)?),
            BlockType::Image => BlockContent::Image(serde_json::from_value(value).map_err(shape)?),
            BlockType::Button => BlockContent::Button(serde_json::from_value(value).map_err(shape)?),
            BlockType::Divider => BlockContent::Divider(serde_json::from_value(value).map_err(shape)?),
            BlockType::Columns => BlockContent::Columns(serde_json::from_value(value).map_err(shape)?),
            BlockType::Social => BlockContent::Social(serde_json::from_value(value).map_err(shape)?),
            BlockType::Footer => BlockContent::Footer(serde_json::from_value(value).map_err(shape)?),
        })
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------
//
// Missing keys fall back to the registry defaults for the variant.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeaderSettings {
    pub background_color: Color,
    pub text_color: Color,
    pub padding: u32,
    pub align: Align,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextSettings {
    pub font_size: u32,
    pub text_color: Color,
    pub padding: u32,
    pub align: Align,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageSettings {
    /// Percentage of the content width
    pub width: u32,
    pub padding: u32,
    pub align: Align,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ButtonSettings {
    pub background_color: Color,
    pub text_color: Color,
    pub border_radius: u32,
    pub padding: u32,
    pub align: Align,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DividerSettings {
    pub color: Color,
    pub style: BorderStyle,
    pub thickness: u32,
    pub padding: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColumnsSettings {
    pub column_count: u32,
    pub gap: u32,
    pub padding: u32,
    pub align: Align,
}

impl ColumnsSettings {
    /// Column count usable as a divisor
    pub fn effective_column_count(&self) -> u32 {
        self.column_count.max(1)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SocialSettings {
    pub icon_size: u32,
    pub gap: u32,
    pub padding: u32,
    pub align: Align,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FooterSettings {
    pub background_color: Color,
    pub text_color: Color,
    pub font_size: u32,
    pub padding: u32,
    pub align: Align,
}

/// Variant-specific style settings
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BlockSettings {
    Header(HeaderSettings),
    Text(TextSettings),
    Image(ImageSettings),
    Button(ButtonSettings),
    Divider(DividerSettings),
    Columns(ColumnsSettings),
    Social(SocialSettings),
    Footer(FooterSettings),
}

impl BlockSettings {
    pub fn block_type(&self) -> BlockType {
        match self {
            BlockSettings::Header(_) => BlockType::Header,
            BlockSettings::Text(_) => BlockType::Text,
            BlockSettings::Image(_) => BlockType::Image,
            BlockSettings::Button(_) => BlockType::Button,
            BlockSettings::Divider(_) => BlockType::Divider,
            BlockSettings::Columns(_) => BlockType::Columns,
            BlockSettings::Social(_) => BlockType::Social,
            BlockSettings::Footer(_) => BlockType::Footer,
        }
    }

    pub fn padding(&self) -> u32 {
        match self {
            BlockSettings::Header(s) => s.padding,
            BlockSettings::Text(s) => s.padding,
            BlockSettings::Image(s) => s.padding,
            BlockSettings::Button(s) => s.padding,
            BlockSettings::Divider(s) => s.padding,
            BlockSettings::Columns(s) => s.padding,
            BlockSettings::Social(s) => s.padding,
            BlockSettings::Footer(s) => s.padding,
        }
    }

    /// Alignment of block-level regions; dividers have none
    pub fn align(&self) -> Option<Align> {
        match self {
            BlockSettings::Header(s) => Some(s.align),
            BlockSettings::Text(s) => Some(s.align),
            BlockSettings::Image(s) => Some(s.align),
            BlockSettings::Button(s) => Some(s.align),
            BlockSettings::Divider(_) => None,
            BlockSettings::Columns(s) => Some(s.align),
            BlockSettings::Social(s) => Some(s.align),
            BlockSettings::Footer(s) => Some(s.align),
        }
    }

    /// Decode a settings object for the given variant
    pub fn from_value(block_type: BlockType, value: serde_json::Value) -> BlockResult<Self> {
        let shape = |e| BlockError::invalid_shape(block_type, "settings", e);
        Ok(match block_type {
            BlockType::Header => BlockSettings::Header(serde_json::from_value(value).map_err(shape)?),
            BlockType::Text => BlockSettings::Text(serde_json::from_value(value).map_err(shape)?),
            BlockType::Image => BlockSettings::Image(serde_json::from_value(value).map_err(shape)?),
            BlockType::Button => BlockSettings::Button(serde_json::from_value(value).map_err(shape)?),
            BlockType::Divider => BlockSettings::Divider(serde_json::from_value(value).map_err(shape)?),
            BlockType::Columns => BlockSettings::Columns(serde_json::from_value(value).map_err(shape)?),
            BlockType::Social => BlockSettings::Social(serde_json::from_value(value).map_err(shape)?),
            BlockType::Footer => BlockSettings::Footer(serde_json::from_value(value).map_err(shape)?),
        })
    }
}

// ---------------------------------------------------------------------------
// Block
// ---------------------------------------------------------------------------

/// One typed, orderable unit of an email document
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawBlock")]
pub struct Block {
    id: BlockId,
    content: BlockContent,
    settings: BlockSettings,
}

impl Block {
    /// Pair content and settings of the same variant under an id
    pub fn new(id: impl Into<BlockId>, content: BlockContent, settings: BlockSettings) -> BlockResult<Self> {
        if content.block_type() != settings.block_type() {
            return Err(BlockError::ContentMismatch {
                content: content.block_type(),
                settings: settings.block_type(),
            });
        }

        let mut block = Self {
            id: id.into(),
            content,
            settings,
        };
        block.fit_columns();
        Ok(block)
    }

    /// Caller guarantees both parts are of the same variant
    pub(crate) fn from_matching_parts(id: BlockId, content: BlockContent, settings: BlockSettings) -> Self {
        debug_assert_eq!(content.block_type(), settings.block_type());
        Self { id, content, settings }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn block_type(&self) -> BlockType {
        self.content.block_type()
    }

    pub fn content(&self) -> &BlockContent {
        &self.content
    }

    pub fn settings(&self) -> &BlockSettings {
        &self.settings
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut BlockContent, &mut BlockSettings) {
        (&mut self.content, &mut self.settings)
    }
}

/// Wire form used to decode a block before its variant is known
#[derive(Deserialize)]
struct RawBlock {
    id: BlockId,
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default = "empty_object")]
    content: serde_json::Value,
    #[serde(default = "empty_object")]
    settings: serde_json::Value,
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

impl TryFrom<RawBlock> for Block {
    type Error = BlockError;

    fn try_from(raw: RawBlock) -> Result<Self, Self::Error> {
        let block_type: BlockType = raw.block_type.parse()?;
        let count_given = raw.settings.get("columnCount").is_some();
        let content = BlockContent::from_value(block_type, raw.content)?;
        let mut settings = BlockSettings::from_value(block_type, raw.settings)?;

        // Without a stored count the column list decides it
        if let (BlockContent::Columns(c), BlockSettings::Columns(s)) = (&content, &mut settings) {
            if !count_given {
                s.column_count = u32::try_from(c.columns.len()).unwrap_or(u32::MAX);
            }
        }

        Block::new(raw.id, content, settings)
    }
}

#[derive(Serialize)]
struct BlockRef<'a> {
    id: &'a str,
    #[serde(rename = "type")]
    block_type: BlockType,
    content: &'a BlockContent,
    settings: &'a BlockSettings,
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        BlockRef {
            id: &self.id,
            block_type: self.block_type(),
            content: &self.content,
            settings: &self.settings,
        }
        .serialize(serializer)
    }
}

/// Decode a persisted block list
pub fn blocks_from_json(json: &str) -> BlockResult<Vec<Block>> {
    Ok(serde_json::from_str(json)?)
}

/// Encode a block list for persistence
pub fn blocks_to_json(blocks: &[Block]) -> BlockResult<String> {
    Ok(serde_json::to_string_pretty(blocks)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{default_content, default_settings};

    #[test]
    fn test_block_type_round_trips_through_str() {
        for block_type in BlockType::ALL {
            assert_eq!(block_type.as_str().parse::<BlockType>().unwrap(), block_type);
        }
    }

    #[test]
    fn test_unknown_block_type_fails_loudly() {
        let err = "carousel".parse::<BlockType>().unwrap_err();
        assert!(matches!(err, BlockError::UnknownBlockType(ref name) if name == "carousel"));
    }

    #[test]
    fn test_block_rejects_mismatched_parts() {
        let result = Block::new(
            "a",
            default_content(BlockType::Text),
            default_settings(BlockType::Button),
        );
        assert!(matches!(
            result,
            Err(BlockError::ContentMismatch {
                content: BlockType::Text,
                settings: BlockType::Button
            })
        ));
    }

    #[test]
    fn test_block_serializes_with_type_tag() {
        let block = Block::new(
            "b1",
            BlockContent::Button(ButtonContent {
                text: "Read".to_string(),
                url: None,
            }),
            default_settings(BlockType::Button),
        )
        .unwrap();

        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value["id"], "b1");
        assert_eq!(value["type"], "button");
        assert_eq!(value["content"]["text"], "Read");
        assert_eq!(value["settings"]["backgroundColor"], "#e94560");
        assert_eq!(value["settings"]["borderRadius"], 6);
    }

    #[test]
    fn test_deserialize_unknown_type_is_an_error() {
        let json = r#"[{"id":"x","type":"carousel","content":{},"settings":{}}]"#;
        let err = blocks_from_json(json).unwrap_err();
        assert!(err.to_string().contains("carousel"));
    }

    #[test]
    fn test_deserialize_fills_missing_settings_from_defaults() {
        let json = r#"[{
            "id": "c1",
            "type": "columns",
            "content": {"columns": [{"html": "<p>1</p>"}, {"html": "<p>2</p>"}]},
            "settings": {"gap": 20, "padding": 20}
        }]"#;

        let blocks = blocks_from_json(json).unwrap();
        match blocks[0].settings() {
            BlockSettings::Columns(s) => {
                assert_eq!(s.gap, 20);
                assert_eq!(s.column_count, 2);
            }
            other => panic!("Expected columns settings, got {:?}", other),
        }
    }

    #[test]
    fn test_decoded_columns_follow_column_count() {
        let json = r#"[
            {"id": "a", "type": "columns",
             "content": {"columns": [{"html": "1"}, {"html": "2"}, {"html": "3"}, {"html": "4"}]},
             "settings": {"columnCount": 2}},
            {"id": "b", "type": "columns",
             "content": {"columns": [{"html": "1"}, {"html": "2"}, {"html": "3"}]},
             "settings": {}},
            {"id": "c", "type": "columns",
             "content": {"columns": []},
             "settings": {"columnCount": 9}}
        ]"#;

        let blocks = blocks_from_json(json).unwrap();
        let shapes: Vec<(u32, usize)> = blocks
            .iter()
            .map(|block| match (block.settings(), block.content()) {
                (BlockSettings::Columns(s), BlockContent::Columns(c)) => (s.column_count, c.columns.len()),
                other => panic!("Expected columns block, got {:?}", other),
            })
            .collect();

        assert_eq!(shapes, vec![(2, 2), (3, 3), (3, 3)]);
    }

    #[test]
    fn test_empty_urls_read_as_absent() {
        let json = r#"[{"id":"i","type":"image","content":{"src":"","alt":"x","link":null},"settings":{}}]"#;
        let blocks = blocks_from_json(json).unwrap();
        match blocks[0].content() {
            BlockContent::Image(image) => {
                assert_eq!(image.src, None);
                assert_eq!(image.link, None);
            }
            other => panic!("Expected image content, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_content_shape_is_rejected() {
        let json = r#"[{"id":"s","type":"social","content":{"links":"nope"},"settings":{}}]"#;
        assert!(blocks_from_json(json).is_err());
    }

    #[test]
    fn test_json_round_trip_preserves_blocks() {
        let blocks: Vec<Block> = BlockType::ALL
            .iter()
            .enumerate()
            .map(|(i, t)| Block::new(format!("b{}", i), default_content(*t), default_settings(*t)).unwrap())
            .collect();

        let json = blocks_to_json(&blocks).unwrap();
        assert_eq!(blocks_from_json(&json).unwrap(), blocks);
    }

    #[test]
    fn test_divider_has_no_alignment() {
        assert_eq!(default_settings(BlockType::Divider).align(), None);
        assert_eq!(default_settings(BlockType::Header).align(), Some(Align::Center));
    }
}
