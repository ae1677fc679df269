//! # Maildraft Blocks
//!
//! Data model for block-based email templates: the eight block variants,
//! their default registry, typed partial updates and the persisted JSON shape.

pub mod block;
pub mod error;
pub mod id_generator;
pub mod patch;
pub mod registry;

pub use block::{
    blocks_from_json, blocks_to_json, Align, Block, BlockContent, BlockId, BlockSettings, BlockType,
    BorderStyle, ButtonContent, ButtonSettings, Color, Column, ColumnsContent, ColumnsSettings,
    DividerContent, DividerSettings, FooterContent, FooterSettings, HeaderContent, HeaderSettings,
    ImageContent, ImageSettings, Platform, SocialContent, SocialLink, SocialSettings, TextContent,
    TextSettings,
};
pub use error::{BlockError, BlockResult};
pub use id_generator::BlockIdGenerator;
pub use patch::{
    ButtonContentPatch, ButtonSettingsPatch, ColumnsContentPatch, ColumnsSettingsPatch, ContentPatch,
    DividerSettingsPatch, FooterContentPatch, FooterSettingsPatch, HeaderContentPatch,
    HeaderSettingsPatch, ImageContentPatch, ImageSettingsPatch, SettingsPatch, SocialContentPatch,
    SocialSettingsPatch, TextContentPatch, TextSettingsPatch,
};
pub use registry::{create_block, default_content, default_settings, COLUMN_RANGE};
