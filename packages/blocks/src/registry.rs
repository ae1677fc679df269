//! # Block Type Registry
//!
//! Static per-variant defaults. Settings live in an immutable table indexed
//! by [`BlockType`]; content is built fresh on each call so that two blocks
//! of the same variant never share their `columns` or `links` arrays.

use crate::block::*;
use std::borrow::Cow;

/// Allowed range for `columns.settings.columnCount`
pub const COLUMN_RANGE: std::ops::RangeInclusive<u32> = 2..=3;

const HEADER_SETTINGS: HeaderSettings = HeaderSettings {
    background_color: Cow::Borrowed("#1a1a2e"),
    text_color: Cow::Borrowed("#ffffff"),
    padding: 32,
    align: Align::Center,
};

const TEXT_SETTINGS: TextSettings = TextSettings {
    font_size: 16,
    text_color: Cow::Borrowed("#333333"),
    padding: 20,
    align: Align::Left,
};

const IMAGE_SETTINGS: ImageSettings = ImageSettings {
    width: 100,
    padding: 20,
    align: Align::Center,
};

const BUTTON_SETTINGS: ButtonSettings = ButtonSettings {
    background_color: Cow::Borrowed("#e94560"),
    text_color: Cow::Borrowed("#ffffff"),
    border_radius: 6,
    padding: 20,
    align: Align::Center,
};

const DIVIDER_SETTINGS: DividerSettings = DividerSettings {
    color: Cow::Borrowed("#e0e0e0"),
    style: BorderStyle::Solid,
    thickness: 1,
    padding: 20,
};

const COLUMNS_SETTINGS: ColumnsSettings = ColumnsSettings {
    column_count: 2,
    gap: 20,
    padding: 20,
    align: Align::Left,
};

const SOCIAL_SETTINGS: SocialSettings = SocialSettings {
    icon_size: 32,
    gap: 12,
    padding: 20,
    align: Align::Center,
};

const FOOTER_SETTINGS: FooterSettings = FooterSettings {
    background_color: Cow::Borrowed("#f4f4f4"),
    text_color: Cow::Borrowed("#888888"),
    font_size: 12,
    padding: 24,
    align: Align::Center,
};

/// Default settings, in [`BlockType::ALL`] order
static SETTINGS_TABLE: [BlockSettings; 8] = [
    BlockSettings::Header(HEADER_SETTINGS),
    BlockSettings::Text(TEXT_SETTINGS),
    BlockSettings::Image(IMAGE_SETTINGS),
    BlockSettings::Button(BUTTON_SETTINGS),
    BlockSettings::Divider(DIVIDER_SETTINGS),
    BlockSettings::Columns(COLUMNS_SETTINGS),
    BlockSettings::Social(SOCIAL_SETTINGS),
    BlockSettings::Footer(FOOTER_SETTINGS),
];

/// Fresh copy of the default settings for a variant
pub fn default_settings(block_type: BlockType) -> BlockSettings {
    SETTINGS_TABLE[block_type as usize].clone()
}

/// Fresh default content for a variant
pub fn default_content(block_type: BlockType) -> BlockContent {
    match block_type {
        BlockType::Header => BlockContent::Header(HeaderContent {
            logo: None,
            title: "Your Newsletter".to_string(),
        }),
        BlockType::Text => BlockContent::Text(TextContent {
            html: "<p>Write your content here...</p>".to_string(),
        }),
        BlockType::Image => BlockContent::Image(ImageContent {
            src: None,
            alt: "Image".to_string(),
            link: None,
        }),
        BlockType::Button => BlockContent::Button(ButtonContent {
            text: "Click Here".to_string(),
            url: None,
        }),
        BlockType::Divider => BlockContent::Divider(DividerContent {}),
        BlockType::Columns => BlockContent::Columns(ColumnsContent {
            columns: (1..=COLUMNS_SETTINGS.column_count).map(placeholder_column).collect(),
        }),
        BlockType::Social => BlockContent::Social(SocialContent {
            links: Platform::ALL
                .iter()
                .map(|platform| SocialLink {
                    platform: *platform,
                    url: None,
                })
                .collect(),
        }),
        BlockType::Footer => BlockContent::Footer(FooterContent {
            address: "123 Publisher Street, City, Country".to_string(),
            unsubscribe_text: "Unsubscribe".to_string(),
        }),
    }
}

/// Placeholder markup for the `n`th column (1-based)
pub fn placeholder_column(n: u32) -> Column {
    Column::new(format!("<p>Column {}</p>", n))
}

/// A new block of the given variant with registry defaults
pub fn create_block(id: impl Into<BlockId>, block_type: BlockType) -> Block {
    Block::from_matching_parts(id.into(), default_content(block_type), default_settings(block_type))
}

impl Default for HeaderSettings {
    fn default() -> Self {
        HEADER_SETTINGS
    }
}

impl Default for TextSettings {
    fn default() -> Self {
        TEXT_SETTINGS
    }
}

impl Default for ImageSettings {
    fn default() -> Self {
        IMAGE_SETTINGS
    }
}

impl Default for ButtonSettings {
    fn default() -> Self {
        BUTTON_SETTINGS
    }
}

impl Default for DividerSettings {
    fn default() -> Self {
        DIVIDER_SETTINGS
    }
}

impl Default for ColumnsSettings {
    fn default() -> Self {
        COLUMNS_SETTINGS
    }
}

impl Default for SocialSettings {
    fn default() -> Self {
        SOCIAL_SETTINGS
    }
}

impl Default for FooterSettings {
    fn default() -> Self {
        FOOTER_SETTINGS
    }
}
