//! # Interactive Renderer
//!
//! Maps blocks to the live editing canvas. Every block becomes a draggable
//! wrapper keyed by its id, holding a styled region whose colors, padding
//! and alignment come straight from the block settings.

use crate::vdom::{VNode, VirtualDomDocument};
use maildraft_blocks::*;
use maildraft_common::{px, safe_url, IconSource, MarkupPolicy, Sanitizer};
use tracing::{debug, instrument};

/// Options for the editing canvas
#[derive(Debug, Clone)]
pub struct PreviewOptions {
    /// Treatment of raw markup fields
    pub markup: MarkupPolicy,
    /// Social icon images
    pub icon_source: IconSource,
    /// Canvas width in pixels
    pub content_width: u32,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            markup: MarkupPolicy::Sanitize,
            icon_source: IconSource::Placeholder,
            content_width: 600,
        }
    }
}

/// Renders blocks to virtual DOM
#[derive(Debug)]
pub struct Renderer {
    options: PreviewOptions,
    sanitizer: Sanitizer,
}

impl Renderer {
    pub fn new(options: PreviewOptions) -> Self {
        let sanitizer = Sanitizer::new(options.markup);
        Self { options, sanitizer }
    }

    /// Render the whole canvas; `selected` highlights one block
    #[instrument(skip_all, fields(blocks = blocks.len()))]
    pub fn render_document(&self, blocks: &[Block], selected: Option<&str>) -> VirtualDomDocument {
        let mut vdoc = VirtualDomDocument::new();
        vdoc.add_style(".md-block", &[("cursor", "move"), ("position", "relative")]);
        vdoc.add_style(".md-block:hover", &[("outline", "1px dashed #9aa5b1")]);
        vdoc.add_style(".md-block.selected", &[("outline", "2px solid #3366ff")]);

        let canvas = VNode::element("div")
            .with_attr("class", "md-canvas")
            .with_style("max-width", px(self.options.content_width))
            .with_style("margin", "0 auto")
            .with_style("background-color", "#ffffff");

        let canvas = if blocks.is_empty() {
            canvas.with_child(empty_state())
        } else {
            canvas.with_children(
                blocks
                    .iter()
                    .enumerate()
                    .map(|(index, block)| {
                        let is_selected = selected == Some(block.id());
                        self.render_wrapper(block, index, is_selected)
                    })
                    .collect(),
            )
        };

        vdoc.add_node(canvas);
        debug!(selected = ?selected, "Rendered editing canvas");
        vdoc
    }

    fn render_wrapper(&self, block: &Block, index: usize, selected: bool) -> VNode {
        let class = if selected { "md-block selected" } else { "md-block" };

        VNode::element("div")
            .with_key(block.id())
            .with_attr("class", class)
            .with_attr("draggable", "true")
            .with_attr("data-block-id", block.id())
            .with_attr("data-block-type", block.block_type().as_str())
            .with_attr("data-index", index.to_string())
            .with_child(self.render_block(block))
    }

    /// Render one block's styled region
    pub fn render_block(&self, block: &Block) -> VNode {
        match (block.content(), block.settings()) {
            (BlockContent::Header(c), BlockSettings::Header(s)) => self.render_header(c, s),
            (BlockContent::Text(c), BlockSettings::Text(s)) => self.render_text(c, s),
            (BlockContent::Image(c), BlockSettings::Image(s)) => self.render_image(c, s),
            (BlockContent::Button(c), BlockSettings::Button(s)) => self.render_button(c, s),
            (BlockContent::Divider(_), BlockSettings::Divider(s)) => self.render_divider(s),
            (BlockContent::Columns(c), BlockSettings::Columns(s)) => self.render_columns(c, s),
            (BlockContent::Social(c), BlockSettings::Social(s)) => self.render_social(c, s),
            (BlockContent::Footer(c), BlockSettings::Footer(s)) => self.render_footer(c, s),
            // Block::new rejects mismatched halves
            _ => VNode::comment(format!("mismatched block {}", block.id())),
        }
    }

    fn render_header(&self, content: &HeaderContent, settings: &HeaderSettings) -> VNode {
        let mut region = VNode::element("div")
            .with_style("background-color", &settings.background_color)
            .with_style("color", &settings.text_color)
            .with_style("padding", px(settings.padding))
            .with_style("text-align", settings.align.as_str());

        if let Some(logo) = content.logo.as_deref().and_then(safe_url) {
            region = region.with_child(
                VNode::element("img")
                    .with_attr("src", logo)
                    .with_attr("alt", "Logo")
                    .with_style("max-height", "60px")
                    .with_style("margin-bottom", "16px"),
            );
        }

        region.with_child(
            VNode::element("h1")
                .with_style("margin", "0")
                .with_style("font-size", "28px")
                .with_child(VNode::text(&content.title)),
        )
    }

    fn render_text(&self, content: &TextContent, settings: &TextSettings) -> VNode {
        VNode::element("div")
            .with_style("font-size", px(settings.font_size))
            .with_style("color", &settings.text_color)
            .with_style("padding", px(settings.padding))
            .with_style("text-align", settings.align.as_str())
            .with_style("line-height", "1.6")
            .with_child(VNode::raw(self.sanitizer.clean(&content.html)))
    }

    fn render_image(&self, content: &ImageContent, settings: &ImageSettings) -> VNode {
        let region = VNode::element("div")
            .with_style("padding", px(settings.padding))
            .with_style("text-align", settings.align.as_str());

        let Some(src) = content.src.as_deref().and_then(safe_url) else {
            return region.with_child(
                VNode::element("div")
                    .with_attr("class", "md-image-placeholder")
                    .with_style("background-color", "#f0f0f0")
                    .with_style("border", "2px dashed #cccccc")
                    .with_style("padding", "48px 0")
                    .with_style("color", "#999999")
                    .with_style("text-align", "center")
                    .with_child(VNode::text("Click to add an image")),
            );
        };

        let image = VNode::element("img")
            .with_attr("src", src)
            .with_attr("alt", &content.alt)
            .with_style("width", format!("{}%", settings.width))
            .with_style("max-width", "100%")
            .with_style("height", "auto");

        match content.link.as_deref().and_then(safe_url) {
            Some(link) => region.with_child(
                VNode::element("a")
                    .with_attr("href", link)
                    .with_attr("target", "_blank")
                    .with_child(image),
            ),
            None => region.with_child(image),
        }
    }

    fn render_button(&self, content: &ButtonContent, settings: &ButtonSettings) -> VNode {
        let href = content.url.as_deref().and_then(safe_url).unwrap_or("#");

        VNode::element("div")
            .with_style("padding", px(settings.padding))
            .with_style("text-align", settings.align.as_str())
            .with_child(
                VNode::element("a")
                    .with_attr("href", href)
                    .with_style("display", "inline-block")
                    .with_style("background-color", &settings.background_color)
                    .with_style("color", &settings.text_color)
                    .with_style("border-radius", px(settings.border_radius))
                    .with_style("padding", "12px 24px")
                    .with_style("font-weight", "bold")
                    .with_style("text-decoration", "none")
                    .with_child(VNode::text(&content.text)),
            )
    }

    fn render_divider(&self, settings: &DividerSettings) -> VNode {
        VNode::element("div")
            .with_style("padding", px(settings.padding))
            .with_child(
                VNode::element("hr")
                    .with_style("border", "none")
                    .with_style(
                        "border-top",
                        format!(
                            "{}px {} {}",
                            settings.thickness,
                            settings.style.as_str(),
                            settings.color
                        ),
                    )
                    .with_style("margin", "0"),
            )
    }

    fn render_columns(&self, content: &ColumnsContent, settings: &ColumnsSettings) -> VNode {
        VNode::element("div")
            .with_style("padding", px(settings.padding))
            .with_style("display", "flex")
            .with_style("gap", px(settings.gap))
            .with_style("text-align", settings.align.as_str())
            .with_children(
                content
                    .columns
                    .iter()
                    .map(|column| {
                        VNode::element("div")
                            .with_attr("class", "md-column")
                            .with_style("flex", "1")
                            .with_child(VNode::raw(self.sanitizer.clean(&column.html)))
                    })
                    .collect(),
            )
    }

    fn render_social(&self, content: &SocialContent, settings: &SocialSettings) -> VNode {
        let margin = format!("0 {}px", settings.gap / 2);

        VNode::element("div")
            .with_style("padding", px(settings.padding))
            .with_style("text-align", settings.align.as_str())
            .with_children(
                content
                    .active_links()
                    .filter_map(|(link, url)| safe_url(url).map(|url| (link, url)))
                    .map(|(link, url)| {
                        VNode::element("a")
                            .with_attr("href", url)
                            .with_attr("title", link.platform.label())
                            .with_attr("target", "_blank")
                            .with_style("display", "inline-block")
                            .with_style("margin", &margin)
                            .with_child(
                                VNode::element("img")
                                    .with_attr(
                                        "src",
                                        self.options.icon_source.icon_url(link.platform, settings.icon_size),
                                    )
                                    .with_attr("alt", link.platform.label())
                                    .with_style("width", px(settings.icon_size))
                                    .with_style("height", px(settings.icon_size))
                                    .with_style("border-radius", "50%"),
                            )
                    })
                    .collect(),
            )
    }

    fn render_footer(&self, content: &FooterContent, settings: &FooterSettings) -> VNode {
        VNode::element("div")
            .with_style("background-color", &settings.background_color)
            .with_style("color", &settings.text_color)
            .with_style("font-size", px(settings.font_size))
            .with_style("padding", px(settings.padding))
            .with_style("text-align", settings.align.as_str())
            .with_child(
                VNode::element("p")
                    .with_style("margin", "0 0 8px 0")
                    .with_child(VNode::text(&content.address)),
            )
            .with_child(
                VNode::element("a")
                    .with_attr("href", "#")
                    .with_style("color", &settings.text_color)
                    .with_style("text-decoration", "underline")
                    .with_child(VNode::text(&content.unsubscribe_text)),
            )
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(PreviewOptions::default())
    }
}

fn empty_state() -> VNode {
    VNode::element("div")
        .with_attr("class", "md-empty")
        .with_style("padding", "64px 24px")
        .with_style("text-align", "center")
        .with_style("color", "#999999")
        .with_style("border", "2px dashed #dddddd")
        .with_child(VNode::text("Add blocks from the palette to start building your email"))
}

/// Render with default options
pub fn render_document(blocks: &[Block], selected: Option<&str>) -> VirtualDomDocument {
    Renderer::default().render_document(blocks, selected)
}
