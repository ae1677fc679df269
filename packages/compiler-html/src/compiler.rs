use maildraft_blocks::*;
use maildraft_common::{
    column_width_percent, escape_attr, escape_text, px, safe_url, IconSource, InlineStyle, MarkupPolicy,
    Sanitizer,
};
use thiserror::Error;
use tracing::{debug, info, instrument};

/// Errors that can occur when configuring the compiler
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("Invalid option {option}: {reason}")]
    InvalidOption {
        option: &'static str,
        reason: String,
    },
}

/// Options for HTML compilation
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Document `<title>`
    pub title: String,
    /// Pretty print HTML
    pub pretty: bool,
    /// Indentation string
    pub indent: String,
    /// Treatment of raw markup fields
    pub markup: MarkupPolicy,
    /// Social icon images
    pub icon_source: IconSource,
    /// Width of the centered content table in pixels
    pub content_width: u32,
    /// Page background around the content table
    pub page_background: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            title: "Email".to_string(),
            pretty: true,
            indent: "  ".to_string(),
            markup: MarkupPolicy::Sanitize,
            icon_source: IconSource::Placeholder,
            content_width: 600,
            page_background: "#f4f4f4".to_string(),
        }
    }
}

impl CompileOptions {
    pub fn validate(&self) -> Result<(), CompileError> {
        if self.content_width == 0 {
            return Err(CompileError::InvalidOption {
                option: "content_width",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

struct Context<'a> {
    options: &'a CompileOptions,
    depth: usize,
    buffer: String,
}

impl<'a> Context<'a> {
    fn new(options: &'a CompileOptions) -> Self {
        Self {
            options,
            depth: 0,
            buffer: String::new(),
        }
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn add_line(&mut self, text: &str) {
        if self.options.pretty {
            self.add_indent();
        }
        self.add(text);
        if self.options.pretty {
            self.add("\n");
        }
    }

    fn add_indent(&mut self) {
        for _ in 0..self.depth {
            self.buffer.push_str(&self.options.indent);
        }
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    /// Opening tag on its own line, then indent
    fn open(&mut self, tag: &str, attrs: &[(&str, &str)], style: Option<&InlineStyle>) {
        self.add_line(&start_tag(tag, attrs, style));
        self.indent();
    }

    fn close(&mut self, tag: &str) {
        self.dedent();
        self.add_line(&format!("</{}>", tag));
    }

    fn get_output(self) -> String {
        self.buffer
    }
}

fn start_tag(tag: &str, attrs: &[(&str, &str)], style: Option<&InlineStyle>) -> String {
    let mut out = format!("<{}", tag);
    for (name, value) in attrs {
        out.push_str(&format!(" {}=\"{}\"", name, escape_attr(value)));
    }
    if let Some(style) = style.filter(|s| !s.is_empty()) {
        out.push_str(&format!(" style=\"{}\"", escape_attr(&style.to_string())));
    }
    out.push('>');
    out
}

fn void_tag(tag: &str, attrs: &[(&str, &str)], style: Option<&InlineStyle>) -> String {
    let mut out = start_tag(tag, attrs, style);
    out.pop();
    out.push_str(" />");
    out
}

/// Attributes of every layout table: no intrinsic spacing
const LAYOUT_TABLE: [(&str, &str); 4] = [
    ("role", "presentation"),
    ("cellpadding", "0"),
    ("cellspacing", "0"),
    ("border", "0"),
];

fn table_attrs<'a>(width: &'a str) -> Vec<(&'a str, &'a str)> {
    let mut attrs = vec![("width", width)];
    attrs.extend_from_slice(&LAYOUT_TABLE);
    attrs
}

/// Compiles blocks to a standalone, table-based HTML email
#[derive(Debug)]
pub struct HtmlCompiler {
    options: CompileOptions,
    sanitizer: Sanitizer,
}

impl HtmlCompiler {
    pub fn new(options: CompileOptions) -> Result<Self, CompileError> {
        options.validate()?;
        let sanitizer = Sanitizer::new(options.markup);
        Ok(Self { options, sanitizer })
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Compile a block sequence to a complete HTML document
    #[instrument(skip_all, fields(blocks = blocks.len()))]
    pub fn compile(&self, blocks: &[Block]) -> String {
        let mut ctx = Context::new(&self.options);

        ctx.add_line("<!DOCTYPE html>");
        ctx.open("html", &[("lang", "en")], None);
        compile_head(&mut ctx);

        let page_style = InlineStyle::new()
            .set("margin", "0")
            .set("padding", "0")
            .set("background-color", &self.options.page_background);
        ctx.open("body", &[], Some(&page_style));

        let page_table_style = InlineStyle::new().set("background-color", &self.options.page_background);
        ctx.open("table", &table_attrs("100%"), Some(&page_table_style));
        ctx.open("tr", &[], None);
        ctx.open("td", &[("align", "center")], Some(&InlineStyle::new().set("padding", "20px 0")));

        let width = self.options.content_width.to_string();
        let mut content_attrs = table_attrs(&width);
        content_attrs.push(("class", "email-content"));
        let content_style = InlineStyle::new()
            .set("background-color", "#ffffff")
            .px("max-width", self.options.content_width);
        ctx.open("table", &content_attrs, Some(&content_style));

        for block in blocks {
            debug!(block_id = block.id(), block_type = %block.block_type(), "Compiling block");
            ctx.open("tr", &[], None);
            ctx.open("td", &[], None);
            self.compile_block(block, &mut ctx);
            ctx.close("td");
            ctx.close("tr");
        }

        ctx.close("table");
        ctx.close("td");
        ctx.close("tr");
        ctx.close("table");
        ctx.close("body");
        ctx.close("html");

        let html = ctx.get_output();
        info!(bytes = html.len(), "Compiled email template");
        html
    }

    fn compile_block(&self, block: &Block, ctx: &mut Context) {
        match (block.content(), block.settings()) {
            (BlockContent::Header(c), BlockSettings::Header(s)) => self.compile_header(c, s, ctx),
            (BlockContent::Text(c), BlockSettings::Text(s)) => self.compile_text(c, s, ctx),
            (BlockContent::Image(c), BlockSettings::Image(s)) => self.compile_image(c, s, ctx),
            (BlockContent::Button(c), BlockSettings::Button(s)) => self.compile_button(c, s, ctx),
            (BlockContent::Divider(_), BlockSettings::Divider(s)) => self.compile_divider(s, ctx),
            (BlockContent::Columns(c), BlockSettings::Columns(s)) => self.compile_columns(c, s, ctx),
            (BlockContent::Social(c), BlockSettings::Social(s)) => self.compile_social(c, s, ctx),
            (BlockContent::Footer(c), BlockSettings::Footer(s)) => self.compile_footer(c, s, ctx),
            // Block::new rejects mismatched halves
            _ => ctx.add_line(&format!("<!-- mismatched block {} -->", escape_text(block.id()))),
        }
    }

    /// Outer `<table><tr><td>` of a block; the caller fills the cell
    fn open_fragment(&self, ctx: &mut Context, align: Option<Align>, cell_style: InlineStyle) {
        ctx.open("table", &table_attrs("100%"), None);
        ctx.open("tr", &[], None);
        match align {
            Some(align) => ctx.open("td", &[("align", align.as_str())], Some(&cell_style)),
            None => ctx.open("td", &[], Some(&cell_style)),
        }
    }

    fn close_fragment(&self, ctx: &mut Context) {
        ctx.close("td");
        ctx.close("tr");
        ctx.close("table");
    }

    fn compile_header(&self, content: &HeaderContent, settings: &HeaderSettings, ctx: &mut Context) {
        let style = InlineStyle::new()
            .set("background-color", &settings.background_color)
            .set("color", &settings.text_color)
            .px("padding", settings.padding)
            .set("text-align", settings.align.as_str());
        self.open_fragment(ctx, Some(settings.align), style);

        if let Some(logo) = content.logo.as_deref().and_then(safe_url) {
            let logo_style = InlineStyle::new()
                .set("max-height", "60px")
                .set("margin-bottom", "16px")
                .set("border", "0");
            ctx.add_line(&void_tag("img", &[("src", logo), ("alt", "Logo")], Some(&logo_style)));
        }

        let title_style = InlineStyle::new()
            .set("margin", "0")
            .set("font-size", "28px")
            .set("color", &settings.text_color);
        ctx.add_line(&format!(
            "{}{}</h1>",
            start_tag("h1", &[], Some(&title_style)),
            escape_text(&content.title)
        ));

        self.close_fragment(ctx);
    }

    fn compile_text(&self, content: &TextContent, settings: &TextSettings, ctx: &mut Context) {
        let style = InlineStyle::new()
            .px("font-size", settings.font_size)
            .set("color", &settings.text_color)
            .px("padding", settings.padding)
            .set("text-align", settings.align.as_str())
            .set("line-height", "1.6");
        self.open_fragment(ctx, Some(settings.align), style);
        ctx.add_line(&self.sanitizer.clean(&content.html));
        self.close_fragment(ctx);
    }

    fn compile_image(&self, content: &ImageContent, settings: &ImageSettings, ctx: &mut Context) {
        let style = InlineStyle::new()
            .px("padding", settings.padding)
            .set("text-align", settings.align.as_str());
        self.open_fragment(ctx, Some(settings.align), style);

        if let Some(src) = content.src.as_deref().and_then(safe_url) {
            // Outlook ignores CSS widths on images and needs a pixel attribute
            let pixel_width = image_pixel_width(self.options.content_width, settings).to_string();
            let image_style = InlineStyle::new()
                .set("display", "inline-block")
                .set("width", format!("{}%", settings.width))
                .set("max-width", "100%")
                .set("height", "auto")
                .set("border", "0");
            let image = void_tag(
                "img",
                &[("src", src), ("alt", content.alt.as_str()), ("width", pixel_width.as_str())],
                Some(&image_style),
            );

            match content.link.as_deref().and_then(safe_url) {
                Some(link) => ctx.add_line(&format!(
                    "{}{}</a>",
                    start_tag("a", &[("href", link), ("target", "_blank")], None),
                    image
                )),
                None => ctx.add_line(&image),
            }
        }

        self.close_fragment(ctx);
    }

    fn compile_button(&self, content: &ButtonContent, settings: &ButtonSettings, ctx: &mut Context) {
        let style = InlineStyle::new()
            .px("padding", settings.padding)
            .set("text-align", settings.align.as_str());
        self.open_fragment(ctx, Some(settings.align), style);

        let href = content.url.as_deref().and_then(safe_url).unwrap_or("#");
        let button_style = InlineStyle::new()
            .set("display", "inline-block")
            .set("background-color", &settings.background_color)
            .set("color", &settings.text_color)
            .px("border-radius", settings.border_radius)
            .set("padding", "12px 24px")
            .set("font-weight", "bold")
            .set("text-decoration", "none");
        ctx.add_line(&format!(
            "{}{}</a>",
            start_tag("a", &[("href", href), ("target", "_blank")], Some(&button_style)),
            escape_text(&content.text)
        ));

        self.close_fragment(ctx);
    }

    fn compile_divider(&self, settings: &DividerSettings, ctx: &mut Context) {
        self.open_fragment(ctx, None, InlineStyle::new().px("padding", settings.padding));

        let rule_style = InlineStyle::new()
            .set("border", "none")
            .set(
                "border-top",
                format!(
                    "{}px {} {}",
                    settings.thickness,
                    settings.style.as_str(),
                    settings.color
                ),
            )
            .set("margin", "0");
        ctx.add_line(&void_tag("hr", &[], Some(&rule_style)));

        self.close_fragment(ctx);
    }

    fn compile_columns(&self, content: &ColumnsContent, settings: &ColumnsSettings, ctx: &mut Context) {
        let style = InlineStyle::new().px("padding", settings.padding);
        self.open_fragment(ctx, Some(settings.align), style);

        let width = column_width_percent(settings.effective_column_count());
        let half_gap = settings.gap / 2;

        ctx.open("table", &table_attrs("100%"), None);
        ctx.open("tr", &[], None);
        for column in &content.columns {
            let cell_style = InlineStyle::new()
                .set("padding", format!("0 {}", px(half_gap)))
                .set("text-align", settings.align.as_str());
            ctx.open("td", &[("width", width.as_str()), ("valign", "top")], Some(&cell_style));
            ctx.add_line(&self.sanitizer.clean(&column.html));
            ctx.close("td");
        }
        ctx.close("tr");
        ctx.close("table");

        self.close_fragment(ctx);
    }

    fn compile_social(&self, content: &SocialContent, settings: &SocialSettings, ctx: &mut Context) {
        let style = InlineStyle::new()
            .px("padding", settings.padding)
            .set("text-align", settings.align.as_str());
        self.open_fragment(ctx, Some(settings.align), style);

        let size = settings.icon_size.to_string();
        let link_style = InlineStyle::new()
            .set("display", "inline-block")
            .set("margin", format!("0 {}", px(settings.gap / 2)));

        for (link, url) in content.active_links() {
            let Some(url) = safe_url(url) else {
                continue;
            };
            let icon = self.options.icon_source.icon_url(link.platform, settings.icon_size);
            let icon_style = InlineStyle::new()
                .px("width", settings.icon_size)
                .px("height", settings.icon_size)
                .set("border-radius", "50%")
                .set("border", "0");

            ctx.add_line(&format!(
                "{}{}</a>",
                start_tag(
                    "a",
                    &[("href", url), ("title", link.platform.label()), ("target", "_blank")],
                    Some(&link_style)
                ),
                void_tag(
                    "img",
                    &[
                        ("src", icon.as_str()),
                        ("alt", link.platform.label()),
                        ("width", size.as_str()),
                        ("height", size.as_str())
                    ],
                    Some(&icon_style)
                )
            ));
        }

        self.close_fragment(ctx);
    }

    fn compile_footer(&self, content: &FooterContent, settings: &FooterSettings, ctx: &mut Context) {
        let style = InlineStyle::new()
            .set("background-color", &settings.background_color)
            .set("color", &settings.text_color)
            .px("font-size", settings.font_size)
            .px("padding", settings.padding)
            .set("text-align", settings.align.as_str());
        self.open_fragment(ctx, Some(settings.align), style);

        ctx.add_line(&format!(
            "{}{}</p>",
            start_tag("p", &[], Some(&InlineStyle::new().set("margin", "0 0 8px 0"))),
            escape_text(&content.address)
        ));

        let link_style = InlineStyle::new()
            .set("color", &settings.text_color)
            .set("text-decoration", "underline");
        ctx.add_line(&format!(
            "{}{}</a>",
            start_tag("a", &[("href", "#")], Some(&link_style)),
            escape_text(&content.unsubscribe_text)
        ));

        self.close_fragment(ctx);
    }
}

impl Default for HtmlCompiler {
    fn default() -> Self {
        Self {
            options: CompileOptions::default(),
            sanitizer: Sanitizer::default(),
        }
    }
}

/// Pixel width of an image inside the content column
///
/// Computed in `u64` so stored settings of any size cannot overflow.
fn image_pixel_width(content_width: u32, settings: &ImageSettings) -> u64 {
    let content_width = u64::from(content_width);
    let available = content_width.saturating_sub(u64::from(settings.padding).saturating_mul(2));
    (available * u64::from(settings.width.min(100)) / 100).min(content_width)
}

fn compile_head(ctx: &mut Context) {
    ctx.open("head", &[], None);

    ctx.add_line("<meta charset=\"UTF-8\">");
    ctx.add_line("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">");
    let title = format!("<title>{}</title>", escape_text(&ctx.options.title));
    ctx.add_line(&title);

    ctx.close("head");
}

/// Compile with default options
pub fn compile(blocks: &[Block]) -> String {
    HtmlCompiler::default().compile(blocks)
}

/// Compile with explicit options
pub fn compile_to_html(blocks: &[Block], options: CompileOptions) -> Result<String, CompileError> {
    Ok(HtmlCompiler::new(options)?.compile(blocks))
}
