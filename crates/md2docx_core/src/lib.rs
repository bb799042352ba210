mod block;
mod config;
mod docx;
mod error;
mod export;
mod inline;
mod layout;
mod parser;
mod preview;
mod script;
mod style;
mod typst;

pub use block::{BlockType, ParsedBlock};
pub use config::{Config, ConfigError, DocumentConfig, FontConfig, LabelConfig, PageConfig};
pub use docx::render_docx;
pub use error::{ExportError, ExportStage, PreviewError};
pub use export::Exporter;
pub use inline::{InlineSpan, tokenize};
pub use layout::{BlockLayout, Emphasis, StyledRun, layout_block};
pub use preview::{PreviewBlock, PreviewDocument, PreviewRun, render_preview};
pub use script::Script;
pub use style::{
    Alignment, BlockStyle, BorderLine, Borders, Indent, Label, LineBreaks, LineStyle, Role,
    RunStyle, Spacing, style_for,
};

use typst_as_lib::TypstEngine;
use typst_as_lib::typst_kit_options::TypstKitFontOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Styled on-screen model.
    Preview,
    /// `.docx` package bytes.
    Export,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    Preview(PreviewDocument),
    Export(Vec<u8>),
}

/// Parse a document into typed blocks.
pub fn parse(markdown: &str) -> Vec<ParsedBlock> {
    parser::parse(markdown)
}

/// Render blocks in the requested mode. Only export can fail.
pub fn render(
    blocks: &[ParsedBlock],
    mode: RenderMode,
    config: &Config,
) -> Result<Rendered, ExportError> {
    match mode {
        RenderMode::Preview => Ok(Rendered::Preview(render_preview(blocks, config))),
        RenderMode::Export => render_docx(blocks, config).map(Rendered::Export),
    }
}

/// Parse and render the on-screen preview using default config.
pub fn markdown_to_preview(markdown: &str) -> PreviewDocument {
    render_preview(&parse(markdown), &Config::compiled_default())
}

/// Convert markdown to Typst markup using default config.
pub fn markdown_to_typst(markdown: &str) -> String {
    markdown_to_typst_with_config(markdown, &Config::compiled_default())
}

/// Convert markdown to Typst markup with custom config.
pub fn markdown_to_typst_with_config(markdown: &str, config: &Config) -> String {
    let preview = render_preview(&parse(markdown), config);
    typst::preview_to_typst(&preview, config)
}

/// Convert markdown to DOCX bytes using default config.
pub fn markdown_to_docx(markdown: &str) -> Result<Vec<u8>, ExportError> {
    markdown_to_docx_with_config(markdown, &Config::compiled_default())
}

/// Convert markdown to DOCX bytes with custom config.
pub fn markdown_to_docx_with_config(
    markdown: &str,
    config: &Config,
) -> Result<Vec<u8>, ExportError> {
    render_docx(&parse(markdown), config)
}

/// Print-layout preview rendered to SVG pages.
pub struct SvgDocument {
    pub pages: Vec<String>,
    pub width_pt: f64,
    pub height_pt: f64,
}

/// Convert markdown to SVG pages using default config.
pub fn markdown_to_svg(markdown: &str) -> Result<SvgDocument, PreviewError> {
    markdown_to_svg_with_config(markdown, &Config::compiled_default())
}

/// Convert markdown to SVG pages with custom config.
///
/// Fonts named in the config are looked up among system fonts; Typst's
/// embedded fonts fill in when they are missing.
pub fn markdown_to_svg_with_config(
    markdown: &str,
    config: &Config,
) -> Result<SvgDocument, PreviewError> {
    let typst_content = markdown_to_typst_with_config(markdown, config);

    let font_options = TypstKitFontOptions::new()
        .include_embedded_fonts(true)
        .include_system_fonts(true);

    let engine = TypstEngine::builder()
        .main_file(typst_content)
        .search_fonts_with(font_options)
        .build();

    let doc: typst_library::layout::PagedDocument = engine
        .compile()
        .output
        .map_err(|e| PreviewError(format!("{e:?}")))?;

    let pages: Vec<String> = doc.pages.iter().map(typst_svg::svg).collect();

    // All pages share the A4 size set in the preamble.
    let (width_pt, height_pt) = match doc.pages.first() {
        Some(page) => {
            let size = page.frame.size();
            (size.x.to_pt(), size.y.to_pt())
        }
        None => (595.0, 842.0),
    };

    Ok(SvgDocument {
        pages,
        width_pt,
        height_pt,
    })
}
