//! Office Open XML export.
//!
//! Each part is written with `quick-xml` and packed with `zip`. Entries carry
//! a fixed timestamp, so the same blocks and config always produce the same
//! bytes.

mod document;
mod parts;
mod xml;

use std::io::{Cursor, Write};

use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::block::ParsedBlock;
use crate::config::Config;
use crate::error::{ExportError, ExportStage};

pub(crate) const BULLET_NUM_ID: &str = "1";
pub(crate) const FOOTER_REL_ID: &str = "rIdFooter1";

/// Render blocks into a complete `.docx` package.
pub fn render_docx(blocks: &[ParsedBlock], config: &Config) -> Result<Vec<u8>, ExportError> {
    let footer = config.page.numbers;

    let mut entries: Vec<(&str, Vec<u8>)> = vec![
        (
            "[Content_Types].xml",
            stage(ExportStage::Package, parts::content_types(footer))?,
        ),
        ("_rels/.rels", stage(ExportStage::Package, parts::package_rels())?),
        (
            "word/_rels/document.xml.rels",
            stage(ExportStage::Package, parts::document_rels(footer))?,
        ),
        (
            "word/document.xml",
            stage(ExportStage::Document, document::document_xml(blocks, config))?,
        ),
        ("word/styles.xml", stage(ExportStage::Styles, parts::styles(config))?),
        ("word/numbering.xml", stage(ExportStage::Numbering, parts::numbering())?),
        (
            "docProps/core.xml",
            stage(ExportStage::CoreProperties, parts::core_properties(config))?,
        ),
    ];
    if footer {
        entries.push(("word/footer1.xml", stage(ExportStage::Footer, parts::footer())?));
    }

    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(zip::DateTime::default());

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, bytes) in &entries {
        zip.start_file(*name, options)?;
        zip.write_all(bytes)?;
    }
    let bytes = zip.finish()?.into_inner();

    debug!(blocks = blocks.len(), bytes = bytes.len(), "packed docx");
    Ok(bytes)
}

fn stage<T>(stage: ExportStage, result: xml::XmlResult<T>) -> Result<T, ExportError> {
    result.map_err(|source| ExportError::Xml { stage, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use std::io::Read;

    fn part(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut text = String::new();
        file.read_to_string(&mut text).unwrap();
        text
    }

    fn document(markdown: &str) -> String {
        let bytes = render_docx(&parse(markdown), &Config::compiled_default()).unwrap();
        part(&bytes, "word/document.xml")
    }

    #[test]
    fn empty_document_is_a_complete_package() {
        let bytes = render_docx(&[], &Config::compiled_default()).unwrap();
        let archive = zip::ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        let mut names: Vec<&str> = archive.file_names().collect();
        names.sort_unstable();
        assert_eq!(
            names,
            vec![
                "[Content_Types].xml",
                "_rels/.rels",
                "docProps/core.xml",
                "word/_rels/document.xml.rels",
                "word/document.xml",
                "word/numbering.xml",
                "word/styles.xml",
            ]
        );
        let doc = part(&bytes, "word/document.xml");
        assert!(doc.contains("<w:body><w:sectPr>"));
    }

    #[test]
    fn headings_use_builtin_styles() {
        let doc = document("# Title\n\n### Small");
        assert!(doc.contains(r#"<w:pStyle w:val="Heading1"/>"#));
        assert!(doc.contains(r#"<w:pStyle w:val="Heading3"/>"#));
    }

    #[test]
    fn heading_one_has_bottom_rule() {
        let doc = document("# Title");
        assert!(doc.contains(
            r#"<w:bottom w:val="single" w:sz="12" w:space="6" w:color="000000"/>"#
        ));
    }

    #[test]
    fn paragraphs_are_justified() {
        let doc = document("plain words");
        assert!(doc.contains(r#"<w:jc w:val="both"/>"#));
    }

    #[test]
    fn bullets_reference_the_bullet_list() {
        let doc = document("- item");
        assert!(doc.contains(r#"<w:numPr><w:ilvl w:val="0"/><w:numId w:val="1"/></w:numPr>"#));
    }

    #[test]
    fn cjk_runs_hint_east_asian_fonts() {
        let doc = document("中文");
        assert!(doc.contains(
            r#"w:eastAsia="Microsoft JhengHei" w:cs="Consolas" w:hint="eastAsia""#
        ));
        assert!(doc.contains("<w:t xml:space=\"preserve\">中文</w:t>"));
    }

    #[test]
    fn space_before_cjk_stays_in_a_latin_run() {
        let doc = document("# **Bold** 中");
        assert!(doc.contains("<w:t xml:space=\"preserve\"> </w:t>"));
        assert!(doc.contains("<w:t xml:space=\"preserve\">中</w:t>"));
        assert!(!doc.contains("> 中</w:t>"));
    }

    #[test]
    fn code_lines_are_separated_by_breaks() {
        let doc = document("```\na\nb\n```");
        assert!(doc.contains("a</w:t></w:r><w:r><w:br/></w:r><w:r>"));
        assert!(doc.contains(r#"<w:shd w:val="clear" w:color="auto" w:fill="F7F7F7"/>"#));
    }

    #[test]
    fn chat_turns_use_distinct_borders() {
        let doc = document("User: hi\n\nAI: hello");
        assert!(doc.contains(r#"w:val="dashed""#));
        assert!(doc.contains(r#"w:val="dotted""#));
        assert!(doc.contains(r#"<w:ind w:left="1500" w:right="0"/>"#));
        assert!(doc.contains(r#"<w:ind w:left="0" w:right="1500"/>"#));
    }

    #[test]
    fn markup_characters_are_escaped() {
        let doc = document("a < b & c");
        assert!(doc.contains("a &lt; b &amp; c"));
    }

    #[test]
    fn page_numbers_add_a_footer() {
        let mut config = Config::compiled_default();
        config.page.numbers = true;
        let bytes = render_docx(&parse("text"), &config).unwrap();

        let doc = part(&bytes, "word/document.xml");
        assert!(doc.contains(r#"<w:footerReference w:type="default" r:id="rIdFooter1"/>"#));
        let rels = part(&bytes, "word/_rels/document.xml.rels");
        assert!(rels.contains(r#"Target="footer1.xml""#));
        let footer = part(&bytes, "word/footer1.xml");
        assert!(footer.contains(" PAGE "));
        let types = part(&bytes, "[Content_Types].xml");
        assert!(types.contains("/word/footer1.xml"));
    }

    #[test]
    fn title_goes_into_core_properties() {
        let mut config = Config::compiled_default();
        config.document.title = "Field Notes".to_string();
        let bytes = render_docx(&[], &config).unwrap();
        let core = part(&bytes, "docProps/core.xml");
        assert!(core.contains("<dc:title>Field Notes</dc:title>"));
    }

    #[test]
    fn styles_carry_configured_fonts() {
        let mut config = Config::compiled_default();
        config.font.cjk = "Noto Sans CJK TC".to_string();
        let bytes = render_docx(&[], &config).unwrap();
        let styles = part(&bytes, "word/styles.xml");
        assert!(styles.contains(r#"w:eastAsia="Noto Sans CJK TC""#));
        assert!(styles.contains(r#"<w:name w:val="heading 2"/>"#));
    }

    #[test]
    fn identical_input_packs_identically() {
        let config = Config::compiled_default();
        let blocks = parse("# T\n\n**bold** `code` 【term】\n\n> [!TIP]\n> ok");
        assert_eq!(
            render_docx(&blocks, &config).unwrap(),
            render_docx(&blocks, &config).unwrap()
        );
    }
}
