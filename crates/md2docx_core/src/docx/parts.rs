//! Package parts other than the document body.

use crate::config::Config;

use super::xml::{R_NS, W_NS, XmlResult, XmlWriter};
use super::{BULLET_NUM_ID, FOOTER_REL_ID};

const CT_NS: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
const REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_TYPE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const WML_TYPE: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml";

/// Heading run sizes in half-points, levels 1 to 3.
const HEADING_SIZES: [u32; 3] = [36, 30, 26];

pub(crate) fn content_types(footer: bool) -> XmlResult<Vec<u8>> {
    let mut w = XmlWriter::new()?;
    w.start("Types", &[("xmlns", CT_NS)])?;
    w.empty(
        "Default",
        &[
            ("Extension", "rels"),
            ("ContentType", "application/vnd.openxmlformats-package.relationships+xml"),
        ],
    )?;
    w.empty("Default", &[("Extension", "xml"), ("ContentType", "application/xml")])?;

    let mut overrides = vec![
        ("/word/document.xml", format!("{WML_TYPE}.document.main+xml")),
        ("/word/styles.xml", format!("{WML_TYPE}.styles+xml")),
        ("/word/numbering.xml", format!("{WML_TYPE}.numbering+xml")),
        (
            "/docProps/core.xml",
            "application/vnd.openxmlformats-package.core-properties+xml".to_string(),
        ),
    ];
    if footer {
        overrides.push(("/word/footer1.xml", format!("{WML_TYPE}.footer+xml")));
    }
    for (part, content_type) in &overrides {
        w.empty(
            "Override",
            &[("PartName", part), ("ContentType", content_type.as_str())],
        )?;
    }

    w.end("Types")?;
    Ok(w.into_inner())
}

pub(crate) fn package_rels() -> XmlResult<Vec<u8>> {
    let core_type =
        "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
    let office_type = format!("{REL_TYPE}/officeDocument");
    relationships(&[
        ("rId1", office_type.as_str(), "word/document.xml"),
        ("rId2", core_type, "docProps/core.xml"),
    ])
}

pub(crate) fn document_rels(footer: bool) -> XmlResult<Vec<u8>> {
    let styles = format!("{REL_TYPE}/styles");
    let numbering = format!("{REL_TYPE}/numbering");
    let footer_type = format!("{REL_TYPE}/footer");
    let mut rels = vec![
        ("rId1", styles.as_str(), "styles.xml"),
        ("rId2", numbering.as_str(), "numbering.xml"),
    ];
    if footer {
        rels.push((FOOTER_REL_ID, footer_type.as_str(), "footer1.xml"));
    }
    relationships(&rels)
}

fn relationships(rels: &[(&str, &str, &str)]) -> XmlResult<Vec<u8>> {
    let mut w = XmlWriter::new()?;
    w.start("Relationships", &[("xmlns", REL_NS)])?;
    for &(id, rel_type, target) in rels {
        w.empty(
            "Relationship",
            &[("Id", id), ("Type", rel_type), ("Target", target)],
        )?;
    }
    w.end("Relationships")?;
    Ok(w.into_inner())
}

/// Document defaults carry the configured fonts; headings map to the
/// built-in `heading 1`..`heading 3` styles.
pub(crate) fn styles(config: &Config) -> XmlResult<Vec<u8>> {
    let font = &config.font;
    let body_size = font.body_size.to_string();

    let mut w = XmlWriter::new()?;
    w.start("w:styles", &[("xmlns:w", W_NS)])?;

    w.start("w:docDefaults", &[])?;
    w.start("w:rPrDefault", &[])?;
    w.start("w:rPr", &[])?;
    w.empty(
        "w:rFonts",
        &[
            ("w:ascii", font.latin.as_str()),
            ("w:hAnsi", font.latin.as_str()),
            ("w:eastAsia", font.cjk.as_str()),
            ("w:cs", font.latin.as_str()),
        ],
    )?;
    w.empty("w:sz", &[("w:val", body_size.as_str())])?;
    w.empty("w:szCs", &[("w:val", body_size.as_str())])?;
    w.end("w:rPr")?;
    w.end("w:rPrDefault")?;
    w.empty("w:pPrDefault", &[])?;
    w.end("w:docDefaults")?;

    w.start(
        "w:style",
        &[("w:type", "paragraph"), ("w:default", "1"), ("w:styleId", "Normal")],
    )?;
    w.empty("w:name", &[("w:val", "Normal")])?;
    w.empty("w:qFormat", &[])?;
    w.end("w:style")?;

    for (idx, size) in HEADING_SIZES.iter().enumerate() {
        let level = idx + 1;
        let style_id = format!("Heading{level}");
        let name = format!("heading {level}");
        let outline = idx.to_string();
        let size = size.to_string();

        w.start(
            "w:style",
            &[("w:type", "paragraph"), ("w:styleId", style_id.as_str())],
        )?;
        w.empty("w:name", &[("w:val", name.as_str())])?;
        w.empty("w:basedOn", &[("w:val", "Normal")])?;
        w.empty("w:next", &[("w:val", "Normal")])?;
        w.empty("w:uiPriority", &[("w:val", "9")])?;
        w.empty("w:qFormat", &[])?;
        w.start("w:pPr", &[])?;
        w.empty("w:keepNext", &[])?;
        w.empty("w:keepLines", &[])?;
        w.empty("w:outlineLvl", &[("w:val", outline.as_str())])?;
        w.end("w:pPr")?;
        w.start("w:rPr", &[])?;
        w.empty("w:b", &[])?;
        w.empty("w:bCs", &[])?;
        w.empty("w:sz", &[("w:val", size.as_str())])?;
        w.empty("w:szCs", &[("w:val", size.as_str())])?;
        w.end("w:rPr")?;
        w.end("w:style")?;
    }

    w.end("w:styles")?;
    Ok(w.into_inner())
}

/// A single bullet list definition, level 0.
pub(crate) fn numbering() -> XmlResult<Vec<u8>> {
    let mut w = XmlWriter::new()?;
    w.start("w:numbering", &[("xmlns:w", W_NS)])?;

    w.start("w:abstractNum", &[("w:abstractNumId", "0")])?;
    w.empty("w:multiLevelType", &[("w:val", "singleLevel")])?;
    w.start("w:lvl", &[("w:ilvl", "0")])?;
    w.empty("w:start", &[("w:val", "1")])?;
    w.empty("w:numFmt", &[("w:val", "bullet")])?;
    w.empty("w:lvlText", &[("w:val", "\u{2022}")])?;
    w.empty("w:lvlJc", &[("w:val", "left")])?;
    w.start("w:pPr", &[])?;
    w.empty("w:ind", &[("w:left", "720"), ("w:hanging", "360")])?;
    w.end("w:pPr")?;
    w.end("w:lvl")?;
    w.end("w:abstractNum")?;

    w.start("w:num", &[("w:numId", BULLET_NUM_ID)])?;
    w.empty("w:abstractNumId", &[("w:val", "0")])?;
    w.end("w:num")?;

    w.end("w:numbering")?;
    Ok(w.into_inner())
}

/// Centered page number field.
pub(crate) fn footer() -> XmlResult<Vec<u8>> {
    let mut w = XmlWriter::new()?;
    w.start("w:ftr", &[("xmlns:w", W_NS), ("xmlns:r", R_NS)])?;
    w.start("w:p", &[])?;
    w.start("w:pPr", &[])?;
    w.empty("w:jc", &[("w:val", "center")])?;
    w.end("w:pPr")?;

    field_char(&mut w, "begin")?;
    w.start("w:r", &[])?;
    w.text_element("w:instrText", &[("xml:space", "preserve")], " PAGE ")?;
    w.end("w:r")?;
    field_char(&mut w, "separate")?;
    w.start("w:r", &[])?;
    w.text_element("w:t", &[], "1")?;
    w.end("w:r")?;
    field_char(&mut w, "end")?;

    w.end("w:p")?;
    w.end("w:ftr")?;
    Ok(w.into_inner())
}

fn field_char(w: &mut XmlWriter, kind: &str) -> XmlResult {
    w.start("w:r", &[])?;
    w.empty("w:fldChar", &[("w:fldCharType", kind)])?;
    w.end("w:r")
}

/// Core properties without timestamps, so identical input packs to
/// identical bytes.
pub(crate) fn core_properties(config: &Config) -> XmlResult<Vec<u8>> {
    let mut w = XmlWriter::new()?;
    w.start(
        "cp:coreProperties",
        &[
            (
                "xmlns:cp",
                "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
            ),
            ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
            ("xmlns:dcterms", "http://purl.org/dc/terms/"),
            ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
        ],
    )?;
    w.text_element("dc:title", &[], &config.document.title)?;
    w.text_element("dc:creator", &[], env!("CARGO_PKG_NAME"))?;
    w.end("cp:coreProperties")?;
    Ok(w.into_inner())
}
