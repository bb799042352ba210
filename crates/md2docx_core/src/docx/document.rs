//! `word/document.xml`: one paragraph per block.

use crate::block::ParsedBlock;
use crate::config::Config;
use crate::layout::layout_block;
use crate::script::{self, Script};
use crate::style::{
    Alignment, BlockStyle, LABEL_RUN, Role, RunFonts, RunStyle, font_size, run_style,
};

use super::xml::{R_NS, W_NS, XmlResult, XmlWriter};
use super::{BULLET_NUM_ID, FOOTER_REL_ID};

pub(crate) fn document_xml(blocks: &[ParsedBlock], config: &Config) -> XmlResult<Vec<u8>> {
    let mut w = XmlWriter::new()?;
    w.start("w:document", &[("xmlns:w", W_NS), ("xmlns:r", R_NS)])?;
    w.start("w:body", &[])?;
    for block in blocks {
        write_block(&mut w, block, config)?;
    }
    write_section(&mut w, config.page.numbers)?;
    w.end("w:body")?;
    w.end("w:document")?;
    Ok(w.into_inner())
}

fn write_block(w: &mut XmlWriter, block: &ParsedBlock, config: &Config) -> XmlResult {
    let layout = layout_block(block, &config.labels);
    let style = &layout.style;

    w.start("w:p", &[])?;
    write_paragraph_properties(w, style)?;

    if let Some(label) = &layout.label {
        for (script, segment) in script::segments(label) {
            write_run(w, segment, script, LABEL_RUN, Some(config.font.label_size), config)?;
        }
        write_break(w)?;
    }

    let size = font_size(style, config);
    for (idx, line) in layout.lines.iter().enumerate() {
        if idx > 0 {
            write_break(w)?;
        }
        for run in line {
            let styled = run_style(run.emphasis, style);
            write_run(w, &run.text, run.script, styled, size, config)?;
        }
    }

    w.end("w:p")
}

/// Children are written in the order the schema requires.
fn write_paragraph_properties(w: &mut XmlWriter, style: &BlockStyle) -> XmlResult {
    w.start("w:pPr", &[])?;

    if let Role::Heading(level) = style.role {
        let style_id = format!("Heading{level}");
        w.empty("w:pStyle", &[("w:val", style_id.as_str())])?;
    }

    if style.role == Role::Bullet {
        w.start("w:numPr", &[])?;
        w.empty("w:ilvl", &[("w:val", "0")])?;
        w.empty("w:numId", &[("w:val", BULLET_NUM_ID)])?;
        w.end("w:numPr")?;
    }

    if let Some(borders) = style.borders {
        w.start("w:pBdr", &[])?;
        let sides = [
            ("w:top", borders.top),
            ("w:left", borders.left),
            ("w:bottom", borders.bottom),
            ("w:right", borders.right),
        ];
        for (name, line) in sides {
            let Some(line) = line else { continue };
            let size = line.size.to_string();
            let space = line.space.to_string();
            w.empty(
                name,
                &[
                    ("w:val", line.style.docx_value()),
                    ("w:sz", size.as_str()),
                    ("w:space", space.as_str()),
                    ("w:color", line.color),
                ],
            )?;
        }
        w.end("w:pBdr")?;
    }

    if let Some(fill) = style.shading {
        write_shading(w, fill)?;
    }

    let before = style.spacing.before.to_string();
    let after = style.spacing.after.to_string();
    match style.spacing.line {
        Some(line) => {
            let line = line.to_string();
            w.empty(
                "w:spacing",
                &[
                    ("w:before", before.as_str()),
                    ("w:after", after.as_str()),
                    ("w:line", line.as_str()),
                    ("w:lineRule", "auto"),
                ],
            )?;
        }
        None => w.empty(
            "w:spacing",
            &[("w:before", before.as_str()), ("w:after", after.as_str())],
        )?,
    }

    if style.indent.left > 0 || style.indent.right > 0 {
        let left = style.indent.left.to_string();
        let right = style.indent.right.to_string();
        w.empty("w:ind", &[("w:left", left.as_str()), ("w:right", right.as_str())])?;
    }

    if style.alignment == Alignment::Justified {
        w.empty("w:jc", &[("w:val", "both")])?;
    }

    w.end("w:pPr")
}

fn write_shading(w: &mut XmlWriter, fill: &str) -> XmlResult {
    w.empty("w:shd", &[("w:val", "clear"), ("w:color", "auto"), ("w:fill", fill)])
}

fn write_run(
    w: &mut XmlWriter,
    text: &str,
    script: Script,
    style: RunStyle,
    size: Option<u32>,
    config: &Config,
) -> XmlResult {
    let fonts = RunFonts::new(style, config);

    w.start("w:r", &[])?;
    w.start("w:rPr", &[])?;

    let mut font_attrs = vec![
        ("w:ascii", fonts.latin),
        ("w:hAnsi", fonts.latin),
        ("w:eastAsia", fonts.cjk),
        ("w:cs", fonts.latin),
    ];
    if script == Script::Cjk {
        font_attrs.push(("w:hint", "eastAsia"));
    }
    w.empty("w:rFonts", &font_attrs)?;

    if style.bold {
        w.empty("w:b", &[])?;
        w.empty("w:bCs", &[])?;
    }
    if let Some(size) = size {
        let size = size.to_string();
        w.empty("w:sz", &[("w:val", size.as_str())])?;
        w.empty("w:szCs", &[("w:val", size.as_str())])?;
    }
    if style.boxed {
        w.empty(
            "w:bdr",
            &[
                ("w:val", "single"),
                ("w:sz", "4"),
                ("w:space", "0"),
                ("w:color", "000000"),
            ],
        )?;
    }
    if let Some(fill) = style.shading {
        write_shading(w, fill)?;
    }
    w.end("w:rPr")?;

    w.text_element("w:t", &[("xml:space", "preserve")], text)?;
    w.end("w:r")
}

fn write_break(w: &mut XmlWriter) -> XmlResult {
    w.start("w:r", &[])?;
    w.empty("w:br", &[])?;
    w.end("w:r")
}

/// A4 portrait with one-inch margins.
fn write_section(w: &mut XmlWriter, footer: bool) -> XmlResult {
    w.start("w:sectPr", &[])?;
    if footer {
        w.empty(
            "w:footerReference",
            &[("w:type", "default"), ("r:id", FOOTER_REL_ID)],
        )?;
    }
    w.empty("w:pgSz", &[("w:w", "11906"), ("w:h", "16838")])?;
    w.empty(
        "w:pgMar",
        &[
            ("w:top", "1440"),
            ("w:right", "1440"),
            ("w:bottom", "1440"),
            ("w:left", "1440"),
            ("w:header", "708"),
            ("w:footer", "708"),
            ("w:gutter", "0"),
        ],
    )?;
    w.end("w:sectPr")
}
