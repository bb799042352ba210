use std::fmt::Write as _;

use crate::config::Config;
use crate::preview::{PreviewBlock, PreviewDocument, PreviewRun};
use crate::style::{Alignment, BlockStyle, BorderLine, LineStyle, Role};

/// Convert a preview document to Typst markup for the print-layout view.
pub fn preview_to_typst(doc: &PreviewDocument, config: &Config) -> String {
    let mut out = String::new();
    emit_preamble(config, &mut out);

    let blocks = &doc.blocks;
    let mut i = 0;
    while i < blocks.len() {
        let block = &blocks[i];

        match block.style.role {
            Role::Heading(_) => {
                // A heading shares an unbreakable block with whatever follows it.
                out.push_str("#block(breakable: false)[\n");
                emit_block(block, &mut out);

                if i + 1 < blocks.len() {
                    i += 1;
                    emit_block(&blocks[i], &mut out);
                    end_list_if_needed(blocks, i, &mut out);
                }
                out.push_str("]\n\n");
            }
            _ => {
                emit_block(block, &mut out);
                end_list_if_needed(blocks, i, &mut out);
            }
        }

        i += 1;
    }

    out
}

fn emit_preamble(config: &Config, out: &mut String) {
    out.push_str("#set page(paper: \"a4\"");
    if config.page.numbers {
        out.push_str(", numbering: \"1\"");
    }
    out.push_str(")\n");
    let _ = writeln!(
        out,
        "#set text(font: ({}, {}), size: {}pt)",
        typst_string(&config.font.latin),
        typst_string(&config.font.cjk),
        half_points(config.font.body_size)
    );
    let _ = writeln!(
        out,
        "#show raw: set text(font: ({}, {}))",
        typst_string(&config.font.code),
        typst_string(&config.font.cjk)
    );
    out.push_str("#set par(linebreaks: \"optimized\")\n\n");
}

/// A bullet list stays open while bullet blocks follow each other.
fn end_list_if_needed(blocks: &[PreviewBlock], i: usize, out: &mut String) {
    let is_bullet = |idx: usize| blocks.get(idx).map(|b| b.style.role) == Some(Role::Bullet);
    if is_bullet(i) && !is_bullet(i + 1) {
        out.push('\n');
    }
}

fn emit_block(block: &PreviewBlock, out: &mut String) {
    let style = &block.style;
    let mut body = String::new();

    match style.role {
        Role::Heading(level) => {
            for _ in 0..level {
                body.push('=');
            }
            body.push(' ');
            lines_to_typst(&block.lines, &mut body);
        }
        Role::Code => {
            let code: Vec<String> = block
                .lines
                .iter()
                .map(|line| line.iter().map(|run| run.text.as_str()).collect())
                .collect();
            let size = block
                .lines
                .iter()
                .flatten()
                .find_map(|run| run.size)
                .map(half_points);
            let raw = format!("#raw(block: true, {})", typst_string(&code.join("\n")));
            match size {
                Some(size) => {
                    let _ = write!(body, "#text(size: {size}pt)[{raw}]");
                }
                None => body.push_str(&raw),
            }
        }
        Role::Bullet => {
            out.push_str("- ");
            lines_to_typst(&block.lines, out);
            out.push('\n');
            return;
        }
        Role::Body | Role::Speech | Role::Callout => {
            if let Some(label) = &block.label {
                for run in label {
                    run_to_typst(run, &mut body);
                }
                if !block.lines.is_empty() {
                    body.push_str(" \\\n");
                }
            }
            if style.alignment == Alignment::Justified {
                body.push_str("#par(justify: true)[");
                lines_to_typst(&block.lines, &mut body);
                body.push(']');
            } else {
                lines_to_typst(&block.lines, &mut body);
            }
        }
    }

    frame(style, &body, out);
    out.push_str("\n\n");
}

/// Wrap `body` in the block's indentation, spacing, border and fill.
fn frame(style: &BlockStyle, body: &str, out: &mut String) {
    let padded = style.indent.left > 0 || style.indent.right > 0;
    if padded {
        let _ = write!(
            out,
            "#pad(left: {}pt, right: {}pt)[",
            twips(style.indent.left),
            twips(style.indent.right)
        );
    }

    let _ = write!(
        out,
        "#block(width: 100%, above: {}pt, below: {}pt",
        twips(style.spacing.before),
        twips(style.spacing.after)
    );
    if let Some(fill) = style.shading {
        let _ = write!(out, ", fill: rgb(\"#{fill}\")");
    }
    if let Some(borders) = style.borders {
        let sides = [
            ("top", borders.top),
            ("left", borders.left),
            ("bottom", borders.bottom),
            ("right", borders.right),
        ];
        let strokes: Vec<String> = sides
            .iter()
            .filter_map(|(side, line)| line.map(|line| format!("{side}: {}", stroke(line))))
            .collect();
        let insets: Vec<String> = sides
            .iter()
            .filter_map(|(side, line)| line.map(|line| format!("{side}: {}pt", line.space)))
            .collect();
        let _ = write!(out, ", stroke: ({}), inset: ({})", strokes.join(", "), insets.join(", "));
    }
    out.push_str(")[\n");
    out.push_str(body);
    out.push_str("\n]");

    if padded {
        out.push(']');
    }
}

fn stroke(line: BorderLine) -> String {
    let dash = match line.style {
        LineStyle::Single => "",
        LineStyle::Dashed => ", dash: \"dashed\"",
        LineStyle::Dotted => ", dash: \"dotted\"",
    };
    format!(
        "(paint: rgb(\"#{}\"), thickness: {}pt{dash})",
        line.color,
        f64::from(line.size) / 8.0
    )
}

fn lines_to_typst(lines: &[Vec<PreviewRun>], out: &mut String) {
    for (idx, line) in lines.iter().enumerate() {
        if idx > 0 {
            out.push_str(" \\\n");
        }
        for run in line {
            run_to_typst(run, out);
        }
    }
}

fn run_to_typst(run: &PreviewRun, out: &mut String) {
    let mut inner = String::new();
    escape_text(&run.text, &mut inner);

    let mut text_args = vec![format!("font: {}", typst_string(&run.font))];
    if let Some(size) = run.size {
        text_args.push(format!("size: {}pt", half_points(size)));
    }
    let mut expr = format!("#text({})[{inner}]", text_args.join(", "));

    if run.style.bold {
        expr = format!("#strong[{expr}]");
    }
    if let Some(fill) = run.style.shading {
        expr = format!("#box(fill: rgb(\"#{fill}\"), inset: (x: 2pt), outset: (y: 2pt))[{expr}]");
    }
    if run.style.boxed {
        expr = format!(
            "#box(stroke: 0.8pt, inset: (x: 2pt), outset: (y: 2pt), radius: 2pt)[{expr}]"
        );
    }

    out.push_str(&expr);
    // Ends the embedded expression so following text is not read as code.
    out.push(';');
}

/// Escape special Typst characters in markup text
fn escape_text(text: &str, out: &mut String) {
    let mut prev_digit = false;
    for ch in text.chars() {
        match ch {
            '#' | '*' | '_' | '@' | '$' | '\\' | '`' | '<' | '>' | '[' | ']' | '=' | '-' | '+'
            | '/' | '~' | ';' => {
                out.push('\\');
                out.push(ch);
            }
            // "1." would start an enumeration
            '.' if prev_digit => out.push_str("\\."),
            _ => out.push(ch),
        }
        prev_digit = ch.is_ascii_digit();
    }
}

/// A Typst string literal.
fn typst_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

fn twips(value: u32) -> f64 {
    f64::from(value) / 20.0
}

fn half_points(value: u32) -> f64 {
    f64::from(value) / 2.0
}
