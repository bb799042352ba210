//! Block type to style descriptor table.
//!
//! Measurements use DOCX units: twips (1/20 pt) for spacing and
//! indentation, points for border space, eighths of a point for border
//! width and half-points for font size. The preview converts them to points.

use serde::Serialize;

use crate::block::BlockType;
use crate::config::{Config, LabelConfig};
use crate::layout::Emphasis;
use crate::script::Script;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Heading(u8),
    Body,
    Code,
    Bullet,
    Speech,
    Callout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    Left,
    Justified,
}

/// How `\n` inside a block's content is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineBreaks {
    /// Each source line becomes its own visual line.
    Hard,
    /// Lines are joined into one flowing line.
    Soft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    Single,
    Dashed,
    Dotted,
}

impl LineStyle {
    pub fn docx_value(self) -> &'static str {
        match self {
            LineStyle::Single => "single",
            LineStyle::Dashed => "dashed",
            LineStyle::Dotted => "dotted",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BorderLine {
    pub style: LineStyle,
    /// Eighths of a point.
    pub size: u32,
    /// Points between border and text.
    pub space: u32,
    pub color: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Borders {
    pub top: Option<BorderLine>,
    pub left: Option<BorderLine>,
    pub bottom: Option<BorderLine>,
    pub right: Option<BorderLine>,
}

impl Borders {
    fn around(line: BorderLine) -> Self {
        Self {
            top: Some(line),
            left: Some(line),
            bottom: Some(line),
            right: Some(line),
        }
    }

    fn bottom(line: BorderLine) -> Self {
        Self {
            top: None,
            left: None,
            bottom: Some(line),
            right: None,
        }
    }

    fn left(line: BorderLine) -> Self {
        Self {
            top: None,
            left: Some(line),
            bottom: None,
            right: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Spacing {
    pub before: u32,
    pub after: u32,
    /// Line height in 240ths of a line, when fixed.
    pub line: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Indent {
    pub left: u32,
    pub right: u32,
}

/// Which configured label a block carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    User,
    Ai,
    Note,
    Tip,
    Warning,
}

impl Label {
    pub fn text(self, labels: &LabelConfig) -> &str {
        match self {
            Label::User => &labels.user,
            Label::Ai => &labels.ai,
            Label::Note => &labels.note,
            Label::Tip => &labels.tip,
            Label::Warning => &labels.warning,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlockStyle {
    pub role: Role,
    pub alignment: Alignment,
    pub line_breaks: LineBreaks,
    /// Content goes through the inline tokenizer. Code blocks are verbatim.
    pub rich_text: bool,
    pub monospace: bool,
    pub spacing: Spacing,
    pub indent: Indent,
    pub borders: Option<Borders>,
    pub shading: Option<&'static str>,
    pub label: Option<Label>,
}

/// Shading behind inline code runs.
pub const INLINE_CODE_SHADING: &str = "F2F2F2";

const BLACK: &str = "000000";

const BODY: BlockStyle = BlockStyle {
    role: Role::Body,
    alignment: Alignment::Left,
    line_breaks: LineBreaks::Soft,
    rich_text: true,
    monospace: false,
    spacing: Spacing {
        before: 0,
        after: 0,
        line: None,
    },
    indent: Indent { left: 0, right: 0 },
    borders: None,
    shading: None,
    label: None,
};

fn speech(style: LineStyle, shading: &'static str, indent: Indent, label: Label) -> BlockStyle {
    BlockStyle {
        role: Role::Speech,
        line_breaks: LineBreaks::Hard,
        spacing: Spacing {
            before: 300,
            after: 300,
            line: None,
        },
        indent,
        borders: Some(Borders::around(BorderLine {
            style,
            size: 4,
            space: 10,
            color: BLACK,
        })),
        shading: Some(shading),
        label: Some(label),
        ..BODY
    }
}

fn callout(label: Label) -> BlockStyle {
    BlockStyle {
        role: Role::Callout,
        line_breaks: LineBreaks::Hard,
        spacing: Spacing {
            before: 400,
            after: 400,
            line: None,
        },
        indent: Indent {
            left: 400,
            right: 0,
        },
        borders: Some(Borders::left(BorderLine {
            style: LineStyle::Single,
            size: 36,
            space: 15,
            color: BLACK,
        })),
        shading: Some("F9F9F9"),
        label: Some(label),
        ..BODY
    }
}

fn heading(level: u8, before: u32, after: u32) -> BlockStyle {
    BlockStyle {
        role: Role::Heading(level),
        spacing: Spacing {
            before,
            after,
            line: None,
        },
        ..BODY
    }
}

/// The style of every block type. Adding a block type without a row here
/// does not compile.
pub fn style_for(block_type: BlockType) -> BlockStyle {
    match block_type {
        BlockType::Heading1 => BlockStyle {
            borders: Some(Borders::bottom(BorderLine {
                style: LineStyle::Single,
                size: 12,
                space: 6,
                color: BLACK,
            })),
            ..heading(1, 400, 200)
        },
        BlockType::Heading2 => heading(2, 300, 150),
        BlockType::Heading3 => heading(3, 200, 100),
        BlockType::Paragraph => BlockStyle {
            alignment: Alignment::Justified,
            spacing: Spacing {
                before: 180,
                after: 180,
                line: None,
            },
            ..BODY
        },
        BlockType::CodeBlock => BlockStyle {
            role: Role::Code,
            line_breaks: LineBreaks::Hard,
            rich_text: false,
            monospace: true,
            spacing: Spacing {
                before: 300,
                after: 300,
                line: Some(240),
            },
            indent: Indent {
                left: 400,
                right: 400,
            },
            borders: Some(Borders::around(BorderLine {
                style: LineStyle::Single,
                size: 4,
                space: 6,
                color: BLACK,
            })),
            shading: Some("F7F7F7"),
            ..BODY
        },
        BlockType::BulletList => BlockStyle {
            role: Role::Bullet,
            spacing: Spacing {
                before: 100,
                after: 100,
                line: None,
            },
            ..BODY
        },
        BlockType::ChatUser => speech(
            LineStyle::Dashed,
            "FFFFFF",
            Indent {
                left: 1500,
                right: 0,
            },
            Label::User,
        ),
        BlockType::ChatAi => speech(
            LineStyle::Dotted,
            "F2F2F2",
            Indent {
                left: 0,
                right: 1500,
            },
            Label::Ai,
        ),
        BlockType::CalloutNote => callout(Label::Note),
        BlockType::CalloutTip => callout(Label::Tip),
        BlockType::CalloutWarning => callout(Label::Warning),
    }
}

/// Explicit run size for a block's text in half-points. `None` inherits the
/// paragraph style (document default, or the heading size).
pub fn font_size(style: &BlockStyle, config: &Config) -> Option<u32> {
    style.monospace.then_some(config.font.code_size)
}

/// Character-level styling of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunStyle {
    pub bold: bool,
    pub monospace: bool,
    pub shading: Option<&'static str>,
    /// Drawn with a box border, like a badge.
    pub boxed: bool,
}

/// The style of chat and callout labels.
pub const LABEL_RUN: RunStyle = RunStyle {
    bold: true,
    monospace: false,
    shading: None,
    boxed: false,
};

pub fn run_style(emphasis: Emphasis, block: &BlockStyle) -> RunStyle {
    let plain = RunStyle {
        bold: false,
        monospace: block.monospace,
        shading: None,
        boxed: false,
    };
    match emphasis {
        Emphasis::Plain => plain,
        Emphasis::Bold => RunStyle { bold: true, ..plain },
        Emphasis::Code => RunStyle {
            monospace: true,
            shading: Some(INLINE_CODE_SHADING),
            ..plain
        },
        Emphasis::Term => RunStyle {
            bold: true,
            boxed: true,
            ..plain
        },
    }
}

/// Font families for a run, one per script slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunFonts<'a> {
    pub latin: &'a str,
    pub cjk: &'a str,
}

impl<'a> RunFonts<'a> {
    pub fn new(style: RunStyle, config: &'a Config) -> Self {
        let latin = if style.monospace {
            &config.font.code
        } else {
            &config.font.latin
        };
        Self {
            latin,
            cjk: &config.font.cjk,
        }
    }

    pub fn family(&self, script: Script) -> &'a str {
        match script {
            Script::Latin => self.latin,
            Script::Cjk => self.cjk,
        }
    }
}
