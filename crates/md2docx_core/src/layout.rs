//! Block layout shared by the preview and the DOCX writer.
//!
//! This is the only caller of [`crate::inline::tokenize`]. Both outputs
//! consume a [`BlockLayout`], so they cannot disagree about inline styling,
//! line breaks or script boundaries.

use serde::Serialize;

use crate::block::ParsedBlock;
use crate::config::LabelConfig;
use crate::inline::{InlineSpan, tokenize};
use crate::script::{self, Script};
use crate::style::{BlockStyle, LineBreaks, style_for};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Emphasis {
    Plain,
    Bold,
    Code,
    Term,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyledRun {
    pub emphasis: Emphasis,
    pub script: Script,
    pub text: String,
}

/// One visual line: the runs between two hard breaks.
pub type Line = Vec<StyledRun>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockLayout {
    pub style: BlockStyle,
    pub label: Option<String>,
    pub lines: Vec<Line>,
}

impl BlockLayout {
    /// The visible text, lines joined by `\n`.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|line| line.iter().map(|run| run.text.as_str()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub fn layout_block(block: &ParsedBlock, labels: &LabelConfig) -> BlockLayout {
    let style = style_for(block.block_type);

    let spans = if style.rich_text {
        tokenize(&block.content)
    } else {
        vec![InlineSpan::Plain(block.content.clone())]
    };

    let mut lines = split_lines(spans);
    if style.line_breaks == LineBreaks::Soft && lines.len() > 1 {
        lines = vec![soft_join(lines)];
    }

    BlockLayout {
        style,
        label: style.label.map(|label| label.text(labels).to_string()),
        lines: lines.into_iter().map(segment_line).collect(),
    }
}

fn emphasis_of(span: &InlineSpan) -> Emphasis {
    match span {
        InlineSpan::Plain(_) => Emphasis::Plain,
        InlineSpan::Bold(_) => Emphasis::Bold,
        InlineSpan::Code(_) => Emphasis::Code,
        InlineSpan::Term(_) => Emphasis::Term,
    }
}

/// Break spans at `\n`. Only plain text can contain one; the tokenizer
/// never matches across lines.
fn split_lines(spans: Vec<InlineSpan>) -> Vec<Vec<(Emphasis, String)>> {
    let mut lines = vec![Vec::new()];
    for span in spans {
        let emphasis = emphasis_of(&span);
        for (idx, piece) in span.text().split('\n').enumerate() {
            if idx > 0 {
                lines.push(Vec::new());
            }
            if !piece.is_empty() {
                if let Some(line) = lines.last_mut() {
                    line.push((emphasis, piece.to_string()));
                }
            }
        }
    }
    lines
}

/// Join source lines into one flowing line. Latin text gets a space at the
/// join; no space is inserted next to CJK text.
fn soft_join(lines: Vec<Vec<(Emphasis, String)>>) -> Vec<(Emphasis, String)> {
    let mut joined: Vec<(Emphasis, String)> = Vec::new();
    for line in lines {
        let prev = joined.last().and_then(|(_, text)| text.chars().last());
        let next = line.first().and_then(|(_, text)| text.chars().next());
        if let (Some(prev), Some(next)) = (prev, next) {
            if !script::is_cjk(prev) && !script::is_cjk(next) {
                joined.push((Emphasis::Plain, " ".to_string()));
            }
        }
        joined.extend(line);
    }
    joined
}

/// Split runs at script boundaries and merge neighbours that ended up with
/// the same emphasis and script.
fn segment_line(line: Vec<(Emphasis, String)>) -> Line {
    let mut runs: Line = Vec::new();
    for (emphasis, text) in line {
        for (script, segment) in script::segments(&text) {
            match runs.last_mut() {
                Some(last) if last.emphasis == emphasis && last.script == script => {
                    last.text.push_str(segment);
                }
                _ => runs.push(StyledRun {
                    emphasis,
                    script,
                    text: segment.to_string(),
                }),
            }
        }
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockType;
    use crate::style::Label;
    use pretty_assertions::assert_eq;

    fn layout(block_type: BlockType, content: &str) -> BlockLayout {
        layout_block(&ParsedBlock::new(block_type, content), &LabelConfig::default())
    }

    fn run(emphasis: Emphasis, script: Script, text: &str) -> StyledRun {
        StyledRun {
            emphasis,
            script,
            text: text.to_string(),
        }
    }

    #[test]
    fn paragraph_lines_join_with_space() {
        let l = layout(BlockType::Paragraph, "first line\nsecond **line**");
        assert_eq!(
            l.lines,
            vec![vec![
                run(Emphasis::Plain, Script::Latin, "first line second "),
                run(Emphasis::Bold, Script::Latin, "line"),
            ]]
        );
    }

    #[test]
    fn cjk_lines_join_without_space() {
        let l = layout(BlockType::Paragraph, "**「Vibe Coding」**。\n這是什麼意思？");
        assert_eq!(l.text(), "「Vibe Coding」。這是什麼意思？");
    }

    #[test]
    fn callout_keeps_hard_breaks_and_label() {
        let l = layout(BlockType::CalloutTip, "one\n\n`two`");
        assert_eq!(l.style.label, Some(Label::Tip));
        assert_eq!(l.label.as_deref(), Some("Tip"));
        assert_eq!(
            l.lines,
            vec![
                vec![run(Emphasis::Plain, Script::Latin, "one")],
                vec![],
                vec![run(Emphasis::Code, Script::Latin, "two")],
            ]
        );
    }

    #[test]
    fn code_block_is_not_tokenized() {
        let l = layout(BlockType::CodeBlock, "let s = \"**x**\";\n  `y`");
        assert_eq!(
            l.lines,
            vec![
                vec![run(Emphasis::Plain, Script::Latin, "let s = \"**x**\";")],
                vec![run(Emphasis::Plain, Script::Latin, "  `y`")],
            ]
        );
    }

    #[test]
    fn terms_are_split_by_script() {
        let l = layout(BlockType::BulletList, "點擊【Settings 設定】");
        assert_eq!(
            l.lines,
            vec![vec![
                run(Emphasis::Plain, Script::Cjk, "點擊"),
                run(Emphasis::Term, Script::Latin, "Settings "),
                run(Emphasis::Term, Script::Cjk, "設定"),
            ]]
        );
    }

    #[test]
    fn chat_turn_has_speaker_label() {
        assert_eq!(layout(BlockType::ChatUser, "hi").label.as_deref(), Some("User"));
        assert_eq!(layout(BlockType::ChatAi, "hi").label.as_deref(), Some("AI"));
        assert_eq!(layout(BlockType::Paragraph, "hi").label, None);
    }
}
