use tracing::debug;

use crate::block::{BlockType, ParsedBlock};

/// Parse a document into blocks in one forward pass.
pub fn parse(document: &str) -> Vec<ParsedBlock> {
    let mut parser = BlockParser::default();
    for line in document.lines() {
        parser.feed(line);
    }
    let blocks = parser.finish();
    debug!(lines = document.lines().count(), blocks = blocks.len(), "parsed document");
    blocks
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Speaker {
    User,
    Ai,
}

impl Speaker {
    fn block_type(self) -> BlockType {
        match self {
            Speaker::User => BlockType::ChatUser,
            Speaker::Ai => BlockType::ChatAi,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CalloutKind {
    Note,
    Tip,
    Warning,
}

impl CalloutKind {
    fn from_sigil(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "NOTE" => Some(CalloutKind::Note),
            "TIP" => Some(CalloutKind::Tip),
            "WARNING" => Some(CalloutKind::Warning),
            _ => None,
        }
    }

    fn block_type(self) -> BlockType {
        match self {
            CalloutKind::Note => BlockType::CalloutNote,
            CalloutKind::Tip => BlockType::CalloutTip,
            CalloutKind::Warning => BlockType::CalloutWarning,
        }
    }
}

/// A source line after classification, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line<'a> {
    Fence,
    Callout(CalloutKind, &'a str),
    Heading(u8, &'a str),
    Chat(Speaker, &'a str),
    Bullet(&'a str),
    Blank,
    Text(&'a str),
}

/// What the parser is in the middle of. Only one multi-line block can be
/// open at a time.
#[derive(Debug, Default)]
enum State<'a> {
    #[default]
    Idle,
    Paragraph(Vec<&'a str>),
    Chat(Speaker, Vec<&'a str>),
    Callout(CalloutKind, Vec<&'a str>),
    Fence(Vec<&'a str>),
}

#[derive(Default)]
struct BlockParser<'a> {
    state: State<'a>,
    blocks: Vec<ParsedBlock>,
}

impl<'a> BlockParser<'a> {
    fn feed(&mut self, line: &'a str) {
        let state = std::mem::take(&mut self.state);
        self.state = match state {
            State::Fence(mut lines) => {
                if line.trim() == "```" {
                    self.close(State::Fence(lines));
                    State::Idle
                } else {
                    lines.push(line);
                    State::Fence(lines)
                }
            }
            State::Callout(kind, mut lines) => match classify(line) {
                next @ (Line::Fence | Line::Callout(..)) => {
                    self.close(State::Callout(kind, lines));
                    self.open(next)
                }
                next => match callout_continuation(line) {
                    Some(text) => {
                        lines.push(text);
                        State::Callout(kind, lines)
                    }
                    None => {
                        self.close(State::Callout(kind, lines));
                        self.open(next)
                    }
                },
            },
            State::Chat(speaker, mut lines) => match classify(line) {
                Line::Text(text) => {
                    lines.push(text);
                    State::Chat(speaker, lines)
                }
                next => {
                    self.close(State::Chat(speaker, lines));
                    self.open(next)
                }
            },
            State::Paragraph(mut lines) => match classify(line) {
                Line::Text(text) => {
                    lines.push(text);
                    State::Paragraph(lines)
                }
                next => {
                    self.close(State::Paragraph(lines));
                    self.open(next)
                }
            },
            State::Idle => self.open(classify(line)),
        };
    }

    /// Start whatever `line` begins. Single-line blocks are emitted
    /// immediately and leave the parser idle.
    fn open(&mut self, line: Line<'a>) -> State<'a> {
        match line {
            Line::Fence => State::Fence(Vec::new()),
            Line::Callout(kind, rest) => State::Callout(kind, first_line(rest)),
            // A marker with no text opens nothing.
            Line::Heading(_, "") | Line::Bullet("") => State::Idle,
            Line::Heading(level, text) => {
                let block_type = match level {
                    1 => BlockType::Heading1,
                    2 => BlockType::Heading2,
                    _ => BlockType::Heading3,
                };
                self.blocks.push(ParsedBlock::new(block_type, text));
                State::Idle
            }
            Line::Chat(speaker, rest) => State::Chat(speaker, first_line(rest)),
            Line::Bullet(text) => {
                self.blocks.push(ParsedBlock::new(BlockType::BulletList, text));
                State::Idle
            }
            Line::Blank => State::Idle,
            Line::Text(text) => State::Paragraph(vec![text]),
        }
    }

    fn close(&mut self, state: State<'a>) {
        match state {
            State::Idle => {}
            // Code blocks are kept even when empty; the fence pair is explicit.
            State::Fence(lines) => self
                .blocks
                .push(ParsedBlock::new(BlockType::CodeBlock, lines.join("\n"))),
            State::Paragraph(lines) => self.push_joined(BlockType::Paragraph, &lines),
            State::Chat(speaker, lines) => self.push_joined(speaker.block_type(), &lines),
            State::Callout(kind, lines) => self.push_joined(kind.block_type(), &lines),
        }
    }

    fn push_joined(&mut self, block_type: BlockType, lines: &[&str]) {
        let content = lines.join("\n");
        let content = content.trim_matches('\n');
        if !content.is_empty() {
            self.blocks.push(ParsedBlock::new(block_type, content));
        }
    }

    fn finish(mut self) -> Vec<ParsedBlock> {
        let state = std::mem::take(&mut self.state);
        self.close(state);
        self.blocks
    }
}

fn first_line(rest: &str) -> Vec<&str> {
    if rest.is_empty() {
        Vec::new()
    } else {
        vec![rest]
    }
}

fn classify(line: &str) -> Line<'_> {
    let trimmed = line.trim();
    // Heading and bullet markers need their trailing space, which `trim`
    // would drop on a marker-only line.
    let lead = line.trim_start();
    if trimmed.is_empty() {
        return Line::Blank;
    }
    if is_fence(trimmed) {
        return Line::Fence;
    }
    if let Some((kind, rest)) = callout_sigil(trimmed) {
        return Line::Callout(kind, rest);
    }
    if let Some((level, text)) = heading(lead) {
        return Line::Heading(level, text);
    }
    if let Some((speaker, rest)) = chat_turn(trimmed) {
        return Line::Chat(speaker, rest);
    }
    if let Some(text) = bullet(lead) {
        return Line::Bullet(text);
    }
    Line::Text(trimmed)
}

/// Three backticks, optionally followed by a one-word language tag.
fn is_fence(trimmed: &str) -> bool {
    match trimmed.strip_prefix("```") {
        Some(tag) => !tag.contains('`') && !tag.trim().contains(char::is_whitespace),
        None => false,
    }
}

/// `[!NOTE]`, `[!TIP]` or `[!WARNING]`, optionally behind a `>` marker.
fn callout_sigil(trimmed: &str) -> Option<(CalloutKind, &str)> {
    let body = trimmed.strip_prefix('>').unwrap_or(trimmed).trim_start();
    let inner = body.strip_prefix("[!")?;
    let close = inner.find(']')?;
    let kind = CalloutKind::from_sigil(&inner[..close])?;
    Some((kind, inner[close + 1..].trim()))
}

fn callout_continuation(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix('>')?;
    let rest = rest.strip_prefix(' ').unwrap_or(rest);
    Some(rest.trim_end())
}

fn heading(lead: &str) -> Option<(u8, &str)> {
    let hashes = lead.bytes().take_while(|&b| b == b'#').count();
    if !(1..=3).contains(&hashes) {
        return None;
    }
    let text = lead[hashes..].strip_prefix(' ')?;
    Some((hashes as u8, text.trim()))
}

fn chat_turn(trimmed: &str) -> Option<(Speaker, &str)> {
    [("user", Speaker::User), ("ai", Speaker::Ai)]
        .into_iter()
        .find_map(|(name, speaker)| {
            let head = trimmed.get(..name.len())?;
            if !head.eq_ignore_ascii_case(name) {
                return None;
            }
            let rest = &trimmed[name.len()..];
            let rest = rest.strip_prefix(':').or_else(|| rest.strip_prefix('：'))?;
            Some((speaker, rest.trim()))
        })
}

fn bullet(lead: &str) -> Option<&str> {
    lead.strip_prefix("- ")
        .or_else(|| lead.strip_prefix("* "))
        .map(str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn block(block_type: BlockType, content: &str) -> ParsedBlock {
        ParsedBlock::new(block_type, content)
    }

    #[test]
    fn empty_document() {
        assert_eq!(parse(""), vec![]);
        assert_eq!(parse("\n\n   \n"), vec![]);
    }

    #[rstest]
    #[case("# Title", BlockType::Heading1, "Title")]
    #[case("## Section", BlockType::Heading2, "Section")]
    #[case("### Sub **bold**", BlockType::Heading3, "Sub **bold**")]
    #[case("#### Too deep", BlockType::Paragraph, "#### Too deep")]
    #[case("#hashtag", BlockType::Paragraph, "#hashtag")]
    fn headings(#[case] input: &str, #[case] block_type: BlockType, #[case] content: &str) {
        assert_eq!(parse(input), vec![block(block_type, content)]);
    }

    #[rstest]
    #[case("# ")]
    #[case("###   ")]
    #[case("- ")]
    #[case("  * ")]
    fn marker_without_text_emits_nothing(#[case] input: &str) {
        assert_eq!(parse(input), vec![]);
    }

    #[test]
    fn marker_without_text_closes_paragraph() {
        assert_eq!(
            parse("before
- 
after"),
            vec![block(BlockType::Paragraph, "before"), block(BlockType::Paragraph, "after")]
        );
        assert_eq!(parse("#"), vec![block(BlockType::Paragraph, "#")]);
    }

    #[test]
    fn code_fence() {
        assert_eq!(
            parse("```\nline1\nline2\n```"),
            vec![block(BlockType::CodeBlock, "line1\nline2")]
        );
    }

    #[test]
    fn code_fence_keeps_blank_lines_and_markers() {
        let md = "```rust\nfn main() {\n\n    # not a heading\n- not a bullet\n}\n```";
        assert_eq!(
            parse(md),
            vec![block(
                BlockType::CodeBlock,
                "fn main() {\n\n    # not a heading\n- not a bullet\n}"
            )]
        );
    }

    #[test]
    fn language_tag_line_does_not_close_fence() {
        assert_eq!(
            parse("```\n```js\n```"),
            vec![block(BlockType::CodeBlock, "```js")]
        );
    }

    #[test]
    fn unterminated_fence_runs_to_end() {
        assert_eq!(
            parse("intro\n```\na\n\nb"),
            vec![
                block(BlockType::Paragraph, "intro"),
                block(BlockType::CodeBlock, "a\n\nb"),
            ]
        );
    }

    #[test]
    fn empty_fence_still_emits_code_block() {
        assert_eq!(parse("```\n```"), vec![block(BlockType::CodeBlock, "")]);
    }

    #[test]
    fn bullets_are_one_block_each() {
        assert_eq!(
            parse("- item one\n- item two\n* item three"),
            vec![
                block(BlockType::BulletList, "item one"),
                block(BlockType::BulletList, "item two"),
                block(BlockType::BulletList, "item three"),
            ]
        );
    }

    #[test]
    fn bold_at_line_start_is_not_a_bullet() {
        assert_eq!(
            parse("**bold** start"),
            vec![block(BlockType::Paragraph, "**bold** start")]
        );
    }

    #[test]
    fn paragraph_lines_join_until_blank() {
        assert_eq!(
            parse("first line\nsecond line\n\nnext paragraph"),
            vec![
                block(BlockType::Paragraph, "first line\nsecond line"),
                block(BlockType::Paragraph, "next paragraph"),
            ]
        );
    }

    #[test]
    fn heading_interrupts_paragraph() {
        assert_eq!(
            parse("text\n## Next\nmore"),
            vec![
                block(BlockType::Paragraph, "text"),
                block(BlockType::Heading2, "Next"),
                block(BlockType::Paragraph, "more"),
            ]
        );
    }

    #[test]
    fn callout_with_continuation_lines() {
        let md = "> [!NOTE]\n> **【Tip of the day】**\n> Use `v1.0.0`.\nafter";
        assert_eq!(
            parse(md),
            vec![
                block(BlockType::CalloutNote, "**【Tip of the day】**\nUse `v1.0.0`."),
                block(BlockType::Paragraph, "after"),
            ]
        );
    }

    #[rstest]
    #[case("[!TIP] inline text", BlockType::CalloutTip, "inline text")]
    #[case("> [!warning]\n> careful", BlockType::CalloutWarning, "careful")]
    #[case("> [!Note]\n>\n> spaced\n>", BlockType::CalloutNote, "spaced")]
    fn callout_variants(#[case] input: &str, #[case] block_type: BlockType, #[case] content: &str) {
        assert_eq!(parse(input), vec![block(block_type, content)]);
    }

    #[test]
    fn callout_keeps_inner_empty_lines() {
        assert_eq!(
            parse("> [!TIP]\n> one\n>\n> two"),
            vec![block(BlockType::CalloutTip, "one\n\ntwo")]
        );
    }

    #[test]
    fn blank_line_closes_callout() {
        assert_eq!(
            parse("> [!NOTE]\n> inside\n\n> outside"),
            vec![
                block(BlockType::CalloutNote, "inside"),
                block(BlockType::Paragraph, "> outside"),
            ]
        );
    }

    #[test]
    fn new_sigil_starts_new_callout() {
        assert_eq!(
            parse("> [!NOTE]\n> a\n> [!WARNING]\n> b"),
            vec![
                block(BlockType::CalloutNote, "a"),
                block(BlockType::CalloutWarning, "b"),
            ]
        );
    }

    #[test]
    fn empty_callout_is_dropped() {
        assert_eq!(parse("> [!NOTE]\n\ntext"), vec![block(BlockType::Paragraph, "text")]);
    }

    #[test]
    fn unknown_sigil_is_plain_text() {
        assert_eq!(
            parse("> [!DANGER] boom"),
            vec![block(BlockType::Paragraph, "> [!DANGER] boom")]
        );
    }

    #[rstest]
    #[case("User: hello", BlockType::ChatUser, "hello")]
    #[case("AI: hi there", BlockType::ChatAi, "hi there")]
    #[case("User：**「嘿」**", BlockType::ChatUser, "**「嘿」**")]
    #[case("ai：好", BlockType::ChatAi, "好")]
    fn chat_turns(#[case] input: &str, #[case] block_type: BlockType, #[case] content: &str) {
        assert_eq!(parse(input), vec![block(block_type, content)]);
    }

    #[test]
    fn chat_turn_collects_lines_until_new_speaker() {
        let md = "User: question\nstill asking\nAI: answer\n\nafter";
        assert_eq!(
            parse(md),
            vec![
                block(BlockType::ChatUser, "question\nstill asking"),
                block(BlockType::ChatAi, "answer"),
                block(BlockType::Paragraph, "after"),
            ]
        );
    }

    #[test]
    fn speaker_line_without_text_takes_next_line() {
        assert_eq!(
            parse("AI:\nfirst\nsecond"),
            vec![block(BlockType::ChatAi, "first\nsecond")]
        );
    }

    #[test]
    fn bullet_closes_chat_turn() {
        assert_eq!(
            parse("User: list\n- one"),
            vec![
                block(BlockType::ChatUser, "list"),
                block(BlockType::BulletList, "one"),
            ]
        );
    }

    #[test]
    fn username_prefix_is_not_a_speaker() {
        assert_eq!(
            parse("Username: bob"),
            vec![block(BlockType::Paragraph, "Username: bob")]
        );
    }

    #[test]
    fn fence_inside_paragraph_flow() {
        assert_eq!(
            parse("para\n```\ncode\n```\ntail"),
            vec![
                block(BlockType::Paragraph, "para"),
                block(BlockType::CodeBlock, "code"),
                block(BlockType::Paragraph, "tail"),
            ]
        );
    }

    #[test]
    fn crlf_line_endings() {
        assert_eq!(
            parse("# T\r\nline\r\n"),
            vec![block(BlockType::Heading1, "T"), block(BlockType::Paragraph, "line")]
        );
    }

    #[test]
    fn parse_is_idempotent() {
        let md = "# A\n\ntext **b**\n> [!TIP]\n> tip\nUser: q\nAI: a\n```\nx\n```";
        assert_eq!(parse(md), parse(md));
    }
}
