//! Inline span tokenizer.
//!
//! One expression, three alternatives. Each alternative starts with a
//! different character, so the leftmost match at any position is the only
//! candidate. None of them crosses a line break.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static SPAN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*\*(?P<bold>[^\n]+?)\*\*|`(?P<code>[^`\n]+)`|【(?P<term>[^\n]+?)】")
        .expect("inline span pattern is valid")
});

/// A styled run of a block's content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum InlineSpan {
    Plain(String),
    Bold(String),
    Code(String),
    Term(String),
}

impl InlineSpan {
    pub fn text(&self) -> &str {
        match self {
            InlineSpan::Plain(text)
            | InlineSpan::Bold(text)
            | InlineSpan::Code(text)
            | InlineSpan::Term(text) => text,
        }
    }
}

/// Split `content` into spans. Unmatched markers stay in `Plain` spans.
pub fn tokenize(content: &str) -> Vec<InlineSpan> {
    let mut spans = Vec::new();
    let mut last = 0;

    for caps in SPAN_PATTERN.captures_iter(content) {
        let Some(whole) = caps.get(0) else { continue };
        let span = if let Some(m) = caps.name("bold") {
            InlineSpan::Bold(m.as_str().to_string())
        } else if let Some(m) = caps.name("code") {
            InlineSpan::Code(m.as_str().to_string())
        } else if let Some(m) = caps.name("term") {
            InlineSpan::Term(m.as_str().to_string())
        } else {
            continue;
        };

        push_plain(&mut spans, &content[last..whole.start()]);
        spans.push(span);
        last = whole.end();
    }

    push_plain(&mut spans, &content[last..]);
    spans
}

fn push_plain(spans: &mut Vec<InlineSpan>, text: &str) {
    if !text.is_empty() {
        spans.push(InlineSpan::Plain(text.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use InlineSpan::{Bold, Code, Plain, Term};

    fn s(text: &str) -> String {
        text.to_string()
    }

    #[test]
    fn all_three_kinds() {
        assert_eq!(
            tokenize("**bold** and `code` and 【Term】"),
            vec![
                Bold(s("bold")),
                Plain(s(" and ")),
                Code(s("code")),
                Plain(s(" and ")),
                Term(s("Term")),
            ]
        );
    }

    #[test]
    fn empty_content() {
        assert_eq!(tokenize(""), vec![]);
    }

    #[test]
    fn plain_only() {
        assert_eq!(tokenize("just text"), vec![Plain(s("just text"))]);
    }

    #[rstest]
    #[case("a ** b", vec![Plain(s("a ** b"))])]
    #[case("****", vec![Plain(s("****"))])]
    #[case("`` empty", vec![Plain(s("`` empty"))])]
    #[case("【】", vec![Plain(s("【】"))])]
    #[case("half `open", vec![Plain(s("half `open"))])]
    #[case("x 【open", vec![Plain(s("x 【open"))])]
    fn unmatched_markers_stay_literal(#[case] input: &str, #[case] expected: Vec<InlineSpan>) {
        assert_eq!(tokenize(input), expected);
    }

    #[test]
    fn bold_is_non_greedy() {
        assert_eq!(
            tokenize("**a** b **c**"),
            vec![Bold(s("a")), Plain(s(" b ")), Bold(s("c"))]
        );
    }

    #[test]
    fn markers_do_not_cross_lines() {
        assert_eq!(tokenize("**a\nb**"), vec![Plain(s("**a\nb**"))]);
        assert_eq!(tokenize("`a\nb`"), vec![Plain(s("`a\nb`"))]);
    }

    #[test]
    fn leftmost_match_wins() {
        // The code span starts first, so the stars inside it are code text.
        assert_eq!(
            tokenize("`**not bold**` **bold**"),
            vec![Code(s("**not bold**")), Plain(s(" ")), Bold(s("bold"))]
        );
    }

    #[test]
    fn term_keeps_inner_punctuation() {
        assert_eq!(
            tokenize("**【ChiYu 的專業小補充】**"),
            vec![Bold(s("【ChiYu 的專業小補充】"))]
        );
        assert_eq!(
            tokenize("按下【設定 > 進階（Advanced）】"),
            vec![Plain(s("按下")), Term(s("設定 > 進階（Advanced）"))]
        );
    }

    #[test]
    fn span_text_accessor() {
        assert_eq!(Term(s("x")).text(), "x");
        assert_eq!(Plain(s("y")).text(), "y");
    }
}
