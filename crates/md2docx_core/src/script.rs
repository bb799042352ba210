use serde::Serialize;

/// Which font slot a piece of text belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Script {
    Latin,
    Cjk,
}

pub fn is_cjk(ch: char) -> bool {
    matches!(ch as u32,
        0x1100..=0x11FF       // Hangul Jamo
        | 0x2E80..=0x2FDF     // CJK radicals, Kangxi
        | 0x3000..=0x303F     // CJK symbols and punctuation
        | 0x3040..=0x30FF     // Hiragana, Katakana
        | 0x3100..=0x31FF     // Bopomofo, Hangul compatibility, Kanbun
        | 0x3200..=0x33FF     // enclosed CJK, compatibility
        | 0x3400..=0x4DBF     // extension A
        | 0x4E00..=0x9FFF     // unified ideographs
        | 0xA960..=0xA97F
        | 0xAC00..=0xD7AF     // Hangul syllables
        | 0xF900..=0xFAFF     // compatibility ideographs
        | 0xFE30..=0xFE4F     // compatibility forms
        | 0xFF00..=0xFFEF     // full-width forms
        | 0x20000..=0x2FFFF)
}

fn script_of(ch: char) -> Option<Script> {
    if is_cjk(ch) {
        Some(Script::Cjk)
    } else if ch.is_whitespace() {
        None
    } else {
        Some(Script::Latin)
    }
}

/// Split `text` into maximal same-script segments. Whitespace joins the
/// segment before it; leading whitespace is Latin.
pub fn segments(text: &str) -> Vec<(Script, &str)> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut current: Option<Script> = None;

    for (idx, ch) in text.char_indices() {
        let Some(script) = script_of(ch) else { continue };
        match current {
            Some(cur) if cur != script => {
                out.push((cur, &text[start..idx]));
                start = idx;
                current = Some(script);
            }
            Some(_) => {}
            None => {
                if idx > 0 && script == Script::Cjk {
                    out.push((Script::Latin, &text[..idx]));
                    start = idx;
                }
                current = Some(script);
            }
        }
    }

    if start < text.len() {
        out.push((current.unwrap_or(Script::Latin), &text[start..]));
    }
    out
}
