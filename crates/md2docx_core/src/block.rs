use serde::{Deserialize, Serialize};

/// Block-level element kinds recognised by the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlockType {
    Heading1,
    Heading2,
    Heading3,
    Paragraph,
    CodeBlock,
    BulletList,
    ChatUser,
    ChatAi,
    CalloutNote,
    CalloutTip,
    CalloutWarning,
}

impl BlockType {
    pub const ALL: [BlockType; 11] = [
        BlockType::Heading1,
        BlockType::Heading2,
        BlockType::Heading3,
        BlockType::Paragraph,
        BlockType::CodeBlock,
        BlockType::BulletList,
        BlockType::ChatUser,
        BlockType::ChatAi,
        BlockType::CalloutNote,
        BlockType::CalloutTip,
        BlockType::CalloutWarning,
    ];

    /// The stable tag used when blocks cross a serialization boundary.
    pub fn tag(self) -> &'static str {
        match self {
            BlockType::Heading1 => "HEADING_1",
            BlockType::Heading2 => "HEADING_2",
            BlockType::Heading3 => "HEADING_3",
            BlockType::Paragraph => "PARAGRAPH",
            BlockType::CodeBlock => "CODE_BLOCK",
            BlockType::BulletList => "BULLET_LIST",
            BlockType::ChatUser => "CHAT_USER",
            BlockType::ChatAi => "CHAT_AI",
            BlockType::CalloutNote => "CALLOUT_NOTE",
            BlockType::CalloutTip => "CALLOUT_TIP",
            BlockType::CalloutWarning => "CALLOUT_WARNING",
        }
    }

    /// Look up a block type by tag. Tags this version does not know about
    /// come back as `Paragraph` so newer block kinds still render.
    pub fn from_tag(tag: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|ty| ty.tag() == tag)
            .unwrap_or(BlockType::Paragraph)
    }
}

impl From<String> for BlockType {
    fn from(tag: String) -> Self {
        BlockType::from_tag(&tag)
    }
}

impl From<BlockType> for String {
    fn from(ty: BlockType) -> Self {
        ty.tag().to_string()
    }
}

/// A typed block with block markers stripped and inline markers kept
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedBlock {
    #[serde(rename = "type")]
    pub block_type: BlockType,
    pub content: String,
}

impl ParsedBlock {
    pub fn new(block_type: BlockType, content: impl Into<String>) -> Self {
        Self {
            block_type,
            content: content.into(),
        }
    }
}
