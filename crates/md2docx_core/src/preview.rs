use serde::Serialize;
use tracing::debug;

use crate::block::{BlockType, ParsedBlock};
use crate::config::Config;
use crate::layout::{StyledRun, layout_block};
use crate::script::{self, Script};
use crate::style::{BlockStyle, LABEL_RUN, RunFonts, RunStyle, font_size, run_style};

/// The on-screen model of a document: what a host draws.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PreviewDocument {
    pub blocks: Vec<PreviewBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewBlock {
    #[serde(rename = "type")]
    pub block_type: BlockType,
    pub style: BlockStyle,
    pub label: Option<Vec<PreviewRun>>,
    pub lines: Vec<Vec<PreviewRun>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewRun {
    pub text: String,
    pub script: Script,
    pub font: String,
    /// Half-points; `None` inherits the block's size.
    pub size: Option<u32>,
    pub style: RunStyle,
}

pub fn render_preview(blocks: &[ParsedBlock], config: &Config) -> PreviewDocument {
    let blocks: Vec<PreviewBlock> = blocks
        .iter()
        .map(|block| preview_block(block, config))
        .collect();
    debug!(blocks = blocks.len(), "rendered preview");
    PreviewDocument { blocks }
}

fn preview_block(block: &ParsedBlock, config: &Config) -> PreviewBlock {
    let layout = layout_block(block, &config.labels);
    let size = font_size(&layout.style, config);

    let label = layout.label.as_deref().map(|text| {
        let fonts = RunFonts::new(LABEL_RUN, config);
        script::segments(text)
            .into_iter()
            .map(|(script, segment)| PreviewRun {
                text: segment.to_string(),
                script,
                font: fonts.family(script).to_string(),
                size: Some(config.font.label_size),
                style: LABEL_RUN,
            })
            .collect()
    });

    let lines = layout
        .lines
        .iter()
        .map(|line| {
            line.iter()
                .map(|run| preview_run(run, &layout.style, size, config))
                .collect()
        })
        .collect();

    PreviewBlock {
        block_type: block.block_type,
        style: layout.style,
        label,
        lines,
    }
}

fn preview_run(
    run: &StyledRun,
    block: &BlockStyle,
    size: Option<u32>,
    config: &Config,
) -> PreviewRun {
    let style = run_style(run.emphasis, block);
    PreviewRun {
        text: run.text.clone(),
        script: run.script,
        font: RunFonts::new(style, config).family(run.script).to_string(),
        size,
        style,
    }
}
