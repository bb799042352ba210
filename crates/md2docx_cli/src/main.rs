use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use md2docx_core::{Config, Exporter};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "md2docx")]
#[command(about = "Convert technical manuscripts in Markdown to DOCX")]
struct Cli {
    /// Input Markdown file
    input: PathBuf,

    /// Output DOCX file (defaults to input name with .docx extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// TOML config overriding the built-in defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Also write print-layout preview pages as SVG into this directory
    #[arg(long)]
    preview_dir: Option<PathBuf>,

    /// Print the parsed blocks as JSON instead of exporting
    #[arg(long)]
    blocks: bool,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => Config::load_from_path(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::compiled_default(),
    };

    let markdown = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let blocks = md2docx_core::parse(&markdown);

    if cli.blocks {
        let json = serde_json::to_string_pretty(&blocks).context("failed to serialize blocks")?;
        println!("{json}");
        return Ok(());
    }

    if let Some(dir) = &cli.preview_dir {
        let svg = md2docx_core::markdown_to_svg_with_config(&markdown, &config)?;
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
        for (idx, page) in svg.pages.iter().enumerate() {
            let path = dir.join(format!("page-{}.svg", idx + 1));
            fs::write(&path, page)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        info!(pages = svg.pages.len(), dir = %dir.display(), "wrote preview");
    }

    let output = cli
        .output
        .unwrap_or_else(|| cli.input.with_extension("docx"));

    let exporter = Exporter::new(config);
    let bytes = exporter.export(blocks).await?;
    fs::write(&output, bytes).with_context(|| format!("failed to write {}", output.display()))?;

    println!("Created {}", output.display());
    Ok(())
}
