//! epitome CLI: condense one PDF book into a target-length summary.

use std::path::PathBuf;

use clap::Parser;
use miette::{IntoDiagnostic, Result};

use epitome::config::RunConfig;
use epitome::embed::OllamaEmbedder;
use epitome::extract::PdfPageExtractor;
use epitome::llm::OllamaClient;
use epitome::pipeline;

#[derive(Parser)]
#[command(
    name = "epitome",
    version,
    about = "RAG-assisted book condenser: PDF in, target-length summary out"
)]
struct Cli {
    /// Path to the input PDF.
    input: PathBuf,

    /// Optional TOML config file; CLI flags override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory the summary files are written into.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Target total word count for the whole summary.
    #[arg(long)]
    target_words: Option<usize>,

    /// Context sections retrieved per section.
    #[arg(long)]
    top_k: Option<usize>,

    /// Book title used in prompts and on the summary's title line.
    #[arg(long)]
    title: Option<String>,

    /// Completion model name.
    #[arg(long)]
    model: Option<String>,

    /// Embedding model name.
    #[arg(long)]
    embed_model: Option<String>,

    /// Base URL of the Ollama server (used for both completion and embedding).
    #[arg(long)]
    base_url: Option<String>,
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => RunConfig::from_file(path).into_diagnostic()?,
        None => RunConfig::default(),
    };
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }
    if let Some(words) = cli.target_words {
        config.target_total_words = words;
    }
    if let Some(top_k) = cli.top_k {
        config.top_k = top_k;
    }
    if let Some(title) = cli.title {
        config.book_title = Some(title);
    }
    if let Some(model) = cli.model {
        config.completion.model = model;
    }
    if let Some(model) = cli.embed_model {
        config.embedding.model = model;
    }
    if let Some(url) = cli.base_url {
        config.completion.base_url = url.clone();
        config.embedding.base_url = url;
    }

    let extractor = PdfPageExtractor::new();
    let embedder = OllamaEmbedder::new(config.embedding.clone());
    let completion = OllamaClient::new(config.completion.clone());

    if !completion.probe() {
        eprintln!(
            "warning: no completion server at {} — sections will fail with visible placeholders",
            config.completion.base_url
        );
    }

    let report = pipeline::run(&extractor, &embedder, &completion, &cli.input, &config)
        .into_diagnostic()?;

    println!(
        "Summarized {} section(s), {} word(s) total ({} failed)",
        report.section_count, report.total_words, report.failed_count
    );
    println!("Text summary: {}", report.txt_path.display());
    println!("PDF summary:  {}", report.pdf_path.display());
    Ok(())
}
