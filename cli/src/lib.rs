use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use futures::StreamExt;
use slide_chatgpt::OpenAiStructuredClient;
use slide_common::{OutlineRequest, SlideConfig};
use slide_core::{OutlineConfig, OutlineGenerator, PresentationOutline};
use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "slide")]
#[command(about = "AI-powered slide outline generation")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug output
    #[arg(long, global = true)]
    pub debug: bool,

    /// Override model (e.g., gpt-4o, gpt-4o-mini)
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Read configuration from this file instead of the default locations
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a presentation outline
    Outline(OutlineArgs),
}

#[derive(Args, Debug)]
pub struct OutlineArgs {
    /// What the presentation is about
    #[arg(default_value = "")]
    pub content: String,
    /// Number of slides to generate
    #[arg(short = 'n', long = "slides", default_value_t = 8)]
    pub n_slides: usize,
    /// Output language
    #[arg(short, long)]
    pub language: Option<String>,
    /// Extra material to spread across the slides
    #[arg(long)]
    pub context: Option<String>,
    #[arg(long)]
    pub tone: Option<String>,
    #[arg(long)]
    pub verbosity: Option<String>,
    /// Free-form instructions for the model
    #[arg(long)]
    pub instructions: Option<String>,
    /// Do not require a title slide
    #[arg(long)]
    pub no_title_slide: bool,
    /// Allow the model to search the web
    #[arg(long)]
    pub web_search: bool,
    /// Stream raw JSON instead of rendering Markdown
    #[arg(long)]
    pub json: bool,
}

impl OutlineArgs {
    fn into_request(self) -> OutlineRequest {
        OutlineRequest {
            content: self.content,
            n_slides: self.n_slides,
            language: self.language,
            additional_context: self.context,
            tone: self.tone,
            verbosity: self.verbosity,
            instructions: self.instructions,
            include_title_slide: !self.no_title_slide,
            web_search: self.web_search,
        }
    }
}

pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let mut config = match &cli.config {
        Some(path) => SlideConfig::load_from_file(path)?,
        None => SlideConfig::load_with_fallback(),
    };
    config.apply_env();
    if let Some(model) = cli.model {
        config.model = model;
    }

    match cli.command {
        Commands::Outline(args) => generate_outline(&config, args).await,
    }
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();
}

async fn generate_outline(config: &SlideConfig, args: OutlineArgs) -> Result<()> {
    let json = args.json;
    let client = OpenAiStructuredClient::new(config)?;
    let generator = OutlineGenerator::new(Arc::new(client), OutlineConfig::from(config));
    let mut stream = generator.generate(args.into_request());

    let mut stdout = std::io::stdout();
    let mut buffer = String::new();
    while let Some(item) = stream.next().await {
        match item {
            Ok(chunk) => {
                tracing::trace!(len = chunk.text.len(), "outline chunk");
                if json {
                    stdout.write_all(chunk.text.as_bytes())?;
                    stdout.flush()?;
                }
                buffer.push_str(&chunk.text);
            }
            Err(e) => bail!("outline generation failed ({}): {}", e.status, e.detail),
        }
    }

    if json {
        writeln!(stdout)?;
    } else {
        writeln!(stdout, "{}", render_outline(&buffer))?;
    }
    Ok(())
}

/// Markdown for a completed outline, or the raw text if it does not parse.
fn render_outline(text: &str) -> String {
    match PresentationOutline::parse(text) {
        Ok(outline) => outline.to_markdown(),
        Err(e) => {
            tracing::warn!(error = %e, "outline is not valid JSON, printing raw output");
            text.to_string()
        }
    }
}
