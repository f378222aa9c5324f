//! chatdown - Export AI chat pages to Markdown

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use url::Url;

use chatdown::export::{DirEmitter, FileEmitter, NOTHING_FOUND, StdoutEmitter};
use chatdown::{Config, ExportOutcome, Exporter, Layout, Page};

#[derive(Parser)]
#[command(name = "chatdown")]
#[command(version, about = "Export AI chat conversations to Markdown", long_about = None)]
#[command(after_help = "EXAMPLES:
    chatdown chat.html                      Write <title>.md to the current directory
    chatdown chat.html -o notes/            Write into notes/
    chatdown chat.html --stdout             Print the Markdown
    chatdown page.html --layout gemini      Force the Gemini layout
    chatdown -i chat.html --json            Show what would be exported")]
struct Cli {
    /// Saved chat page (HTML)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output directory
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    output: PathBuf,

    /// Print the Markdown instead of writing a file
    #[arg(long, conflicts_with = "output")]
    stdout: bool,

    /// URL the page was saved from (selects the layout, resolves links)
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Page layout, overriding detection from the URL
    #[arg(long, value_name = "LAYOUT")]
    layout: Option<Layout>,

    /// Title used for the output filename
    #[arg(long, value_name = "TITLE")]
    title: Option<String>,

    /// Configuration file (TOML)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Show what would be exported without exporting
    #[arg(short, long)]
    info: bool,

    /// Print info as JSON
    #[arg(long, requires = "info")]
    json: bool,

    /// Suppress output messages
    #[arg(short, long)]
    quiet: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = if cli.info {
        show_info(&cli)
    } else {
        export(&cli)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load(cli: &Cli) -> chatdown::Result<(Config, Page, Layout)> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let bytes = fs::read(&cli.input)?;
    let mut page = Page::from_bytes(&bytes);
    if let Some(url) = &cli.url {
        page = page.with_url(Url::parse(url)?);
    }

    let layout = cli.layout.unwrap_or_else(|| page.layout());
    tracing::debug!(input = %cli.input.display(), layout = %layout, "loaded page");

    Ok((config, page, layout))
}

fn show_info(cli: &Cli) -> chatdown::Result<()> {
    let (config, page, layout) = load(cli)?;
    let located = Exporter::new(&config)?.locator().locate(&page, layout);
    let title = cli.title.as_deref().unwrap_or(&located.title);

    if cli.json {
        let info = serde_json::json!({
            "file": cli.input.display().to_string(),
            "platform": located.platform,
            "title": title,
            "url": page.url().map(Url::as_str),
            "turns": located.turns.len(),
        });
        println!("{info:#}");
    } else {
        println!("File: {}", cli.input.display());
        println!("Platform: {}", located.platform);
        println!("Title: {title}");
        if let Some(url) = page.url() {
            println!("URL: {url}");
        }
        println!("Turns: {}", located.turns.len());
    }

    Ok(())
}

fn export(cli: &Cli) -> chatdown::Result<()> {
    let (config, page, layout) = load(cli)?;
    let exporter = Exporter::new(&config)?;

    let dir_emitter;
    let emitter: &dyn FileEmitter = if cli.stdout {
        &StdoutEmitter
    } else {
        dir_emitter = DirEmitter::new(&cli.output);
        &dir_emitter
    };

    match exporter.run(&page, layout, cli.title.as_deref(), emitter)? {
        ExportOutcome::NothingFound => eprintln!("{NOTHING_FOUND}"),
        ExportOutcome::Exported(doc) => {
            if !cli.quiet && !cli.stdout {
                eprintln!("wrote {}", cli.output.join(doc.filename()).display());
            }
        }
    }

    Ok(())
}

