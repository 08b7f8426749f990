use clap::Parser;
use color_eyre::eyre::{Context, Result};
use quill_cli::{Cli, Command, format_toc_tree};
use quill_lib::article::{ArticleService, MemoryRepository};
use quill_lib::markdown::highlighting::{CodeTheme, ThemeSource};
use quill_lib::markdown::{MarkdownPipeline, PipelineConfig, SlugPolicy};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing subscriber based on verbosity level.
///
/// Verbosity levels:
/// - 0 (default): no subscriber
/// - 1 (-v): INFO (configuration, highlighter startup)
/// - 2 (-vv): DEBUG (fallbacks, page rendering)
/// - 3 (-vvv): TRACE
/// - 4+ (-vvvv): TRACE with file/line numbers
fn init_tracing(verbose: u8) {
    if verbose == 0 {
        return;
    }

    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            1 => "warn,quill=info,quill_lib=info".to_string(),
            2 => "info,quill=debug,quill_lib=debug".to_string(),
            _ => "debug,quill=trace,quill_lib=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(false)
                .with_file(verbose >= 4)
                .with_line_number(verbose >= 4)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

/// Environment configuration with command-line overrides applied.
fn pipeline_config(cli: &Cli) -> PipelineConfig {
    let mut config = PipelineConfig::from_env();
    if let Some(path) = &cli.theme_file {
        config = config.with_theme(ThemeSource::File(path.clone()));
    } else if let Some(theme) = cli.theme {
        config = config.with_theme(ThemeSource::Embedded(theme));
    }
    if cli.unique_slugs {
        config = config.with_slug_policy(SlugPolicy::Unique);
    }
    config
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Command::Themes => {
            list_themes();
            Ok(())
        }
        Command::Render { input, toc, json } => {
            let pipeline = MarkdownPipeline::new(pipeline_config(&cli));
            let content = load_markdown(input.as_ref())?;
            render(&pipeline, &content, *toc, *json)
        }
        Command::Article { export, key } => {
            let pipeline = MarkdownPipeline::new(pipeline_config(&cli));
            article(&pipeline, export, key)
        }
        Command::Articles { export } => {
            let pipeline = MarkdownPipeline::new(pipeline_config(&cli));
            articles(&pipeline, export)
        }
    }
}

fn render(pipeline: &MarkdownPipeline, content: &str, toc: bool, json: bool) -> Result<()> {
    match (toc, json) {
        (true, true) => {
            let entries = pipeline.toc(content);
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        (true, false) => {
            print!("{}", format_toc_tree(&pipeline.toc(content)));
        }
        (false, true) => {
            let doc = pipeline
                .render_document(content)
                .wrap_err("Failed to render document")?;
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        (false, false) => {
            let html = pipeline
                .render(content)
                .wrap_err("Failed to render document")?;
            print!("{}", html);
        }
    }
    Ok(())
}

fn load_service<'p>(
    pipeline: &'p MarkdownPipeline,
    export: &Path,
) -> Result<ArticleService<'p, MemoryRepository>> {
    let repo = MemoryRepository::from_path(export)
        .wrap_err_with(|| format!("Failed to load articles from {:?}", export))?;
    Ok(ArticleService::with_pipeline(repo, pipeline))
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .wrap_err("Failed to start runtime")
}

fn articles(pipeline: &MarkdownPipeline, export: &Path) -> Result<()> {
    let service = load_service(pipeline, export)?;
    let items = runtime()?
        .block_on(service.list())
        .wrap_err("Failed to list articles")?;

    println!("{}", serde_json::to_string_pretty(&items)?);
    Ok(())
}

fn article(pipeline: &MarkdownPipeline, export: &Path, key: &str) -> Result<()> {
    let service = load_service(pipeline, export)?;
    let page = runtime()?
        .block_on(service.page(key))
        .wrap_err_with(|| format!("Failed to render article {:?}", key))?;

    println!("{}", serde_json::to_string_pretty(&page)?);
    Ok(())
}

/// Loads markdown from a file path or stdin.
fn load_markdown(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(p) if p.to_str() != Some("-") => std::fs::read_to_string(p)
            .wrap_err_with(|| format!("Failed to read file: {:?}", p)),
        _ => read_from_stdin(),
    }
}

/// Reads markdown content from stdin.
fn read_from_stdin() -> Result<String> {
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .wrap_err("Failed to read from stdin")?;
    Ok(buffer)
}

/// Lists all selectable code themes with descriptions.
fn list_themes() {
    println!("Available themes:\n");
    for theme in CodeTheme::all() {
        let marker = if *theme == CodeTheme::default() { "*" } else { " " };
        println!("{} {:20} {}", marker, theme.kebab_name(), theme.description());
    }
    println!("\nUse --theme <name> to pick a code theme (* marks the default)");
    println!("Use --theme-file <path> to load a .tmTheme file");
}
