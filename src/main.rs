use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::{debug, info, warn};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fmd_docs::{
    App, Formatter, HtmlFormatter, JsonFormatter, Lexer, ProjectConfig, RawFormatter, Token,
};

#[derive(Parser)]
#[command(name = "fmd-docs")]
#[command(about = "Syntax highlighting for the FMD documentation")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Project configuration file (conf.py, .toml, .yaml or .json)
    #[arg(short, long, global = true)]
    conf: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Highlight source files
    Highlight {
        /// Files to highlight
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Lexer name; picked from each file's extension when omitted
        #[arg(short, long)]
        lexer: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Html)]
        format: OutputFormat,

        /// Emit inline style attributes instead of CSS classes
        #[arg(long)]
        inline_styles: bool,

        /// Write one output file per input into this directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the stylesheet for a style
    Css {
        /// Style name; defaults to the configured `pygments_style`
        #[arg(short, long)]
        style: Option<String>,

        /// CSS selector the rules are scoped under
        #[arg(long, default_value = ".highlight")]
        selector: String,
    },

    /// Report categories a lexer emits that a style does not cover
    CheckStyle {
        #[arg(short, long)]
        style: Option<String>,

        #[arg(short, long, default_value = "cfmd")]
        lexer: String,
    },

    /// List registered lexers
    Lexers,

    /// List registered styles
    Styles,

    /// Print the effective configuration as JSON
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Html,
    Raw,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = load_config(cli.conf.as_deref())?;
    let app = App::from_config(config).context("Failed to set up extensions")?;

    match cli.command {
        Commands::Highlight {
            files,
            lexer,
            format,
            inline_styles,
            output,
        } => {
            let formatter = make_formatter(&app, format, inline_styles)?;
            highlight_files(&app, &files, lexer.as_deref(), formatter.as_ref(), output.as_deref())?;
        }
        Commands::Css { style, selector } => {
            let style = match style {
                Some(name) => app.style(&name)?,
                None => app.active_style()?,
            };
            print!("{}", style.to_css(&selector));
        }
        Commands::CheckStyle { style, lexer } => {
            let style_name = style.unwrap_or_else(|| app.config().style_name().to_string());
            let coverage = app.check_style(&lexer, &style_name)?;
            if coverage.is_complete() {
                println!("Style '{}' covers every category of lexer '{}'", style_name, lexer);
            } else {
                println!("Style '{}' leaves uncovered:", style_name);
                for kind in &coverage.missing {
                    println!("  {}", kind);
                }
                bail!(
                    "style '{}' leaves {} categories uncovered",
                    style_name,
                    coverage.missing.len()
                );
            }
        }
        Commands::Lexers => {
            for name in app.lexer_names() {
                println!("{}", name);
            }
        }
        Commands::Styles => {
            for name in app.style_names() {
                println!("{}", name);
            }
        }
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(app.config())?);
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<ProjectConfig> {
    match path {
        Some(path) => ProjectConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => {
            let config = ProjectConfig::discover(Path::new("."))
                .context("Failed to load configuration from the current directory")?;
            Ok(config.unwrap_or_else(|| {
                debug!("No configuration file found, using defaults");
                ProjectConfig::default()
            }))
        }
    }
}

fn make_formatter(
    app: &App,
    format: OutputFormat,
    inline_styles: bool,
) -> Result<Box<dyn Formatter>> {
    Ok(match format {
        OutputFormat::Html => {
            Box::new(HtmlFormatter::new(app.active_style()?).inline_styles(inline_styles))
        }
        OutputFormat::Raw => Box::new(RawFormatter),
        OutputFormat::Json => Box::new(JsonFormatter { pretty: true }),
    })
}

fn highlight_files(
    app: &App,
    files: &[PathBuf],
    lexer: Option<&str>,
    formatter: &dyn Formatter,
    output: Option<&Path>,
) -> Result<()> {
    if let Some(dir) = output {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    }

    let rendered: Vec<Result<(PathBuf, String)>> = files
        .par_iter()
        .map(|path| {
            let lexer = pick_lexer(app, path, lexer)?;
            let source = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let tokens: Vec<Token<'_>> = lexer.tokens(&source).collect();
            debug!(
                "Lexed {} into {} tokens with '{}'",
                path.display(),
                tokens.len(),
                lexer.name()
            );
            let text = formatter.format(&tokens)?;
            Ok((path.clone(), text))
        })
        .collect();

    let mut failures = 0;
    for result in rendered {
        match result {
            Ok((path, text)) => match output {
                Some(dir) => {
                    let target = output_path(dir, &path, formatter.extension());
                    fs::write(&target, text)
                        .with_context(|| format!("Failed to write {}", target.display()))?;
                    info!("Wrote {}", target.display());
                }
                None => print!("{}", text),
            },
            Err(e) => {
                warn!("{:#}", e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} files could not be highlighted", failures, files.len());
    }
    Ok(())
}

fn pick_lexer(app: &App, path: &Path, requested: Option<&str>) -> Result<Arc<dyn Lexer>> {
    if let Some(name) = requested {
        return Ok(app.lexer(name)?);
    }
    Ok(app.lexer_for_filename(path).unwrap_or_else(|| {
        warn!(
            "No lexer for {}, using the configured highlight language",
            path.display()
        );
        app.lexer_for_block(None)
    }))
}

fn output_path(dir: &Path, input: &Path, extension: &str) -> PathBuf {
    let file_name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "stdin".to_string());
    dir.join(format!("{}.{}", file_name, extension))
}
