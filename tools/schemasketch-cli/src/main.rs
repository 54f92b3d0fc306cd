use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use schemasketch::{ExampleSynthesizer, Mode, SchemaParser, SchemaRenderer};

#[derive(Parser)]
#[command(name = "schemasketch")]
#[command(about = "Sample and outline OpenAPI / JSON Schema documents")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print an example value for a schema
    Example {
        /// Schema document (JSON, or YAML by extension)
        file: PathBuf,
        /// JSON pointer to the schema inside the document
        #[arg(short, long, default_value = "")]
        pointer: String,
        /// Which side of the API the example is for
        #[arg(short, long, value_enum, default_value_t = ModeArg::Read)]
        mode: ModeArg,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Print a text outline of a schema
    Render {
        /// Schema document (JSON, or YAML by extension)
        file: PathBuf,
        /// JSON pointer to the schema inside the document
        #[arg(short, long, default_value = "")]
        pointer: String,
        /// Which side of the API the outline is for
        #[arg(short, long, value_enum, default_value_t = ModeArg::Read)]
        mode: ModeArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Read,
    Write,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Read => Mode::Read,
            ModeArg::Write => Mode::Write,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

fn init_tracing() -> Result<()> {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(directives.as_deref()))
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing subscriber: {e}"))
}

/// RUST_LOG directives when set and valid, otherwise warnings and errors only
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

fn load_document(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    debug!(path = %path.display(), is_yaml, "loading schema document");

    if is_yaml {
        serde_yaml::from_str(&text).with_context(|| format!("Invalid YAML in {}", path.display()))
    } else {
        serde_json::from_str(&text).with_context(|| format!("Invalid JSON in {}", path.display()))
    }
}

fn main() -> Result<()> {
    init_tracing()?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Example {
            file,
            pointer,
            mode,
            format,
        } => {
            let document = load_document(&file)?;
            let graph = SchemaParser::new()
                .parse_at(&document, &pointer)
                .context("Failed to build schema graph")?;
            let example = ExampleSynthesizer::new()
                .synthesize(&graph, mode.into())
                .context("Failed to synthesize example")?;

            let output = match format {
                OutputFormat::Json => serde_json::to_string_pretty(&example)?,
                OutputFormat::Yaml => serde_yaml::to_string(&example)?,
            };
            println!("{}", output.trim_end());
        }
        Commands::Render {
            file,
            pointer,
            mode,
        } => {
            let document = load_document(&file)?;
            let graph = SchemaParser::new()
                .parse_at(&document, &pointer)
                .context("Failed to build schema graph")?;
            let outline = SchemaRenderer::new()
                .render(&graph, mode.into())
                .context("Failed to render schema")?;
            println!("{}", outline);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn test_log_filter_honors_directives() {
        assert_eq!(log_filter(Some("debug")).max_level_hint(), Some(LevelFilter::DEBUG));
        assert_eq!(
            log_filter(Some("schemasketch=trace")).max_level_hint(),
            Some(LevelFilter::TRACE)
        );
    }

    #[test]
    fn test_log_filter_defaults_to_warn() {
        assert_eq!(log_filter(None).max_level_hint(), Some(LevelFilter::WARN));
    }
}
