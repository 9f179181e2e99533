use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "seoscope", version, about = "On-page SEO checks for a single URL")]
pub struct Cli {
    /// YAML config file. Without it `seoscope.yaml` is used when present.
    #[arg(long, global = true, env = "SEOSCOPE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Cmd>,
}

#[derive(Debug, Subcommand)]
pub enum Cmd {
    /// Analyze one page and print the report.
    Check {
        /// Page to analyze; `https://` is assumed when no scheme is given.
        url: String,
        /// Keyword to look for. Repeatable.
        #[arg(short = 'k', long = "keyword")]
        keywords: Vec<String>,
        /// File with one keyword per line.
        #[arg(long)]
        keywords_file: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Interactive terminal UI (default).
    Tui,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Newline-joined keyword text from `-k` flags followed by the file's lines.
pub fn keyword_text(flags: &[String], file: Option<&Path>) -> Result<String> {
    let mut lines: Vec<String> = flags.to_vec();
    if let Some(path) = file {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading keywords from {}", path.display()))?;
        lines.extend(contents.lines().map(str::to_string));
    }
    Ok(lines.join("\n"))
}
