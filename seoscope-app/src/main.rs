use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Cmd, OutputFormat, keyword_text};
use seoscope_common::observability::init_logging;
use seoscope_web::KeywordSet;
use std::process::ExitCode;
mod cli;
mod wiring;

/// Exit status when the page could not be fetched.
const FETCH_FAILED: u8 = 2;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // 1) Load config (env wins)
    let cfg = wiring::load_config(cli.config.as_deref())?;

    // 2) Logging; stderr would tear the alternate screen in TUI mode
    let mut log = wiring::log_config(&cfg);
    if !matches!(cli.command, Some(Cmd::Check { .. })) {
        log.emit_stderr = false;
    }
    let log_path = init_logging(log)?;
    tracing::info!(log_file=%log_path.display(), "seoscope.start");

    let analyzer = wiring::build_analyzer(&cfg)?;

    match cli.command {
        Some(Cmd::Check {
            url,
            keywords,
            keywords_file,
            format,
        }) => {
            let text = keyword_text(&keywords, keywords_file.as_deref())?;
            match analyzer.analyze(&url, &KeywordSet::parse(&text)).await {
                Ok(report) => {
                    match format {
                        OutputFormat::Text => println!("{report}"),
                        OutputFormat::Json => println!(
                            "{}",
                            serde_json::to_string_pretty(&report)
                                .context("serializing report")?
                        ),
                    }
                    Ok(ExitCode::SUCCESS)
                }
                Err(err) => {
                    eprintln!("Fetch failed: {err}");
                    Ok(ExitCode::from(FETCH_FAILED))
                }
            }
        }
        Some(Cmd::Tui) | None => {
            seoscope_tui::run(analyzer).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
