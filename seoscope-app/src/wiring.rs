use anyhow::{Context, Result};
use seoscope_common::observability::{LogConfig, LogFormat};
use seoscope_config::{LogFormatSetting, SeoscopeConfig, SeoscopeConfigLoader};
use seoscope_http::{FetchSettings, HttpClient};
use seoscope_web::{Analyzer, Thresholds};
use std::{path::Path, sync::Arc, time::Duration};

const DEFAULT_CONFIG_FILE: &str = "seoscope.yaml";

/// Load config; env wins over the file. An explicit path must exist.
pub fn load_config(explicit: Option<&Path>) -> Result<SeoscopeConfig> {
    let loader = match explicit {
        Some(path) => SeoscopeConfigLoader::new().with_file(path),
        None => SeoscopeConfigLoader::new().with_optional_file(DEFAULT_CONFIG_FILE),
    };
    loader.load().with_context(|| match explicit {
        Some(path) => format!("loading config from {}", path.display()),
        None => format!("loading config ({DEFAULT_CONFIG_FILE} + environment)"),
    })
}

pub fn log_config(cfg: &SeoscopeConfig) -> LogConfig {
    LogConfig {
        log_dir: cfg.logging.dir.clone(),
        emit_stderr: cfg.logging.emit_stderr,
        format: match cfg.logging.format {
            LogFormatSetting::Text => LogFormat::Text,
            LogFormatSetting::Json => LogFormat::Json,
        },
        default_filter: cfg.logging.filter.clone(),
        ..LogConfig::default()
    }
}

pub fn build_analyzer(cfg: &SeoscopeConfig) -> Result<Analyzer> {
    let settings = FetchSettings {
        timeout: Duration::from_secs(cfg.fetch.timeout_secs),
        connect_timeout: Duration::from_secs(cfg.fetch.connect_timeout_secs),
        user_agent: cfg.fetch.user_agent.clone(),
    };
    let client = HttpClient::from_settings(&settings).context("building HTTP client")?;
    let thresholds = Thresholds {
        title_min: cfg.checks.title_min,
        title_max: cfg.checks.title_max,
        meta_min: cfg.checks.meta_min,
        meta_max: cfg.checks.meta_max,
    };

    Ok(Analyzer::new(Arc::new(client))
        .with_thresholds(thresholds)
        .with_default_scheme(cfg.fetch.default_scheme.clone()))
}
