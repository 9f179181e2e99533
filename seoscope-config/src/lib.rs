//! Loader for seoscope configuration with YAML + environment overlays.
//!
//! Every section and field is optional; an empty source set yields
//! [`SeoscopeConfig::default`]. Environment variables use the `SEOSCOPE`
//! prefix with `__` as both prefix and nesting separator, e.g.
//! `SEOSCOPE__FETCH__TIMEOUT_SECS=5`. String values may reference other
//! variables as `${VAR}`; expansion runs after all sources are merged.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
const ENV_PREFIX: &str = "SEOSCOPE";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SeoscopeConfig {
    pub version: Option<String>,
    pub fetch: FetchConfig,
    pub checks: ChecksConfig,
    pub logging: LoggingConfig,
}

/// Page fetcher knobs.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Whole-request timeout.
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub user_agent: String,
    /// Scheme prepended to URLs typed without one.
    pub default_scheme: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            connect_timeout_secs: 5,
            user_agent: default_user_agent(),
            default_scheme: "https".into(),
        }
    }
}

/// Length thresholds for the title and meta-description checks.
///
/// Comparisons are strict: a length equal to a bound is acceptable.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ChecksConfig {
    pub title_min: usize,
    pub title_max: usize,
    pub meta_min: usize,
    pub meta_max: usize,
}

impl Default for ChecksConfig {
    fn default() -> Self {
        Self {
            title_min: 40,
            title_max: 60,
            meta_min: 70,
            meta_max: 160,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormatSetting {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub dir: Option<PathBuf>,
    pub format: LogFormatSetting,
    pub emit_stderr: bool,
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: None,
            format: LogFormatSetting::Text,
            emit_stderr: false,
            filter: "info".into(),
        }
    }
}

fn default_user_agent() -> String {
    format!("seoscope/{}", env!("CARGO_PKG_VERSION"))
}

impl SeoscopeConfig {
    /// Reject settings no analysis could run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fetch.timeout_secs == 0 {
            return Err(ConfigError::Message(
                "fetch.timeout_secs must be greater than zero".into(),
            ));
        }
        if self.fetch.default_scheme.trim().is_empty() {
            return Err(ConfigError::Message(
                "fetch.default_scheme must not be empty".into(),
            ));
        }
        if self.checks.title_min > self.checks.title_max {
            return Err(ConfigError::Message(format!(
                "checks.title_min ({}) exceeds checks.title_max ({})",
                self.checks.title_min, self.checks.title_max
            )));
        }
        if self.checks.meta_min > self.checks.meta_max {
            return Err(ConfigError::Message(format!(
                "checks.meta_min ({}) exceeds checks.meta_max ({})",
                self.checks.meta_min, self.checks.meta_max
            )));
        }
        Ok(())
    }
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct SeoscopeConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for SeoscopeConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SeoscopeConfigLoader {
    /// Start with no files; `SEOSCOPE__` env overrides are applied at [`load`](Self::load).
    ///
    /// ```
    /// use seoscope_config::SeoscopeConfigLoader;
    ///
    /// let config = SeoscopeConfigLoader::new()
    ///     .with_yaml_str("version: '1'")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.version.as_deref(), Some("1"));
    /// assert_eq!(config.checks.title_min, 40);
    /// assert_eq!(config.fetch.timeout_secs, 10);
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a YAML/TOML/JSON file that must exist; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that is silently skipped when absent.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    ///
    /// ```
    /// use seoscope_config::{LogFormatSetting, SeoscopeConfigLoader};
    ///
    /// let cfg = SeoscopeConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// checks:
    ///   title_min: 30
    /// logging:
    ///   format: json
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.checks.title_min, 30);
    /// assert_eq!(cfg.checks.title_max, 60);
    /// assert_eq!(cfg.logging.format, LogFormatSetting::Json);
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources into strongly typed config.
    ///
    /// Files and snippets merge in the order they were added; the
    /// environment overlay goes on last so it wins. `${VAR}` placeholders are
    /// expanded before the typed structs are materialised, then
    /// [`SeoscopeConfig::validate`] runs.
    pub fn load(self) -> Result<SeoscopeConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        // Env values are strings; `Config` coerces them to each field's type.
        let typed: SeoscopeConfig = Config::try_from(&v)?.try_deserialize()?;
        typed.validate()?;

        Ok(typed)
    }
}
