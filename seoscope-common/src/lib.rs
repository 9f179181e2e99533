//! Shared plumbing for the seoscope crates.
//!
//! Today this is only [`observability`], the single place where binaries and
//! integration tests install their `tracing` subscriber. It stays
//! dependency-light so every crate in the workspace can pull it in.
//!
//! ```rust
//! use seoscope_common::observability::{LogConfig, LogFormat};
//!
//! let cfg = LogConfig {
//!     format: LogFormat::Json,
//!     ..LogConfig::default()
//! };
//! assert_eq!(cfg.app_name, "seoscope");
//! assert_eq!(cfg.default_filter, "info");
//! ```

pub mod observability;
