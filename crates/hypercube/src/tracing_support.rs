//! Structured logging setup for hypercube applications
//!
//! The library crates emit `tracing` events on their own: `trace` for every
//! bulk transfer, `debug` for store creation and chunk allocation, `warn`
//! when a configuration value is clamped. This module installs a subscriber
//! that prints them.
//!
//! # Example
//!
//! ```ignore
//! use hypercube::tracing_support::{init_tracing, TracingConfig, TracingFormat};
//!
//! init_tracing(TracingConfig {
//!     format: TracingFormat::Compact,
//!     filter: "hypercube_dense=debug,info".to_string(),
//!     ..TracingConfig::default()
//! })?;
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set log level (e.g., `RUST_LOG=hypercube_core=trace`)
//! - `HYPERCUBE_LOG_FORMAT`: Set output format (`json`, `compact` or
//!   `pretty`, default: `pretty`)

use anyhow::Result;
use hypercube_core::{Cube, Element};
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "hypercube=info,hypercube_core=info,hypercube_dense=info,hypercube_sparse=info,warn";

/// Tracing output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TracingFormat {
    /// Multi-line, human-readable
    Pretty,
    /// One JSON object per event
    Json,
    /// One line per event
    Compact,
}

impl TracingFormat {
    /// Parse from string, falling back to `Pretty`
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => TracingFormat::Json,
            "compact" => TracingFormat::Compact,
            _ => TracingFormat::Pretty,
        }
    }
}

/// Tracing configuration
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Output format
    pub format: TracingFormat,
    /// Filter directive (e.g., "hypercube_dense=debug,info")
    pub filter: String,
    /// Enable ANSI colors
    pub with_ansi: bool,
    /// Show target module paths
    pub with_target: bool,
    /// Show thread IDs
    pub with_thread_ids: bool,
    /// Show file locations and line numbers
    pub with_file: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        let format = std::env::var("HYPERCUBE_LOG_FORMAT")
            .map(|s| TracingFormat::parse(&s))
            .unwrap_or(TracingFormat::Pretty);
        let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_FILTER.to_string());

        Self {
            format,
            filter,
            with_ansi: true,
            with_target: true,
            with_thread_ids: false,
            with_file: false,
        }
    }
}

/// Install a global subscriber built from `config`
///
/// Call once at application startup; a second call returns an error.
#[cfg(feature = "tracing")]
pub fn init_tracing(config: TracingConfig) -> Result<()> {
    let filter = EnvFilter::try_new(&config.filter)?;

    match config.format {
        TracingFormat::Pretty => {
            let layer = fmt::layer()
                .pretty()
                .with_ansi(config.with_ansi)
                .with_target(config.with_target)
                .with_thread_ids(config.with_thread_ids)
                .with_file(config.with_file)
                .with_line_number(config.with_file)
                .with_filter(filter);
            tracing_subscriber::registry().with(layer).try_init()?;
        }
        TracingFormat::Json => {
            let layer = fmt::layer()
                .json()
                .with_target(config.with_target)
                .with_thread_ids(config.with_thread_ids)
                .with_file(config.with_file)
                .with_line_number(config.with_file)
                .with_filter(filter);
            tracing_subscriber::registry().with(layer).try_init()?;
        }
        TracingFormat::Compact => {
            let layer = fmt::layer()
                .compact()
                .with_ansi(config.with_ansi)
                .with_target(config.with_target)
                .with_thread_ids(config.with_thread_ids)
                .with_file(config.with_file)
                .with_line_number(config.with_file)
                .with_filter(filter);
            tracing_subscriber::registry().with(layer).try_init()?;
        }
    }

    Ok(())
}

/// Stub for when the `tracing` feature is disabled
#[cfg(not(feature = "tracing"))]
pub fn init_tracing(_config: TracingConfig) -> Result<()> {
    Ok(())
}

/// Log a cube's shape and properties under `name`
pub fn record_cube<T: Element>(name: &str, cube: &Cube<T>) {
    let flags = cube.flags();
    tracing::info!(
        cube = name,
        dtype = %cube.dtype(),
        shape = ?cube.shape().as_slice(),
        nbytes = cube.nbytes(),
        c_contiguous = flags.c_contiguous,
        owndata = flags.owndata,
        writeable = flags.writeable,
        "cube"
    );
}
