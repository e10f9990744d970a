//! Logging setup and the diagnostics sink used by the orchestrator
//!
//! Filter precedence: `APPGET_LOG`, then `[logging] level`, then `warn`.
//! Logs go to stderr; stdout is reserved for command output.

use appget_common::{LoggingConfig, Severity};
use std::io::{self, IsTerminal};
use tracing::{error, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

pub const LOG_ENV: &str = "APPGET_LOG";

/// Filter installed by `--verbose`
pub const VERBOSE_FILTER: &str = "debug";

const DEFAULT_FILTER: &str = "warn";

/// Receives classified failures and the verbosity toggle
pub trait DiagnosticsSink: Send + Sync {
    fn record(&self, severity: Severity, message: &str);

    fn enable_verbose(&self);
}

/// Forwards to `tracing`
pub struct TracingSink {
    filter: Option<reload::Handle<EnvFilter, Registry>>,
}

impl TracingSink {
    /// Sink that logs through whatever subscriber is already installed
    pub fn detached() -> Self {
        Self { filter: None }
    }
}

impl DiagnosticsSink for TracingSink {
    fn record(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Warn => warn!("{}", message),
            Severity::Error => error!("{}", message),
            // tracing has no level above ERROR
            Severity::Fatal => error!(target: "appget::fatal", fatal = true, "{}", message),
        }
    }

    fn enable_verbose(&self) {
        if let Some(handle) = &self.filter {
            if let Err(e) = handle.reload(EnvFilter::new(VERBOSE_FILTER)) {
                warn!("Failed to enable verbose logging: {}", e);
            }
        }
    }
}

/// Install the global subscriber
pub fn init(config: &LoggingConfig) -> TracingSink {
    let directive = std::env::var(LOG_ENV).ok();
    let filter = initial_filter(directive.as_deref(), &config.level);
    let (filter, handle) = reload::Layer::new(filter);

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(io::stderr().is_terminal()),
        )
        .try_init();

    match installed {
        Ok(()) => TracingSink {
            filter: Some(handle),
        },
        // Someone else (a test harness) owns the global subscriber
        Err(_) => TracingSink::detached(),
    }
}

fn initial_filter(env_directive: Option<&str>, config_level: &str) -> EnvFilter {
    env_directive
        .and_then(|d| EnvFilter::try_new(d).ok())
        .or_else(|| EnvFilter::try_new(config_level).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}
