//! Logging setup.
//!
//! stdout is reserved for command output (listings, analysis verdicts,
//! reports); all log lines go to stderr. `RUST_LOG` takes precedence,
//! then `FUNCHECK_DEBUG=1` bumps the default level to debug.

use std::io::IsTerminal;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

pub fn init_logging() {
    let debug = std::env::var("FUNCHECK_DEBUG").is_ok_and(|v| v != "0" && !v.is_empty());
    let default = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal());

    // try_init so repeated calls (tests, embedded use) are harmless.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
