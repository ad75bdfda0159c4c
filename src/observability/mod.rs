//! Observability for recordgate
//!
//! Structured logging through `tracing`. Events are emitted with a fixed
//! `event` field (see [`Event`]); the subscriber is chosen at startup.
//!
//! # Usage
//!
//! ```ignore
//! use recordgate::observability::{init_logging, Event, LogFormat};
//!
//! init_logging("info", LogFormat::Json);
//! tracing::info!(event = %Event::Serving, addr = "0.0.0.0:8080", "Listening");
//! ```

mod events;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

pub use events::Event;

/// Log line format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line
    #[default]
    Json,
    /// Human-readable, multi-line
    Pretty,
}

/// Install the global subscriber. `RUST_LOG` overrides `level`.
///
/// Does nothing if a subscriber is already installed (tests, embedding).
pub fn init_logging(level: &str, format: LogFormat) {
    if tracing::dispatcher::has_been_set() {
        return;
    }

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    // try_init only fails if another subscriber won a race; that one stays.
    let _ = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
}
