//! Tracing bridge for the browser console.
//!
//! # Design
//! - One global subscriber: a level filter plus a layer that forwards each event
//!   to `console.*` at the matching severity.
//! - Debug builds log at `DEBUG`, release builds at `INFO`.

use anyhow::{Result, anyhow};
use gloo::console;
use std::fmt::{self, Write as _};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;

/// Install the global tracing subscriber.
///
/// # Errors
/// Returns an error if a subscriber was already installed.
pub(crate) fn init_logging() -> Result<()> {
    let level = if cfg!(debug_assertions) {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    tracing_subscriber::registry()
        .with(level)
        .with(ConsoleLayer)
        .try_init()
        .map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))
}

struct ConsoleLayer;

impl<S: Subscriber> Layer<S> for ConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut line = LineVisitor::default();
        event.record(&mut line);
        let meta = event.metadata();
        let text = format!("[{}] {}{}", meta.target(), line.message, line.fields);
        match *meta.level() {
            Level::ERROR => console::error!(text),
            Level::WARN => console::warn!(text),
            Level::INFO => console::info!(text),
            _ => console::debug!(text),
        }
    }
}

#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: String,
}

impl Visit for LineVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            let _ = write!(self.fields, " {}={value:?}", field.name());
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            let _ = write!(self.fields, " {}={value}", field.name());
        }
    }
}
