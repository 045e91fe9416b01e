//! Custom event formatters: a human-readable pretty form and a JSON form.

use std::collections::BTreeMap;
use std::fmt;

use chrono::Utc;
use serde_json::json;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// Collects an event's fields into an ordered map, stringifying every value.
#[derive(Default)]
struct FieldCollector {
    message: Option<String>,
    fields: BTreeMap<String, String>,
}

impl Visit for FieldCollector {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let rendered = format!("{value:?}");
        if field.name() == "message" {
            self.message = Some(rendered);
        } else {
            self.fields.insert(field.name().to_string(), rendered);
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.fields.insert(field.name().to_string(), value.to_string());
        }
    }
}

/// `LEVEL target: message key=value key=value`, no ANSI color codes needed
/// for the non-interactive hosts this runs on.
pub struct CustomPrettyFormatter;

impl<S, N> FormatEvent<S, N> for CustomPrettyFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(&self, ctx: &FmtContext<'_, S, N>, mut writer: Writer<'_>, event: &Event<'_>) -> fmt::Result {
        let mut collector = FieldCollector::default();
        event.record(&mut collector);

        let meta = event.metadata();
        write!(writer, "{} {:>5} {}: ", Utc::now().to_rfc3339(), meta.level(), meta.target())?;

        if let Some(message) = &collector.message {
            write!(writer, "{message}")?;
        }
        for (key, value) in &collector.fields {
            write!(writer, " {key}={value}")?;
        }

        if let Some(scope) = ctx.event_scope() {
            for span in scope.from_root() {
                write!(writer, " in {}", span.name())?;
            }
        }

        writeln!(writer)
    }
}

/// One JSON object per line: `timestamp`, `level`, `target`, `message`, and
/// every other field flattened alongside them.
pub struct CustomJsonFormatter;

impl<S, N> FormatEvent<S, N> for CustomJsonFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(&self, _ctx: &FmtContext<'_, S, N>, mut writer: Writer<'_>, event: &Event<'_>) -> fmt::Result {
        let mut collector = FieldCollector::default();
        event.record(&mut collector);

        let meta = event.metadata();
        let mut object = json!({
            "timestamp": Utc::now().to_rfc3339(),
            "level": meta.level().to_string(),
            "target": meta.target(),
        });

        if let Some(message) = collector.message {
            object["message"] = json!(message);
        }
        if let serde_json::Value::Object(ref mut map) = object {
            for (key, value) in collector.fields {
                map.insert(key, json!(value));
            }
        }

        writeln!(writer, "{object}")
    }
}
