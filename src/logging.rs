use colored::*;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::{self, Writer};
use tracing_subscriber::fmt::{FmtContext, FormatEvent};
use tracing_subscriber::registry::LookupSpan;

/// Marker for a level: `[?]` debug, `[!]` warn and so on.
fn level_marker(level: &Level) -> ColoredString {
    match *level {
        Level::TRACE => "[ ]".dimmed(),
        Level::DEBUG => "[?]".blue(),
        Level::INFO => "[*]".cyan(),
        Level::WARN => "[!]".yellow().bold(),
        Level::ERROR => "[-]".red().bold(),
    }
}

/// Last path segment of an event target, `portprobe::core::scheduler` -> `scheduler`.
pub fn short_target(target: &str) -> &str {
    target.rsplit("::").next().unwrap_or(target)
}

/// One line per event: level marker, the engine component that emitted it,
/// then the event's fields. Timestamps are left out; scans are short.
pub struct ProbeFormatter;

impl<S, N> FormatEvent<S, N> for ProbeFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> format::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        write!(
            writer,
            "{} {} ",
            level_marker(meta.level()),
            format!("{:<9}", short_target(meta.target())).dimmed()
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Filter used when `RUST_LOG` is not set.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "portprobe=debug"
    } else {
        "portprobe=warn"
    }
}

/// Install the global subscriber, writing to stderr.
///
/// Calling this twice is harmless; the second call is ignored.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .event_format(ProbeFormatter)
        .try_init();
}
