use chrono::Local;
use nu_ansi_term::{Color, Style};
use std::fmt;
use tracing::{Event, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{format::Writer, FmtContext, FormatEvent, FormatFields},
    prelude::*,
    registry::LookupSpan,
    Layer,
};

/// Target used for human-readable report blocks (balance tables, day summaries).
pub const REPORT_TARGET: &str = "run_report";

/// Installs the terminal + rolling file subscriber.
///
/// `app_target` is the crate whose INFO events reach the console; everything
/// else is held to WARN. The returned guard flushes the file writer and
/// MUST be kept alive by the caller.
pub fn setup_logger(app_target: &str) -> Option<WorkerGuard> {
    std::fs::create_dir_all("logs").ok();

    let file_appender = tracing_appender::rolling::daily("logs", "app");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_filter = tracing_subscriber::filter::Targets::new()
        .with_target(REPORT_TARGET, tracing::Level::INFO)
        .with_target(app_target, tracing::Level::DEBUG)
        .with_target("core_logic", tracing::Level::INFO)
        .with_default(tracing::Level::WARN);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .event_format(FILE)
        .with_filter(file_filter);

    let console_filter = tracing_subscriber::filter::Targets::new()
        .with_target(REPORT_TARGET, tracing::Level::INFO)
        .with_target(app_target, tracing::Level::INFO)
        .with_target("core_logic", tracing::Level::INFO)
        .with_default(tracing::Level::ERROR);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .event_format(TERMINAL)
        .with_filter(console_filter);

    let installed = tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .try_init();

    if installed.is_err() {
        // A subscriber is already set (tests, embedding); keep theirs.
        return None;
    }

    Some(guard)
}

#[derive(Clone, Copy)]
enum Sink {
    Console,
    File,
}

/// One line per event: colored level tag on the console, timestamped in files.
struct LineFormat(Sink);

const TERMINAL: LineFormat = LineFormat(Sink::Console);
const FILE: LineFormat = LineFormat(Sink::File);

#[derive(Default)]
struct MessageVisitor(String);

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{:?}", value);
        }
    }
}

fn highlight(msg: &str) -> String {
    let (words, color) = if msg.contains("SUCCESS") || msg.contains("Success") {
        (["SUCCESS", "Success"], Color::LightGreen)
    } else if msg.contains("FAILED") || msg.contains("Failed") {
        (["FAILED", "Failed"], Color::LightRed)
    } else {
        return msg.to_string();
    };

    let style = Style::new().fg(color).bold();
    words.iter().fold(msg.to_string(), |line, word| {
        line.replace(*word, &style.paint(*word).to_string())
    })
}

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        let level = *event.metadata().level();

        match self.0 {
            Sink::File => {
                let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
                writeln!(writer, "{} [{}] {}", timestamp, level, visitor.0)
            }
            Sink::Console => {
                if level == tracing::Level::WARN {
                    write!(writer, "{} ", Color::Yellow.bold().paint("WARN"))?;
                } else if level == tracing::Level::ERROR {
                    write!(writer, "{} ", Color::Red.bold().paint("ERROR"))?;
                }
                writeln!(writer, "{}", highlight(&visitor.0))
            }
        }
    }
}
