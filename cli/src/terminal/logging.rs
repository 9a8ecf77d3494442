use colored::*;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::FormatEvent;
use tracing_subscriber::fmt::format::{self, Writer};
use tracing_subscriber::registry::LookupSpan;

/// Events on this target are written verbatim, without a level symbol.
pub const PRINT_TARGET: &str = "qcmd::print";
/// Output forwarded from the hypervisor or the image tool.
pub const CHILD_TARGET: &str = "qcmd::child";

pub struct QcmdFormatter;

impl<S, N> FormatEvent<S, N> for QcmdFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> format::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();

        if meta.target() != PRINT_TARGET {
            let (symbol, color_func): (&str, fn(ColoredString) -> ColoredString) = match *meta.level() {
                _ if meta.target() == CHILD_TARGET => ("[|]", |s| s.bright_black()),
                Level::TRACE => ("[ ]", |s| s.dimmed()),
                Level::DEBUG => ("[?]", |s| s.blue()),
                Level::INFO => ("[+]", |s| s.green().bold()),
                Level::WARN => ("[*]", |s| s.yellow().bold()),
                Level::ERROR => ("[-]", |s| s.red().bold()),
            };
            write!(writer, "{} ", color_func(symbol.into()))?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

/// Installs the global subscriber. `RUST_LOG` wins over `-v`/`-q`.
pub fn init_logging(verbose: u8, quiet: u8) {
    let level: &str = match (verbose, quiet) {
        (0, 0) => "info",
        (0, _) => "warn",
        (1, _) => "debug",
        _ => "trace",
    };
    let directives = format!("{level},{PRINT_TARGET}=info,{CHILD_TARGET}=debug");

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .event_format(QcmdFormatter)
        .init();
}
