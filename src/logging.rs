use std::fmt;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::EnvFilter;

const TIMESTAMP_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

pub fn format_timestamp(at: OffsetDateTime) -> String {
    at.format(TIMESTAMP_FORMAT)
        .unwrap_or_else(|_| "0000-00-00 00:00:00".to_string())
}

fn local_now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

/// Event timer printing `[YYYY-MM-DD HH:MM:SS]`.
#[derive(Debug, Clone, Copy)]
pub struct BracketedTimestamp {
    clock: fn() -> OffsetDateTime,
}

impl BracketedTimestamp {
    pub fn with_clock(clock: fn() -> OffsetDateTime) -> Self {
        BracketedTimestamp { clock }
    }
}

impl Default for BracketedTimestamp {
    fn default() -> Self {
        BracketedTimestamp { clock: local_now }
    }
}

impl FormatTime for BracketedTimestamp {
    fn format_time(
        &self,
        w: &mut Writer<'_>,
    ) -> fmt::Result {
        write!(w, "[{}]", format_timestamp((self.clock)()))
    }
}

/// Install the console subscriber. `RUST_LOG` directives are honoured on top
/// of the verbosity level.
pub fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let filter = EnvFilter::from_default_env().add_directive(level.into());
    let subscriber = tracing_subscriber::fmt()
        .with_timer(BracketedTimestamp::default())
        .with_target(false)
        .with_level(false)
        .with_env_filter(filter);

    subscriber.init();
}
