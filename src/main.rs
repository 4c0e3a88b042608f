mod app;
mod calendar;
mod clock;
mod event;
mod form;
mod help;
mod theme;
use crate::app::App;
use crate::calendar::YearMonth;
use crate::clock::{Clock, LocalClock};
use crate::event::{EventList, YMD_FMT};
use anyhow::Context;
use lexopt::{Arg, Parser, ValueExt};
use ratatui::DefaultTerminal;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use time::Date;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run {
        events: Option<PathBuf>,
        log_file: Option<PathBuf>,
        month: Option<YearMonth>,
    },
    Help,
    Version,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut events = None;
        let mut log_file = None;
        let mut month = None;
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('e') | Arg::Long("events") => {
                    events = Some(PathBuf::from(parser.value()?));
                }
                Arg::Long("log-file") => log_file = Some(PathBuf::from(parser.value()?)),
                Arg::Value(value) if month.is_none() => {
                    let value = value.string()?;
                    month = Some(parse_month(&value).map_err(|error| {
                        lexopt::Error::ParsingFailed { value, error }
                    })?);
                }
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run {
            events,
            log_file,
            month,
        })
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run {
                events,
                log_file,
                month,
            } => {
                if let Some(path) = log_file {
                    init_tracing(&path)?;
                }
                let clock = LocalClock::detect();
                let events = match events {
                    Some(path) => EventList::load(&path).context("failed to load events")?,
                    None => EventList::default(),
                };
                let month = match month {
                    Some(m) => m,
                    None => YearMonth::containing(clock.today())
                        .context("current date is outside the displayable range")?,
                };
                tracing::info!(%month, "starting calendar");
                with_terminal(|mut terminal| {
                    terminal.hide_cursor().context("failed to hide cursor")?;
                    App::new(clock, events, month).run(terminal)?;
                    Ok(())
                })
            }
            Command::Help => {
                println!("Usage: monthcal [<options>] [YYYY-MM]");
                println!();
                println!("Month-view terminal calendar for adding, editing & deleting events");
                println!();
                println!("Options:");
                println!("  -e, --events <FILE>   Load initial events from a JSON file");
                println!("      --log-file <FILE> Write logs to the given file");
                println!("  -h, --help            Display this help message and exit");
                println!("  -V, --version         Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

/// Parse a `YYYY-MM` argument
fn parse_month(s: &str) -> Result<YearMonth, Box<dyn std::error::Error + Send + Sync>> {
    let date = Date::parse(&format!("{s}-01"), &YMD_FMT)?;
    Ok(YearMonth::containing(date)?)
}

// The terminal belongs to the UI, so logs only go to a file, and only when
// one is requested.
fn init_tracing(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("failed to initialize logging")
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = func(terminal);
    ratatui::restore();
    r
}
