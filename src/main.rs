mod app;
mod command;
mod config;
mod consts;
mod daily;
mod game;
mod progress;
mod rng;
mod store;
mod util;
use crate::app::App;
use crate::config::Config;
use crate::daily::DailyKey;
use crate::game::GameSession;
use crate::progress::Progress;
use crate::store::{FileStore, MemoryStore};
use anyhow::Context;
use chrono::NaiveDate;
use env_logger::{Env, Target};
use lexopt::{Arg, Parser, ValueExt};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const USAGE: &str = "\
Usage: daily-snake [<options>]

Options:
  --config <path>      Read configuration from the given file
  --date <YYYY-MM-DD>  Play the daily puzzle for the given date
  --debug              Use the small test puzzle for the daily challenge
  --log-file <path>    Write log messages to the given file
  -h, --help           Show this help message and exit
  -V, --version        Show the program version and exit
";

#[derive(Clone, Debug, Eq, PartialEq)]
enum Cli {
    Run(Arguments),
    Help,
    Version,
}

impl Cli {
    fn from_parser(mut parser: Parser) -> Result<Cli, lexopt::Error> {
        let mut args = Arguments::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Cli::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Cli::Version),
                Arg::Long("config") => args.config = Some(PathBuf::from(parser.value()?)),
                Arg::Long("date") => {
                    args.date = Some(
                        parser
                            .value()?
                            .parse_with(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))?,
                    );
                }
                Arg::Long("debug") => args.debug = true,
                Arg::Long("log-file") => args.log_file = Some(PathBuf::from(parser.value()?)),
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Cli::Run(args))
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct Arguments {
    config: Option<PathBuf>,
    date: Option<NaiveDate>,
    debug: bool,
    log_file: Option<PathBuf>,
}

impl Arguments {
    fn run(self) -> anyhow::Result<()> {
        if let Some(path) = self.log_file.as_deref() {
            init_logging(path)?;
        }
        let config = match self.config {
            Some(path) => Config::load(&path, false)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?,
            None => Config::load(&Config::default_path()?, true)?,
        };
        let today = self.date.map_or_else(DailyKey::today, DailyKey::new);
        let debug = self.debug || config.game.debug;
        log::info!("Starting up; today's puzzle is {today} (debug: {debug})");
        let progress = match config.progress_file() {
            Some(path) => Progress::new(open_store(path.into_owned())),
            None => {
                log::info!("Not saving progress");
                Progress::new(MemoryStore::default())
            }
        };
        let terminal = ratatui::init();
        let r = App::new(GameSession::new(progress, today, debug)).run(terminal);
        ratatui::restore();
        r.map_err(Into::into)
    }
}

/// Open the progress file, starting afresh if it's unreadable
fn open_store(path: PathBuf) -> FileStore {
    match FileStore::open(path.clone()) {
        Ok(store) => {
            log::debug!("Loaded progress from {}", store.path().display());
            store
        }
        Err(e) => {
            log::warn!("{:#}; starting with no saved progress", anyhow::Error::from(e));
            FileStore::new(path)
        }
    }
}

/// Send log messages to `path`, since the terminal belongs to the game
fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = fs_err::File::create(path).context("failed to open log file")?;
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> ExitCode {
    match Cli::from_parser(Parser::from_env()) {
        Ok(Cli::Run(args)) => exit_status(args.run()),
        Ok(Cli::Help) => exit_status(write_stdout(USAGE)),
        Ok(Cli::Version) => exit_status(write_stdout(&format!(
            "{} {}\n",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        ))),
        Err(e) => {
            eprintln!("daily-snake: {e}\n\n{USAGE}");
            ExitCode::from(2)
        }
    }
}

fn write_stdout(text: &str) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

fn exit_status(r: anyhow::Result<()>) -> ExitCode {
    match r {
        Ok(()) => ExitCode::SUCCESS,
        Err(e)
            if e.downcast_ref::<io::Error>()
                .is_some_and(|ioe| ioe.kind() == ErrorKind::BrokenPipe) =>
        {
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e:#}");
            eprintln!("daily-snake: {e:?}");
            ExitCode::from(2)
        }
    }
}
