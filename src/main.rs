mod app;
mod audio;
mod command;
mod config;
mod consts;
mod difficulty;
mod game;
mod highscores;
mod menu;
mod util;
use crate::app::App;
use crate::audio::Jukebox;
use crate::config::Config;
use crate::difficulty::Difficulty;
use crate::highscores::HighScores;
use crate::util::Globals;
use anyhow::Context;
use crossterm::{
    event::{DisableFocusChange, EnableFocusChange},
    execute,
};
use lexopt::{Arg, Parser, ValueExt};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const USAGE: &str = concat!(
    "Usage: chromasnake [<options>]\n",
    "\n",
    "Play a snake game in which every herb eaten blends into the snake's color\n",
    "\n",
    "Options:\n",
    "  -c, --config <path>       Read configuration from the given file\n",
    "  -d, --difficulty <mode>   Preselect \"normal\" or \"advanced\" in the main menu\n",
    "      --seed <int>          Seed the random number generator for a reproducible game\n",
    "      --log-file <path>     Write log messages to the given file\n",
    "  -h, --help                Display this help message and exit\n",
    "  -V, --version             Show the program version and exit\n",
);

#[derive(Clone, Debug, Eq, PartialEq)]
enum Mode {
    Run(Arguments),
    Help,
    Version,
}

impl Mode {
    fn from_parser(mut parser: Parser) -> Result<Mode, lexopt::Error> {
        let mut args = Arguments::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Mode::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Mode::Version),
                Arg::Short('c') | Arg::Long("config") => {
                    args.config = Some(PathBuf::from(parser.value()?));
                }
                Arg::Short('d') | Arg::Long("difficulty") => {
                    args.difficulty = Some(parser.value()?.parse()?);
                }
                Arg::Long("seed") => args.seed = Some(parser.value()?.parse()?),
                Arg::Long("log-file") => args.log_file = Some(PathBuf::from(parser.value()?)),
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Mode::Run(args))
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct Arguments {
    config: Option<PathBuf>,
    difficulty: Option<Difficulty>,
    seed: Option<u64>,
    log_file: Option<PathBuf>,
}

impl Arguments {
    fn run(self) -> anyhow::Result<()> {
        if let Some(path) = &self.log_file {
            init_logging(path)?;
        }
        let config = match self.config {
            Some(path) => Config::load(&path, false).with_context(|| {
                format!("failed to load configuration from {}", path.display())
            })?,
            None => match Config::default_path() {
                Ok(path) => Config::load(&path, true).with_context(|| {
                    format!("failed to load configuration from {}", path.display())
                })?,
                Err(e) => {
                    tracing::warn!(error = %e, "using default configuration");
                    Config::default()
                }
            },
        };
        let high_scores = config.load_high_scores().unwrap_or_else(|e| {
            tracing::warn!(error = ?e, "failed to load high scores; starting without records");
            HighScores::default()
        });
        let difficulty = self.difficulty.unwrap_or(config.difficulty);
        let globals = Globals {
            jukebox: Jukebox::open(config.audio.music),
            high_scores,
            seed: self.seed,
            config,
        };
        tracing::info!(%difficulty, seed = ?globals.seed, "starting chromasnake");
        let terminal = ratatui::init();
        let r = execute!(io::stdout(), EnableFocusChange)
            .and_then(|()| App::new(globals, difficulty).run(terminal));
        if let Err(e) = execute!(io::stdout(), DisableFocusChange) {
            tracing::warn!(error = %e, "failed to disable focus reporting");
        }
        ratatui::restore();
        r.map_err(Into::into)
    }
}

/// Send log messages to `path`.  The terminal belongs to the game, so
/// nothing is logged unless a file is given.
fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = fs_err::File::create(path).context("failed to open log file")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("failed to install logger")
}

fn main() -> ExitCode {
    match Mode::from_parser(Parser::from_env()) {
        Ok(Mode::Run(args)) => exit_with(args.run()),
        Ok(Mode::Help) => {
            print!("{USAGE}");
            ExitCode::SUCCESS
        }
        Ok(Mode::Version) => {
            println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("chromasnake: {e}");
            eprintln!("Try 'chromasnake --help' for more information.");
            ExitCode::from(2)
        }
    }
}

fn exit_with(r: anyhow::Result<()>) -> ExitCode {
    match r {
        Ok(()) => ExitCode::SUCCESS,
        Err(e)
            if e
                .downcast_ref::<io::Error>()
                .is_some_and(|e| e.kind() == ErrorKind::BrokenPipe) =>
        {
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("chromasnake: {e:?}");
            ExitCode::FAILURE
        }
    }
}
