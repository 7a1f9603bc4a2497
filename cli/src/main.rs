use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use minesweeper_core::{
    ArchivedRecord, Clock, ClockFactory, GameConfig, GameOptions, HistorySummary,
    JsonFileArchive, MemoryArchive, Minesweeper, StartTile, StatsArchive,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::mpsc;

use crate::command::{Command, HELP};
use crate::terminal::TerminalPresenter;
use crate::ticker::{Event, ThreadClock, spawn_input_reader};

mod command;
mod terminal;
mod ticker;

type Game = Minesweeper<Box<dyn StatsArchive>, TerminalPresenter>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Preset {
    Beginner,
    Intermediate,
    Expert,
}

impl From<Preset> for GameConfig {
    fn from(preset: Preset) -> Self {
        match preset {
            Preset::Beginner => GameConfig::BEGINNER,
            Preset::Intermediate => GameConfig::INTERMEDIATE,
            Preset::Expert => GameConfig::EXPERT,
        }
    }
}

/// Minesweeper in the terminal
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Board size and mine count
    #[arg(long, value_enum, default_value_t = Preset::Beginner)]
    preset: Preset,

    /// Rows of a custom board (needs --columns and --mines)
    #[arg(long, requires_all = ["columns", "mines"])]
    rows: Option<u16>,

    /// Columns of a custom board
    #[arg(long, requires_all = ["rows", "mines"])]
    columns: Option<u16>,

    /// Mines on a custom board
    #[arg(long, requires_all = ["rows", "columns"])]
    mines: Option<u32>,

    /// Fixed seed used for every board
    #[arg(long)]
    seed: Option<u64>,

    /// Where finished games are stored
    #[arg(long, conflicts_with = "no_archive")]
    archive: Option<PathBuf>,

    /// Keep finished games in memory only
    #[arg(long)]
    no_archive: bool,

    /// Keep the neighbors of the first revealed cell free of mines as well
    #[arg(long)]
    safe_zone: bool,

    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,
}

impl Args {
    fn config(&self) -> Result<GameConfig> {
        match (self.rows, self.columns, self.mines) {
            (Some(rows), Some(columns), Some(mines)) => GameConfig::new(rows, columns, mines)
                .with_context(|| format!("Invalid board {}x{} with {} mines", rows, columns, mines)),
            (None, None, None) => Ok(self.preset.into()),
            _ => bail!("--rows, --columns and --mines go together"),
        }
    }

    fn options(&self) -> GameOptions {
        GameOptions {
            seed: self.seed,
            start_tile: if self.safe_zone {
                StartTile::AlwaysZero
            } else {
                StartTile::SimpleSafe
            },
        }
    }

    fn archive(&self) -> Result<Box<dyn StatsArchive>> {
        if self.no_archive {
            return Ok(Box::new(MemoryArchive::new()));
        }

        let path = match &self.archive {
            Some(path) => path.clone(),
            None => default_archive_path()?,
        };
        let archive = JsonFileArchive::open(&path)
            .with_context(|| format!("Could not open stats file {}", path.display()))?;
        log::info!("Using stats file {}", archive.path().display());
        Ok(Box::new(archive))
    }
}

fn default_archive_path() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", "minesweeper")
        .context("No home directory found, pass --archive or --no-archive")?;
    Ok(dirs.data_dir().join("games.json"))
}

fn print_summary(records: &[ArchivedRecord], config: GameConfig) {
    let summary = HistorySummary::for_settings(records, config);
    println!(
        "{}x{} with {} mines: {} games won",
        config.rows, config.columns, config.mines, summary.wins
    );
    if let Some(best) = summary.best_secs {
        println!("Best time: {}s", best);
    }
    if summary.games > 0 {
        println!("Average time: {}s", summary.total_secs / summary.games as u64);
    }
}

fn flush_messages(game: &mut Game) {
    for message in game.presenter_mut().take_messages() {
        println!("{}", message);
    }
}

/// Runs one command. Returns `false` when the player wants to quit.
fn execute(game: &mut Game, command: Command) -> bool {
    match command {
        // rejected moves are reported through the presenter
        Command::Reveal(coords) => {
            let _ = game.request_reveal(coords);
        }
        Command::Flag(coords) => {
            let _ = game.request_flag_toggle(coords);
        }
        Command::NewGame(config) => {
            let config = config.unwrap_or_else(|| game.session().config());
            game.request_new_game(config);
        }
        Command::Stats => match game.history() {
            Ok(records) => print_summary(&records, game.session().config()),
            Err(err) => println!("Could not read stats: {}", err),
        },
        Command::Help => println!("{}", HELP),
        Command::Quit => return false,
    }
    true
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let config = args.config()?;
    let archive = args.archive()?;
    let history = archive.load_all().context("Could not load stats")?;
    log::info!("{} finished games on record", history.len());

    let (events_tx, events_rx) = mpsc::channel();
    spawn_input_reader(events_tx.clone());

    let clocks: Box<dyn ClockFactory> = Box::new(move |generation: u64| {
        Box::new(ThreadClock::new(generation, events_tx.clone())) as Box<dyn Clock>
    });
    let mut game: Game = Minesweeper::new(
        config,
        args.options(),
        archive,
        TerminalPresenter::default(),
        clocks,
    );

    println!("{}", HELP);
    flush_messages(&mut game);
    print!("{}", game.presenter().render());

    for event in events_rx {
        match event {
            Event::Tick(generation) => {
                // redraw the status line in place, leaving any typed input after it
                if game.tick(generation).is_some() {
                    print!("\r{}  ", game.presenter().header());
                    let _ = io::stdout().flush();
                }
            }
            Event::Input(line) => {
                match command::parse(&line) {
                    Ok(Some(command)) => {
                        if !execute(&mut game, command) {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(err) => println!("{}", err),
                }
                flush_messages(&mut game);
                print!("{}", game.presenter().render());
            }
            Event::InputClosed => break,
        }
    }

    log::debug!("Exiting");
    Ok(())
}
