use minesweeper_core::{Coord, Coord2, GameConfig, GameError};
use thiserror::Error;

pub const HELP: &str = "\
Commands:
  r ROW COL               reveal a cell
  f ROW COL               toggle a flag
  n [PRESET]              new game (beginner, intermediate, expert)
  n ROWS COLUMNS MINES    new game on a custom board
  s                       statistics for the current board size
  h                       this help
  q                       quit";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Reveal(Coord2),
    Flag(Coord2),
    /// `None` repeats the current settings.
    NewGame(Option<GameConfig>),
    Stats,
    Help,
    Quit,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command {0:?}, type h for help")]
    Unknown(String),
    #[error("Usage: {0}")]
    Usage(&'static str),
    #[error("Not a number: {0:?}")]
    BadNumber(String),
    #[error("Unknown preset {0:?}")]
    UnknownPreset(String),
    #[error("Invalid board: {0}")]
    Config(#[from] GameError),
}

pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let command = match name.to_ascii_lowercase().as_str() {
        "r" | "reveal" => Command::Reveal(coords(&args, "r ROW COL")?),
        "f" | "flag" => Command::Flag(coords(&args, "f ROW COL")?),
        "n" | "new" => Command::NewGame(new_game(&args)?),
        "s" | "stats" => Command::Stats,
        "h" | "help" | "?" => Command::Help,
        "q" | "quit" | "exit" => Command::Quit,
        _ => return Err(CommandError::Unknown(name.to_string())),
    };
    Ok(Some(command))
}

fn number<T: std::str::FromStr>(word: &str) -> Result<T, CommandError> {
    word.parse()
        .map_err(|_| CommandError::BadNumber(word.to_string()))
}

fn coords(args: &[&str], usage: &'static str) -> Result<Coord2, CommandError> {
    match args {
        [row, column] => Ok((number::<Coord>(row)?, number::<Coord>(column)?)),
        _ => Err(CommandError::Usage(usage)),
    }
}

fn new_game(args: &[&str]) -> Result<Option<GameConfig>, CommandError> {
    match args {
        [] => Ok(None),
        [preset] => GameConfig::preset(preset)
            .map(Some)
            .ok_or_else(|| CommandError::UnknownPreset(preset.to_string())),
        [rows, columns, mines] => Ok(Some(GameConfig::new(
            number(rows)?,
            number(columns)?,
            number(mines)?,
        )?)),
        _ => Err(CommandError::Usage("n [PRESET | ROWS COLUMNS MINES]")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_moves() {
        assert_eq!(parse("r 3 4"), Ok(Some(Command::Reveal((3, 4)))));
        assert_eq!(parse("  FLAG 0 12 "), Ok(Some(Command::Flag((0, 12)))));
        assert_eq!(parse(""), Ok(None));
        assert_eq!(parse("q"), Ok(Some(Command::Quit)));
    }

    #[test]
    fn parses_new_games() {
        assert_eq!(parse("n"), Ok(Some(Command::NewGame(None))));
        assert_eq!(
            parse("n expert"),
            Ok(Some(Command::NewGame(Some(GameConfig::EXPERT))))
        );
        assert_eq!(
            parse("n 5 6 7"),
            Ok(Some(Command::NewGame(Some(GameConfig::new_unchecked(5, 6, 7)))))
        );
    }

    #[test]
    fn reports_bad_input() {
        assert_eq!(parse("r 3"), Err(CommandError::Usage("r ROW COL")));
        assert_eq!(parse("r a 1"), Err(CommandError::BadNumber("a".into())));
        assert_eq!(parse("r -1 1"), Err(CommandError::BadNumber("-1".into())));
        assert_eq!(parse("x"), Err(CommandError::Unknown("x".into())));
        assert_eq!(
            parse("n huge"),
            Err(CommandError::UnknownPreset("huge".into()))
        );
        assert_eq!(
            parse("n 2 2 4"),
            Err(CommandError::Config(GameError::TooManyMines))
        );
        assert_eq!(
            parse("n 65535 65535 0"),
            Err(CommandError::Config(GameError::InvalidConfig))
        );
    }
}
