use anyhow::{Context, Result, anyhow, bail};
use sweeper_core::{Coord, Coord2, GameSession, PointerButtons, PointerTarget};

pub(crate) const HELP: &str = "\
commands (x and y start at 0):
  o X Y      open a tile (left press and release)
  f X Y      cycle the flag on a tile (right click)
  c X Y      chord on a number (double click)
  down X Y   press the left button on a tile
  move X Y   drag the held left button to a tile, `move out` leaves the board
  up [X Y]   release the left button, over the board or off it
  face       click the restart button
  new        start a new game
  debug      reveal the whole board
  dump       print the current view as JSON
  help       show this text
  quit       leave";

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Command {
    Open(Coord2),
    Flag(Coord2),
    Chord(Coord2),
    Down(Coord2),
    Move(PointerTarget),
    Up(PointerTarget),
    Face,
    New,
    Debug,
    Dump,
    Help,
    Quit,
}

/// What the main loop should do after a command ran.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Flow {
    Redraw,
    Dump,
    Help,
    Quiet,
    Quit,
}

impl Command {
    pub(crate) fn parse(line: &str) -> Result<Option<Self>> {
        let mut words = line.split_whitespace();
        let Some(word) = words.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = words.collect();

        let command = match word {
            "o" | "open" => Command::Open(coords(&args)?),
            "f" | "flag" => Command::Flag(coords(&args)?),
            "c" | "chord" => Command::Chord(coords(&args)?),
            "down" => Command::Down(coords(&args)?),
            "move" => Command::Move(target(&args)?),
            "up" => Command::Up(target(&args)?),
            "face" => Command::Face,
            "new" | "n" => Command::New,
            "debug" => Command::Debug,
            "dump" => Command::Dump,
            "help" | "h" | "?" => Command::Help,
            "quit" | "q" | "exit" => Command::Quit,
            other => bail!("unknown command {:?}, try `help`", other),
        };
        Ok(Some(command))
    }

    /// Feeds the command to the session as the pointer events a mouse would produce.
    pub(crate) fn apply(self, session: &mut GameSession) -> Flow {
        use PointerButtons as B;
        use PointerTarget::*;

        let changed = match self {
            Command::Open(pos) => {
                let pressed = session.pointer_down(B::LEFT, Cell(pos));
                session.pointer_up(B::LEFT, Cell(pos)) || pressed
            }
            Command::Flag(pos) => {
                let flagged = session.pointer_down(B::RIGHT, Cell(pos));
                session.pointer_up(B::RIGHT, Cell(pos)) || flagged
            }
            Command::Chord(pos) => session.double_click(Cell(pos)),
            Command::Down(pos) => session.pointer_down(B::LEFT, Cell(pos)),
            Command::Move(target) => session.pointer_move(B::LEFT, target),
            Command::Up(target) => session.pointer_up(B::LEFT, target),
            Command::Face => {
                session.pointer_down(B::LEFT, Restart);
                session.pointer_up(B::LEFT, Restart)
            }
            Command::New => session.restart(),
            Command::Debug => session.reveal_all_debug(),
            Command::Dump => return Flow::Dump,
            Command::Help => return Flow::Help,
            Command::Quit => return Flow::Quit,
        };

        if changed { Flow::Redraw } else { Flow::Quiet }
    }
}

fn coords(args: &[&str]) -> Result<Coord2> {
    match args {
        [x, y] => Ok((axis(x)?, axis(y)?)),
        _ => Err(anyhow!("expected two coordinates, got {:?}", args)),
    }
}

fn axis(word: &str) -> Result<Coord> {
    word.parse()
        .with_context(|| format!("{:?} is not a coordinate", word))
}

fn target(args: &[&str]) -> Result<PointerTarget> {
    match args {
        [] | ["out"] => Ok(PointerTarget::Outside),
        ["face"] => Ok(PointerTarget::Restart),
        _ => coords(args).map(PointerTarget::Cell),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sweeper_core::{FixedMineGenerator, GameConfig, Outcome};

    #[test]
    fn parses_commands_with_coordinates() {
        assert_eq!(Command::parse("o 3 4").unwrap(), Some(Command::Open((3, 4))));
        assert_eq!(
            Command::parse("  flag 0 19 ").unwrap(),
            Some(Command::Flag((0, 19)))
        );
        assert_eq!(
            Command::parse("move out").unwrap(),
            Some(Command::Move(PointerTarget::Outside))
        );
        assert_eq!(
            Command::parse("up 1 2").unwrap(),
            Some(Command::Up(PointerTarget::Cell((1, 2))))
        );
        assert_eq!(Command::parse("").unwrap(), None);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(Command::parse("o 3").is_err());
        assert!(Command::parse("o -1 2").is_err());
        assert!(Command::parse("o 300 2").is_err());
        assert!(Command::parse("explode").is_err());
    }

    #[test]
    fn open_and_chord_drive_the_session() {
        let config = GameConfig::new((3, 3), 1).unwrap();
        let mut session =
            GameSession::with_generator(config, FixedMineGenerator::new(&[(0, 0)]), 0).unwrap();

        assert_eq!(Command::Open((1, 1)).apply(&mut session), Flow::Redraw);
        assert_eq!(Command::Chord((1, 1)).apply(&mut session), Flow::Quiet);
        assert_eq!(Command::Flag((0, 0)).apply(&mut session), Flow::Redraw);
        assert_eq!(Command::Chord((1, 1)).apply(&mut session), Flow::Redraw);
        assert_eq!(session.outcome(), Outcome::Won);

        assert_eq!(Command::Face.apply(&mut session), Flow::Redraw);
        assert_eq!(session.outcome(), Outcome::InProgress);
        assert_eq!(Command::Quit.apply(&mut session), Flow::Quit);
    }
}
