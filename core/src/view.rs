use core::fmt;
use serde::{Deserialize, Serialize};

use crate::*;

/// Mood of the restart button.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Face {
    Idle,
    /// Restart control held down under the pointer.
    Down,
    /// Left button held on the board.
    Ooh,
    Dead,
    Win,
}

/// The picture a renderer should draw for a tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileGlyph {
    /// Raised, unmarked button.
    Button,
    Flag,
    Question,
    /// Selected button drawn pushed in.
    Pressed,
    /// Selected button with a question mark, pushed in.
    QuestionPressed,
    Number(u8),
    Mine,
    /// The mine that ended the game.
    MineHit,
    /// A confident flag on a safe tile, shown once the game is over.
    NoMine,
}

impl TileGlyph {
    pub fn of(tile: &Tile, game_over: bool) -> Self {
        use TileGlyph::*;

        if tile.is_revealed() {
            return match (tile.is_mine(), tile.is_hit()) {
                (true, true) => MineHit,
                (true, false) => Mine,
                (false, _) => Number(tile.adjacent_mines()),
            };
        }

        match tile.flag() {
            FlagState::Tentative if tile.is_selected() => QuestionPressed,
            FlagState::None if tile.is_selected() => Pressed,
            FlagState::Flagged if game_over && !tile.is_mine() => NoMine,
            FlagState::Flagged => Flag,
            FlagState::Tentative => Question,
            FlagState::None => Button,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CounterGlyph {
    Dash,
    Digit(u8),
}

/// Three-glyph seven-segment counter.
///
/// Values above 999 show as `999`. Negative values keep their last two digits behind a dash
/// once they reach three digits, so -5 shows `-05` and -123 shows `-23`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterDigits(pub [CounterGlyph; 3]);

impl CounterDigits {
    pub fn new(value: i32) -> Self {
        let negative = value < 0;
        let mut magnitude = value.unsigned_abs();
        if negative {
            if magnitude >= 100 {
                magnitude %= 100;
            }
        } else {
            magnitude = magnitude.min(999);
        }

        let digit = |place: u32| CounterGlyph::Digit((magnitude / place % 10) as u8);
        let first = if negative {
            CounterGlyph::Dash
        } else {
            digit(100)
        };
        Self([first, digit(10), digit(1)])
    }
}

impl fmt::Display for CounterDigits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for glyph in self.0 {
            match glyph {
                CounterGlyph::Dash => f.write_str("-")?,
                CounterGlyph::Digit(digit) => write!(f, "{}", digit)?,
            }
        }
        Ok(())
    }
}

/// Everything a renderer needs for one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionView {
    pub size: Coord2,
    pub outcome: Outcome,
    pub face: Face,
    pub mines_left: i32,
    pub mine_counter: CounterDigits,
    pub elapsed_secs: u32,
    pub time_counter: CounterDigits,
    /// Glyphs row by row: `rows[y][x]`.
    pub rows: Vec<Vec<TileGlyph>>,
}

impl GameSession {
    pub fn glyph_at(&self, coords: Coord2) -> Option<TileGlyph> {
        self.tile_at(coords)
            .map(|tile| TileGlyph::of(tile, self.is_terminal()))
    }

    pub fn view(&self) -> SessionView {
        let (size_x, size_y) = self.board().size();
        let game_over = self.is_terminal();
        let rows = (0..size_y)
            .map(|y| {
                (0..size_x)
                    .map(|x| TileGlyph::of(&self.board()[(x, y)], game_over))
                    .collect()
            })
            .collect();

        let mines_left = self.mines_left();
        let elapsed_secs = self.elapsed_secs();
        SessionView {
            size: (size_x, size_y),
            outcome: self.outcome(),
            face: self.face(),
            mines_left,
            mine_counter: CounterDigits::new(mines_left),
            elapsed_secs,
            time_counter: CounterDigits::new(i32::try_from(elapsed_secs).unwrap_or(i32::MAX)),
            rows,
        }
    }
}
