use thiserror::Error;

use crate::{CellCount, Coord2};

/// Configuration problems detected while building a board; gameplay itself never fails.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates {0:?}")]
    InvalidCoords(Coord2),
    #[error("Too many mines: requested {mines} but the board only has {cells} cells")]
    TooManyMines { mines: CellCount, cells: CellCount },
    #[error("Board must be at least 1x1")]
    EmptyBoard,
}

pub type Result<T> = core::result::Result<T, GameError>;
