use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Player marker on an unrevealed tile. Both marked states block reveal.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlagState {
    #[default]
    None,
    /// Confident "there is a mine here", counted by the mine counter.
    Flagged,
    /// The "maybe" marker, not counted.
    Tentative,
}

impl FlagState {
    pub const fn blocks_reveal(self) -> bool {
        match self {
            FlagState::None => false,
            FlagState::Flagged => true,
            FlagState::Tentative => true,
        }
    }

    /// Next state when right-clicked: None -> Flagged -> Tentative -> None.
    pub const fn cycled(self) -> Self {
        match self {
            FlagState::None => FlagState::Flagged,
            FlagState::Flagged => FlagState::Tentative,
            FlagState::Tentative => FlagState::None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    coords: Coord2,
    is_mine: bool,
    adjacent_mines: u8,
    revealed: bool,
    flag: FlagState,
    hit: bool,
    selected: bool,
}

impl Tile {
    pub(crate) const fn new(coords: Coord2) -> Self {
        Self {
            coords,
            is_mine: false,
            adjacent_mines: 0,
            revealed: false,
            flag: FlagState::None,
            hit: false,
            selected: false,
        }
    }

    pub const fn coords(&self) -> Coord2 {
        self.coords
    }

    pub const fn is_mine(&self) -> bool {
        self.is_mine
    }

    /// Number of mined neighbors, always 0 for mines themselves.
    pub const fn adjacent_mines(&self) -> u8 {
        self.adjacent_mines
    }

    pub const fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub const fn flag(&self) -> FlagState {
        self.flag
    }

    /// Whether this is the mine the player set off.
    pub const fn is_hit(&self) -> bool {
        self.hit
    }

    pub const fn is_selected(&self) -> bool {
        self.selected
    }

    /// Whether a left press may pick this tile: still hidden and not confidently flagged.
    pub const fn is_selectable(&self) -> bool {
        !self.revealed && !matches!(self.flag, FlagState::Flagged)
    }

    /// In-bounds neighbors in column-major order.
    pub fn adjacent_coords(&self, board: &Board) -> SmallVec<[Coord2; 8]> {
        board.neighbors(self.coords).collect()
    }

    pub fn adjacent_tiles<'b>(&self, board: &'b Board) -> impl Iterator<Item = &'b Tile> + use<'b> {
        board.neighbors(self.coords).map(move |pos| &board[pos])
    }

    pub(crate) fn set_mine(&mut self) -> bool {
        !core::mem::replace(&mut self.is_mine, true)
    }

    pub(crate) fn set_adjacent_mines(&mut self, count: u8) {
        self.adjacent_mines = if self.is_mine { 0 } else { count };
    }

    /// Reveals the tile unless a flag blocks it. Returns whether it was newly revealed.
    pub(crate) fn reveal(&mut self) -> bool {
        if self.revealed || self.flag.blocks_reveal() {
            return false;
        }
        self.revealed = true;
        self.selected = false;
        true
    }

    pub(crate) fn cycle_flag(&mut self) -> Option<FlagState> {
        if self.revealed {
            return None;
        }
        self.flag = self.flag.cycled();
        Some(self.flag)
    }

    pub(crate) fn clear_tentative(&mut self) -> bool {
        if matches!(self.flag, FlagState::Tentative) {
            self.flag = FlagState::None;
            true
        } else {
            false
        }
    }

    pub(crate) fn clear_flag(&mut self) -> FlagState {
        core::mem::take(&mut self.flag)
    }

    pub(crate) fn mark_hit(&mut self) {
        if self.is_mine && !self.revealed {
            self.hit = true;
        }
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        self.selected = selected && self.is_selectable();
    }
}
