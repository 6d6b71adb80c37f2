use bitflags::bitflags;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::*;

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct PointerButtons: u16 {
        const LEFT    = 1;
        const RIGHT   = 1 << 1;
        const MIDDLE  = 1 << 2;
    }
}

/// What the pointer is over, already resolved from pixels by the collaborator.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PointerTarget {
    Cell(Coord2),
    /// The restart control (the face button).
    Restart,
    Outside,
}

/// Valid transitions:
/// - InProgress -> Won
/// - InProgress -> Lost
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    #[default]
    InProgress,
    Won,
    Lost,
}

impl Outcome {
    /// Indicates the game has ended and no moves can be made anymore
    pub const fn is_terminal(self) -> bool {
        match self {
            Outcome::InProgress => false,
            Outcome::Won => true,
            Outcome::Lost => true,
        }
    }
}

/// One player's game from first click to restart. Owns the board; every mutation goes through
/// the pointer methods below, which return whether anything visible changed.
#[derive(Debug)]
pub struct GameSession {
    config: GameConfig,
    board: Board,
    outcome: Outcome,
    flagged: CellCount,
    selected: Option<Coord2>,
    /// Left button went down on the board while the game was running.
    left_held: bool,
    /// `Some(hovering)` while the restart control is being pressed.
    restart_press: Option<bool>,
    clock: GameClock,
    seeds: SmallRng,
}

impl GameSession {
    /// Random layout for `config`; later games draw their seeds from `seed` as well.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self> {
        let mut seeds = SmallRng::seed_from_u64(seed);
        let board = Board::generate(config, RandomMineGenerator::new(seeds.random()))?;
        Ok(Self::from_board(board, seeds))
    }

    pub fn classic(seed: u64) -> Result<Self> {
        Self::new(GameConfig::CLASSIC, seed)
    }

    /// First game laid out by `generator`, restarts are random.
    pub fn with_generator(
        config: GameConfig,
        generator: impl MineGenerator,
        seed: u64,
    ) -> Result<Self> {
        let board = Board::generate(config, generator)?;
        Ok(Self::from_board(board, SmallRng::seed_from_u64(seed)))
    }

    fn from_board(board: Board, seeds: SmallRng) -> Self {
        log::debug!(
            "New game {:?} with {} mines",
            board.size(),
            board.mine_count()
        );
        Self {
            config: board.config(),
            board,
            outcome: Outcome::InProgress,
            flagged: 0,
            selected: None,
            left_held: false,
            restart_press: None,
            clock: GameClock::new(),
            seeds,
        }
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn tile_at(&self, coords: Coord2) -> Option<&Tile> {
        self.board.tile(coords)
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome.is_terminal()
    }

    pub fn selected(&self) -> Option<Coord2> {
        self.selected
    }

    /// Number of tiles carrying a confident flag.
    pub fn flagged_count(&self) -> CellCount {
        self.flagged
    }

    /// How many mines have not been flagged yet, negative when there are too many flags
    pub fn mines_left(&self) -> i32 {
        i32::from(self.board.mine_count()) - i32::from(self.flagged)
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.clock.elapsed_secs()
    }

    pub fn is_timer_running(&self) -> bool {
        self.clock.is_running()
    }

    /// Handle for a [`Ticker`]; replaced on every restart.
    pub fn clock(&self) -> GameClock {
        self.clock.clone()
    }

    pub fn is_restart_pressed(&self) -> bool {
        self.restart_press.is_some()
    }

    pub fn face(&self) -> Face {
        match (self.restart_press, self.outcome) {
            (Some(true), _) => Face::Down,
            (_, Outcome::Lost) => Face::Dead,
            (_, Outcome::Won) => Face::Win,
            _ if self.left_held => Face::Ooh,
            _ => Face::Idle,
        }
    }

    pub fn pointer_down(&mut self, button: PointerButtons, target: PointerTarget) -> bool {
        let target = self.resolve(target);
        log::trace!("pointer down {:?} at {:?}", button, target);
        match button {
            PointerButtons::LEFT => self.press_left(target),
            PointerButtons::RIGHT => self.press_right(target),
            _ => false,
        }
    }

    /// Motion with `buttons` held. Only a held left button matters: it drags either the restart
    /// press or the tile selection along.
    pub fn pointer_move(&mut self, buttons: PointerButtons, target: PointerTarget) -> bool {
        if !buttons.contains(PointerButtons::LEFT) {
            return false;
        }
        let target = self.resolve(target);

        if let Some(hovering) = self.restart_press.as_mut() {
            let now_hovering = target == PointerTarget::Restart;
            let changed = *hovering != now_hovering;
            *hovering = now_hovering;
            return changed;
        }

        if self.outcome.is_terminal() {
            return false;
        }

        match target {
            PointerTarget::Cell(coords) if self.board[coords].is_selectable() => {
                self.select(coords)
            }
            _ => self.clear_selection(),
        }
    }

    /// Release of `button`. Releasing left over the selected tile commits the reveal, releasing
    /// it over a pressed restart control starts a new game.
    pub fn pointer_up(&mut self, button: PointerButtons, target: PointerTarget) -> bool {
        if button != PointerButtons::LEFT {
            return false;
        }
        let target = self.resolve(target);
        log::trace!("pointer up {:?} at {:?}", button, target);

        let mut changed = core::mem::take(&mut self.left_held);

        if self.restart_press.take().is_some() {
            if target == PointerTarget::Restart {
                self.restart();
            }
            return true;
        }

        if self.outcome.is_terminal() {
            return changed;
        }

        if let Some(coords) = self.selected.take() {
            self.board.tile_mut(coords).set_selected(false);
            self.commit_reveal(coords);
            changed = true;
        }
        changed
    }

    /// Double left click: chord on a revealed number.
    pub fn double_click(&mut self, target: PointerTarget) -> bool {
        if self.selected.is_some() || self.outcome.is_terminal() {
            return false;
        }
        let PointerTarget::Cell(coords) = self.resolve(target) else {
            return false;
        };

        let outcome = RevealEngine::new(&mut self.board).chord_reveal(coords);
        self.apply(outcome);
        outcome.has_update()
    }

    /// Throws the current game away and lays out a new one with the same config.
    pub fn restart(&mut self) -> bool {
        let seed = self.seeds.random();
        let board = match Board::generate(self.config, RandomMineGenerator::new(seed)) {
            Ok(board) => board,
            Err(err) => {
                log::error!("Could not lay out a new game: {}", err);
                return false;
            }
        };

        self.clock.halt();
        let seeds = core::mem::replace(&mut self.seeds, SmallRng::seed_from_u64(0));
        *self = Self::from_board(board, seeds);
        true
    }

    /// Debug aid: drops every flag and opens the whole board. The outcome is left alone.
    pub fn reveal_all_debug(&mut self) -> bool {
        log::warn!("Revealing the whole board");
        self.clear_selection();
        let opened = self.board.open_all();
        self.flagged = 0;
        opened > 0
    }

    fn press_left(&mut self, target: PointerTarget) -> bool {
        if target == PointerTarget::Restart {
            self.restart_press = Some(true);
            return true;
        }
        if self.outcome.is_terminal() {
            return false;
        }

        self.left_held = true;
        if let PointerTarget::Cell(coords) = target {
            if self.board[coords].is_selectable() {
                self.select(coords);
            }
        }
        true
    }

    fn press_right(&mut self, target: PointerTarget) -> bool {
        // a pending left press keeps the board locked
        if self.selected.is_some() || self.outcome.is_terminal() {
            return false;
        }
        let PointerTarget::Cell(coords) = target else {
            return false;
        };

        let Some(flag) = self.board.tile_mut(coords).cycle_flag() else {
            return false;
        };
        match flag {
            FlagState::Flagged => self.flagged += 1,
            FlagState::Tentative => self.flagged -= 1,
            FlagState::None => {}
        }
        log::debug!("Flag at {:?} now {:?}", coords, flag);
        true
    }

    fn select(&mut self, coords: Coord2) -> bool {
        if self.selected == Some(coords) {
            return false;
        }
        self.clear_selection();
        self.board.tile_mut(coords).set_selected(true);
        self.selected = Some(coords);
        true
    }

    fn clear_selection(&mut self) -> bool {
        match self.selected.take() {
            Some(coords) => {
                self.board.tile_mut(coords).set_selected(false);
                true
            }
            None => false,
        }
    }

    fn commit_reveal(&mut self, coords: Coord2) {
        let outcome = RevealEngine::new(&mut self.board).reveal_tile(coords);
        if outcome.has_update() && self.clock.start() {
            log::debug!("Timer started by reveal at {:?}", coords);
        }
        self.apply(outcome);
    }

    fn apply(&mut self, outcome: RevealOutcome) {
        match outcome {
            RevealOutcome::HitMine => self.end_game(false),
            RevealOutcome::Revealed if self.board.is_cleared() => self.end_game(true),
            RevealOutcome::Revealed | RevealOutcome::NoChange => {}
        }
    }

    fn end_game(&mut self, won: bool) {
        if self.outcome.is_terminal() {
            return;
        }
        self.outcome = if won { Outcome::Won } else { Outcome::Lost };
        self.clear_selection();
        self.left_held = false;
        self.clock.stop();
        log::debug!("Game ended: {:?}", self.outcome);
    }

    /// Cells outside the board are treated as the pointer being off the board.
    fn resolve(&self, target: PointerTarget) -> PointerTarget {
        match target {
            PointerTarget::Cell(coords) if !self.board.contains(coords) => PointerTarget::Outside,
            target => target,
        }
    }
}

impl Drop for GameSession {
    fn drop(&mut self) {
        self.clock.halt();
    }
}
