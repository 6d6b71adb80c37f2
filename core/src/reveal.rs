use smallvec::SmallVec;
use std::collections::VecDeque;

use crate::*;

/// Reveal rules applied to a borrowed board: single commits, flood fill and chords.
#[derive(Debug)]
pub struct RevealEngine<'a> {
    board: &'a mut Board,
}

impl<'a> RevealEngine<'a> {
    pub fn new(board: &'a mut Board) -> Self {
        Self { board }
    }

    /// Commits a reveal on one tile: a tentative flag is dropped, a mine is marked as hit and
    /// every other mine exposed, a blank tile floods its region.
    pub fn reveal_tile(&mut self, coords: Coord2) -> RevealOutcome {
        let tile = self.board[coords];
        if tile.is_revealed() || matches!(tile.flag(), FlagState::Flagged) {
            return RevealOutcome::NoChange;
        }
        self.board.tile_mut(coords).clear_tentative();

        if tile.is_mine() {
            log::debug!("Mine hit at {:?}", coords);
            self.board.tile_mut(coords).mark_hit();
            self.expose_mines();
            self.board.open(coords);
            return RevealOutcome::HitMine;
        }

        if tile.adjacent_mines() == 0 {
            self.reveal_blank_region(coords);
        }
        self.board.open(coords);
        log::debug!("Open tile at {:?}, mine count: {}", coords, tile.adjacent_mines());
        RevealOutcome::Revealed
    }

    /// Flood fill from `start` with an explicit work queue. Opens the connected blank tiles and
    /// their numbered border, never a mine or a flagged tile. Returns how many tiles it opened.
    pub fn reveal_blank_region(&mut self, start: Coord2) -> CellCount {
        let mut opened: CellCount = 0;
        if self.is_floodable(start) {
            self.board.open(start);
            opened += 1;
        }

        let mut to_visit: VecDeque<_> = self
            .board
            .neighbors(start)
            .filter(|&pos| self.is_floodable(pos))
            .collect();
        log::trace!(
            "Starting flood-fill from {:?}, initial neighbors: {:?}",
            start,
            to_visit
        );

        while let Some(visit_coords) = to_visit.pop_front() {
            // queued more than once, or opened since
            if !self.is_floodable(visit_coords) {
                continue;
            }

            self.board.open(visit_coords);
            opened += 1;
            let visit_count = self.board[visit_coords].adjacent_mines();
            log::trace!(
                "Flood opened tile at {:?}, mine count: {}",
                visit_coords,
                visit_count
            );

            if visit_count == 0 {
                to_visit.extend(
                    self.board
                        .neighbors(visit_coords)
                        .filter(|&pos| self.is_floodable(pos)),
                );
            }
        }

        opened
    }

    /// Opens every unmarked neighbor of a revealed number once exactly that many neighbors carry
    /// a confident flag. Otherwise nothing changes.
    pub fn chord_reveal(&mut self, center: Coord2) -> RevealOutcome {
        let tile = self.board[center];
        let count = tile.adjacent_mines();
        if !tile.is_revealed() || count == 0 {
            return RevealOutcome::NoChange;
        }

        let neighbors: SmallVec<[Coord2; 8]> = tile.adjacent_coords(self.board);
        let flagged = neighbors
            .iter()
            .filter(|&&pos| matches!(self.board[pos].flag(), FlagState::Flagged))
            .count();
        if flagged != usize::from(count) {
            log::trace!(
                "Chord at {:?} ignored, {} flags around a {}",
                center,
                flagged,
                count
            );
            return RevealOutcome::NoChange;
        }

        log::debug!("Chord at {:?}", center);
        let mut outcome = RevealOutcome::NoChange;
        for pos in neighbors {
            let neighbor = self.board[pos];
            // an earlier neighbor may have flooded or exposed this one already
            if neighbor.is_revealed() || !matches!(neighbor.flag(), FlagState::None) {
                continue;
            }
            outcome = outcome | self.reveal_tile(pos);
        }
        outcome
    }

    /// Loss reveal: hidden mines drop tentative flags and are opened unless confidently flagged.
    pub fn expose_mines(&mut self) -> CellCount {
        let hidden_mines: Vec<Coord2> = self
            .board
            .tiles()
            .filter(|tile| tile.is_mine() && !tile.is_revealed())
            .map(Tile::coords)
            .collect();

        let mut opened = 0;
        for coords in hidden_mines {
            self.board.tile_mut(coords).clear_tentative();
            if self.board.open(coords) {
                opened += 1;
            }
        }
        log::debug!("Exposed {} mines", opened);
        opened
    }

    fn is_floodable(&self, coords: Coord2) -> bool {
        let tile = self.board[coords];
        !tile.is_mine() && !tile.is_revealed() && matches!(tile.flag(), FlagState::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(size: Coord2, mines: &[Coord2]) -> Board {
        let config = GameConfig::new(size, mines.len() as CellCount).unwrap();
        Board::generate(config, FixedMineGenerator::new(mines)).unwrap()
    }

    fn revealed(board: &Board) -> Vec<Coord2> {
        board
            .tiles()
            .filter(|t| t.is_revealed())
            .map(Tile::coords)
            .collect()
    }

    fn cycle_to(board: &mut Board, coords: Coord2, flag: FlagState) {
        while board[coords].flag() != flag {
            board.tile_mut(coords).cycle_flag();
        }
    }

    #[test]
    fn flood_opens_blank_region_and_border() {
        // mine column at x = 2 splits the board
        let mut board = layout((5, 3), &[(2, 0), (2, 1), (2, 2)]);

        RevealEngine::new(&mut board).reveal_tile((0, 0));

        assert_eq!(
            revealed(&board),
            vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]
        );
        assert!(board[(1, 1)].adjacent_mines() > 0);
        assert!(!board[(3, 1)].is_revealed());
    }

    #[test]
    fn flood_result_is_closed_and_safe() {
        for seed in 0..8 {
            let mut board =
                Board::generate(GameConfig::CLASSIC, RandomMineGenerator::new(seed)).unwrap();
            let Some(start) = board
                .tiles()
                .find(|t| !t.is_mine() && t.adjacent_mines() == 0)
                .map(Tile::coords)
            else {
                continue;
            };

            RevealEngine::new(&mut board).reveal_blank_region(start);

            for tile in board.tiles().filter(|t| t.is_revealed()) {
                assert!(!tile.is_mine());
                if tile.adjacent_mines() == 0 {
                    for neighbor in tile.adjacent_tiles(&board) {
                        assert!(neighbor.is_revealed(), "{:?} left closed", neighbor.coords());
                    }
                }
            }
            assert_eq!(usize::from(board.revealed_count()), revealed(&board).len());
        }
    }

    #[test]
    fn flood_stops_at_flags_of_either_kind() {
        let mut board = layout((4, 1), &[]);
        cycle_to(&mut board, (2, 0), FlagState::Tentative);

        let opened = RevealEngine::new(&mut board).reveal_blank_region((0, 0));

        assert_eq!(opened, 2);
        assert_eq!(revealed(&board), vec![(0, 0), (1, 0)]);
        assert_eq!(board[(2, 0)].flag(), FlagState::Tentative);
    }

    #[test]
    fn flood_is_idempotent() {
        let mut board = layout((5, 5), &[(4, 4)]);
        let mut engine = RevealEngine::new(&mut board);
        let first = engine.reveal_blank_region((0, 0));
        let second = engine.reveal_blank_region((0, 0));
        assert_eq!(first, 24);
        assert_eq!(second, 0);
    }

    #[test]
    fn revealing_tentative_tile_drops_the_marker() {
        let mut board = layout((3, 3), &[(2, 2)]);
        cycle_to(&mut board, (0, 0), FlagState::Tentative);

        let outcome = RevealEngine::new(&mut board).reveal_tile((0, 0));

        assert_eq!(outcome, RevealOutcome::Revealed);
        assert!(board[(0, 0)].is_revealed());
        assert_eq!(board[(0, 0)].flag(), FlagState::None);
    }

    #[test]
    fn flagged_tile_is_not_revealed() {
        let mut board = layout((3, 3), &[(2, 2)]);
        cycle_to(&mut board, (0, 0), FlagState::Flagged);

        assert_eq!(
            RevealEngine::new(&mut board).reveal_tile((0, 0)),
            RevealOutcome::NoChange
        );
        assert_eq!(board.revealed_count(), 0);
    }

    #[test]
    fn hitting_a_mine_exposes_unflagged_mines_only() {
        let mut board = layout((4, 4), &[(0, 0), (3, 3), (3, 0), (0, 3)]);
        cycle_to(&mut board, (3, 3), FlagState::Flagged);
        cycle_to(&mut board, (3, 0), FlagState::Tentative);
        cycle_to(&mut board, (1, 1), FlagState::Flagged);

        let outcome = RevealEngine::new(&mut board).reveal_tile((0, 0));

        assert_eq!(outcome, RevealOutcome::HitMine);
        assert!(board[(0, 0)].is_hit());
        assert!(board[(0, 0)].is_revealed());
        assert!(board[(0, 3)].is_revealed());
        assert!(!board[(0, 3)].is_hit());
        assert!(board[(3, 0)].is_revealed());
        assert_eq!(board[(3, 0)].flag(), FlagState::None);
        assert!(!board[(3, 3)].is_revealed());
        assert_eq!(board[(3, 3)].flag(), FlagState::Flagged);
        // wrong flag on a safe tile stays as it is
        assert!(!board[(1, 1)].is_revealed());
        assert_eq!(board.revealed_count(), 3);
    }

    #[test]
    fn chord_with_matching_flags_opens_the_rest() {
        let mut board = layout((3, 3), &[(0, 1), (2, 1)]);
        let mut engine = RevealEngine::new(&mut board);
        engine.reveal_tile((1, 1));
        cycle_to(&mut board, (0, 1), FlagState::Flagged);
        cycle_to(&mut board, (2, 1), FlagState::Flagged);
        assert_eq!(board[(1, 1)].adjacent_mines(), 2);

        let outcome = RevealEngine::new(&mut board).chord_reveal((1, 1));

        assert_eq!(outcome, RevealOutcome::Revealed);
        assert_eq!(board.revealed_count(), 7);
        assert!(!board[(0, 1)].is_revealed());
        assert!(!board[(2, 1)].is_revealed());
    }

    #[test]
    fn chord_with_too_few_flags_changes_nothing() {
        let mut board = layout((3, 3), &[(0, 1), (2, 1)]);
        RevealEngine::new(&mut board).reveal_tile((1, 1));
        cycle_to(&mut board, (0, 1), FlagState::Flagged);
        let before = board.clone();

        let outcome = RevealEngine::new(&mut board).chord_reveal((1, 1));

        assert_eq!(outcome, RevealOutcome::NoChange);
        assert_eq!(board, before);
    }

    #[test]
    fn tentative_flags_do_not_count_for_chords() {
        let mut board = layout((3, 3), &[(0, 1), (2, 1)]);
        RevealEngine::new(&mut board).reveal_tile((1, 1));
        cycle_to(&mut board, (0, 1), FlagState::Flagged);
        cycle_to(&mut board, (2, 1), FlagState::Tentative);

        assert_eq!(
            RevealEngine::new(&mut board).chord_reveal((1, 1)),
            RevealOutcome::NoChange
        );
        assert_eq!(board.revealed_count(), 1);
    }

    #[test]
    fn chord_skips_tentative_neighbors() {
        let mut board = layout((3, 3), &[(0, 1)]);
        RevealEngine::new(&mut board).reveal_tile((1, 1));
        cycle_to(&mut board, (0, 1), FlagState::Flagged);
        cycle_to(&mut board, (2, 2), FlagState::Tentative);

        RevealEngine::new(&mut board).chord_reveal((1, 1));

        assert!(!board[(2, 2)].is_revealed());
        assert_eq!(board[(2, 2)].flag(), FlagState::Tentative);
        assert!(board[(2, 1)].is_revealed());
    }

    #[test]
    fn chord_with_misplaced_flag_hits_the_mine() {
        let mut board = layout((3, 3), &[(0, 0)]);
        RevealEngine::new(&mut board).reveal_tile((1, 1));
        cycle_to(&mut board, (2, 2), FlagState::Flagged);

        let outcome = RevealEngine::new(&mut board).chord_reveal((1, 1));

        assert_eq!(outcome, RevealOutcome::HitMine);
        assert!(board[(0, 0)].is_hit());
        assert!(board[(0, 0)].is_revealed());
    }

    #[test]
    fn chord_on_hidden_or_blank_tile_is_ignored() {
        let mut board = layout((3, 3), &[(0, 0)]);
        assert_eq!(
            RevealEngine::new(&mut board).chord_reveal((1, 1)),
            RevealOutcome::NoChange
        );
        let mut blank = layout((3, 1), &[]);
        RevealEngine::new(&mut blank).reveal_blank_region((0, 0));
        assert_eq!(
            RevealEngine::new(&mut blank).chord_reveal((1, 0)),
            RevealOutcome::NoChange
        );
    }
}
