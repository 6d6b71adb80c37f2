use core::ops::Index;
use ndarray::Array2;

use crate::*;

/// The grid of tiles for one game. Built fresh for every new game.
#[derive(Clone, Debug, PartialEq)]
pub struct Board {
    tiles: Array2<Tile>,
    mine_count: CellCount,
    revealed_count: CellCount,
}

impl Board {
    /// Allocates a mine-free grid; mines and counts come from [`Board::place_mines`] and
    /// [`Board::compute_adjacency`].
    pub fn initialize(config: GameConfig) -> Result<Self> {
        config.validate()?;
        let tiles = Array2::from_shape_fn(config.size.to_nd_index(), |(x, y)| {
            // within `config.size`, which is made of `Coord`s
            Tile::new((x as Coord, y as Coord))
        });
        Ok(Self {
            tiles,
            mine_count: config.mines,
            revealed_count: 0,
        })
    }

    /// Initializes the grid, places mines and precomputes every adjacency count.
    pub fn generate(config: GameConfig, generator: impl MineGenerator) -> Result<Self> {
        let mut board = Self::initialize(config)?;
        board.place_mines(generator)?;
        board.compute_adjacency();
        Ok(board)
    }

    /// Marks the generated mines. Only the first call on a board has any effect.
    pub fn place_mines(&mut self, generator: impl MineGenerator) -> Result<()> {
        if self.tiles.iter().any(Tile::is_mine) {
            log::warn!("Mines were already placed, keeping the existing layout");
            return Ok(());
        }

        let coords = generator.generate(self.config())?;
        let mut placed: CellCount = 0;
        for pos in coords {
            let pos = self.validate_coords(pos)?;
            if self.tiles[pos.to_nd_index()].set_mine() {
                placed += 1;
            }
        }

        // double check mine count
        if placed != self.mine_count {
            log::warn!(
                "Generated minefield count mismatch, actual: {}, requested: {}",
                placed,
                self.mine_count
            );
            self.mine_count = placed;
        }
        Ok(())
    }

    pub fn compute_adjacency(&mut self) {
        let (x_end, y_end) = self.size();
        for x in 0..x_end {
            for y in 0..y_end {
                let count = self
                    .neighbors((x, y))
                    .filter(|&pos| self[pos].is_mine())
                    .count();
                // at most 8 neighbors
                self.tiles[(x, y).to_nd_index()].set_adjacent_mines(count as u8);
            }
        }
    }

    pub fn config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.size(), self.mine_count)
    }

    pub fn size(&self) -> Coord2 {
        let (dim_x, dim_y) = self.tiles.dim();
        (dim_x as Coord, dim_y as Coord)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn total_cells(&self) -> CellCount {
        // never more than Coord::MAX squared
        self.tiles.len() as CellCount
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    pub fn unrevealed_count(&self) -> CellCount {
        self.total_cells() - self.revealed_count
    }

    /// Every safe tile is open, regardless of flags.
    pub fn is_cleared(&self) -> bool {
        self.unrevealed_count() == self.mine_count
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        let size = self.size();
        coords.0 < size.0 && coords.1 < size.1
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if self.contains(coords) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords(coords))
        }
    }

    pub fn tile(&self, coords: Coord2) -> Option<&Tile> {
        self.tiles.get(coords.to_nd_index())
    }

    /// All tiles, column by column.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    pub fn neighbors(&self, coords: Coord2) -> NeighborIter {
        self.tiles.iter_neighbors(coords)
    }

    pub(crate) fn tile_mut(&mut self, coords: Coord2) -> &mut Tile {
        &mut self.tiles[coords.to_nd_index()]
    }

    /// Reveals a single tile, keeping the revealed counter in sync.
    pub(crate) fn open(&mut self, coords: Coord2) -> bool {
        let opened = self.tile_mut(coords).reveal();
        if opened {
            self.revealed_count += 1;
        }
        opened
    }

    /// Reveals whatever is not revealed yet, stripping flags first.
    pub(crate) fn open_all(&mut self) -> CellCount {
        let mut opened = 0;
        for tile in self.tiles.iter_mut() {
            tile.clear_flag();
            if tile.reveal() {
                opened += 1;
            }
        }
        self.revealed_count += opened;
        opened
    }
}

impl Index<Coord2> for Board {
    type Output = Tile;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.tiles[coords.to_nd_index()]
    }
}
