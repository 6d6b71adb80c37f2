use ndarray::Array2;

use super::*;

/// Uniform placement by rejection sampling: draw a random cell, keep it if it is not mined yet.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMineGenerator {
    seed: u64,
}

impl RandomMineGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MineGenerator for RandomMineGenerator {
    fn generate(self, config: GameConfig) -> Result<Vec<Coord2>> {
        use rand::prelude::*;

        config.validate()?;
        let (size_x, size_y) = config.size;

        // rejection sampling degrades badly near a full board, no randomness needed anyway
        if config.mines == config.total_cells() {
            log::debug!("Minefield full, every one of {} cells is a mine", config.mines);
            return Ok((0..size_x)
                .flat_map(|x| (0..size_y).map(move |y| (x, y)))
                .collect());
        }

        let mut taken: Array2<bool> = Array2::default(config.size.to_nd_index());
        let mut mines = Vec::with_capacity(config.mines.into());
        let mut draws = 0u32;

        let mut rng = SmallRng::seed_from_u64(self.seed);
        while mines.len() < usize::from(config.mines) {
            let coords = (rng.random_range(0..size_x), rng.random_range(0..size_y));
            draws += 1;
            let cell = &mut taken[coords.to_nd_index()];
            if !*cell {
                *cell = true;
                mines.push(coords);
            }
        }

        log::debug!(
            "Placed {} mines in {} draws, seed: {}",
            mines.len(),
            draws,
            self.seed
        );
        Ok(mines)
    }
}
