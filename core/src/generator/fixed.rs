use super::*;

/// Places mines at exactly the given coordinates, for scripted layouts.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedMineGenerator {
    mines: Vec<Coord2>,
}

impl FixedMineGenerator {
    pub fn new(mines: &[Coord2]) -> Self {
        Self {
            mines: mines.to_vec(),
        }
    }
}

impl MineGenerator for FixedMineGenerator {
    fn generate(self, config: GameConfig) -> Result<Vec<Coord2>> {
        let (size_x, size_y) = config.size;
        for &coords in &self.mines {
            if coords.0 >= size_x || coords.1 >= size_y {
                return Err(GameError::InvalidCoords(coords));
            }
        }
        Ok(self.mines)
    }
}
