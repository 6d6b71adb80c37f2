use crate::*;
pub use fixed::*;
pub use random::*;

mod fixed;
mod random;

/// Decides where the mines go. Implementations return distinct in-bounds coordinates.
pub trait MineGenerator {
    fn generate(self, config: GameConfig) -> Result<Vec<Coord2>>;
}
