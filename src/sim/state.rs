//! Everything the simulation thread owns between ticks

use super::spawner::Spawner;
use super::world::World;
use crate::settings::Controls;

#[derive(Debug, Clone)]
pub struct GameState {
    pub world: World,
    pub spawner: Spawner,
    pub controls: Controls,
}

impl GameState {
    pub fn new(world: World, controls: Controls, seed: u64) -> Self {
        Self {
            world,
            spawner: Spawner::new(seed),
            controls,
        }
    }

    /// Completed ticks
    pub fn time_ticks(&self) -> u64 {
        self.world.time_ticks
    }
}
