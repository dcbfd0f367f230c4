//! Fixed timestep simulation tick

use super::physics::update_state;
use super::spawner::despawn_flagged_objects;
use super::state::GameState;
use crate::error::SimError;
use crate::input::{PointerEvent, PressedKeys};

/// Input for a single tick, already drained from the input channel
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Keys held at the start of the tick
    pub keys: PressedKeys,
    /// Pointer events in arrival order
    pub pointer_events: Vec<PointerEvent>,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) -> Result<(), SimError> {
    state.spawner.update_weapon_mode(&input.keys, &state.controls);

    for event in &input.pointer_events {
        state.spawner.register_pointer_event(*event);
        state.spawner.spawn_player_projectiles(&mut state.world);
    }

    update_state(&mut state.world, &input.keys, &state.controls)?;
    despawn_flagged_objects(&mut state.world);

    state.world.time_ticks += 1;
    Ok(())
}
