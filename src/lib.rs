//! Squares Battle - simulation core for a 2D platformer
//!
//! Core modules:
//! - `sim`: Fixed-tick simulation (collisions, physics, spawning, world model)
//! - `input`: Pressed-key set and the bounded input event channel
//! - `engine`: Simulation thread, tick clock and the render hand-off slot
//! - `renderer`: Read-only world snapshots and per-kind draw commands
//! - `persistence`: Versioned save/load of worlds
//! - `maps`: Built-in raw maps
//! - `settings`: Key bindings and loop configuration
//! - `cli`: Launcher command line

pub mod cli;
pub mod engine;
pub mod error;
pub mod input;
pub mod maps;
pub mod persistence;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{LaunchError, PersistenceError, SettingsError, SimError, WorldError};
pub use settings::{Controls, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Fixed simulation rate (ticks per second)
    pub const TICK_RATE_HZ: u32 = 60;

    /// Field size used by the built-in maps
    pub const DEFAULT_FIELD_SIZE: Vec2 = Vec2::new(1000.0, 700.0);

    /// Player is a square
    pub const PLAYER_SIDE_LENGTH: f32 = 45.0;
    /// Horizontal speed (units per tick) before buff multipliers
    pub const PLAYER_MOVE_SPEED: f32 = 6.0;
    /// Hand point relative to the player's top-left corner
    pub const PLAYER_HAND_OFFSET: Vec2 = Vec2::new(35.0, 15.0);

    /// Added to vertical velocity every airborne tick
    pub const GRAVITY_ACCELERATION: f32 = 2.5;
    /// Terminal fall speed
    pub const MAX_VERTICAL_VELOCITY: f32 = 12.0;
    /// Launch speed of a jump (applied upwards, i.e. negative y)
    pub const INITIAL_JUMP_VELOCITY: f32 = 25.0;

    /// Far-side border clamp goes one unit past flush for closest-to-border drawing
    pub const BORDER_SNAP_INSET: f32 = 1.0;

    /// Buffs are squares
    pub const BUFF_SIDE_LENGTH: f32 = 30.0;
    /// Ticks a captured buff stays attached before it recharges (5 seconds)
    pub const BUFF_RECHARGE_TICKS: u64 = 5 * TICK_RATE_HZ as u64;
    /// Horizontal speed multiplier granted by a speed-up buff
    pub const SPEED_UP_MULTIPLIER: f32 = 2.0;
    /// Jump velocity multiplier granted by a jump-height-up buff
    pub const JUMP_HEIGHT_UP_MULTIPLIER: f32 = 1.5;

    /// Handgun projectile circle
    pub const HANDGUN_PROJECTILE_DIAMETER: f32 = 10.0;
    pub const HANDGUN_PROJECTILE_SPEED: f32 = 15.0;
    /// Machine gun projectile circle
    pub const MACHINE_GUN_PROJECTILE_DIAMETER: f32 = 6.0;
    pub const MACHINE_GUN_PROJECTILE_SPEED: f32 = 20.0;
    /// Max angular deviation of a machine gun shot (radians)
    pub const MACHINE_GUN_SCATTER_RADIANS: f32 = 0.12;
    /// Projectiles appear this far ahead of the hand along the aim direction
    pub const PROJECTILE_LEAD_DISTANCE: f32 = 10.0;
}

/// Unit vector from `from` towards `to`, or zero if they coincide
#[inline]
pub fn aim_direction(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}

/// Rotate a vector by `angle` radians
#[inline]
pub fn rotate_vector(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}
