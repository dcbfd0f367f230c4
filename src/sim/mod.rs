//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (collection order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod objects;
pub mod physics;
pub mod rect;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod world;

pub use collision::{Collision, CollisionsProcessor, GameEvent};
pub use objects::{
    Buff, BuffKind, GameObject, Layer, ObjectId, ObjectKind, Platform, Player, Projectile,
    ProjectileKind,
};
pub use physics::{Multipliers, update_state};
pub use rect::Aabb;
pub use spawner::{Spawner, WeaponMode, despawn_flagged_objects};
pub use state::GameState;
pub use tick::{TickInput, tick};
pub use world::World;
