//! Per-tick state updates for movable objects
//!
//! Order inside one update: buff expiry, then every movable object in
//! collection order. Players read input, integrate velocity, ask the
//! collision processor about the resulting displacement and apply the answers
//! one by one. Projectiles fly along their fixed vector until they leave the
//! field.

use glam::Vec2;

use super::collision::{Collision, CollisionsProcessor, GameEvent};
use super::objects::{BuffKind, ObjectId, ObjectKind, Player};
use super::world::World;
use crate::consts::*;
use crate::error::SimError;
use crate::input::PressedKeys;
use crate::settings::Controls;

/// Per-tick scratch multipliers derived from the player's buffs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Multipliers {
    pub horizontal_speed: f32,
    pub jump_velocity: f32,
}

impl Default for Multipliers {
    fn default() -> Self {
        Self {
            horizontal_speed: 1.0,
            jump_velocity: 1.0,
        }
    }
}

impl Multipliers {
    /// Multipliers for a player holding the given buffs
    pub fn from_buffs(world: &World, buffs: &[ObjectId]) -> Self {
        let mut multipliers = Self::default();
        for &id in buffs {
            match world.find_immovable(id).and_then(|o| o.as_buff()) {
                Some(buff) => match buff.kind {
                    BuffKind::SpeedUp => multipliers.horizontal_speed = SPEED_UP_MULTIPLIER,
                    BuffKind::JumpHeightUp => multipliers.jump_velocity = JUMP_HEIGHT_UP_MULTIPLIER,
                },
                None => log::warn!("Player holds unknown buff {}", id),
            }
        }
        multipliers
    }
}

/// Horizontal velocity from the move keys; opposing keys cancel out
pub fn horizontal_velocity(keys: &PressedKeys, controls: &Controls, multiplier: f32) -> f32 {
    let mut velocity = 0.0;
    if keys.contains(controls.move_left) {
        velocity -= PLAYER_MOVE_SPEED * multiplier;
    }
    if keys.contains(controls.move_right) {
        velocity += PLAYER_MOVE_SPEED * multiplier;
    }
    velocity
}

/// Advance every movable object by one tick
pub fn update_state(
    world: &mut World,
    keys: &PressedKeys,
    controls: &Controls,
) -> Result<(), SimError> {
    check_buff_expiration(world)?;

    for index in 0..world.movable_objects.len() {
        match &world.movable_objects[index].kind {
            ObjectKind::Player(_) => update_player_state(world, index, keys, controls)?,
            ObjectKind::Projectile(_) => update_projectile_state(world, index)?,
            ObjectKind::Buff(_) | ObjectKind::Platform(_) => {
                return Err(SimError::UnsupportedMover {
                    method: "update_state",
                    kind: world.movable_objects[index].kind_name(),
                });
            }
        }
    }

    Ok(())
}

/// Input, gravity and collisions for the player at `movable_objects[index]`
pub fn update_player_state(
    world: &mut World,
    index: usize,
    keys: &PressedKeys,
    controls: &Controls,
) -> Result<(), SimError> {
    let multipliers = match world.movable_objects[index].as_player() {
        Some(player) => Multipliers::from_buffs(world, &player.current_buffs),
        None => return Err(missing(world, index, "update_player_state")),
    };

    let horizontal = horizontal_velocity(keys, controls, multipliers.horizontal_speed);
    let jump_pressed = keys.contains(controls.jump);
    let vertical = match world.movable_objects[index].as_player_mut() {
        Some(player) => player.next_vertical_velocity(jump_pressed, multipliers.jump_velocity),
        None => return Err(missing(world, index, "update_player_state")),
    };

    let mut moving_vector = Vec2::new(horizontal, vertical);
    if moving_vector == Vec2::ZERO {
        return Ok(());
    }

    let collisions = CollisionsProcessor::new(world)
        .get_collisions(&world.movable_objects[index], moving_vector)?;
    for collision in &collisions {
        apply_player_collision(world, index, collision, &mut moving_vector)?;
    }

    let player_object = &mut world.movable_objects[index];
    if moving_vector.y != 0.0 {
        set_grounded(player_object.as_player_mut(), false);
    }
    player_object.location += moving_vector;

    Ok(())
}

/// Apply one collision to the player and its pending displacement
fn apply_player_collision(
    world: &mut World,
    index: usize,
    collision: &Collision,
    moving_vector: &mut Vec2,
) -> Result<(), SimError> {
    let field_size = world.field_size;

    let Some(collided_id) = collision.collided_object else {
        let player_object = &mut world.movable_objects[index];
        match collision.event {
            GameEvent::PlayerOutRight => {
                moving_vector.x = 0.0;
                player_object.location.x = field_size.x - PLAYER_SIDE_LENGTH + BORDER_SNAP_INSET;
            }
            GameEvent::PlayerOutLeft => {
                moving_vector.x = 0.0;
                player_object.location.x = 0.0;
            }
            GameEvent::PlayerOutBottom => {
                moving_vector.y = 0.0;
                player_object.location.y = field_size.y - PLAYER_SIDE_LENGTH + BORDER_SNAP_INSET;
                set_grounded(player_object.as_player_mut(), true);
            }
            GameEvent::PlayerOutTop => {
                moving_vector.y = 0.0;
                player_object.location.y = 0.0;
                stop_rising(player_object.as_player_mut());
            }
            event => {
                return Err(SimError::UnhandledCollision {
                    method: "apply_player_collision",
                    event,
                    collided: "game border",
                });
            }
        }
        return Ok(());
    };

    let Some(collided) = world.find_immovable(collided_id) else {
        return Err(SimError::MissingObject {
            method: "apply_player_collision",
            id: collided_id,
        });
    };
    let bounds = collided.bounds();
    let collided_kind = collided.kind_name();
    let is_platform = collided.as_platform().is_some();
    let is_buff = collided.as_buff().is_some();

    match collision.event {
        GameEvent::PlayerPlatformTop if is_platform => {
            moving_vector.y = 0.0;
            let player_object = &mut world.movable_objects[index];
            player_object.location.y = bounds.top() - PLAYER_SIDE_LENGTH;
            set_grounded(player_object.as_player_mut(), true);
        }
        GameEvent::PlayerPlatformBottom if is_platform => {
            moving_vector.y = 0.0;
            let player_object = &mut world.movable_objects[index];
            player_object.location.y = bounds.bottom();
            stop_rising(player_object.as_player_mut());
        }
        GameEvent::PlayerPlatformRight if is_platform => {
            moving_vector.x = 0.0;
            world.movable_objects[index].location.x = bounds.left() - PLAYER_SIDE_LENGTH;
        }
        GameEvent::PlayerPlatformLeft if is_platform => {
            moving_vector.x = 0.0;
            world.movable_objects[index].location.x = bounds.right();
        }
        GameEvent::PlayerBuffPickup if is_buff => {
            let player_id = world.movable_objects[index].id;
            capture_buff(world, collided_id, player_id)?;
        }
        event => {
            return Err(SimError::UnhandledCollision {
                method: "apply_player_collision",
                event,
                collided: collided_kind,
            });
        }
    }

    Ok(())
}

fn set_grounded(player: Option<&mut Player>, grounded: bool) {
    if let Some(player) = player {
        player.grounded = grounded;
    }
}

// Head bumps cancel the remaining upward speed
fn stop_rising(player: Option<&mut Player>) {
    if let Some(player) = player {
        player.vertical_velocity = player.vertical_velocity.max(0.0);
    }
}

/// Move the projectile at `movable_objects[index]`, flagging it for despawn
/// once it would leave the field
pub fn update_projectile_state(world: &mut World, index: usize) -> Result<(), SimError> {
    let moving_vector = match world.movable_objects[index].as_projectile() {
        Some(projectile) => projectile.moving_vector,
        None => return Err(missing(world, index, "update_projectile_state")),
    };

    let collisions = CollisionsProcessor::new(world)
        .get_collisions(&world.movable_objects[index], moving_vector)?;

    let projectile = &mut world.movable_objects[index];
    for collision in &collisions {
        match collision.event {
            GameEvent::ProjectileOutOfBounds => {
                projectile.should_be_despawned = true;
                log::debug!("Projectile {} left the field", projectile.id);
            }
            event => {
                return Err(SimError::UnhandledCollision {
                    method: "update_projectile_state",
                    event,
                    collided: "game border",
                });
            }
        }
    }

    if !projectile.should_be_despawned {
        projectile.location += moving_vector;
    }

    Ok(())
}

/// Idle -> Charging: attach the buff to the player
pub fn capture_buff(world: &mut World, buff_id: ObjectId, player_id: ObjectId) -> Result<(), SimError> {
    let tick = world.time_ticks;

    let Some(buff) = world.find_immovable_mut(buff_id).and_then(|o| o.as_buff_mut()) else {
        return Err(SimError::MissingObject {
            method: "capture_buff",
            id: buff_id,
        });
    };
    buff.capture_this_buff(player_id, tick);
    let kind = buff.kind;

    let Some(player) = world.find_movable_mut(player_id).and_then(|o| o.as_player_mut()) else {
        return Err(SimError::MissingObject {
            method: "capture_buff",
            id: player_id,
        });
    };
    player.add_buff(buff_id);

    log::debug!("Player {} captured {} {} at tick {}", player_id, kind.name(), buff_id, tick);
    Ok(())
}

/// Charging -> Idle for every buff whose recharge time has passed
pub fn check_buff_expiration(world: &mut World) -> Result<(), SimError> {
    let tick = world.time_ticks;
    let mut released: Vec<(ObjectId, Option<ObjectId>)> = Vec::new();

    for object in &mut world.immovable_objects {
        let id = object.id;
        if let Some(buff) = object.as_buff_mut() {
            if buff.is_recharged(tick) {
                released.push((id, buff.release()));
            }
        }
    }

    for (buff_id, captor) in released {
        log::debug!("Buff {} recharged at tick {}", buff_id, tick);
        let Some(captor_id) = captor else {
            continue;
        };
        let Some(player) = world.find_movable_mut(captor_id).and_then(|o| o.as_player_mut())
        else {
            return Err(SimError::MissingObject {
                method: "check_buff_expiration",
                id: captor_id,
            });
        };
        player.remove_buff(buff_id);
    }

    Ok(())
}

fn missing(world: &World, index: usize, method: &'static str) -> SimError {
    SimError::MissingObject {
        method,
        id: world.movable_objects[index].id,
    }
}
