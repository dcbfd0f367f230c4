//! Collision detection for a proposed displacement
//!
//! `CollisionsProcessor::get_collisions` answers "what would happen if this
//! object moved by this vector?" without touching the world. The state
//! updater applies the answers in order, so the order of the returned list is
//! part of the contract: borders first (horizontal, then vertical), then
//! immovable objects in world order.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::objects::{Buff, GameObject, ObjectId, ObjectKind, Platform};
use super::rect::Aabb;
use super::world::World;
use crate::consts::PLAYER_SIDE_LENGTH;
use crate::error::SimError;

/// Everything a displacement can run into. Named `{mover}_{side-or-target}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameEvent {
    /// Player's right edge passes the right border
    PlayerOutRight,
    /// Player's left edge passes the left border
    PlayerOutLeft,
    /// Player's top edge passes the top border
    PlayerOutTop,
    /// Player's bottom edge passes the bottom border
    PlayerOutBottom,
    /// Player comes down onto the platform's top face
    PlayerPlatformTop,
    /// Player's head hits the platform's bottom face
    PlayerPlatformBottom,
    /// Player's left side hits the platform's right face
    PlayerPlatformLeft,
    /// Player's right side hits the platform's left face
    PlayerPlatformRight,
    /// Player touches an idle buff
    PlayerBuffPickup,
    /// Projectile leaves the field on any side
    ProjectileOutOfBounds,
}

/// A single collision. `collided_object` is `None` for border events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collision {
    pub moving_object: ObjectId,
    pub event: GameEvent,
    pub collided_object: Option<ObjectId>,
}

impl Collision {
    fn border(moving_object: ObjectId, event: GameEvent) -> Self {
        Self {
            moving_object,
            event,
            collided_object: None,
        }
    }

    fn with(moving_object: ObjectId, event: GameEvent, collided: &GameObject) -> Self {
        Self {
            moving_object,
            event,
            collided_object: Some(collided.id),
        }
    }
}

/// Which border(s) a box at `location` with size `extent` would cross
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct BorderHits {
    right: bool,
    left: bool,
    bottom: bool,
    top: bool,
}

impl BorderHits {
    fn check(location: Vec2, extent: Vec2, field_size: Vec2) -> Self {
        let mut hits = Self::default();

        if location.x + extent.x > field_size.x {
            hits.right = true;
        } else if location.x < 0.0 {
            hits.left = true;
        }

        if location.y + extent.y > field_size.y {
            hits.bottom = true;
        } else if location.y < 0.0 {
            hits.top = true;
        }

        hits
    }

    fn any(&self) -> bool {
        self.right || self.left || self.bottom || self.top
    }
}

/// Read-only collision queries against one world
pub struct CollisionsProcessor<'w> {
    world: &'w World,
}

impl<'w> CollisionsProcessor<'w> {
    pub fn new(world: &'w World) -> Self {
        Self { world }
    }

    /// Main collisions acquiring method
    pub fn get_collisions(
        &self,
        moving_object: &GameObject,
        moving_vector: Vec2,
    ) -> Result<Vec<Collision>, SimError> {
        match &moving_object.kind {
            ObjectKind::Player(_) => self.check_player_collisions(moving_object, moving_vector),
            ObjectKind::Projectile(_) => {
                Ok(self.check_projectile_collisions(moving_object, moving_vector))
            }
            ObjectKind::Buff(_) | ObjectKind::Platform(_) => Err(SimError::UnsupportedMover {
                method: "get_collisions",
                kind: moving_object.kind_name(),
            }),
        }
    }

    fn check_player_collisions(
        &self,
        player: &GameObject,
        moving_vector: Vec2,
    ) -> Result<Vec<Collision>, SimError> {
        let mut collisions = Vec::new();
        let prospective = player.location + moving_vector;

        // Game borders
        let hits = BorderHits::check(
            prospective,
            Vec2::splat(PLAYER_SIDE_LENGTH),
            self.world.field_size,
        );
        if hits.right {
            collisions.push(Collision::border(player.id, GameEvent::PlayerOutRight));
        } else if hits.left {
            collisions.push(Collision::border(player.id, GameEvent::PlayerOutLeft));
        }
        if hits.bottom {
            collisions.push(Collision::border(player.id, GameEvent::PlayerOutBottom));
        } else if hits.top {
            collisions.push(Collision::border(player.id, GameEvent::PlayerOutTop));
        }

        // Immovable objects
        let current = Aabb::square(player.location, PLAYER_SIDE_LENGTH);
        let moved = current.translated(moving_vector);
        for object in &self.world.immovable_objects {
            if object.id == player.id {
                continue;
            }
            match &object.kind {
                ObjectKind::Buff(buff) => {
                    if buff_is_touched(&moved, object, buff) {
                        collisions.push(Collision::with(
                            player.id,
                            GameEvent::PlayerBuffPickup,
                            object,
                        ));
                    }
                }
                ObjectKind::Platform(platform) => {
                    if let Some(event) = platform_contact(&current, &moved, object, platform) {
                        collisions.push(Collision::with(player.id, event, object));
                    }
                }
                ObjectKind::Player(_) | ObjectKind::Projectile(_) => {
                    return Err(SimError::UnsupportedMover {
                        method: "check_player_collisions",
                        kind: object.kind_name(),
                    });
                }
            }
        }

        Ok(collisions)
    }

    // Projectiles only check the borders; hitting platforms is not implemented
    fn check_projectile_collisions(
        &self,
        projectile: &GameObject,
        moving_vector: Vec2,
    ) -> Vec<Collision> {
        let hits = BorderHits::check(
            projectile.location + moving_vector,
            projectile.extent(),
            self.world.field_size,
        );
        if hits.any() {
            vec![Collision::border(
                projectile.id,
                GameEvent::ProjectileOutOfBounds,
            )]
        } else {
            Vec::new()
        }
    }
}

/// Charging buffs are inert
fn buff_is_touched(moved_player: &Aabb, object: &GameObject, buff: &Buff) -> bool {
    !buff.is_charging() && moved_player.overlaps_inclusive(&object.bounds())
}

/// Classify which side of a platform the player runs into, if any.
///
/// Crossing tests come first, in priority order top, bottom, right, left,
/// each asking whether a player edge was at or before a platform face and
/// reaches it after the move. When none applies the old box already overlaps
/// the platform: the old centre decides if it lies outside the platform span,
/// otherwise (e.g. a platform smaller than the player) the smallest edge gap
/// wins. That last fallback is an approximation kept as-is.
fn platform_contact(
    current: &Aabb,
    moved: &Aabb,
    object: &GameObject,
    platform: &Platform,
) -> Option<GameEvent> {
    let bounds = Aabb::new(object.location, Vec2::new(platform.width, platform.height));
    if !moved.overlaps_inclusive(&bounds) {
        return None;
    }

    if current.bottom() <= bounds.top() && moved.bottom() >= bounds.top() {
        return Some(GameEvent::PlayerPlatformTop);
    }
    if current.top() >= bounds.bottom() && moved.top() <= bounds.bottom() {
        return Some(GameEvent::PlayerPlatformBottom);
    }
    if current.right() <= bounds.left() && moved.right() >= bounds.left() {
        return Some(GameEvent::PlayerPlatformRight);
    }
    if current.left() >= bounds.right() && moved.left() <= bounds.right() {
        return Some(GameEvent::PlayerPlatformLeft);
    }

    let center = current.center();
    if center.y <= bounds.top() && moved.bottom() >= bounds.top() {
        return Some(GameEvent::PlayerPlatformTop);
    }
    if center.y >= bounds.bottom() && moved.top() <= bounds.bottom() {
        return Some(GameEvent::PlayerPlatformBottom);
    }
    if center.x <= bounds.left() && moved.right() >= bounds.left() {
        return Some(GameEvent::PlayerPlatformRight);
    }
    if center.x >= bounds.right() && moved.left() <= bounds.right() {
        return Some(GameEvent::PlayerPlatformLeft);
    }

    Some(min_gap_contact(moved, &bounds))
}

/// Fallback classification: the player edge closest to the opposite platform
/// edge. Ties resolve in the order right, left, bottom, top.
fn min_gap_contact(moved: &Aabb, platform: &Aabb) -> GameEvent {
    let candidates = [
        (
            (moved.right() - platform.left()).abs(),
            GameEvent::PlayerPlatformRight,
        ),
        (
            (moved.left() - platform.right()).abs(),
            GameEvent::PlayerPlatformLeft,
        ),
        (
            (moved.bottom() - platform.top()).abs(),
            GameEvent::PlayerPlatformTop,
        ),
        (
            (moved.top() - platform.bottom()).abs(),
            GameEvent::PlayerPlatformBottom,
        ),
    ];

    let mut best = candidates[0];
    for candidate in &candidates[1..] {
        // Strict comparison keeps the earlier entry on ties
        if candidate.0 < best.0 {
            best = *candidate;
        }
    }
    best.1
}
