//! Game objects: one envelope with a kind payload
//!
//! Every object shares a handle, a top-left location and a despawn flag. What
//! it is (player, projectile, buff, platform) lives in `ObjectKind`, and the
//! kind also decides which world layer the object belongs to.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::{Aabb, normalize_extent};
use crate::consts::*;

/// Stable handle of an object inside its world
pub type ObjectId = u32;

/// Render/collision layer. Immovable objects are drawn first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Layer {
    Immovable,
    Movable,
}

impl Layer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Layer::Immovable => "immovable",
            Layer::Movable => "movable",
        }
    }
}

/// The player's square
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Buffs currently held, in capture order (no duplicates)
    #[serde(default)]
    pub current_buffs: Vec<ObjectId>,
    /// Standing on the bottom border or a platform (jump available)
    #[serde(default)]
    pub grounded: bool,
    /// Vertical velocity carried between ticks (negative = upwards)
    #[serde(default)]
    pub vertical_velocity: f32,
}

impl Player {
    /// Append a buff unless it is already held
    pub fn add_buff(&mut self, buff: ObjectId) {
        if !self.current_buffs.contains(&buff) {
            self.current_buffs.push(buff);
        }
    }

    /// Drop a buff, keeping the order of the rest
    pub fn remove_buff(&mut self, buff: ObjectId) {
        self.current_buffs.retain(|&id| id != buff);
    }

    pub fn has_buff(&self, buff: ObjectId) -> bool {
        self.current_buffs.contains(&buff)
    }

    /// Next vertical velocity from the jump key and the current ground state
    pub fn next_vertical_velocity(&mut self, jump_pressed: bool, jump_multiplier: f32) -> f32 {
        if jump_pressed && self.grounded {
            self.vertical_velocity = -INITIAL_JUMP_VELOCITY * jump_multiplier;
            self.grounded = false;
        } else if self.grounded {
            // Keeps the player pressed against the surface every tick
            self.vertical_velocity = GRAVITY_ACCELERATION;
        } else if self.vertical_velocity + GRAVITY_ACCELERATION < MAX_VERTICAL_VELOCITY {
            self.vertical_velocity += GRAVITY_ACCELERATION;
        } else {
            self.vertical_velocity = MAX_VERTICAL_VELOCITY;
        }
        self.vertical_velocity
    }
}

/// Projectile variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileKind {
    Handgun,
    MachineGun,
}

impl ProjectileKind {
    pub fn diameter(&self) -> f32 {
        match self {
            ProjectileKind::Handgun => HANDGUN_PROJECTILE_DIAMETER,
            ProjectileKind::MachineGun => MACHINE_GUN_PROJECTILE_DIAMETER,
        }
    }

    pub fn speed(&self) -> f32 {
        match self {
            ProjectileKind::Handgun => HANDGUN_PROJECTILE_SPEED,
            ProjectileKind::MachineGun => MACHINE_GUN_PROJECTILE_SPEED,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ProjectileKind::Handgun => "HandgunProjectile",
            ProjectileKind::MachineGun => "MachineGunProjectile",
        }
    }
}

/// A circular projectile flying along a fixed vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub kind: ProjectileKind,
    /// Per-tick displacement, fixed at spawn
    pub moving_vector: Vec2,
}

/// Buff variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuffKind {
    SpeedUp,
    JumpHeightUp,
}

impl BuffKind {
    pub fn name(&self) -> &'static str {
        match self {
            BuffKind::SpeedUp => "SpeedUpBuff",
            BuffKind::JumpHeightUp => "JumpHeightUpBuff",
        }
    }

    /// Ticks between capture and the buff becoming collidable again
    pub fn recharge_ticks(&self) -> u64 {
        match self {
            BuffKind::SpeedUp | BuffKind::JumpHeightUp => BUFF_RECHARGE_TICKS,
        }
    }
}

/// A collectible buff. Idle buffs can be picked up; charging buffs are
/// attached to their captor and ignored by collisions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Buff {
    pub kind: BuffKind,
    #[serde(default)]
    pub charging: bool,
    /// Player currently holding this buff (lookup key only)
    #[serde(default)]
    pub captor: Option<ObjectId>,
    #[serde(default)]
    pub charge_start_tick: u64,
}

impl Buff {
    pub fn new(kind: BuffKind) -> Self {
        Self {
            kind,
            charging: false,
            captor: None,
            charge_start_tick: 0,
        }
    }

    pub fn is_charging(&self) -> bool {
        self.charging
    }

    /// Idle -> Charging
    pub fn capture_this_buff(&mut self, captor: ObjectId, tick: u64) {
        self.charging = true;
        self.captor = Some(captor);
        self.charge_start_tick = tick;
    }

    /// Whether a charging buff has waited its full recharge time
    pub fn is_recharged(&self, tick: u64) -> bool {
        self.charging && tick.saturating_sub(self.charge_start_tick) >= self.kind.recharge_ticks()
    }

    /// Charging -> Idle, returning the former captor
    pub fn release(&mut self) -> Option<ObjectId> {
        self.charging = false;
        self.captor.take()
    }
}

/// A rectangle the player can stand on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub width: f32,
    pub height: f32,
}

/// What an object is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObjectKind {
    Player(Player),
    Projectile(Projectile),
    Buff(Buff),
    Platform(Platform),
}

impl ObjectKind {
    pub fn name(&self) -> &'static str {
        match self {
            ObjectKind::Player(_) => "Player",
            ObjectKind::Projectile(p) => p.kind.name(),
            ObjectKind::Buff(b) => b.kind.name(),
            ObjectKind::Platform(_) => "BasicPlatform",
        }
    }

    pub fn layer(&self) -> Layer {
        match self {
            ObjectKind::Player(_) | ObjectKind::Projectile(_) => Layer::Movable,
            ObjectKind::Buff(_) | ObjectKind::Platform(_) => Layer::Immovable,
        }
    }
}

/// A game object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameObject {
    /// Assigned by the owning world
    pub id: ObjectId,
    /// Top-left corner
    pub location: Vec2,
    #[serde(default)]
    pub should_be_despawned: bool,
    pub kind: ObjectKind,
}

impl GameObject {
    fn with_kind(location: Vec2, kind: ObjectKind) -> Self {
        Self {
            id: 0,
            location,
            should_be_despawned: false,
            kind,
        }
    }

    pub fn player(location: Vec2) -> Self {
        Self::with_kind(location, ObjectKind::Player(Player::default()))
    }

    pub fn projectile(kind: ProjectileKind, location: Vec2, moving_vector: Vec2) -> Self {
        Self::with_kind(
            location,
            ObjectKind::Projectile(Projectile {
                kind,
                moving_vector,
            }),
        )
    }

    pub fn buff(kind: BuffKind, location: Vec2) -> Self {
        Self::with_kind(location, ObjectKind::Buff(Buff::new(kind)))
    }

    /// Platform from a location and a size that may be negative on either axis
    pub fn platform(location: Vec2, width: f32, height: f32) -> Self {
        let (origin, size) = normalize_extent(location, Vec2::new(width, height));
        Self::with_kind(
            origin,
            ObjectKind::Platform(Platform {
                width: size.x,
                height: size.y,
            }),
        )
    }

    /// Rewrite a platform stored with a negative size so its location is the
    /// top-left corner again. Other kinds are left alone.
    pub fn normalize_platform(&mut self) {
        if let ObjectKind::Platform(platform) = &mut self.kind {
            let (origin, size) =
                normalize_extent(self.location, Vec2::new(platform.width, platform.height));
            self.location = origin;
            platform.width = size.x;
            platform.height = size.y;
        }
    }

    pub fn kind_name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn layer(&self) -> Layer {
        self.kind.layer()
    }

    /// Size of the object's bounding box (circles use their diameter)
    pub fn extent(&self) -> Vec2 {
        match &self.kind {
            ObjectKind::Player(_) => Vec2::splat(PLAYER_SIDE_LENGTH),
            ObjectKind::Projectile(p) => Vec2::splat(p.kind.diameter()),
            ObjectKind::Buff(_) => Vec2::splat(BUFF_SIDE_LENGTH),
            ObjectKind::Platform(p) => Vec2::new(p.width, p.height),
        }
    }

    /// Current resting bounding box
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.location, self.extent())
    }

    /// Point projectiles are aimed from (players only)
    pub fn hand_point(&self) -> Option<Vec2> {
        match self.kind {
            ObjectKind::Player(_) => Some(self.location + PLAYER_HAND_OFFSET),
            _ => None,
        }
    }

    pub fn as_player(&self) -> Option<&Player> {
        match &self.kind {
            ObjectKind::Player(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_player_mut(&mut self) -> Option<&mut Player> {
        match &mut self.kind {
            ObjectKind::Player(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_buff(&self) -> Option<&Buff> {
        match &self.kind {
            ObjectKind::Buff(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_buff_mut(&mut self) -> Option<&mut Buff> {
        match &mut self.kind {
            ObjectKind::Buff(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_platform(&self) -> Option<&Platform> {
        match &self.kind {
            ObjectKind::Platform(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_projectile(&self) -> Option<&Projectile> {
        match &self.kind {
            ObjectKind::Projectile(p) => Some(p),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_normalizes_negative_size() {
        let platform = GameObject::platform(Vec2::new(100.0, 100.0), -50.0, -20.0);
        assert_eq!(platform.location, Vec2::new(50.0, 80.0));
        let p = platform.as_platform().unwrap();
        assert_eq!(p.width, 50.0);
        assert_eq!(p.height, 20.0);
    }

    #[test]
    fn test_kind_layers() {
        assert_eq!(GameObject::player(Vec2::ZERO).layer(), Layer::Movable);
        assert_eq!(
            GameObject::projectile(ProjectileKind::Handgun, Vec2::ZERO, Vec2::X).layer(),
            Layer::Movable
        );
        assert_eq!(GameObject::buff(BuffKind::SpeedUp, Vec2::ZERO).layer(), Layer::Immovable);
        assert_eq!(GameObject::platform(Vec2::ZERO, 1.0, 1.0).layer(), Layer::Immovable);
    }

    #[test]
    fn test_player_buffs_are_an_ordered_set() {
        let mut player = Player::default();
        player.add_buff(7);
        player.add_buff(3);
        player.add_buff(7);
        assert_eq!(player.current_buffs, vec![7, 3]);

        player.remove_buff(7);
        assert_eq!(player.current_buffs, vec![3]);
        assert!(!player.has_buff(7));
    }

    #[test]
    fn test_buff_capture_and_release() {
        let mut buff = Buff::new(BuffKind::JumpHeightUp);
        assert!(!buff.is_charging());

        buff.capture_this_buff(1, 100);
        assert!(buff.is_charging());
        assert_eq!(buff.captor, Some(1));
        assert!(!buff.is_recharged(100 + BUFF_RECHARGE_TICKS - 1));
        assert!(buff.is_recharged(100 + BUFF_RECHARGE_TICKS));

        assert_eq!(buff.release(), Some(1));
        assert!(!buff.is_charging());
        assert_eq!(buff.captor, None);
        assert!(!buff.is_recharged(u64::MAX));
    }

    #[test]
    fn test_gravity_acceleration_from_rest() {
        let mut player = Player::default();
        assert_eq!(player.next_vertical_velocity(false, 1.0), GRAVITY_ACCELERATION);
    }

    #[test]
    fn test_vertical_velocity_is_capped() {
        let mut player = Player {
            vertical_velocity: 100.0,
            ..Default::default()
        };
        assert_eq!(player.next_vertical_velocity(false, 1.0), MAX_VERTICAL_VELOCITY);
    }

    #[test]
    fn test_jump_only_when_grounded() {
        let mut airborne = Player::default();
        assert_eq!(airborne.next_vertical_velocity(true, 1.0), GRAVITY_ACCELERATION);

        let mut grounded = Player {
            grounded: true,
            ..Default::default()
        };
        assert_eq!(grounded.next_vertical_velocity(true, 1.5), -INITIAL_JUMP_VELOCITY * 1.5);
        assert!(!grounded.grounded);
    }

    #[test]
    fn test_grounded_velocity_pinned_to_gravity() {
        let mut player = Player {
            grounded: true,
            vertical_velocity: 9.0,
            ..Default::default()
        };
        assert_eq!(player.next_vertical_velocity(false, 1.0), GRAVITY_ACCELERATION);
        assert!(player.grounded);
    }

    #[test]
    fn test_hand_point_only_for_player() {
        let player = GameObject::player(Vec2::new(10.0, 20.0));
        assert_eq!(player.hand_point(), Some(Vec2::new(10.0, 20.0) + PLAYER_HAND_OFFSET));
        assert_eq!(GameObject::platform(Vec2::ZERO, 5.0, 5.0).hand_point(), None);
    }
}
