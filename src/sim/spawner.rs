//! Projectile spawning and the despawn sweep

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::objects::{GameObject, ProjectileKind};
use super::world::World;
use crate::consts::*;
use crate::input::{PointerAction, PointerEvent, PressedKeys};
use crate::settings::Controls;
use crate::{aim_direction, rotate_vector};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeaponMode {
    /// One shot per press
    #[default]
    Handgun,
    /// Shoots on press and on every drag event
    MachineGun,
}

impl WeaponMode {
    pub fn projectile_kind(&self) -> ProjectileKind {
        match self {
            WeaponMode::Handgun => ProjectileKind::Handgun,
            WeaponMode::MachineGun => ProjectileKind::MachineGun,
        }
    }
}

/// Turns pointer input into projectiles
#[derive(Debug, Clone)]
pub struct Spawner {
    pub weapon_mode: WeaponMode,
    /// Cleared by a handgun shot, set again by the pointer release
    pub handgun_can_fire: bool,
    pending: Option<PointerEvent>,
    rng: Pcg32,
}

impl Spawner {
    pub fn new(seed: u64) -> Self {
        Self {
            weapon_mode: WeaponMode::default(),
            handgun_can_fire: true,
            pending: None,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Switch weapons from the held keys. Machine gun wins if both are held.
    pub fn update_weapon_mode(&mut self, keys: &PressedKeys, controls: &Controls) {
        let mode = if keys.contains(controls.machine_gun_mode) {
            WeaponMode::MachineGun
        } else if keys.contains(controls.handgun_mode) {
            WeaponMode::Handgun
        } else {
            return;
        };
        if mode != self.weapon_mode {
            log::debug!("Weapon mode {:?} -> {:?}", self.weapon_mode, mode);
            self.weapon_mode = mode;
        }
    }

    /// Remember the latest pointer event for the next spawn pass
    pub fn register_pointer_event(&mut self, event: PointerEvent) {
        self.pending = Some(event);
    }

    /// Consume the pending pointer event and spawn what it asks for.
    /// Returns the number of projectiles added.
    pub fn spawn_player_projectiles(&mut self, world: &mut World) -> usize {
        let Some(event) = self.pending.take() else {
            return 0;
        };

        let fire = match (self.weapon_mode, event.action) {
            (_, PointerAction::Release) => {
                self.handgun_can_fire = true;
                false
            }
            (WeaponMode::Handgun, PointerAction::Press) => {
                let fire = self.handgun_can_fire;
                self.handgun_can_fire = false;
                fire
            }
            (WeaponMode::Handgun, PointerAction::Drag) => false,
            (WeaponMode::MachineGun, PointerAction::Press | PointerAction::Drag) => true,
        };
        if !fire {
            return 0;
        }

        let Some(hand) = world.player().and_then(|p| p.hand_point()) else {
            log::warn!("No player to shoot from");
            return 0;
        };

        let mut direction = aim_direction(hand, event.position);
        if direction == Vec2::ZERO {
            return 0;
        }

        let kind = self.weapon_mode.projectile_kind();
        if kind == ProjectileKind::MachineGun {
            let scatter = self
                .rng
                .random_range(-MACHINE_GUN_SCATTER_RADIANS..=MACHINE_GUN_SCATTER_RADIANS);
            direction = rotate_vector(direction, scatter);
        }

        let location = hand + direction * PROJECTILE_LEAD_DISTANCE;
        let id = world.spawn_movable(GameObject::projectile(
            kind,
            location,
            direction * kind.speed(),
        ));
        log::debug!("Spawned {} {} at {}", kind.name(), id, location);
        1
    }
}

/// Drop every movable object flagged for removal, keeping the order of the
/// rest. Returns the number removed.
pub fn despawn_flagged_objects(world: &mut World) -> usize {
    let before = world.movable_objects.len();
    world.movable_objects.retain(|object| {
        if object.should_be_despawned {
            log::debug!("Despawned {} {}", object.kind_name(), object.id);
        }
        !object.should_be_despawned
    });
    before - world.movable_objects.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::keys;

    fn world_with_player() -> World {
        World::new(
            Vec2::new(1000.0, 700.0),
            Vec::new(),
            vec![GameObject::player(Vec2::new(100.0, 100.0))],
        )
        .unwrap()
    }

    fn pointer(action: PointerAction, x: f32, y: f32) -> PointerEvent {
        PointerEvent::new(action, Vec2::new(x, y))
    }

    fn fire(spawner: &mut Spawner, world: &mut World, event: PointerEvent) -> usize {
        spawner.register_pointer_event(event);
        spawner.spawn_player_projectiles(world)
    }

    #[test]
    fn test_handgun_fires_once_per_press() {
        let mut world = world_with_player();
        let mut spawner = Spawner::new(1);
        assert!(spawner.handgun_can_fire);

        assert_eq!(fire(&mut spawner, &mut world, pointer(PointerAction::Press, 500.0, 115.0)), 1);
        assert_eq!(world.movable_objects.len(), 2);
        assert!(!spawner.handgun_can_fire);

        // Held button does not fire again
        assert_eq!(fire(&mut spawner, &mut world, pointer(PointerAction::Press, 500.0, 115.0)), 0);
        assert_eq!(fire(&mut spawner, &mut world, pointer(PointerAction::Drag, 600.0, 115.0)), 0);

        assert_eq!(fire(&mut spawner, &mut world, pointer(PointerAction::Release, 600.0, 115.0)), 0);
        assert!(spawner.handgun_can_fire);
        assert_eq!(world.movable_objects.len(), 2);

        assert_eq!(fire(&mut spawner, &mut world, pointer(PointerAction::Press, 500.0, 115.0)), 1);
        assert_eq!(world.movable_objects.len(), 3);
    }

    #[test]
    fn test_handgun_projectile_geometry() {
        let mut world = world_with_player();
        let mut spawner = Spawner::new(1);
        let hand = world.player().unwrap().hand_point().unwrap();
        fire(&mut spawner, &mut world, pointer(PointerAction::Press, hand.x + 100.0, hand.y));

        let projectile = &world.movable_objects[1];
        assert_eq!(projectile.location, hand + Vec2::new(PROJECTILE_LEAD_DISTANCE, 0.0));
        let p = projectile.as_projectile().unwrap();
        assert_eq!(p.kind, ProjectileKind::Handgun);
        assert_eq!(p.moving_vector, Vec2::new(HANDGUN_PROJECTILE_SPEED, 0.0));
    }

    #[test]
    fn test_zero_aim_spawns_nothing() {
        let mut world = world_with_player();
        let mut spawner = Spawner::new(1);
        let hand = world.player().unwrap().hand_point().unwrap();
        assert_eq!(fire(&mut spawner, &mut world, pointer(PointerAction::Press, hand.x, hand.y)), 0);
        assert_eq!(world.movable_objects.len(), 1);
        assert!(!spawner.handgun_can_fire);
    }

    #[test]
    fn test_machine_gun_fires_on_press_and_drag_with_scatter() {
        let mut world = world_with_player();
        let mut spawner = Spawner::new(42);
        let mut pressed = PressedKeys::default();
        pressed.press(keys::DIGIT_2);
        spawner.update_weapon_mode(&pressed, &Controls::default());
        assert_eq!(spawner.weapon_mode, WeaponMode::MachineGun);

        let hand = world.player().unwrap().hand_point().unwrap();
        let target = hand + Vec2::new(300.0, 0.0);
        assert_eq!(fire(&mut spawner, &mut world, PointerEvent::new(PointerAction::Press, target)), 1);
        for _ in 0..20 {
            assert_eq!(fire(&mut spawner, &mut world, PointerEvent::new(PointerAction::Drag, target)), 1);
        }
        assert_eq!(fire(&mut spawner, &mut world, PointerEvent::new(PointerAction::Release, target)), 0);
        assert_eq!(world.movable_objects.len(), 22);

        for object in &world.movable_objects[1..] {
            let p = object.as_projectile().unwrap();
            assert_eq!(p.kind, ProjectileKind::MachineGun);
            assert!((p.moving_vector.length() - MACHINE_GUN_PROJECTILE_SPEED).abs() < 1e-3);
            let angle = p.moving_vector.to_angle();
            assert!(angle.abs() <= MACHINE_GUN_SCATTER_RADIANS + 1e-5);
        }
    }

    #[test]
    fn test_scatter_is_reproducible_from_seed() {
        let shoot = |seed| {
            let mut world = world_with_player();
            let mut spawner = Spawner::new(seed);
            spawner.weapon_mode = WeaponMode::MachineGun;
            for _ in 0..5 {
                fire(&mut spawner, &mut world, pointer(PointerAction::Drag, 800.0, 300.0));
            }
            world.movable_objects
        };
        assert_eq!(shoot(7), shoot(7));
    }

    #[test]
    fn test_handgun_key_switches_back() {
        let mut spawner = Spawner::new(1);
        spawner.weapon_mode = WeaponMode::MachineGun;
        let mut pressed = PressedKeys::default();

        spawner.update_weapon_mode(&pressed, &Controls::default());
        assert_eq!(spawner.weapon_mode, WeaponMode::MachineGun);

        pressed.press(keys::DIGIT_1);
        spawner.update_weapon_mode(&pressed, &Controls::default());
        assert_eq!(spawner.weapon_mode, WeaponMode::Handgun);
    }

    #[test]
    fn test_no_pending_event_spawns_nothing() {
        let mut world = world_with_player();
        let mut spawner = Spawner::new(1);
        assert_eq!(spawner.spawn_player_projectiles(&mut world), 0);

        // Events are consumed by the spawn pass
        spawner.register_pointer_event(pointer(PointerAction::Press, 0.0, 0.0));
        assert_eq!(spawner.spawn_player_projectiles(&mut world), 1);
        assert_eq!(spawner.spawn_player_projectiles(&mut world), 0);
    }

    #[test]
    fn test_despawn_keeps_order() {
        let mut world = world_with_player();
        let ids: Vec<_> = (0..4)
            .map(|i| {
                world.spawn_movable(GameObject::projectile(
                    ProjectileKind::Handgun,
                    Vec2::new(i as f32, 0.0),
                    Vec2::X,
                ))
            })
            .collect();
        world.find_movable_mut(ids[1]).unwrap().should_be_despawned = true;
        world.find_movable_mut(ids[3]).unwrap().should_be_despawned = true;

        assert_eq!(despawn_flagged_objects(&mut world), 2);
        let remaining: Vec<_> = world.movable_objects.iter().map(|o| o.id).collect();
        assert_eq!(remaining, vec![world.player().unwrap().id, ids[0], ids[2]]);
        assert_eq!(despawn_flagged_objects(&mut world), 0);
    }
}
