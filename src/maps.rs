//! Built-in maps, addressed on the command line as `raw <name>`

use glam::Vec2;

use crate::consts::DEFAULT_FIELD_SIZE;
use crate::error::LaunchError;
use crate::sim::{BuffKind, GameObject, ProjectileKind, World};

/// Names accepted by `raw_map`
pub const RAW_MAP_NAMES: [&str; 4] = ["1", "2", "3", "4"];

/// Build one of the built-in maps
pub fn raw_map(name: &str) -> Result<World, LaunchError> {
    let (immovable, movable) = match name {
        // One player only
        "1" => (Vec::new(), vec![GameObject::player(Vec2::new(10.0, 10.0))]),
        // Player with three platforms: centre, left wall, right wall
        "2" => (
            vec![
                GameObject::platform(Vec2::new(400.0, 600.0), 200.0, 30.0),
                GameObject::platform(Vec2::new(0.0, 600.0), 20.0, 100.0),
                GameObject::platform(Vec2::new(980.0, 600.0), 20.0, 100.0),
            ],
            vec![GameObject::player(Vec2::new(101.0, 101.0))],
        ),
        "3" => (
            vec![
                GameObject::buff(BuffKind::SpeedUp, Vec2::new(500.0, 550.0)),
                GameObject::buff(BuffKind::JumpHeightUp, Vec2::new(800.0, 550.0)),
            ],
            vec![GameObject::player(Vec2::ZERO)],
        ),
        "4" => (
            Vec::new(),
            vec![
                GameObject::player(Vec2::ZERO),
                GameObject::projectile(ProjectileKind::Handgun, Vec2::ZERO, Vec2::new(10.0, 10.0)),
                GameObject::projectile(
                    ProjectileKind::MachineGun,
                    Vec2::ZERO,
                    Vec2::new(100.0, 10.0),
                ),
            ],
        ),
        _ => return Err(LaunchError::UnknownRawMap(name.to_string())),
    };

    let world = World::new(DEFAULT_FIELD_SIZE, immovable, movable)?;
    log::info!("Loaded raw map {}", name);
    Ok(world)
}
