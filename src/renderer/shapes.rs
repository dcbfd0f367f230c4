//! Per-kind draw commands for a world snapshot
//!
//! Immovable objects are drawn first, then movable ones, each in collection
//! order. Colours are linear RGBA.

use glam::Vec2;

use super::WorldSnapshot;
use crate::sim::{BuffKind, GameObject, Layer, ObjectId, ObjectKind};

pub type Color = [f32; 4];

pub const PLAYER: Color = [0.0, 0.0, 1.0, 1.0];
pub const PLATFORM: Color = [0.65, 0.16, 0.16, 1.0];
pub const SPEED_UP_BUFF: Color = [0.0, 0.5, 0.0, 1.0];
pub const JUMP_HEIGHT_UP_BUFF: Color = [1.0, 1.0, 0.0, 1.0];
pub const PROJECTILE: Color = [1.0, 1.0, 1.0, 1.0];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Filled axis-aligned rectangle
    Rect { min: Vec2, max: Vec2 },
    /// Filled ellipse inscribed in the box
    Oval { min: Vec2, max: Vec2 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    pub object: ObjectId,
    pub shape: Shape,
    pub color: Color,
}

/// Draw list for one frame
pub fn draw_commands(snapshot: &WorldSnapshot) -> Vec<DrawCommand> {
    let mut commands =
        Vec::with_capacity(snapshot.immovable_objects.len() + snapshot.movable_objects.len());

    for (objects, layer) in [
        (&snapshot.immovable_objects, Layer::Immovable),
        (&snapshot.movable_objects, Layer::Movable),
    ] {
        for object in objects {
            if object.layer() != layer {
                log::warn!(
                    "While drawing the {} layer, got object {} with unexpected kind: {}",
                    layer.as_str(),
                    object.id,
                    object.kind_name()
                );
                continue;
            }
            if let Some(command) = draw_object(object) {
                commands.push(command);
            }
        }
    }

    commands
}

fn draw_object(object: &GameObject) -> Option<DrawCommand> {
    let bounds = object.bounds();
    let (min, max) = (bounds.min, bounds.max);

    let (shape, color) = match &object.kind {
        ObjectKind::Player(_) => (Shape::Rect { min, max }, PLAYER),
        ObjectKind::Platform(_) => (Shape::Rect { min, max }, PLATFORM),
        // Charging buffs are hidden
        ObjectKind::Buff(buff) if buff.is_charging() => return None,
        ObjectKind::Buff(buff) => {
            let color = match buff.kind {
                BuffKind::SpeedUp => SPEED_UP_BUFF,
                BuffKind::JumpHeightUp => JUMP_HEIGHT_UP_BUFF,
            };
            (Shape::Rect { min, max }, color)
        }
        ObjectKind::Projectile(_) => (Shape::Oval { min, max }, PROJECTILE),
    };

    Some(DrawCommand {
        object: object.id,
        shape,
        color,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::maps::raw_map;
    use crate::sim::World;

    #[test]
    fn test_layers_drawn_in_order() {
        let world = World::new(
            DEFAULT_FIELD_SIZE,
            vec![
                GameObject::platform(Vec2::new(400.0, 600.0), 200.0, 30.0),
                GameObject::buff(BuffKind::JumpHeightUp, Vec2::new(800.0, 550.0)),
            ],
            vec![GameObject::player(Vec2::new(10.0, 20.0))],
        )
        .unwrap();

        let commands = draw_commands(&WorldSnapshot::from(&world));
        let colors: Vec<Color> = commands.iter().map(|c| c.color).collect();
        assert_eq!(colors, vec![PLATFORM, JUMP_HEIGHT_UP_BUFF, PLAYER]);
        assert_eq!(
            commands[2].shape,
            Shape::Rect {
                min: Vec2::new(10.0, 20.0),
                max: Vec2::new(10.0 + PLAYER_SIDE_LENGTH, 20.0 + PLAYER_SIDE_LENGTH)
            }
        );
    }

    #[test]
    fn test_projectiles_are_ovals() {
        let commands = draw_commands(&WorldSnapshot::from(&raw_map("4").unwrap()));
        assert_eq!(commands.len(), 3);
        assert_eq!(
            commands[1].shape,
            Shape::Oval {
                min: Vec2::ZERO,
                max: Vec2::splat(HANDGUN_PROJECTILE_DIAMETER)
            }
        );
        assert_eq!(commands[2].color, PROJECTILE);
    }

    #[test]
    fn test_charging_buff_hidden() {
        let mut world = raw_map("3").unwrap();
        let player = world.player().unwrap().id;
        world.immovable_objects[0]
            .as_buff_mut()
            .unwrap()
            .capture_this_buff(player, 0);

        let commands = draw_commands(&WorldSnapshot::from(&world));
        let colors: Vec<Color> = commands.iter().map(|c| c.color).collect();
        assert_eq!(colors, vec![JUMP_HEIGHT_UP_BUFF, PLAYER]);
    }

    #[test]
    fn test_misplaced_object_is_skipped() {
        let mut snapshot = WorldSnapshot::from(&raw_map("1").unwrap());
        snapshot
            .movable_objects
            .push(GameObject::platform(Vec2::ZERO, 10.0, 10.0));

        let commands = draw_commands(&snapshot);
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].color, PLAYER);
    }
}
