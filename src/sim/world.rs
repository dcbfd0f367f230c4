//! The world: field bounds plus the two object layers
//!
//! The world owns every object. Other parts of the simulation borrow objects
//! for the duration of a tick and refer to them across ticks by `ObjectId`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::objects::{GameObject, Layer, ObjectId, ObjectKind};
use crate::error::WorldError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct World {
    /// Size of the playing field; both coordinates are non-negative
    pub field_size: Vec2,
    /// Platforms and buffs, drawn first
    pub immovable_objects: Vec<GameObject>,
    /// Player (always index 0) and projectiles
    pub movable_objects: Vec<GameObject>,
    /// Completed simulation ticks
    #[serde(default)]
    pub time_ticks: u64,
    /// Next free object handle
    #[serde(default)]
    next_id: ObjectId,
}

impl World {
    /// Build a world from freshly created objects.
    ///
    /// Handles are (re)assigned in order, immovable objects first. A world
    /// without movable objects gets a Player at the origin.
    pub fn new(
        field_size: Vec2,
        immovable_objects: Vec<GameObject>,
        movable_objects: Vec<GameObject>,
    ) -> Result<Self, WorldError> {
        check_field_size(field_size)?;

        let mut world = Self {
            field_size,
            immovable_objects,
            movable_objects,
            time_ticks: 0,
            next_id: 1,
        };

        if world.movable_objects.is_empty() {
            log::info!("World has no movable objects, adding a Player at the origin");
            world.movable_objects.push(GameObject::player(Vec2::ZERO));
        }

        let mut next_id = 1;
        for object in world
            .immovable_objects
            .iter_mut()
            .chain(world.movable_objects.iter_mut())
        {
            object.id = next_id;
            next_id += 1;
        }
        world.next_id = next_id;

        world.validated()
    }

    /// Check the structural invariants of a world that came from outside
    /// (e.g. a save file), normalize platform sizes and make the handle
    /// counter consistent.
    pub fn validated(mut self) -> Result<Self, WorldError> {
        check_field_size(self.field_size)?;

        for object in &mut self.immovable_objects {
            object.normalize_platform();
        }

        for (objects, layer) in [
            (&self.immovable_objects, Layer::Immovable),
            (&self.movable_objects, Layer::Movable),
        ] {
            if let Some(misplaced) = objects.iter().find(|o| o.layer() != layer) {
                return Err(WorldError::WrongLayer {
                    kind: misplaced.kind_name(),
                    id: misplaced.id,
                    layer: layer.as_str(),
                });
            }
        }

        match self.movable_objects.first() {
            Some(first) if matches!(first.kind, ObjectKind::Player(_)) => {}
            Some(first) => {
                return Err(WorldError::PlayerNotFirst {
                    found: first.kind_name(),
                });
            }
            None => return Err(WorldError::PlayerNotFirst { found: "nothing" }),
        }

        let players = self
            .movable_objects
            .iter()
            .filter(|o| matches!(o.kind, ObjectKind::Player(_)))
            .count();
        if players > 1 {
            return Err(WorldError::MultiplePlayers { count: players });
        }

        let mut ids: Vec<ObjectId> = self.all_objects().map(|o| o.id).collect();
        ids.sort_unstable();
        if let Some(pair) = ids.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(WorldError::DuplicateId { id: pair[0] });
        }

        let max_id = ids.last().copied().unwrap_or(0);
        self.next_id = self.next_id.max(max_id + 1);

        Ok(self)
    }

    /// Allocate a new object handle
    pub fn next_entity_id(&mut self) -> ObjectId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add a movable object, assigning it a fresh handle
    pub fn spawn_movable(&mut self, mut object: GameObject) -> ObjectId {
        let id = self.next_entity_id();
        object.id = id;
        self.movable_objects.push(object);
        id
    }

    /// Every object, immovable layer first
    pub fn all_objects(&self) -> impl Iterator<Item = &GameObject> {
        self.immovable_objects
            .iter()
            .chain(self.movable_objects.iter())
    }

    /// The Player at `movable_objects[0]`
    pub fn player(&self) -> Option<&GameObject> {
        self.movable_objects
            .first()
            .filter(|o| matches!(o.kind, ObjectKind::Player(_)))
    }

    pub fn player_mut(&mut self) -> Option<&mut GameObject> {
        self.movable_objects
            .first_mut()
            .filter(|o| matches!(o.kind, ObjectKind::Player(_)))
    }

    pub fn find_immovable(&self, id: ObjectId) -> Option<&GameObject> {
        self.immovable_objects.iter().find(|o| o.id == id)
    }

    pub fn find_immovable_mut(&mut self, id: ObjectId) -> Option<&mut GameObject> {
        self.immovable_objects.iter_mut().find(|o| o.id == id)
    }

    pub fn find_movable(&self, id: ObjectId) -> Option<&GameObject> {
        self.movable_objects.iter().find(|o| o.id == id)
    }

    pub fn find_movable_mut(&mut self, id: ObjectId) -> Option<&mut GameObject> {
        self.movable_objects.iter_mut().find(|o| o.id == id)
    }
}

fn check_field_size(field_size: Vec2) -> Result<(), WorldError> {
    // Written so that NaN is rejected as well
    if !(field_size.x >= 0.0 && field_size.y >= 0.0) {
        return Err(WorldError::NegativeFieldSize {
            x: field_size.x,
            y: field_size.y,
        });
    }
    Ok(())
}
