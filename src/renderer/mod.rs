//! Rendering boundary
//!
//! The simulation hands a read-only `WorldSnapshot` to a `RenderSink` once per
//! tick. The sink never touches the live world.

pub mod shapes;

use glam::Vec2;

use crate::sim::{GameObject, World};
pub use shapes::{DrawCommand, Shape, draw_commands};

/// Copy of everything needed to draw one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorldSnapshot {
    pub field_size: Vec2,
    pub immovable_objects: Vec<GameObject>,
    pub movable_objects: Vec<GameObject>,
    pub time_ticks: u64,
}

impl From<&World> for WorldSnapshot {
    fn from(world: &World) -> Self {
        Self {
            field_size: world.field_size,
            immovable_objects: world.immovable_objects.clone(),
            movable_objects: world.movable_objects.clone(),
            time_ticks: world.time_ticks,
        }
    }
}

/// Something that can draw a frame
pub trait RenderSink {
    fn render(&mut self, snapshot: &WorldSnapshot);
}

/// Headless renderer: turns frames into draw commands and logs them
#[derive(Debug, Default)]
pub struct LogRenderer {
    pub frames_rendered: u64,
    pub last_frame: Vec<DrawCommand>,
}

impl RenderSink for LogRenderer {
    fn render(&mut self, snapshot: &WorldSnapshot) {
        self.last_frame = draw_commands(snapshot);
        self.frames_rendered += 1;

        log::debug!(
            "Frame {} (tick {}): {} draw commands",
            self.frames_rendered,
            snapshot.time_ticks,
            self.last_frame.len()
        );
        for command in &self.last_frame {
            log::trace!("  {:?}", command);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maps::raw_map;

    #[test]
    fn test_log_renderer_keeps_last_frame() {
        let mut renderer = LogRenderer::default();
        let snapshot = WorldSnapshot::from(&raw_map("2").unwrap());
        renderer.render(&snapshot);
        renderer.render(&snapshot);
        assert_eq!(renderer.frames_rendered, 2);
        assert_eq!(renderer.last_frame.len(), 4);
    }
}
