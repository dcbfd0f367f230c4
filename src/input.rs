//! Raw input plumbing
//!
//! Input is captured outside the simulation thread and only crosses over
//! through a bounded channel. The simulation drains it once at the start of
//! every tick: key events update the pressed-key set, pointer events are kept
//! in arrival order for the spawner.

use std::collections::BTreeSet;
use std::sync::mpsc::{Receiver, SyncSender, TryRecvError, TrySendError, sync_channel};

use glam::Vec2;

use crate::sim::TickInput;

/// Integer key code as delivered by the UI toolkit
pub type KeyCode = u32;

/// Default key codes
pub mod keys {
    use super::KeyCode;

    pub const SPACE: KeyCode = 32;
    pub const DIGIT_1: KeyCode = 49;
    pub const DIGIT_2: KeyCode = 50;
    pub const A: KeyCode = 65;
    pub const D: KeyCode = 68;
}

/// Set of currently held key codes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PressedKeys {
    codes: BTreeSet<KeyCode>,
}

impl PressedKeys {
    pub fn press(&mut self, code: KeyCode) {
        self.codes.insert(code);
    }

    pub fn release(&mut self, code: KeyCode) {
        self.codes.remove(&code);
    }

    pub fn contains(&self, code: KeyCode) -> bool {
        self.codes.contains(&code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerAction {
    Press,
    Drag,
    Release,
}

/// Mouse/touch event in field coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub action: PointerAction,
    pub position: Vec2,
}

impl PointerEvent {
    pub fn new(action: PointerAction, position: Vec2) -> Self {
        Self { action, position }
    }
}

/// Everything the UI side can tell the simulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyPressed(KeyCode),
    KeyReleased(KeyCode),
    Pointer(PointerEvent),
}

impl InputEvent {
    /// Parse a text command: `press <code>`, `release <code>`, `down x y`,
    /// `drag x y` or `up x y`
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let command = parts.next()?;

        let event = match command {
            "press" => InputEvent::KeyPressed(parts.next()?.parse().ok()?),
            "release" => InputEvent::KeyReleased(parts.next()?.parse().ok()?),
            "down" | "drag" | "up" => {
                let x: f32 = parts.next()?.parse().ok()?;
                let y: f32 = parts.next()?.parse().ok()?;
                let action = match command {
                    "down" => PointerAction::Press,
                    "drag" => PointerAction::Drag,
                    _ => PointerAction::Release,
                };
                InputEvent::Pointer(PointerEvent::new(action, Vec2::new(x, y)))
            }
            _ => return None,
        };

        if parts.next().is_some() {
            return None;
        }
        Some(event)
    }
}

/// Create the bounded input channel
pub fn input_channel(capacity: usize) -> (InputSender, InputReceiver) {
    let (tx, rx) = sync_channel(capacity);
    (
        InputSender { tx },
        InputReceiver {
            rx,
            pressed: PressedKeys::default(),
            disconnected: false,
        },
    )
}

/// UI-side handle. Never blocks: a full queue drops the event.
#[derive(Debug, Clone)]
pub struct InputSender {
    tx: SyncSender<InputEvent>,
}

impl InputSender {
    /// Queue an event. Returns false once the simulation side is gone.
    pub fn send(&self, event: InputEvent) -> bool {
        match self.tx.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                log::warn!("Input queue full, dropping {:?}", event);
                true
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Simulation-side handle; tracks which keys are held between ticks
#[derive(Debug)]
pub struct InputReceiver {
    rx: Receiver<InputEvent>,
    pressed: PressedKeys,
    disconnected: bool,
}

impl InputReceiver {
    /// Take every queued event and return this tick's input
    pub fn drain(&mut self) -> TickInput {
        let mut pointer_events = Vec::new();

        loop {
            match self.rx.try_recv() {
                Ok(InputEvent::KeyPressed(code)) => self.pressed.press(code),
                Ok(InputEvent::KeyReleased(code)) => self.pressed.release(code),
                Ok(InputEvent::Pointer(event)) => pointer_events.push(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !self.disconnected {
                        log::info!("Input source closed");
                        self.disconnected = true;
                    }
                    break;
                }
            }
        }

        TickInput {
            keys: self.pressed.clone(),
            pointer_events,
        }
    }

    /// All senders have been dropped
    pub fn is_disconnected(&self) -> bool {
        self.disconnected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_tracks_pressed_keys() {
        let (tx, mut rx) = input_channel(8);
        tx.send(InputEvent::KeyPressed(keys::A));
        tx.send(InputEvent::KeyPressed(keys::D));
        tx.send(InputEvent::KeyReleased(keys::A));

        let input = rx.drain();
        assert!(!input.keys.contains(keys::A));
        assert!(input.keys.contains(keys::D));
        assert!(input.pointer_events.is_empty());

        // Held keys persist across ticks
        let input = rx.drain();
        assert!(input.keys.contains(keys::D));
    }

    #[test]
    fn test_pointer_events_keep_arrival_order() {
        let (tx, mut rx) = input_channel(8);
        let down = PointerEvent::new(PointerAction::Press, Vec2::new(1.0, 2.0));
        let drag = PointerEvent::new(PointerAction::Drag, Vec2::new(3.0, 4.0));
        let up = PointerEvent::new(PointerAction::Release, Vec2::new(5.0, 6.0));
        for event in [down, drag, up] {
            tx.send(InputEvent::Pointer(event));
        }

        assert_eq!(rx.drain().pointer_events, vec![down, drag, up]);
        assert!(rx.drain().pointer_events.is_empty());
    }

    #[test]
    fn test_full_queue_drops_events() {
        let (tx, mut rx) = input_channel(2);
        for code in [1, 2, 3] {
            assert!(tx.send(InputEvent::KeyPressed(code)));
        }
        let input = rx.drain();
        assert!(input.keys.contains(1));
        assert!(input.keys.contains(2));
        assert!(!input.keys.contains(3));
    }

    #[test]
    fn test_disconnect_is_noticed() {
        let (tx, mut rx) = input_channel(2);
        tx.send(InputEvent::KeyPressed(keys::SPACE));
        drop(tx);

        let input = rx.drain();
        assert!(input.keys.contains(keys::SPACE));
        assert!(rx.is_disconnected());
    }

    #[test]
    fn test_send_after_receiver_dropped() {
        let (tx, rx) = input_channel(2);
        drop(rx);
        assert!(!tx.send(InputEvent::KeyPressed(keys::A)));
    }

    #[test]
    fn test_parse_text_commands() {
        assert_eq!(InputEvent::parse("press 65"), Some(InputEvent::KeyPressed(65)));
        assert_eq!(InputEvent::parse("release 32"), Some(InputEvent::KeyReleased(32)));
        assert_eq!(
            InputEvent::parse("  drag 10.5 20 "),
            Some(InputEvent::Pointer(PointerEvent::new(
                PointerAction::Drag,
                Vec2::new(10.5, 20.0)
            )))
        );
        assert_eq!(
            InputEvent::parse("up 1 2"),
            Some(InputEvent::Pointer(PointerEvent::new(
                PointerAction::Release,
                Vec2::new(1.0, 2.0)
            )))
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(InputEvent::parse(""), None);
        assert_eq!(InputEvent::parse("press"), None);
        assert_eq!(InputEvent::parse("press -1"), None);
        assert_eq!(InputEvent::parse("down 1"), None);
        assert_eq!(InputEvent::parse("down 1 2 3"), None);
        assert_eq!(InputEvent::parse("jump"), None);
    }
}
