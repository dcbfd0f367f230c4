//! Error taxonomy
//!
//! - `WorldError`: configuration problems caught at world construction
//! - `SimError`: logic/dispatch bugs surfaced while ticking
//! - `PersistenceError`, `SettingsError`: resource problems at load/save time
//! - `LaunchError`: everything the launcher can report to the user

use std::path::PathBuf;

use thiserror::Error;

use crate::sim::{GameEvent, ObjectId};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorldError {
    #[error("got negative game field size in process of world init: ({x}, {y})")]
    NegativeFieldSize { x: f32, y: f32 },
    #[error("{kind} (object {id}) cannot be placed in the {layer} layer")]
    WrongLayer {
        kind: &'static str,
        id: ObjectId,
        layer: &'static str,
    },
    #[error("movable_objects[0] must be the Player, found {found}")]
    PlayerNotFirst { found: &'static str },
    #[error("only one Player is supported, found {count}")]
    MultiplePlayers { count: usize },
    #[error("object id {id} is used more than once")]
    DuplicateId { id: ObjectId },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("while processing [{method}], got moving object with unsupported kind: {kind}")]
    UnsupportedMover {
        method: &'static str,
        kind: &'static str,
    },
    #[error("while processing [{method}], got unhandled collision {event:?} with {collided}")]
    UnhandledCollision {
        method: &'static str,
        event: GameEvent,
        collided: &'static str,
    },
    #[error("while processing [{method}], object {id} does not exist or has the wrong kind")]
    MissingObject { method: &'static str, id: ObjectId },
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to read save file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write save file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("save data is corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),
    #[error("failed to encode world: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("unsupported save format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error("saved world is invalid: {0}")]
    InvalidWorld(#[from] WorldError),
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("tick rate must be positive")]
    ZeroTickRate,
    #[error("input queue capacity must be positive")]
    ZeroQueueCapacity,
}

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("wrong raw map name: {0}")]
    UnknownRawMap(String),
    #[error("invalid command line: {0}")]
    Usage(String),
    #[error(transparent)]
    World(#[from] WorldError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Simulation(#[from] SimError),
    #[error("failed to start the simulation thread: {0}")]
    ThreadSpawn(#[source] std::io::Error),
    #[error("simulation thread panicked")]
    SimulationPanicked,
}

impl LaunchError {
    /// Short message shown to the player (details only in debug mode)
    pub fn user_message(&self) -> &'static str {
        match self {
            LaunchError::UnknownRawMap(_) => "Wrong raw map name",
            LaunchError::Usage(_) => "Wrong command line arguments",
            LaunchError::World(_) => "The map is invalid",
            LaunchError::Persistence(_) => "The map file cannot be loaded",
            LaunchError::Settings(_) => "The settings file cannot be loaded",
            LaunchError::Simulation(_)
            | LaunchError::ThreadSpawn(_)
            | LaunchError::SimulationPanicked => {
                "The game stopped because of an internal error"
            }
        }
    }

    /// Name of the error variant for verbose diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            LaunchError::UnknownRawMap(_) => "UnknownRawMap",
            LaunchError::Usage(_) => "Usage",
            LaunchError::World(_) => "WorldError",
            LaunchError::Persistence(_) => "PersistenceError",
            LaunchError::Settings(_) => "SettingsError",
            LaunchError::Simulation(_) => "SimError",
            LaunchError::ThreadSpawn(_) => "ThreadSpawn",
            LaunchError::SimulationPanicked => "SimulationPanicked",
        }
    }
}
