//! Save/load of worlds
//!
//! - Versioned JSON envelope
//! - Backup rotation (tmp -> save, old save -> backup)
//! - Corruption recovery from the backup
//!
//! A loaded world is always validated before it is handed out.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;
use crate::sim::World;

/// Current save format version
pub const SAVE_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveEnvelope {
    pub version: u32,
    pub world: World,
}

/// Encode a world as an envelope
pub fn to_json(world: &World) -> Result<String, PersistenceError> {
    let envelope = SaveEnvelope {
        version: SAVE_FORMAT_VERSION,
        world: world.clone(),
    };
    serde_json::to_string_pretty(&envelope).map_err(PersistenceError::Encode)
}

/// Decode and validate an envelope
pub fn from_json(json: &str) -> Result<World, PersistenceError> {
    let envelope: SaveEnvelope = serde_json::from_str(json).map_err(PersistenceError::Corrupt)?;
    if envelope.version != SAVE_FORMAT_VERSION {
        return Err(PersistenceError::UnsupportedVersion {
            found: envelope.version,
            expected: SAVE_FORMAT_VERSION,
        });
    }
    Ok(envelope.world.validated()?)
}

fn sibling(path: &Path, extension: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(extension);
    PathBuf::from(name)
}

/// Backup kept next to the save file
pub fn backup_path(path: &Path) -> PathBuf {
    sibling(path, ".bak")
}

/// Write a world to `path`. The previous save (if any) becomes the backup.
pub fn save_world(world: &World, path: &Path) -> Result<(), PersistenceError> {
    let json = to_json(world)?;
    let tmp = sibling(path, ".tmp");
    let write_err = |target: &Path| {
        let target = target.to_path_buf();
        move |source| PersistenceError::Write {
            path: target,
            source,
        }
    };

    fs::write(&tmp, json).map_err(write_err(&tmp))?;
    if path.exists() {
        let backup = backup_path(path);
        fs::rename(path, &backup).map_err(write_err(&backup))?;
    }
    fs::rename(&tmp, path).map_err(write_err(path))?;

    log::info!("Saved world to {}", path.display());
    Ok(())
}

/// Load a world from `path`, falling back to the backup if the save is
/// corrupt
pub fn load_world(path: &Path) -> Result<World, PersistenceError> {
    match read_world(path) {
        Ok(world) => Ok(world),
        Err(PersistenceError::Corrupt(e)) => {
            let backup = backup_path(path);
            if !backup.exists() {
                return Err(PersistenceError::Corrupt(e));
            }
            log::warn!(
                "Save {} is corrupt ({}), trying backup {}",
                path.display(),
                e,
                backup.display()
            );
            read_world(&backup).map_err(|_| PersistenceError::Corrupt(e))
        }
        Err(e) => Err(e),
    }
}

fn read_world(path: &Path) -> Result<World, PersistenceError> {
    let json = fs::read_to_string(path).map_err(|source| PersistenceError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let world = from_json(&json)?;
    log::info!("Loaded world from {}", path.display());
    Ok(world)
}
