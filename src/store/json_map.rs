use std::{
    fs, io,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::ser::PrettyFormatter;

use crate::error::Result;

pub type JsonMap<V> = IndexMap<String, V>;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("{} does not exist", .0.display())]
    Absent(PathBuf),
    #[error("{} is corrupt: {reason}", .path.display())]
    Corrupt { path: PathBuf, reason: String },
}

/// Reads a flat `{ user id: value }` document, keeping the file's key order.
pub fn load<V: DeserializeOwned>(path: &Path) -> std::result::Result<JsonMap<V>, LoadError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(LoadError::Absent(path.to_path_buf()));
        }
        Err(e) => {
            return Err(LoadError::Corrupt {
                path: path.to_path_buf(),
                reason: e.to_string(),
            });
        }
    };

    serde_json::from_str(&content).map_err(|e| LoadError::Corrupt {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Missing files start empty; corrupt ones are logged and discarded.
pub fn load_or_default<V: DeserializeOwned>(path: &Path) -> JsonMap<V> {
    match load(path) {
        Ok(map) => map,
        Err(LoadError::Absent(_)) => {
            tracing::debug!("{} not found, starting empty", path.display());
            JsonMap::new()
        }
        Err(e) => {
            tracing::warn!("Failed to read {}, using an empty mapping", e);
            JsonMap::new()
        }
    }
}

/// Overwrites the whole document. Not atomic.
pub fn save<V: Serialize>(map: &JsonMap<V>, path: &Path) -> Result<()> {
    let mut buffer = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
    map.serialize(&mut serializer)?;
    fs::write(path, buffer)?;
    Ok(())
}
