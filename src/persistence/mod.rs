//! Save/load persistence
//!
//! Features:
//! - Versioned JSON envelope
//! - Atomic writes on native (tmp → save)
//! - LocalStorage on web
//!
//! Callers that want "load or default" use the `load`/`save` wrappers on
//! `Settings` and `Leaderboard`, which log and swallow these errors.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Current envelope format
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported format version {found} (expected {expected})")]
    Version { found: u32, expected: u32 },
    #[error("storage unavailable")]
    Unavailable,
}

#[derive(Debug, Serialize, Deserialize)]
struct Envelope<T> {
    version: u32,
    payload: T,
}

/// Wrap and serialize a document
pub fn encode<T: Serialize>(value: &T) -> Result<String, PersistError> {
    let envelope = Envelope {
        version: FORMAT_VERSION,
        payload: value,
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// Unwrap a document, rejecting other format versions
pub fn decode<T: DeserializeOwned>(json: &str) -> Result<T, PersistError> {
    let envelope: Envelope<serde_json::Value> = serde_json::from_str(json)?;
    if envelope.version != FORMAT_VERSION {
        return Err(PersistError::Version {
            found: envelope.version,
            expected: FORMAT_VERSION,
        });
    }
    Ok(serde_json::from_value(envelope.payload)?)
}

#[cfg(not(target_arch = "wasm32"))]
mod backend {
    use std::fs;
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};

    use super::PersistError;

    /// Directory override for save files
    pub const DATA_DIR_ENV: &str = "DUEL_PONG_DATA_DIR";

    pub fn data_dir() -> PathBuf {
        std::env::var_os(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    fn path_for(dir: &Path, key: &str) -> PathBuf {
        dir.join(format!("{}.json", key))
    }

    pub fn read(dir: &Path, key: &str) -> Result<Option<String>, PersistError> {
        match fs::read_to_string(path_for(dir, key)) {
            Ok(json) => Ok(Some(json)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write to `<key>.json.tmp`, then rename over the real file
    pub fn write(dir: &Path, key: &str, json: &str) -> Result<(), PersistError> {
        fs::create_dir_all(dir)?;
        let path = path_for(dir, key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    pub fn remove(dir: &Path, key: &str) -> Result<(), PersistError> {
        match fs::remove_file(path_for(dir, key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(target_arch = "wasm32")]
mod backend {
    use super::PersistError;

    fn storage() -> Result<web_sys::Storage, PersistError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(PersistError::Unavailable)
    }

    pub fn read(key: &str) -> Result<Option<String>, PersistError> {
        storage()?
            .get_item(key)
            .map_err(|_| PersistError::Unavailable)
    }

    pub fn write(key: &str, json: &str) -> Result<(), PersistError> {
        storage()?
            .set_item(key, json)
            .map_err(|_| PersistError::Unavailable)
    }

    pub fn remove(key: &str) -> Result<(), PersistError> {
        storage()?
            .remove_item(key)
            .map_err(|_| PersistError::Unavailable)
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use backend::{DATA_DIR_ENV, data_dir};

#[cfg(not(target_arch = "wasm32"))]
mod files {
    use std::path::Path;

    use serde::Serialize;
    use serde::de::DeserializeOwned;

    use super::{PersistError, backend, decode, encode};

    /// Load `<dir>/<key>.json`; `Ok(None)` if it doesn't exist
    pub fn load_in<T: DeserializeOwned>(dir: &Path, key: &str) -> Result<Option<T>, PersistError> {
        match backend::read(dir, key)? {
            Some(json) => decode(&json).map(Some),
            None => Ok(None),
        }
    }

    pub fn save_in<T: Serialize>(dir: &Path, key: &str, value: &T) -> Result<(), PersistError> {
        let json = encode(value)?;
        backend::write(dir, key, &json)
    }

    pub fn remove_in(dir: &Path, key: &str) -> Result<(), PersistError> {
        backend::remove(dir, key)
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use files::{load_in, remove_in, save_in};

/// Load a document; `Ok(None)` if nothing was saved under `key`
#[cfg(not(target_arch = "wasm32"))]
pub fn load<T: DeserializeOwned>(key: &str) -> Result<Option<T>, PersistError> {
    load_in(&data_dir(), key)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn save<T: Serialize>(key: &str, value: &T) -> Result<(), PersistError> {
    save_in(&data_dir(), key, value)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn remove(key: &str) -> Result<(), PersistError> {
    remove_in(&data_dir(), key)
}

/// Load a document; `Ok(None)` if nothing was saved under `key`
#[cfg(target_arch = "wasm32")]
pub fn load<T: DeserializeOwned>(key: &str) -> Result<Option<T>, PersistError> {
    match backend::read(key)? {
        Some(json) => decode(&json).map(Some),
        None => Ok(None),
    }
}

#[cfg(target_arch = "wasm32")]
pub fn save<T: Serialize>(key: &str, value: &T) -> Result<(), PersistError> {
    let json = encode(value)?;
    backend::write(key, &json)
}

#[cfg(target_arch = "wasm32")]
pub fn remove(key: &str) -> Result<(), PersistError> {
    backend::remove(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Doc {
        name: String,
        count: u32,
    }

    #[test]
    fn test_envelope_carries_version() {
        let doc = Doc {
            name: "a".into(),
            count: 2,
        };
        let json = encode(&doc).unwrap();
        assert!(json.contains("\"version\":1"));
        assert_eq!(decode::<Doc>(&json).unwrap(), doc);
    }

    #[test]
    fn test_decode_rejects_future_version() {
        let json = r#"{"version":99,"payload":{"name":"a","count":2}}"#;
        match decode::<Doc>(json) {
            Err(PersistError::Version { found, expected }) => {
                assert_eq!(found, 99);
                assert_eq!(expected, FORMAT_VERSION);
            }
            other => panic!("expected version error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_key_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded: Option<Doc> = load_in(dir.path(), "absent").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_file_save_load_remove() {
        let dir = tempfile::tempdir().unwrap();
        let doc = Doc {
            name: "left".into(),
            count: 7,
        };

        save_in(dir.path(), "doc", &doc).unwrap();
        assert!(dir.path().join("doc.json").exists());
        assert!(!dir.path().join("doc.json.tmp").exists());
        assert_eq!(load_in::<Doc>(dir.path(), "doc").unwrap(), Some(doc));

        remove_in(dir.path(), "doc").unwrap();
        // Removing again is not an error
        remove_in(dir.path(), "doc").unwrap();
        assert!(load_in::<Doc>(dir.path(), "doc").unwrap().is_none());
    }

    #[test]
    fn test_save_creates_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("saves").join("duel");
        save_in(&nested, "n", &3u32).unwrap();
        assert_eq!(load_in::<u32>(&nested, "n").unwrap(), Some(3));
    }

    #[test]
    fn test_future_version_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("doc.json"),
            r#"{"version":99,"payload":{"name":"a","count":2}}"#,
        )
        .unwrap();

        match load_in::<Doc>(dir.path(), "doc") {
            Err(PersistError::Version { found: 99, .. }) => {}
            other => panic!("expected version error, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(decode::<Doc>("not json"), Err(PersistError::Json(_))));
        assert!(matches!(
            decode::<Doc>(r#"{"version":1,"payload":{"name":5}}"#),
            Err(PersistError::Json(_))
        ));
    }
}
