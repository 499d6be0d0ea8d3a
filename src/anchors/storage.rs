//! JSON persistence for anchor tables
//!
//! Files are written to a temporary sibling first and renamed into place, so
//! an interrupted run never leaves a truncated table behind.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{Error, Result};

/// Serialize `value` as JSON to `path`
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let mut temp_name = path.as_os_str().to_os_string();
    temp_name.push(".tmp");
    let temp_path = Path::new(&temp_name);

    let file = File::create(temp_path).map_err(|e| Error::io(temp_path, e))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, value).map_err(|e| Error::json(path, e))?;
    writer.flush().map_err(|e| Error::io(temp_path, e))?;

    fs::rename(temp_path, path).map_err(|e| Error::io(path, e))?;

    tracing::debug!(path = %path.display(), "Table saved");
    Ok(())
}

/// Deserialize a JSON value from `path`
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;

    let reader = BufReader::new(file);
    let value = serde_json::from_reader(reader).map_err(|e| Error::json(path, e))?;

    tracing::debug!(path = %path.display(), "Table loaded");
    Ok(value)
}
