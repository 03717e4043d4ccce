//! JSON file database.
//!
//! Values live in named columns, keys and values hex encoded, the whole file
//! rewritten on every batch. Writes go to a temporary file that is renamed over
//! `data.json`, so a crash leaves either the old or the new snapshot.

use crate::StorageError;
use parking_lot::RwLock;
use std::fs;
use std::path::{Path, PathBuf};

const DATA_FILE: &str = "data.json";

pub struct Database {
    path: PathBuf,
    data: RwLock<serde_json::Value>,
}

impl Database {
    pub fn new(path: &Path) -> Result<Self, StorageError> {
        fs::create_dir_all(path)?;

        let data_file = path.join(DATA_FILE);
        let data = if data_file.exists() {
            let content = fs::read_to_string(&data_file)?;
            serde_json::from_str(&content)
                .map_err(|e| StorageError::Deserialization(e.to_string()))?
        } else {
            serde_json::json!({})
        };

        Ok(Self {
            path: path.to_path_buf(),
            data: RwLock::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All entries of a column, in key order.
    pub fn iter(&self, column: &str) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StorageError> {
        let data = self.data.read();
        let Some(entries) = data.get(column).and_then(|c| c.as_object()) else {
            return Ok(Vec::new());
        };

        let mut out = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            let key = hex::decode(key).map_err(|e| StorageError::Deserialization(e.to_string()))?;
            out.push((key, decode_hex_value(value)?));
        }
        out.sort();
        Ok(out)
    }

    /// Write several entries into one column as a single file update.
    ///
    /// The in-memory view only changes once the file has been written.
    pub fn put_batch(
        &self,
        column: &str,
        entries: &[(Vec<u8>, Vec<u8>)],
    ) -> Result<(), StorageError> {
        let mut data = self.data.write();
        let mut next = data.clone();

        if !next.is_object() {
            next = serde_json::json!({});
        }
        let root = next
            .as_object_mut()
            .ok_or_else(|| StorageError::Serialization("database root is not an object".into()))?;
        let columns = root
            .entry(column.to_string())
            .or_insert_with(|| serde_json::json!({}));
        let obj = columns
            .as_object_mut()
            .ok_or_else(|| StorageError::Serialization(format!("column {} is not an object", column)))?;

        for (key, value) in entries {
            obj.insert(hex::encode(key), serde_json::json!(hex::encode(value)));
        }

        self.persist(&next)?;
        *data = next;
        Ok(())
    }

    fn persist(&self, data: &serde_json::Value) -> Result<(), StorageError> {
        let content = serde_json::to_string_pretty(data)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        let tmp = self.path.join(format!("{}.tmp", DATA_FILE));
        fs::write(&tmp, content)?;
        fs::rename(&tmp, self.path.join(DATA_FILE))?;
        Ok(())
    }
}

fn decode_hex_value(value: &serde_json::Value) -> Result<Vec<u8>, StorageError> {
    let s = value
        .as_str()
        .ok_or_else(|| StorageError::Deserialization("value is not a string".into()))?;
    hex::decode(s).map_err(|e| StorageError::Deserialization(e.to_string()))
}
