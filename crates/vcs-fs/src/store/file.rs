//! File-backed store

use super::{Flush, Store};
use crate::{Error, NormalizedPath, Result, io};
use parking_lot::Mutex;
use serde_json::{Map, Value};

/// A [`Store`] persisted as a single JSON object on disk.
///
/// The whole file is read once on [`FileStore::open`]; afterwards reads are
/// served from memory. Immediate writes rewrite the file atomically.
/// Deferred writes are kept in memory until the next immediate write, an
/// explicit [`Store::flush`], or drop.
///
/// Two processes sharing one file do not observe each other's writes
/// after opening; the last writer wins.
#[derive(Debug)]
pub struct FileStore {
    path: NormalizedPath,
    state: Mutex<FileState>,
}

#[derive(Debug, Default)]
struct FileState {
    entries: Map<String, Value>,
    dirty: bool,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<NormalizedPath>) -> Result<Self> {
        let path = path.into();
        let entries = match io::read_text_if_exists(&path)? {
            Some(content) if !content.trim().is_empty() => {
                match serde_json::from_str::<Value>(&content) {
                    Ok(Value::Object(map)) => map,
                    Ok(other) => {
                        return Err(Error::StoreCorrupt {
                            path: path.to_native(),
                            message: format!("expected a JSON object, found {}", kind_of(&other)),
                        });
                    }
                    Err(e) => {
                        return Err(Error::StoreCorrupt {
                            path: path.to_native(),
                            message: e.to_string(),
                        });
                    }
                }
            }
            _ => Map::new(),
        };

        tracing::debug!(path = %path, keys = entries.len(), "Opened file store");

        Ok(Self {
            path,
            state: Mutex::new(FileState {
                entries,
                dirty: false,
            }),
        })
    }

    fn write_out(&self, state: &mut FileState) -> Result<()> {
        let content = serde_json::to_string_pretty(&state.entries).map_err(|source| {
            Error::Serialize {
                key: "*".to_string(),
                source,
            }
        })?;
        io::write_text(&self.path, &content)?;
        state.dirty = false;
        Ok(())
    }
}

impl Store for FileStore {
    fn get_raw(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.state.lock().entries.get(key).cloned())
    }

    fn put_raw(&self, key: &str, value: Value, flush: Flush) -> Result<()> {
        let mut state = self.state.lock();
        let previous = state.entries.insert(key.to_string(), value);
        match flush {
            Flush::Deferred => {
                state.dirty = true;
                Ok(())
            }
            Flush::Immediate => self.write_out(&mut state).inspect_err(|_| {
                // A rejected value must not reach disk on a later flush.
                match previous {
                    Some(previous) => state.entries.insert(key.to_string(), previous),
                    None => state.entries.remove(key),
                };
            }),
        }
    }

    fn flush(&self) -> Result<()> {
        let mut state = self.state.lock();
        if state.dirty {
            self.write_out(&mut state)?;
        }
        Ok(())
    }
}

impl Drop for FileStore {
    fn drop(&mut self) {
        if let Err(e) = Store::flush(self) {
            tracing::warn!(path = %self.path, error = %e, "Failed to flush store on drop");
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{StoreExt, StoreKey};
    use tempfile::tempdir;

    const KEY: StoreKey<Vec<u32>> = StoreKey::new("tests.values");

    #[test]
    fn deferred_write_is_not_on_disk_until_flush() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        let store = FileStore::open(&path).unwrap();

        store.put(&KEY, &vec![1, 2], Flush::Deferred).unwrap();
        assert!(!path.exists());

        store.flush().unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("tests.values"));
    }

    #[test]
    fn drop_flushes_pending_writes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        {
            let store = FileStore::open(&path).unwrap();
            store.put(&KEY, &vec![3], Flush::Deferred).unwrap();
        }

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get(&KEY).unwrap(), Some(vec![3]));
    }

    #[test]
    fn failed_immediate_write_is_rolled_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        let store = FileStore::open(&path).unwrap();
        store.put(&KEY, &vec![1], Flush::Immediate).unwrap();

        // A directory where the lock file belongs makes the write fail.
        let lock = dir.path().join(".store.json.lock");
        std::fs::remove_file(&lock).unwrap();
        std::fs::create_dir(&lock).unwrap();
        assert!(store.put(&KEY, &vec![2], Flush::Immediate).is_err());
        assert_eq!(store.get(&KEY).unwrap(), Some(vec![1]));

        std::fs::remove_dir(&lock).unwrap();
        store.put_raw("tests.other", Value::Bool(true), Flush::Deferred).unwrap();
        store.flush().unwrap();
        drop(store);

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get(&KEY).unwrap(), Some(vec![1]));
    }

    #[test]
    fn non_object_file_is_corrupt() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();

        let err = FileStore::open(&path).unwrap_err();
        assert!(matches!(err, Error::StoreCorrupt { .. }));
    }
}
