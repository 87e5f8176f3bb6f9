//! In-memory store

use super::{Flush, Store};
use crate::Result;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A [`Store`] that lives only as long as the process.
///
/// Wrap it in an `Arc` to share one store between several registry
/// instances, e.g. to check that state survives a reload.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Value>>,
    pending: Mutex<Vec<String>>,
    durable_writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times the store was made durable (immediate puts and
    /// flushes that had pending writes).
    pub fn durable_writes(&self) -> usize {
        self.durable_writes.load(Ordering::SeqCst)
    }

    /// Keys written with [`Flush::Deferred`] and not yet flushed.
    pub fn pending_keys(&self) -> Vec<String> {
        self.pending.lock().clone()
    }
}

impl Store for MemoryStore {
    fn get_raw(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn put_raw(&self, key: &str, value: Value, flush: Flush) -> Result<()> {
        self.entries.lock().insert(key.to_string(), value);
        match flush {
            Flush::Immediate => {
                self.pending.lock().clear();
                self.durable_writes.fetch_add(1, Ordering::SeqCst);
            }
            Flush::Deferred => {
                let mut pending = self.pending.lock();
                if !pending.iter().any(|k| k == key) {
                    pending.push(key.to_string());
                }
            }
        }
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        let mut pending = self.pending.lock();
        if !pending.is_empty() {
            pending.clear();
            self.durable_writes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}
