//! Persistent key-value store
//!
//! The registries never talk to the filesystem directly. They read and
//! write typed values through a [`Store`], keyed by [`StoreKey`] tokens
//! whose names are qualified by the owning type so unrelated subsystems
//! can share one store without colliding.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::{Error, Result};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;

/// Durability requested for a single write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flush {
    /// The value is durable when `put` returns.
    Immediate,
    /// The value may be held in memory until the next flush.
    Deferred,
}

/// A typed key into a [`Store`].
pub struct StoreKey<T> {
    name: &'static str,
    _value: PhantomData<fn() -> T>,
}

impl<T> StoreKey<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _value: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> Clone for StoreKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for StoreKey<T> {}

impl<T> fmt::Debug for StoreKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StoreKey").field(&self.name).finish()
    }
}

/// Untyped store contract.
///
/// Implementations hold JSON values; typed access lives in [`StoreExt`].
pub trait Store: Send + Sync + fmt::Debug {
    /// Read the value stored under `key`, if any.
    fn get_raw(&self, key: &str) -> Result<Option<Value>>;

    /// Store `value` under `key`, replacing any previous value.
    fn put_raw(&self, key: &str, value: Value, flush: Flush) -> Result<()>;

    /// Make every deferred write durable.
    fn flush(&self) -> Result<()>;
}

/// Typed access on top of [`Store`].
pub trait StoreExt: Store {
    fn get<T: DeserializeOwned>(&self, key: &StoreKey<T>) -> Result<Option<T>> {
        match self.get_raw(key.name())? {
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|source| Error::Serialize {
                    key: key.name().to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    fn put<T: Serialize>(&self, key: &StoreKey<T>, value: &T, flush: Flush) -> Result<()> {
        let value = serde_json::to_value(value).map_err(|source| Error::Serialize {
            key: key.name().to_string(),
            source,
        })?;
        self.put_raw(key.name(), value, flush)
    }
}

impl<S: Store + ?Sized> StoreExt for S {}
