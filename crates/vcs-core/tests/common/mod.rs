//! Shared fixtures for vcs-core integration tests

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use vcs_core::{RegistryConfig, VcsAccess};
use vcs_fs::{MemoryStore, Store};

/// A scratch directory plus a registry backed by an in-memory store.
pub struct Fixture {
    pub dir: TempDir,
    pub store: Arc<MemoryStore>,
    pub config: RegistryConfig,
    pub access: VcsAccess,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(MemoryStore::new());
        let handle: Arc<dyn Store> = store.clone();
        let access = VcsAccess::open(handle, config.clone()).unwrap();
        Self {
            dir,
            store,
            config,
            access,
        }
    }

    /// Create `rel` (and its parents) under the scratch directory.
    pub fn mkdir(&self, rel: &str) -> PathBuf {
        let path = self.dir.path().join(rel);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Create an empty file at `rel`.
    pub fn touch(&self, rel: &str) -> PathBuf {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, "").unwrap();
        path
    }

    /// A second registry instance loading from the same store.
    pub fn reopen(&self) -> VcsAccess {
        let handle: Arc<dyn Store> = self.store.clone();
        VcsAccess::open(handle, self.config.clone()).unwrap()
    }
}
