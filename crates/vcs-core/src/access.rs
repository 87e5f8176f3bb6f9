//! Entry point to the share and credential registries
//!
//! [`VcsAccess`] composes the [`RootRegistry`] and the
//! [`CredentialRegistry`] behind a single read-write lock. State is read
//! from the store once, when the instance is opened; afterwards memory is
//! the source of truth and every mutation writes through to the store.
//!
//! Processes sharing a store do not see each other's changes after
//! opening it. The last writer wins.

use crate::config::RegistryConfig;
use crate::credentials::{Credential, CredentialChange, CredentialRegistry};
use crate::roots::{RootRegistry, SharedRoot};
use crate::Result;
use parking_lot::{Mutex, RwLock, const_mutex};
use std::path::Path;
use std::sync::Arc;
use vcs_fs::{FileStore, Flush, Store};

/// The registry facade handed to every consumer.
#[derive(Debug)]
pub struct VcsAccess {
    store: Arc<dyn Store>,
    state: RwLock<Registries>,
}

#[derive(Debug)]
struct Registries {
    roots: RootRegistry,
    credentials: CredentialRegistry,
}

impl VcsAccess {
    /// Load both registries from `store`.
    pub fn open(store: Arc<dyn Store>, config: RegistryConfig) -> Result<Self> {
        let roots = RootRegistry::load(store.as_ref(), config.path_policy, config.containment)?;
        let credentials = CredentialRegistry::load(store.as_ref())?;
        Ok(Self {
            store,
            state: RwLock::new(Registries { roots, credentials }),
        })
    }

    /// Open a [`FileStore`] at the configured location and load from it.
    pub fn open_file(config: RegistryConfig) -> Result<Self> {
        let path = config.resolved_store_path()?;
        let store = FileStore::open(path)?;
        Self::open(Arc::new(store), config)
    }

    /// Snapshot of all shared roots.
    pub fn roots(&self) -> Vec<SharedRoot> {
        self.state.read().roots.roots().to_vec()
    }

    /// The shared root that owns `path`, if any.
    pub fn get_root(&self, path: impl AsRef<Path>) -> Result<Option<SharedRoot>> {
        let state = self.state.read();
        Ok(state.roots.get_root(path)?.cloned())
    }

    /// Share `local_path` against `remote_root_id`.
    pub fn share(&self, local_path: impl AsRef<Path>, remote_root_id: u64) -> Result<SharedRoot> {
        let mut state = self.state.write();
        state.roots.share(self.store.as_ref(), local_path, remote_root_id)
    }

    /// Remove the share with the given id.
    pub fn unshare(&self, id: &str) -> Result<SharedRoot> {
        let mut state = self.state.write();
        state.roots.unshare(self.store.as_ref(), id)
    }

    /// The credential stored for `host`, if any.
    pub fn find_credential(&self, host: &str) -> Option<Credential> {
        self.state.read().credentials.find_credential(host).cloned()
    }

    /// Store (or replace) the credential for `url`.
    pub fn set_credential(&self, url: &str, user: &str, secret: &str) -> Result<CredentialChange> {
        let mut state = self.state.write();
        state
            .credentials
            .set_credential(self.store.as_ref(), url, user, secret)
    }

    /// Remove the credential for `host`, returning it if one existed.
    pub fn remove_credential(&self, host: &str) -> Result<Option<Credential>> {
        let mut state = self.state.write();
        state.credentials.remove_credential(self.store.as_ref(), host)
    }

    /// Snapshot of all credentials.
    pub fn credentials(&self) -> Vec<Credential> {
        self.state.read().credentials.credentials().to_vec()
    }

    /// Forget every share and credential and persist the empty state.
    ///
    /// Meant for tests and resets. Share ids are still never reused.
    pub fn clear(&self) -> Result<()> {
        let mut state = self.state.write();
        state.roots.clear(self.store.as_ref(), Flush::Deferred)?;
        state.credentials.clear(self.store.as_ref(), Flush::Immediate)?;
        tracing::info!("Cleared all shares and credentials");
        Ok(())
    }

    /// Make deferred credential writes durable.
    pub fn flush(&self) -> Result<()> {
        Ok(self.store.flush()?)
    }
}

static GLOBAL: Mutex<Option<Arc<VcsAccess>>> = const_mutex(None);

/// The process-wide instance, opened from `config` on first use.
///
/// Construction happens under a mutex, so concurrent first calls share one
/// instance. Later calls return that instance and ignore `config`. Prefer
/// [`VcsAccess::open`] and passing the instance explicitly.
pub fn global(config: &RegistryConfig) -> Result<Arc<VcsAccess>> {
    let mut slot = GLOBAL.lock();
    if let Some(access) = slot.as_ref() {
        return Ok(Arc::clone(access));
    }
    let access = Arc::new(VcsAccess::open_file(config.clone())?);
    *slot = Some(Arc::clone(&access));
    Ok(access)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use tempfile::tempdir;

    #[test]
    fn global_is_constructed_once() {
        let dir = tempdir().unwrap();
        let config = RegistryConfig {
            store_path: Some(dir.path().join("store.json")),
            ..RegistryConfig::default()
        };

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let config = config.clone();
                thread::spawn(move || global(&config).unwrap())
            })
            .collect();
        let instances: Vec<Arc<VcsAccess>> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();

        for instance in &instances[1..] {
            assert!(Arc::ptr_eq(&instances[0], instance));
        }
    }
}
