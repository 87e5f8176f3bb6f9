//! Shared root registry
//!
//! A shared root binds a local directory to a remote VCS root. The
//! registry keeps the ordered list of roots together with the id counter
//! and guarantees that no two roots overlap: neither local path may be an
//! ancestor of (or equal to) the other.
//!
//! Roots and counter are persisted as one [`ShareLedger`] record, so a
//! single atomic store write covers both.

use crate::config::ContainmentCheck;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::Path;
use vcs_fs::{Flush, NormalizedPath, PathPolicy, Store, StoreExt, StoreKey, canonicalize};

/// Store key of the share ledger.
pub const SHARES_KEY: StoreKey<ShareLedger> =
    StoreKey::new(concat!(module_path!(), "::RootRegistry.shares"));

/// A local directory shared against a remote VCS root.
///
/// Two roots are equal when they bind the same local path to the same
/// remote root; the id does not take part in equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedRoot {
    id: String,
    local_path: NormalizedPath,
    remote_root_id: u64,
}

impl SharedRoot {
    fn new(id: u64, local_path: NormalizedPath, remote_root_id: u64) -> Self {
        Self {
            id: id.to_string(),
            local_path,
            remote_root_id,
        }
    }

    /// Registry-assigned id, stable for the lifetime of the share.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Canonical local directory.
    pub fn local_path(&self) -> &NormalizedPath {
        &self.local_path
    }

    /// Remote root reference. Not checked against any server.
    pub fn remote_root_id(&self) -> u64 {
        self.remote_root_id
    }
}

impl PartialEq for SharedRoot {
    fn eq(&self, other: &Self) -> bool {
        self.local_path == other.local_path && self.remote_root_id == other.remote_root_id
    }
}

impl Eq for SharedRoot {}

impl Hash for SharedRoot {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.local_path.hash(state);
        self.remote_root_id.hash(state);
    }
}

impl fmt::Display for SharedRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "id={}, local={}, remote={}",
            self.id, self.local_path, self.remote_root_id
        )
    }
}

/// Persisted form of the registry: the last allocated id and the roots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShareLedger {
    /// Last id handed out. The next share gets `counter + 1`.
    pub counter: u64,
    /// Shared roots in insertion order.
    pub roots: Vec<SharedRoot>,
}

impl ShareLedger {
    /// Raise the counter to the highest numeric id in use.
    ///
    /// Returns `true` when the stored counter was behind.
    fn repair_counter(&mut self) -> bool {
        let highest = self
            .roots
            .iter()
            .filter_map(|root| root.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        if highest > self.counter {
            self.counter = highest;
            true
        } else {
            false
        }
    }
}

/// The set of shared roots and the id allocator.
#[derive(Debug)]
pub struct RootRegistry {
    ledger: ShareLedger,
    policy: PathPolicy,
    containment: ContainmentCheck,
}

impl RootRegistry {
    /// An empty registry that has never allocated an id.
    pub fn new(policy: PathPolicy, containment: ContainmentCheck) -> Self {
        Self {
            ledger: ShareLedger::default(),
            policy,
            containment,
        }
    }

    /// Load the registry from `store`; a missing ledger is an empty one.
    pub fn load(store: &dyn Store, policy: PathPolicy, containment: ContainmentCheck) -> Result<Self> {
        let mut ledger = store.get(&SHARES_KEY)?.unwrap_or_default();
        if ledger.repair_counter() {
            tracing::warn!(
                counter = ledger.counter,
                "Share counter was behind the stored ids, raised it"
            );
        }
        tracing::debug!(
            roots = ledger.roots.len(),
            counter = ledger.counter,
            "Loaded shared roots"
        );
        Ok(Self {
            ledger,
            policy,
            containment,
        })
    }

    /// All shared roots, in insertion order.
    pub fn roots(&self) -> &[SharedRoot] {
        &self.ledger.roots
    }

    /// The last id handed out.
    pub fn counter(&self) -> u64 {
        self.ledger.counter
    }

    /// Find the shared root that owns `path`, if any.
    ///
    /// The path is canonicalized, then each ancestor (starting with the
    /// path itself) is compared against every root. Matching is exact at
    /// some ancestor level, so a root at `/a/b` never owns `/a/bc`.
    pub fn get_root(&self, path: impl AsRef<Path>) -> Result<Option<&SharedRoot>> {
        let canonical = canonicalize(path)?;
        Ok(self.owner_of(&canonical))
    }

    fn owner_of(&self, canonical: &NormalizedPath) -> Option<&SharedRoot> {
        canonical.ancestors().find_map(|ancestor| {
            self.ledger
                .roots
                .iter()
                .find(|root| self.policy.same_path(&ancestor, &root.local_path))
        })
    }

    /// Share the directory at `local_path` against `remote_root_id`.
    ///
    /// Fails with [`Error::InvalidArgument`] when the path is missing, is
    /// not a directory, lies inside an existing root, or would itself
    /// contain one. Sharing is not idempotent: repeating a successful call
    /// fails because the path is already shared.
    pub fn share(
        &mut self,
        store: &dyn Store,
        local_path: impl AsRef<Path>,
        remote_root_id: u64,
    ) -> Result<SharedRoot> {
        let local_path = canonicalize(local_path)?;
        self.validate(&local_path)?;

        let id = self
            .ledger
            .counter
            .checked_add(1)
            .ok_or(Error::IdSpaceExhausted {
                last: self.ledger.counter,
            })?;
        let root = SharedRoot::new(id, local_path, remote_root_id);

        let mut next = self.ledger.clone();
        next.counter = id;
        next.roots.push(root.clone());
        store.put(&SHARES_KEY, &next, Flush::Immediate)?;
        self.ledger = next;

        tracing::info!(id = %root.id, local = %root.local_path, remote = remote_root_id, "Shared root");
        Ok(root)
    }

    /// Remove the root with the given id.
    pub fn unshare(&mut self, store: &dyn Store, id: &str) -> Result<SharedRoot> {
        let position = self
            .ledger
            .roots
            .iter()
            .position(|root| root.id == id)
            .ok_or_else(|| Error::invalid_argument(format!("Could not find share \"{}\"", id)))?;

        let mut next = self.ledger.clone();
        let removed = next.roots.remove(position);
        store.put(&SHARES_KEY, &next, Flush::Immediate)?;
        self.ledger = next;

        tracing::info!(id, local = %removed.local_path, "Share removed");
        Ok(removed)
    }

    /// Drop every root. The counter is kept so ids stay unique.
    pub fn clear(&mut self, store: &dyn Store, flush: Flush) -> Result<()> {
        let next = ShareLedger {
            counter: self.ledger.counter,
            roots: Vec::new(),
        };
        store.put(&SHARES_KEY, &next, flush)?;
        self.ledger = next;
        Ok(())
    }

    fn validate(&self, local_path: &NormalizedPath) -> Result<()> {
        if !local_path.exists() {
            return Err(Error::invalid_argument(format!(
                "Path is not found: {}",
                local_path
            )));
        }
        if !local_path.is_dir() {
            return Err(Error::invalid_argument(format!(
                "Only a directory can be shared: {}",
                local_path
            )));
        }

        // The new path must not sit inside an existing root...
        if let Some(owner) = self.owner_of(local_path) {
            return Err(Error::invalid_argument(format!(
                "{} is already shared by share \"{}\" ({})",
                local_path, owner.id, owner.local_path
            )));
        }

        // ...and must not contain one.
        if let Some(inner) = self
            .ledger
            .roots
            .iter()
            .find(|root| self.conflicts(local_path, &root.local_path))
        {
            return Err(Error::invalid_argument(format!(
                "Conflicting share for {}: share \"{}\" ({}) is inside it",
                local_path, inner.id, inner.local_path
            )));
        }

        Ok(())
    }

    fn conflicts(&self, candidate: &NormalizedPath, existing: &NormalizedPath) -> bool {
        match self.containment {
            ContainmentCheck::Substring => {
                self.policy.contains_substring(existing, candidate)
                    || self.policy.contains_substring(candidate, existing)
            }
            ContainmentCheck::Ancestor => self.policy.is_ancestor_or_equal(candidate, existing),
        }
    }
}
