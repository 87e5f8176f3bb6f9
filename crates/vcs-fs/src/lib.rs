//! Filesystem and persistence layer for VCS Share
//!
//! Provides path canonicalization, the path comparison policy, atomic
//! file writes, configuration loading, and the persistent key-value
//! store the share registry writes through.

pub mod config;
pub mod error;
pub mod io;
pub mod path;
pub mod policy;
pub mod store;

pub use config::ConfigStore;
pub use error::{Error, Result};
pub use path::{NormalizedPath, canonicalize};
pub use policy::PathPolicy;
pub use store::{FileStore, Flush, MemoryStore, Store, StoreExt, StoreKey};
