//! Shared-root and credential registry for VCS Share
//!
//! This crate tracks which local directories are shared against remote
//! VCS roots and which credentials are known for which servers:
//!
//! - **Root registry**: ordered shared roots with a monotonic id counter
//!   and the guarantee that no two shared directories overlap
//! - **Credential registry**: at most one login per server, compared as
//!   parsed URLs
//! - **Facade**: [`VcsAccess`], one lock over both registries, loading
//!   from and writing through to a [`vcs_fs::Store`]
//!
//! # Architecture
//!
//! ```text
//!        vcs-cli
//!           |
//!       vcs-core
//!           |
//!        vcs-fs
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use vcs_core::{RegistryConfig, VcsAccess};
//! use vcs_fs::MemoryStore;
//!
//! fn example() -> vcs_core::Result<()> {
//!     let access = VcsAccess::open(Arc::new(MemoryStore::new()), RegistryConfig::default())?;
//!     let root = access.share("/work/project", 42)?;
//!     assert_eq!(access.get_root("/work/project/src")?, Some(root));
//!     Ok(())
//! }
//! ```

pub mod access;
pub mod config;
pub mod credentials;
pub mod error;
pub mod roots;

pub use access::VcsAccess;
pub use config::{ContainmentCheck, RegistryConfig};
pub use credentials::{Credential, CredentialChange, CredentialRegistry};
pub use error::{Error, Result};
pub use roots::{RootRegistry, ShareLedger, SharedRoot};
