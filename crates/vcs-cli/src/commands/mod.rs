//! Command implementations for vcs-cli

pub mod credentials;
pub mod reset;
pub mod share;

pub use credentials::{run_credentials, run_login, run_logout};
pub use reset::run_reset;
pub use share::{run_roots, run_share, run_unshare, run_which};
