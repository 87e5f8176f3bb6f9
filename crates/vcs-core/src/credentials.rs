//! Per-server credential registry
//!
//! At most one credential is kept per server. Servers are compared as
//! parsed URLs, so `HTTP://Build.Example.com:80` and
//! `http://build.example.com/` name the same server.
//!
//! Secrets are stored in plaintext.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;
use vcs_fs::{Flush, Store, StoreExt, StoreKey};

/// Store key of the credential list.
pub const CREDENTIALS_KEY: StoreKey<Vec<Credential>> =
    StoreKey::new(concat!(module_path!(), "::CredentialRegistry.credentials"));

const MASK: &str = "*************";

/// A login for one server.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    server: String,
    user: String,
    // TODO: encrypt at rest once a key source is chosen (OS keychain or a
    // passphrase-derived key); the store format would need a version bump.
    secret: String,
}

impl Credential {
    pub fn new(server: impl Into<String>, user: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            user: user.into(),
            secret: secret.into(),
        }
    }

    /// Server URL as given when the credential was stored.
    pub fn server(&self) -> &str {
        &self.server
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// The parsed server URL.
    pub fn server_url(&self) -> std::result::Result<Url, url::ParseError> {
        Url::parse(&self.server)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("server", &self.server)
            .field("user", &self.user)
            .field("secret", &MASK)
            .finish()
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.server, self.user, MASK)
    }
}

/// What [`CredentialRegistry::set_credential`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialChange {
    /// No credential existed for the server; the new one was added.
    Inserted,
    /// An existing credential for the server was replaced.
    Replaced { previous: Credential },
}

/// The stored server credentials.
#[derive(Debug, Default)]
pub struct CredentialRegistry {
    credentials: Vec<Credential>,
}

impl CredentialRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load credentials from `store`; a missing list is an empty one.
    pub fn load(store: &dyn Store) -> Result<Self> {
        let credentials = store.get(&CREDENTIALS_KEY)?.unwrap_or_default();
        tracing::debug!(count = credentials.len(), "Loaded credentials");
        Ok(Self { credentials })
    }

    pub fn credentials(&self) -> &[Credential] {
        &self.credentials
    }

    /// Find the credential stored for `host`.
    ///
    /// Stored entries whose server does not parse as a URL are logged and
    /// skipped. An unparsable `host` matches nothing.
    pub fn find_credential(&self, host: &str) -> Option<&Credential> {
        self.position_of_host(host).map(|idx| &self.credentials[idx])
    }

    fn position_of_host(&self, host: &str) -> Option<usize> {
        match Url::parse(host) {
            Ok(url) => self.position(&url),
            Err(e) => {
                tracing::warn!(host, error = %e, "Not a valid server URL");
                None
            }
        }
    }

    fn position(&self, url: &Url) -> Option<usize> {
        self.credentials
            .iter()
            .position(|credential| match credential.server_url() {
                Ok(stored) => &stored == url,
                Err(e) => {
                    tracing::warn!(
                        server = %credential.server,
                        error = %e,
                        "Skipping credential with malformed server URL"
                    );
                    false
                }
            })
    }

    /// Store a credential for `url`, replacing any existing one for the
    /// same server.
    pub fn set_credential(
        &mut self,
        store: &dyn Store,
        url: &str,
        user: &str,
        secret: &str,
    ) -> Result<CredentialChange> {
        let parsed = Url::parse(url).map_err(|e| {
            Error::invalid_argument(format!("Invalid server URL \"{}\": {}", url, e))
        })?;
        let candidate = Credential::new(url, user, secret);

        let mut next = self.credentials.clone();
        let change = match self.position(&parsed) {
            None => CredentialChange::Inserted,
            Some(idx) => CredentialChange::Replaced {
                previous: next.remove(idx),
            },
        };
        next.push(candidate.clone());
        store.put(&CREDENTIALS_KEY, &next, Flush::Deferred)?;
        self.credentials = next;

        match &change {
            CredentialChange::Inserted => {
                tracing::info!(credential = %candidate, "Stored credential");
            }
            CredentialChange::Replaced { previous } => {
                tracing::info!(
                    previous = %previous,
                    credential = %candidate,
                    "Replaced existing credential"
                );
            }
        }
        Ok(change)
    }

    /// Remove the credential stored for `host`, if any.
    ///
    /// The list is written back even when nothing matched. An unparsable
    /// `host` matches nothing, as in [`Self::find_credential`].
    pub fn remove_credential(&mut self, store: &dyn Store, host: &str) -> Result<Option<Credential>> {
        let mut next = self.credentials.clone();
        let removed = self.position_of_host(host).map(|idx| next.remove(idx));
        store.put(&CREDENTIALS_KEY, &next, Flush::Deferred)?;
        self.credentials = next;

        match &removed {
            Some(credential) => tracing::info!(%credential, "Removed credential"),
            None => tracing::debug!(host, "No credential to remove"),
        }
        Ok(removed)
    }

    pub fn clear(&mut self, store: &dyn Store, flush: Flush) -> Result<()> {
        store.put(&CREDENTIALS_KEY, &Vec::<Credential>::new(), flush)?;
        self.credentials.clear();
        Ok(())
    }
}
