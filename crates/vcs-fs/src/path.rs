//! Normalized path handling and canonicalization

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

/// A path normalized to use forward slashes internally.
///
/// Shared roots are stored in this form so that comparisons behave the
/// same on every platform. Conversion to a platform-native path happens
/// only at I/O boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    ///
    /// Converts backslashes to forward slashes for internal storage.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        let normalized = path_str.replace('\\', "/");
        Self { inner: normalized }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Get the parent directory.
    ///
    /// The parent of `/a` is `/` and the parent of `C:/a` is `C:/`.
    /// Returns `None` once the filesystem root or a drive root has been
    /// reached.
    pub fn parent(&self) -> Option<Self> {
        let trimmed = self.inner.trim_end_matches('/');
        let head = &trimmed[..trimmed.rfind('/')?];
        let inner = if head.is_empty() || is_drive_prefix(head) {
            format!("{}/", head)
        } else {
            head.to_string()
        };
        Some(Self { inner })
    }

    /// Iterate over this path and each of its ancestors, nearest first.
    pub fn ancestors(&self) -> impl Iterator<Item = NormalizedPath> {
        std::iter::successors(Some(self.clone()), |p| p.parent())
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        let trimmed = self.inner.trim_end_matches('/');
        trimmed.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// Check if this path exists on the filesystem.
    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }

    /// Get the extension if present.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 {
                None
            } else {
                Some(&name[idx + 1..])
            }
        })
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}

impl From<&PathBuf> for NormalizedPath {
    fn from(p: &PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<NormalizedPath> for String {
    fn from(p: NormalizedPath) -> Self {
        p.inner
    }
}

/// Resolve a path to its canonical, absolute form.
///
/// The input is trimmed and made absolute against the current working
/// directory. Symlinks are resolved on the longest prefix that exists on
/// disk; the remaining, non-existing components are normalized lexically.
/// Unlike [`std::fs::canonicalize`] this succeeds for paths that do not
/// exist yet.
pub fn canonicalize(path: impl AsRef<Path>) -> Result<NormalizedPath> {
    let raw = path.as_ref().to_string_lossy();
    let candidate = PathBuf::from(raw.trim());

    let absolute = if candidate.is_absolute() {
        candidate
    } else {
        let cwd = std::env::current_dir().map_err(|e| Error::io(&candidate, e))?;
        cwd.join(candidate)
    };
    let lexical = lexical_normalize(&absolute);

    let mut existing = lexical.as_path();
    let mut missing: Vec<&OsStr> = Vec::new();
    loop {
        match dunce::canonicalize(existing) {
            Ok(mut resolved) => {
                for name in missing.iter().rev() {
                    resolved.push(name);
                }
                return Ok(NormalizedPath::new(resolved));
            }
            Err(_) => match (existing.parent(), existing.file_name()) {
                (Some(parent), Some(name)) => {
                    missing.push(name);
                    existing = parent;
                }
                // Nothing on the way up exists; keep the lexical form.
                _ => return Ok(NormalizedPath::new(&lexical)),
            },
        }
    }
}

/// `C:` and the like.
fn is_drive_prefix(s: &str) -> bool {
    matches!(s.as_bytes(), [letter, b':'] if letter.is_ascii_alphabetic())
}

/// Remove `.` components and fold `..` into the preceding component.
fn lexical_normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
