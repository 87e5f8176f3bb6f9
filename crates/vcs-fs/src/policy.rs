//! Path comparison policy
//!
//! Filesystems disagree on whether `Foo` and `foo` name the same entry.
//! Every path comparison made by the share registry goes through a
//! [`PathPolicy`] so the behavior is chosen by configuration instead of
//! being baked into the comparison code.

use crate::NormalizedPath;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// How two normalized paths are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathPolicy {
    /// Compare paths byte-for-byte when `true`, ignoring case otherwise.
    pub case_sensitive: bool,
}

impl Default for PathPolicy {
    fn default() -> Self {
        Self::case_insensitive()
    }
}

impl PathPolicy {
    pub const fn case_insensitive() -> Self {
        Self {
            case_sensitive: false,
        }
    }

    pub const fn case_sensitive() -> Self {
        Self {
            case_sensitive: true,
        }
    }

    /// The form of `path` used for equality and containment tests.
    pub fn comparison_key<'a>(&self, path: &'a str) -> Cow<'a, str> {
        if self.case_sensitive {
            Cow::Borrowed(path)
        } else {
            Cow::Owned(path.to_lowercase())
        }
    }

    /// Whether `a` and `b` name the same path under this policy.
    pub fn same_path(&self, a: &NormalizedPath, b: &NormalizedPath) -> bool {
        self.comparison_key(a.as_str()) == self.comparison_key(b.as_str())
    }

    /// Whether `ancestor` is `path` itself or one of its ancestors.
    ///
    /// Walks `path` upward component by component, so `/a/bc` is never
    /// considered to be inside `/a/b`.
    pub fn is_ancestor_or_equal(&self, ancestor: &NormalizedPath, path: &NormalizedPath) -> bool {
        let key = self.comparison_key(ancestor.as_str());
        path.ancestors()
            .any(|candidate| self.comparison_key(candidate.as_str()) == key)
    }

    /// Raw substring containment of `needle` in `haystack`, after applying
    /// the case rule. Separator boundaries are not considered.
    pub fn contains_substring(&self, haystack: &NormalizedPath, needle: &NormalizedPath) -> bool {
        let needle = self.comparison_key(needle.as_str());
        self.comparison_key(haystack.as_str()).contains(&*needle)
    }
}
