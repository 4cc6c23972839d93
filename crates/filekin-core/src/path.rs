//! Path normalization and identity keys.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Fold platform separators to `/` so patterns can be written once.
pub fn to_forward_slashes(path: &str) -> String {
    path.replace('\\', "/")
}

/// Case-insensitive lookup form of a path. Never shown to users.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NormalizedPath(String);

impl NormalizedPath {
    /// Normalize a raw path.
    pub fn new(path: &str) -> Self {
        Self(to_forward_slashes(path).to_lowercase())
    }

    /// The normalized string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this path lies strictly below `folder`.
    pub fn is_inside(&self, folder: &NormalizedPath) -> bool {
        let prefix = folder.0.trim_end_matches('/');
        self.0.len() > prefix.len() + 1
            && self.0.starts_with(prefix)
            && self.0.as_bytes()[prefix.len()] == b'/'
    }
}

impl fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Key pairing related files across types.
///
/// Always lower-cased; optionally stripped to alphanumerics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IdentityKey(String);

impl IdentityKey {
    /// Normalize a raw extracted key. Returns `None` for empty keys.
    pub fn normalize(raw: &str, strip_non_alphanumeric: bool) -> Option<Self> {
        let lowered = to_forward_slashes(raw).to_lowercase();
        let key = if strip_non_alphanumeric {
            lowered.chars().filter(|c| c.is_alphanumeric()).collect()
        } else {
            lowered
        };
        (!key.is_empty()).then_some(Self(key))
    }

    /// The key string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_path_folds_case_and_separators() {
        assert_eq!(
            NormalizedPath::new(r"C:\Repo\Src\Entity.ts").as_str(),
            "c:/repo/src/entity.ts"
        );
    }

    #[test]
    fn test_is_inside() {
        let folder = NormalizedPath::new("/root/src");
        assert!(NormalizedPath::new("/root/src/a.ts").is_inside(&folder));
        assert!(NormalizedPath::new("/root/src/deep/a.ts").is_inside(&folder));
        assert!(!NormalizedPath::new("/root/srcs/a.ts").is_inside(&folder));
        assert!(!NormalizedPath::new("/root/src").is_inside(&folder));
        assert!(NormalizedPath::new("/root/src/a.ts").is_inside(&NormalizedPath::new("/root/src/")));
    }

    #[test]
    fn test_identity_key_normalization() {
        assert_eq!(
            IdentityKey::normalize("Classes/My-Entity", false).unwrap().as_str(),
            "classes/my-entity"
        );
        assert_eq!(
            IdentityKey::normalize("Classes/My-Entity", true).unwrap().as_str(),
            "classesmyentity"
        );
        assert_eq!(IdentityKey::normalize("--", true), None);
        assert_eq!(IdentityKey::normalize("", false), None);
    }
}
